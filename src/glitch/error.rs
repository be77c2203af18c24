//! Glitch engine error types
//!
//! The effect is purely cosmetic, so very little can go wrong at runtime.
//! These errors cover strict intensity parsing and engine configuration
//! validation at attach time.

use thiserror::Error;

/// Errors that can occur in the glitch layer
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum GlitchError {
    /// Unrecognized intensity level (strict parsing only)
    #[error("Invalid intensity: {0} (expected low, medium or high)")]
    InvalidIntensity(String),

    /// The corruption alphabet has no characters to draw from
    #[error("Corruption alphabet is empty")]
    EmptyAlphabet,

    /// Tick period or revert delay is unusable
    #[error("Invalid timing: {0}")]
    InvalidTiming(String),
}

/// Result type alias for glitch operations
pub type GlitchResult<T> = Result<T, GlitchError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = GlitchError::InvalidIntensity("extreme".to_string());
        assert_eq!(
            err.to_string(),
            "Invalid intensity: extreme (expected low, medium or high)"
        );

        let err = GlitchError::EmptyAlphabet;
        assert_eq!(err.to_string(), "Corruption alphabet is empty");
    }
}
