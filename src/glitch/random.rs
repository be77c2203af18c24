//! Random sources for corruption draws
//!
//! The engine never calls into `rand` directly; it goes through [`GlitchRng`]
//! so that a seeded or scripted source can be swapped in.

use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;

/// Source of the three independent draws a tick needs
pub trait GlitchRng: Send {
    /// Uniform value in `[0, 1)`
    fn next_unit(&mut self) -> f64;

    /// Uniform index in `[0, len)`. Callers guarantee `len > 0`.
    fn next_index(&mut self, len: usize) -> usize;

    /// Uniform character from a non-empty alphabet
    fn next_char(&mut self, alphabet: &[char]) -> char {
        alphabet[self.next_index(alphabet.len())]
    }
}

/// Non-deterministic source backed by the thread-local RNG
#[derive(Debug, Default, Clone, Copy)]
pub struct ThreadRandom;

impl GlitchRng for ThreadRandom {
    fn next_unit(&mut self) -> f64 {
        rand::rng().random::<f64>()
    }

    fn next_index(&mut self, len: usize) -> usize {
        rand::rng().random_range(0..len)
    }
}

/// Reproducible source, same seed gives the same corruption sequence
#[derive(Debug, Clone)]
pub struct SeededRandom {
    rng: Pcg32,
}

impl SeededRandom {
    pub fn new(seed: u64) -> Self {
        Self {
            rng: Pcg32::seed_from_u64(seed),
        }
    }
}

impl GlitchRng for SeededRandom {
    fn next_unit(&mut self) -> f64 {
        self.rng.random::<f64>()
    }

    fn next_index(&mut self, len: usize) -> usize {
        self.rng.random_range(0..len)
    }
}

/// Build a boxed source: seeded when a seed is given, thread RNG otherwise.
pub fn boxed_rng(seed: Option<u64>) -> Box<dyn GlitchRng> {
    match seed {
        Some(seed) => Box::new(SeededRandom::new(seed)),
        None => Box::new(ThreadRandom),
    }
}

#[cfg(test)]
pub(crate) mod testing {
    use super::GlitchRng;
    use std::collections::VecDeque;

    /// Replays queued draws; once a queue runs dry it returns values that
    /// never trigger a corruption (unit = 0.999, index = 0).
    #[derive(Debug, Default)]
    pub struct ScriptedRandom {
        units: VecDeque<f64>,
        indices: VecDeque<usize>,
        chars: VecDeque<char>,
    }

    impl ScriptedRandom {
        pub fn new() -> Self {
            Self::default()
        }

        /// Queue one successful corruption at `position` using `replacement`
        pub fn corrupt(mut self, position: usize, replacement: char) -> Self {
            self.units.push_back(0.0);
            self.indices.push_back(position);
            self.chars.push_back(replacement);
            self
        }

        /// Queue one failed probability draw
        pub fn skip(mut self) -> Self {
            self.units.push_back(0.999);
            self
        }
    }

    impl GlitchRng for ScriptedRandom {
        fn next_unit(&mut self) -> f64 {
            self.units.pop_front().unwrap_or(0.999)
        }

        fn next_index(&mut self, len: usize) -> usize {
            self.indices.pop_front().unwrap_or(0).min(len - 1)
        }

        fn next_char(&mut self, alphabet: &[char]) -> char {
            self.chars.pop_front().unwrap_or(alphabet[0])
        }
    }

    /// Always corrupts, cycling positions
    #[derive(Debug, Default)]
    pub struct AlwaysCorrupt {
        counter: usize,
    }

    impl GlitchRng for AlwaysCorrupt {
        fn next_unit(&mut self) -> f64 {
            0.0
        }

        fn next_index(&mut self, len: usize) -> usize {
            self.counter += 1;
            self.counter % len
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_seeded_is_reproducible() {
        let mut a = SeededRandom::new(42);
        let mut b = SeededRandom::new(42);

        for _ in 0..100 {
            assert_eq!(a.next_unit(), b.next_unit());
            assert_eq!(a.next_index(10), b.next_index(10));
        }
    }

    #[test]
    fn test_draws_stay_in_range() {
        let alphabet: Vec<char> = "XYZ".chars().collect();
        let mut sources: Vec<Box<dyn GlitchRng>> = vec![boxed_rng(Some(7)), boxed_rng(None)];

        for rng in sources.iter_mut() {
            for _ in 0..1000 {
                let u = rng.next_unit();
                assert!((0.0..1.0).contains(&u));
                assert!(rng.next_index(5) < 5);
                assert!(alphabet.contains(&rng.next_char(&alphabet)));
            }
        }
    }

    #[test]
    fn test_scripted_random_replays_queue() {
        let mut rng = testing::ScriptedRandom::new().skip().corrupt(3, 'Z');
        let alphabet: Vec<char> = "AB".chars().collect();

        assert_eq!(rng.next_unit(), 0.999);
        assert_eq!(rng.next_unit(), 0.0);
        assert_eq!(rng.next_index(10), 3);
        assert_eq!(rng.next_char(&alphabet), 'Z');

        // Exhausted queues never corrupt
        assert_eq!(rng.next_unit(), 0.999);
        assert_eq!(rng.next_char(&alphabet), 'A');
    }
}
