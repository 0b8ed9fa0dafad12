// Sources of per-item price fluctuations

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Draws the signed step applied to an item on each tick
pub trait FluctuationSource: Send {
    /// Returns either `+step` or `-step`
    fn next_fluctuation(&mut self, step: f64) -> f64;
}

/// Fair coin flip over a seedable RNG
#[derive(Debug, Clone)]
pub struct RandomFluctuation {
    rng: StdRng,
}

impl RandomFluctuation {
    pub fn seeded(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }

    pub fn from_entropy() -> Self {
        Self {
            rng: StdRng::from_entropy(),
        }
    }

    pub fn from_seed_option(seed: Option<u64>) -> Self {
        match seed {
            Some(seed) => Self::seeded(seed),
            None => Self::from_entropy(),
        }
    }
}

impl FluctuationSource for RandomFluctuation {
    fn next_fluctuation(&mut self, step: f64) -> f64 {
        if self.rng.gen_bool(0.5) {
            step
        } else {
            -step
        }
    }
}

/// Replays a fixed sequence of signs, cycling when exhausted
#[derive(Debug, Clone)]
pub struct ScriptedFluctuation {
    signs: Vec<f64>,
    cursor: usize,
}

impl ScriptedFluctuation {
    /// Only the sign of each value is used; zero is treated as positive
    pub fn new(sequence: Vec<f64>) -> Self {
        let signs = if sequence.is_empty() {
            vec![1.0]
        } else {
            sequence
                .into_iter()
                .map(|v| if v < 0.0 { -1.0 } else { 1.0 })
                .collect()
        };
        Self { signs, cursor: 0 }
    }

    pub fn always_up() -> Self {
        Self::new(vec![1.0])
    }

    pub fn always_down() -> Self {
        Self::new(vec![-1.0])
    }
}

impl FluctuationSource for ScriptedFluctuation {
    fn next_fluctuation(&mut self, step: f64) -> f64 {
        let sign = self.signs[self.cursor];
        self.cursor = (self.cursor + 1) % self.signs.len();
        sign * step
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_random_only_draws_plus_or_minus_step() {
        let mut source = RandomFluctuation::seeded(7);
        for _ in 0..200 {
            let f = source.next_fluctuation(5.0);
            assert!(f == 5.0 || f == -5.0);
        }
    }

    #[test]
    fn test_same_seed_same_sequence() {
        let mut a = RandomFluctuation::seeded(42);
        let mut b = RandomFluctuation::seeded(42);
        let seq_a: Vec<f64> = (0..50).map(|_| a.next_fluctuation(5.0)).collect();
        let seq_b: Vec<f64> = (0..50).map(|_| b.next_fluctuation(5.0)).collect();
        assert_eq!(seq_a, seq_b);
    }

    #[test]
    fn test_random_is_roughly_fair() {
        let mut source = RandomFluctuation::seeded(1234);
        let ups = (0..10_000)
            .filter(|_| source.next_fluctuation(1.0) > 0.0)
            .count();
        assert!(ups > 4_500 && ups < 5_500, "ups = {}", ups);
    }

    #[test]
    fn test_scripted_cycles() {
        let mut source = ScriptedFluctuation::new(vec![5.0, -5.0]);
        assert_eq!(source.next_fluctuation(5.0), 5.0);
        assert_eq!(source.next_fluctuation(5.0), -5.0);
        assert_eq!(source.next_fluctuation(5.0), 5.0);
    }

    #[test]
    fn test_scripted_uses_sign_only() {
        let mut source = ScriptedFluctuation::new(vec![-1.0]);
        assert_eq!(source.next_fluctuation(5.0), -5.0);
    }
}
