use crate::config::Config;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// A pipe pair: a top segment of height `top_h`, a gap, and a bottom
/// segment down to the ground.
#[derive(Debug, Clone, PartialEq)]
pub struct Pipe {
    pub x: f64,
    pub top_h: f64,
    /// Set once the bird has cleared the pipe; guards against double scoring.
    pub passed: bool,
}

/// Creates pipes at the right edge of the field with a random gap position.
pub struct Spawner {
    rng: StdRng,
    min_top: f64,
    max_top: f64,
}

impl Spawner {
    pub fn new(config: &Config) -> Self {
        let rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        Self {
            rng,
            min_top: config.min_top,
            max_top: config.max_top(),
        }
    }

    pub fn seeded(config: &Config, seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
            min_top: config.min_top,
            max_top: config.max_top(),
        }
    }

    /// Inclusive lower and exclusive upper bound for `top_h`.
    fn top_range(&self) -> (f64, f64) {
        (self.min_top, self.max_top)
    }

    pub fn spawn_pipe(&mut self, field_width: f64) -> Pipe {
        let (lo, hi) = self.top_range();
        let top_h = if hi > lo { self.rng.gen_range(lo..hi) } else { lo };
        Pipe {
            x: field_width,
            top_h,
            passed: false,
        }
    }
}
