/// Uniform "roll an n-sided die" primitive used by every spawn decision.

use std::time::{SystemTime, UNIX_EPOCH};

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

pub trait Dice {
    /// A value in `[0, max)`, computed as `floor(u * max)` for a uniform
    /// `u` in `[0, 1)`.  `roll(0)` is always 0.
    fn roll(&mut self, max: u32) -> i32;
}

impl<R: Rng + ?Sized> Dice for R {
    fn roll(&mut self, max: u32) -> i32 {
        let u: f64 = self.gen();
        (u * f64::from(max)) as i32
    }
}

/// Seed derived from the wall clock, in whole seconds.
pub fn time_seed() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or(0)
}

/// The session's generator.  Seeded once; never reseeded.
pub fn session_rng(seed: u64) -> StdRng {
    StdRng::seed_from_u64(seed)
}
