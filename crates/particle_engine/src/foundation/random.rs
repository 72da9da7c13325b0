//! Seeded random sampling
//!
//! `MathRandom` is an explicit random source that callers own and thread
//! through zone sampling and emitter code. A seeded source follows the
//! linear-congruential recurrence
//!
//! ```text
//! seed = (seed * 9301 + 49297) mod 233280
//! out  = seed / 233280
//! ```
//!
//! and therefore replays the same sequence for the same seed. An unseeded
//! source draws from the thread-local entropy generator instead.

use rand::Rng;

const LCG_MULTIPLIER: u64 = 9301;
const LCG_INCREMENT: u64 = 49297;
const LCG_MODULUS: u64 = 233_280;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Source {
    Seeded(u64),
    Entropy,
}

/// Random source with reseed support
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MathRandom {
    source: Source,
}

impl MathRandom {
    /// Create a deterministic source starting from `seed`
    pub fn seeded(seed: u32) -> Self {
        Self {
            source: Source::Seeded(u64::from(seed)),
        }
    }

    /// Create a non-deterministic source
    pub fn unseeded() -> Self {
        Self {
            source: Source::Entropy,
        }
    }

    /// Reseed the source; `None` switches to the non-deterministic fallback
    pub fn set_seed(&mut self, seed: Option<u32>) {
        self.source = seed.map_or(Source::Entropy, |seed| Source::Seeded(u64::from(seed)));
    }

    /// Whether this source replays a fixed sequence
    pub fn is_seeded(&self) -> bool {
        matches!(self.source, Source::Seeded(_))
    }

    /// Next value in `[0, 1)`
    #[allow(clippy::cast_precision_loss)]
    pub fn random(&mut self) -> f64 {
        match &mut self.source {
            Source::Seeded(seed) => {
                *seed = (*seed * LCG_MULTIPLIER + LCG_INCREMENT) % LCG_MODULUS;
                *seed as f64 / LCG_MODULUS as f64
            }
            Source::Entropy => rand::thread_rng().gen::<f64>(),
        }
    }

    /// Next value in `[0, 1)` narrowed to `f32` for vector math
    #[allow(clippy::cast_possible_truncation)]
    pub fn random_f32(&mut self) -> f32 {
        // Narrowing can round values just below 1.0 up to 1.0
        (self.random() as f32).min(1.0 - f32::EPSILON)
    }

    /// Sample `[a, b)`; with `int` set the scaled offset is truncated toward zero
    pub fn random_a_to_b(&mut self, a: f64, b: f64, int: bool) -> f64 {
        let offset = self.random() * (b - a);
        if int {
            offset.trunc() + a
        } else {
            a + offset
        }
    }

    /// Sample `[center - spread, center + spread)`
    pub fn random_floating(&mut self, center: f64, spread: f64, int: bool) -> f64 {
        self.random_a_to_b(center - spread, center + spread, int)
    }

    /// Random `#rrggbb` color string
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    pub fn random_color(&mut self) -> String {
        let value = (self.random() * f64::from(0x0100_0000_u32)) as u32;
        format!("#{value:06x}")
    }
}

impl Default for MathRandom {
    fn default() -> Self {
        Self::unseeded()
    }
}
