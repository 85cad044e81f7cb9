//! Random sources for the roulette.
//!
//! The container never hard-codes a generator. It asks a [`RandomSource`] for
//! a point in `[0, total)` and maps that point to a range. Three sources ship
//! with the crate:
//!
//! - [`RngSource`] adapts any `rand` generator. `RngSource::from_entropy()` is
//!   the default, `RngSource::seeded(seed)` is reproducible.
//! - [`ScriptedSource`] replays a fixed list of values, for tests that need to
//!   land on an exact point.
//! - [`SeedHierarchy`] is not a source itself; it derives independent seeds
//!   for repeated trials from one master seed.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::error::RouletteError;

/// A capability producing uniformly distributed values in `[min, max)`.
pub trait RandomSource {
    /// Draw one value from `[min, max)`.
    ///
    /// Fails with [`RouletteError::InvalidRange`] when `min >= max` or either
    /// bound is not finite.
    fn sample(&mut self, min: f64, max: f64) -> Result<f64, RouletteError>;
}

impl<S: RandomSource + ?Sized> RandomSource for &mut S {
    fn sample(&mut self, min: f64, max: f64) -> Result<f64, RouletteError> {
        (**self).sample(min, max)
    }
}

pub(crate) fn check_interval(min: f64, max: f64) -> Result<(), RouletteError> {
    if !min.is_finite() || !max.is_finite() || min >= max {
        return Err(RouletteError::InvalidRange { min, max });
    }
    Ok(())
}

/// Adapter turning a `rand` generator into a [`RandomSource`].
#[derive(Debug, Clone)]
pub struct RngSource<R = StdRng> {
    rng: R,
}

impl RngSource<StdRng> {
    /// Generator seeded from the operating system. This is the default source.
    pub fn from_entropy() -> Self {
        Self::new(StdRng::from_entropy())
    }

    /// Deterministic generator: the same seed yields the same sequence.
    pub fn seeded(seed: u64) -> Self {
        Self::new(StdRng::seed_from_u64(seed))
    }
}

impl<R: Rng> RngSource<R> {
    pub fn new(rng: R) -> Self {
        Self { rng }
    }

    pub fn into_inner(self) -> R {
        self.rng
    }
}

impl Default for RngSource<StdRng> {
    fn default() -> Self {
        Self::from_entropy()
    }
}

impl<R: Rng> RandomSource for RngSource<R> {
    fn sample(&mut self, min: f64, max: f64) -> Result<f64, RouletteError> {
        check_interval(min, max)?;
        Ok(self.rng.gen_range(min..max))
    }
}

/// Replays a fixed script of values, cycling when it runs out.
///
/// Values are returned as written, even when they fall outside the requested
/// interval; that is what lets a test aim at a range boundary. An empty
/// script always answers `min`.
#[derive(Debug, Clone, Default)]
pub struct ScriptedSource {
    values: Vec<f64>,
    cursor: usize,
}

impl ScriptedSource {
    pub fn new(values: impl IntoIterator<Item = f64>) -> Self {
        Self {
            values: values.into_iter().collect(),
            cursor: 0,
        }
    }

    /// A source that always returns `value`.
    pub fn constant(value: f64) -> Self {
        Self::new([value])
    }

    /// Number of samples drawn so far.
    pub fn draws(&self) -> usize {
        self.cursor
    }
}

impl RandomSource for ScriptedSource {
    fn sample(&mut self, min: f64, max: f64) -> Result<f64, RouletteError> {
        check_interval(min, max)?;
        if self.values.is_empty() {
            return Ok(min);
        }
        let value = self.values[self.cursor % self.values.len()];
        self.cursor += 1;
        Ok(value)
    }
}

/// Draw a single value from `[min, max)` using `source`.
///
/// Module-level counterpart of [`RandomSource::sample`], backing the CLI's
/// `random-range` command.
pub fn random_range<S: RandomSource>(
    source: &mut S,
    min: f64,
    max: f64,
) -> Result<f64, RouletteError> {
    source.sample(min, max)
}

/// Deterministic seed hierarchy.
///
/// A master seed is expanded into per-`(label, trial)` sub-seeds with BLAKE3.
/// Derivation is hash-based rather than sequential, so a sub-seed depends only
/// on its inputs and never on the order in which other sub-seeds were taken.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SeedHierarchy {
    master_seed: u64,
}

impl SeedHierarchy {
    pub fn new(master_seed: u64) -> Self {
        Self { master_seed }
    }

    pub fn master_seed(&self) -> u64 {
        self.master_seed
    }

    pub fn sub_seed(&self, label: &str, trial: u64) -> u64 {
        let mut hasher = blake3::Hasher::new();
        hasher.update(&self.master_seed.to_le_bytes());
        hasher.update(label.as_bytes());
        hasher.update(&trial.to_le_bytes());
        let hash = hasher.finalize();
        let mut prefix = [0u8; 8];
        prefix.copy_from_slice(&hash.as_bytes()[..8]);
        u64::from_le_bytes(prefix)
    }

    /// Seeded source for one `(label, trial)` pair.
    pub fn source_for(&self, label: &str, trial: u64) -> RngSource<StdRng> {
        RngSource::seeded(self.sub_seed(label, trial))
    }
}
