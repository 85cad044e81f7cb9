//! Roulette Core — weighted random selection ("roulette wheel" sampling).
//!
//! Each stored value owns a slice of the cumulative weight axis. A roll draws
//! a point in `[0, total)` from a pluggable random source and binary-searches
//! for the slice that owns it, so a value is picked with probability
//! proportional to its weight.
//!
//! - [`rng`]: the [`RandomSource`] capability, `rand`-backed and scripted
//!   sources, and BLAKE3 seed derivation for repeated trials
//! - [`range`]: [`WeightedRange`] and point classification
//! - [`roulette`]: the [`Roulette`] container (insert, remove, update, roll)
//! - [`config`]: TOML roulette definitions
//!
//! ```
//! use roulette_core::{Roulette, ScriptedSource};
//!
//! let mut roulette = Roulette::with_source(ScriptedSource::constant(4.0));
//! roulette.insert("A", 5.0).unwrap();
//! roulette.insert("B", 2.0).unwrap();
//! roulette.insert("C", 2.0).unwrap();
//! roulette.update(&"A", 3.0).unwrap();
//! assert_eq!(roulette.roll(), Ok(&"B"));
//! ```

pub mod config;
pub mod error;
pub mod range;
pub mod rng;
pub mod roulette;

pub use config::{ConfigError, EntryConfig, RouletteConfig};
pub use error::RouletteError;
pub use range::{Placement, WeightedRange};
pub use rng::{random_range, RandomSource, RngSource, ScriptedSource, SeedHierarchy};
pub use roulette::{IntoIter, Iter, Roulette};
