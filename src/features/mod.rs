//! Features Module - Feature Derivation Engine
//!
//! Turns one raw reading plus a timestamp into the canonical, ordered
//! feature vector consumed by the model. Shared verbatim by the batch
//! training pipeline and the live inference path.

pub mod layout;
pub mod vector;
pub mod physical;
pub mod temporal;
pub mod reading;
pub mod assemble;

#[cfg(test)]
mod tests;

// Re-export common types
pub use layout::{FEATURE_COUNT, FEATURE_LAYOUT, FEATURE_VERSION, SchemaMismatchError};
pub use vector::FeatureVector;
pub use reading::{EnvReading, InvalidReadingError, RawReading};
pub use assemble::assemble;
