//! Core deterministic primitives.
//!
//! Seeded randomness and record digests. Everything a tournament replay
//! depends on lives here.

pub mod hash;
pub mod rng;

// Re-export core types
pub use hash::{compute_match_digest, RecordDigest, RecordHasher};
pub use rng::DeterministicRng;
