//! Record Hashing for Replay Verification
//!
//! Provides deterministic digests of played innings and matches so that
//! a tournament replayed from the same seed can be checked ball for ball.

use sha2::{Digest, Sha256};

/// Digest output type (256 bits / 32 bytes)
pub type RecordDigest = [u8; 32];

/// Deterministic hasher for match records.
///
/// Wraps SHA-256 with helpers for the integer and string fields that make
/// up a scorecard. Order of updates is critical for determinism.
pub struct RecordHasher {
    hasher: Sha256,
}

impl RecordHasher {
    /// Create a new hasher with domain separator.
    pub fn new(domain: &[u8]) -> Self {
        let mut hasher = Sha256::new();
        hasher.update(domain);
        Self { hasher }
    }

    /// Create hasher for a single innings.
    pub fn for_innings() -> Self {
        Self::new(b"MINI_CRICKET_INNINGS_V1")
    }

    /// Create hasher for a whole match.
    pub fn for_match() -> Self {
        Self::new(b"MINI_CRICKET_MATCH_V1")
    }

    /// Update with a u8 value.
    #[inline]
    pub fn update_u8(&mut self, value: u8) {
        self.hasher.update([value]);
    }

    /// Update with a u16 value (little-endian).
    #[inline]
    pub fn update_u16(&mut self, value: u16) {
        self.hasher.update(value.to_le_bytes());
    }

    /// Update with a u32 value (little-endian).
    #[inline]
    pub fn update_u32(&mut self, value: u32) {
        self.hasher.update(value.to_le_bytes());
    }

    /// Update with a u64 value (little-endian).
    #[inline]
    pub fn update_u64(&mut self, value: u64) {
        self.hasher.update(value.to_le_bytes());
    }

    /// Update with a boolean.
    #[inline]
    pub fn update_bool(&mut self, value: bool) {
        self.update_u8(value as u8);
    }

    /// Update with a length-prefixed string.
    pub fn update_str(&mut self, value: &str) {
        self.update_u32(value.len() as u32);
        self.hasher.update(value.as_bytes());
    }

    /// Update with a nested digest.
    #[inline]
    pub fn update_digest(&mut self, digest: &RecordDigest) {
        self.hasher.update(digest);
    }

    /// Finalize and return the digest.
    pub fn finalize(self) -> RecordDigest {
        self.hasher.finalize().into()
    }
}

/// Compute the digest of a match record.
///
/// The seed always goes in first; the closure adds the match-specific data.
pub fn compute_match_digest<F>(rng_seed: u64, add_record: F) -> RecordDigest
where
    F: FnOnce(&mut RecordHasher),
{
    let mut hasher = RecordHasher::for_match();
    hasher.update_u64(rng_seed);
    add_record(&mut hasher);
    hasher.finalize()
}

// =============================================================================
// TESTS
// =============================================================================
