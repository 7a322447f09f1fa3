//! Deterministic string hashing.
//!
//! The standard library hasher is randomly seeded per process, which would make the seeds
//! derived in [`crate::random`] differ between runs. `xxh3` is stable across processes and
//! platforms.

use xxhash_rust::xxh3::xxh3_64;

/// A convenience method to compute the hash of a `&str`.
#[must_use]
pub fn hash_str(data: &str) -> u64 {
    xxh3_64(data.as_bytes())
}
