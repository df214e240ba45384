//! Blob identifier generation
//!
//! Identifiers double as the unguessable suffix of a blob's public URL, so
//! they are drawn from a cryptographically secure RNG. 16 base62 characters
//! give roughly 95 bits of entropy.

use rand::distributions::Alphanumeric;
use rand::Rng;

/// Length of every generated identifier.
pub const IDENT_LEN: usize = 16;

/// Generate a fresh random blob identifier.
pub fn generate() -> String {
    rand::thread_rng()
        .sample_iter(&Alphanumeric)
        .take(IDENT_LEN)
        .map(char::from)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_length_and_charset() {
        for _ in 0..100 {
            let id = generate();
            assert_eq!(id.len(), IDENT_LEN);
            assert!(id.chars().all(|c| c.is_ascii_alphanumeric()));
        }
    }

    #[test]
    fn test_no_collisions_in_large_sample() {
        let ids: HashSet<String> = (0..10_000).map(|_| generate()).collect();
        assert_eq!(ids.len(), 10_000);
    }
}
