//! Transaction reference numbers.
//!
//! A reference is 8 lower-case hex characters derived from 4 random bytes.
//! Collisions are rare but possible; the storage layer retries with a fresh
//! reference when the unique constraint fires.

use rand::RngCore;

/// Length of a reference number in characters.
pub const REFERENCE_LEN: usize = 8;

/// A short random token identifying a transaction for display purposes.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Reference(String);

impl Reference {
    /// Generates a fresh random reference number.
    #[must_use]
    pub fn generate() -> Self {
        let mut bytes = [0u8; REFERENCE_LEN / 2];
        rand::thread_rng().fill_bytes(&mut bytes);

        let mut out = String::with_capacity(REFERENCE_LEN);
        for byte in bytes {
            use std::fmt::Write;
            let _ = write!(out, "{byte:02x}");
        }
        Self(out)
    }

    /// Returns the reference as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Returns true if the string looks like a reference number.
    #[must_use]
    pub fn is_valid_format(s: &str) -> bool {
        s.len() == REFERENCE_LEN && s.chars().all(|c| c.is_ascii_hexdigit())
    }
}

impl std::fmt::Display for Reference {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<Reference> for String {
    fn from(r: Reference) -> Self {
        r.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generate_format() {
        let r = Reference::generate();
        assert_eq!(r.as_str().len(), REFERENCE_LEN);
        assert!(Reference::is_valid_format(r.as_str()));
        assert!(r.as_str().chars().all(|c| c.is_ascii_lowercase() || c.is_ascii_digit()));
    }

    #[test]
    fn test_generate_varies() {
        // 32 bits of randomness: 100 draws colliding would indicate a broken RNG.
        let refs: std::collections::HashSet<String> =
            (0..100).map(|_| Reference::generate().into()).collect();
        assert!(refs.len() > 90);
    }

    #[test]
    fn test_is_valid_format() {
        assert!(Reference::is_valid_format("0a1b2c3d"));
        assert!(!Reference::is_valid_format("0a1b2c"));
        assert!(!Reference::is_valid_format("0a1b2c3z"));
        assert!(!Reference::is_valid_format("0a1b2c3d4e"));
    }
}
