//! The set of currency codes the ledger accepts.
//!
//! Codes are reference data loaded from storage at request time; the set
//! itself performs only membership checks.

use std::collections::BTreeSet;

/// A set of valid ISO 4217 currency codes.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CurrencySet {
    codes: BTreeSet<String>,
}

impl CurrencySet {
    /// Creates an empty currency set.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns true if the given code is a known currency.
    ///
    /// Codes are matched case-sensitively; the store holds upper-case codes.
    #[must_use]
    pub fn contains(&self, code: &str) -> bool {
        self.codes.contains(code)
    }

    /// Returns the number of known currencies.
    #[must_use]
    pub fn len(&self) -> usize {
        self.codes.len()
    }

    /// Returns true if no currencies are known.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.codes.is_empty()
    }

    /// Iterates over the codes in sorted order.
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.codes.iter().map(String::as_str)
    }
}

impl<S: Into<String>> FromIterator<S> for CurrencySet {
    fn from_iter<T: IntoIterator<Item = S>>(iter: T) -> Self {
        Self {
            codes: iter.into_iter().map(Into::into).collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_contains() {
        let set: CurrencySet = ["USD", "EUR", "GBP"].into_iter().collect();
        assert!(set.contains("USD"));
        assert!(set.contains("EUR"));
        assert!(!set.contains("XXX"));
        assert!(!set.contains("usd"));
    }

    #[test]
    fn test_empty() {
        let set = CurrencySet::new();
        assert!(set.is_empty());
        assert!(!set.contains("USD"));
    }

    #[test]
    fn test_iter_sorted() {
        let set: CurrencySet = ["NGN", "EUR", "USD"].into_iter().collect();
        let codes: Vec<&str> = set.iter().collect();
        assert_eq!(codes, vec!["EUR", "NGN", "USD"]);
    }
}
