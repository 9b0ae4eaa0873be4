//! Fuzzy trim matching.
//!
//! A trim string is resolved to a multiplier by running an ordered chain of
//! matchers; the first matcher that returns a value wins:
//!
//! 1. [`ExactMatch`] - case-sensitive equality with a table entry.
//! 2. [`SubstringMatch`] - case-insensitive containment in either direction.
//! 3. [`KeywordMatch`] - performance/luxury keywords with fixed multipliers.

use crate::adjustments::AdjustmentTable;

/// One tier of the trim matching policy.
pub trait TrimMatcher: Send + Sync {
    fn name(&self) -> &'static str;

    /// Multiplier for `trim`, or None to defer to the next tier.
    fn matches(&self, trim: &str, table: &AdjustmentTable) -> Option<f64>;
}

pub struct ExactMatch;

impl TrimMatcher for ExactMatch {
    fn name(&self) -> &'static str {
        "exact"
    }

    fn matches(&self, trim: &str, table: &AdjustmentTable) -> Option<f64> {
        table.get(trim)
    }
}

/// Case-insensitive substring match in either direction.
///
/// Several entries can match one trim ("M Sport" contains both "M" and
/// "Sport"). Entries contained in the trim are preferred, longest first.
/// Only when none exist are entries that contain the trim considered,
/// shortest first. Equal lengths keep table order.
pub struct SubstringMatch;

impl TrimMatcher for SubstringMatch {
    fn name(&self) -> &'static str {
        "substring"
    }

    fn matches(&self, trim: &str, table: &AdjustmentTable) -> Option<f64> {
        let wanted = trim.to_lowercase();
        if wanted.is_empty() {
            return None;
        }

        let mut contained: Option<(usize, f64)> = None;
        let mut containing: Option<(usize, f64)> = None;

        for entry in table {
            let key = entry.name.to_lowercase();
            let len = key.chars().count();

            if wanted.contains(&key) {
                if contained.map_or(true, |(best, _)| len > best) {
                    contained = Some((len, entry.multiplier));
                }
            } else if key.contains(&wanted) && containing.map_or(true, |(best, _)| len < best) {
                containing = Some((len, entry.multiplier));
            }
        }

        contained.or(containing).map(|(_, multiplier)| multiplier)
    }
}

/// Last-resort keyword scan, tiers checked in order.
pub struct KeywordMatch {
    tiers: Vec<(Vec<String>, f64)>,
}

impl KeywordMatch {
    pub fn new(tiers: Vec<(Vec<String>, f64)>) -> Self {
        Self { tiers }
    }
}

impl Default for KeywordMatch {
    fn default() -> Self {
        let words = |list: &[&str]| list.iter().map(|w| w.to_string()).collect::<Vec<_>>();
        Self::new(vec![
            (
                words(&["amg", "m sport", "rs", "type r", "gt", "sport"]),
                1.3,
            ),
            (
                words(&["premium", "luxury", "elite", "platinum", "limited"]),
                1.2,
            ),
        ])
    }
}

impl TrimMatcher for KeywordMatch {
    fn name(&self) -> &'static str {
        "keyword"
    }

    fn matches(&self, trim: &str, _table: &AdjustmentTable) -> Option<f64> {
        let wanted = trim.to_lowercase();
        self.tiers
            .iter()
            .find(|(keywords, _)| keywords.iter().any(|k| wanted.contains(k.as_str())))
            .map(|(_, multiplier)| *multiplier)
    }
}

/// Ordered matcher tiers, first match wins.
pub struct TrimMatcherChain {
    matchers: Vec<Box<dyn TrimMatcher>>,
}

impl TrimMatcherChain {
    pub fn new(matchers: Vec<Box<dyn TrimMatcher>>) -> Self {
        Self { matchers }
    }

    /// Returns the winning tier name alongside the multiplier.
    pub fn resolve(&self, trim: &str, table: &AdjustmentTable) -> Option<(&'static str, f64)> {
        self.matchers
            .iter()
            .find_map(|m| m.matches(trim, table).map(|value| (m.name(), value)))
    }
}

impl Default for TrimMatcherChain {
    fn default() -> Self {
        Self::new(vec![
            Box::new(ExactMatch),
            Box::new(SubstringMatch),
            Box::new(KeywordMatch::default()),
        ])
    }
}
