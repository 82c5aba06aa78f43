//! Duplicate merging
//!
//! Settles canonical keys that were written more than once. The rule is a
//! plain heuristic with no knowledge of key semantics:
//!
//! 1. Identical values: keep the existing one.
//! 2. Different values: keep the longer rendered string.
//! 3. Equal length, different values: keep the existing (earlier) one.

use crate::aliases::AliasResolution;
use amoc_common::{AttributeBag, AttributeValue};
use tracing::debug;

/// Outcome of a single merge decision
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MergeDecision {
    /// Key was not present yet
    Inserted,
    /// Incoming value identical to existing
    Skipped,
    /// Existing value longer or same length
    Kept,
    /// Incoming value longer, replaced existing
    Replaced,
}

/// Counts of merge decisions for one run
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MergeStats {
    pub inserted: usize,
    pub skipped: usize,
    pub kept: usize,
    pub replaced: usize,
}

impl MergeStats {
    fn record(&mut self, decision: MergeDecision) {
        match decision {
            MergeDecision::Inserted => self.inserted += 1,
            MergeDecision::Skipped => self.skipped += 1,
            MergeDecision::Kept => self.kept += 1,
            MergeDecision::Replaced => self.replaced += 1,
        }
    }
}

/// Length-based duplicate resolver
#[derive(Debug, Clone, Copy, Default)]
pub struct DuplicateMerger;

impl DuplicateMerger {
    pub fn new() -> Self {
        Self
    }

    /// Apply one write to `bag` under the length rule
    pub fn merge_value(&self, bag: &mut AttributeBag, key: &str, incoming: AttributeValue) -> MergeDecision {
        let Some(existing) = bag.get_mut(key) else {
            bag.insert(key.to_string(), incoming);
            return MergeDecision::Inserted;
        };

        if *existing == incoming {
            debug!(key, "Duplicate identical, skipped");
            return MergeDecision::Skipped;
        }

        let existing_len = existing.rendered_len();
        let incoming_len = incoming.rendered_len();
        if incoming_len > existing_len {
            debug!(
                key,
                old = %existing,
                new = %incoming,
                "Duplicate conflict, replaced with longer value"
            );
            *existing = incoming;
            MergeDecision::Replaced
        } else {
            debug!(
                key,
                kept = %existing,
                dropped = %incoming,
                "Duplicate conflict, kept existing value"
            );
            MergeDecision::Kept
        }
    }

    /// Settle the collisions left by alias resolution
    pub fn merge(&self, resolution: AliasResolution) -> (AttributeBag, MergeStats) {
        let AliasResolution { mut bag, collisions, .. } = resolution;
        let mut stats = MergeStats::default();

        for collision in collisions {
            let decision = self.merge_value(&mut bag, &collision.canonical, collision.value);
            stats.record(decision);
        }

        (bag, stats)
    }

    /// Merge one already-cleaned bag over another
    ///
    /// Two-pass variant: each source is alias-resolved on its own, then the
    /// results are combined here key by key.
    pub fn merge_into(&self, base: &mut AttributeBag, incoming: &AttributeBag) -> MergeStats {
        let mut stats = MergeStats::default();
        for (key, value) in incoming {
            let decision = self.merge_value(base, key, value.clone());
            stats.record(decision);
        }
        stats
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::aliases::{AttributeAliasResolver, AttributeLayers};

    fn bag(entries: &[(&str, &str)]) -> AttributeBag {
        entries
            .iter()
            .map(|(k, v)| (k.to_string(), AttributeValue::from(*v)))
            .collect()
    }

    #[test]
    fn test_longer_value_replaces() {
        let mut b = bag(&[("summary", "Short")]);
        let decision = DuplicateMerger::new().merge_value(&mut b, "summary", "Much longer".into());
        assert_eq!(decision, MergeDecision::Replaced);
        assert_eq!(b["summary"], AttributeValue::from("Much longer"));
    }

    #[test]
    fn test_shorter_value_dropped() {
        let mut b = bag(&[("summary", "Much longer")]);
        let decision = DuplicateMerger::new().merge_value(&mut b, "summary", "Short".into());
        assert_eq!(decision, MergeDecision::Kept);
        assert_eq!(b["summary"], AttributeValue::from("Much longer"));
    }

    #[test]
    fn test_tie_keeps_existing() {
        let mut b = bag(&[("platform", "mooring")]);
        let decision = DuplicateMerger::new().merge_value(&mut b, "platform", "buoyage".into());
        assert_eq!(decision, MergeDecision::Kept);
        assert_eq!(b["platform"], AttributeValue::from("mooring"));
    }

    #[test]
    fn test_identical_skipped() {
        let mut b = bag(&[("platform", "mooring")]);
        let decision = DuplicateMerger::new().merge_value(&mut b, "platform", "mooring".into());
        assert_eq!(decision, MergeDecision::Skipped);
    }

    #[test]
    fn test_numbers_compare_by_rendered_length() {
        let mut b = AttributeBag::new();
        b.insert("year".into(), AttributeValue::Integer(24));
        let decision = DuplicateMerger::new().merge_value(&mut b, "year", AttributeValue::Integer(2024));
        assert_eq!(decision, MergeDecision::Replaced);
        assert_eq!(b["year"], AttributeValue::Integer(2024));
    }

    #[test]
    fn test_merge_settles_alias_collisions() {
        let layers: AttributeLayers = [("title", "Short"), ("Title", "A much longer description")]
            .into_iter()
            .collect();
        let resolution = AttributeAliasResolver::new().resolve(&layers);
        let (merged, stats) = DuplicateMerger::new().merge(resolution);

        assert_eq!(merged["summary"], AttributeValue::from("A much longer description"));
        assert_eq!(stats.replaced, 1);
    }

    #[test]
    fn test_merge_into_two_pass() {
        let mut base = bag(&[("summary", "Array default"), ("weblink", "https://a")]);
        let incoming = bag(&[("summary", "File"), ("data_product", "Transports")]);
        let stats = DuplicateMerger::new().merge_into(&mut base, &incoming);

        assert_eq!(base["summary"], AttributeValue::from("Array default"));
        assert_eq!(base["data_product"], AttributeValue::from("Transports"));
        assert_eq!(stats, MergeStats { inserted: 1, skipped: 0, kept: 1, replaced: 0 });
    }
}
