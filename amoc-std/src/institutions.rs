//! Institution consolidation
//!
//! Merges `institution`, `publisher_institution` and
//! `contributor_institution` (matched case-insensitively) into one
//! `contributing_institutions` attribute, de-duplicated in first-seen order.

use amoc_common::{split_multi, AttributeBag, AttributeValue};
use indexmap::IndexSet;
use tracing::debug;

pub const CONTRIBUTING_INSTITUTIONS: &str = "contributing_institutions";

/// Placeholder attributes set alongside `contributing_institutions`
pub const INSTITUTION_PLACEHOLDERS: &[&str] = &[
    "contributing_institutions_vocabulary",
    "contributing_institutions_role",
    "contributing_institutions_role_vocabulary",
];

const INSTITUTION_KEYS: &[&str] = &["institution", "publisher_institution", "contributor_institution"];

fn is_institution_key(key: &str) -> bool {
    INSTITUTION_KEYS
        .iter()
        .any(|candidate| candidate.eq_ignore_ascii_case(key))
}

#[derive(Debug, Clone, Copy, Default)]
pub struct InstitutionConsolidator;

impl InstitutionConsolidator {
    pub fn new() -> Self {
        Self
    }

    /// Consolidate institutions in place; returns the number of distinct institutions
    pub fn consolidate(&self, bag: &mut AttributeBag) -> usize {
        let keys: Vec<String> = bag
            .keys()
            .filter(|k| is_institution_key(k))
            .cloned()
            .collect();

        let mut institutions: IndexSet<String> = IndexSet::new();
        for key in keys {
            if let Some(value) = bag.shift_remove(&key) {
                for institution in split_multi(&value) {
                    if !institutions.insert(institution.clone()) {
                        debug!(key = %key, institution = %institution, "Duplicate institution dropped");
                    }
                }
            }
        }

        if institutions.is_empty() {
            return 0;
        }

        let joined = institutions.iter().map(String::as_str).collect::<Vec<_>>().join(", ");
        bag.insert(CONTRIBUTING_INSTITUTIONS.to_string(), AttributeValue::Text(joined));
        for placeholder in INSTITUTION_PLACEHOLDERS {
            bag.entry(placeholder.to_string())
                .or_insert_with(|| AttributeValue::Text(String::new()));
        }

        institutions.len()
    }
}
