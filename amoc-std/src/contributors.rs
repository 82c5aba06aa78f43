//! Contributor consolidation
//!
//! Collapses the role-bearing name attributes (`creator_name`,
//! `principal_investigator`, `publisher_name`, `contributor_name`) and every
//! `*_email` attribute into three aligned, comma-joined attributes:
//! `contributor_name`, `contributor_role` and `contributor_email`. The i-th
//! segment of each describes the same person.
//!
//! Emails are paired with names by bucket: names read from `creator_name`
//! take emails from `creator_email` in order. A bucket that runs dry gives
//! empty emails to the remaining names; emails nobody claims are dropped.

use amoc_common::{split_multi, AttributeBag, AttributeValue};
use indexmap::IndexMap;
use std::collections::VecDeque;
use tracing::debug;

pub const CONTRIBUTOR_NAME: &str = "contributor_name";
pub const CONTRIBUTOR_ROLE: &str = "contributor_role";
pub const CONTRIBUTOR_EMAIL: &str = "contributor_email";

const EMAIL_SUFFIX: &str = "_email";
const NAME_SUFFIX: &str = "_name";
const JOIN: &str = ", ";

/// Role map: name-bearing key → role label, in registration order
///
/// The order decides the order of consolidated contributors.
pub const ROLE_MAP: &[(&str, &str)] = &[
    ("creator_name", "creator"),
    ("principal_investigator", "PI"),
    ("publisher_name", "publisher"),
    ("contributor_name", ""),
];

/// Role label for a name-bearing key
pub fn role_for(key: &str) -> Option<&'static str> {
    ROLE_MAP
        .iter()
        .find(|(name_key, _)| *name_key == key)
        .map(|(_, role)| *role)
}

/// Email bucket key matching a name-bearing key
///
/// `creator_name` → `creator_email`, `principal_investigator` →
/// `principal_investigator_email`.
pub fn email_key_for(name_key: &str) -> String {
    let base = name_key.strip_suffix(NAME_SUFFIX).unwrap_or(name_key);
    format!("{}{}", base, EMAIL_SUFFIX)
}

/// Role for an email bucket with no names (`creator_email` → `creator`)
fn role_for_bucket(bucket_key: &str) -> &'static str {
    let base = bucket_key.strip_suffix(EMAIL_SUFFIX).unwrap_or(bucket_key);
    role_for(base)
        .or_else(|| role_for(&format!("{}{}", base, NAME_SUFFIX)))
        .unwrap_or("")
}

/// Which branch the consolidator took
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContributorCase {
    /// At least one name was found
    Named,
    /// No names, emails only; names are empty placeholders
    EmailOnly,
    /// Nothing to consolidate
    Absent,
}

/// What one consolidation run did
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ContributorSummary {
    pub case: ContributorCase,
    pub contributors: usize,
    /// Names that found an email in their bucket
    pub emails_matched: usize,
    /// Names whose bucket was empty or exhausted
    pub emails_missing: usize,
    /// Bucket emails no name claimed
    pub emails_dropped: usize,
}

impl ContributorSummary {
    fn absent() -> Self {
        Self {
            case: ContributorCase::Absent,
            contributors: 0,
            emails_matched: 0,
            emails_missing: 0,
            emails_dropped: 0,
        }
    }
}

/// Aligns names, roles and emails into parallel attributes
#[derive(Debug, Clone, Copy, Default)]
pub struct ContributorConsolidator;

impl ContributorConsolidator {
    pub fn new() -> Self {
        Self
    }

    /// Consolidate contributors in place
    pub fn consolidate(&self, bag: &mut AttributeBag) -> ContributorSummary {
        // Step 1: email buckets, in first-seen order
        let mut buckets = extract_email_buckets(bag);

        // Step 2: names in role-map order
        let mut names: Vec<String> = Vec::new();
        let mut roles: Vec<&'static str> = Vec::new();
        let mut sources: Vec<&'static str> = Vec::new();
        for &(key, role) in ROLE_MAP {
            if let Some(value) = bag.shift_remove(key) {
                for name in split_multi(&value) {
                    names.push(name);
                    roles.push(role);
                    sources.push(key);
                }
            }
        }

        if !names.is_empty() {
            self.consolidate_named(bag, names, roles, &sources, &mut buckets)
        } else if buckets.values().any(|emails| !emails.is_empty()) {
            self.consolidate_email_only(bag, buckets)
        } else {
            ContributorSummary::absent()
        }
    }

    /// Case A: names present
    fn consolidate_named(
        &self,
        bag: &mut AttributeBag,
        names: Vec<String>,
        roles: Vec<&'static str>,
        sources: &[&'static str],
        buckets: &mut IndexMap<String, VecDeque<String>>,
    ) -> ContributorSummary {
        let mut emails: Vec<String> = Vec::with_capacity(sources.len());
        let mut emails_matched = 0;

        for (name, source) in names.iter().zip(sources) {
            let bucket_key = email_key_for(source);
            match buckets.get_mut(&bucket_key).and_then(VecDeque::pop_front) {
                Some(email) => {
                    debug!(name = %name, email = %email, bucket = %bucket_key, "Paired contributor email");
                    emails_matched += 1;
                    emails.push(email);
                }
                None => {
                    debug!(name = %name, bucket = %bucket_key, "No email left for contributor");
                    emails.push(String::new());
                }
            }
        }

        let emails_dropped: usize = buckets.values().map(VecDeque::len).sum();
        if emails_dropped > 0 {
            debug!(count = emails_dropped, "Dropped unclaimed contributor emails");
        }

        debug_assert_eq!(names.len(), roles.len());
        debug_assert_eq!(names.len(), emails.len());

        let contributors = names.len();
        bag.insert(CONTRIBUTOR_NAME.to_string(), AttributeValue::Text(names.join(JOIN)));
        if bag.contains_key(CONTRIBUTOR_ROLE) {
            debug!("Explicit contributor_role kept");
        } else {
            bag.insert(CONTRIBUTOR_ROLE.to_string(), AttributeValue::Text(roles.join(JOIN)));
        }
        bag.insert(CONTRIBUTOR_EMAIL.to_string(), AttributeValue::Text(emails.join(JOIN)));

        ContributorSummary {
            case: ContributorCase::Named,
            contributors,
            emails_matched,
            emails_missing: contributors - emails_matched,
            emails_dropped,
        }
    }

    /// Case B: no names, only email buckets
    fn consolidate_email_only(
        &self,
        bag: &mut AttributeBag,
        buckets: IndexMap<String, VecDeque<String>>,
    ) -> ContributorSummary {
        let mut names: Vec<&str> = Vec::new();
        let mut roles: Vec<&str> = Vec::new();
        let mut emails: Vec<String> = Vec::new();

        for (bucket_key, bucket) in buckets {
            let role = role_for_bucket(&bucket_key);
            for email in bucket {
                names.push("");
                roles.push(role);
                emails.push(email);
            }
        }

        debug_assert_eq!(names.len(), roles.len());
        debug_assert_eq!(names.len(), emails.len());

        let contributors = emails.len();
        bag.insert(CONTRIBUTOR_NAME.to_string(), AttributeValue::Text(names.join(JOIN)));
        bag.insert(CONTRIBUTOR_ROLE.to_string(), AttributeValue::Text(roles.join(JOIN)));
        bag.insert(CONTRIBUTOR_EMAIL.to_string(), AttributeValue::Text(emails.join(JOIN)));

        ContributorSummary {
            case: ContributorCase::EmailOnly,
            contributors,
            emails_matched: contributors,
            emails_missing: 0,
            emails_dropped: 0,
        }
    }
}

/// Remove every `*_email` attribute and split it into a FIFO bucket
fn extract_email_buckets(bag: &mut AttributeBag) -> IndexMap<String, VecDeque<String>> {
    let keys: Vec<String> = bag
        .keys()
        .filter(|k| k.ends_with(EMAIL_SUFFIX))
        .cloned()
        .collect();

    let mut buckets = IndexMap::new();
    for key in keys {
        if let Some(value) = bag.shift_remove(&key) {
            buckets.insert(key, split_multi(&value).into_iter().collect::<VecDeque<_>>());
        }
    }
    buckets
}
