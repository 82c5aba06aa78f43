//! Attribute alias resolution
//!
//! Folds raw attribute keys onto canonical names. Keys are matched
//! case-insensitively against the preferred-key table; keys without an
//! entry fall back to their own lower-cased form. `featureType` is the one
//! key that keeps its exact spelling.
//!
//! Resolution is first-write-wins: a later write to an already-seen
//! canonical key never changes the resolved bag. Later writes with a
//! different value are kept aside as collisions so the duplicate merger can
//! settle them.

use amoc_common::{AttributeBag, AttributeValue};
use indexmap::IndexMap;
use once_cell::sync::Lazy;
use tracing::debug;

/// Key exempt from case folding
pub const FEATURE_TYPE_KEY: &str = "featureType";

/// Preferred-key table: lower-cased alias → canonical key
///
/// Every canonical key is a fixed point of `canonical_key`.
pub static PREFERRED_KEYS: Lazy<IndexMap<&'static str, &'static str>> = Lazy::new(|| {
    IndexMap::from([
        // Free-text description
        ("title", "summary"),
        ("description", "summary"),
        ("abstract", "summary"),
        // Creators
        ("creator", "creator_name"),
        ("creators", "creator_name"),
        ("author", "creator_name"),
        ("authors", "creator_name"),
        ("email", "creator_email"),
        ("author_email", "creator_email"),
        // Principal investigator
        ("pi", "principal_investigator"),
        ("pi_name", "principal_investigator"),
        ("principal_investigator_name", "principal_investigator"),
        ("pi_email", "principal_investigator_email"),
        // Publisher / contributors
        ("publisher", "publisher_name"),
        ("contributor", "contributor_name"),
        ("contributors", "contributor_name"),
        ("contributor_emails", "contributor_email"),
        // Institutions
        ("institution_name", "institution"),
        ("institutions", "institution"),
        // Miscellaneous spellings
        ("acknowledgment", "acknowledgement"),
        ("acknowledgements", "acknowledgement"),
        ("licence", "license"),
        ("conventions", "Conventions"),
        ("featuretype", FEATURE_TYPE_KEY),
        ("start_date", "time_coverage_start"),
        ("time_coverage_begin", "time_coverage_start"),
        ("end_date", "time_coverage_end"),
        ("keywords_vocab", "keywords_vocabulary"),
        ("web_link", "weblink"),
        ("website", "weblink"),
    ])
});

/// Canonical form of a raw attribute key
pub fn canonical_key(key: &str) -> String {
    if key == FEATURE_TYPE_KEY {
        return key.to_string();
    }
    let lower = key.to_lowercase();
    match PREFERRED_KEYS.get(lower.as_str()) {
        Some(canonical) => (*canonical).to_string(),
        None => lower,
    }
}

/// Ordered sequence of attribute writes
///
/// Unlike a map, a key may appear several times (one write per source
/// layer), which is what the merge stage needs to see.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AttributeLayers {
    writes: Vec<(String, AttributeValue)>,
}

impl AttributeLayers {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append one write
    pub fn push(&mut self, key: impl Into<String>, value: impl Into<AttributeValue>) {
        self.writes.push((key.into(), value.into()));
    }

    /// Append every entry of a bag, in its order
    pub fn extend_from_bag(&mut self, bag: &AttributeBag) {
        self.writes
            .extend(bag.iter().map(|(k, v)| (k.clone(), v.clone())));
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &AttributeValue)> {
        self.writes.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn len(&self) -> usize {
        self.writes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.writes.is_empty()
    }
}

impl From<&AttributeBag> for AttributeLayers {
    fn from(bag: &AttributeBag) -> Self {
        let mut layers = Self::new();
        layers.extend_from_bag(bag);
        layers
    }
}

impl<K: Into<String>, V: Into<AttributeValue>> FromIterator<(K, V)> for AttributeLayers {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            writes: iter
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }
}

/// A later write that disagreed with the first-seen value
#[derive(Debug, Clone, PartialEq)]
pub struct Collision {
    pub canonical: String,
    pub original_key: String,
    pub value: AttributeValue,
}

/// Output of alias resolution
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AliasResolution {
    /// First-write-wins bag, unique canonical keys
    pub bag: AttributeBag,
    /// Canonical key → original key it was first read from (diagnostics only)
    pub provenance: IndexMap<String, String>,
    /// Conflicting later writes, in input order
    pub collisions: Vec<Collision>,
}

/// Folds raw keys onto canonical keys
#[derive(Debug, Clone, Copy, Default)]
pub struct AttributeAliasResolver;

impl AttributeAliasResolver {
    pub fn new() -> Self {
        Self
    }

    /// Resolve an ordered sequence of writes
    pub fn resolve(&self, layers: &AttributeLayers) -> AliasResolution {
        let mut resolution = AliasResolution::default();

        for (key, value) in layers.iter() {
            let canonical = canonical_key(key);

            match resolution.bag.get(&canonical) {
                None => {
                    if canonical != key {
                        debug!(key, canonical = %canonical, "Folded alias onto canonical key");
                    }
                    resolution.provenance.insert(canonical.clone(), key.to_string());
                    resolution.bag.insert(canonical, value.clone());
                }
                Some(existing) if existing == value => {
                    debug!(key, canonical = %canonical, "Dropped identical duplicate");
                }
                Some(_) => {
                    debug!(
                        key,
                        canonical = %canonical,
                        first_from = resolution.provenance.get(&canonical).map(String::as_str).unwrap_or(""),
                        "Conflicting duplicate deferred to merge"
                    );
                    resolution.collisions.push(Collision {
                        canonical,
                        original_key: key.to_string(),
                        value: value.clone(),
                    });
                }
            }
        }

        resolution
    }

    /// Resolve a bag directly, discarding collisions
    pub fn resolve_bag(&self, bag: &AttributeBag) -> AttributeBag {
        self.resolve(&AttributeLayers::from(bag)).bag
    }
}
