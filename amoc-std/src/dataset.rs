//! In-memory dataset model
//!
//! The metadata side of a gridded dataset as handed over by a reader:
//! global attributes, dimension sizes and variables with their own
//! attributes. Array values are not carried; persistence belongs to the
//! writer.

use crate::standardise::WritePolicy;
use crate::contributors::{CONTRIBUTOR_EMAIL, CONTRIBUTOR_NAME, CONTRIBUTOR_ROLE};
use amoc_common::{drop_null_attrs, AttributeBag, AttributeValue};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

/// Global attribute recording which file a dataset was read from
pub const SOURCE_FILE: &str = "source_file";

/// Attributes that only make sense together; written all or none
const CONTRIBUTOR_GROUP: [&str; 3] = [CONTRIBUTOR_NAME, CONTRIBUTOR_ROLE, CONTRIBUTOR_EMAIL];

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Variable {
    /// Dimension names, outermost first
    #[serde(default)]
    pub dims: Vec<String>,

    #[serde(default)]
    pub attrs: AttributeBag,
}

impl Variable {
    pub fn new(dims: &[&str]) -> Self {
        Self {
            dims: dims.iter().map(|d| d.to_string()).collect(),
            attrs: AttributeBag::new(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Dataset {
    #[serde(default)]
    pub attrs: AttributeBag,

    /// Dimension name → length
    #[serde(default)]
    pub dims: IndexMap<String, usize>,

    #[serde(default)]
    pub variables: IndexMap<String, Variable>,
}

impl Dataset {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a JSON-serialised dataset, dropping null attributes
    pub fn from_json_str(content: &str) -> amoc_common::Result<Self> {
        let mut dataset: Self = serde_json::from_str(content)?;
        drop_null_attrs(&mut dataset.attrs, "global");
        for (name, variable) in dataset.variables.iter_mut() {
            drop_null_attrs(&mut variable.attrs, name);
        }
        Ok(dataset)
    }

    /// Recorded source file, if any
    pub fn source_file(&self) -> Option<String> {
        self.attrs.get(SOURCE_FILE).map(AttributeValue::render)
    }

    /// Rename variables and dimensions
    ///
    /// A name can refer to a variable, a dimension, or both (a coordinate).
    /// Unknown names are skipped; a rename onto an existing name is refused.
    /// Returns how many renames were applied.
    pub fn rename(&mut self, mapping: &IndexMap<String, String>) -> usize {
        let mut applied = 0;

        for (old, new) in mapping {
            if old == new {
                continue;
            }

            let is_variable = self.variables.contains_key(old);
            let is_dimension = self.dims.contains_key(old);
            if !is_variable && !is_dimension {
                debug!(old = %old, new = %new, "Rename skipped, name not in dataset");
                continue;
            }
            if (is_variable && self.variables.contains_key(new))
                || (is_dimension && self.dims.contains_key(new))
            {
                warn!(old = %old, new = %new, "Rename skipped, target name already exists");
                continue;
            }

            if is_variable {
                self.variables = rename_key(std::mem::take(&mut self.variables), old, new);
            }
            if is_dimension {
                self.dims = rename_key(std::mem::take(&mut self.dims), old, new);
                for variable in self.variables.values_mut() {
                    for dim in variable.dims.iter_mut().filter(|d| d.as_str() == old.as_str()) {
                        *dim = new.clone();
                    }
                }
            }

            debug!(old = %old, new = %new, "Renamed");
            applied += 1;
        }

        applied
    }

    /// Merge per-variable attributes onto existing variables
    ///
    /// Returns how many variables were updated.
    pub fn apply_variable_attrs(&mut self, variables: &IndexMap<String, AttributeBag>) -> usize {
        let mut updated = 0;
        for (name, attrs) in variables {
            match self.variables.get_mut(name) {
                Some(variable) => {
                    variable
                        .attrs
                        .extend(attrs.iter().map(|(k, v)| (k.clone(), v.clone())));
                    updated += 1;
                }
                None => debug!(variable = %name, "Variable attributes skipped, no such variable"),
            }
        }
        updated
    }

    /// Write a consolidated attribute set onto the dataset
    pub fn write_attrs(&mut self, attrs: AttributeBag, policy: WritePolicy) {
        match policy {
            WritePolicy::Replace => self.attrs = attrs,
            WritePolicy::PreserveExisting => {
                let keep_contributors = CONTRIBUTOR_GROUP.iter().any(|k| self.attrs.contains_key(*k));
                if keep_contributors && CONTRIBUTOR_GROUP.iter().any(|k| attrs.contains_key(*k)) {
                    warn!("Dataset already has contributor attributes, consolidated contributors not written");
                }

                for (key, value) in attrs {
                    if keep_contributors && CONTRIBUTOR_GROUP.contains(&key.as_str()) {
                        continue;
                    }
                    if self.attrs.contains_key(&key) {
                        debug!(key = %key, "Existing attribute preserved");
                    } else {
                        self.attrs.insert(key, value);
                    }
                }
            }
        }
    }
}

fn rename_key<V>(map: IndexMap<String, V>, old: &str, new: &str) -> IndexMap<String, V> {
    map.into_iter()
        .map(|(k, v)| if k == old { (new.to_string(), v) } else { (k, v) })
        .collect()
}
