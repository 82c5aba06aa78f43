//! Array metadata bundles
//!
//! Each observing array ships one YAML file with array-wide global
//! attributes and a per-file override table:
//!
//! ```yaml
//! metadata:
//!   title: SAMBA transport time series
//!   weblink: https://example.org/samba
//! files:
//!   Upper_Abyssal_Transport_Anomalies.txt:
//!     variable_mapping:
//!       Upper-cell volume transport anomaly (relative to record-length average of 17.3 Sv) [Sv]: UPPER_TRANSPORT
//!     variables:
//!       UPPER_TRANSPORT:
//!         units: Sv
//!     acknowledgement: SAMBA data were collected ...
//! ```
//!
//! Loading is behind the `MetadataSource` trait so the standardiser can be
//! driven from files on disk or from bundles built in memory.

use crate::{drop_null_attrs, AttributeBag, Error, Result};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::debug;

/// Metadata for a whole observing array
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ArrayMetadata {
    /// Array-wide global attributes
    #[serde(default)]
    pub metadata: AttributeBag,

    /// File-specific sections keyed by source file name
    #[serde(default)]
    pub files: IndexMap<String, FileMetadata>,
}

/// File-specific metadata section
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FileMetadata {
    /// Old variable name → new variable name
    #[serde(default)]
    pub variable_mapping: IndexMap<String, String>,

    /// Attributes to attach per (renamed) variable
    #[serde(default)]
    pub variables: IndexMap<String, AttributeBag>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub acknowledgement: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data_product: Option<String>,
}

impl ArrayMetadata {
    /// Parse a bundle from YAML text
    ///
    /// Keys left empty in the file are dropped with a warning.
    pub fn from_yaml_str(content: &str) -> Result<Self> {
        let mut bundle: Self = serde_yaml::from_str(content)?;
        drop_null_attrs(&mut bundle.metadata, "metadata");
        for (file_name, section) in bundle.files.iter_mut() {
            for (variable, attrs) in section.variables.iter_mut() {
                drop_null_attrs(attrs, &format!("{}/{}", file_name, variable));
            }
        }
        Ok(bundle)
    }

    /// Look up the section for one source file
    pub fn file(&self, file_name: &str) -> Option<&FileMetadata> {
        self.files.get(file_name)
    }
}

/// Configuration collaborator that supplies array metadata bundles
pub trait MetadataSource {
    /// Load the bundle for `array_name`
    ///
    /// Returns `Error::UnknownArray` when no bundle exists.
    fn load_array_metadata(&self, array_name: &str) -> Result<ArrayMetadata>;
}

/// Loads `<dir>/<array>_array.yml` files from a metadata directory
#[derive(Debug, Clone)]
pub struct YamlMetadataStore {
    dir: PathBuf,
}

impl YamlMetadataStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Path of the bundle file for an array (name is lower-cased)
    pub fn path_for(&self, array_name: &str) -> PathBuf {
        self.dir
            .join(format!("{}_array.yml", array_name.to_lowercase()))
    }
}

impl MetadataSource for YamlMetadataStore {
    fn load_array_metadata(&self, array_name: &str) -> Result<ArrayMetadata> {
        let path = self.path_for(array_name);
        if !path.is_file() {
            return Err(Error::UnknownArray(array_name.to_string()));
        }

        debug!(array = array_name, path = %path.display(), "Loading array metadata");
        let content = std::fs::read_to_string(&path)?;
        ArrayMetadata::from_yaml_str(&content)
    }
}

/// Bundles held in memory, keyed by lower-cased array name
#[derive(Debug, Clone, Default)]
pub struct InMemoryMetadata {
    bundles: IndexMap<String, ArrayMetadata>,
}

impl InMemoryMetadata {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a bundle (builder style)
    pub fn with_array(mut self, array_name: &str, bundle: ArrayMetadata) -> Self {
        self.insert(array_name, bundle);
        self
    }

    pub fn insert(&mut self, array_name: &str, bundle: ArrayMetadata) {
        self.bundles.insert(array_name.to_lowercase(), bundle);
    }
}

impl MetadataSource for InMemoryMetadata {
    fn load_array_metadata(&self, array_name: &str) -> Result<ArrayMetadata> {
        self.bundles
            .get(&array_name.to_lowercase())
            .cloned()
            .ok_or_else(|| Error::UnknownArray(array_name.to_string()))
    }
}
