//! Attribute export
//!
//! Dumps global and per-variable attributes of a dataset as YAML, for
//! reviewing what standardisation produced.

use crate::dataset::Dataset;
use amoc_common::{AttributeBag, Result};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::info;

pub const DEFAULT_EXPORT_FILE: &str = "attributes.yaml";

/// Global and variable attributes of one dataset
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AttributeExport {
    pub global_attributes: AttributeBag,
    pub variables: IndexMap<String, AttributeBag>,
}

/// Collect all attributes, preserving dataset order
pub fn collect_attributes(dataset: &Dataset) -> AttributeExport {
    AttributeExport {
        global_attributes: dataset.attrs.clone(),
        variables: dataset
            .variables
            .iter()
            .map(|(name, variable)| (name.clone(), variable.attrs.clone()))
            .collect(),
    }
}

/// Collect attributes and, when `output_dir` is given, write them to YAML
///
/// The directory is created if needed.
pub fn export_attributes_to_yaml(
    dataset: &Dataset,
    output_dir: Option<&Path>,
    file_name: &str,
) -> Result<AttributeExport> {
    let export = collect_attributes(dataset);

    if let Some(dir) = output_dir {
        std::fs::create_dir_all(dir)?;
        let path = dir.join(file_name);
        let yaml = serde_yaml::to_string(&export)?;
        std::fs::write(&path, yaml)?;
        info!(path = %path.display(), "Attributes exported");
    }

    Ok(export)
}
