//! Metadata standardisation orchestrator
//!
//! Applies an array's YAML metadata to one dataset read from one source
//! file:
//!
//! 1. Check the dataset really came from `file_name`
//! 2. Load the array bundle and the file's section
//! 3. Rename variables and attach per-variable attributes
//! 4. Layer global attributes: dataset → array-wide → derived
//!    `summary`/`weblink` → file `acknowledgement`/`data_product`
//! 5. Alias resolution → duplicate merge → contributors → institutions
//! 6. Write the result back under the configured write policy

use crate::aliases::{AttributeAliasResolver, AttributeLayers};
use crate::contributors::ContributorConsolidator;
use crate::dataset::{Dataset, SOURCE_FILE};
use crate::institutions::InstitutionConsolidator;
use crate::merger::DuplicateMerger;
use amoc_common::{ArrayMetadata, AttributeBag, AttributeValue, Error, FileMetadata, MetadataSource, Result};
use tracing::{debug, info, warn};

/// How consolidated attributes are written onto the dataset
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum WritePolicy {
    /// Add new keys, never overwrite keys the dataset already has
    #[default]
    PreserveExisting,
    /// Replace the dataset's attributes wholesale
    Replace,
}

/// Standardises datasets against array metadata from a `MetadataSource`
pub struct MetadataStandardizer<S: MetadataSource> {
    source: S,
    policy: WritePolicy,
    resolver: AttributeAliasResolver,
    merger: DuplicateMerger,
    contributors: ContributorConsolidator,
    institutions: InstitutionConsolidator,
}

impl<S: MetadataSource> MetadataStandardizer<S> {
    pub fn new(source: S) -> Self {
        Self {
            source,
            policy: WritePolicy::default(),
            resolver: AttributeAliasResolver::new(),
            merger: DuplicateMerger::new(),
            contributors: ContributorConsolidator::new(),
            institutions: InstitutionConsolidator::new(),
        }
    }

    pub fn with_write_policy(mut self, policy: WritePolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn write_policy(&self) -> WritePolicy {
        self.policy
    }

    /// Standardise `dataset`, read from `file_name`, against `array_name` metadata
    ///
    /// Fails with `Error::SourceMismatch` or `Error::UnknownArray` before
    /// touching the dataset.
    pub fn standardise(&self, dataset: &mut Dataset, file_name: &str, array_name: &str) -> Result<()> {
        check_source_file(dataset, file_name)?;

        let meta = self.source.load_array_metadata(array_name)?;
        let file_meta = match meta.file(file_name) {
            Some(section) => section.clone(),
            None => {
                warn!(array = array_name, file = file_name, "No file-specific metadata, using array-wide only");
                FileMetadata::default()
            }
        };

        let renamed = dataset.rename(&file_meta.variable_mapping);
        let enriched = dataset.apply_variable_attrs(&file_meta.variables);
        debug!(renamed, enriched, "Variables standardised");

        let layers = build_layers(&dataset.attrs, &meta, &file_meta);
        let attrs = self.consolidate(&layers);

        dataset.write_attrs(attrs, self.policy);
        dataset
            .attrs
            .entry(SOURCE_FILE.to_string())
            .or_insert_with(|| AttributeValue::from(file_name));

        info!(
            array = array_name,
            file = file_name,
            attributes = dataset.attrs.len(),
            "Dataset standardised"
        );
        Ok(())
    }

    /// Run the consolidation stages over layered attribute writes
    pub fn consolidate(&self, layers: &AttributeLayers) -> AttributeBag {
        let resolution = self.resolver.resolve(layers);
        let (mut bag, stats) = self.merger.merge(resolution);
        debug!(
            replaced = stats.replaced,
            kept = stats.kept,
            skipped = stats.skipped,
            "Duplicates merged"
        );

        let contributors = self.contributors.consolidate(&mut bag);
        debug!(
            case = ?contributors.case,
            contributors = contributors.contributors,
            emails_missing = contributors.emails_missing,
            emails_dropped = contributors.emails_dropped,
            "Contributors consolidated"
        );

        let institutions = self.institutions.consolidate(&mut bag);
        debug!(institutions, "Institutions consolidated");

        bag
    }
}

fn check_source_file(dataset: &Dataset, file_name: &str) -> Result<()> {
    match dataset.source_file() {
        Some(found) if found != file_name => Err(Error::SourceMismatch {
            expected: file_name.to_string(),
            found,
        }),
        _ => Ok(()),
    }
}

/// Attribute writes in precedence order
pub fn build_layers(existing: &AttributeBag, meta: &ArrayMetadata, file_meta: &FileMetadata) -> AttributeLayers {
    let mut layers = AttributeLayers::from(existing);
    layers.extend_from_bag(&meta.metadata);

    let derived = |key: &str| {
        meta.metadata
            .get(key)
            .cloned()
            .unwrap_or_else(|| AttributeValue::Text(String::new()))
    };
    layers.push("summary", derived("description"));
    layers.push("weblink", derived("weblink"));

    if let Some(ack) = &file_meta.acknowledgement {
        layers.push("acknowledgement", ack.as_str());
    }
    if let Some(product) = &file_meta.data_product {
        layers.push("data_product", product.as_str());
    }

    layers
}
