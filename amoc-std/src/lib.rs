//! amoc-std library interface
//!
//! Metadata standardisation for AMOC mooring-array datasets. Raw reader
//! attributes, array-wide YAML metadata and file-specific overrides are
//! folded into one canonical attribute set:
//!
//! alias resolution → duplicate merge → contributor consolidation →
//! institution consolidation → write-back onto the dataset.

pub mod aliases;
pub mod contributors;
pub mod dataset;
pub mod export;
pub mod institutions;
pub mod merger;
pub mod standardise;

pub use crate::aliases::{AliasResolution, AttributeAliasResolver, AttributeLayers};
pub use crate::contributors::{ContributorConsolidator, ContributorSummary};
pub use crate::dataset::{Dataset, Variable};
pub use crate::institutions::InstitutionConsolidator;
pub use crate::merger::{DuplicateMerger, MergeStats};
pub use crate::standardise::{MetadataStandardizer, WritePolicy};
