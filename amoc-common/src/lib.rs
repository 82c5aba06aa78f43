//! # AMOC Common Library
//!
//! Shared code for the AMOC array tooling including:
//! - Attribute data model (ordered attribute bags and values)
//! - Array metadata bundles and their configuration loaders
//! - Metadata directory resolution
//! - Logging setup
//! - Common error type

pub mod attrs;
pub mod config;
pub mod error;
pub mod logging;
pub mod metadata;

pub use attrs::{drop_null_attrs, split_multi, AttributeBag, AttributeValue};
pub use error::{Error, Result};
pub use metadata::{ArrayMetadata, FileMetadata, MetadataSource};
