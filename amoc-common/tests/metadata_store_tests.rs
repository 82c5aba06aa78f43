//! Integration tests for the YAML metadata store

use amoc_common::metadata::YamlMetadataStore;
use amoc_common::{AttributeValue, Error, MetadataSource};
use std::fs;
use tempfile::TempDir;

fn write_bundle(dir: &TempDir, array: &str, content: &str) {
    fs::write(dir.path().join(format!("{}_array.yml", array)), content).unwrap();
}

#[test]
fn test_load_bundle_from_directory() {
    let dir = TempDir::new().unwrap();
    write_bundle(
        &dir,
        "move",
        r#"
metadata:
  title: MOVE 16N
  institution: SIO; NOAA
files:
  OS_MOVE_TRANSPORTS.nc:
    data_product: Transport time series
"#,
    );

    let store = YamlMetadataStore::new(dir.path());
    let bundle = store.load_array_metadata("move").unwrap();

    assert_eq!(bundle.metadata["title"], AttributeValue::from("MOVE 16N"));
    assert_eq!(
        bundle.file("OS_MOVE_TRANSPORTS.nc").unwrap().data_product.as_deref(),
        Some("Transport time series")
    );
}

#[test]
fn test_array_name_is_lower_cased() {
    let dir = TempDir::new().unwrap();
    write_bundle(&dir, "osnap", "metadata:\n  title: OSNAP\n");

    let store = YamlMetadataStore::new(dir.path());
    assert!(store.load_array_metadata("OSNAP").is_ok());
}

#[test]
fn test_missing_bundle_is_unknown_array() {
    let dir = TempDir::new().unwrap();
    let store = YamlMetadataStore::new(dir.path());

    let err = store.load_array_metadata("atlantis").unwrap_err();
    assert!(matches!(err, Error::UnknownArray(ref name) if name == "atlantis"));
}

#[test]
fn test_malformed_bundle_is_yaml_error() {
    let dir = TempDir::new().unwrap();
    write_bundle(&dir, "rapid", "metadata: [this is: not, a map");

    let store = YamlMetadataStore::new(dir.path());
    let err = store.load_array_metadata("rapid").unwrap_err();
    assert!(matches!(err, Error::Yaml(_)));
}

#[test]
fn test_empty_sections_default() {
    let dir = TempDir::new().unwrap();
    write_bundle(&dir, "samba", "metadata:\n  weblink: https://example.org\n");

    let bundle = YamlMetadataStore::new(dir.path())
        .load_array_metadata("samba")
        .unwrap();
    assert!(bundle.files.is_empty());
    assert!(bundle.file("anything.txt").is_none());
}

#[test]
fn test_empty_keys_and_numeric_lists_load() {
    let dir = TempDir::new().unwrap();
    write_bundle(
        &dir,
        "rapid",
        r#"
metadata:
  title: RAPID
  comment:
  qc_applied: true
files:
  moc_transports.nc:
    variables:
      MOC:
        units: Sv
        valid_range: [-50, 50]
        flag_values: [0, 1]
        comment:
"#,
    );

    let bundle = YamlMetadataStore::new(dir.path()).load_array_metadata("rapid").unwrap();

    assert!(!bundle.metadata.contains_key("comment"));
    assert_eq!(bundle.metadata["qc_applied"], AttributeValue::Bool(true));
    let moc = &bundle.file("moc_transports.nc").unwrap().variables["MOC"];
    assert_eq!(
        moc["valid_range"],
        AttributeValue::List(vec![AttributeValue::Integer(-50), AttributeValue::Integer(50)])
    );
    assert_eq!(moc["flag_values"].render(), "0, 1");
    assert!(!moc.contains_key("comment"));
}
