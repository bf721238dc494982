//! Copyright © 2025-2026 Wenze Wei. All Rights Reserved.
//!
//! This file is part of Zilog.
//! The Zilog project belongs to the Dunimd project team.

use std::fs;

use zilog::{
    Result, ZiCCapability, ZiCNullWriter, ZiCPluginCatalog, ZiCPluginDescriptor,
    ZiCPluginInstance, ZiCPluginRegistry, ZiCPropertyReader, ZiCServiceSource, ZiError,
};

fn null_factory(_reader: &ZiCPropertyReader<'_>) -> Result<ZiCPluginInstance> {
    Ok(ZiCPluginInstance::Writer(Box::new(ZiCNullWriter)))
}

fn custom_writer(name: &str, identifier: &str) -> ZiCPluginDescriptor {
    ZiCPluginDescriptor::ZiFNew(ZiCCapability::Writer, name, identifier, null_factory)
}

#[test]
fn test_global_registry_lists_builtin_plugins() {
    let registry = ZiCPluginRegistry::ZiFGlobal().unwrap();
    assert_eq!(registry.ZiFNames(ZiCCapability::Writer), vec!["null", "rollingfile"]);
    assert_eq!(
        registry.ZiFNames(ZiCCapability::Labeler),
        vec!["count", "pid", "timestamp"]
    );
    assert_eq!(
        registry.ZiFNames(ZiCCapability::Policy),
        vec!["count", "interval", "size", "startup"]
    );
    assert_eq!(registry.len(), 9);
}

#[test]
fn test_global_registry_is_shared() {
    let first = ZiCPluginRegistry::ZiFGlobal().unwrap();
    let second = ZiCPluginRegistry::ZiFGlobal().unwrap();
    assert!(std::sync::Arc::ptr_eq(&first, &second));
}

#[test]
fn test_same_name_under_different_capabilities() {
    let registry = ZiCPluginRegistry::ZiFGlobal().unwrap();
    let labeler = registry.ZiFResolve(ZiCCapability::Labeler, "count").unwrap();
    let policy = registry.ZiFResolve(ZiCCapability::Policy, "count").unwrap();
    assert_ne!(labeler.identifier, policy.identifier);
}

#[test]
fn test_resolve_unknown_name() {
    let registry = ZiCPluginRegistry::ZiFGlobal().unwrap();
    let err = registry.ZiFResolve(ZiCCapability::Writer, "console").unwrap_err();
    assert!(matches!(
        err,
        ZiError::UnknownPlugin { capability: ZiCCapability::Writer, ref name, .. } if name == "console"
    ));
}

#[test]
fn test_duplicate_name_fails_load() {
    let mut catalog = ZiCPluginCatalog::ZiFNew();
    catalog.ZiFInsert(custom_writer("file", "tests::FirstFileWriter"));
    catalog.ZiFInsert(custom_writer("file", "tests::SecondFileWriter"));
    let source = ZiCServiceSource::ZiFParse(
        "inline",
        ZiCCapability::Writer,
        "tests::FirstFileWriter\ntests::SecondFileWriter\n",
    );
    let err = ZiCPluginRegistry::ZiFLoad(&catalog, &[source]).unwrap_err();
    assert_eq!(
        err,
        ZiError::DuplicatePlugin {
            capability: ZiCCapability::Writer,
            name: "file".to_string(),
        }
    );
}

#[test]
fn test_unknown_identifier_fails_load() {
    let catalog = ZiCPluginCatalog::ZiFBuiltin();
    let source = ZiCServiceSource::ZiFParse("inline", ZiCCapability::Writer, "tests::Missing");
    let err = ZiCPluginRegistry::ZiFLoad(&catalog, &[source]).unwrap_err();
    assert!(matches!(err, ZiError::Registry { ref origin, .. } if origin == "inline"));
}

#[test]
fn test_service_sources_from_directory() {
    let dir = tempfile::tempdir().unwrap();
    fs::write(
        dir.path().join("zilog.writers"),
        "zilog::writers::ZiCNullWriter\n",
    )
    .unwrap();
    fs::write(
        dir.path().join("zilog.labelers"),
        "# only counting\nzilog::labelers::ZiCCountLabeler\n",
    )
    .unwrap();

    let sources = ZiCServiceSource::ZiFLoadDirectory(dir.path()).unwrap();
    let registry = ZiCPluginRegistry::ZiFLoad(&ZiCPluginCatalog::ZiFBuiltin(), &sources).unwrap();

    assert_eq!(registry.len(), 2);
    assert!(registry.ZiFLookup(ZiCCapability::Writer, "null").is_some());
    assert!(registry.ZiFLookup(ZiCCapability::Writer, "rollingfile").is_none());
    assert!(registry.ZiFLookup(ZiCCapability::Labeler, "count").is_some());
}
