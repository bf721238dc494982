//! Copyright © 2025-2026 Wenze Wei. All Rights Reserved.
//!
//! This file is part of Zilog.
//! The Zilog project belongs to the Dunimd project team.

use std::fs;
use std::sync::Arc;

use zilog::{
    ZiCAssemblyOptions, ZiCConfigurationAssembler, ZiCConfigurator, ZiCPluginRegistry,
    ZiCRawConfiguration, ZiError,
};

fn registry() -> Arc<ZiCPluginRegistry> {
    ZiCPluginRegistry::ZiFGlobal().unwrap()
}

#[test]
fn test_writers_follow_index_order() {
    let registry = registry();
    let raw = ZiCRawConfiguration::ZiFNew()
        .ZiFWith("tinylog.writer2", "rollingfile: second.log")
        .ZiFWith("tinylog.writer", "null");
    let configuration = ZiCConfigurationAssembler::ZiFNew(&registry)
        .ZiFAssemble(&raw)
        .unwrap();

    let names: Vec<&str> = configuration.writers.iter().map(|w| w.ZiFName()).collect();
    assert_eq!(names, vec!["null", "rollingfile"]);
    assert_eq!(configuration.writers[1].key, "tinylog.writer2");
}

#[test]
fn test_gap_in_writer_indices() {
    let registry = registry();
    let raw = ZiCRawConfiguration::ZiFNew()
        .ZiFWith("tinylog.writer", "null")
        .ZiFWith("tinylog.writer3", "null");
    let err = ZiCConfigurationAssembler::ZiFNew(&registry)
        .ZiFAssemble(&raw)
        .unwrap_err();
    assert!(matches!(err, ZiError::Assembly { ref message } if message.contains("tinylog.writer3")));
}

#[test]
fn test_no_writers_is_valid() {
    let registry = registry();
    let raw = ZiCRawConfiguration::ZiFNew().ZiFWith("tinylog.level", "debug");
    let configuration = ZiCConfigurationAssembler::ZiFNew(&registry)
        .ZiFAssemble(&raw)
        .unwrap();
    assert!(configuration.writers.is_empty());
    assert_eq!(configuration.extras.len(), 1);
}

#[test]
fn test_custom_prefix_and_facility() {
    let registry = registry();
    let options = ZiCAssemblyOptions {
        prefix: "app.logging".to_string(),
        writer_facility: "sink".to_string(),
    };
    let raw = ZiCRawConfiguration::ZiFFromProperties(
        "app.logging.sink = null\napp.logging.sink2 = rollingfile: out.log\ntinylog.writer = null\n",
    );
    let configuration = ZiCConfigurationAssembler::ZiFWithOptions(&registry, options)
        .ZiFAssemble(&raw)
        .unwrap();
    assert_eq!(configuration.writers.len(), 2);
    assert_eq!(configuration.extras.ZiFGet("tinylog.writer"), Some("null"));
}

#[test]
fn test_assembly_from_json_document() {
    let registry = registry();
    let raw = ZiCRawConfiguration::ZiFFromJson(&serde_json::json!({
        "tinylog": {
            "writer": "rollingfile",
            "writer.file": "app.log",
            "writer.policy": "count: 100"
        }
    }))
    .unwrap();
    let configuration = ZiCConfigurationAssembler::ZiFNew(&registry)
        .ZiFAssemble(&raw)
        .unwrap();
    let policy = configuration.writers[0].ZiFNested("policy").unwrap();
    assert_eq!(policy.ZiFName(), "count");
}

#[test]
fn test_configurator_dispatches_to_every_writer() {
    let dir = tempfile::tempdir().unwrap();
    let first = dir.path().join("first.log");
    let second = dir.path().join("second.log");
    let raw = ZiCRawConfiguration::ZiFNew()
        .ZiFWith("tinylog.writer", format!("rollingfile: {}", first.display()))
        .ZiFWith("tinylog.writer2", format!("rollingfile: {}", second.display()));

    let configurator = ZiCConfigurator::ZiFFromRaw(&raw).unwrap();
    configurator.ZiFWrite("hello").unwrap();
    configurator.ZiFFlush().unwrap();

    assert_eq!(fs::read_to_string(&first).unwrap(), "hello\n");
    assert_eq!(fs::read_to_string(&second).unwrap(), "hello\n");
}

#[test]
fn test_reconfigure_swaps_writers() {
    let dir = tempfile::tempdir().unwrap();
    let old = dir.path().join("old.log");
    let new = dir.path().join("new.log");
    let configurator = ZiCConfigurator::ZiFFromRaw(
        &ZiCRawConfiguration::ZiFNew()
            .ZiFWith("tinylog.writer", format!("rollingfile: {}", old.display())),
    )
    .unwrap();
    configurator.ZiFWrite("before").unwrap();

    configurator
        .ZiFReconfigure(
            &ZiCRawConfiguration::ZiFNew()
                .ZiFWith("tinylog.writer", format!("rollingfile: {}", new.display())),
        )
        .unwrap();
    configurator.ZiFWrite("after").unwrap();

    assert_eq!(fs::read_to_string(&old).unwrap(), "before\n");
    assert_eq!(fs::read_to_string(&new).unwrap(), "after\n");
}

#[test]
fn test_failed_reconfigure_keeps_current_writers() {
    let configurator = ZiCConfigurator::ZiFFromRaw(
        &ZiCRawConfiguration::ZiFNew().ZiFWith("tinylog.writer", "null"),
    )
    .unwrap();
    let before = configurator.ZiFCurrent();

    let err = configurator
        .ZiFReconfigure(&ZiCRawConfiguration::ZiFNew().ZiFWith("tinylog.writer", "console"))
        .unwrap_err();

    assert!(matches!(err, ZiError::UnknownPlugin { .. }));
    assert!(Arc::ptr_eq(&before, &configurator.ZiFCurrent()));
}

#[test]
fn test_replaced_writers_stay_closed() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("app.log");
    let raw = ZiCRawConfiguration::ZiFNew()
        .ZiFWith("tinylog.writer", format!("rollingfile: {}", path.display()));
    let configurator = ZiCConfigurator::ZiFFromRaw(&raw).unwrap();
    configurator.ZiFWrite("before").unwrap();

    let replaced = configurator.ZiFCurrent();
    configurator.ZiFReconfigure(&raw).unwrap();

    assert!(replaced.writers[0].write("late").is_err());
    configurator.ZiFWrite("after").unwrap();
    assert_eq!(fs::read_to_string(&path).unwrap(), "before\nafter\n");
}
