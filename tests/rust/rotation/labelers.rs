//! Copyright © 2025-2026 Wenze Wei. All Rights Reserved.
//!
//! This file is part of Zilog.
//! The Zilog project belongs to the Dunimd project team.

use std::fs::{self, File};
use std::path::Path;
use std::time::{Duration, SystemTime};

use chrono::{DateTime, Local};
use zilog::{
    ZiCCapability, ZiCConfigNode, ZiCCountLabeler, ZiCLabeler, ZiCPluginRegistry,
    ZiCProcessLabeler, ZiCPropertyBinder, ZiCRawConfiguration, ZiCTimestampLabeler,
};

fn touch(path: &Path, modified: SystemTime) {
    fs::write(path, "backup\n").unwrap();
    File::options()
        .write(true)
        .open(path)
        .unwrap()
        .set_modified(modified)
        .unwrap();
}

fn labeler_from(value: &str) -> Box<dyn ZiCLabeler> {
    let registry = ZiCPluginRegistry::ZiFGlobal().unwrap();
    let config = ZiCRawConfiguration::ZiFNew().ZiFWith("tinylog.writer.labeler", value);
    let node: ZiCConfigNode = config
        .ZiFTree("tinylog.writer")
        .unwrap()
        .ZiFChild("labeler")
        .cloned()
        .unwrap();
    ZiCPropertyBinder::ZiFNew(&registry)
        .ZiFBindFacility(ZiCCapability::Labeler, &node)
        .unwrap()
        .ZiFInstantiate()
        .unwrap()
        .into_labeler()
        .unwrap()
}

#[test]
fn test_count_labeler_skips_existing_backups() {
    let dir = tempfile::tempdir().unwrap();
    let active = dir.path().join("app.log");
    fs::write(dir.path().join("app.1.log"), "old\n").unwrap();
    fs::write(dir.path().join("app.2.log"), "old\n").unwrap();

    let mut labeler = ZiCCountLabeler::ZiFNew(None, None);
    let backup = labeler.roll_backup_file(&active, Some("log")).unwrap();
    assert_eq!(backup, dir.path().join("app.3.log"));
}

#[test]
fn test_bounded_count_labeler_reuses_oldest_slot() {
    let dir = tempfile::tempdir().unwrap();
    let active = dir.path().join("app.log");
    let now = SystemTime::now();
    touch(&dir.path().join("app.1.log"), now - Duration::from_secs(60));
    touch(&dir.path().join("app.2.log"), now - Duration::from_secs(600));
    touch(&dir.path().join("app.3.log"), now - Duration::from_secs(6));

    let mut labeler = ZiCCountLabeler::ZiFNew(Some(3), None);
    let first = labeler.roll_backup_file(&active, Some("log")).unwrap();
    let second = labeler.roll_backup_file(&active, Some("log")).unwrap();
    assert_eq!(first, dir.path().join("app.2.log"));
    assert_eq!(second, dir.path().join("app.3.log"));
}

#[test]
fn test_bounded_count_labeler_prefers_free_slot() {
    let dir = tempfile::tempdir().unwrap();
    let active = dir.path().join("app.log");
    touch(&dir.path().join("app.01.log"), SystemTime::now());

    let mut labeler = ZiCCountLabeler::ZiFNew(Some(10), None);
    let backup = labeler.roll_backup_file(&active, Some("log")).unwrap();
    assert_eq!(backup, dir.path().join("app.02.log"));
}

#[test]
fn test_count_labeler_without_extension() {
    let dir = tempfile::tempdir().unwrap();
    let active = dir.path().join("app");
    let mut labeler = ZiCCountLabeler::ZiFNew(None, Some(3));
    let backup = labeler.roll_backup_file(&active, None).unwrap();
    assert_eq!(backup, dir.path().join("app.001"));
}

#[test]
fn test_timestamp_labeler_uses_modification_time() {
    let dir = tempfile::tempdir().unwrap();
    let active = dir.path().join("app.log");
    let modified = SystemTime::now() - Duration::from_secs(86_400 * 3);
    touch(&active, modified);

    let mut labeler = ZiCTimestampLabeler::ZiFNew("%Y-%m-%d", None);
    let backup = labeler.roll_backup_file(&active, Some("log")).unwrap();

    let day = DateTime::<Local>::from(modified).format("%Y-%m-%d").to_string();
    assert_eq!(backup, dir.path().join(format!("app.{}.log", day)));
}

#[test]
fn test_timestamp_collision_gets_counter() {
    let dir = tempfile::tempdir().unwrap();
    let active = dir.path().join("app.log");
    let modified = SystemTime::now();
    touch(&active, modified);
    let day = DateTime::<Local>::from(modified).format("%Y%m%d").to_string();
    fs::write(dir.path().join(format!("app.{}.log", day)), "taken\n").unwrap();

    let mut labeler = ZiCTimestampLabeler::ZiFNew("%Y%m%d", None);
    let backup = labeler.roll_backup_file(&active, Some("log")).unwrap();
    assert_eq!(backup, dir.path().join(format!("app.{}.1.log", day)));
}

#[test]
fn test_timestamp_collision_uses_tiebreak() {
    let dir = tempfile::tempdir().unwrap();
    let active = dir.path().join("app.log");
    let modified = SystemTime::now();
    touch(&active, modified);
    let day = DateTime::<Local>::from(modified).format("%Y%m%d").to_string();
    fs::write(dir.path().join(format!("app.{}.log", day)), "taken\n").unwrap();

    let mut labeler = ZiCTimestampLabeler::ZiFNew(
        "%Y%m%d",
        Some(Box::new(ZiCProcessLabeler::ZiFNew(None))),
    );
    let backup = labeler.roll_backup_file(&active, Some("log")).unwrap();
    assert_eq!(
        backup,
        dir.path().join(format!("app.{}.{}.log", day, std::process::id()))
    );
}

#[test]
fn test_process_labeler() {
    let dir = tempfile::tempdir().unwrap();
    let active = dir.path().join("server.log");
    let mut labeler = ZiCProcessLabeler::ZiFNew(None);
    let backup = labeler.roll_backup_file(&active, Some("log")).unwrap();
    assert_eq!(
        backup,
        dir.path().join(format!("server.{}.log", std::process::id()))
    );
}

#[test]
fn test_labelers_built_from_configuration() {
    let dir = tempfile::tempdir().unwrap();
    let active = dir.path().join("app.log");

    let mut count = labeler_from("count: 100");
    assert_eq!(count.name(), "count");
    assert_eq!(
        count.roll_backup_file(&active, Some("log")).unwrap(),
        dir.path().join("app.001.log")
    );

    let pid = labeler_from("pid");
    assert_eq!(pid.name(), "pid");

    let timestamp = labeler_from("timestamp: %Y");
    assert_eq!(timestamp.name(), "timestamp");
}
