//! Copyright © 2025-2026 Wenze Wei. All Rights Reserved.
//!
//! This file is part of Zilog.
//! The Zilog project belongs to the Dunimd project team.

use std::fs;
use std::path::Path;
use std::sync::Arc;
use std::thread;

use zilog::{
    ZiCConfigurator, ZiCCountLabeler, ZiCCountPolicy, ZiCRawConfiguration, ZiCRollingFileWriter,
    ZiCSizePolicy, ZiCStartupPolicy, ZiCWriter,
};

fn read(path: &Path) -> String {
    fs::read_to_string(path).unwrap()
}

fn count_writer(path: &Path, every: u64, backups: Option<usize>) -> ZiCRollingFileWriter {
    ZiCRollingFileWriter::ZiFNew(
        path,
        Box::new(ZiCCountLabeler::ZiFNew(None, None)),
        Some(Box::new(ZiCCountPolicy::ZiFNew(every))),
        backups,
        false,
    )
}

#[test]
fn test_size_policy_rotates_before_overflow() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("app.log");
    let writer = ZiCRollingFileWriter::ZiFNew(
        &path,
        Box::new(ZiCCountLabeler::ZiFNew(None, None)),
        Some(Box::new(ZiCSizePolicy::ZiFNew(20))),
        None,
        false,
    );
    for entry in ["aaaaaaaaa", "bbbbbbbbb", "ccccccccc"] {
        writer.write(entry).unwrap();
    }

    assert_eq!(read(&dir.path().join("app.1.log")), "aaaaaaaaa\nbbbbbbbbb\n");
    assert_eq!(read(&path), "ccccccccc\n");
}

#[test]
fn test_count_policy_from_configuration() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("app.log");
    let raw = ZiCRawConfiguration::ZiFNew()
        .ZiFWith("tinylog.writer", "rollingfile")
        .ZiFWith("tinylog.writer.file", path.display().to_string())
        .ZiFWith("tinylog.writer.policy", "count: 2");
    let configurator = ZiCConfigurator::ZiFFromRaw(&raw).unwrap();
    for entry in ["one", "two", "three", "four", "five"] {
        configurator.ZiFWrite(entry).unwrap();
    }

    assert_eq!(read(&dir.path().join("app.1.log")), "one\ntwo\n");
    assert_eq!(read(&dir.path().join("app.2.log")), "three\nfour\n");
    assert_eq!(read(&path), "five\n");
}

#[test]
fn test_startup_policy_rotates_previous_run() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("app.log");
    fs::write(&path, "previous run\n").unwrap();

    let writer = ZiCRollingFileWriter::ZiFNew(
        &path,
        Box::new(ZiCCountLabeler::ZiFNew(None, None)),
        Some(Box::new(ZiCStartupPolicy)),
        None,
        false,
    );
    writer.write("this run").unwrap();

    assert_eq!(read(&dir.path().join("app.1.log")), "previous run\n");
    assert_eq!(read(&path), "this run\n");
    assert_eq!(writer.ZiFBackups(), vec![dir.path().join("app.1.log")]);
}

#[test]
fn test_startup_policy_keeps_empty_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("app.log");
    fs::write(&path, "").unwrap();

    let writer = ZiCRollingFileWriter::ZiFNew(
        &path,
        Box::new(ZiCCountLabeler::ZiFNew(None, None)),
        Some(Box::new(ZiCStartupPolicy)),
        None,
        false,
    );
    writer.write("entry").unwrap();

    assert!(!dir.path().join("app.1.log").exists());
    assert_eq!(read(&path), "entry\n");
}

#[test]
fn test_existing_file_is_appended_when_policy_allows() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("app.log");
    fs::write(&path, "one\n").unwrap();

    let writer = count_writer(&path, 3, None);
    for entry in ["two", "three", "four"] {
        writer.write(entry).unwrap();
    }

    assert_eq!(read(&dir.path().join("app.1.log")), "one\ntwo\nthree\n");
    assert_eq!(read(&path), "four\n");
}

#[test]
fn test_old_backups_are_pruned() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("app.log");
    let writer = count_writer(&path, 1, Some(2));
    for entry in ["e1", "e2", "e3", "e4", "e5"] {
        writer.write(entry).unwrap();
    }

    assert!(!dir.path().join("app.1.log").exists());
    assert!(!dir.path().join("app.2.log").exists());
    assert_eq!(read(&dir.path().join("app.3.log")), "e3\n");
    assert_eq!(read(&dir.path().join("app.4.log")), "e4\n");
    assert_eq!(read(&path), "e5\n");
    assert_eq!(
        writer.ZiFBackups(),
        vec![dir.path().join("app.3.log"), dir.path().join("app.4.log")]
    );
}

#[test]
fn test_bounded_labeler_overwrites_slot() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("app.log");
    let writer = ZiCRollingFileWriter::ZiFNew(
        &path,
        Box::new(ZiCCountLabeler::ZiFNew(Some(2), None)),
        Some(Box::new(ZiCCountPolicy::ZiFNew(1))),
        None,
        false,
    );
    for entry in ["e1", "e2", "e3", "e4"] {
        writer.write(entry).unwrap();
    }

    assert_eq!(read(&dir.path().join("app.1.log")), "e3\n");
    assert_eq!(read(&dir.path().join("app.2.log")), "e2\n");
    assert_eq!(read(&path), "e4\n");
}

#[test]
fn test_buffered_writer_flushes_on_close() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("app.log");
    let writer = ZiCRollingFileWriter::ZiFNew(
        &path,
        Box::new(ZiCCountLabeler::ZiFNew(None, None)),
        None,
        None,
        true,
    );
    writer.write("buffered").unwrap();
    writer.close().unwrap();
    assert_eq!(read(&path), "buffered\n");
}

#[test]
fn test_concurrent_writers_lose_no_entries() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("app.log");
    let writer = Arc::new(count_writer(&path, 25, None));

    let handles: Vec<_> = (0..4)
        .map(|t| {
            let writer = Arc::clone(&writer);
            thread::spawn(move || {
                for i in 0..50 {
                    writer.write(&format!("thread {} entry {}", t, i)).unwrap();
                }
            })
        })
        .collect();
    for handle in handles {
        handle.join().unwrap();
    }
    writer.flush().unwrap();

    let mut lines = 0;
    for entry in fs::read_dir(dir.path()).unwrap() {
        let content = read(&entry.unwrap().path());
        assert!(content.lines().count() <= 25);
        lines += content.lines().count();
    }
    assert_eq!(lines, 200);
    assert_eq!(writer.ZiFBackups().len(), 7);
}

#[test]
fn test_backup_limit_holds_across_runs() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("app.log");
    for run in 1..=3 {
        let writer = count_writer(&path, 1, Some(2));
        for i in 1..=3 {
            writer.write(&format!("r{}e{}", run, i)).unwrap();
        }
        writer.close().unwrap();
    }

    let mut names: Vec<String> = fs::read_dir(dir.path())
        .unwrap()
        .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
        .collect();
    names.sort();
    assert_eq!(names, vec!["app.7.log", "app.8.log", "app.log"]);
    assert_eq!(read(&dir.path().join("app.7.log")), "r3e1\n");
    assert_eq!(read(&dir.path().join("app.8.log")), "r3e2\n");
    assert_eq!(read(&path), "r3e3\n");
}

#[test]
fn test_existing_backups_are_pruned_before_first_rotation() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("app.log");
    for name in ["app.1.log", "app.2.log", "app.3.log"] {
        fs::write(dir.path().join(name), "old\n").unwrap();
    }

    let writer = count_writer(&path, 10, Some(1));
    writer.write("entry").unwrap();

    assert!(!dir.path().join("app.1.log").exists());
    assert!(!dir.path().join("app.2.log").exists());
    assert_eq!(writer.ZiFBackups(), vec![dir.path().join("app.3.log")]);
}

#[test]
fn test_closed_writer_does_not_reopen() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("app.log");
    let writer = count_writer(&path, 10, None);
    writer.write("before").unwrap();
    writer.close().unwrap();

    assert!(writer.write("late").is_err());
    assert!(writer.ZiFRotate().is_err());
    assert!(writer.close().is_ok());
    assert_eq!(read(&path), "before\n");
    assert!(!dir.path().join("app.1.log").exists());
}
