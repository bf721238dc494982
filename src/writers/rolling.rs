//! Copyright © 2025-2026 Wenze Wei. All Rights Reserved.
//!
//! This file is part of Zilog.
//! The Zilog project belongs to the Dunimd Team.
//!
//! Licensed under the Apache License, Version 2.0 (the "License");
//! You may not use this file except in compliance with the License.
//! You may obtain a copy of the License at
//!
//!     http://www.apache.org/licenses/LICENSE-2.0
//!
//! Unless required by applicable law or agreed to in writing, software
//! distributed under the License is distributed on an "AS IS" BASIS,
//! WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
//! See the License for the specific language governing permissions and
//! limitations under the License.

//! Rolling file writer.
//!
//! Appends entries to one active file. When the configured policy asks for a
//! rotation the writer closes the file, asks its labeler for the backup
//! path, moves the file there and starts a fresh one. Backups beyond
//! `backups` are deleted, oldest first; this includes backups left on disk by
//! earlier runs, which are picked up before the first write or rotation.
//!
//! Closing is final: later writes and rotations fail instead of reopening
//! the file.
//!
//! Label computation and the rename happen under the same lock, so two
//! threads sharing a writer can never compute the same backup name.

use std::collections::VecDeque;
use std::fs::{self, File, OpenOptions};
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard};
use std::time::SystemTime;

use crate::binder::ZiCPropertyReader;
use crate::errors::{Result, ZiError};
use crate::labelers::{ZiCCountLabeler, ZiCLabeler, ZiFExistingBackups, ZiFFileExtension};
use crate::policies::ZiCPolicy;
use crate::registry::{
    ZiCCapability, ZiCPluginDescriptor, ZiCPluginInstance, ZiCPropertyDescriptor, ZiCPropertyKind,
};
use crate::writers::ZiCWriter;

pub const IDENTIFIER: &str = "zilog::writers::ZiCRollingFileWriter";

#[allow(non_snake_case)]
pub fn ZiFDescriptor() -> ZiCPluginDescriptor {
    ZiCPluginDescriptor::ZiFNew(ZiCCapability::Writer, "rollingfile", IDENTIFIER, ZiFCreate)
        .ZiFProperty(ZiCPropertyDescriptor::ZiFRequired("file", ZiCPropertyKind::Path))
        .ZiFProperty(ZiCPropertyDescriptor::ZiFOptional("backups", ZiCPropertyKind::Integer))
        .ZiFProperty(
            ZiCPropertyDescriptor::ZiFOptional(
                "labeler",
                ZiCPropertyKind::Plugin(ZiCCapability::Labeler),
            )
            .ZiFWithDefault("count"),
        )
        .ZiFProperty(ZiCPropertyDescriptor::ZiFOptional(
            "policy",
            ZiCPropertyKind::Plugin(ZiCCapability::Policy),
        ))
        .ZiFProperty(
            ZiCPropertyDescriptor::ZiFOptional("buffered", ZiCPropertyKind::Boolean)
                .ZiFWithDefault("false"),
        )
        .ZiFShorthand("file")
}

#[allow(non_snake_case)]
fn ZiFCreate(reader: &ZiCPropertyReader<'_>) -> Result<ZiCPluginInstance> {
    let path = reader
        .ZiFPath("file")
        .ok_or_else(|| ZiError::missing_property(reader.ZiFKey("file"), "file path"))?;
    let backups = reader.ZiFIntegerAtLeast("backups", 0)?.map(|v| v as usize);
    let labeler = match reader.ZiFLabeler("labeler")? {
        Some(labeler) => labeler,
        None => Box::new(ZiCCountLabeler::ZiFNew(None, None)),
    };
    let policy = reader.ZiFPolicy("policy")?;
    let buffered = reader.ZiFBoolean("buffered").unwrap_or(false);
    Ok(ZiCPluginInstance::Writer(Box::new(ZiCRollingFileWriter::ZiFNew(
        path, labeler, policy, backups, buffered,
    ))))
}

#[derive(Debug)]
struct ZiCRollingState {
    labeler: Box<dyn ZiCLabeler>,
    policy: Option<Box<dyn ZiCPolicy>>,
    sink: Option<BufWriter<File>>,
    /// Known backups of the active file, oldest first.
    backups: VecDeque<PathBuf>,
    opened: bool,
    closed: bool,
}

#[derive(Debug)]
pub struct ZiCRollingFileWriter {
    path: PathBuf,
    extension: Option<String>,
    max_backups: Option<usize>,
    buffered: bool,
    state: Mutex<ZiCRollingState>,
}

impl ZiCRollingFileWriter {
    /// Creates the writer without touching the filesystem; the file is opened
    /// on the first write.
    #[allow(non_snake_case)]
    pub fn ZiFNew(
        path: impl Into<PathBuf>,
        labeler: Box<dyn ZiCLabeler>,
        policy: Option<Box<dyn ZiCPolicy>>,
        max_backups: Option<usize>,
        buffered: bool,
    ) -> Self {
        let path = path.into();
        ZiCRollingFileWriter {
            extension: ZiFFileExtension(&path),
            path,
            max_backups,
            buffered,
            state: Mutex::new(ZiCRollingState {
                labeler,
                policy,
                sink: None,
                backups: VecDeque::new(),
                opened: false,
                closed: false,
            }),
        }
    }

    #[allow(non_snake_case)]
    pub fn ZiFPath(&self) -> &Path {
        &self.path
    }

    /// Rotates the active file now, regardless of the policy. Returns the
    /// backup path, or `None` when there was no file to rotate.
    #[allow(non_snake_case)]
    pub fn ZiFRotate(&self) -> io::Result<Option<PathBuf>> {
        let mut state = self.lock();
        if state.closed {
            return Err(closed_error());
        }
        self.roll(&mut state)
    }

    /// Backups of the active file known to this writer, oldest first.
    #[allow(non_snake_case)]
    pub fn ZiFBackups(&self) -> Vec<PathBuf> {
        self.lock().backups.iter().cloned().collect()
    }

    fn lock(&self) -> MutexGuard<'_, ZiCRollingState> {
        self.state.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Seeds the backup list from disk, oldest first, and prunes it.
    fn discover(&self, state: &mut ZiCRollingState) -> io::Result<()> {
        let mut found: Vec<(SystemTime, Option<u64>, PathBuf)> = Vec::new();
        for (path, label) in ZiFExistingBackups(&self.path, self.extension.as_deref())? {
            let modified = fs::metadata(&path)?.modified()?;
            let index = if label.bytes().all(|b| b.is_ascii_digit()) {
                label.parse().ok()
            } else {
                None
            };
            found.push((modified, index, path));
        }
        found.sort();
        state.backups = found.into_iter().map(|(_, _, path)| path).collect();
        if !state.backups.is_empty() {
            log::debug!(
                "found {} existing backup(s) of '{}'",
                state.backups.len(),
                self.path.display()
            );
        }
        self.prune(state)
    }

    fn open(&self, state: &mut ZiCRollingState) -> io::Result<()> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }
        if !state.opened {
            self.discover(state)?;
        }
        if !state.opened && self.path.try_exists()? {
            let keep = match state.policy.as_mut() {
                Some(policy) => policy.continue_file(&self.path)?,
                None => true,
            };
            if !keep {
                state.opened = true;
                self.roll(state)?;
                return Ok(());
            }
        }
        let file = OpenOptions::new().create(true).append(true).open(&self.path)?;
        state.sink = Some(BufWriter::new(file));
        state.opened = true;
        Ok(())
    }

    fn roll(&self, state: &mut ZiCRollingState) -> io::Result<Option<PathBuf>> {
        if !state.opened {
            self.discover(state)?;
            state.opened = true;
        }
        if let Some(mut sink) = state.sink.take() {
            sink.flush()?;
        }
        let target = if self.path.try_exists()? {
            let target = state
                .labeler
                .roll_backup_file(&self.path, self.extension.as_deref())?;
            if target.try_exists()? {
                fs::remove_file(&target)?;
            }
            fs::rename(&self.path, &target)?;
            log::info!(
                "rotated '{}' to '{}' using {} labeler",
                self.path.display(),
                target.display(),
                state.labeler.name()
            );
            state.backups.retain(|b| b != &target);
            state.backups.push_back(target.clone());
            self.prune(state)?;
            Some(target)
        } else {
            None
        };
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }
        state.sink = Some(BufWriter::new(File::create(&self.path)?));
        state.opened = true;
        if let Some(policy) = state.policy.as_mut() {
            policy.reset();
        }
        Ok(target)
    }

    fn prune(&self, state: &mut ZiCRollingState) -> io::Result<()> {
        let Some(max) = self.max_backups else {
            return Ok(());
        };
        while state.backups.len() > max {
            let Some(oldest) = state.backups.pop_front() else {
                break;
            };
            match fs::remove_file(&oldest) {
                Ok(()) => log::debug!("deleted backup '{}'", oldest.display()),
                Err(err) if err.kind() == io::ErrorKind::NotFound => {}
                Err(err) => return Err(err),
            }
        }
        Ok(())
    }
}

fn closed_error() -> io::Error {
    io::Error::new(io::ErrorKind::Other, "rolling file writer is closed")
}

impl ZiCWriter for ZiCRollingFileWriter {
    fn name(&self) -> &'static str {
        "rollingfile"
    }

    fn write(&self, entry: &str) -> io::Result<()> {
        let mut state = self.lock();
        if state.closed {
            return Err(closed_error());
        }
        if state.sink.is_none() {
            self.open(&mut state)?;
        }
        let rotate = match state.policy.as_mut() {
            Some(policy) => !policy.continue_entry(entry),
            None => false,
        };
        if rotate {
            self.roll(&mut state)?;
            if let Some(policy) = state.policy.as_mut() {
                policy.continue_entry(entry);
            }
        }
        let sink = state
            .sink
            .as_mut()
            .ok_or_else(|| io::Error::new(io::ErrorKind::Other, "log file is not open"))?;
        writeln!(sink, "{}", entry)?;
        if !self.buffered {
            sink.flush()?;
        }
        Ok(())
    }

    fn flush(&self) -> io::Result<()> {
        match self.lock().sink.as_mut() {
            Some(sink) => sink.flush(),
            None => Ok(()),
        }
    }

    fn close(&self) -> io::Result<()> {
        let mut state = self.lock();
        state.closed = true;
        match state.sink.take() {
            Some(mut sink) => sink.flush(),
            None => Ok(()),
        }
    }
}
