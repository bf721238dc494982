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

//! # Labelers Module
//!
//! Labelers decide the name a log file is moved to when it is rotated.
//!
//! ## Naming Rule
//!
//! The label is inserted in front of the known file extension, keeping the
//! directory and the rest of the base name:
//!
//! | active file        | extension | label | backup               |
//! |--------------------|-----------|-------|----------------------|
//! | `/logs/app.log`    | `log`     | `1`   | `/logs/app.1.log`    |
//! | `/logs/app`        | none      | `1`   | `/logs/app.1`        |
//! | `/logs/app.v2.log` | `log`     | `1`   | `/logs/app.v2.1.log` |
//!
//! The split uses the length of the given extension, never a search for the
//! last dot, since base names may contain dots themselves.
//!
//! ## Available Labelers
//!
//! - `count`: zero padded rotation index
//! - `timestamp`: last modification time of the active file
//! - `pid`: identifier of the current process

pub mod count;
pub mod process;
pub mod timestamp;

use std::fmt;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

pub use count::ZiCCountLabeler;
pub use process::ZiCProcessLabeler;
pub use timestamp::ZiCTimestampLabeler;

/// Rotation naming policy.
///
/// Implementations only inspect file metadata. Any filesystem error is
/// returned untouched so the writer can decide what to do with it.
pub trait ZiCLabeler: Send + fmt::Debug {
    /// Symbolic name of the labeler.
    fn name(&self) -> &'static str;

    /// Computes the path the active file should be moved to.
    fn roll_backup_file(&mut self, active: &Path, extension: Option<&str>) -> io::Result<PathBuf>;
}

/// Inserts `label` in front of `extension` in the file name of `active`.
///
/// When the file name does not end in `.extension` it is treated as having
/// no extension.
#[allow(non_snake_case)]
pub fn ZiFLabelPath(active: &Path, extension: Option<&str>, label: &str) -> PathBuf {
    let name = active
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    let labeled = match extension.filter(|e| !e.is_empty()) {
        Some(ext) if has_extension(&name, ext) => {
            let stem = &name[..name.len() - ext.len() - 1];
            format!("{}.{}.{}", stem, label, ext)
        }
        _ => format!("{}.{}", name, label),
    };
    active.with_file_name(labeled)
}

fn has_extension(name: &str, ext: &str) -> bool {
    name.len() > ext.len() + 1
        && name.ends_with(ext)
        && name.as_bytes()[name.len() - ext.len() - 1] == b'.'
}

/// Extension of `path` as the rolling writer passes it to labelers.
#[allow(non_snake_case)]
pub fn ZiFFileExtension(path: &Path) -> Option<String> {
    path.extension()
        .map(|e| e.to_string_lossy().into_owned())
        .filter(|e| !e.is_empty())
}

/// Label carried by `candidate` if its file name has the shape of a backup
/// of `active`, the inverse of [`ZiFLabelPath`].
#[allow(non_snake_case)]
pub fn ZiFLabelOf(active: &Path, extension: Option<&str>, candidate: &Path) -> Option<String> {
    let name = active.file_name()?.to_str()?;
    let other = candidate.file_name()?.to_str()?;
    let label = match extension.filter(|e| !e.is_empty()) {
        Some(ext) if has_extension(name, ext) => {
            let stem = &name[..name.len() - ext.len() - 1];
            other
                .strip_prefix(stem)?
                .strip_prefix('.')?
                .strip_suffix(ext)?
                .strip_suffix('.')?
        }
        _ => other.strip_prefix(name)?.strip_prefix('.')?,
    };
    if label.is_empty() {
        None
    } else {
        Some(label.to_string())
    }
}

/// Backups of `active` found next to it on disk, with their labels. A missing
/// directory has no backups.
#[allow(non_snake_case)]
pub fn ZiFExistingBackups(active: &Path, extension: Option<&str>) -> io::Result<Vec<(PathBuf, String)>> {
    let dir = match active.parent().filter(|p| !p.as_os_str().is_empty()) {
        Some(dir) => dir,
        None => Path::new("."),
    };
    let entries = match fs::read_dir(dir) {
        Ok(entries) => entries,
        Err(err) if err.kind() == io::ErrorKind::NotFound => return Ok(Vec::new()),
        Err(err) => return Err(err),
    };
    let mut backups = Vec::new();
    for entry in entries {
        let entry = entry?;
        if !entry.file_type()?.is_file() {
            continue;
        }
        let candidate = active.with_file_name(entry.file_name());
        if let Some(label) = ZiFLabelOf(active, extension, &candidate) {
            backups.push((candidate, label));
        }
    }
    Ok(backups)
}

/// Returns `candidate` if nothing exists there yet. Otherwise asks the
/// tie-break labeler, or appends the first free counter label.
#[allow(non_snake_case)]
pub fn ZiFResolveCollision(
    candidate: PathBuf,
    extension: Option<&str>,
    tiebreak: Option<&mut Box<dyn ZiCLabeler>>,
) -> io::Result<PathBuf> {
    if !candidate.try_exists()? {
        return Ok(candidate);
    }
    if let Some(labeler) = tiebreak {
        return labeler.roll_backup_file(&candidate, extension);
    }
    let mut counter: u64 = 1;
    loop {
        let next = ZiFLabelPath(&candidate, extension, &counter.to_string());
        if !next.try_exists()? {
            return Ok(next);
        }
        counter += 1;
    }
}
