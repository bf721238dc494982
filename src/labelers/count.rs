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

//! Counting labeler: `app.log` is rotated to `app.1.log`, `app.2.log`, ...
//!
//! Without `max` the index grows without bound, continuing after the highest
//! backup index already on disk, and never reuses a name that exists. With `max = N` the index cycles through `1..=N` and the
//! writer overwrites whatever backup occupies the chosen slot.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::time::SystemTime;

use crate::binder::ZiCPropertyReader;
use crate::errors::Result;
use crate::labelers::{ZiCLabeler, ZiFExistingBackups, ZiFLabelPath};
use crate::registry::{
    ZiCCapability, ZiCPluginDescriptor, ZiCPluginInstance, ZiCPropertyDescriptor, ZiCPropertyKind,
};

pub const IDENTIFIER: &str = "zilog::labelers::ZiCCountLabeler";
/// Widest padding accepted; enough for every `u64` index.
pub const MAX_DIGITS: usize = 20;

#[allow(non_snake_case)]
pub fn ZiFDescriptor() -> ZiCPluginDescriptor {
    ZiCPluginDescriptor::ZiFNew(ZiCCapability::Labeler, "count", IDENTIFIER, ZiFCreate)
        .ZiFProperty(ZiCPropertyDescriptor::ZiFOptional("max", ZiCPropertyKind::Integer))
        .ZiFProperty(ZiCPropertyDescriptor::ZiFOptional("digits", ZiCPropertyKind::Integer))
        .ZiFShorthand("max")
}

#[allow(non_snake_case)]
fn ZiFCreate(reader: &ZiCPropertyReader<'_>) -> Result<ZiCPluginInstance> {
    let max = reader.ZiFIntegerAtLeast("max", 1)?.map(|v| v as u64);
    let digits = reader
        .ZiFIntegerInRange("digits", 1, MAX_DIGITS as i64)?
        .map(|v| v as usize);
    Ok(ZiCPluginInstance::Labeler(Box::new(ZiCCountLabeler::ZiFNew(
        max, digits,
    ))))
}

#[derive(Clone, Debug, PartialEq, Eq)]
enum ZiCCountState {
    Initial,
    Rotated { base: PathBuf, index: u64 },
}

#[derive(Clone, Debug)]
pub struct ZiCCountLabeler {
    max: Option<u64>,
    width: usize,
    state: ZiCCountState,
}

impl ZiCCountLabeler {
    /// `digits` defaults to the width of `max`, or 1 when unbounded, and is
    /// capped at [`MAX_DIGITS`].
    #[allow(non_snake_case)]
    pub fn ZiFNew(max: Option<u64>, digits: Option<usize>) -> Self {
        let width = digits
            .or_else(|| max.map(|m| m.to_string().len()))
            .unwrap_or(1)
            .clamp(1, MAX_DIGITS);
        ZiCCountLabeler {
            max,
            width,
            state: ZiCCountState::Initial,
        }
    }

    /// Index of the most recent rotation, if any.
    #[allow(non_snake_case)]
    pub fn ZiFLastIndex(&self) -> Option<u64> {
        match &self.state {
            ZiCCountState::Initial => None,
            ZiCCountState::Rotated { index, .. } => Some(*index),
        }
    }

    #[allow(non_snake_case)]
    pub fn ZiFMax(&self) -> Option<u64> {
        self.max
    }

    fn label(&self, index: u64) -> String {
        format!("{:0width$}", index, width = self.width)
    }

    fn candidate(&self, active: &Path, extension: Option<&str>, index: u64) -> PathBuf {
        ZiFLabelPath(active, extension, &self.label(index))
    }

    fn first_index(&self, active: &Path, extension: Option<&str>) -> io::Result<u64> {
        match self.max {
            None => {
                let highest = ZiFExistingBackups(active, extension)?
                    .into_iter()
                    .filter_map(|(_, label)| parse_index(&label))
                    .max()
                    .unwrap_or(0);
                Ok(highest.saturating_add(1))
            }
            Some(max) => {
                let mut oldest: Option<(SystemTime, u64)> = None;
                for index in 1..=max {
                    let candidate = self.candidate(active, extension, index);
                    if !candidate.try_exists()? {
                        return Ok(index);
                    }
                    let modified = fs::metadata(&candidate)?.modified()?;
                    if oldest.map_or(true, |(time, _)| modified < time) {
                        oldest = Some((modified, index));
                    }
                }
                Ok(oldest.map_or(1, |(_, index)| index))
            }
        }
    }
}

fn parse_index(label: &str) -> Option<u64> {
    if label.bytes().all(|b| b.is_ascii_digit()) {
        label.parse().ok()
    } else {
        None
    }
}

impl ZiCLabeler for ZiCCountLabeler {
    fn name(&self) -> &'static str {
        "count"
    }

    fn roll_backup_file(&mut self, active: &Path, extension: Option<&str>) -> io::Result<PathBuf> {
        let mut index = match &self.state {
            ZiCCountState::Rotated { base, index } if base == active => match self.max {
                Some(max) => index % max + 1,
                None => index + 1,
            },
            _ => self.first_index(active, extension)?,
        };
        if self.max.is_none() {
            while self.candidate(active, extension, index).try_exists()? {
                index += 1;
            }
        }
        self.state = ZiCCountState::Rotated {
            base: active.to_path_buf(),
            index,
        };
        Ok(self.candidate(active, extension, index))
    }
}
