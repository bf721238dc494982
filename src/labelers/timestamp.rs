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

//! Timestamp labeler: the label is the active file's last modification time
//! in local time, formatted with a chrono pattern.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Local};

use crate::binder::ZiCPropertyReader;
use crate::convert::ZiFFormatDate;
use crate::errors::Result;
use crate::labelers::{ZiCLabeler, ZiFLabelPath, ZiFResolveCollision};
use crate::registry::{
    ZiCCapability, ZiCPluginDescriptor, ZiCPluginInstance, ZiCPropertyDescriptor, ZiCPropertyKind,
};

pub const IDENTIFIER: &str = "zilog::labelers::ZiCTimestampLabeler";
pub const DEFAULT_PATTERN: &str = "%Y-%m-%d_%H-%M-%S";

#[allow(non_snake_case)]
pub fn ZiFDescriptor() -> ZiCPluginDescriptor {
    ZiCPluginDescriptor::ZiFNew(ZiCCapability::Labeler, "timestamp", IDENTIFIER, ZiFCreate)
        .ZiFProperty(
            ZiCPropertyDescriptor::ZiFOptional("pattern", ZiCPropertyKind::DatePattern)
                .ZiFWithDefault(DEFAULT_PATTERN),
        )
        .ZiFProperty(ZiCPropertyDescriptor::ZiFOptional(
            "tiebreak",
            ZiCPropertyKind::Plugin(ZiCCapability::Labeler),
        ))
        .ZiFShorthand("pattern")
}

#[allow(non_snake_case)]
fn ZiFCreate(reader: &ZiCPropertyReader<'_>) -> Result<ZiCPluginInstance> {
    let pattern = reader.ZiFDatePattern("pattern").unwrap_or(DEFAULT_PATTERN);
    let tiebreak = reader.ZiFLabeler("tiebreak")?;
    Ok(ZiCPluginInstance::Labeler(Box::new(
        ZiCTimestampLabeler::ZiFNew(pattern, tiebreak),
    )))
}

#[derive(Debug)]
pub struct ZiCTimestampLabeler {
    pattern: String,
    tiebreak: Option<Box<dyn ZiCLabeler>>,
}

impl ZiCTimestampLabeler {
    /// `pattern` must already be a valid chrono pattern.
    #[allow(non_snake_case)]
    pub fn ZiFNew(pattern: impl Into<String>, tiebreak: Option<Box<dyn ZiCLabeler>>) -> Self {
        ZiCTimestampLabeler {
            pattern: pattern.into(),
            tiebreak,
        }
    }

    #[allow(non_snake_case)]
    pub fn ZiFPattern(&self) -> &str {
        &self.pattern
    }

    /// Label for `time`. A pattern chrono cannot render is reported as
    /// `InvalidInput` rather than aborting the rotation.
    #[allow(non_snake_case)]
    pub fn ZiFFormat(&self, time: DateTime<Local>) -> io::Result<String> {
        ZiFFormatDate(&self.pattern, &time).map_err(|_| {
            io::Error::new(
                io::ErrorKind::InvalidInput,
                format!("date pattern '{}' cannot be formatted", self.pattern),
            )
        })
    }
}

impl ZiCLabeler for ZiCTimestampLabeler {
    fn name(&self) -> &'static str {
        "timestamp"
    }

    fn roll_backup_file(&mut self, active: &Path, extension: Option<&str>) -> io::Result<PathBuf> {
        let modified: DateTime<Local> = fs::metadata(active)?.modified()?.into();
        let candidate = ZiFLabelPath(active, extension, &self.ZiFFormat(modified)?);
        ZiFResolveCollision(candidate, extension, self.tiebreak.as_mut())
    }
}
