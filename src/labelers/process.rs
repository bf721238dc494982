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

use std::io;
use std::path::{Path, PathBuf};

use crate::binder::ZiCPropertyReader;
use crate::errors::Result;
use crate::labelers::{ZiCLabeler, ZiFLabelPath, ZiFResolveCollision};
use crate::registry::{
    ZiCCapability, ZiCPluginDescriptor, ZiCPluginInstance, ZiCPropertyDescriptor, ZiCPropertyKind,
};

pub const IDENTIFIER: &str = "zilog::labelers::ZiCProcessLabeler";

#[allow(non_snake_case)]
pub fn ZiFDescriptor() -> ZiCPluginDescriptor {
    ZiCPluginDescriptor::ZiFNew(ZiCCapability::Labeler, "pid", IDENTIFIER, ZiFCreate).ZiFProperty(
        ZiCPropertyDescriptor::ZiFOptional("tiebreak", ZiCPropertyKind::Plugin(ZiCCapability::Labeler)),
    )
}

#[allow(non_snake_case)]
fn ZiFCreate(reader: &ZiCPropertyReader<'_>) -> Result<ZiCPluginInstance> {
    let tiebreak = reader.ZiFLabeler("tiebreak")?;
    Ok(ZiCPluginInstance::Labeler(Box::new(ZiCProcessLabeler::ZiFNew(tiebreak))))
}

/// Labels backups with the identifier of the current process.
#[derive(Debug)]
pub struct ZiCProcessLabeler {
    pid: u32,
    tiebreak: Option<Box<dyn ZiCLabeler>>,
}

impl ZiCProcessLabeler {
    #[allow(non_snake_case)]
    pub fn ZiFNew(tiebreak: Option<Box<dyn ZiCLabeler>>) -> Self {
        ZiCProcessLabeler {
            pid: std::process::id(),
            tiebreak,
        }
    }
}

impl ZiCLabeler for ZiCProcessLabeler {
    fn name(&self) -> &'static str {
        "pid"
    }

    fn roll_backup_file(&mut self, active: &Path, extension: Option<&str>) -> io::Result<PathBuf> {
        let candidate = ZiFLabelPath(active, extension, &self.pid.to_string());
        ZiFResolveCollision(candidate, extension, self.tiebreak.as_mut())
    }
}
