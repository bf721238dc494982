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

use std::fs;
use std::io;
use std::path::Path;

use crate::binder::ZiCPropertyReader;
use crate::errors::{Result, ZiError};
use crate::policies::ZiCPolicy;
use crate::registry::{
    ZiCCapability, ZiCPluginDescriptor, ZiCPluginInstance, ZiCPropertyDescriptor, ZiCPropertyKind,
};

pub const IDENTIFIER: &str = "zilog::policies::ZiCSizePolicy";

#[allow(non_snake_case)]
pub fn ZiFDescriptor() -> ZiCPluginDescriptor {
    ZiCPluginDescriptor::ZiFNew(ZiCCapability::Policy, "size", IDENTIFIER, ZiFCreate)
        .ZiFProperty(ZiCPropertyDescriptor::ZiFRequired("max", ZiCPropertyKind::ByteSize))
        .ZiFShorthand("max")
}

#[allow(non_snake_case)]
fn ZiFCreate(reader: &ZiCPropertyReader<'_>) -> Result<ZiCPluginInstance> {
    match reader.ZiFByteSize("max") {
        Some(max) if max > 0 => Ok(ZiCPluginInstance::Policy(Box::new(ZiCSizePolicy::ZiFNew(max)))),
        other => Err(ZiError::conversion(
            reader.ZiFKey("max"),
            "size greater than zero",
            other.unwrap_or_default().to_string(),
        )),
    }
}

/// Rotates before an entry would push the file past `max` bytes. A single
/// entry larger than `max` still goes into an otherwise empty file.
#[derive(Clone, Debug)]
pub struct ZiCSizePolicy {
    max: u64,
    written: u64,
}

impl ZiCSizePolicy {
    #[allow(non_snake_case)]
    pub fn ZiFNew(max: u64) -> Self {
        ZiCSizePolicy { max, written: 0 }
    }
}

impl ZiCPolicy for ZiCSizePolicy {
    fn name(&self) -> &'static str {
        "size"
    }

    fn continue_file(&mut self, path: &Path) -> io::Result<bool> {
        let len = fs::metadata(path)?.len();
        if len >= self.max {
            return Ok(false);
        }
        self.written = len;
        Ok(true)
    }

    fn continue_entry(&mut self, entry: &str) -> bool {
        let size = entry.len() as u64 + 1;
        if self.written > 0 && self.written + size > self.max {
            return false;
        }
        self.written += size;
        true
    }

    fn reset(&mut self) {
        self.written = 0;
    }
}
