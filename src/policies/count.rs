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

use std::fs::File;
use std::io::{self, BufRead, BufReader};
use std::path::Path;

use crate::binder::ZiCPropertyReader;
use crate::errors::{Result, ZiError};
use crate::policies::ZiCPolicy;
use crate::registry::{
    ZiCCapability, ZiCPluginDescriptor, ZiCPluginInstance, ZiCPropertyDescriptor, ZiCPropertyKind,
};

pub const IDENTIFIER: &str = "zilog::policies::ZiCCountPolicy";

#[allow(non_snake_case)]
pub fn ZiFDescriptor() -> ZiCPluginDescriptor {
    ZiCPluginDescriptor::ZiFNew(ZiCCapability::Policy, "count", IDENTIFIER, ZiFCreate)
        .ZiFProperty(ZiCPropertyDescriptor::ZiFRequired("max", ZiCPropertyKind::Integer))
        .ZiFShorthand("max")
}

#[allow(non_snake_case)]
fn ZiFCreate(reader: &ZiCPropertyReader<'_>) -> Result<ZiCPluginInstance> {
    let max = reader
        .ZiFIntegerAtLeast("max", 1)?
        .ok_or_else(|| ZiError::missing_property(reader.ZiFKey("max"), "integer"))?;
    Ok(ZiCPluginInstance::Policy(Box::new(ZiCCountPolicy::ZiFNew(max as u64))))
}

/// Rotates after `max` entries have been written to one file. Entries found
/// in an existing file count as one per line.
#[derive(Clone, Debug)]
pub struct ZiCCountPolicy {
    max: u64,
    count: u64,
}

impl ZiCCountPolicy {
    #[allow(non_snake_case)]
    pub fn ZiFNew(max: u64) -> Self {
        ZiCCountPolicy { max, count: 0 }
    }
}

impl ZiCPolicy for ZiCCountPolicy {
    fn name(&self) -> &'static str {
        "count"
    }

    fn continue_file(&mut self, path: &Path) -> io::Result<bool> {
        let mut lines = 0;
        for line in BufReader::new(File::open(path)?).lines() {
            line?;
            lines += 1;
        }
        if lines >= self.max {
            return Ok(false);
        }
        self.count = lines;
        Ok(true)
    }

    fn continue_entry(&mut self, _entry: &str) -> bool {
        if self.count >= self.max {
            return false;
        }
        self.count += 1;
        true
    }

    fn reset(&mut self) {
        self.count = 0;
    }
}
