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
use crate::errors::Result;
use crate::policies::ZiCPolicy;
use crate::registry::{ZiCCapability, ZiCPluginDescriptor, ZiCPluginInstance};

pub const IDENTIFIER: &str = "zilog::policies::ZiCStartupPolicy";

#[allow(non_snake_case)]
pub fn ZiFDescriptor() -> ZiCPluginDescriptor {
    ZiCPluginDescriptor::ZiFNew(ZiCCapability::Policy, "startup", IDENTIFIER, ZiFCreate)
}

#[allow(non_snake_case)]
fn ZiFCreate(_reader: &ZiCPropertyReader<'_>) -> Result<ZiCPluginInstance> {
    Ok(ZiCPluginInstance::Policy(Box::new(ZiCStartupPolicy)))
}

/// Starts every process with a fresh file.
#[derive(Clone, Copy, Debug, Default)]
pub struct ZiCStartupPolicy;

impl ZiCPolicy for ZiCStartupPolicy {
    fn name(&self) -> &'static str {
        "startup"
    }

    fn continue_file(&mut self, path: &Path) -> io::Result<bool> {
        Ok(fs::metadata(path)?.len() == 0)
    }

    fn continue_entry(&mut self, _entry: &str) -> bool {
        true
    }

    fn reset(&mut self) {}
}
