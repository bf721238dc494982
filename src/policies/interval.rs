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
use std::time::{Duration, SystemTime};

use crate::binder::ZiCPropertyReader;
use crate::errors::{Result, ZiError};
use crate::policies::ZiCPolicy;
use crate::registry::{
    ZiCCapability, ZiCPluginDescriptor, ZiCPluginInstance, ZiCPropertyDescriptor, ZiCPropertyKind,
};

pub const IDENTIFIER: &str = "zilog::policies::ZiCIntervalPolicy";

#[allow(non_snake_case)]
pub fn ZiFDescriptor() -> ZiCPluginDescriptor {
    ZiCPluginDescriptor::ZiFNew(ZiCCapability::Policy, "interval", IDENTIFIER, ZiFCreate)
        .ZiFProperty(ZiCPropertyDescriptor::ZiFRequired("period", ZiCPropertyKind::Duration))
        .ZiFShorthand("period")
}

#[allow(non_snake_case)]
fn ZiFCreate(reader: &ZiCPropertyReader<'_>) -> Result<ZiCPluginInstance> {
    match reader.ZiFDuration("period") {
        Some(period) if !period.is_zero() => Ok(ZiCPluginInstance::Policy(Box::new(
            ZiCIntervalPolicy::ZiFNew(period),
        ))),
        _ => Err(ZiError::conversion(
            reader.ZiFKey("period"),
            "duration greater than zero",
            "0",
        )),
    }
}

/// Rotates once the active file has been in use for `period`. For a file
/// found at startup the clock starts at its last modification.
#[derive(Clone, Debug)]
pub struct ZiCIntervalPolicy {
    period: Duration,
    started: SystemTime,
}

impl ZiCIntervalPolicy {
    #[allow(non_snake_case)]
    pub fn ZiFNew(period: Duration) -> Self {
        ZiCIntervalPolicy {
            period,
            started: SystemTime::now(),
        }
    }

    fn expired(&self) -> bool {
        self.started
            .elapsed()
            .map(|elapsed| elapsed >= self.period)
            .unwrap_or(false)
    }
}

impl ZiCPolicy for ZiCIntervalPolicy {
    fn name(&self) -> &'static str {
        "interval"
    }

    fn continue_file(&mut self, path: &Path) -> io::Result<bool> {
        self.started = fs::metadata(path)?.modified()?;
        Ok(!self.expired())
    }

    fn continue_entry(&mut self, _entry: &str) -> bool {
        !self.expired()
    }

    fn reset(&mut self) {
        self.started = SystemTime::now();
    }
}
