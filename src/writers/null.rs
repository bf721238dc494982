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

use crate::binder::ZiCPropertyReader;
use crate::errors::Result;
use crate::registry::{ZiCCapability, ZiCPluginDescriptor, ZiCPluginInstance};
use crate::writers::ZiCWriter;

pub const IDENTIFIER: &str = "zilog::writers::ZiCNullWriter";

#[allow(non_snake_case)]
pub fn ZiFDescriptor() -> ZiCPluginDescriptor {
    ZiCPluginDescriptor::ZiFNew(ZiCCapability::Writer, "null", IDENTIFIER, ZiFCreate)
}

#[allow(non_snake_case)]
fn ZiFCreate(_reader: &ZiCPropertyReader<'_>) -> Result<ZiCPluginInstance> {
    Ok(ZiCPluginInstance::Writer(Box::new(ZiCNullWriter)))
}

/// Accepts and drops every entry; `tinylog.writer = null` switches output off.
#[derive(Clone, Copy, Debug, Default)]
pub struct ZiCNullWriter;

impl ZiCWriter for ZiCNullWriter {
    fn name(&self) -> &'static str {
        "null"
    }

    fn write(&self, _entry: &str) -> io::Result<()> {
        Ok(())
    }

    fn flush(&self) -> io::Result<()> {
        Ok(())
    }

    fn close(&self) -> io::Result<()> {
        Ok(())
    }
}
