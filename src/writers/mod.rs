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

//! # Writers Module
//!
//! Writers are the facility configured under `tinylog.writer`,
//! `tinylog.writer2`, ... Each one receives every rendered log entry in
//! configuration order.
//!
//! - `null`: discards everything
//! - `rollingfile`: appends to a file and rotates it through a labeler

pub mod null;
pub mod rolling;

use std::fmt;
use std::io;

pub use null::ZiCNullWriter;
pub use rolling::ZiCRollingFileWriter;

/// Output of rendered log entries. Shared between threads, so implementations
/// guard their own mutable state.
pub trait ZiCWriter: Send + Sync + fmt::Debug {
    fn name(&self) -> &'static str;

    /// Writes one entry. The writer appends the line terminator.
    fn write(&self, entry: &str) -> io::Result<()>;

    fn flush(&self) -> io::Result<()>;

    /// Flushes and releases the underlying resources. A later write opens
    /// them again.
    fn close(&self) -> io::Result<()>;
}
