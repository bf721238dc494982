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

//! # Rotation Policies Module
//!
//! Policies tell the rolling file writer when the active file has to be
//! rotated. A writer consults its policy once when it opens an existing file
//! and once before every entry.
//!
//! ## Available Policies
//!
//! - `size`: rotate before the file would grow past a byte limit
//! - `count`: rotate after a number of entries
//! - `startup`: rotate a non-empty file when the writer starts
//! - `interval`: rotate once the file has been in use for a period

pub mod count;
pub mod interval;
pub mod size;
pub mod startup;

use std::fmt;
use std::io;
use std::path::Path;

pub use count::ZiCCountPolicy;
pub use interval::ZiCIntervalPolicy;
pub use size::ZiCSizePolicy;
pub use startup::ZiCStartupPolicy;

/// Rotation trigger consulted by the rolling file writer.
pub trait ZiCPolicy: Send + fmt::Debug {
    fn name(&self) -> &'static str;

    /// Called when the writer finds an existing file at startup. Returning
    /// `false` rotates it away before anything is written.
    fn continue_file(&mut self, path: &Path) -> io::Result<bool>;

    /// Called before each entry. Returning `false` rotates first; the entry is
    /// then offered again after [`reset`](ZiCPolicy::reset).
    fn continue_entry(&mut self, entry: &str) -> bool;

    /// Called once a fresh, empty file has been started.
    fn reset(&mut self);
}
