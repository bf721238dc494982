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


//! # Zilog Core Library
//!
//! Declarative plugin resolution and log file rotation for the Zi logging
//! stack. A flat `key = value` configuration names writers, labelers and
//! rotation policies by short name; this crate turns it into typed, fully
//! bound component trees and builds the writers from them.
//!
//! ## Module Overview
//!
//! - **errors**: ZiError, the single error type of every fallible operation
//! - **config**: raw configurations and their nested key tree
//! - **registry**: plugin descriptors, service sources and the registry
//! - **convert**: typed conversion of raw property values
//! - **binder**: recursive property binding into resolved components
//! - **assembler**: writer facilities, ordering and live reconfiguration
//! - **writers**: null and rolling file writers
//! - **labelers**: backup naming (count, timestamp, pid)
//! - **policies**: rotation triggers (size, count, startup, interval)
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use zilog::{ZiCConfigurator, ZiCRawConfiguration};
//!
//! let raw = ZiCRawConfiguration::ZiFNew()
//!     .ZiFWith("tinylog.writer", "rollingfile: logs/app.log")
//!     .ZiFWith("tinylog.writer.policy", "size: 10MB")
//!     .ZiFWith("tinylog.writer.labeler", "count: 5");
//!
//! let configurator = ZiCConfigurator::ZiFFromRaw(&raw)?;
//! configurator.ZiFWrite("service started")?;
//! ```
//!
//! ## Error Handling
//!
//! Configuration problems surface as `Result<T, ZiError>` and always name the
//! offending key. Writing and rotating return `std::io::Result` and leave the
//! error untouched.

#![allow(non_snake_case)]

pub mod errors;
pub mod config;
pub mod registry;
pub mod convert;
pub mod binder;
pub mod assembler;
pub mod writers;
pub mod labelers;
pub mod policies;

pub use errors::{Result, ZiError};
pub use config::{ZiCConfigNode, ZiCRawConfiguration};
pub use registry::{
    ZiCCapability, ZiCPluginCatalog, ZiCPluginDescriptor, ZiCPluginInstance, ZiCPluginRegistry,
    ZiCPropertyDescriptor, ZiCPropertyKind, ZiCServiceSource, ZiFPluginFactory,
};
pub use binder::{ZiCPropertyBinder, ZiCPropertyReader, ZiCPropertyValue, ZiCResolvedComponent};
pub use assembler::{
    ZiCActiveConfiguration, ZiCAssemblyOptions, ZiCAssemblyOptionsBuilder, ZiCConfiguration,
    ZiCConfigurationAssembler, ZiCConfigurator,
};
pub use writers::{ZiCNullWriter, ZiCRollingFileWriter, ZiCWriter};
pub use labelers::{ZiCCountLabeler, ZiCLabeler, ZiCProcessLabeler, ZiCTimestampLabeler};
pub use policies::{ZiCCountPolicy, ZiCIntervalPolicy, ZiCPolicy, ZiCSizePolicy, ZiCStartupPolicy};
