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

//! # Configuration Assembler Module
//!
//! Splits a raw configuration into its writer facility instances, binds each
//! one, and hands the result to a [`ZiCConfigurator`] that swaps complete
//! writer sets in and out.
//!
//! ## Facility Indices
//!
//! Writers are configured as `tinylog.writer`, `tinylog.writer2`,
//! `tinylog.writer3`, ... The unsuffixed key is index 1 (`writer1` is an
//! alias for it). Indices must be contiguous from 1; a gap fails the whole
//! assembly instead of silently dropping a writer.
//!
//! Keys under the root prefix that are not writer keys (`tinylog.level`,
//! `tinylog.format`, ...) belong to the logging front end and are kept
//! untouched in [`ZiCConfiguration::extras`].

use std::collections::BTreeMap;
use std::num::ParseIntError;
use std::sync::{Arc, RwLock};

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::binder::{ZiCPropertyBinder, ZiCResolvedComponent};
use crate::config::{ZiCConfigNode, ZiCRawConfiguration};
use crate::errors::{Result, ZiError};
use crate::registry::{ZiCCapability, ZiCPluginRegistry};
use crate::writers::ZiCWriter;

/// Where the assembler looks for writers.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ZiCAssemblyOptions {
    /// Root prefix of every key, `tinylog` by default.
    pub prefix: String,
    /// Facility name of writers below the prefix, `writer` by default.
    pub writer_facility: String,
}

impl Default for ZiCAssemblyOptions {
    fn default() -> Self {
        ZiCAssemblyOptions {
            prefix: "tinylog".to_string(),
            writer_facility: "writer".to_string(),
        }
    }
}

#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct ZiCAssemblyOptionsBuilder {
    pub prefix: Option<String>,
    pub writer_facility: Option<String>,
}

impl ZiCAssemblyOptionsBuilder {
    #[allow(non_snake_case)]
    pub fn ZiFBuild(self) -> ZiCAssemblyOptions {
        let base = ZiCAssemblyOptions::default();
        ZiCAssemblyOptions {
            prefix: self.prefix.unwrap_or(base.prefix),
            writer_facility: self.writer_facility.unwrap_or(base.writer_facility),
        }
    }

    #[allow(non_snake_case)]
    pub fn ZiFFromJson(value: &Value) -> Result<ZiCAssemblyOptions> {
        let builder: ZiCAssemblyOptionsBuilder = serde_json::from_value(value.clone())?;
        Ok(builder.ZiFBuild())
    }
}

/// Result of assembling a raw configuration: bound writers in configuration
/// order plus the keys the assembler does not own.
#[derive(Clone, Debug, PartialEq)]
pub struct ZiCConfiguration {
    pub writers: Vec<ZiCResolvedComponent>,
    pub extras: ZiCRawConfiguration,
}

impl ZiCConfiguration {
    /// Instantiates every writer, in order.
    #[allow(non_snake_case)]
    pub fn ZiFCreateWriters(&self) -> Result<Vec<Box<dyn ZiCWriter>>> {
        self.writers
            .iter()
            .map(|component| {
                component.ZiFInstantiate()?.into_writer().ok_or_else(|| {
                    ZiError::assembly(format!("'{}' did not produce a writer", component.key))
                })
            })
            .collect()
    }
}

#[derive(Debug, Clone)]
pub struct ZiCConfigurationAssembler<'r> {
    registry: &'r ZiCPluginRegistry,
    options: ZiCAssemblyOptions,
}

impl<'r> ZiCConfigurationAssembler<'r> {
    #[allow(non_snake_case)]
    pub fn ZiFNew(registry: &'r ZiCPluginRegistry) -> Self {
        ZiCConfigurationAssembler {
            registry,
            options: ZiCAssemblyOptions::default(),
        }
    }

    #[allow(non_snake_case)]
    pub fn ZiFWithOptions(registry: &'r ZiCPluginRegistry, options: ZiCAssemblyOptions) -> Self {
        ZiCConfigurationAssembler { registry, options }
    }

    #[allow(non_snake_case)]
    pub fn ZiFAssemble(&self, raw: &ZiCRawConfiguration) -> Result<ZiCConfiguration> {
        let root = raw.ZiFTree(&self.options.prefix)?;
        let instances = self.writer_instances(&root)?;

        let binder = ZiCPropertyBinder::ZiFNew(self.registry);
        let writers = instances
            .into_iter()
            .map(|node| binder.ZiFBindFacility(ZiCCapability::Writer, node))
            .collect::<Result<Vec<_>>>()?;

        let mut extras = ZiCRawConfiguration::ZiFNew();
        for (key, value) in raw.ZiFEntries() {
            if !self.is_writer_key(key) {
                extras.ZiFSet(key, value);
            }
        }

        log::info!(
            "assembled {} writer(s) from {} configuration keys",
            writers.len(),
            raw.len()
        );
        Ok(ZiCConfiguration { writers, extras })
    }

    /// Writer nodes ordered by index, checked for duplicates and gaps.
    fn writer_instances<'n>(&self, root: &'n ZiCConfigNode) -> Result<Vec<&'n ZiCConfigNode>> {
        let mut indexed: BTreeMap<u64, &'n ZiCConfigNode> = BTreeMap::new();
        for (name, node) in root.ZiFChildren() {
            let index = self.facility_index(name).map_err(|_| {
                ZiError::assembly(format!("'{}' has an invalid writer index", node.ZiFKey()))
            })?;
            let Some(index) = index else {
                continue;
            };
            if let Some(previous) = indexed.insert(index, node) {
                return Err(ZiError::assembly(format!(
                    "'{}' and '{}' both configure writer {}",
                    previous.ZiFKey(),
                    node.ZiFKey(),
                    index
                )));
            }
        }
        for (position, (index, node)) in indexed.iter().enumerate() {
            let expected = position as u64 + 1;
            if *index != expected {
                return Err(ZiError::assembly(format!(
                    "'{}' has no predecessor: writer {} is not configured",
                    node.ZiFKey(),
                    expected
                )));
            }
        }
        Ok(indexed.into_values().collect())
    }

    /// Index of a first-level key segment, if it names a writer. A numeric
    /// suffix too large for an index is an error, never a non-writer key.
    fn facility_index(&self, segment: &str) -> std::result::Result<Option<u64>, ParseIntError> {
        let Some(suffix) = segment.strip_prefix(self.options.writer_facility.as_str()) else {
            return Ok(None);
        };
        if suffix.is_empty() {
            return Ok(Some(1));
        }
        if suffix.bytes().all(|b| b.is_ascii_digit()) {
            return suffix.parse().map(Some);
        }
        Ok(None)
    }

    fn is_writer_key(&self, key: &str) -> bool {
        let rest = if self.options.prefix.is_empty() {
            key
        } else {
            match key
                .strip_prefix(self.options.prefix.as_str())
                .and_then(|r| r.strip_prefix('.'))
            {
                Some(rest) => rest,
                None => return false,
            }
        };
        let segment = rest.split('.').next().unwrap_or_default().trim();
        matches!(self.facility_index(segment), Ok(Some(_)) | Err(_))
    }
}

/// Writers built from one configuration, ready to receive entries.
#[derive(Debug)]
pub struct ZiCActiveConfiguration {
    pub configuration: ZiCConfiguration,
    pub writers: Vec<Box<dyn ZiCWriter>>,
}

/// Holds the active writer set and replaces it atomically on
/// reconfiguration. Readers never observe a half-built set.
#[derive(Debug)]
pub struct ZiCConfigurator {
    registry: Arc<ZiCPluginRegistry>,
    options: ZiCAssemblyOptions,
    active: RwLock<Arc<ZiCActiveConfiguration>>,
}

impl ZiCConfigurator {
    /// Assembles and instantiates `raw`; fails without side effects on any
    /// configuration error.
    #[allow(non_snake_case)]
    pub fn ZiFNew(
        registry: Arc<ZiCPluginRegistry>,
        options: ZiCAssemblyOptions,
        raw: &ZiCRawConfiguration,
    ) -> Result<Self> {
        let active = Self::build(&registry, &options, raw)?;
        Ok(ZiCConfigurator {
            registry,
            options,
            active: RwLock::new(Arc::new(active)),
        })
    }

    /// Uses the process wide registry and default options.
    #[allow(non_snake_case)]
    pub fn ZiFFromRaw(raw: &ZiCRawConfiguration) -> Result<Self> {
        ZiCConfigurator::ZiFNew(ZiCPluginRegistry::ZiFGlobal()?, ZiCAssemblyOptions::default(), raw)
    }

    fn build(
        registry: &ZiCPluginRegistry,
        options: &ZiCAssemblyOptions,
        raw: &ZiCRawConfiguration,
    ) -> Result<ZiCActiveConfiguration> {
        let configuration =
            ZiCConfigurationAssembler::ZiFWithOptions(registry, options.clone()).ZiFAssemble(raw)?;
        let writers = configuration.ZiFCreateWriters()?;
        Ok(ZiCActiveConfiguration {
            configuration,
            writers,
        })
    }

    #[allow(non_snake_case)]
    pub fn ZiFCurrent(&self) -> Arc<ZiCActiveConfiguration> {
        match self.active.read() {
            Ok(guard) => Arc::clone(&guard),
            Err(poisoned) => Arc::clone(&poisoned.into_inner()),
        }
    }

    /// Builds the new writer set off to the side, swaps it in, then closes
    /// the writers it replaced. On error the current set stays active.
    #[allow(non_snake_case)]
    pub fn ZiFReconfigure(&self, raw: &ZiCRawConfiguration) -> Result<()> {
        let next = Arc::new(Self::build(&self.registry, &self.options, raw)?);
        let previous = {
            let mut guard = self
                .active
                .write()
                .unwrap_or_else(|poisoned| poisoned.into_inner());
            std::mem::replace(&mut *guard, next)
        };
        for writer in &previous.writers {
            if let Err(err) = writer.close() {
                log::warn!("closing replaced {} writer failed: {}", writer.name(), err);
            }
        }
        log::info!("configuration replaced");
        Ok(())
    }

    /// Sends one rendered entry to every writer in configuration order.
    /// Every writer is attempted; the first failure is returned.
    #[allow(non_snake_case)]
    pub fn ZiFWrite(&self, entry: &str) -> std::io::Result<()> {
        let active = self.ZiFCurrent();
        let mut first_error = None;
        for writer in &active.writers {
            if let Err(err) = writer.write(entry) {
                log::warn!("{} writer failed: {}", writer.name(), err);
                first_error.get_or_insert(err);
            }
        }
        match first_error {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }

    #[allow(non_snake_case)]
    pub fn ZiFFlush(&self) -> std::io::Result<()> {
        for writer in &self.ZiFCurrent().writers {
            writer.flush()?;
        }
        Ok(())
    }
}
