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

//! # Plugin Registry Module
//!
//! This module maps symbolic plugin names (`count`, `timestamp`, `rollingfile`)
//! to the descriptors used to construct them.
//!
//! ## Registry Operations
//!
//! - Describe a plugin with its capability, typed properties and factory
//! - Collect implementations in a [`ZiCPluginCatalog`] keyed by identifier
//! - Select catalog entries through line oriented service sources
//! - Resolve `(capability, symbolic name)` pairs at binding time
//!
//! ## Service Sources
//!
//! A service source lists one implementation identifier per line for a single
//! capability. Blank lines and lines starting with `#` are ignored:
//!
//! ```text
//! # zilog.labelers
//! zilog::labelers::ZiCCountLabeler
//! zilog::labelers::ZiCTimestampLabeler
//! ```
//!
//! The built-in sources live in `resources/services/` and are embedded at
//! compile time. The process wide registry is built from them exactly once.

use std::collections::hash_map::Entry;
use std::collections::{HashMap, HashSet};
use std::fmt;
use std::fs;
use std::path::Path;
use std::sync::{Arc, OnceLock};

use serde::{Deserialize, Serialize};

use crate::binder::ZiCPropertyReader;
use crate::errors::{Result, ZiError};
use crate::labelers::{self, ZiCLabeler};
use crate::policies::{self, ZiCPolicy};
use crate::writers::{self, ZiCWriter};

/// Abstract role a plugin fulfills.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ZiCCapability {
    Writer,
    Labeler,
    Policy,
}

impl ZiCCapability {
    pub const ALL: [ZiCCapability; 3] = [
        ZiCCapability::Writer,
        ZiCCapability::Labeler,
        ZiCCapability::Policy,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ZiCCapability::Writer => "writer",
            ZiCCapability::Labeler => "labeler",
            ZiCCapability::Policy => "policy",
        }
    }

    /// Logical location of the service source listing this capability.
    pub fn service_file(&self) -> &'static str {
        match self {
            ZiCCapability::Writer => "zilog.writers",
            ZiCCapability::Labeler => "zilog.labelers",
            ZiCCapability::Policy => "zilog.policies",
        }
    }
}

impl fmt::Display for ZiCCapability {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Declared type of a plugin property.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ZiCPropertyKind {
    Text,
    Integer,
    Boolean,
    /// `500ms`, `30s`, `5m`, `2h`, `1d`; a bare number counts seconds.
    Duration,
    /// `512`, `10KB`, `5 MB`, `1GB` with binary multiples.
    ByteSize,
    Path,
    /// chrono strftime pattern used to format timestamps.
    DatePattern,
    /// Nested plugin resolved through the registry.
    Plugin(ZiCCapability),
}

impl ZiCPropertyKind {
    /// Human readable description used in error messages.
    pub fn expected(&self) -> String {
        match self {
            ZiCPropertyKind::Text => "text".to_string(),
            ZiCPropertyKind::Integer => "integer".to_string(),
            ZiCPropertyKind::Boolean => "boolean (true or false)".to_string(),
            ZiCPropertyKind::Duration => "duration such as 30s, 5m or 1d".to_string(),
            ZiCPropertyKind::ByteSize => "size such as 512, 10KB or 5MB".to_string(),
            ZiCPropertyKind::Path => "file path".to_string(),
            ZiCPropertyKind::DatePattern => "date pattern such as %Y-%m-%d".to_string(),
            ZiCPropertyKind::Plugin(capability) => format!("{} name", capability),
        }
    }

    pub fn is_plugin(&self) -> bool {
        matches!(self, ZiCPropertyKind::Plugin(_))
    }
}

/// One named, typed configuration input accepted by a plugin.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ZiCPropertyDescriptor {
    pub name: String,
    pub kind: ZiCPropertyKind,
    pub optional: bool,
    /// Raw value applied when the property is not configured.
    pub default: Option<String>,
}

impl ZiCPropertyDescriptor {
    #[allow(non_snake_case)]
    pub fn ZiFRequired(name: impl Into<String>, kind: ZiCPropertyKind) -> Self {
        ZiCPropertyDescriptor {
            name: name.into(),
            kind,
            optional: false,
            default: None,
        }
    }

    #[allow(non_snake_case)]
    pub fn ZiFOptional(name: impl Into<String>, kind: ZiCPropertyKind) -> Self {
        ZiCPropertyDescriptor {
            name: name.into(),
            kind,
            optional: true,
            default: None,
        }
    }

    #[allow(non_snake_case)]
    pub fn ZiFWithDefault(mut self, raw: impl Into<String>) -> Self {
        self.default = Some(raw.into());
        self
    }
}

/// Constructs a plugin instance from its bound properties.
pub type ZiFPluginFactory = fn(&ZiCPropertyReader<'_>) -> Result<ZiCPluginInstance>;

/// Everything the binder needs to know about one plugin implementation.
#[derive(Clone)]
pub struct ZiCPluginDescriptor {
    pub capability: ZiCCapability,
    /// Symbolic name used in configuration.
    pub name: String,
    /// Implementation identifier referenced by service sources.
    pub identifier: String,
    pub properties: Vec<ZiCPropertyDescriptor>,
    /// Property receiving an inline `name: argument` value.
    pub shorthand: Option<String>,
    pub factory: ZiFPluginFactory,
}

impl fmt::Debug for ZiCPluginDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ZiCPluginDescriptor")
            .field("capability", &self.capability)
            .field("name", &self.name)
            .field("identifier", &self.identifier)
            .field("properties", &self.properties)
            .field("shorthand", &self.shorthand)
            .finish()
    }
}

impl PartialEq for ZiCPluginDescriptor {
    fn eq(&self, other: &Self) -> bool {
        self.capability == other.capability
            && self.name == other.name
            && self.identifier == other.identifier
    }
}

impl ZiCPluginDescriptor {
    #[allow(non_snake_case)]
    pub fn ZiFNew(
        capability: ZiCCapability,
        name: impl Into<String>,
        identifier: impl Into<String>,
        factory: ZiFPluginFactory,
    ) -> Self {
        ZiCPluginDescriptor {
            capability,
            name: name.into(),
            identifier: identifier.into(),
            properties: Vec::new(),
            shorthand: None,
            factory,
        }
    }

    #[allow(non_snake_case)]
    pub fn ZiFProperty(mut self, property: ZiCPropertyDescriptor) -> Self {
        self.properties.push(property);
        self
    }

    #[allow(non_snake_case)]
    pub fn ZiFShorthand(mut self, property: impl Into<String>) -> Self {
        self.shorthand = Some(property.into());
        self
    }

    #[allow(non_snake_case)]
    pub fn ZiFGetProperty(&self, name: &str) -> Option<&ZiCPropertyDescriptor> {
        self.properties.iter().find(|p| p.name == name)
    }

    /// Checks the descriptor's own invariants: unique property names and a
    /// shorthand that targets a declared primitive property.
    #[allow(non_snake_case)]
    pub fn ZiFValidate(&self) -> Result<()> {
        let mut seen = HashSet::new();
        for property in &self.properties {
            if !seen.insert(property.name.as_str()) {
                return Err(ZiError::registry(
                    &self.identifier,
                    format!("property '{}' declared twice", property.name),
                ));
            }
        }
        if let Some(shorthand) = &self.shorthand {
            match self.ZiFGetProperty(shorthand) {
                Some(p) if !p.kind.is_plugin() => {}
                Some(_) => {
                    return Err(ZiError::registry(
                        &self.identifier,
                        format!("shorthand property '{}' must not be a plugin", shorthand),
                    ))
                }
                None => {
                    return Err(ZiError::registry(
                        &self.identifier,
                        format!("shorthand property '{}' is not declared", shorthand),
                    ))
                }
            }
        }
        Ok(())
    }
}

/// A constructed plugin. The variant fixes the capability it implements.
#[derive(Debug)]
pub enum ZiCPluginInstance {
    Writer(Box<dyn ZiCWriter>),
    Labeler(Box<dyn ZiCLabeler>),
    Policy(Box<dyn ZiCPolicy>),
}

impl ZiCPluginInstance {
    pub fn capability(&self) -> ZiCCapability {
        match self {
            ZiCPluginInstance::Writer(_) => ZiCCapability::Writer,
            ZiCPluginInstance::Labeler(_) => ZiCCapability::Labeler,
            ZiCPluginInstance::Policy(_) => ZiCCapability::Policy,
        }
    }

    pub fn into_writer(self) -> Option<Box<dyn ZiCWriter>> {
        match self {
            ZiCPluginInstance::Writer(writer) => Some(writer),
            _ => None,
        }
    }

    pub fn into_labeler(self) -> Option<Box<dyn ZiCLabeler>> {
        match self {
            ZiCPluginInstance::Labeler(labeler) => Some(labeler),
            _ => None,
        }
    }

    pub fn into_policy(self) -> Option<Box<dyn ZiCPolicy>> {
        match self {
            ZiCPluginInstance::Policy(policy) => Some(policy),
            _ => None,
        }
    }
}

/// Every implementation compiled into the process, keyed by identifier.
#[derive(Clone, Debug, Default)]
pub struct ZiCPluginCatalog {
    entries: HashMap<String, ZiCPluginDescriptor>,
}

impl ZiCPluginCatalog {
    #[allow(non_snake_case)]
    pub fn ZiFNew() -> Self {
        ZiCPluginCatalog {
            entries: HashMap::new(),
        }
    }

    /// Catalog holding the writers, labelers and policies shipped with Zilog.
    #[allow(non_snake_case)]
    pub fn ZiFBuiltin() -> Self {
        let mut catalog = ZiCPluginCatalog::ZiFNew();
        catalog.ZiFInsert(writers::null::ZiFDescriptor());
        catalog.ZiFInsert(writers::rolling::ZiFDescriptor());
        catalog.ZiFInsert(labelers::count::ZiFDescriptor());
        catalog.ZiFInsert(labelers::timestamp::ZiFDescriptor());
        catalog.ZiFInsert(labelers::process::ZiFDescriptor());
        catalog.ZiFInsert(policies::size::ZiFDescriptor());
        catalog.ZiFInsert(policies::count::ZiFDescriptor());
        catalog.ZiFInsert(policies::startup::ZiFDescriptor());
        catalog.ZiFInsert(policies::interval::ZiFDescriptor());
        catalog
    }

    #[allow(non_snake_case)]
    pub fn ZiFInsert(&mut self, descriptor: ZiCPluginDescriptor) {
        self.entries.insert(descriptor.identifier.clone(), descriptor);
    }

    #[allow(non_snake_case)]
    pub fn ZiFGet(&self, identifier: &str) -> Option<&ZiCPluginDescriptor> {
        self.entries.get(identifier)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Parsed content of one service source.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ZiCServiceSource {
    /// Where the text came from, used in error messages.
    pub origin: String,
    pub capability: ZiCCapability,
    pub identifiers: Vec<String>,
}

const BUILTIN_WRITERS: &str = include_str!("../resources/services/zilog.writers");
const BUILTIN_LABELERS: &str = include_str!("../resources/services/zilog.labelers");
const BUILTIN_POLICIES: &str = include_str!("../resources/services/zilog.policies");

impl ZiCServiceSource {
    #[allow(non_snake_case)]
    pub fn ZiFParse(origin: impl Into<String>, capability: ZiCCapability, text: &str) -> Self {
        let identifiers = text
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty() && !line.starts_with('#'))
            .map(str::to_string)
            .collect();
        ZiCServiceSource {
            origin: origin.into(),
            capability,
            identifiers,
        }
    }

    #[allow(non_snake_case)]
    pub fn ZiFBuiltin() -> Vec<ZiCServiceSource> {
        vec![
            ZiCServiceSource::ZiFParse("builtin:zilog.writers", ZiCCapability::Writer, BUILTIN_WRITERS),
            ZiCServiceSource::ZiFParse("builtin:zilog.labelers", ZiCCapability::Labeler, BUILTIN_LABELERS),
            ZiCServiceSource::ZiFParse("builtin:zilog.policies", ZiCCapability::Policy, BUILTIN_POLICIES),
        ]
    }

    /// Reads `<dir>/zilog.<capability>` for every capability that has one.
    #[allow(non_snake_case)]
    pub fn ZiFLoadDirectory(dir: &Path) -> Result<Vec<ZiCServiceSource>> {
        let mut sources = Vec::new();
        for capability in ZiCCapability::ALL {
            let path = dir.join(capability.service_file());
            if !path.is_file() {
                continue;
            }
            let text = fs::read_to_string(&path)?;
            sources.push(ZiCServiceSource::ZiFParse(
                path.display().to_string(),
                capability,
                &text,
            ));
        }
        Ok(sources)
    }
}

/// Registry mapping `(capability, symbolic name)` to plugin descriptors.
///
/// Built once and read-only afterwards; share it through an [`Arc`].
#[derive(Debug, Default)]
pub struct ZiCPluginRegistry {
    inner: HashMap<(ZiCCapability, String), Arc<ZiCPluginDescriptor>>,
}

static GLOBAL_REGISTRY: OnceLock<Result<Arc<ZiCPluginRegistry>>> = OnceLock::new();

impl ZiCPluginRegistry {
    #[allow(non_snake_case)]
    pub fn ZiFNew() -> Self {
        ZiCPluginRegistry {
            inner: HashMap::new(),
        }
    }

    /// Builds a registry from a catalog and the service sources selecting
    /// its entries. Sources are merged in order; a symbolic name seen twice
    /// for one capability fails the whole load.
    #[allow(non_snake_case)]
    pub fn ZiFLoad(catalog: &ZiCPluginCatalog, sources: &[ZiCServiceSource]) -> Result<Self> {
        let mut registry = ZiCPluginRegistry::ZiFNew();
        for source in sources {
            for identifier in &source.identifiers {
                let descriptor = catalog.ZiFGet(identifier).ok_or_else(|| {
                    ZiError::registry(
                        &source.origin,
                        format!("no implementation named '{}'", identifier),
                    )
                })?;
                if descriptor.capability != source.capability {
                    return Err(ZiError::registry(
                        &source.origin,
                        format!(
                            "'{}' is a {}, not a {}",
                            identifier, descriptor.capability, source.capability
                        ),
                    ));
                }
                registry.ZiFRegister(descriptor.clone())?;
            }
        }
        Ok(registry)
    }

    /// Process wide registry built from the built-in catalog and sources.
    #[allow(non_snake_case)]
    pub fn ZiFGlobal() -> Result<Arc<ZiCPluginRegistry>> {
        GLOBAL_REGISTRY
            .get_or_init(|| {
                ZiCPluginRegistry::ZiFLoad(
                    &ZiCPluginCatalog::ZiFBuiltin(),
                    &ZiCServiceSource::ZiFBuiltin(),
                )
                .map(Arc::new)
            })
            .clone()
    }

    #[allow(non_snake_case)]
    pub fn ZiFRegister(&mut self, descriptor: ZiCPluginDescriptor) -> Result<()> {
        descriptor.ZiFValidate()?;
        match self.inner.entry((descriptor.capability, descriptor.name.clone())) {
            Entry::Occupied(_) => Err(ZiError::DuplicatePlugin {
                capability: descriptor.capability,
                name: descriptor.name,
            }),
            Entry::Vacant(slot) => {
                log::debug!(
                    "registered {} '{}' -> {}",
                    descriptor.capability,
                    descriptor.name,
                    descriptor.identifier
                );
                slot.insert(Arc::new(descriptor));
                Ok(())
            }
        }
    }

    #[allow(non_snake_case)]
    pub fn ZiFLookup(&self, capability: ZiCCapability, name: &str) -> Option<Arc<ZiCPluginDescriptor>> {
        self.inner.get(&(capability, name.to_string())).cloned()
    }

    #[allow(non_snake_case)]
    pub fn ZiFResolve(&self, capability: ZiCCapability, name: &str) -> Result<Arc<ZiCPluginDescriptor>> {
        self.ZiFLookup(capability, name)
            .ok_or_else(|| ZiError::unknown_plugin(name, capability, name))
    }

    /// Registered symbolic names for a capability, sorted.
    #[allow(non_snake_case)]
    pub fn ZiFNames(&self, capability: ZiCCapability) -> Vec<&str> {
        let mut names: Vec<&str> = self
            .inner
            .keys()
            .filter(|(c, _)| *c == capability)
            .map(|(_, name)| name.as_str())
            .collect();
        names.sort_unstable();
        names
    }

    pub fn len(&self) -> usize {
        self.inner.len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }
}
