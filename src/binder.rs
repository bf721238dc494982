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

//! # Property Binder Module
//!
//! Turns a node of the configuration key tree into a [`ZiCResolvedComponent`]:
//! the chosen plugin descriptor plus every property converted to its declared
//! kind. Plugin-valued properties are bound recursively.
//!
//! ## Key Layout
//!
//! For a plugin selected at key `K` with symbolic name `N`:
//!
//! - facility level (`tinylog.writer = rollingfile`): properties sit directly
//!   below `K` (`tinylog.writer.file`)
//! - nested level (`tinylog.writer.labeler = count`): properties sit below
//!   `K.N` (`tinylog.writer.labeler.count.max`)
//!
//! A value of the form `N: argument` binds `argument` to the plugin's
//! shorthand property.
//!
//! Binding is pure. Constructing the actual plugin objects happens later in
//! [`ZiCResolvedComponent::ZiFInstantiate`], so the same configuration can be
//! bound and compared any number of times.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use crate::config::ZiCConfigNode;
use crate::convert::ZiFConvert;
use crate::errors::{Result, ZiError};
use crate::labelers::ZiCLabeler;
use crate::policies::ZiCPolicy;
use crate::registry::{
    ZiCCapability, ZiCPluginDescriptor, ZiCPluginInstance, ZiCPluginRegistry,
    ZiCPropertyDescriptor, ZiCPropertyKind,
};

/// A property value converted to its declared kind.
#[derive(Clone, Debug, PartialEq)]
pub enum ZiCPropertyValue {
    Text(String),
    Integer(i64),
    Boolean(bool),
    Duration(Duration),
    ByteSize(u64),
    Path(PathBuf),
    DatePattern(String),
    Plugin(Box<ZiCResolvedComponent>),
}

/// A bound plugin: descriptor, the key it was configured at, and its
/// converted properties. Nested plugins are owned, never shared.
#[derive(Clone, Debug, PartialEq)]
pub struct ZiCResolvedComponent {
    pub key: String,
    pub descriptor: Arc<ZiCPluginDescriptor>,
    pub properties: BTreeMap<String, ZiCPropertyValue>,
}

impl ZiCResolvedComponent {
    #[allow(non_snake_case)]
    pub fn ZiFName(&self) -> &str {
        &self.descriptor.name
    }

    #[allow(non_snake_case)]
    pub fn ZiFCapability(&self) -> ZiCCapability {
        self.descriptor.capability
    }

    #[allow(non_snake_case)]
    pub fn ZiFProperty(&self, name: &str) -> Option<&ZiCPropertyValue> {
        self.properties.get(name)
    }

    #[allow(non_snake_case)]
    pub fn ZiFNested(&self, name: &str) -> Option<&ZiCResolvedComponent> {
        match self.properties.get(name) {
            Some(ZiCPropertyValue::Plugin(component)) => Some(component.as_ref()),
            _ => None,
        }
    }

    /// Runs the descriptor's factory, instantiating nested plugins on demand.
    #[allow(non_snake_case)]
    pub fn ZiFInstantiate(&self) -> Result<ZiCPluginInstance> {
        let reader = ZiCPropertyReader { component: self };
        let instance = (self.descriptor.factory)(&reader)?;
        if instance.capability() != self.descriptor.capability {
            return Err(ZiError::registry(
                &self.descriptor.identifier,
                format!(
                    "factory built a {} where a {} was declared",
                    instance.capability(),
                    self.descriptor.capability
                ),
            ));
        }
        Ok(instance)
    }
}

/// Typed read access to a component's properties, handed to factories.
#[derive(Debug)]
pub struct ZiCPropertyReader<'a> {
    component: &'a ZiCResolvedComponent,
}

impl<'a> ZiCPropertyReader<'a> {
    /// Full configuration key of a property, for factory-side validation errors.
    #[allow(non_snake_case)]
    pub fn ZiFKey(&self, name: &str) -> String {
        format!("{}.{}", self.component.key, name)
    }

    #[allow(non_snake_case)]
    pub fn ZiFText(&self, name: &str) -> Option<&'a str> {
        match self.component.properties.get(name) {
            Some(ZiCPropertyValue::Text(v)) => Some(v.as_str()),
            _ => None,
        }
    }

    #[allow(non_snake_case)]
    pub fn ZiFInteger(&self, name: &str) -> Option<i64> {
        match self.component.properties.get(name) {
            Some(ZiCPropertyValue::Integer(v)) => Some(*v),
            _ => None,
        }
    }

    #[allow(non_snake_case)]
    pub fn ZiFBoolean(&self, name: &str) -> Option<bool> {
        match self.component.properties.get(name) {
            Some(ZiCPropertyValue::Boolean(v)) => Some(*v),
            _ => None,
        }
    }

    #[allow(non_snake_case)]
    pub fn ZiFDuration(&self, name: &str) -> Option<Duration> {
        match self.component.properties.get(name) {
            Some(ZiCPropertyValue::Duration(v)) => Some(*v),
            _ => None,
        }
    }

    #[allow(non_snake_case)]
    pub fn ZiFByteSize(&self, name: &str) -> Option<u64> {
        match self.component.properties.get(name) {
            Some(ZiCPropertyValue::ByteSize(v)) => Some(*v),
            _ => None,
        }
    }

    #[allow(non_snake_case)]
    pub fn ZiFPath(&self, name: &str) -> Option<&'a Path> {
        match self.component.properties.get(name) {
            Some(ZiCPropertyValue::Path(v)) => Some(v.as_path()),
            _ => None,
        }
    }

    #[allow(non_snake_case)]
    pub fn ZiFDatePattern(&self, name: &str) -> Option<&'a str> {
        match self.component.properties.get(name) {
            Some(ZiCPropertyValue::DatePattern(v)) => Some(v.as_str()),
            _ => None,
        }
    }

    /// Integer property that must be at least `min`.
    #[allow(non_snake_case)]
    pub fn ZiFIntegerAtLeast(&self, name: &str, min: i64) -> Result<Option<i64>> {
        match self.ZiFInteger(name) {
            Some(v) if v < min => Err(ZiError::conversion(
                self.ZiFKey(name),
                format!("integer >= {}", min),
                v.to_string(),
            )),
            other => Ok(other),
        }
    }

    /// Integer property that must lie within `min..=max`.
    #[allow(non_snake_case)]
    pub fn ZiFIntegerInRange(&self, name: &str, min: i64, max: i64) -> Result<Option<i64>> {
        match self.ZiFInteger(name) {
            Some(v) if v < min || v > max => Err(ZiError::conversion(
                self.ZiFKey(name),
                format!("integer in {}..={}", min, max),
                v.to_string(),
            )),
            other => Ok(other),
        }
    }

    #[allow(non_snake_case)]
    pub fn ZiFLabeler(&self, name: &str) -> Result<Option<Box<dyn ZiCLabeler>>> {
        match self.component.properties.get(name) {
            Some(ZiCPropertyValue::Plugin(nested)) => Ok(nested.ZiFInstantiate()?.into_labeler()),
            _ => Ok(None),
        }
    }

    #[allow(non_snake_case)]
    pub fn ZiFPolicy(&self, name: &str) -> Result<Option<Box<dyn ZiCPolicy>>> {
        match self.component.properties.get(name) {
            Some(ZiCPropertyValue::Plugin(nested)) => Ok(nested.ZiFInstantiate()?.into_policy()),
            _ => Ok(None),
        }
    }
}

/// Binds configuration subtrees against the plugins of one registry.
#[derive(Debug, Clone, Copy)]
pub struct ZiCPropertyBinder<'r> {
    registry: &'r ZiCPluginRegistry,
}

impl<'r> ZiCPropertyBinder<'r> {
    #[allow(non_snake_case)]
    pub fn ZiFNew(registry: &'r ZiCPluginRegistry) -> Self {
        ZiCPropertyBinder { registry }
    }

    /// Binds a facility node such as `tinylog.writer`: its value names the
    /// plugin and its children are the plugin's properties.
    #[allow(non_snake_case)]
    pub fn ZiFBindFacility(
        &self,
        capability: ZiCCapability,
        node: &ZiCConfigNode,
    ) -> Result<ZiCResolvedComponent> {
        let (descriptor, argument) = self.select(capability, node)?;
        self.ZiFBind(descriptor, node.ZiFKey(), Some(node), argument)
    }

    /// Binds `descriptor` using the properties found below `supplied`.
    ///
    /// `argument` is an inline shorthand value. Unknown keys below
    /// `supplied` are rejected before required properties are checked, so a
    /// misspelt key is reported as such rather than as a missing property.
    #[allow(non_snake_case)]
    pub fn ZiFBind(
        &self,
        descriptor: Arc<ZiCPluginDescriptor>,
        key: &str,
        supplied: Option<&ZiCConfigNode>,
        argument: Option<&str>,
    ) -> Result<ZiCResolvedComponent> {
        if let Some(node) = supplied {
            for (name, child) in node.ZiFChildren() {
                if descriptor.ZiFGetProperty(name).is_none() {
                    return Err(ZiError::unknown_property(child.ZiFFirstValuedKey()));
                }
            }
        }

        let shorthand = match argument {
            Some(raw) => match &descriptor.shorthand {
                Some(name) => Some((name.as_str(), raw)),
                None => {
                    return Err(ZiError::conversion(
                        key,
                        format!("{} '{}' without argument", descriptor.capability, descriptor.name),
                        raw,
                    ))
                }
            },
            None => None,
        };

        let mut properties = BTreeMap::new();
        for property in &descriptor.properties {
            let child = supplied.and_then(|node| node.ZiFChild(&property.name));
            let property_key = match child {
                Some(child) => child.ZiFKey().to_string(),
                None => format!("{}.{}", key, property.name),
            };
            let inline = shorthand
                .filter(|(name, _)| *name == property.name)
                .map(|(_, raw)| raw);
            if let Some(value) = self.bind_property(property, &property_key, child, inline)? {
                properties.insert(property.name.clone(), value);
            }
        }

        log::debug!(
            "bound {} '{}' at '{}' with {} properties",
            descriptor.capability,
            descriptor.name,
            key,
            properties.len()
        );
        Ok(ZiCResolvedComponent {
            key: key.to_string(),
            descriptor,
            properties,
        })
    }

    fn bind_property(
        &self,
        property: &ZiCPropertyDescriptor,
        key: &str,
        node: Option<&ZiCConfigNode>,
        inline: Option<&str>,
    ) -> Result<Option<ZiCPropertyValue>> {
        let configured = node.and_then(|n| n.ZiFValue());
        let raw = match (configured, inline) {
            (Some(_), Some(_)) => {
                return Err(ZiError::ambiguous(
                    key,
                    "value given both inline and as its own key",
                ))
            }
            (Some(v), None) | (None, Some(v)) => Some(v),
            (None, None) => None,
        };

        match property.kind {
            ZiCPropertyKind::Plugin(capability) => match (raw, node) {
                (Some(_), Some(node)) => self.bind_nested(capability, node).map(Some),
                (None, Some(node)) if node.ZiFChildren().next().is_some() => {
                    // Sub-properties without a plugin name to attach them to.
                    Err(ZiError::unknown_property(node.ZiFFirstValuedKey()))
                }
                _ => match &property.default {
                    Some(default) => {
                        let orphan = ZiCConfigNode::ZiFNew(key);
                        let (descriptor, argument) =
                            self.select_named(capability, &orphan, default)?;
                        let nested_key = orphan.ZiFChildKey(&descriptor.name);
                        self.ZiFBind(descriptor, &nested_key, None, argument)
                            .map(|c| Some(ZiCPropertyValue::Plugin(Box::new(c))))
                    }
                    None if property.optional => Ok(None),
                    None => Err(ZiError::missing_property(key, property.kind.expected())),
                },
            },
            kind => {
                if let Some(node) = node {
                    if let Some((_, child)) = node.ZiFChildren().next() {
                        return Err(ZiError::unknown_property(child.ZiFFirstValuedKey()));
                    }
                }
                match raw.or(property.default.as_deref()) {
                    Some(raw) => ZiFConvert(key, kind, raw).map(Some),
                    None if property.optional => Ok(None),
                    None => Err(ZiError::missing_property(key, kind.expected())),
                }
            }
        }
    }

    /// Binds a plugin-valued property node: `node` holds `name[: arg]` and the
    /// plugin's own properties sit below `node.name`.
    fn bind_nested(
        &self,
        capability: ZiCCapability,
        node: &ZiCConfigNode,
    ) -> Result<ZiCPropertyValue> {
        let (descriptor, argument) = self.select(capability, node)?;
        for (name, child) in node.ZiFChildren() {
            if name != descriptor.name {
                return Err(ZiError::unknown_property(child.ZiFFirstValuedKey()));
            }
        }
        let scope_key = node.ZiFChildKey(&descriptor.name);
        let scope = node.ZiFChild(&descriptor.name);
        let component = self.ZiFBind(descriptor, &scope_key, scope, argument)?;
        Ok(ZiCPropertyValue::Plugin(Box::new(component)))
    }

    fn select<'n>(
        &self,
        capability: ZiCCapability,
        node: &'n ZiCConfigNode,
    ) -> Result<(Arc<ZiCPluginDescriptor>, Option<&'n str>)> {
        let value = node.ZiFValue().ok_or_else(|| {
            ZiError::missing_property(node.ZiFKey(), format!("{} name", capability))
        })?;
        self.select_named(capability, node, value)
    }

    fn select_named<'v>(
        &self,
        capability: ZiCCapability,
        node: &ZiCConfigNode,
        value: &'v str,
    ) -> Result<(Arc<ZiCPluginDescriptor>, Option<&'v str>)> {
        let (name, argument) = match value.split_once(':') {
            Some((name, argument)) => (name.trim(), Some(argument.trim())),
            None => (value.trim(), None),
        };
        let argument = argument.filter(|a| !a.is_empty());
        let descriptor = self
            .registry
            .ZiFLookup(capability, name)
            .ok_or_else(|| ZiError::unknown_plugin(node.ZiFKey(), capability, name))?;
        Ok((descriptor, argument))
    }
}
