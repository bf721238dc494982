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

//! # Raw Configuration Module
//!
//! Flat dotted-key configuration as written by the configuration author, and
//! the nested key tree the binder walks.
//!
//! ## Sources
//!
//! - `.properties` text or files (`key = value`, `key: value`, `#` and `!`
//!   comments, backslash line continuation)
//! - JSON objects, where nested objects are joined into dotted keys
//! - Programmatic `ZiFSet` calls
//!
//! Setting a key twice replaces the value but keeps the original position.

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use serde_json::Value;

use crate::errors::{Result, ZiError};

/// Ordered mapping from dotted key to raw string value.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ZiCRawConfiguration {
    entries: Vec<(String, String)>,
}

impl ZiCRawConfiguration {
    #[allow(non_snake_case)]
    pub fn ZiFNew() -> Self {
        ZiCRawConfiguration {
            entries: Vec::new(),
        }
    }

    #[allow(non_snake_case)]
    pub fn ZiFSet(&mut self, key: impl Into<String>, value: impl Into<String>) -> &mut Self {
        let key = key.into();
        let value = value.into();
        match self.entries.iter_mut().find(|(k, _)| *k == key) {
            Some(entry) => entry.1 = value,
            None => self.entries.push((key, value)),
        }
        self
    }

    /// Builder style variant of [`ZiFSet`](Self::ZiFSet).
    #[allow(non_snake_case)]
    pub fn ZiFWith(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.ZiFSet(key, value);
        self
    }

    #[allow(non_snake_case)]
    pub fn ZiFGet(&self, key: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    #[allow(non_snake_case)]
    pub fn ZiFEntries(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Parses `.properties` text.
    #[allow(non_snake_case)]
    pub fn ZiFFromProperties(text: &str) -> Self {
        let mut config = ZiCRawConfiguration::ZiFNew();
        for line in logical_lines(text) {
            let trimmed = line.trim_start();
            if trimmed.is_empty() || trimmed.starts_with('#') || trimmed.starts_with('!') {
                continue;
            }
            let (key, value) = split_property(trimmed);
            if !key.is_empty() {
                config.ZiFSet(key, value);
            }
        }
        config
    }

    #[allow(non_snake_case)]
    pub fn ZiFLoadProperties(path: &Path) -> Result<Self> {
        let text = fs::read_to_string(path)?;
        Ok(ZiCRawConfiguration::ZiFFromProperties(&text))
    }

    /// Flattens a JSON object into dotted keys. Scalars are stringified and
    /// `null` leaves the key unset.
    #[allow(non_snake_case)]
    pub fn ZiFFromJson(value: &Value) -> Result<Self> {
        let object = value
            .as_object()
            .ok_or_else(|| ZiError::Serde("configuration must be a JSON object".to_string()))?;
        let mut config = ZiCRawConfiguration::ZiFNew();
        for (key, value) in object {
            flatten_json(&mut config, key, value)?;
        }
        Ok(config)
    }

    /// Builds the key tree for every key at or below `prefix`. An empty
    /// prefix takes every key.
    #[allow(non_snake_case)]
    pub fn ZiFTree(&self, prefix: &str) -> Result<ZiCConfigNode> {
        let mut root = ZiCConfigNode::ZiFNew(prefix);
        for (key, value) in &self.entries {
            let rest = if prefix.is_empty() {
                key.as_str()
            } else if key == prefix {
                root.value = normalize_value(value);
                continue;
            } else {
                match key.strip_prefix(prefix).and_then(|r| r.strip_prefix('.')) {
                    Some(rest) => rest,
                    None => continue,
                }
            };
            if rest.split('.').any(|segment| segment.trim().is_empty()) {
                return Err(ZiError::assembly(format!("malformed key '{}'", key)));
            }
            let mut node = &mut root;
            for segment in rest.split('.') {
                node = node.child_mut(segment.trim());
            }
            node.value = normalize_value(value);
        }
        Ok(root)
    }
}

fn normalize_value(raw: &str) -> Option<String> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}

fn flatten_json(config: &mut ZiCRawConfiguration, key: &str, value: &Value) -> Result<()> {
    match value {
        Value::Object(map) => {
            for (child, value) in map {
                flatten_json(config, &format!("{}.{}", key, child), value)?;
            }
        }
        Value::String(s) => {
            config.ZiFSet(key, s.clone());
        }
        Value::Number(n) => {
            config.ZiFSet(key, n.to_string());
        }
        Value::Bool(b) => {
            config.ZiFSet(key, b.to_string());
        }
        Value::Null => {}
        Value::Array(_) => {
            return Err(ZiError::conversion(key, "scalar or object", "array"));
        }
    }
    Ok(())
}

/// Joins physical lines ending in an odd number of backslashes.
fn logical_lines(text: &str) -> Vec<String> {
    let mut lines = Vec::new();
    let mut current = String::new();
    let mut continuing = false;
    for raw in text.lines() {
        let part = if continuing { raw.trim_start() } else { raw };
        let trailing = part.chars().rev().take_while(|c| *c == '\\').count();
        if trailing % 2 == 1 {
            current.push_str(&part[..part.len() - 1]);
            continuing = true;
        } else {
            current.push_str(part);
            lines.push(std::mem::take(&mut current));
            continuing = false;
        }
    }
    if continuing {
        lines.push(current);
    }
    lines
}

fn split_property(line: &str) -> (String, String) {
    let mut key = String::new();
    let mut chars = line.chars().peekable();
    while let Some(c) = chars.next() {
        match c {
            '\\' => {
                if let Some(escaped) = chars.next() {
                    key.push(unescape(escaped, &mut chars));
                }
            }
            '=' | ':' => break,
            c if c.is_whitespace() => {
                while matches!(chars.peek(), Some(c) if c.is_whitespace()) {
                    chars.next();
                }
                if matches!(chars.peek(), Some('=') | Some(':')) {
                    chars.next();
                }
                break;
            }
            c => key.push(c),
        }
    }
    while matches!(chars.peek(), Some(c) if c.is_whitespace()) {
        chars.next();
    }
    let mut value = String::new();
    while let Some(c) = chars.next() {
        if c == '\\' {
            if let Some(escaped) = chars.next() {
                value.push(unescape(escaped, &mut chars));
            }
        } else {
            value.push(c);
        }
    }
    (key, value)
}

fn unescape(c: char, chars: &mut std::iter::Peekable<std::str::Chars<'_>>) -> char {
    match c {
        't' => '\t',
        'n' => '\n',
        'r' => '\r',
        'f' => '\u{000C}',
        'u' => {
            let hex: String = (0..4).filter_map(|_| chars.next()).collect();
            u32::from_str_radix(&hex, 16)
                .ok()
                .and_then(char::from_u32)
                .unwrap_or('\u{FFFD}')
        }
        other => other,
    }
}

/// One node of the nested key space. `key` is the full dotted key.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ZiCConfigNode {
    key: String,
    value: Option<String>,
    children: BTreeMap<String, ZiCConfigNode>,
}

impl ZiCConfigNode {
    #[allow(non_snake_case)]
    pub fn ZiFNew(key: impl Into<String>) -> Self {
        ZiCConfigNode {
            key: key.into(),
            value: None,
            children: BTreeMap::new(),
        }
    }

    #[allow(non_snake_case)]
    pub fn ZiFKey(&self) -> &str {
        &self.key
    }

    #[allow(non_snake_case)]
    pub fn ZiFValue(&self) -> Option<&str> {
        self.value.as_deref()
    }

    #[allow(non_snake_case)]
    pub fn ZiFChild(&self, name: &str) -> Option<&ZiCConfigNode> {
        self.children.get(name)
    }

    #[allow(non_snake_case)]
    pub fn ZiFChildren(&self) -> impl Iterator<Item = (&str, &ZiCConfigNode)> {
        self.children.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Key of the child joined onto this node, whether or not it exists.
    #[allow(non_snake_case)]
    pub fn ZiFChildKey(&self, name: &str) -> String {
        if self.key.is_empty() {
            name.to_string()
        } else {
            format!("{}.{}", self.key, name)
        }
    }

    /// First key carrying a value in this subtree, depth first.
    #[allow(non_snake_case)]
    pub fn ZiFFirstValuedKey(&self) -> &str {
        if self.value.is_some() {
            return &self.key;
        }
        self.children
            .values()
            .map(|child| child.ZiFFirstValuedKey())
            .next()
            .unwrap_or(self.key.as_str())
    }

    fn child_mut(&mut self, name: &str) -> &mut ZiCConfigNode {
        let key = self.ZiFChildKey(name);
        self.children
            .entry(name.to_string())
            .or_insert_with(|| ZiCConfigNode::ZiFNew(key))
    }
}
