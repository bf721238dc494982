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

//! # Zilog Error Module
//!
//! This module defines the error type shared by the plugin registry, the
//! property binder and the configuration assembler.
//!
//! ## Error Categories
//!
//! - **UnknownPlugin**: A symbolic name has no registered implementation
//! - **MissingProperty**: A required property was not configured
//! - **UnknownProperty**: A configured key matches no declared property
//! - **AmbiguousConstruction**: Two competing values target one property
//! - **Conversion**: A raw string could not be converted to the declared kind
//! - **Assembly**: Structural problems such as gaps in writer indices
//! - **DuplicatePlugin** / **Registry**: Problems while loading service sources
//! - **Io** / **Serde**: Failures reading configuration sources
//!
//! Errors raised while rotating a log file are plain `std::io::Error` values and
//! never pass through this type.

use std::io;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::registry::ZiCCapability;

/// Convenience result type used throughout Zilog.
pub type Result<T> = std::result::Result<T, ZiError>;

/// Canonical error enumeration for Zilog.
#[derive(Clone, Debug, Error, PartialEq, Eq, Serialize, Deserialize)]
pub enum ZiError {
    /// No implementation is registered under the symbolic name.
    #[error("unknown {capability} '{name}' at '{key}'")]
    UnknownPlugin {
        key: String,
        capability: ZiCCapability,
        name: String,
    },

    /// A required property has neither a configured value nor a default.
    #[error("missing required property '{key}' (expected {expected})")]
    MissingProperty { key: String, expected: String },

    /// A configured key does not match any declared property.
    #[error("unknown property '{key}'")]
    UnknownProperty { key: String },

    /// More than one value competes for the same property.
    #[error("ambiguous construction at '{key}': {message}")]
    AmbiguousConstruction { key: String, message: String },

    /// A raw value could not be converted into the declared kind.
    #[error("invalid value '{value}' for '{key}' (expected {expected})")]
    Conversion {
        key: String,
        expected: String,
        value: String,
    },

    /// Structural configuration problems.
    #[error("assembly error: {message}")]
    Assembly { message: String },

    /// Two service entries declare the same symbolic name for a capability.
    #[error("duplicate {capability} '{name}' in service sources")]
    DuplicatePlugin {
        capability: ZiCCapability,
        name: String,
    },

    /// A service source could not be applied.
    #[error("service source '{origin}': {message}")]
    Registry { origin: String, message: String },

    /// Errors originating from reading configuration or service files.
    #[error("io error: {0}")]
    Io(String),

    /// Wrapper for serde-style serialization issues.
    #[error("serialization error: {0}")]
    Serde(String),
}

impl From<io::Error> for ZiError {
    fn from(err: io::Error) -> Self {
        ZiError::Io(err.to_string())
    }
}

impl From<serde_json::Error> for ZiError {
    fn from(err: serde_json::Error) -> Self {
        ZiError::Serde(err.to_string())
    }
}

impl ZiError {
    pub fn unknown_plugin(
        key: impl Into<String>,
        capability: ZiCCapability,
        name: impl Into<String>,
    ) -> Self {
        ZiError::UnknownPlugin {
            key: key.into(),
            capability,
            name: name.into(),
        }
    }

    pub fn missing_property(key: impl Into<String>, expected: impl Into<String>) -> Self {
        ZiError::MissingProperty {
            key: key.into(),
            expected: expected.into(),
        }
    }

    pub fn unknown_property(key: impl Into<String>) -> Self {
        ZiError::UnknownProperty { key: key.into() }
    }

    pub fn ambiguous(key: impl Into<String>, message: impl Into<String>) -> Self {
        ZiError::AmbiguousConstruction {
            key: key.into(),
            message: message.into(),
        }
    }

    /// Helper to construct conversion errors.
    pub fn conversion(
        key: impl Into<String>,
        expected: impl Into<String>,
        value: impl Into<String>,
    ) -> Self {
        ZiError::Conversion {
            key: key.into(),
            expected: expected.into(),
            value: value.into(),
        }
    }

    /// Helper to construct assembly errors.
    pub fn assembly<T: Into<String>>(message: T) -> Self {
        ZiError::Assembly {
            message: message.into(),
        }
    }

    pub fn registry(origin: impl Into<String>, message: impl Into<String>) -> Self {
        ZiError::Registry {
            origin: origin.into(),
            message: message.into(),
        }
    }

    /// The configuration key this error refers to, if any.
    pub fn key(&self) -> Option<&str> {
        match self {
            ZiError::UnknownPlugin { key, .. }
            | ZiError::MissingProperty { key, .. }
            | ZiError::UnknownProperty { key }
            | ZiError::AmbiguousConstruction { key, .. }
            | ZiError::Conversion { key, .. } => Some(key),
            _ => None,
        }
    }
}
