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

//! String to typed value conversion for primitive plugin properties.

use std::fmt::{self, Write};
use std::path::PathBuf;
use std::sync::OnceLock;
use std::time::Duration;

use chrono::format::{Item, StrftimeItems};
use chrono::{DateTime, Local};
use regex::Regex;

use crate::binder::ZiCPropertyValue;
use crate::errors::{Result, ZiError};
use crate::registry::ZiCPropertyKind;

static DURATION_LITERAL: OnceLock<Regex> = OnceLock::new();
static SIZE_LITERAL: OnceLock<Regex> = OnceLock::new();

fn duration_literal() -> &'static Regex {
    DURATION_LITERAL.get_or_init(|| {
        Regex::new(r"(?i)^(\d+)\s*(ms|s|m|h|d)?$").expect("duration literal pattern")
    })
}

fn size_literal() -> &'static Regex {
    SIZE_LITERAL.get_or_init(|| {
        Regex::new(r"(?i)^(\d+)\s*(b|kb|mb|gb)?$").expect("size literal pattern")
    })
}

/// Converts `raw` into the primitive `kind`. `key` only feeds error messages.
#[allow(non_snake_case)]
pub fn ZiFConvert(key: &str, kind: ZiCPropertyKind, raw: &str) -> Result<ZiCPropertyValue> {
    let raw = raw.trim();
    let invalid = || ZiError::conversion(key, kind.expected(), raw);
    match kind {
        ZiCPropertyKind::Text => Ok(ZiCPropertyValue::Text(raw.to_string())),
        ZiCPropertyKind::Integer => raw
            .parse::<i64>()
            .map(ZiCPropertyValue::Integer)
            .map_err(|_| invalid()),
        ZiCPropertyKind::Boolean => match raw.to_ascii_lowercase().as_str() {
            "true" => Ok(ZiCPropertyValue::Boolean(true)),
            "false" => Ok(ZiCPropertyValue::Boolean(false)),
            _ => Err(invalid()),
        },
        ZiCPropertyKind::Duration => ZiFParseDuration(raw)
            .map(ZiCPropertyValue::Duration)
            .ok_or_else(invalid),
        ZiCPropertyKind::ByteSize => ZiFParseByteSize(raw)
            .map(ZiCPropertyValue::ByteSize)
            .ok_or_else(invalid),
        ZiCPropertyKind::Path => {
            if raw.is_empty() {
                Err(invalid())
            } else {
                Ok(ZiCPropertyValue::Path(PathBuf::from(raw)))
            }
        }
        ZiCPropertyKind::DatePattern => {
            if ZiFIsValidDatePattern(raw) {
                Ok(ZiCPropertyValue::DatePattern(raw.to_string()))
            } else {
                Err(invalid())
            }
        }
        ZiCPropertyKind::Plugin(_) => Err(invalid()),
    }
}

#[allow(non_snake_case)]
pub fn ZiFParseDuration(raw: &str) -> Option<Duration> {
    let caps = duration_literal().captures(raw.trim())?;
    let amount: u64 = caps.get(1)?.as_str().parse().ok()?;
    let unit = caps
        .get(2)
        .map(|m| m.as_str().to_ascii_lowercase())
        .unwrap_or_else(|| "s".to_string());
    let duration = match unit.as_str() {
        "ms" => Duration::from_millis(amount),
        "s" => Duration::from_secs(amount),
        "m" => Duration::from_secs(amount.checked_mul(60)?),
        "h" => Duration::from_secs(amount.checked_mul(3_600)?),
        "d" => Duration::from_secs(amount.checked_mul(86_400)?),
        _ => return None,
    };
    Some(duration)
}

#[allow(non_snake_case)]
pub fn ZiFParseByteSize(raw: &str) -> Option<u64> {
    let caps = size_literal().captures(raw.trim())?;
    let amount: u64 = caps.get(1)?.as_str().parse().ok()?;
    let multiplier = match caps.get(2).map(|m| m.as_str().to_ascii_lowercase()).as_deref() {
        None | Some("b") => 1,
        Some("kb") => 1 << 10,
        Some("mb") => 1 << 20,
        Some("gb") => 1 << 30,
        _ => return None,
    };
    amount.checked_mul(multiplier)
}

/// Formats `time` with a chrono pattern. Items chrono parses but cannot
/// render, such as `%#z`, surface as `fmt::Error` instead of a panic.
#[allow(non_snake_case)]
pub fn ZiFFormatDate(pattern: &str, time: &DateTime<Local>) -> std::result::Result<String, fmt::Error> {
    let mut label = String::new();
    write!(label, "{}", time.format_with_items(StrftimeItems::new(pattern)))?;
    Ok(label)
}

/// A pattern is usable when chrono can render every item and the formatted
/// label cannot leave the log directory.
#[allow(non_snake_case)]
pub fn ZiFIsValidDatePattern(pattern: &str) -> bool {
    if pattern.is_empty()
        || pattern.contains('/')
        || pattern.contains('\\')
        || StrftimeItems::new(pattern).any(|item| matches!(item, Item::Error))
    {
        return false;
    }
    match ZiFFormatDate(pattern, &Local::now()) {
        Ok(sample) => !sample.is_empty() && !sample.contains('/') && !sample.contains('\\'),
        Err(_) => false,
    }
}
