// Copyright 2024 Foundry QC developers
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://apache.org/licenses/LICENSE-2.0> or the MIT license <LICENSE-MIT or
// http://opensource.org/licenses/MIT>, at your option. This file may not be
// copied, modified, or distributed except according to those terms.

use super::ValidationError;
use anyhow::Context;
use std::fmt;
use unicode_segmentation::UnicodeSegmentation;

const MAX_CODE_LENGTH: usize = 64;

/// An identifier typed in by an operator: component codes, part names, heat codes, shifts and
/// grades.
///
/// The inner field stays private so that every value went through `parse`: surrounding
/// whitespace is trimmed, the result is neither empty nor longer than 64 graphemes.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, sqlx::Type)]
#[sqlx(transparent)]
pub struct ValidCode(String);

impl ValidCode {
    pub fn parse<T: AsRef<str>>(s: T) -> Result<ValidCode, ValidationError> {
        let trimmed = s.as_ref().trim();
        if trimmed.is_empty() {
            return Err(ValidationError(format!(
                "Invalid code: '{}' is empty",
                s.as_ref()
            )));
        }
        if trimmed.graphemes(true).count() > MAX_CODE_LENGTH {
            return Err(ValidationError(format!(
                "Invalid code: '{trimmed}' is longer than {MAX_CODE_LENGTH} characters"
            )));
        }
        Ok(Self(trimmed.to_string()))
    }
}

impl AsRef<str> for ValidCode {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl serde::Serialize for ValidCode {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(&self.0)
    }
}

impl<'de> serde::Deserialize<'de> for ValidCode {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let buf = String::deserialize(deserializer)?;
        ValidCode::parse(&buf)
            .with_context(|| format!("Parsing '{buf}' failed"))
            .map_err(serde::de::Error::custom)
    }
}

impl fmt::Display for ValidCode {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
