// Copyright 2024 Foundry QC developers
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://apache.org/licenses/LICENSE-2.0> or the MIT license <LICENSE-MIT or
// http://opensource.org/licenses/MIT>, at your option. This file may not be
// copied, modified, or distributed except according to those terms.

use super::ValidCode;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A foundry part or material from the reference list that QC records are taken against.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq, sqlx::FromRow)]
pub struct Component {
    /// Unique product code.
    pub code: String,
    pub description: String,
    /// Last time an operator selected the component or submitted a record against it.
    pub last_used: Option<DateTime<Utc>>,
}

impl Component {
    pub fn new<T: Into<String>, U: Into<String>>(code: T, description: U) -> Self {
        Component {
            code: code.into(),
            description: description.into(),
            last_used: None,
        }
    }
}

impl std::fmt::Display for Component {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.code, self.description)
    }
}

/// Body of a touch request.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct TouchRequest {
    pub code: ValidCode,
}

/// Outcome of a touch. `touched` is false when no component with that code exists.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct TouchResponse {
    pub code: String,
    pub touched: bool,
}

/// Query string of a component search.
#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq, Eq)]
pub struct SearchQuery {
    #[serde(default)]
    pub query: String,
}

impl SearchQuery {
    /// ILIKE pattern matching `query` anywhere, with the wildcard characters escaped.
    pub fn like_pattern(&self) -> String {
        let mut escaped = String::with_capacity(self.query.len() + 2);
        escaped.push('%');
        for c in self.query.trim().chars() {
            if matches!(c, '%' | '_' | '\\') {
                escaped.push('\\');
            }
            escaped.push(c);
        }
        escaped.push('%');
        escaped
    }

    pub fn is_blank(&self) -> bool {
        self.query.trim().is_empty()
    }
}
