// Copyright 2024 Foundry QC developers
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://apache.org/licenses/LICENSE-2.0> or the MIT license <LICENSE-MIT or
// http://opensource.org/licenses/MIT>, at your option. This file may not be
// copied, modified, or distributed except according to those terms.

use serde::{Deserialize, Serialize};

/// Writes an error followed by its chain of causes.
pub fn error_chain_fmt(
    e: &impl std::error::Error,
    f: &mut std::fmt::Formatter<'_>,
) -> std::fmt::Result {
    writeln!(f, "{e}\n")?;
    let mut current = e.source();
    while let Some(cause) = current {
        writeln!(f, "Caused by:\n\t{cause}")?;
        current = cause.source();
    }
    Ok(())
}

/// Body of every non-2xx response.
///
/// `error` is meant to be shown to the operator as is, `details` carries the underlying cause
/// when there is one.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct ErrorBody {
    pub error: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

impl ErrorBody {
    pub fn new<T: Into<String>>(error: T) -> Self {
        ErrorBody {
            error: error.into(),
            details: None,
        }
    }

    #[must_use]
    pub fn with_details<T: Into<String>>(mut self, details: T) -> Self {
        self.details = Some(details.into());
        self
    }

    pub fn from_error(e: &dyn std::error::Error) -> Self {
        ErrorBody {
            error: e.to_string(),
            details: e.source().map(|cause| cause.to_string()),
        }
    }
}

impl std::fmt::Display for ErrorBody {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.details.as_ref() {
            Some(details) => write!(f, "{}: {}", self.error, details),
            None => write!(f, "{}", self.error),
        }
    }
}
