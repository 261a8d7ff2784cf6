// Copyright 2024 Foundry QC developers
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://apache.org/licenses/LICENSE-2.0> or the MIT license <LICENSE-MIT or
// http://opensource.org/licenses/MIT>, at your option. This file may not be
// copied, modified, or distributed except according to those terms.

//! Advisory range checks for numeric readings.
//!
//! A reading outside its range is flagged to the operator, it is never rejected: the outcome
//! of [`validate_field`] is deliberately unrelated to whether a record may be submitted.

use serde::Serialize;

/// Inclusive range of plausible values for a numeric reading.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct FieldRange {
    pub label: &'static str,
    pub min: f64,
    pub max: f64,
    pub unit: Option<&'static str>,
}

/// Hot-box temperature in °C. The upper bound is 30, which is also what the warning states.
pub const HOT_BOX_TEMP: FieldRange = FieldRange {
    label: "Hot Box Temp",
    min: 25.0,
    max: 30.0,
    unit: Some("°C"),
};

/// Air pressure in bar.
pub const AIR_PRESSURE: FieldRange = FieldRange {
    label: "Air Pressure",
    min: 4.5,
    max: 8.0,
    unit: Some("bar"),
};

/// Inject pressure in bar.
pub const INJECT_PRESSURE: FieldRange = FieldRange {
    label: "Inject Pressure",
    min: 1.0,
    max: 2.0,
    unit: Some("bar"),
};

impl FieldRange {
    pub fn contains(&self, value: f64) -> bool {
        value >= self.min && value <= self.max
    }

    /// The warning shown next to a field whose value is unparsable or out of range.
    pub fn warning(&self) -> String {
        match self.unit {
            Some(unit) => format!(
                "{} must be between {} and {} {}",
                self.label, self.min, self.max, unit
            ),
            None => format!("{} must be between {} and {}", self.label, self.min, self.max),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Validation {
    Valid(f64),
    Invalid(String),
}

impl Validation {
    pub fn is_valid(&self) -> bool {
        matches!(self, Validation::Valid(_))
    }

    pub fn warning(&self) -> Option<&str> {
        match self {
            Validation::Valid(_) => None,
            Validation::Invalid(reason) => Some(reason),
        }
    }
}

/// Checks the raw text of a field against its range.
pub fn validate_field(raw: &str, range: &FieldRange) -> Validation {
    match raw.trim().parse::<f64>() {
        Ok(value) if value.is_finite() && range.contains(value) => Validation::Valid(value),
        _ => Validation::Invalid(range.warning()),
    }
}
