// Copyright 2024 Foundry QC developers
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://apache.org/licenses/LICENSE-2.0> or the MIT license <LICENSE-MIT or
// http://opensource.org/licenses/MIT>, at your option. This file may not be
// copied, modified, or distributed except according to those terms.

use super::ValidCode;
use anyhow::Context;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// `QcReadingAdd` is the body of a general QC reading submission.
///
/// All readings are optional, the three checks default to `false` and the timestamp defaults to
/// the time the server stores the reading.
///
/// # Example
///
/// ```
/// # use foundry_qc::domain::QcReadingAdd;
/// # fn main() -> Result<(), anyhow::Error> {
/// let mut reading = QcReadingAdd::new("X123")?;
/// reading.hot_box_temp = Some(27.0);
/// reading.air_pressure = Some(6.0);
/// reading.is_new_bag = true;
/// # Ok(())
/// # }
/// ```
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct QcReadingAdd {
    pub component_in_production: ValidCode,
    pub flow_rate_setting_a: Option<f64>,
    pub flow_rate_display_b: Option<f64>,
    pub hot_box_temp: Option<f64>,
    pub air_pressure: Option<f64>,
    pub inject_pressure: Option<f64>,
    pub feed_pipe_condition: Option<String>,
    pub powder_size: Option<f64>,
    pub moisture: Option<f64>,
    #[serde(default)]
    pub is_new_bag: bool,
    #[serde(default)]
    pub air_drier_function: bool,
    #[serde(default)]
    pub filter_cleaning: bool,
    pub gauge_test: Option<f64>,
    pub hourly_time: Option<DateTime<Utc>>,
}

impl QcReadingAdd {
    /// Creates a reading for `component` with every value unset.
    pub fn new<T: AsRef<str>>(component: T) -> Result<Self, anyhow::Error> {
        Ok(QcReadingAdd {
            component_in_production: ValidCode::parse(component)
                .context("Failed to parse component code.")?,
            flow_rate_setting_a: None,
            flow_rate_display_b: None,
            hot_box_temp: None,
            air_pressure: None,
            inject_pressure: None,
            feed_pipe_condition: None,
            powder_size: None,
            moisture: None,
            is_new_bag: false,
            air_drier_function: false,
            filter_cleaning: false,
            gauge_test: None,
            hourly_time: None,
        })
    }
}

/// A stored general QC reading.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, sqlx::FromRow)]
pub struct QcReading {
    pub id: i64,
    pub component_in_production: String,
    pub flow_rate_setting_a: Option<f64>,
    pub flow_rate_display_b: Option<f64>,
    pub hot_box_temp: Option<f64>,
    pub air_pressure: Option<f64>,
    pub inject_pressure: Option<f64>,
    pub feed_pipe_condition: Option<String>,
    pub powder_size: Option<f64>,
    pub moisture: Option<f64>,
    pub is_new_bag: bool,
    pub air_drier_function: bool,
    pub filter_cleaning: bool,
    pub gauge_test: Option<f64>,
    pub hourly_time: DateTime<Utc>,
}

impl QcReading {
    /// True if the stored reading carries the same values as `add`, ignoring the server
    /// assigned id and, unless `add` set one, the timestamp.
    pub fn matches(&self, add: &QcReadingAdd) -> bool {
        self.component_in_production == add.component_in_production.as_ref()
            && self.flow_rate_setting_a == add.flow_rate_setting_a
            && self.flow_rate_display_b == add.flow_rate_display_b
            && self.hot_box_temp == add.hot_box_temp
            && self.air_pressure == add.air_pressure
            && self.inject_pressure == add.inject_pressure
            && self.feed_pipe_condition == add.feed_pipe_condition
            && self.powder_size == add.powder_size
            && self.moisture == add.moisture
            && self.is_new_bag == add.is_new_bag
            && self.air_drier_function == add.air_drier_function
            && self.filter_cleaning == add.filter_cleaning
            && self.gauge_test == add.gauge_test
            && add.hourly_time.map_or(true, |t| t == self.hourly_time)
    }
}
