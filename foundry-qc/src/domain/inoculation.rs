// Copyright 2024 Foundry QC developers
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://apache.org/licenses/LICENSE-2.0> or the MIT license <LICENSE-MIT or
// http://opensource.org/licenses/MIT>, at your option. This file may not be
// copied, modified, or distributed except according to those terms.

//! Inoculation system checks.
//!
//! Every check belongs to one [`EventType`], and only the readings of that event type are
//! stored: a bag-change check never carries flow rates, an hourly check never carries a gauge
//! test.

use super::ValidCode;
use crate::constants::{MACRO_STRUCTURE, MICRO_STRUCTURE};
use anyhow::Context;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::postgres::{PgTypeInfo, PgValueRef};
use sqlx::{Decode, Postgres, Type};
use std::fmt;

/// Recurrence cadence of an inoculation check.
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum EventType {
    #[serde(rename = "hourly")]
    Hourly,
    #[serde(rename = "4-hourly")]
    FourHourly,
    #[serde(rename = "bag_change")]
    BagChange,
    #[serde(rename = "gauge_test")]
    GaugeTest,
}

impl EventType {
    pub const ALL: [EventType; 4] = [
        EventType::Hourly,
        EventType::FourHourly,
        EventType::BagChange,
        EventType::GaugeTest,
    ];

    /// Value stored in the `event_type` column.
    pub fn as_str(&self) -> &'static str {
        match self {
            EventType::Hourly => "hourly",
            EventType::FourHourly => "4-hourly",
            EventType::BagChange => "bag_change",
            EventType::GaugeTest => "gauge_test",
        }
    }

    /// Last segment of the create endpoint, `/inoculation/{segment}`.
    pub fn path_segment(&self) -> &'static str {
        match self {
            EventType::Hourly => "hourly",
            EventType::FourHourly => "4hourly",
            EventType::BagChange => "bag-change",
            EventType::GaugeTest => "gauge-test",
        }
    }

    pub fn from_path_segment(segment: &str) -> Option<EventType> {
        EventType::ALL
            .into_iter()
            .find(|e| e.path_segment() == segment)
    }
}

impl TryFrom<&str> for EventType {
    type Error = String;

    fn try_from(s: &str) -> Result<Self, Self::Error> {
        EventType::ALL
            .into_iter()
            .find(|e| e.as_str() == s)
            .ok_or_else(|| format!("Unknown inoculation event type: {s}"))
    }
}

impl fmt::Display for EventType {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

// Stored as plain text, see the `inoculation_events_event_type_check` constraint.
impl Type<Postgres> for EventType {
    fn type_info() -> PgTypeInfo {
        <String as Type<Postgres>>::type_info()
    }

    fn compatible(ty: &PgTypeInfo) -> bool {
        <String as Type<Postgres>>::compatible(ty)
    }
}

impl<'r> Decode<'r, Postgres> for EventType {
    fn decode(value: PgValueRef<'r>) -> Result<Self, sqlx::error::BoxDynError> {
        let s = <&str as Decode<Postgres>>::decode(value)?;
        Ok(EventType::try_from(s)?)
    }
}

/// Body of an inoculation check submission.
///
/// The body may carry any reading; [`InoculationAdd::for_event`] keeps the ones that belong to
/// the event type the check was submitted for.
///
/// The powder readings are also accepted as `powder_size` and `powder_moisture`. A body giving
/// both names of the same reading is rejected as a duplicate field.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct InoculationAdd {
    pub component_in_production: ValidCode,
    pub inoculation_flow_rate_rpm: Option<f64>,
    pub inoculation_flow_rate_gms: Option<f64>,
    pub air_pressure: Option<f64>,
    pub inject_pressure: Option<f64>,
    pub feed_pipe_condition: Option<String>,
    pub air_line_water_drainage: Option<bool>,
    pub hopper_cleaning: Option<bool>,
    #[serde(alias = "powder_size")]
    pub inoculant_powder_size: Option<f64>,
    #[serde(alias = "powder_moisture")]
    pub inoculant_powder_moisture: Option<f64>,
    pub gauge_test: Option<f64>,
}

impl InoculationAdd {
    pub fn new<T: AsRef<str>>(component: T) -> Result<Self, anyhow::Error> {
        Ok(InoculationAdd {
            component_in_production: ValidCode::parse(component)
                .context("Failed to parse component code.")?,
            inoculation_flow_rate_rpm: None,
            inoculation_flow_rate_gms: None,
            air_pressure: None,
            inject_pressure: None,
            feed_pipe_condition: None,
            air_line_water_drainage: None,
            hopper_cleaning: None,
            inoculant_powder_size: None,
            inoculant_powder_moisture: None,
            gauge_test: None,
        })
    }

    /// Restricts the readings to those of `event_type`. A bag change always marks a new bag.
    pub fn for_event(self, event_type: EventType) -> InoculationEvent {
        let mut event = InoculationEvent {
            component_in_production: self.component_in_production,
            event_type,
            inoculation_flow_rate_rpm: None,
            inoculation_flow_rate_gms: None,
            air_pressure: None,
            inject_pressure: None,
            feed_pipe_condition: None,
            air_line_water_drainage: None,
            hopper_cleaning: None,
            inoculant_powder_size: None,
            inoculant_powder_moisture: None,
            is_new_bag: None,
            gauge_test: None,
        };
        match event_type {
            EventType::Hourly => {
                event.inoculation_flow_rate_rpm = self.inoculation_flow_rate_rpm;
                event.inoculation_flow_rate_gms = self.inoculation_flow_rate_gms;
                event.air_pressure = self.air_pressure;
                event.inject_pressure = self.inject_pressure;
                event.feed_pipe_condition = self.feed_pipe_condition;
            }
            EventType::FourHourly => {
                event.air_line_water_drainage = self.air_line_water_drainage;
                event.hopper_cleaning = self.hopper_cleaning;
            }
            EventType::BagChange => {
                event.inoculant_powder_size = self.inoculant_powder_size;
                event.inoculant_powder_moisture = self.inoculant_powder_moisture;
                event.is_new_bag = Some(true);
            }
            EventType::GaugeTest => {
                event.gauge_test = self.gauge_test;
            }
        }
        event
    }
}

/// An inoculation check ready to be stored.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct InoculationEvent {
    pub component_in_production: ValidCode,
    pub event_type: EventType,
    pub inoculation_flow_rate_rpm: Option<f64>,
    pub inoculation_flow_rate_gms: Option<f64>,
    pub air_pressure: Option<f64>,
    pub inject_pressure: Option<f64>,
    pub feed_pipe_condition: Option<String>,
    pub air_line_water_drainage: Option<bool>,
    pub hopper_cleaning: Option<bool>,
    pub inoculant_powder_size: Option<f64>,
    pub inoculant_powder_moisture: Option<f64>,
    pub is_new_bag: Option<bool>,
    pub gauge_test: Option<f64>,
}

impl InoculationEvent {
    pub fn micro_structure(&self) -> &'static str {
        MICRO_STRUCTURE
    }

    pub fn macro_structure(&self) -> &'static str {
        MACRO_STRUCTURE
    }
}

/// A stored inoculation check.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, sqlx::FromRow)]
pub struct InoculationRecord {
    pub id: i64,
    pub component_in_production: String,
    pub event_type: EventType,
    pub inoculation_flow_rate_rpm: Option<f64>,
    pub inoculation_flow_rate_gms: Option<f64>,
    pub air_pressure: Option<f64>,
    pub inject_pressure: Option<f64>,
    pub feed_pipe_condition: Option<String>,
    pub air_line_water_drainage: Option<bool>,
    pub hopper_cleaning: Option<bool>,
    pub inoculant_powder_size: Option<f64>,
    pub inoculant_powder_moisture: Option<f64>,
    pub is_new_bag: Option<bool>,
    pub gauge_test: Option<f64>,
    pub micro_structure: String,
    pub macro_structure: String,
    pub event_time: DateTime<Utc>,
}

/// Filters of the inoculation list and latest endpoints.
#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq, Eq)]
pub struct InoculationFilter {
    pub component: Option<String>,
    pub event_type: Option<EventType>,
}
