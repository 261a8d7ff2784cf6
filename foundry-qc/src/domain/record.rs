// Copyright 2024 Foundry QC developers
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://apache.org/licenses/LICENSE-2.0> or the MIT license <LICENSE-MIT or
// http://opensource.org/licenses/MIT>, at your option. This file may not be
// copied, modified, or distributed except according to those terms.

//! The four kinds of QC records as one type, for code that handles any of them.

use super::{
    EventType, InoculationAdd, InoculationRecord, QcReading, QcReadingAdd, QcRegisterAdd,
    QcRegisterEntry, TimeStudyAdd, TimeStudyEntry,
};
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum RecordKind {
    QcReading,
    Inoculation,
    QcRegister,
    TimeStudy,
}

impl RecordKind {
    pub const ALL: [RecordKind; 4] = [
        RecordKind::QcReading,
        RecordKind::Inoculation,
        RecordKind::QcRegister,
        RecordKind::TimeStudy,
    ];

    /// Label used for the `kind` dimension of the metrics.
    pub fn as_str(&self) -> &'static str {
        match self {
            RecordKind::QcReading => "qc_reading",
            RecordKind::Inoculation => "inoculation",
            RecordKind::QcRegister => "qc_register",
            RecordKind::TimeStudy => "time_study",
        }
    }
}

impl fmt::Display for RecordKind {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A record about to be created.
#[derive(Clone, Debug, PartialEq)]
pub enum RecordAdd {
    Reading(QcReadingAdd),
    Inoculation {
        event_type: EventType,
        record: InoculationAdd,
    },
    Register(QcRegisterAdd),
    TimeStudy(TimeStudyAdd),
}

impl RecordAdd {
    pub fn kind(&self) -> RecordKind {
        match self {
            RecordAdd::Reading(_) => RecordKind::QcReading,
            RecordAdd::Inoculation { .. } => RecordKind::Inoculation,
            RecordAdd::Register(_) => RecordKind::QcRegister,
            RecordAdd::TimeStudy(_) => RecordKind::TimeStudy,
        }
    }
}

/// A stored record of any kind.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(tag = "kind", content = "record", rename_all = "snake_case")]
pub enum QcRecord {
    QcReading(QcReading),
    Inoculation(InoculationRecord),
    QcRegister(QcRegisterEntry),
    TimeStudy(TimeStudyEntry),
}

impl QcRecord {
    pub fn kind(&self) -> RecordKind {
        match self {
            QcRecord::QcReading(_) => RecordKind::QcReading,
            QcRecord::Inoculation(_) => RecordKind::Inoculation,
            QcRecord::QcRegister(_) => RecordKind::QcRegister,
            QcRecord::TimeStudy(_) => RecordKind::TimeStudy,
        }
    }

    pub fn id(&self) -> i64 {
        match self {
            QcRecord::QcReading(r) => r.id,
            QcRecord::Inoculation(r) => r.id,
            QcRecord::QcRegister(r) => r.id,
            QcRecord::TimeStudy(r) => r.id,
        }
    }

    /// The stored fields as a flat JSON object, keyed by column name.
    pub fn to_fields(&self) -> Result<serde_json::Value, serde_json::Error> {
        match self {
            QcRecord::QcReading(r) => serde_json::to_value(r),
            QcRecord::Inoculation(r) => serde_json::to_value(r),
            QcRecord::QcRegister(r) => serde_json::to_value(r),
            QcRecord::TimeStudy(r) => serde_json::to_value(r),
        }
    }
}

/// Body of a `201 Created` response.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct Created<T> {
    pub message: String,
    pub record: T,
}

impl<T> Created<T> {
    pub fn new<M: Into<String>>(message: M, record: T) -> Self {
        Created {
            message: message.into(),
            record,
        }
    }
}

/// Query string of the `latest` endpoint of general QC readings.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct LatestQuery {
    pub component: String,
}
