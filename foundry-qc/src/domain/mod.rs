// Copyright 2024 Foundry QC developers
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://apache.org/licenses/LICENSE-2.0> or the MIT license <LICENSE-MIT or
// http://opensource.org/licenses/MIT>, at your option. This file may not be
// copied, modified, or distributed except according to those terms.

mod component;
mod inoculation;
mod qc_reading;
mod qc_register;
pub mod range;
mod record;
mod time_study;
mod validcode;

pub use component::{Component, SearchQuery, TouchRequest, TouchResponse};
pub use inoculation::{
    EventType, InoculationAdd, InoculationEvent, InoculationFilter, InoculationRecord,
};
pub use qc_reading::{QcReading, QcReadingAdd};
pub use qc_register::{
    MagnesiumTreatment, PostTreatmentChemistry, PouringParameters, PreTreatmentChemistry,
    QcRegisterAdd, QcRegisterEntry, TappingParameters,
};
pub use range::{validate_field, FieldRange, Validation};
pub use record::{Created, LatestQuery, QcRecord, RecordAdd, RecordKind};
pub use time_study::{Additives, ElementComposition, TimeStudyAdd, TimeStudyEntry};
pub use validcode::ValidCode;

/// An operator supplied value that does not satisfy the rules of its type.
#[derive(Debug, thiserror::Error)]
#[error("{0}")]
pub struct ValidationError(pub String);
