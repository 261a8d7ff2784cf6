// Copyright 2024 Foundry QC developers
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://apache.org/licenses/LICENSE-2.0> or the MIT license <LICENSE-MIT or
// http://opensource.org/licenses/MIT>, at your option. This file may not be
// copied, modified, or distributed except according to those terms.

use super::ValidCode;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Element composition of the melt, in percent.
#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq, sqlx::FromRow)]
pub struct ElementComposition {
    pub c: Option<f64>,
    pub si: Option<f64>,
    pub mn: Option<f64>,
    pub p: Option<f64>,
    pub s: Option<f64>,
    pub cr: Option<f64>,
    pub ni: Option<f64>,
    pub al: Option<f64>,
    pub cu: Option<f64>,
    pub sn: Option<f64>,
    pub mo: Option<f64>,
}

/// Additions to the charge in kg. Carbon steel is recorded as free text.
#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq, sqlx::FromRow)]
pub struct Additives {
    pub cac2_s: Option<f64>,
    pub fesi_sh: Option<f64>,
    pub femn_sic: Option<f64>,
    pub cu_fecr: Option<f64>,
    pub carbon_steel: Option<String>,
}

/// Body of a time study submission.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct TimeStudyAdd {
    pub shift: ValidCode,
    #[serde(flatten)]
    pub composition: ElementComposition,
    #[serde(flatten)]
    pub additives: Additives,
    pub part_name: ValidCode,
    pub heat_code: ValidCode,
    pub grade: ValidCode,
}

/// A stored time study entry.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, sqlx::FromRow)]
pub struct TimeStudyEntry {
    pub id: i64,
    pub shift: String,
    #[serde(flatten)]
    #[sqlx(flatten)]
    pub composition: ElementComposition,
    #[serde(flatten)]
    #[sqlx(flatten)]
    pub additives: Additives,
    pub part_name: String,
    pub heat_code: String,
    pub grade: String,
    pub created_at: DateTime<Utc>,
}
