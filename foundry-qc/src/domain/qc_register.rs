// Copyright 2024 Foundry QC developers
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://apache.org/licenses/LICENSE-2.0> or the MIT license <LICENSE-MIT or
// http://opensource.org/licenses/MIT>, at your option. This file may not be
// copied, modified, or distributed except according to those terms.

use super::ValidCode;
use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use serde::{Deserialize, Serialize};

/// Metal composition before the magnesium treatment, in percent.
#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq, sqlx::FromRow)]
pub struct PreTreatmentChemistry {
    pub c1: Option<f64>,
    pub si1: Option<f64>,
    pub mn1: Option<f64>,
    pub p1: Option<f64>,
    pub s1: Option<f64>,
    pub mg1: Option<f64>,
    pub f_l1: Option<f64>,
    pub cu1: Option<f64>,
    pub cr1: Option<f64>,
}

/// Metal composition after the magnesium treatment, in percent.
#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq, sqlx::FromRow)]
pub struct PostTreatmentChemistry {
    pub c2: Option<f64>,
    pub si2: Option<f64>,
    pub mn2: Option<f64>,
    pub s2: Option<f64>,
    pub cr2: Option<f64>,
    pub cu2: Option<f64>,
    pub sn2: Option<f64>,
}

#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq, sqlx::FromRow)]
pub struct PouringParameters {
    pub pouring_time: Option<NaiveTime>,
    pub pouring_temp: Option<f64>,
    pub pp_code: Option<String>,
    pub fc_no_heat_no: Option<String>,
}

#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq, sqlx::FromRow)]
pub struct MagnesiumTreatment {
    pub mg_kgs: Option<f64>,
    pub res_mg: Option<f64>,
    pub converter_percent: Option<f64>,
    pub rec_mg_percent: Option<f64>,
    pub stream_innoculat: Option<f64>,
    pub p_time_sec: Option<f64>,
}

#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq, sqlx::FromRow)]
pub struct TappingParameters {
    pub treatment_no: Option<String>,
    pub con_no: Option<String>,
    pub tapping_time: Option<NaiveTime>,
    pub corrective_addition_kgs: Option<f64>,
    pub tapping_wt_kgs: Option<f64>,
}

/// Body of a QC register submission. On the wire all groups are flattened into one object.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct QcRegisterAdd {
    pub record_date: NaiveDate,
    pub disa_line: Option<String>,
    pub part_name: ValidCode,
    pub heat_code: ValidCode,
    pub qty_moulds: Option<i32>,
    pub remarks: Option<String>,
    #[serde(flatten)]
    pub pre_treatment: PreTreatmentChemistry,
    #[serde(flatten)]
    pub post_treatment: PostTreatmentChemistry,
    #[serde(flatten)]
    pub pouring: PouringParameters,
    #[serde(flatten)]
    pub magnesium: MagnesiumTreatment,
    #[serde(flatten)]
    pub tapping: TappingParameters,
}

impl QcRegisterAdd {
    pub fn new(
        record_date: NaiveDate,
        part_name: ValidCode,
        heat_code: ValidCode,
    ) -> QcRegisterAdd {
        QcRegisterAdd {
            record_date,
            disa_line: None,
            part_name,
            heat_code,
            qty_moulds: None,
            remarks: None,
            pre_treatment: PreTreatmentChemistry::default(),
            post_treatment: PostTreatmentChemistry::default(),
            pouring: PouringParameters::default(),
            magnesium: MagnesiumTreatment::default(),
            tapping: TappingParameters::default(),
        }
    }
}

/// A stored QC register entry.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, sqlx::FromRow)]
pub struct QcRegisterEntry {
    pub id: i64,
    pub record_date: NaiveDate,
    pub disa_line: Option<String>,
    pub part_name: String,
    pub heat_code: String,
    pub qty_moulds: Option<i32>,
    pub remarks: Option<String>,
    #[serde(flatten)]
    #[sqlx(flatten)]
    pub pre_treatment: PreTreatmentChemistry,
    #[serde(flatten)]
    #[sqlx(flatten)]
    pub post_treatment: PostTreatmentChemistry,
    #[serde(flatten)]
    #[sqlx(flatten)]
    pub pouring: PouringParameters,
    #[serde(flatten)]
    #[sqlx(flatten)]
    pub magnesium: MagnesiumTreatment,
    #[serde(flatten)]
    #[sqlx(flatten)]
    pub tapping: TappingParameters,
    pub created_at: DateTime<Utc>,
}
