// Copyright 2024 Foundry QC developers
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://apache.org/licenses/LICENSE-2.0> or the MIT license <LICENSE-MIT or
// http://opensource.org/licenses/MIT>, at your option. This file may not be
// copied, modified, or distributed except according to those terms.

//! Entry forms.
//!
//! An [`EntryForm`] keeps the raw text of every input as typed by the operator. Values are
//! checked on every edit and on blur; a failed check only sets a warning next to the field.
//! When submitting, [`EntryForm::assemble`] parses the inputs into the record of the form.

use crate::store::PrefillSource;
use chrono::{NaiveDate, NaiveTime};
use foundry_qc::domain::range::{AIR_PRESSURE, HOT_BOX_TEMP, INJECT_PRESSURE};
use foundry_qc::domain::{
    validate_field, Component, EventType, FieldRange, QcRecord, RecordAdd, RecordKind,
};
use serde_json::{Map, Value};
use std::collections::BTreeMap;

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum FieldKind {
    /// A float, optionally with an advisory range.
    Number(Option<FieldRange>),
    Integer,
    Text,
    /// A checkbox.
    Flag,
    /// `YYYY-MM-DD`
    Date,
    /// `HH:MM` or `HH:MM:SS`
    Time,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FieldSpec {
    /// Key of the field in the record.
    pub name: &'static str,
    pub label: &'static str,
    pub kind: FieldKind,
    pub required: bool,
    /// Copied from the offered record when a prefill is accepted.
    pub prefill: bool,
}

impl FieldSpec {
    const fn new(name: &'static str, label: &'static str, kind: FieldKind) -> Self {
        FieldSpec {
            name,
            label,
            kind,
            required: false,
            prefill: false,
        }
    }

    const fn number(name: &'static str, label: &'static str) -> Self {
        Self::new(name, label, FieldKind::Number(None))
    }

    const fn ranged(name: &'static str, range: FieldRange) -> Self {
        Self::new(name, range.label, FieldKind::Number(Some(range)))
    }

    const fn text(name: &'static str, label: &'static str) -> Self {
        Self::new(name, label, FieldKind::Text)
    }

    const fn flag(name: &'static str, label: &'static str) -> Self {
        Self::new(name, label, FieldKind::Flag)
    }

    const fn required(mut self) -> Self {
        self.required = true;
        self
    }

    const fn carried_over(mut self) -> Self {
        self.prefill = true;
        self
    }
}

const QC_READING_FIELDS: &[FieldSpec] = &[
    FieldSpec::number("flow_rate_setting_a", "Flow Rate Setting A").carried_over(),
    FieldSpec::number("flow_rate_display_b", "Flow Rate Display B").carried_over(),
    FieldSpec::ranged("hot_box_temp", HOT_BOX_TEMP).carried_over(),
    FieldSpec::ranged("air_pressure", AIR_PRESSURE).carried_over(),
    FieldSpec::ranged("inject_pressure", INJECT_PRESSURE).carried_over(),
    FieldSpec::text("feed_pipe_condition", "Feed Pipe Condition").carried_over(),
    FieldSpec::number("powder_size", "Powder Size"),
    FieldSpec::number("moisture", "Moisture"),
    FieldSpec::flag("is_new_bag", "New Bag"),
    FieldSpec::flag("air_drier_function", "Air Drier Function"),
    FieldSpec::flag("filter_cleaning", "Filter Cleaning"),
    FieldSpec::number("gauge_test", "Gauge Test"),
];

const HOURLY_FIELDS: &[FieldSpec] = &[
    FieldSpec::number("inoculation_flow_rate_rpm", "Inoculation Flow Rate (RPM)").carried_over(),
    FieldSpec::number("inoculation_flow_rate_gms", "Inoculation Flow Rate (g/s)").carried_over(),
    FieldSpec::ranged("air_pressure", AIR_PRESSURE).carried_over(),
    FieldSpec::ranged("inject_pressure", INJECT_PRESSURE).carried_over(),
    FieldSpec::text("feed_pipe_condition", "Feed Pipe Condition").carried_over(),
];

const FOUR_HOURLY_FIELDS: &[FieldSpec] = &[
    FieldSpec::flag("air_line_water_drainage", "Air Line Water Drainage"),
    FieldSpec::flag("hopper_cleaning", "Hopper Cleaning"),
];

const BAG_CHANGE_FIELDS: &[FieldSpec] = &[
    FieldSpec::number("inoculant_powder_size", "Inoculant Powder Size"),
    FieldSpec::number("inoculant_powder_moisture", "Inoculant Powder Moisture"),
];

const GAUGE_TEST_FIELDS: &[FieldSpec] = &[FieldSpec::number("gauge_test", "Gauge Test")];

const QC_REGISTER_FIELDS: &[FieldSpec] = &[
    FieldSpec::new("record_date", "Record Date", FieldKind::Date).required(),
    FieldSpec::text("disa_line", "DISA Line"),
    FieldSpec::text("part_name", "Part Name").required(),
    FieldSpec::text("heat_code", "Heat Code").required(),
    FieldSpec::new("qty_moulds", "Qty Moulds", FieldKind::Integer),
    FieldSpec::text("remarks", "Remarks"),
    FieldSpec::number("c1", "C (before treatment)"),
    FieldSpec::number("si1", "Si (before treatment)"),
    FieldSpec::number("mn1", "Mn (before treatment)"),
    FieldSpec::number("p1", "P (before treatment)"),
    FieldSpec::number("s1", "S (before treatment)"),
    FieldSpec::number("mg1", "Mg (before treatment)"),
    FieldSpec::number("f_l1", "F/L (before treatment)"),
    FieldSpec::number("cu1", "Cu (before treatment)"),
    FieldSpec::number("cr1", "Cr (before treatment)"),
    FieldSpec::number("c2", "C (after treatment)"),
    FieldSpec::number("si2", "Si (after treatment)"),
    FieldSpec::number("mn2", "Mn (after treatment)"),
    FieldSpec::number("s2", "S (after treatment)"),
    FieldSpec::number("cr2", "Cr (after treatment)"),
    FieldSpec::number("cu2", "Cu (after treatment)"),
    FieldSpec::number("sn2", "Sn (after treatment)"),
    FieldSpec::new("pouring_time", "Pouring Time", FieldKind::Time),
    FieldSpec::number("pouring_temp", "Pouring Temp"),
    FieldSpec::text("pp_code", "PP Code"),
    FieldSpec::text("fc_no_heat_no", "FC No / Heat No"),
    FieldSpec::number("mg_kgs", "Mg (kg)"),
    FieldSpec::number("res_mg", "Residual Mg"),
    FieldSpec::number("converter_percent", "Converter %"),
    FieldSpec::number("rec_mg_percent", "Recovered Mg %"),
    FieldSpec::number("stream_innoculat", "Stream Inoculant"),
    FieldSpec::number("p_time_sec", "P Time (s)"),
    FieldSpec::text("treatment_no", "Treatment No"),
    FieldSpec::text("con_no", "Converter No"),
    FieldSpec::new("tapping_time", "Tapping Time", FieldKind::Time),
    FieldSpec::number("corrective_addition_kgs", "Corrective Addition (kg)"),
    FieldSpec::number("tapping_wt_kgs", "Tapping Weight (kg)"),
];

const TIME_STUDY_FIELDS: &[FieldSpec] = &[
    FieldSpec::text("shift", "Shift").required(),
    FieldSpec::number("c", "C"),
    FieldSpec::number("si", "Si"),
    FieldSpec::number("mn", "Mn"),
    FieldSpec::number("p", "P"),
    FieldSpec::number("s", "S"),
    FieldSpec::number("cr", "Cr"),
    FieldSpec::number("ni", "Ni"),
    FieldSpec::number("al", "Al"),
    FieldSpec::number("cu", "Cu"),
    FieldSpec::number("sn", "Sn"),
    FieldSpec::number("mo", "Mo"),
    FieldSpec::number("cac2_s", "CaC2 (S)"),
    FieldSpec::number("fesi_sh", "FeSi (SH)"),
    FieldSpec::number("femn_sic", "FeMn / SiC"),
    FieldSpec::number("cu_fecr", "Cu / FeCr"),
    FieldSpec::text("carbon_steel", "Carbon Steel"),
    FieldSpec::text("part_name", "Part Name").required(),
    FieldSpec::text("heat_code", "Heat Code").required(),
    FieldSpec::text("grade", "Grade").required(),
];

/// The forms an operator can fill in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormKind {
    QcReading,
    Inoculation(EventType),
    QcRegister,
    TimeStudy,
}

impl FormKind {
    pub fn fields(&self) -> &'static [FieldSpec] {
        match self {
            FormKind::QcReading => QC_READING_FIELDS,
            FormKind::Inoculation(EventType::Hourly) => HOURLY_FIELDS,
            FormKind::Inoculation(EventType::FourHourly) => FOUR_HOURLY_FIELDS,
            FormKind::Inoculation(EventType::BagChange) => BAG_CHANGE_FIELDS,
            FormKind::Inoculation(EventType::GaugeTest) => GAUGE_TEST_FIELDS,
            FormKind::QcRegister => QC_REGISTER_FIELDS,
            FormKind::TimeStudy => TIME_STUDY_FIELDS,
        }
    }

    pub fn field(&self, name: &str) -> Option<&'static FieldSpec> {
        self.fields().iter().find(|f| f.name == name)
    }

    pub fn record_kind(&self) -> RecordKind {
        match self {
            FormKind::QcReading => RecordKind::QcReading,
            FormKind::Inoculation(_) => RecordKind::Inoculation,
            FormKind::QcRegister => RecordKind::QcRegister,
            FormKind::TimeStudy => RecordKind::TimeStudy,
        }
    }

    /// Whether records of this form are taken against the selected component.
    pub fn needs_component(&self) -> bool {
        matches!(self, FormKind::QcReading | FormKind::Inoculation(_))
    }

    pub fn prefill_source(&self) -> Option<PrefillSource> {
        match self {
            FormKind::QcReading => Some(PrefillSource::QcReadings),
            FormKind::Inoculation(event_type) => Some(PrefillSource::Inoculation {
                event_type: Some(*event_type),
            }),
            FormKind::QcRegister | FormKind::TimeStudy => None,
        }
    }
}

/// Checks `raw` against the kind of its field. Empty inputs never warn.
fn check_input(field: &FieldSpec, raw: &str) -> Option<String> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }
    match field.kind {
        FieldKind::Number(Some(range)) => validate_field(raw, &range).warning().map(String::from),
        FieldKind::Number(None) => parse_number(raw)
            .is_none()
            .then(|| format!("{} must be a number", field.label)),
        FieldKind::Integer => raw
            .parse::<i32>()
            .is_err()
            .then(|| format!("{} must be a whole number", field.label)),
        FieldKind::Date => parse_date(raw)
            .is_none()
            .then(|| format!("{} must be a date (YYYY-MM-DD)", field.label)),
        FieldKind::Time => parse_time(raw)
            .is_none()
            .then(|| format!("{} must be a time (HH:MM)", field.label)),
        FieldKind::Text | FieldKind::Flag => None,
    }
}

fn parse_number(raw: &str) -> Option<f64> {
    raw.trim().parse::<f64>().ok().filter(|v| v.is_finite())
}

fn parse_date(raw: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d").ok()
}

fn parse_time(raw: &str) -> Option<NaiveTime> {
    let raw = raw.trim();
    NaiveTime::parse_from_str(raw, "%H:%M:%S")
        .or_else(|_| NaiveTime::parse_from_str(raw, "%H:%M"))
        .ok()
}

fn is_checked(raw: &str) -> bool {
    matches!(raw.trim(), "true" | "on" | "1")
}

/// The JSON value of an input. Anything that does not parse is `null`.
fn parse_value(field: &FieldSpec, raw: &str) -> Value {
    let raw = raw.trim();
    match field.kind {
        FieldKind::Number(_) => parse_number(raw).map_or(Value::Null, Value::from),
        FieldKind::Integer => raw.parse::<i32>().map_or(Value::Null, Value::from),
        FieldKind::Text if raw.is_empty() => Value::Null,
        FieldKind::Text => Value::from(raw),
        FieldKind::Flag => Value::Bool(is_checked(raw)),
        FieldKind::Date => {
            parse_date(raw).map_or(Value::Null, |d| Value::from(d.format("%Y-%m-%d").to_string()))
        }
        FieldKind::Time => {
            parse_time(raw).map_or(Value::Null, |t| Value::from(t.format("%H:%M:%S").to_string()))
        }
    }
}

/// Text of a stored value as it would have been typed in.
fn raw_text(value: &Value) -> Option<String> {
    match value {
        Value::Null => None,
        Value::Bool(b) => Some(b.to_string()),
        Value::Number(n) => Some(n.to_string()),
        Value::String(s) => Some(s.clone()),
        Value::Array(_) | Value::Object(_) => None,
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct EntryForm {
    kind: FormKind,
    values: BTreeMap<&'static str, String>,
    warnings: BTreeMap<&'static str, String>,
}

impl EntryForm {
    pub fn new(kind: FormKind) -> Self {
        EntryForm {
            kind,
            values: BTreeMap::new(),
            warnings: BTreeMap::new(),
        }
    }

    pub fn kind(&self) -> FormKind {
        self.kind
    }

    /// Sets the raw text of `name` and checks it. Returns the warning of the field, if any.
    /// Names the form does not have are ignored.
    pub fn input(&mut self, name: &str, raw: &str) -> Option<&str> {
        let Some(field) = self.kind.field(name) else {
            tracing::debug!(field = name, "Ignoring input for a field the form does not have");
            return None;
        };
        self.values.insert(field.name, raw.to_string());
        self.revalidate(field)
    }

    /// Ticks or unticks a checkbox.
    pub fn check(&mut self, name: &str, checked: bool) {
        self.input(name, if checked { "true" } else { "false" });
    }

    /// Checks the field again when it loses focus.
    pub fn blur(&mut self, name: &str) -> Option<&str> {
        let field = self.kind.field(name)?;
        self.revalidate(field)
    }

    fn revalidate(&mut self, field: &'static FieldSpec) -> Option<&str> {
        let raw = self.values.get(field.name).map(String::as_str).unwrap_or("");
        match check_input(field, raw) {
            Some(warning) => {
                self.warnings.insert(field.name, warning);
            }
            None => {
                self.warnings.remove(field.name);
            }
        }
        self.warnings.get(field.name).map(String::as_str)
    }

    pub fn value(&self, name: &str) -> Option<&str> {
        self.values.get(name).map(String::as_str)
    }

    pub fn warning(&self, name: &str) -> Option<&str> {
        self.warnings.get(name).map(String::as_str)
    }

    pub fn warnings(&self) -> &BTreeMap<&'static str, String> {
        &self.warnings
    }

    pub fn is_empty(&self) -> bool {
        self.values.values().all(|v| v.trim().is_empty())
    }

    /// Labels of the required fields without a usable value, in form order.
    pub fn missing_required(&self) -> Vec<&'static str> {
        self.kind
            .fields()
            .iter()
            .filter(|f| f.required)
            .filter(|f| {
                parse_value(f, self.values.get(f.name).map(String::as_str).unwrap_or("")).is_null()
            })
            .map(|f| f.label)
            .collect()
    }

    /// Parses all inputs into the record of the form. `component` is used by the forms that
    /// are taken against a component.
    pub fn assemble(&self, component: Option<&Component>) -> Result<RecordAdd, serde_json::Error> {
        let mut fields = Map::new();
        for field in self.kind.fields() {
            let raw = self.values.get(field.name).map(String::as_str).unwrap_or("");
            fields.insert(field.name.to_string(), parse_value(field, raw));
        }
        if self.kind.needs_component() {
            fields.insert(
                "component_in_production".to_string(),
                component.map_or(Value::Null, |c| Value::from(c.code.as_str())),
            );
        }
        let fields = Value::Object(fields);

        Ok(match self.kind {
            FormKind::QcReading => RecordAdd::Reading(serde_json::from_value(fields)?),
            FormKind::Inoculation(event_type) => RecordAdd::Inoculation {
                event_type,
                record: serde_json::from_value(fields)?,
            },
            FormKind::QcRegister => RecordAdd::Register(serde_json::from_value(fields)?),
            FormKind::TimeStudy => RecordAdd::TimeStudy(serde_json::from_value(fields)?),
        })
    }

    pub fn clear(&mut self) {
        self.values.clear();
        self.warnings.clear();
    }

    /// Copies the carried over fields of `record` into the form and checks them. Fields the
    /// record has no value for are emptied. Returns the number of copied values.
    pub fn prefill(&mut self, record: &QcRecord) -> usize {
        let stored = match record.to_fields() {
            Ok(stored) => stored,
            Err(e) => {
                tracing::warn!(error = %e, "Cannot read the offered record");
                return 0;
            }
        };
        let mut copied = 0;
        for field in self.kind.fields().iter().filter(|f| f.prefill) {
            match stored.get(field.name).and_then(raw_text) {
                Some(raw) => {
                    self.values.insert(field.name, raw);
                    copied += 1;
                }
                None => {
                    self.values.remove(field.name);
                }
            }
            self.revalidate(field);
        }
        copied
    }
}
