// Copyright 2024 Foundry QC developers
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://apache.org/licenses/LICENSE-2.0> or the MIT license <LICENSE-MIT or
// http://opensource.org/licenses/MIT>, at your option. This file may not be
// copied, modified, or distributed except according to those terms.

//! In-memory collaborators for the unit tests.

use crate::store::{ComponentDirectory, PrefillSource, RecordStore};
use crate::ClientError;
use async_trait::async_trait;
use chrono::Utc;
use foundry_qc::domain::{Component, Created, QcRecord, RecordAdd, RecordKind};
use std::sync::{Arc, Mutex};

#[derive(Default)]
struct DirectoryState {
    components: Vec<Component>,
    searches: usize,
    touched: Vec<String>,
    fail_touches: bool,
}

#[derive(Clone, Default)]
pub struct FakeDirectory {
    state: Arc<Mutex<DirectoryState>>,
}

impl FakeDirectory {
    pub fn with_components(components: &[(&str, &str)]) -> Self {
        let directory = FakeDirectory::default();
        directory.state.lock().unwrap().components = components
            .iter()
            .map(|(code, description)| Component::new(*code, *description))
            .collect();
        directory
    }

    pub fn searches(&self) -> usize {
        self.state.lock().unwrap().searches
    }

    pub fn touched(&self) -> Vec<String> {
        self.state.lock().unwrap().touched.clone()
    }

    pub fn fail_touches(&self) {
        self.state.lock().unwrap().fail_touches = true;
    }
}

#[async_trait]
impl ComponentDirectory for FakeDirectory {
    async fn search(&self, query: &str) -> Result<Vec<Component>, ClientError> {
        let mut state = self.state.lock().unwrap();
        state.searches += 1;
        let query = query.to_lowercase();
        Ok(state
            .components
            .iter()
            .filter(|c| {
                c.code.to_lowercase().contains(&query)
                    || c.description.to_lowercase().contains(&query)
            })
            .cloned()
            .collect())
    }

    async fn touch(&self, code: &str) -> Result<bool, ClientError> {
        let mut state = self.state.lock().unwrap();
        state.touched.push(code.to_string());
        if state.fail_touches {
            return Err(ClientError::Other("connection refused".to_string()));
        }
        Ok(state.components.iter().any(|c| c.code == code))
    }
}

#[derive(Default)]
struct StoreState {
    records: Vec<QcRecord>,
    created: Vec<RecordAdd>,
    latest_calls: usize,
    list_calls: usize,
    fail_latest: bool,
    reject_with: Option<String>,
}

/// Keeps records in creation order and assigns ids and timestamps like the service does.
#[derive(Clone, Default)]
pub struct FakeStore {
    state: Arc<Mutex<StoreState>>,
}

impl FakeStore {
    /// Stores `record` without counting it as created through the store interface.
    pub fn seed(&self, record: RecordAdd) -> QcRecord {
        let mut state = self.state.lock().unwrap();
        let stored = stored_record(&record, state.records.len() as i64 + 1);
        state.records.push(stored.clone());
        stored
    }

    pub fn created(&self) -> Vec<RecordAdd> {
        self.state.lock().unwrap().created.clone()
    }

    pub fn latest_calls(&self) -> usize {
        self.state.lock().unwrap().latest_calls
    }

    pub fn list_calls(&self) -> usize {
        self.state.lock().unwrap().list_calls
    }

    pub fn fail_latest(&self, fail: bool) {
        self.state.lock().unwrap().fail_latest = fail;
    }

    pub fn reject_with(&self, error: &str) {
        self.state.lock().unwrap().reject_with = Some(error.to_string());
    }
}

fn stored_record(record: &RecordAdd, id: i64) -> QcRecord {
    let now = serde_json::json!(Utc::now());
    let mut value = match record {
        RecordAdd::Reading(r) => serde_json::to_value(r),
        RecordAdd::Inoculation { event_type, record } => {
            serde_json::to_value(record.clone().for_event(*event_type))
        }
        RecordAdd::Register(r) => serde_json::to_value(r),
        RecordAdd::TimeStudy(r) => serde_json::to_value(r),
    }
    .unwrap();
    value["id"] = serde_json::json!(id);
    match record {
        RecordAdd::Reading(_) => {
            if value["hourly_time"].is_null() {
                value["hourly_time"] = now;
            }
            QcRecord::QcReading(serde_json::from_value(value).unwrap())
        }
        RecordAdd::Inoculation { .. } => {
            value["micro_structure"] = serde_json::json!("Inoculation System Checks");
            value["macro_structure"] = serde_json::json!("Pre-Process");
            value["event_time"] = now;
            QcRecord::Inoculation(serde_json::from_value(value).unwrap())
        }
        RecordAdd::Register(_) => {
            value["created_at"] = now;
            QcRecord::QcRegister(serde_json::from_value(value).unwrap())
        }
        RecordAdd::TimeStudy(_) => {
            value["created_at"] = now;
            QcRecord::TimeStudy(serde_json::from_value(value).unwrap())
        }
    }
}

fn matches_source(record: &QcRecord, source: &PrefillSource, component: &str) -> bool {
    match (record, source) {
        (QcRecord::QcReading(r), PrefillSource::QcReadings) => {
            r.component_in_production == component
        }
        (QcRecord::Inoculation(r), PrefillSource::Inoculation { event_type }) => {
            r.component_in_production == component
                && event_type.map_or(true, |t| t == r.event_type)
        }
        _ => false,
    }
}

#[async_trait]
impl RecordStore for FakeStore {
    async fn create(&self, record: &RecordAdd) -> Result<Created<QcRecord>, ClientError> {
        let mut state = self.state.lock().unwrap();
        if let Some(error) = state.reject_with.clone() {
            return Err(ClientError::Server {
                status: 500,
                error,
                details: None,
            });
        }
        let stored = stored_record(record, state.records.len() as i64 + 1);
        state.records.push(stored.clone());
        state.created.push(record.clone());
        Ok(Created::new("Created", stored))
    }

    async fn latest(
        &self,
        source: &PrefillSource,
        component: &str,
    ) -> Result<Option<QcRecord>, ClientError> {
        let mut state = self.state.lock().unwrap();
        state.latest_calls += 1;
        if state.fail_latest {
            return Err(ClientError::Other("connection refused".to_string()));
        }
        Ok(state
            .records
            .iter()
            .rev()
            .find(|r| matches_source(r, source, component))
            .cloned())
    }

    async fn list_all(&self, kind: RecordKind) -> Result<Vec<QcRecord>, ClientError> {
        let mut state = self.state.lock().unwrap();
        state.list_calls += 1;
        Ok(state
            .records
            .iter()
            .rev()
            .filter(|r| r.kind() == kind)
            .cloned()
            .collect())
    }
}
