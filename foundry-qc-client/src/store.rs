// Copyright 2024 Foundry QC developers
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://apache.org/licenses/LICENSE-2.0> or the MIT license <LICENSE-MIT or
// http://opensource.org/licenses/MIT>, at your option. This file may not be
// copied, modified, or distributed except according to those terms.

//! The two collaborators of an entry session, and their implementation by [`QcClient`].

use crate::{ClientError, QcClient};
use async_trait::async_trait;
use foundry_qc::domain::{
    Component, Created, EventType, InoculationFilter, QcRecord, RecordAdd, RecordKind,
};
use std::sync::Arc;

/// Reference list of components.
#[async_trait]
pub trait ComponentDirectory: Send + Sync {
    /// Components whose code or description contains `query`, case-insensitive.
    async fn search(&self, query: &str) -> Result<Vec<Component>, ClientError>;

    /// Sets `last_used` of `code` to now. Returns false if no such component exists.
    async fn touch(&self, code: &str) -> Result<bool, ClientError>;
}

/// Where stored records live.
#[async_trait]
pub trait RecordStore: Send + Sync {
    async fn create(&self, record: &RecordAdd) -> Result<Created<QcRecord>, ClientError>;

    /// Most recent record of `source` taken against `component`.
    async fn latest(
        &self,
        source: &PrefillSource,
        component: &str,
    ) -> Result<Option<QcRecord>, ClientError>;

    async fn list_all(&self, kind: RecordKind) -> Result<Vec<QcRecord>, ClientError>;
}

/// The records a form takes its prefill from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PrefillSource {
    QcReadings,
    /// Inoculation checks, of one event type if given.
    Inoculation { event_type: Option<EventType> },
}

#[async_trait]
impl<T: RecordStore + ?Sized> RecordStore for Arc<T> {
    async fn create(&self, record: &RecordAdd) -> Result<Created<QcRecord>, ClientError> {
        self.as_ref().create(record).await
    }

    async fn latest(
        &self,
        source: &PrefillSource,
        component: &str,
    ) -> Result<Option<QcRecord>, ClientError> {
        self.as_ref().latest(source, component).await
    }

    async fn list_all(&self, kind: RecordKind) -> Result<Vec<QcRecord>, ClientError> {
        self.as_ref().list_all(kind).await
    }
}

#[async_trait]
impl ComponentDirectory for QcClient {
    async fn search(&self, query: &str) -> Result<Vec<Component>, ClientError> {
        self.search_components(query).await
    }

    async fn touch(&self, code: &str) -> Result<bool, ClientError> {
        Ok(self.touch_component(code).await?.touched)
    }
}

#[async_trait]
impl RecordStore for QcClient {
    async fn create(&self, record: &RecordAdd) -> Result<Created<QcRecord>, ClientError> {
        Ok(match record {
            RecordAdd::Reading(r) => {
                let created = self.add_qc_reading(r).await?;
                Created::new(created.message, QcRecord::QcReading(created.record))
            }
            RecordAdd::Inoculation { event_type, record } => {
                let created = self.add_inoculation(*event_type, record).await?;
                Created::new(created.message, QcRecord::Inoculation(created.record))
            }
            RecordAdd::Register(r) => {
                let created = self.add_qc_register(r).await?;
                Created::new(created.message, QcRecord::QcRegister(created.record))
            }
            RecordAdd::TimeStudy(r) => {
                let created = self.add_time_study(r).await?;
                Created::new(created.message, QcRecord::TimeStudy(created.record))
            }
        })
    }

    async fn latest(
        &self,
        source: &PrefillSource,
        component: &str,
    ) -> Result<Option<QcRecord>, ClientError> {
        Ok(match source {
            PrefillSource::QcReadings => self
                .latest_qc_reading(component)
                .await?
                .map(QcRecord::QcReading),
            PrefillSource::Inoculation { event_type } => {
                let filter = InoculationFilter {
                    component: Some(component.to_string()),
                    event_type: *event_type,
                };
                self.latest_inoculation(&filter)
                    .await?
                    .map(QcRecord::Inoculation)
            }
        })
    }

    async fn list_all(&self, kind: RecordKind) -> Result<Vec<QcRecord>, ClientError> {
        Ok(match kind {
            RecordKind::QcReading => self
                .get_qc_readings()
                .await?
                .into_iter()
                .map(QcRecord::QcReading)
                .collect(),
            RecordKind::Inoculation => self
                .get_inoculation_events(&InoculationFilter::default())
                .await?
                .into_iter()
                .map(QcRecord::Inoculation)
                .collect(),
            RecordKind::QcRegister => self
                .get_qc_register_entries()
                .await?
                .into_iter()
                .map(QcRecord::QcRegister)
                .collect(),
            RecordKind::TimeStudy => self
                .get_time_study_entries()
                .await?
                .into_iter()
                .map(QcRecord::TimeStudy)
                .collect(),
        })
    }
}
