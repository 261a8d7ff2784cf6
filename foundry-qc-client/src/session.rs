// Copyright 2024 Foundry QC developers
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://apache.org/licenses/LICENSE-2.0> or the MIT license <LICENSE-MIT or
// http://opensource.org/licenses/MIT>, at your option. This file may not be
// copied, modified, or distributed except according to those terms.

//! The state of one operator at the entry screen.

use crate::form::{EntryForm, FormKind};
use crate::pipeline::{SubmissionPipeline, SubmitError};
use crate::reminder::{ReminderEngine, ReminderEvent, ReminderState};
use crate::selector::ComponentSelector;
use crate::store::{ComponentDirectory, RecordStore};
use crate::{ClientError, QcClient};
use foundry_qc::domain::{Component, Created, QcRecord};
use std::sync::Arc;
use std::time::Duration;

/// Ties selection, reminders, the active form and submission together.
///
/// Selecting a component touches it, restarts the reminder and prefills the form from the
/// latest record of the component. After a successful submission the record list is reloaded
/// and the latest record fetched again, so [`EntrySession::last_known`] is the record just
/// stored.
pub struct EntrySession<D, S> {
    selector: ComponentSelector<D>,
    pipeline: SubmissionPipeline<Arc<S>>,
    reminder: ReminderEngine<S>,
    form: EntryForm,
    records: Vec<QcRecord>,
    last_known: Option<QcRecord>,
}

impl EntrySession<QcClient, QcClient> {
    /// A session on the general QC reading form talking to the service through `client`.
    pub fn new(client: QcClient, reminder_interval: Duration) -> Self {
        EntrySession::with_parts(client.clone(), Arc::new(client), reminder_interval)
    }
}

impl<D: ComponentDirectory, S: RecordStore + 'static> EntrySession<D, S> {
    pub fn with_parts(directory: D, store: Arc<S>, reminder_interval: Duration) -> Self {
        let form = EntryForm::new(FormKind::QcReading);
        let reminder = ReminderEngine::new(store.clone(), reminder_interval);
        reminder.set_source(form.kind().prefill_source());
        EntrySession {
            selector: ComponentSelector::new(directory),
            pipeline: SubmissionPipeline::new(store),
            reminder,
            form,
            records: Vec::new(),
            last_known: None,
        }
    }

    pub async fn search(&self, query: &str) -> Result<Vec<Component>, ClientError> {
        self.selector.search(query).await
    }

    /// Makes `component` the active one: touches it, restarts the reminder and prefills the
    /// form from its latest record.
    pub async fn select_component(&mut self, component: Component) {
        let component = self.selector.select(component).await.clone();
        self.reminder.arm(component);
        if let Some(record) = self.refresh_last_known().await {
            self.form.prefill(&record);
        }
    }

    pub fn active_component(&self) -> Option<&Component> {
        self.selector.active()
    }

    /// Switches to an empty form of `kind`. Reminders take their prefill from the new form,
    /// queued reminders carrying a prefill of the old form are dropped.
    pub fn switch_form(&mut self, kind: FormKind) {
        self.form = EntryForm::new(kind);
        self.reminder.set_source(kind.prefill_source());
        self.records.clear();
        self.last_known = None;
    }

    pub fn form(&self) -> &EntryForm {
        &self.form
    }

    pub fn form_mut(&mut self) -> &mut EntryForm {
        &mut self.form
    }

    /// Records of the active form, newest first, as of the last reload.
    pub fn records(&self) -> &[QcRecord] {
        &self.records
    }

    /// The latest record of the active component, as of the last fetch.
    pub fn last_known(&self) -> Option<&QcRecord> {
        self.last_known.as_ref()
    }

    pub fn reminder_state(&self) -> ReminderState {
        self.reminder.state()
    }

    pub async fn submit(&mut self) -> Result<Created<QcRecord>, SubmitError> {
        let created = self
            .pipeline
            .submit(&mut self.form, self.selector.active())
            .await?;
        self.reload_records().await;
        self.refresh_last_known().await;
        Ok(created)
    }

    /// Fetches the record list of the active form again. A failure keeps the old list.
    pub async fn reload_records(&mut self) {
        let kind = self.form.kind().record_kind();
        match self.pipeline.store().list_all(kind).await {
            Ok(records) => self.records = records,
            Err(e) => tracing::warn!(error = %e, %kind, "Failed to reload records"),
        }
    }

    async fn refresh_last_known(&mut self) -> Option<QcRecord> {
        let source = self.form.kind().prefill_source()?;
        let component = self.selector.active()?;
        match self.pipeline.store().latest(&source, &component.code).await {
            Ok(latest) => {
                self.last_known = latest.clone();
                latest
            }
            Err(e) => {
                tracing::warn!(error = %e, code = %component.code, "Failed to fetch the latest record");
                None
            }
        }
    }

    /// Waits for the next reminder.
    pub async fn next_reminder(&mut self) -> Option<ReminderEvent> {
        self.reminder.next_event().await
    }

    /// Applies the answer of the operator to a reminder. An accepted prefill is copied into
    /// the form. The reminder keeps running either way. Returns the number of copied values.
    ///
    /// Reminders of another component, or with a prefill of another form, are ignored.
    pub fn respond_to_reminder(&mut self, event: ReminderEvent, accept: bool) -> usize {
        if self.selector.active() != Some(&event.component) {
            tracing::debug!(code = %event.component.code, "Ignoring reminder of another component");
            return 0;
        }
        let Some(record) = event.prefill else {
            return 0;
        };
        let expected = self.form.kind().record_kind();
        if record.kind() != expected {
            tracing::debug!(kind = %record.kind(), %expected, "Ignoring reminder of another form");
            return 0;
        }
        let copied = if accept {
            self.form.prefill(&record)
        } else {
            0
        };
        self.last_known = Some(record);
        copied
    }
}
