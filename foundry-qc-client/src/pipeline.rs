// Copyright 2024 Foundry QC developers
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://apache.org/licenses/LICENSE-2.0> or the MIT license <LICENSE-MIT or
// http://opensource.org/licenses/MIT>, at your option. This file may not be
// copied, modified, or distributed except according to those terms.

use crate::form::EntryForm;
use crate::store::RecordStore;
use crate::ClientError;
use foundry_qc::domain::{Component, Created, QcRecord};

const ERR_NO_COMPONENT: &str = "Please select a component first";

/// Why a form was not stored.
#[derive(Debug, thiserror::Error)]
pub enum SubmitError {
    #[error("{}", ERR_NO_COMPONENT)]
    NoComponent,
    #[error("Please fill in the required fields: {}", .0.join(", "))]
    MissingFields(Vec<&'static str>),
    #[error("{0}")]
    Invalid(String),
    /// The store refused the record or could not be reached. Displays the message of the
    /// service verbatim.
    #[error("{0}")]
    Rejected(#[from] ClientError),
}

/// Turns forms into stored records.
pub struct SubmissionPipeline<S> {
    store: S,
}

impl<S: RecordStore> SubmissionPipeline<S> {
    pub fn new(store: S) -> Self {
        SubmissionPipeline { store }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Runs the local checks, then creates the record. On success the form is cleared, on
    /// failure it is left as it is. Nothing is sent if a local check fails.
    ///
    /// Range warnings of the form do not matter here.
    #[tracing::instrument(
        name = "Submitting a form",
        skip(self, form, component),
        fields(form = ?form.kind(), component = component.map(|c| c.code.as_str()))
    )]
    pub async fn submit(
        &self,
        form: &mut EntryForm,
        component: Option<&Component>,
    ) -> Result<Created<QcRecord>, SubmitError> {
        if form.kind().needs_component() && component.is_none() {
            return Err(SubmitError::NoComponent);
        }
        let missing = form.missing_required();
        if !missing.is_empty() {
            return Err(SubmitError::MissingFields(missing));
        }
        let record = form
            .assemble(component)
            .map_err(|e| SubmitError::Invalid(e.to_string()))?;

        match self.store.create(&record).await {
            Ok(created) => {
                tracing::info!(id = created.record.id(), kind = %created.record.kind(), "{}", created.message);
                form.clear();
                Ok(created)
            }
            Err(e) => {
                tracing::warn!(error = ?e, kind = %record.kind(), "Failed to submit form");
                Err(e.into())
            }
        }
    }
}
