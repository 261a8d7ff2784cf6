// Copyright 2024 Foundry QC developers
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://apache.org/licenses/LICENSE-2.0> or the MIT license <LICENSE-MIT or
// http://opensource.org/licenses/MIT>, at your option. This file may not be
// copied, modified, or distributed except according to those terms.

//! Client side of the foundry QC data capture service.
//!
//! # Tutorial
//!
//! Operators record process parameters against a component (a product code from the reference
//! list) at fixed intervals. This crate provides everything an entry front end needs for that:
//!
//! * [`QcClient`], an HTTP client for the service,
//! * [`ComponentSelector`] to search and select the component production is running,
//! * [`ReminderEngine`], which reminds the operator every hour (by default) to take the next
//!   reading and offers the latest stored record as prefill,
//! * [`EntryForm`] and [`SubmissionPipeline`], which validate readings as they are typed and
//!   turn a form into a stored record,
//! * [`EntrySession`], which wires all of the above together.
//!
//! ## Connecting to the service
//!
//! ```
//! use foundry_qc_client::QcClientBuilder;
//! # use foundry_qc_client::ClientError;
//!
//! # fn main() -> Result<(), ClientError> {
//! let client = QcClientBuilder::new()
//!     .address(&"localhost", 8000)
//!     .timeout(20)
//!     .build()?;
//! # Ok(())
//! # }
//! ```
//!
//! ## Submitting a reading
//!
//! ```no_run
//! # use foundry_qc_client::QcClientBuilder;
//! use foundry_qc::domain::QcReadingAdd;
//! # #[tokio::main]
//! # async fn main() -> Result<(), anyhow::Error> {
//! # let client = QcClientBuilder::new().address(&"localhost", 8000).build()?;
//! let mut reading = QcReadingAdd::new("X123")?;
//! reading.hot_box_temp = Some(27.0);
//! reading.air_pressure = Some(6.0);
//! reading.inject_pressure = Some(1.5);
//! reading.is_new_bag = true;
//!
//! let created = client.add_qc_reading(&reading).await?;
//! println!("{}: reading {}", created.message, created.record.id);
//! # Ok(())
//! # }
//! ```
//!
//! ## Running an entry session
//!
//! ```no_run
//! # use foundry_qc_client::{EntrySession, FormKind, QcClientBuilder};
//! # #[tokio::main]
//! # async fn main() -> Result<(), anyhow::Error> {
//! # let client = QcClientBuilder::new().address(&"localhost", 8000).build()?;
//! let mut session = EntrySession::new(client, std::time::Duration::from_secs(3600));
//!
//! let found = session.search("X1").await?;
//! if let Some(component) = found.first().cloned() {
//!     session.select_component(component).await;
//! }
//!
//! session.form_mut().input("hot_box_temp", "27");
//! session.submit().await?;
//!
//! // An hour later the reminder fires with the latest reading as prefill.
//! if let Some(reminder) = session.next_reminder().await {
//!     session.respond_to_reminder(reminder, true);
//! }
//! # Ok(())
//! # }
//! ```

pub mod configuration;
pub mod form;
pub mod pipeline;
pub mod reminder;
pub mod selector;
pub mod session;
pub mod store;

#[cfg(test)]
mod testing;

pub use form::{EntryForm, FieldKind, FieldSpec, FormKind};
pub use pipeline::{SubmissionPipeline, SubmitError};
pub use reminder::{ReminderEngine, ReminderEvent, ReminderPhase, ReminderState};
pub use selector::ComponentSelector;
pub use session::EntrySession;
pub use store::{ComponentDirectory, PrefillSource, RecordStore};

use chrono::Duration;
use foundry_qc::domain::{
    Component, Created, EventType, InoculationAdd, InoculationFilter, InoculationRecord,
    QcReading, QcReadingAdd, QcRegisterAdd, QcRegisterEntry, TimeStudyAdd, TimeStudyEntry,
    TouchResponse,
};
use foundry_qc::error::ErrorBody;
use serde::de::DeserializeOwned;
use urlencoding::encode;

static APP_USER_AGENT: &str = concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION"),);

const ERR_INVALID_TIME_INTERVAL: &str = "Invalid time interval";

#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum ClientError {
    InvalidTimeInterval,
    ReqwestError(reqwest::Error),
    /// The service answered with an error status. `error` is shown to the operator as is,
    /// `details` only goes to the logs.
    Server {
        status: u16,
        error: String,
        details: Option<String>,
    },
    Other(String),
}

impl std::fmt::Display for ClientError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ClientError::InvalidTimeInterval => write!(f, "{ERR_INVALID_TIME_INTERVAL}"),
            ClientError::ReqwestError(e) => write!(f, "Reqwest Error: {e}"),
            ClientError::Server { error, .. } => write!(f, "{error}"),
            ClientError::Other(s) => write!(f, "Other client error: {s}"),
        }
    }
}

impl From<reqwest::Error> for ClientError {
    fn from(error: reqwest::Error) -> Self {
        ClientError::ReqwestError(error)
    }
}

impl From<chrono::OutOfRangeError> for ClientError {
    fn from(_: chrono::OutOfRangeError) -> Self {
        ClientError::InvalidTimeInterval
    }
}

impl From<anyhow::Error> for ClientError {
    fn from(error: anyhow::Error) -> Self {
        ClientError::Other(error.to_string())
    }
}

/// The `QcClientBuilder` is used to build an instance of [`QcClient`].
///
/// # Examples
///
/// Using an connection string:
///
/// ```
/// # use foundry_qc_client::{QcClientBuilder, ClientError};
/// #
/// # fn main() -> Result<(), ClientError> {
/// let client = QcClientBuilder::new()
///     .connection_string(&"http://localhost:8000")
///     .build()?;
/// # Ok(())
/// # }
/// ```
#[derive(Clone)]
pub struct QcClientBuilder {
    address: String,
    timeout: Duration,
}

impl QcClientBuilder {
    pub fn new() -> QcClientBuilder {
        QcClientBuilder {
            address: "127.0.0.1:8000".into(),
            timeout: Duration::seconds(30),
        }
    }

    /// Set the address and port of the service.
    #[must_use]
    pub fn address<T: AsRef<str>>(mut self, address: &T, port: u16) -> Self {
        self.address = format!("{}:{}", address.as_ref(), port);
        self
    }

    /// Set a connection string of the form ``http://<address>:<port>``.
    #[must_use]
    pub fn connection_string<T: AsRef<str>>(mut self, connection_string: &T) -> Self {
        self.address = connection_string.as_ref().into();
        self
    }

    /// Set a timeout in seconds for HTTP requests.
    #[must_use]
    pub fn timeout(mut self, timeout: i64) -> Self {
        self.timeout = Duration::seconds(timeout);
        self
    }

    #[must_use]
    pub fn timeout_duration(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Build a [`QcClient`] from `QcClientBuilder`.
    ///
    /// # Errors
    ///
    /// * [`ClientError::InvalidTimeInterval`] - If the timeout duration is less than zero.
    /// * [`ClientError::ReqwestError`] - If there was an error building the HTTP client.
    pub fn build(self) -> Result<QcClient, ClientError> {
        let client = reqwest::ClientBuilder::new()
            .user_agent(APP_USER_AGENT)
            .timeout(self.timeout.to_std()?)
            .build()?;

        let address = if self.address.starts_with("http://") || self.address.starts_with("https://")
        {
            self.address.trim_end_matches('/').to_string()
        } else {
            format!("http://{}", self.address.trim_end_matches('/'))
        };

        Ok(QcClient { address, client })
    }
}

impl Default for QcClientBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// Talks to the foundry QC service. Cheap to clone.
#[derive(Clone, Debug)]
pub struct QcClient {
    address: String,
    client: reqwest::Client,
}

impl QcClient {
    /// Returns ``true`` if the service is healthy, ``false`` otherwise.
    #[tracing::instrument(name = "Checking health of the QC service.", skip(self))]
    pub async fn health_check(&self) -> bool {
        match self
            .client
            .get(format!("{}/health_check", &self.address))
            .send()
            .await
        {
            Ok(s) => s.error_for_status().is_ok(),
            Err(_) => false,
        }
    }

    /// The full reference list of components.
    #[tracing::instrument(name = "Getting all components.", skip(self))]
    pub async fn list_components(&self) -> Result<Vec<Component>, ClientError> {
        self.get_json("/components").await
    }

    /// Components whose code or description contains `query`, at most ten.
    #[tracing::instrument(name = "Searching components.", skip(self))]
    pub async fn search_components(&self, query: &str) -> Result<Vec<Component>, ClientError> {
        self.get_json(&format!("/components/search?query={}", encode(query)))
            .await
    }

    /// Marks the component as just used. `touched` is false for an unknown code.
    #[tracing::instrument(name = "Touching a component.", skip(self), level = "debug")]
    pub async fn touch_component(&self, code: &str) -> Result<TouchResponse, ClientError> {
        self.post_json("/components/touch", &serde_json::json!({ "code": code }))
            .await
    }

    #[tracing::instrument(
        name = "Sending a QC reading.",
        skip(self, reading),
        fields(component = %reading.component_in_production)
    )]
    pub async fn add_qc_reading(
        &self,
        reading: &QcReadingAdd,
    ) -> Result<Created<QcReading>, ClientError> {
        self.post_json("/qc", reading).await
    }

    #[tracing::instrument(
        name = "Sending an inoculation check.",
        skip(self, check),
        fields(component = %check.component_in_production)
    )]
    pub async fn add_inoculation(
        &self,
        event_type: EventType,
        check: &InoculationAdd,
    ) -> Result<Created<InoculationRecord>, ClientError> {
        self.post_json(
            &format!("/inoculation/{}", event_type.path_segment()),
            check,
        )
        .await
    }

    #[tracing::instrument(
        name = "Sending a QC register entry.",
        skip(self, entry),
        fields(heat_code = %entry.heat_code)
    )]
    pub async fn add_qc_register(
        &self,
        entry: &QcRegisterAdd,
    ) -> Result<Created<QcRegisterEntry>, ClientError> {
        self.post_json("/qc-register", entry).await
    }

    #[tracing::instrument(
        name = "Sending a time study entry.",
        skip(self, entry),
        fields(heat_code = %entry.heat_code)
    )]
    pub async fn add_time_study(
        &self,
        entry: &TimeStudyAdd,
    ) -> Result<Created<TimeStudyEntry>, ClientError> {
        self.post_json("/time-study", entry).await
    }

    /// All general QC readings, newest first.
    #[tracing::instrument(name = "Getting all QC readings.", skip(self))]
    pub async fn get_qc_readings(&self) -> Result<Vec<QcReading>, ClientError> {
        self.get_json("/qc").await
    }

    /// The most recent reading of `component`, if there is one.
    #[tracing::instrument(name = "Getting the latest QC reading.", skip(self))]
    pub async fn latest_qc_reading(&self, component: &str) -> Result<Option<QcReading>, ClientError> {
        self.get_json(&format!("/qc/latest?component={}", encode(component)))
            .await
    }

    /// Inoculation checks matching `filter`, newest first.
    #[tracing::instrument(name = "Getting inoculation checks.", skip(self))]
    pub async fn get_inoculation_events(
        &self,
        filter: &InoculationFilter,
    ) -> Result<Vec<InoculationRecord>, ClientError> {
        self.get_json(&format!("/inoculation{}", inoculation_query(filter)))
            .await
    }

    #[tracing::instrument(name = "Getting the latest inoculation check.", skip(self))]
    pub async fn latest_inoculation(
        &self,
        filter: &InoculationFilter,
    ) -> Result<Option<InoculationRecord>, ClientError> {
        self.get_json(&format!("/inoculation/latest{}", inoculation_query(filter)))
            .await
    }

    #[tracing::instrument(name = "Getting all QC register entries.", skip(self))]
    pub async fn get_qc_register_entries(&self) -> Result<Vec<QcRegisterEntry>, ClientError> {
        self.get_json("/qc-register").await
    }

    #[tracing::instrument(name = "Getting all time study entries.", skip(self))]
    pub async fn get_time_study_entries(&self) -> Result<Vec<TimeStudyEntry>, ClientError> {
        self.get_json("/time-study").await
    }

    async fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T, ClientError> {
        let response = self
            .client
            .get(format!("{}{}", &self.address, path))
            .send()
            .await?;
        Ok(error_for_status(response).await?.json().await?)
    }

    async fn post_json<B: serde::Serialize + ?Sized, T: DeserializeOwned>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T, ClientError> {
        let response = self
            .client
            .post(format!("{}{}", &self.address, path))
            .header("Content-Type", "application/json")
            .json(body)
            .send()
            .await?;
        Ok(error_for_status(response).await?.json().await?)
    }
}

/// Turns a non-2xx response into [`ClientError::Server`], keeping the message of the service.
async fn error_for_status(response: reqwest::Response) -> Result<reqwest::Response, ClientError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let text = response.text().await?;
    let (error, details) = match serde_json::from_str::<ErrorBody>(&text) {
        Ok(body) => (body.error, body.details),
        Err(_) if text.trim().is_empty() => (status.to_string(), None),
        Err(_) => (text, None),
    };
    tracing::debug!(
        status = status.as_u16(),
        %error,
        details = details.as_deref().unwrap_or_default(),
        "Service rejected the request"
    );
    Err(ClientError::Server {
        status: status.as_u16(),
        error,
        details,
    })
}

fn inoculation_query(filter: &InoculationFilter) -> String {
    let mut params = Vec::new();
    if let Some(component) = filter.component.as_ref() {
        params.push(format!("component={}", encode(component)));
    }
    if let Some(event_type) = filter.event_type {
        params.push(format!("event_type={}", encode(event_type.as_str())));
    }
    if params.is_empty() {
        String::new()
    } else {
        format!("?{}", params.join("&"))
    }
}
