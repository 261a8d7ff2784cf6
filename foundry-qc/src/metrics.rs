// Copyright 2024 Foundry QC developers
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://apache.org/licenses/LICENSE-2.0> or the MIT license <LICENSE-MIT or
// http://opensource.org/licenses/MIT>, at your option. This file may not be
// copied, modified, or distributed except according to those terms.

use crate::constants::ERR_UNEXPECTED_ERROR;
use crate::domain::RecordKind;
use actix_web::{web, HttpResponse};
use prometheus::{Encoder, IntCounter, IntCounterVec, Opts, Registry, TextEncoder};

/// Counters of stored records and of failed component touches.
#[derive(Clone)]
pub struct SubmissionMetrics {
    registry: Registry,
    records_created: IntCounterVec,
    touch_failures: IntCounter,
}

impl SubmissionMetrics {
    pub fn new() -> Result<SubmissionMetrics, prometheus::Error> {
        let registry = Registry::new();
        let records_created = IntCounterVec::new(
            Opts::new(
                "foundry_qc_records_created_total",
                "Number of QC records stored, by kind",
            ),
            &["kind"],
        )?;
        let touch_failures = IntCounter::new(
            "foundry_qc_touch_failures_total",
            "Number of component touches that failed",
        )?;
        registry.register(Box::new(records_created.clone()))?;
        registry.register(Box::new(touch_failures.clone()))?;

        // Export every kind from the start, also the ones nobody submitted yet.
        for kind in RecordKind::ALL {
            records_created.with_label_values(&[kind.as_str()]);
        }

        Ok(SubmissionMetrics {
            registry,
            records_created,
            touch_failures,
        })
    }

    pub fn record_created(&self, kind: RecordKind) {
        self.records_created
            .with_label_values(&[kind.as_str()])
            .inc();
    }

    pub fn touch_failed(&self) {
        self.touch_failures.inc();
    }

    pub fn records_created(&self, kind: RecordKind) -> u64 {
        self.records_created.with_label_values(&[kind.as_str()]).get()
    }

    /// Renders all metrics in the Prometheus text format.
    pub fn encode(&self) -> Result<String, anyhow::Error> {
        let mut buffer = Vec::new();
        TextEncoder::new().encode(&self.registry.gather(), &mut buffer)?;
        Ok(String::from_utf8(buffer)?)
    }
}

#[derive(thiserror::Error)]
pub enum MetricsError {
    #[error("{}", ERR_UNEXPECTED_ERROR)]
    UnexpectedError(#[from] anyhow::Error),
}

debug_for_error!(MetricsError);
responseerror_for_error!(MetricsError, UnexpectedError => INTERNAL_SERVER_ERROR;);

pub async fn metrics(
    metrics: web::Data<SubmissionMetrics>,
) -> Result<HttpResponse, MetricsError> {
    let body = metrics.encode()?;
    Ok(HttpResponse::Ok()
        .content_type("text/plain; version=0.0.4")
        .body(body))
}
