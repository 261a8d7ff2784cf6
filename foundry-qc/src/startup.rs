// Copyright 2024 Foundry QC developers
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://apache.org/licenses/LICENSE-2.0> or the MIT license <LICENSE-MIT or
// http://opensource.org/licenses/MIT>, at your option. This file may not be
// copied, modified, or distributed except according to those terms.

use crate::constants::{ERR_INVALID_BODY, ERR_INVALID_QUERY, ERR_NOT_FOUND};
use crate::error::ErrorBody;
use crate::metrics::{metrics, SubmissionMetrics};
use crate::routes::{
    add_inoculation_event, add_qc_reading, add_qc_register_entry, add_time_study_entry,
    health_check, latest_inoculation_event, latest_qc_reading, list_components,
    list_inoculation_events, list_qc_readings, list_qc_register_entries,
    list_time_study_entries, search_components, touch_component,
};
use actix_web::dev::Server;
use actix_web::error::InternalError;
use actix_web::http::Method;
use actix_web::middleware::DefaultHeaders;
use actix_web::{web, App, HttpRequest, HttpResponse, HttpServer};
use sqlx::PgPool;
use std::net::TcpListener;
use tracing_actix_web::TracingLogger;

/// Configures and starts the HttpServer on an already bound listener.
pub fn run(
    listener: TcpListener,
    db_pool: PgPool,
    submission_metrics: SubmissionMetrics,
    web_workers: usize,
) -> Result<Server, anyhow::Error> {
    let db_pool = web::Data::new(db_pool);
    let submission_metrics = web::Data::new(submission_metrics);

    let server = HttpServer::new(move || {
        App::new()
            // Logging middleware
            .wrap(TracingLogger::default())
            .wrap(cors_headers())
            .app_data(json_config())
            .app_data(query_config())
            .route("/{tail:.*}", web::method(Method::OPTIONS).to(preflight))
            .route("/health_check", web::get().to(health_check))
            .route("/metrics", web::get().to(metrics))
            // Components
            .route("/components", web::get().to(list_components))
            .route("/components/search", web::get().to(search_components))
            .route("/components/touch", web::post().to(touch_component))
            // Records
            .service(
                web::resource("/qc")
                    .route(web::post().to(add_qc_reading))
                    .route(web::get().to(list_qc_readings)),
            )
            .route("/qc/latest", web::get().to(latest_qc_reading))
            .route("/inoculation", web::get().to(list_inoculation_events))
            .route("/inoculation/latest", web::get().to(latest_inoculation_event))
            .route("/inoculation/{event}", web::post().to(add_inoculation_event))
            .service(
                web::resource("/qc-register")
                    .route(web::post().to(add_qc_register_entry))
                    .route(web::get().to(list_qc_register_entries)),
            )
            .service(
                web::resource("/time-study")
                    .route(web::post().to(add_time_study_entry))
                    .route(web::get().to(list_time_study_entries)),
            )
            .app_data(db_pool.clone())
            .app_data(submission_metrics.clone())
            .default_service(web::route().to(fallback))
    })
    .workers(web_workers)
    .listen(listener)?
    .run();

    Ok(server)
}

/// Any origin may call the service.
fn cors_headers() -> DefaultHeaders {
    DefaultHeaders::new()
        .add(("Access-Control-Allow-Origin", "*"))
        .add(("Access-Control-Allow-Methods", "GET, POST, OPTIONS"))
        .add(("Access-Control-Allow-Headers", "Content-Type"))
}

/// Malformed bodies, including missing required fields, get a 400 in the usual error shape.
fn json_config() -> web::JsonConfig {
    web::JsonConfig::default().error_handler(|err, _req| {
        let body = ErrorBody::new(ERR_INVALID_BODY).with_details(err.to_string());
        tracing::debug!(error = %body, "Rejected request body");
        InternalError::from_response(err, HttpResponse::BadRequest().json(body)).into()
    })
}

fn query_config() -> web::QueryConfig {
    web::QueryConfig::default().error_handler(|err, _req| {
        let body = ErrorBody::new(ERR_INVALID_QUERY).with_details(err.to_string());
        InternalError::from_response(err, HttpResponse::BadRequest().json(body)).into()
    })
}

async fn preflight() -> HttpResponse {
    HttpResponse::NoContent().finish()
}

async fn fallback(req: HttpRequest) -> HttpResponse {
    HttpResponse::NotFound().json(ErrorBody::new(ERR_NOT_FOUND).with_details(req.path()))
}
