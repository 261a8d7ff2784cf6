// Copyright 2024 Foundry QC developers
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://apache.org/licenses/LICENSE-2.0> or the MIT license <LICENSE-MIT or
// http://opensource.org/licenses/MIT>, at your option. This file may not be
// copied, modified, or distributed except according to those terms.

use crate::constants::ERR_UNEXPECTED_ERROR;
use crate::domain::{
    Created, EventType, InoculationAdd, InoculationEvent, InoculationFilter, InoculationRecord,
    RecordKind,
};
use crate::metrics::SubmissionMetrics;
use crate::routes::touch_after_create;
use actix_web::{web, HttpResponse};
use sqlx::{PgPool, Postgres, QueryBuilder};

#[derive(thiserror::Error)]
pub enum InoculationError {
    #[error("Unknown inoculation check '{0}'")]
    UnknownEvent(String),
    #[error("{}", ERR_UNEXPECTED_ERROR)]
    UnexpectedError(#[from] anyhow::Error),
}

debug_for_error!(InoculationError);
responseerror_for_error!(
    InoculationError,
    UnknownEvent => NOT_FOUND;
    UnexpectedError => INTERNAL_SERVER_ERROR;
);

/// Stores a check of the event type named by the last path segment, e.g.
/// `/inoculation/bag-change`.
#[tracing::instrument(
    name = "Adding an inoculation check",
    skip(event, check, pool, metrics),
    fields(event = %event, component = %check.component_in_production)
)]
pub async fn add_inoculation_event(
    event: web::Path<String>,
    check: web::Json<InoculationAdd>,
    pool: web::Data<PgPool>,
    metrics: web::Data<SubmissionMetrics>,
) -> Result<HttpResponse, InoculationError> {
    let event_type = EventType::from_path_segment(&event)
        .ok_or_else(|| InoculationError::UnknownEvent(event.into_inner()))?;
    let event = check.into_inner().for_event(event_type);

    let stored = insert_inoculation_event(&event, &pool)
        .await
        .map_err(|e| InoculationError::UnexpectedError(e.into()))?;
    metrics.record_created(RecordKind::Inoculation);

    touch_after_create(&event.component_in_production, &pool, &metrics).await;

    Ok(HttpResponse::Created().json(Created::new(
        format!("Inoculation {event_type} check recorded"),
        stored,
    )))
}

#[tracing::instrument(name = "Getting inoculation checks", skip(filter, pool))]
pub async fn list_inoculation_events(
    filter: web::Query<InoculationFilter>,
    pool: web::Data<PgPool>,
) -> Result<HttpResponse, InoculationError> {
    let events = get_inoculation_events(&filter, None, &pool)
        .await
        .map_err(|e| InoculationError::UnexpectedError(e.into()))?;
    Ok(HttpResponse::Ok().json(events))
}

/// Responds with the most recent check matching the filters, or `null`.
#[tracing::instrument(name = "Getting the latest inoculation check", skip(filter, pool))]
pub async fn latest_inoculation_event(
    filter: web::Query<InoculationFilter>,
    pool: web::Data<PgPool>,
) -> Result<HttpResponse, InoculationError> {
    let event = get_inoculation_events(&filter, Some(1), &pool)
        .await
        .map_err(|e| InoculationError::UnexpectedError(e.into()))?
        .into_iter()
        .next();
    Ok(HttpResponse::Ok().json(event))
}

#[tracing::instrument(name = "Inserting inoculation check into database", skip(event, pool))]
pub async fn insert_inoculation_event(
    event: &InoculationEvent,
    pool: &PgPool,
) -> Result<InoculationRecord, InoculationDbError> {
    sqlx::query_as::<_, InoculationRecord>(
        r#"INSERT INTO inoculation_events (
               component_in_production, event_type,
               inoculation_flow_rate_rpm, inoculation_flow_rate_gms,
               air_pressure, inject_pressure, feed_pipe_condition,
               air_line_water_drainage, hopper_cleaning,
               inoculant_powder_size, inoculant_powder_moisture, is_new_bag,
               gauge_test, micro_structure, macro_structure
           )
           VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15)
           RETURNING *
        "#,
    )
    .bind(event.component_in_production.as_ref())
    .bind(event.event_type.as_str())
    .bind(event.inoculation_flow_rate_rpm)
    .bind(event.inoculation_flow_rate_gms)
    .bind(event.air_pressure)
    .bind(event.inject_pressure)
    .bind(event.feed_pipe_condition.as_deref())
    .bind(event.air_line_water_drainage)
    .bind(event.hopper_cleaning)
    .bind(event.inoculant_powder_size)
    .bind(event.inoculant_powder_moisture)
    .bind(event.is_new_bag)
    .bind(event.gauge_test)
    .bind(event.micro_structure())
    .bind(event.macro_structure())
    .fetch_one(pool)
    .await
    .map_err(InoculationDbError)
}

/// Checks matching `filter`, newest first.
#[tracing::instrument(name = "Retrieving inoculation checks from database", skip(pool))]
pub async fn get_inoculation_events(
    filter: &InoculationFilter,
    limit: Option<i64>,
    pool: &PgPool,
) -> Result<Vec<InoculationRecord>, InoculationDbError> {
    let mut query: QueryBuilder<Postgres> =
        QueryBuilder::new("SELECT * FROM inoculation_events WHERE TRUE");

    if let Some(component) = filter.component.as_ref() {
        query
            .push(" AND component_in_production = ")
            .push_bind(component.trim().to_string());
    }
    if let Some(event_type) = filter.event_type {
        query.push(" AND event_type = ").push_bind(event_type.as_str());
    }
    query.push(" ORDER BY event_time DESC, id DESC");
    if let Some(limit) = limit {
        query.push(" LIMIT ").push_bind(limit);
    }

    query
        .build_query_as::<InoculationRecord>()
        .fetch_all(pool)
        .await
        .map_err(InoculationDbError)
}

pub struct InoculationDbError(sqlx::Error);

debug_for_error!(InoculationDbError);
error_for_error!(InoculationDbError);
display_for_error!(
    InoculationDbError,
    "A database error was encountered while trying to access inoculation checks."
);
