// Copyright 2024 Foundry QC developers
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://apache.org/licenses/LICENSE-2.0> or the MIT license <LICENSE-MIT or
// http://opensource.org/licenses/MIT>, at your option. This file may not be
// copied, modified, or distributed except according to those terms.

use crate::constants::ERR_UNEXPECTED_ERROR;
use crate::domain::{Created, LatestQuery, QcReading, QcReadingAdd, RecordKind};
use crate::metrics::SubmissionMetrics;
use crate::routes::touch_after_create;
use actix_web::{web, HttpResponse};
use sqlx::PgPool;

#[derive(thiserror::Error)]
pub enum QcReadingError {
    #[error("{}", ERR_UNEXPECTED_ERROR)]
    UnexpectedError(#[from] anyhow::Error),
}

debug_for_error!(QcReadingError);
responseerror_for_error!(QcReadingError, UnexpectedError => INTERNAL_SERVER_ERROR;);

#[tracing::instrument(
    name = "Adding a QC reading",
    skip(reading, pool, metrics),
    fields(component = %reading.component_in_production)
)]
pub async fn add_qc_reading(
    reading: web::Json<QcReadingAdd>,
    pool: web::Data<PgPool>,
    metrics: web::Data<SubmissionMetrics>,
) -> Result<HttpResponse, QcReadingError> {
    let stored = insert_qc_reading(&reading, &pool)
        .await
        .map_err(|e| QcReadingError::UnexpectedError(e.into()))?;
    metrics.record_created(RecordKind::QcReading);

    touch_after_create(&reading.component_in_production, &pool, &metrics).await;

    Ok(HttpResponse::Created().json(Created::new("QC reading recorded", stored)))
}

#[tracing::instrument(name = "Getting all QC readings", skip(pool))]
pub async fn list_qc_readings(pool: web::Data<PgPool>) -> Result<HttpResponse, QcReadingError> {
    let readings = get_qc_readings(&pool)
        .await
        .map_err(|e| QcReadingError::UnexpectedError(e.into()))?;
    Ok(HttpResponse::Ok().json(readings))
}

/// Responds with the most recent reading of the component, or `null`.
#[tracing::instrument(
    name = "Getting the latest QC reading",
    skip(query, pool),
    fields(component = %query.component)
)]
pub async fn latest_qc_reading(
    query: web::Query<LatestQuery>,
    pool: web::Data<PgPool>,
) -> Result<HttpResponse, QcReadingError> {
    let reading = get_latest_qc_reading(query.component.trim(), &pool)
        .await
        .map_err(|e| QcReadingError::UnexpectedError(e.into()))?;
    Ok(HttpResponse::Ok().json(reading))
}

#[tracing::instrument(name = "Inserting QC reading into database", skip(reading, pool))]
pub async fn insert_qc_reading(
    reading: &QcReadingAdd,
    pool: &PgPool,
) -> Result<QcReading, QcReadingDbError> {
    sqlx::query_as::<_, QcReading>(
        r#"INSERT INTO qc_readings (
               component_in_production, flow_rate_setting_a, flow_rate_display_b,
               hot_box_temp, air_pressure, inject_pressure, feed_pipe_condition,
               powder_size, moisture, is_new_bag, air_drier_function, filter_cleaning,
               gauge_test, hourly_time
           )
           VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, COALESCE($14, now()))
           RETURNING *
        "#,
    )
    .bind(reading.component_in_production.as_ref())
    .bind(reading.flow_rate_setting_a)
    .bind(reading.flow_rate_display_b)
    .bind(reading.hot_box_temp)
    .bind(reading.air_pressure)
    .bind(reading.inject_pressure)
    .bind(reading.feed_pipe_condition.as_deref())
    .bind(reading.powder_size)
    .bind(reading.moisture)
    .bind(reading.is_new_bag)
    .bind(reading.air_drier_function)
    .bind(reading.filter_cleaning)
    .bind(reading.gauge_test)
    .bind(reading.hourly_time)
    .fetch_one(pool)
    .await
    .map_err(QcReadingDbError)
}

#[tracing::instrument(name = "Retrieving QC readings from database", skip(pool))]
pub async fn get_qc_readings(pool: &PgPool) -> Result<Vec<QcReading>, QcReadingDbError> {
    sqlx::query_as::<_, QcReading>(
        r#"SELECT * FROM qc_readings
           ORDER BY hourly_time DESC, id DESC
        "#,
    )
    .fetch_all(pool)
    .await
    .map_err(QcReadingDbError)
}

/// Ties on `hourly_time` go to the reading stored last.
#[tracing::instrument(name = "Retrieving latest QC reading from database", skip(pool))]
pub async fn get_latest_qc_reading(
    component: &str,
    pool: &PgPool,
) -> Result<Option<QcReading>, QcReadingDbError> {
    sqlx::query_as::<_, QcReading>(
        r#"SELECT * FROM qc_readings
           WHERE component_in_production = $1
           ORDER BY hourly_time DESC, id DESC
           LIMIT 1
        "#,
    )
    .bind(component)
    .fetch_optional(pool)
    .await
    .map_err(QcReadingDbError)
}

pub struct QcReadingDbError(sqlx::Error);

debug_for_error!(QcReadingDbError);
error_for_error!(QcReadingDbError);
display_for_error!(
    QcReadingDbError,
    "A database error was encountered while trying to access QC readings."
);
