// Copyright 2024 Foundry QC developers
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://apache.org/licenses/LICENSE-2.0> or the MIT license <LICENSE-MIT or
// http://opensource.org/licenses/MIT>, at your option. This file may not be
// copied, modified, or distributed except according to those terms.

use crate::constants::{ERR_UNEXPECTED_ERROR, SEARCH_LIMIT};
use crate::domain::{Component, SearchQuery, TouchRequest, TouchResponse, ValidCode};
use crate::metrics::SubmissionMetrics;
use actix_web::{web, HttpResponse};
use sqlx::PgPool;

#[derive(thiserror::Error)]
pub enum ComponentError {
    #[error("{}", ERR_UNEXPECTED_ERROR)]
    UnexpectedError(#[from] anyhow::Error),
}

debug_for_error!(ComponentError);
responseerror_for_error!(ComponentError, UnexpectedError => INTERNAL_SERVER_ERROR;);

#[tracing::instrument(name = "Listing all components", skip(pool))]
pub async fn list_components(pool: web::Data<PgPool>) -> Result<HttpResponse, ComponentError> {
    let components = get_components(&pool)
        .await
        .map_err(|e| ComponentError::UnexpectedError(e.into()))?;
    Ok(HttpResponse::Ok().json(components))
}

#[tracing::instrument(
    name = "Searching components",
    skip(query, pool),
    fields(query = %query.query)
)]
pub async fn search_components(
    query: web::Query<SearchQuery>,
    pool: web::Data<PgPool>,
) -> Result<HttpResponse, ComponentError> {
    if query.is_blank() {
        return Ok(HttpResponse::Ok().json(Vec::<Component>::new()));
    }
    let components = search(&query, &pool)
        .await
        .map_err(|e| ComponentError::UnexpectedError(e.into()))?;
    Ok(HttpResponse::Ok().json(components))
}

#[tracing::instrument(
    name = "Touching a component",
    skip(body, pool),
    fields(code = %body.code)
)]
pub async fn touch_component(
    body: web::Json<TouchRequest>,
    pool: web::Data<PgPool>,
) -> Result<HttpResponse, ComponentError> {
    let touched = touch(&body.code, &pool)
        .await
        .map_err(|e| ComponentError::UnexpectedError(e.into()))?;
    Ok(HttpResponse::Ok().json(TouchResponse {
        code: body.code.to_string(),
        touched,
    }))
}

#[tracing::instrument(name = "Retrieving components from database", skip(pool))]
pub async fn get_components(pool: &PgPool) -> Result<Vec<Component>, GetComponentsError> {
    sqlx::query_as::<_, Component>(
        r#"SELECT code, description, last_used
           FROM components
           ORDER BY code
        "#,
    )
    .fetch_all(pool)
    .await
    .map_err(GetComponentsError)
}

/// Case-insensitive substring match on code or description, in store order.
#[tracing::instrument(name = "Searching components in database", skip(query, pool))]
pub async fn search(
    query: &SearchQuery,
    pool: &PgPool,
) -> Result<Vec<Component>, GetComponentsError> {
    sqlx::query_as::<_, Component>(
        r#"SELECT code, description, last_used
           FROM components
           WHERE code ILIKE $1 OR description ILIKE $1
           LIMIT $2
        "#,
    )
    .bind(query.like_pattern())
    .bind(SEARCH_LIMIT)
    .fetch_all(pool)
    .await
    .map_err(GetComponentsError)
}

/// Sets `last_used` of the component to now. Returns false if no component has this code.
#[tracing::instrument(name = "Updating last_used of component", skip(pool))]
pub async fn touch(code: &ValidCode, pool: &PgPool) -> Result<bool, TouchComponentError> {
    let result = sqlx::query("UPDATE components SET last_used = now() WHERE code = $1")
        .bind(code.as_ref())
        .execute(pool)
        .await
        .map_err(TouchComponentError)?;
    Ok(result.rows_affected() > 0)
}

/// Touches the component a record was just stored for. A failure is logged and counted, the
/// record stays stored.
pub async fn touch_after_create(code: &ValidCode, pool: &PgPool, metrics: &SubmissionMetrics) {
    match touch(code, pool).await {
        Ok(true) => {}
        Ok(false) => tracing::debug!(%code, "No component with this code, nothing to touch"),
        Err(e) => {
            metrics.touch_failed();
            tracing::warn!(error = ?e, %code, "Failed to touch component");
        }
    }
}

pub struct GetComponentsError(sqlx::Error);

debug_for_error!(GetComponentsError);
error_for_error!(GetComponentsError);
display_for_error!(
    GetComponentsError,
    "A database error was encountered while trying to read components."
);

pub struct TouchComponentError(sqlx::Error);

debug_for_error!(TouchComponentError);
error_for_error!(TouchComponentError);
display_for_error!(
    TouchComponentError,
    "A database error was encountered while trying to touch a component."
);
