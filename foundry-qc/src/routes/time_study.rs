// Copyright 2024 Foundry QC developers
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://apache.org/licenses/LICENSE-2.0> or the MIT license <LICENSE-MIT or
// http://opensource.org/licenses/MIT>, at your option. This file may not be
// copied, modified, or distributed except according to those terms.

use crate::constants::ERR_UNEXPECTED_ERROR;
use crate::domain::{Created, RecordKind, TimeStudyAdd, TimeStudyEntry};
use crate::metrics::SubmissionMetrics;
use actix_web::{web, HttpResponse};
use sqlx::PgPool;

#[derive(thiserror::Error)]
pub enum TimeStudyError {
    #[error("{}", ERR_UNEXPECTED_ERROR)]
    UnexpectedError(#[from] anyhow::Error),
}

debug_for_error!(TimeStudyError);
responseerror_for_error!(TimeStudyError, UnexpectedError => INTERNAL_SERVER_ERROR;);

#[tracing::instrument(
    name = "Adding a time study entry",
    skip(entry, pool, metrics),
    fields(shift = %entry.shift, heat_code = %entry.heat_code)
)]
pub async fn add_time_study_entry(
    entry: web::Json<TimeStudyAdd>,
    pool: web::Data<PgPool>,
    metrics: web::Data<SubmissionMetrics>,
) -> Result<HttpResponse, TimeStudyError> {
    let stored = insert_time_study_entry(&entry, &pool)
        .await
        .map_err(|e| TimeStudyError::UnexpectedError(e.into()))?;
    metrics.record_created(RecordKind::TimeStudy);
    Ok(HttpResponse::Created().json(Created::new(
        "Time study data successfully recorded",
        stored,
    )))
}

#[tracing::instrument(name = "Getting all time study entries", skip(pool))]
pub async fn list_time_study_entries(
    pool: web::Data<PgPool>,
) -> Result<HttpResponse, TimeStudyError> {
    let entries = get_time_study_entries(&pool)
        .await
        .map_err(|e| TimeStudyError::UnexpectedError(e.into()))?;
    Ok(HttpResponse::Ok().json(entries))
}

#[tracing::instrument(name = "Inserting time study entry into database", skip(entry, pool))]
pub async fn insert_time_study_entry(
    entry: &TimeStudyAdd,
    pool: &PgPool,
) -> Result<TimeStudyEntry, TimeStudyDbError> {
    let el = &entry.composition;
    let add = &entry.additives;

    sqlx::query_as::<_, TimeStudyEntry>(
        r#"INSERT INTO time_study (
               shift,
               c, si, mn, p, s, cr, ni, al, cu, sn, mo,
               cac2_s, fesi_sh, femn_sic, cu_fecr, carbon_steel,
               part_name, heat_code, grade
           )
           VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12,
                   $13, $14, $15, $16, $17, $18, $19, $20)
           RETURNING *
        "#,
    )
    .bind(entry.shift.as_ref())
    .bind(el.c)
    .bind(el.si)
    .bind(el.mn)
    .bind(el.p)
    .bind(el.s)
    .bind(el.cr)
    .bind(el.ni)
    .bind(el.al)
    .bind(el.cu)
    .bind(el.sn)
    .bind(el.mo)
    .bind(add.cac2_s)
    .bind(add.fesi_sh)
    .bind(add.femn_sic)
    .bind(add.cu_fecr)
    .bind(add.carbon_steel.as_deref())
    .bind(entry.part_name.as_ref())
    .bind(entry.heat_code.as_ref())
    .bind(entry.grade.as_ref())
    .fetch_one(pool)
    .await
    .map_err(TimeStudyDbError)
}

#[tracing::instrument(name = "Retrieving time study entries from database", skip(pool))]
pub async fn get_time_study_entries(
    pool: &PgPool,
) -> Result<Vec<TimeStudyEntry>, TimeStudyDbError> {
    sqlx::query_as::<_, TimeStudyEntry>(
        r#"SELECT * FROM time_study
           ORDER BY created_at DESC, id DESC
        "#,
    )
    .fetch_all(pool)
    .await
    .map_err(TimeStudyDbError)
}

pub struct TimeStudyDbError(sqlx::Error);

debug_for_error!(TimeStudyDbError);
error_for_error!(TimeStudyDbError);
display_for_error!(
    TimeStudyDbError,
    "A database error was encountered while trying to access time studies."
);
