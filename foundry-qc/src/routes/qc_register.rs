// Copyright 2024 Foundry QC developers
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://apache.org/licenses/LICENSE-2.0> or the MIT license <LICENSE-MIT or
// http://opensource.org/licenses/MIT>, at your option. This file may not be
// copied, modified, or distributed except according to those terms.

use crate::constants::ERR_UNEXPECTED_ERROR;
use crate::domain::{Created, QcRegisterAdd, QcRegisterEntry, RecordKind};
use crate::metrics::SubmissionMetrics;
use actix_web::{web, HttpResponse};
use sqlx::PgPool;

#[derive(thiserror::Error)]
pub enum QcRegisterError {
    #[error("{}", ERR_UNEXPECTED_ERROR)]
    UnexpectedError(#[from] anyhow::Error),
}

debug_for_error!(QcRegisterError);
responseerror_for_error!(QcRegisterError, UnexpectedError => INTERNAL_SERVER_ERROR;);

#[tracing::instrument(
    name = "Adding a QC register entry",
    skip(entry, pool, metrics),
    fields(part_name = %entry.part_name, heat_code = %entry.heat_code)
)]
pub async fn add_qc_register_entry(
    entry: web::Json<QcRegisterAdd>,
    pool: web::Data<PgPool>,
    metrics: web::Data<SubmissionMetrics>,
) -> Result<HttpResponse, QcRegisterError> {
    let stored = insert_qc_register_entry(&entry, &pool)
        .await
        .map_err(|e| QcRegisterError::UnexpectedError(e.into()))?;
    metrics.record_created(RecordKind::QcRegister);
    Ok(HttpResponse::Created().json(Created::new(
        "QC Register data submitted successfully",
        stored,
    )))
}

#[tracing::instrument(name = "Getting all QC register entries", skip(pool))]
pub async fn list_qc_register_entries(
    pool: web::Data<PgPool>,
) -> Result<HttpResponse, QcRegisterError> {
    let entries = get_qc_register_entries(&pool)
        .await
        .map_err(|e| QcRegisterError::UnexpectedError(e.into()))?;
    Ok(HttpResponse::Ok().json(entries))
}

#[tracing::instrument(name = "Inserting QC register entry into database", skip(entry, pool))]
pub async fn insert_qc_register_entry(
    entry: &QcRegisterAdd,
    pool: &PgPool,
) -> Result<QcRegisterEntry, QcRegisterDbError> {
    let pre = &entry.pre_treatment;
    let post = &entry.post_treatment;
    let pouring = &entry.pouring;
    let mg = &entry.magnesium;
    let tapping = &entry.tapping;

    sqlx::query_as::<_, QcRegisterEntry>(
        r#"INSERT INTO qc_register (
               record_date, disa_line, part_name, heat_code, qty_moulds, remarks,
               c1, si1, mn1, p1, s1, mg1, f_l1, cu1, cr1,
               c2, si2, mn2, s2, cr2, cu2, sn2,
               pouring_time, pouring_temp, pp_code, fc_no_heat_no,
               mg_kgs, res_mg, converter_percent, rec_mg_percent, stream_innoculat, p_time_sec,
               treatment_no, con_no, tapping_time, corrective_addition_kgs, tapping_wt_kgs
           )
           VALUES (
               $1, $2, $3, $4, $5, $6,
               $7, $8, $9, $10, $11, $12, $13, $14, $15,
               $16, $17, $18, $19, $20, $21, $22,
               $23, $24, $25, $26,
               $27, $28, $29, $30, $31, $32,
               $33, $34, $35, $36, $37
           )
           RETURNING *
        "#,
    )
    .bind(entry.record_date)
    .bind(entry.disa_line.as_deref())
    .bind(entry.part_name.as_ref())
    .bind(entry.heat_code.as_ref())
    .bind(entry.qty_moulds)
    .bind(entry.remarks.as_deref())
    .bind(pre.c1)
    .bind(pre.si1)
    .bind(pre.mn1)
    .bind(pre.p1)
    .bind(pre.s1)
    .bind(pre.mg1)
    .bind(pre.f_l1)
    .bind(pre.cu1)
    .bind(pre.cr1)
    .bind(post.c2)
    .bind(post.si2)
    .bind(post.mn2)
    .bind(post.s2)
    .bind(post.cr2)
    .bind(post.cu2)
    .bind(post.sn2)
    .bind(pouring.pouring_time)
    .bind(pouring.pouring_temp)
    .bind(pouring.pp_code.as_deref())
    .bind(pouring.fc_no_heat_no.as_deref())
    .bind(mg.mg_kgs)
    .bind(mg.res_mg)
    .bind(mg.converter_percent)
    .bind(mg.rec_mg_percent)
    .bind(mg.stream_innoculat)
    .bind(mg.p_time_sec)
    .bind(tapping.treatment_no.as_deref())
    .bind(tapping.con_no.as_deref())
    .bind(tapping.tapping_time)
    .bind(tapping.corrective_addition_kgs)
    .bind(tapping.tapping_wt_kgs)
    .fetch_one(pool)
    .await
    .map_err(QcRegisterDbError)
}

#[tracing::instrument(name = "Retrieving QC register entries from database", skip(pool))]
pub async fn get_qc_register_entries(
    pool: &PgPool,
) -> Result<Vec<QcRegisterEntry>, QcRegisterDbError> {
    sqlx::query_as::<_, QcRegisterEntry>(
        r#"SELECT * FROM qc_register
           ORDER BY created_at DESC, id DESC
        "#,
    )
    .fetch_all(pool)
    .await
    .map_err(QcRegisterDbError)
}

pub struct QcRegisterDbError(sqlx::Error);

debug_for_error!(QcRegisterDbError);
error_for_error!(QcRegisterDbError);
display_for_error!(
    QcRegisterDbError,
    "A database error was encountered while trying to access the QC register."
);
