// Copyright 2024 Foundry QC developers
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://apache.org/licenses/LICENSE-2.0> or the MIT license <LICENSE-MIT or
// http://opensource.org/licenses/MIT>, at your option. This file may not be
// copied, modified, or distributed except according to those terms.

use actix_web::{web, HttpResponse};
use sqlx::PgPool;

pub async fn health_check(pool: web::Data<PgPool>) -> HttpResponse {
    if pool.acquire().await.is_err() {
        tracing::warn!("Health check failed to acquire a database connection");
        return HttpResponse::InternalServerError().finish();
    }
    HttpResponse::Ok().finish()
}
