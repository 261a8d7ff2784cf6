// Copyright 2024 Foundry QC developers
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://apache.org/licenses/LICENSE-2.0> or the MIT license <LICENSE-MIT or
// http://opensource.org/licenses/MIT>, at your option. This file may not be
// copied, modified, or distributed except according to those terms.

use foundry_qc::configuration::get_configuration;
use foundry_qc::metrics::SubmissionMetrics;
use foundry_qc::startup::run;
use foundry_qc::telemetry::{get_subscriber, init_subscriber};
use sqlx::postgres::PgPoolOptions;
use std::net::TcpListener;

#[tokio::main]
async fn main() -> Result<(), anyhow::Error> {
    // Read in configuration
    let configuration = get_configuration()?;

    // Set up logging
    let subscriber = get_subscriber("foundry-qc".into(), configuration.log_level, std::io::stdout);
    init_subscriber(subscriber);

    tracing::info!(environment = configuration.environment.as_str(), "Starting foundry-qc");

    // Create a connection pool for the PostgreSQL database
    let connection_pool = PgPoolOptions::new()
        .acquire_timeout(std::time::Duration::from_secs(2))
        .connect_lazy_with(configuration.database.with_db());

    let submission_metrics = SubmissionMetrics::new()?;

    // Create a TcpListener for a given address and port
    let address = format!(
        "{}:{}",
        configuration.application.addr, configuration.application.port
    );
    let listener = TcpListener::bind(&address)?;
    tracing::info!(%address, "Listening");

    // Start server
    run(
        listener,
        connection_pool,
        submission_metrics,
        configuration.application.web_workers,
    )?
    .await?;

    Ok(())
}
