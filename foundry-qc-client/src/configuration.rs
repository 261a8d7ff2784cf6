// Copyright 2024 Foundry QC developers
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://apache.org/licenses/LICENSE-2.0> or the MIT license <LICENSE-MIT or
// http://opensource.org/licenses/MIT>, at your option. This file may not be
// copied, modified, or distributed except according to those terms.

//! Settings of an entry front end.

use crate::QcClientBuilder;
use chrono::Duration;
use serde_aux::field_attributes::deserialize_number_from_string;

#[serde_with::serde_as]
#[derive(serde::Deserialize, Debug, Clone, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct ClientSettings {
    #[serde(default = "default_addr")]
    pub addr: String,
    #[serde(deserialize_with = "deserialize_number_from_string")]
    #[serde(default = "default_port")]
    pub port: u16,
    /// Timeout of a single request.
    #[serde(default = "default_timeout")]
    #[serde_as(as = "serde_with::DurationSeconds<i64>")]
    pub timeout: Duration,
    /// Time between two submission reminders.
    #[serde(default = "default_reminder_interval")]
    #[serde_as(as = "serde_with::DurationSeconds<i64>")]
    pub reminder_interval: Duration,
}

fn default_addr() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    8000
}

fn default_timeout() -> Duration {
    Duration::seconds(30)
}

fn default_reminder_interval() -> Duration {
    Duration::hours(1)
}

impl Default for ClientSettings {
    fn default() -> Self {
        ClientSettings {
            addr: default_addr(),
            port: default_port(),
            timeout: default_timeout(),
            reminder_interval: default_reminder_interval(),
        }
    }
}

impl ClientSettings {
    pub fn client_builder(&self) -> QcClientBuilder {
        QcClientBuilder::new()
            .address(&self.addr, self.port)
            .timeout_duration(self.timeout)
    }

    /// The reminder interval as used by the reminder engine. Intervals below one second are
    /// raised to one second.
    pub fn reminder_period(&self) -> std::time::Duration {
        self.reminder_interval
            .to_std()
            .unwrap_or_default()
            .max(std::time::Duration::from_secs(1))
    }
}

/// Loads the settings from `configuration/base.yaml`, an optional file given as first argument
/// and `FOUNDRY_QC_CLIENT_*` environment variables, later sources winning.
pub fn get_configuration() -> Result<ClientSettings, config::ConfigError> {
    let base_path = std::env::current_dir()
        .map_err(|e| config::ConfigError::Message(format!("Cannot determine current dir: {e}")))?;
    let configuration_directory = base_path.join("configuration");

    let settings = config::Config::builder()
        .add_source(config::File::from(configuration_directory.join("base")).required(false));

    let settings = match std::env::args().nth(1) {
        Some(file) => settings.add_source(
            config::File::from(file.as_ref())
                .required(false)
                .format(config::FileFormat::Yaml),
        ),
        None => settings,
    };

    settings
        .add_source(
            config::Environment::with_prefix("FOUNDRY_QC_CLIENT")
                .prefix_separator("_")
                .try_parsing(true),
        )
        .build()?
        .try_deserialize()
}
