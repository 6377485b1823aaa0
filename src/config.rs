// Copyright (C) 2026 Michael Wilson <mike@mdwn.dev>
//
// This program is free software: you can redistribute it and/or modify it under
// the terms of the GNU General Public License as published by the Free Software
// Foundation, version 3.
//
// This program is distributed in the hope that it will be useful, but WITHOUT
// ANY WARRANTY; without even the implied warranty of MERCHANTABILITY or FITNESS
// FOR A PARTICULAR PURPOSE. See the GNU General Public License for more details.
//
// You should have received a copy of the GNU General Public License along with
// this program. If not, see <https://www.gnu.org/licenses/>.
//
use std::{path::Path, time::Duration};

use config::{Config, Environment, File, FileFormat};
use duration_string::DurationString;
use serde::Deserialize;
use tracing::warn;

/// The default animation interval.
pub const DEFAULT_INTERVAL: Duration = Duration::from_millis(200);

/// Environment variables with this prefix override the config file, e.g. PIGLOW_INTERVAL.
const ENV_PREFIX: &str = "PIGLOW";

/// Typed error for settings failures.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Config load/parse error: {0}")]
    Load(#[from] config::ConfigError),

    #[error("Invalid interval '{0}': {1}")]
    Interval(String, duration_string::Error),

    #[error("Invalid interval")]
    NonPositiveInterval,
}

/// A YAML representation of the player settings.
#[derive(Deserialize, Clone, Default, Debug)]
pub struct Settings {
    /// Time between animation frames, as a duration string such as "150ms".
    interval: Option<String>,
}

impl Settings {
    /// Loads settings from an optional YAML file, then from PIGLOW_* environment variables.
    pub fn load(path: Option<&Path>) -> Result<Settings, ConfigError> {
        let mut builder = Config::builder();
        if let Some(path) = path {
            builder = builder.add_source(File::from(path).format(FileFormat::Yaml));
        }

        Ok(builder
            .add_source(Environment::with_prefix(ENV_PREFIX))
            .build()?
            .try_deserialize()?)
    }

    /// Gets the configured interval between frames.
    pub fn interval(&self) -> Result<Duration, ConfigError> {
        let Some(interval) = self.interval.as_ref() else {
            return Ok(DEFAULT_INTERVAL);
        };

        let duration: Duration = DurationString::from_string(interval.clone())
            .map_err(|e| ConfigError::Interval(interval.clone(), e))?
            .into();
        if duration.is_zero() {
            return Err(ConfigError::NonPositiveInterval);
        }
        Ok(duration)
    }

    /// Resolves the interval given on the command line, in milliseconds. A missing or
    /// unparseable argument falls back to the configured interval; zero or negative
    /// values are rejected.
    pub fn interval_from_arg(&self, arg: Option<&str>) -> Result<Duration, ConfigError> {
        let Some(arg) = arg else {
            return self.interval();
        };

        match arg.trim().parse::<i64>() {
            Ok(millis) if millis <= 0 => Err(ConfigError::NonPositiveInterval),
            Ok(millis) => Ok(Duration::from_millis(millis.unsigned_abs())),
            Err(_) => {
                warn!(interval = arg, "Unparseable interval, using the configured one.");
                self.interval()
            }
        }
    }
}
