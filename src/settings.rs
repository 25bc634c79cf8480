use chrono::Duration;
use config::{Config, ConfigError, Environment};
use serde::{Deserialize, Serialize};
use url::Url;

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Settings {
    /// Base URL of the booking backend that automates the gym site.
    pub backend_base_url: Url,
    /// Session token presented to the backend on every call.
    pub backend_session_token: String,
    /// Token clients of this service must present.
    pub auth_token: String,
    pub debug: bool,
    pub enable_swagger: bool,
    pub port: u16,
    /// IANA timezone the gym publishes its schedule in.
    pub timezone: String,
    /// Hours before a class at which the backend starts its booking attempt.
    pub booking_window_hours: i64,
    /// Hours before a class after which cancellation is penalised.
    pub cancellation_lead_hours: i64,
    /// Optional minutes-before-deadline threshold for the closing-soon flag.
    #[serde(default)]
    pub cancellation_warning_minutes: Option<i64>,
    /// Assumed class length for calendar events.
    pub class_duration_min: u32,
}

impl Settings {
    pub fn from_env() -> Result<Self, ConfigError> {
        let _ = dotenvy::dotenv();

        let config = Config::builder()
            // Load from environment variables with APP_ prefix
            .add_source(Environment::with_prefix("APP").separator("_"))
            .set_default("backend_base_url", "http://localhost:5000/api")?
            .set_default("backend_session_token", "")?
            .set_default("auth_token", "assistant-token-change-me")?
            .set_default("debug", false)?
            .set_default("enable_swagger", true)?
            .set_default("port", 8080)?
            .set_default("timezone", "Europe/Rome")?
            .set_default("booking_window_hours", 48)?
            .set_default("cancellation_lead_hours", 2)?
            .set_default("class_duration_min", 60)?
            .build()?;

        config.try_deserialize()
    }

    pub fn booking_window(&self) -> Duration {
        Duration::hours(self.booking_window_hours)
    }

    pub fn cancellation_lead(&self) -> Duration {
        Duration::hours(self.cancellation_lead_hours)
    }

    pub fn cancellation_warning(&self) -> Option<Duration> {
        self.cancellation_warning_minutes.map(Duration::minutes)
    }
}
