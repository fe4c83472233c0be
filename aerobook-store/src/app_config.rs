use serde::Deserialize;
use std::env;

#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    pub server: ServerConfig,
    /// No database section means the in-process store is used.
    pub database: Option<DatabaseConfig>,
    #[serde(default)]
    pub booking: BookingRules,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    pub port: u16,
}

#[derive(Debug, Deserialize, Clone)]
pub struct DatabaseConfig {
    pub url: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct BookingRules {
    #[serde(default = "default_reference_attempts")]
    pub reference_attempts: u32,
    #[serde(default = "default_admission_retries")]
    pub admission_retries: u32,
    #[serde(default = "default_lock_timeout_ms")]
    pub lock_timeout_ms: u64,
}

fn default_reference_attempts() -> u32 {
    16
}

fn default_admission_retries() -> u32 {
    3
}

fn default_lock_timeout_ms() -> u64 {
    2000
}

impl Default for BookingRules {
    fn default() -> Self {
        Self {
            reference_attempts: default_reference_attempts(),
            admission_retries: default_admission_retries(),
            lock_timeout_ms: default_lock_timeout_ms(),
        }
    }
}

impl Config {
    pub fn load() -> Result<Self, config::ConfigError> {
        let run_mode = env::var("RUN_MODE").unwrap_or_else(|_| "development".into());

        let s = config::Config::builder()
            .add_source(config::File::with_name("config/default"))
            // Environment-specific file is optional.
            .add_source(config::File::with_name(&format!("config/{}", run_mode)).required(false))
            // Local overrides, not checked in.
            .add_source(config::File::with_name("config/local").required(false))
            // E.g. `AEROBOOK__SERVER__PORT=9000`.
            .add_source(config::Environment::with_prefix("AEROBOOK").separator("__"))
            .build()?;

        s.try_deserialize()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_booking_rules_defaults() {
        let rules = BookingRules::default();
        assert_eq!(rules.reference_attempts, 16);
        assert_eq!(rules.admission_retries, 3);
        assert_eq!(rules.lock_timeout_ms, 2000);
    }
}
