//! Minimal channel config: listen address and the development/production switch.
//! Loaded from HOST, PORT and BOT_ENV.

use anyhow::Result;
use std::env;

pub const DEFAULT_PORT: u16 = 3978;

/// Channel endpoint config (listen address and wiring mode only).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChannelConfig {
    pub host: String,
    pub port: u16,
    /// Development wiring: emulator transport plus the engine management API.
    pub dev_mode: bool,
}

impl ChannelConfig {
    /// Loads from env: HOST (default 0.0.0.0), PORT (default 3978), BOT_ENV (`development`
    /// selects dev wiring, anything else production).
    pub fn from_env() -> Result<Self> {
        let host = env::var("HOST").unwrap_or_else(|_| "0.0.0.0".to_string());
        let port = match env::var("PORT") {
            Ok(raw) => raw
                .parse()
                .map_err(|_| anyhow::anyhow!("PORT is not a valid port number: {}", raw))?,
            Err(_) => DEFAULT_PORT,
        };
        let dev_mode = env::var("BOT_ENV")
            .map(|v| is_development(&v))
            .unwrap_or(false);
        Ok(Self {
            host,
            port,
            dev_mode,
        })
    }

    /// Listen address as `host:port`.
    pub fn addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

impl Default for ChannelConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: DEFAULT_PORT,
            dev_mode: false,
        }
    }
}

fn is_development(value: &str) -> bool {
    matches!(
        value.trim().to_ascii_lowercase().as_str(),
        "development" | "dev" | "true" | "1"
    )
}
