use anyhow::Result;
use std::env;
use storebot_channel::ChannelConfig;

pub const DEFAULT_DATABASE_URL: &str = "./data/storebot.db";
pub const DEFAULT_TRAINING_CHANNEL_ID: &str = "training";
pub const DEFAULT_INVENTORY: &str = "apples,bananas,milk,bread";

/// Backend holding the per-conversation state records.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StateStoreType {
    Memory,
    Sqlite,
}

impl StateStoreType {
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "memory" => Some(Self::Memory),
            "sqlite" => Some(Self::Sqlite),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Memory => "memory",
            Self::Sqlite => "sqlite",
        }
    }
}

/// Storebot config, loaded from env. CLI flags override PORT and BOT_ENV.
#[derive(Debug, Clone)]
pub struct BotConfig {
    pub channel: ChannelConfig,
    /// STATE_STORE_TYPE as given; checked by [`BotConfig::validate`].
    pub state_store_type: String,
    pub database_url: String,
    pub log_file: Option<String>,
    pub training_channel_id: String,
    pub inventory: Vec<String>,
}

impl BotConfig {
    /// Loads from env. `port` overrides PORT; `dev` forces development wiring on.
    pub fn load(port: Option<u16>, dev: bool) -> Result<Self> {
        let mut channel = ChannelConfig::from_env()?;
        if let Some(port) = port {
            channel.port = port;
        }
        channel.dev_mode |= dev;

        let state_store_type =
            env::var("STATE_STORE_TYPE").unwrap_or_else(|_| "memory".to_string());
        let database_url =
            env::var("DATABASE_URL").unwrap_or_else(|_| DEFAULT_DATABASE_URL.to_string());
        let log_file = env::var("LOG_FILE").ok().filter(|s| !s.trim().is_empty());
        let training_channel_id = env::var("TRAINING_CHANNEL_ID")
            .unwrap_or_else(|_| DEFAULT_TRAINING_CHANNEL_ID.to_string());
        let inventory = parse_inventory(
            &env::var("INVENTORY").unwrap_or_else(|_| DEFAULT_INVENTORY.to_string()),
        );

        Ok(Self {
            channel,
            state_store_type,
            database_url,
            log_file,
            training_channel_id,
            inventory,
        })
    }

    /// Rejects an unknown store type or port 0.
    pub fn validate(&self) -> Result<()> {
        if StateStoreType::parse(&self.state_store_type).is_none() {
            anyhow::bail!(
                "STATE_STORE_TYPE must be `memory` or `sqlite`, got: {}",
                self.state_store_type
            );
        }
        if self.channel.port == 0 {
            anyhow::bail!("PORT must be non-zero");
        }
        Ok(())
    }

    /// Parsed store type; falls back to memory for a config that was never validated.
    pub fn store_type(&self) -> StateStoreType {
        StateStoreType::parse(&self.state_store_type).unwrap_or(StateStoreType::Memory)
    }
}

fn parse_inventory(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|item| !item.is_empty())
        .map(str::to_string)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    fn clear_env() {
        for key in [
            "HOST",
            "PORT",
            "BOT_ENV",
            "STATE_STORE_TYPE",
            "DATABASE_URL",
            "LOG_FILE",
            "TRAINING_CHANNEL_ID",
            "INVENTORY",
        ] {
            env::remove_var(key);
        }
    }

    #[test]
    #[serial]
    fn test_load_config_with_defaults() {
        clear_env();

        let config = BotConfig::load(None, false).unwrap();

        assert_eq!(config.channel.port, 3978);
        assert!(!config.channel.dev_mode);
        assert_eq!(config.store_type(), StateStoreType::Memory);
        assert_eq!(config.database_url, "./data/storebot.db");
        assert!(config.log_file.is_none());
        assert_eq!(config.training_channel_id, "training");
        assert_eq!(config.inventory, vec!["apples", "bananas", "milk", "bread"]);
        assert!(config.validate().is_ok());
    }

    #[test]
    #[serial]
    fn test_load_config_with_custom_values() {
        clear_env();
        env::set_var("PORT", "4000");
        env::set_var("BOT_ENV", "development");
        env::set_var("STATE_STORE_TYPE", "SQLite");
        env::set_var("DATABASE_URL", "/tmp/state.db");
        env::set_var("LOG_FILE", "logs/storebot.log");
        env::set_var("TRAINING_CHANNEL_ID", "studio");
        env::set_var("INVENTORY", " tea , ,coffee");

        let config = BotConfig::load(None, false).unwrap();

        assert_eq!(config.channel.port, 4000);
        assert!(config.channel.dev_mode);
        assert_eq!(config.store_type(), StateStoreType::Sqlite);
        assert_eq!(config.database_url, "/tmp/state.db");
        assert_eq!(config.log_file.as_deref(), Some("logs/storebot.log"));
        assert_eq!(config.training_channel_id, "studio");
        assert_eq!(config.inventory, vec!["tea", "coffee"]);

        clear_env();
    }

    #[test]
    #[serial]
    fn test_cli_flags_override_env() {
        clear_env();
        env::set_var("PORT", "4000");

        let config = BotConfig::load(Some(5000), true).unwrap();

        assert_eq!(config.channel.port, 5000);
        assert!(config.channel.dev_mode);

        clear_env();
    }

    #[test]
    #[serial]
    fn test_validate_rejects_unknown_store_type_and_port_zero() {
        clear_env();
        env::set_var("STATE_STORE_TYPE", "redis");
        let config = BotConfig::load(None, false).unwrap();
        assert!(config.validate().is_err());

        env::remove_var("STATE_STORE_TYPE");
        let config = BotConfig::load(Some(0), false).unwrap();
        assert!(config.validate().is_err());

        clear_env();
    }
}
