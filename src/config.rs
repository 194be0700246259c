//! Configuration module for PoolWatch

use solana_sdk::pubkey::Pubkey;
use std::env;
use std::str::FromStr;
use std::time::Duration;

use crate::error::ConfigError;

const DEFAULT_POLL_INTERVAL_SECS: u64 = 60;
const DEFAULT_CHANGE_THRESHOLD: f64 = 0.05;
const DEFAULT_RPC_TIMEOUT_SECS: u64 = 15;
const DEFAULT_STATUS_PORT: u16 = 9090;

/// Application configuration loaded from environment variables
#[derive(Debug, Clone)]
pub struct Config {
    // Solana RPC (read-only)
    pub rpc_url: String,
    pub rpc_timeout: Duration,

    // Watched pool
    pub pool_id: Pubkey,
    pub market_program_id: Pubkey,

    // Telegram Alerts
    pub telegram_bot_token: String,
    pub telegram_chat_id: String,

    // Detection
    pub poll_interval: Duration,
    pub change_threshold: f64,
    pub retain_snapshot_on_error: bool,

    // Status server, disabled when None
    pub status_port: Option<u16>,
}

impl Config {
    /// Load configuration from `.env` and the process environment
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build configuration from an arbitrary key lookup
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());
        let required = |key: &'static str| get(key).ok_or(ConfigError::Missing(key));

        let rpc_url = required("RPC_URL")?;

        let pool_id = match get("POOL_ID").or_else(|| get("WIF_SOL_POOL_ID")) {
            Some(v) => parse_pubkey("POOL_ID", &v)?,
            None => return Err(ConfigError::Missing("POOL_ID")),
        };
        let market_program_id =
            parse_pubkey("OPENBOOK_PROGRAM_ID", &required("OPENBOOK_PROGRAM_ID")?)?;

        let telegram_bot_token = required("TELEGRAM_BOT_TOKEN")?;
        let telegram_chat_id = required("TELEGRAM_CHAT_ID")?;

        let poll_interval_secs: u64 = parse_or(
            "POLL_INTERVAL_SECS",
            get("POLL_INTERVAL_SECS"),
            DEFAULT_POLL_INTERVAL_SECS,
        )?;
        if poll_interval_secs == 0 {
            return Err(invalid("POLL_INTERVAL_SECS", "must be greater than zero"));
        }

        let change_threshold: f64 = parse_or(
            "CHANGE_THRESHOLD",
            get("CHANGE_THRESHOLD"),
            DEFAULT_CHANGE_THRESHOLD,
        )?;
        if !change_threshold.is_finite() || change_threshold <= 0.0 {
            return Err(invalid("CHANGE_THRESHOLD", "must be a positive fraction"));
        }

        let rpc_timeout_secs: u64 =
            parse_or("RPC_TIMEOUT_SECS", get("RPC_TIMEOUT_SECS"), DEFAULT_RPC_TIMEOUT_SECS)?;
        if rpc_timeout_secs == 0 {
            return Err(invalid("RPC_TIMEOUT_SECS", "must be greater than zero"));
        }

        let retain_snapshot_on_error = get("RETAIN_SNAPSHOT_ON_ERROR")
            .map(|v| v.eq_ignore_ascii_case("true") || v == "1")
            .unwrap_or(false);

        let status_port: u16 = parse_or("STATUS_PORT", get("STATUS_PORT"), DEFAULT_STATUS_PORT)?;

        Ok(Self {
            rpc_url,
            rpc_timeout: Duration::from_secs(rpc_timeout_secs),
            pool_id,
            market_program_id,
            telegram_bot_token,
            telegram_chat_id,
            poll_interval: Duration::from_secs(poll_interval_secs),
            change_threshold,
            retain_snapshot_on_error,
            status_port: (status_port != 0).then_some(status_port),
        })
    }
}

fn invalid(name: &'static str, reason: impl Into<String>) -> ConfigError {
    ConfigError::Invalid {
        name,
        reason: reason.into(),
    }
}

fn parse_pubkey(name: &'static str, value: &str) -> Result<Pubkey, ConfigError> {
    Pubkey::from_str(value.trim()).map_err(|e| invalid(name, e.to_string()))
}

fn parse_or<T>(name: &'static str, value: Option<String>, default: T) -> Result<T, ConfigError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    match value {
        Some(v) => v.trim().parse().map_err(|e: T::Err| invalid(name, e.to_string())),
        None => Ok(default),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    const POOL: &str = "EP2ib6dYdEeqD8MfE2ezHCxX3kP3K2eLKkirfPm5eyMx";
    const OPENBOOK: &str = "srmqPvymJeFKQ4zGQed1GFppgkRHL9kaELCbyksJtPX";

    fn base_env() -> HashMap<&'static str, String> {
        HashMap::from([
            ("RPC_URL", "https://api.mainnet-beta.solana.com".to_string()),
            ("POOL_ID", POOL.to_string()),
            ("OPENBOOK_PROGRAM_ID", OPENBOOK.to_string()),
            ("TELEGRAM_BOT_TOKEN", "123:abc".to_string()),
            ("TELEGRAM_CHAT_ID", "-100200300".to_string()),
        ])
    }

    fn load(env: &HashMap<&'static str, String>) -> Result<Config, ConfigError> {
        Config::from_lookup(|key| env.get(key).cloned())
    }

    #[test]
    fn applies_defaults() {
        let config = load(&base_env()).unwrap();
        assert_eq!(config.poll_interval, Duration::from_secs(60));
        assert_eq!(config.change_threshold, 0.05);
        assert_eq!(config.rpc_timeout, Duration::from_secs(15));
        assert!(!config.retain_snapshot_on_error);
        assert_eq!(config.status_port, Some(9090));
        assert_eq!(config.pool_id.to_string(), POOL);
    }

    #[test]
    fn missing_required_variable_is_reported() {
        let mut env = base_env();
        env.remove("TELEGRAM_CHAT_ID");
        assert_eq!(load(&env).unwrap_err(), ConfigError::Missing("TELEGRAM_CHAT_ID"));

        let mut env = base_env();
        env.insert("RPC_URL", "   ".to_string());
        assert_eq!(load(&env).unwrap_err(), ConfigError::Missing("RPC_URL"));
    }

    #[test]
    fn legacy_pool_variable_is_accepted() {
        let mut env = base_env();
        env.remove("POOL_ID");
        env.insert("WIF_SOL_POOL_ID", POOL.to_string());
        assert_eq!(load(&env).unwrap().pool_id.to_string(), POOL);
    }

    #[test]
    fn rejects_invalid_values() {
        let mut env = base_env();
        env.insert("CHANGE_THRESHOLD", "-0.1".to_string());
        assert!(matches!(
            load(&env),
            Err(ConfigError::Invalid { name: "CHANGE_THRESHOLD", .. })
        ));

        let mut env = base_env();
        env.insert("POOL_ID", "not-a-pubkey".to_string());
        assert!(matches!(
            load(&env),
            Err(ConfigError::Invalid { name: "POOL_ID", .. })
        ));

        let mut env = base_env();
        env.insert("POLL_INTERVAL_SECS", "0".to_string());
        assert!(matches!(
            load(&env),
            Err(ConfigError::Invalid { name: "POLL_INTERVAL_SECS", .. })
        ));
    }

    #[test]
    fn overrides_and_disabled_status_server() {
        let mut env = base_env();
        env.insert("POLL_INTERVAL_SECS", "30".to_string());
        env.insert("CHANGE_THRESHOLD", "0.1".to_string());
        env.insert("RETAIN_SNAPSHOT_ON_ERROR", "true".to_string());
        env.insert("STATUS_PORT", "0".to_string());

        let config = load(&env).unwrap();
        assert_eq!(config.poll_interval, Duration::from_secs(30));
        assert_eq!(config.change_threshold, 0.1);
        assert!(config.retain_snapshot_on_error);
        assert_eq!(config.status_port, None);
    }
}
