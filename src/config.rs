use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use std::net::{IpAddr, Ipv4Addr};
use std::path::PathBuf;

/// Application configuration managed by Figment.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
pub struct Config {
    /// Core server configuration (see `basic` table in config.toml).
    #[serde(default)]
    pub basic: BasicConfig,
}

const DEFAULT_CONFIG_FILE: &str = "config.toml";
const ENV_PREFIX: &str = "QUOTIDIAN_";

impl Config {
    /// Builds a Figment that merges defaults, a config TOML file, and
    /// `QUOTIDIAN_`-prefixed environment variables (nested keys split on `__`,
    /// e.g. `QUOTIDIAN_BASIC__ADMIN_KEY`).
    pub fn figment() -> Figment {
        let mut figment = Figment::new().merge(Serialized::defaults(Config::default()));
        if PathBuf::from(DEFAULT_CONFIG_FILE).is_file() {
            figment = figment.merge(Toml::file(DEFAULT_CONFIG_FILE));
        }
        figment.merge(Env::prefixed(ENV_PREFIX).split("__"))
    }

    /// Loads configuration without validating required fields.
    ///
    /// Note: this does **not** check `basic.admin_key`. Binaries should call
    /// `Config::load()` instead to avoid running with mutation routes open.
    pub fn from_optional_sources() -> Self {
        Self::figment().extract().unwrap_or_else(|err| {
            panic!("failed to extract configuration (defaults + config.toml + env): {err}")
        })
    }

    /// Loads configuration and validates required fields.
    pub fn load() -> Self {
        let cfg = Self::from_optional_sources();
        if cfg.basic.admin_key.trim().is_empty() {
            panic!("basic.admin_key must be set and non-empty");
        }
        cfg
    }
}

/// Basic (core) configuration managed by Figment.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct BasicConfig {
    /// HTTP server listen address (e.g., "0.0.0.0", "127.0.0.1").
    /// TOML: `basic.listen_addr`. Default: `0.0.0.0`.
    #[serde(default = "default_listen_ip")]
    pub listen_addr: IpAddr,

    /// HTTP server listen port.
    /// TOML: `basic.listen_port`. Default: `8080`.
    #[serde(default = "default_listen_port")]
    pub listen_port: u16,

    /// Database URL for SQLite.
    /// TOML: `basic.database_url`. Default: `sqlite://quotes.db`.
    #[serde(default)]
    pub database_url: String,

    /// Log level for tracing subscriber initialization (e.g., "error", "warn", "info", "debug", "trace").
    /// TOML: `basic.loglevel`. Default: `info`.
    #[serde(default)]
    pub loglevel: String,

    /// Shared secret gating the mutating quote routes (required, non-empty).
    /// TOML: `basic.admin_key`. Must be provided.
    #[serde(default)]
    #[serde(deserialize_with = "deserialize_string_lax")]
    pub admin_key: String,

    /// Shared per-client request quota for `/api/v1/*`, in requests per minute.
    /// TOML: `basic.rate_per_minute`. Default: `60`.
    #[serde(default = "default_rate_per_minute")]
    pub rate_per_minute: u32,

    /// Per-route burst cap for `/api/v1/*`, in requests per second per client.
    /// TOML: `basic.burst_per_second`. Default: `10`.
    #[serde(default = "default_burst_per_second")]
    pub burst_per_second: u32,

    /// Optional external counter-store address for the rate limiter.
    /// Unsupported at runtime; when set, startup logs a warning and the
    /// in-process limiter is used.
    /// TOML: `basic.counter_store_url`. Default: unset.
    #[serde(default)]
    pub counter_store_url: Option<String>,
}

impl Default for BasicConfig {
    fn default() -> Self {
        Self {
            listen_addr: default_listen_ip(),
            listen_port: default_listen_port(),
            database_url: "sqlite://quotes.db".to_string(),
            loglevel: "info".to_string(),
            // No insecure default. `Config::load()` enforces non-empty.
            admin_key: String::new(),
            rate_per_minute: default_rate_per_minute(),
            burst_per_second: default_burst_per_second(),
            counter_store_url: None,
        }
    }
}

fn deserialize_string_lax<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    let v = Value::deserialize(deserializer)?;

    match v {
        Value::String(s) => Ok(s),
        Value::Number(n) => Ok(n.to_string()),
        _ => Err(serde::de::Error::custom(
            "expected a string or a number for basic.admin_key",
        )),
    }
}

/// Default IP address for the HTTP server listen address.
fn default_listen_ip() -> IpAddr {
    Ipv4Addr::new(0, 0, 0, 0).into()
}

/// Default port for the HTTP server.
fn default_listen_port() -> u16 {
    8080
}

fn default_rate_per_minute() -> u32 {
    60
}

fn default_burst_per_second() -> u32 {
    10
}
