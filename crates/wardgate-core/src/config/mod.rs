use anyhow::Result;
use config::Config;
use serde::Deserialize;

use crate::role::Role;

#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    pub auth: AuthConfig,
    pub session: SessionConfig,
    pub server: ServerConfig,
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AuthConfig {
    /// Upper bound for one credential check, in milliseconds.
    pub verify_timeout_ms: u64,
    #[serde(default)]
    pub accounts: Vec<AccountConfig>,
}

impl AuthConfig {
    #[must_use]
    pub const fn verify_timeout(&self) -> std::time::Duration {
        std::time::Duration::from_millis(self.verify_timeout_ms)
    }
}

/// A staff account registered for one role.
#[derive(Clone, Deserialize)]
pub struct AccountConfig {
    pub email: String,
    /// Argon2 PHC string, see the `hash_password` tool.
    pub password_hash: String,
    pub role: Role,
    pub display_name: Option<String>,
}

impl std::fmt::Debug for AccountConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AccountConfig")
            .field("email", &self.email)
            .field("password_hash", &"<redacted>")
            .field("role", &self.role)
            .field("display_name", &self.display_name)
            .finish()
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct SessionConfig {
    /// Directory holding the persisted session blobs.
    pub storage_dir: String,
    /// Sessions older than this are discarded. Unset means no expiry.
    pub max_age_secs: Option<u64>,
}

impl SessionConfig {
    #[must_use]
    pub fn max_age(&self) -> Option<chrono::Duration> {
        self.max_age_secs
            .and_then(|secs| i64::try_from(secs).ok())
            .map(chrono::Duration::seconds)
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

impl ServerConfig {
    /// ## Summary
    /// Returns the bind address in the format "host:port".
    #[must_use]
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    pub level: String,
}

impl Settings {
    /// ## Summary
    /// Loads configuration into a `Settings`.
    /// Sources, lowest precedence first: built-in defaults, `config.toml`,
    /// `WARDGATE__SECTION__KEY` environment variables.
    ///
    /// ## Errors
    /// Returns an error if building the configuration or deserializing it fails.
    pub fn load() -> Result<Self> {
        Ok(Config::builder()
            .set_default("server.host", "127.0.0.1")?
            .set_default("server.port", 8700)?
            .set_default("logging.level", "info")?
            .set_default("session.storage_dir", ".wardgate")?
            .set_default("auth.verify_timeout_ms", 5000)?
            // TOML file
            .add_source(config::File::with_name("config.toml").required(false))
            // Env
            .add_source(
                config::Environment::with_prefix("WARDGATE")
                    .prefix_separator("__")
                    .separator("__")
                    .ignore_empty(true)
                    .try_parsing(true),
            )
            .build()?
            .try_deserialize::<Settings>()?)
    }
}

/// ## Summary
/// Loads configuration from environment variables, `.env` file and `config.toml`.
///
/// ## Errors
/// Returns an error if loading or deserializing the configuration fails.
pub fn load_config() -> Result<Settings> {
    dotenvy::dotenv().ok();

    Settings::load()
}
