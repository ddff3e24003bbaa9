use std::env;
use std::fmt;

use config::builder::{ConfigBuilder, DefaultState};
use config::{Config, ConfigError, Environment, File, Map};
use serde::Deserialize;

#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    pub server: ServerConfig,
    /// Credentials read from `DB_DATABASE`, `DB_USERNAME`, `DB_PASSWORD`,
    /// `DB_HOST` and `DB_PORT`.
    #[serde(default)]
    pub db: DatabaseConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
}

/// Database credentials.
///
/// Every field is kept as the raw string it was configured with. A missing
/// value is an empty string, never an error.
#[derive(Clone, Default, Deserialize)]
pub struct DatabaseConfig {
    #[serde(default)]
    pub database: String,
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub password: String,
    #[serde(default)]
    pub host: String,
    #[serde(default)]
    pub port: String,
}

impl DatabaseConfig {
    /// Assemble the connection URL. Values are inserted verbatim and TLS is
    /// always disabled.
    pub fn connection_string(&self) -> String {
        format!(
            "postgres://{}:{}@{}:{}/{}?sslmode=disable",
            self.username, self.password, self.host, self.port, self.database
        )
    }

    /// Connection URL with the password replaced, for logging.
    pub fn masked_connection_string(&self) -> String {
        let url = self.connection_string();
        if let Some(at_pos) = url.rfind('@') {
            if let Some(colon_pos) = url[..at_pos].find("://").and_then(|scheme_end| {
                url[scheme_end + 3..at_pos]
                    .find(':')
                    .map(|pos| pos + scheme_end + 3)
            }) {
                let prefix = &url[..colon_pos + 1];
                let suffix = &url[at_pos..];
                return format!("{}***{}", prefix, suffix);
            }
        }
        url
    }
}

impl fmt::Debug for DatabaseConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DatabaseConfig")
            .field("database", &self.database)
            .field("username", &self.username)
            .field("password", &"***")
            .field("host", &self.host)
            .field("port", &self.port)
            .finish()
    }
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8080
}

impl Settings {
    pub fn new() -> Result<Self, ConfigError> {
        // Load .env file if exists
        let _ = dotenvy::dotenv();

        let run_mode = env::var("RUN_MODE").unwrap_or_else(|_| "development".into());

        let builder = Self::defaults()?
            // Load config file if exists
            .add_source(File::with_name("config/default").required(false))
            .add_source(File::with_name(&format!("config/{}", run_mode)).required(false))
            // Load from environment variables
            // DB_HOST, DB_PORT, DB_DATABASE, SERVER_PORT, etc.
            .add_source(Self::environment("DB"))
            .add_source(Self::environment("SERVER"));

        builder.build()?.try_deserialize()
    }

    /// Build settings from an explicit variable map instead of the process
    /// environment. No `.env` or config files are read.
    pub fn from_vars(vars: Map<String, String>) -> Result<Self, ConfigError> {
        Self::defaults()?
            .add_source(Self::environment("DB").source(Some(vars.clone())))
            .add_source(Self::environment("SERVER").source(Some(vars)))
            .build()?
            .try_deserialize()
    }

    pub fn server_addr(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }

    fn defaults() -> Result<ConfigBuilder<DefaultState>, ConfigError> {
        Config::builder()
            .set_default("server.host", default_host())?
            .set_default("server.port", i64::from(default_port()))
    }

    // Only `<PREFIX>_*` variables are read, nested under the lowercased
    // prefix. No type parsing: credentials such as `007` must stay strings.
    fn environment(prefix: &str) -> Environment {
        Environment::with_prefix(prefix)
            .keep_prefix(true)
            .separator("_")
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}
