use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;

#[derive(Debug, Deserialize, Clone)]
pub struct CorsConfig {
    #[serde(default)]
    pub allow_origins: Vec<String>,
    pub max_age: u64,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub cors: CorsConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct DatabaseConfig {
    pub url: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct AuthConfig {
    /// HS256 secret shared with the identity provider that issues tokens.
    pub jwt_secret: String,
    /// Callers whose email is under this domain act as judges; everyone else is an admin.
    pub judge_email_domain: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct StorageConfig {
    pub data_dir: String,
    pub max_document_size: u64,
    /// Origin used to build shareable document links.
    pub public_base_url: String,
}

#[derive(Debug, Deserialize, Clone, PartialEq, Eq)]
pub struct JudgeRosterEntry {
    pub name: String,
    pub email: String,
}

#[derive(Debug, Deserialize, Clone, PartialEq, Eq)]
pub struct TeamRosterEntry {
    pub team_number: i32,
    pub team_leader: String,
}

#[derive(Debug, Deserialize, Clone, Default)]
pub struct EventConfig {
    #[serde(default)]
    pub judges: Vec<JudgeRosterEntry>,
    #[serde(default)]
    pub teams: Vec<TeamRosterEntry>,
}

#[derive(Debug, Deserialize, Clone)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub database: DatabaseConfig,
    pub auth: AuthConfig,
    pub storage: StorageConfig,
    #[serde(default)]
    pub event: EventConfig,
}

impl AppConfig {
    pub fn load() -> Result<Self, ConfigError> {
        let s = Config::builder()
            .set_default("server.host", "127.0.0.1")?
            .set_default("server.port", 3000)?
            .set_default("server.cors.max_age", 3600)?
            .set_default("auth.judge_email_domain", "judge.example.com")?
            .set_default("storage.data_dir", "./data/documents")?
            .set_default("storage.max_document_size", 25 * 1024 * 1024)?
            .set_default("storage.public_base_url", "http://127.0.0.1:3000")?
            // Load from config/config.toml
            .add_source(File::with_name("config/config").required(false))
            // Override from environment (e.g., JUDGING__AUTH__JWT_SECRET)
            .add_source(Environment::with_prefix("JUDGING").separator("__"))
            .build()?;

        s.try_deserialize()
    }
}
