use std::env;
use std::fmt;

use auth::HashingParams;
use auth::TokenIssuerConfig;
use config::Config as ConfigBuilder;
use config::ConfigError;
use config::Environment as EnvironmentSource;
use config::File;
use serde::Deserialize;

/// Placeholder secrets shipped in `config/default.toml` for local runs.
const DEVELOPMENT_SECRETS: [&str; 2] = [
    "development-access-secret-change-me",
    "development-refresh-secret-change-me",
];

#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    #[serde(default)]
    pub environment: Environment,
    pub database: DatabaseConfig,
    pub server: ServerConfig,
    pub jwt: JwtConfig,
    #[serde(default)]
    pub hashing: HashingConfig,
}

/// Deployment environment.
///
/// Gates error verbosity and the default hashing cost.
#[derive(Debug, Deserialize, Clone, Copy, Default, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Environment {
    #[default]
    Development,
    Test,
    Production,
}

impl Environment {
    pub fn is_production(&self) -> bool {
        matches!(self, Environment::Production)
    }
}

impl fmt::Display for Environment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Environment::Development => "development",
            Environment::Test => "test",
            Environment::Production => "production",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct DatabaseConfig {
    pub url: String,
    #[serde(default = "default_max_connections")]
    pub max_connections: u32,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    pub http_port: u16,
}

#[derive(Deserialize, Clone)]
pub struct JwtConfig {
    pub access_secret: String,
    pub refresh_secret: String,
    #[serde(default = "default_access_expires_in")]
    pub access_expires_in: String,
    #[serde(default = "default_refresh_expires_in")]
    pub refresh_expires_in: String,
}

impl JwtConfig {
    pub fn issuer_config(&self) -> TokenIssuerConfig {
        TokenIssuerConfig {
            access_secret: self.access_secret.clone(),
            refresh_secret: self.refresh_secret.clone(),
            access_expires_in: self.access_expires_in.clone(),
            refresh_expires_in: self.refresh_expires_in.clone(),
        }
    }
}

impl fmt::Debug for JwtConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("JwtConfig")
            .field("access_secret", &"<redacted>")
            .field("refresh_secret", &"<redacted>")
            .field("access_expires_in", &self.access_expires_in)
            .field("refresh_expires_in", &self.refresh_expires_in)
            .finish()
    }
}

/// Argon2id cost settings. `time_cost` falls back to a per-environment default.
#[derive(Debug, Deserialize, Clone)]
pub struct HashingConfig {
    #[serde(default = "default_memory_cost_kib")]
    pub memory_cost_kib: u32,
    #[serde(default = "default_parallelism")]
    pub parallelism: u32,
    #[serde(default = "default_output_len")]
    pub output_len: usize,
    #[serde(default)]
    pub time_cost: Option<u32>,
}

impl HashingConfig {
    pub fn params(&self, environment: Environment) -> HashingParams {
        let default_time_cost = if environment.is_production() {
            HashingParams::PRODUCTION_TIME_COST
        } else {
            HashingParams::DEVELOPMENT_TIME_COST
        };

        HashingParams {
            memory_cost_kib: self.memory_cost_kib,
            time_cost: self.time_cost.unwrap_or(default_time_cost),
            parallelism: self.parallelism,
            output_len: self.output_len,
        }
    }
}

impl Default for HashingConfig {
    fn default() -> Self {
        Self {
            memory_cost_kib: default_memory_cost_kib(),
            parallelism: default_parallelism(),
            output_len: default_output_len(),
            time_cost: None,
        }
    }
}

fn default_max_connections() -> u32 {
    5
}

fn default_access_expires_in() -> String {
    "15m".to_string()
}

fn default_refresh_expires_in() -> String {
    "7d".to_string()
}

fn default_memory_cost_kib() -> u32 {
    HashingParams::MEMORY_COST_KIB
}

fn default_parallelism() -> u32 {
    HashingParams::PARALLELISM
}

fn default_output_len() -> usize {
    HashingParams::OUTPUT_LEN
}

impl Config {
    /// Load configuration from files with environment variable overrides
    ///
    /// Priority (highest to lowest):
    /// 1. Environment variables (APP_DATABASE__URL, APP_JWT__ACCESS_SECRET, etc.)
    /// 2. Environment-specific config file (config/{RUN_MODE}.toml)
    /// 3. Default config file (config/default.toml)
    pub fn load() -> Result<Self, ConfigError> {
        let run_mode = env::var("RUN_MODE").unwrap_or_else(|_| "development".to_string());

        let configuration = ConfigBuilder::builder()
            .add_source(File::with_name("config/default").required(false))
            .add_source(File::with_name(&format!("config/{}", run_mode)).required(false))
            // Example: APP_JWT__ACCESS_SECRET=... overrides jwt.access_secret
            .add_source(
                EnvironmentSource::with_prefix("APP")
                    .prefix_separator("_")
                    .separator("__"),
            )
            .build()?;

        configuration.try_deserialize::<Config>()?.ensure_deployable()
    }

    /// Production must not sign with the placeholder secrets.
    fn ensure_deployable(self) -> Result<Self, ConfigError> {
        if !self.environment.is_production() {
            return Ok(self);
        }

        let uses_placeholder = [&self.jwt.access_secret, &self.jwt.refresh_secret]
            .iter()
            .any(|secret| DEVELOPMENT_SECRETS.contains(&secret.as_str()));
        if uses_placeholder {
            return Err(ConfigError::Message(
                "Development JWT secrets are not allowed in production; \
                 set APP_JWT__ACCESS_SECRET and APP_JWT__REFRESH_SECRET"
                    .to_string(),
            ));
        }

        Ok(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hashing_time_cost_depends_on_environment() {
        let hashing = HashingConfig::default();

        let production = hashing.params(Environment::Production);
        let development = hashing.params(Environment::Development);

        assert_eq!(production.time_cost, 4);
        assert_eq!(development.time_cost, 2);
        assert_eq!(production.memory_cost_kib, 65536);
        assert_eq!(production.parallelism, 4);
        assert_eq!(production.output_len, 32);
    }

    #[test]
    fn test_explicit_time_cost_wins() {
        let hashing = HashingConfig {
            time_cost: Some(7),
            ..HashingConfig::default()
        };

        assert_eq!(hashing.params(Environment::Development).time_cost, 7);
    }

    fn config_from(toml: &str) -> Config {
        ConfigBuilder::builder()
            .add_source(config::File::from_str(toml, config::FileFormat::Toml))
            .build()
            .unwrap()
            .try_deserialize()
            .unwrap()
    }

    #[test]
    fn test_deserialize_with_defaults() {
        let config = config_from(
            r#"
            [database]
            url = "postgres://localhost/identity"

            [server]
            http_port = 8000

            [jwt]
            access_secret = "a"
            refresh_secret = "b"
            "#,
        );

        assert_eq!(config.environment, Environment::Development);
        assert_eq!(config.database.max_connections, 5);
        assert_eq!(config.jwt.access_expires_in, "15m");
        assert_eq!(config.jwt.refresh_expires_in, "7d");
        assert_eq!(config.hashing.memory_cost_kib, 65536);
    }

    #[test]
    fn test_production_rejects_placeholder_secrets() {
        let layered = |environment: &str, access_secret: &str| {
            config_from(&format!(
                r#"
                environment = "{}"

                [database]
                url = "postgres://localhost/identity"

                [server]
                http_port = 8000

                [jwt]
                access_secret = "{}"
                refresh_secret = "a-real-refresh-secret"
                "#,
                environment, access_secret
            ))
        };

        let placeholder = DEVELOPMENT_SECRETS[0];

        assert!(matches!(
            layered("production", placeholder).ensure_deployable(),
            Err(ConfigError::Message(_))
        ));
        assert!(layered("production", "a-real-access-secret")
            .ensure_deployable()
            .is_ok());
        assert!(layered("development", placeholder).ensure_deployable().is_ok());
    }

    #[test]
    fn test_default_file_carries_only_placeholder_secrets() {
        let config = config_from(include_str!("../../config/default.toml"));

        assert!(DEVELOPMENT_SECRETS.contains(&config.jwt.access_secret.as_str()));
        assert!(DEVELOPMENT_SECRETS.contains(&config.jwt.refresh_secret.as_str()));
    }

    #[test]
    fn test_jwt_debug_redacts_secrets() {
        let jwt = JwtConfig {
            access_secret: "super-secret-access".to_string(),
            refresh_secret: "super-secret-refresh".to_string(),
            access_expires_in: "15m".to_string(),
            refresh_expires_in: "7d".to_string(),
        };

        let rendered = format!("{:?}", jwt);
        assert!(!rendered.contains("super-secret"));
    }
}
