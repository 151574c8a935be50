use crate::dtos::ResponseShape;
use crate::middleware::AccessPolicy;
use secrecy::Secret;
use service_core::config as core_config;
use service_core::error::AppError;
use std::env;

/// Origins accepted by the guarded profile unless `ALLOWED_ORIGINS` says otherwise.
pub const DEFAULT_ALLOWED_ORIGINS: [&str; 3] = [
    "https://intergramx.github.io",
    "https://scrajang.github.io",
    "https://intergramx.vercel.app",
];

#[derive(Debug, Clone)]
pub struct JsonStoreConfig {
    pub common: core_config::Config,
    pub environment: Environment,
    pub service_name: String,
    pub log_level: String,
    pub otlp_endpoint: Option<String>,
    pub profile: Profile,
    pub document_path: String,
    pub store: StoreConfig,
    pub access: AccessConfig,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Environment {
    Dev,
    Prod,
}

/// Externally observable variant of the endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Profile {
    /// Any origin, plain JSON bodies, DELETE enabled.
    Open,
    /// Origin allow-list, namespaced envelope, no DELETE.
    Guarded,
}

impl Profile {
    pub fn shape(self) -> ResponseShape {
        match self {
            Profile::Open => ResponseShape::Plain,
            Profile::Guarded => ResponseShape::Namespaced,
        }
    }

    pub fn allows_delete(self) -> bool {
        matches!(self, Profile::Open)
    }

    pub fn access_policy(self, allowed_origins: &[String]) -> AccessPolicy {
        match self {
            Profile::Open => AccessPolicy::any_origin(),
            Profile::Guarded => AccessPolicy::allow_list(allowed_origins.to_vec()),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreBackend {
    Postgres,
    Redis,
    Memory,
}

#[derive(Debug, Clone)]
pub struct StoreConfig {
    pub backend: StoreBackend,
    pub database: DatabaseConfig,
    pub redis: RedisConfig,
}

#[derive(Debug, Clone)]
pub struct DatabaseConfig {
    pub url: Option<Secret<String>>,
    pub max_connections: u32,
    pub min_connections: u32,
    pub run_migrations: bool,
}

#[derive(Debug, Clone)]
pub struct RedisConfig {
    pub url: Option<Secret<String>>,
    pub key: String,
}

#[derive(Debug, Clone)]
pub struct AccessConfig {
    pub allowed_origins: Vec<String>,
}

impl Default for AccessConfig {
    fn default() -> Self {
        Self {
            allowed_origins: DEFAULT_ALLOWED_ORIGINS
                .iter()
                .map(|o| o.to_string())
                .collect(),
        }
    }
}

impl JsonStoreConfig {
    pub fn load() -> Result<Self, AppError> {
        // Load common config (handles .env and APP__ prefix)
        let common_config = core_config::Config::load()?;

        let environment: Environment = env::var("ENVIRONMENT")
            .unwrap_or_else(|_| "dev".to_string())
            .parse()
            .map_err(|e: String| AppError::ConfigError(anyhow::anyhow!(e)))?;
        let is_prod = environment == Environment::Prod;

        let profile: Profile = get_env("STORE_PROFILE", Some("open"), false)?
            .parse()
            .map_err(|e: String| AppError::ConfigError(anyhow::anyhow!(e)))?;
        let backend: StoreBackend = get_env("STORE_BACKEND", Some("postgres"), false)?
            .parse()
            .map_err(|e: String| AppError::ConfigError(anyhow::anyhow!(e)))?;

        if is_prod && backend == StoreBackend::Memory {
            return Err(AppError::ConfigError(anyhow::anyhow!(
                "STORE_BACKEND=memory is not allowed in production"
            )));
        }

        let database_url = match backend {
            StoreBackend::Postgres => Some(get_env("DATABASE_URL", None, is_prod)?),
            _ => env::var("DATABASE_URL").ok(),
        };
        let redis_url = match backend {
            StoreBackend::Redis => Some(get_env("REDIS_URL", None, is_prod)?),
            _ => env::var("REDIS_URL").ok(),
        };

        let access = match env::var("ALLOWED_ORIGINS") {
            Ok(raw) => AccessConfig {
                allowed_origins: parse_origins(&raw),
            },
            Err(_) => AccessConfig::default(),
        };

        Ok(JsonStoreConfig {
            common: common_config,
            environment,
            service_name: get_env("SERVICE_NAME", Some("json-store-service"), false)?,
            log_level: get_env("LOG_LEVEL", Some("info"), false)?,
            otlp_endpoint: env::var("OTLP_ENDPOINT").ok(),
            profile,
            document_path: get_env("DOCUMENT_PATH", Some("/api/data"), false)?,
            store: StoreConfig {
                backend,
                database: DatabaseConfig {
                    url: database_url.map(Secret::new),
                    max_connections: parse_env("DATABASE_MAX_CONNECTIONS", 5)?,
                    min_connections: parse_env("DATABASE_MIN_CONNECTIONS", 1)?,
                    run_migrations: parse_env("DATABASE_RUN_MIGRATIONS", true)?,
                },
                redis: RedisConfig {
                    url: redis_url.map(Secret::new),
                    key: get_env("REDIS_KEY", Some("json_data"), false)?,
                },
            },
            access,
        })
    }
}

impl std::str::FromStr for Environment {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "dev" | "development" => Ok(Environment::Dev),
            "prod" | "production" => Ok(Environment::Prod),
            _ => Err(format!("Invalid environment: {}", s)),
        }
    }
}

impl std::str::FromStr for Profile {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "open" => Ok(Profile::Open),
            "guarded" => Ok(Profile::Guarded),
            _ => Err(format!("Invalid store profile: {}", s)),
        }
    }
}

impl std::str::FromStr for StoreBackend {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "postgres" | "postgresql" => Ok(StoreBackend::Postgres),
            "redis" => Ok(StoreBackend::Redis),
            "memory" => Ok(StoreBackend::Memory),
            _ => Err(format!("Invalid store backend: {}", s)),
        }
    }
}

/// Split a comma separated origin list, dropping blanks and trailing slashes.
pub fn parse_origins(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(|o| o.trim().trim_end_matches('/'))
        .filter(|o| !o.is_empty())
        .map(str::to_string)
        .collect()
}

fn parse_env<T: std::str::FromStr>(key: &str, default: T) -> Result<T, AppError>
where
    T::Err: std::fmt::Display,
{
    match env::var(key) {
        Ok(val) => val.parse().map_err(|e: T::Err| {
            AppError::ConfigError(anyhow::anyhow!("Invalid value for {}: {}", key, e))
        }),
        Err(_) => Ok(default),
    }
}

fn get_env(key: &str, default: Option<&str>, is_prod: bool) -> Result<String, AppError> {
    match env::var(key) {
        Ok(val) => Ok(val),
        Err(_) => {
            if is_prod {
                Err(AppError::ConfigError(anyhow::anyhow!(format!(
                    "{} is required in production but not set",
                    key
                ))))
            } else if let Some(def) = default {
                Ok(def.to_string())
            } else {
                Err(AppError::ConfigError(anyhow::anyhow!(format!(
                    "{} is required but not set",
                    key
                ))))
            }
        }
    }
}
