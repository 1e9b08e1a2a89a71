use std::time::Duration;

use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DbBackend {
    MySql,
    Sqlite,
}

impl DbBackend {
    pub fn from_url(url: &str) -> Result<Self, DbConfigError> {
        let scheme = url.split(':').next().unwrap_or_default();
        match scheme {
            "mysql" | "mariadb" => Ok(Self::MySql),
            "sqlite" => Ok(Self::Sqlite),
            other => Err(DbConfigError::UnsupportedScheme {
                scheme: other.to_string(),
            }),
        }
    }

    pub const fn as_str(self) -> &'static str {
        match self {
            DbBackend::MySql => "mysql",
            DbBackend::Sqlite => "sqlite",
        }
    }
}

/// Connection settings resolved once at startup.
#[derive(Debug, Clone)]
pub struct DbConfig {
    pub url: String,
    pub backend: DbBackend,
    pub pool: PoolConfig,
    pub startup: StartupRetryConfig,
    pub auto_schema: bool,
}

impl DbConfig {
    pub fn from_env() -> Result<Self, DbConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, DbConfigError> {
        let url = match lookup("DATABASE_URL").filter(|v| !v.trim().is_empty()) {
            Some(url) => url,
            None => MySqlParams::from_lookup(&lookup).url(),
        };
        let backend = DbBackend::from_url(&url)?;

        Ok(Self {
            url,
            backend,
            pool: PoolConfig::from_lookup(&lookup),
            startup: StartupRetryConfig::from_lookup(&lookup),
            auto_schema: env_bool(&lookup, "DB_AUTO_SCHEMA", true),
        })
    }

    pub fn for_url(url: impl Into<String>) -> Result<Self, DbConfigError> {
        let url = url.into();
        let backend = DbBackend::from_url(&url)?;
        Ok(Self {
            url,
            backend,
            pool: PoolConfig::default(),
            startup: StartupRetryConfig::default(),
            auto_schema: true,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MySqlParams {
    pub host: String,
    pub user: String,
    pub password: String,
    pub database: String,
    pub port: u16,
}

impl MySqlParams {
    fn from_lookup(lookup: &impl Fn(&str) -> Option<String>) -> Self {
        Self {
            host: lookup("DB_HOST").unwrap_or_else(|| "database".to_string()),
            user: lookup("DB_USER").unwrap_or_else(|| "root".to_string()),
            password: lookup("DB_PASSWORD").unwrap_or_default(),
            database: lookup("DB_NAME").unwrap_or_else(|| "anki".to_string()),
            port: lookup("DB_PORT")
                .and_then(|value| value.parse::<u16>().ok())
                .unwrap_or(3306),
        }
    }

    pub fn url(&self) -> String {
        let credentials = if self.password.is_empty() {
            urlencoding::encode(&self.user).into_owned()
        } else {
            format!(
                "{}:{}",
                urlencoding::encode(&self.user),
                urlencoding::encode(&self.password)
            )
        };
        format!(
            "mysql://{credentials}@{}:{}/{}",
            self.host,
            self.port,
            urlencoding::encode(&self.database)
        )
    }
}

#[derive(Debug, Clone)]
pub struct PoolConfig {
    pub max_connections: u32,
    pub acquire_timeout: Duration,
    pub statement_timeout: Duration,
}

impl PoolConfig {
    fn from_lookup(lookup: &impl Fn(&str) -> Option<String>) -> Self {
        Self {
            max_connections: env_u32(lookup, "DB_MAX_CONNECTIONS", 10).max(1),
            acquire_timeout: Duration::from_millis(env_u64(lookup, "DB_ACQUIRE_TIMEOUT_MS", 5000)),
            statement_timeout: Duration::from_millis(env_u64(
                lookup,
                "DB_STATEMENT_TIMEOUT_MS",
                10000,
            )),
        }
    }
}

impl Default for PoolConfig {
    fn default() -> Self {
        Self::from_lookup(&|_: &str| None)
    }
}

#[derive(Debug, Clone)]
pub struct StartupRetryConfig {
    pub max_retries: u32,
    pub delay: Duration,
}

impl StartupRetryConfig {
    fn from_lookup(lookup: &impl Fn(&str) -> Option<String>) -> Self {
        Self {
            max_retries: env_u32(lookup, "DB_CONNECT_RETRIES", 10),
            delay: Duration::from_millis(env_u64(lookup, "DB_CONNECT_RETRY_DELAY_MS", 2000)),
        }
    }
}

impl Default for StartupRetryConfig {
    fn default() -> Self {
        Self::from_lookup(&|_: &str| None)
    }
}

#[derive(Debug, Error)]
pub enum DbConfigError {
    #[error("unsupported database url scheme: {scheme:?}")]
    UnsupportedScheme { scheme: String },
}

fn env_bool(lookup: &impl Fn(&str) -> Option<String>, key: &str, default: bool) -> bool {
    match lookup(key).as_deref() {
        Some("true") | Some("1") => true,
        Some("false") | Some("0") => false,
        _ => default,
    }
}

fn env_u64(lookup: &impl Fn(&str) -> Option<String>, key: &str, default: u64) -> u64 {
    lookup(key)
        .and_then(|value| value.parse::<u64>().ok())
        .unwrap_or(default)
}

fn env_u32(lookup: &impl Fn(&str) -> Option<String>, key: &str, default: u32) -> u32 {
    lookup(key)
        .and_then(|value| value.parse::<u32>().ok())
        .unwrap_or(default)
}
