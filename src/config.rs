use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::path::PathBuf;

#[derive(Debug, Clone)]
pub struct Config {
    pub host: IpAddr,
    pub port: u16,
    pub log: LogConfig,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogConfig {
    /// `RUST_LOG`: a bare level or full `EnvFilter` directives.
    pub level: String,
    /// Daily rolling log files are written here when `ENABLE_FILE_LOGS` is on.
    pub file_dir: Option<PathBuf>,
}

impl LogConfig {
    fn from_lookup(lookup: &impl Fn(&str) -> Option<String>) -> Self {
        let file_logs = matches!(lookup("ENABLE_FILE_LOGS").as_deref(), Some("true") | Some("1"));
        Self {
            level: lookup("RUST_LOG").unwrap_or_else(|| "info".to_string()),
            file_dir: file_logs.then(|| {
                PathBuf::from(lookup("LOG_DIR").unwrap_or_else(|| "./logs".to_string()))
            }),
        }
    }
}

impl Config {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let port = lookup("PORT")
            .and_then(|value| value.parse::<u16>().ok())
            .unwrap_or(8000);

        let host = lookup("HOST")
            .and_then(|value| value.parse::<IpAddr>().ok())
            .unwrap_or(IpAddr::V4(Ipv4Addr::new(0, 0, 0, 0)));

        Self {
            host,
            port,
            log: LogConfig::from_lookup(&lookup),
        }
    }

    pub fn bind_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_bind_all_interfaces() {
        let config = Config::from_lookup(|_| None);
        assert_eq!(config.bind_addr().to_string(), "0.0.0.0:8000");
        assert_eq!(config.log.level, "info");
        assert_eq!(config.log.file_dir, None);
    }

    #[test]
    fn file_logs_default_to_local_dir() {
        let config = Config::from_lookup(|key| match key {
            "ENABLE_FILE_LOGS" => Some("1".to_string()),
            _ => None,
        });
        assert_eq!(config.log.file_dir, Some(PathBuf::from("./logs")));

        let config = Config::from_lookup(|key| match key {
            "ENABLE_FILE_LOGS" => Some("true".to_string()),
            "LOG_DIR" => Some("/var/log/flashcards".to_string()),
            _ => None,
        });
        assert_eq!(config.log.file_dir, Some(PathBuf::from("/var/log/flashcards")));
    }

    #[test]
    fn invalid_port_falls_back() {
        let config = Config::from_lookup(|key| match key {
            "PORT" => Some("not-a-port".to_string()),
            "HOST" => Some("127.0.0.1".to_string()),
            _ => None,
        });
        assert_eq!(config.bind_addr().to_string(), "127.0.0.1:8000");
    }
}
