use std::str::FromStr;
use std::sync::LazyLock;
use std::{env, fmt};

pub struct Config {
    pub server: ServerConfig,
    pub checks: ChecksConfig,
}

impl Config {
    pub fn new() -> Self {
        Config {
            server: ServerConfig {
                address: env::var("HEALTHCHECK_SERVER_ADDRESS")
                    .unwrap_or_else(|_| "127.0.0.1".to_string()),
                port: env_or("HEALTHCHECK_SERVER_PORT", 8080),
            },
            checks: ChecksConfig {
                file_check: FileCheckConfig {
                    files: env_list("HEALTHCHECK_FILECHECK_FILES"),
                    interval: env_interval_or("HEALTHCHECK_FILECHECK_INTERVAL", 30),
                    threshold: env_or("HEALTHCHECK_FILECHECK_THRESHOLD", 1),
                },
                url_check: UrlCheckConfig {
                    urls: env_list("HEALTHCHECK_URLCHECK_URLS"),
                    interval: env_interval_or("HEALTHCHECK_URLCHECK_INTERVAL", 60),
                    timeout: env_or("HEALTHCHECK_URLCHECK_TIMEOUT", 10),
                    threshold: env_or("HEALTHCHECK_URLCHECK_THRESHOLD", 3),
                    expected_status: env_or("HEALTHCHECK_URLCHECK_STATUS", 200),
                },
                tcp_check: TcpCheckConfig {
                    addresses: env_list("HEALTHCHECK_TCPCHECK_ADDRESSES"),
                    interval: env_interval_or("HEALTHCHECK_TCPCHECK_INTERVAL", 60),
                    timeout: env_or("HEALTHCHECK_TCPCHECK_TIMEOUT", 5),
                    threshold: env_or("HEALTHCHECK_TCPCHECK_THRESHOLD", 3),
                },
            },
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Config")
            .field("server", &self.server)
            .field("checks", &self.checks)
            .finish()
    }
}

/// Reads `key` from the environment, falling back to `default` when it is
/// unset or cannot be parsed.
fn env_or<T: FromStr>(key: &str, default: T) -> T {
    env::var(key)
        .ok()
        .and_then(|v| v.trim().parse().ok())
        .unwrap_or(default)
}

/// Like [`env_or`] for check intervals in seconds. Zero falls back to
/// `default` as well.
fn env_interval_or(key: &str, default: u64) -> u64 {
    match env_or(key, default) {
        0 => default,
        interval => interval,
    }
}

/// Reads a comma separated list, skipping empty entries.
fn env_list(key: &str) -> Vec<String> {
    env::var(key)
        .unwrap_or_default()
        .split(',')
        .filter(|s| !s.trim().is_empty())
        .map(|s| s.trim().to_string())
        .collect()
}

pub struct ServerConfig {
    pub address: String,
    pub port: u16,
}

impl fmt::Debug for ServerConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ServerConfig")
            .field("address", &self.address)
            .field("port", &self.port)
            .finish()
    }
}

/// The base URL of the server.
impl fmt::Display for ServerConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "http://{}:{}", self.address, self.port)
    }
}

#[derive(Debug)]
pub struct ChecksConfig {
    pub file_check: FileCheckConfig,
    pub url_check: UrlCheckConfig,
    pub tcp_check: TcpCheckConfig,
}

/// Intervals and timeouts are in seconds.
#[derive(Debug)]
pub struct FileCheckConfig {
    pub files: Vec<String>,
    pub interval: u64,
    pub threshold: usize,
}

#[derive(Debug)]
pub struct UrlCheckConfig {
    pub urls: Vec<String>,
    pub interval: u64,
    pub timeout: u64,
    pub threshold: usize,
    pub expected_status: u16,
}

#[derive(Debug)]
pub struct TcpCheckConfig {
    pub addresses: Vec<String>,
    pub interval: u64,
    pub timeout: u64,
    pub threshold: usize,
}

pub static CONFIG: LazyLock<Config> = LazyLock::new(Config::new);
