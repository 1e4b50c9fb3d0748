//! Server configuration
//!
//! The runtime surface is the bind address and port, taken from
//! positional command line arguments: `line_broadcast [host] [port]`.

use crate::error::ConfigError;

/// Default bind host
pub const DEFAULT_HOST: &str = "127.0.0.1";

/// Default bind port
pub const DEFAULT_PORT: u16 = 8888;

/// Size of the per-connection read buffer
pub const DEFAULT_READ_BUFFER_SIZE: usize = 4096;

/// Server configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Host or IP address to listen on
    pub host: String,
    /// TCP port to listen on
    pub port: u16,
    /// Bytes requested per read; each read becomes one message at most
    pub read_buffer_size: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            host: DEFAULT_HOST.to_string(),
            port: DEFAULT_PORT,
            read_buffer_size: DEFAULT_READ_BUFFER_SIZE,
        }
    }
}

impl Config {
    /// Build a config from positional arguments (program name already skipped)
    ///
    /// Missing arguments fall back to the defaults; extra arguments are ignored.
    pub fn from_args<I, S>(args: I) -> Result<Self, ConfigError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut args = args.into_iter().map(Into::into);
        let mut config = Config::default();

        if let Some(host) = args.next() {
            if host.trim().is_empty() {
                return Err(ConfigError::InvalidHost(host));
            }
            config.host = host;
        }

        if let Some(port) = args.next() {
            config.port = port
                .parse()
                .map_err(|_| ConfigError::InvalidPort(port.clone()))?;
        }

        config.validate()?;
        Ok(config)
    }

    /// Check invariants that the constructors can't express in the types
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.read_buffer_size == 0 {
            return Err(ConfigError::ZeroReadBuffer);
        }
        Ok(())
    }

    /// The `host:port` string handed to the listener
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_without_args() {
        let config = Config::from_args(Vec::<String>::new()).unwrap();
        assert_eq!(config, Config::default());
        assert_eq!(config.bind_addr(), "127.0.0.1:8888");
        assert_eq!(config.read_buffer_size, 4096);
    }

    #[test]
    fn test_host_and_port() {
        let config = Config::from_args(["0.0.0.0", "9000"]).unwrap();
        assert_eq!(config.host, "0.0.0.0");
        assert_eq!(config.port, 9000);
        assert_eq!(config.bind_addr(), "0.0.0.0:9000");
    }

    #[test]
    fn test_host_only_keeps_default_port() {
        let config = Config::from_args(["localhost"]).unwrap();
        assert_eq!(config.bind_addr(), "localhost:8888");
    }

    #[test]
    fn test_invalid_port() {
        assert_eq!(
            Config::from_args(["127.0.0.1", "http"]),
            Err(ConfigError::InvalidPort("http".to_string()))
        );
        assert_eq!(
            Config::from_args(["127.0.0.1", "70000"]),
            Err(ConfigError::InvalidPort("70000".to_string()))
        );
    }

    #[test]
    fn test_empty_host_rejected() {
        assert!(matches!(
            Config::from_args(["  "]),
            Err(ConfigError::InvalidHost(_))
        ));
    }

    #[test]
    fn test_zero_read_buffer_rejected() {
        let config = Config {
            read_buffer_size: 0,
            ..Config::default()
        };
        assert_eq!(config.validate(), Err(ConfigError::ZeroReadBuffer));
    }
}
