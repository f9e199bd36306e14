//! Server configuration.
//!
//! Loaded from an optional TOML file, then overridden by `TAKANASHI_*`
//! environment variables:
//!
//! ```toml
//! host = "127.0.0.1"
//! port = 8080
//! static_dir = "public"
//! ```
//!
//! `TAKANASHI_PORT=9000` overrides `port`, and so on.

use std::net::SocketAddr;
use std::path::PathBuf;

use serde::Deserialize;

use crate::error::Error;

const ENV_PREFIX: &str = "TAKANASHI";

#[derive(Clone, Debug, Deserialize, PartialEq)]
pub struct Config {
    pub host: String,
    pub port: u16,
    /// Directory whose files are listed at startup.
    #[serde(default)]
    pub static_dir: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self { host: "0.0.0.0".to_owned(), port: 3000, static_dir: None }
    }
}

impl Config {
    /// Loads `path` (extension optional, missing file allowed) plus the environment.
    pub fn load_from(path: &str) -> Result<Self, Error> {
        Self::builder()?
            .add_source(config::File::with_name(path).required(false))
            .add_source(config::Environment::with_prefix(ENV_PREFIX).try_parsing(true))
            .build()?
            .try_deserialize()
            .map_err(Error::from)
    }

    /// Defaults plus the environment, no file.
    pub fn from_env() -> Result<Self, Error> {
        Self::builder()?
            .add_source(config::Environment::with_prefix(ENV_PREFIX).try_parsing(true))
            .build()?
            .try_deserialize()
            .map_err(Error::from)
    }

    pub fn socket_addr(&self) -> Result<SocketAddr, Error> {
        let addr = format!("{}:{}", self.host, self.port);
        addr.parse().map_err(|_| Error::InvalidAddress(addr))
    }

    fn builder() -> Result<config::ConfigBuilder<config::builder::DefaultState>, Error> {
        let defaults = Self::default();
        Ok(config::Config::builder()
            .set_default("host", defaults.host)?
            .set_default("port", i64::from(defaults.port))?)
    }
}
