use std::env;
use std::io;
use std::path::PathBuf;

/// Environment variable names - single source of truth
pub mod env_vars {
    pub const BIND_ADDR: &str = "WIKI_BIND_ADDR";
    pub const PORT: &str = "PORT";
    /// Directory holding one `<Title>.txt` file per page
    pub const DATA_DIR: &str = "WIKI_DATA_DIR";
}

/// Default values
pub mod defaults {
    pub const BIND_ADDR: &str = "0.0.0.0";
    pub const PORT: u16 = 8197;
    pub const DATA_DIR: &str = "./data";
}

#[derive(Clone, Debug)]
pub struct Config {
    pub bind_addr: String,
    pub port: u16,
    pub data_dir: PathBuf,
}

impl Config {
    pub fn from_env() -> io::Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> io::Result<Self> {
        let port = match lookup(env_vars::PORT) {
            Some(raw) => raw.trim().parse().map_err(|e| {
                io::Error::new(
                    io::ErrorKind::InvalidInput,
                    format!("{} must be a valid port number, got {:?}: {}", env_vars::PORT, raw, e),
                )
            })?,
            None => defaults::PORT,
        };

        Ok(Self {
            bind_addr: lookup(env_vars::BIND_ADDR)
                .unwrap_or_else(|| defaults::BIND_ADDR.to_string()),
            port,
            data_dir: lookup(env_vars::DATA_DIR)
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from(defaults::DATA_DIR)),
        })
    }
}
