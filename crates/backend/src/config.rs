use std::net::SocketAddr;
use std::path::PathBuf;

/// Server settings, read from the environment.
#[derive(Debug, Clone)]
pub struct Config {
    pub assets_dir: PathBuf,
    pub bind_addr: String,
    pub port: u16,
}

impl Config {
    pub fn from_env() -> anyhow::Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> anyhow::Result<Self> {
        let assets_dir = PathBuf::from(lookup("ASSETS_DIR").unwrap_or_else(|| "assets".to_string()));
        let bind_addr = lookup("BIND_ADDR").unwrap_or_else(|| "0.0.0.0".to_string());
        let port = match lookup("PORT") {
            Some(p) => p
                .parse::<u16>()
                .map_err(|e| anyhow::anyhow!("invalid PORT {:?}: {}", p, e))?,
            None => 3000,
        };
        Ok(Config {
            assets_dir,
            bind_addr,
            port,
        })
    }

    pub fn socket_addr(&self) -> anyhow::Result<SocketAddr> {
        let addr = format!("{}:{}", self.bind_addr, self.port);
        addr.parse::<SocketAddr>()
            .map_err(|e| anyhow::anyhow!("invalid bind address {}: {}", addr, e))
    }
}
