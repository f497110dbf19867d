use anyhow::{anyhow, Context, Result};
use std::env;
use std::net::SocketAddr;

pub const DEFAULT_TMDB_BASE: &str = "https://api.themoviedb.org/3";
const DEFAULT_BIND: &str = "0.0.0.0:3000";

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub tmdb_api_key: String,
    pub tmdb_base_url: String,
    pub bind_addr: SocketAddr,
}

impl AppConfig {
    pub fn from_env() -> Result<Self> {
        let tmdb_api_key = env::var("TMDB_API_KEY")
            .ok()
            .filter(|s| !s.trim().is_empty())
            .ok_or_else(|| anyhow!("Missing required environment variable: TMDB_API_KEY"))?;
        let tmdb_base_url = env::var("TMDB_BASE_URL")
            .ok()
            .filter(|s| !s.trim().is_empty())
            .map(|s| s.trim_end_matches('/').to_string())
            .unwrap_or_else(|| DEFAULT_TMDB_BASE.to_string());
        let bind_raw = env::var("MARQUEE_BIND").unwrap_or_else(|_| DEFAULT_BIND.to_string());
        let bind_addr = bind_raw
            .parse()
            .with_context(|| format!("MARQUEE_BIND is not a socket address: '{}'", bind_raw))?;
        Ok(Self {
            tmdb_api_key,
            tmdb_base_url,
            bind_addr,
        })
    }
}
