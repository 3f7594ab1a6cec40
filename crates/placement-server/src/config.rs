//! Server configuration from the environment

use std::net::SocketAddr;
use std::path::PathBuf;

use anyhow::Context;

const DEFAULT_BIND: &str = "127.0.0.1:8000";

pub struct ServerConfig {
    pub bind: SocketAddr,
    pub db_path: PathBuf,
    pub jwt_secret: Vec<u8>,
}

impl ServerConfig {
    /// Reads `PLACEMENT_BIND`, `PLACEMENT_DB_PATH` and `PLACEMENT_JWT_SECRET`
    pub fn from_env() -> anyhow::Result<Self> {
        let bind = parse_bind(std::env::var("PLACEMENT_BIND").ok().as_deref())?;
        let db_path = placement_core::db::get_db_path()?;
        let jwt_secret = placement_core::load_jwt_secret();

        Ok(Self {
            bind,
            db_path,
            jwt_secret,
        })
    }
}

fn parse_bind(value: Option<&str>) -> anyhow::Result<SocketAddr> {
    let raw = match value {
        Some(v) if !v.trim().is_empty() => v.trim(),
        _ => {
            log::info!("PLACEMENT_BIND not set, using default: {}", DEFAULT_BIND);
            DEFAULT_BIND
        }
    };
    raw.parse()
        .with_context(|| format!("Invalid PLACEMENT_BIND value: {}", raw))
}
