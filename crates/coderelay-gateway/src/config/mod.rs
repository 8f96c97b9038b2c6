//! Relay config loader (strict parsing).
//!
//! Sources, in order:
//! - YAML file at `$CODERELAY_CONFIG`, or `coderelay.yaml` if it exists
//! - built-in defaults when neither is present
//! - `$PORT` overrides the port of `gateway.listen`

pub mod schema;

use std::{env, fs, path::Path};

use coderelay_core::error::{Result, RelayError};

pub use schema::{GatewaySection, RelayConfig};

pub const CONFIG_ENV: &str = "CODERELAY_CONFIG";
pub const DEFAULT_CONFIG_PATH: &str = "coderelay.yaml";

pub fn load_from_file(path: &str) -> Result<RelayConfig> {
    let s = fs::read_to_string(path)
        .map_err(|e| RelayError::Config(format!("read config failed ({path}): {e}")))?;
    load_from_str(&s)
}

pub fn load_from_str(s: &str) -> Result<RelayConfig> {
    let cfg: RelayConfig = serde_yaml::from_str(s)
        .map_err(|e| RelayError::Config(format!("invalid yaml: {e}")))?;
    cfg.validate()?;
    Ok(cfg)
}

/// Resolve config from the process environment.
///
/// An explicit `$CODERELAY_CONFIG` must exist; the default path is optional.
pub fn load_from_env() -> Result<RelayConfig> {
    let mut cfg = match env::var(CONFIG_ENV) {
        Ok(path) => load_from_file(&path)?,
        Err(_) if Path::new(DEFAULT_CONFIG_PATH).exists() => load_from_file(DEFAULT_CONFIG_PATH)?,
        Err(_) => {
            tracing::info!("no config file; using defaults");
            RelayConfig::default()
        }
    };

    if let Ok(port) = env::var("PORT") {
        apply_port_override(&mut cfg, &port)?;
    }
    Ok(cfg)
}

/// Replace the port of `gateway.listen`, keeping its host.
pub fn apply_port_override(cfg: &mut RelayConfig, port: &str) -> Result<()> {
    let port: u16 = port
        .trim()
        .parse()
        .map_err(|e| RelayError::Config(format!("PORT must be a port number: {e}")))?;
    let mut addr: std::net::SocketAddr = cfg
        .gateway
        .listen
        .parse()
        .map_err(|e| RelayError::Config(format!("gateway.listen: {e}")))?;
    addr.set_port(port);
    cfg.gateway.listen = addr.to_string();
    Ok(())
}
