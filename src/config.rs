//! Application configuration.
//!
//! Values come from `config.toml`, then `.env` / the process environment,
//! then built-in defaults.

use serde::Deserialize;
use std::path::{Path, PathBuf};

// ==================== File Configuration ====================

/// Configuration file structure for config.toml
#[derive(Debug, Default, Deserialize)]
struct AppConfig {
  database: Option<DatabaseConfig>,
  server: Option<ServerConfig>,
}

#[derive(Debug, Deserialize)]
struct DatabaseConfig {
  path: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ServerConfig {
  port: Option<u16>,
}

pub const CONFIG_FILE: &str = "config.toml";

fn read_config_file(path: &Path) -> AppConfig {
  let Ok(contents) = std::fs::read_to_string(path) else {
    return AppConfig::default();
  };
  match toml::from_str::<AppConfig>(&contents) {
    Ok(config) => config,
    Err(e) => {
      tracing::warn!("Ignoring malformed {}: {}", path.display(), e);
      AppConfig::default()
    }
  }
}

// ==================== Database Configuration ====================

pub const DEFAULT_DATABASE_PATH: &str = "data/vocab.db";

/// Load database path with priority: config.toml > .env > default
pub fn load_database_path() -> PathBuf {
  // Load .env file if present
  let _ = dotenvy::dotenv();
  database_path_from(Path::new(CONFIG_FILE), std::env::var("DATABASE_PATH").ok())
}

fn database_path_from(config_file: &Path, env_path: Option<String>) -> PathBuf {
  // Priority 1: config.toml
  if let Some(path) = read_config_file(config_file).database.and_then(|db| db.path) {
    tracing::info!("Using database from {}: {}", config_file.display(), path);
    return PathBuf::from(path);
  }

  // Priority 2: DATABASE_PATH
  if let Some(path) = env_path {
    tracing::info!("Using database from DATABASE_PATH env: {}", path);
    return PathBuf::from(path);
  }

  let default = PathBuf::from(DEFAULT_DATABASE_PATH);
  tracing::info!("Using default database path: {}", default.display());
  default
}

// ==================== Server Configuration ====================

/// Server address to bind to
pub const SERVER_ADDR: &str = "0.0.0.0";

/// Default server port
pub const SERVER_PORT: u16 = 3000;

/// Port with priority: config.toml > SERVER_PORT env > default
pub fn load_server_port() -> u16 {
  let _ = dotenvy::dotenv();
  server_port_from(Path::new(CONFIG_FILE), std::env::var("SERVER_PORT").ok())
}

fn server_port_from(config_file: &Path, env_port: Option<String>) -> u16 {
  if let Some(port) = read_config_file(config_file).server.and_then(|s| s.port) {
    return port;
  }
  match env_port.map(|p| p.parse::<u16>()) {
    Some(Ok(port)) => port,
    Some(Err(e)) => {
      tracing::warn!("Invalid SERVER_PORT, using {}: {}", SERVER_PORT, e);
      SERVER_PORT
    }
    None => SERVER_PORT,
  }
}

/// Get the full server bind address
pub fn server_bind_addr(port: u16) -> String {
  format!("{}:{}", SERVER_ADDR, port)
}

// ==================== Session Configuration ====================

/// Session expiration time in hours
pub const SESSION_EXPIRY_HOURS: i64 = 1;

/// Probability threshold for session cleanup (0-255, lower = more frequent)
/// Value of 25 means ~10% chance (25/256) on each new session
pub const SESSION_CLEANUP_THRESHOLD: u8 = 25;

// ==================== Stats Configuration ====================

/// Days covered by the weekly activity chart
pub const ACTIVITY_WINDOW_DAYS: i64 = 7;
