//! Configuration management for course-portal.
//!
//! Configuration is loaded with the following priority (highest to lowest):
//! 1. Command-line arguments
//! 2. Environment variables
//! 3. Configuration file (JSON)
//! 4. Default values

use std::collections::HashMap;
use std::net::IpAddr;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::api::ServerConfig;
use crate::cli::Args;
use crate::enrollment::CouponBook;
use crate::session::{IdentityPolicy, DEMO_EMAIL};
use crate::storage::{FileStorage, KeyValueStore, MemoryStorage};

/// Application configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Server configuration.
    pub server: ServerSection,
    /// Durable storage configuration.
    pub storage: StorageSection,
    /// Session validity configuration.
    pub session: SessionSection,
    /// Enrollment pricing configuration.
    pub enrollment: EnrollmentSection,
    /// Logging configuration.
    pub logging: LoggingSection,
}

/// Server configuration section.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerSection {
    /// Host address to bind to.
    pub host: String,
    /// Port to listen on.
    pub port: u16,
    /// Enable graceful shutdown.
    pub graceful_shutdown: bool,
}

impl Default for ServerSection {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 3000,
            graceful_shutdown: true,
        }
    }
}

/// Storage configuration section.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageSection {
    /// JSON file backing the session. In-memory storage when unset.
    pub path: Option<PathBuf>,
}

/// Session configuration section.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionSection {
    /// Email addresses never accepted as a session identity.
    pub blocked_emails: Vec<String>,
}

impl Default for SessionSection {
    fn default() -> Self {
        Self {
            blocked_emails: vec![DEMO_EMAIL.to_string()],
        }
    }
}

/// Enrollment configuration section.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct EnrollmentSection {
    /// Coupon code to percentage discount.
    pub coupons: HashMap<String, u8>,
}

/// Logging configuration section.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingSection {
    /// Log level (error, warn, info, debug, trace) or a filter directive.
    pub level: String,
}

impl Default for LoggingSection {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
        }
    }
}

impl Config {
    /// Load configuration from a JSON file.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        Ok(serde_json::from_str(&content)?)
    }

    /// Apply environment variable overrides.
    pub fn apply_env(&mut self) {
        self.apply_vars(|name| std::env::var(name).ok());
    }

    fn apply_vars<F>(&mut self, var: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(host) = var("COURSE_PORTAL_HOST") {
            self.server.host = host;
        }

        if let Some(port) = var("COURSE_PORTAL_PORT") {
            if let Ok(port) = port.parse() {
                self.server.port = port;
            }
        }

        if let Some(path) = var("COURSE_PORTAL_STORAGE") {
            if !path.is_empty() {
                self.storage.path = Some(PathBuf::from(path));
            }
        }

        if let Some(level) = var("COURSE_PORTAL_LOG_LEVEL") {
            self.logging.level = level;
        } else if let Some(level) = var("RUST_LOG") {
            self.logging.level = level;
        }
    }

    /// Apply CLI argument overrides.
    pub fn apply_args(&mut self, args: &Args) {
        if let Some(host) = args.host {
            self.server.host = host.to_string();
        }
        if let Some(port) = args.port {
            self.server.port = port;
        }
        if let Some(ref path) = args.storage {
            self.storage.path = Some(path.clone());
        }
        if let Some(ref level) = args.log_level {
            self.logging.level = level.clone();
        }
    }

    /// Load configuration with full priority chain.
    ///
    /// Priority: CLI args > env vars > config file > defaults
    pub fn load(args: &Args) -> Result<Self, ConfigError> {
        let mut config = match args.config {
            Some(ref path) => Config::from_file(path)?,
            None => Config::default(),
        };

        config.apply_env();
        config.apply_args(args);

        Ok(config)
    }

    /// Convert to ServerConfig for the API server.
    pub fn to_server_config(&self) -> Result<ServerConfig, ConfigError> {
        let host: IpAddr = self
            .server
            .host
            .parse()
            .map_err(|_| ConfigError::InvalidHost(self.server.host.clone()))?;

        let mut server_config = ServerConfig::new(host.to_string(), self.server.port);
        if !self.server.graceful_shutdown {
            server_config = server_config.without_graceful_shutdown();
        }
        Ok(server_config)
    }

    /// Open the configured storage backend.
    pub fn open_storage(&self) -> Result<Arc<dyn KeyValueStore>, ConfigError> {
        match self.storage.path {
            Some(ref path) => {
                let storage = FileStorage::open(path).map_err(|e| ConfigError::Storage {
                    path: path.clone(),
                    source: e,
                })?;
                Ok(Arc::new(storage))
            }
            None => Ok(Arc::new(MemoryStorage::new())),
        }
    }

    /// Identity policy built from the session section.
    pub fn identity_policy(&self) -> IdentityPolicy {
        IdentityPolicy::new(&self.session.blocked_emails)
    }

    /// Coupon book built from the enrollment section.
    pub fn coupon_book(&self) -> CouponBook {
        CouponBook::from_map(
            self.enrollment
                .coupons
                .iter()
                .map(|(code, percent)| (code, *percent)),
        )
    }

    /// Get the log level filter string.
    pub fn log_filter(&self) -> &str {
        &self.logging.level
    }
}

/// Configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// IO error reading config file.
    #[error("failed to read config file: {0}")]
    Io(#[from] std::io::Error),
    /// JSON parsing error.
    #[error("failed to parse config file: {0}")]
    Json(#[from] serde_json::Error),
    /// Invalid host address.
    #[error("invalid host address: {0}")]
    InvalidHost(String),
    /// Storage file could not be opened.
    #[error("failed to open storage {}: {source}", path.display())]
    Storage {
        path: PathBuf,
        source: crate::error::PortalError,
    },
}
