//! Shared value types and configuration for the brand audit workspace.

pub mod app_config;
pub mod audit;
pub mod config;
pub mod discovery;
pub mod profile;

use thiserror::Error;

pub use app_config::{AppConfig, Environment};
pub use audit::{AuditRun, AuditStatus};
pub use config::{load_app_config, load_app_config_from_env};
pub use discovery::{DiscoveredCandidate, DiscoveryRunResult, DiscoverySource};
pub use profile::{is_valid_handle, BrandProfile, InfluencerProfile, Post, PostType};

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid value for {var}: {reason}")]
    InvalidEnvVar { var: String, reason: String },
}

#[derive(Debug, Error)]
pub enum CoreError {
    #[error("invalid audit transition from {from} to {to}")]
    InvalidTransition { from: AuditStatus, to: AuditStatus },

    #[error("unknown audit status: {0}")]
    UnknownStatus(String),

    #[error("unknown discovery source: {0}")]
    UnknownSource(String),
}
