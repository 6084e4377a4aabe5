pub mod app_config;
pub mod config;
pub mod content;
pub mod profile;

use thiserror::Error;

pub use app_config::{AppConfig, Environment};
pub use config::{load_app_config, load_app_config_from_env};
pub use content::{validate_items, ContentBlock, ContentError, ContentItem, TextAlignment};
pub use profile::{RenderedProfile, SocialLinks, SocialPlatform, SubjectProfile};

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("missing required environment variable: {0}")]
    MissingEnvVar(String),
    #[error("invalid value for {var}: {reason}")]
    InvalidEnvVar { var: String, reason: String },
}
