//! Configuration Module
//!
//! Configuration loading and dependency injection for the pick server.

mod container;
mod settings;

pub use container::{Container, ContainerError};
pub use settings::{
    ConfigError, DEFAULT_MARKETING_BOT_URL, EmailSettings, MarketingBotSettings, Secret,
    ServerConfig, ServerSettings,
};
