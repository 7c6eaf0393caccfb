//! Storage module for database and configuration.

pub mod config;
pub mod database;
pub mod schema;

pub use config::{
    load_config, save_config, AppConfig, ConfigError, GenerationSettings, SessionSettings,
};
pub use database::{Database, DatabaseError};
