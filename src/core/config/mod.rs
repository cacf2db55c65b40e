pub mod api_config;

pub use api_config::{ApiConfig, ConfigSource, ProcessEnv};
