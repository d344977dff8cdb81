/// Tracing subscriber setup
pub mod logging;

/// Settings loading from config.toml and the environment
pub mod settings;
