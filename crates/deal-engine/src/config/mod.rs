use std::env;
use std::fmt;
use std::path::{Path, PathBuf};

mod engine;

pub use engine::EngineConfig;

/// Distinguishes runtime behavior for different stages of the tool.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppEnvironment {
    Development,
    Test,
    Production,
}

impl AppEnvironment {
    fn from_str(value: &str) -> Self {
        match value.trim().to_ascii_lowercase().as_str() {
            "prod" | "production" => Self::Production,
            "test" | "ci" => Self::Test,
            _ => Self::Development,
        }
    }
}

/// Process-level settings for the command-line front end.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub environment: AppEnvironment,
    pub telemetry: TelemetryConfig,
    /// Optional JSON file overriding the built-in engine tables.
    pub engine_config_path: Option<PathBuf>,
}

impl AppConfig {
    pub fn load() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let environment = AppEnvironment::from_str(
            &env::var("APP_ENV").unwrap_or_else(|_| "development".to_string()),
        );

        let log_level = env::var("APP_LOG_LEVEL").unwrap_or_else(|_| "info".to_string());

        let engine_config_path = match env::var("DEAL_ENGINE_CONFIG") {
            Ok(raw) if raw.trim().is_empty() => return Err(ConfigError::EmptyEngineConfigPath),
            Ok(raw) => Some(PathBuf::from(raw.trim())),
            Err(_) => None,
        };

        Ok(Self {
            environment,
            telemetry: TelemetryConfig { log_level },
            engine_config_path,
        })
    }

    /// Engine tables from `engine_config_path`, or the built-in defaults.
    pub fn engine(&self) -> Result<EngineConfig, ConfigError> {
        match &self.engine_config_path {
            Some(path) => EngineConfig::from_path(path),
            None => Ok(EngineConfig::default()),
        }
    }
}

/// Tracing controls.
#[derive(Debug, Clone)]
pub struct TelemetryConfig {
    pub log_level: String,
}

#[derive(Debug)]
pub enum ConfigError {
    EmptyEngineConfigPath,
    ReadFile {
        path: PathBuf,
        source: std::io::Error,
    },
    ParseFile {
        path: PathBuf,
        source: serde_json::Error,
    },
    Parse(serde_json::Error),
}

impl ConfigError {
    pub(crate) fn read_file(path: &Path, source: std::io::Error) -> Self {
        Self::ReadFile {
            path: path.to_path_buf(),
            source,
        }
    }

    pub(crate) fn parse_file(path: &Path, source: serde_json::Error) -> Self {
        Self::ParseFile {
            path: path.to_path_buf(),
            source,
        }
    }
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::EmptyEngineConfigPath => {
                write!(f, "DEAL_ENGINE_CONFIG is set but empty")
            }
            ConfigError::ReadFile { path, .. } => {
                write!(f, "unable to read engine config {}", path.display())
            }
            ConfigError::ParseFile { path, source } => {
                write!(f, "engine config {} is not valid: {}", path.display(), source)
            }
            ConfigError::Parse(source) => write!(f, "engine config is not valid: {}", source),
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ConfigError::EmptyEngineConfigPath => None,
            ConfigError::ReadFile { source, .. } => Some(source),
            ConfigError::ParseFile { source, .. } => Some(source),
            ConfigError::Parse(source) => Some(source),
        }
    }
}

/// Serialises tests that read or write process environment variables.
#[cfg(test)]
pub(crate) fn env_guard() -> &'static std::sync::Mutex<()> {
    static GUARD: std::sync::OnceLock<std::sync::Mutex<()>> = std::sync::OnceLock::new();
    GUARD.get_or_init(|| std::sync::Mutex::new(()))
}
