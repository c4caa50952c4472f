use std::env;
use std::fmt;
use std::net::{IpAddr, SocketAddr};
use std::path::PathBuf;

const DEFAULT_FAIRNESS_THRESHOLD: f64 = 0.2;

/// Distinguishes runtime behavior for different stages of the service.
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

/// Top-level configuration for the application.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub environment: AppEnvironment,
    pub server: ServerConfig,
    pub telemetry: TelemetryConfig,
    pub artifacts: ArtifactConfig,
    pub fairness: FairnessConfig,
}

impl AppConfig {
    pub fn load() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let environment = AppEnvironment::from_str(
            &env::var("APP_ENV").unwrap_or_else(|_| "development".to_string()),
        );

        let host = env::var("APP_HOST").unwrap_or_else(|_| "127.0.0.1".to_string());
        let port = env::var("APP_PORT")
            .unwrap_or_else(|_| "8000".to_string())
            .parse::<u16>()
            .map_err(|_| ConfigError::InvalidPort)?;

        let log_level = env::var("APP_LOG_LEVEL").unwrap_or_else(|_| "info".to_string());

        let model_dir = env::var("APP_MODEL_DIR").unwrap_or_else(|_| "models".to_string());
        let model_file =
            env::var("APP_MODEL_FILE").unwrap_or_else(|_| "best_model.json".to_string());
        let preprocessor_file =
            env::var("APP_PREPROCESSOR_FILE").unwrap_or_else(|_| "preprocessor.json".to_string());

        let threshold = match env::var("APP_FAIRNESS_THRESHOLD") {
            Ok(raw) => raw
                .trim()
                .parse::<f64>()
                .ok()
                .filter(|value| value.is_finite() && *value >= 0.0)
                .ok_or(ConfigError::InvalidFairnessThreshold { value: raw })?,
            Err(_) => DEFAULT_FAIRNESS_THRESHOLD,
        };
        let protected_attribute = env::var("APP_PROTECTED_ATTRIBUTE")
            .unwrap_or_else(|_| "income_variability".to_string());

        Ok(Self {
            environment,
            server: ServerConfig { host, port },
            telemetry: TelemetryConfig { log_level },
            artifacts: ArtifactConfig::new(model_dir, &model_file, &preprocessor_file),
            fairness: FairnessConfig {
                threshold,
                protected_attribute,
            },
        })
    }
}

/// Settings controlling the HTTP server binding.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

impl ServerConfig {
    pub fn socket_addr(&self) -> Result<SocketAddr, ConfigError> {
        if self.host.eq_ignore_ascii_case("localhost") {
            return Ok(SocketAddr::new(IpAddr::from([127, 0, 0, 1]), self.port));
        }

        let ip: IpAddr = self
            .host
            .parse()
            .map_err(|source| ConfigError::InvalidHost { source })?;

        Ok(SocketAddr::new(ip, self.port))
    }
}

/// Tracing and metrics controls.
#[derive(Debug, Clone)]
pub struct TelemetryConfig {
    pub log_level: String,
}

/// Locations of the persisted transformer and model artifacts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArtifactConfig {
    pub model_path: PathBuf,
    pub preprocessor_path: PathBuf,
}

impl ArtifactConfig {
    pub fn new(dir: impl Into<PathBuf>, model_file: &str, preprocessor_file: &str) -> Self {
        let dir = dir.into();
        Self {
            model_path: dir.join(model_file),
            preprocessor_path: dir.join(preprocessor_file),
        }
    }

    /// Same artifact file names, resolved against another directory.
    pub fn in_dir(&self, dir: impl Into<PathBuf>) -> Self {
        let dir = dir.into();
        let relocate = |path: &PathBuf| match path.file_name() {
            Some(name) => dir.join(name),
            None => dir.clone(),
        };
        Self {
            model_path: relocate(&self.model_path),
            preprocessor_path: relocate(&self.preprocessor_path),
        }
    }
}

/// Defaults applied when auditing predictions for group disparities.
#[derive(Debug, Clone, PartialEq)]
pub struct FairnessConfig {
    pub threshold: f64,
    pub protected_attribute: String,
}

impl Default for FairnessConfig {
    fn default() -> Self {
        Self {
            threshold: DEFAULT_FAIRNESS_THRESHOLD,
            protected_attribute: "income_variability".to_string(),
        }
    }
}

#[derive(Debug)]
pub enum ConfigError {
    InvalidPort,
    InvalidHost { source: std::net::AddrParseError },
    InvalidFairnessThreshold { value: String },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::InvalidPort => write!(f, "APP_PORT must be a valid u16"),
            ConfigError::InvalidHost { .. } => {
                write!(f, "APP_HOST must parse to an IPv4 or IPv6 address")
            }
            ConfigError::InvalidFairnessThreshold { value } => write!(
                f,
                "APP_FAIRNESS_THRESHOLD must be a non-negative number (found '{}')",
                value
            ),
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ConfigError::InvalidPort | ConfigError::InvalidFairnessThreshold { .. } => None,
            ConfigError::InvalidHost { source } => Some(source),
        }
    }
}
