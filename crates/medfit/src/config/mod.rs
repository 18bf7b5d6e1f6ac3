use crate::workflows::labeling::{MatchMode, RuleSet, RuleSetError, UnknownMatchMode};
use std::env;
use std::fmt;
use std::net::{IpAddr, SocketAddr};
use std::path::PathBuf;

pub const DEFAULT_COMPANIES_CSV: &str = "companies_master_final.csv";

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
    pub data: DataConfig,
}

impl AppConfig {
    pub fn load() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let environment = AppEnvironment::from_str(
            &env::var("APP_ENV").unwrap_or_else(|_| "development".to_string()),
        );

        let host = env::var("APP_HOST").unwrap_or_else(|_| "127.0.0.1".to_string());
        let port = env::var("APP_PORT")
            .unwrap_or_else(|_| "3000".to_string())
            .parse::<u16>()
            .map_err(|_| ConfigError::InvalidPort)?;

        let log_level = env::var("APP_LOG_LEVEL").unwrap_or_else(|_| "info".to_string());

        Ok(Self {
            environment,
            server: ServerConfig { host, port },
            telemetry: TelemetryConfig { log_level },
            data: DataConfig::from_env()?,
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

/// Tracing controls.
#[derive(Debug, Clone)]
pub struct TelemetryConfig {
    pub log_level: String,
}

/// Company table, override table and rule set locations.
#[derive(Debug, Clone)]
pub struct DataConfig {
    pub companies_csv: PathBuf,
    pub overrides_csv: Option<PathBuf>,
    pub rule_set_path: Option<PathBuf>,
    pub match_mode: MatchMode,
    pub survey_callback_token: Option<String>,
}

impl Default for DataConfig {
    fn default() -> Self {
        Self {
            companies_csv: PathBuf::from(DEFAULT_COMPANIES_CSV),
            overrides_csv: None,
            rule_set_path: None,
            match_mode: MatchMode::default(),
            survey_callback_token: None,
        }
    }
}

impl DataConfig {
    fn from_env() -> Result<Self, ConfigError> {
        let match_mode = match non_empty_var("MEDFIT_MATCH_MODE") {
            Some(raw) => raw
                .parse::<MatchMode>()
                .map_err(|source| ConfigError::InvalidMatchMode { source })?,
            None => MatchMode::default(),
        };

        Ok(Self {
            companies_csv: non_empty_var("MEDFIT_COMPANIES_CSV")
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from(DEFAULT_COMPANIES_CSV)),
            overrides_csv: non_empty_var("MEDFIT_OVERRIDES_CSV").map(PathBuf::from),
            rule_set_path: non_empty_var("MEDFIT_RULESET").map(PathBuf::from),
            match_mode,
            survey_callback_token: non_empty_var("SURVEY_CALLBACK_TOKEN"),
        })
    }

    /// The configured JSON rule set, or the built-in standard set.
    pub fn load_rule_set(&self) -> Result<RuleSet, RuleSetError> {
        match &self.rule_set_path {
            Some(path) => RuleSet::from_json_path(path),
            None => Ok(RuleSet::standard()),
        }
    }
}

fn non_empty_var(key: &str) -> Option<String> {
    env::var(key)
        .ok()
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
}

#[derive(Debug)]
pub enum ConfigError {
    InvalidPort,
    InvalidHost { source: std::net::AddrParseError },
    InvalidMatchMode { source: UnknownMatchMode },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::InvalidPort => write!(f, "APP_PORT must be a valid u16"),
            ConfigError::InvalidHost { .. } => {
                write!(f, "APP_HOST must parse to an IPv4 or IPv6 address")
            }
            ConfigError::InvalidMatchMode { source } => {
                write!(f, "MEDFIT_MATCH_MODE is invalid: {source}")
            }
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ConfigError::InvalidPort => None,
            ConfigError::InvalidHost { source } => Some(source),
            ConfigError::InvalidMatchMode { source } => Some(source),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::env;
    use std::sync::{Mutex, OnceLock};

    fn env_guard() -> &'static Mutex<()> {
        static GUARD: OnceLock<Mutex<()>> = OnceLock::new();
        GUARD.get_or_init(|| Mutex::new(()))
    }

    fn reset_env() {
        for key in [
            "APP_ENV",
            "APP_HOST",
            "APP_PORT",
            "APP_LOG_LEVEL",
            "MEDFIT_COMPANIES_CSV",
            "MEDFIT_OVERRIDES_CSV",
            "MEDFIT_RULESET",
            "MEDFIT_MATCH_MODE",
            "SURVEY_CALLBACK_TOKEN",
        ] {
            env::remove_var(key);
        }
    }

    #[test]
    fn load_uses_defaults_when_env_missing() {
        let _lock = env_guard().lock().expect("env mutex poisoned");
        reset_env();
        let config = AppConfig::load().expect("config loads with defaults");
        assert_eq!(config.environment, AppEnvironment::Development);
        assert_eq!(config.server.host, "127.0.0.1");
        assert_eq!(config.server.port, 3000);
        assert_eq!(config.telemetry.log_level, "info");
        assert_eq!(
            config.data.companies_csv,
            PathBuf::from(DEFAULT_COMPANIES_CSV)
        );
        assert_eq!(config.data.match_mode, MatchMode::FirstMatch);
        assert!(config.data.overrides_csv.is_none());
        assert!(config.data.survey_callback_token.is_none());
    }

    #[test]
    fn accepts_localhost_host() {
        let _lock = env_guard().lock().expect("env mutex poisoned");
        reset_env();
        env::set_var("APP_HOST", "localhost");
        let config = AppConfig::load().expect("config loads");
        let addr = config.server.socket_addr().expect("localhost resolves");
        assert_eq!(addr, SocketAddr::new(IpAddr::from([127, 0, 0, 1]), 3000));
    }

    #[test]
    fn reads_data_settings() {
        let _lock = env_guard().lock().expect("env mutex poisoned");
        reset_env();
        env::set_var("MEDFIT_COMPANIES_CSV", "data/companies.csv");
        env::set_var("MEDFIT_OVERRIDES_CSV", "manual_industry_map.csv");
        env::set_var("MEDFIT_MATCH_MODE", "frequent");
        env::set_var("SURVEY_CALLBACK_TOKEN", "  ");
        let config = AppConfig::load().expect("config loads");
        reset_env();

        assert_eq!(
            config.data.companies_csv,
            PathBuf::from("data/companies.csv")
        );
        assert_eq!(
            config.data.overrides_csv,
            Some(PathBuf::from("manual_industry_map.csv"))
        );
        assert_eq!(config.data.match_mode, MatchMode::MostFrequent);
        assert!(config.data.survey_callback_token.is_none());
        let rule_set = config.data.load_rule_set().expect("standard rules");
        assert_eq!(rule_set.version, RuleSet::STANDARD_VERSION);
    }

    #[test]
    fn rejects_unknown_match_mode() {
        let _lock = env_guard().lock().expect("env mutex poisoned");
        reset_env();
        env::set_var("MEDFIT_MATCH_MODE", "loudest");
        let error = AppConfig::load().expect_err("invalid match mode");
        reset_env();
        assert!(matches!(error, ConfigError::InvalidMatchMode { .. }));
    }
}
