use std::env;
use std::fmt;
use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::path::PathBuf;

use crate::matching::{AvailabilityPolicy, CertificationGatePolicy, ScoringConfig};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppEnvironment {
    Development,
    Test,
    Production,
}

impl AppEnvironment {
    fn parse(raw: &str) -> Self {
        let lowered = raw.trim().to_ascii_lowercase();
        match lowered.as_str() {
            "production" | "prod" => Self::Production,
            "ci" | "test" => Self::Test,
            _ => Self::Development,
        }
    }
}

fn env_or(key: &str, fallback: &str) -> String {
    env::var(key).unwrap_or_else(|_| fallback.to_string())
}

/// Everything the service and CLI read from the environment (and `.env`).
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub environment: AppEnvironment,
    pub server: ServerConfig,
    pub telemetry: TelemetryConfig,
    pub matching: MatchingSettings,
}

impl AppConfig {
    pub fn load() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let server = ServerConfig {
            host: env_or("APP_HOST", "127.0.0.1"),
            port: env_or("APP_PORT", "3000")
                .trim()
                .parse()
                .map_err(|_| ConfigError::InvalidPort)?,
        };

        Ok(Self {
            environment: AppEnvironment::parse(&env_or("APP_ENV", "development")),
            server,
            telemetry: TelemetryConfig {
                log_level: env_or("APP_LOG_LEVEL", "info"),
            },
            matching: MatchingSettings::from_env()?,
        })
    }
}

#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

impl ServerConfig {
    /// Bind address; `localhost` maps to the IPv4 loopback.
    pub fn socket_addr(&self) -> Result<SocketAddr, ConfigError> {
        let ip = if self.host.eq_ignore_ascii_case("localhost") {
            IpAddr::from(Ipv4Addr::LOCALHOST)
        } else {
            self.host
                .parse::<IpAddr>()
                .map_err(|source| ConfigError::InvalidHost { source })?
        };
        Ok(SocketAddr::new(ip, self.port))
    }
}

#[derive(Debug, Clone)]
pub struct TelemetryConfig {
    /// Default `EnvFilter` directive when `RUST_LOG` is unset.
    pub log_level: String,
}

/// Scoring dials and the optional location of the candidate CSV tables.
#[derive(Debug, Clone)]
pub struct MatchingSettings {
    pub scoring: ScoringConfig,
    pub bench_data_dir: Option<PathBuf>,
}

impl MatchingSettings {
    fn from_env() -> Result<Self, ConfigError> {
        let mut scoring = ScoringConfig::default();

        if let Ok(raw) = env::var("MATCH_SKILL_THRESHOLD") {
            scoring.skill_threshold = raw
                .trim()
                .parse::<u8>()
                .ok()
                .filter(|value| *value <= 100)
                .ok_or(ConfigError::InvalidSkillThreshold(raw))?;
        }

        if let Ok(raw) = env::var("MATCH_GATE_POLICY") {
            scoring.gate_policy = match raw.trim().to_ascii_lowercase().as_str() {
                "exclude" => CertificationGatePolicy::Exclude,
                "penalize" | "penalise" => CertificationGatePolicy::Penalize,
                _ => return Err(ConfigError::InvalidGatePolicy(raw)),
            };
        }

        if let Ok(raw) = env::var("MATCH_AVAILABILITY_POLICY") {
            scoring.availability_policy = match raw.trim().to_ascii_lowercase().as_str() {
                "status" | "status_only" => AvailabilityPolicy::StatusOnly,
                "date" | "date_adjusted" => AvailabilityPolicy::date_adjusted(),
                _ => return Err(ConfigError::InvalidAvailabilityPolicy(raw)),
            };
        }

        if let Ok(raw) = env::var("MATCH_WORKERS") {
            scoring.worker_count = raw
                .trim()
                .parse::<usize>()
                .ok()
                .filter(|value| *value > 0)
                .ok_or(ConfigError::InvalidWorkerCount(raw))?;
        }

        let bench_data_dir = env::var("BENCH_DATA_DIR")
            .ok()
            .map(|value| value.trim().to_string())
            .filter(|value| !value.is_empty())
            .map(PathBuf::from);

        Ok(Self {
            scoring,
            bench_data_dir,
        })
    }
}

#[derive(Debug)]
pub enum ConfigError {
    InvalidPort,
    InvalidHost { source: std::net::AddrParseError },
    InvalidSkillThreshold(String),
    InvalidGatePolicy(String),
    InvalidAvailabilityPolicy(String),
    InvalidWorkerCount(String),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::InvalidPort => f.write_str("APP_PORT is not a port number (0-65535)"),
            ConfigError::InvalidHost { source } => {
                write!(f, "APP_HOST is not an IP address or 'localhost': {source}")
            }
            ConfigError::InvalidSkillThreshold(value) => write!(
                f,
                "MATCH_SKILL_THRESHOLD must be an integer between 0 and 100 (found '{value}')"
            ),
            ConfigError::InvalidGatePolicy(value) => write!(
                f,
                "MATCH_GATE_POLICY must be 'exclude' or 'penalize' (found '{value}')"
            ),
            ConfigError::InvalidAvailabilityPolicy(value) => write!(
                f,
                "MATCH_AVAILABILITY_POLICY must be 'status' or 'date' (found '{value}')"
            ),
            ConfigError::InvalidWorkerCount(value) => write!(
                f,
                "MATCH_WORKERS must be a positive integer (found '{value}')"
            ),
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        if let ConfigError::InvalidHost { source } = self {
            Some(source)
        } else {
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::env;
    use std::sync::{Mutex, MutexGuard};

    static ENV_LOCK: Mutex<()> = Mutex::new(());

    fn lock_env() -> MutexGuard<'static, ()> {
        let guard = ENV_LOCK.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
        reset_env();
        guard
    }

    fn reset_env() {
        for key in [
            "APP_ENV",
            "APP_HOST",
            "APP_PORT",
            "APP_LOG_LEVEL",
            "MATCH_SKILL_THRESHOLD",
            "MATCH_GATE_POLICY",
            "MATCH_AVAILABILITY_POLICY",
            "MATCH_WORKERS",
            "BENCH_DATA_DIR",
        ] {
            env::remove_var(key);
        }
    }

    #[test]
    fn defaults_apply_without_overrides() {
        let _env = lock_env();
        let config = AppConfig::load().expect("defaults load");
        assert_eq!(config.environment, AppEnvironment::Development);
        assert_eq!(config.server.host, "127.0.0.1");
        assert_eq!(config.server.port, 3000);
        assert_eq!(config.telemetry.log_level, "info");
        assert_eq!(config.matching.scoring, ScoringConfig::default());
        assert!(config.matching.bench_data_dir.is_none());
    }

    #[test]
    fn localhost_binds_loopback() {
        let _env = lock_env();
        env::set_var("APP_HOST", "localhost");
        let config = AppConfig::load().expect("config loads");
        let addr = config.server.socket_addr().expect("localhost resolves");
        assert_eq!(addr.to_string(), "127.0.0.1:3000");

        env::set_var("APP_HOST", "bench.internal");
        let config = AppConfig::load().expect("config loads");
        assert!(matches!(
            config.server.socket_addr(),
            Err(ConfigError::InvalidHost { .. })
        ));
        reset_env();
    }

    #[test]
    fn reads_matching_overrides() {
        let _env = lock_env();
        env::set_var("MATCH_SKILL_THRESHOLD", "45");
        env::set_var("MATCH_GATE_POLICY", "penalize");
        env::set_var("MATCH_AVAILABILITY_POLICY", "date");
        env::set_var("MATCH_WORKERS", "8");
        env::set_var("BENCH_DATA_DIR", "data");

        let config = AppConfig::load().expect("config loads");
        let scoring = &config.matching.scoring;
        assert_eq!(scoring.skill_threshold, 45);
        assert_eq!(scoring.gate_policy, CertificationGatePolicy::Penalize);
        assert_eq!(scoring.availability_policy, AvailabilityPolicy::date_adjusted());
        assert_eq!(scoring.worker_count, 8);
        assert_eq!(config.matching.bench_data_dir, Some(PathBuf::from("data")));
        reset_env();
    }

    #[test]
    fn rejects_out_of_range_threshold() {
        let _env = lock_env();
        env::set_var("MATCH_SKILL_THRESHOLD", "140");
        let err = AppConfig::load().expect_err("threshold above 100 rejected");
        assert!(matches!(err, ConfigError::InvalidSkillThreshold(ref raw) if raw == "140"));
        reset_env();
    }

    #[test]
    fn rejects_zero_workers() {
        let _env = lock_env();
        env::set_var("MATCH_WORKERS", "0");
        let err = AppConfig::load().expect_err("zero workers rejected");
        assert!(err.to_string().contains("MATCH_WORKERS"));
        reset_env();
    }
}
