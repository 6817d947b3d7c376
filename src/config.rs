use std::net::SocketAddr;
use std::path::PathBuf;
use std::time::Duration;

/// Application-level constants
pub const APP_NAME: &str = "HospitalDashboard";
pub const APP_VERSION: &str = env!("CARGO_PKG_VERSION");

pub const ENV_SOURCE: &str = "HOSPITAL_DASHBOARD_SOURCE";
pub const ENV_DB: &str = "HOSPITAL_DASHBOARD_DB";
pub const ENV_DATA_DIR: &str = "HOSPITAL_DASHBOARD_DATA_DIR";
pub const ENV_BIND: &str = "HOSPITAL_DASHBOARD_BIND";
pub const ENV_QUERY_TIMEOUT: &str = "HOSPITAL_DASHBOARD_QUERY_TIMEOUT_SECS";
pub const ENV_STATIC_DIR: &str = "HOSPITAL_DASHBOARD_STATIC_DIR";

pub const DEFAULT_BIND: &str = "127.0.0.1:5000";
pub const DEFAULT_QUERY_TIMEOUT_SECS: u64 = 10;

/// Log filter used when `RUST_LOG` is unset.
pub fn default_log_filter() -> &'static str {
    "info,hospital_dashboard_lib=debug"
}

/// Get the application data directory
/// ~/HospitalDashboard/ on all platforms, falling back to the working
/// directory when no home directory is known.
pub fn app_data_dir() -> PathBuf {
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(APP_NAME)
}

/// Default SQLite database path
pub fn default_db_path() -> PathBuf {
    app_data_dir().join("hospital.db")
}

/// Default directory for `<table>.csv` files
pub fn default_data_dir() -> PathBuf {
    app_data_dir().join("data")
}

/// Which backend serves the tables.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SourceConfig {
    Sqlite { path: PathBuf },
    CsvDir { dir: PathBuf },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DashboardConfig {
    pub source: SourceConfig,
    pub bind: SocketAddr,
    pub query_timeout: Duration,
    /// Optional directory of static frontend assets served at `/`.
    pub static_dir: Option<PathBuf>,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            source: SourceConfig::Sqlite {
                path: default_db_path(),
            },
            bind: default_bind(),
            query_timeout: Duration::from_secs(DEFAULT_QUERY_TIMEOUT_SECS),
            static_dir: None,
        }
    }
}

fn default_bind() -> SocketAddr {
    SocketAddr::from(([127, 0, 0, 1], 5000))
}

impl DashboardConfig {
    /// Read configuration from the process environment.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from an arbitrary key lookup. Invalid values fall back to the
    /// default with a warning.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());

        let source = match get(ENV_SOURCE).as_deref() {
            None | Some("sqlite") => SourceConfig::Sqlite {
                path: get(ENV_DB).map(PathBuf::from).unwrap_or_else(default_db_path),
            },
            Some("csv") => SourceConfig::CsvDir {
                dir: get(ENV_DATA_DIR)
                    .map(PathBuf::from)
                    .unwrap_or_else(default_data_dir),
            },
            Some(other) => {
                tracing::warn!(key = ENV_SOURCE, value = other, "Unknown source kind, using sqlite");
                SourceConfig::Sqlite {
                    path: get(ENV_DB).map(PathBuf::from).unwrap_or_else(default_db_path),
                }
            }
        };

        let bind = match get(ENV_BIND) {
            None => default_bind(),
            Some(raw) => raw.parse::<SocketAddr>().unwrap_or_else(|e| {
                tracing::warn!(key = ENV_BIND, value = %raw, error = %e, "Invalid bind address, using default");
                default_bind()
            }),
        };

        let timeout_secs = match get(ENV_QUERY_TIMEOUT) {
            None => DEFAULT_QUERY_TIMEOUT_SECS,
            Some(raw) => match raw.parse::<u64>() {
                Ok(secs) if secs > 0 => secs,
                _ => {
                    tracing::warn!(key = ENV_QUERY_TIMEOUT, value = %raw, "Invalid query timeout, using default");
                    DEFAULT_QUERY_TIMEOUT_SECS
                }
            },
        };

        Self {
            source,
            bind,
            query_timeout: Duration::from_secs(timeout_secs),
            static_dir: get(ENV_STATIC_DIR).map(PathBuf::from),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config(pairs: &[(&str, &str)]) -> DashboardConfig {
        let env: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        DashboardConfig::from_lookup(|key| env.get(key).cloned())
    }

    #[test]
    fn app_data_dir_under_home() {
        let dir = app_data_dir();
        if let Some(home) = dirs::home_dir() {
            assert!(dir.starts_with(home));
        }
        assert!(dir.ends_with("HospitalDashboard"));
    }

    #[test]
    fn empty_environment_gives_defaults() {
        let cfg = config(&[]);
        assert_eq!(cfg, DashboardConfig::default());
        assert_eq!(cfg.bind.to_string(), DEFAULT_BIND);
        assert_eq!(cfg.query_timeout, Duration::from_secs(10));
    }

    #[test]
    fn csv_source_uses_data_dir() {
        let cfg = config(&[(ENV_SOURCE, "csv"), (ENV_DATA_DIR, "/srv/hospital")]);
        assert_eq!(
            cfg.source,
            SourceConfig::CsvDir {
                dir: PathBuf::from("/srv/hospital")
            }
        );
    }

    #[test]
    fn invalid_values_fall_back() {
        let cfg = config(&[
            (ENV_SOURCE, "oracle"),
            (ENV_BIND, "not-an-address"),
            (ENV_QUERY_TIMEOUT, "0"),
        ]);
        assert!(matches!(cfg.source, SourceConfig::Sqlite { .. }));
        assert_eq!(cfg.bind, default_bind());
        assert_eq!(cfg.query_timeout.as_secs(), DEFAULT_QUERY_TIMEOUT_SECS);
    }

    #[test]
    fn explicit_values_are_used() {
        let cfg = config(&[
            (ENV_DB, "/tmp/h.db"),
            (ENV_BIND, "0.0.0.0:8080"),
            (ENV_QUERY_TIMEOUT, "3"),
            (ENV_STATIC_DIR, "./web"),
        ]);
        assert_eq!(
            cfg.source,
            SourceConfig::Sqlite {
                path: PathBuf::from("/tmp/h.db")
            }
        );
        assert_eq!(cfg.bind.port(), 8080);
        assert_eq!(cfg.query_timeout, Duration::from_secs(3));
        assert_eq!(cfg.static_dir, Some(PathBuf::from("./web")));
    }

    #[test]
    fn app_version_matches_cargo() {
        assert_eq!(APP_VERSION, env!("CARGO_PKG_VERSION"));
    }
}
