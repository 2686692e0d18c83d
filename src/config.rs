use crate::error::AppError;
use std::env;
use std::path::PathBuf;
use std::str::FromStr;

pub const DEFAULT_OUTPUT_DIR: &str = "tournament_results";
pub const DEFAULT_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/91.0.4472.124 Safari/537.36";
pub const DEFAULT_TIMEOUT_SECS: u64 = 10;
pub const DEFAULT_REQUESTS_PER_SECOND: u32 = 2;

#[derive(Debug, Clone)]
pub struct Config {
    pub output_dir: PathBuf,
    pub user_agent: String,
    pub timeout_secs: u64,
    pub requests_per_second: u32,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            output_dir: PathBuf::from(DEFAULT_OUTPUT_DIR),
            user_agent: DEFAULT_USER_AGENT.to_string(),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
            requests_per_second: DEFAULT_REQUESTS_PER_SECOND,
        }
    }
}

impl Config {
    pub fn from_env() -> Result<Self, AppError> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Builds a config from any key lookup; `from_env` passes the process environment.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, AppError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Config::default();

        let output_dir = lookup("FAB_OUTPUT_DIR")
            .filter(|v| !v.trim().is_empty())
            .map(PathBuf::from)
            .unwrap_or(defaults.output_dir);

        let user_agent = lookup("FAB_USER_AGENT")
            .filter(|v| !v.trim().is_empty())
            .unwrap_or(defaults.user_agent);

        let timeout_secs = parse_var(&lookup, "FAB_HTTP_TIMEOUT_SECS")?
            .unwrap_or(defaults.timeout_secs);

        let requests_per_second = parse_var(&lookup, "FAB_REQUESTS_PER_SECOND")?
            .unwrap_or(defaults.requests_per_second);
        if requests_per_second == 0 {
            return Err(AppError::ConfigError(
                "FAB_REQUESTS_PER_SECOND must be at least 1".to_string(),
            ));
        }

        Ok(Config {
            output_dir,
            user_agent,
            timeout_secs,
            requests_per_second,
        })
    }
}

fn parse_var<F, T>(lookup: &F, key: &str) -> Result<Option<T>, AppError>
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
{
    match lookup(key) {
        None => Ok(None),
        Some(raw) => raw.trim().parse().map(Some).map_err(|_| {
            AppError::ConfigError(format!("{} must be a positive number, got '{}'", key, raw))
        }),
    }
}
