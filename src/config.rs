//! Application-level configuration loading: generation retry policy and scoring rules.

use std::{env, fs, io::ErrorKind, path::PathBuf, time::Duration};

use serde::Deserialize;
use tracing::{info, warn};

use crate::state::session::DEFAULT_POINTS_PER_CORRECT;

/// Default location on disk where the server looks for the JSON configuration.
const DEFAULT_CONFIG_PATH: &str = "config/app.json";
/// Environment variable that overrides [`DEFAULT_CONFIG_PATH`].
const CONFIG_PATH_ENV: &str = "QUIZ_LIVE_BACK_CONFIG_PATH";

const DEFAULT_MAX_ATTEMPTS: u32 = 3;
const DEFAULT_BACKOFF_MS: u64 = 2_000;
const DEFAULT_ATTEMPT_TIMEOUT_MS: u64 = 60_000;
const DEFAULT_LEADERBOARD_LIMIT: usize = 10;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
/// Immutable runtime configuration shared across the application.
pub struct AppConfig {
    /// Retry policy of the generation pipeline.
    pub generation: GenerationConfig,
    /// Points and leaderboard size.
    pub scoring: ScoringConfig,
}

#[derive(Debug, Clone, PartialEq, Eq)]
/// Bounded-retry settings for quiz generation.
pub struct GenerationConfig {
    /// Hard ceiling on calls to the generative backend per load request.
    pub max_attempts: u32,
    /// Constant wait between two failed attempts.
    pub backoff: Duration,
    /// Per-attempt limit; `None` waits for the backend indefinitely.
    pub attempt_timeout: Option<Duration>,
}

impl Default for GenerationConfig {
    fn default() -> Self {
        Self {
            max_attempts: DEFAULT_MAX_ATTEMPTS,
            backoff: Duration::from_millis(DEFAULT_BACKOFF_MS),
            attempt_timeout: Some(Duration::from_millis(DEFAULT_ATTEMPT_TIMEOUT_MS)),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
/// Points and ranking settings.
pub struct ScoringConfig {
    /// Points added for each correct answer.
    pub points_per_correct: u32,
    /// Number of entries in broadcast leaderboards.
    pub leaderboard_limit: usize,
}

impl Default for ScoringConfig {
    fn default() -> Self {
        Self {
            points_per_correct: DEFAULT_POINTS_PER_CORRECT,
            leaderboard_limit: DEFAULT_LEADERBOARD_LIMIT,
        }
    }
}

impl AppConfig {
    /// Load the application configuration from disk, falling back to built-in defaults.
    pub fn load() -> Self {
        let path = resolve_config_path();
        match fs::read_to_string(&path) {
            Ok(contents) => match Self::from_json(&contents) {
                Ok(app_config) => {
                    info!(
                        path = %path.display(),
                        max_attempts = app_config.generation.max_attempts,
                        points_per_correct = app_config.scoring.points_per_correct,
                        "loaded configuration"
                    );
                    app_config
                }
                Err(err) => {
                    warn!(
                        path = %path.display(),
                        error = %err,
                        "failed to parse config; falling back to defaults"
                    );
                    Self::default()
                }
            },
            Err(err) if err.kind() == ErrorKind::NotFound => {
                info!(
                    path = %path.display(),
                    "config file not found; using built-in defaults"
                );
                Self::default()
            }
            Err(err) => {
                warn!(
                    path = %path.display(),
                    error = %err,
                    "failed to read config; falling back to defaults"
                );
                Self::default()
            }
        }
    }

    /// Parse a JSON document; absent keys keep their default value.
    pub fn from_json(contents: &str) -> serde_json::Result<Self> {
        serde_json::from_str::<RawConfig>(contents).map(Into::into)
    }
}

#[derive(Debug, Default, Deserialize)]
/// JSON representation of the configuration file located at [`DEFAULT_CONFIG_PATH`].
struct RawConfig {
    #[serde(default)]
    generation: RawGeneration,
    #[serde(default)]
    scoring: RawScoring,
}

#[derive(Debug, Default, Deserialize)]
struct RawGeneration {
    max_attempts: Option<u32>,
    backoff_ms: Option<u64>,
    /// `0` disables the per-attempt timeout.
    attempt_timeout_ms: Option<u64>,
}

#[derive(Debug, Default, Deserialize)]
struct RawScoring {
    points_per_correct: Option<u32>,
    leaderboard_limit: Option<usize>,
}

impl From<RawConfig> for AppConfig {
    fn from(value: RawConfig) -> Self {
        Self {
            generation: value.generation.into(),
            scoring: value.scoring.into(),
        }
    }
}

impl From<RawGeneration> for GenerationConfig {
    fn from(value: RawGeneration) -> Self {
        let defaults = Self::default();
        let attempt_timeout = match value.attempt_timeout_ms {
            Some(0) => None,
            Some(ms) => Some(Duration::from_millis(ms)),
            None => defaults.attempt_timeout,
        };
        Self {
            max_attempts: value
                .max_attempts
                .filter(|attempts| *attempts > 0)
                .unwrap_or(defaults.max_attempts),
            backoff: value
                .backoff_ms
                .map(Duration::from_millis)
                .unwrap_or(defaults.backoff),
            attempt_timeout,
        }
    }
}

impl From<RawScoring> for ScoringConfig {
    fn from(value: RawScoring) -> Self {
        let defaults = Self::default();
        Self {
            points_per_correct: value
                .points_per_correct
                .unwrap_or(defaults.points_per_correct),
            leaderboard_limit: value
                .leaderboard_limit
                .unwrap_or(defaults.leaderboard_limit),
        }
    }
}

/// Resolve the configuration path taking the environment override into account.
fn resolve_config_path() -> PathBuf {
    env::var_os(CONFIG_PATH_ENV)
        .map(PathBuf::from)
        .filter(|path| !path.as_os_str().is_empty())
        .unwrap_or_else(|| PathBuf::from(DEFAULT_CONFIG_PATH))
}
