//! Application-level configuration loading for session timing and eviction tuning.

use std::{env, fs, io::ErrorKind, path::PathBuf, time::Duration};

use serde::Deserialize;
use tracing::{info, warn};

/// Default location on disk where the server looks for the JSON configuration.
const DEFAULT_CONFIG_PATH: &str = "config/app.json";
/// Environment variable that overrides [`DEFAULT_CONFIG_PATH`].
const CONFIG_PATH_ENV: &str = "QUIZROOM_BACK_CONFIG_PATH";

/// Lead time between the `quiz_starting` broadcast and the quiz payload,
/// unless every player acknowledges readiness first.
const DEFAULT_START_COUNTDOWN_MS: u64 = 4_000;
/// How long an empty or finished room survives before the sweeper evicts it.
const DEFAULT_ROOM_IDLE_TIMEOUT_SECS: u64 = 300;
/// Interval between two eviction sweeps.
const DEFAULT_SWEEP_INTERVAL_SECS: u64 = 60;
/// Capacity of each per-room SSE broadcast channel.
const DEFAULT_SSE_CAPACITY: usize = 16;

#[derive(Debug, Clone)]
/// Immutable runtime configuration shared across the application.
pub struct AppConfig {
    start_countdown: Duration,
    room_idle_timeout: Duration,
    sweep_interval: Duration,
    sse_capacity: usize,
}

impl AppConfig {
    /// Load the application configuration from disk, falling back to baked-in defaults.
    pub fn load() -> Self {
        let path = resolve_config_path();
        match fs::read_to_string(&path) {
            Ok(contents) => match serde_json::from_str::<RawConfig>(&contents) {
                Ok(raw) => {
                    let app_config: Self = raw.into();
                    info!(path = %path.display(), "loaded configuration from file");
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

    /// Maximum time a room waits in the starting countdown before the quiz
    /// payload is broadcast regardless of pending ready acknowledgments.
    pub fn start_countdown(&self) -> Duration {
        self.start_countdown
    }

    /// Idle time after which an empty or finished room becomes evictable.
    pub fn room_idle_timeout(&self) -> Duration {
        self.room_idle_timeout
    }

    /// Interval between two room eviction sweeps.
    pub fn sweep_interval(&self) -> Duration {
        self.sweep_interval
    }

    /// Capacity of the per-room SSE broadcast channels.
    pub fn sse_capacity(&self) -> usize {
        self.sse_capacity
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            start_countdown: Duration::from_millis(DEFAULT_START_COUNTDOWN_MS),
            room_idle_timeout: Duration::from_secs(DEFAULT_ROOM_IDLE_TIMEOUT_SECS),
            sweep_interval: Duration::from_secs(DEFAULT_SWEEP_INTERVAL_SECS),
            sse_capacity: DEFAULT_SSE_CAPACITY,
        }
    }
}

#[derive(Debug, Deserialize)]
/// JSON representation of the configuration file located at [`DEFAULT_CONFIG_PATH`].
struct RawConfig {
    start_countdown_ms: Option<u64>,
    room_idle_timeout_secs: Option<u64>,
    sweep_interval_secs: Option<u64>,
    sse_capacity: Option<usize>,
}

impl From<RawConfig> for AppConfig {
    fn from(value: RawConfig) -> Self {
        let defaults = Self::default();
        Self {
            start_countdown: value
                .start_countdown_ms
                .map(Duration::from_millis)
                .unwrap_or(defaults.start_countdown),
            room_idle_timeout: value
                .room_idle_timeout_secs
                .map(Duration::from_secs)
                .unwrap_or(defaults.room_idle_timeout),
            sweep_interval: value
                .sweep_interval_secs
                .map(Duration::from_secs)
                .unwrap_or(defaults.sweep_interval),
            sse_capacity: value.sse_capacity.unwrap_or(defaults.sse_capacity),
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
