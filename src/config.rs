//! Application-level configuration loading for gameplay and housekeeping settings.

use std::{env, fs, io::ErrorKind, path::PathBuf, time::Duration};

use serde::Deserialize;
use tracing::{info, warn};

/// Default location on disk where the server looks for the JSON configuration.
const DEFAULT_CONFIG_PATH: &str = "config/app.json";
/// Environment variable that overrides [`DEFAULT_CONFIG_PATH`].
const CONFIG_PATH_ENV: &str = "CAMPFIRE_BACK_CONFIG_PATH";

/// Default roster capacity for new game sessions.
const DEFAULT_MAX_PLAYERS: usize = 4;
/// Sessions older than this are removed by the expiry sweeper.
const DEFAULT_GAME_TTL: Duration = Duration::from_secs(60 * 60 * 24);
/// How often the expiry sweeper runs.
const DEFAULT_SWEEP_INTERVAL: Duration = Duration::from_secs(60);

#[derive(Debug, Clone)]
/// Immutable runtime configuration shared across the application.
pub struct AppConfig {
    max_players: usize,
    game_ttl: Duration,
    sweep_interval: Duration,
    stories_path: Option<PathBuf>,
}

impl AppConfig {
    /// Load the application configuration from disk, falling back to baked-in defaults.
    pub fn load() -> Self {
        let path = resolve_config_path();
        match fs::read_to_string(&path) {
            Ok(contents) => match serde_json::from_str::<RawConfig>(&contents) {
                Ok(raw) => {
                    let config: Self = raw.into();
                    info!(
                        path = %path.display(),
                        max_players = config.max_players,
                        "loaded configuration"
                    );
                    config
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

    /// Roster capacity for new game sessions.
    pub fn max_players(&self) -> usize {
        self.max_players
    }

    /// Time-to-live after which a session is swept.
    pub fn game_ttl(&self) -> Duration {
        self.game_ttl
    }

    /// Interval between expiry sweeps.
    pub fn sweep_interval(&self) -> Duration {
        self.sweep_interval
    }

    /// Optional path to a story definition file.
    pub fn stories_path(&self) -> Option<&PathBuf> {
        self.stories_path.as_ref()
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            max_players: DEFAULT_MAX_PLAYERS,
            game_ttl: DEFAULT_GAME_TTL,
            sweep_interval: DEFAULT_SWEEP_INTERVAL,
            stories_path: None,
        }
    }
}

#[derive(Debug, Deserialize)]
/// JSON representation of the configuration file located at [`DEFAULT_CONFIG_PATH`].
struct RawConfig {
    max_players: Option<usize>,
    game_ttl_secs: Option<u64>,
    sweep_interval_secs: Option<u64>,
    stories_path: Option<PathBuf>,
}

impl From<RawConfig> for AppConfig {
    fn from(value: RawConfig) -> Self {
        let defaults = AppConfig::default();
        Self {
            // A zero-capacity roster would make every game unjoinable.
            max_players: value
                .max_players
                .filter(|&count| count > 0)
                .unwrap_or(defaults.max_players),
            game_ttl: value
                .game_ttl_secs
                .map(Duration::from_secs)
                .unwrap_or(defaults.game_ttl),
            sweep_interval: value
                .sweep_interval_secs
                .filter(|&secs| secs > 0)
                .map(Duration::from_secs)
                .unwrap_or(defaults.sweep_interval),
            stories_path: value.stories_path,
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

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn raw_config_fills_missing_fields_with_defaults() {
        let raw: RawConfig = serde_json::from_str("{}").unwrap();
        let config: AppConfig = raw.into();
        assert_eq!(config.max_players(), DEFAULT_MAX_PLAYERS);
        assert_eq!(config.game_ttl(), DEFAULT_GAME_TTL);
        assert_eq!(config.sweep_interval(), DEFAULT_SWEEP_INTERVAL);
        assert!(config.stories_path().is_none());
    }

    #[test]
    fn raw_config_rejects_zero_capacity() {
        let raw: RawConfig =
            serde_json::from_str(r#"{"max_players": 0, "game_ttl_secs": 3600}"#).unwrap();
        let config: AppConfig = raw.into();
        assert_eq!(config.max_players(), DEFAULT_MAX_PLAYERS);
        assert_eq!(config.game_ttl(), Duration::from_secs(3600));
    }
}
