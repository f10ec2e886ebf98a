use serde::{Deserialize, Serialize};

use crate::channel::DuplicatePolicy;

/// Root configuration container.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub channel: ChannelConfig,
    #[serde(default)]
    pub tasks: TaskConfig,
    #[serde(default)]
    pub navigation: NavigationConfig,
    #[serde(default)]
    pub deep_link: DeepLinkConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Action channel settings.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ChannelConfig {
    /// What happens when a second observer attaches to a channel.
    #[serde(default)]
    pub duplicate_observer: DuplicateObserverSetting,
}

/// Config-file spelling of [`DuplicatePolicy`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DuplicateObserverSetting {
    /// Panic in debug builds, report in release builds.
    #[default]
    Auto,
    Panic,
    Report,
}

impl DuplicateObserverSetting {
    pub fn policy(self) -> DuplicatePolicy {
        match self {
            DuplicateObserverSetting::Auto => DuplicatePolicy::default(),
            DuplicateObserverSetting::Panic => DuplicatePolicy::Panic,
            DuplicateObserverSetting::Report => DuplicatePolicy::Report,
        }
    }
}

/// Per-coordinator task registry settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TaskConfig {
    /// Abort in-flight action handlers when their coordinator is torn down.
    #[serde(default = "default_cancel_on_teardown")]
    pub cancel_on_teardown: bool,
}

/// Navigation stack settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NavigationConfig {
    /// Number of applied target states kept for inspection (default: 32).
    #[serde(default = "default_history_limit")]
    pub history_limit: usize,
}

/// Deep link dispatch settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DeepLinkConfig {
    /// URL scheme accepted by the dispatcher (e.g., "waypoint").
    #[serde(default = "default_scheme")]
    pub scheme: String,
}

/// Logging settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// `EnvFilter` directive used when `RUST_LOG` is not set.
    #[serde(default = "default_log_filter")]
    pub filter: String,
}

fn default_cancel_on_teardown() -> bool {
    true
}

fn default_history_limit() -> usize {
    32
}

fn default_scheme() -> String {
    "waypoint".to_string()
}

fn default_log_filter() -> String {
    "info".to_string()
}

impl Default for TaskConfig {
    fn default() -> Self {
        Self {
            cancel_on_teardown: default_cancel_on_teardown(),
        }
    }
}

impl Default for NavigationConfig {
    fn default() -> Self {
        Self {
            history_limit: default_history_limit(),
        }
    }
}

impl Default for DeepLinkConfig {
    fn default() -> Self {
        Self {
            scheme: default_scheme(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            filter: default_log_filter(),
        }
    }
}
