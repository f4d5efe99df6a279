//! Configuration management for the bridge
//!
//! This module provides configuration loading from JSON files so the log tag,
//! log level and managed event namespace can be changed without rebuilding
//! the native library. Missing or malformed files fall back to defaults.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

use crate::events::EventKind;

/// Complete bridge configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct BridgeConfig {
    pub logging: LoggingConfig,
    pub events: EventConfig,
}

/// Logging parameters
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Tag under which entries appear in the platform log
    pub tag: String,
    /// Minimum level, in `tracing_subscriber::EnvFilter` syntax
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            tag: "TS3 LIB".to_string(),
            level: "debug".to_string(),
        }
    }
}

/// Where the managed event classes live
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EventConfig {
    /// Slash-separated package of the event classes
    pub class_prefix: String,
    /// No-argument instance method that posts a populated event
    pub dispatch_method: String,
}

impl Default for EventConfig {
    fn default() -> Self {
        Self {
            class_prefix: "com/teamspeak/ts3sdkclient/ts3sdk/events".to_string(),
            dispatch_method: "Post".to_string(),
        }
    }
}

impl EventConfig {
    /// JNI class path of the event class for `kind`.
    pub fn class_path(&self, kind: EventKind) -> String {
        format!(
            "{}/{}",
            self.class_prefix.trim_end_matches('/'),
            kind.class_name()
        )
    }
}

impl BridgeConfig {
    /// Load configuration from JSON file
    ///
    /// # Arguments
    /// * `path` - Path to JSON config file
    ///
    /// # Returns
    /// The parsed configuration, or the defaults if the file is missing or
    /// its JSON is invalid. Absent keys take their default values.
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Self {
        match fs::read_to_string(&path) {
            Ok(contents) => match serde_json::from_str(&contents) {
                Ok(config) => {
                    log::info!("[Config] Loaded configuration from {:?}", path.as_ref());
                    config
                }
                Err(err) => {
                    log::warn!(
                        "[Config] Failed to parse JSON from {:?}: {}. Using defaults.",
                        path.as_ref(),
                        err
                    );
                    Self::default()
                }
            },
            Err(err) => {
                log::warn!(
                    "[Config] Failed to read config file {:?}: {}. Using defaults.",
                    path.as_ref(),
                    err
                );
                Self::default()
            }
        }
    }

    /// Configuration on Android
    ///
    /// The library is loaded before the application can tell it where its
    /// files are, so the compiled-in defaults apply.
    #[cfg(target_os = "android")]
    pub fn load_android() -> Self {
        Self::default()
    }

    /// Load configuration for non-Android platforms
    #[cfg(not(target_os = "android"))]
    pub fn load() -> Self {
        Self::load_from_file("assets/bridge_config.json")
    }

    /// JNI class path of the event class for `kind`.
    pub fn class_path(&self, kind: EventKind) -> String {
        self.events.class_path(kind)
    }
}
