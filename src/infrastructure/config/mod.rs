//! Configuration management

use serde::{Deserialize, Deserializer, Serialize};
use std::path::PathBuf;
use crate::application::errors::ConfigError;
use crate::domain::entities::RoomId;

/// Listener configuration
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(rename_all = "kebab-case")]
pub struct Config {
    #[serde(default)]
    pub listener: ListenerConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "kebab-case")]
pub struct ListenerConfig {
    /// Room the listener serves; every other room is reported as mismatched
    #[serde(default, deserialize_with = "room_id_from_config")]
    pub room_id: Option<RoomId>,
    #[serde(default = "default_queue_capacity")]
    pub queue_capacity: usize,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "kebab-case")]
pub struct LoggingConfig {
    #[serde(default = "default_level")]
    pub level: String,
}

// Quoted numbers read the same as bare ones, matching CHAT_ID and --room-id.
fn room_id_from_config<'de, D>(deserializer: D) -> Result<Option<RoomId>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<RoomId>::deserialize(deserializer)?.map(|room| match room {
        RoomId::Str(s) => RoomId::from_text(&s),
        int => int,
    }))
}

fn default_queue_capacity() -> usize {
    64
}

fn default_level() -> String {
    "info".to_string()
}

impl Default for ListenerConfig {
    fn default() -> Self {
        Self {
            room_id: None,
            queue_capacity: default_queue_capacity(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self { level: default_level() }
    }
}

impl Config {
    pub fn load(path: impl Into<PathBuf>) -> Result<Self, ConfigError> {
        let path = path.into();
        let content = std::fs::read_to_string(&path)
            .map_err(|e| ConfigError::Parse(format!("Failed to read config: {}", e)))?;

        Self::from_yaml(&content)
    }

    pub fn from_yaml(content: &str) -> Result<Self, ConfigError> {
        serde_yaml::from_str(content)
            .map_err(|e| ConfigError::Parse(format!("Failed to parse config: {}", e)))
    }

    pub fn save(&self, path: impl Into<PathBuf>) -> Result<(), ConfigError> {
        let path = path.into();
        let content = serde_yaml::to_string(self)
            .map_err(|e| ConfigError::Parse(format!("Failed to serialize config: {}", e)))?;
        std::fs::write(&path, content)
            .map_err(|e| ConfigError::Parse(format!("Failed to write config: {}", e)))
    }

    pub fn load_env() -> Self {
        Config::default().with_env()
    }

    /// Apply environment overrides on top of an existing config
    pub fn with_env(mut self) -> Self {
        if let Ok(room) = std::env::var("CHAT_ID") {
            self.listener.room_id = Some(RoomId::from_text(&room));
        }

        if let Ok(level) = std::env::var("LOG_LEVEL") {
            self.logging.level = level;
        }

        self
    }

    /// The configured room. Missing or blank ids are a startup error.
    pub fn expected_room(&self) -> Result<RoomId, ConfigError> {
        match &self.listener.room_id {
            None => Err(ConfigError::MissingField("listener.room-id".to_string())),
            Some(RoomId::Str(s)) if s.trim().is_empty() => {
                Err(ConfigError::InvalidValue("listener.room-id is blank".to_string()))
            }
            Some(room) => Ok(room.clone()),
        }
    }
}
