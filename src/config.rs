use std::fs;
use std::path::PathBuf;

use anyhow::Result;
use serde::{Deserialize, Serialize};

use crate::engine::unlock::UnlockPolicy;

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Config {
    #[serde(default = "default_theme")]
    pub theme: String,
    #[serde(default = "default_tts_endpoint")]
    pub tts_endpoint: String,
    #[serde(default = "default_speaking_rate")]
    pub speaking_rate: f64,
    #[serde(default = "default_pitch")]
    pub pitch: f64,
    #[serde(default = "default_voice_primary")]
    pub voice_primary: String,
    #[serde(default = "default_voice_secondary")]
    pub voice_secondary: String,
    #[serde(default = "default_unlock_policy")]
    pub unlock_policy: String,
}

fn default_theme() -> String {
    "terminal-default".to_string()
}
fn default_tts_endpoint() -> String {
    "http://localhost:3000/api/tts".to_string()
}
fn default_speaking_rate() -> f64 {
    0.85
}
fn default_pitch() -> f64 {
    0.0
}
fn default_voice_primary() -> String {
    "bn-IN-Wavenet-B".to_string()
}
fn default_voice_secondary() -> String {
    "bn-IN-Wavenet-A".to_string()
}
fn default_unlock_policy() -> String {
    UnlockPolicy::default().to_key().to_string()
}

impl Default for Config {
    fn default() -> Self {
        Self {
            theme: default_theme(),
            tts_endpoint: default_tts_endpoint(),
            speaking_rate: default_speaking_rate(),
            pitch: default_pitch(),
            voice_primary: default_voice_primary(),
            voice_secondary: default_voice_secondary(),
            unlock_policy: default_unlock_policy(),
        }
    }
}

impl Config {
    pub fn load() -> Result<Self> {
        let path = Self::config_path();
        if path.exists() {
            let content = fs::read_to_string(&path)?;
            let config: Config = toml::from_str(&content)?;
            Ok(config)
        } else {
            Ok(Config::default())
        }
    }

    #[allow(dead_code)]
    pub fn save(&self) -> Result<()> {
        let path = Self::config_path();
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        let content = toml::to_string_pretty(self)?;
        fs::write(&path, content)?;
        Ok(())
    }

    fn config_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("shekho")
            .join("config.toml")
    }

    /// The configured reachability predicate. Call `normalize_unlock_policy`
    /// after deserialization so this never sees a stale key.
    pub fn unlock_policy(&self) -> UnlockPolicy {
        UnlockPolicy::from_key(&self.unlock_policy).unwrap_or_default()
    }

    /// Reset an unrecognized policy key to the default. Handles configs
    /// written by older builds with since-renamed policies.
    pub fn normalize_unlock_policy(&mut self) {
        if UnlockPolicy::from_key(&self.unlock_policy).is_none() {
            self.unlock_policy = default_unlock_policy();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_config_gets_all_defaults() {
        let config: Config = toml::from_str("").unwrap();
        assert_eq!(config.theme, "terminal-default");
        assert_eq!(config.speaking_rate, 0.85);
        assert_eq!(config.voice_primary, "bn-IN-Wavenet-B");
        assert_eq!(config.unlock_policy(), UnlockPolicy::Stepwise);
    }

    #[test]
    fn old_config_with_partial_fields_keeps_loading() {
        let toml_str = r#"
theme = "gruvbox"
tts_endpoint = "http://127.0.0.1:8080/api/tts"
"#;
        let config: Config = toml::from_str(toml_str).unwrap();
        assert_eq!(config.theme, "gruvbox");
        assert_eq!(config.tts_endpoint, "http://127.0.0.1:8080/api/tts");
        // Missing fields fall back to defaults.
        assert_eq!(config.pitch, 0.0);
        assert_eq!(config.voice_secondary, "bn-IN-Wavenet-A");
    }

    #[test]
    fn config_round_trips_through_toml() {
        let config = Config::default();
        let serialized = toml::to_string_pretty(&config).unwrap();
        let deserialized: Config = toml::from_str(&serialized).unwrap();
        assert_eq!(config.theme, deserialized.theme);
        assert_eq!(config.tts_endpoint, deserialized.tts_endpoint);
        assert_eq!(config.unlock_policy, deserialized.unlock_policy);
    }

    #[test]
    fn normalize_resets_unknown_policy_key() {
        let mut config = Config::default();
        config.unlock_policy = "everything-at-once".to_string();
        config.normalize_unlock_policy();
        assert_eq!(config.unlock_policy(), UnlockPolicy::Stepwise);
    }

    #[test]
    fn normalize_keeps_valid_policy_key() {
        let mut config = Config::default();
        config.unlock_policy = "open".to_string();
        config.normalize_unlock_policy();
        assert_eq!(config.unlock_policy(), UnlockPolicy::Open);
    }
}
