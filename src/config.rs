use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Config {
    /// Base address of the generation backend.
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Which questionnaire flow to run: "meditation", "visualization" or
    /// "mood_check".
    #[serde(default = "default_flow")]
    pub flow: String,

    /// Generation can take a couple of minutes; the backend does the heavy
    /// lifting.
    #[serde(default = "default_request_timeout")]
    pub request_timeout_secs: u64,

    pub meditation: Option<MeditationConfig>,
}

/// Fixed strings sent alongside the quiz answers on the meditation flow.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct MeditationConfig {
    #[serde(default = "default_user_input")]
    pub user_input: String,

    #[serde(default = "default_voice_pref")]
    pub voice_pref: String,

    #[serde(default = "default_music_pref")]
    pub music_pref: String,
}

impl Default for MeditationConfig {
    fn default() -> Self {
        Self {
            user_input: default_user_input(),
            voice_pref: default_voice_pref(),
            music_pref: default_music_pref(),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            flow: default_flow(),
            request_timeout_secs: default_request_timeout(),
            meditation: None,
        }
    }
}

fn default_base_url() -> String {
    "http://127.0.0.1:8000".to_string()
}

fn default_flow() -> String {
    "visualization".to_string()
}

fn default_request_timeout() -> u64 {
    120
}

fn default_user_input() -> String {
    "Generate a meditation based on my answers.".to_string()
}

fn default_voice_pref() -> String {
    "alloy".to_string()
}

fn default_music_pref() -> String {
    "Calm".to_string()
}

impl Config {
    /// Loads `config.yml` from the working directory. Nothing in it is
    /// mandatory, so a missing file just means all defaults.
    pub fn load() -> Result<Self> {
        let path = Path::new("config.yml");
        if !path.exists() {
            return Ok(Config::default());
        }

        let content = fs::read_to_string(path).context("Failed to read config.yml")?;
        let config: Config =
            serde_yaml_ng::from_str(&content).context("Failed to parse config.yml")?;
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_document_yields_defaults() {
        let config: Config = serde_yaml_ng::from_str("{}").unwrap();

        assert_eq!(config.base_url, "http://127.0.0.1:8000");
        assert_eq!(config.flow, "visualization");
        assert_eq!(config.request_timeout_secs, 120);
        assert!(config.meditation.is_none());
    }

    #[test]
    fn overrides_and_partial_sections_parse() {
        let yaml = r#"
base_url: "http://10.0.0.5:9000"
flow: meditation
meditation:
  voice_pref: nova
"#;
        let config: Config = serde_yaml_ng::from_str(yaml).unwrap();

        assert_eq!(config.base_url, "http://10.0.0.5:9000");
        assert_eq!(config.flow, "meditation");
        let meditation = config.meditation.unwrap();
        assert_eq!(meditation.voice_pref, "nova");
        // Unset fields inside the section still fall back to their defaults.
        assert_eq!(
            meditation.user_input,
            "Generate a meditation based on my answers."
        );
        assert_eq!(meditation.music_pref, "Calm");
    }
}
