use crate::config::{Config, MeditationConfig};
use crate::wizard::AnswerRecord;
use anyhow::{anyhow, Context, Result};
use async_trait::async_trait;
use log::{info, warn};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use thiserror::Error;
use url::Url;

/// Narration plus the audio resources the backend synthesized for it. The
/// URLs are handed to the user as-is; playback is not this client's concern.
#[derive(Debug, Clone, PartialEq)]
pub struct GenerationResult {
    pub text: String,
    pub voice_url: Option<String>,
    pub music_url: Option<String>,
}

#[derive(Debug, Error)]
pub enum GenerationError {
    #[error("could not reach the generation service: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("generation service returned {status}: {detail}")]
    Http { status: u16, detail: String },

    #[error("generation service response is missing '{field}'")]
    MalformedResponse { field: &'static str },
}

#[async_trait]
pub trait GenerationClient: Send + Sync + std::fmt::Debug {
    async fn generate(&self, answers: &AnswerRecord) -> Result<GenerationResult, GenerationError>;
}

pub fn create_generation_client(config: &Config) -> Result<Box<dyn GenerationClient>> {
    let base = Url::parse(&config.base_url).context("Invalid base_url in config")?;
    let http = reqwest::Client::builder()
        .timeout(Duration::from_secs(config.request_timeout_secs))
        .build()
        .context("Failed to build HTTP client")?;

    match config.flow.as_str() {
        "meditation" => Ok(Box::new(MeditationClient {
            endpoint: base.join("meditate").context("Invalid base_url in config")?,
            http,
            prefs: config.meditation.clone().unwrap_or_default(),
        })),
        "visualization" => Ok(Box::new(VisualizationClient {
            endpoint: base.join("visualize").context("Invalid base_url in config")?,
            http,
        })),
        "mood_check" => Ok(Box::new(MoodCheckClient {
            endpoint: base
                .join("generate-visualization")
                .context("Invalid base_url in config")?,
            http,
        })),
        _ => Err(anyhow!("Unknown flow: {}", config.flow)),
    }
}

// --- Meditation (/meditate) ---

#[derive(Debug)]
struct MeditationClient {
    endpoint: Url,
    http: reqwest::Client,
    prefs: MeditationConfig,
}

#[derive(Serialize)]
struct MeditateRequest {
    quiz_answers: Vec<String>,
    user_input: String,
    voice_pref: String,
    music_pref: String,
}

#[derive(Deserialize)]
struct MeditateResponse {
    meditation_text: Option<String>,
    voice_output: Option<String>,
    music_output: Option<String>,
}

#[async_trait]
impl GenerationClient for MeditationClient {
    async fn generate(&self, answers: &AnswerRecord) -> Result<GenerationResult, GenerationError> {
        let request_body = MeditateRequest {
            quiz_answers: answers.values().map(|v| v.to_string()).collect(),
            user_input: self.prefs.user_input.clone(),
            voice_pref: self.prefs.voice_pref.clone(),
            music_pref: self.prefs.music_pref.clone(),
        };

        info!(
            "POST {} ({} quiz answers)",
            self.endpoint,
            request_body.quiz_answers.len()
        );
        let resp = self
            .http
            .post(self.endpoint.clone())
            .json(&request_body)
            .send()
            .await?;

        let status = resp.status();
        if !status.is_success() {
            let detail = resp.text().await.unwrap_or_default();
            warn!("meditate request failed with status {}", status);
            return Err(GenerationError::Http {
                status: status.as_u16(),
                detail: if detail.is_empty() {
                    "no error detail".to_string()
                } else {
                    detail
                },
            });
        }

        let body = resp.text().await?;
        let payload: MeditateResponse = serde_json::from_str(&body).map_err(|_| {
            GenerationError::MalformedResponse {
                field: "meditation_text",
            }
        })?;
        // A success status without the narration text still counts as failure.
        let text = payload
            .meditation_text
            .ok_or(GenerationError::MalformedResponse {
                field: "meditation_text",
            })?;

        Ok(GenerationResult {
            text,
            voice_url: payload.voice_output,
            music_url: payload.music_output,
        })
    }
}

// --- Visualization (/visualize) ---

#[derive(Debug)]
struct VisualizationClient {
    endpoint: Url,
    http: reqwest::Client,
}

#[derive(Deserialize)]
struct VisualizeResponse {
    visualization_text: Option<String>,
    voice_output: Option<String>,
    music_output: Option<String>,
}

#[derive(Deserialize)]
struct ErrorBody {
    detail: String,
}

#[async_trait]
impl GenerationClient for VisualizationClient {
    async fn generate(&self, answers: &AnswerRecord) -> Result<GenerationResult, GenerationError> {
        // This endpoint takes the answers verbatim as a flat object.
        let mut request_body = serde_json::Map::new();
        for (key, value) in answers.iter() {
            request_body.insert(
                key.to_string(),
                serde_json::Value::String(value.to_string()),
            );
        }

        info!("POST {}", self.endpoint);
        let resp = self
            .http
            .post(self.endpoint.clone())
            .json(&request_body)
            .send()
            .await?;

        let status = resp.status();
        if !status.is_success() {
            let detail = resp
                .json::<ErrorBody>()
                .await
                .map(|body| body.detail)
                .unwrap_or_else(|_| "Unknown error".to_string());
            warn!("visualize request failed with status {}", status);
            return Err(GenerationError::Http {
                status: status.as_u16(),
                detail,
            });
        }

        let body = resp.text().await?;
        let payload: VisualizeResponse = serde_json::from_str(&body).map_err(|_| {
            GenerationError::MalformedResponse {
                field: "visualization_text",
            }
        })?;
        let text = payload
            .visualization_text
            .ok_or(GenerationError::MalformedResponse {
                field: "visualization_text",
            })?;

        Ok(GenerationResult {
            text,
            voice_url: payload.voice_output,
            music_url: payload.music_output,
        })
    }
}

// --- Mood check (/generate-visualization) ---

#[derive(Debug)]
struct MoodCheckClient {
    endpoint: Url,
    http: reqwest::Client,
}

#[derive(Serialize)]
struct GenerateVisualizationRequest {
    emotion: String,
    focus: String,
    dream: String,
    desired_feeling: String,
}

#[async_trait]
impl GenerationClient for MoodCheckClient {
    async fn generate(&self, answers: &AnswerRecord) -> Result<GenerationResult, GenerationError> {
        // Only the mood is asked; the remaining fields are the fixed
        // placeholders this endpoint has always been called with.
        let request_body = GenerateVisualizationRequest {
            emotion: answers.get("emotion").unwrap_or("Okay").to_string(),
            focus: "breathing".to_string(),
            dream: "a peaceful place".to_string(),
            desired_feeling: "calm and relaxed".to_string(),
        };

        info!("POST {}", self.endpoint);
        let resp = self
            .http
            .post(self.endpoint.clone())
            .json(&request_body)
            .send()
            .await?;

        let status = resp.status();
        if !status.is_success() {
            let detail = resp.text().await.unwrap_or_default();
            warn!("generate-visualization request failed with status {}", status);
            return Err(GenerationError::Http {
                status: status.as_u16(),
                detail: if detail.is_empty() {
                    "no error detail".to_string()
                } else {
                    detail
                },
            });
        }

        // The response shape is not pinned down for this endpoint; show the
        // body to the user instead of guessing fields.
        let body = resp.text().await?;
        let text = serde_json::from_str::<serde_json::Value>(&body)
            .and_then(|value| serde_json::to_string_pretty(&value))
            .unwrap_or(body);

        Ok(GenerationResult {
            text,
            voice_url: None,
            music_url: None,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn meditate_response_parsing_success() {
        let json = r#"{
            "meditation_text": "Close your eyes and breathe.",
            "voice_output": "http://127.0.0.1:8000/audio/voice.mp3",
            "music_output": "http://127.0.0.1:8000/audio/music.mp3"
        }"#;

        let result: MeditateResponse = serde_json::from_str(json).unwrap();
        assert_eq!(
            result.meditation_text.as_deref(),
            Some("Close your eyes and breathe.")
        );
        assert_eq!(
            result.voice_output.as_deref(),
            Some("http://127.0.0.1:8000/audio/voice.mp3")
        );
    }

    #[test]
    fn meditate_response_parsing_missing_narration() {
        // A success status can still come back without the narration text.
        let json = r#"{
            "voice_output": "http://127.0.0.1:8000/audio/voice.mp3",
            "music_output": "http://127.0.0.1:8000/audio/music.mp3"
        }"#;

        let result: MeditateResponse = serde_json::from_str(json).unwrap();
        assert!(result.meditation_text.is_none());
    }

    #[test]
    fn meditate_request_keeps_answers_positional() {
        let mut answers = AnswerRecord::default();
        answers.insert("emotion", "Calm".to_string());
        answers.insert("focus", "Work".to_string());
        answers.insert("dream", "Inner peace".to_string());
        answers.insert("desired_feeling", "Clarity".to_string());

        let request = MeditateRequest {
            quiz_answers: answers.values().map(|v| v.to_string()).collect(),
            user_input: "Generate a meditation based on my answers.".to_string(),
            voice_pref: "alloy".to_string(),
            music_pref: "Calm".to_string(),
        };

        let value = serde_json::to_value(&request).unwrap();
        assert_eq!(
            value["quiz_answers"],
            serde_json::json!(["Calm", "Work", "Inner peace", "Clarity"])
        );
        assert_eq!(value["voice_pref"], "alloy");
    }

    #[test]
    fn visualize_error_body_parsing() {
        let json = r#"{"detail": "server exploded"}"#;

        let result: ErrorBody = serde_json::from_str(json).unwrap();
        assert_eq!(result.detail, "server exploded");
    }

    #[test]
    fn generate_visualization_request_carries_placeholders() {
        let request = GenerateVisualizationRequest {
            emotion: "Stressed".to_string(),
            focus: "breathing".to_string(),
            dream: "a peaceful place".to_string(),
            desired_feeling: "calm and relaxed".to_string(),
        };

        let value = serde_json::to_value(&request).unwrap();
        assert_eq!(value["emotion"], "Stressed");
        assert_eq!(value["dream"], "a peaceful place");
    }

    #[test]
    fn error_messages_carry_status_and_detail() {
        let err = GenerationError::Http {
            status: 500,
            detail: "server exploded".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "generation service returned 500: server exploded"
        );

        let err = GenerationError::MalformedResponse {
            field: "meditation_text",
        };
        assert!(err.to_string().contains("meditation_text"));
    }

    #[test]
    fn factory_rejects_unknown_flow() {
        let mut config = Config::default();
        config.flow = "breathwork".to_string();

        let result = create_generation_client(&config);
        assert!(result.is_err());
        assert!(result.unwrap_err().to_string().contains("breathwork"));
    }

    #[test]
    fn factory_builds_a_client_for_each_flow() {
        for flow in ["meditation", "visualization", "mood_check"] {
            let mut config = Config::default();
            config.flow = flow.to_string();
            assert!(create_generation_client(&config).is_ok(), "flow {}", flow);
        }
    }
}
