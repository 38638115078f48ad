use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

use crate::config::TranslateConfig;

#[derive(Debug, Error)]
pub enum TranslateError {
    #[error("translate request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("translate service returned status {0}")]
    Status(reqwest::StatusCode),

    #[error("translate service returned {received} items for {sent} inputs")]
    LengthMismatch { sent: usize, received: usize },
}

/// Normalizes free-text ingredient lines into the language the
/// nutrition service expects. Order and count are preserved.
#[async_trait]
pub trait Translator: Send + Sync {
    async fn translate(&self, texts: &[String]) -> Result<Vec<String>, TranslateError>;
}

#[derive(Debug, Serialize)]
struct TranslateRequest<'a> {
    q: &'a [String],
    source: &'a str,
    target: &'a str,
    format: &'a str,
}

#[derive(Debug, Deserialize)]
struct TranslateResponse {
    #[serde(rename = "translatedText")]
    translated_text: Vec<String>,
}

/// LibreTranslate-compatible HTTP client.
#[derive(Clone)]
pub struct HttpTranslator {
    http: reqwest::Client,
    config: TranslateConfig,
}

impl HttpTranslator {
    pub fn new(config: TranslateConfig) -> Self {
        Self {
            http: reqwest::Client::new(),
            config,
        }
    }
}

fn check_lengths(sent: usize, translated: Vec<String>) -> Result<Vec<String>, TranslateError> {
    if translated.len() != sent {
        return Err(TranslateError::LengthMismatch {
            sent,
            received: translated.len(),
        });
    }
    Ok(translated)
}

#[async_trait]
impl Translator for HttpTranslator {
    async fn translate(&self, texts: &[String]) -> Result<Vec<String>, TranslateError> {
        let body = TranslateRequest {
            q: texts,
            source: &self.config.source_lang,
            target: &self.config.target_lang,
            format: "text",
        };

        let resp = self
            .http
            .post(&self.config.url)
            .json(&body)
            .send()
            .await?;
        if !resp.status().is_success() {
            return Err(TranslateError::Status(resp.status()));
        }

        let parsed: TranslateResponse = resp.json().await?;
        debug!(count = texts.len(), "ingredients translated");
        check_lengths(texts.len(), parsed.translated_text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn response_parses_ordered_list() {
        let raw = r#"{"translatedText": ["egg", "rice"]}"#;
        let parsed: TranslateResponse = serde_json::from_str(raw).expect("parse");
        assert_eq!(parsed.translated_text, vec!["egg", "rice"]);
    }

    #[test]
    fn length_mismatch_is_rejected() {
        let err = check_lengths(2, vec!["egg".into()]).unwrap_err();
        match err {
            TranslateError::LengthMismatch { sent, received } => {
                assert_eq!(sent, 2);
                assert_eq!(received, 1);
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn matching_lengths_pass_through_in_order() {
        let out = check_lengths(2, vec!["egg".into(), "rice".into()]).expect("ok");
        assert_eq!(out, vec!["egg", "rice"]);
    }

    #[test]
    fn request_body_shape() {
        let texts = vec!["telur".to_string(), "nasi".to_string()];
        let body = TranslateRequest {
            q: &texts,
            source: "id",
            target: "en",
            format: "text",
        };
        let json = serde_json::to_value(&body).expect("serialize");
        assert_eq!(json["q"][0], "telur");
        assert_eq!(json["source"], "id");
        assert_eq!(json["target"], "en");
    }
}
