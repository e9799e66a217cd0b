use crate::{
    config::GeminiConfig,
    error::{Result, StudioError},
    models::ApiErrorResponse,
};
use reqwest::Client;
use serde::{de::DeserializeOwned, Serialize};
use std::sync::Arc;

const API_KEY_HEADER: &str = "x-goog-api-key";

/// Shared HTTP plumbing for the Gemini REST endpoints.
#[derive(Clone)]
pub struct Transport {
    http: Client,
    config: Arc<GeminiConfig>,
    api_key: String,
}

impl Transport {
    pub fn new(config: GeminiConfig) -> Result<Self> {
        let api_key = config
            .api_key
            .clone()
            .filter(|k| !k.trim().is_empty())
            .ok_or_else(|| StudioError::ConfigError("Gemini API key is required".into()))?;

        Ok(Self {
            http: Client::new(),
            config: Arc::new(config),
            api_key,
        })
    }

    pub fn config(&self) -> &GeminiConfig {
        &self.config
    }

    /// POSTs `body` to `models/{model}:{method}` and decodes the JSON reply.
    pub async fn post<B, R>(&self, model: &str, method: &str, body: &B) -> Result<R>
    where
        B: Serialize + ?Sized,
        R: DeserializeOwned,
    {
        let url = self.config.endpoint(model, method);
        log::debug!("POST {}", url);

        let response = self
            .http
            .post(&url)
            .header(API_KEY_HEADER, &self.api_key)
            .json(body)
            .send()
            .await
            .map_err(|e| {
                log::error!("Request to {} failed: {}", model, e);
                StudioError::RequestError(format!("{} request failed: {}", model, e))
            })?;

        let status = response.status();
        let body_text = response
            .text()
            .await
            .map_err(|e| StudioError::ResponseError(e.to_string()))?;

        if !status.is_success() {
            let message = api_error_message(&body_text);
            log::error!("{} returned {}: {}", model, status, message);
            return Err(StudioError::ApiError {
                status: status.as_u16(),
                message,
            });
        }

        serde_json::from_str(&body_text).map_err(|e| {
            log::debug!("Undecodable response body: {}", truncate(&body_text, 500));
            StudioError::ResponseError(format!("Failed to decode {} response: {}", model, e))
        })
    }
}

/// Pulls `error.message` out of a Google error body, falling back to the raw text.
pub(crate) fn api_error_message(body: &str) -> String {
    serde_json::from_str::<ApiErrorResponse>(body)
        .ok()
        .map(|e| e.error.message)
        .filter(|m| !m.is_empty())
        .unwrap_or_else(|| truncate(body, 300).to_string())
}

fn truncate(text: &str, max: usize) -> &str {
    match text.char_indices().nth(max) {
        Some((idx, _)) => &text[..idx],
        None => text,
    }
}
