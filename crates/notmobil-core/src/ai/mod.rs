//! Client for the note API's text assistance endpoints.

use std::time::Duration;

use reqwest::Client;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::auth::Credential;
use crate::remote::parse_api_error;
use crate::util::{normalize_base_url, normalize_text_option};

#[derive(Debug, Error)]
pub enum AiError {
    #[error("Invalid AI client configuration: {0}")]
    InvalidConfiguration(String),
    #[error("Invalid input: {0}")]
    InvalidInput(String),
    #[error("AI HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("AI API error: {0}")]
    Api(String),
}

pub type AiResult<T> = Result<T, AiError>;

#[derive(Debug, Clone)]
pub struct AiClient {
    base_url: String,
    client: Client,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct SummarizeRequest<'a> {
    text: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    gemini_api_key: Option<String>,
}

#[derive(Debug, Serialize)]
struct TextRequest<'a> {
    text: &'a str,
}

#[derive(Debug, Deserialize)]
struct SummarizeResponse {
    summary: String,
}

#[derive(Debug, Deserialize)]
struct GenerateTagsResponse {
    tags: Vec<String>,
}

#[derive(Debug, Deserialize)]
struct ClassifyResponse {
    category: String,
}

impl AiClient {
    pub fn new(base_url: &str, timeout: Duration) -> AiResult<Self> {
        let base_url = normalize_base_url(base_url).ok_or_else(|| {
            AiError::InvalidConfiguration("API URL must include http:// or https://".to_string())
        })?;
        Ok(Self {
            base_url,
            client: Client::builder().timeout(timeout).build()?,
        })
    }

    /// Summarize `text`, optionally with the user's own model API key
    pub async fn summarize(
        &self,
        credential: &Credential,
        text: &str,
        api_key: Option<&str>,
    ) -> AiResult<String> {
        let text = require_text(text)?;
        let body = SummarizeRequest {
            text,
            gemini_api_key: normalize_text_option(api_key.map(str::to_string)),
        };
        let response: SummarizeResponse = self.post(credential, "summarize", &body).await?;
        Ok(response.summary)
    }

    pub async fn generate_tags(&self, credential: &Credential, text: &str) -> AiResult<Vec<String>> {
        let text = require_text(text)?;
        let response: GenerateTagsResponse =
            self.post(credential, "generate-tags", &TextRequest { text }).await?;
        Ok(response.tags)
    }

    pub async fn classify(&self, credential: &Credential, text: &str) -> AiResult<String> {
        let text = require_text(text)?;
        let response: ClassifyResponse =
            self.post(credential, "classify", &TextRequest { text }).await?;
        Ok(response.category)
    }

    async fn post<B, T>(&self, credential: &Credential, endpoint: &str, body: &B) -> AiResult<T>
    where
        B: Serialize + Sync,
        T: for<'de> Deserialize<'de>,
    {
        let response = self
            .client
            .post(format!("{}/ai/{endpoint}", self.base_url))
            .bearer_auth(credential.token())
            .header("Accept", "application/json")
            .json(body)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(AiError::Api(parse_api_error(status, &body)));
        }
        Ok(response.json::<T>().await?)
    }
}

fn require_text(text: &str) -> AiResult<&str> {
    let text = text.trim();
    if text.is_empty() {
        return Err(AiError::InvalidInput("text must not be empty".to_string()));
    }
    Ok(text)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn summarize_request_uses_wire_names() {
        let body = SummarizeRequest {
            text: "hello",
            gemini_api_key: Some("k".to_string()),
        };
        assert_eq!(
            serde_json::to_value(&body).unwrap(),
            serde_json::json!({"text": "hello", "geminiApiKey": "k"})
        );

        let without_key = SummarizeRequest {
            text: "hello",
            gemini_api_key: None,
        };
        assert_eq!(
            serde_json::to_value(&without_key).unwrap(),
            serde_json::json!({"text": "hello"})
        );
    }

    #[tokio::test]
    async fn empty_text_is_rejected_before_any_request() {
        let client = AiClient::new("http://127.0.0.1:9/api", Duration::from_millis(200)).unwrap();
        let credential = Credential::new("token");

        assert!(matches!(
            client.summarize(&credential, "   ", None).await,
            Err(AiError::InvalidInput(_))
        ));
        assert!(matches!(
            client.generate_tags(&credential, "").await,
            Err(AiError::InvalidInput(_))
        ));
        assert!(matches!(
            client.classify(&credential, "\n").await,
            Err(AiError::InvalidInput(_))
        ));
    }
}
