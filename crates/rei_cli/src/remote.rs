use anyhow::{Context, Result};
use async_trait::async_trait;
use rei_core::source::LabelClient;
use reqwest::Client;
use serde_json::{json, Value};
use std::env;
use std::time::Duration;

/// Label client for any OpenAI-compatible chat-completions endpoint.
#[derive(Debug, Clone)]
pub struct OpenAiLabelClient {
    client: Client,
    api_key: String,
    base_url: String,
    model: String,
}

impl OpenAiLabelClient {
    /// Reads `OPENAI_API_KEY` and `OPENAI_BASE_URL` from the environment.
    pub fn from_env(model: &str) -> Result<Self> {
        let api_key = env::var("OPENAI_API_KEY")
            .context("OPENAI_API_KEY must be set to use the remote affect source")?;
        let base_url = env::var("OPENAI_BASE_URL")
            .unwrap_or_else(|_| "https://api.openai.com/v1".to_string())
            .trim_end_matches('/')
            .to_string();

        Ok(Self {
            client: Client::builder().timeout(Duration::from_secs(15)).build()?,
            api_key,
            base_url,
            model: model.to_string(),
        })
    }

    fn payload(&self, instruction: &str, text: &str) -> Value {
        json!({
            "model": self.model,
            "messages": [
                { "role": "system", "content": instruction },
                { "role": "user", "content": text }
            ],
            "max_tokens": 10,
            "temperature": 0.1,
        })
    }
}

#[async_trait]
impl LabelClient for OpenAiLabelClient {
    async fn complete_label(&self, instruction: &str, text: &str) -> Result<String> {
        let url = format!("{}/chat/completions", self.base_url);

        let response = self
            .client
            .post(&url)
            .header("Authorization", format!("Bearer {}", self.api_key))
            .json(&self.payload(instruction, text))
            .send()
            .await
            .context("Failed to send request to label endpoint")?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response.text().await.unwrap_or_default();
            anyhow::bail!("Label endpoint error {}: {}", status, error_text);
        }

        let resp_json: Value = response.json().await?;
        let content = resp_json["choices"][0]["message"]["content"]
            .as_str()
            .context("Label endpoint returned no message content")?;
        Ok(content.trim().to_lowercase())
    }
}
