use std::{sync::Arc, time::Duration};

use async_openai::{config::OpenAIConfig, Client};
use async_trait::async_trait;
use secrecy::ExposeSecret;
use serde_json::{json, Value};

use crate::{
    config::Config,
    errors::{AppError, AppResult},
    models::domain::ChatRole,
};

pub const DEFAULT_TOP_P: f32 = 0.9;
const DEFAULT_BACKOFF_BASE: Duration = Duration::from_millis(500);

/// One chat completion call, independent of the provider.
#[derive(Debug, Clone, PartialEq)]
pub struct CompletionRequest {
    pub system_prompt: String,
    pub history: Vec<(ChatRole, String)>,
    pub user_message: String,
    pub image_data_url: Option<String>,
    pub max_tokens: u32,
    pub temperature: f32,
    /// Ask the provider to constrain output to a single JSON object.
    pub json_mode: bool,
    /// Extra attempts after the first one fails with a retryable error.
    pub retries: u32,
}

impl CompletionRequest {
    pub fn new(system_prompt: impl Into<String>, user_message: impl Into<String>) -> Self {
        Self {
            system_prompt: system_prompt.into(),
            history: Vec::new(),
            user_message: user_message.into(),
            image_data_url: None,
            max_tokens: 1000,
            temperature: 0.2,
            json_mode: false,
            retries: 0,
        }
    }

    pub fn with_history(mut self, history: Vec<(ChatRole, String)>) -> Self {
        self.history = history;
        self
    }

    pub fn with_image(mut self, image_data_url: Option<String>) -> Self {
        self.image_data_url = image_data_url.filter(|url| !url.is_empty());
        self
    }

    pub fn with_max_tokens(mut self, max_tokens: u32) -> Self {
        self.max_tokens = max_tokens;
        self
    }

    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = temperature;
        self
    }

    pub fn with_json_mode(mut self) -> Self {
        self.json_mode = true;
        self
    }

    pub fn with_retries(mut self, retries: u32) -> Self {
        self.retries = retries;
        self
    }
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CompletionClient: Send + Sync {
    /// Returns the first choice's message content.
    async fn complete(&self, request: &CompletionRequest) -> AppResult<String>;
}

pub struct OpenAiCompletionClient {
    client: Option<Client<OpenAIConfig>>,
    model: String,
}

impl OpenAiCompletionClient {
    pub fn new(client: Option<Client<OpenAIConfig>>, model: impl Into<String>) -> Self {
        Self {
            client,
            model: model.into(),
        }
    }

    /// A missing API key is not fatal at startup; each call reports it instead.
    pub fn from_config(config: &Config) -> Self {
        let client = config.openai_api_key.as_ref().map(|key| {
            let openai_config = OpenAIConfig::new()
                .with_api_key(key.expose_secret())
                .with_api_base(config.openai_api_base.as_str());
            Client::with_config(openai_config)
        });
        Self::new(client, config.openai_model.clone())
    }

    fn request_body(&self, request: &CompletionRequest) -> Value {
        let mut messages = vec![json!({ "role": "system", "content": request.system_prompt })];

        for (role, text) in &request.history {
            messages.push(json!({ "role": role, "content": text }));
        }

        let user_content = match &request.image_data_url {
            Some(url) => json!([
                { "type": "text", "text": request.user_message },
                { "type": "image_url", "image_url": { "url": url } }
            ]),
            None => json!(request.user_message),
        };
        messages.push(json!({ "role": "user", "content": user_content }));

        let mut body = json!({
            "model": self.model,
            "temperature": request.temperature,
            "top_p": DEFAULT_TOP_P,
            "max_tokens": request.max_tokens,
            "messages": messages,
        });
        if request.json_mode {
            body["response_format"] = json!({ "type": "json_object" });
        }
        body
    }
}

#[async_trait]
impl CompletionClient for OpenAiCompletionClient {
    async fn complete(&self, request: &CompletionRequest) -> AppResult<String> {
        let client = self.client.as_ref().ok_or(AppError::MissingCredential)?;

        let response: Value = client
            .chat()
            .create_byot(self.request_body(request))
            .await?;

        response["choices"][0]["message"]["content"]
            .as_str()
            .filter(|content| !content.trim().is_empty())
            .map(str::to_string)
            .ok_or_else(|| AppError::Upstream("Empty OpenAI response".to_string()))
    }
}

/// Wraps a completion client with a per-attempt timeout and exponential
/// backoff between attempts (base, 2x base, 4x base, ...).
pub struct ModelService {
    client: Arc<dyn CompletionClient>,
    timeout: Duration,
    backoff_base: Duration,
}

impl ModelService {
    pub fn new(client: Arc<dyn CompletionClient>, timeout: Duration) -> Self {
        Self {
            client,
            timeout,
            backoff_base: DEFAULT_BACKOFF_BASE,
        }
    }

    pub fn with_backoff(mut self, backoff_base: Duration) -> Self {
        self.backoff_base = backoff_base;
        self
    }

    pub async fn complete(&self, request: &CompletionRequest) -> AppResult<String> {
        let mut attempt: u32 = 0;

        loop {
            let result = match tokio::time::timeout(self.timeout, self.client.complete(request))
                .await
            {
                Ok(result) => result,
                Err(_) => Err(AppError::Upstream(format!(
                    "OpenAI request timed out after {}ms",
                    self.timeout.as_millis()
                ))),
            };

            match result {
                Ok(content) => return Ok(content),
                Err(err) if err.is_retryable() && attempt < request.retries => {
                    let delay = self.backoff_base.saturating_mul(2u32.saturating_pow(attempt));
                    log::warn!(
                        "Completion attempt {} failed, retrying in {}ms: {}",
                        attempt + 1,
                        delay.as_millis(),
                        err
                    );
                    tokio::time::sleep(delay).await;
                    attempt += 1;
                }
                Err(err) => return Err(err),
            }
        }
    }
}
