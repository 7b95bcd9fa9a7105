use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use super::{ModelProvider, ModelRequest};
use crate::config::CompletionSettings;

#[derive(Debug, Clone)]
pub struct OpenAiProvider {
    client: Client,
    settings: CompletionSettings,
}

impl OpenAiProvider {
    pub fn new(settings: CompletionSettings) -> anyhow::Result<Self> {
        let client = Client::builder().timeout(settings.timeout).build()?;
        Ok(Self { client, settings })
    }
}

#[derive(Debug, Serialize)]
struct ChatCompletionRequest<'a> {
    model: &'a str,
    messages: Vec<WireMessage<'a>>,
    temperature: f32,
    max_tokens: u32,
}

#[derive(Debug, Serialize)]
struct WireMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Debug, Deserialize)]
struct ChatCompletionResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatChoiceMessage,
}

#[derive(Debug, Deserialize)]
struct ChatChoiceMessage {
    content: String,
}

#[async_trait]
impl ModelProvider for OpenAiProvider {
    async fn complete(&self, request: ModelRequest) -> anyhow::Result<String> {
        let mut messages = Vec::with_capacity(request.turns.len() + 1);
        messages.push(WireMessage {
            role: "system",
            content: &request.system_prompt,
        });
        messages.extend(request.turns.iter().map(|turn| WireMessage {
            role: turn.role.as_str(),
            content: &turn.content,
        }));

        let payload = ChatCompletionRequest {
            model: &self.settings.model,
            messages,
            temperature: self.settings.temperature,
            max_tokens: self.settings.max_tokens,
        };

        debug!(
            model = %self.settings.model,
            turn_count = request.turns.len(),
            "sending chat completion request"
        );

        let response = self
            .client
            .post(&self.settings.url)
            .bearer_auth(&request.api_key)
            .json(&payload)
            .send()
            .await
            .map_err(|error| {
                warn!(?error, "completion request failed");
                error
            })?
            .error_for_status()
            .map_err(|error| {
                warn!(status = ?error.status(), "completion endpoint returned error status");
                error
            })?
            .json::<ChatCompletionResponse>()
            .await
            .map_err(|error| {
                warn!(?error, "failed to deserialize completion response");
                error
            })?;

        let content = response
            .choices
            .into_iter()
            .next()
            .map(|choice| choice.message.content)
            .ok_or_else(|| anyhow::anyhow!("model returned no choices"))?;

        Ok(content)
    }
}
