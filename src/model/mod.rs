mod mock;
mod openai;

use async_trait::async_trait;

use crate::types::ChatMessage;

pub use mock::MockModelProvider;
pub use openai::OpenAiProvider;

#[derive(Debug, Clone)]
pub struct ModelRequest {
    pub api_key: String,
    pub system_prompt: String,
    pub turns: Vec<ChatMessage>,
}

#[async_trait]
pub trait ModelProvider: Send + Sync {
    async fn complete(&self, request: ModelRequest) -> anyhow::Result<String>;
}
