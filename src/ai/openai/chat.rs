use super::client::OpenAiHttpClient;
use super::types::{ChatCompletionRequest, ChatCompletionResponse, ChatMessage};
use crate::ai::ChatService;
use crate::models::Wish;
use crate::{prompts, Error, Result};
use async_trait::async_trait;
use reqwest::Client;
use std::time::Duration;

const MAX_TOKENS: u32 = 1000;
const TEMPERATURE: f64 = 0.7;

pub struct OpenAiChatClient {
    http: OpenAiHttpClient,
}

impl OpenAiChatClient {
    pub fn new(url: String, api_key: String) -> Self {
        Self {
            http: OpenAiHttpClient::new(url, api_key, Duration::from_secs(30)),
        }
    }

    pub fn new_with_client(url: String, api_key: String, timeout: Duration, client: Client) -> Self {
        Self {
            http: OpenAiHttpClient::new_with_client(url, api_key, timeout, client),
        }
    }
}

#[async_trait]
impl ChatService for OpenAiChatClient {
    async fn compose_prompt(&self, wishes: &[Wish]) -> Result<String> {
        tracing::info!("Composing garden prompt from {} wishes", wishes.len());

        let request = ChatCompletionRequest {
            messages: vec![
                ChatMessage::system(prompts::COMPOSER_SYSTEM),
                ChatMessage::user(prompts::compose_user_turn(wishes)),
            ],
            max_tokens: MAX_TOKENS,
            temperature: TEMPERATURE,
        };

        let response: ChatCompletionResponse = self.http.post(&request).await?;

        let choice = response
            .choices
            .into_iter()
            .next()
            .ok_or_else(|| Error::Upstream("No response from chat completion API".to_string()))?;

        if choice.finish_reason.as_deref() == Some("length") {
            tracing::warn!("Composed prompt was cut off at the {} token limit", MAX_TOKENS);
        }

        let prompt = choice
            .message
            .content
            .ok_or_else(|| Error::Upstream("No response from chat completion API".to_string()))?;

        let length = prompt.chars().count();
        if length > prompts::PROMPT_CHAR_TARGET {
            tracing::warn!(
                "Composed prompt is {} characters, above the {} character target",
                length,
                prompts::PROMPT_CHAR_TARGET
            );
        }

        Ok(prompt)
    }
}
