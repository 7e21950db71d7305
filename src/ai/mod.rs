//! AI service integration for prompt composition and image generation
//!
//! Provides interfaces to hosted chat-completion and image-generation APIs
//! for merging citizen wishes into a garden scene and rendering it.

pub mod mock;
pub mod openai;

pub use mock::{MockChatClient, MockImageGenerationClient};
pub use openai::{OpenAiChatClient, OpenAiImageClient};

use crate::models::Wish;
use crate::Result;
use async_trait::async_trait;

/// Merges wishes into one scene description.
#[async_trait]
pub trait ChatService: Send + Sync {
    async fn compose_prompt(&self, wishes: &[Wish]) -> Result<String>;
}

/// Renders a prompt and returns the hosted image URL.
#[async_trait]
pub trait ImageGenerationService: Send + Sync {
    async fn generate_image(&self, prompt: &str) -> Result<String>;
}
