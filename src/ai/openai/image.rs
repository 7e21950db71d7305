use super::client::OpenAiHttpClient;
use super::types::{ImageGenerationRequest, ImageGenerationResponse};
use crate::ai::ImageGenerationService;
use crate::{Error, Result};
use async_trait::async_trait;
use reqwest::Client;
use std::time::Duration;

const IMAGE_SIZE: &str = "1024x1024";
const IMAGE_STYLE: &str = "vivid";
const IMAGE_QUALITY: &str = "standard";

pub struct OpenAiImageClient {
    http: OpenAiHttpClient,
    model: String,
}

impl OpenAiImageClient {
    pub fn new(url: String, api_key: String, model: String) -> Self {
        Self {
            http: OpenAiHttpClient::new(url, api_key, Duration::from_secs(60)),
            model,
        }
    }

    pub fn new_with_client(
        url: String,
        api_key: String,
        model: String,
        timeout: Duration,
        client: Client,
    ) -> Self {
        Self {
            http: OpenAiHttpClient::new_with_client(url, api_key, timeout, client),
            model,
        }
    }
}

#[async_trait]
impl ImageGenerationService for OpenAiImageClient {
    async fn generate_image(&self, prompt: &str) -> Result<String> {
        if prompt.is_empty() {
            return Err(Error::MissingInput("Prompt is required".to_string()));
        }

        tracing::info!("Requesting image from {} ({})", self.http.url(), self.model);

        let request = ImageGenerationRequest {
            model: self.model.clone(),
            prompt: prompt.to_string(),
            size: IMAGE_SIZE.to_string(),
            style: IMAGE_STYLE.to_string(),
            quality: IMAGE_QUALITY.to_string(),
            n: 1,
        };

        let response: ImageGenerationResponse = self.http.post(&request).await?;

        let image = response
            .data
            .into_iter()
            .next()
            .ok_or_else(|| Error::Upstream("No image data in response".to_string()))?;

        if let Some(revised) = &image.revised_prompt {
            tracing::debug!("Upstream revised prompt: {}", revised);
        }

        image
            .url
            .ok_or_else(|| Error::Upstream("No image URL in response".to_string()))
    }
}
