use super::{ChatService, ImageGenerationService};
use crate::models::Wish;
use crate::{Error, Result};
use async_trait::async_trait;
use std::sync::{Arc, Mutex};

/// Canned response for a mock call: either the value or an upstream failure.
#[derive(Clone)]
enum Canned {
    Ok(String),
    Fail(String),
}

impl Canned {
    fn to_result(&self) -> Result<String> {
        match self {
            Canned::Ok(value) => Ok(value.clone()),
            Canned::Fail(message) => Err(Error::Upstream(message.clone())),
        }
    }
}

pub struct MockChatClient {
    responses: Arc<Mutex<Vec<Canned>>>,
    received: Arc<Mutex<Vec<Vec<Wish>>>>,
}

impl MockChatClient {
    pub fn new() -> Self {
        Self {
            responses: Arc::new(Mutex::new(Vec::new())),
            received: Arc::new(Mutex::new(Vec::new())),
        }
    }

    pub fn with_prompt_response(self, response: String) -> Self {
        self.responses.lock().unwrap().push(Canned::Ok(response));
        self
    }

    pub fn with_failure(self, message: String) -> Self {
        self.responses.lock().unwrap().push(Canned::Fail(message));
        self
    }

    pub fn get_call_count(&self) -> usize {
        self.received.lock().unwrap().len()
    }

    /// Wish lists passed to each call, in call order.
    pub fn received_wishes(&self) -> Vec<Vec<Wish>> {
        self.received.lock().unwrap().clone()
    }
}

impl Default for MockChatClient {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ChatService for MockChatClient {
    async fn compose_prompt(&self, wishes: &[Wish]) -> Result<String> {
        let count = {
            let mut received = self.received.lock().unwrap();
            received.push(wishes.to_vec());
            received.len()
        };

        let responses = self.responses.lock().unwrap();
        if responses.is_empty() {
            let names: Vec<&str> = wishes.iter().map(|w| w.wish.as_str()).collect();
            Ok(format!("A stadstuin with {}", names.join(", ")))
        } else {
            responses[(count - 1) % responses.len()].to_result()
        }
    }
}

pub struct MockImageGenerationClient {
    responses: Arc<Mutex<Vec<Canned>>>,
    received: Arc<Mutex<Vec<String>>>,
}

impl MockImageGenerationClient {
    pub fn new() -> Self {
        Self {
            responses: Arc::new(Mutex::new(Vec::new())),
            received: Arc::new(Mutex::new(Vec::new())),
        }
    }

    pub fn with_image_url(self, url: String) -> Self {
        self.responses.lock().unwrap().push(Canned::Ok(url));
        self
    }

    pub fn with_failure(self, message: String) -> Self {
        self.responses.lock().unwrap().push(Canned::Fail(message));
        self
    }

    pub fn get_call_count(&self) -> usize {
        self.received.lock().unwrap().len()
    }

    pub fn received_prompts(&self) -> Vec<String> {
        self.received.lock().unwrap().clone()
    }
}

impl Default for MockImageGenerationClient {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ImageGenerationService for MockImageGenerationClient {
    async fn generate_image(&self, prompt: &str) -> Result<String> {
        let count = {
            let mut received = self.received.lock().unwrap();
            received.push(prompt.to_string());
            received.len()
        };

        let responses = self.responses.lock().unwrap();
        if responses.is_empty() {
            Ok(format!("https://images.test/{}.png", count))
        } else {
            responses[(count - 1) % responses.len()].to_result()
        }
    }
}
