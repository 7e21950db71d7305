//! HTTP façade
//!
//! Exposes prompt composition and image generation as JSON routes behind a
//! CORS whitelist, and maps component failures to status codes.

pub mod errors;
pub mod handlers;
pub mod http_server;

pub use errors::ApiError;
pub use http_server::{create_app, start_server};

use crate::ai::{ChatService, ImageGenerationService};
use std::sync::Arc;

/// Read-only services shared by all requests.
#[derive(Clone)]
pub struct AppState {
    pub chat: Arc<dyn ChatService>,
    pub image_gen: Arc<dyn ImageGenerationService>,
}

impl AppState {
    pub fn new(chat: Arc<dyn ChatService>, image_gen: Arc<dyn ImageGenerationService>) -> Self {
        Self { chat, image_gen }
    }
}
