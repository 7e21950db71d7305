//! Data models and structures
//!
//! Defines the wish/prompt/image payloads exchanged with the frontend and the
//! startup configuration for the upstream model APIs.

use serde::{Deserialize, Serialize};
use std::net::SocketAddr;
use std::time::Duration;

/// A citizen's request for the shared garden.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Wish {
    pub name: String,
    pub wish: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct BuildPromptRequest {
    #[serde(default)]
    pub wishes: Vec<Wish>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ComposedPrompt {
    pub prompt: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct GenerateImageRequest {
    #[serde(default)]
    pub prompt: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct GeneratedImage {
    #[serde(rename = "imageUrl")]
    pub image_url: String,
}

/// Failure envelope returned by every route.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ErrorBody {
    pub error: String,
}

pub const DEFAULT_IMAGE_MODEL: &str = "dall-e-3";
pub const DEFAULT_BIND_ADDR: &str = "127.0.0.1:5000";
pub const DEFAULT_ALLOWED_ORIGINS: [&str; 2] = ["http://localhost:3000", "http://127.0.0.1:3000"];
const DEFAULT_CHAT_TIMEOUT_SECS: u64 = 30;
const DEFAULT_IMAGE_TIMEOUT_SECS: u64 = 60;

// Configuration
#[derive(Debug, Clone)]
pub struct Config {
    pub chat_api_url: String,
    pub chat_api_key: String,
    pub image_api_url: String,
    pub image_api_key: String,
    pub image_model: String,
    pub bind_addr: SocketAddr,
    pub allowed_origins: Vec<String>,
    pub chat_timeout: Duration,
    pub image_timeout: Duration,
}

impl Config {
    pub fn from_env() -> crate::Result<Self> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build the configuration from an arbitrary variable source.
    pub fn from_lookup<F>(lookup: F) -> crate::Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let required = |key: &str| {
            lookup(key)
                .filter(|value| !value.trim().is_empty())
                .ok_or_else(|| crate::Error::Config(format!("{} not set", key)))
        };

        let bind_addr = lookup("BIND_ADDR").unwrap_or_else(|| DEFAULT_BIND_ADDR.to_string());
        let bind_addr: SocketAddr = bind_addr
            .parse()
            .map_err(|_| crate::Error::Config(format!("Invalid BIND_ADDR '{}'", bind_addr)))?;

        let allowed_origins = match lookup("ALLOWED_ORIGINS") {
            Some(raw) => parse_origins(&raw),
            None => DEFAULT_ALLOWED_ORIGINS.iter().map(|o| o.to_string()).collect(),
        };

        Ok(Self {
            chat_api_url: required("OPENAI_API_URL")?,
            chat_api_key: required("OPENAI_API_KEY")?,
            image_api_url: required("DALLE_URL")?,
            image_api_key: required("DALLE_KEY")?,
            image_model: lookup("DALLE_MODEL").unwrap_or_else(|| DEFAULT_IMAGE_MODEL.to_string()),
            bind_addr,
            allowed_origins,
            chat_timeout: parse_secs(&lookup, "CHAT_TIMEOUT_SECS", DEFAULT_CHAT_TIMEOUT_SECS)?,
            image_timeout: parse_secs(&lookup, "IMAGE_TIMEOUT_SECS", DEFAULT_IMAGE_TIMEOUT_SECS)?,
        })
    }
}

fn parse_origins(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|origin| !origin.is_empty())
        .map(str::to_string)
        .collect()
}

fn parse_secs<F>(lookup: &F, key: &str, default: u64) -> crate::Result<Duration>
where
    F: Fn(&str) -> Option<String>,
{
    match lookup(key) {
        Some(raw) => raw
            .trim()
            .parse::<u64>()
            .map(Duration::from_secs)
            .map_err(|_| crate::Error::Config(format!("Invalid {} '{}'", key, raw))),
        None => Ok(Duration::from_secs(default)),
    }
}
