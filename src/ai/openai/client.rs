use crate::{Error, Result};
use reqwest::Client;
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::time::Duration;
use tokio_retry::{strategy::FixedInterval, RetryIf};

const CONNECT_RETRY_DELAY_MS: u64 = 500;

/// Posts JSON to one fixed upstream endpoint, authenticated with an
/// `api-key` header.
pub struct OpenAiHttpClient {
    client: Client,
    api_key: String,
    url: String,
    timeout: Duration,
}

impl OpenAiHttpClient {
    pub fn new(url: String, api_key: String, timeout: Duration) -> Self {
        Self::new_with_client(url, api_key, timeout, Client::new())
    }

    pub fn new_with_client(url: String, api_key: String, timeout: Duration, client: Client) -> Self {
        Self {
            client,
            api_key,
            url,
            timeout,
        }
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    /// Send `request` and decode the response body.
    ///
    /// A request that could not connect is sent once more; anything that
    /// reached the upstream is not retried.
    pub async fn post<Req, Resp>(&self, request: &Req) -> Result<Resp>
    where
        Req: Serialize + Sync,
        Resp: DeserializeOwned,
    {
        let strategy = FixedInterval::from_millis(CONNECT_RETRY_DELAY_MS).take(1);

        RetryIf::spawn(
            strategy,
            || self.send::<Req, Resp>(request),
            |e: &Error| {
                let retry = e.is_connect_failure();
                if retry {
                    tracing::warn!("Could not connect to {}: {}. Retrying once...", self.url, e);
                }
                retry
            },
        )
        .await
    }

    async fn send<Req, Resp>(&self, request: &Req) -> Result<Resp>
    where
        Req: Serialize,
        Resp: DeserializeOwned,
    {
        tracing::debug!("Sending request to {}", self.url);

        let response = self
            .client
            .post(&self.url)
            .header("api-key", &self.api_key)
            .timeout(self.timeout)
            .json(request)
            .send()
            .await
            .map_err(|e| {
                tracing::error!("Failed to send request to {}: {}", self.url, e);
                e
            })?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response.text().await?;
            tracing::error!("Upstream API error (status {}): {}", status, error_text);
            return Err(Error::Upstream(format!(
                "API error (status {}): {}",
                status, error_text
            )));
        }

        let body = response.text().await?;
        serde_json::from_str(&body).map_err(|e| {
            tracing::error!("Failed to parse upstream response: {}\nBody: {}", e, body);
            Error::Upstream(format!("Failed to parse upstream response: {}", e))
        })
    }
}
