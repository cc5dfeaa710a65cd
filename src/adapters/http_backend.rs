//! Manager backend over HTTP
//!
//! Talks to the InLong manager REST API. Every endpoint wraps its payload in
//! an [`ApiResponse`] envelope; a `success = false` answer is surfaced with the
//! manager's own message.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::de::DeserializeOwned;
use tracing::debug;

use crate::config::ManagerSettings;
use crate::domain::{AccessBackend, ApiResponse, InlongGroup};
use crate::error::BackendError;

impl From<reqwest::Error> for BackendError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            BackendError::Decode(err.to_string())
        } else if err.is_timeout() {
            BackendError::Transport(format!("Request timed out: {}", err))
        } else {
            BackendError::Transport(err.to_string())
        }
    }
}

pub struct HttpAccessBackend {
    client: Client,
    base_url: String,
}

impl HttpAccessBackend {
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self, BackendError> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        })
    }

    pub fn from_settings(settings: &ManagerSettings) -> Result<Self, BackendError> {
        Self::new(
            settings.base_url.clone(),
            Duration::from_secs(settings.timeout_seconds),
        )
    }

    fn url(&self, action: &str, group_id: &str) -> String {
        format!(
            "{}/group/{}/{}",
            self.base_url,
            action,
            urlencoding::encode(group_id)
        )
    }

    async fn read_envelope<T: DeserializeOwned>(
        response: reqwest::Response,
    ) -> Result<ApiResponse<T>, BackendError> {
        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(BackendError::Status {
                status: status.as_u16(),
                message,
            });
        }
        Ok(response.json::<ApiResponse<T>>().await?)
    }
}

#[async_trait(?Send)]
impl AccessBackend for HttpAccessBackend {
    async fn fetch_group(&self, group_id: &str) -> Result<InlongGroup, BackendError> {
        let url = self.url("get", group_id);
        debug!(%url, "fetching group");
        let response = self.client.get(&url).send().await?;
        Self::read_envelope::<InlongGroup>(response).await?.into_data()
    }

    async fn start_process(&self, group_id: &str) -> Result<(), BackendError> {
        let url = self.url("startProcess", group_id);
        debug!(%url, "starting process");
        let response = self.client.post(&url).send().await?;
        Self::read_envelope::<serde_json::Value>(response)
            .await?
            .into_result()
            .map(|_| ())
    }
}
