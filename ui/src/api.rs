//! Browser client for the InLong manager API

use access_flow::domain::{AccessBackend, ApiResponse, InlongGroup};
use access_flow::error::BackendError;
use async_trait::async_trait;
use gloo_net::http::{Request, Response};
use serde::de::DeserializeOwned;

const API_BASE: &str = "/api/inlong/manager";

fn group_url(action: &str, group_id: &str) -> String {
    format!("{}/group/{}/{}", API_BASE, action, urlencoding::encode(group_id))
}

/// Manager backend reached through the dashboard's own origin
#[derive(Debug, Default, Clone, Copy)]
pub struct ManagerApi;

#[async_trait(?Send)]
impl AccessBackend for ManagerApi {
    async fn fetch_group(&self, group_id: &str) -> Result<InlongGroup, BackendError> {
        fetch_json::<InlongGroup>(&group_url("get", group_id)).await
    }

    async fn start_process(&self, group_id: &str) -> Result<(), BackendError> {
        post_empty(&group_url("startProcess", group_id)).await
    }
}

async fn fetch_json<T: DeserializeOwned>(url: &str) -> Result<T, BackendError> {
    let response = Request::get(url)
        .send()
        .await
        .map_err(|e| BackendError::Transport(e.to_string()))?;

    read_envelope::<T>(response).await?.into_data()
}

async fn post_empty(url: &str) -> Result<(), BackendError> {
    let response = Request::post(url)
        .send()
        .await
        .map_err(|e| BackendError::Transport(e.to_string()))?;

    read_envelope::<serde_json::Value>(response)
        .await?
        .into_result()
        .map(|_| ())
}

async fn read_envelope<T: DeserializeOwned>(response: Response) -> Result<ApiResponse<T>, BackendError> {
    if !response.ok() {
        return Err(BackendError::Status {
            status: response.status(),
            message: response.text().await.unwrap_or_default(),
        });
    }

    response
        .json()
        .await
        .map_err(|e| BackendError::Decode(e.to_string()))
}
