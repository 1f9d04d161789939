//! REST collaborators: presentations, groups and invitations.

pub mod group;
pub mod presentation;

use async_trait::async_trait;
use log::error;
use reqwest::{Client, StatusCode};
use serde::de::DeserializeOwned;

use crate::models::group::{ErrorResponse, Group};
use crate::models::presentation::Presentation;

#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("server returned {status}: {}", .message.as_deref().unwrap_or("no message"))]
    Server { status: u16, message: Option<String> },
    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("unexpected response body: {0}")]
    Decode(#[from] serde_json::Error),
}

impl ApiError {
    /// What the user gets to read: the server's own message when it sent one.
    pub fn user_message(&self) -> String {
        match self {
            ApiError::Server {
                message: Some(message),
                ..
            } => message.clone(),
            other => other.to_string(),
        }
    }
}

#[async_trait]
pub trait PresentationApi: Send + Sync {
    async fn presentation(&self, presentation_id: &str) -> Result<Presentation, ApiError>;
}

#[async_trait]
pub trait GroupApi: Send + Sync {
    async fn group(&self, group_id: &str) -> Result<Group, ApiError>;

    async fn invitation_link(&self, group_id: &str) -> Result<String, ApiError>;

    /// Returns the server's confirmation message.
    async fn invite_by_email(&self, group_id: &str, email: &str) -> Result<Option<String>, ApiError>;
}

#[derive(Clone)]
pub struct ApiClient {
    client: Client,
    base_url: String,
    token: Option<String>,
}

impl ApiClient {
    pub fn new(base_url: &str, token: Option<String>) -> Self {
        Self {
            client: Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
            token,
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    fn authorize(&self, request: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        match &self.token {
            Some(token) => request.header("Authorization", format!("Bearer {}", token)),
            None => request,
        }
    }
}

#[async_trait]
impl PresentationApi for ApiClient {
    async fn presentation(&self, presentation_id: &str) -> Result<Presentation, ApiError> {
        presentation::get_presentation(self, presentation_id).await
    }
}

#[async_trait]
impl GroupApi for ApiClient {
    async fn group(&self, group_id: &str) -> Result<Group, ApiError> {
        group::get_group(self, group_id).await
    }

    async fn invitation_link(&self, group_id: &str) -> Result<String, ApiError> {
        group::get_invitation_link(self, group_id).await
    }

    async fn invite_by_email(&self, group_id: &str, email: &str) -> Result<Option<String>, ApiError> {
        group::invite_user_via_email(self, group_id, email).await
    }
}

async fn read_body<T: DeserializeOwned>(resp: reqwest::Response) -> Result<T, ApiError> {
    let status = resp.status();
    let body = resp.text().await?;
    parse_body(status, &body)
}

fn parse_body<T: DeserializeOwned>(status: StatusCode, body: &str) -> Result<T, ApiError> {
    if status.is_success() {
        return Ok(serde_json::from_str(body)?);
    }
    let ErrorResponse { message } = serde_json::from_str(body).unwrap_or_default();
    error!("Request failed with {}: {:?}", status, message);
    Err(ApiError::Server {
        status: status.as_u16(),
        message,
    })
}
