//! reqwest-backed implementation of the project API.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, RequestBuilder, Response, StatusCode};
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};

use super::{PasswordUpdated, Project, ProjectApi};
use crate::error::{DbpassError, Result};

pub struct HttpProjectApi {
    client: Client,
    base_url: String,
    access_token: Option<SecretString>,
}

#[derive(Serialize)]
struct PasswordBody<'a> {
    password: &'a str,
}

#[derive(Deserialize)]
struct ErrorEnvelope {
    error: ErrorDetail,
}

#[derive(Deserialize)]
struct ErrorDetail {
    message: String,
}

#[derive(Deserialize)]
struct MessageOnly {
    message: String,
}

impl HttpProjectApi {
    pub fn new(
        base_url: &str,
        access_token: Option<SecretString>,
        timeout: Duration,
    ) -> Result<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| DbpassError::Network(format!("Failed to create HTTP client: {e}")))?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            access_token,
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    fn authorize(&self, request: RequestBuilder) -> RequestBuilder {
        match &self.access_token {
            Some(token) => request.bearer_auth(token.expose_secret()),
            None => request,
        }
    }
}

/// Pull the server's explanation out of a failed response.
async fn api_error(response: Response) -> DbpassError {
    let status = response.status();
    let body = response.text().await.unwrap_or_default();

    let message = serde_json::from_str::<ErrorEnvelope>(&body)
        .map(|e| e.error.message)
        .or_else(|_| serde_json::from_str::<MessageOnly>(&body).map(|m| m.message))
        .unwrap_or_else(|_| {
            let trimmed = body.trim();
            if trimmed.is_empty() {
                status
                    .canonical_reason()
                    .unwrap_or("request failed")
                    .to_string()
            } else {
                trimmed.to_string()
            }
        });

    DbpassError::Api {
        status: status.as_u16(),
        message,
    }
}

#[async_trait]
impl ProjectApi for HttpProjectApi {
    async fn update_db_password(
        &self,
        project_ref: &str,
        password: &SecretString,
    ) -> Result<PasswordUpdated> {
        let url = self.url(&format!("/projects/{project_ref}/db-password"));
        let body = PasswordBody {
            password: password.expose_secret(),
        };

        let response = self
            .authorize(self.client.patch(&url).json(&body))
            .send()
            .await?;
        tracing::debug!(method = "PATCH", %url, status = response.status().as_u16(), "db password update");

        if !response.status().is_success() {
            return Err(api_error(response).await);
        }

        // A 2xx may still carry an error envelope.
        let value: serde_json::Value = response
            .json()
            .await
            .map_err(|e| DbpassError::Serialization(e.to_string()))?;
        if let Ok(envelope) = serde_json::from_value::<ErrorEnvelope>(value.clone()) {
            return Err(DbpassError::Api {
                status: 200,
                message: envelope.error.message,
            });
        }
        serde_json::from_value(value).map_err(|e| DbpassError::Serialization(e.to_string()))
    }

    async fn get_project_detail(&self, project_ref: &str) -> Result<Option<Project>> {
        let url = self.url(&format!("/projects/{project_ref}"));
        let response = self.authorize(self.client.get(&url)).send().await?;
        tracing::debug!(method = "GET", %url, status = response.status().as_u16(), "project detail");

        if response.status() == StatusCode::NOT_FOUND {
            return Ok(None);
        }
        if !response.status().is_success() {
            return Err(api_error(response).await);
        }

        let project = response
            .json()
            .await
            .map_err(|e| DbpassError::Serialization(e.to_string()))?;
        Ok(Some(project))
    }
}
