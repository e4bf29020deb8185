pub mod client;

use async_trait::async_trait;
use secrecy::SecretString;
use serde::{Deserialize, Serialize};

use crate::error::Result;

pub use client::HttpProjectApi;

/// Status reported for a project whose database is up and accepting connections.
pub const ACTIVE_HEALTHY: &str = "ACTIVE_HEALTHY";

/// Project detail snapshot as returned by `GET /projects/{ref}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Project {
    #[serde(rename = "ref")]
    pub project_ref: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub region: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub db_host: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub inserted_at: Option<String>,
}

impl Project {
    /// A project whose status is unknown is treated as usable.
    pub fn is_active(&self) -> bool {
        self.status.as_deref().map_or(true, |s| s == ACTIVE_HEALTHY)
    }
}

/// Body of a successful password update.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct PasswordUpdated {
    pub message: String,
}

#[async_trait]
pub trait ProjectApi: Send + Sync {
    /// `PATCH /projects/{ref}/db-password`. A server-reported failure comes back as
    /// `DbpassError::Api` whose display is the server's message.
    async fn update_db_password(
        &self,
        project_ref: &str,
        password: &SecretString,
    ) -> Result<PasswordUpdated>;

    /// `GET /projects/{ref}`. Returns `None` when the project does not exist.
    async fn get_project_detail(&self, project_ref: &str) -> Result<Option<Project>>;
}
