//! Collaborator seams consumed by the reset widget.
//!
//! The widget only talks to these traits plus `api::ProjectApi` and
//! `store::ProjectStore`. Concrete implementations live next to their concern
//! (`strength`, `generator`) or below for the small ones.

use std::fmt;

use async_trait::async_trait;

use crate::error::Result;
use crate::widget::StrengthAssessment;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PermissionAction {
    Update,
}

impl PermissionAction {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Update => "update",
        }
    }
}

impl fmt::Display for PermissionAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

pub trait PermissionCheck: Send + Sync {
    fn check(&self, action: PermissionAction, resource: &str) -> bool;
}

/// Supplies the project the operator is currently looking at.
pub trait RouteContext: Send + Sync {
    fn project_ref(&self) -> Option<String>;
}

#[async_trait]
pub trait StrengthEvaluator: Send + Sync {
    /// Score a candidate password. Pure: identical input gives identical output.
    async fn evaluate(&self, candidate: &str) -> Result<StrengthAssessment>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GenerateOptions {
    pub length: usize,
    pub numbers: bool,
    pub uppercase: bool,
}

pub trait PasswordGenerator: Send + Sync {
    fn generate(&self, options: GenerateOptions) -> Result<String>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotificationCategory {
    Success,
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub category: NotificationCategory,
    pub message: String,
}

impl Notification {
    pub fn success(message: impl Into<String>) -> Self {
        Self {
            category: NotificationCategory::Success,
            message: message.into(),
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            category: NotificationCategory::Error,
            message: message.into(),
        }
    }
}

pub trait Notifier: Send + Sync {
    fn notify(&self, notification: Notification);
}

/// Answers permission checks from `action:resource` grants, `*` matching anything.
pub struct ConfigPermissions {
    grants: Vec<(String, String)>,
}

impl ConfigPermissions {
    pub fn new(entries: &[String]) -> Self {
        let grants = entries
            .iter()
            .filter_map(|entry| {
                let (action, resource) = entry.split_once(':')?;
                Some((
                    action.trim().to_ascii_lowercase(),
                    resource.trim().to_ascii_lowercase(),
                ))
            })
            .collect();
        Self { grants }
    }
}

impl PermissionCheck for ConfigPermissions {
    fn check(&self, action: PermissionAction, resource: &str) -> bool {
        let resource = resource.to_ascii_lowercase();
        self.grants.iter().any(|(a, r)| {
            (a == "*" || a == action.as_str()) && (r == "*" || *r == resource)
        })
    }
}

pub struct StaticRoute {
    project_ref: Option<String>,
}

impl StaticRoute {
    pub fn new(project_ref: Option<String>) -> Self {
        Self {
            project_ref: project_ref.filter(|r| !r.trim().is_empty()),
        }
    }
}

impl RouteContext for StaticRoute {
    fn project_ref(&self) -> Option<String> {
        self.project_ref.clone()
    }
}

pub struct TerminalNotifier;

impl Notifier for TerminalNotifier {
    fn notify(&self, notification: Notification) {
        match notification.category {
            NotificationCategory::Success => println!("✓ {}", notification.message),
            NotificationCategory::Error => eprintln!("✗ {}", notification.message),
        }
    }
}
