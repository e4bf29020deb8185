pub mod generate;
pub mod init;
pub mod reset;
pub mod status;

use std::path::Path;
use std::sync::Arc;

use anyhow::{Context, Result};

use crate::api::{HttpProjectApi, ProjectApi};
use crate::collab::{ConfigPermissions, StaticRoute, TerminalNotifier};
use crate::config::{self, Config};
use crate::generator::RandomPasswordGenerator;
use crate::store::FileProjectStore;
use crate::strength::LocalStrengthEvaluator;
use crate::widget::{Collaborators, PasswordResetWidget, WidgetProps, WidgetSettings};

/// Wire the widget to the config in `root`, the HTTP API and the terminal.
pub async fn open_widget(
    root: &Path,
    cfg: &Config,
    project_ref: Option<String>,
) -> Result<PasswordResetWidget> {
    let project_ref = project_ref.or_else(|| cfg.project_ref.clone());
    let api = Arc::new(
        HttpProjectApi::new(&cfg.api_url, cfg.access_token(), cfg.timeout())
            .context("Failed to set up the API client")?,
    );

    let props = WidgetProps {
        disabled: project_unavailable(api.as_ref(), project_ref.as_deref()).await,
    };
    let settings = WidgetSettings {
        min_strength: cfg.min_strength,
        debounce: cfg.debounce(),
    };

    let collab = Collaborators {
        permissions: Arc::new(ConfigPermissions::new(&cfg.permissions)),
        route: Arc::new(StaticRoute::new(project_ref)),
        evaluator: Arc::new(LocalStrengthEvaluator::new(cfg.min_strength)),
        generator: Arc::new(RandomPasswordGenerator),
        api,
        store: Arc::new(FileProjectStore::new(config::project_path(root))),
        notifier: Arc::new(TerminalNotifier),
    };

    Ok(PasswordResetWidget::new(collab, props, settings))
}

/// The password can only be reset on a running database. Unknown state does not block.
async fn project_unavailable(api: &dyn ProjectApi, project_ref: Option<&str>) -> bool {
    let Some(project_ref) = project_ref else {
        return false;
    };
    match api.get_project_detail(project_ref).await {
        Ok(Some(project)) if !project.is_active() => {
            tracing::info!(
                %project_ref,
                status = project.status.as_deref().unwrap_or_default(),
                "project is not running; reset disabled"
            );
            true
        }
        Ok(Some(_)) => false,
        Ok(None) => {
            tracing::warn!(%project_ref, "project not found");
            false
        }
        Err(e) => {
            tracing::warn!(%project_ref, error = %e, "could not load project status");
            false
        }
    }
}
