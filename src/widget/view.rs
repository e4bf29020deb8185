//! Read-only projection of the dialog model, plus a plain-text rendering.

use std::fmt::Write;

use super::model::{Phase, ResetDialog, EMPTY_SCORE, PERMISSION_TOOLTIP};
use crate::strength::MAX_SCORE;

pub const PANEL_TITLE: &str = "Database password";
pub const PANEL_DESCRIPTION: &str =
    "You can use this password to connect directly to your Postgres database.";
pub const TRIGGER_LABEL: &str = "Reset Database Password";
pub const DIALOG_TITLE: &str = "Reset database password";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TriggerView {
    pub label: &'static str,
    pub disabled: bool,
    pub tooltip: Option<&'static str>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StrengthBarView {
    pub score: i32,
    pub max: i32,
    pub message: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DialogView {
    pub title: &'static str,
    pub loading: bool,
    /// Masked rendition of the draft; never the value itself.
    pub masked_password: String,
    pub can_copy: bool,
    pub error: Option<String>,
    pub strength: Option<StrengthBarView>,
    pub cancel_disabled: bool,
    pub confirm_disabled: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WidgetView {
    pub title: &'static str,
    pub description: &'static str,
    pub trigger: TriggerView,
    pub dialog: Option<DialogView>,
}

pub fn view(model: &ResetDialog) -> WidgetView {
    let trigger = TriggerView {
        label: TRIGGER_LABEL,
        disabled: !model.trigger_enabled(),
        tooltip: (!model.can_reset).then_some(PERMISSION_TOOLTIP),
    };

    let dialog = model.dialog.visible.then(|| {
        let submitting = model.phase() == Phase::Submitting;
        let has_password = !model.password.is_empty();
        DialogView {
            title: DIALOG_TITLE,
            loading: submitting,
            masked_password: "•".repeat(model.password.chars().count()),
            can_copy: has_password,
            error: Some(model.strength.warning.clone()).filter(|w| !w.is_empty()),
            strength: (has_password && model.strength.score != EMPTY_SCORE).then(|| {
                StrengthBarView {
                    score: model.strength.score,
                    max: MAX_SCORE,
                    message: model.strength.message.clone(),
                }
            }),
            cancel_disabled: submitting,
            confirm_disabled: submitting || !model.meets_threshold(),
        }
    });

    WidgetView {
        title: PANEL_TITLE,
        description: PANEL_DESCRIPTION,
        trigger,
        dialog,
    }
}

/// Render the settings panel: title, description and the trigger button.
pub fn render_panel(view: &WidgetView) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{}", view.title);
    let _ = writeln!(out, "  {}", view.description);
    let state = if view.trigger.disabled {
        "disabled"
    } else {
        "available"
    };
    let _ = writeln!(out, "  [ {} ] ({})", view.trigger.label, state);
    if let Some(tooltip) = view.trigger.tooltip {
        let _ = writeln!(out, "  ⓘ {}", tooltip);
    }
    out
}

/// Render the open dialog, or an empty string when it is closed.
pub fn render_dialog(view: &WidgetView) -> String {
    let Some(dialog) = &view.dialog else {
        return String::new();
    };

    let mut out = String::new();
    let _ = writeln!(out, "── {} ──", dialog.title);
    if dialog.masked_password.is_empty() {
        let _ = writeln!(out, "  Password: (empty)");
    } else {
        let _ = writeln!(out, "  Password: {}", dialog.masked_password);
    }
    if let Some(bar) = &dialog.strength {
        let filled = bar.score.clamp(0, bar.max) as usize;
        let empty = (bar.max as usize).saturating_sub(filled);
        let _ = writeln!(
            out,
            "  Strength: {}{} {}",
            "■".repeat(filled),
            "□".repeat(empty),
            bar.message
        );
    }
    if let Some(error) = &dialog.error {
        let _ = writeln!(out, "  ! {}", error);
    }
    if dialog.loading {
        let _ = writeln!(out, "  Resetting password…");
    } else {
        let confirm = if dialog.confirm_disabled {
            "/confirm (needs a stronger password)"
        } else {
            "/confirm"
        };
        let _ = writeln!(out, "  /generate  /show  {}  /cancel", confirm);
    }
    out
}
