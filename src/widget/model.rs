//! State, messages and commands for the reset dialog.

use std::fmt;
use std::time::Duration;

use secrecy::SecretString;
use zeroize::Zeroizing;

use crate::collab::{GenerateOptions, Notification};
use crate::config::{DEFAULT_DEBOUNCE_MS, DEFAULT_MIN_STRENGTH};

/// Score shown while the field is empty and nothing has been evaluated.
pub const EMPTY_SCORE: i32 = -1;

pub const PERMISSION_TOOLTIP: &str =
    "You need additional permissions to reset the database password";

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StrengthAssessment {
    pub score: i32,
    pub warning: String,
    pub message: String,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DialogState {
    pub visible: bool,
    pub submitting: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Closed,
    Idle,
    Submitting,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct WidgetProps {
    pub disabled: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WidgetSettings {
    pub min_strength: i32,
    pub debounce: Duration,
}

impl Default for WidgetSettings {
    fn default() -> Self {
        Self {
            min_strength: DEFAULT_MIN_STRENGTH,
            debounce: Duration::from_millis(DEFAULT_DEBOUNCE_MS),
        }
    }
}

pub struct ResetDialog {
    pub dialog: DialogState,
    pub password: Zeroizing<String>,
    pub strength: StrengthAssessment,
    pub can_reset: bool,
    pub project_ref: Option<String>,
    pub props: WidgetProps,
    pub settings: WidgetSettings,
    /// Sequence of the most recent strength request; older ones are stale.
    pub strength_seq: u64,
}

impl ResetDialog {
    pub fn new(
        can_reset: bool,
        project_ref: Option<String>,
        props: WidgetProps,
        settings: WidgetSettings,
    ) -> Self {
        Self {
            dialog: DialogState::default(),
            password: Zeroizing::new(String::new()),
            strength: StrengthAssessment::default(),
            can_reset,
            project_ref,
            props,
            settings,
            strength_seq: 0,
        }
    }

    pub fn phase(&self) -> Phase {
        match (self.dialog.visible, self.dialog.submitting) {
            (false, _) => Phase::Closed,
            (true, false) => Phase::Idle,
            (true, true) => Phase::Submitting,
        }
    }

    pub fn trigger_enabled(&self) -> bool {
        self.can_reset && !self.props.disabled
    }

    pub fn meets_threshold(&self) -> bool {
        self.strength.score >= self.settings.min_strength
    }
}

impl fmt::Debug for ResetDialog {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ResetDialog")
            .field("dialog", &self.dialog)
            .field("password", &"[REDACTED]")
            .field("strength", &self.strength)
            .field("can_reset", &self.can_reset)
            .field("project_ref", &self.project_ref)
            .field("strength_seq", &self.strength_seq)
            .finish()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmitOutcome {
    Updated { message: String },
    Failed { message: String },
}

#[derive(Debug)]
pub enum DialogMsg {
    TriggerClicked,
    CancelClicked,
    PasswordChanged(String),
    GenerateClicked,
    PasswordGenerated(String),
    GenerateFailed(String),
    ConfirmClicked,
    /// Debounce quiet period for request `seq` has elapsed.
    StrengthDue { seq: u64 },
    StrengthResolved {
        seq: u64,
        result: Result<StrengthAssessment, String>,
    },
    SubmitFinished(SubmitOutcome),
}

#[derive(Debug)]
pub enum DialogCmd {
    None,
    ScheduleStrength { seq: u64, delay: Duration },
    EvaluateStrength { seq: u64, candidate: SecretString },
    GeneratePassword(GenerateOptions),
    SubmitPassword {
        project_ref: String,
        password: SecretString,
    },
    Notify(Notification),
}
