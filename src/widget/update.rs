//! Pure transition function for the reset dialog.
//!
//! `update()` mutates the model and describes side effects as a [`DialogCmd`];
//! it performs no I/O. The runtime executes the command and feeds results back in
//! as further messages.

use secrecy::SecretString;
use zeroize::Zeroizing;

use super::model::{
    DialogCmd, DialogMsg, Phase, ResetDialog, StrengthAssessment, SubmitOutcome, EMPTY_SCORE,
};
use crate::collab::Notification;
use crate::generator::STRONG_PASSWORD;

pub fn update(model: &mut ResetDialog, msg: DialogMsg) -> DialogCmd {
    match msg {
        DialogMsg::TriggerClicked => {
            if !model.trigger_enabled() || model.dialog.visible {
                return DialogCmd::None;
            }
            model.dialog.visible = true;
            model.dialog.submitting = false;
            model.password = Zeroizing::new(String::new());
            model.strength = StrengthAssessment::default();
            // Anything still pending belongs to the previous session.
            model.strength_seq += 1;
            tracing::debug!("reset dialog opened");
            DialogCmd::None
        }

        DialogMsg::CancelClicked => {
            if model.phase() != Phase::Idle {
                return DialogCmd::None;
            }
            model.dialog.visible = false;
            tracing::debug!("reset dialog cancelled");
            DialogCmd::None
        }

        DialogMsg::PasswordChanged(value) => {
            if !model.dialog.visible {
                return DialogCmd::None;
            }
            set_password(model, value)
        }

        DialogMsg::GenerateClicked => {
            if !model.dialog.visible {
                return DialogCmd::None;
            }
            DialogCmd::GeneratePassword(STRONG_PASSWORD)
        }

        DialogMsg::PasswordGenerated(value) => {
            if !model.dialog.visible {
                return DialogCmd::None;
            }
            set_password(model, value)
        }

        DialogMsg::GenerateFailed(reason) => {
            tracing::warn!(%reason, "password generator failed");
            DialogCmd::Notify(Notification::error(format!(
                "Failed to generate password: {reason}"
            )))
        }

        DialogMsg::ConfirmClicked => {
            if model.phase() != Phase::Idle {
                return DialogCmd::None;
            }
            let Some(project_ref) = model.project_ref.clone() else {
                tracing::debug!("confirm ignored: no project ref");
                return DialogCmd::None;
            };
            if !model.meets_threshold() {
                tracing::debug!(
                    score = model.strength.score,
                    min = model.settings.min_strength,
                    "confirm ignored: password below minimum strength"
                );
                return DialogCmd::None;
            }
            model.dialog.submitting = true;
            tracing::debug!(%project_ref, "submitting new database password");
            DialogCmd::SubmitPassword {
                project_ref,
                password: SecretString::new(model.password.as_str().to_owned()),
            }
        }

        DialogMsg::StrengthDue { seq } => {
            if seq != model.strength_seq || !model.dialog.visible {
                tracing::trace!(seq, latest = model.strength_seq, "debounce superseded");
                return DialogCmd::None;
            }
            DialogCmd::EvaluateStrength {
                seq,
                candidate: SecretString::new(model.password.as_str().to_owned()),
            }
        }

        DialogMsg::StrengthResolved { seq, result } => {
            if seq != model.strength_seq || !model.dialog.visible {
                tracing::trace!(seq, latest = model.strength_seq, "stale strength result dropped");
                return DialogCmd::None;
            }
            match result {
                Ok(assessment) => model.strength = assessment,
                Err(reason) => tracing::warn!(%reason, "strength evaluation failed"),
            }
            DialogCmd::None
        }

        DialogMsg::SubmitFinished(outcome) => {
            model.dialog.submitting = false;
            match outcome {
                SubmitOutcome::Updated { message } => {
                    model.dialog.visible = false;
                    tracing::info!("database password reset");
                    DialogCmd::Notify(Notification::success(message))
                }
                SubmitOutcome::Failed { message } => {
                    tracing::warn!(%message, "database password reset failed");
                    DialogCmd::Notify(Notification::error(format!(
                        "Failed to reset password: {message}"
                    )))
                }
            }
        }
    }
}

fn set_password(model: &mut ResetDialog, value: String) -> DialogCmd {
    let empty = value.is_empty();
    model.password = Zeroizing::new(value);
    model.strength_seq += 1;

    if empty {
        model.strength.score = EMPTY_SCORE;
        model.strength.message.clear();
        return DialogCmd::None;
    }

    DialogCmd::ScheduleStrength {
        seq: model.strength_seq,
        delay: model.settings.debounce,
    }
}
