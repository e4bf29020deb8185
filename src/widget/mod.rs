//! Database password reset widget.
//!
//! `model` holds the dialog state, `update` is the pure transition function,
//! `view` projects the model for display and `runtime` executes side effects.

pub mod model;
pub mod runtime;
pub mod update;
pub mod view;

pub use model::{Phase, StrengthAssessment, WidgetProps, WidgetSettings};
pub use runtime::{Collaborators, PasswordResetWidget};
