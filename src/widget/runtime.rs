//! Async driver for the reset dialog.
//!
//! Owns the model and the collaborators, executes the commands `update` returns
//! and feeds completions back through a channel. Every spawned task reports exactly
//! one message, so `in_flight` tells whether anything is still outstanding. A task
//! that panics reports its fallback message instead.

use std::future::Future;
use std::sync::Arc;

use secrecy::{ExposeSecret, SecretString};
use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};
use tokio::task::JoinError;

use super::model::{DialogCmd, DialogMsg, ResetDialog, SubmitOutcome, WidgetProps, WidgetSettings};
use super::update::update;
use super::view::{self, WidgetView};
use crate::api::ProjectApi;
use crate::collab::{
    Notifier, PasswordGenerator, PermissionAction, PermissionCheck, RouteContext,
    StrengthEvaluator,
};
use crate::store::ProjectStore;

pub const RESOURCE_PROJECTS: &str = "projects";

pub struct Collaborators {
    pub permissions: Arc<dyn PermissionCheck>,
    pub route: Arc<dyn RouteContext>,
    pub evaluator: Arc<dyn StrengthEvaluator>,
    pub generator: Arc<dyn PasswordGenerator>,
    pub api: Arc<dyn ProjectApi>,
    pub store: Arc<dyn ProjectStore>,
    pub notifier: Arc<dyn Notifier>,
}

pub struct PasswordResetWidget {
    model: ResetDialog,
    collab: Collaborators,
    tx: UnboundedSender<DialogMsg>,
    rx: UnboundedReceiver<DialogMsg>,
    in_flight: usize,
}

impl PasswordResetWidget {
    pub fn new(collab: Collaborators, props: WidgetProps, settings: WidgetSettings) -> Self {
        let can_reset = collab
            .permissions
            .check(PermissionAction::Update, RESOURCE_PROJECTS);
        let project_ref = collab.route.project_ref();
        let (tx, rx) = mpsc::unbounded_channel();

        Self {
            model: ResetDialog::new(can_reset, project_ref, props, settings),
            collab,
            tx,
            rx,
            in_flight: 0,
        }
    }

    pub fn model(&self) -> &ResetDialog {
        &self.model
    }

    pub fn view(&self) -> WidgetView {
        view::view(&self.model)
    }

    pub fn click_trigger(&mut self) {
        self.dispatch(DialogMsg::TriggerClicked);
    }

    pub fn cancel(&mut self) {
        self.dispatch(DialogMsg::CancelClicked);
    }

    pub fn set_password(&mut self, value: impl Into<String>) {
        self.dispatch(DialogMsg::PasswordChanged(value.into()));
    }

    pub fn generate_strong_password(&mut self) {
        self.dispatch(DialogMsg::GenerateClicked);
    }

    pub fn confirm(&mut self) {
        self.dispatch(DialogMsg::ConfirmClicked);
    }

    /// True while a timer, evaluation or submission has yet to report back.
    pub fn is_busy(&self) -> bool {
        self.in_flight > 0
    }

    /// Wait for the next completion and apply it. Returns false when nothing is
    /// outstanding. Cancel-safe.
    pub async fn step(&mut self) -> bool {
        if self.in_flight == 0 {
            return false;
        }
        match self.rx.recv().await {
            Some(msg) => {
                self.in_flight -= 1;
                self.dispatch(msg);
                true
            }
            None => false,
        }
    }

    /// Drive until every outstanding task has reported back.
    pub async fn settle(&mut self) {
        while self.step().await {}
    }

    pub fn dispatch(&mut self, msg: DialogMsg) {
        let cmd = update(&mut self.model, msg);
        self.execute(cmd);
    }

    fn execute(&mut self, cmd: DialogCmd) {
        match cmd {
            DialogCmd::None => {}

            DialogCmd::ScheduleStrength { seq, delay } => self.spawn(
                async move {
                    tokio::time::sleep(delay).await;
                    DialogMsg::StrengthDue { seq }
                },
                move |_| DialogMsg::StrengthDue { seq },
            ),

            DialogCmd::EvaluateStrength { seq, candidate } => {
                let evaluator = Arc::clone(&self.collab.evaluator);
                self.spawn(
                    async move {
                        let result = evaluator
                            .evaluate(candidate.expose_secret())
                            .await
                            .map_err(|e| e.to_string());
                        DialogMsg::StrengthResolved { seq, result }
                    },
                    move |reason| DialogMsg::StrengthResolved {
                        seq,
                        result: Err(reason),
                    },
                )
            }

            DialogCmd::GeneratePassword(options) => {
                let msg = match self.collab.generator.generate(options) {
                    Ok(password) => DialogMsg::PasswordGenerated(password),
                    Err(e) => DialogMsg::GenerateFailed(e.to_string()),
                };
                self.dispatch(msg);
            }

            DialogCmd::SubmitPassword {
                project_ref,
                password,
            } => {
                let api = Arc::clone(&self.collab.api);
                let store = Arc::clone(&self.collab.store);
                self.spawn(submit(api, store, project_ref, password), |reason| {
                    DialogMsg::SubmitFinished(SubmitOutcome::Failed { message: reason })
                })
            }

            DialogCmd::Notify(notification) => self.collab.notifier.notify(notification),
        }
    }

    fn spawn<F, P>(&mut self, task: F, on_panic: P)
    where
        F: Future<Output = DialogMsg> + Send + 'static,
        P: FnOnce(String) -> DialogMsg + Send + 'static,
    {
        self.in_flight += 1;
        let tx = self.tx.clone();
        tokio::spawn(async move {
            let msg = match tokio::spawn(task).await {
                Ok(msg) => msg,
                Err(e) => {
                    let reason = panic_reason(e);
                    tracing::error!(%reason, "widget task failed");
                    on_panic(reason)
                }
            };
            // The widget may already be gone.
            let _ = tx.send(msg);
        });
    }
}

fn panic_reason(err: JoinError) -> String {
    if !err.is_panic() {
        return err.to_string();
    }
    let payload = err.into_panic();
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "task panicked".to_string()
    }
}

async fn submit(
    api: Arc<dyn ProjectApi>,
    store: Arc<dyn ProjectStore>,
    project_ref: String,
    password: SecretString,
) -> DialogMsg {
    let outcome = match api.update_db_password(&project_ref, &password).await {
        Ok(updated) => {
            match api.get_project_detail(&project_ref).await {
                Ok(Some(project)) => store.publish(project),
                Ok(None) => tracing::debug!(%project_ref, "no project detail to publish"),
                Err(e) => tracing::warn!(%project_ref, error = %e, "failed to refresh project detail"),
            }
            SubmitOutcome::Updated {
                message: updated.message,
            }
        }
        Err(e) => SubmitOutcome::Failed {
            message: e.to_string(),
        },
    };
    DialogMsg::SubmitFinished(outcome)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::sync::Mutex;
    use std::time::Duration;

    use async_trait::async_trait;

    use crate::api::{PasswordUpdated, Project};
    use crate::collab::{GenerateOptions, Notification, StaticRoute};
    use crate::error::{DbpassError, Result};
    use crate::generator::RandomPasswordGenerator;
    use crate::store::MemoryProjectStore;
    use crate::widget::model::{Phase, StrengthAssessment, EMPTY_SCORE};

    // ---- fakes ----

    struct AllowAll(bool);

    impl PermissionCheck for AllowAll {
        fn check(&self, _action: PermissionAction, _resource: &str) -> bool {
            self.0
        }
    }

    /// Scores by lookup (default 3), echoes the candidate as the message and
    /// sleeps for the configured per-candidate delay.
    #[derive(Default)]
    struct ScriptedEvaluator {
        scores: HashMap<String, i32>,
        delays: HashMap<String, Duration>,
        failing: bool,
        calls: Mutex<Vec<String>>,
    }

    impl ScriptedEvaluator {
        fn calls(&self) -> Vec<String> {
            self.calls.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl StrengthEvaluator for ScriptedEvaluator {
        async fn evaluate(&self, candidate: &str) -> Result<StrengthAssessment> {
            self.calls.lock().unwrap().push(candidate.to_string());
            if let Some(delay) = self.delays.get(candidate) {
                tokio::time::sleep(*delay).await;
            }
            if self.failing {
                return Err(DbpassError::Strength("evaluator offline".into()));
            }
            Ok(StrengthAssessment {
                score: self.scores.get(candidate).copied().unwrap_or(3),
                warning: String::new(),
                message: candidate.to_string(),
            })
        }
    }

    struct SequenceGenerator(Mutex<Vec<String>>);

    impl PasswordGenerator for SequenceGenerator {
        fn generate(&self, _options: GenerateOptions) -> Result<String> {
            let mut queue = self.0.lock().unwrap();
            if queue.is_empty() {
                return Err(DbpassError::Generator("exhausted".into()));
            }
            Ok(queue.remove(0))
        }
    }

    struct FakeApi {
        update_result: std::result::Result<String, String>,
        latency: Duration,
        patches: Mutex<Vec<(String, String)>>,
        detail_fetches: Mutex<usize>,
    }

    impl FakeApi {
        fn ok(message: &str) -> Self {
            Self {
                update_result: Ok(message.into()),
                latency: Duration::from_millis(50),
                patches: Mutex::new(Vec::new()),
                detail_fetches: Mutex::new(0),
            }
        }

        fn failing(message: &str) -> Self {
            Self {
                update_result: Err(message.into()),
                ..Self::ok("")
            }
        }

        fn patches(&self) -> Vec<(String, String)> {
            self.patches.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl ProjectApi for FakeApi {
        async fn update_db_password(
            &self,
            project_ref: &str,
            password: &SecretString,
        ) -> Result<PasswordUpdated> {
            self.patches
                .lock()
                .unwrap()
                .push((project_ref.into(), password.expose_secret().clone()));
            tokio::time::sleep(self.latency).await;
            match &self.update_result {
                Ok(message) => Ok(PasswordUpdated {
                    message: message.clone(),
                }),
                Err(message) => Err(DbpassError::Api {
                    status: 429,
                    message: message.clone(),
                }),
            }
        }

        async fn get_project_detail(&self, project_ref: &str) -> Result<Option<Project>> {
            *self.detail_fetches.lock().unwrap() += 1;
            Ok(Some(project(project_ref)))
        }
    }

    #[derive(Default)]
    struct RecordingNotifier(Mutex<Vec<Notification>>);

    impl RecordingNotifier {
        fn all(&self) -> Vec<Notification> {
            self.0.lock().unwrap().clone()
        }
    }

    impl Notifier for RecordingNotifier {
        fn notify(&self, notification: Notification) {
            self.0.lock().unwrap().push(notification);
        }
    }

    fn project(project_ref: &str) -> Project {
        Project {
            project_ref: project_ref.into(),
            name: "billing".into(),
            status: Some("ACTIVE_HEALTHY".into()),
            region: None,
            db_host: None,
            inserted_at: None,
        }
    }

    struct Harness {
        widget: PasswordResetWidget,
        evaluator: Arc<ScriptedEvaluator>,
        api: Arc<FakeApi>,
        store: Arc<MemoryProjectStore>,
        notifier: Arc<RecordingNotifier>,
    }

    fn harness_with(
        evaluator: ScriptedEvaluator,
        api: FakeApi,
        project_ref: Option<&str>,
        generator: Arc<dyn PasswordGenerator>,
    ) -> Harness {
        let evaluator = Arc::new(evaluator);
        let api = Arc::new(api);
        let store = Arc::new(MemoryProjectStore::new());
        let notifier = Arc::new(RecordingNotifier::default());

        let collab = Collaborators {
            permissions: Arc::new(AllowAll(true)),
            route: Arc::new(StaticRoute::new(project_ref.map(String::from))),
            evaluator: evaluator.clone(),
            generator,
            api: api.clone(),
            store: store.clone(),
            notifier: notifier.clone(),
        };

        Harness {
            widget: PasswordResetWidget::new(
                collab,
                WidgetProps::default(),
                WidgetSettings::default(),
            ),
            evaluator,
            api,
            store,
            notifier,
        }
    }

    fn harness() -> Harness {
        harness_with(
            ScriptedEvaluator::default(),
            FakeApi::ok("Password updated"),
            Some("abc123"),
            Arc::new(RandomPasswordGenerator),
        )
    }

    // ---- debounce ----

    #[tokio::test(start_paused = true)]
    async fn test_each_settled_value_is_evaluated_once() {
        let mut h = harness();
        h.widget.click_trigger();

        h.widget.set_password("alpha");
        h.widget.settle().await;
        h.widget.set_password("alphabet");
        h.widget.settle().await;

        assert_eq!(h.evaluator.calls(), vec!["alpha", "alphabet"]);
        assert_eq!(h.widget.model().strength.message, "alphabet");
    }

    #[tokio::test(start_paused = true)]
    async fn test_rapid_changes_coalesce_to_last_value() {
        let mut h = harness();
        h.widget.click_trigger();

        h.widget.set_password("a");
        h.widget.set_password("ab");
        tokio::time::advance(Duration::from_millis(299)).await;
        h.widget.set_password("abc");
        h.widget.settle().await;

        assert_eq!(h.evaluator.calls(), vec!["abc"]);
        assert_eq!(h.widget.model().strength.message, "abc");
    }

    #[tokio::test(start_paused = true)]
    async fn test_draft_updates_before_evaluation() {
        let mut h = harness();
        h.widget.click_trigger();

        h.widget.set_password("typed");
        assert_eq!(h.widget.model().password.as_str(), "typed");
        assert_eq!(h.widget.model().strength.score, 0);
        assert!(h.evaluator.calls().is_empty());
        assert!(h.widget.is_busy());
    }

    #[tokio::test(start_paused = true)]
    async fn test_clearing_is_immediate_and_cancels_pending() {
        let mut h = harness();
        h.widget.click_trigger();

        h.widget.set_password("x");
        h.widget.set_password("");
        assert_eq!(h.widget.model().strength.score, EMPTY_SCORE);
        assert_eq!(h.widget.model().strength.message, "");

        h.widget.settle().await;
        assert!(h.evaluator.calls().is_empty());
        assert_eq!(h.widget.model().strength.score, EMPTY_SCORE);
    }

    #[tokio::test(start_paused = true)]
    async fn test_slow_older_result_never_overwrites_newer() {
        let mut evaluator = ScriptedEvaluator::default();
        evaluator
            .delays
            .insert("first".into(), Duration::from_millis(1000));
        evaluator
            .delays
            .insert("second".into(), Duration::from_millis(10));
        evaluator.scores.insert("first".into(), 1);
        evaluator.scores.insert("second".into(), 4);

        let mut h = harness_with(
            evaluator,
            FakeApi::ok("ok"),
            Some("abc123"),
            Arc::new(RandomPasswordGenerator),
        );
        h.widget.click_trigger();

        h.widget.set_password("first");
        // Debounce fires and the slow evaluation is dispatched.
        assert!(h.widget.step().await);

        h.widget.set_password("second");
        h.widget.settle().await;

        assert_eq!(h.evaluator.calls(), vec!["first", "second"]);
        assert_eq!(h.widget.model().strength.score, 4);
        assert_eq!(h.widget.model().strength.message, "second");
    }

    #[tokio::test(start_paused = true)]
    async fn test_evaluator_failure_leaves_assessment_untouched() {
        let mut h = harness_with(
            ScriptedEvaluator {
                failing: true,
                ..ScriptedEvaluator::default()
            },
            FakeApi::ok("ok"),
            Some("abc123"),
            Arc::new(RandomPasswordGenerator),
        );
        h.widget.click_trigger();
        h.widget.set_password("anything");
        h.widget.settle().await;

        assert_eq!(h.evaluator.calls(), vec!["anything"]);
        assert_eq!(h.widget.model().strength, StrengthAssessment::default());
        assert_eq!(h.widget.model().phase(), Phase::Idle);
        assert!(h.notifier.all().is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn test_reopening_discards_previous_session() {
        let mut h = harness();
        h.widget.click_trigger();
        h.widget.set_password("leftover");
        h.widget.cancel();
        h.widget.click_trigger();
        h.widget.settle().await;

        assert!(h.evaluator.calls().is_empty());
        assert_eq!(h.widget.model().password.as_str(), "");
        assert_eq!(h.widget.model().strength, StrengthAssessment::default());
    }

    // ---- generator ----

    #[tokio::test(start_paused = true)]
    async fn test_generated_password_goes_through_debounce() {
        let mut h = harness();
        h.widget.click_trigger();
        h.widget.generate_strong_password();

        let generated = h.widget.model().password.as_str().to_owned();
        assert_eq!(generated.len(), 16);
        assert!(generated.chars().any(|c| c.is_ascii_digit()));
        assert!(generated.chars().any(|c| c.is_ascii_uppercase()));
        assert!(h.evaluator.calls().is_empty());

        h.widget.settle().await;
        assert_eq!(h.evaluator.calls(), vec![generated.clone()]);
        assert_eq!(h.widget.model().strength.message, generated);
    }

    #[tokio::test(start_paused = true)]
    async fn test_generating_twice_gives_independent_evaluations() {
        let generator = Arc::new(SequenceGenerator(Mutex::new(vec![
            "GenOne1abcdefghi".into(),
            "GenTwo2jklmnopqr".into(),
        ])));
        let mut h = harness_with(
            ScriptedEvaluator::default(),
            FakeApi::ok("ok"),
            Some("abc123"),
            generator,
        );
        h.widget.click_trigger();

        h.widget.generate_strong_password();
        h.widget.settle().await;
        assert_eq!(h.widget.model().strength.message, "GenOne1abcdefghi");

        h.widget.generate_strong_password();
        assert_eq!(h.widget.model().password.as_str(), "GenTwo2jklmnopqr");
        h.widget.settle().await;
        assert_eq!(h.widget.model().strength.message, "GenTwo2jklmnopqr");
        assert_eq!(
            h.evaluator.calls(),
            vec!["GenOne1abcdefghi", "GenTwo2jklmnopqr"]
        );
    }

    #[tokio::test(start_paused = true)]
    async fn test_generator_failure_notifies_and_keeps_draft() {
        let mut h = harness_with(
            ScriptedEvaluator::default(),
            FakeApi::ok("ok"),
            Some("abc123"),
            Arc::new(SequenceGenerator(Mutex::new(Vec::new()))),
        );
        h.widget.click_trigger();
        h.widget.set_password("mine");
        h.widget.generate_strong_password();

        assert_eq!(h.widget.model().password.as_str(), "mine");
        assert_eq!(
            h.notifier.all(),
            vec![Notification::error("Failed to generate password: exhausted")]
        );
    }

    // ---- submission ----

    #[tokio::test(start_paused = true)]
    async fn test_successful_reset_publishes_notifies_and_closes() {
        let mut h = harness();
        h.widget.click_trigger();
        h.widget.set_password("Tr0ub4dor&3");
        h.widget.settle().await;

        h.widget.confirm();
        assert_eq!(h.widget.model().phase(), Phase::Submitting);
        // Duplicate confirm while in flight.
        h.widget.confirm();
        h.widget.settle().await;

        assert_eq!(
            h.api.patches(),
            vec![("abc123".to_string(), "Tr0ub4dor&3".to_string())]
        );
        assert_eq!(*h.api.detail_fetches.lock().unwrap(), 1);
        assert_eq!(h.store.latest(), Some(project("abc123")));
        assert_eq!(
            h.notifier.all(),
            vec![Notification::success("Password updated")]
        );
        assert_eq!(h.widget.model().phase(), Phase::Closed);
        assert!(!h.widget.model().dialog.submitting);
    }

    #[tokio::test(start_paused = true)]
    async fn test_failed_reset_keeps_dialog_open() {
        let mut h = harness_with(
            ScriptedEvaluator::default(),
            FakeApi::failing("rate limited"),
            Some("abc123"),
            Arc::new(RandomPasswordGenerator),
        );
        h.widget.click_trigger();
        h.widget.set_password("Tr0ub4dor&3");
        h.widget.settle().await;

        h.widget.confirm();
        h.widget.settle().await;

        assert_eq!(h.api.patches().len(), 1);
        assert_eq!(*h.api.detail_fetches.lock().unwrap(), 0);
        assert!(h.store.latest().is_none());
        assert_eq!(
            h.notifier.all(),
            vec![Notification::error("Failed to reset password: rate limited")]
        );
        assert_eq!(h.widget.model().phase(), Phase::Idle);
        assert_eq!(h.widget.model().password.as_str(), "Tr0ub4dor&3");
        assert!(!h.widget.model().dialog.submitting);
    }

    #[tokio::test(start_paused = true)]
    async fn test_confirm_without_project_ref_makes_no_call() {
        let mut h = harness_with(
            ScriptedEvaluator::default(),
            FakeApi::ok("ok"),
            None,
            Arc::new(RandomPasswordGenerator),
        );
        h.widget.click_trigger();
        h.widget.set_password("Tr0ub4dor&3");
        h.widget.settle().await;

        h.widget.confirm();
        assert!(!h.widget.model().dialog.submitting);
        h.widget.settle().await;
        assert!(h.api.patches().is_empty());
        assert!(h.notifier.all().is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn test_confirm_below_threshold_makes_no_call() {
        let mut evaluator = ScriptedEvaluator::default();
        evaluator.scores.insert("weak".into(), 2);
        let mut h = harness_with(
            evaluator,
            FakeApi::ok("ok"),
            Some("abc123"),
            Arc::new(RandomPasswordGenerator),
        );
        h.widget.click_trigger();
        h.widget.set_password("weak");
        h.widget.settle().await;

        h.widget.confirm();
        h.widget.settle().await;
        assert!(h.api.patches().is_empty());
        assert_eq!(h.widget.model().phase(), Phase::Idle);
    }

    #[tokio::test(start_paused = true)]
    async fn test_permission_denied_keeps_trigger_closed() {
        let collab = Collaborators {
            permissions: Arc::new(AllowAll(false)),
            route: Arc::new(StaticRoute::new(Some("abc123".into()))),
            evaluator: Arc::new(ScriptedEvaluator::default()),
            generator: Arc::new(RandomPasswordGenerator),
            api: Arc::new(FakeApi::ok("ok")),
            store: Arc::new(MemoryProjectStore::new()),
            notifier: Arc::new(RecordingNotifier::default()),
        };
        let mut widget =
            PasswordResetWidget::new(collab, WidgetProps::default(), WidgetSettings::default());

        widget.click_trigger();
        let view = widget.view();
        assert!(view.trigger.disabled);
        assert!(view.trigger.tooltip.is_some());
        assert!(view.dialog.is_none());
    }

    // ---- panicking collaborators ----

    struct PanickingEvaluator;

    #[async_trait]
    impl StrengthEvaluator for PanickingEvaluator {
        async fn evaluate(&self, _candidate: &str) -> Result<StrengthAssessment> {
            panic!("scorer blew up");
        }
    }

    struct PanickingApi;

    #[async_trait]
    impl ProjectApi for PanickingApi {
        async fn update_db_password(
            &self,
            _project_ref: &str,
            _password: &SecretString,
        ) -> Result<PasswordUpdated> {
            panic!("connection pool poisoned");
        }

        async fn get_project_detail(&self, _project_ref: &str) -> Result<Option<Project>> {
            Ok(None)
        }
    }

    fn widget_with(
        evaluator: Arc<dyn StrengthEvaluator>,
        api: Arc<dyn ProjectApi>,
        notifier: Arc<RecordingNotifier>,
    ) -> PasswordResetWidget {
        let collab = Collaborators {
            permissions: Arc::new(AllowAll(true)),
            route: Arc::new(StaticRoute::new(Some("abc123".into()))),
            evaluator,
            generator: Arc::new(RandomPasswordGenerator),
            api,
            store: Arc::new(MemoryProjectStore::new()),
            notifier,
        };
        PasswordResetWidget::new(collab, WidgetProps::default(), WidgetSettings::default())
    }

    #[tokio::test(start_paused = true)]
    async fn test_panicking_evaluator_still_settles() {
        let notifier = Arc::new(RecordingNotifier::default());
        let mut widget = widget_with(
            Arc::new(PanickingEvaluator),
            Arc::new(FakeApi::ok("ok")),
            notifier.clone(),
        );
        widget.click_trigger();
        widget.set_password("Tr0ub4dor&3");

        tokio::time::timeout(Duration::from_secs(5), widget.settle())
            .await
            .expect("settle returns after the evaluator panics");

        assert!(!widget.is_busy());
        assert_eq!(widget.model().phase(), Phase::Idle);
        assert_eq!(widget.model().strength, StrengthAssessment::default());
        assert!(notifier.all().is_empty());

        // The widget keeps working afterwards.
        widget.set_password("");
        assert_eq!(widget.model().strength.score, EMPTY_SCORE);
    }

    #[tokio::test(start_paused = true)]
    async fn test_panicking_api_reports_failed_reset() {
        let notifier = Arc::new(RecordingNotifier::default());
        let mut widget = widget_with(
            Arc::new(ScriptedEvaluator::default()),
            Arc::new(PanickingApi),
            notifier.clone(),
        );
        widget.click_trigger();
        widget.set_password("Tr0ub4dor&3");
        widget.settle().await;

        widget.confirm();
        tokio::time::timeout(Duration::from_secs(5), widget.settle())
            .await
            .expect("settle returns after the api panics");

        assert!(!widget.is_busy());
        assert_eq!(widget.model().phase(), Phase::Idle);
        assert!(!widget.model().dialog.submitting);
        assert_eq!(
            notifier.all(),
            vec![Notification::error(
                "Failed to reset password: connection pool poisoned"
            )]
        );
    }

    // ---- against a real HTTP server ----

    mod http {
        use super::*;
        use crate::api::HttpProjectApi;
        use crate::strength::LocalStrengthEvaluator;
        use serde_json::json;
        use wiremock::matchers::{body_json, method, path};
        use wiremock::{Mock, MockServer, ResponseTemplate};

        fn widget_for(
            server: &MockServer,
            notifier: Arc<RecordingNotifier>,
            store: Arc<MemoryProjectStore>,
        ) -> PasswordResetWidget {
            let api =
                HttpProjectApi::new(&server.uri(), None, Duration::from_secs(5)).unwrap();
            let collab = Collaborators {
                permissions: Arc::new(AllowAll(true)),
                route: Arc::new(StaticRoute::new(Some("abc123".into()))),
                evaluator: Arc::new(LocalStrengthEvaluator::new(3)),
                generator: Arc::new(RandomPasswordGenerator),
                api: Arc::new(api),
                store,
                notifier,
            };
            PasswordResetWidget::new(
                collab,
                WidgetProps::default(),
                WidgetSettings {
                    min_strength: 3,
                    debounce: Duration::from_millis(10),
                },
            )
        }

        #[tokio::test]
        async fn test_reset_round_trip_success() {
            let server = MockServer::start().await;
            Mock::given(method("PATCH"))
                .and(path("/projects/abc123/db-password"))
                .and(body_json(json!({ "password": "Tr0ub4dor&3" })))
                .respond_with(
                    ResponseTemplate::new(200)
                        .set_body_json(json!({ "message": "Password updated" })),
                )
                .expect(1)
                .mount(&server)
                .await;
            Mock::given(method("GET"))
                .and(path("/projects/abc123"))
                .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                    "ref": "abc123",
                    "name": "billing",
                    "status": "ACTIVE_HEALTHY"
                })))
                .mount(&server)
                .await;

            let notifier = Arc::new(RecordingNotifier::default());
            let store = Arc::new(MemoryProjectStore::new());
            let mut widget = widget_for(&server, notifier.clone(), store.clone());

            widget.click_trigger();
            widget.set_password("Tr0ub4dor&3");
            widget.settle().await;
            assert_eq!(widget.model().strength.score, 3);

            widget.confirm();
            widget.settle().await;

            assert_eq!(
                notifier.all(),
                vec![Notification::success("Password updated")]
            );
            assert_eq!(widget.model().phase(), Phase::Closed);
            assert_eq!(store.latest().unwrap().name, "billing");
        }

        #[tokio::test]
        async fn test_reset_round_trip_failure() {
            let server = MockServer::start().await;
            Mock::given(method("PATCH"))
                .and(path("/projects/abc123/db-password"))
                .respond_with(
                    ResponseTemplate::new(429)
                        .set_body_json(json!({ "error": { "message": "rate limited" } })),
                )
                .expect(1)
                .mount(&server)
                .await;

            let notifier = Arc::new(RecordingNotifier::default());
            let store = Arc::new(MemoryProjectStore::new());
            let mut widget = widget_for(&server, notifier.clone(), store.clone());

            widget.click_trigger();
            widget.set_password("Tr0ub4dor&3");
            widget.settle().await;
            widget.confirm();
            widget.settle().await;

            assert_eq!(
                notifier.all(),
                vec![Notification::error("Failed to reset password: rate limited")]
            );
            assert_eq!(widget.model().phase(), Phase::Idle);
            assert_eq!(widget.model().password.as_str(), "Tr0ub4dor&3");
            assert!(store.latest().is_none());
        }
    }
}
