//! Button whose action is an async task.

use crate::error::ExecutionError;
use crate::execution::{
    AsyncAction, AsyncButtonOptions, Execution, ExecutionConfig, ExecutionState,
};
use futures::FutureExt;
use ratatui::style::{Color, Modifier, Style};
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;
use tokio_stream::wrappers::WatchStream;
use veneer_core::action::Action;
use veneer_core::environment::{Environment, EnvironmentKey};
use veneer_core::view::{AnyView, BoxedView, View};

/// Semantic role of a button, reflected in how it is drawn.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ButtonRole {
    /// Backs out of an operation. Drawn dimmed.
    Cancel,
    /// Deletes or otherwise destroys data. Drawn in red.
    Destructive,
}

/// Whether the enclosing async button is showing its loading indicator.
///
/// Set for the button's label, so a label can swap its own content while
/// the action runs.
pub struct IsLoading;

impl EnvironmentKey for IsLoading {
    type Value = bool;

    fn default_value() -> bool {
        false
    }
}

/// A button that runs an async action on activation.
///
/// Activating the button while a run is in flight aborts that run and starts
/// a new one. While running the button is disabled, unless
/// [`AsyncButtonOptions::ENABLED_DURING_EXECUTION`] is set, and after
/// [`ExecutionConfig::indicator_delay`] it shows a loading marker, unless
/// [`AsyncButtonOptions::LOADING_INDICATOR_HIDDEN`] is set. Dropping the
/// button aborts its run unless the run was started with
/// [`AsyncButtonOptions::DETACHES_TASK`].
///
/// ```rust
/// use veneer_controls::async_button::AsyncButton;
/// use veneer_core::testing::render_view;
/// use veneer_core::Environment;
///
/// let button = AsyncButton::new("Save", || async {});
/// assert_eq!(render_view(&button, &Environment::new(), 6, 1), "[Save]");
/// ```
pub struct AsyncButton {
    label: BoxedView,
    action: AsyncAction,
    role: Option<ButtonRole>,
    options: AsyncButtonOptions,
    execution: Arc<Execution>,
}

impl AsyncButton {
    /// A button showing `label` that runs `action` when activated.
    pub fn new<F, Fut>(label: impl View + 'static, action: F) -> Self
    where
        F: Fn() -> Fut + Send + Sync + 'static,
        Fut: Future<Output = ()> + Send + 'static,
    {
        Self {
            label: Box::new(label),
            action: Arc::new(move || action().boxed()),
            role: None,
            options: AsyncButtonOptions::empty(),
            execution: Arc::new(Execution::new()),
        }
    }

    /// Set the button's role.
    pub fn role(mut self, role: ButtonRole) -> Self {
        self.role = Some(role);
        self
    }

    /// Set behaviour options for subsequent runs.
    pub fn options(mut self, options: AsyncButtonOptions) -> Self {
        self.options = options;
        self
    }

    /// How long a run must last before the loading marker appears.
    ///
    /// Replaces the button's execution, so call it while building the
    /// button, before any run starts.
    pub fn indicator_delay(mut self, delay: Duration) -> Self {
        let config = ExecutionConfig::default().with_indicator_delay(delay);
        self.execution = Arc::new(Execution::with_config(config));
        self
    }

    /// Start the action as if the button had been activated.
    ///
    /// Unlike activation this ignores the disabled state, so it also
    /// restarts a run in progress.
    pub fn trigger(&self) -> Result<(), ExecutionError> {
        self.execution.start(self.options, &self.action)
    }

    /// The current execution state.
    pub fn state(&self) -> ExecutionState {
        self.execution.state()
    }

    /// Whether the loading marker is showing.
    pub fn is_loading(&self) -> bool {
        self.execution.is_loading()
    }

    /// Whether the button refuses activation.
    pub fn is_disabled(&self) -> bool {
        self.execution.is_disabled()
    }

    /// Whether a run is in flight.
    pub fn is_running(&self) -> bool {
        self.execution.is_running()
    }

    /// The current state followed by every change, for hosts that redraw
    /// when the button does.
    pub fn state_changes(&self) -> WatchStream<ExecutionState> {
        self.execution.state_changes()
    }

    fn activation(&self) -> Action {
        let execution = Arc::downgrade(&self.execution);
        let action = self.action.clone();
        let options = self.options;
        Action::new(move || {
            let Some(execution) = execution.upgrade() else {
                return;
            };
            if let Err(err) = execution.start(options, &action) {
                tracing::warn!(error = %err, "async button activation ignored");
            }
        })
    }
}

impl View for AsyncButton {
    fn body(&self, env: &Environment) -> AnyView {
        let state = self.execution.state();
        let label = self.label.body(&env.with::<IsLoading>(state.is_loading));
        let content = if state.is_loading {
            AnyView::hstack(1, [AnyView::text("…"), label])
        } else {
            label
        };
        let button = AnyView::hstack(0, [AnyView::text("["), content, AnyView::text("]")]);
        let button = match self.role {
            Some(ButtonRole::Destructive) => button.style(Style::default().fg(Color::Red)),
            Some(ButtonRole::Cancel) => button.style(Style::default().add_modifier(Modifier::DIM)),
            None => button,
        };
        button
            .on_activate(self.activation())
            .disabled(state.is_disabled)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use tokio::time::sleep;
    use veneer_core::testing::render_view;
    use veneer_core::view::view_fn;

    fn counting(delay: Duration, done: Arc<AtomicUsize>) -> AsyncButton {
        AsyncButton::new("Go", move || {
            let done = done.clone();
            async move {
                sleep(delay).await;
                done.fetch_add(1, Ordering::SeqCst);
            }
        })
    }

    #[test]
    fn trigger_outside_runtime_reports_error() {
        let button = counting(Duration::ZERO, Arc::default());
        assert_eq!(button.trigger(), Err(ExecutionError::NoRuntime));
        assert!(!button.is_running());
    }

    #[test]
    fn activation_outside_runtime_is_ignored() {
        let button = counting(Duration::ZERO, Arc::default());
        let view = button.body(&Environment::new());
        assert!(view.activate());
        assert!(!button.is_running());
    }

    #[tokio::test(start_paused = true)]
    async fn activation_runs_action_and_disables_button() {
        let done = Arc::new(AtomicUsize::new(0));
        let button = counting(Duration::from_millis(100), done.clone());
        let env = Environment::new();

        assert!(button.body(&env).activate());
        assert!(button.is_running());
        assert!(button.is_disabled());
        assert!(!button.body(&env).activate());

        sleep(Duration::from_millis(150)).await;
        assert_eq!(done.load(Ordering::SeqCst), 1);
        assert!(button.body(&env).is_enabled());
    }

    #[tokio::test(start_paused = true)]
    async fn loading_marker_and_label_environment() {
        let button = AsyncButton::new(
            view_fn(|env: &Environment| {
                AnyView::text(if env.get::<IsLoading>() { "Wait" } else { "Send" })
            }),
            || sleep(Duration::from_secs(1)),
        );
        let env = Environment::new();
        assert_eq!(render_view(&button, &env, 6, 1), "[Send]");

        button.trigger().unwrap();
        sleep(Duration::from_millis(250)).await;
        assert!(button.is_loading());
        assert_eq!(render_view(&button, &env, 8, 1), "[… Wait]");
    }

    #[tokio::test(start_paused = true)]
    async fn enabled_during_execution_allows_retrigger() {
        let done = Arc::new(AtomicUsize::new(0));
        let button = counting(Duration::from_millis(100), done.clone())
            .options(AsyncButtonOptions::ENABLED_DURING_EXECUTION);
        let env = Environment::new();

        assert!(button.body(&env).activate());
        sleep(Duration::from_millis(50)).await;
        assert!(button.body(&env).activate());
        sleep(Duration::from_millis(300)).await;
        assert_eq!(done.load(Ordering::SeqCst), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn detached_task_survives_teardown() {
        let done = Arc::new(AtomicUsize::new(0));
        let button = counting(Duration::from_millis(100), done.clone())
            .options(AsyncButtonOptions::DETACHES_TASK);
        button.trigger().unwrap();
        drop(button);
        sleep(Duration::from_millis(200)).await;
        assert_eq!(done.load(Ordering::SeqCst), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn attached_task_is_cancelled_on_teardown() {
        let done = Arc::new(AtomicUsize::new(0));
        let button = counting(Duration::from_millis(100), done.clone());
        let view = button.body(&Environment::new());
        button.trigger().unwrap();
        drop(button);
        sleep(Duration::from_millis(200)).await;
        assert_eq!(done.load(Ordering::SeqCst), 0);
        assert!(view.activate());
        sleep(Duration::from_millis(200)).await;
        assert_eq!(done.load(Ordering::SeqCst), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn custom_indicator_delay_applies() {
        let button = counting(Duration::from_secs(1), Arc::default())
            .indicator_delay(Duration::from_millis(10));
        button.trigger().unwrap();
        sleep(Duration::from_millis(20)).await;
        assert!(button.is_loading());
    }

    #[test]
    fn roles_keep_label_text() {
        let env = Environment::new();
        let cancel = AsyncButton::new("No", || async {}).role(ButtonRole::Cancel);
        let destroy = AsyncButton::new("Rm", || async {}).role(ButtonRole::Destructive);
        assert_eq!(render_view(&cancel, &env, 4, 1), "[No]");
        assert_eq!(render_view(&destroy, &env, 4, 1), "[Rm]");
    }
}
