//! Run bookkeeping behind [`AsyncButton`](crate::async_button::AsyncButton).
//!
//! An [`Execution`] owns at most one run. Each run is two tokio tasks: the
//! user action, and a timer that shows the loading indicator if the action
//! is still going after [`ExecutionConfig::indicator_delay`]. Starting a new
//! run aborts both tasks of the previous one. Every run gets a fresh id, and
//! both tasks re-check that their id is still current under the lock before
//! touching state, so a superseded run never publishes anything. An action
//! that panics still completes its run.

use crate::error::ExecutionError;
use bitflags::bitflags;
use futures::future::BoxFuture;
use futures::FutureExt;
use std::fmt;
use std::panic::AssertUnwindSafe;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;
use tokio::runtime::Handle;
use tokio::sync::watch;
use tokio::task::AbortHandle;
use tokio_stream::wrappers::WatchStream;
use veneer_core::binding::State;

bitflags! {
    /// Behaviour switches for an async button.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct AsyncButtonOptions: u8 {
        /// Never show the loading indicator.
        const LOADING_INDICATOR_HIDDEN = 1 << 0;
        /// Keep the button enabled while its action runs.
        const ENABLED_DURING_EXECUTION = 1 << 1;
        /// Let a running action outlive the button.
        const DETACHES_TASK = 1 << 2;
    }
}

/// What an async button currently shows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ExecutionState {
    /// A run is in flight.
    pub is_running: bool,
    /// The run has outlasted the indicator delay.
    pub is_loading: bool,
    /// The button refuses activation.
    pub is_disabled: bool,
}

/// Timing for an [`Execution`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExecutionConfig {
    /// How long a run must last before the loading indicator appears.
    pub indicator_delay: Duration,
}

impl ExecutionConfig {
    /// Override the indicator delay.
    pub fn with_indicator_delay(mut self, delay: Duration) -> Self {
        self.indicator_delay = delay;
        self
    }
}

impl Default for ExecutionConfig {
    fn default() -> Self {
        Self {
            indicator_delay: Duration::from_millis(200),
        }
    }
}

/// The user action of an async button, boxed so buttons with different
/// closures share one type.
pub type AsyncAction = Arc<dyn Fn() -> BoxFuture<'static, ()> + Send + Sync>;

struct Run {
    id: u64,
    options: AsyncButtonOptions,
    task: AbortHandle,
    indicator: Option<AbortHandle>,
}

impl Run {
    fn abort(&self) {
        self.task.abort();
        if let Some(indicator) = &self.indicator {
            indicator.abort();
        }
    }
}

#[derive(Default)]
struct Runs {
    current: Option<Run>,
    next_id: u64,
}

struct Shared {
    runs: Mutex<Runs>,
    state: State<ExecutionState>,
}

impl Shared {
    fn runs(&self) -> MutexGuard<'_, Runs> {
        self.runs.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn show_loading(&self, id: u64) {
        let runs = self.runs();
        if runs.current.as_ref().is_some_and(|run| run.id == id) {
            tracing::debug!(run = id, "async button showing loading indicator");
            self.state.update(|state| state.is_loading = true);
        }
    }

    fn finish(&self, id: u64) {
        let mut runs = self.runs();
        if !runs.current.as_ref().is_some_and(|run| run.id == id) {
            return;
        }
        if let Some(run) = runs.current.take() {
            if let Some(indicator) = run.indicator {
                indicator.abort();
            }
        }
        tracing::debug!(run = id, "async button action completed");
        self.state.set(ExecutionState::default());
    }
}

/// Tracks the in-flight run of one async button.
///
/// Dropping an `Execution` aborts its run unless that run was started with
/// [`AsyncButtonOptions::DETACHES_TASK`].
pub struct Execution {
    shared: Arc<Shared>,
    config: ExecutionConfig,
}

impl Execution {
    /// An idle execution with default timing.
    pub fn new() -> Self {
        Self::with_config(ExecutionConfig::default())
    }

    /// An idle execution with the given timing.
    pub fn with_config(config: ExecutionConfig) -> Self {
        Self {
            shared: Arc::new(Shared {
                runs: Mutex::new(Runs::default()),
                state: State::new(ExecutionState::default()),
            }),
            config,
        }
    }

    /// The timing this execution was built with.
    pub fn config(&self) -> ExecutionConfig {
        self.config
    }

    /// Start `action`, aborting any run already in flight.
    ///
    /// Must be called from inside a tokio runtime.
    pub fn start(
        &self,
        options: AsyncButtonOptions,
        action: &AsyncAction,
    ) -> Result<(), ExecutionError> {
        let runtime = Handle::try_current().map_err(|_| ExecutionError::NoRuntime)?;
        let future = action();

        let mut runs = self.shared.runs();
        if let Some(previous) = runs.current.take() {
            tracing::debug!(run = previous.id, "async button run superseded");
            previous.abort();
        }
        runs.next_id += 1;
        let id = runs.next_id;

        let indicator = if options.contains(AsyncButtonOptions::LOADING_INDICATOR_HIDDEN) {
            None
        } else {
            let shared = self.shared.clone();
            let delay = self.config.indicator_delay;
            let timer = runtime.spawn(async move {
                tokio::time::sleep(delay).await;
                shared.show_loading(id);
            });
            Some(timer.abort_handle())
        };

        let shared = self.shared.clone();
        let task = runtime.spawn(async move {
            if AssertUnwindSafe(future).catch_unwind().await.is_err() {
                tracing::warn!(run = id, "async button action panicked");
            }
            shared.finish(id);
        });

        runs.current = Some(Run {
            id,
            options,
            task: task.abort_handle(),
            indicator,
        });
        self.shared.state.set(ExecutionState {
            is_running: true,
            is_loading: false,
            is_disabled: !options.contains(AsyncButtonOptions::ENABLED_DURING_EXECUTION),
        });
        tracing::debug!(run = id, ?options, "async button run started");
        Ok(())
    }

    /// Abort the current run, if any, and return to idle.
    pub fn cancel(&self) {
        let mut runs = self.shared.runs();
        if let Some(run) = runs.current.take() {
            tracing::debug!(run = run.id, "async button run cancelled");
            run.abort();
            self.shared.state.set(ExecutionState::default());
        }
    }

    /// The current state.
    pub fn state(&self) -> ExecutionState {
        self.shared.state.get()
    }

    /// Whether a run is in flight.
    pub fn is_running(&self) -> bool {
        self.state().is_running
    }

    /// Whether the loading indicator is showing.
    pub fn is_loading(&self) -> bool {
        self.state().is_loading
    }

    /// Whether the button refuses activation.
    pub fn is_disabled(&self) -> bool {
        self.state().is_disabled
    }

    /// A receiver notified on every state change.
    pub fn subscribe(&self) -> watch::Receiver<ExecutionState> {
        self.shared.state.subscribe()
    }

    /// The current state followed by every change.
    pub fn state_changes(&self) -> WatchStream<ExecutionState> {
        self.shared.state.changes()
    }
}

impl Default for Execution {
    fn default() -> Self {
        Self::new()
    }
}

impl Drop for Execution {
    fn drop(&mut self) {
        let mut runs = self.shared.runs();
        let detached = runs
            .current
            .as_ref()
            .is_some_and(|run| run.options.contains(AsyncButtonOptions::DETACHES_TASK));
        if detached {
            tracing::debug!("async button dropped, run left detached");
            return;
        }
        if let Some(run) = runs.current.take() {
            tracing::debug!(run = run.id, "async button dropped, run aborted");
            run.abort();
        }
    }
}

impl fmt::Debug for Execution {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Execution")
            .field("state", &self.state())
            .field("config", &self.config)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use futures::StreamExt;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use tokio::time::sleep;

    fn sleeper(duration: Duration, done: Arc<AtomicUsize>) -> AsyncAction {
        Arc::new(move || {
            let done = done.clone();
            async move {
                sleep(duration).await;
                done.fetch_add(1, Ordering::SeqCst);
            }
            .boxed()
        })
    }

    #[test]
    fn start_outside_runtime_fails() {
        let execution = Execution::new();
        let action = sleeper(Duration::ZERO, Arc::default());
        assert_eq!(
            execution.start(AsyncButtonOptions::empty(), &action),
            Err(ExecutionError::NoRuntime)
        );
        assert!(!execution.is_running());
    }

    #[tokio::test(start_paused = true)]
    async fn loading_appears_after_delay() {
        let done = Arc::new(AtomicUsize::new(0));
        let execution = Execution::new();
        let action = sleeper(Duration::from_secs(1), done.clone());
        execution.start(AsyncButtonOptions::empty(), &action).unwrap();

        assert!(execution.is_running());
        assert!(execution.is_disabled());
        assert!(!execution.is_loading());

        sleep(Duration::from_millis(250)).await;
        assert!(execution.is_loading());

        sleep(Duration::from_secs(1)).await;
        assert_eq!(execution.state(), ExecutionState::default());
        assert_eq!(done.load(Ordering::SeqCst), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn fast_action_never_shows_loading() {
        let execution = Execution::new();
        let seen = Arc::new(Mutex::new(Vec::new()));
        let sink = seen.clone();
        let mut changes = execution.state_changes();
        tokio::spawn(async move {
            while let Some(state) = changes.next().await {
                sink.lock().unwrap().push(state);
            }
        });

        let action = sleeper(Duration::from_millis(50), Arc::default());
        execution.start(AsyncButtonOptions::empty(), &action).unwrap();
        sleep(Duration::from_millis(500)).await;

        let seen = seen.lock().unwrap();
        assert!(seen.iter().any(|state| state.is_running));
        assert!(seen.iter().all(|state| !state.is_loading));
        assert!(!execution.is_running());
    }

    #[tokio::test(start_paused = true)]
    async fn retrigger_cancels_previous_run() {
        let done = Arc::new(AtomicUsize::new(0));
        let action = sleeper(Duration::from_millis(100), done.clone());
        let execution = Execution::new();

        execution.start(AsyncButtonOptions::empty(), &action).unwrap();
        sleep(Duration::from_millis(60)).await;
        execution.start(AsyncButtonOptions::empty(), &action).unwrap();

        // The first run would have finished at 100ms and cleared the state.
        sleep(Duration::from_millis(60)).await;
        assert!(execution.is_running());
        assert_eq!(done.load(Ordering::SeqCst), 0);

        sleep(Duration::from_millis(100)).await;
        assert!(!execution.is_running());
        assert_eq!(done.load(Ordering::SeqCst), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn panicking_action_still_completes() {
        let execution = Execution::new();
        let action: AsyncAction = Arc::new(|| {
            async {
                sleep(Duration::from_millis(10)).await;
                panic!("upload failed");
            }
            .boxed()
        });
        execution.start(AsyncButtonOptions::empty(), &action).unwrap();
        sleep(Duration::from_millis(50)).await;
        assert_eq!(execution.state(), ExecutionState::default());
    }

    #[tokio::test(start_paused = true)]
    async fn options_control_indicator_and_disabling() {
        let execution = Execution::new();
        let options = AsyncButtonOptions::LOADING_INDICATOR_HIDDEN
            | AsyncButtonOptions::ENABLED_DURING_EXECUTION;
        let action = sleeper(Duration::from_secs(1), Arc::default());
        execution.start(options, &action).unwrap();
        assert!(execution.is_running());
        assert!(!execution.is_disabled());
        sleep(Duration::from_millis(500)).await;
        assert!(!execution.is_loading());
    }

    #[tokio::test(start_paused = true)]
    async fn custom_indicator_delay() {
        let config = ExecutionConfig::default().with_indicator_delay(Duration::from_millis(20));
        let execution = Execution::with_config(config);
        let action = sleeper(Duration::from_secs(1), Arc::default());
        execution.start(AsyncButtonOptions::empty(), &action).unwrap();
        sleep(Duration::from_millis(30)).await;
        assert!(execution.is_loading());
    }

    #[tokio::test(start_paused = true)]
    async fn cancel_returns_to_idle() {
        let done = Arc::new(AtomicUsize::new(0));
        let execution = Execution::new();
        let action = sleeper(Duration::from_millis(100), done.clone());
        execution.start(AsyncButtonOptions::empty(), &action).unwrap();
        execution.cancel();
        assert_eq!(execution.state(), ExecutionState::default());
        sleep(Duration::from_millis(300)).await;
        assert_eq!(done.load(Ordering::SeqCst), 0);
        assert!(!execution.is_loading());
    }

    #[tokio::test(start_paused = true)]
    async fn drop_aborts_attached_run() {
        let done = Arc::new(AtomicUsize::new(0));
        let execution = Execution::new();
        let action = sleeper(Duration::from_millis(100), done.clone());
        execution.start(AsyncButtonOptions::empty(), &action).unwrap();
        drop(execution);
        sleep(Duration::from_millis(300)).await;
        assert_eq!(done.load(Ordering::SeqCst), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn drop_leaves_detached_run_going() {
        let done = Arc::new(AtomicUsize::new(0));
        let execution = Execution::new();
        let action = sleeper(Duration::from_millis(100), done.clone());
        execution.start(AsyncButtonOptions::DETACHES_TASK, &action).unwrap();
        drop(execution);
        sleep(Duration::from_millis(300)).await;
        assert_eq!(done.load(Ordering::SeqCst), 1);
    }
}
