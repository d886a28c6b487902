//! Shareable zero-argument callbacks.

use std::fmt;
use std::sync::Arc;

/// A cloneable, thread-safe `Fn()` used for button presses, stepper
/// increments and item toggles.
#[derive(Clone)]
pub struct Action {
    f: Arc<dyn Fn() + Send + Sync>,
}

impl Action {
    /// Wrap a closure.
    pub fn new(f: impl Fn() + Send + Sync + 'static) -> Self {
        Self { f: Arc::new(f) }
    }

    /// An action that does nothing.
    pub fn noop() -> Self {
        Self::new(|| {})
    }

    /// Invoke the action.
    pub fn call(&self) {
        (self.f)()
    }

    /// Run `before`, then this action, then `after`.
    pub fn wrapped(
        &self,
        before: impl Fn() + Send + Sync + 'static,
        after: impl Fn() + Send + Sync + 'static,
    ) -> Action {
        let inner = self.clone();
        Action::new(move || {
            before();
            inner.call();
            after();
        })
    }
}

impl Default for Action {
    fn default() -> Self {
        Self::noop()
    }
}

impl fmt::Debug for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Action")
    }
}
