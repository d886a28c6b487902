//! Two-way bindings and the state cells that own their values.
//!
//! A [`State`] owns a value and notifies watchers when it changes. A
//! [`Binding`] is a read/write view onto some state, possibly projected
//! or transformed, that can be handed to configurations and styles. Writes
//! through a binding reach the owning state synchronously.

use std::fmt;
use std::sync::Arc;
use tokio::sync::watch;
use tokio_stream::wrappers::WatchStream;

/// An owned, observable value.
///
/// Backed by a [`tokio::sync::watch`] channel so that hosts can await changes
/// (for example to schedule a redraw) while readers on the render path get
/// the current value without blocking.
pub struct State<T> {
    tx: Arc<watch::Sender<T>>,
}

impl<T> Clone for State<T> {
    fn clone(&self) -> Self {
        Self {
            tx: self.tx.clone(),
        }
    }
}

impl<T: Clone + Send + Sync + 'static> State<T> {
    /// Create a state cell holding `value`.
    pub fn new(value: T) -> Self {
        let (tx, _rx) = watch::channel(value);
        Self { tx: Arc::new(tx) }
    }

    /// Return a clone of the current value.
    pub fn get(&self) -> T {
        self.tx.borrow().clone()
    }

    /// Replace the value and notify watchers.
    pub fn set(&self, value: T) {
        self.tx.send_replace(value);
    }

    /// Mutate the value in place and notify watchers.
    pub fn update(&self, f: impl FnOnce(&mut T)) {
        self.tx.send_modify(f);
    }

    /// Mutate the value in place, notifying watchers only when `f` returns
    /// `true`.
    pub fn update_if(&self, f: impl FnOnce(&mut T) -> bool) -> bool {
        self.tx.send_if_modified(f)
    }

    /// A binding that reads and writes this state.
    pub fn binding(&self) -> Binding<T> {
        let read = self.clone();
        let write = self.clone();
        Binding::new(move || read.get(), move |value| write.set(value))
    }

    /// A receiver that observes every subsequent change.
    pub fn subscribe(&self) -> watch::Receiver<T> {
        self.tx.subscribe()
    }

    /// A stream yielding the current value and then each change.
    pub fn changes(&self) -> WatchStream<T> {
        WatchStream::new(self.tx.subscribe())
    }
}

impl<T: Clone + Default + Send + Sync + 'static> Default for State<T> {
    fn default() -> Self {
        Self::new(T::default())
    }
}

impl<T: fmt::Debug> fmt::Debug for State<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("State").field(&*self.tx.borrow()).finish()
    }
}

/// A read/write handle onto a value owned elsewhere.
///
/// # Example
///
/// ```rust
/// use veneer_core::binding::State;
///
/// let count = State::new(1);
/// let binding = count.binding();
/// binding.set(binding.get() + 1);
/// assert_eq!(count.get(), 2);
/// ```
pub struct Binding<T> {
    get: Arc<dyn Fn() -> T + Send + Sync>,
    set: Arc<dyn Fn(T) + Send + Sync>,
}

impl<T> Clone for Binding<T> {
    fn clone(&self) -> Self {
        Self {
            get: self.get.clone(),
            set: self.set.clone(),
        }
    }
}

impl<T: Send + Sync + 'static> Binding<T> {
    /// Build a binding from a getter and a setter.
    pub fn new(
        get: impl Fn() -> T + Send + Sync + 'static,
        set: impl Fn(T) + Send + Sync + 'static,
    ) -> Self {
        Self {
            get: Arc::new(get),
            set: Arc::new(set),
        }
    }

    /// A binding that always reads `value` and ignores writes.
    pub fn constant(value: T) -> Self
    where
        T: Clone,
    {
        Self::new(move || value.clone(), |_| {})
    }

    /// Read the current value.
    pub fn get(&self) -> T {
        (self.get)()
    }

    /// Write a new value.
    pub fn set(&self, value: T) {
        (self.set)(value)
    }

    /// Read, modify and write back.
    pub fn update(&self, f: impl FnOnce(&mut T)) {
        let mut value = self.get();
        f(&mut value);
        self.set(value);
    }

    /// A binding onto a part of this binding's value.
    pub fn project<U: Send + Sync + 'static>(
        &self,
        get: impl Fn(&T) -> U + Send + Sync + 'static,
        set: impl Fn(&mut T, U) + Send + Sync + 'static,
    ) -> Binding<U> {
        let read = self.clone();
        let write = self.clone();
        Binding::new(
            move || get(&read.get()),
            move |part| write.update(|whole| set(whole, part)),
        )
    }

    /// A binding that calls `f` with each written value after the write.
    pub fn on_change(&self, f: impl Fn(&T) + Send + Sync + 'static) -> Binding<T>
    where
        T: Clone,
    {
        let read = self.clone();
        let write = self.clone();
        Binding::new(
            move || read.get(),
            move |value: T| {
                let seen = value.clone();
                write.set(value);
                f(&seen);
            },
        )
    }
}

impl<T: fmt::Debug + Send + Sync + 'static> fmt::Debug for Binding<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Binding").field(&self.get()).finish()
    }
}
