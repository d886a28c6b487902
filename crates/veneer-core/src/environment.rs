//! Ambient, subtree-scoped values resolved by descendant views.
//!
//! An [`Environment`] is a persistent chain of overrides. Pushing a value with
//! [`Environment::with`] returns a new environment for a subtree and leaves
//! the receiver untouched, so a value set on one branch is never observed by
//! its siblings or ancestors. Reads walk outward to the nearest override and
//! fall back to the key's default, so resolution never fails.

use std::any::{Any, TypeId};
use std::fmt;
use std::sync::Arc;

/// A typed slot in the [`Environment`].
///
/// The key type itself is the identity of the slot; its [`Value`](Self::Value)
/// is what gets stored. Every key supplies a default, which is what a read
/// returns when no ancestor has overridden the slot.
///
/// # Example
///
/// ```rust
/// use veneer_core::environment::{Environment, EnvironmentKey};
///
/// struct Accent;
///
/// impl EnvironmentKey for Accent {
///     type Value = &'static str;
///
///     fn default_value() -> &'static str {
///         "cyan"
///     }
/// }
///
/// let root = Environment::new();
/// let child = root.with::<Accent>("magenta");
/// assert_eq!(root.get::<Accent>(), "cyan");
/// assert_eq!(child.get::<Accent>(), "magenta");
/// ```
pub trait EnvironmentKey: 'static {
    /// The value stored under this key.
    type Value: Clone + Send + Sync + 'static;

    /// The value returned when no override is in scope.
    fn default_value() -> Self::Value;

    /// Human-readable name used in logs.
    fn name() -> &'static str {
        std::any::type_name::<Self>()
    }
}

struct Entry {
    key: TypeId,
    name: &'static str,
    value: Arc<dyn Any + Send + Sync>,
    parent: Option<Arc<Entry>>,
}

/// Scoped key/value context passed down the render call chain.
///
/// Cloning is cheap (one reference count). See the [module docs](self).
#[derive(Clone, Default)]
pub struct Environment {
    head: Option<Arc<Entry>>,
}

impl Environment {
    /// An environment with no overrides; every key reads its default.
    pub fn new() -> Self {
        Self::default()
    }

    /// Return a child environment in which `K` resolves to `value`.
    pub fn with<K: EnvironmentKey>(&self, value: K::Value) -> Environment {
        Environment {
            head: Some(Arc::new(Entry {
                key: TypeId::of::<K>(),
                name: K::name(),
                value: Arc::new(value),
                parent: self.head.clone(),
            })),
        }
    }

    /// Return a child environment in which `K` resolves to `f(current)`.
    pub fn with_updated<K: EnvironmentKey>(
        &self,
        f: impl FnOnce(K::Value) -> K::Value,
    ) -> Environment {
        let current = self.get::<K>();
        self.with::<K>(f(current))
    }

    /// Resolve `K`: the nearest override, or the key's default.
    pub fn get<K: EnvironmentKey>(&self) -> K::Value {
        match self.get_explicit::<K>() {
            Some(value) => value,
            None => {
                tracing::trace!(key = K::name(), "environment key resolved to default");
                K::default_value()
            }
        }
    }

    /// Resolve `K` only if some ancestor overrode it.
    pub fn get_explicit<K: EnvironmentKey>(&self) -> Option<K::Value> {
        let wanted = TypeId::of::<K>();
        self.entries()
            .find(|entry| entry.key == wanted)
            .and_then(|entry| entry.value.downcast_ref::<K::Value>().cloned())
    }

    /// Whether `K` has been overridden anywhere in this chain.
    pub fn is_set<K: EnvironmentKey>(&self) -> bool {
        let wanted = TypeId::of::<K>();
        self.entries().any(|entry| entry.key == wanted)
    }

    /// Number of overrides in the chain, including shadowed ones.
    pub fn depth(&self) -> usize {
        self.entries().count()
    }

    fn entries(&self) -> impl Iterator<Item = &Entry> {
        std::iter::successors(self.head.as_deref(), |entry| entry.parent.as_deref())
    }
}

impl fmt::Debug for Environment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list()
            .entries(self.entries().map(|entry| entry.name))
            .finish()
    }
}

/// Whether interactive views in this subtree accept activation.
///
/// Set through [`ViewExt::disabled`](crate::view::ViewExt::disabled). Once a
/// subtree is disabled, descendants cannot re-enable themselves.
pub struct IsEnabled;

impl EnvironmentKey for IsEnabled {
    type Value = bool;

    fn default_value() -> bool {
        true
    }
}
