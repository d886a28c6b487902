//! Single- and multi-value selection behind one contract.

use std::collections::HashSet;
use std::hash::Hash;
use veneer_core::binding::Binding;

/// Values a picker can select.
pub trait SelectionValue: Clone + Eq + Hash + Send + Sync + 'static {}

impl<T: Clone + Eq + Hash + Send + Sync + 'static> SelectionValue for T {}

/// Whether a selection holds one value or a set.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SelectionMode {
    /// Exactly one value is selected at all times.
    Single,
    /// Any subset of values may be selected.
    Multiple,
}

/// A binding to either one selected value or a set of them.
///
/// Both shapes share `contains`/`select`/`deselect`/`toggle`. A single
/// selection always has a value, so [`deselect`](Selection::deselect) on it
/// does nothing.
pub enum Selection<T> {
    /// Bound to one value.
    Single(Binding<T>),
    /// Bound to a set of values.
    Multiple(Binding<HashSet<T>>),
}

impl<T> Clone for Selection<T> {
    fn clone(&self) -> Self {
        match self {
            Selection::Single(binding) => Selection::Single(binding.clone()),
            Selection::Multiple(binding) => Selection::Multiple(binding.clone()),
        }
    }
}

impl<T: SelectionValue> Selection<T> {
    /// A selection bound to one value.
    pub fn single(binding: Binding<T>) -> Self {
        Selection::Single(binding)
    }

    /// A selection bound to a set of values.
    pub fn multiple(binding: Binding<HashSet<T>>) -> Self {
        Selection::Multiple(binding)
    }

    /// Which shape this selection has.
    pub fn mode(&self) -> SelectionMode {
        match self {
            Selection::Single(_) => SelectionMode::Single,
            Selection::Multiple(_) => SelectionMode::Multiple,
        }
    }

    /// Whether `value` is currently selected.
    pub fn contains(&self, value: &T) -> bool {
        match self {
            Selection::Single(binding) => binding.get() == *value,
            Selection::Multiple(binding) => binding.get().contains(value),
        }
    }

    /// Select `value`, replacing a single selection or adding to a set.
    pub fn select(&self, value: T) {
        match self {
            Selection::Single(binding) => binding.set(value),
            Selection::Multiple(binding) => binding.update(|set| {
                set.insert(value);
            }),
        }
    }

    /// Remove `value` from a set. No-op on a single selection.
    pub fn deselect(&self, value: &T) {
        match self {
            Selection::Single(_) => {}
            Selection::Multiple(binding) => binding.update(|set| {
                set.remove(value);
            }),
        }
    }

    /// Deselect `value` if selected, otherwise select it.
    pub fn toggle(&self, value: T) {
        if self.contains(&value) {
            self.deselect(&value);
        } else {
            self.select(value);
        }
    }
}
