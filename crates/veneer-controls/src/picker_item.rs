//! Per-option rendering inside a [`Picker`](crate::picker::Picker).

use crate::picker::PickerSelection;
use crate::selection::{SelectionMode, SelectionValue};
use ratatui::style::{Modifier, Style};
use std::sync::Arc;
use veneer_core::action::Action;
use veneer_core::environment::{Environment, EnvironmentKey};
use veneer_core::view::{AnyView, BoxedView, View};

/// What a [`PickerItemStyle`] sees for one option.
#[derive(Debug, Clone)]
pub struct PickerItemConfiguration {
    /// The picker's whole selection, addressed by item index.
    pub selection: PickerSelection,
    /// Position of this item in the picker, or `None` for an untagged item.
    pub tag_index: Option<usize>,
    /// Whether the item's tag is in the selection.
    pub is_selected: bool,
    /// False when the item was marked `selection_disabled`.
    pub is_enabled: bool,
    /// The item's own content.
    pub label: AnyView,
    /// Toggles this item's tag in the selection. No-op for untagged items.
    pub toggle: Action,
}

/// Renders one picker option.
///
/// The picker attaches [`toggle`](PickerItemConfiguration::toggle) as the
/// activation of whatever this returns and disables it when the item is not
/// enabled, so styles only deal with looks.
pub trait PickerItemStyle: Send + Sync {
    /// Render one option.
    fn make_item(&self, configuration: &PickerItemConfiguration, env: &Environment) -> AnyView;
}

/// Radio markers for single selection, checkboxes for multiple.
#[derive(Debug, Clone, Copy, Default)]
pub struct DefaultPickerItemStyle;

impl PickerItemStyle for DefaultPickerItemStyle {
    fn make_item(&self, configuration: &PickerItemConfiguration, _env: &Environment) -> AnyView {
        let marker = match (configuration.selection.mode(), configuration.is_selected) {
            (SelectionMode::Single, true) => "●",
            (SelectionMode::Single, false) => "○",
            (SelectionMode::Multiple, true) => "[x]",
            (SelectionMode::Multiple, false) => "[ ]",
        };
        let label = if configuration.is_selected {
            configuration
                .label
                .clone()
                .style(Style::default().add_modifier(Modifier::BOLD))
        } else {
            configuration.label.clone()
        };
        AnyView::hstack(1, [AnyView::text(marker), label])
    }
}

/// Environment slot holding the active [`PickerItemStyle`].
///
/// Filled either directly through
/// [`StyleExt::picker_item_style`](crate::StyleExt::picker_item_style) or by
/// a picker style that [provides items](crate::picker::PickerStyle::provides_items).
pub struct PickerItemStyleKey;

impl EnvironmentKey for PickerItemStyleKey {
    type Value = Arc<dyn PickerItemStyle>;

    fn default_value() -> Arc<dyn PickerItemStyle> {
        Arc::new(DefaultPickerItemStyle)
    }
}

/// One option of a picker: a label and the tag it selects.
pub struct PickerItem<T> {
    pub(crate) tag: Option<T>,
    label: BoxedView,
    selection_disabled: bool,
}

impl<T: SelectionValue> PickerItem<T> {
    /// An option that selects `tag`.
    pub fn new(tag: T, label: impl View + 'static) -> Self {
        Self {
            tag: Some(tag),
            label: Box::new(label),
            selection_disabled: false,
        }
    }

    /// An option with no tag. It is never selected and toggling does nothing.
    pub fn untagged(label: impl View + 'static) -> Self {
        Self {
            tag: None,
            label: Box::new(label),
            selection_disabled: false,
        }
    }

    /// Prevent this option from changing the selection.
    pub fn selection_disabled(mut self, disabled: bool) -> Self {
        self.selection_disabled = disabled;
        self
    }

    /// The tag this option selects.
    pub fn tag(&self) -> Option<&T> {
        self.tag.as_ref()
    }

    pub(crate) fn configuration(
        &self,
        index: usize,
        selection: &PickerSelection,
        env: &Environment,
    ) -> PickerItemConfiguration {
        let tag_index = self.tag.as_ref().map(|_| index);
        let toggle = match tag_index {
            Some(index) => {
                let selection = selection.clone();
                Action::new(move || selection.toggle(index))
            }
            None => Action::noop(),
        };
        PickerItemConfiguration {
            selection: selection.clone(),
            tag_index,
            is_selected: tag_index.is_some_and(|index| selection.contains(index)),
            is_enabled: !self.selection_disabled,
            label: self.label.body(env),
            toggle,
        }
    }
}

pub(crate) fn render_item(
    configuration: &PickerItemConfiguration,
    style: &dyn PickerItemStyle,
    env: &Environment,
) -> AnyView {
    style
        .make_item(configuration, env)
        .on_activate(configuration.toggle.clone())
        .disabled(!configuration.is_enabled)
}
