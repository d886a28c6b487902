//! Choice among tagged options, single or multiple selection.
//!
//! A [`Picker`] resolves two slots: [`PickerStyleKey`] lays out the whole
//! control and [`PickerItemStyleKey`] renders each option. A picker style
//! can render its own options by returning `true` from
//! [`PickerStyle::provides_items`] and implementing
//! [`PickerStyle::make_item`]; installing it with
//! [`StyleExt::picker_style`](crate::StyleExt::picker_style) then fills both
//! slots at once.

use crate::picker_item::{
    render_item, PickerItem, PickerItemConfiguration, PickerItemStyle, PickerItemStyleKey,
};
use crate::selection::{Selection, SelectionMode, SelectionValue};
use ratatui::style::{Modifier, Style};
use std::collections::HashSet;
use std::fmt;
use std::sync::Arc;
use veneer_core::binding::Binding;
use veneer_core::environment::{Environment, EnvironmentKey};
use veneer_core::view::{AnyView, BoxedView, View};

#[derive(Clone, Copy)]
enum Change {
    Select,
    Deselect,
    Toggle,
}

/// A picker's selection as seen by styles, addressed by item index.
///
/// Built from the typed [`Selection`] and the items' typed tags, so the
/// element type never leaves the closures that capture it. Indices of
/// untagged items, or past the end, are never selected and ignore changes.
#[derive(Clone)]
pub struct PickerSelection {
    mode: SelectionMode,
    len: usize,
    contains: Arc<dyn Fn(usize) -> bool + Send + Sync>,
    change: Arc<dyn Fn(usize, Change) + Send + Sync>,
}

impl PickerSelection {
    /// Wrap `selection` for items tagged with `tags`, in display order.
    pub fn new<T: SelectionValue>(
        selection: Selection<T>,
        tags: impl IntoIterator<Item = Option<T>>,
    ) -> Self {
        let tags: Arc<[Option<T>]> = tags.into_iter().collect();
        let mode = selection.mode();
        let len = tags.len();

        let read = selection.clone();
        let read_tags = tags.clone();
        let contains = move |index: usize| match read_tags.get(index) {
            Some(Some(tag)) => read.contains(tag),
            _ => false,
        };

        let change = move |index: usize, change: Change| {
            let Some(Some(tag)) = tags.get(index) else {
                return;
            };
            match change {
                Change::Select => selection.select(tag.clone()),
                Change::Deselect => selection.deselect(tag),
                Change::Toggle => selection.toggle(tag.clone()),
            }
        };

        Self {
            mode,
            len,
            contains: Arc::new(contains),
            change: Arc::new(change),
        }
    }

    /// Single or multiple selection.
    pub fn mode(&self) -> SelectionMode {
        self.mode
    }

    /// Number of items, tagged or not.
    pub fn len(&self) -> usize {
        self.len
    }

    /// Whether the picker has no items.
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Whether the item at `index` is selected.
    pub fn contains(&self, index: usize) -> bool {
        (self.contains)(index)
    }

    /// Select the item at `index`.
    pub fn select(&self, index: usize) {
        (self.change)(index, Change::Select)
    }

    /// Deselect the item at `index`. No-op for single selection.
    pub fn deselect(&self, index: usize) {
        (self.change)(index, Change::Deselect)
    }

    /// Toggle the item at `index`.
    pub fn toggle(&self, index: usize) {
        (self.change)(index, Change::Toggle)
    }

    /// Indices of all selected items, ascending.
    pub fn selected(&self) -> Vec<usize> {
        (0..self.len).filter(|&index| self.contains(index)).collect()
    }
}

impl fmt::Debug for PickerSelection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PickerSelection")
            .field("mode", &self.mode)
            .field("selected", &self.selected())
            .finish()
    }
}

/// What a [`PickerStyle`] lays out.
#[derive(Debug, Clone)]
pub struct PickerConfiguration {
    /// The selection, addressed by item index.
    pub selection: PickerSelection,
    /// The options, already rendered by the item style, stacked vertically.
    pub content: AnyView,
    /// The picker's label.
    pub label: AnyView,
}

/// Lays out a [`Picker`].
///
/// A style that also renders options returns `true` from
/// [`provides_items`](Self::provides_items) and overrides
/// [`make_item`](Self::make_item). Claiming to provide items without
/// overriding `make_item` panics the first time an option renders.
pub trait PickerStyle: Send + Sync {
    /// Lay out the label and options.
    fn make_body(&self, configuration: &PickerConfiguration, env: &Environment) -> AnyView;

    /// Whether installing this style should also replace the item style.
    fn provides_items(&self) -> bool {
        false
    }

    /// Render one option when this style provides items.
    fn make_item(&self, _configuration: &PickerItemConfiguration, _env: &Environment) -> AnyView {
        panic!(
            "picker style provides items but does not implement make_item ({})",
            std::any::type_name::<Self>()
        )
    }
}

/// Bold label above the options.
#[derive(Debug, Clone, Copy, Default)]
pub struct DefaultPickerStyle;

impl PickerStyle for DefaultPickerStyle {
    fn make_body(&self, configuration: &PickerConfiguration, _env: &Environment) -> AnyView {
        AnyView::vstack([
            configuration
                .label
                .clone()
                .style(Style::default().add_modifier(Modifier::BOLD)),
            configuration.content.clone(),
        ])
    }
}

/// Environment slot holding the active [`PickerStyle`].
pub struct PickerStyleKey;

impl EnvironmentKey for PickerStyleKey {
    type Value = Arc<dyn PickerStyle>;

    fn default_value() -> Arc<dyn PickerStyle> {
        Arc::new(DefaultPickerStyle)
    }
}

/// Exposes a picker style's `make_item` through the item slot.
pub(crate) struct ProvidedItems(pub(crate) Arc<dyn PickerStyle>);

impl PickerItemStyle for ProvidedItems {
    fn make_item(&self, configuration: &PickerItemConfiguration, env: &Environment) -> AnyView {
        self.0.make_item(configuration, env)
    }
}

/// A labelled list of options bound to a [`Selection`].
///
/// ```rust
/// use veneer_controls::picker::Picker;
/// use veneer_core::testing::render_view;
/// use veneer_core::{Environment, State};
///
/// let flavor = State::new("mint");
/// let picker = Picker::single(flavor.binding(), "Flavor")
///     .option("mint", "Mint")
///     .option("lime", "Lime");
/// let out = render_view(&picker, &Environment::new(), 6, 3);
/// assert_eq!(out, "Flavor\n● Mint\n○ Lime");
/// ```
pub struct Picker<T> {
    selection: Selection<T>,
    label: BoxedView,
    items: Vec<PickerItem<T>>,
}

impl<T: SelectionValue> Picker<T> {
    /// A picker over `selection` with no options yet.
    pub fn new(selection: Selection<T>, label: impl View + 'static) -> Self {
        Self {
            selection,
            label: Box::new(label),
            items: Vec::new(),
        }
    }

    /// A picker that holds exactly one value.
    pub fn single(binding: Binding<T>, label: impl View + 'static) -> Self {
        Self::new(Selection::single(binding), label)
    }

    /// A picker that holds any subset of values.
    pub fn multiple(binding: Binding<HashSet<T>>, label: impl View + 'static) -> Self {
        Self::new(Selection::multiple(binding), label)
    }

    /// Append an option.
    pub fn item(mut self, item: PickerItem<T>) -> Self {
        self.items.push(item);
        self
    }

    /// Append an option selecting `tag`.
    pub fn option(self, tag: T, label: impl View + 'static) -> Self {
        self.item(PickerItem::new(tag, label))
    }

    /// The options in display order.
    pub fn items(&self) -> &[PickerItem<T>] {
        &self.items
    }

    /// The index-addressed selection handle styles receive.
    pub fn selection(&self) -> PickerSelection {
        PickerSelection::new(
            self.selection.clone(),
            self.items.iter().map(|item| item.tag.clone()),
        )
    }

    /// Snapshot one option under `env`, or `None` past the last option.
    pub fn item_configuration(
        &self,
        index: usize,
        env: &Environment,
    ) -> Option<PickerItemConfiguration> {
        let selection = self.selection();
        self.items
            .get(index)
            .map(|item| item.configuration(index, &selection, env))
    }

    /// Snapshot the picker under `env`, rendering every option with the
    /// resolved item style.
    pub fn configuration(&self, env: &Environment) -> PickerConfiguration {
        let selection = self.selection();
        let item_style = env.get::<PickerItemStyleKey>();
        let items = self.items.iter().enumerate().map(|(index, item)| {
            let configuration = item.configuration(index, &selection, env);
            render_item(&configuration, item_style.as_ref(), env)
        });
        PickerConfiguration {
            content: AnyView::vstack(items),
            label: self.label.body(env),
            selection,
        }
    }
}

impl<T: SelectionValue> View for Picker<T> {
    fn body(&self, env: &Environment) -> AnyView {
        let style = env.get::<PickerStyleKey>();
        style.make_body(&self.configuration(env), env)
    }
}
