//! Style installers available on every view.

use crate::cell::{CellStyle, CellStyleKey};
use crate::picker::{PickerStyle, PickerStyleKey, ProvidedItems};
use crate::picker_item::{PickerItemStyle, PickerItemStyleKey};
use crate::section::{SectionStyle, SectionStyleKey};
use crate::stepper::{StepperElementStyle, StepperElementStyleKey, StepperStyle, StepperStyleKey};
use crate::text_field::{TextFieldStyle, TextFieldStyleKey};
use std::sync::Arc;
use veneer_core::view::{Scoped, View};

/// Install a control style for every matching control below this view.
///
/// Each method returns a [`Scoped`] wrapper; the style is visible to the
/// wrapped subtree only. The innermost installation wins.
///
/// ```rust
/// use veneer_controls::cell::{CellConfiguration, CellStyle};
/// use veneer_controls::{Cell, Section, StyleExt};
/// use veneer_core::testing::render_view;
/// use veneer_core::{AnyView, Environment};
///
/// struct Arrow;
///
/// impl CellStyle for Arrow {
///     fn make_body(&self, configuration: &CellConfiguration, _env: &Environment) -> AnyView {
///         AnyView::hstack(1, [AnyView::text(">"), configuration.label.clone()])
///     }
/// }
///
/// let list = Section::new(Cell::new("one")).cell_style(Arrow);
/// assert_eq!(render_view(&list, &Environment::new(), 5, 1), "> one");
/// ```
pub trait StyleExt: View + Sized {
    /// Install a [`CellStyle`].
    fn cell_style(self, style: impl CellStyle + 'static) -> Scoped<Self> {
        Scoped::new(self).environment::<CellStyleKey>(Arc::new(style))
    }

    /// Install a [`SectionStyle`].
    fn section_style(self, style: impl SectionStyle + 'static) -> Scoped<Self> {
        Scoped::new(self).environment::<SectionStyleKey>(Arc::new(style))
    }

    /// Install a [`PickerStyle`].
    ///
    /// If the style [provides items](PickerStyle::provides_items) it is also
    /// installed as the item style. Otherwise the item style in scope is
    /// left as it is.
    fn picker_style(self, style: impl PickerStyle + 'static) -> Scoped<Self> {
        let style: Arc<dyn PickerStyle> = Arc::new(style);
        let provides_items = style.provides_items();
        let scoped = Scoped::new(self).environment::<PickerStyleKey>(style.clone());
        if provides_items {
            scoped.environment::<PickerItemStyleKey>(Arc::new(ProvidedItems(style)))
        } else {
            scoped
        }
    }

    /// Install a [`PickerItemStyle`].
    fn picker_item_style(self, style: impl PickerItemStyle + 'static) -> Scoped<Self> {
        Scoped::new(self).environment::<PickerItemStyleKey>(Arc::new(style))
    }

    /// Install a [`StepperStyle`]. Its element methods are used unless an
    /// element style is also in scope.
    fn stepper_style(self, style: impl StepperStyle + 'static) -> Scoped<Self> {
        Scoped::new(self).environment::<StepperStyleKey>(Arc::new(style))
    }

    /// Install a [`StepperElementStyle`] for increment and decrement elements.
    fn stepper_element_style(self, style: impl StepperElementStyle + 'static) -> Scoped<Self> {
        Scoped::new(self).environment::<StepperElementStyleKey>(Some(Arc::new(style)))
    }

    /// Install a [`TextFieldStyle`].
    fn text_field_style(self, style: impl TextFieldStyle + 'static) -> Scoped<Self> {
        Scoped::new(self).environment::<TextFieldStyleKey>(Arc::new(style))
    }
}

impl<V: View> StyleExt for V {}
