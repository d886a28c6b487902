//! List cell with content, secondary text, leading image and trailing accessory.

use ratatui::style::{Color, Modifier, Style};
use std::sync::Arc;
use veneer_core::environment::{Environment, EnvironmentKey};
use veneer_core::view::{AnyView, BoxedView, View};

/// The slots a [`CellStyle`] lays out.
#[derive(Debug, Clone, Default)]
pub struct CellConfiguration {
    /// Primary content.
    pub label: AnyView,
    /// Supporting text shown with the label.
    pub secondary_label: AnyView,
    /// Leading image or icon.
    pub image: AnyView,
    /// Trailing accessory (chevron, badge, toggle...).
    pub accessory: AnyView,
}

/// Renders a [`Cell`].
///
/// Install with [`StyleExt::cell_style`](crate::StyleExt::cell_style); every
/// cell below that point uses it.
///
/// # Example
///
/// ```rust
/// use veneer_controls::cell::{CellConfiguration, CellStyle};
/// use veneer_core::{AnyView, Environment};
///
/// struct Compact;
///
/// impl CellStyle for Compact {
///     fn make_body(&self, configuration: &CellConfiguration, _env: &Environment) -> AnyView {
///         AnyView::hstack(1, [configuration.image.clone(), configuration.label.clone()])
///     }
/// }
/// ```
pub trait CellStyle: Send + Sync {
    /// Lay out the cell's slots.
    fn make_body(&self, configuration: &CellConfiguration, env: &Environment) -> AnyView;
}

/// Image, then label over a dimmed secondary label, then a cyan accessory.
#[derive(Debug, Clone, Copy, Default)]
pub struct DefaultCellStyle;

impl CellStyle for DefaultCellStyle {
    fn make_body(&self, configuration: &CellConfiguration, _env: &Environment) -> AnyView {
        let text = AnyView::vstack([
            configuration.label.clone(),
            configuration
                .secondary_label
                .clone()
                .style(Style::default().add_modifier(Modifier::DIM)),
        ]);
        AnyView::hstack(
            1,
            [
                configuration.image.clone(),
                text,
                configuration
                    .accessory
                    .clone()
                    .style(Style::default().fg(Color::Cyan)),
            ],
        )
    }
}

/// Environment slot holding the active [`CellStyle`].
pub struct CellStyleKey;

impl EnvironmentKey for CellStyleKey {
    type Value = Arc<dyn CellStyle>;

    fn default_value() -> Arc<dyn CellStyle> {
        Arc::new(DefaultCellStyle)
    }
}

/// A row with content and optional secondary text, image and accessory.
///
/// ```rust
/// use veneer_controls::Cell;
/// use veneer_core::testing::render_view;
/// use veneer_core::Environment;
///
/// let cell = Cell::new("Wi-Fi").secondary("Connected").accessory(">");
/// let out = render_view(&cell, &Environment::new(), 14, 2);
/// assert!(out.starts_with("Wi-Fi     >"));
/// ```
pub struct Cell {
    content: BoxedView,
    secondary: Option<BoxedView>,
    image: Option<BoxedView>,
    accessory: Option<BoxedView>,
}

impl Cell {
    /// A cell showing `content`.
    pub fn new(content: impl View + 'static) -> Self {
        Self {
            content: Box::new(content),
            secondary: None,
            image: None,
            accessory: None,
        }
    }

    /// Set the secondary label.
    pub fn secondary(mut self, view: impl View + 'static) -> Self {
        self.secondary = Some(Box::new(view));
        self
    }

    /// Set the leading image.
    pub fn image(mut self, view: impl View + 'static) -> Self {
        self.image = Some(Box::new(view));
        self
    }

    /// Set the trailing accessory.
    pub fn accessory(mut self, view: impl View + 'static) -> Self {
        self.accessory = Some(Box::new(view));
        self
    }

    /// Snapshot the cell's slots under `env`.
    pub fn configuration(&self, env: &Environment) -> CellConfiguration {
        CellConfiguration {
            label: self.content.body(env),
            secondary_label: render_slot(&self.secondary, env),
            image: render_slot(&self.image, env),
            accessory: render_slot(&self.accessory, env),
        }
    }
}

impl View for Cell {
    fn body(&self, env: &Environment) -> AnyView {
        let style = env.get::<CellStyleKey>();
        style.make_body(&self.configuration(env), env)
    }
}

pub(crate) fn render_slot(slot: &Option<BoxedView>, env: &Environment) -> AnyView {
    slot.as_ref().map(|view| view.body(env)).unwrap_or_default()
}
