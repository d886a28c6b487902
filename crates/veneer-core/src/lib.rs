//! Core protocol for the **veneer** styled-controls library.
//!
//! `veneer-core` provides the pieces every control and every style is built
//! from. It does not know about any specific control; see `veneer-controls`
//! for those.
//!
//! # Key types
//!
//! | Type | Purpose |
//! |------|---------|
//! | [`Environment`] | Subtree-scoped ambient values (styles, flags), resolved nearest-first with a default per key |
//! | [`EnvironmentKey`] | A typed slot in the environment |
//! | [`View`] | Anything that renders to an [`AnyView`] under an environment |
//! | [`AnyView`] | Opaque renderable with a preferred size, enabled flag and optional [`Action`] |
//! | [`Binding`] / [`State`] | Two-way bindings and the observable cells that own values |
//! | [`Scoped`] | A view rendered under an extended environment |
//!
//! # Render flow
//!
//! 1. An application builds a root [`Environment`], optionally overriding
//!    styles for whole subtrees with [`ViewExt::environment`].
//! 2. Each control's [`View::body`] reads its style from the environment,
//!    builds an immutable configuration from its current state and hands it
//!    to the style.
//! 3. The style returns an [`AnyView`], which is painted into a ratatui
//!    [`Buffer`](ratatui::buffer::Buffer) with [`AnyView::render`] or passed
//!    to `Frame::render_widget`.

pub mod action;
pub mod binding;
pub mod environment;
pub mod testing;
pub mod view;

pub use action::Action;
pub use binding::{Binding, State};
pub use environment::{Environment, EnvironmentKey, IsEnabled};
pub use view::{view_fn, AnyView, BoxedView, Scoped, View, ViewExt, ViewFn};

/// Render `view` under `env` into `area` of a ratatui frame.
pub fn render(
    view: &dyn View,
    env: &Environment,
    frame: &mut ratatui::Frame,
    area: ratatui::layout::Rect,
) {
    frame.render_widget(view.body(env), area);
}
