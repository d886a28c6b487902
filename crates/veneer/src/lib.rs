//! **veneer** -- Styleable controls for [`ratatui`] with environment-resolved
//! styles.
//!
//! This is the umbrella crate that re-exports everything from a single
//! dependency:
//!
//! ```toml
//! [dependencies]
//! veneer = "0.1"
//! ```
//!
//! # Re-exports
//!
//! * All public items from [`veneer_core`] are available at the crate root
//!   ([`Environment`], [`EnvironmentKey`], [`View`], [`AnyView`],
//!   [`Binding`], [`State`], [`Action`], [`render`], etc.).
//! * The [`controls`] module re-exports everything from [`veneer_controls`]
//!   (async button, cell, picker, section, stepper, text field, and the
//!   [`StyleExt`](controls::StyleExt) installers).
//! * [`ratatui`] and [`tokio`] are re-exported so downstream crates do not
//!   need to depend on them directly.
//!
//! # Quick start
//!
//! ```
//! use veneer::controls::{Cell, Section, Stepper};
//! use veneer::testing::render_view;
//! use veneer::{AnyView, Environment, State};
//!
//! let volume = State::new(3u8);
//! let screen = AnyView::vstack([
//!     veneer::View::body(&Section::titled("Audio", Cell::new("Output")), &Environment::new()),
//!     veneer::View::body(
//!         &Stepper::bounded("Volume", volume.binding(), 0..=10, 1),
//!         &Environment::new(),
//!     ),
//! ]);
//! let out = render_view(&screen, &Environment::new(), 14, 3);
//! assert_eq!(out, "Audio         \nOutput        \nVolume [-] [+]");
//! ```

pub use veneer_core::*;
pub mod controls {
    pub use veneer_controls::*;
}

// Re-export dependencies for use in demos and downstream crates
pub use ratatui;
pub use tokio;
