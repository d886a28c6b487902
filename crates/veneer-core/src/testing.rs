//! Headless rendering helpers for tests.
//!
//! These render a [`View`] into an off-screen ratatui [`Buffer`] so that
//! controls and styles can be exercised in a plain `#[test]` function, with
//! no terminal and no runtime.
//!
//! # Example
//!
//! ```rust
//! use veneer_core::environment::Environment;
//! use veneer_core::testing::render_view;
//!
//! let output = render_view(&"Hello", &Environment::new(), 8, 1);
//! assert_eq!(output, "Hello   ");
//! ```

use crate::environment::Environment;
use crate::view::{AnyView, View};
use ratatui::buffer::Buffer;
use ratatui::layout::Rect;

/// Render `view` under `env` into a fresh buffer of the given dimensions.
pub fn render_buffer(view: &dyn View, env: &Environment, width: u16, height: u16) -> Buffer {
    let area = Rect::new(0, 0, width, height);
    let mut buf = Buffer::empty(area);
    AnyView::render(&view.body(env), area, &mut buf);
    buf
}

/// Render `view` under `env` and return the visible content as a string.
///
/// Each buffer row becomes one line; rows are separated by newlines and
/// trailing whitespace within a row is preserved.
pub fn render_view(view: &dyn View, env: &Environment, width: u16, height: u16) -> String {
    buffer_to_string(&render_buffer(view, env, width, height))
}

/// Flatten a buffer into rows of cell symbols.
pub fn buffer_to_string(buf: &Buffer) -> String {
    let area = buf.area;
    let mut output = String::new();
    for y in area.top()..area.bottom() {
        for x in area.left()..area.right() {
            output.push_str(buf[(x, y)].symbol());
        }
        if y + 1 < area.bottom() {
            output.push('\n');
        }
    }
    output
}
