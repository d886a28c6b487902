//! Styleable controls for **veneer**.
//!
//! Every control renders in three steps: it reads its style from the
//! [`Environment`](veneer_core::Environment), snapshots its current state
//! into an immutable configuration, and asks the style to turn that
//! configuration into an [`AnyView`](veneer_core::AnyView). Install a style
//! for a subtree with the [`StyleExt`] methods; controls outside that
//! subtree keep their inherited or default style.
//!
//! # Controls
//!
//! | Module | Control | Style slots |
//! |--------|---------|-------------|
//! | [`async_button`] | Button running an async action | none (role and loading marker) |
//! | [`cell`] | List row with secondary text, image, accessory | [`CellStyleKey`](cell::CellStyleKey) |
//! | [`picker`] | Single or multiple choice | [`PickerStyleKey`](picker::PickerStyleKey), [`PickerItemStyleKey`](picker_item::PickerItemStyleKey) |
//! | [`section`] | Grouped content with header and footer | [`SectionStyleKey`](section::SectionStyleKey) |
//! | [`stepper`] | Increment/decrement | [`StepperStyleKey`](stepper::StepperStyleKey), [`StepperElementStyleKey`](stepper::StepperElementStyleKey) |
//! | [`text_field`] | Text bound to a parsed value | [`TextFieldStyleKey`](text_field::TextFieldStyleKey) |
//!
//! # Support
//!
//! | Module | Description |
//! |--------|-------------|
//! | [`execution`] | Run tracking, cancellation and loading state for async buttons |
//! | [`format`] | [`ParseableFormat`](format::ParseableFormat) and built-in formats |
//! | [`selection`] | Single/multiple [`Selection`](selection::Selection) binding |
//! | [`error`] | Parse and execution errors |

pub mod async_button;
pub mod cell;
pub mod error;
pub mod execution;
pub mod format;
pub mod picker;
pub mod picker_item;
pub mod section;
pub mod selection;
pub mod stepper;
pub mod style_ext;
pub mod text_field;

pub use async_button::{AsyncButton, ButtonRole, IsLoading};
pub use cell::Cell;
pub use error::{ExecutionError, ParseError};
pub use execution::{AsyncButtonOptions, ExecutionState};
pub use format::{DecimalFormat, IdentityFormat, NumberFormat, ParseableFormat};
pub use picker::{Picker, PickerSelection};
pub use picker_item::PickerItem;
pub use section::Section;
pub use selection::{Selection, SelectionMode};
pub use stepper::Stepper;
pub use style_ext::StyleExt;
pub use text_field::{Axis, TextField, TextFieldParseError};
