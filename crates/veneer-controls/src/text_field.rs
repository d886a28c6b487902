//! Text entry bound to a typed value through a [`ParseableFormat`].
//!
//! The field shows the formatted value until an edit fails to parse. From
//! then on it shows the raw text the user typed, leaves the bound value
//! alone, and publishes the failure under [`TextFieldParseError`] for the
//! style to display. The next successful edit commits and clears both.

use crate::error::ParseError;
use crate::format::{IdentityFormat, ParseableFormat};
use ratatui::style::{Color, Modifier, Style};
use std::sync::Arc;
use veneer_core::binding::{Binding, State};
use veneer_core::environment::{Environment, EnvironmentKey};
use veneer_core::view::{AnyView, BoxedView, View};

/// The direction a field grows in as its text gets longer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Axis {
    /// A single row. The label sits beside the text and line breaks in the
    /// text are shown as spaces.
    #[default]
    Horizontal,
    /// The text takes one row per line, below the label.
    Vertical,
}

/// What a [`TextFieldStyle`] lays out.
#[derive(Debug, Clone)]
pub struct TextFieldConfiguration {
    /// The field's label.
    pub label: AnyView,
    /// The displayed text. Writing to it runs the field's parse logic.
    pub text: Binding<String>,
    /// Shown by the default style while the text is empty.
    pub placeholder: Option<String>,
    /// Growth direction and label placement.
    pub axis: Axis,
    /// The field's focus flag.
    pub is_focused: Binding<bool>,
}

/// Renders a [`TextField`].
///
/// The most recent parse failure, if any, is readable from the environment
/// passed to [`make_body`](Self::make_body) under [`TextFieldParseError`].
pub trait TextFieldStyle: Send + Sync {
    /// Lay out the field.
    fn make_body(&self, configuration: &TextFieldConfiguration, env: &Environment) -> AnyView;
}

/// Label and text along the configured axis, with any parse error in red
/// underneath.
#[derive(Debug, Clone, Copy, Default)]
pub struct DefaultTextFieldStyle;

impl TextFieldStyle for DefaultTextFieldStyle {
    fn make_body(&self, configuration: &TextFieldConfiguration, env: &Environment) -> AnyView {
        let text = configuration.text.get();
        let mut field = match (&configuration.placeholder, text.is_empty()) {
            (Some(placeholder), true) => AnyView::styled_text(
                placeholder.clone(),
                Style::default().add_modifier(Modifier::DIM),
            ),
            _ => match configuration.axis {
                Axis::Horizontal => AnyView::text(text.replace('\n', " ")),
                Axis::Vertical => AnyView::text(text),
            },
        };
        if configuration.is_focused.get() {
            field = field.style(Style::default().add_modifier(Modifier::UNDERLINED));
        }

        let row = match configuration.axis {
            Axis::Horizontal => AnyView::hstack(1, [configuration.label.clone(), field]),
            Axis::Vertical => AnyView::vstack([configuration.label.clone(), field]),
        };
        let error = env
            .get::<TextFieldParseError>()
            .map(|error| AnyView::styled_text(error.to_string(), Style::default().fg(Color::Red)))
            .unwrap_or_default();
        AnyView::vstack([row, error])
    }
}

/// Environment slot holding the active [`TextFieldStyle`].
pub struct TextFieldStyleKey;

impl EnvironmentKey for TextFieldStyleKey {
    type Value = Arc<dyn TextFieldStyle>;

    fn default_value() -> Arc<dyn TextFieldStyle> {
        Arc::new(DefaultTextFieldStyle)
    }
}

/// The enclosing text field's most recent parse failure.
pub struct TextFieldParseError;

impl EnvironmentKey for TextFieldParseError {
    type Value = Option<ParseError>;

    fn default_value() -> Option<ParseError> {
        None
    }
}

/// A text field editing a value of type `F::Input`.
///
/// ```rust
/// use veneer_controls::format::NumberFormat;
/// use veneer_controls::text_field::TextField;
/// use veneer_core::State;
///
/// let age = State::new(30u32);
/// let field = TextField::new("Age", age.binding(), NumberFormat::new("age"));
///
/// field.edit("31");
/// assert_eq!(age.get(), 31);
///
/// field.edit("thirty");
/// assert_eq!(age.get(), 31);
/// assert_eq!(field.displayed_text(), "thirty");
/// assert!(field.parse_error().is_some());
/// ```
pub struct TextField<F: ParseableFormat> {
    label: BoxedView,
    editor: Arc<Editor<F>>,
    prompt: Option<String>,
    axis: Axis,
    focused: State<bool>,
}

/// Input that failed to parse, kept together with the formatted value it
/// was typed over.
#[derive(Clone)]
struct Pending {
    text: String,
    error: ParseError,
    over: String,
}

struct Editor<F: ParseableFormat> {
    value: Binding<F::Input>,
    format: F,
    pending: State<Option<Pending>>,
}

impl<F: ParseableFormat> Editor<F> {
    /// The unparsed input, unless the value was written from outside since
    /// it was typed. A write that formats the same is not noticed.
    fn pending(&self) -> Option<Pending> {
        let pending = self.pending.get()?;
        (pending.over == self.format.format(&self.value.get())).then_some(pending)
    }

    fn text(&self) -> String {
        match self.pending() {
            Some(pending) => pending.text,
            None => self.format.format(&self.value.get()),
        }
    }

    fn commit(&self, text: String) {
        match self.format.parse(&text) {
            Ok(parsed) => {
                self.value.set(parsed);
                self.pending.set(None);
            }
            Err(error) => {
                tracing::debug!(input = %text, %error, "text field kept unparsed input");
                let over = self.format.format(&self.value.get());
                self.pending.set(Some(Pending { text, error, over }));
            }
        }
    }
}

impl TextField<IdentityFormat> {
    /// A field editing a plain string.
    pub fn text(label: impl View + 'static, text: Binding<String>) -> Self {
        Self::new(label, text, IdentityFormat)
    }
}

impl<F: ParseableFormat> TextField<F> {
    /// A field editing `value`, converting with `format`.
    pub fn new(label: impl View + 'static, value: Binding<F::Input>, format: F) -> Self {
        Self {
            label: Box::new(label),
            editor: Arc::new(Editor {
                value,
                format,
                pending: State::new(None),
            }),
            prompt: None,
            axis: Axis::default(),
            focused: State::new(false),
        }
    }

    /// Placeholder shown while the text is empty.
    pub fn prompt(mut self, prompt: impl Into<String>) -> Self {
        self.prompt = Some(prompt.into());
        self
    }

    /// Growth direction and label placement.
    pub fn axis(mut self, axis: Axis) -> Self {
        self.axis = axis;
        self
    }

    /// The text binding styles receive.
    ///
    /// Reads return the unparsed input if there is any, otherwise the
    /// formatted value. Writes parse and either commit or keep the raw text.
    /// Writing the bound value from outside discards unparsed input.
    pub fn text_binding(&self) -> Binding<String> {
        let read = self.editor.clone();
        let write = self.editor.clone();
        Binding::new(move || read.text(), move |text| write.commit(text))
    }

    /// Apply an edit as if the user had typed `text`.
    pub fn edit(&self, text: impl Into<String>) {
        self.text_binding().set(text.into());
    }

    /// The text the field currently shows.
    pub fn displayed_text(&self) -> String {
        self.text_binding().get()
    }

    /// The most recent parse failure, cleared by the next successful edit
    /// or by writing the bound value from outside.
    pub fn parse_error(&self) -> Option<ParseError> {
        self.editor.pending().map(|pending| pending.error)
    }

    /// Give the field focus.
    pub fn focus(&self) {
        self.focused.set(true);
    }

    /// Take focus away from the field.
    pub fn blur(&self) {
        self.focused.set(false);
    }

    /// Whether the field has focus.
    pub fn is_focused(&self) -> bool {
        self.focused.get()
    }

    /// Snapshot the field under `env`.
    pub fn configuration(&self, env: &Environment) -> TextFieldConfiguration {
        TextFieldConfiguration {
            label: self.label.body(env),
            text: self.text_binding(),
            placeholder: self.prompt.clone(),
            axis: self.axis,
            is_focused: self.focused.binding(),
        }
    }
}

impl<F: ParseableFormat> View for TextField<F> {
    fn body(&self, env: &Environment) -> AnyView {
        let env = env.with::<TextFieldParseError>(self.parse_error());
        let style = env.get::<TextFieldStyleKey>();
        style.make_body(&self.configuration(&env), &env)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::format::{DecimalFormat, NumberFormat};
    use crate::StyleExt;
    use veneer_core::testing::render_view;

    struct Status;

    impl TextFieldStyle for Status {
        fn make_body(&self, configuration: &TextFieldConfiguration, env: &Environment) -> AnyView {
            let status = match env.get::<TextFieldParseError>() {
                Some(_) => "ERR",
                None => "OK",
            };
            AnyView::hstack(1, [AnyView::text(configuration.text.get()), AnyView::text(status)])
        }
    }

    fn age(state: &State<i32>) -> TextField<NumberFormat<i32>> {
        TextField::new("Age", state.binding(), NumberFormat::new("integer"))
    }

    #[test]
    fn successful_edit_commits_value() {
        let state = State::new(42);
        let field = age(&state);
        assert_eq!(field.displayed_text(), "42");
        field.edit("17");
        assert_eq!(state.get(), 17);
        assert_eq!(field.displayed_text(), "17");
        assert_eq!(field.parse_error(), None);
    }

    #[test]
    fn failed_edit_keeps_value_and_raw_text() {
        let state = State::new(42);
        let field = age(&state);
        field.edit("1x");
        assert_eq!(state.get(), 42);
        assert_eq!(field.displayed_text(), "1x");
        assert_eq!(
            field.parse_error(),
            Some(ParseError::Invalid {
                input: "1x".into(),
                expected: "integer",
            })
        );
    }

    #[test]
    fn recovery_clears_unparsed_input_and_error() {
        let state = State::new(1);
        let field = age(&state);
        field.edit("");
        assert_eq!(field.parse_error(), Some(ParseError::Empty));
        assert_eq!(field.displayed_text(), "");
        field.edit(" 5 ");
        assert_eq!(state.get(), 5);
        assert_eq!(field.displayed_text(), "5");
        assert_eq!(field.parse_error(), None);
    }

    #[test]
    fn outside_write_replaces_unparsed_input() {
        let state = State::new(42);
        let field = age(&state);
        field.edit("abc");
        state.set(7);
        assert_eq!(field.displayed_text(), "7");
        assert_eq!(field.parse_error(), None);

        field.edit("7x");
        state.set(0);
        assert_eq!(render_view(&field, &Environment::new(), 5, 2), "Age 0\n     ");
    }

    #[test]
    fn formatted_value_round_trips() {
        let state = State::new(2.5);
        let field = TextField::new("x", state.binding(), DecimalFormat::new(2));
        assert_eq!(field.displayed_text(), "2.50");
        let shown = field.displayed_text();
        field.edit(shown);
        assert_eq!(state.get(), 2.5);
        assert_eq!(field.parse_error(), None);
    }

    #[test]
    fn configuration_binding_writes_through() {
        let state = State::new(String::from("a"));
        let field = TextField::text("Name", state.binding());
        let config = field.configuration(&Environment::new());
        config.text.set("bob".into());
        assert_eq!(state.get(), "bob");
        config.is_focused.set(true);
        assert!(field.is_focused());
        field.blur();
        assert!(!config.is_focused.get());
    }

    #[test]
    fn parse_error_reaches_style_through_environment() {
        let state = State::new(3);
        let field = age(&state).text_field_style(Status);
        let env = Environment::new();
        assert_eq!(render_view(&field, &env, 4, 1), "3 OK");
        field.inner().edit("z");
        assert_eq!(render_view(&field, &env, 5, 1), "z ERR");
    }

    #[test]
    fn parse_error_does_not_leak_to_siblings() {
        let env = Environment::new();
        let state = State::new(3);
        let field = age(&state);
        field.edit("bad");
        let _ = field.body(&env);
        assert_eq!(env.get::<TextFieldParseError>(), None);
    }

    #[test]
    fn default_style_horizontal_and_vertical() {
        let state = State::new(7);
        let env = Environment::new();
        assert_eq!(render_view(&age(&state), &env, 5, 1), "Age 7");
        let vertical = age(&state).axis(Axis::Vertical);
        assert_eq!(render_view(&vertical, &env, 3, 2), "Age\n7  ");
    }

    #[test]
    fn axis_decides_how_text_grows() {
        let state = State::new(String::from("a\nb"));
        let env = Environment::new();
        let single = TextField::text("Note", state.binding());
        assert_eq!(render_view(&single, &env, 8, 1), "Note a b");
        let multi = TextField::text("Note", state.binding()).axis(Axis::Vertical);
        assert_eq!(render_view(&multi, &env, 4, 3), "Note\na   \nb   ");
    }

    #[test]
    fn default_style_shows_prompt_when_empty() {
        let state = State::new(String::new());
        let field = TextField::text("Name", state.binding()).prompt("you");
        assert_eq!(render_view(&field, &Environment::new(), 8, 1), "Name you");
    }

    #[test]
    fn default_style_shows_parse_error_below() {
        let state = State::new(7);
        let field = age(&state);
        field.edit("q");
        let out = render_view(&field, &Environment::new(), 30, 2);
        assert_eq!(out, format!("{:<30}\n{:<30}", "Age q", "\"q\" is not a valid integer"));
    }
}
