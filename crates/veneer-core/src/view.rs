//! The render protocol shared by controls and styles.
//!
//! A [`View`] turns the ambient [`Environment`] into an [`AnyView`]: an opaque,
//! type-erased renderable that knows its preferred size, whether it is
//! enabled, and optionally an [`Action`] to run when activated. Styles
//! receive already-rendered `AnyView`s for their slots and compose them with
//! the stack helpers.

use crate::action::Action;
use crate::environment::{Environment, EnvironmentKey, IsEnabled};
use ratatui::buffer::Buffer;
use ratatui::layout::{Rect, Size};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span, Text};
use ratatui::widgets::{Paragraph, Widget};
use std::fmt;
use std::sync::Arc;
use unicode_width::UnicodeWidthStr;

type RenderFn = dyn Fn(Rect, &mut Buffer) + Send + Sync;

/// Something that can describe itself as an [`AnyView`] given an environment.
///
/// Controls implement `View`; so do strings, [`AnyView`] itself and
/// [`ViewFn`] closures, which makes them usable wherever a label or content
/// slot is expected.
pub trait View: Send + Sync {
    /// Produce the renderable for the current state under `env`.
    fn body(&self, env: &Environment) -> AnyView;
}

/// A boxed [`View`], the storage type for label and content slots.
pub type BoxedView = Box<dyn View>;

impl View for AnyView {
    fn body(&self, _env: &Environment) -> AnyView {
        self.clone()
    }
}

impl View for &'static str {
    fn body(&self, _env: &Environment) -> AnyView {
        AnyView::text(*self)
    }
}

impl View for String {
    fn body(&self, _env: &Environment) -> AnyView {
        AnyView::text(self.clone())
    }
}

impl View for Line<'static> {
    fn body(&self, _env: &Environment) -> AnyView {
        AnyView::from(self.clone())
    }
}

impl<V: View + ?Sized> View for Box<V> {
    fn body(&self, env: &Environment) -> AnyView {
        (**self).body(env)
    }
}

impl<V: View + ?Sized> View for Arc<V> {
    fn body(&self, env: &Environment) -> AnyView {
        (**self).body(env)
    }
}

/// A view built from a closure over the environment.
pub struct ViewFn<F>(F);

/// Wrap a closure as a [`View`].
///
/// ```rust
/// use veneer_core::view::{view_fn, AnyView, View};
/// use veneer_core::environment::{Environment, IsEnabled};
///
/// let label = view_fn(|env: &Environment| {
///     if env.get::<IsEnabled>() { AnyView::text("on") } else { AnyView::text("off") }
/// });
/// assert_eq!(label.body(&Environment::new()).size().width, 2);
/// ```
pub fn view_fn<F>(f: F) -> ViewFn<F>
where
    F: Fn(&Environment) -> AnyView + Send + Sync,
{
    ViewFn(f)
}

impl<F> View for ViewFn<F>
where
    F: Fn(&Environment) -> AnyView + Send + Sync,
{
    fn body(&self, env: &Environment) -> AnyView {
        (self.0)(env)
    }
}

/// A type-erased renderable produced by a [`View`] or a style.
///
/// Cloning is cheap. The render closure paints into whatever area it is
/// given; [`size`](AnyView::size) is only a preference used by the stack
/// helpers.
#[derive(Clone)]
pub struct AnyView {
    render: Arc<RenderFn>,
    size: Size,
    enabled: bool,
    action: Option<Action>,
    children: Arc<[AnyView]>,
}

impl AnyView {
    /// Wrap a render closure with a preferred size.
    pub fn new(size: Size, render: impl Fn(Rect, &mut Buffer) + Send + Sync + 'static) -> Self {
        Self {
            render: Arc::new(render),
            size,
            enabled: true,
            action: None,
            children: Arc::from(Vec::new()),
        }
    }

    /// A view that takes no space and draws nothing.
    pub fn empty() -> Self {
        Self::new(Size::new(0, 0), |_, _| {})
    }

    /// Plain text. Multi-line strings take one row per line.
    pub fn text(text: impl Into<String>) -> Self {
        Self::styled_text(text, Style::default())
    }

    /// Text with a style applied.
    pub fn styled_text(text: impl Into<String>, style: Style) -> Self {
        let text: String = text.into();
        let size = text_size(&text);
        let paragraph = Paragraph::new(Text::raw(text)).style(style);
        Self::widget(size, paragraph)
    }

    /// Any clonable ratatui widget with an explicit preferred size.
    pub fn widget<W>(size: Size, widget: W) -> Self
    where
        W: Widget + Clone + Send + Sync + 'static,
    {
        Self::new(size, move |area, buf| widget.clone().render(area, buf))
    }

    /// Stack views top to bottom, each at its preferred height.
    pub fn vstack(children: impl IntoIterator<Item = AnyView>) -> Self {
        let children: Arc<[AnyView]> = children.into_iter().collect();
        let size = Size::new(
            children.iter().map(|c| c.size.width).max().unwrap_or(0),
            children
                .iter()
                .fold(0u16, |acc, c| acc.saturating_add(c.size.height)),
        );
        let laid_out = children.clone();
        let mut view = Self::new(size, move |area, buf| {
            let mut y = area.y;
            for child in laid_out.iter() {
                let bottom = area.bottom();
                if y >= bottom {
                    break;
                }
                let height = child.size.height.min(bottom - y);
                if height > 0 {
                    AnyView::render(child, Rect::new(area.x, y, area.width, height), buf);
                }
                y = y.saturating_add(child.size.height);
            }
        });
        view.children = children;
        view
    }

    /// Place views left to right, each at its preferred width, separated by
    /// `spacing` columns. Empty views take no space and no spacing.
    pub fn hstack(spacing: u16, children: impl IntoIterator<Item = AnyView>) -> Self {
        let children: Arc<[AnyView]> = children.into_iter().collect();
        let visible = children.iter().filter(|c| !c.is_empty()).count() as u16;
        let size = Size::new(
            children
                .iter()
                .filter(|c| !c.is_empty())
                .fold(0u16, |acc, c| acc.saturating_add(c.size.width))
                .saturating_add(spacing.saturating_mul(visible.saturating_sub(1))),
            children.iter().map(|c| c.size.height).max().unwrap_or(0),
        );
        let laid_out = children.clone();
        let mut view = Self::new(size, move |area, buf| {
            let mut x = area.x;
            for child in laid_out.iter().filter(|c| !c.is_empty()) {
                let right = area.right();
                if x >= right {
                    break;
                }
                let width = child.size.width.min(right - x);
                AnyView::render(child, Rect::new(x, area.y, width, area.height), buf);
                x = x.saturating_add(child.size.width).saturating_add(spacing);
            }
        });
        view.children = children;
        view
    }

    /// Paint this view into `area` of `buf`.
    pub fn render(&self, area: Rect, buf: &mut Buffer) {
        let area = area.intersection(buf.area);
        if area.is_empty() {
            return;
        }
        (self.render)(area, buf);
        if !self.enabled {
            buf.set_style(self.occupied(area), Style::default().add_modifier(Modifier::DIM));
        }
    }

    /// Overlay `style` on the cells this view occupies.
    pub fn style(self, style: Style) -> Self {
        let inner = self.clone();
        let mut view = Self::new(self.size, move |area, buf| {
            AnyView::render(&inner, area, buf);
            buf.set_style(inner.occupied(area), style);
        });
        view.enabled = self.enabled;
        view.action = self.action;
        view.children = self.children;
        view
    }

    /// Reserve extra columns to the right and rows below.
    pub fn padded(mut self, columns: u16, rows: u16) -> Self {
        self.size = Size::new(
            self.size.width.saturating_add(columns),
            self.size.height.saturating_add(rows),
        );
        self
    }

    /// Override the preferred size.
    pub fn with_size(mut self, size: Size) -> Self {
        self.size = size;
        self
    }

    /// Mark the view disabled. Disabled views render dimmed and ignore
    /// [`activate`](AnyView::activate). Passing `false` never re-enables a
    /// view that is already disabled.
    pub fn disabled(mut self, disabled: bool) -> Self {
        self.enabled &= !disabled;
        self
    }

    /// Attach an action run by [`activate`](AnyView::activate).
    pub fn on_activate(mut self, action: Action) -> Self {
        self.action = Some(action);
        self
    }

    /// Run the attached action if the view is enabled. Returns whether an
    /// action ran.
    pub fn activate(&self) -> bool {
        match (&self.action, self.enabled) {
            (Some(action), true) => {
                action.call();
                true
            }
            _ => false,
        }
    }

    /// Preferred size.
    pub fn size(&self) -> Size {
        self.size
    }

    /// Whether this view takes no space.
    pub fn is_empty(&self) -> bool {
        self.size.width == 0 || self.size.height == 0
    }

    /// Whether this view accepts activation.
    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Whether an action is attached.
    pub fn is_interactive(&self) -> bool {
        self.action.is_some()
    }

    /// Children of a stack, in layout order. Empty for leaf views.
    pub fn children(&self) -> &[AnyView] {
        &self.children
    }

    fn occupied(&self, area: Rect) -> Rect {
        Rect::new(
            area.x,
            area.y,
            self.size.width.min(area.width),
            self.size.height.min(area.height),
        )
    }
}

impl Default for AnyView {
    fn default() -> Self {
        Self::empty()
    }
}

impl fmt::Debug for AnyView {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AnyView")
            .field("size", &self.size)
            .field("enabled", &self.enabled)
            .field("interactive", &self.action.is_some())
            .field("children", &self.children.len())
            .finish()
    }
}

impl Widget for AnyView {
    fn render(self, area: Rect, buf: &mut Buffer) {
        AnyView::render(&self, area, buf);
    }
}

impl Widget for &AnyView {
    fn render(self, area: Rect, buf: &mut Buffer) {
        AnyView::render(self, area, buf);
    }
}

impl From<&str> for AnyView {
    fn from(text: &str) -> Self {
        AnyView::text(text)
    }
}

impl From<String> for AnyView {
    fn from(text: String) -> Self {
        AnyView::text(text)
    }
}

impl From<Span<'static>> for AnyView {
    fn from(span: Span<'static>) -> Self {
        AnyView::from(Line::from(span))
    }
}

impl From<Line<'static>> for AnyView {
    fn from(line: Line<'static>) -> Self {
        let size = Size::new(line.width().min(u16::MAX as usize) as u16, 1);
        AnyView::widget(size, line)
    }
}

fn text_size(text: &str) -> Size {
    if text.is_empty() {
        return Size::new(0, 0);
    }
    let width = text.lines().map(UnicodeWidthStr::width).max().unwrap_or(0);
    let height = text.lines().count().max(1);
    Size::new(
        width.min(u16::MAX as usize) as u16,
        height.min(u16::MAX as usize) as u16,
    )
}

type Override = Arc<dyn Fn(&Environment) -> Environment + Send + Sync>;

/// A view rendered under an extended environment.
///
/// Returned by [`ViewExt::environment`] and the style-applying extension
/// methods of the controls crate. Further overrides on a `Scoped` view are
/// appended to the same wrapper and sit outside the earlier ones, so the
/// override written closest to the view wins, exactly as if each call had
/// wrapped the view again.
pub struct Scoped<V> {
    inner: V,
    overrides: Vec<Override>,
    disabled: bool,
}

impl<V: View> Scoped<V> {
    /// Wrap `inner` with no overrides yet.
    pub fn new(inner: V) -> Self {
        Self {
            inner,
            overrides: Vec::new(),
            disabled: false,
        }
    }

    /// Override `K` for the wrapped subtree, unless an override already on
    /// this wrapper sets `K` too.
    pub fn environment<K: EnvironmentKey>(mut self, value: K::Value) -> Self {
        self.overrides
            .push(Arc::new(move |env: &Environment| env.with::<K>(value.clone())));
        self
    }

    /// Disable the wrapped subtree.
    pub fn disabled(mut self, disabled: bool) -> Self {
        self.disabled |= disabled;
        self
    }

    /// The environment the wrapped view will see under `env`.
    pub fn scope(&self, env: &Environment) -> Environment {
        let mut scoped = self
            .overrides
            .iter()
            .rev()
            .fold(env.clone(), |env, apply| apply(&env));
        if self.disabled {
            scoped = scoped.with::<IsEnabled>(false);
        }
        scoped
    }

    /// The wrapped view.
    pub fn inner(&self) -> &V {
        &self.inner
    }
}

impl<V: View> View for Scoped<V> {
    fn body(&self, env: &Environment) -> AnyView {
        let scoped = self.scope(env);
        self.inner.body(&scoped).disabled(!scoped.get::<IsEnabled>())
    }
}

/// Modifiers available on every [`View`].
pub trait ViewExt: View + Sized {
    /// Override `K` for this view and its descendants.
    fn environment<K: EnvironmentKey>(self, value: K::Value) -> Scoped<Self> {
        Scoped::new(self).environment::<K>(value)
    }

    /// Disable this view and its descendants.
    fn disabled(self, disabled: bool) -> Scoped<Self> {
        Scoped::new(self).disabled(disabled)
    }

    /// Erase the concrete type.
    fn boxed(self) -> BoxedView
    where
        Self: 'static,
    {
        Box::new(self)
    }
}

impl<V: View> ViewExt for V {}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::render_view;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[test]
    fn text_size_counts_columns_and_lines() {
        assert_eq!(AnyView::text("hello").size(), Size::new(5, 1));
        assert_eq!(AnyView::text("ab\nabcd").size(), Size::new(4, 2));
        assert!(AnyView::text("").is_empty());
    }

    #[test]
    fn vstack_sums_heights() {
        let stack = AnyView::vstack([AnyView::text("a"), AnyView::text("bbb\nc")]);
        assert_eq!(stack.size(), Size::new(3, 3));
        assert_eq!(stack.children().len(), 2);
        assert_eq!(render_view(&stack, &Environment::new(), 3, 3), "a  \nbbb\nc  ");
    }

    #[test]
    fn hstack_skips_empty_children() {
        let stack = AnyView::hstack(
            1,
            [AnyView::text("a"), AnyView::empty(), AnyView::text("b")],
        );
        assert_eq!(stack.size(), Size::new(3, 1));
        assert_eq!(render_view(&stack, &Environment::new(), 4, 1), "a b ");
    }

    #[test]
    fn hstack_width_ignores_zero_height_children() {
        let flat = AnyView::text("xyz").with_size(Size::new(3, 0));
        let stack = AnyView::hstack(1, [AnyView::text("a"), flat, AnyView::text("b")]);
        assert_eq!(stack.size(), Size::new(3, 1));
        assert_eq!(render_view(&stack, &Environment::new(), 3, 1), "a b");
    }

    #[test]
    fn rendering_clips_to_area() {
        let stack = AnyView::vstack([AnyView::text("one"), AnyView::text("two")]);
        assert_eq!(render_view(&stack, &Environment::new(), 3, 1), "one");
    }

    #[test]
    fn disabled_view_ignores_activation() {
        let hits = Arc::new(AtomicUsize::new(0));
        let counter = hits.clone();
        let action = Action::new(move || {
            counter.fetch_add(1, Ordering::SeqCst);
        });
        let view = AnyView::text("go").on_activate(action);
        assert!(view.activate());
        let disabled = view.disabled(true);
        assert!(!disabled.activate());
        assert!(!disabled.clone().disabled(false).is_enabled());
        assert_eq!(hits.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn style_keeps_metadata() {
        let view = AnyView::text("x")
            .on_activate(Action::noop())
            .disabled(true)
            .style(Style::default().add_modifier(Modifier::BOLD));
        assert!(view.is_interactive());
        assert!(!view.is_enabled());
    }

    #[test]
    fn scoped_view_sees_override() {
        struct Word;
        impl EnvironmentKey for Word {
            type Value = &'static str;
            fn default_value() -> &'static str {
                "plain"
            }
        }

        let label = view_fn(|env: &Environment| AnyView::text(env.get::<Word>()));
        let scoped = label.environment::<Word>("fancy");
        assert_eq!(render_view(&scoped, &Environment::new(), 5, 1), "fancy");
    }

    #[test]
    fn innermost_override_on_one_wrapper_wins() {
        struct Word;
        impl EnvironmentKey for Word {
            type Value = &'static str;
            fn default_value() -> &'static str {
                "plain"
            }
        }

        let label = || view_fn(|env: &Environment| AnyView::text(env.get::<Word>()));
        let env = Environment::new();

        let chained = label()
            .environment::<Word>("inner")
            .environment::<Word>("outer");
        assert_eq!(render_view(&chained, &env, 5, 1), "inner");

        let nested =
            Scoped::new(label().environment::<Word>("inner")).environment::<Word>("outer");
        assert_eq!(render_view(&nested, &env, 5, 1), "inner");
    }

    #[test]
    fn disabled_scope_propagates_to_output_and_environment() {
        let probe = view_fn(|env: &Environment| {
            AnyView::text(if env.get::<IsEnabled>() { "on" } else { "off" })
                .on_activate(Action::noop())
        });
        let view = probe.disabled(true).body(&Environment::new());
        assert!(!view.is_enabled());
        assert!(!view.activate());
    }
}
