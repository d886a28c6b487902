//! Increment/decrement control with separately styleable elements.
//!
//! A stepper resolves two slots. [`StepperStyleKey`] lays out the whole
//! control. [`StepperElementStyleKey`] optionally renders the increment and
//! decrement elements; when it is empty the stepper style renders them
//! itself, which is why [`StepperStyle`] extends [`StepperElementStyle`].
//!
//! The increment and decrement behaviours are factories evaluated on every
//! render. A factory returning `None` means that direction is at its bound:
//! the configuration carries a no-op and the element renders disabled.

use crate::format::ParseableFormat;
use std::ops::RangeInclusive;
use std::sync::Arc;
use veneer_core::action::Action;
use veneer_core::binding::Binding;
use veneer_core::environment::{Environment, EnvironmentKey, IsEnabled};
use veneer_core::view::{AnyView, BoxedView, View};

/// The actions an element style wires into its increment/decrement views.
#[derive(Debug, Clone, Default)]
pub struct StepperElementConfiguration {
    /// Step up, or a no-op at the upper bound.
    pub on_increment: Action,
    /// Step down, or a no-op at the lower bound.
    pub on_decrement: Action,
}

/// What a [`StepperStyle`] lays out.
#[derive(Debug, Clone, Default)]
pub struct StepperConfiguration {
    /// The stepper's label.
    pub label: AnyView,
    /// Step up, or a no-op at the upper bound.
    pub on_increment: Action,
    /// Step down, or a no-op at the lower bound.
    pub on_decrement: Action,
    /// The rendered increment element, disabled at the upper bound.
    pub increment: AnyView,
    /// The rendered decrement element, disabled at the lower bound.
    pub decrement: AnyView,
}

/// Renders a stepper's increment and decrement elements.
pub trait StepperElementStyle: Send + Sync {
    /// Render the element that steps up.
    fn make_increment(
        &self,
        configuration: &StepperElementConfiguration,
        env: &Environment,
    ) -> AnyView;

    /// Render the element that steps down.
    fn make_decrement(
        &self,
        configuration: &StepperElementConfiguration,
        env: &Environment,
    ) -> AnyView;
}

/// Lays out a [`Stepper`], and renders its elements when no element style
/// is installed.
pub trait StepperStyle: StepperElementStyle {
    /// Lay out the label and the already-rendered elements.
    fn make_body(&self, configuration: &StepperConfiguration, env: &Environment) -> AnyView;
}

/// `[-]` and `[+]` buttons.
#[derive(Debug, Clone, Copy, Default)]
pub struct DefaultStepperElementStyle;

impl StepperElementStyle for DefaultStepperElementStyle {
    fn make_increment(
        &self,
        configuration: &StepperElementConfiguration,
        _env: &Environment,
    ) -> AnyView {
        AnyView::text("[+]").on_activate(configuration.on_increment.clone())
    }

    fn make_decrement(
        &self,
        configuration: &StepperElementConfiguration,
        _env: &Environment,
    ) -> AnyView {
        AnyView::text("[-]").on_activate(configuration.on_decrement.clone())
    }
}

/// Label followed by decrement and increment, on one row.
#[derive(Debug, Clone, Copy, Default)]
pub struct DefaultStepperStyle;

impl StepperElementStyle for DefaultStepperStyle {
    fn make_increment(
        &self,
        configuration: &StepperElementConfiguration,
        env: &Environment,
    ) -> AnyView {
        DefaultStepperElementStyle.make_increment(configuration, env)
    }

    fn make_decrement(
        &self,
        configuration: &StepperElementConfiguration,
        env: &Environment,
    ) -> AnyView {
        DefaultStepperElementStyle.make_decrement(configuration, env)
    }
}

impl StepperStyle for DefaultStepperStyle {
    fn make_body(&self, configuration: &StepperConfiguration, _env: &Environment) -> AnyView {
        AnyView::hstack(
            1,
            [
                configuration.label.clone(),
                configuration.decrement.clone(),
                configuration.increment.clone(),
            ],
        )
    }
}

/// Environment slot holding the active [`StepperStyle`].
pub struct StepperStyleKey;

impl EnvironmentKey for StepperStyleKey {
    type Value = Arc<dyn StepperStyle>;

    fn default_value() -> Arc<dyn StepperStyle> {
        Arc::new(DefaultStepperStyle)
    }
}

/// Environment slot holding an optional [`StepperElementStyle`].
///
/// Empty by default, meaning the stepper style renders its own elements.
pub struct StepperElementStyleKey;

impl EnvironmentKey for StepperElementStyleKey {
    type Value = Option<Arc<dyn StepperElementStyle>>;

    fn default_value() -> Option<Arc<dyn StepperElementStyle>> {
        None
    }
}

/// Values a stepper can step through.
///
/// Both methods return `None` when the result is not representable, which
/// the stepper treats like reaching a bound.
pub trait Steppable: Copy + PartialOrd + Send + Sync + 'static {
    /// The step type.
    type Stride: Copy + Send + Sync + 'static;

    /// `self + step`, if representable.
    fn advanced_by(self, step: Self::Stride) -> Option<Self>;

    /// `self - step`, if representable.
    fn retreated_by(self, step: Self::Stride) -> Option<Self>;
}

macro_rules! steppable_int {
    ($($t:ty),*) => {$(
        impl Steppable for $t {
            type Stride = $t;

            fn advanced_by(self, step: $t) -> Option<$t> {
                self.checked_add(step)
            }

            fn retreated_by(self, step: $t) -> Option<$t> {
                self.checked_sub(step)
            }
        }
    )*};
}

macro_rules! steppable_float {
    ($($t:ty),*) => {$(
        impl Steppable for $t {
            type Stride = $t;

            fn advanced_by(self, step: $t) -> Option<$t> {
                let next = self + step;
                next.is_finite().then_some(next)
            }

            fn retreated_by(self, step: $t) -> Option<$t> {
                let next = self - step;
                next.is_finite().then_some(next)
            }
        }
    )*};
}

steppable_int!(i8, i16, i32, i64, i128, isize, u8, u16, u32, u64, u128, usize);
steppable_float!(f32, f64);

type Factory = Arc<dyn Fn() -> Option<Action> + Send + Sync>;
type EditingChanged = Arc<dyn Fn(bool) + Send + Sync>;
type Snap<V> = Arc<dyn Fn(V) -> Option<V> + Send + Sync>;

#[derive(Clone, Copy)]
enum Direction {
    Up,
    Down,
}

/// Shared state behind the value-driven constructors.
struct Stepping<V: Steppable> {
    value: Binding<V>,
    step: V::Stride,
    bounds: Option<RangeInclusive<V>>,
    snap: Option<Snap<V>>,
}

impl<V: Steppable> Stepping<V> {
    fn stepped(&self, direction: Direction) -> Option<V> {
        let value = self.value.get();
        match direction {
            Direction::Up => value.advanced_by(self.step),
            Direction::Down => value.retreated_by(self.step),
        }
    }

    fn available(&self, direction: Direction) -> bool {
        match (self.stepped(direction), &self.bounds) {
            (Some(next), Some(bounds)) => bounds.contains(&next),
            (next, None) => next.is_some(),
            (None, _) => false,
        }
    }

    fn commit(&self, direction: Direction) {
        let Some(mut next) = self.stepped(direction) else {
            return;
        };
        if let Some(snap) = &self.snap {
            match snap(next) {
                Some(snapped) => next = snapped,
                None => return,
            }
        }
        if let Some(bounds) = &self.bounds {
            next = clamp(next, bounds);
        }
        self.value.set(next);
    }

    fn factory(
        self: &Arc<Self>,
        direction: Direction,
    ) -> impl Fn() -> Option<Action> + Send + Sync + 'static {
        let stepping = self.clone();
        move || {
            if !stepping.available(direction) {
                return None;
            }
            let stepping = stepping.clone();
            Some(Action::new(move || stepping.commit(direction)))
        }
    }
}

fn clamp<V: PartialOrd + Copy>(value: V, bounds: &RangeInclusive<V>) -> V {
    if value < *bounds.start() {
        *bounds.start()
    } else if value > *bounds.end() {
        *bounds.end()
    } else {
        value
    }
}

fn snap_through<F: ParseableFormat>(format: F) -> Snap<F::Input> {
    Arc::new(move |value| format.parse(&format.format(&value)).ok())
}

/// A control that steps a value up or down.
///
/// ```rust
/// use veneer_controls::stepper::Stepper;
/// use veneer_core::testing::render_view;
/// use veneer_core::{Environment, State};
///
/// let volume = State::new(3u8);
/// let stepper = Stepper::bounded("Volume", volume.binding(), 0..=10, 1);
/// let out = render_view(&stepper, &Environment::new(), 14, 1);
/// assert_eq!(out, "Volume [-] [+]");
///
/// let config = stepper.configuration(&Environment::new());
/// config.on_increment.call();
/// assert_eq!(volume.get(), 4);
/// ```
pub struct Stepper {
    label: BoxedView,
    on_increment: Factory,
    on_decrement: Factory,
    on_editing_changed: Option<EditingChanged>,
}

impl Stepper {
    /// A stepper driven by factories that yield the current increment and
    /// decrement actions, or `None` at a bound.
    pub fn new(
        label: impl View + 'static,
        on_increment: impl Fn() -> Option<Action> + Send + Sync + 'static,
        on_decrement: impl Fn() -> Option<Action> + Send + Sync + 'static,
    ) -> Self {
        Self {
            label: Box::new(label),
            on_increment: Arc::new(on_increment),
            on_decrement: Arc::new(on_decrement),
            on_editing_changed: None,
        }
    }

    /// Step `value` by `step` with no bounds other than the type's range.
    pub fn value<V: Steppable>(
        label: impl View + 'static,
        value: Binding<V>,
        step: V::Stride,
    ) -> Self {
        Self::stepping(
            label,
            Stepping {
                value,
                step,
                bounds: None,
                snap: None,
            },
        )
    }

    /// Step `value` by `step` within `bounds`.
    ///
    /// A direction is available only while the next step stays inside the
    /// bounds; the written value is clamped to them.
    pub fn bounded<V: Steppable>(
        label: impl View + 'static,
        value: Binding<V>,
        bounds: RangeInclusive<V>,
        step: V::Stride,
    ) -> Self {
        Self::stepping(
            label,
            Stepping {
                value,
                step,
                bounds: Some(bounds),
                snap: None,
            },
        )
    }

    /// Step `value` by `step`, snapping each result through `format`.
    ///
    /// The stepped value is formatted and parsed back before it is written,
    /// so it never holds more precision than the format displays. A step
    /// whose formatted text fails to parse leaves the value unchanged.
    pub fn formatted<V, F>(
        label: impl View + 'static,
        value: Binding<V>,
        step: V::Stride,
        format: F,
    ) -> Self
    where
        V: Steppable,
        F: ParseableFormat<Input = V>,
    {
        Self::stepping(
            label,
            Stepping {
                value,
                step,
                bounds: None,
                snap: Some(snap_through(format)),
            },
        )
    }

    /// [`bounded`](Self::bounded) and [`formatted`](Self::formatted) together.
    pub fn bounded_formatted<V, F>(
        label: impl View + 'static,
        value: Binding<V>,
        bounds: RangeInclusive<V>,
        step: V::Stride,
        format: F,
    ) -> Self
    where
        V: Steppable,
        F: ParseableFormat<Input = V>,
    {
        Self::stepping(
            label,
            Stepping {
                value,
                step,
                bounds: Some(bounds),
                snap: Some(snap_through(format)),
            },
        )
    }

    fn stepping<V: Steppable>(label: impl View + 'static, stepping: Stepping<V>) -> Self {
        let stepping = Arc::new(stepping);
        Self::new(
            label,
            stepping.factory(Direction::Up),
            stepping.factory(Direction::Down),
        )
    }

    /// Call `f(true)` before and `f(false)` after every step.
    pub fn on_editing_changed(mut self, f: impl Fn(bool) + Send + Sync + 'static) -> Self {
        self.on_editing_changed = Some(Arc::new(f));
        self
    }

    /// The current increment action, or `None` at the upper bound.
    pub fn increment_action(&self) -> Option<Action> {
        (self.on_increment)().map(|action| self.editing(action))
    }

    /// The current decrement action, or `None` at the lower bound.
    pub fn decrement_action(&self) -> Option<Action> {
        (self.on_decrement)().map(|action| self.editing(action))
    }

    /// Snapshot the stepper under `env`, rendering its elements with the
    /// element style if one is installed and the stepper style otherwise.
    pub fn configuration(&self, env: &Environment) -> StepperConfiguration {
        let style = env.get::<StepperStyleKey>();
        self.configure(style.as_ref(), env)
    }

    fn configure(&self, style: &dyn StepperStyle, env: &Environment) -> StepperConfiguration {
        let increment = self.increment_action();
        let decrement = self.decrement_action();
        let elements = StepperElementConfiguration {
            on_increment: increment.clone().unwrap_or_default(),
            on_decrement: decrement.clone().unwrap_or_default(),
        };

        let element_style = env.get::<StepperElementStyleKey>();
        let (increment_view, decrement_view) = match element_style.as_deref() {
            Some(elements_style) => (
                elements_style.make_increment(&elements, env),
                elements_style.make_decrement(&elements, env),
            ),
            None => (
                style.make_increment(&elements, env),
                style.make_decrement(&elements, env),
            ),
        };

        let enabled = env.get::<IsEnabled>();
        StepperConfiguration {
            label: self.label.body(env),
            increment: increment_view.disabled(increment.is_none() || !enabled),
            decrement: decrement_view.disabled(decrement.is_none() || !enabled),
            on_increment: elements.on_increment,
            on_decrement: elements.on_decrement,
        }
    }

    fn editing(&self, action: Action) -> Action {
        match &self.on_editing_changed {
            Some(changed) => {
                let before = changed.clone();
                let after = changed.clone();
                action.wrapped(move || before(true), move || after(false))
            }
            None => action,
        }
    }
}

impl View for Stepper {
    fn body(&self, env: &Environment) -> AnyView {
        let style = env.get::<StepperStyleKey>();
        style.make_body(&self.configure(style.as_ref(), env), env)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::format::DecimalFormat;
    use crate::StyleExt;
    use std::sync::Mutex;
    use veneer_core::binding::State;
    use veneer_core::testing::render_view;
    use veneer_core::view::ViewExt;

    struct Arrows;

    impl StepperElementStyle for Arrows {
        fn make_increment(
            &self,
            configuration: &StepperElementConfiguration,
            _env: &Environment,
        ) -> AnyView {
            AnyView::text(">").on_activate(configuration.on_increment.clone())
        }

        fn make_decrement(
            &self,
            configuration: &StepperElementConfiguration,
            _env: &Environment,
        ) -> AnyView {
            AnyView::text("<").on_activate(configuration.on_decrement.clone())
        }
    }

    struct Framed;

    impl StepperElementStyle for Framed {
        fn make_increment(
            &self,
            configuration: &StepperElementConfiguration,
            _env: &Environment,
        ) -> AnyView {
            AnyView::text("up").on_activate(configuration.on_increment.clone())
        }

        fn make_decrement(
            &self,
            configuration: &StepperElementConfiguration,
            _env: &Environment,
        ) -> AnyView {
            AnyView::text("dn").on_activate(configuration.on_decrement.clone())
        }
    }

    impl StepperStyle for Framed {
        fn make_body(&self, configuration: &StepperConfiguration, _env: &Environment) -> AnyView {
            AnyView::hstack(
                0,
                [
                    configuration.decrement.clone(),
                    AnyView::text("|"),
                    configuration.label.clone(),
                    AnyView::text("|"),
                    configuration.increment.clone(),
                ],
            )
        }
    }

    #[test]
    fn upper_bound_disables_increment() {
        let state = State::new(10);
        let stepper = Stepper::bounded("n", state.binding(), 0..=10, 1);
        assert!(stepper.increment_action().is_none());
        assert!(stepper.decrement_action().is_some());

        let config = stepper.configuration(&Environment::new());
        assert!(!config.increment.is_enabled());
        assert!(config.decrement.is_enabled());

        config.on_increment.call();
        assert_eq!(state.get(), 10);
        config.on_decrement.call();
        assert_eq!(state.get(), 9);
    }

    #[test]
    fn lower_bound_disables_decrement() {
        let state = State::new(1);
        let stepper = Stepper::bounded("n", state.binding(), 0..=10, 2);
        assert!(stepper.decrement_action().is_none());
        let config = stepper.configuration(&Environment::new());
        assert!(!config.decrement.activate());
        assert!(config.increment.activate());
        assert_eq!(state.get(), 3);
    }

    #[test]
    fn bounded_action_clamps_stale_value() {
        let state = State::new(8);
        let stepper = Stepper::bounded("n", state.binding(), 0..=10, 2);
        let increment = stepper.increment_action();
        state.set(9);
        if let Some(action) = increment {
            action.call();
        }
        assert_eq!(state.get(), 10);
    }

    #[test]
    fn unbounded_stops_at_type_limits() {
        let state = State::new(u8::MAX);
        let stepper = Stepper::value("n", state.binding(), 1);
        assert!(stepper.increment_action().is_none());
        let config = stepper.configuration(&Environment::new());
        config.on_decrement.call();
        assert_eq!(state.get(), 254);
    }

    #[test]
    fn formatted_snaps_to_format_precision() {
        let state = State::new(0.0f64);
        let stepper = Stepper::formatted("x", state.binding(), 0.26, DecimalFormat::new(1));
        let config = stepper.configuration(&Environment::new());
        config.on_increment.call();
        assert_eq!(state.get(), 0.3);
        config.on_increment.call();
        assert_eq!(state.get(), 0.6);
    }

    #[test]
    fn bounded_formatted_respects_both() {
        let state = State::new(0.5f64);
        let format = DecimalFormat::new(1);
        let stepper = Stepper::bounded_formatted("x", state.binding(), 0.0..=1.0, 0.44, format);
        let config = stepper.configuration(&Environment::new());
        config.on_increment.call();
        assert_eq!(state.get(), 0.9);
        assert!(stepper.increment_action().is_none());
        assert!(stepper.decrement_action().is_some());
    }

    #[test]
    fn editing_changed_brackets_each_step() {
        let state = State::new(0);
        let events = Arc::new(Mutex::new(Vec::new()));
        let sink = events.clone();
        let stepper = Stepper::value("n", state.binding(), 1)
            .on_editing_changed(move |editing| sink.lock().unwrap().push(editing));
        let config = stepper.configuration(&Environment::new());
        config.on_increment.call();
        config.on_decrement.call();
        assert_eq!(*events.lock().unwrap(), vec![true, false, true, false]);
        assert_eq!(state.get(), 0);
    }

    #[test]
    fn default_style_renders_label_and_buttons() {
        let state = State::new(5);
        let stepper = Stepper::value("Count", state.binding(), 1);
        assert_eq!(render_view(&stepper, &Environment::new(), 13, 1), "Count [-] [+]");
    }

    #[test]
    fn element_style_overrides_primary_elements() {
        let state = State::new(5);
        let stepper = Stepper::value("n", state.binding(), 1)
            .stepper_style(Framed)
            .stepper_element_style(Arrows);
        assert_eq!(render_view(&stepper, &Environment::new(), 5, 1), "<|n|>");
    }

    #[test]
    fn primary_style_renders_elements_without_element_style() {
        let state = State::new(5);
        let stepper = Stepper::value("n", state.binding(), 1).stepper_style(Framed);
        assert_eq!(render_view(&stepper, &Environment::new(), 7, 1), "dn|n|up");
    }

    #[test]
    fn element_style_applies_under_default_layout() {
        let state = State::new(5);
        let stepper = Stepper::value("n", state.binding(), 1).stepper_element_style(Arrows);
        assert_eq!(render_view(&stepper, &Environment::new(), 5, 1), "n < >");
    }

    #[test]
    fn disabled_subtree_disables_elements() {
        let state = State::new(5);
        let view = Stepper::value("n", state.binding(), 1)
            .disabled(true)
            .body(&Environment::new());
        for element in view.children() {
            assert!(!element.activate());
        }
        assert_eq!(state.get(), 5);
    }
}
