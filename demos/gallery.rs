//! # Gallery
//!
//! Renders every control once with the default styles and once with custom
//! styles installed for a subtree, then runs an async button to completion
//! while printing its state changes.
//!
//! - Installing styles with [`StyleExt`] and scoping them to a subtree
//! - A picker style that also renders its items
//! - A stepper element style layered over the default stepper layout
//! - Surfacing text field parse errors
//! - Observing an async button through `state_changes()`
//!
//! Run with: `RUST_LOG=veneer_controls=debug cargo run --example gallery`

use futures::StreamExt;
use std::collections::HashSet;
use std::time::Duration;
use tracing_subscriber::EnvFilter;
use veneer::controls::cell::{CellConfiguration, CellStyle};
use veneer::controls::format::NumberFormat;
use veneer::controls::picker::{PickerConfiguration, PickerStyle};
use veneer::controls::picker_item::PickerItemConfiguration;
use veneer::controls::stepper::{StepperElementConfiguration, StepperElementStyle};
use veneer::controls::{
    AsyncButton, AsyncButtonOptions, Cell, Picker, PickerItem, Section, Stepper, StyleExt,
    TextField,
};
use veneer::ratatui::style::{Color, Modifier, Style};
use veneer::testing::render_view;
use veneer::{view_fn, AnyView, BoxedView, Environment, State, View, ViewExt};

/// Cells drawn as a bullet list with the accessory in brackets.
struct Bulleted;

impl CellStyle for Bulleted {
    fn make_body(&self, configuration: &CellConfiguration, _env: &Environment) -> AnyView {
        let accessory = if configuration.accessory.is_empty() {
            AnyView::empty()
        } else {
            AnyView::hstack(
                0,
                [
                    AnyView::text("("),
                    configuration.accessory.clone(),
                    AnyView::text(")"),
                ],
            )
        };
        AnyView::hstack(1, [AnyView::text("•"), configuration.label.clone(), accessory])
    }
}

/// A segmented control: options side by side, the selected one reversed.
struct Segmented;

impl PickerStyle for Segmented {
    fn make_body(&self, configuration: &PickerConfiguration, _env: &Environment) -> AnyView {
        let segments = configuration.content.children().iter().cloned();
        AnyView::hstack(
            1,
            [
                configuration.label.clone(),
                AnyView::hstack(0, segments),
            ],
        )
    }

    fn provides_items(&self) -> bool {
        true
    }

    fn make_item(&self, configuration: &PickerItemConfiguration, _env: &Environment) -> AnyView {
        let segment = AnyView::hstack(
            0,
            [
                AnyView::text(" "),
                configuration.label.clone(),
                AnyView::text(" "),
            ],
        );
        if configuration.is_selected {
            segment.style(Style::default().add_modifier(Modifier::REVERSED))
        } else {
            segment
        }
    }
}

/// Arrow glyphs instead of bracketed signs.
struct Arrows;

impl StepperElementStyle for Arrows {
    fn make_increment(
        &self,
        configuration: &StepperElementConfiguration,
        _env: &Environment,
    ) -> AnyView {
        AnyView::styled_text("▲", Style::default().fg(Color::Green))
            .on_activate(configuration.on_increment.clone())
    }

    fn make_decrement(
        &self,
        configuration: &StepperElementConfiguration,
        _env: &Environment,
    ) -> AnyView {
        AnyView::styled_text("▼", Style::default().fg(Color::Red))
            .on_activate(configuration.on_decrement.clone())
    }
}

fn screen(
    flavor: &State<&'static str>,
    toppings: &State<HashSet<&'static str>>,
    scoops: &State<u8>,
    age: &State<u32>,
) -> Vec<BoxedView> {
    let cells = Section::titled(
        "Cells",
        view_list(vec![
            Cell::new("Wi-Fi").secondary("Home").accessory(">").boxed(),
            Cell::new("Bluetooth").accessory("On").boxed(),
        ]),
    );

    let pickers = Section::titled(
        "Pickers",
        view_list(vec![
            Picker::single(flavor.binding(), "Flavor")
                .option("mint", "Mint")
                .option("lime", "Lime")
                .option("plum", "Plum")
                .picker_style(Segmented)
                .boxed(),
            Picker::multiple(toppings.binding(), "Toppings")
                .option("nuts", "Nuts")
                .option("fudge", "Fudge")
                .item(PickerItem::new("gold", "Gold leaf").selection_disabled(true))
                .boxed(),
        ]),
    );

    let steppers = Section::titled(
        "Steppers",
        view_list(vec![
            Stepper::bounded("Scoops", scoops.binding(), 1..=5, 1).boxed(),
            Stepper::bounded("Scoops", scoops.binding(), 1..=5, 1)
                .stepper_element_style(Arrows)
                .boxed(),
        ]),
    )
    .footer("Bounds 1 to 5");

    let field = TextField::new("Age", age.binding(), NumberFormat::new("age"));
    field.edit("forty");
    let fields = Section::titled("Text fields", field);

    vec![
        Box::new(cells.cell_style(Bulleted)),
        Box::new(pickers),
        Box::new(steppers),
        Box::new(fields),
    ]
}

fn view_list(views: Vec<BoxedView>) -> impl View {
    view_fn(move |env: &Environment| AnyView::vstack(views.iter().map(|view| view.body(env))))
}

#[veneer::tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let flavor = State::new("lime");
    let toppings = State::new(HashSet::from(["fudge"]));
    let scoops = State::new(5u8);
    let age = State::new(40u32);

    let env = Environment::new();
    for section in screen(&flavor, &toppings, &scoops, &age) {
        println!("{}\n", render_view(&*section, &env, 40, 8).trim_end());
    }

    let button = AsyncButton::new("Upload", || async {
        veneer::tokio::time::sleep(Duration::from_millis(600)).await;
    })
    .options(AsyncButtonOptions::empty());

    button.trigger()?;
    let mut changes = button.state_changes();
    while let Some(state) = changes.next().await {
        println!("{}  {:?}", render_view(&button, &env, 12, 1).trim_end(), state);
        if !state.is_running {
            break;
        }
    }
    Ok(())
}
