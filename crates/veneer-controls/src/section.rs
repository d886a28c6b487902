//! Grouped content with an optional header and footer.

use crate::cell::render_slot;
use ratatui::style::{Modifier, Style};
use std::sync::Arc;
use veneer_core::environment::{Environment, EnvironmentKey};
use veneer_core::view::{AnyView, BoxedView, View};

/// The slots a [`SectionStyle`] lays out.
#[derive(Debug, Clone, Default)]
pub struct SectionConfiguration {
    /// Title above the content.
    pub header: AnyView,
    /// Note below the content.
    pub footer: AnyView,
    /// The grouped rows.
    pub content: AnyView,
}

/// Renders a [`Section`].
pub trait SectionStyle: Send + Sync {
    /// Lay out the section's slots.
    fn make_body(&self, configuration: &SectionConfiguration, env: &Environment) -> AnyView;
}

/// Bold header, content, dimmed footer, top to bottom.
#[derive(Debug, Clone, Copy, Default)]
pub struct DefaultSectionStyle;

impl SectionStyle for DefaultSectionStyle {
    fn make_body(&self, configuration: &SectionConfiguration, _env: &Environment) -> AnyView {
        AnyView::vstack([
            configuration
                .header
                .clone()
                .style(Style::default().add_modifier(Modifier::BOLD)),
            configuration.content.clone(),
            configuration
                .footer
                .clone()
                .style(Style::default().add_modifier(Modifier::DIM)),
        ])
    }
}

/// Environment slot holding the active [`SectionStyle`].
pub struct SectionStyleKey;

impl EnvironmentKey for SectionStyleKey {
    type Value = Arc<dyn SectionStyle>;

    fn default_value() -> Arc<dyn SectionStyle> {
        Arc::new(DefaultSectionStyle)
    }
}

/// A group of content with optional header and footer.
pub struct Section {
    content: BoxedView,
    header: Option<BoxedView>,
    footer: Option<BoxedView>,
}

impl Section {
    /// A section around `content` with no header or footer.
    pub fn new(content: impl View + 'static) -> Self {
        Self {
            content: Box::new(content),
            header: None,
            footer: None,
        }
    }

    /// A section with a text header.
    pub fn titled(title: impl Into<String>, content: impl View + 'static) -> Self {
        Self::new(content).header(title.into())
    }

    /// Set the header.
    pub fn header(mut self, view: impl View + 'static) -> Self {
        self.header = Some(Box::new(view));
        self
    }

    /// Set the footer.
    pub fn footer(mut self, view: impl View + 'static) -> Self {
        self.footer = Some(Box::new(view));
        self
    }

    /// Snapshot the section's slots under `env`.
    pub fn configuration(&self, env: &Environment) -> SectionConfiguration {
        SectionConfiguration {
            header: render_slot(&self.header, env),
            footer: render_slot(&self.footer, env),
            content: self.content.body(env),
        }
    }
}

impl View for Section {
    fn body(&self, env: &Environment) -> AnyView {
        let style = env.get::<SectionStyleKey>();
        style.make_body(&self.configuration(env), env)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Cell, StyleExt};
    use veneer_core::testing::render_view;

    struct Boxed;

    impl SectionStyle for Boxed {
        fn make_body(&self, configuration: &SectionConfiguration, _env: &Environment) -> AnyView {
            AnyView::hstack(
                0,
                [
                    AnyView::text("<"),
                    configuration.header.clone(),
                    AnyView::text(":"),
                    configuration.content.clone(),
                    AnyView::text(">"),
                ],
            )
        }
    }

    #[test]
    fn default_style_stacks_header_content_footer() {
        let section = Section::titled("Network", "rows").footer("note");
        let out = render_view(&section, &Environment::new(), 7, 3);
        assert_eq!(out, "Network\nrows   \nnote   ");
    }

    #[test]
    fn header_and_footer_are_optional() {
        let section = Section::new("only");
        let out = render_view(&section, &Environment::new(), 4, 2);
        assert_eq!(out, "only\n    ");
    }

    #[test]
    fn custom_style_reaches_nested_sections() {
        let tree = Section::titled("A", Section::titled("B", "x")).section_style(Boxed);
        let out = render_view(&tree, &Environment::new(), 9, 1);
        assert_eq!(out, "<A:<B:x>>");
    }

    #[test]
    fn section_style_does_not_affect_cells() {
        let tree = Section::titled("H", Cell::new("c").accessory(">")).section_style(Boxed);
        let out = render_view(&tree, &Environment::new(), 7, 1);
        assert_eq!(out, "<H:c >>");
    }
}
