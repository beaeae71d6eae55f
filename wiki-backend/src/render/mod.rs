//! HTML rendering for the `view` and `edit` pages.
//!
//! Pages are built with maud, which escapes every interpolated value.
//! `DisplayBody` is the one exception: it arrives as `PreEscaped` markup from
//! the link rewriter and is inserted as-is.

use crate::error::RenderError;
use crate::pages::Page;
use maud::{html, Markup, DOCTYPE};
use std::collections::HashMap;

pub const VIEW_TEMPLATE: &str = "view";
pub const EDIT_TEMPLATE: &str = "edit";

type PageTemplate = fn(&Page) -> Markup;

fn layout(title: &str, content: Markup) -> Markup {
    html! {
        (DOCTYPE)
        html {
            head {
                meta charset="utf-8";
                title { (title) }
            }
            body { (content) }
        }
    }
}

fn view(page: &Page) -> Markup {
    layout(
        &page.title,
        html! {
            h1 { (page.title) }
            p { "[" a href={ "/edit/" (page.title) } { "edit" } "]" }
            div style="white-space: pre-wrap" { (page.display_body) }
        },
    )
}

fn edit(page: &Page) -> Markup {
    layout(
        &format!("Editing {}", page.title),
        html! {
            h1 { "Editing " (page.title) }
            form action={ "/save/" (page.title) } method="POST" {
                div {
                    textarea name="body" rows="20" cols="80" { (page.body_text()) }
                }
                div {
                    input type="submit" value="Save";
                }
            }
        },
    )
}

/// The named page templates
pub struct Templates {
    templates: HashMap<&'static str, PageTemplate>,
}

impl Default for Templates {
    fn default() -> Self {
        Self::new()
    }
}

impl Templates {
    pub fn new() -> Self {
        let mut templates: HashMap<&'static str, PageTemplate> = HashMap::new();
        templates.insert(VIEW_TEMPLATE, view);
        templates.insert(EDIT_TEMPLATE, edit);
        Self { templates }
    }

    /// Drop a template by name
    #[cfg(test)]
    pub fn without(mut self, name: &str) -> Self {
        self.templates.remove(name);
        self
    }

    /// Render the named template for a page
    pub fn render(&self, name: &str, page: &Page) -> Result<String, RenderError> {
        let template = self
            .templates
            .get(name)
            .ok_or_else(|| RenderError::UnknownTemplate(name.to_string()))?;
        Ok(template(page).into_string())
    }
}
