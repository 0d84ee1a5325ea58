//! Markup fragments shared by the gallery renderers.

use core::fmt;

use block_migrate::AttributeMap;
use block_migrate_html::escape_attribute;
use serde_json::Value;

use crate::attr;

/// Gallery-level display settings every version renders as classes.
pub(crate) struct DisplayOptions<'a> {
    columns: Option<String>,
    align: Option<&'a str>,
    crop: bool,
}

impl<'a> DisplayOptions<'a> {
    pub(crate) fn from_attributes(attributes: &'a AttributeMap) -> Self {
        let columns = match attributes.get(attr::COLUMNS) {
            Some(Value::Number(columns)) => Some(columns.to_string()),
            _ => None,
        };
        Self {
            columns,
            align: non_empty(attributes, attr::ALIGN),
            crop: attributes
                .get(attr::IMAGE_CROP)
                .and_then(Value::as_bool)
                .unwrap_or(true),
        }
    }

    /// `base` classes followed by `columns-N`, `is-cropped` and the
    /// alignment class. `fallback` is the column count used when the author
    /// never picked one.
    pub(crate) fn class_list(&self, base: &[&str], fallback: impl fmt::Display) -> String {
        let mut classes: Vec<String> = base.iter().map(|class| class.to_string()).collect();
        match &self.columns {
            Some(columns) => classes.push(format!("columns-{columns}")),
            None => classes.push(format!("columns-{fallback}")),
        }
        if self.crop {
            classes.push("is-cropped".into());
        }
        if let Some(align) = self.align {
            classes.push(format!("align{align}"));
        }
        escape_attribute(&classes.join(" "))
    }
}

/// A string attribute, treating `""` as absent.
pub(crate) fn non_empty<'a>(attributes: &'a AttributeMap, key: &str) -> Option<&'a str> {
    attributes
        .get(key)
        .and_then(Value::as_str)
        .filter(|value| !value.is_empty())
}

/// An `<img>` tag. `alt` is always written; other attributes only when
/// non-empty.
pub(crate) fn image_tag(src: Option<&str>, alt: Option<&str>, data: &[(&str, Option<&str>)]) -> String {
    let mut tag = String::from("<img");
    push_attribute(&mut tag, "src", src);
    tag.push_str(&format!(
        r#" alt="{}""#,
        escape_attribute(alt.unwrap_or_default())
    ));
    for (name, value) in data {
        push_attribute(&mut tag, name, *value);
    }
    tag.push_str("/>");
    tag
}

fn push_attribute(tag: &mut String, name: &str, value: Option<&str>) {
    if let Some(value) = value.filter(|value| !value.is_empty()) {
        tag.push_str(&format!(r#" {name}="{}""#, escape_attribute(value)));
    }
}

/// Wrap `content` in a link when there is a target.
pub(crate) fn link_wrap(href: Option<&str>, content: String) -> String {
    match href {
        Some(href) => format!(r#"<a href="{}">{content}</a>"#, escape_attribute(href)),
        None => content,
    }
}

/// A `<figcaption>` holding rich text, or nothing when the caption is empty.
pub(crate) fn figcaption(class: Option<&str>, html: Option<&str>) -> String {
    match (html.filter(|html| !html.is_empty()), class) {
        (Some(html), Some(class)) => format!(r#"<figcaption class="{class}">{html}</figcaption>"#),
        (Some(html), None) => format!("<figcaption>{html}</figcaption>"),
        (None, _) => String::new(),
    }
}
