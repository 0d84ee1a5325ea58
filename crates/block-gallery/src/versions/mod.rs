//! The gallery's schema versions, newest first.

mod grid;
mod legacy;
mod list;
mod nested;

pub use grid::GridGallery;
pub use legacy::LegacyGallery;
pub use list::ListGallery;
pub use nested::NestedGallery;

use block_migrate::{AttributeRule, ExtractionRule, ValueType};

use crate::attr;

/// Settings every version keeps in the side-channel.
fn display_rules() -> Vec<AttributeRule> {
    vec![
        AttributeRule::new(attr::COLUMNS, ExtractionRule::comment(ValueType::Number)),
        AttributeRule::new(attr::ALIGN, ExtractionRule::comment(ValueType::String)),
        AttributeRule::new(
            attr::IMAGE_CROP,
            ExtractionRule::comment(ValueType::Boolean).with_default(true),
        ),
        AttributeRule::new(
            attr::LINK_TO,
            ExtractionRule::comment(ValueType::String).with_default("none"),
        ),
    ]
}

fn size_slug_rule() -> AttributeRule {
    AttributeRule::new(
        attr::SIZE_SLUG,
        ExtractionRule::comment(ValueType::String).with_default("large"),
    )
}

fn ids_rule() -> AttributeRule {
    AttributeRule::new(attr::IDS, ExtractionRule::comment(ValueType::Array))
}

fn gallery_caption_rule() -> AttributeRule {
    AttributeRule::new(attr::CAPTION, ExtractionRule::rich_text(".blocks-gallery-caption"))
}

fn items_rule(selector: &str, fields: Vec<AttributeRule>) -> AttributeRule {
    AttributeRule::new(attr::ITEMS, ExtractionRule::query(selector, fields))
}

fn img_attribute(key: &str, html_attribute: &str) -> AttributeRule {
    AttributeRule::new(key, ExtractionRule::attribute("img", html_attribute))
}
