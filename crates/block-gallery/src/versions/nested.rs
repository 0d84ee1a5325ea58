use block_migrate::{AttributeMap, AttributeRule, BlockNode, ExtractionRule, SchemaVersion, ValueType};

use super::{display_rules, gallery_caption_rule, size_slug_rule};
use crate::attr;
use crate::markup::{figcaption, non_empty, DisplayOptions};

/// Current gallery: images are `core/image` inner blocks and the gallery's
/// own markup is just the wrapper and caption.
///
/// ```html
/// <figure class="wp-block-gallery has-nested-images columns-default is-cropped">
///   <figcaption class="blocks-gallery-caption">…</figcaption>
/// </figure>
/// ```
pub struct NestedGallery {
    rules: Vec<AttributeRule>,
}

impl NestedGallery {
    pub fn new() -> Self {
        let mut rules = display_rules();
        rules.push(size_slug_rule());
        rules.push(AttributeRule::new(
            attr::RESIZABLE,
            ExtractionRule::comment(ValueType::Boolean).with_default(false),
        ));
        rules.push(gallery_caption_rule());
        Self { rules }
    }
}

impl Default for NestedGallery {
    fn default() -> Self {
        Self::new()
    }
}

impl SchemaVersion for NestedGallery {
    fn label(&self) -> &str {
        "v6"
    }

    fn attribute_rules(&self) -> &[AttributeRule] {
        &self.rules
    }

    fn render(&self, attributes: &AttributeMap, _inner_blocks: &[BlockNode]) -> String {
        let class = DisplayOptions::from_attributes(attributes)
            .class_list(&["wp-block-gallery", "has-nested-images"], "default");
        format!(
            r#"<figure class="{class}">{}</figure>"#,
            figcaption(
                Some("blocks-gallery-caption"),
                non_empty(attributes, attr::CAPTION)
            )
        )
    }
}
