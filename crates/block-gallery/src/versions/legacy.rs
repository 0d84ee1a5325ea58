use block_migrate::{
    AttributeMap, AttributeRule, BlockNode, ConfigurationError, Migration, MigrationContext,
    SchemaVersion,
};

use super::{display_rules, img_attribute, items_rule};
use crate::attr::item;
use crate::columns::legacy_default_columns;
use crate::convert::to_nested;
use crate::item::FlatGallery;
use crate::link::LinkDestination;
use crate::markup::{image_tag, link_wrap, DisplayOptions};

/// The original gallery: a `<div>` of figures, no captions.
///
/// ```html
/// <div class="wp-block-gallery columns-2 is-cropped">
///   <figure class="blocks-gallery-image"><img src="…" alt="" data-id="…"/></figure>
/// </div>
/// ```
pub struct LegacyGallery {
    rules: Vec<AttributeRule>,
}

impl LegacyGallery {
    pub fn new() -> Self {
        let mut rules = display_rules();
        rules.push(items_rule(
            ".blocks-gallery-image",
            vec![
                img_attribute(item::URL, "src"),
                img_attribute(item::ALT, "alt"),
                img_attribute(item::ID, "data-id"),
            ],
        ));
        Self { rules }
    }
}

impl Default for LegacyGallery {
    fn default() -> Self {
        Self::new()
    }
}

impl SchemaVersion for LegacyGallery {
    fn label(&self) -> &str {
        "v1"
    }

    fn attribute_rules(&self) -> &[AttributeRule] {
        &self.rules
    }

    fn migrate(
        &self,
        attributes: &AttributeMap,
        inner_blocks: &[BlockNode],
        ctx: &MigrationContext<'_>,
    ) -> Result<Migration, ConfigurationError> {
        Ok(to_nested(attributes, inner_blocks, ctx)?
            .unwrap_or_else(|| Migration::unchanged(attributes, inner_blocks)))
    }

    fn render(&self, attributes: &AttributeMap, _inner_blocks: &[BlockNode]) -> String {
        let items = FlatGallery::from_attributes(attributes).items;
        let destination = LinkDestination::from_attributes(attributes);
        let class = DisplayOptions::from_attributes(attributes)
            .class_list(&["wp-block-gallery"], legacy_default_columns(Some(items.len())));

        let images: String = items
            .iter()
            .map(|image| {
                let img = image_tag(
                    image.url.as_deref(),
                    image.alt.as_deref(),
                    &[("data-id", image.id.as_deref())],
                );
                format!(
                    r#"<figure class="blocks-gallery-image">{}</figure>"#,
                    link_wrap(destination.href(image).as_deref(), img)
                )
            })
            .collect();

        format!(r#"<div class="{class}">{images}</div>"#)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn media_links_point_at_the_image() {
        let attributes = json!({
            "imageCrop": true,
            "linkTo": "media",
            "align": "wide",
            "items": [{"url": "a.png", "alt": "A", "id": "1"}]
        });
        assert_eq!(
            LegacyGallery::new().render(attributes.as_object().unwrap(), &[]),
            concat!(
                r#"<div class="wp-block-gallery columns-1 is-cropped alignwide">"#,
                r#"<figure class="blocks-gallery-image"><a href="a.png"><img src="a.png" alt="A" data-id="1"/></a></figure>"#,
                r#"</div>"#
            )
        );
    }

    #[test]
    fn attachment_links_need_a_link_the_legacy_markup_never_had() {
        let attributes = json!({
            "imageCrop": false,
            "linkTo": "attachment",
            "items": [{"url": "a.png", "alt": "", "id": "1"}]
        });
        assert_eq!(
            LegacyGallery::new().render(attributes.as_object().unwrap(), &[]),
            r#"<div class="wp-block-gallery columns-1"><figure class="blocks-gallery-image"><img src="a.png" alt="" data-id="1"/></figure></div>"#
        );
    }
}
