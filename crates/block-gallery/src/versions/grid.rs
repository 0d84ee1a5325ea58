use block_migrate::{
    AttributeMap, AttributeRule, BlockNode, ConfigurationError, ExtractionRule, Migration,
    MigrationContext, SchemaVersion,
};

use super::{display_rules, gallery_caption_rule, ids_rule, img_attribute, items_rule, size_slug_rule};
use crate::columns::default_columns;
use crate::convert::{coerce_ids, to_nested};
use crate::eligibility::needs_id_coercion;
use crate::item::FlatGallery;
use crate::link::LinkDestination;
use crate::markup::{figcaption, image_tag, link_wrap, non_empty, DisplayOptions};
use crate::{attr, attr::item};

/// Flat gallery rendered as a grid inside a `<figure>`.
///
/// ```html
/// <figure class="wp-block-gallery columns-3 is-cropped">
///   <ul class="blocks-gallery-grid">
///     <li class="blocks-gallery-item"><figure><img src="…" alt="…" data-id="…"/></figure></li>
///   </ul>
/// </figure>
/// ```
///
/// Two versions share this markup. The newer one ([`GridGallery::coercing`])
/// is only eligible while `ids` still holds string identifiers, and coerces
/// them to integers.
pub struct GridGallery {
    label: &'static str,
    coerces_ids: bool,
    rules: Vec<AttributeRule>,
}

impl GridGallery {
    /// The version that stored string ids.
    pub fn coercing() -> Self {
        Self::with("v5", true)
    }

    /// The first grid version.
    pub fn plain() -> Self {
        Self::with("v4", false)
    }

    fn with(label: &'static str, coerces_ids: bool) -> Self {
        let mut rules = display_rules();
        rules.push(size_slug_rule());
        rules.push(ids_rule());
        rules.push(gallery_caption_rule());
        rules.push(items_rule(
            ".blocks-gallery-item",
            vec![
                img_attribute(item::URL, "src"),
                img_attribute(item::FULL_URL, "data-full-url"),
                img_attribute(item::LINK, "data-link"),
                img_attribute(item::ALT, "alt"),
                img_attribute(item::ID, "data-id"),
                AttributeRule::new(
                    item::CAPTION,
                    ExtractionRule::rich_text(".blocks-gallery-item__caption"),
                ),
            ],
        ));
        Self {
            label,
            coerces_ids,
            rules,
        }
    }
}

impl SchemaVersion for GridGallery {
    fn label(&self) -> &str {
        self.label
    }

    fn attribute_rules(&self) -> &[AttributeRule] {
        &self.rules
    }

    fn is_eligible(&self, attributes: &AttributeMap) -> bool {
        !self.coerces_ids || needs_id_coercion(&FlatGallery::from_attributes(attributes))
    }

    fn migrate(
        &self,
        attributes: &AttributeMap,
        inner_blocks: &[BlockNode],
        ctx: &MigrationContext<'_>,
    ) -> Result<Migration, ConfigurationError> {
        if !self.coerces_ids {
            return Ok(to_nested(attributes, inner_blocks, ctx)?
                .unwrap_or_else(|| Migration::unchanged(attributes, inner_blocks)));
        }
        let repaired = coerce_ids(attributes);
        Ok(match to_nested(&repaired, inner_blocks, ctx)? {
            Some(migration) => migration,
            None => Migration::repaired(repaired, inner_blocks),
        })
    }

    fn render(&self, attributes: &AttributeMap, _inner_blocks: &[BlockNode]) -> String {
        let items = FlatGallery::from_attributes(attributes).items;
        let destination = LinkDestination::from_attributes(attributes);
        let class = DisplayOptions::from_attributes(attributes)
            .class_list(&["wp-block-gallery"], default_columns(Some(items.len())));

        let images: String = items
            .iter()
            .map(|image| {
                let img = image_tag(
                    image.url.as_deref(),
                    image.alt.as_deref(),
                    &[
                        ("data-id", image.id.as_deref()),
                        ("data-full-url", image.full_url.as_deref()),
                        ("data-link", image.link.as_deref()),
                    ],
                );
                format!(
                    r#"<li class="blocks-gallery-item"><figure>{}{}</figure></li>"#,
                    link_wrap(destination.href(image).as_deref(), img),
                    figcaption(
                        Some("blocks-gallery-item__caption"),
                        image.caption.as_deref()
                    )
                )
            })
            .collect();

        format!(
            r#"<figure class="{class}"><ul class="blocks-gallery-grid">{images}</ul>{}</figure>"#,
            figcaption(
                Some("blocks-gallery-caption"),
                non_empty(attributes, attr::CAPTION)
            )
        )
    }
}
