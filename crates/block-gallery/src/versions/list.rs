use block_migrate::{
    AttributeMap, AttributeRule, BlockNode, ConfigurationError, ExtractionRule, Migration,
    MigrationContext, SchemaVersion,
};

use super::{display_rules, ids_rule, img_attribute, items_rule};
use crate::attr::item;
use crate::columns::legacy_default_columns;
use crate::convert::{rebuild_ids, to_nested};
use crate::eligibility::ids_out_of_sync;
use crate::item::FlatGallery;
use crate::link::LinkDestination;
use crate::markup::{figcaption, image_tag, link_wrap, DisplayOptions};

/// Flat gallery rendered as a bare `<ul>`.
///
/// ```html
/// <ul class="wp-block-gallery columns-2 is-cropped">
///   <li class="blocks-gallery-item"><figure><img src="…" alt="" data-id="…"/></figure></li>
/// </ul>
/// ```
///
/// Two versions share this markup. The newer one
/// ([`ListGallery::resyncing`]) is only eligible while `ids` disagrees with
/// the identifiers on the items, and rebuilds it from them.
pub struct ListGallery {
    label: &'static str,
    rebuilds_ids: bool,
    rules: Vec<AttributeRule>,
}

impl ListGallery {
    /// The version that let `ids` drift from the items.
    pub fn resyncing() -> Self {
        Self::with("v3", true)
    }

    /// The first list version.
    pub fn plain() -> Self {
        Self::with("v2", false)
    }

    fn with(label: &'static str, rebuilds_ids: bool) -> Self {
        let mut rules = display_rules();
        rules.push(ids_rule());
        rules.push(items_rule(
            ".blocks-gallery-item",
            vec![
                img_attribute(item::URL, "src"),
                img_attribute(item::LINK, "data-link"),
                img_attribute(item::ALT, "alt"),
                img_attribute(item::ID, "data-id"),
                AttributeRule::new(item::CAPTION, ExtractionRule::rich_text("figcaption")),
            ],
        ));
        Self {
            label,
            rebuilds_ids,
            rules,
        }
    }
}

impl SchemaVersion for ListGallery {
    fn label(&self) -> &str {
        self.label
    }

    fn attribute_rules(&self) -> &[AttributeRule] {
        &self.rules
    }

    fn is_eligible(&self, attributes: &AttributeMap) -> bool {
        !self.rebuilds_ids || ids_out_of_sync(&FlatGallery::from_attributes(attributes))
    }

    fn migrate(
        &self,
        attributes: &AttributeMap,
        inner_blocks: &[BlockNode],
        ctx: &MigrationContext<'_>,
    ) -> Result<Migration, ConfigurationError> {
        if !self.rebuilds_ids {
            return Ok(to_nested(attributes, inner_blocks, ctx)?
                .unwrap_or_else(|| Migration::unchanged(attributes, inner_blocks)));
        }
        let repaired = rebuild_ids(attributes);
        Ok(match to_nested(&repaired, inner_blocks, ctx)? {
            Some(migration) => migration,
            None => Migration::repaired(repaired, inner_blocks),
        })
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
                    &[
                        ("data-id", image.id.as_deref()),
                        ("data-link", image.link.as_deref()),
                    ],
                );
                format!(
                    r#"<li class="blocks-gallery-item"><figure>{}{}</figure></li>"#,
                    link_wrap(destination.href(image).as_deref(), img),
                    figcaption(None, image.caption.as_deref())
                )
            })
            .collect();

        format!(r#"<ul class="{class}">{images}</ul>"#)
    }
}
