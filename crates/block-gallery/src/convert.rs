//! Migrations of flat galleries.
//!
//! [`nest_items`] is the structural conversion: the flat `items` list becomes
//! one `core/image` block per item and the parent keeps only gallery-level
//! settings. [`coerce_ids`] and [`rebuild_ids`] repair the `ids` list within
//! the flat shape. All of them borrow their input and return new values.

use block_migrate::{
    AttributeMap, BlockFactory, BlockNode, ConfigurationError, Migration, MigrationContext,
};
use serde_json::Value;
use tracing::debug;

use crate::item::{identifier_of, FlatGallery, ItemRecord};
use crate::link::LinkDestination;
use crate::{attr, GALLERY_REFACTOR, IMAGE_BLOCK};

/// Convert to nested image blocks if the refactor flag is on.
///
/// The flag is read exactly once. `Ok(None)` means it is off and the caller
/// keeps the flat shape.
pub fn to_nested(
    attributes: &AttributeMap,
    inner_blocks: &[BlockNode],
    ctx: &MigrationContext<'_>,
) -> Result<Option<Migration>, ConfigurationError> {
    if !ctx.is_enabled(GALLERY_REFACTOR)? {
        debug!(flag = GALLERY_REFACTOR, "flag off, keeping flat gallery");
        return Ok(None);
    }
    Ok(Some(nest_items(attributes, inner_blocks, ctx.factory())))
}

/// Rewrite a flat gallery into image blocks.
///
/// Each item becomes a `core/image` child, in order, ahead of any inner
/// blocks the gallery already had. The parent loses `items` and `ids`, gets
/// its `linkTo` normalized and is marked not `resizable`.
pub fn nest_items(
    attributes: &AttributeMap,
    inner_blocks: &[BlockNode],
    factory: &dyn BlockFactory,
) -> Migration {
    let gallery = FlatGallery::from_attributes(attributes);
    let destination = LinkDestination::from_attributes(attributes);
    let size_slug = attributes
        .get(attr::SIZE_SLUG)
        .and_then(Value::as_str)
        .filter(|slug| !slug.is_empty());

    let mut children: Vec<BlockNode> = gallery
        .items
        .iter()
        .map(|item| factory.create(IMAGE_BLOCK, image_attributes(item, destination, size_slug)))
        .collect();
    children.extend(inner_blocks.iter().cloned());

    let mut parent = attributes.clone();
    parent.remove(attr::ITEMS);
    parent.remove(attr::IDS);
    parent.insert(attr::LINK_TO.into(), destination.as_str().into());
    parent.insert(attr::RESIZABLE.into(), Value::Bool(false));

    debug!(
        images = gallery.items.len(),
        link_to = destination.as_str(),
        "converted flat gallery to image blocks"
    );
    Migration::upgraded(parent, children)
}

fn image_attributes(
    item: &ItemRecord,
    destination: LinkDestination,
    size_slug: Option<&str>,
) -> AttributeMap {
    use crate::attr::image;

    let mut attributes = AttributeMap::new();
    if let Some(id) = item.parsed_id() {
        attributes.insert(image::ID.into(), id.into());
    }
    if let Some(url) = &item.url {
        attributes.insert(image::URL.into(), url.as_str().into());
    }
    // Extraction fills missing item fields with "", which means unset here.
    for (key, value) in [(image::ALT, &item.alt), (image::CAPTION, &item.caption)] {
        if let Some(value) = value.as_deref().filter(|value| !value.is_empty()) {
            attributes.insert(key.into(), value.into());
        }
    }
    if let Some(slug) = size_slug {
        attributes.insert(image::SIZE_SLUG.into(), slug.into());
    }
    if let Some(href) = destination.href(item) {
        attributes.insert(image::HREF.into(), href.into());
    }
    attributes.insert(image::LINK_DESTINATION.into(), destination.as_str().into());
    attributes
}

/// Coerce every `ids` entry to an integer; unparseable entries become null.
pub fn coerce_ids(attributes: &AttributeMap) -> AttributeMap {
    let mut next = attributes.clone();
    if let Some(ids) = attributes.get(attr::IDS).and_then(Value::as_array) {
        let coerced = ids
            .iter()
            .map(|id| identifier_of(id).map_or(Value::Null, Value::from))
            .collect();
        next.insert(attr::IDS.into(), Value::Array(coerced));
    }
    next
}

/// Rebuild `ids` from the identifiers on the items.
pub fn rebuild_ids(attributes: &AttributeMap) -> AttributeMap {
    let gallery = FlatGallery::from_attributes(attributes);
    let ids = gallery
        .items
        .iter()
        .map(|item| item.parsed_id().map_or(Value::Null, Value::from))
        .collect();
    let mut next = attributes.clone();
    next.insert(attr::IDS.into(), Value::Array(ids));
    next
}
