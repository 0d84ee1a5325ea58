//! Guards separating gallery versions whose markup is identical.

use crate::item::FlatGallery;

/// Whether some stored identifier still needs coercing to an integer.
///
/// Integers and explicit nulls are canonical; anything else (typically the
/// string ids older editors wrote) is not.
pub fn needs_id_coercion(gallery: &FlatGallery) -> bool {
    gallery
        .ids
        .iter()
        .flatten()
        .any(|id| !id.is_null() && id.as_i64().is_none())
}

/// Whether the `ids` list has drifted from the identifiers on the items.
///
/// Only a non-empty gallery can drift. It has drifted when `ids` is missing,
/// has a different length, or holds at some position anything other than the
/// parsed identifier of the item there (null standing for "unparseable").
pub fn ids_out_of_sync(gallery: &FlatGallery) -> bool {
    if gallery.items.is_empty() {
        return false;
    }
    let Some(ids) = gallery.ids.as_ref() else {
        return true;
    };
    if ids.len() != gallery.items.len() {
        return true;
    }
    gallery.items.iter().zip(ids).any(|(item, recorded)| {
        let recorded = if recorded.is_null() {
            Some(None)
        } else {
            recorded.as_i64().map(Some)
        };
        recorded != Some(item.parsed_id())
    })
}
