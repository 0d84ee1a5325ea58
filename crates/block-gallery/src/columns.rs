/// Column count used when the author never picked one: one column per
/// image up to three. No images (or an unknown count) still renders three.
pub fn default_columns(image_count: Option<usize>) -> u32 {
    match image_count {
        Some(n) if n > 0 => n.min(3) as u32,
        _ => 3,
    }
}

/// The formula the list and div era galleries rendered with.
///
/// It took `min(3, images.length)` with no guard, so an empty gallery got
/// `columns-0` and a missing image list produced `NaN`. Stored markup carries
/// those classes, so the quirk has to be reproduced for it to validate.
pub fn legacy_default_columns(image_count: Option<usize>) -> f64 {
    match image_count {
        Some(n) => n.min(3) as f64,
        None => f64::NAN,
    }
}
