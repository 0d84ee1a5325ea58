use block_migrate::AttributeMap;
use serde_json::Value;

use crate::attr;

/// One image of a flat (pre-nesting) gallery.
///
/// Built from an element of the `items` attribute. Identifiers were stored
/// as strings in some versions and as numbers in others; both are kept here
/// as their string form.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ItemRecord {
    pub id: Option<String>,
    pub url: Option<String>,
    pub alt: Option<String>,
    pub caption: Option<String>,
    pub link: Option<String>,
    pub full_url: Option<String>,
}

impl ItemRecord {
    /// Read an item. Never fails: non-objects and mistyped fields are absent.
    pub fn from_value(value: &Value) -> Self {
        let field = |key: &str| value.get(key).and_then(Value::as_str).map(str::to_string);
        let id = match value.get(attr::item::ID) {
            Some(Value::String(id)) => Some(id.clone()),
            Some(Value::Number(id)) => Some(id.to_string()),
            _ => None,
        };
        Self {
            id,
            url: field(attr::item::URL),
            alt: field(attr::item::ALT),
            caption: field(attr::item::CAPTION),
            link: field(attr::item::LINK),
            full_url: field(attr::item::FULL_URL),
        }
    }

    /// The identifier as an integer, if it parses.
    pub fn parsed_id(&self) -> Option<i64> {
        self.id.as_deref().and_then(parse_identifier)
    }
}

/// Parse an identifier the way the stored data was written: surrounding
/// whitespace is ignored, an optional sign is accepted, and the longest run
/// of leading digits is the value (`"12px"` is 12). Returns `None` when there
/// are no leading digits or the value overflows.
pub fn parse_identifier(source: &str) -> Option<i64> {
    let trimmed = source.trim();
    let (negative, rest) = match trimmed.as_bytes().first() {
        Some(b'-') => (true, &trimmed[1..]),
        Some(b'+') => (false, &trimmed[1..]),
        _ => (false, trimmed),
    };
    let end = rest
        .bytes()
        .position(|b| !b.is_ascii_digit())
        .unwrap_or(rest.len());
    if end == 0 {
        return None;
    }
    let magnitude: i64 = rest[..end].parse().ok()?;
    Some(if negative { -magnitude } else { magnitude })
}

/// Integer identifier of a stored `ids` entry, with the same leniency as
/// [`parse_identifier`]. Fractions are truncated.
pub fn identifier_of(value: &Value) -> Option<i64> {
    match value {
        Value::String(id) => parse_identifier(id),
        Value::Number(id) => id.as_i64().or_else(|| parse_identifier(&id.to_string())),
        _ => None,
    }
}

/// Typed view of a flat gallery's `items` and `ids` attributes.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FlatGallery {
    pub items: Vec<ItemRecord>,
    /// The separately stored identifier list, if present at all.
    pub ids: Option<Vec<Value>>,
}

impl FlatGallery {
    pub fn from_attributes(attributes: &AttributeMap) -> Self {
        let items = attributes
            .get(attr::ITEMS)
            .and_then(Value::as_array)
            .map(|items| items.iter().map(ItemRecord::from_value).collect())
            .unwrap_or_default();
        let ids = attributes
            .get(attr::IDS)
            .and_then(Value::as_array)
            .cloned();
        Self { items, ids }
    }
}
