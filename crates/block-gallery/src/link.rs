use core::fmt;

use block_migrate::AttributeMap;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::attr;
use crate::item::ItemRecord;

/// Where a gallery image links to.
///
/// Every spelling ever stored in `linkTo` maps onto exactly one of these; see
/// [`LinkDestination::remap`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LinkDestination {
    /// The image file itself.
    Media,
    /// The attachment page.
    Attachment,
    /// No link.
    #[default]
    None,
}

impl LinkDestination {
    pub const ALL: [Self; 3] = [Self::Media, Self::Attachment, Self::None];

    /// Map a stored `linkTo` spelling onto a destination.
    ///
    /// Total: `file` and `post` are the image block's spellings of `media`
    /// and `attachment`; absent, empty and unknown values are `None`.
    pub fn remap(value: Option<&str>) -> Self {
        match value {
            Some("media") | Some("file") => Self::Media,
            Some("attachment") | Some("post") => Self::Attachment,
            _ => Self::None,
        }
    }

    /// Remap the `linkTo` attribute. Non-string values count as absent.
    pub fn from_attributes(attributes: &AttributeMap) -> Self {
        Self::remap(attributes.get(attr::LINK_TO).and_then(Value::as_str))
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Media => "media",
            Self::Attachment => "attachment",
            Self::None => "none",
        }
    }

    /// The link target this destination gives an image, if any.
    ///
    /// `Media` prefers the full-size url over the display url. Empty strings
    /// count as absent.
    pub fn href(self, item: &ItemRecord) -> Option<String> {
        let present = |value: &Option<String>| value.as_ref().filter(|s| !s.is_empty()).cloned();
        match self {
            Self::Media => present(&item.full_url).or_else(|| present(&item.url)),
            Self::Attachment => present(&item.link),
            Self::None => None,
        }
    }
}

impl fmt::Display for LinkDestination {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
