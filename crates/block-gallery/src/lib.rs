//! # block-gallery
//!
//! Schema history of the image gallery block, declared for `block-migrate`.
//!
//! ## Versions
//!
//! Tried in this order:
//!
//! | Label | Markup | Notes |
//! |-------|--------|-------|
//! | `v6` (current) | `<figure class="wp-block-gallery has-nested-images">` | images are `core/image` inner blocks |
//! | `v5` | `<figure>` + `<ul class="blocks-gallery-grid">` | eligible only while `ids` holds non-integers |
//! | `v4` | same as `v5` | |
//! | `v3` | `<ul class="wp-block-gallery">` | eligible only while `ids` disagrees with the items |
//! | `v2` | same as `v3` | |
//! | `v1` | `<div class="wp-block-gallery">` | legacy `figure.blocks-gallery-image` items |
//!
//! Every deprecated version converts its flat `items` list into image
//! blocks when the [`GALLERY_REFACTOR`] flag is on. With the flag off `v5`
//! and `v3` still repair their `ids`, the rest pass through.
//!
//! ## Quick Start
//!
//! ```ignore
//! use block_gallery::gallery_block_type;
//! use block_migrate::{DefaultBlockFactory, FlagConfig, MigrationResolver, StrictFlags};
//! use block_migrate_html::{HtmlParser, HtmlValidator};
//!
//! let gallery = gallery_block_type()?;
//! let resolver = MigrationResolver::new(&gallery, &HtmlParser, &HtmlValidator);
//! let flags = StrictFlags::new(FlagConfig::default().with_flag("gallery-refactor", true));
//! let migrated = resolver.migrate(&raw_block, &flags, &DefaultBlockFactory)?;
//! ```

pub mod columns;
pub mod convert;
pub mod eligibility;
pub mod item;
pub mod link;
mod markup;
pub mod versions;

pub use columns::{default_columns, legacy_default_columns};
pub use convert::{coerce_ids, nest_items, rebuild_ids, to_nested};
pub use item::{parse_identifier, FlatGallery, ItemRecord};
pub use link::LinkDestination;

use block_migrate::{BlockRegistry, BlockType, RegistryError};

/// Registered name of the gallery block.
pub const BLOCK_NAME: &str = "core/gallery";

/// Block type created for each converted image.
pub const IMAGE_BLOCK: &str = "core/image";

/// Feature flag gating the flat-to-nested conversion.
pub const GALLERY_REFACTOR: &str = "gallery-refactor";

/// Attribute names.
pub mod attr {
    pub const ITEMS: &str = "items";
    pub const IDS: &str = "ids";
    pub const COLUMNS: &str = "columns";
    pub const CAPTION: &str = "caption";
    pub const IMAGE_CROP: &str = "imageCrop";
    pub const LINK_TO: &str = "linkTo";
    pub const SIZE_SLUG: &str = "sizeSlug";
    pub const ALIGN: &str = "align";
    pub const RESIZABLE: &str = "resizable";

    /// Keys of one element of `items`.
    pub mod item {
        pub const ID: &str = "id";
        pub const URL: &str = "url";
        pub const ALT: &str = "alt";
        pub const CAPTION: &str = "caption";
        pub const LINK: &str = "link";
        pub const FULL_URL: &str = "fullUrl";
    }

    /// Attributes of a converted image block.
    pub mod image {
        pub const ID: &str = "id";
        pub const URL: &str = "url";
        pub const ALT: &str = "alt";
        pub const CAPTION: &str = "caption";
        pub const HREF: &str = "href";
        pub const LINK_DESTINATION: &str = "linkDestination";
        pub const SIZE_SLUG: &str = "sizeSlug";
    }
}

/// The gallery block type with its full version history.
pub fn gallery_block_type() -> Result<BlockType, RegistryError> {
    BlockType::builder(BLOCK_NAME, versions::NestedGallery::new())
        .deprecated(versions::GridGallery::coercing())
        .deprecated(versions::GridGallery::plain())
        .deprecated(versions::ListGallery::resyncing())
        .deprecated(versions::ListGallery::plain())
        .deprecated(versions::LegacyGallery::new())
        .build()
}

/// Add the gallery block type to `registry`.
pub fn register(registry: &mut BlockRegistry) -> Result<(), RegistryError> {
    registry.register(gallery_block_type()?)
}
