//! # block-migrate
//!
//! Versioned schema migrations for serialized content blocks.
//!
//! A block is persisted as markup plus a side-channel of attributes. Its
//! schema changes over time, so stored markup may have been written by any
//! historical version. `block-migrate` figures out which version produced a
//! given block, extracts that version's attributes and migrates them into the
//! current schema, without rewriting the stored content.
//!
//! ## How It Works
//!
//! 1. Every block type registers its **current** schema and an ordered list of
//!    **deprecated** schemas, newest first ([`BlockType`]).
//! 2. The [`MigrationResolver`] tries the current schema, then each deprecated
//!    one. A candidate matches when its re-rendered attributes are
//!    structurally equivalent to the stored markup and its eligibility guard
//!    (if any) accepts the attributes.
//! 3. The matched version's [`SchemaVersion::migrate`] turns the attributes
//!    into current-schema attributes, possibly producing child blocks.
//!
//! ## Key Concepts
//!
//! - **First match wins**: declaration order encodes version recency.
//! - **Pure**: migrations borrow their input and return new values, so they
//!   can run again on every editor reload.
//! - **Total extraction**: missing or garbled markup falls back to declared
//!   defaults instead of failing.
//! - **Injected collaborators**: markup parsing ([`MarkupParser`]), structural
//!   validation ([`MarkupValidator`]), feature flags ([`FeatureFlags`]) and
//!   child block creation ([`BlockFactory`]) are all supplied by the caller.
//!
//! ## Quick Start
//!
//! ```ignore
//! use block_migrate::{DefaultBlockFactory, DefaultOnFlags, FlagConfig, MigrationResolver};
//!
//! let resolver = MigrationResolver::new(&gallery, &parser, &validator);
//! let flags = DefaultOnFlags::new(FlagConfig::default());
//! let migrated = resolver.migrate(&raw_block, &flags, &DefaultBlockFactory)?;
//! println!("{} -> {:?}", migrated.version, migrated.outcome);
//! ```

mod error;
mod extractor;
mod flags;
mod node;
mod registry;
mod resolver;
mod rules;
#[cfg(test)]
mod testing;
mod version;

pub use error::{ConfigurationError, RegistryError, ResolveError};
pub use extractor::{conform_attributes, AttributeExtractor, MarkupParser};
pub use flags::{DefaultOnFlags, FeatureFlags, FlagConfig, StrictFlags};
pub use node::{AttributeMap, BlockFactory, BlockNode, DefaultBlockFactory, RawBlock};
pub use registry::{BlockRegistry, BlockType, BlockTypeBuilder};
pub use resolver::{MarkupValidator, MigratedBlock, MigrationResolver, Resolution, Resolved};
pub use rules::{AttributeRule, ExtractionRule, RuleKind, ValueType};
pub use version::{
    CheckOrder, Migration, MigrationContext, MigrationOutcome, SchemaVersion, VersionId,
};

/// Re-exported so schema tables can build attribute values without naming
/// `serde_json` themselves.
pub use serde_json::{json, Value};
