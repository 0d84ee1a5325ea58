//! Version detection and migration of stored blocks.
//!
//! The resolver walks a block type's versions in declaration order, current
//! first. For each candidate it extracts attributes, re-renders them and asks
//! the [`MarkupValidator`] whether the result is equivalent to what was
//! stored; candidates with an eligibility guard must also pass it. The first
//! candidate passing both checks is authoritative.

use tracing::{debug, trace};

use crate::error::{ConfigurationError, ResolveError};
use crate::extractor::{conform_attributes, AttributeExtractor, MarkupParser};
use crate::flags::FeatureFlags;
use crate::node::{AttributeMap, BlockFactory, BlockNode, RawBlock};
use crate::registry::{BlockRegistry, BlockType};
use crate::version::{
    CheckOrder, Migration, MigrationContext, MigrationOutcome, SchemaVersion, VersionId,
};

/// Decides whether two markup fragments are structurally the same.
///
/// Used only to validate a candidate version: `expected` is the candidate's
/// canonical render, `actual` the stored markup.
pub trait MarkupValidator: Send + Sync {
    fn is_equivalent(&self, expected: &str, actual: &str) -> bool;
}

/// A version that matched a stored block, with the attributes it extracted.
pub struct Resolved<'a> {
    pub version: VersionId,
    pub schema: &'a dyn SchemaVersion,
    pub attributes: AttributeMap,
}

/// State of a resolution.
pub enum Resolution<'a> {
    /// No candidate examined yet.
    Unresolved,
    /// A candidate matched; resolution stops here.
    Matched(Resolved<'a>),
    /// Every candidate was rejected.
    Exhausted,
}

/// A block migrated into its normalized form.
#[derive(Debug, Clone, PartialEq)]
pub struct MigratedBlock {
    pub node: BlockNode,
    /// The version that matched the stored markup.
    pub version: VersionId,
    pub outcome: MigrationOutcome,
}

/// Resolves and migrates stored blocks of one block type.
pub struct MigrationResolver<'a> {
    block_type: &'a BlockType,
    extractor: AttributeExtractor<'a>,
    validator: &'a dyn MarkupValidator,
}

impl<'a> MigrationResolver<'a> {
    pub fn new(
        block_type: &'a BlockType,
        parser: &'a dyn MarkupParser,
        validator: &'a dyn MarkupValidator,
    ) -> Self {
        Self {
            block_type,
            extractor: AttributeExtractor::new(parser),
            validator,
        }
    }

    /// Resolver for a registered block type.
    pub fn for_registered(
        registry: &'a BlockRegistry,
        name: &str,
        parser: &'a dyn MarkupParser,
        validator: &'a dyn MarkupValidator,
    ) -> Result<Self, ResolveError> {
        let block_type = registry
            .get(name)
            .ok_or_else(|| ResolveError::UnknownBlockType(name.to_string()))?;
        Ok(Self::new(block_type, parser, validator))
    }

    pub fn block_type(&self) -> &'a BlockType {
        self.block_type
    }

    /// Walk the candidates and report the final state, `Matched` or
    /// `Exhausted`.
    pub fn resolution(&self, block: &RawBlock) -> Resolution<'a> {
        let mut state = Resolution::Unresolved;
        for (id, schema) in self.block_type.candidates() {
            if let Some(resolved) = self.try_candidate(block, id, schema) {
                state = Resolution::Matched(resolved);
                break;
            }
        }
        match state {
            Resolution::Unresolved => Resolution::Exhausted,
            matched => matched,
        }
    }

    /// Find the single version that produced `block`.
    pub fn resolve(&self, block: &RawBlock) -> Result<Resolved<'a>, ResolveError> {
        match self.resolution(block) {
            Resolution::Matched(resolved) => Ok(resolved),
            Resolution::Unresolved | Resolution::Exhausted => {
                debug!(block = self.block_type.name(), "no version matched");
                Err(ResolveError::NoVersionMatched {
                    block: self.block_type.name().to_string(),
                })
            }
        }
    }

    /// Resolve `block` and migrate it into its normalized form.
    ///
    /// Attributes converted into the current shape are conformed to the
    /// current rules, so no deprecated-only keys survive.
    pub fn migrate(
        &self,
        block: &RawBlock,
        flags: &dyn FeatureFlags,
        factory: &dyn BlockFactory,
    ) -> Result<MigratedBlock, ResolveError> {
        let resolved = self.resolve(block)?;
        let migration = self.run_migration(&resolved, block, flags, factory)?;

        let attributes = if migration.outcome == MigrationOutcome::Upgraded {
            conform_attributes(
                &migration.attributes,
                self.block_type.current().attribute_rules(),
            )
        } else {
            migration.attributes
        };

        debug!(
            block = self.block_type.name(),
            version = resolved.schema.label(),
            outcome = ?migration.outcome,
            inner_blocks = migration.inner_blocks.len(),
            "migrated block"
        );

        Ok(MigratedBlock {
            node: BlockNode {
                name: self.block_type.name().to_string(),
                attributes,
                inner_blocks: migration.inner_blocks,
            },
            version: resolved.version,
            outcome: migration.outcome,
        })
    }

    /// Serialize a migrated block back into stored form.
    ///
    /// Renders with the version whose shape the attributes have: the current
    /// version after an upgrade, otherwise the version that matched. Only
    /// side-channel attributes of that version are written next to the
    /// markup.
    pub fn serialize(&self, block: &MigratedBlock) -> RawBlock {
        let schema = if block.outcome.is_current_shape() {
            self.block_type.current()
        } else {
            self.block_type
                .version(block.version)
                .unwrap_or_else(|| self.block_type.current())
        };

        let attributes = schema
            .attribute_rules()
            .iter()
            .filter(|attribute| attribute.rule.is_comment())
            .filter_map(|attribute| {
                block
                    .node
                    .attributes
                    .get(&attribute.name)
                    .map(|value| (attribute.name.clone(), value.clone()))
            })
            .collect();

        RawBlock {
            name: block.node.name.clone(),
            attributes,
            markup: schema.render(&block.node.attributes, &block.node.inner_blocks),
            inner_blocks: block.node.inner_blocks.clone(),
        }
    }

    fn run_migration(
        &self,
        resolved: &Resolved<'a>,
        block: &RawBlock,
        flags: &dyn FeatureFlags,
        factory: &dyn BlockFactory,
    ) -> Result<Migration, ConfigurationError> {
        if resolved.version.is_current() {
            return Ok(Migration {
                attributes: resolved.attributes.clone(),
                inner_blocks: block.inner_blocks.clone(),
                outcome: MigrationOutcome::Current,
            });
        }
        let ctx = MigrationContext::new(flags, factory);
        resolved
            .schema
            .migrate(&resolved.attributes, &block.inner_blocks, &ctx)
    }

    fn try_candidate(
        &self,
        block: &RawBlock,
        id: VersionId,
        schema: &'a dyn SchemaVersion,
    ) -> Option<Resolved<'a>> {
        let attributes = self.extractor.extract(block, schema.attribute_rules());

        let structural = || {
            let rendered = schema.render(&attributes, &block.inner_blocks);
            let matched = self.validator.is_equivalent(&rendered, &block.markup);
            if !matched {
                trace!(version = schema.label(), "re-rendered markup differs");
            }
            matched
        };
        let eligible = || {
            let eligible = id.is_current() || schema.is_eligible(&attributes);
            if !eligible {
                trace!(version = schema.label(), "eligibility guard rejected attributes");
            }
            eligible
        };

        let matched = match schema.check_order() {
            CheckOrder::StructureFirst => structural() && eligible(),
            CheckOrder::EligibilityFirst => eligible() && structural(),
        };
        if !matched {
            return None;
        }

        debug!(
            block = self.block_type.name(),
            version = schema.label(),
            %id,
            "version matched"
        );
        Some(Resolved {
            version: id,
            schema,
            attributes,
        })
    }
}
