use core::fmt;

use crate::error::ConfigurationError;
use crate::flags::FeatureFlags;
use crate::node::{AttributeMap, BlockFactory, BlockNode};
use crate::rules::AttributeRule;

/// Position of a schema version within its block type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum VersionId {
    /// The current, non-deprecated schema.
    Current,
    /// A deprecated schema, indexed in declaration order (0 = newest).
    Deprecated(usize),
}

impl VersionId {
    pub fn is_current(self) -> bool {
        matches!(self, Self::Current)
    }
}

impl fmt::Display for VersionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Current => write!(f, "current"),
            Self::Deprecated(index) => write!(f, "deprecated[{index}]"),
        }
    }
}

/// Order in which a candidate's structural match and eligibility guard run.
///
/// Both must pass for the candidate to match; the order only decides which
/// check sees the candidate first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CheckOrder {
    /// Validate the re-rendered markup, then ask the eligibility guard.
    #[default]
    StructureFirst,
    /// Ask the eligibility guard, then validate the re-rendered markup.
    EligibilityFirst,
}

/// What a migration did to the matched attributes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MigrationOutcome {
    /// The current schema matched; nothing to migrate.
    Current,
    /// Pass-through: attributes returned as extracted.
    Unchanged,
    /// Attributes were repaired but keep the deprecated version's shape.
    Repaired,
    /// Attributes were converted into the current schema's shape.
    Upgraded,
}

impl MigrationOutcome {
    /// Whether the resulting attributes have the current schema's shape.
    pub fn is_current_shape(self) -> bool {
        matches!(self, Self::Current | Self::Upgraded)
    }
}

/// Result of running a version's migration.
#[derive(Debug, Clone, PartialEq)]
pub struct Migration {
    pub attributes: AttributeMap,
    pub inner_blocks: Vec<BlockNode>,
    pub outcome: MigrationOutcome,
}

impl Migration {
    /// Pass-through: copies of the inputs.
    pub fn unchanged(attributes: &AttributeMap, inner_blocks: &[BlockNode]) -> Self {
        Self {
            attributes: attributes.clone(),
            inner_blocks: inner_blocks.to_vec(),
            outcome: MigrationOutcome::Unchanged,
        }
    }

    /// Repaired attributes still in the deprecated shape.
    pub fn repaired(attributes: AttributeMap, inner_blocks: &[BlockNode]) -> Self {
        Self {
            attributes,
            inner_blocks: inner_blocks.to_vec(),
            outcome: MigrationOutcome::Repaired,
        }
    }

    /// Attributes and children in the current schema's shape.
    pub fn upgraded(attributes: AttributeMap, inner_blocks: Vec<BlockNode>) -> Self {
        Self {
            attributes,
            inner_blocks,
            outcome: MigrationOutcome::Upgraded,
        }
    }
}

/// Collaborators available to a migration.
///
/// Built once per `migrate` call, so a migration sees one consistent view of
/// the host's configuration.
#[derive(Clone, Copy)]
pub struct MigrationContext<'a> {
    flags: &'a dyn FeatureFlags,
    factory: &'a dyn BlockFactory,
}

impl<'a> MigrationContext<'a> {
    pub fn new(flags: &'a dyn FeatureFlags, factory: &'a dyn BlockFactory) -> Self {
        Self { flags, factory }
    }

    /// Query the host's feature flags.
    pub fn is_enabled(&self, name: &str) -> Result<bool, ConfigurationError> {
        self.flags.is_enabled(name)
    }

    /// The host's child block constructor.
    pub fn factory(&self) -> &'a dyn BlockFactory {
        self.factory
    }
}

/// One historical or current schema of a block type.
///
/// Implementations are static configuration: they hold their extraction
/// rules and must be deterministic and free of interior mutability, since
/// the same version may be consulted concurrently from many threads.
pub trait SchemaVersion: Send + Sync {
    /// Short unique name, e.g. `"v3"`.
    fn label(&self) -> &str;

    /// Rules producing this version's attributes.
    fn attribute_rules(&self) -> &[AttributeRule];

    /// Order of the structural and eligibility checks.
    fn check_order(&self) -> CheckOrder {
        CheckOrder::StructureFirst
    }

    /// Guard separating this version from a neighbor whose markup it
    /// overlaps. Versions without a guard are eligible whenever their markup
    /// matches. Never consulted for the current version.
    fn is_eligible(&self, _attributes: &AttributeMap) -> bool {
        true
    }

    /// Transform matched attributes towards the current schema.
    ///
    /// Must not mutate its inputs. The default is a pass-through.
    fn migrate(
        &self,
        attributes: &AttributeMap,
        inner_blocks: &[BlockNode],
        _ctx: &MigrationContext<'_>,
    ) -> Result<Migration, ConfigurationError> {
        Ok(Migration::unchanged(attributes, inner_blocks))
    }

    /// Canonical markup for the given attributes.
    fn render(&self, attributes: &AttributeMap, inner_blocks: &[BlockNode]) -> String;
}
