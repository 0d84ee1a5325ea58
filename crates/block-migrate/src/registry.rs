use std::collections::{BTreeMap, HashSet};

use crate::error::RegistryError;
use crate::version::{SchemaVersion, VersionId};

/// A block type: its current schema plus deprecated schemas, newest first.
///
/// Declaration order of deprecated versions is configuration, not an
/// implementation detail: the resolver accepts the first match, so a version
/// must be declared before every older version its markup overlaps.
pub struct BlockType {
    name: String,
    current: Box<dyn SchemaVersion>,
    deprecated: Vec<Box<dyn SchemaVersion>>,
}

impl BlockType {
    /// Start declaring a block type with its current schema.
    pub fn builder(name: &str, current: impl SchemaVersion + 'static) -> BlockTypeBuilder {
        BlockTypeBuilder {
            name: name.to_string(),
            current: Box::new(current),
            deprecated: Vec::new(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// The current schema.
    pub fn current(&self) -> &dyn SchemaVersion {
        self.current.as_ref()
    }

    /// Deprecated schemas, newest first.
    pub fn deprecated(&self) -> impl Iterator<Item = &dyn SchemaVersion> + '_ {
        self.deprecated.iter().map(|v| v.as_ref())
    }

    /// Look up a version by id.
    pub fn version(&self, id: VersionId) -> Option<&dyn SchemaVersion> {
        match id {
            VersionId::Current => Some(self.current()),
            VersionId::Deprecated(index) => self.deprecated.get(index).map(|v| v.as_ref()),
        }
    }

    /// Every version in the order the resolver tries them: current first,
    /// then deprecated newest to oldest.
    pub fn candidates(&self) -> impl Iterator<Item = (VersionId, &dyn SchemaVersion)> + '_ {
        core::iter::once((VersionId::Current, self.current())).chain(
            self.deprecated
                .iter()
                .enumerate()
                .map(|(index, v)| (VersionId::Deprecated(index), v.as_ref())),
        )
    }

    /// Labels in resolution order.
    pub fn labels(&self) -> Vec<&str> {
        self.candidates().map(|(_, v)| v.label()).collect()
    }
}

/// Builder for [`BlockType`].
pub struct BlockTypeBuilder {
    name: String,
    current: Box<dyn SchemaVersion>,
    deprecated: Vec<Box<dyn SchemaVersion>>,
}

impl BlockTypeBuilder {
    /// Append the next-older deprecated version.
    pub fn deprecated(mut self, version: impl SchemaVersion + 'static) -> Self {
        self.deprecated.push(Box::new(version));
        self
    }

    /// Validate and build.
    pub fn build(self) -> Result<BlockType, RegistryError> {
        if self.name.is_empty() {
            return Err(RegistryError::EmptyName);
        }

        let mut seen = HashSet::new();
        let labels = core::iter::once(self.current.label())
            .chain(self.deprecated.iter().map(|v| v.label()));
        for label in labels {
            if !seen.insert(label) {
                return Err(RegistryError::DuplicateVersion {
                    block: self.name.clone(),
                    label: label.to_string(),
                });
            }
        }

        Ok(BlockType {
            name: self.name,
            current: self.current,
            deprecated: self.deprecated,
        })
    }
}

/// Block types by name, registered once at start-up.
#[derive(Default)]
pub struct BlockRegistry {
    types: BTreeMap<String, BlockType>,
}

impl BlockRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a block type. Names are unique.
    pub fn register(&mut self, block_type: BlockType) -> Result<(), RegistryError> {
        if self.types.contains_key(block_type.name()) {
            return Err(RegistryError::DuplicateBlockType(block_type.name.clone()));
        }
        self.types.insert(block_type.name.clone(), block_type);
        Ok(())
    }

    pub fn get(&self, name: &str) -> Option<&BlockType> {
        self.types.get(name)
    }

    /// Registered names, sorted.
    pub fn names(&self) -> impl Iterator<Item = &str> + '_ {
        self.types.keys().map(String::as_str)
    }
}
