use thiserror::Error;

/// The feature-flag contract was violated by the host.
///
/// Raised only by flag policies that require explicit configuration. It is
/// never caught inside the engine: a misconfigured host should fail loudly.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigurationError {
    /// The flag has no value under a policy that requires one.
    #[error("feature flag `{name}` is not set")]
    MissingFlag { name: String },
    /// The flag is set but not to a boolean.
    #[error("feature flag `{name}` must be a boolean, found {found}")]
    NotBoolean { name: String, found: &'static str },
    /// The flag configuration document could not be parsed.
    #[error("invalid flag configuration: {0}")]
    Parse(String),
}

/// A block type or registry was declared inconsistently.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RegistryError {
    /// Block type names must be non-empty.
    #[error("block type name must not be empty")]
    EmptyName,
    /// Two versions of the same block type share a label.
    #[error("block type `{block}` declares version `{label}` more than once")]
    DuplicateVersion { block: String, label: String },
    /// The registry already holds a block type with this name.
    #[error("block type `{0}` is already registered")]
    DuplicateBlockType(String),
}

/// Resolving or migrating a stored block failed.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ResolveError {
    /// No schema version, including the current one, reproduces the stored
    /// markup. The content is unrecognized and left untouched.
    #[error("no schema version of `{block}` matches the stored markup")]
    NoVersionMatched { block: String },
    /// The registry has no block type with this name.
    #[error("no block type named `{0}` is registered")]
    UnknownBlockType(String),
    /// A migration needed a feature flag the host did not configure.
    #[error(transparent)]
    Configuration(#[from] ConfigurationError),
}
