use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Attribute set of a block, keyed by attribute name.
///
/// Values are JSON values so historical shapes (an id stored as `"5"` in one
/// version and `5` in the next) remain representable side by side.
pub type AttributeMap = Map<String, Value>;

/// A block as handed to the engine by the external block parser.
///
/// `markup` is the block's own serialized markup with inner blocks removed;
/// inner blocks arrive already parsed in `inner_blocks`.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawBlock {
    /// Registered block type name, e.g. `"core/gallery"`.
    pub name: String,
    /// Attributes persisted next to the markup (the comment side-channel).
    #[serde(default)]
    pub attributes: AttributeMap,
    /// Serialized markup of the block itself.
    #[serde(default)]
    pub markup: String,
    /// Already-parsed inner blocks.
    #[serde(default)]
    pub inner_blocks: Vec<BlockNode>,
}

impl RawBlock {
    /// Create a raw block with no side-channel attributes or inner blocks.
    pub fn new(name: impl Into<String>, markup: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            attributes: AttributeMap::new(),
            markup: markup.into(),
            inner_blocks: Vec::new(),
        }
    }

    /// Set the side-channel attributes.
    pub fn with_attributes(mut self, attributes: AttributeMap) -> Self {
        self.attributes = attributes;
        self
    }

    /// Set the parsed inner blocks.
    pub fn with_inner_blocks(mut self, inner_blocks: Vec<BlockNode>) -> Self {
        self.inner_blocks = inner_blocks;
        self
    }
}

/// Canonical post-migration representation of a block and its children.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BlockNode {
    /// Block type name.
    pub name: String,
    /// Current-schema attributes.
    pub attributes: AttributeMap,
    /// Child blocks in document order.
    #[serde(default)]
    pub inner_blocks: Vec<BlockNode>,
}

impl BlockNode {
    /// Create a leaf node.
    pub fn new(name: impl Into<String>, attributes: AttributeMap) -> Self {
        Self {
            name: name.into(),
            attributes,
            inner_blocks: Vec::new(),
        }
    }

    /// Look up a single attribute.
    pub fn attribute(&self, name: &str) -> Option<&Value> {
        self.attributes.get(name)
    }
}

/// Constructs child blocks during structural conversion.
///
/// The engine never allocates block identifiers itself; hosts that track
/// client ids supply a factory that does.
pub trait BlockFactory: Send + Sync {
    /// Create a block of type `name` with the given attributes.
    fn create(&self, name: &str, attributes: AttributeMap) -> BlockNode;
}

/// Factory producing plain [`BlockNode`]s without inner blocks.
#[derive(Debug, Clone, Copy, Default)]
pub struct DefaultBlockFactory;

impl BlockFactory for DefaultBlockFactory {
    fn create(&self, name: &str, attributes: AttributeMap) -> BlockNode {
        BlockNode::new(name, attributes)
    }
}
