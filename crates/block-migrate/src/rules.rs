use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Declared type of an attribute.
///
/// Used to reject values of the wrong shape and to pick the empty value that
/// stands in for an absent attribute without a declared default.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ValueType {
    String,
    Number,
    Boolean,
    Array,
    Object,
}

impl ValueType {
    /// The value an absent attribute of this type takes when no default is
    /// declared. Numbers have no neutral value and stay `null`.
    pub fn empty_value(self) -> Value {
        match self {
            Self::String => Value::String(String::new()),
            Self::Number => Value::Null,
            Self::Boolean => Value::Bool(false),
            Self::Array => Value::Array(Vec::new()),
            Self::Object => Value::Object(Map::new()),
        }
    }

    /// Whether `value` has this type.
    pub fn accepts(self, value: &Value) -> bool {
        match self {
            Self::String => value.is_string(),
            Self::Number => value.is_number(),
            Self::Boolean => value.is_boolean(),
            Self::Array => value.is_array(),
            Self::Object => value.is_object(),
        }
    }
}

/// Where an attribute's value comes from.
#[derive(Debug, Clone, PartialEq)]
pub enum RuleKind {
    /// Read from the side-channel attributes stored next to the markup.
    Comment,
    /// Read one HTML attribute off the first element matching the selector.
    Attribute(String),
    /// Read the inner markup of the first element matching the selector.
    RichText,
    /// Iterate every element matching the selector and apply the nested
    /// rules to each, producing an ordered list of item records.
    Query(Vec<AttributeRule>),
}

/// Declarative rule mapping markup to one attribute value.
#[derive(Debug, Clone, PartialEq)]
pub struct ExtractionRule {
    kind: RuleKind,
    selector: Option<String>,
    value_type: ValueType,
    default: Option<Value>,
}

impl ExtractionRule {
    /// A side-channel attribute of the given type.
    pub fn comment(value_type: ValueType) -> Self {
        Self {
            kind: RuleKind::Comment,
            selector: None,
            value_type,
            default: None,
        }
    }

    /// The HTML attribute `attribute` of the first element matching `selector`.
    pub fn attribute(selector: &str, attribute: &str) -> Self {
        Self {
            kind: RuleKind::Attribute(attribute.to_string()),
            selector: Some(selector.to_string()),
            value_type: ValueType::String,
            default: None,
        }
    }

    /// The inner markup of the first element matching `selector`.
    pub fn rich_text(selector: &str) -> Self {
        Self {
            kind: RuleKind::RichText,
            selector: Some(selector.to_string()),
            value_type: ValueType::String,
            default: None,
        }
    }

    /// One record per element matching `selector`, built from `rules`.
    pub fn query(selector: &str, rules: Vec<AttributeRule>) -> Self {
        Self {
            kind: RuleKind::Query(rules),
            selector: Some(selector.to_string()),
            value_type: ValueType::Array,
            default: None,
        }
    }

    /// Declare the value used when the attribute is absent.
    pub fn with_default(mut self, default: impl Into<Value>) -> Self {
        self.default = Some(default.into());
        self
    }

    pub fn kind(&self) -> &RuleKind {
        &self.kind
    }

    /// Selector the rule is evaluated against; `None` for side-channel rules.
    pub fn selector(&self) -> Option<&str> {
        self.selector.as_deref()
    }

    pub fn value_type(&self) -> ValueType {
        self.value_type
    }

    /// The declared default, or the type's empty value.
    pub fn default_value(&self) -> Value {
        self.default
            .clone()
            .unwrap_or_else(|| self.value_type.empty_value())
    }

    /// Whether the value is persisted in the side-channel rather than the
    /// markup.
    pub fn is_comment(&self) -> bool {
        matches!(self.kind, RuleKind::Comment)
    }
}

/// A named extraction rule.
#[derive(Debug, Clone, PartialEq)]
pub struct AttributeRule {
    pub name: String,
    pub rule: ExtractionRule,
}

impl AttributeRule {
    pub fn new(name: &str, rule: ExtractionRule) -> Self {
        Self {
            name: name.to_string(),
            rule,
        }
    }
}
