//! Test doubles: a tiny JSON "markup" language and a two-era note block.
//!
//! Selectors are object keys, `Attribute(name)` reads a string field of the
//! selected object and `RichText` reads a selected string.

use std::sync::atomic::{AtomicUsize, Ordering};

use serde_json::{json, Map, Value};

use crate::error::ConfigurationError;
use crate::extractor::MarkupParser;
use crate::node::{AttributeMap, BlockNode};
use crate::registry::BlockType;
use crate::resolver::MarkupValidator;
use crate::rules::{AttributeRule, ExtractionRule, RuleKind, ValueType};
use crate::version::{CheckOrder, Migration, MigrationContext, SchemaVersion};

pub(crate) const NOTE_FLAG: &str = "note-lowercase";

pub(crate) struct JsonParser;

impl MarkupParser for JsonParser {
    fn evaluate(&self, markup: &str, rule: &ExtractionRule) -> Option<Value> {
        let document: Value = serde_json::from_str(markup).ok()?;
        evaluate_in(&document, rule)
    }
}

fn evaluate_in(scope: &Value, rule: &ExtractionRule) -> Option<Value> {
    let target = scope.get(rule.selector()?)?;
    match rule.kind() {
        RuleKind::Attribute(name) => target.get(name).filter(|v| v.is_string()).cloned(),
        RuleKind::RichText => target.as_str().map(|s| Value::String(s.to_string())),
        RuleKind::Query(fields) => {
            let items = target
                .as_array()?
                .iter()
                .map(|item| {
                    let record: Map<String, Value> = fields
                        .iter()
                        .filter_map(|f| evaluate_in(item, &f.rule).map(|v| (f.name.clone(), v)))
                        .collect();
                    Value::Object(record)
                })
                .collect();
            Some(Value::Array(items))
        }
        RuleKind::Comment => None,
    }
}

pub(crate) struct JsonValidator;

impl MarkupValidator for JsonValidator {
    fn is_equivalent(&self, expected: &str, actual: &str) -> bool {
        match (
            serde_json::from_str::<Value>(expected),
            serde_json::from_str::<Value>(actual),
        ) {
            (Ok(a), Ok(b)) => a == b,
            _ => false,
        }
    }
}

#[derive(Default)]
pub(crate) struct CountingValidator {
    calls: AtomicUsize,
}

impl CountingValidator {
    pub(crate) fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl MarkupValidator for CountingValidator {
    fn is_equivalent(&self, expected: &str, actual: &str) -> bool {
        self.calls.fetch_add(1, Ordering::SeqCst);
        JsonValidator.is_equivalent(expected, actual)
    }
}

fn text(attributes: &AttributeMap, key: &str) -> String {
    attributes
        .get(key)
        .and_then(Value::as_str)
        .unwrap_or_default()
        .to_string()
}

/// Current note: a title, tags and a pinned flag.
pub(crate) struct NoteV2 {
    rules: Vec<AttributeRule>,
}

impl NoteV2 {
    pub(crate) fn new() -> Self {
        Self {
            rules: vec![
                AttributeRule::new("title", ExtractionRule::attribute("note", "text")),
                AttributeRule::new(
                    "tags",
                    ExtractionRule::query(
                        "tags",
                        vec![AttributeRule::new("label", ExtractionRule::rich_text("label"))],
                    ),
                ),
                AttributeRule::new(
                    "pinned",
                    ExtractionRule::comment(ValueType::Boolean).with_default(false),
                ),
            ],
        }
    }
}

impl SchemaVersion for NoteV2 {
    fn label(&self) -> &str {
        "v2"
    }

    fn attribute_rules(&self) -> &[AttributeRule] {
        &self.rules
    }

    fn render(&self, attributes: &AttributeMap, _inner_blocks: &[BlockNode]) -> String {
        let tags: Vec<Value> = attributes
            .get("tags")
            .and_then(Value::as_array)
            .map(|tags| {
                tags.iter()
                    .map(|tag| json!({ "label": tag.get("label").cloned().unwrap_or(json!("")) }))
                    .collect()
            })
            .unwrap_or_default();
        json!({ "note": { "text": text(attributes, "title") }, "tags": tags }).to_string()
    }
}

fn heading_rules() -> Vec<AttributeRule> {
    vec![AttributeRule::new(
        "heading",
        ExtractionRule::attribute("heading", "text"),
    )]
}

fn render_heading(attributes: &AttributeMap) -> String {
    json!({ "heading": { "text": text(attributes, "heading") } }).to_string()
}

fn upgrade(title: String) -> Migration {
    let mut attributes = AttributeMap::new();
    attributes.insert("title".into(), Value::String(title));
    Migration::upgraded(attributes, Vec::new())
}

/// Heading-era note whose text was stored in capitals. Overlaps [`NoteV1`].
pub(crate) struct NoteV1Shouting {
    rules: Vec<AttributeRule>,
}

impl SchemaVersion for NoteV1Shouting {
    fn label(&self) -> &str {
        "v1-shouting"
    }

    fn attribute_rules(&self) -> &[AttributeRule] {
        &self.rules
    }

    fn check_order(&self) -> CheckOrder {
        CheckOrder::EligibilityFirst
    }

    fn is_eligible(&self, attributes: &AttributeMap) -> bool {
        let heading = text(attributes, "heading");
        heading.chars().any(char::is_alphabetic) && heading == heading.to_uppercase()
    }

    fn migrate(
        &self,
        attributes: &AttributeMap,
        inner_blocks: &[BlockNode],
        ctx: &MigrationContext<'_>,
    ) -> Result<Migration, ConfigurationError> {
        if !ctx.is_enabled(NOTE_FLAG)? {
            return Ok(Migration::unchanged(attributes, inner_blocks));
        }
        Ok(upgrade(text(attributes, "heading").to_lowercase()))
    }

    fn render(&self, attributes: &AttributeMap, _inner_blocks: &[BlockNode]) -> String {
        render_heading(attributes)
    }
}

/// Heading-era note.
pub(crate) struct NoteV1 {
    rules: Vec<AttributeRule>,
}

impl SchemaVersion for NoteV1 {
    fn label(&self) -> &str {
        "v1"
    }

    fn attribute_rules(&self) -> &[AttributeRule] {
        &self.rules
    }

    fn migrate(
        &self,
        attributes: &AttributeMap,
        _inner_blocks: &[BlockNode],
        _ctx: &MigrationContext<'_>,
    ) -> Result<Migration, ConfigurationError> {
        Ok(upgrade(text(attributes, "heading")))
    }

    fn render(&self, attributes: &AttributeMap, _inner_blocks: &[BlockNode]) -> String {
        render_heading(attributes)
    }
}

pub(crate) fn note_block_type() -> BlockType {
    BlockType::builder("test/note", NoteV2::new())
        .deprecated(NoteV1Shouting {
            rules: heading_rules(),
        })
        .deprecated(NoteV1 {
            rules: heading_rules(),
        })
        .build()
        .expect("valid note block type")
}
