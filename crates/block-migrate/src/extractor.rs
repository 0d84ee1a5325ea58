use serde_json::Value;
use tracing::trace;

use crate::node::{AttributeMap, RawBlock};
use crate::rules::{AttributeRule, ExtractionRule, RuleKind};

/// Evaluates sourced extraction rules against serialized markup.
///
/// Implementations return `None` whenever the selector matches nothing, the
/// markup cannot be parsed or the requested attribute is missing. They must
/// never panic on malformed input. For [`RuleKind::Query`] rules the result is
/// an array of objects holding only the nested values that were found; the
/// extractor fills in the rest.
pub trait MarkupParser: Send + Sync {
    /// Evaluate a single rule. `Comment` rules are never passed in.
    fn evaluate(&self, markup: &str, rule: &ExtractionRule) -> Option<Value>;
}

/// Applies a schema version's rules to a stored block.
///
/// Extraction never fails: anything absent or of the wrong type resolves to
/// the rule's default, so an empty or garbled block yields a map of defaults.
pub struct AttributeExtractor<'a> {
    parser: &'a dyn MarkupParser,
}

impl<'a> AttributeExtractor<'a> {
    pub fn new(parser: &'a dyn MarkupParser) -> Self {
        Self { parser }
    }

    /// Extract every rule, in declaration order.
    pub fn extract(&self, block: &RawBlock, rules: &[AttributeRule]) -> AttributeMap {
        rules
            .iter()
            .map(|attribute| {
                let found = match attribute.rule.kind() {
                    RuleKind::Comment => block
                        .attributes
                        .get(&attribute.name)
                        .filter(|value| !value.is_null())
                        .cloned(),
                    _ => self.parser.evaluate(&block.markup, &attribute.rule),
                };
                if found.is_none() {
                    trace!(attribute = %attribute.name, "attribute absent, using default");
                }
                (attribute.name.clone(), settle(&attribute.rule, found))
            })
            .collect()
    }
}

/// Reshape an existing attribute map to exactly the keys named by `rules`.
///
/// Keys the rules do not mention are dropped; missing or mistyped values take
/// the rule's default. The input is left untouched.
pub fn conform_attributes(attributes: &AttributeMap, rules: &[AttributeRule]) -> AttributeMap {
    rules
        .iter()
        .map(|attribute| {
            let found = attributes
                .get(&attribute.name)
                .filter(|value| !value.is_null())
                .cloned();
            (attribute.name.clone(), settle(&attribute.rule, found))
        })
        .collect()
}

fn settle(rule: &ExtractionRule, found: Option<Value>) -> Value {
    match found {
        Some(value) if rule.value_type().accepts(&value) => match (rule.kind(), value) {
            (RuleKind::Query(fields), Value::Array(items)) => Value::Array(
                items
                    .into_iter()
                    .map(|item| settle_record(fields, item))
                    .collect(),
            ),
            (_, value) => value,
        },
        _ => rule.default_value(),
    }
}

fn settle_record(fields: &[AttributeRule], item: Value) -> Value {
    match item {
        Value::Object(mut record) => {
            for field in fields {
                let found = record.remove(&field.name).filter(|value| !value.is_null());
                record.insert(field.name.clone(), settle(&field.rule, found));
            }
            Value::Object(record)
        }
        other => other,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rules::ValueType;
    use crate::testing::JsonParser;
    use serde_json::json;

    fn rules() -> Vec<AttributeRule> {
        vec![
            AttributeRule::new("title", ExtractionRule::attribute("note", "text")),
            AttributeRule::new(
                "tags",
                ExtractionRule::query(
                    "tags",
                    vec![
                        AttributeRule::new("label", ExtractionRule::rich_text("label")),
                        AttributeRule::new(
                            "weight",
                            ExtractionRule::rich_text("weight").with_default("normal"),
                        ),
                    ],
                ),
            ),
            AttributeRule::new(
                "pinned",
                ExtractionRule::comment(ValueType::Boolean).with_default(false),
            ),
            AttributeRule::new("order", ExtractionRule::comment(ValueType::Number)),
        ]
    }

    #[test]
    fn extracts_sourced_and_comment_attributes() {
        let mut side = AttributeMap::new();
        side.insert("pinned".into(), json!(true));
        side.insert("order".into(), json!(4));
        let block = RawBlock::new(
            "test/note",
            r#"{"note":{"text":"hello"},"tags":[{"label":"a"},{"label":"b","weight":"bold"}]}"#,
        )
        .with_attributes(side);

        let attrs = AttributeExtractor::new(&JsonParser).extract(&block, &rules());
        assert_eq!(attrs["title"], json!("hello"));
        assert_eq!(
            attrs["tags"],
            json!([
                {"label": "a", "weight": "normal"},
                {"label": "b", "weight": "bold"}
            ])
        );
        assert_eq!(attrs["pinned"], json!(true));
        assert_eq!(attrs["order"], json!(4));
    }

    #[test]
    fn garbled_markup_yields_all_defaults() {
        let block = RawBlock::new("test/note", "<<< not json");
        let attrs = AttributeExtractor::new(&JsonParser).extract(&block, &rules());
        assert_eq!(attrs["title"], json!(""));
        assert_eq!(attrs["tags"], json!([]));
        assert_eq!(attrs["pinned"], json!(false));
        assert_eq!(attrs["order"], Value::Null);
        assert_eq!(attrs.len(), 4);
    }

    #[test]
    fn mistyped_side_channel_values_fall_back() {
        let mut side = AttributeMap::new();
        side.insert("pinned".into(), json!("yes"));
        side.insert("order".into(), json!(null));
        let block = RawBlock::new("test/note", "{}").with_attributes(side);
        let attrs = AttributeExtractor::new(&JsonParser).extract(&block, &rules());
        assert_eq!(attrs["pinned"], json!(false));
        assert_eq!(attrs["order"], Value::Null);
    }

    #[test]
    fn conform_drops_unknown_keys_and_fills_missing() {
        let mut attrs = AttributeMap::new();
        attrs.insert("title".into(), json!("kept"));
        attrs.insert("legacy".into(), json!([1, 2]));
        let conformed = conform_attributes(&attrs, &rules());
        assert_eq!(conformed["title"], json!("kept"));
        assert_eq!(conformed["pinned"], json!(false));
        assert!(!conformed.contains_key("legacy"));
        // Input untouched.
        assert!(attrs.contains_key("legacy"));
    }
}
