//! End-to-end resolution of a two-version quote block over real HTML.

use block_migrate::{
    json, AttributeMap, AttributeRule, BlockNode, BlockType, ConfigurationError,
    DefaultBlockFactory, DefaultOnFlags, ExtractionRule, FlagConfig, Migration, MigrationContext,
    MigrationOutcome, MigrationResolver, RawBlock, SchemaVersion, ValueType, Value, VersionId,
};
use block_migrate_html::{escape_text, HtmlParser, HtmlValidator};

fn text<'a>(attributes: &'a AttributeMap, key: &str) -> &'a str {
    attributes.get(key).and_then(Value::as_str).unwrap_or_default()
}

struct QuoteV2 {
    rules: Vec<AttributeRule>,
}

impl SchemaVersion for QuoteV2 {
    fn label(&self) -> &str {
        "v2"
    }

    fn attribute_rules(&self) -> &[AttributeRule] {
        &self.rules
    }

    fn render(&self, attributes: &AttributeMap, _inner: &[BlockNode]) -> String {
        let citation = text(attributes, "citation");
        let cite = if citation.is_empty() {
            String::new()
        } else {
            format!("<cite>{citation}</cite>")
        };
        format!(
            r#"<blockquote class="wp-block-quote"><p>{}</p>{cite}</blockquote>"#,
            text(attributes, "value")
        )
    }
}

/// Citation kept in the side-channel, rendered as a footer.
struct QuoteV1 {
    rules: Vec<AttributeRule>,
}

impl SchemaVersion for QuoteV1 {
    fn label(&self) -> &str {
        "v1"
    }

    fn attribute_rules(&self) -> &[AttributeRule] {
        &self.rules
    }

    fn migrate(
        &self,
        attributes: &AttributeMap,
        inner: &[BlockNode],
        _ctx: &MigrationContext<'_>,
    ) -> Result<Migration, ConfigurationError> {
        let mut next = attributes.clone();
        if let Some(author) = next.remove("author") {
            next.insert("citation".into(), author);
        }
        Ok(Migration::upgraded(next, inner.to_vec()))
    }

    fn render(&self, attributes: &AttributeMap, _inner: &[BlockNode]) -> String {
        format!(
            r#"<blockquote class="blocks-quote-style-1"><p>{}</p><footer>{}</footer></blockquote>"#,
            text(attributes, "value"),
            escape_text(text(attributes, "author"))
        )
    }
}

fn quote() -> BlockType {
    BlockType::builder(
        "core/quote",
        QuoteV2 {
            rules: vec![
                AttributeRule::new("value", ExtractionRule::rich_text("p")),
                AttributeRule::new("citation", ExtractionRule::rich_text("cite")),
            ],
        },
    )
    .deprecated(QuoteV1 {
        rules: vec![
            AttributeRule::new("value", ExtractionRule::rich_text("p")),
            AttributeRule::new("author", ExtractionRule::comment(ValueType::String)),
        ],
    })
    .build()
    .unwrap()
}

#[test]
fn current_markup_resolves_to_current() {
    let quote = quote();
    let resolver = MigrationResolver::new(&quote, &HtmlParser, &HtmlValidator);
    let block = RawBlock::new(
        "core/quote",
        r#"<blockquote class="wp-block-quote"><p>Hello <strong>there</strong></p><cite>Me</cite></blockquote>"#,
    );

    let migrated = resolver
        .migrate(&block, &DefaultOnFlags::default(), &DefaultBlockFactory)
        .unwrap();
    assert_eq!(migrated.version, VersionId::Current);
    assert_eq!(migrated.outcome, MigrationOutcome::Current);
    assert_eq!(
        migrated.node.attributes["value"],
        json!("Hello <strong>there</strong>")
    );
    assert_eq!(migrated.node.attributes["citation"], json!("Me"));
}

#[test]
fn legacy_markup_is_upgraded_and_reserialized() {
    let quote = quote();
    let resolver = MigrationResolver::new(&quote, &HtmlParser, &HtmlValidator);
    let mut side = AttributeMap::new();
    side.insert("author".into(), json!("Ada"));
    let block = RawBlock::new(
        "core/quote",
        "<blockquote class=\"blocks-quote-style-1\">\n  <p>Old</p>\n  <footer>Ada</footer>\n</blockquote>",
    )
    .with_attributes(side);

    let flags = DefaultOnFlags::new(FlagConfig::default());
    let migrated = resolver
        .migrate(&block, &flags, &DefaultBlockFactory)
        .unwrap();
    assert_eq!(migrated.version, VersionId::Deprecated(0));
    assert_eq!(migrated.outcome, MigrationOutcome::Upgraded);
    assert_eq!(migrated.node.attributes["citation"], json!("Ada"));
    assert!(!migrated.node.attributes.contains_key("author"));

    let stored = resolver.serialize(&migrated);
    assert_eq!(
        stored.markup,
        r#"<blockquote class="wp-block-quote"><p>Old</p><cite>Ada</cite></blockquote>"#
    );
    let again = resolver
        .migrate(&stored, &flags, &DefaultBlockFactory)
        .unwrap();
    assert_eq!(again.outcome, MigrationOutcome::Current);
    assert_eq!(again.node, migrated.node);
}

#[test]
fn mismatched_side_channel_is_not_a_match() {
    let quote = quote();
    let resolver = MigrationResolver::new(&quote, &HtmlParser, &HtmlValidator);
    // The footer disagrees with the stored author, so v1 cannot reproduce it.
    let mut side = AttributeMap::new();
    side.insert("author".into(), json!("Grace"));
    let block = RawBlock::new(
        "core/quote",
        r#"<blockquote class="blocks-quote-style-1"><p>Old</p><footer>Ada</footer></blockquote>"#,
    )
    .with_attributes(side);

    assert!(resolver.resolve(&block).is_err());
}
