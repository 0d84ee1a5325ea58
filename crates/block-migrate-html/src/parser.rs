use block_migrate::{ExtractionRule, MarkupParser, RuleKind};
use scraper::{ElementRef, Html, Selector};
use serde_json::{Map, Value};
use tracing::warn;

/// Evaluates extraction rules as CSS selectors over an HTML fragment.
///
/// - `Attribute(name)` reads `name` off the first match.
/// - `RichText` returns the inner HTML of the first match.
/// - `Query` returns one object per match, evaluating the nested rules with
///   the match as scope. Nested values that are not found are left out.
///
/// An invalid selector is logged and treated as matching nothing.
#[derive(Debug, Clone, Copy, Default)]
pub struct HtmlParser;

impl MarkupParser for HtmlParser {
    fn evaluate(&self, markup: &str, rule: &ExtractionRule) -> Option<Value> {
        let fragment = Html::parse_fragment(markup);
        evaluate_in(fragment.root_element(), rule)
    }
}

fn evaluate_in(scope: ElementRef<'_>, rule: &ExtractionRule) -> Option<Value> {
    let selector = parse_selector(rule.selector()?)?;
    match rule.kind() {
        RuleKind::Attribute(name) => {
            let element = scope.select(&selector).next()?;
            element
                .value()
                .attr(name)
                .map(|value| Value::String(value.to_string()))
        }
        RuleKind::RichText => {
            let element = scope.select(&selector).next()?;
            Some(Value::String(element.inner_html()))
        }
        RuleKind::Query(fields) => {
            let records = scope
                .select(&selector)
                .map(|item| {
                    let record: Map<String, Value> = fields
                        .iter()
                        .filter_map(|field| {
                            evaluate_in(item, &field.rule).map(|value| (field.name.clone(), value))
                        })
                        .collect();
                    Value::Object(record)
                })
                .collect();
            Some(Value::Array(records))
        }
        RuleKind::Comment => None,
    }
}

fn parse_selector(source: &str) -> Option<Selector> {
    match Selector::parse(source) {
        Ok(selector) => Some(selector),
        Err(err) => {
            warn!(selector = source, error = %err, "invalid selector");
            None
        }
    }
}
