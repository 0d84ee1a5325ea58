use block_migrate::MarkupValidator;
use scraper::{ElementRef, Html, Node};
use tracing::trace;

/// Structural equivalence of HTML fragments.
///
/// Two fragments are equivalent when they have the same element tree, each
/// element carries the same attributes (in any order, with `class` compared
/// as a set of tokens), and text nodes agree after collapsing whitespace.
/// Comments and whitespace-only text are ignored.
#[derive(Debug, Clone, Copy, Default)]
pub struct HtmlValidator;

impl MarkupValidator for HtmlValidator {
    fn is_equivalent(&self, expected: &str, actual: &str) -> bool {
        let expected = tokens(expected);
        let actual = tokens(actual);
        let same = expected == actual;
        if !same {
            let at = expected
                .iter()
                .zip(&actual)
                .position(|(a, b)| a != b)
                .unwrap_or_else(|| expected.len().min(actual.len()));
            trace!(
                position = at,
                expected = ?expected.get(at),
                actual = ?actual.get(at),
                "markup differs"
            );
        }
        same
    }
}

#[derive(Debug, PartialEq, Eq)]
enum Token {
    Open {
        name: String,
        attributes: Vec<(String, String)>,
    },
    Text(String),
    Close(String),
}

fn tokens(markup: &str) -> Vec<Token> {
    let fragment = Html::parse_fragment(markup);
    let mut out = Vec::new();
    push_children(fragment.root_element(), &mut out);
    out
}

fn push_children(element: ElementRef<'_>, out: &mut Vec<Token>) {
    for child in element.children() {
        match child.value() {
            Node::Text(text) => {
                let collapsed = text.split_whitespace().collect::<Vec<_>>().join(" ");
                if !collapsed.is_empty() {
                    out.push(Token::Text(collapsed));
                }
            }
            Node::Element(_) => {
                if let Some(child) = ElementRef::wrap(child) {
                    push_element(child, out);
                }
            }
            _ => {}
        }
    }
}

fn push_element(element: ElementRef<'_>, out: &mut Vec<Token>) {
    let value = element.value();
    let mut attributes: Vec<(String, String)> = value
        .attrs()
        .map(|(name, raw)| {
            let normalized = if name == "class" {
                normalize_classes(raw)
            } else {
                raw.to_string()
            };
            (name.to_string(), normalized)
        })
        .collect();
    attributes.sort();

    out.push(Token::Open {
        name: value.name().to_string(),
        attributes,
    });
    push_children(element, out);
    out.push(Token::Close(value.name().to_string()));
}

fn normalize_classes(raw: &str) -> String {
    let mut classes: Vec<&str> = raw.split_whitespace().collect();
    classes.sort_unstable();
    classes.dedup();
    classes.join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn same(a: &str, b: &str) -> bool {
        HtmlValidator.is_equivalent(a, b)
    }

    #[test]
    fn attribute_and_class_order_are_ignored() {
        assert!(same(
            r#"<figure class="a b  c" id="x"><img src="u" alt=""></figure>"#,
            r#"<figure id="x" class="c a b"><img alt="" src="u"/></figure>"#,
        ));
    }

    #[test]
    fn whitespace_and_comments_are_ignored() {
        assert!(same(
            "<ul><li>one  two</li></ul>",
            "<ul>\n  <!-- note -->\n  <li>\n one two </li>\n</ul>",
        ));
    }

    #[test]
    fn differing_structure_is_rejected() {
        assert!(!same("<ul><li>a</li></ul>", "<ol><li>a</li></ol>"));
        assert!(!same("<ul><li>a</li></ul>", "<ul><li>a</li><li>b</li></ul>"));
        assert!(!same(r#"<img src="a">"#, r#"<img src="b">"#));
        assert!(!same(r#"<img src="a">"#, r#"<img src="a" alt="">"#));
        assert!(!same("<p>a</p>", "<p>b</p>"));
    }

    #[test]
    fn entity_spelling_does_not_matter() {
        assert!(same(
            r#"<img alt="a &amp; b">"#,
            r#"<img alt="a &#38; b">"#
        ));
    }

    #[test]
    fn empty_fragments_are_equivalent() {
        assert!(same("", "   "));
        assert!(!same("", "<p></p>"));
    }
}
