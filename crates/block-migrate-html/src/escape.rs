/// Escape a value for use inside a double-quoted HTML attribute.
pub fn escape_attribute(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    for c in value.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

/// Escape plain text for use as element content.
pub fn escape_text(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    for c in value.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            _ => out.push(c),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn attribute_escaping_covers_quotes() {
        assert_eq!(
            escape_attribute(r#"a "b" & 'c' <d>"#),
            "a &quot;b&quot; &amp; &#39;c&#39; &lt;d&gt;"
        );
    }

    #[test]
    fn text_escaping_leaves_quotes() {
        assert_eq!(escape_text(r#"1 < 2 & "x""#), r#"1 &lt; 2 &amp; "x""#);
        assert_eq!(escape_text("plain"), "plain");
    }
}
