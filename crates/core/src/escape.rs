/// Escape text for an HTML element body or a quoted attribute value.
pub fn html(value: &str) -> String {
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

/// Escape text for a quoted JavaScript string literal inside a `<script>`
/// element. Markup-significant characters become `\xNN` so the value can
/// neither close the string nor the element.
pub fn js_string(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    for c in value.chars() {
        match c {
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            '\'' | '"' | '<' | '>' | '&' | '/' => out.push_str(&format!("\\x{:02x}", c as u32)),
            '\u{2028}' | '\u{2029}' => out.push_str(&format!("\\u{:04x}", c as u32)),
            c if c.is_control() => out.push_str(&format!("\\u{:04x}", c as u32)),
            _ => out.push(c),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn html_escapes_markup() {
        assert_eq!(html("<b>\"A&B\"</b>"), "&lt;b&gt;&quot;A&amp;B&quot;&lt;/b&gt;");
        assert_eq!(html("it's"), "it&#39;s");
        assert_eq!(html("UA-1-1"), "UA-1-1");
    }

    #[test]
    fn js_string_cannot_break_out() {
        assert_eq!(js_string("a'b"), "a\\x27b");
        assert_eq!(js_string("</script>"), "\\x3c\\x2fscript\\x3e");
        assert_eq!(js_string("x\\y\nz"), "x\\\\y\\nz");
        assert_eq!(js_string("\u{2028}"), "\\u2028");
    }

    #[test]
    fn plain_identifiers_pass_through() {
        for plain in ["UA-12345-1", "Error", "Anonymous", "ops.team@acme-corp.io"] {
            assert_eq!(js_string(plain), plain);
            assert_eq!(html(plain), plain);
        }
    }
}
