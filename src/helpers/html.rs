//! HTML and XML text helpers

/// Escape HTML special characters
pub fn html_escape(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#39;")
}

/// Escape XML special characters
pub fn escape_xml(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&apos;")
}

/// Strip HTML tags from a string
pub fn strip_html(s: &str) -> String {
    let mut result = String::with_capacity(s.len());
    let mut in_tag = false;

    for c in s.chars() {
        match c {
            '<' => in_tag = true,
            '>' => in_tag = false,
            _ if !in_tag => result.push(c),
            _ => {}
        }
    }

    result
}

/// Truncate a string to at most `length` characters, omission included
pub fn truncate(s: &str, length: usize, omission: Option<&str>) -> String {
    let omission = omission.unwrap_or("...");

    if s.chars().count() <= length {
        s.to_string()
    } else {
        let truncated: String = s
            .chars()
            .take(length.saturating_sub(omission.chars().count()))
            .collect();
        format!("{}{}", truncated.trim_end(), omission)
    }
}

/// Make root-relative `href`/`src` attributes absolute (for feeds)
pub fn absolutize_urls(content: &str, base_url: &str) -> String {
    let base_url = base_url.trim_end_matches('/');
    content
        .replace("href=\"/", &format!("href=\"{}/", base_url))
        .replace("src=\"/", &format!("src=\"{}/", base_url))
        .replace("href='/", &format!("href='{}/", base_url))
        .replace("src='/", &format!("src='{}/", base_url))
}

/// Strip characters XML 1.0 does not allow
/// (everything below 0x20 except tab, newline and carriage return)
pub fn strip_invalid_xml_chars(s: &str) -> String {
    s.chars()
        .filter(|&c| {
            c == '\t'
                || c == '\n'
                || c == '\r'
                || ('\u{0020}'..='\u{D7FF}').contains(&c)
                || ('\u{E000}'..='\u{FFFD}').contains(&c)
                || ('\u{10000}'..='\u{10FFFF}').contains(&c)
        })
        .collect()
}

/// Serialized JSON that is safe inside a `<script>` element
pub fn script_json(value: &serde_json::Value) -> String {
    value.to_string().replace("</", "<\\/")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_html_escape() {
        assert_eq!(
            html_escape(r#"<a href="x">Tom & Jerry's</a>"#),
            "&lt;a href=&quot;x&quot;&gt;Tom &amp; Jerry&#39;s&lt;/a&gt;"
        );
    }

    #[test]
    fn test_strip_html() {
        assert_eq!(strip_html("<p>Hello <b>World</b></p>"), "Hello World");
    }

    #[test]
    fn test_truncate() {
        assert_eq!(truncate("Hello World", 8, None), "Hello...");
        assert_eq!(truncate("Hi", 10, None), "Hi");
        assert_eq!(truncate("你好世界你好", 4, Some("…")), "你好世…");
    }

    #[test]
    fn test_absolutize_urls() {
        assert_eq!(
            absolutize_urls(r#"<img src="/assets/a.png"><a href="/blog">x</a>"#, "https://e.com/"),
            r#"<img src="https://e.com/assets/a.png"><a href="https://e.com/blog">x</a>"#
        );
    }

    #[test]
    fn test_strip_invalid_xml_chars() {
        assert_eq!(strip_invalid_xml_chars("a\u{0}b\u{8}c\td"), "abc\td");
    }

    #[test]
    fn test_script_json() {
        let value = serde_json::json!({"name": "</script><script>alert(1)"});
        assert!(!script_json(&value).contains("</script>"));
    }
}
