//! Block rendering to HTML with syntax highlighting

use syntect::highlighting::{Theme, ThemeSet};
use syntect::html::highlighted_html_for_string;
use syntect::parsing::SyntaxSet;

use super::markdown::{ContentBlock, Inline};
use crate::config::HighlightConfig;
use crate::helpers::html_escape;
use crate::theme::ThemeMode;

/// Syntax highlighter for code blocks
pub struct CodeHighlighter {
    syntax_set: SyntaxSet,
    theme_set: ThemeSet,
    light_theme: String,
    dark_theme: String,
    line_numbers: bool,
}

impl CodeHighlighter {
    /// Create a highlighter with the default themes
    pub fn new() -> Self {
        Self::with_config(&HighlightConfig::default())
    }

    /// Create with custom settings
    pub fn with_config(config: &HighlightConfig) -> Self {
        Self {
            syntax_set: SyntaxSet::load_defaults_newlines(),
            theme_set: ThemeSet::load_defaults(),
            light_theme: config.light_theme.clone(),
            dark_theme: config.dark_theme.clone(),
            line_numbers: config.line_number,
        }
    }

    /// Render blocks to HTML for the given theme mode
    pub fn render_html(&self, blocks: &[ContentBlock], mode: ThemeMode) -> String {
        let mut html = String::new();
        for block in blocks {
            match block {
                ContentBlock::Heading { level, text } => {
                    html.push_str(&format!(
                        r#"<h{level} id="{}">{}</h{level}>"#,
                        slug::slugify(text),
                        html_escape(text),
                    ));
                }
                ContentBlock::Paragraph(inlines) => {
                    html.push_str(&format!("<p>{}</p>", render_inlines(inlines)));
                }
                ContentBlock::Code { language, code } => {
                    html.push_str(&self.highlight_code(code, language.as_deref(), mode));
                }
                ContentBlock::List { ordered, items } => {
                    let tag = if *ordered { "ol" } else { "ul" };
                    html.push_str(&format!("<{}>", tag));
                    for item in items {
                        html.push_str(&format!("<li>{}</li>", render_inlines(item)));
                    }
                    html.push_str(&format!("</{}>", tag));
                }
                ContentBlock::Quote(inlines) => {
                    html.push_str(&format!(
                        "<blockquote><p>{}</p></blockquote>",
                        render_inlines(inlines)
                    ));
                }
                ContentBlock::Rule => html.push_str("<hr>"),
            }
            html.push('\n');
        }
        html
    }

    /// Highlight a code block
    fn highlight_code(&self, code: &str, lang: Option<&str>, mode: ThemeMode) -> String {
        let lang = lang.unwrap_or("text");
        let class = html_escape(lang);

        // Try to find syntax for the language
        let syntax = self
            .syntax_set
            .find_syntax_by_token(lang)
            .or_else(|| self.syntax_set.find_syntax_by_extension(lang))
            .unwrap_or_else(|| self.syntax_set.find_syntax_plain_text());

        let highlighted = self
            .theme(mode)
            .and_then(|theme| highlighted_html_for_string(code, &self.syntax_set, syntax, theme).ok());

        match highlighted {
            Some(highlighted) if self.line_numbers => add_line_numbers(&highlighted, &class),
            Some(highlighted) => format!(
                r#"<figure class="highlight {}">{}</figure>"#,
                class, highlighted
            ),
            None => format!(
                r#"<pre><code class="language-{}">{}</code></pre>"#,
                class,
                html_escape(code)
            ),
        }
    }

    fn theme(&self, mode: ThemeMode) -> Option<&Theme> {
        let name = match mode {
            ThemeMode::Light => &self.light_theme,
            ThemeMode::Dark => &self.dark_theme,
        };
        self.theme_set
            .themes
            .get(name)
            .or_else(|| self.theme_set.themes.values().next())
    }
}

impl Default for CodeHighlighter {
    fn default() -> Self {
        Self::new()
    }
}

/// Add a line-number gutter to highlighted code
fn add_line_numbers(code: &str, class: &str) -> String {
    let lines: Vec<&str> = code.lines().collect();

    let gutter = (1..=lines.len())
        .map(|n| format!(r#"<span class="line-number">{}</span>"#, n))
        .collect::<Vec<_>>()
        .join("\n");

    format!(
        r#"<figure class="highlight {}"><table><tr><td class="gutter"><pre>{}</pre></td><td class="code">{}</td></tr></table></figure>"#,
        class,
        gutter,
        lines.join("\n")
    )
}

fn render_inlines(inlines: &[Inline]) -> String {
    inlines
        .iter()
        .map(|inline| match inline {
            Inline::Text(text) => html_escape(text),
            Inline::Code(code) => format!("<code>{}</code>", html_escape(code)),
            Inline::Emphasis(text) => format!("<em>{}</em>", html_escape(text)),
            Inline::Strong(text) => format!("<strong>{}</strong>", html_escape(text)),
            Inline::Link { text, href } => match safe_href(href) {
                Some(href) if is_external(href) => format!(
                    r#"<a href="{}" target="_blank" rel="noopener">{}</a>"#,
                    html_escape(href),
                    html_escape(text)
                ),
                Some(href) => format!(r#"<a href="{}">{}</a>"#, html_escape(href), html_escape(text)),
                None => html_escape(text),
            },
            Inline::Image { alt, src } => match safe_href(src) {
                Some(src) => format!(
                    r#"<img src="{}" alt="{}" loading="lazy">"#,
                    html_escape(src),
                    html_escape(alt)
                ),
                None => html_escape(alt),
            },
        })
        .collect()
}

/// Reject script-bearing URL schemes
fn safe_href(href: &str) -> Option<&str> {
    let lower = href.trim().to_ascii_lowercase();
    if lower.starts_with("javascript:") || lower.starts_with("vbscript:") || lower.starts_with("data:text") {
        None
    } else {
        Some(href.trim())
    }
}

fn is_external(href: &str) -> bool {
    href.starts_with("http://") || href.starts_with("https://")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::content::markdown::parse_blocks;

    #[test]
    fn test_render_basic_markdown() {
        let highlighter = CodeHighlighter::new();
        let html = highlighter.render_html(
            &parse_blocks("# Hello World\n\nThis is a <test>."),
            ThemeMode::Light,
        );
        assert!(html.contains(r#"<h1 id="hello-world">Hello World</h1>"#));
        assert!(html.contains("<p>This is a &lt;test&gt;.</p>"));
    }

    #[test]
    fn test_render_code_block() {
        let highlighter = CodeHighlighter::new();
        let blocks = parse_blocks("```rust\nfn main() {}\n```");
        let html = highlighter.render_html(&blocks, ThemeMode::Dark);
        assert!(html.contains(r#"class="highlight rust""#));
        assert!(html.contains("main"));
    }

    #[test]
    fn test_line_numbers() {
        let config = HighlightConfig {
            line_number: true,
            ..Default::default()
        };
        let highlighter = CodeHighlighter::with_config(&config);
        let html = highlighter.render_html(&parse_blocks("```\na\nb\n```"), ThemeMode::Light);
        assert!(html.contains(r#"<span class="line-number">2</span>"#));
    }

    #[test]
    fn test_unsafe_links_render_as_text() {
        let highlighter = CodeHighlighter::new();
        let html = highlighter.render_html(
            &parse_blocks("[click](javascript:alert(1)) [site](https://example.com)"),
            ThemeMode::Light,
        );
        assert!(!html.contains("javascript:"));
        assert!(html.contains(r#"<a href="https://example.com" target="_blank" rel="noopener">site</a>"#));
    }
}
