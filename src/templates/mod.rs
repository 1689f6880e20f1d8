//! Built-in site templates using the Tera template engine
//!
//! All templates are embedded directly in the binary. Autoescaping is on
//! for every `.html` template; pre-rendered markup is marked `| safe`.

use anyhow::Result;
use std::collections::HashMap;
use tera::{Context, Tera};

use crate::helpers::{html_escape, strip_html, truncate};

/// Template renderer with the embedded site templates
pub struct TemplateRenderer {
    tera: Tera,
}

impl TemplateRenderer {
    /// Create a new renderer with all templates loaded
    pub fn new() -> Result<Self> {
        let mut tera = Tera::default();

        // Same escaping as the rest of the crate; Tera's default also
        // escapes '/', which mangles every URL attribute
        tera.set_escape_fn(html_escape);

        tera.add_raw_templates(vec![
            ("layout.html", include_str!("site/layout.html")),
            ("macros.html", include_str!("site/macros.html")),
            ("index.html", include_str!("site/index.html")),
            ("about.html", include_str!("site/about.html")),
            ("blog.html", include_str!("site/blog.html")),
            ("post.html", include_str!("site/post.html")),
            ("catalog.html", include_str!("site/catalog.html")),
            ("stack.html", include_str!("site/stack.html")),
            ("resume.html", include_str!("site/resume.html")),
            ("contact.html", include_str!("site/contact.html")),
            ("not_found.html", include_str!("site/not_found.html")),
            // Partials
            ("partials/nav.html", include_str!("site/partials/nav.html")),
            (
                "partials/footer.html",
                include_str!("site/partials/footer.html"),
            ),
            (
                "partials/filter.html",
                include_str!("site/partials/filter.html"),
            ),
        ])?;

        // Register custom filters
        tera.register_filter("strip_html", strip_html_filter);
        tera.register_filter("truncate_chars", truncate_chars_filter);
        tera.register_filter("date_format", date_format_filter);

        Ok(Self { tera })
    }

    /// Render a template with given context
    pub fn render(&self, template_name: &str, context: &Context) -> Result<String> {
        Ok(self.tera.render(template_name, context)?)
    }
}

/// Tera filter: strip HTML tags
fn strip_html_filter(
    value: &tera::Value,
    _args: &HashMap<String, tera::Value>,
) -> tera::Result<tera::Value> {
    let s = tera::try_get_value!("strip_html", "value", String, value);
    Ok(tera::Value::String(strip_html(&s)))
}

/// Tera filter: truncate by character count
fn truncate_chars_filter(
    value: &tera::Value,
    args: &HashMap<String, tera::Value>,
) -> tera::Result<tera::Value> {
    let s = tera::try_get_value!("truncate_chars", "value", String, value);
    let length = match args.get("length") {
        Some(val) => tera::try_get_value!("truncate_chars", "length", usize, val),
        None => 160,
    };
    let omission = match args.get("omission") {
        Some(val) => tera::try_get_value!("truncate_chars", "omission", String, val),
        None => "…".to_string(),
    };

    Ok(tera::Value::String(truncate(&s, length, Some(&omission))))
}

/// Tera filter: format an RFC 3339 timestamp or a `YYYY-MM-DD` date with a
/// strftime pattern
fn date_format_filter(
    value: &tera::Value,
    args: &HashMap<String, tera::Value>,
) -> tera::Result<tera::Value> {
    let s = tera::try_get_value!("date_format", "value", String, value);
    let format = match args.get("format") {
        Some(val) => tera::try_get_value!("date_format", "format", String, val),
        None => "%Y-%m-%d".to_string(),
    };

    let date = chrono::DateTime::parse_from_rfc3339(&s)
        .map(|dt| dt.date_naive())
        .or_else(|_| chrono::NaiveDate::parse_from_str(&s, "%Y-%m-%d"));

    match date {
        Ok(date) => Ok(tera::Value::String(date.format(&format).to_string())),
        // Not a date we know: return as-is
        Err(_) => Ok(tera::Value::String(s)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(pairs: &[(&str, tera::Value)]) -> HashMap<String, tera::Value> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.clone()))
            .collect()
    }

    #[test]
    fn test_templates_load() {
        assert!(TemplateRenderer::new().is_ok());
    }

    #[test]
    fn test_date_format_filter() {
        let value = tera::Value::String("2024-03-01T09:00:00+00:00".to_string());
        let out = date_format_filter(
            &value,
            &args(&[("format", tera::Value::String("%b %-d, %Y".to_string()))]),
        )
        .unwrap();
        assert_eq!(out, tera::Value::String("Mar 1, 2024".to_string()));

        let value = tera::Value::String("soon".to_string());
        let out = date_format_filter(&value, &HashMap::new()).unwrap();
        assert_eq!(out, tera::Value::String("soon".to_string()));
    }

    #[test]
    fn test_truncate_chars_filter() {
        let value = tera::Value::String("abcdefghij".to_string());
        let out = truncate_chars_filter(&value, &args(&[("length", tera::Value::from(5))])).unwrap();
        assert_eq!(out, tera::Value::String("abcd…".to_string()));
    }

    #[test]
    fn test_autoescape_is_on() {
        let renderer = TemplateRenderer::new().unwrap();
        let mut tera = renderer.tera;
        tera.add_raw_template("probe.html", "{{ value }}|{{ value | safe }}")
            .unwrap();
        let mut context = Context::new();
        context.insert("value", "<b>");
        let out = tera.render("probe.html", &context).unwrap();
        assert_eq!(out, "&lt;b&gt;|<b>");
    }
}
