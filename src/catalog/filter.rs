//! Listing filters: title search and tag selection

use indexmap::IndexSet;
use serde::Serialize;

use crate::content::Post;

/// Anything that can appear in a filterable listing
pub trait Filterable {
    fn title(&self) -> &str;

    fn has_tag(&self, tag: &str) -> bool;
}

impl Filterable for Post {
    fn title(&self) -> &str {
        &self.title
    }

    fn has_tag(&self, tag: &str) -> bool {
        Post::has_tag(self, tag)
    }
}

/// Text and tag filter applied to a listing.
///
/// An item matches when its title contains the query (ignoring case) and,
/// if any tags are selected, it carries at least one of them.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ListingFilter {
    pub query: Option<String>,
    pub tags: Vec<String>,
}

impl ListingFilter {
    /// Build a filter from `?q=...&tags=a,b` query values
    pub fn from_query(query: Option<&str>, tags: Option<&str>) -> Self {
        let query = query
            .map(str::trim)
            .filter(|q| !q.is_empty())
            .map(str::to_string);

        let tags: IndexSet<String> = tags
            .unwrap_or_default()
            .split(',')
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .map(str::to_string)
            .collect();

        Self {
            query,
            tags: tags.into_iter().collect(),
        }
    }

    /// Filter on a single tag
    pub fn tag(tag: &str) -> Self {
        Self {
            query: None,
            tags: vec![tag.to_string()],
        }
    }

    pub fn is_empty(&self) -> bool {
        self.query.is_none() && self.tags.is_empty()
    }

    pub fn matches<T: Filterable + ?Sized>(&self, item: &T) -> bool {
        let text_ok = match &self.query {
            Some(query) => item
                .title()
                .to_lowercase()
                .contains(&query.to_lowercase()),
            None => true,
        };
        let tags_ok = self.tags.is_empty() || self.tags.iter().any(|t| item.has_tag(t));
        text_ok && tags_ok
    }

    /// Matching items, in their original order
    pub fn apply<'a, T: Filterable>(&self, items: &'a [T]) -> Vec<&'a T> {
        items.iter().filter(|item| self.matches(*item)).collect()
    }

    pub fn is_selected(&self, tag: &str) -> bool {
        self.tags.iter().any(|t| t == tag)
    }

    /// Query string for the same filter with `tag` switched on or off
    pub fn toggle_tag_query(&self, tag: &str) -> String {
        let mut tags: Vec<&str> = self.tags.iter().map(String::as_str).collect();
        if let Some(pos) = tags.iter().position(|t| *t == tag) {
            tags.remove(pos);
        } else {
            tags.push(tag);
        }

        let mut params = Vec::new();
        if let Some(query) = &self.query {
            params.push(format!("q={}", encode_component(query)));
        }
        if !tags.is_empty() {
            let joined: Vec<String> = tags.iter().map(|t| encode_component(t)).collect();
            params.push(format!("tags={}", joined.join(",")));
        }

        if params.is_empty() {
            String::new()
        } else {
            format!("?{}", params.join("&"))
        }
    }
}

/// Collect the distinct tags of a listing, first-seen order
pub fn collect_tags<I, S>(tags: I) -> Vec<String>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let set: IndexSet<String> = tags
        .into_iter()
        .map(|t| t.as_ref().to_string())
        .collect();
    set.into_iter().collect()
}

fn encode_component(value: &str) -> String {
    percent_encoding::utf8_percent_encode(value, percent_encoding::NON_ALPHANUMERIC).to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Item {
        title: &'static str,
        tags: Vec<&'static str>,
    }

    impl Filterable for Item {
        fn title(&self) -> &str {
            self.title
        }

        fn has_tag(&self, tag: &str) -> bool {
            self.tags.contains(&tag)
        }
    }

    fn catalog() -> Vec<Item> {
        vec![
            Item { title: "Rust CLI", tags: vec!["A"] },
            Item { title: "Web App", tags: vec!["B", "C"] },
            Item { title: "Garden", tags: vec!["C"] },
            Item { title: "Rusty Robot", tags: vec!["A", "B"] },
            Item { title: "Untagged", tags: vec![] },
        ]
    }

    fn titles(items: Vec<&Item>) -> Vec<&'static str> {
        items.into_iter().map(|i| i.title).collect()
    }

    #[test]
    fn test_tag_filter_is_intersection() {
        let filter = ListingFilter::from_query(None, Some("A,B"));
        let items = catalog();
        assert_eq!(
            titles(filter.apply(&items)),
            vec!["Rust CLI", "Web App", "Rusty Robot"]
        );
    }

    #[test]
    fn test_tag_filter_independent_of_order() {
        let filter = ListingFilter::from_query(None, Some("B,A"));
        let mut items = catalog();
        items.reverse();
        let mut found = titles(filter.apply(&items));
        found.sort();
        assert_eq!(found, vec!["Rust CLI", "Rusty Robot", "Web App"]);
    }

    #[test]
    fn test_text_and_tags_combine() {
        let items = catalog();
        let filter = ListingFilter::from_query(Some("  RUST "), Some("B"));
        assert_eq!(titles(filter.apply(&items)), vec!["Rusty Robot"]);

        let filter = ListingFilter::from_query(Some("rust"), None);
        assert_eq!(titles(filter.apply(&items)), vec!["Rust CLI", "Rusty Robot"]);
    }

    #[test]
    fn test_empty_filter_keeps_everything() {
        let items = catalog();
        let filter = ListingFilter::from_query(Some(""), Some(" , "));
        assert!(filter.is_empty());
        assert_eq!(filter.apply(&items).len(), items.len());
    }

    #[test]
    fn test_toggle_tag_query() {
        let filter = ListingFilter::from_query(Some("web dev"), Some("A"));
        assert_eq!(filter.toggle_tag_query("B"), "?q=web%20dev&tags=A,B");
        assert_eq!(filter.toggle_tag_query("A"), "?q=web%20dev");
        assert_eq!(ListingFilter::default().toggle_tag_query("C++"), "?tags=C%2B%2B");
    }

    #[test]
    fn test_collect_tags() {
        let tags = collect_tags(["b", "a", "b", "c"]);
        assert_eq!(tags, vec!["b", "a", "c"]);
    }
}
