//! Theme mode - light/dark selection carried by a cookie
//!
//! The mode is read per request and handed to views explicitly; nothing
//! about it is stored process-wide.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Name of the cookie holding the selected mode
pub const THEME_COOKIE: &str = "theme";

/// Light or dark presentation
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ThemeMode {
    #[default]
    Light,
    Dark,
}

impl ThemeMode {
    /// Parse a mode name, ignoring case
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "light" => Some(ThemeMode::Light),
            "dark" => Some(ThemeMode::Dark),
            _ => None,
        }
    }

    /// Read the mode from a `Cookie` header value, defaulting to light
    pub fn from_cookie_header(header: Option<&str>) -> Self {
        header
            .into_iter()
            .flat_map(|h| h.split(';'))
            .filter_map(|pair| pair.trim().split_once('='))
            .find(|(name, _)| *name == THEME_COOKIE)
            .and_then(|(_, value)| Self::parse(value))
            .unwrap_or_default()
    }

    /// The opposite mode
    pub fn toggled(self) -> Self {
        match self {
            ThemeMode::Light => ThemeMode::Dark,
            ThemeMode::Dark => ThemeMode::Light,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            ThemeMode::Light => "light",
            ThemeMode::Dark => "dark",
        }
    }

    /// `Set-Cookie` value persisting this mode for a year
    pub fn set_cookie(self) -> String {
        format!(
            "{}={}; Path=/; Max-Age=31536000; SameSite=Lax",
            THEME_COOKIE,
            self.as_str()
        )
    }
}

impl fmt::Display for ThemeMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_cookie_header() {
        assert_eq!(ThemeMode::from_cookie_header(None), ThemeMode::Light);
        assert_eq!(
            ThemeMode::from_cookie_header(Some("session=abc; theme=dark")),
            ThemeMode::Dark
        );
        assert_eq!(
            ThemeMode::from_cookie_header(Some("theme=purple")),
            ThemeMode::Light
        );
        assert_eq!(
            ThemeMode::from_cookie_header(Some("mytheme=dark")),
            ThemeMode::Light
        );
    }

    #[test]
    fn test_toggle_and_cookie() {
        assert_eq!(ThemeMode::Light.toggled(), ThemeMode::Dark);
        assert_eq!(ThemeMode::Dark.toggled().toggled(), ThemeMode::Dark);
        assert!(ThemeMode::Dark.set_cookie().starts_with("theme=dark;"));
    }
}
