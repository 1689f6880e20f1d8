//! Configuration module

mod env;
mod site;

pub use env::{ConfigError, EmailConfig, API_KEY_VAR, API_URL_VAR, FROM_VAR, TO_VAR};
pub use site::ContactConfig;
pub use site::HighlightConfig;
pub use site::MenuItem;
pub use site::SecurityConfig;
pub use site::SiteConfig;
pub use site::SocialLink;
