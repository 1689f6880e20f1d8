//! Helper functions shared by views, the generator and the contact mailer

mod html;
mod url;

pub use html::*;
pub use url::*;
