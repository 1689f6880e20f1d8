//! Initialize a new site

use anyhow::Result;
use std::fs;
use std::path::Path;

use crate::CONFIG_FILE;

const CONFIG_TEMPLATE: &str = r#"# Site
title: Jane Doe
description: Software engineer writing about Rust, the web and tools.
author: Jane Doe
tagline: Software engineer
language: en
keywords: [rust, web, portfolio]
avatar:
bio: |
  Hi, I'm Jane. I build backend systems and developer tools,
  and I write about what I learn along the way.

# URL
url: http://localhost:4000
root: /

# Directory
content_dir: content/blog
data_dir: data
static_dir: static
public_dir: public

# Writing
default_category: general
words_per_minute: 200
highlight:
  line_number: false
  light_theme: InspiredGitHub
  dark_theme: base16-ocean.dark

# Chrome
menu:
  - { name: Home, path: / }
  - { name: Blog, path: /blog }
  - { name: Projects, path: /projects }
  - { name: Books, path: /books }
  - { name: Tools, path: /tools }
  - { name: Stack, path: /stack }
  - { name: Resume, path: /resume }
  - { name: Contact, path: /contact }
social:
  - { name: GitHub, url: "https://github.com/janedoe" }

# Feed
feed_limit: 20
related_posts: 3

# Contact form
contact:
  name_min_chars: 3
  message_min_chars: 10
  message_max_chars: 5000
  subject_max_chars: 200
  subject_prefix: "[Portfolio]"

# Response headers
security:
  embed_route: /docs
  embed_origins: ["'self'", "https:"]
  hsts_max_age: 63072000
"#;

const PROJECTS: &str = r#"- id: folio
  title: Folio
  description: This site. Markdown posts, YAML catalogs and a contact form, served by axum.
  tags: [rust, web]
  featured: true
  repo_url: https://github.com/janedoe/folio
"#;

const BOOKS: &str = r#"- id: rust-book
  title: The Rust Programming Language
  author: Steve Klabnik and Carol Nichols
  status: finished
  rating: 5
  tags: [rust]
  url: https://doc.rust-lang.org/book/
"#;

const TOOLS: &str = r#"- id: neovim
  name: Neovim
  description: Editor for everything.
  category: Editor
  tags: [editor]
  url: https://neovim.io
"#;

const STACK: &str = r#"- key: languages
  name: Languages
  items:
    - { name: Rust, level: Daily, tags: [backend] }
    - { name: TypeScript, level: Often, tags: [frontend] }
- key: infrastructure
  name: Infrastructure
  items:
    - { name: PostgreSQL, tags: [backend] }
"#;

const RESUME: &str = r#"- id: acme
  section: experience
  title: Senior Engineer
  organization: Acme Corp
  start: "2021"
  summary: Backend services and internal tooling.
  highlights:
    - Cut p99 latency of the billing API in half
  tags: [rust]
"#;

const CSS: &str = r#"body { font-family: system-ui, sans-serif; line-height: 1.6; }
.container { max-width: 52rem; margin: 0 auto; padding: 0 1rem; }
"#;

/// Initialize a new site in the given directory
pub fn init_site(target_dir: &Path) -> Result<()> {
    let config_path = target_dir.join(CONFIG_FILE);
    if config_path.exists() {
        anyhow::bail!("{:?} already contains a site", target_dir);
    }

    // Create directory structure
    let content_dir = target_dir.join("content/blog");
    let data_dir = target_dir.join("data");
    let static_dir = target_dir.join("static");
    fs::create_dir_all(&content_dir)?;
    fs::create_dir_all(&data_dir)?;
    fs::create_dir_all(&static_dir)?;

    fs::write(&config_path, CONFIG_TEMPLATE)?;

    for (file, content) in [
        ("projects.yml", PROJECTS),
        ("books.yml", BOOKS),
        ("tools.yml", TOOLS),
        ("activities.yml", ""),
        ("media.yml", ""),
        ("stack.yml", STACK),
        ("resume.yml", RESUME),
    ] {
        fs::write(data_dir.join(file), content)?;
    }

    fs::write(static_dir.join("site.css"), CSS)?;

    // Create a sample post
    let today = chrono::Utc::now().format("%Y-%m-%d");
    let sample_post = format!(
        r#"---
slug: hello-world
title: Hello World
description: The first post on this site.
author: Jane Doe
publishedAt: {today}
category: general
tags: [meta]
featured: true
---

Welcome! This post lives in `content/blog/hello-world.md`.

## Quick Start

Create a new post:

```bash
$ folio new "My New Post"
```

Serve the site (needs the email settings in the environment):

```bash
$ folio serve
```

Write a static copy to `public/`:

```bash
$ folio build
```
"#
    );
    fs::write(content_dir.join("hello-world.md"), sample_post)?;

    tracing::debug!("Wrote site skeleton to {:?}", target_dir);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Site;
    use tempfile::TempDir;

    #[test]
    fn test_init_creates_loadable_site() {
        let dir = TempDir::new().unwrap();
        init_site(dir.path()).unwrap();

        let site = Site::new(dir.path()).unwrap();
        assert_eq!(site.config.title, "Jane Doe");

        let posts = site.loader().load_all_posts().unwrap();
        assert_eq!(posts.len(), 1);
        assert_eq!(posts[0].slug, "hello-world");

        let catalog = site.catalog().unwrap();
        assert_eq!(catalog.projects.len(), 1);
        assert_eq!(catalog.stack.len(), 2);
        assert!(catalog.media.is_empty());
    }

    #[test]
    fn test_init_refuses_existing_site() {
        let dir = TempDir::new().unwrap();
        init_site(dir.path()).unwrap();
        assert!(init_site(dir.path()).is_err());
    }
}
