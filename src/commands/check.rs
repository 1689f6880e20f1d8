//! Validate content, catalog and environment without serving

use anyhow::Result;

use crate::config::EmailConfig;
use crate::Site;

/// Outcome of `folio check`
#[derive(Debug, Default)]
pub struct Report {
    pub passed: Vec<String>,
    pub failed: Vec<String>,
}

impl Report {
    pub fn is_ok(&self) -> bool {
        self.failed.is_empty()
    }
}

/// Run every check, reading environment variables through `lookup`
pub fn check<F>(site: &Site, lookup: F) -> Report
where
    F: Fn(&str) -> Option<String>,
{
    let mut report = Report::default();

    match site.loader().load_all_posts() {
        Ok(posts) => report.passed.push(format!("{} posts", posts.len())),
        Err(e) => report.failed.push(format!("content: {}", e)),
    }

    match site.catalog() {
        Ok(catalog) => {
            let entries: usize = catalog.summary().iter().map(|(_, count)| count).sum();
            report.passed.push(format!("{} catalog entries", entries));
        }
        Err(e) => report.failed.push(format!("catalog: {:#}", e)),
    }

    match EmailConfig::from_lookup(lookup) {
        Ok(email) => report
            .passed
            .push(format!("email: {} -> {}", email.from, email.to)),
        Err(e) => report.failed.push(format!("environment: {}", e)),
    }

    report
}

pub fn run(site: &Site) -> Result<()> {
    let report = check(site, |key| std::env::var(key).ok());

    for line in &report.passed {
        println!("  ok    {}", line);
    }
    for line in &report.failed {
        println!("  error {}", line);
    }

    if !report.is_ok() {
        anyhow::bail!("{} check(s) failed", report.failed.len());
    }
    println!("All checks passed.");
    Ok(())
}
