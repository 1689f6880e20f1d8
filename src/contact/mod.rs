//! Contact module - form validation and the notification email

mod mailer;
mod schema;

pub use mailer::{EmailError, EmailMessage, EmailSender, ResendClient};
pub use schema::{
    validate, Budget, ContactPayload, ContactSubmission, FieldIssue, ProjectType, Timeline,
    ValidationErrors,
};

use lazy_static::lazy_static;
use regex::Regex;

use crate::helpers::html_escape;

lazy_static! {
    static ref EMAIL_RE: Regex = Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").unwrap();
}

/// Loose syntactic email check: something@domain.tld, no whitespace
pub fn is_valid_email(value: &str) -> bool {
    EMAIL_RE.is_match(value)
}

impl ContactSubmission {
    /// Subject line of the notification, free of line breaks
    pub fn email_subject(&self, prefix: &str) -> String {
        let subject = match &self.subject {
            Some(subject) => subject.clone(),
            None => format!("New message from {}", self.name),
        };
        let subject: String = subject
            .chars()
            .map(|c| if c.is_control() { ' ' } else { c })
            .collect();
        if prefix.is_empty() {
            subject
        } else {
            format!("{} {}", prefix, subject)
        }
    }

    /// Field/value lines shown in the notification
    fn details(&self) -> Vec<(&'static str, String)> {
        let mut details = vec![("Name", self.name.clone()), ("Email", self.email.clone())];
        if let Some(subject) = &self.subject {
            details.push(("Subject", subject.clone()));
        }
        if let Some(project_type) = self.project_type {
            details.push(("Project type", project_type.label().to_string()));
        }
        if let Some(budget) = self.budget {
            details.push(("Budget", budget.label().to_string()));
        }
        if let Some(timeline) = self.timeline {
            details.push(("Timeline", timeline.label().to_string()));
        }
        details
    }

    /// Render the notification sent to the site owner. Replies go to the
    /// submitter.
    pub fn to_email(&self, from: &str, to: &str, subject_prefix: &str) -> EmailMessage {
        let details = self.details();

        let mut html = String::from("<h2>New contact form submission</h2>\n<table>\n");
        for (label, value) in &details {
            html.push_str(&format!(
                "<tr><th align=\"left\">{}</th><td>{}</td></tr>\n",
                label,
                html_escape(value)
            ));
        }
        html.push_str("</table>\n");
        for paragraph in self.message.split("\n\n") {
            html.push_str(&format!(
                "<p>{}</p>\n",
                html_escape(paragraph).replace('\n', "<br>")
            ));
        }

        let mut text = String::new();
        for (label, value) in &details {
            text.push_str(&format!("{}: {}\n", label, value));
        }
        text.push('\n');
        text.push_str(&self.message);
        text.push('\n');

        EmailMessage {
            from: from.to_string(),
            to: vec![to.to_string()],
            subject: self.email_subject(subject_prefix),
            html,
            text,
            reply_to: Some(self.email.clone()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn submission() -> ContactSubmission {
        ContactSubmission {
            name: "Jane <script>".to_string(),
            email: "jane@example.com".to_string(),
            subject: None,
            message: "Hi!\nI'd like <b>help</b>.\n\nThanks".to_string(),
            budget: Some(Budget::NotSure),
            timeline: None,
            project_type: None,
        }
    }

    #[test]
    fn test_is_valid_email() {
        assert!(is_valid_email("jane@example.com"));
        assert!(is_valid_email("a.b+c@sub.example.co"));
        assert!(!is_valid_email("jane.example.com"));
        assert!(!is_valid_email("jane@example"));
        assert!(!is_valid_email("ja ne@example.com"));
        assert!(!is_valid_email(""));
    }

    #[test]
    fn test_notification_escapes_input() {
        let email = submission().to_email("site@example.com", "me@example.com", "[Portfolio]");
        assert_eq!(email.reply_to.as_deref(), Some("jane@example.com"));
        assert_eq!(email.to, vec!["me@example.com"]);
        assert!(email.html.contains("Jane &lt;script&gt;"));
        assert!(email.html.contains("I&#39;d like &lt;b&gt;help&lt;/b&gt;."));
        assert!(!email.html.contains("<script>"));
        assert!(email.html.contains("<p>Thanks</p>"));
        assert!(email.text.contains("Budget: Not sure yet"));
        assert!(email.text.ends_with("Thanks\n"));
    }

    #[test]
    fn test_email_subject() {
        let mut s = submission();
        assert_eq!(
            s.email_subject("[Portfolio]"),
            "[Portfolio] New message from Jane <script>"
        );
        s.subject = Some("Hello\r\nBcc: x@y.z".to_string());
        assert_eq!(s.email_subject(""), "Hello  Bcc: x@y.z");
    }
}
