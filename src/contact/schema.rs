//! Contact form payload and its validation

use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::is_valid_email;
use crate::config::ContactConfig;

/// Raw JSON body posted by the contact form. Every field is optional
/// here so that missing values surface as field issues, not as a
/// deserialization failure.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ContactPayload {
    pub name: Option<String>,
    pub email: Option<String>,
    pub subject: Option<String>,
    pub message: Option<String>,
    pub budget: Option<String>,
    pub timeline: Option<String>,
    pub project_type: Option<String>,
}

/// A submission that passed validation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContactSubmission {
    pub name: String,
    pub email: String,
    pub subject: Option<String>,
    pub message: String,
    pub budget: Option<Budget>,
    pub timeline: Option<Timeline>,
    pub project_type: Option<ProjectType>,
}

/// One failing field
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldIssue {
    pub field: String,
    pub message: String,
}

impl FieldIssue {
    pub fn new(field: &str, message: impl Into<String>) -> Self {
        Self {
            field: field.to_string(),
            message: message.into(),
        }
    }
}

/// Every field that failed validation, in form order
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid contact submission: {}", field_names(.issues))]
pub struct ValidationErrors {
    pub issues: Vec<FieldIssue>,
}

fn field_names(issues: &[FieldIssue]) -> String {
    issues
        .iter()
        .map(|i| i.field.as_str())
        .collect::<Vec<_>>()
        .join(", ")
}

impl ValidationErrors {
    pub fn has_field(&self, field: &str) -> bool {
        self.issues.iter().any(|i| i.field == field)
    }
}

macro_rules! choice_enum {
    ($(#[$meta:meta])* $name:ident { $($variant:ident => $value:literal, $label:literal),* $(,)? }) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq)]
        pub enum $name {
            $($variant),*
        }

        impl $name {
            pub const ALL: &'static [$name] = &[$($name::$variant),*];

            pub fn parse(value: &str) -> Option<Self> {
                match value {
                    $($value => Some($name::$variant),)*
                    _ => None,
                }
            }

            pub fn as_str(self) -> &'static str {
                match self {
                    $($name::$variant => $value),*
                }
            }

            pub fn label(self) -> &'static str {
                match self {
                    $($name::$variant => $label),*
                }
            }
        }
    };
}

choice_enum! {
    /// Rough budget of a project inquiry
    Budget {
        Under5k => "under-5k", "Less than $5k",
        From5kTo15k => "5k-15k", "$5k to $15k",
        From15kTo50k => "15k-50k", "$15k to $50k",
        Over50k => "50k-plus", "More than $50k",
        NotSure => "not-sure", "Not sure yet",
    }
}

choice_enum! {
    /// When the work should start
    Timeline {
        Asap => "asap", "As soon as possible",
        OneToThreeMonths => "1-3-months", "In 1 to 3 months",
        ThreeToSixMonths => "3-6-months", "In 3 to 6 months",
        Flexible => "flexible", "Flexible",
    }
}

choice_enum! {
    /// What the inquiry is about
    ProjectType {
        WebApp => "web-app", "Web application",
        Backend => "backend", "Backend or API",
        Consulting => "consulting", "Consulting",
        Speaking => "speaking", "Speaking or workshop",
        Other => "other", "Something else",
    }
}

/// Validate a payload against the configured limits, collecting every
/// failing field
pub fn validate(
    payload: &ContactPayload,
    limits: &ContactConfig,
) -> Result<ContactSubmission, ValidationErrors> {
    let mut issues = Vec::new();

    let name = trimmed(&payload.name);
    if name.chars().count() < limits.name_min_chars {
        issues.push(FieldIssue::new(
            "name",
            format!("Name must be at least {} characters", limits.name_min_chars),
        ));
    }

    let email = trimmed(&payload.email);
    if email.is_empty() {
        issues.push(FieldIssue::new("email", "Email is required"));
    } else if !is_valid_email(email) {
        issues.push(FieldIssue::new("email", "Please enter a valid email address"));
    }

    let subject = trimmed(&payload.subject);
    if subject.chars().count() > limits.subject_max_chars {
        issues.push(FieldIssue::new(
            "subject",
            format!(
                "Subject must be at most {} characters",
                limits.subject_max_chars
            ),
        ));
    }

    let message = trimmed(&payload.message);
    let message_len = message.chars().count();
    if message_len < limits.message_min_chars {
        issues.push(FieldIssue::new(
            "message",
            format!(
                "Message must be at least {} characters",
                limits.message_min_chars
            ),
        ));
    } else if message_len > limits.message_max_chars {
        issues.push(FieldIssue::new(
            "message",
            format!(
                "Message must be at most {} characters",
                limits.message_max_chars
            ),
        ));
    }

    let budget = choice(&payload.budget, "budget", Budget::parse, &mut issues);
    let timeline = choice(&payload.timeline, "timeline", Timeline::parse, &mut issues);
    let project_type = choice(
        &payload.project_type,
        "projectType",
        ProjectType::parse,
        &mut issues,
    );

    if !issues.is_empty() {
        return Err(ValidationErrors { issues });
    }

    Ok(ContactSubmission {
        name: name.to_string(),
        email: email.to_string(),
        subject: (!subject.is_empty()).then(|| subject.to_string()),
        message: message.to_string(),
        budget,
        timeline,
        project_type,
    })
}

fn trimmed(value: &Option<String>) -> &str {
    value.as_deref().map(str::trim).unwrap_or_default()
}

/// Parse an optional enumerated field; empty means not given
fn choice<T>(
    value: &Option<String>,
    field: &str,
    parse: fn(&str) -> Option<T>,
    issues: &mut Vec<FieldIssue>,
) -> Option<T> {
    let value = trimmed(value);
    if value.is_empty() {
        return None;
    }
    let parsed = parse(value);
    if parsed.is_none() {
        issues.push(FieldIssue::new(field, format!("Unknown option '{}'", value)));
    }
    parsed
}
