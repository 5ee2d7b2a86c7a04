use std::fmt;
use tracing::error;

/// A problem found while turning an OpenAPI document into routes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationIssue {
    pub location: String,
    pub kind: String,
    pub message: String,
}

impl ValidationIssue {
    pub fn new(location: impl Into<String>, kind: impl Into<String>, message: impl Into<String>) -> Self {
        ValidationIssue {
            location: location.into(),
            kind: kind.into(),
            message: message.into(),
        }
    }
}

impl fmt::Display for ValidationIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}: {}", self.kind, self.location, self.message)
    }
}

/// Log every issue and fold them into a single error.
///
/// # Errors
///
/// Returns an error when `issues` is not empty.
pub fn fail_if_issues(issues: Vec<ValidationIssue>) -> anyhow::Result<()> {
    if issues.is_empty() {
        return Ok(());
    }

    for issue in &issues {
        error!(
            kind = %issue.kind,
            location = %issue.location,
            message = %issue.message,
            "OpenAPI security validation issue"
        );
    }

    let details = issues
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("\n");
    anyhow::bail!(
        "OpenAPI spec validation failed. {} issue(s) found:\n{details}",
        issues.len()
    )
}
