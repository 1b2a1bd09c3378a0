use std::fmt;

/// A single problem found while turning an OpenAPI document into descriptors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationIssue {
    pub location: String,
    pub kind: String,
    pub message: String,
}

impl ValidationIssue {
    pub fn new(
        location: impl Into<String>,
        kind: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
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

/// All issues found in one document, reported together.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpecIssues(pub Vec<ValidationIssue>);

impl fmt::Display for SpecIssues {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "OpenAPI spec validation failed. {} issue(s) found:",
            self.0.len()
        )?;
        for issue in &self.0 {
            writeln!(f, "  {issue}")?;
        }
        Ok(())
    }
}

impl std::error::Error for SpecIssues {}

/// Turn collected issues into an error, or `Ok(())` when there are none.
pub fn ensure_no_issues(issues: Vec<ValidationIssue>) -> Result<(), SpecIssues> {
    if issues.is_empty() {
        Ok(())
    } else {
        Err(SpecIssues(issues))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_issues_ok() {
        assert!(ensure_no_issues(Vec::new()).is_ok());
    }

    #[test]
    fn test_issues_listed_in_display() {
        let err = ensure_no_issues(vec![
            ValidationIssue::new("/a → POST", "MissingHandler", "no operationId"),
            ValidationIssue::new("/b → GET", "DuplicateHandler", "x used twice"),
        ])
        .unwrap_err();
        let text = err.to_string();
        assert!(text.contains("2 issue(s)"));
        assert!(text.contains("[MissingHandler] /a → POST: no operationId"));
        assert!(text.contains("[DuplicateHandler] /b → GET"));
    }
}
