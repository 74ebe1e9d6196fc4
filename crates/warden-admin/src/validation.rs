//! Draft validation.
//!
//! Every rule runs; the caller gets all violations at once.

use warden_core::error::{FieldViolation, WardenError, WardenResult};
use warden_core::models::resource_server::{ResourceServerDraft, dedup_scopes};

use crate::config::AdminConfig;

pub fn validate_draft(draft: &ResourceServerDraft, config: &AdminConfig) -> WardenResult<()> {
    let mut violations = Vec::new();
    let max = config.max_field_length;

    if draft.name.trim().is_empty() {
        violations.push(FieldViolation::new("name", "must not be blank"));
    } else if too_long(&draft.name, max) {
        violations.push(FieldViolation::new("name", format!("must be at most {max} characters")));
    }

    // Description is free text and has no length bound.
    if draft.contact_name.as_deref().is_some_and(|v| too_long(v, max)) {
        violations.push(FieldViolation::new(
            "contactName",
            format!("must be at most {max} characters"),
        ));
    }

    if let Some(email) = draft.contact_email.as_deref() {
        if !is_plausible_email(email) {
            violations.push(FieldViolation::new("contactEmail", "must be an email address"));
        } else if too_long(email, max) {
            violations.push(FieldViolation::new(
                "contactEmail",
                format!("must be at most {max} characters"),
            ));
        }
    }

    if let Some(url) = draft.thumbnail_url.as_deref() {
        if !(url.starts_with("http://") || url.starts_with("https://")) {
            violations.push(FieldViolation::new("thumbNailUrl", "must be an http(s) URL"));
        }
    }

    for (i, scope) in draft.scopes.iter().enumerate() {
        let field = format!("scopes[{i}]");
        if scope.is_empty() {
            violations.push(FieldViolation::new(field, "must not be empty"));
        } else if scope.chars().any(char::is_whitespace) {
            violations.push(FieldViolation::new(field, "must not contain whitespace"));
        } else if too_long(scope, max) {
            violations.push(FieldViolation::new(field, format!("must be at most {max} characters")));
        }
    }

    let distinct = dedup_scopes(&draft.scopes).len();
    if distinct > config.max_scopes {
        violations.push(FieldViolation::new(
            "scopes",
            format!("at most {} scopes allowed, got {distinct}", config.max_scopes),
        ));
    }

    if violations.is_empty() {
        Ok(())
    } else {
        Err(WardenError::Validation { violations })
    }
}

fn too_long(value: &str, max: usize) -> bool {
    value.chars().count() > max
}

fn is_plausible_email(value: &str) -> bool {
    match value.split_once('@') {
        Some((local, domain)) => !local.is_empty() && !domain.is_empty() && !domain.contains('@'),
        None => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn draft(name: &str, scopes: &[&str]) -> ResourceServerDraft {
        ResourceServerDraft {
            name: name.into(),
            scopes: scopes.iter().map(|s| s.to_string()).collect(),
            ..Default::default()
        }
    }

    fn fields(result: WardenResult<()>) -> Vec<String> {
        match result {
            Err(WardenError::Validation { violations }) => {
                violations.into_iter().map(|v| v.field).collect()
            }
            other => panic!("expected validation error, got {other:?}"),
        }
    }

    #[test]
    fn minimal_draft_is_valid() {
        validate_draft(&draft("api", &["read"]), &AdminConfig::default()).unwrap();
    }

    #[test]
    fn collects_every_violation() {
        let mut d = draft("  ", &["ok", "", "has space"]);
        d.contact_email = Some("nobody".into());
        d.thumbnail_url = Some("ftp://host/img.png".into());

        assert_eq!(
            fields(validate_draft(&d, &AdminConfig::default())),
            vec!["name", "contactEmail", "thumbNailUrl", "scopes[1]", "scopes[2]"]
        );
    }

    #[test]
    fn scope_limit_counts_distinct_entries() {
        let config = AdminConfig {
            max_scopes: 2,
            ..Default::default()
        };
        validate_draft(&draft("api", &["a", "b", "a"]), &config).unwrap();
        assert_eq!(
            fields(validate_draft(&draft("api", &["a", "b", "c"]), &config)),
            vec!["scopes"]
        );
    }

    #[test]
    fn overlong_name_is_rejected() {
        let config = AdminConfig {
            max_field_length: 4,
            ..Default::default()
        };
        assert_eq!(fields(validate_draft(&draft("abcde", &[]), &config)), vec!["name"]);
    }

    #[test]
    fn email_needs_one_at_with_both_parts() {
        assert!(is_plausible_email("ops@example.com"));
        assert!(!is_plausible_email("@example.com"));
        assert!(!is_plausible_email("ops@"));
        assert!(!is_plausible_email("a@b@c"));
    }
}
