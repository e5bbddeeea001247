use std::borrow::Cow;
use validator::ValidationError;

pub const MIN_SLUG_LENGTH: usize = 3;
pub const MAX_SLUG_LENGTH: usize = 48;

/// Slugs that would shadow top-level product routes.
pub const RESERVED_SLUGS: &[&str] = &[
    "admin",
    "api",
    "www",
    "app",
    "dashboard",
    "help",
    "support",
    "feedback",
    "roadmap",
    "changelog",
];

pub fn is_reserved_slug(slug: &str) -> bool {
    RESERVED_SLUGS.contains(&slug)
}

/// Lowercases and drops every character outside `[a-z0-9-]`.
pub fn sanitize_slug(input: &str) -> String {
    input
        .to_lowercase()
        .chars()
        .filter(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || *c == '-')
        .collect()
}

fn invalid(code: &'static str, message: &'static str) -> ValidationError {
    ValidationError::new(code).with_message(Cow::from(message))
}

pub fn validate_workspace_name(name: &str) -> Result<(), ValidationError> {
    let length = name.trim().chars().count();
    if length < 2 {
        return Err(invalid("length", "Workspace name must be at least 2 characters"));
    }
    if length > 100 {
        return Err(invalid("length", "Workspace name must be less than 100 characters"));
    }
    Ok(())
}

pub fn validate_slug(slug: &str) -> Result<(), ValidationError> {
    if slug.len() < MIN_SLUG_LENGTH {
        return Err(invalid("length", "Slug must be at least 3 characters"));
    }
    if slug.len() > MAX_SLUG_LENGTH {
        return Err(invalid("length", "Slug must be less than 48 characters"));
    }
    if !slug
        .chars()
        .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-')
    {
        return Err(invalid(
            "format",
            "Slug can only contain lowercase letters, numbers, and hyphens",
        ));
    }
    if slug.starts_with('-') || slug.ends_with('-') {
        return Err(invalid("format", "Slug cannot start or end with a hyphen"));
    }
    if is_reserved_slug(slug) {
        return Err(invalid("reserved", "This slug is reserved"));
    }
    Ok(())
}

pub fn validate_website(website: &str) -> Result<(), ValidationError> {
    let trimmed = website.trim();
    if trimmed.is_empty() {
        return Ok(());
    }
    match url::Url::parse(trimmed) {
        Ok(parsed) if matches!(parsed.scheme(), "http" | "https") && parsed.host().is_some() => {
            Ok(())
        }
        _ => Err(invalid("url", "Please enter a valid URL")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_slug_validation() {
        assert!(validate_slug("acme").is_ok());
        assert!(validate_slug("acme-2").is_ok());
        assert!(validate_slug("ab").is_err());
        assert!(validate_slug("Acme").is_err());
        assert!(validate_slug("-acme").is_err());
        assert!(validate_slug("acme-").is_err());
        assert!(validate_slug("acme_co").is_err());
        assert!(validate_slug(&"a".repeat(49)).is_err());
    }

    #[test]
    fn reserved_slugs_are_rejected() {
        for slug in RESERVED_SLUGS {
            assert!(validate_slug(slug).is_err(), "{slug} should be reserved");
        }
    }

    #[test]
    fn test_sanitize_slug() {
        assert_eq!(sanitize_slug("My Company!"), "mycompany");
        assert_eq!(sanitize_slug("ACME-Labs_2"), "acme-labs2");
        assert_eq!(sanitize_slug("héllo"), "hllo");
    }

    #[test]
    fn test_workspace_name_validation() {
        assert!(validate_workspace_name("Acme").is_ok());
        assert!(validate_workspace_name(" A ").is_err());
        assert!(validate_workspace_name(&"n".repeat(101)).is_err());
    }

    #[test]
    fn test_website_validation() {
        assert!(validate_website("https://acme.example").is_ok());
        assert!(validate_website("http://acme.example/path").is_ok());
        assert!(validate_website("").is_ok());
        assert!(validate_website("acme.example").is_err());
        assert!(validate_website("ftp://acme.example").is_err());
    }
}
