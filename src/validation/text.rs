use std::borrow::Cow;
use validator::ValidationError;

/// Length rules are measured on the trimmed text, which is what gets stored.
fn trimmed_length(
    value: &str,
    min: usize,
    max: usize,
    message: &'static str,
) -> Result<(), ValidationError> {
    let length = value.trim().chars().count();
    if !(min..=max).contains(&length) {
        return Err(ValidationError::new("length").with_message(Cow::from(message)));
    }
    Ok(())
}

pub fn validate_title(title: &str) -> Result<(), ValidationError> {
    trimmed_length(title, 3, 200, "Title must be between 3 and 200 characters")
}

pub fn validate_feedback_description(description: &str) -> Result<(), ValidationError> {
    trimmed_length(
        description,
        10,
        5000,
        "Description must be between 10 and 5000 characters",
    )
}

pub fn validate_changelog_content(content: &str) -> Result<(), ValidationError> {
    trimmed_length(
        content,
        10,
        50_000,
        "Content must be between 10 and 50000 characters",
    )
}
