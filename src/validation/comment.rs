use std::borrow::Cow;
use validator::ValidationError;

pub const MAX_COMMENT_LENGTH: usize = 2000;

pub fn validate_comment_content(content: &str) -> Result<(), ValidationError> {
    if content.trim().is_empty() {
        return Err(ValidationError::new("required").with_message(Cow::from("Comment cannot be empty")));
    }

    if content.chars().count() > MAX_COMMENT_LENGTH {
        return Err(ValidationError::new("length")
            .with_message(Cow::from("Comment must be less than 2000 characters")));
    }

    Ok(())
}
