use std::borrow::Cow;
use validator::ValidationError;

pub fn validate_full_name(name: &str) -> Result<(), ValidationError> {
    let length = name.trim().chars().count();
    if !(2..=100).contains(&length) {
        return Err(ValidationError::new("length")
            .with_message(Cow::from("Name must be between 2 and 100 characters")));
    }
    Ok(())
}
