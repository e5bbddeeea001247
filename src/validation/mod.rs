pub mod comment;
pub mod profile;
pub mod text;
pub mod workspace;

use axum::{
    Json, async_trait,
    extract::FromRequest,
    http::Request,
};
use serde::de::DeserializeOwned;
use validator::{Validate, ValidationErrors};

use crate::{db::models::api::ErrorDetail, error::AppError};

/// JSON body that has passed its `Validate` rules.
pub struct ValidatedJson<T>(pub T);

#[async_trait]
impl<T, S> FromRequest<S, axum::body::Body> for ValidatedJson<T>
where
    T: DeserializeOwned + Validate,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request(
        req: Request<axum::body::Body>,
        state: &S,
    ) -> Result<Self, Self::Rejection> {
        let Json(value) = Json::<T>::from_request(req, state).await.map_err(|rejection| {
            tracing::debug!(error = %rejection, "Rejected request body");
            AppError::validation(format!("Invalid request body: {}", rejection.body_text()))
        })?;

        ensure_valid(&value)?;
        Ok(ValidatedJson(value))
    }
}

pub fn ensure_valid<T: Validate>(value: &T) -> Result<(), AppError> {
    value.validate().map_err(into_app_error)
}

/// Flattens field errors, sorted by field, with the first one as the headline.
pub fn into_app_error(errors: ValidationErrors) -> AppError {
    let mut details: Vec<ErrorDetail> = errors
        .field_errors()
        .into_iter()
        .flat_map(|(field, field_errors)| {
            field_errors.iter().map(move |error| ErrorDetail {
                field: Some(field.to_string()),
                code: error.code.to_string(),
                message: error
                    .message
                    .as_ref()
                    .map(|m| m.to_string())
                    .unwrap_or_else(|| format!("Invalid value for {}", field)),
            })
        })
        .collect();
    details.sort_by(|a, b| a.field.cmp(&b.field));

    let message = details
        .first()
        .map(|d| d.message.clone())
        .unwrap_or_else(|| "Validation failed".to_string());

    AppError::Validation { message, details }
}
