use actix_web::{error::JsonPayloadError, HttpRequest};

use crate::core::{AppError, FieldPath, ValidationErrors};

/// Error handler for `web::JsonConfig`
///
/// A body that is not valid JSON is reported through the same validation
/// shape as a rule violation, at path `body`.
pub fn json_error_handler(err: JsonPayloadError, req: &HttpRequest) -> actix_web::Error {
    tracing::warn!(
        method = %req.method(),
        path = %req.path(),
        error = %err,
        "Rejected request body"
    );

    let message = match &err {
        JsonPayloadError::ContentType => "Content type must be application/json".to_string(),
        JsonPayloadError::Overflow { limit }
        | JsonPayloadError::OverflowKnownLength { limit, .. } => {
            format!("Body exceeds {} bytes", limit)
        }
        JsonPayloadError::Deserialize(inner) => format!("Malformed JSON: {}", inner),
        other => format!("Unreadable body: {}", other),
    };

    AppError::Validation(ValidationErrors::single(
        FieldPath::root().field("body"),
        message,
    ))
    .into()
}

/// Fallback for unmatched routes, answering with the JSON error shape
pub async fn route_not_found(req: HttpRequest) -> Result<actix_web::HttpResponse, AppError> {
    Err(AppError::not_found(format!(
        "No route for {} {}",
        req.method(),
        req.path()
    )))
}
