use axum::{
    response::{IntoResponse, Response},
    http::StatusCode,
};
use crate::errors::AppError;

// Errors are sent as plain-text bodies carrying the fixed message of each variant.
impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = match self {
            AppError::InvalidName | AppError::InvalidHours => StatusCode::BAD_REQUEST,
            AppError::UserNotFound(_) => StatusCode::NOT_FOUND,
        };

        (status, self.to_string()).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn body_text(response: Response) -> String {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
        String::from_utf8(bytes.to_vec()).unwrap()
    }

    #[tokio::test]
    async fn test_validation_errors_are_bad_requests() {
        let response = AppError::InvalidName.into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(body_text(response).await, "Name is required and must be a non-empty string");

        let response = AppError::InvalidHours.into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(body_text(response).await, "Invalid hoursToAdd value");
    }

    #[tokio::test]
    async fn test_not_found_hides_requested_id() {
        let response = AppError::UserNotFound("999".into()).into_response();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        assert_eq!(body_text(response).await, "User not found");
    }
}
