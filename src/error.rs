// region:    --- Imports
use crate::auction::forms::FieldErrors;
use crate::store::StoreError;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Redirect, Response};
use axum::Json;
use thiserror::Error;
use tracing::{error, info, warn};

// endregion: --- Imports

// region:    --- App Error
/// 요청 처리 중 발생하는 오류
#[derive(Debug, Error)]
pub enum AppError {
    #[error("{0}")]
    NotFound(String),

    #[error("{0}")]
    MethodNotAllowed(String),

    #[error("입력값이 올바르지 않습니다: {0}")]
    ValidationFailed(FieldErrors),

    #[error("{0}")]
    AuthorizationDenied(String),

    #[error("{0}")]
    BusinessRule(String),

    #[error("{0}")]
    Conflict(String),

    /// 로그인이 필요한 요청. 로그인 페이지로 보낸다.
    #[error("로그인이 필요합니다")]
    LoginRequired { next: String },

    #[error("데이터베이스 오류: {0}")]
    Database(#[from] sqlx::Error),

    #[error("내부 오류: {0}")]
    Internal(String),
}

pub type Result<T> = std::result::Result<T, AppError>;

impl AppError {
    pub fn status(&self) -> StatusCode {
        match self {
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::MethodNotAllowed(_) => StatusCode::METHOD_NOT_ALLOWED,
            AppError::ValidationFailed(_) => StatusCode::UNPROCESSABLE_ENTITY,
            AppError::AuthorizationDenied(_) => StatusCode::FORBIDDEN,
            AppError::BusinessRule(_) => StatusCode::BAD_REQUEST,
            AppError::Conflict(_) => StatusCode::CONFLICT,
            AppError::LoginRequired { .. } => StatusCode::SEE_OTHER,
            AppError::Database(_) | AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        let message = match &self {
            AppError::LoginRequired { next } => {
                info!("{:<12} --> 로그인 필요: {}", "Error", next);
                let next: String = url::form_urlencoded::byte_serialize(next.as_bytes()).collect();
                let location = format!("/login?next={}", next);
                return Redirect::to(&location).into_response();
            }
            AppError::ValidationFailed(errors) => {
                warn!("{:<12} --> 입력값 검증 실패: {:?}", "Error", errors);
                return (
                    status,
                    Json(serde_json::json!({
                        "code": status.as_u16(),
                        "message": "입력값이 올바르지 않습니다.",
                        "errors": errors,
                    })),
                )
                    .into_response();
            }
            AppError::Database(e) => {
                error!("{:<12} --> 데이터베이스 오류: {:?}", "Error", e);
                "데이터베이스 처리에 실패했습니다.".to_string()
            }
            AppError::Internal(e) => {
                error!("{:<12} --> 내부 오류: {}", "Error", e);
                "서버 내부 오류가 발생했습니다.".to_string()
            }
            other => {
                info!("{:<12} --> {} {}", "Error", status.as_u16(), other);
                other.to_string()
            }
        };

        (
            status,
            Json(serde_json::json!({
                "code": status.as_u16(),
                "message": message,
            })),
        )
            .into_response()
    }
}

impl From<StoreError> for AppError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::Duplicate(what) => AppError::Conflict(what),
            StoreError::NotFound(what) => AppError::NotFound(what),
            StoreError::Database(e) => AppError::Database(e),
        }
    }
}
// endregion: --- App Error

// region:    --- Tests
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn login_required_redirects_to_login_page() {
        let response = AppError::LoginRequired {
            next: "/listing/3/bid".to_string(),
        }
        .into_response();

        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        let location = response.headers()["location"].to_str().unwrap();
        assert_eq!(location, "/login?next=%2Flisting%2F3%2Fbid");
    }

    #[test]
    fn error_pages_carry_status() {
        assert_eq!(
            AppError::NotFound("경매가 존재하지 않습니다.".into()).into_response().status(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            AppError::MethodNotAllowed("GET 메서드는 허용되지 않습니다.".into())
                .into_response()
                .status(),
            StatusCode::METHOD_NOT_ALLOWED
        );
        assert_eq!(
            AppError::from(StoreError::Duplicate("중복".into())).status(),
            StatusCode::CONFLICT
        );
    }
}
// endregion: --- Tests
