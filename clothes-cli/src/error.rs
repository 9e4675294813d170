use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use clothes_core::ProviderError;
use serde_json::json;

/// Failures surfaced to API clients as a status code and JSON body.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("location must be between 1 and {max} characters")]
    InvalidLocation { max: usize },

    #[error("Город с таким названием не найден!")]
    CityNotFound,

    #[error("Мы не нашли план для такой погоды!")]
    NoPlan { id: i32 },

    #[error(transparent)]
    Upstream(#[from] ProviderError),

    #[error("failed to read city list")]
    CityList(#[source] std::io::Error),
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::InvalidLocation { .. } => StatusCode::BAD_REQUEST,
            ApiError::CityNotFound | ApiError::NoPlan { .. } => StatusCode::NOT_FOUND,
            ApiError::Upstream(_) => StatusCode::BAD_GATEWAY,
            ApiError::CityList(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();

        let body = match &self {
            ApiError::NoPlan { id } => json!({
                "id": id,
                "status": status.as_u16(),
                "description": self.to_string(),
            }),
            ApiError::Upstream(err) => {
                tracing::error!(error = ?err, "weather lookup failed");
                json!({
                    "status": status.as_u16(),
                    "description": "Сервис погоды недоступен, попробуйте позже",
                })
            }
            ApiError::CityList(err) => {
                tracing::error!(error = %err, "failed to read city list");
                json!({
                    "status": status.as_u16(),
                    "description": "Internal server error",
                })
            }
            _ => json!({
                "status": status.as_u16(),
                "description": self.to_string(),
            }),
        };

        (status, Json(body)).into_response()
    }
}
