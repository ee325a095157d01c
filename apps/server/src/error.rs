use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;

use etfdash_core::errors::Error as CoreError;
use etfdash_market_data::MarketDataError;

#[derive(Error, Debug)]
pub enum ApiError {
    /// A core failure with the route-level summary shown to clients.
    #[error("{summary}: {source}")]
    Failed {
        summary: &'static str,
        #[source]
        source: CoreError,
    },
    #[error("{0}")]
    Core(#[from] CoreError),
    #[error("{0}")]
    BadRequest(String),
}

impl ApiError {
    /// Wrap a core error with a route-level summary.
    pub fn failed(summary: &'static str) -> impl FnOnce(CoreError) -> ApiError {
        move |source| ApiError::Failed { summary, source }
    }
}

impl From<MarketDataError> for ApiError {
    fn from(err: MarketDataError) -> Self {
        ApiError::Core(err.into())
    }
}

#[derive(Serialize)]
struct ErrorBody {
    success: bool,
    error: String,
    message: String,
}

fn core_status(err: &CoreError) -> StatusCode {
    match err {
        CoreError::InvalidInput(_)
        | CoreError::MarketData(MarketDataError::UnsupportedSymbol(_)) => StatusCode::BAD_REQUEST,
        _ => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, error, message) = match &self {
            ApiError::Failed { summary, source } => {
                (core_status(source), summary.to_string(), source.to_string())
            }
            ApiError::Core(e) => {
                let status = core_status(e);
                let error = if status == StatusCode::BAD_REQUEST {
                    "Invalid request"
                } else {
                    "Internal error"
                };
                (status, error.to_string(), e.to_string())
            }
            ApiError::BadRequest(reason) => (
                StatusCode::BAD_REQUEST,
                "Invalid request".to_string(),
                reason.clone(),
            ),
        };
        if status.is_server_error() {
            tracing::error!("{}: {}", error, message);
        }
        let body = Json(ErrorBody {
            success: false,
            error,
            message,
        });
        (status, body).into_response()
    }
}

pub type ApiResult<T> = Result<T, ApiError>;
