use axum::Json;
use axum::response::IntoResponse;
use http::StatusCode;
use serde::Serialize;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("choice provider failed: {0:#}")]
    Provider(anyhow::Error),
    #[error("could not write json response: {0}")]
    Json(#[from] serde_json::Error),
}

impl Error {
    pub fn status(&self) -> StatusCode {
        match self {
            Self::Provider(_) | Self::Json(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

#[derive(Serialize)]
#[serde(tag = "object", rename = "error")]
struct Body {
    #[serde(with = "http_serde::status_code")]
    code: StatusCode,
    message: String,
}

impl IntoResponse for Error {
    fn into_response(self) -> axum::response::Response {
        let code = self.status();
        (
            code,
            Json(Body {
                code,
                message: self.to_string(),
            }),
        )
            .into_response()
    }
}
