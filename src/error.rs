use axum::{
    response::{IntoResponse, Response},
    http::StatusCode,
};
use serde_json::json;
use axum::Json;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("Entrada inválida: {0}")]
    InvalidInput(String),
    #[error("Arquivo maior que o limite permitido.")]
    PayloadTooLarge,
    #[error("Usuário e senha são obrigatórios.")]
    MissingCredentials,
    #[error("Usuário ou senha incorretos.")]
    InvalidCredentials,
    #[error("Não foi possível ler a planilha: {0}")]
    Load(String),
    #[error("Falha ao gerar a planilha: {0}")]
    Export(String),
    #[error("Ocorreu um erro: {0}")]
    Unexpected(String),
}

impl From<calamine::Error> for AppError {
    fn from(err: calamine::Error) -> Self {
        AppError::Load(err.to_string())
    }
}

impl From<rust_xlsxwriter::XlsxError> for AppError {
    fn from(err: rust_xlsxwriter::XlsxError) -> Self {
        AppError::Export(err.to_string())
    }
}

impl From<axum::extract::multipart::MultipartError> for AppError {
    fn from(err: axum::extract::multipart::MultipartError) -> Self {
        if err.status() == StatusCode::PAYLOAD_TOO_LARGE {
            AppError::PayloadTooLarge
        } else {
            AppError::InvalidInput(err.body_text())
        }
    }
}

impl From<tokio::task::JoinError> for AppError {
    fn from(err: tokio::task::JoinError) -> Self {
        AppError::Unexpected(err.to_string())
    }
}

impl AppError {
    pub fn status(&self) -> StatusCode {
        match self {
            AppError::InvalidInput(_) => StatusCode::BAD_REQUEST,
            AppError::PayloadTooLarge => StatusCode::PAYLOAD_TOO_LARGE,
            AppError::MissingCredentials | AppError::InvalidCredentials => StatusCode::UNAUTHORIZED,
            AppError::Load(_) => StatusCode::UNPROCESSABLE_ENTITY,
            AppError::Export(_) | AppError::Unexpected(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            tracing::error!("Request failed: {}", self);
        }

        let body = Json(json!({
            "error": self.to_string()
        }));

        (status, body).into_response()
    }
}
