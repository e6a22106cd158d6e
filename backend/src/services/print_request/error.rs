use crate::shopify::OrderError;
use actix_multipart::MultipartError;
use actix_web::http::StatusCode;
use actix_web::{HttpResponse, ResponseError};
use thiserror::Error;

/// Everything that can end a `POST /print-request` early.
///
/// Client mistakes carry the exact text sent back in the response body.
/// Server-side failures all answer with a bare 500 and are logged instead.
#[derive(Error, Debug)]
pub enum PrintRequestError {
    #[error("No file part")]
    NoFilePart,

    #[error("No selected file")]
    NoSelectedFile,

    #[error("Invalid file type")]
    InvalidFileType,

    #[error("Invalid multipart data")]
    Multipart(#[source] MultipartError),

    #[error("File too large")]
    FileTooLarge,

    #[error("Form field too large")]
    FieldTooLarge,

    #[error(transparent)]
    Order(#[from] OrderError),

    #[error("Failed to store upload: {0}")]
    Storage(#[from] std::io::Error),
}

impl ResponseError for PrintRequestError {
    fn status_code(&self) -> StatusCode {
        match self {
            PrintRequestError::NoFilePart
            | PrintRequestError::NoSelectedFile
            | PrintRequestError::InvalidFileType
            | PrintRequestError::Multipart(_) => StatusCode::BAD_REQUEST,
            PrintRequestError::FileTooLarge | PrintRequestError::FieldTooLarge => {
                StatusCode::PAYLOAD_TOO_LARGE
            }
            PrintRequestError::Order(_) | PrintRequestError::Storage(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    fn error_response(&self) -> HttpResponse {
        let status = self.status_code();
        let body = if status.is_server_error() {
            "Internal Server Error".to_string()
        } else {
            self.to_string()
        };

        HttpResponse::build(status)
            .content_type("text/plain; charset=utf-8")
            .body(body)
    }
}
