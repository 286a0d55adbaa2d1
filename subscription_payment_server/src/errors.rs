use actix_web::{
    error::ResponseError,
    http::{header::ContentType, StatusCode},
    HttpResponse,
};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ServerError {
    #[error("Could not initialize server. {0}")]
    InitializeError(String),
    #[error("Invalid Signature")]
    InvalidSignature,
    #[error("Missing transaction")]
    MissingTransaction,
    #[error("Could not record the payment receipt. {0}")]
    ReceiptWriteFailure(String),
    #[error("An I/O error happened in the server. {0}")]
    IOError(#[from] std::io::Error),
    #[error("UnspecifiedError. {0}")]
    Unspecified(String),
}

impl ServerError {
    /// What the payment provider sees. Internal failure details stay in the logs.
    fn public_message(&self) -> &str {
        match self {
            Self::InvalidSignature => "Invalid Signature",
            Self::MissingTransaction => "Missing transaction",
            _ => "Internal Error",
        }
    }
}

impl ResponseError for ServerError {
    fn status_code(&self) -> StatusCode {
        match self {
            Self::InvalidSignature => StatusCode::FORBIDDEN,
            Self::MissingTransaction => StatusCode::BAD_REQUEST,
            Self::InitializeError(_) |
            Self::ReceiptWriteFailure(_) |
            Self::IOError(_) |
            Self::Unspecified(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        HttpResponse::build(self.status_code())
            .insert_header(ContentType::json())
            .body(serde_json::json!({ "message": self.public_message() }).to_string())
    }
}
