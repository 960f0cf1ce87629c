use actix_web::{
    error::ResponseError,
    http::{header::ContentType, StatusCode},
    HttpResponse,
};
use checkout_engine::{
    traits::{CatalogError, LedgerError},
    AccessError,
    CheckoutError,
};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ServerError {
    #[error("Could not initialize server. {0}")]
    InitializeError(String),
    #[error("An error occurred on the backend of the server. {0}")]
    BackendError(String),
    #[error("An I/O error happened in the server. {0}")]
    IOError(#[from] std::io::Error),
    #[error("Invalid server configuration. {0}")]
    ConfigurationError(String),
    #[error("UnspecifiedError. {0}")]
    Unspecified(String),
    /// The storefront sent a cart that cannot be checked out. The message is returned verbatim.
    #[error("{0}")]
    InvalidCart(String),
    #[error("Authentication required. {0}")]
    Unauthenticated(String),
    #[error("Insufficient Permissions. {0}")]
    InsufficientPermissions(String),
    #[error("The data was not found. {0}")]
    NoRecordFound(String),
    #[error("Could not start the payment. {0}")]
    PaymentSessionError(String),
}

impl ResponseError for ServerError {
    fn status_code(&self) -> StatusCode {
        match self {
            Self::InvalidCart(_) => StatusCode::BAD_REQUEST,
            Self::Unauthenticated(_) => StatusCode::UNAUTHORIZED,
            Self::InsufficientPermissions(_) => StatusCode::FORBIDDEN,
            Self::NoRecordFound(_) => StatusCode::NOT_FOUND,
            Self::InitializeError(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::BackendError(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::IOError(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::ConfigurationError(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::Unspecified(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::PaymentSessionError(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        match self {
            // The storefront shows this message to the buyer as-is
            Self::InvalidCart(msg) => {
                HttpResponse::build(self.status_code()).insert_header(ContentType::plaintext()).body(msg.clone())
            },
            _ => HttpResponse::build(self.status_code())
                .insert_header(ContentType::json())
                .body(serde_json::json!({ "error": self.to_string() }).to_string()),
        }
    }
}

impl From<CheckoutError> for ServerError {
    fn from(e: CheckoutError) -> Self {
        match e {
            CheckoutError::Validation(e) => Self::InvalidCart(e.to_string()),
            CheckoutError::Catalog(e) => Self::from(e),
            CheckoutError::Ledger(e) => Self::from(e),
            CheckoutError::PaymentSession { .. } => Self::PaymentSessionError(e.to_string()),
        }
    }
}

impl From<AccessError> for ServerError {
    fn from(e: AccessError) -> Self {
        match e {
            AccessError::StoreNotFound(_) => Self::NoRecordFound(e.to_string()),
            AccessError::Unauthorized { .. } => Self::InsufficientPermissions(e.to_string()),
            AccessError::Catalog(e) => Self::from(e),
        }
    }
}

impl From<CatalogError> for ServerError {
    fn from(e: CatalogError) -> Self {
        Self::BackendError(e.to_string())
    }
}

impl From<LedgerError> for ServerError {
    fn from(e: LedgerError) -> Self {
        match e {
            LedgerError::OrderNotFound(_) => Self::NoRecordFound(e.to_string()),
            _ => Self::BackendError(e.to_string()),
        }
    }
}
