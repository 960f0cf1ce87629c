use thiserror::Error;

use crate::traits::{PaymentSession, PaymentSessionRequest};

/// An external payment processor that hosts the payment page.
///
/// Implementations make a single bounded call per session and never retry. Retry policy belongs to the caller.
#[allow(async_fn_in_trait)]
pub trait PaymentProcessor {
    async fn create_checkout_session(
        &self,
        request: PaymentSessionRequest,
    ) -> Result<PaymentSession, PaymentProcessorError>;
}

#[derive(Debug, Clone, Error)]
pub enum PaymentProcessorError {
    #[error("Could not reach the payment processor: {0}")]
    Unavailable(String),
    #[error("The payment processor rejected the request. Status {status}. {message}")]
    Rejected { status: u16, message: String },
    #[error("Unexpected response from the payment processor: {0}")]
    InvalidResponse(String),
}
