use thiserror::Error;

#[derive(Debug, Error)]
pub enum StripeApiError {
    #[error("No Stripe API key has been configured")]
    MissingApiKey,
    #[error("Could not initialize client: {0}")]
    Initialization(String),
    #[error("Stripe could not be reached: {0}")]
    RestResponseError(String),
    #[error("Request to Stripe timed out: {0}")]
    Timeout(String),
    #[error("Unexpected response body: {0}")]
    JsonError(String),
    #[error("Stripe rejected the request with status {status}. {message}")]
    QueryError { status: u16, message: String },
}

impl StripeApiError {
    /// True for failures where the request may not have reached Stripe at all.
    pub fn is_transient(&self) -> bool {
        matches!(self, Self::RestResponseError(_) | Self::Timeout(_))
    }
}
