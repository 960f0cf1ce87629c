//! Hosted checkout through Stripe Checkout Sessions.
use checkout_engine::traits::{PaymentProcessor, PaymentProcessorError, PaymentSession, PaymentSessionRequest};
use log::*;
use stripe_tools::{NewCheckoutSession, StripeApi, StripeApiError, StripeConfig};

/// The session metadata key that carries the order id back to us in the payment confirmation.
pub const ORDER_ID_METADATA_KEY: &str = "orderId";

#[derive(Clone)]
pub struct StripePaymentProcessor {
    api: StripeApi,
}

impl StripePaymentProcessor {
    pub fn new(config: StripeConfig) -> Result<Self, StripeApiError> {
        let api = StripeApi::new(config)?;
        Ok(Self { api })
    }
}

impl PaymentProcessor for StripePaymentProcessor {
    async fn create_checkout_session(
        &self,
        request: PaymentSessionRequest,
    ) -> Result<PaymentSession, PaymentProcessorError> {
        let session = new_checkout_session(&request);
        let result = self.api.create_checkout_session(&session).await.map_err(|e| {
            warn!("💳️ Stripe could not create a checkout session for order {}. {e}", request.order_id);
            processor_error(e)
        })?;
        let url = result.url.ok_or_else(|| {
            PaymentProcessorError::InvalidResponse(format!("Checkout session {} has no payment page URL", result.id))
        })?;
        debug!("💳️ Checkout session {} created for order {}", result.id, request.order_id);
        Ok(PaymentSession { id: result.id, url })
    }
}

pub fn new_checkout_session(request: &PaymentSessionRequest) -> NewCheckoutSession {
    request
        .line_items
        .iter()
        .fold(NewCheckoutSession::new(&request.currency, &request.success_url, &request.cancel_url), |s, item| {
            s.with_line_item(&item.name, item.unit_amount, item.quantity)
        })
        .with_metadata(ORDER_ID_METADATA_KEY, request.order_id.as_str())
}

fn processor_error(e: StripeApiError) -> PaymentProcessorError {
    match e {
        StripeApiError::QueryError { status, message } => PaymentProcessorError::Rejected { status, message },
        StripeApiError::JsonError(s) => PaymentProcessorError::InvalidResponse(s),
        e if e.is_transient() => PaymentProcessorError::Unavailable(e.to_string()),
        e => PaymentProcessorError::Unavailable(format!("The Stripe client is misconfigured. {e}")),
    }
}
