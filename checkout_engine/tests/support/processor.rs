use std::sync::{Arc, Mutex};

use checkout_engine::traits::{PaymentProcessor, PaymentProcessorError, PaymentSession, PaymentSessionRequest};

/// A payment processor that hands out predictable sessions and remembers every request it was given.
#[derive(Debug, Clone, Default)]
pub struct FakeProcessor {
    requests: Arc<Mutex<Vec<PaymentSessionRequest>>>,
    offline: bool,
}

impl FakeProcessor {
    pub fn offline() -> Self {
        Self { offline: true, ..Default::default() }
    }

    pub fn requests(&self) -> Vec<PaymentSessionRequest> {
        self.requests.lock().unwrap().clone()
    }
}

impl PaymentProcessor for FakeProcessor {
    async fn create_checkout_session(
        &self,
        request: PaymentSessionRequest,
    ) -> Result<PaymentSession, PaymentProcessorError> {
        self.requests.lock().unwrap().push(request.clone());
        if self.offline {
            return Err(PaymentProcessorError::Unavailable("connection refused".into()));
        }
        let id = format!("cs_test_{}", request.order_id);
        let url = format!("https://pay.example.com/c/{id}");
        Ok(PaymentSession { id, url })
    }
}
