//! Payment gateway abstraction used by the HTTP layer.

use async_trait::async_trait;
use serde::Serialize;

use crave_core::types::{DbId, Money};

use crate::client::DarajaClient;
use crate::error::MpesaError;

/// Identifiers returned when a push is accepted for delivery.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PushReceipt {
    pub merchant_request_id: String,
    /// Echoed back in the result callback; stored against the order.
    pub checkout_request_id: String,
}

/// Something that can prompt a customer's phone for payment.
#[async_trait]
pub trait PaymentGateway: Send + Sync {
    async fn request_payment(
        &self,
        phone: &str,
        amount: Money,
        order_id: DbId,
    ) -> Result<PushReceipt, MpesaError>;
}

#[async_trait]
impl PaymentGateway for DarajaClient {
    async fn request_payment(
        &self,
        phone: &str,
        amount: Money,
        order_id: DbId,
    ) -> Result<PushReceipt, MpesaError> {
        self.stk_push(phone, amount, order_id).await
    }
}
