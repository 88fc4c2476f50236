//! Result callback posted by Daraja after the customer answers a push.
//!
//! ```json
//! {"Body": {"stkCallback": {
//!     "MerchantRequestID": "29115-34620561-1",
//!     "CheckoutRequestID": "ws_CO_191220191020363925",
//!     "ResultCode": 0,
//!     "ResultDesc": "The service request is processed successfully.",
//!     "CallbackMetadata": {"Item": [
//!         {"Name": "Amount", "Value": 1.00},
//!         {"Name": "MpesaReceiptNumber", "Value": "NLJ7RT61SV"},
//!         {"Name": "PhoneNumber", "Value": 254708374149}
//!     ]}
//! }}}
//! ```

use std::str::FromStr;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crave_core::phone::normalize_msisdn;
use crave_core::types::Money;

/// Acknowledgement returned to the gateway whatever the outcome.
#[derive(Debug, Clone, Serialize)]
pub struct CallbackAck {
    #[serde(rename = "ResultCode")]
    pub result_code: i32,
    #[serde(rename = "ResultDesc")]
    pub result_desc: &'static str,
}

impl CallbackAck {
    pub const fn accepted() -> Self {
        Self {
            result_code: 0,
            result_desc: "Accepted",
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct CallbackEnvelope {
    #[serde(rename = "Body")]
    pub body: CallbackBody,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CallbackBody {
    #[serde(rename = "stkCallback")]
    pub stk_callback: StkCallback,
}

#[derive(Debug, Clone, Deserialize)]
pub struct StkCallback {
    #[serde(rename = "MerchantRequestID", default)]
    pub merchant_request_id: String,
    #[serde(rename = "CheckoutRequestID", default)]
    pub checkout_request_id: String,
    #[serde(rename = "ResultCode")]
    pub result_code: i64,
    #[serde(rename = "ResultDesc", default)]
    pub result_desc: String,
    #[serde(rename = "CallbackMetadata")]
    pub callback_metadata: Option<CallbackMetadata>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct CallbackMetadata {
    #[serde(rename = "Item", default)]
    pub items: Vec<MetadataItem>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct MetadataItem {
    #[serde(rename = "Name")]
    pub name: String,
    #[serde(rename = "Value", default)]
    pub value: Option<Value>,
}

/// A successful payment as reported by the gateway.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PaymentConfirmation {
    pub checkout_request_id: Option<String>,
    /// Payer's number as a plain digit string.
    pub phone: Option<String>,
    pub receipt: Option<String>,
    pub amount: Option<Money>,
}

/// What a callback means for the order book.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CallbackOutcome {
    Paid(PaymentConfirmation),
    /// Cancelled, timed out, or otherwise failed. No order is touched.
    Rejected {
        checkout_request_id: Option<String>,
        code: i64,
        description: String,
    },
}

impl CallbackEnvelope {
    pub fn parse(bytes: &[u8]) -> Result<Self, serde_json::Error> {
        serde_json::from_slice(bytes)
    }

    pub fn interpret(&self) -> CallbackOutcome {
        let callback = &self.body.stk_callback;
        let checkout_request_id = Some(callback.checkout_request_id.trim())
            .filter(|id| !id.is_empty())
            .map(str::to_string);

        if callback.result_code != 0 {
            return CallbackOutcome::Rejected {
                checkout_request_id,
                code: callback.result_code,
                description: callback.result_desc.clone(),
            };
        }

        let metadata = callback.callback_metadata.clone().unwrap_or_default();
        let text = |name: &str| metadata.value_text(name);

        CallbackOutcome::Paid(PaymentConfirmation {
            checkout_request_id,
            phone: text("PhoneNumber").map(|p| normalize_msisdn(&p)),
            receipt: text("MpesaReceiptNumber"),
            amount: text("Amount").and_then(|a| Money::from_str(&a).ok()),
        })
    }
}

impl CallbackMetadata {
    /// The named item's value rendered as text, `None` when absent or null.
    pub fn value_text(&self, name: &str) -> Option<String> {
        self.items
            .iter()
            .find(|item| item.name == name)
            .and_then(|item| item.value.as_ref())
            .and_then(value_to_text)
            .filter(|text| !text.is_empty())
    }
}

/// Render a JSON scalar as text. Integral floats lose their fraction so
/// that `254712345678.0` becomes `254712345678`.
fn value_to_text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.trim().to_string()),
        Value::Number(n) => {
            if let Some(u) = n.as_u64() {
                Some(u.to_string())
            } else if let Some(i) = n.as_i64() {
                Some(i.to_string())
            } else {
                n.as_f64().map(|f| {
                    if f.fract() == 0.0 {
                        format!("{f:.0}")
                    } else {
                        f.to_string()
                    }
                })
            }
        }
        _ => None,
    }
}
