//! HTTP client for the Daraja OAuth and STK push endpoints.

use std::time::Duration;

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use chrono::{DateTime, Utc};
use rust_decimal::prelude::ToPrimitive;
use serde::{Deserialize, Serialize};

use crave_core::phone::normalize_msisdn;
use crave_core::types::{DbId, Money};

use crate::config::MpesaConfig;
use crate::error::MpesaError;
use crate::gateway::PushReceipt;

const TRANSACTION_TYPE: &str = "CustomerPayBillOnline";
const TRANSACTION_DESC: &str = "Payment for Cake";

/// Daraja expects timestamps in East Africa Time (UTC+3).
const EAT_OFFSET_HOURS: i64 = 3;

/// Body of `POST /mpesa/stkpush/v1/processrequest`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct StkPushRequest {
    pub business_short_code: String,
    pub password: String,
    pub timestamp: String,
    pub transaction_type: String,
    pub amount: i64,
    pub party_a: String,
    pub party_b: String,
    pub phone_number: String,
    #[serde(rename = "CallBackURL")]
    pub callback_url: String,
    pub account_reference: String,
    pub transaction_desc: String,
}

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct StkPushResponse {
    #[serde(rename = "MerchantRequestID")]
    merchant_request_id: String,
    #[serde(rename = "CheckoutRequestID")]
    checkout_request_id: String,
    response_code: String,
    #[serde(default)]
    response_description: String,
    #[serde(default)]
    customer_message: String,
}

/// Client for a single Daraja environment (sandbox or production).
pub struct DarajaClient {
    client: reqwest::Client,
    config: MpesaConfig,
}

impl DarajaClient {
    /// Build a client whose requests time out after `config.timeout_secs`.
    pub fn new(config: MpesaConfig) -> Result<Self, MpesaError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;
        Ok(Self { client, config })
    }

    pub fn config(&self) -> &MpesaConfig {
        &self.config
    }

    /// Exchange the consumer key and secret for a bearer token.
    ///
    /// Sends `GET /oauth/v1/generate?grant_type=client_credentials` with
    /// HTTP basic auth.
    pub async fn access_token(&self) -> Result<String, MpesaError> {
        let response = self
            .client
            .get(format!(
                "{}/oauth/v1/generate?grant_type=client_credentials",
                self.config.base_url
            ))
            .basic_auth(&self.config.consumer_key, Some(&self.config.consumer_secret))
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "<unreadable body>".to_string());
            return Err(MpesaError::Auth {
                status: status.as_u16(),
                body,
            });
        }

        let token: TokenResponse = response
            .json()
            .await
            .map_err(|e| MpesaError::MalformedResponse(e.to_string()))?;
        if token.access_token.is_empty() {
            return Err(MpesaError::MalformedResponse(
                "empty access_token".to_string(),
            ));
        }
        Ok(token.access_token)
    }

    /// Ask the gateway to prompt `phone` for `amount` against `order_id`.
    ///
    /// The phone is normalized to international form and the amount is
    /// truncated to whole shillings before submission.
    pub async fn stk_push(
        &self,
        phone: &str,
        amount: Money,
        order_id: DbId,
    ) -> Result<PushReceipt, MpesaError> {
        let token = self.access_token().await?;
        let payload = build_push_request(&self.config, phone, amount, order_id, Utc::now())?;

        let response = self
            .client
            .post(format!(
                "{}/mpesa/stkpush/v1/processrequest",
                self.config.base_url
            ))
            .bearer_auth(token)
            .json(&payload)
            .send()
            .await?;

        let status = response.status();
        let body = response
            .text()
            .await
            .unwrap_or_else(|_| "<unreadable body>".to_string());
        if !status.is_success() {
            return Err(MpesaError::Gateway {
                status: status.as_u16(),
                body,
            });
        }

        let parsed: StkPushResponse = serde_json::from_str(&body)
            .map_err(|e| MpesaError::MalformedResponse(format!("{e}: {body}")))?;
        if parsed.response_code != "0" {
            return Err(MpesaError::Gateway {
                status: status.as_u16(),
                body: parsed.response_description,
            });
        }

        tracing::info!(
            order_id,
            checkout_request_id = %parsed.checkout_request_id,
            customer_message = %parsed.customer_message,
            "STK push accepted",
        );

        Ok(PushReceipt {
            merchant_request_id: parsed.merchant_request_id,
            checkout_request_id: parsed.checkout_request_id,
        })
    }
}

// ---------------------------------------------------------------------------
// Request construction
// ---------------------------------------------------------------------------

/// `YYYYMMDDHHMMSS` in East Africa Time.
pub fn timestamp(now: DateTime<Utc>) -> String {
    (now + chrono::Duration::hours(EAT_OFFSET_HOURS))
        .format("%Y%m%d%H%M%S")
        .to_string()
}

/// base64(short_code ‖ passkey ‖ timestamp).
pub fn password(short_code: &str, passkey: &str, timestamp: &str) -> String {
    STANDARD.encode(format!("{short_code}{passkey}{timestamp}"))
}

/// Whole shillings, truncated. Zero or negative amounts are refused.
pub fn whole_amount(amount: Money) -> Result<i64, MpesaError> {
    match amount.trunc().to_i64() {
        Some(whole) if whole > 0 => Ok(whole),
        _ => Err(MpesaError::InvalidAmount(amount)),
    }
}

/// Assemble the STK push payload for one order.
pub fn build_push_request(
    config: &MpesaConfig,
    phone: &str,
    amount: Money,
    order_id: DbId,
    now: DateTime<Utc>,
) -> Result<StkPushRequest, MpesaError> {
    let phone = normalize_msisdn(phone);
    let timestamp = timestamp(now);

    Ok(StkPushRequest {
        business_short_code: config.short_code.clone(),
        password: password(&config.short_code, &config.passkey, &timestamp),
        timestamp,
        transaction_type: TRANSACTION_TYPE.to_string(),
        amount: whole_amount(amount)?,
        party_a: phone.clone(),
        party_b: config.short_code.clone(),
        phone_number: phone,
        callback_url: config.callback_url.clone(),
        account_reference: format!("Order-{order_id}"),
        transaction_desc: TRANSACTION_DESC.to_string(),
    })
}
