//! Daraja credentials and endpoints.

/// Test short code issued for the Daraja sandbox.
pub const SANDBOX_SHORT_CODE: &str = "174379";

/// Public passkey paired with [`SANDBOX_SHORT_CODE`].
pub const SANDBOX_PASSKEY: &str =
    "bfb279f9aa9bdbcf158e97dd71a467cd2e0c893059b10f78e6b72ada1ed2c919";

pub const SANDBOX_BASE_URL: &str = "https://sandbox.safaricom.co.ke";

/// Configuration for [`crate::DarajaClient`].
#[derive(Debug, Clone)]
pub struct MpesaConfig {
    pub consumer_key: String,
    pub consumer_secret: String,
    /// Paybill or till number receiving the payment.
    pub short_code: String,
    pub passkey: String,
    /// Public URL the gateway posts results to.
    pub callback_url: String,
    pub base_url: String,
    /// Upper bound for each outbound HTTP call.
    pub timeout_secs: u64,
}

impl MpesaConfig {
    /// Load from environment variables.
    ///
    /// | Env var                 | Default                            |
    /// |-------------------------|------------------------------------|
    /// | `MPESA_CONSUMER_KEY`    | empty                              |
    /// | `MPESA_CONSUMER_SECRET` | empty                              |
    /// | `MPESA_SHORT_CODE`      | `174379`                           |
    /// | `MPESA_PASSKEY`         | sandbox passkey                    |
    /// | `MPESA_CALLBACK_URL`    | empty                              |
    /// | `MPESA_BASE_URL`        | `https://sandbox.safaricom.co.ke`  |
    /// | `MPESA_TIMEOUT_SECS`    | `30`                               |
    pub fn from_env() -> Self {
        let var = |name: &str, default: &str| {
            std::env::var(name).unwrap_or_else(|_| default.to_string())
        };

        let timeout_secs: u64 = var("MPESA_TIMEOUT_SECS", "30")
            .parse()
            .expect("MPESA_TIMEOUT_SECS must be a valid u64");

        Self {
            consumer_key: var("MPESA_CONSUMER_KEY", ""),
            consumer_secret: var("MPESA_CONSUMER_SECRET", ""),
            short_code: var("MPESA_SHORT_CODE", SANDBOX_SHORT_CODE),
            passkey: var("MPESA_PASSKEY", SANDBOX_PASSKEY),
            callback_url: var("MPESA_CALLBACK_URL", ""),
            base_url: var("MPESA_BASE_URL", SANDBOX_BASE_URL)
                .trim_end_matches('/')
                .to_string(),
            timeout_secs,
        }
    }

    /// Whether consumer credentials were supplied at all.
    pub fn has_credentials(&self) -> bool {
        !self.consumer_key.is_empty() && !self.consumer_secret.is_empty()
    }
}
