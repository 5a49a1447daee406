//! Stripe payment intents.
//!
//! Calls `POST /v1/payment_intents` with a form-encoded body and the secret
//! key as a bearer token. No retries: a failed call fails the request.

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use tracing::{debug, warn};

use super::{ChargeIntent, PaymentError, PaymentGateway};

const STRIPE_API_URL: &str = "https://api.stripe.com";

#[derive(Deserialize)]
struct PaymentIntentResponse {
    id: String,
    client_secret: String,
}

#[derive(Deserialize)]
struct StripeErrorResponse {
    error: StripeErrorBody,
}

#[derive(Deserialize)]
struct StripeErrorBody {
    message: Option<String>,
}

/// [`PaymentGateway`] backed by the Stripe API.
#[derive(Clone)]
pub struct StripeGateway {
    client: Client,
    secret_key: String,
    base_url: String,
}

impl std::fmt::Debug for StripeGateway {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StripeGateway")
            .field("base_url", &self.base_url)
            .finish_non_exhaustive()
    }
}

impl StripeGateway {
    pub fn new(secret_key: impl Into<String>) -> Self {
        Self::with_base_url(secret_key, STRIPE_API_URL)
    }

    /// Point the gateway at another API host (e.g. a local mock).
    pub fn with_base_url(secret_key: impl Into<String>, base_url: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            secret_key: secret_key.into(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }
}

#[async_trait]
impl PaymentGateway for StripeGateway {
    async fn create_charge_intent(
        &self,
        amount_minor: i64,
        currency: &str,
    ) -> Result<ChargeIntent, PaymentError> {
        let amount = amount_minor.to_string();
        let resp = self
            .client
            .post(format!("{}/v1/payment_intents", self.base_url))
            .bearer_auth(&self.secret_key)
            .form(&[
                ("amount", amount.as_str()),
                ("currency", currency),
                ("payment_method_types[]", "card"),
            ])
            .send()
            .await?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            let message = serde_json::from_str::<StripeErrorResponse>(&body)
                .ok()
                .and_then(|e| e.error.message)
                .unwrap_or(body);
            warn!(status = status.as_u16(), %message, "payment intent rejected");
            return Err(PaymentError::Rejected {
                status: status.as_u16(),
                message,
            });
        }

        let intent: PaymentIntentResponse = resp.json().await?;
        debug!(intent_id = %intent.id, amount_minor, currency, "payment intent created");
        Ok(ChargeIntent {
            id: intent.id,
            client_secret: intent.client_secret,
        })
    }
}
