use reqwest::Client;
use tracing::{debug, error};

use shared_config::AppConfig;

use crate::models::{PaymentError, PaymentIntent};

/// Thin wrapper over the payment gateway's REST API. The gateway is an
/// opaque collaborator; nothing here touches local state.
pub struct StripeClient {
    client: Client,
    base_url: String,
    secret_key: String,
}

impl StripeClient {
    pub fn new(config: &AppConfig) -> Self {
        Self {
            client: Client::new(),
            base_url: config.stripe_base_url.clone(),
            secret_key: config.stripe_secret_key.clone(),
        }
    }

    /// Create a card payment intent for `amount_cents` and return the wire
    /// object carrying the client-side confirmation secret.
    pub async fn create_payment_intent(&self, amount_cents: i64) -> Result<PaymentIntent, PaymentError> {
        debug!("Creating payment intent for {} cents", amount_cents);

        let params = [
            ("amount", amount_cents.to_string()),
            ("currency", "usd".to_string()),
            ("payment_method_types[]", "card".to_string()),
        ];

        let response = self
            .client
            .post(format!("{}/v1/payment_intents", self.base_url))
            .bearer_auth(&self.secret_key)
            .form(&params)
            .send()
            .await
            .map_err(|e| PaymentError::Gateway(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            error!("Payment gateway error ({}): {}", status, body);
            return Err(PaymentError::Gateway(format!("{}: {}", status, body)));
        }

        response
            .json::<PaymentIntent>()
            .await
            .map_err(|e| PaymentError::Gateway(e.to_string()))
    }
}
