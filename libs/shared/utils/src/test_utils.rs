use std::sync::Arc;

use base64::{engine::general_purpose, Engine as _};
use chrono::{Duration, Utc};
use hmac::{Hmac, Mac};
use serde_json::json;
use sha2::Sha256;
use uuid::Uuid;

use shared_config::AppConfig;

pub struct TestConfig {
    pub jwt_secret: String,
    pub supabase_url: String,
    pub supabase_service_key: String,
    pub stripe_base_url: String,
}

impl Default for TestConfig {
    fn default() -> Self {
        Self {
            jwt_secret: "test-secret-key-for-jwt-validation-must-be-long-enough".to_string(),
            supabase_url: "http://localhost:54321".to_string(),
            supabase_service_key: "test-service-key".to_string(),
            stripe_base_url: "http://localhost:12111".to_string(),
        }
    }
}

impl TestConfig {
    pub fn to_app_config(&self) -> AppConfig {
        AppConfig {
            supabase_url: self.supabase_url.clone(),
            supabase_service_key: self.supabase_service_key.clone(),
            jwt_secret: self.jwt_secret.clone(),
            stripe_secret_key: "sk_test_123".to_string(),
            stripe_base_url: self.stripe_base_url.clone(),
            port: 5000,
        }
    }

    pub fn to_arc(&self) -> Arc<AppConfig> {
        Arc::new(self.to_app_config())
    }

    /// Config whose storage side points at a wiremock server.
    pub fn with_storage_url(url: &str) -> AppConfig {
        let mut config = TestConfig::default().to_app_config();
        config.supabase_url = url.to_string();
        config
    }

    /// Config whose storage and payment-gateway sides both point at mocks.
    pub fn with_mock_urls(storage_url: &str, stripe_url: &str) -> AppConfig {
        let mut config = TestConfig::default().to_app_config();
        config.supabase_url = storage_url.to_string();
        config.stripe_base_url = stripe_url.to_string();
        config
    }
}

pub struct TestUser {
    pub email: String,
    pub role: String,
}

impl Default for TestUser {
    fn default() -> Self {
        Self {
            email: "test@example.com".to_string(),
            role: "user".to_string(),
        }
    }
}

impl TestUser {
    pub fn new(email: &str, role: &str) -> Self {
        Self {
            email: email.to_string(),
            role: role.to_string(),
        }
    }

    pub fn user(email: &str) -> Self {
        Self::new(email, "user")
    }

    pub fn admin(email: &str) -> Self {
        Self::new(email, "admin")
    }
}

pub struct JwtTestUtils;

impl JwtTestUtils {
    pub fn create_test_token(user: &TestUser, secret: &str, exp_hours: Option<i64>) -> String {
        let now = Utc::now();
        let exp = now + Duration::hours(exp_hours.unwrap_or(10));

        let header = json!({
            "alg": "HS256",
            "typ": "JWT"
        });

        let payload = json!({
            "email": user.email,
            "iat": now.timestamp(),
            "exp": exp.timestamp()
        });

        let header_encoded = general_purpose::URL_SAFE_NO_PAD.encode(header.to_string());
        let payload_encoded = general_purpose::URL_SAFE_NO_PAD.encode(payload.to_string());

        let signing_input = format!("{}.{}", header_encoded, payload_encoded);

        let mut mac = Hmac::<Sha256>::new_from_slice(secret.as_bytes())
            .expect("HMAC can take key of any size");
        mac.update(signing_input.as_bytes());
        let signature = mac.finalize().into_bytes();
        let signature_encoded = general_purpose::URL_SAFE_NO_PAD.encode(signature);

        format!("{}.{}", signing_input, signature_encoded)
    }

    pub fn create_expired_token(user: &TestUser, secret: &str) -> String {
        Self::create_test_token(user, secret, Some(-1))
    }

    pub fn create_invalid_signature_token(user: &TestUser) -> String {
        Self::create_test_token(user, "wrong-secret", Some(10))
    }

    pub fn create_malformed_token() -> String {
        "invalid.token.format".to_string()
    }
}

/// Canned PostgREST / Stripe bodies for wiremock-backed tests.
pub struct MockPortalResponses;

impl MockPortalResponses {
    pub fn appointment_option(id: i64, name: &str, price: i64, slots: &[&str]) -> serde_json::Value {
        json!({
            "id": id,
            "name": name,
            "price": price,
            "slots": slots
        })
    }

    pub fn booking(email: &str, treatment: &str, date: &str, slot: &str) -> serde_json::Value {
        json!({
            "id": Uuid::new_v4(),
            "email": email,
            "treatment": treatment,
            "appointment_date": date,
            "slot": slot,
            "paid": false,
            "transaction_id": null
        })
    }

    pub fn paid_booking(
        id: Uuid,
        email: &str,
        treatment: &str,
        date: &str,
        slot: &str,
        transaction_id: &str,
    ) -> serde_json::Value {
        json!({
            "id": id,
            "email": email,
            "treatment": treatment,
            "appointment_date": date,
            "slot": slot,
            "paid": true,
            "transaction_id": transaction_id
        })
    }

    pub fn user_record(email: &str, role: &str) -> serde_json::Value {
        json!({
            "id": Uuid::new_v4(),
            "email": email,
            "name": "Test User",
            "role": role
        })
    }

    pub fn payment_intent(client_secret: &str) -> serde_json::Value {
        json!({
            "id": "pi_test_1",
            "client_secret": client_secret,
            "status": "requires_payment_method"
        })
    }

    pub fn unique_violation() -> serde_json::Value {
        json!({
            "code": "23505",
            "message": "duplicate key value violates unique constraint"
        })
    }

    pub fn error_response(message: &str, code: &str) -> serde_json::Value {
        json!({
            "error": {
                "message": message,
                "code": code
            }
        })
    }
}
