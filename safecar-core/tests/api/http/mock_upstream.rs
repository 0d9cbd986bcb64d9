//! Mock third-party APIs for HTTP handler tests
//!
//! One wiremock server plays both Stripe and Gemini. The production
//! `StripeClient` and `GeminiClient` are pointed at it through the config.

use serde_json::json;
use wiremock::matchers::{method, path, path_regex};
use wiremock::{Mock, MockServer, ResponseTemplate};

pub const TEST_GEMINI_MODEL: &str = "gemini-test";

pub struct MockUpstreamServer {
    server: MockServer,
}

impl MockUpstreamServer {
    pub async fn new() -> Self {
        Self {
            server: MockServer::start().await,
        }
    }

    pub fn uri(&self) -> String {
        self.server.uri()
    }

    // ========================================================================
    // Stripe
    // ========================================================================

    pub async fn mock_checkout_session(&self, session_id: &str) {
        Mock::given(method("POST"))
            .and(path("/v1/checkout/sessions"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "id": session_id,
                "object": "checkout.session",
                "url": format!("https://checkout.stripe.test/pay/{}", session_id)
            })))
            .mount(&self.server)
            .await;
    }

    pub async fn mock_checkout_session_failure(&self) {
        Mock::given(method("POST"))
            .and(path("/v1/checkout/sessions"))
            .respond_with(ResponseTemplate::new(402).set_body_json(json!({
                "error": { "type": "card_error", "message": "Your card was declined." }
            })))
            .mount(&self.server)
            .await;
    }

    pub async fn mock_cancel_subscription(&self) {
        Mock::given(method("DELETE"))
            .and(path_regex(r"^/v1/subscriptions/.+$"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "object": "subscription",
                "status": "canceled"
            })))
            .mount(&self.server)
            .await;
    }

    // ========================================================================
    // Gemini
    // ========================================================================

    /// Answer `generateContent` with `answer` as the model text
    pub async fn mock_insight(&self, answer: serde_json::Value) {
        Mock::given(method("POST"))
            .and(path(format!(
                "/v1beta/models/{}:generateContent",
                TEST_GEMINI_MODEL
            )))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "candidates": [{
                    "content": {
                        "role": "model",
                        "parts": [{ "text": answer.to_string() }]
                    }
                }]
            })))
            .mount(&self.server)
            .await;
    }

    pub async fn mock_insight_failure(&self) {
        Mock::given(method("POST"))
            .and(path(format!(
                "/v1beta/models/{}:generateContent",
                TEST_GEMINI_MODEL
            )))
            .respond_with(ResponseTemplate::new(503).set_body_string("overloaded"))
            .mount(&self.server)
            .await;
    }
}
