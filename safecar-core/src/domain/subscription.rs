//! Payments domain model: subscriptions billed through Stripe

use super::common::{impl_varchar_enum, StringUuid};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default, ToSchema)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SubscriptionStatus {
    /// Checkout session created, payment not confirmed yet
    #[default]
    Pending,
    Active,
    PastDue,
    Cancelled,
}

impl std::str::FromStr for SubscriptionStatus {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_uppercase().as_str() {
            "PENDING" => Ok(SubscriptionStatus::Pending),
            "ACTIVE" => Ok(SubscriptionStatus::Active),
            "PAST_DUE" => Ok(SubscriptionStatus::PastDue),
            "CANCELLED" => Ok(SubscriptionStatus::Cancelled),
            _ => Err(format!("Unknown subscription status: {}", s)),
        }
    }
}

impl std::fmt::Display for SubscriptionStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SubscriptionStatus::Pending => write!(f, "PENDING"),
            SubscriptionStatus::Active => write!(f, "ACTIVE"),
            SubscriptionStatus::PastDue => write!(f, "PAST_DUE"),
            SubscriptionStatus::Cancelled => write!(f, "CANCELLED"),
        }
    }
}

impl_varchar_enum!(SubscriptionStatus);

/// Subscription entity
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Subscription {
    pub id: StringUuid,
    pub user_id: StringUuid,
    /// Plan code, e.g. `basic`
    pub plan: String,
    pub status: SubscriptionStatus,
    pub stripe_checkout_session_id: Option<String>,
    pub stripe_customer_id: Option<String>,
    pub stripe_subscription_id: Option<String>,
    pub current_period_end: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Subscription {
    pub fn is_active(&self) -> bool {
        self.status == SubscriptionStatus::Active
    }
}

impl Default for Subscription {
    fn default() -> Self {
        let now = Utc::now();
        Self {
            id: StringUuid::new_v4(),
            user_id: StringUuid::new_v4(),
            plan: String::new(),
            status: SubscriptionStatus::default(),
            stripe_checkout_session_id: None,
            stripe_customer_id: None,
            stripe_subscription_id: None,
            current_period_end: None,
            created_at: now,
            updated_at: now,
        }
    }
}

/// A billable plan and its Stripe price
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct Plan {
    pub code: String,
    pub price_id: String,
}

#[derive(Debug, Clone)]
pub struct CreateCheckoutCommand {
    pub user_id: StringUuid,
    pub plan: String,
    pub success_url: String,
    pub cancel_url: String,
}

/// Checkout session as returned by the payment gateway
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct CheckoutSession {
    pub id: String,
    pub url: Option<String>,
}

/// Result of starting a checkout
#[derive(Debug, Clone)]
pub struct CheckoutResult {
    pub subscription: Subscription,
    pub session_id: String,
    pub checkout_url: Option<String>,
}
