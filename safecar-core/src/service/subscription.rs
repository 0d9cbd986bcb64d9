//! Payments business logic: Stripe checkout and subscription lifecycle

use crate::domain::{
    CheckoutResult, CreateCheckoutCommand, Plan, StringUuid, Subscription, SubscriptionStatus,
};
use crate::error::{AppError, Result};
use crate::repository::SubscriptionRepository;
use crate::service::acl::IamContextFacade;
use crate::stripe::{
    verify_webhook_signature, CheckoutRequest, PaymentGateway, StripeEvent, WEBHOOK_TOLERANCE_SECS,
};
use chrono::{DateTime, Utc};
use metrics::counter;
use std::collections::HashMap;
use std::sync::Arc;
use tracing::{error, info, warn};

pub struct SubscriptionService<R: SubscriptionRepository> {
    repo: Arc<R>,
    gateway: Arc<dyn PaymentGateway>,
    iam: Arc<dyn IamContextFacade>,
    /// Plan code -> Stripe price id
    plan_prices: HashMap<String, String>,
    webhook_secret: Option<String>,
}

impl<R: SubscriptionRepository> SubscriptionService<R> {
    pub fn new(
        repo: Arc<R>,
        gateway: Arc<dyn PaymentGateway>,
        iam: Arc<dyn IamContextFacade>,
        plan_prices: HashMap<String, String>,
        webhook_secret: Option<String>,
    ) -> Self {
        Self {
            repo,
            gateway,
            iam,
            plan_prices,
            webhook_secret,
        }
    }

    pub fn list_plans(&self) -> Vec<Plan> {
        let mut plans: Vec<Plan> = self
            .plan_prices
            .iter()
            .map(|(code, price_id)| Plan {
                code: code.clone(),
                price_id: price_id.clone(),
            })
            .collect();
        plans.sort_by(|a, b| a.code.cmp(&b.code));
        plans
    }

    pub async fn create_checkout(&self, cmd: CreateCheckoutCommand) -> Result<CheckoutResult> {
        let plan = cmd.plan.trim().to_lowercase();
        let price_id = self
            .plan_prices
            .get(&plan)
            .cloned()
            .ok_or_else(|| AppError::BadRequest(format!("Unknown plan '{}'", cmd.plan)))?;

        let username = self
            .iam
            .fetch_username(cmd.user_id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("User {} not found", cmd.user_id)))?;

        if self
            .repo
            .find_by_user_and_status(cmd.user_id, SubscriptionStatus::Active)
            .await?
            .is_some()
        {
            return Err(AppError::Conflict(format!(
                "User {} already has an active subscription",
                cmd.user_id
            )));
        }

        let subscription_id = StringUuid::new_v4();
        let session = self
            .gateway
            .create_checkout_session(&CheckoutRequest {
                price_id,
                success_url: cmd.success_url,
                cancel_url: cmd.cancel_url,
                reference_id: subscription_id.to_string(),
                customer_email: username.contains('@').then_some(username),
            })
            .await?;

        let now = Utc::now();
        let subscription = self
            .repo
            .create(&Subscription {
                id: subscription_id,
                user_id: cmd.user_id,
                plan,
                status: SubscriptionStatus::Pending,
                stripe_checkout_session_id: Some(session.id.clone()),
                stripe_customer_id: None,
                stripe_subscription_id: None,
                current_period_end: None,
                created_at: now,
                updated_at: now,
            })
            .await?;

        info!(
            subscription_id = %subscription.id,
            session_id = %session.id,
            "Checkout session created"
        );

        Ok(CheckoutResult {
            subscription,
            session_id: session.id,
            checkout_url: session.url,
        })
    }

    /// Verify and apply a Stripe webhook.
    ///
    /// Returns the updated subscription, or `None` for events that were
    /// acknowledged without changing anything.
    pub async fn handle_webhook(
        &self,
        payload: &[u8],
        signature: Option<&str>,
    ) -> Result<Option<Subscription>> {
        let secret = self.webhook_secret.as_deref().ok_or_else(|| {
            error!("Stripe webhook received but STRIPE_WEBHOOK_SECRET is not configured");
            AppError::Internal(anyhow::anyhow!("Stripe webhook secret is not configured"))
        })?;
        let signature = signature
            .ok_or_else(|| AppError::BadRequest("Missing Stripe-Signature header".to_string()))?;

        verify_webhook_signature(
            secret,
            payload,
            signature,
            WEBHOOK_TOLERANCE_SECS,
            Utc::now().timestamp(),
        )?;

        let event: StripeEvent = serde_json::from_slice(payload)
            .map_err(|e| AppError::BadRequest(format!("Invalid Stripe event: {}", e)))?;

        info!(event_id = %event.id, event_type = %event.event_type, "Stripe event received");
        counter!("safecar_payment_webhook_events_total", "type" => event.event_type.clone())
            .increment(1);

        match event.event_type.as_str() {
            "checkout.session.completed" => self.on_checkout_completed(&event).await,
            "customer.subscription.deleted" => {
                let Some(stripe_id) = event.object_str("id") else {
                    return Ok(None);
                };
                self.transition_by_stripe_id(
                    stripe_id,
                    SubscriptionStatus::Cancelled,
                    event.object_i64("current_period_end"),
                )
                .await
            }
            "invoice.payment_failed" => {
                let Some(stripe_id) = event.object_str("subscription") else {
                    return Ok(None);
                };
                self.transition_by_stripe_id(stripe_id, SubscriptionStatus::PastDue, None)
                    .await
            }
            _ => Ok(None),
        }
    }

    async fn on_checkout_completed(&self, event: &StripeEvent) -> Result<Option<Subscription>> {
        let mut subscription = match event.object_str("id") {
            Some(session_id) => self.repo.find_by_checkout_session(session_id).await?,
            None => None,
        };
        if subscription.is_none() {
            if let Some(reference) = event
                .object_str("client_reference_id")
                .and_then(|r| r.parse::<StringUuid>().ok())
            {
                subscription = self.repo.find_by_id(reference).await?;
            }
        }

        let Some(mut subscription) = subscription else {
            warn!(event_id = %event.id, "Checkout completed for unknown subscription");
            return Ok(None);
        };

        subscription.status = SubscriptionStatus::Active;
        if let Some(customer) = event.object_str("customer") {
            subscription.stripe_customer_id = Some(customer.to_string());
        }
        if let Some(stripe_id) = event.object_str("subscription") {
            subscription.stripe_subscription_id = Some(stripe_id.to_string());
        }

        let subscription = self.repo.update(&subscription).await?;
        info!(subscription_id = %subscription.id, "Subscription activated");
        Ok(Some(subscription))
    }

    async fn transition_by_stripe_id(
        &self,
        stripe_subscription_id: &str,
        status: SubscriptionStatus,
        period_end: Option<i64>,
    ) -> Result<Option<Subscription>> {
        let Some(mut subscription) = self
            .repo
            .find_by_stripe_subscription(stripe_subscription_id)
            .await?
        else {
            warn!(
                stripe_subscription_id = %stripe_subscription_id,
                "Stripe event for unknown subscription"
            );
            return Ok(None);
        };

        subscription.status = status;
        if let Some(end) = period_end.and_then(|ts| DateTime::<Utc>::from_timestamp(ts, 0)) {
            subscription.current_period_end = Some(end);
        }

        let subscription = self.repo.update(&subscription).await?;
        info!(subscription_id = %subscription.id, status = %status, "Subscription status changed");
        Ok(Some(subscription))
    }

    pub async fn get(&self, id: StringUuid) -> Result<Subscription> {
        self.repo
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Subscription {} not found", id)))
    }

    pub async fn get_by_user(&self, user_id: StringUuid) -> Result<Subscription> {
        self.repo
            .find_latest_by_user(user_id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("No subscription for user {}", user_id)))
    }

    pub async fn cancel(&self, id: StringUuid) -> Result<Subscription> {
        let mut subscription = self.get(id).await?;
        if subscription.status == SubscriptionStatus::Cancelled {
            return Err(AppError::Conflict(format!(
                "Subscription {} is already cancelled",
                id
            )));
        }

        if let Some(stripe_id) = &subscription.stripe_subscription_id {
            self.gateway.cancel_subscription(stripe_id).await?;
        }

        subscription.status = SubscriptionStatus::Cancelled;
        let subscription = self.repo.update(&subscription).await?;
        info!(subscription_id = %id, "Subscription cancelled");
        Ok(subscription)
    }
}
