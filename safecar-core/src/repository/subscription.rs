//! Subscription repository

use crate::domain::{StringUuid, Subscription, SubscriptionStatus};
use crate::error::{AppError, Result};
use async_trait::async_trait;
use sqlx::MySqlPool;

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait SubscriptionRepository: Send + Sync {
    async fn create(&self, subscription: &Subscription) -> Result<Subscription>;
    async fn find_by_id(&self, id: StringUuid) -> Result<Option<Subscription>>;
    /// Most recently created subscription of a user
    async fn find_latest_by_user(&self, user_id: StringUuid) -> Result<Option<Subscription>>;
    async fn find_by_user_and_status(
        &self,
        user_id: StringUuid,
        status: SubscriptionStatus,
    ) -> Result<Option<Subscription>>;
    async fn find_by_checkout_session(&self, session_id: &str) -> Result<Option<Subscription>>;
    async fn find_by_stripe_subscription(
        &self,
        stripe_subscription_id: &str,
    ) -> Result<Option<Subscription>>;
    async fn update(&self, subscription: &Subscription) -> Result<Subscription>;
}

const SUBSCRIPTION_COLUMNS: &str = "id, user_id, plan, status, stripe_checkout_session_id, \
     stripe_customer_id, stripe_subscription_id, current_period_end, created_at, updated_at";

pub struct SubscriptionRepositoryImpl {
    pool: MySqlPool,
}

impl SubscriptionRepositoryImpl {
    pub fn new(pool: MySqlPool) -> Self {
        Self { pool }
    }

    async fn find_one(&self, column: &str, value: String) -> Result<Option<Subscription>> {
        let sql = format!(
            "SELECT {} FROM subscriptions WHERE {} = ? ORDER BY created_at DESC LIMIT 1",
            SUBSCRIPTION_COLUMNS, column
        );
        let subscription = sqlx::query_as::<_, Subscription>(&sql)
            .bind(value)
            .fetch_optional(&self.pool)
            .await?;
        Ok(subscription)
    }
}

#[async_trait]
impl SubscriptionRepository for SubscriptionRepositoryImpl {
    async fn create(&self, subscription: &Subscription) -> Result<Subscription> {
        sqlx::query(
            r#"
            INSERT INTO subscriptions
                (id, user_id, plan, status, stripe_checkout_session_id, stripe_customer_id,
                 stripe_subscription_id, current_period_end, created_at, updated_at)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?, NOW(), NOW())
            "#,
        )
        .bind(subscription.id)
        .bind(subscription.user_id)
        .bind(&subscription.plan)
        .bind(subscription.status)
        .bind(&subscription.stripe_checkout_session_id)
        .bind(&subscription.stripe_customer_id)
        .bind(&subscription.stripe_subscription_id)
        .bind(subscription.current_period_end)
        .execute(&self.pool)
        .await?;

        self.find_by_id(subscription.id)
            .await?
            .ok_or_else(|| AppError::Internal(anyhow::anyhow!("Failed to create subscription")))
    }

    async fn find_by_id(&self, id: StringUuid) -> Result<Option<Subscription>> {
        self.find_one("id", id.to_string()).await
    }

    async fn find_latest_by_user(&self, user_id: StringUuid) -> Result<Option<Subscription>> {
        self.find_one("user_id", user_id.to_string()).await
    }

    async fn find_by_user_and_status(
        &self,
        user_id: StringUuid,
        status: SubscriptionStatus,
    ) -> Result<Option<Subscription>> {
        let sql = format!(
            "SELECT {} FROM subscriptions WHERE user_id = ? AND status = ? \
             ORDER BY created_at DESC LIMIT 1",
            SUBSCRIPTION_COLUMNS
        );
        let subscription = sqlx::query_as::<_, Subscription>(&sql)
            .bind(user_id)
            .bind(status)
            .fetch_optional(&self.pool)
            .await?;
        Ok(subscription)
    }

    async fn find_by_checkout_session(&self, session_id: &str) -> Result<Option<Subscription>> {
        self.find_one("stripe_checkout_session_id", session_id.to_string())
            .await
    }

    async fn find_by_stripe_subscription(
        &self,
        stripe_subscription_id: &str,
    ) -> Result<Option<Subscription>> {
        self.find_one("stripe_subscription_id", stripe_subscription_id.to_string())
            .await
    }

    async fn update(&self, subscription: &Subscription) -> Result<Subscription> {
        let result = sqlx::query(
            r#"
            UPDATE subscriptions
            SET status = ?, stripe_checkout_session_id = ?, stripe_customer_id = ?,
                stripe_subscription_id = ?, current_period_end = ?, updated_at = NOW()
            WHERE id = ?
            "#,
        )
        .bind(subscription.status)
        .bind(&subscription.stripe_checkout_session_id)
        .bind(&subscription.stripe_customer_id)
        .bind(&subscription.stripe_subscription_id)
        .bind(subscription.current_period_end)
        .bind(subscription.id)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound(format!(
                "Subscription {} not found",
                subscription.id
            )));
        }

        self.find_by_id(subscription.id)
            .await?
            .ok_or_else(|| AppError::Internal(anyhow::anyhow!("Failed to update subscription")))
    }
}
