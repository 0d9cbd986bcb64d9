//! Person and business profile repositories

use super::conflict_on_duplicate;
use crate::domain::{BusinessProfile, PersonProfile, StringUuid};
use crate::error::{AppError, Result};
use async_trait::async_trait;
use sqlx::MySqlPool;

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait PersonProfileRepository: Send + Sync {
    async fn create(&self, profile: &PersonProfile) -> Result<PersonProfile>;
    async fn find_by_id(&self, id: StringUuid) -> Result<Option<PersonProfile>>;
    async fn find_by_user_id(&self, user_id: StringUuid) -> Result<Option<PersonProfile>>;
    async fn find_by_dni(&self, dni: &str) -> Result<Option<PersonProfile>>;
    async fn list(&self, offset: i64, limit: i64) -> Result<Vec<PersonProfile>>;
    async fn count(&self) -> Result<i64>;
    async fn update(&self, profile: &PersonProfile) -> Result<PersonProfile>;
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait BusinessProfileRepository: Send + Sync {
    async fn create(&self, profile: &BusinessProfile) -> Result<BusinessProfile>;
    async fn find_by_id(&self, id: StringUuid) -> Result<Option<BusinessProfile>>;
    async fn find_by_user_id(&self, user_id: StringUuid) -> Result<Option<BusinessProfile>>;
    async fn find_by_ruc(&self, ruc: &str) -> Result<Option<BusinessProfile>>;
    async fn list(&self, offset: i64, limit: i64) -> Result<Vec<BusinessProfile>>;
    async fn count(&self) -> Result<i64>;
    async fn update(&self, profile: &BusinessProfile) -> Result<BusinessProfile>;
}

const PERSON_COLUMNS: &str =
    "id, user_id, first_name, last_name, dni, phone, email, address, created_at, updated_at";

const BUSINESS_COLUMNS: &str =
    "id, user_id, business_name, ruc, phone, address, description, created_at, updated_at";

pub struct PersonProfileRepositoryImpl {
    pool: MySqlPool,
}

impl PersonProfileRepositoryImpl {
    pub fn new(pool: MySqlPool) -> Self {
        Self { pool }
    }

    async fn find_one(&self, column: &str, value: String) -> Result<Option<PersonProfile>> {
        let sql = format!(
            "SELECT {} FROM person_profiles WHERE {} = ?",
            PERSON_COLUMNS, column
        );
        let profile = sqlx::query_as::<_, PersonProfile>(&sql)
            .bind(value)
            .fetch_optional(&self.pool)
            .await?;
        Ok(profile)
    }
}

#[async_trait]
impl PersonProfileRepository for PersonProfileRepositoryImpl {
    async fn create(&self, profile: &PersonProfile) -> Result<PersonProfile> {
        sqlx::query(
            r#"
            INSERT INTO person_profiles
                (id, user_id, first_name, last_name, dni, phone, email, address, created_at, updated_at)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?, NOW(), NOW())
            "#,
        )
        .bind(profile.id)
        .bind(profile.user_id)
        .bind(&profile.first_name)
        .bind(&profile.last_name)
        .bind(&profile.dni)
        .bind(&profile.phone)
        .bind(&profile.email)
        .bind(&profile.address)
        .execute(&self.pool)
        .await
        .map_err(|e| conflict_on_duplicate(e, "Person profile already exists"))?;

        self.find_by_id(profile.id)
            .await?
            .ok_or_else(|| AppError::Internal(anyhow::anyhow!("Failed to create person profile")))
    }

    async fn find_by_id(&self, id: StringUuid) -> Result<Option<PersonProfile>> {
        self.find_one("id", id.to_string()).await
    }

    async fn find_by_user_id(&self, user_id: StringUuid) -> Result<Option<PersonProfile>> {
        self.find_one("user_id", user_id.to_string()).await
    }

    async fn find_by_dni(&self, dni: &str) -> Result<Option<PersonProfile>> {
        self.find_one("dni", dni.to_string()).await
    }

    async fn list(&self, offset: i64, limit: i64) -> Result<Vec<PersonProfile>> {
        let sql = format!(
            "SELECT {} FROM person_profiles ORDER BY created_at DESC LIMIT ? OFFSET ?",
            PERSON_COLUMNS
        );
        let profiles = sqlx::query_as::<_, PersonProfile>(&sql)
            .bind(limit)
            .bind(offset)
            .fetch_all(&self.pool)
            .await?;
        Ok(profiles)
    }

    async fn count(&self) -> Result<i64> {
        let row: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM person_profiles")
            .fetch_one(&self.pool)
            .await?;
        Ok(row.0)
    }

    async fn update(&self, profile: &PersonProfile) -> Result<PersonProfile> {
        let result = sqlx::query(
            r#"
            UPDATE person_profiles
            SET first_name = ?, last_name = ?, phone = ?, email = ?, address = ?, updated_at = NOW()
            WHERE id = ?
            "#,
        )
        .bind(&profile.first_name)
        .bind(&profile.last_name)
        .bind(&profile.phone)
        .bind(&profile.email)
        .bind(&profile.address)
        .bind(profile.id)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound(format!(
                "Person profile {} not found",
                profile.id
            )));
        }

        self.find_by_id(profile.id)
            .await?
            .ok_or_else(|| AppError::Internal(anyhow::anyhow!("Failed to update person profile")))
    }
}

pub struct BusinessProfileRepositoryImpl {
    pool: MySqlPool,
}

impl BusinessProfileRepositoryImpl {
    pub fn new(pool: MySqlPool) -> Self {
        Self { pool }
    }

    async fn find_one(&self, column: &str, value: String) -> Result<Option<BusinessProfile>> {
        let sql = format!(
            "SELECT {} FROM business_profiles WHERE {} = ?",
            BUSINESS_COLUMNS, column
        );
        let profile = sqlx::query_as::<_, BusinessProfile>(&sql)
            .bind(value)
            .fetch_optional(&self.pool)
            .await?;
        Ok(profile)
    }
}

#[async_trait]
impl BusinessProfileRepository for BusinessProfileRepositoryImpl {
    async fn create(&self, profile: &BusinessProfile) -> Result<BusinessProfile> {
        sqlx::query(
            r#"
            INSERT INTO business_profiles
                (id, user_id, business_name, ruc, phone, address, description, created_at, updated_at)
            VALUES (?, ?, ?, ?, ?, ?, ?, NOW(), NOW())
            "#,
        )
        .bind(profile.id)
        .bind(profile.user_id)
        .bind(&profile.business_name)
        .bind(&profile.ruc)
        .bind(&profile.phone)
        .bind(&profile.address)
        .bind(&profile.description)
        .execute(&self.pool)
        .await
        .map_err(|e| conflict_on_duplicate(e, "Business profile already exists"))?;

        self.find_by_id(profile.id).await?.ok_or_else(|| {
            AppError::Internal(anyhow::anyhow!("Failed to create business profile"))
        })
    }

    async fn find_by_id(&self, id: StringUuid) -> Result<Option<BusinessProfile>> {
        self.find_one("id", id.to_string()).await
    }

    async fn find_by_user_id(&self, user_id: StringUuid) -> Result<Option<BusinessProfile>> {
        self.find_one("user_id", user_id.to_string()).await
    }

    async fn find_by_ruc(&self, ruc: &str) -> Result<Option<BusinessProfile>> {
        self.find_one("ruc", ruc.to_string()).await
    }

    async fn list(&self, offset: i64, limit: i64) -> Result<Vec<BusinessProfile>> {
        let sql = format!(
            "SELECT {} FROM business_profiles ORDER BY created_at DESC LIMIT ? OFFSET ?",
            BUSINESS_COLUMNS
        );
        let profiles = sqlx::query_as::<_, BusinessProfile>(&sql)
            .bind(limit)
            .bind(offset)
            .fetch_all(&self.pool)
            .await?;
        Ok(profiles)
    }

    async fn count(&self) -> Result<i64> {
        let row: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM business_profiles")
            .fetch_one(&self.pool)
            .await?;
        Ok(row.0)
    }

    async fn update(&self, profile: &BusinessProfile) -> Result<BusinessProfile> {
        let result = sqlx::query(
            r#"
            UPDATE business_profiles
            SET business_name = ?, phone = ?, address = ?, description = ?, updated_at = NOW()
            WHERE id = ?
            "#,
        )
        .bind(&profile.business_name)
        .bind(&profile.phone)
        .bind(&profile.address)
        .bind(&profile.description)
        .bind(profile.id)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound(format!(
                "Business profile {} not found",
                profile.id
            )));
        }

        self.find_by_id(profile.id).await?.ok_or_else(|| {
            AppError::Internal(anyhow::anyhow!("Failed to update business profile"))
        })
    }
}
