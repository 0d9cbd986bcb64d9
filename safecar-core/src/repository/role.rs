//! Role repository

use crate::domain::{Role, RoleRecord};
use crate::error::Result;
use async_trait::async_trait;
use sqlx::MySqlPool;

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait RoleRepository: Send + Sync {
    async fn list(&self) -> Result<Vec<RoleRecord>>;
    async fn find_by_name(&self, role: Role) -> Result<Option<RoleRecord>>;
    /// Insert the given roles, skipping names that already exist
    async fn seed(&self, roles: &[Role]) -> Result<()>;
}

pub struct RoleRepositoryImpl {
    pool: MySqlPool,
}

impl RoleRepositoryImpl {
    pub fn new(pool: MySqlPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl RoleRepository for RoleRepositoryImpl {
    async fn list(&self) -> Result<Vec<RoleRecord>> {
        let roles = sqlx::query_as::<_, RoleRecord>("SELECT id, name FROM roles ORDER BY id")
            .fetch_all(&self.pool)
            .await?;
        Ok(roles)
    }

    async fn find_by_name(&self, role: Role) -> Result<Option<RoleRecord>> {
        let record = sqlx::query_as::<_, RoleRecord>("SELECT id, name FROM roles WHERE name = ?")
            .bind(role)
            .fetch_optional(&self.pool)
            .await?;
        Ok(record)
    }

    async fn seed(&self, roles: &[Role]) -> Result<()> {
        for role in roles {
            sqlx::query("INSERT IGNORE INTO roles (name) VALUES (?)")
                .bind(role)
                .execute(&self.pool)
                .await?;
        }
        Ok(())
    }
}
