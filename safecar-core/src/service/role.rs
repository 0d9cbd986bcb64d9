//! Role catalogue

use crate::domain::{Role, RoleRecord};
use crate::error::Result;
use crate::repository::RoleRepository;
use std::sync::Arc;
use tracing::info;

pub struct RoleService<R: RoleRepository> {
    repo: Arc<R>,
}

impl<R: RoleRepository> RoleService<R> {
    pub fn new(repo: Arc<R>) -> Self {
        Self { repo }
    }

    pub async fn list(&self) -> Result<Vec<RoleRecord>> {
        self.repo.list().await
    }

    /// Make sure every known role exists. Safe to run on every startup.
    pub async fn seed(&self) -> Result<()> {
        self.repo.seed(&Role::ALL).await?;
        info!(count = Role::ALL.len(), "Roles seeded");
        Ok(())
    }
}
