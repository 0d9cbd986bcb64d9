//! Person and business profile business logic

use crate::domain::{
    BusinessProfile, CreateBusinessProfileCommand, CreatePersonProfileCommand, PersonProfile,
    StringUuid, UpdateBusinessProfileCommand, UpdatePersonProfileCommand,
};
use crate::error::{AppError, Result};
use crate::repository::{BusinessProfileRepository, PersonProfileRepository};
use crate::service::acl::IamContextFacade;
use chrono::Utc;
use std::sync::Arc;
use validator::Validate;

pub struct ProfileService<P: PersonProfileRepository, B: BusinessProfileRepository> {
    person_repo: Arc<P>,
    business_repo: Arc<B>,
    iam: Arc<dyn IamContextFacade>,
}

impl<P: PersonProfileRepository, B: BusinessProfileRepository> ProfileService<P, B> {
    pub fn new(person_repo: Arc<P>, business_repo: Arc<B>, iam: Arc<dyn IamContextFacade>) -> Self {
        Self {
            person_repo,
            business_repo,
            iam,
        }
    }

    async fn ensure_user_exists(&self, user_id: StringUuid) -> Result<()> {
        if !self.iam.user_exists(user_id).await? {
            return Err(AppError::NotFound(format!("User {} not found", user_id)));
        }
        Ok(())
    }

    // ==================== Person ====================

    pub async fn create_person(&self, cmd: CreatePersonProfileCommand) -> Result<PersonProfile> {
        cmd.validate()?;
        self.ensure_user_exists(cmd.user_id).await?;

        if self
            .person_repo
            .find_by_user_id(cmd.user_id)
            .await?
            .is_some()
        {
            return Err(AppError::Conflict(format!(
                "User {} already has a person profile",
                cmd.user_id
            )));
        }
        if self.person_repo.find_by_dni(&cmd.dni).await?.is_some() {
            return Err(AppError::Conflict(format!(
                "A person profile with DNI '{}' already exists",
                cmd.dni
            )));
        }

        let now = Utc::now();
        let profile = PersonProfile {
            id: StringUuid::new_v4(),
            user_id: cmd.user_id,
            first_name: cmd.first_name,
            last_name: cmd.last_name,
            dni: cmd.dni,
            phone: cmd.phone,
            email: cmd.email.to_lowercase(),
            address: cmd.address,
            created_at: now,
            updated_at: now,
        };
        self.person_repo.create(&profile).await
    }

    pub async fn get_person(&self, id: StringUuid) -> Result<PersonProfile> {
        self.person_repo
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Person profile {} not found", id)))
    }

    pub async fn get_person_by_user(&self, user_id: StringUuid) -> Result<PersonProfile> {
        self.person_repo
            .find_by_user_id(user_id)
            .await?
            .ok_or_else(|| {
                AppError::NotFound(format!("No person profile for user {}", user_id))
            })
    }

    pub async fn list_persons(&self, page: i64, per_page: i64) -> Result<(Vec<PersonProfile>, i64)> {
        let offset = super::page_offset(page, per_page);
        let profiles = self.person_repo.list(offset, per_page).await?;
        let total = self.person_repo.count().await?;
        Ok((profiles, total))
    }

    pub async fn update_person(
        &self,
        id: StringUuid,
        cmd: UpdatePersonProfileCommand,
    ) -> Result<PersonProfile> {
        cmd.validate()?;
        let mut profile = self.get_person(id).await?;

        if let Some(first_name) = cmd.first_name {
            profile.first_name = first_name;
        }
        if let Some(last_name) = cmd.last_name {
            profile.last_name = last_name;
        }
        if let Some(phone) = cmd.phone {
            profile.phone = phone;
        }
        if let Some(email) = cmd.email {
            profile.email = email.to_lowercase();
        }
        if cmd.address.is_some() {
            profile.address = cmd.address;
        }

        self.person_repo.update(&profile).await
    }

    // ==================== Business ====================

    pub async fn create_business(
        &self,
        cmd: CreateBusinessProfileCommand,
    ) -> Result<BusinessProfile> {
        cmd.validate()?;
        self.ensure_user_exists(cmd.user_id).await?;

        if self
            .business_repo
            .find_by_user_id(cmd.user_id)
            .await?
            .is_some()
        {
            return Err(AppError::Conflict(format!(
                "User {} already has a business profile",
                cmd.user_id
            )));
        }
        if self.business_repo.find_by_ruc(&cmd.ruc).await?.is_some() {
            return Err(AppError::Conflict(format!(
                "A business profile with RUC '{}' already exists",
                cmd.ruc
            )));
        }

        let now = Utc::now();
        let profile = BusinessProfile {
            id: StringUuid::new_v4(),
            user_id: cmd.user_id,
            business_name: cmd.business_name,
            ruc: cmd.ruc,
            phone: cmd.phone,
            address: cmd.address,
            description: cmd.description,
            created_at: now,
            updated_at: now,
        };
        self.business_repo.create(&profile).await
    }

    pub async fn get_business(&self, id: StringUuid) -> Result<BusinessProfile> {
        self.business_repo
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Business profile {} not found", id)))
    }

    pub async fn get_business_by_user(&self, user_id: StringUuid) -> Result<BusinessProfile> {
        self.business_repo
            .find_by_user_id(user_id)
            .await?
            .ok_or_else(|| {
                AppError::NotFound(format!("No business profile for user {}", user_id))
            })
    }

    pub async fn list_businesses(
        &self,
        page: i64,
        per_page: i64,
    ) -> Result<(Vec<BusinessProfile>, i64)> {
        let offset = super::page_offset(page, per_page);
        let profiles = self.business_repo.list(offset, per_page).await?;
        let total = self.business_repo.count().await?;
        Ok((profiles, total))
    }

    pub async fn update_business(
        &self,
        id: StringUuid,
        cmd: UpdateBusinessProfileCommand,
    ) -> Result<BusinessProfile> {
        cmd.validate()?;
        let mut profile = self.get_business(id).await?;

        if let Some(business_name) = cmd.business_name {
            profile.business_name = business_name;
        }
        if let Some(phone) = cmd.phone {
            profile.phone = phone;
        }
        if let Some(address) = cmd.address {
            profile.address = address;
        }
        if cmd.description.is_some() {
            profile.description = cmd.description;
        }

        self.business_repo.update(&profile).await
    }
}
