//! IAM business logic: sign-up, sign-in and user queries

use crate::domain::{
    AuthenticatedUser, CreateUserInput, Role, SignInCommand, SignUpCommand, StringUuid, User,
};
use crate::error::{AppError, Result};
use crate::jwt::JwtManager;
use crate::repository::UserRepository;
use crate::service::acl::IamContextFacade;
use argon2::{
    password_hash::{rand_core::OsRng, PasswordHasher, SaltString},
    Argon2, PasswordHash, PasswordVerifier,
};
use async_trait::async_trait;
use metrics::counter;
use std::sync::Arc;
use tracing::{info, warn};
use validator::Validate;

const INVALID_CREDENTIALS: &str = "Invalid username or password";

pub struct UserService<R: UserRepository> {
    repo: Arc<R>,
    jwt_manager: JwtManager,
}

impl<R: UserRepository> UserService<R> {
    pub fn new(repo: Arc<R>, jwt_manager: JwtManager) -> Self {
        Self { repo, jwt_manager }
    }

    pub async fn sign_up(&self, cmd: SignUpCommand) -> Result<User> {
        cmd.validate()?;
        let roles = resolve_roles(&cmd.roles)?;

        if self.repo.find_by_username(&cmd.username).await?.is_some() {
            return Err(AppError::Conflict(format!(
                "Username '{}' is already taken",
                cmd.username
            )));
        }

        let password_hash = hash_password(&cmd.password)?;
        let user = self
            .repo
            .create(&CreateUserInput {
                username: cmd.username,
                password_hash,
                roles,
            })
            .await?;

        info!(user_id = %user.id, roles = ?user.roles, "User signed up");
        Ok(user)
    }

    pub async fn sign_in(&self, cmd: SignInCommand) -> Result<AuthenticatedUser> {
        cmd.validate()?;

        let user = match self.repo.find_by_username(&cmd.username).await? {
            Some(user) => user,
            None => {
                warn!(username = %cmd.username, "Sign-in for unknown user");
                counter!("safecar_auth_sign_in_total", "result" => "failure").increment(1);
                return Err(AppError::Unauthorized(INVALID_CREDENTIALS.to_string()));
            }
        };

        if !verify_password(&cmd.password, &user.password_hash)? {
            warn!(user_id = %user.id, "Sign-in with wrong password");
            counter!("safecar_auth_sign_in_total", "result" => "failure").increment(1);
            return Err(AppError::Unauthorized(INVALID_CREDENTIALS.to_string()));
        }

        let token = self
            .jwt_manager
            .create_token(*user.id, &user.username, user.role_names())?;
        counter!("safecar_auth_sign_in_total", "result" => "success").increment(1);

        Ok(AuthenticatedUser { user, token })
    }

    pub async fn get(&self, id: StringUuid) -> Result<User> {
        self.repo
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("User {} not found", id)))
    }

    pub async fn get_by_username(&self, username: &str) -> Result<User> {
        self.repo
            .find_by_username(username)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("User '{}' not found", username)))
    }

    pub async fn list(&self, page: i64, per_page: i64) -> Result<(Vec<User>, i64)> {
        let offset = super::page_offset(page, per_page);
        let users = self.repo.list(offset, per_page).await?;
        let total = self.repo.count().await?;
        Ok((users, total))
    }
}

#[async_trait]
impl<R: UserRepository + 'static> IamContextFacade for UserService<R> {
    async fn user_exists(&self, user_id: StringUuid) -> Result<bool> {
        Ok(self.repo.find_by_id(user_id).await?.is_some())
    }

    async fn fetch_username(&self, user_id: StringUuid) -> Result<Option<String>> {
        Ok(self.repo.find_by_id(user_id).await?.map(|u| u.username))
    }
}

/// Parse requested role names, falling back to the default role.
///
/// Admin cannot be self-assigned; admins are provisioned directly in the database.
fn resolve_roles(names: &[String]) -> Result<Vec<Role>> {
    if names.is_empty() {
        return Ok(vec![Role::default_role()]);
    }

    let mut roles = Vec::with_capacity(names.len());
    for name in names {
        let role: Role = name.parse().map_err(AppError::BadRequest)?;
        if role == Role::Admin {
            warn!("Sign-up requested {}", role);
            return Err(AppError::Forbidden(format!(
                "{} cannot be requested at sign-up",
                role
            )));
        }
        if !roles.contains(&role) {
            roles.push(role);
        }
    }
    Ok(roles)
}

fn hash_password(password: &str) -> Result<String> {
    let salt = SaltString::generate(&mut OsRng);
    let hash = Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map_err(|e| AppError::Internal(anyhow::anyhow!("Failed to hash password: {}", e)))?;
    Ok(hash.to_string())
}

fn verify_password(password: &str, hash: &str) -> Result<bool> {
    let parsed_hash = PasswordHash::new(hash)
        .map_err(|e| AppError::Internal(anyhow::anyhow!("Invalid password hash: {}", e)))?;

    Ok(Argon2::default()
        .verify_password(password.as_bytes(), &parsed_hash)
        .is_ok())
}
