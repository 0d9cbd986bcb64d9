//! IAM domain model: users and roles

use super::common::{impl_varchar_enum, StringUuid};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use validator::Validate;

/// Application role
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
pub enum Role {
    #[serde(rename = "ROLE_ADMIN")]
    Admin,
    /// Fleet owner
    #[serde(rename = "ROLE_OWNER")]
    Owner,
    #[serde(rename = "ROLE_DRIVER")]
    Driver,
    /// Workshop staff
    #[serde(rename = "ROLE_MECHANIC")]
    Mechanic,
}

impl Role {
    pub const ALL: [Role; 4] = [Role::Admin, Role::Owner, Role::Driver, Role::Mechanic];

    /// Role given to users that sign up without asking for one
    pub fn default_role() -> Self {
        Role::Driver
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Admin => "ROLE_ADMIN",
            Role::Owner => "ROLE_OWNER",
            Role::Driver => "ROLE_DRIVER",
            Role::Mechanic => "ROLE_MECHANIC",
        }
    }
}

impl std::str::FromStr for Role {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_uppercase().as_str() {
            "ROLE_ADMIN" | "ADMIN" => Ok(Role::Admin),
            "ROLE_OWNER" | "OWNER" => Ok(Role::Owner),
            "ROLE_DRIVER" | "DRIVER" => Ok(Role::Driver),
            "ROLE_MECHANIC" | "MECHANIC" => Ok(Role::Mechanic),
            _ => Err(format!("Unknown role: {}", s)),
        }
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl_varchar_enum!(Role);

/// User account
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct User {
    pub id: StringUuid,
    pub username: String,
    #[serde(skip_serializing, default)]
    pub password_hash: String,
    /// Loaded from `user_roles`
    #[sqlx(skip)]
    #[serde(default)]
    pub roles: Vec<Role>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl User {
    pub fn has_role(&self, role: Role) -> bool {
        self.roles.contains(&role)
    }

    pub fn role_names(&self) -> Vec<String> {
        self.roles.iter().map(|r| r.to_string()).collect()
    }
}

impl Default for User {
    fn default() -> Self {
        let now = Utc::now();
        Self {
            id: StringUuid::new_v4(),
            username: String::new(),
            password_hash: String::new(),
            roles: vec![Role::default_role()],
            created_at: now,
            updated_at: now,
        }
    }
}

/// Persisted role row
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct RoleRecord {
    pub id: i64,
    pub name: Role,
}

/// Command for registering a new user
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct SignUpCommand {
    #[validate(length(min = 3, max = 100))]
    pub username: String,
    #[validate(length(min = 8, max = 128))]
    pub password: String,
    /// Raw role names; resolved by the user service
    #[serde(default)]
    pub roles: Vec<String>,
}

/// Command for authenticating a user
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct SignInCommand {
    #[validate(length(min = 1))]
    pub username: String,
    #[validate(length(min = 1))]
    pub password: String,
}

/// Input handed to the repository once the password has been hashed
#[derive(Debug, Clone)]
pub struct CreateUserInput {
    pub username: String,
    pub password_hash: String,
    pub roles: Vec<Role>,
}

/// A successfully signed-in user and their bearer token
#[derive(Debug, Clone)]
pub struct AuthenticatedUser {
    pub user: User,
    pub token: String,
}
