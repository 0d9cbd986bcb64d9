//! JWT token handling

use crate::config::JwtConfig;
use crate::error::{AppError, Result};
use chrono::{Duration, Utc};
use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use tracing::{error, warn};
use uuid::Uuid;

/// Claims carried by a SafeCar access token
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// Subject (user ID)
    pub sub: String,
    pub username: String,
    /// Role names, e.g. `ROLE_OWNER`
    #[serde(default)]
    pub roles: Vec<String>,
    /// Issuer
    pub iss: String,
    /// Issued at (Unix timestamp)
    pub iat: i64,
    /// Expiration (Unix timestamp)
    pub exp: i64,
}

/// JWT token manager
#[derive(Clone)]
pub struct JwtManager {
    config: JwtConfig,
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
}

impl JwtManager {
    pub fn new(config: JwtConfig) -> Self {
        let encoding_key = EncodingKey::from_secret(config.secret.as_bytes());
        let decoding_key = DecodingKey::from_secret(config.secret.as_bytes());
        Self {
            config,
            encoding_key,
            decoding_key,
        }
    }

    /// Validation with a 5 second leeway instead of the default 60.
    fn strict_validation(&self) -> Validation {
        let mut v = Validation::new(Algorithm::HS256);
        v.leeway = 5;
        v.set_issuer(&[&self.config.issuer]);
        v
    }

    /// Create an access token for a user
    pub fn create_token(&self, user_id: Uuid, username: &str, roles: Vec<String>) -> Result<String> {
        let now = Utc::now();
        let exp = now + Duration::seconds(self.config.expiration_secs);

        let claims = Claims {
            sub: user_id.to_string(),
            username: username.to_string(),
            roles,
            iss: self.config.issuer.clone(),
            iat: now.timestamp(),
            exp: exp.timestamp(),
        };
        encode(&Header::new(Algorithm::HS256), &claims, &self.encoding_key)
            .map_err(|e| AppError::Internal(e.into()))
    }

    /// Verify and decode an access token
    pub fn verify_token(&self, token: &str) -> Result<Claims> {
        let token_data = decode::<Claims>(token, &self.decoding_key, &self.strict_validation())?;
        Ok(token_data.claims)
    }

    /// Boolean check that logs why a token was rejected
    pub fn validate_token(&self, token: &str) -> bool {
        match self.verify_token(token) {
            Ok(_) => true,
            Err(AppError::Jwt(e)) => {
                match e.kind() {
                    ErrorKind::ExpiredSignature => warn!("JWT token is expired"),
                    ErrorKind::InvalidSignature => warn!("Invalid JWT signature"),
                    ErrorKind::InvalidToken | ErrorKind::Base64(_) | ErrorKind::Json(_) => {
                        warn!("Malformed JWT token")
                    }
                    ErrorKind::InvalidIssuer => warn!("JWT token has an unexpected issuer"),
                    ErrorKind::ImmatureSignature => warn!("JWT token is not valid yet"),
                    other => warn!("JWT token rejected: {:?}", other),
                }
                false
            }
            Err(e) => {
                error!("Unexpected error validating JWT token: {}", e);
                false
            }
        }
    }

    pub fn expiration_secs(&self) -> i64 {
        self.config.expiration_secs
    }
}
