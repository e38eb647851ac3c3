//! Authentication service - credential exchange and session tokens.
//!
//! The session is a signed JWT with a fixed lifetime; password hashing
//! lives in the domain `Password` value object.

use async_trait::async_trait;
use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::config::{Config, SECONDS_PER_HOUR, TOKEN_TYPE_BEARER};
use crate::domain::{Password, User, UserRole};
use crate::errors::{AppError, AppResult};
use crate::infra::UserRepository;

/// JWT claims payload, bound to the signed-in user
#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    pub sub: Uuid,
    pub email: String,
    pub name: Option<String>,
    pub role: UserRole,
    pub exp: i64,
    pub iat: i64,
}

/// Token response returned after successful authentication
#[derive(Debug, Serialize, ToSchema)]
pub struct TokenResponse {
    /// JWT access token
    #[schema(example = "eyJhbGciOiJIUzI1NiIsInR5cCI6IkpXVCJ9...")]
    pub access_token: String,
    /// Token type (always "Bearer")
    #[schema(example = "Bearer")]
    pub token_type: String,
    /// Token expiration time in seconds
    #[schema(example = 86400)]
    pub expires_in: i64,
}

/// Authentication service trait for dependency injection.
#[async_trait]
pub trait AuthService: Send + Sync {
    /// Exchange credentials for a session token
    async fn login(&self, email: String, password: String) -> AppResult<TokenResponse>;

    /// Verify a session token and extract its claims
    fn verify_token(&self, token: &str) -> AppResult<Claims>;
}

/// Generate JWT token for a user
fn generate_token(user: &User, config: &Config) -> AppResult<TokenResponse> {
    let now = Utc::now();
    let expires_at = now + Duration::hours(config.jwt_expiration_hours);

    let claims = Claims {
        sub: user.id,
        email: user.email.clone(),
        name: user.name.clone(),
        role: user.role,
        exp: expires_at.timestamp(),
        iat: now.timestamp(),
    };

    let token = encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(config.jwt_secret_bytes()),
    )?;

    Ok(TokenResponse {
        access_token: token,
        token_type: TOKEN_TYPE_BEARER.to_string(),
        expires_in: config.jwt_expiration_hours * SECONDS_PER_HOUR,
    })
}

/// Verify JWT token and extract claims
fn verify_token_internal(token: &str, config: &Config) -> AppResult<Claims> {
    let token_data = decode::<Claims>(
        token,
        &DecodingKey::from_secret(config.jwt_secret_bytes()),
        &Validation::default(),
    )?;

    Ok(token_data.claims)
}

/// Concrete implementation of AuthService over the user repository.
pub struct Authenticator {
    users: Arc<dyn UserRepository>,
    config: Config,
}

impl Authenticator {
    /// Create new auth service instance
    pub fn new(users: Arc<dyn UserRepository>, config: Config) -> Self {
        Self { users, config }
    }
}

#[async_trait]
impl AuthService for Authenticator {
    async fn login(&self, email: String, password: String) -> AppResult<TokenResponse> {
        let user_result = self.users.find_by_email(&email).await?;

        // Verify against a dummy hash when the user doesn't exist so unknown
        // emails and wrong passwords take a similar amount of time.
        let dummy_hash =
            "$argon2id$v=19$m=19456,t=2,p=1$dummysalt123456$dummyhash1234567890123456789012";

        let (password_hash, user_exists) = match &user_result {
            Some(user) => (user.password_hash.as_str(), true),
            None => (dummy_hash, false),
        };

        let stored_password = Password::from_hash(password_hash.to_string());
        let password_valid = stored_password.verify(&password);

        if !user_exists || !password_valid {
            return Err(AppError::InvalidCredentials);
        }

        // Safe: user_exists was checked above
        let user = user_result.as_ref().ok_or(AppError::InvalidCredentials)?;
        generate_token(user, &self.config)
    }

    fn verify_token(&self, token: &str) -> AppResult<Claims> {
        verify_token_internal(token, &self.config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infra::MockUserRepository;

    fn test_config() -> Config {
        Config::for_tests("test-secret-key-for-testing-only-32chars")
    }

    fn sample_user(password: &str) -> User {
        User {
            id: Uuid::new_v4(),
            email: "oficina@rgvautoparts.com".to_string(),
            password_hash: Password::new(password).unwrap().into_string(),
            name: Some("Super Admin".to_string()),
            role: UserRole::SuperAdmin,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn token_round_trips_identity_and_role() {
        let config = test_config();
        let user = sample_user("admin1234");

        let token = generate_token(&user, &config).unwrap();
        assert_eq!(token.token_type, "Bearer");

        let claims = verify_token_internal(&token.access_token, &config).unwrap();
        assert_eq!(claims.sub, user.id);
        assert_eq!(claims.email, user.email);
        assert_eq!(claims.name, user.name);
        assert_eq!(claims.role, UserRole::SuperAdmin);
        assert!(claims.exp > claims.iat);
    }

    #[test]
    fn tampered_token_is_rejected() {
        let config = test_config();
        let other = Config::for_tests("another-secret-key-of-enough-length!!");
        let token = generate_token(&sample_user("admin1234"), &other).unwrap();

        assert!(verify_token_internal(&token.access_token, &config).is_err());
    }

    #[tokio::test]
    async fn login_succeeds_with_valid_credentials() {
        let user = sample_user("admin1234");
        let mut repo = MockUserRepository::new();
        let returned = user.clone();
        repo.expect_find_by_email()
            .returning(move |_| Ok(Some(returned.clone())));

        let auth = Authenticator::new(Arc::new(repo), test_config());
        let token = auth
            .login(user.email.clone(), "admin1234".to_string())
            .await
            .unwrap();

        let claims = auth.verify_token(&token.access_token).unwrap();
        assert_eq!(claims.sub, user.id);
    }

    #[tokio::test]
    async fn login_rejects_wrong_password() {
        let user = sample_user("admin1234");
        let mut repo = MockUserRepository::new();
        repo.expect_find_by_email()
            .returning(move |_| Ok(Some(user.clone())));

        let auth = Authenticator::new(Arc::new(repo), test_config());
        let result = auth
            .login("oficina@rgvautoparts.com".to_string(), "wrong".to_string())
            .await;

        assert!(matches!(result, Err(AppError::InvalidCredentials)));
    }

    #[tokio::test]
    async fn login_rejects_unknown_email_identically() {
        let mut repo = MockUserRepository::new();
        repo.expect_find_by_email().returning(|_| Ok(None));

        let auth = Authenticator::new(Arc::new(repo), test_config());
        let result = auth
            .login("nobody@example.com".to_string(), "admin1234".to_string())
            .await;

        assert!(matches!(result, Err(AppError::InvalidCredentials)));
    }
}
