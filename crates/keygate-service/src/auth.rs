//! Admin account registration, login and bearer-token authentication.

use std::sync::Arc;

use tracing::info;

use keygate_auth::jwt::{JwtDecoder, JwtEncoder};
use keygate_auth::password::{PasswordHasher, PasswordValidator};
use keygate_core::error::AppError;
use keygate_core::result::AppResult;
use keygate_core::types::UserId;
use keygate_database::store::UserStore;
use keygate_entity::user::{CreateUser, User, UserRole};

/// Registration input.
#[derive(Debug, Clone)]
pub struct Registration {
    /// Display login name.
    pub username: String,
    /// Unique email.
    pub email: String,
    /// Plaintext password.
    pub password: String,
    /// Defaults to [`UserRole::User`].
    pub role: Option<UserRole>,
}

/// An authenticated account together with a fresh bearer token.
#[derive(Debug, Clone)]
pub struct AuthSession {
    /// The account.
    pub user: User,
    /// HS256 bearer token.
    pub token: String,
}

/// Handles account registration, login and token verification.
#[derive(Debug, Clone)]
pub struct AuthService {
    users: Arc<dyn UserStore>,
    hasher: PasswordHasher,
    validator: PasswordValidator,
    encoder: JwtEncoder,
    decoder: JwtDecoder,
}

impl AuthService {
    /// Creates a new auth service.
    pub fn new(
        users: Arc<dyn UserStore>,
        hasher: PasswordHasher,
        validator: PasswordValidator,
        encoder: JwtEncoder,
        decoder: JwtDecoder,
    ) -> Self {
        Self {
            users,
            hasher,
            validator,
            encoder,
            decoder,
        }
    }

    /// Create an account and sign it in.
    pub async fn register(&self, input: Registration) -> AppResult<AuthSession> {
        if input.username.trim().is_empty() || input.email.trim().is_empty() {
            return Err(AppError::validation("Missing required fields"));
        }
        self.validator.validate(&input.password)?;

        if self.users.find_by_email(&input.email).await?.is_some() {
            return Err(AppError::conflict("User already exists"));
        }

        let password_hash = self.hasher.hash_password(&input.password)?;
        let user = self
            .users
            .create(CreateUser {
                username: input.username,
                email: input.email,
                password_hash,
                role: input.role.unwrap_or_default(),
            })
            .await?;

        info!(user_id = %user.id, role = %user.role, "User registered");
        let (token, _) = self.encoder.issue(&user)?;
        Ok(AuthSession { user, token })
    }

    /// Verify email and password and issue a token.
    pub async fn login(&self, email: &str, password: &str) -> AppResult<AuthSession> {
        let Some(user) = self.users.find_by_email(email).await? else {
            return Err(AppError::authentication("Invalid credentials"));
        };
        if !self.hasher.verify_password(password, &user.password_hash)? {
            return Err(AppError::authentication("Invalid credentials"));
        }
        if !user.is_active {
            return Err(AppError::authentication("Account suspended"));
        }

        info!(user_id = %user.id, "User logged in");
        let (token, _) = self.encoder.issue(&user)?;
        Ok(AuthSession { user, token })
    }

    /// Resolve a bearer token to the account it was issued for.
    pub async fn authenticate(&self, token: &str) -> AppResult<User> {
        let claims = self.decoder.decode(token)?;
        match self.users.find_by_id(claims.user_id()).await? {
            Some(user) if user.is_active => Ok(user),
            Some(_) => Err(AppError::authentication("Account suspended")),
            None => Err(AppError::authentication("Invalid token")),
        }
    }

    /// Load the current account.
    pub async fn current_user(&self, id: UserId) -> AppResult<User> {
        self.users
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::not_found("User not found"))
    }
}
