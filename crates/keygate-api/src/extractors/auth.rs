//! `AuthUser` extractor: pulls the bearer token, resolves the account, and
//! injects a request context.

use axum::extract::FromRequestParts;
use axum::http::request::Parts;

use keygate_core::error::AppError;
use keygate_entity::user::User;
use keygate_service::context::RequestContext;

use crate::error::ApiError;
use crate::extractors::client::{client_ip, user_agent};
use crate::state::AppState;

/// Authenticated account available in handlers.
#[derive(Debug, Clone)]
pub struct AuthUser {
    /// Context handed to services.
    pub ctx: RequestContext,
    /// The account as currently stored.
    pub user: User,
}

impl std::ops::Deref for AuthUser {
    type Target = RequestContext;
    fn deref(&self) -> &Self::Target {
        &self.ctx
    }
}

impl FromRequestParts<AppState> for AuthUser {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let token = parts
            .headers
            .get("authorization")
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.split_whitespace().nth(1))
            .ok_or_else(|| AppError::authentication("Access token required"))?;

        let user = state.auth.authenticate(token).await?;
        let ctx = RequestContext::new(user.id, user.role, client_ip(parts), user_agent(parts));
        Ok(Self { ctx, user })
    }
}

/// An [`AuthUser`] whose role is admin.
#[derive(Debug, Clone)]
pub struct AdminUser(pub AuthUser);

impl std::ops::Deref for AdminUser {
    type Target = RequestContext;
    fn deref(&self) -> &Self::Target {
        &self.0.ctx
    }
}

impl FromRequestParts<AppState> for AdminUser {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let auth = AuthUser::from_request_parts(parts, state).await?;
        if !auth.ctx.is_admin() {
            return Err(AppError::authorization("Admin access required").into());
        }
        Ok(Self(auth))
    }
}
