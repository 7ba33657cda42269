use axum::{extract::FromRequestParts, http::request::Parts};
use uuid::Uuid;

use crate::error::AppError;
use crate::state::AppState;
use crate::utils::jwt;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    Judge,
    Admin,
}

impl Role {
    /// Judges are identified by their email domain; any other address is an admin.
    /// Callers without an email have no role.
    pub fn resolve(email: Option<&str>, judge_email_domain: &str) -> Option<Self> {
        let email = email.map(str::trim).filter(|e| !e.is_empty())?;
        let suffix = format!("@{}", judge_email_domain.to_ascii_lowercase());
        if email.to_ascii_lowercase().ends_with(&suffix) {
            Some(Role::Judge)
        } else {
            Some(Role::Admin)
        }
    }
}

/// Authenticated caller extracted from the `Authorization: Bearer <token>` header.
///
/// Add this as a handler parameter to require authentication.
/// Role checks happen via `require_judge()` / `require_admin()` in the handler body.
#[derive(Debug)]
pub struct AuthUser {
    pub user_id: Uuid,
    pub email: Option<String>,
    pub role: Option<Role>,
}

impl AuthUser {
    pub fn require_judge(&self) -> Result<(), AppError> {
        self.require(Role::Judge)
    }

    pub fn require_admin(&self) -> Result<(), AppError> {
        self.require(Role::Admin)
    }

    fn require(&self, role: Role) -> Result<(), AppError> {
        if self.role == Some(role) {
            Ok(())
        } else {
            Err(AppError::PermissionDenied)
        }
    }
}

impl FromRequestParts<AppState> for AuthUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let auth_header = parts
            .headers
            .get("Authorization")
            .and_then(|v| v.to_str().ok())
            .ok_or(AppError::TokenMissing)?;

        let token = auth_header
            .strip_prefix("Bearer ")
            .ok_or(AppError::TokenInvalid)?;

        let claims = jwt::verify(token, &state.config.auth.jwt_secret).map_err(|e| {
            tracing::debug!("rejected bearer token: {e}");
            AppError::TokenInvalid
        })?;

        let role = Role::resolve(claims.email.as_deref(), &state.config.auth.judge_email_domain);

        Ok(AuthUser {
            user_id: claims.sub,
            email: claims.email,
            role,
        })
    }
}
