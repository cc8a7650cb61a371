//! Request extractors.

use axum::{extract::FromRequestParts, http::request::Parts};
use lectro_common::{AppError, AppResult};
use lectro_core::Claims;
use lectro_db::entities::user::UserRole;

/// Authenticated user extractor.
#[derive(Debug, Clone)]
pub struct AuthUser(pub Claims);

impl AuthUser {
    /// The user's ID.
    #[must_use]
    pub fn id(&self) -> &str {
        &self.0.sub
    }

    /// The user's role.
    #[must_use]
    pub const fn role(&self) -> UserRole {
        self.0.role
    }

    /// Fail with `Forbidden` unless the user holds one of `roles`.
    pub fn require_role(&self, roles: &[UserRole]) -> AppResult<()> {
        if roles.contains(&self.0.role) {
            Ok(())
        } else {
            Err(AppError::Forbidden(format!(
                "Role {} cannot access this resource",
                self.0.role
            )))
        }
    }
}

impl<S> FromRequestParts<S> for AuthUser
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        // Claims are set by the auth middleware
        parts
            .extensions
            .get::<Claims>()
            .cloned()
            .map(AuthUser)
            .ok_or_else(|| AppError::Unauthorized("Authentication required".into()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn user_with(role: UserRole) -> AuthUser {
        AuthUser(Claims {
            sub: "u1".to_string(),
            role,
            name: "Test".to_string(),
            university_id: "U001".to_string(),
            batch: None,
            iat: 0,
            exp: 0,
            iss: "lectro".to_string(),
        })
    }

    #[test]
    fn test_require_role() {
        let hod = user_with(UserRole::Hod);

        assert!(hod.require_role(&[UserRole::Hod, UserRole::Admin]).is_ok());
        assert!(matches!(
            hod.require_role(&[UserRole::Lecturer]),
            Err(AppError::Forbidden(_))
        ));
    }
}
