//! Authentication and the access-control policy.
//!
//! The REST surface authenticates with an opaque bearer token
//! (`Authorization: Token <key>` or `Bearer <key>`); pages authenticate with
//! a session cookie. Both resolve to a [`Principal`] through the identity
//! directory, and the principal is passed explicitly into handlers. There
//! is no ambient "current user".

use axum::extract::FromRequestParts;
use axum::http::{Method, header, request::Parts};
use axum_extra::extract::cookie::CookieJar;
use serde::Serialize;
use std::sync::Arc;
use uuid::Uuid;

use crate::error::AppError;
use crate::identity::User;
use crate::state::AppState;

pub const SESSION_COOKIE: &str = "gymdesk_session";

#[derive(Debug, Clone, Serialize)]
pub struct Principal {
    pub user_id: Uuid,
    pub username: String,
    pub is_superuser: bool,
}

impl From<&User> for Principal {
    fn from(user: &User) -> Self {
        Self {
            user_id: user.id,
            username: user.username.clone(),
            is_superuser: user.is_superuser,
        }
    }
}

/// The single authorization rule for the CRUD surface: safe methods need an
/// authenticated principal, mutating methods need a superuser, everything
/// else is denied.
pub fn authorize(method: &Method, principal: Option<&Principal>) -> Result<Principal, AppError> {
    match *method {
        Method::GET | Method::HEAD | Method::OPTIONS => {
            principal.cloned().ok_or(AppError::Unauthorized)
        }
        Method::POST | Method::PUT | Method::DELETE => match principal {
            None => Err(AppError::Unauthorized),
            Some(p) if p.is_superuser => Ok(p.clone()),
            Some(_) => Err(AppError::Forbidden),
        },
        _ => Err(AppError::Forbidden),
    }
}

/// Bearer-token authentication for the REST surface. Absent credentials
/// yield `None`; a present but unknown token is rejected outright.
pub struct BearerAuth(pub Option<Principal>);

impl FromRequestParts<Arc<AppState>> for BearerAuth {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &Arc<AppState>,
    ) -> Result<Self, Self::Rejection> {
        let Some(header_value) = parts.headers.get(header::AUTHORIZATION) else {
            return Ok(Self(None));
        };
        let raw = header_value.to_str().map_err(|_| AppError::Unauthorized)?;
        let token = raw
            .strip_prefix("Token ")
            .or_else(|| raw.strip_prefix("Bearer "))
            .ok_or(AppError::Unauthorized)?
            .trim();
        let directory = state.directory();
        let user = directory.token_owner(token).ok_or(AppError::Unauthorized)?;
        Ok(Self(Some(Principal::from(user))))
    }
}

/// Session-cookie authentication for the page routes. Never rejects; pages
/// decide themselves whether to redirect to login.
pub struct SessionAuth(pub Option<Principal>);

impl FromRequestParts<Arc<AppState>> for SessionAuth {
    type Rejection = std::convert::Infallible;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &Arc<AppState>,
    ) -> Result<Self, Self::Rejection> {
        let jar = CookieJar::from_headers(&parts.headers);
        let principal = jar.get(SESSION_COOKIE).and_then(|cookie| {
            let directory = state.directory();
            directory
                .session_owner(cookie.value())
                .map(Principal::from)
        });
        Ok(Self(principal))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn principal(is_superuser: bool) -> Principal {
        Principal {
            user_id: Uuid::new_v4(),
            username: "ada".into(),
            is_superuser,
        }
    }

    #[test]
    fn safe_methods_require_authentication() {
        for method in [Method::GET, Method::HEAD, Method::OPTIONS] {
            assert!(matches!(
                authorize(&method, None),
                Err(AppError::Unauthorized)
            ));
            assert!(authorize(&method, Some(&principal(false))).is_ok());
        }
    }

    #[test]
    fn mutating_methods_require_superuser() {
        for method in [Method::POST, Method::PUT, Method::DELETE] {
            assert!(matches!(
                authorize(&method, None),
                Err(AppError::Unauthorized)
            ));
            assert!(matches!(
                authorize(&method, Some(&principal(false))),
                Err(AppError::Forbidden)
            ));
            assert!(authorize(&method, Some(&principal(true))).is_ok());
        }
    }

    #[test]
    fn other_methods_are_denied() {
        assert!(matches!(
            authorize(&Method::PATCH, Some(&principal(true))),
            Err(AppError::Forbidden)
        ));
    }
}
