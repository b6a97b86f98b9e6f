//! `AuthUser` extractor: the identity verified by the bearer gate.

use axum::extract::FromRequestParts;
use axum::http::request::Parts;

use handsoft_core::error::AppError;
use handsoft_service::RequestContext;

use crate::error::ApiError;

/// Authenticated caller available in handlers.
///
/// Only routes guarded by a chain containing [`Guard::Bearer`] carry an
/// identity; elsewhere extraction fails with 401.
///
/// [`Guard::Bearer`]: crate::middleware::Guard::Bearer
#[derive(Debug, Clone)]
pub struct AuthUser(pub RequestContext);

impl AuthUser {
    /// Returns the inner `RequestContext`.
    pub fn context(&self) -> &RequestContext {
        &self.0
    }
}

impl std::ops::Deref for AuthUser {
    type Target = RequestContext;
    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl<S> FromRequestParts<S> for AuthUser
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<RequestContext>()
            .cloned()
            .map(AuthUser)
            .ok_or_else(|| ApiError(AppError::authentication("Authentication required")))
    }
}
