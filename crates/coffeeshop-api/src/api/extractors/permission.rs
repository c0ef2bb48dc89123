//! Permission-checking extractor
//!
//! Place it first in a handler's arguments: extractors run in order, so the
//! token is checked before the path or body is looked at.

use axum::{async_trait, extract::FromRequestParts, http::request::Parts};
use std::marker::PhantomData;
use tracing::warn;

use crate::{
    api::{auth::Permission, middleware::auth::{authorize, AuthContext}},
    error::ApiError,
    server::AppState,
};

/// Marker for the permission an endpoint requires
pub trait RequiredPermission: Send + Sync + 'static {
    const PERMISSION: Permission;
}

pub struct CanGetDrinksDetail;
pub struct CanPostDrinks;
pub struct CanPatchDrinks;
pub struct CanDeleteDrinks;

impl RequiredPermission for CanGetDrinksDetail {
    const PERMISSION: Permission = Permission::GetDrinksDetail;
}

impl RequiredPermission for CanPostDrinks {
    const PERMISSION: Permission = Permission::PostDrinks;
}

impl RequiredPermission for CanPatchDrinks {
    const PERMISSION: Permission = Permission::PatchDrinks;
}

impl RequiredPermission for CanDeleteDrinks {
    const PERMISSION: Permission = Permission::DeleteDrinks;
}

/// A request whose bearer token carries permission `P`
pub struct Authorized<P> {
    pub context: AuthContext,
    _permission: PhantomData<P>,
}

#[async_trait]
impl<P: RequiredPermission> FromRequestParts<AppState> for Authorized<P> {
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        let context = authorize(state, &parts.headers, P::PERMISSION)
            .await
            .map_err(|e| {
                warn!(
                    "Rejected {} {}: {} ({})",
                    parts.method,
                    parts.uri.path(),
                    e.code(),
                    e
                );
                ApiError::from(e)
            })?;

        Ok(Self {
            context,
            _permission: PhantomData,
        })
    }
}
