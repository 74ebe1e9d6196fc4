//! Shared application state and the caller identity extractor.

use std::sync::Arc;

use axum::extract::FromRequestParts;
use axum::http::HeaderName;
use axum::http::request::Parts;
use surrealdb::Surreal;
use surrealdb::engine::any::Any;
use warden_admin::{
    AdminConfig, CallerContext, IdentityResolver, PrincipalIdentityResolver,
    ResourceServerManager,
};
use warden_core::models::owner::Owner;
use warden_db::SurrealTransactionManager;
use warden_db::repository::SurrealResourceServerRepository;

use crate::error::ApiError;

pub type Manager =
    ResourceServerManager<SurrealResourceServerRepository<Any>, SurrealTransactionManager<Any>>;

#[derive(Clone)]
pub struct AppState {
    pub manager: Arc<Manager>,
    pub identity: Arc<dyn IdentityResolver>,
    pub identity_header: HeaderName,
}

impl AppState {
    pub fn new(db: Surreal<Any>, config: AdminConfig, identity_header: HeaderName) -> Self {
        let manager = ResourceServerManager::new(
            SurrealResourceServerRepository::new(db.clone()),
            SurrealTransactionManager::new(db),
            config,
        );
        Self {
            manager: Arc::new(manager),
            identity: Arc::new(PrincipalIdentityResolver),
            identity_header,
        }
    }
}

/// Owner resolved from the trusted identity header.
pub struct CallerOwner(pub Owner);

impl FromRequestParts<AppState> for CallerOwner {
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        let principal = parts
            .headers
            .get(&state.identity_header)
            .and_then(|value| value.to_str().ok())
            .map(str::to_owned);

        let owner = state.identity.resolve_owner(&CallerContext { principal })?;
        Ok(Self(owner))
    }
}
