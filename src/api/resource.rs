//! Generic per-entity CRUD endpoints.
//!
//! A resource is an entity type plus its transport mapping: deserialize a
//! payload, resolve referenced identifiers, validate, store. The route
//! factory stamps out list/retrieve/create/update/delete handlers so the
//! five entity resources carry no per-entity routing code.

use axum::extract::{Path, State};
use axum::http::{Method, StatusCode};
use axum::routing::get;
use axum::{Json, Router};
use serde::Serialize;
use serde::de::DeserializeOwned;
use std::sync::Arc;
use uuid::Uuid;

use crate::auth::{BearerAuth, authorize};
use crate::error::AppError;
use crate::state::AppState;
use crate::store::Database;

pub trait RestResource: Send + Sync + 'static {
    /// URL segment for this resource, e.g. "gym" -> `/rest/gym/`.
    const NAME: &'static str;

    type Payload: DeserializeOwned + Send + 'static;
    type Repr: Serialize + Send;

    fn list(db: &Database) -> Vec<Self::Repr>;
    fn retrieve(db: &Database, id: Uuid) -> Result<Self::Repr, AppError>;
    fn create(db: &mut Database, payload: Self::Payload) -> Result<Self::Repr, AppError>;
    fn update(db: &mut Database, id: Uuid, payload: Self::Payload)
    -> Result<Self::Repr, AppError>;
    fn delete(db: &mut Database, id: Uuid) -> Result<(), AppError>;
}

pub fn resource_routes<R: RestResource>() -> Router<Arc<AppState>> {
    Router::new()
        .route(
            &format!("/{}/", R::NAME),
            get(list::<R>).post(create::<R>),
        )
        .route(
            &format!("/{}/{{id}}/", R::NAME),
            get(retrieve::<R>)
                .put(update::<R>)
                .patch(reject_method)
                .delete(destroy::<R>),
        )
}

/// Methods outside the supported set still go through the access rule, which
/// denies them for every principal.
async fn reject_method(BearerAuth(principal): BearerAuth) -> Result<(), AppError> {
    authorize(&Method::PATCH, principal.as_ref())?;
    Ok(())
}

async fn list<R: RestResource>(
    State(state): State<Arc<AppState>>,
    BearerAuth(principal): BearerAuth,
) -> Result<Json<Vec<R::Repr>>, AppError> {
    authorize(&Method::GET, principal.as_ref())?;
    Ok(Json(R::list(&state.db())))
}

async fn retrieve<R: RestResource>(
    State(state): State<Arc<AppState>>,
    BearerAuth(principal): BearerAuth,
    Path(id): Path<Uuid>,
) -> Result<Json<R::Repr>, AppError> {
    authorize(&Method::GET, principal.as_ref())?;
    R::retrieve(&state.db(), id).map(Json)
}

async fn create<R: RestResource>(
    State(state): State<Arc<AppState>>,
    BearerAuth(principal): BearerAuth,
    Json(payload): Json<R::Payload>,
) -> Result<(StatusCode, Json<R::Repr>), AppError> {
    let principal = authorize(&Method::POST, principal.as_ref())?;
    tracing::info!(resource = R::NAME, user = %principal.username, "create");
    let repr = R::create(&mut state.db_mut(), payload)?;
    Ok((StatusCode::CREATED, Json(repr)))
}

async fn update<R: RestResource>(
    State(state): State<Arc<AppState>>,
    BearerAuth(principal): BearerAuth,
    Path(id): Path<Uuid>,
    Json(payload): Json<R::Payload>,
) -> Result<Json<R::Repr>, AppError> {
    let principal = authorize(&Method::PUT, principal.as_ref())?;
    tracing::info!(resource = R::NAME, user = %principal.username, %id, "update");
    R::update(&mut state.db_mut(), id, payload).map(Json)
}

async fn destroy<R: RestResource>(
    State(state): State<Arc<AppState>>,
    BearerAuth(principal): BearerAuth,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, AppError> {
    let principal = authorize(&Method::DELETE, principal.as_ref())?;
    tracing::info!(resource = R::NAME, user = %principal.username, %id, "delete");
    R::delete(&mut state.db_mut(), id)?;
    Ok(StatusCode::NO_CONTENT)
}
