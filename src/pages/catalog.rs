//! Public catalog pages and the subscribe action.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::{Html, IntoResponse, Redirect, Response};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use uuid::Uuid;

use crate::auth::SessionAuth;
use crate::error::AppError;
use crate::state::AppState;

use super::render;

#[derive(Debug, Serialize)]
struct GymRow {
    id: Uuid,
    gym_name: String,
    address: Option<String>,
}

#[derive(Debug, Serialize)]
struct CoachRow {
    id: Uuid,
    first_name: String,
    last_name: String,
    specialization: String,
}

#[derive(Debug, Serialize)]
struct OfferRow {
    id: Uuid,
    price: i64,
    expire_date: String,
    description: String,
    held: bool,
}

#[derive(Debug, Serialize)]
struct CertificateRow {
    name: String,
    description: String,
}

pub async fn home(SessionAuth(principal): SessionAuth) -> Result<Response, AppError> {
    let mut ctx = tera::Context::new();
    ctx.insert("username", &principal.map(|p| p.username));
    Ok(render("home.html", &ctx)?.into_response())
}

pub async fn gyms(State(state): State<Arc<AppState>>) -> Result<Response, AppError> {
    let db = state.db();
    let rows: Vec<GymRow> = db
        .gyms()
        .map(|gym| GymRow {
            id: gym.id,
            gym_name: gym.gym_name.clone(),
            address: gym
                .address
                .and_then(|id| db.address(id))
                .map(|a| a.to_string()),
        })
        .collect();
    let mut ctx = tera::Context::new();
    ctx.insert("gyms", &rows);
    Ok(render("gyms.html", &ctx)?.into_response())
}

/// Gym detail is members-only: the viewer needs a session and a client row
/// before the subscription offers are shown.
pub async fn gym_detail(
    State(state): State<Arc<AppState>>,
    SessionAuth(principal): SessionAuth,
    Path(id): Path<Uuid>,
) -> Result<Response, AppError> {
    let Some(principal) = principal else {
        return Ok(Redirect::to("/accounts/login/").into_response());
    };
    let client_id = state.db().client_by_user(principal.user_id).map(|c| c.id);
    let Some(client_id) = client_id else {
        return Ok(Redirect::to("/accounts/profile/").into_response());
    };

    let db = state.db();
    let Some(gym) = db.gym(id) else {
        return Err(AppError::NotFound("gym"));
    };
    let coaches: Vec<CoachRow> = db
        .coaches_of_gym(id)
        .into_iter()
        .map(|coach| CoachRow {
            id: coach.id,
            first_name: coach.first_name.clone(),
            last_name: coach.last_name.clone(),
            specialization: coach.specialization.clone(),
        })
        .collect();
    let offers: Vec<OfferRow> = db
        .subscriptions_of_gym(id)
        .into_iter()
        .map(|sub| OfferRow {
            id: sub.id,
            price: sub.price,
            expire_date: sub.expire_date.to_string(),
            description: sub.description.clone().unwrap_or_default(),
            held: db.holds_subscription(client_id, sub.id),
        })
        .collect();

    let mut ctx = tera::Context::new();
    ctx.insert("gym_name", &gym.gym_name);
    ctx.insert(
        "address",
        &gym.address.and_then(|a| db.address(a)).map(|a| a.to_string()),
    );
    ctx.insert("coaches", &coaches);
    ctx.insert("offers", &offers);
    Ok(render("gym.html", &ctx)?.into_response())
}

pub async fn coaches(State(state): State<Arc<AppState>>) -> Result<Response, AppError> {
    let db = state.db();
    let rows: Vec<CoachRow> = db
        .coaches()
        .map(|coach| CoachRow {
            id: coach.id,
            first_name: coach.first_name.clone(),
            last_name: coach.last_name.clone(),
            specialization: coach.specialization.clone(),
        })
        .collect();
    let mut ctx = tera::Context::new();
    ctx.insert("coaches", &rows);
    Ok(render("coaches.html", &ctx)?.into_response())
}

pub async fn coach_detail(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
) -> Result<Response, AppError> {
    let db = state.db();
    let Some(coach) = db.coach(id) else {
        return Err(AppError::NotFound("coach"));
    };
    let certificates: Vec<CertificateRow> = db
        .certificates_of_coach(id)
        .into_iter()
        .map(|cert| CertificateRow {
            name: cert.name.clone(),
            description: cert.description.clone(),
        })
        .collect();
    let gyms: Vec<GymRow> = db
        .gyms_of_coach(id)
        .into_iter()
        .map(|gym| GymRow {
            id: gym.id,
            gym_name: gym.gym_name.clone(),
            address: None,
        })
        .collect();

    let mut ctx = tera::Context::new();
    ctx.insert("first_name", &coach.first_name);
    ctx.insert("last_name", &coach.last_name);
    ctx.insert("specialization", &coach.specialization);
    ctx.insert("certificates", &certificates);
    ctx.insert("gyms", &gyms);
    Ok(render("coach.html", &ctx)?.into_response())
}

#[derive(Debug, Deserialize)]
pub struct SubscribeQuery {
    pub id: Uuid,
}

/// Buys a subscription for the signed-in viewer's client. Any failure comes
/// back as the same generic message; the real cause goes to the log.
pub async fn subscribe(
    State(state): State<Arc<AppState>>,
    SessionAuth(principal): SessionAuth,
    Query(query): Query<SubscribeQuery>,
) -> Result<Response, AppError> {
    let Some(principal) = principal else {
        return Ok(Redirect::to("/accounts/login/").into_response());
    };
    let client_id = state.db().client_by_user(principal.user_id).map(|c| c.id);
    let outcome = match client_id {
        Some(client_id) => state.db_mut().subscribe(client_id, query.id),
        None => {
            tracing::warn!(username = %principal.username, "subscribe without a client row");
            return Ok(
                (StatusCode::BAD_REQUEST, Html("Something went wrong...")).into_response()
            );
        }
    };
    match outcome {
        Ok(()) => {
            tracing::info!(username = %principal.username, subscription = %query.id, "subscribed");
            Ok(Redirect::to("/accounts/profile/").into_response())
        }
        Err(err) => {
            tracing::warn!(
                username = %principal.username,
                subscription = %query.id,
                reason = %err,
                "subscribe rejected"
            );
            Ok((StatusCode::BAD_REQUEST, Html("Something went wrong...")).into_response())
        }
    }
}
