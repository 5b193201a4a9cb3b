//! Client signup: the one bespoke, side-effecting create in the API.
//!
//! Provisions the identity principal, creates the linked client row with the
//! configured starting balance, and issues an access token in a single
//! request.

use axum::Json;
use axum::extract::State;
use axum::http::StatusCode;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use uuid::Uuid;

use crate::domain::Client;
use crate::error::AppError;
use crate::identity::{IdentityError, NewUser};
use crate::state::AppState;
use crate::validate::FieldError;

#[derive(Debug, Deserialize)]
pub struct ClientSignup {
    pub username: String,
    pub email: String,
    pub password: String,
}

#[derive(Debug, Serialize)]
pub struct ClientSignupResponse {
    pub id: Uuid,
    pub username: String,
    pub email: String,
    /// Opaque bearer token for the REST surface. Returned once, at signup.
    pub token: String,
}

pub async fn signup(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<ClientSignup>,
) -> Result<(StatusCode, Json<ClientSignupResponse>), AppError> {
    if payload.username.trim().is_empty() {
        return Err(FieldError::new("username", "this field may not be blank").into());
    }
    if payload.password.is_empty() {
        return Err(FieldError::new("password", "this field may not be blank").into());
    }

    let (user_id, token) = {
        let mut directory = state.directory_mut();
        let user_id = directory
            .create_user(NewUser {
                username: payload.username.clone(),
                email: payload.email.clone(),
                password: payload.password,
                ..NewUser::default()
            })
            .map_err(|err| match err {
                IdentityError::UsernameTaken => AppError::Validation(FieldError::new(
                    "username",
                    "a user with that username already exists",
                )),
                other => AppError::Internal(other.into()),
            })?;
        let token = directory
            .issue_token(user_id)
            .map_err(|err| AppError::Internal(err.into()))?;
        (user_id, token)
    };

    let client = Client::new(user_id, state.config().default_balance);
    let client_id = state.db_mut().insert_client(client);
    tracing::info!(username = %payload.username, %client_id, "client signup");

    Ok((
        StatusCode::CREATED,
        Json(ClientSignupResponse {
            id: client_id,
            username: payload.username,
            email: payload.email,
            token,
        }),
    ))
}
