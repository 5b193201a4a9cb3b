//! Account pages: registration, login, logout, and the profile page with its
//! add-funds form.

use axum::Form;
use axum::extract::State;
use axum::response::{IntoResponse, Redirect, Response};
use axum_extra::extract::cookie::{Cookie, CookieJar};
use once_cell::sync::Lazy;
use regex::Regex;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use uuid::Uuid;

use crate::auth::{Principal, SESSION_COOKIE, SessionAuth};
use crate::domain::Client;
use crate::error::AppError;
use crate::identity::{IdentityError, NewUser, validate_password};
use crate::state::AppState;

use super::render;

static EMAIL_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").expect("email pattern parses"));

#[derive(Debug, Default, Deserialize)]
pub struct RegisterForm {
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub first_name: String,
    #[serde(default)]
    pub last_name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password1: String,
    #[serde(default)]
    pub password2: String,
}

#[derive(Debug, Deserialize)]
pub struct LoginForm {
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub password: String,
}

#[derive(Debug, Deserialize)]
pub struct AddFundsForm {
    #[serde(default)]
    pub money: Option<String>,
}

fn register_context(form: &RegisterForm, errors: &[String]) -> tera::Context {
    let mut ctx = tera::Context::new();
    ctx.insert("username", &form.username);
    ctx.insert("first_name", &form.first_name);
    ctx.insert("last_name", &form.last_name);
    ctx.insert("email", &form.email);
    ctx.insert("errors", errors);
    ctx
}

pub async fn register_page() -> Result<Response, AppError> {
    let form = RegisterForm::default();
    Ok(render("register.html", &register_context(&form, &[]))?.into_response())
}

pub async fn register(
    State(state): State<Arc<AppState>>,
    Form(form): Form<RegisterForm>,
) -> Result<Response, AppError> {
    let mut errors = Vec::new();
    if form.username.trim().is_empty() {
        errors.push("username may not be blank".to_string());
    }
    if !EMAIL_RE.is_match(&form.email) {
        errors.push("enter a valid email address".to_string());
    }
    if form.password1 != form.password2 {
        errors.push("the two password fields didn't match".to_string());
    } else if let Err(problems) = validate_password(&form.password1, &form.username) {
        errors.extend(problems);
    }
    if !errors.is_empty() {
        return Ok(render("register.html", &register_context(&form, &errors))?.into_response());
    }

    let user_id = {
        let mut directory = state.directory_mut();
        match directory.create_user(NewUser {
            username: form.username.clone(),
            first_name: form.first_name.clone(),
            last_name: form.last_name.clone(),
            email: form.email.clone(),
            password: form.password1.clone(),
            is_superuser: false,
        }) {
            Ok(id) => id,
            Err(IdentityError::UsernameTaken) => {
                errors.push("a user with that username already exists".to_string());
                return Ok(
                    render("register.html", &register_context(&form, &errors))?.into_response()
                );
            }
            Err(other) => return Err(AppError::Internal(other.into())),
        }
    };
    state
        .db_mut()
        .insert_client(Client::new(user_id, state.config().default_balance));
    tracing::info!(username = %form.username, "registered");
    Ok(Redirect::to("/accounts/login/").into_response())
}

pub async fn login_page() -> Result<Response, AppError> {
    let mut ctx = tera::Context::new();
    ctx.insert("error", &Option::<String>::None);
    Ok(render("login.html", &ctx)?.into_response())
}

pub async fn login(
    State(state): State<Arc<AppState>>,
    jar: CookieJar,
    Form(form): Form<LoginForm>,
) -> Result<Response, AppError> {
    let user_id = {
        let directory = state.directory();
        directory
            .authenticate(&form.username, &form.password)
            .map(|user| user.id)
    };
    let Some(user_id) = user_id else {
        let mut ctx = tera::Context::new();
        ctx.insert(
            "error",
            &Some("please enter a correct username and password"),
        );
        return Ok(render("login.html", &ctx)?.into_response());
    };
    let key = state
        .directory_mut()
        .open_session(user_id)
        .map_err(|err| AppError::Internal(err.into()))?;
    let jar = jar.add(Cookie::build((SESSION_COOKIE, key)).path("/").http_only(true));
    Ok((jar, Redirect::to("/accounts/profile/")).into_response())
}

pub async fn logout(State(state): State<Arc<AppState>>, jar: CookieJar) -> Response {
    if let Some(cookie) = jar.get(SESSION_COOKIE) {
        state.directory_mut().close_session(cookie.value());
    }
    let jar = jar.remove(Cookie::build(SESSION_COOKIE).path("/"));
    (jar, Redirect::to("/accounts/login/")).into_response()
}

#[derive(Debug, Serialize)]
struct HeldSubscription {
    id: Uuid,
    gym_name: String,
    price: i64,
    expire_date: String,
}

fn profile_context(state: &AppState, principal: &Principal, message: Option<&str>) -> tera::Context {
    let db = state.db();
    let client = db.client_by_user(principal.user_id).cloned();
    let mut ctx = tera::Context::new();
    ctx.insert("username", &principal.username);
    ctx.insert("message", &message);
    match client {
        Some(client) => {
            let subscriptions: Vec<HeldSubscription> = db
                .subscriptions_of_client(client.id)
                .into_iter()
                .map(|sub| HeldSubscription {
                    id: sub.id,
                    gym_name: db
                        .gym(sub.gym)
                        .map(|g| g.gym_name.clone())
                        .unwrap_or_default(),
                    price: sub.price,
                    expire_date: sub.expire_date.to_string(),
                })
                .collect();
            ctx.insert("net_worth", &client.net_worth);
            ctx.insert("subscriptions", &subscriptions);
        }
        None => {
            ctx.insert("net_worth", &Decimal::ZERO);
            ctx.insert("subscriptions", &Vec::<HeldSubscription>::new());
        }
    }
    ctx
}

/// Superusers are provisioned out of band and have no client row until they
/// first visit their profile. Check and insert happen under one write guard
/// so concurrent requests cannot race past the check.
fn ensure_client(state: &AppState, principal: &Principal) {
    if !principal.is_superuser {
        return;
    }
    let mut db = state.db_mut();
    if db.client_by_user(principal.user_id).is_none() {
        db.insert_client(Client::new(principal.user_id, state.config().default_balance));
    }
}

pub async fn profile(
    State(state): State<Arc<AppState>>,
    SessionAuth(principal): SessionAuth,
) -> Result<Response, AppError> {
    let Some(principal) = principal else {
        return Ok(Redirect::to("/accounts/login/").into_response());
    };
    ensure_client(&state, &principal);
    let ctx = profile_context(&state, &principal, None);
    Ok(render("profile.html", &ctx)?.into_response())
}

pub async fn add_funds(
    State(state): State<Arc<AppState>>,
    SessionAuth(principal): SessionAuth,
    Form(form): Form<AddFundsForm>,
) -> Result<Response, AppError> {
    let Some(principal) = principal else {
        return Ok(Redirect::to("/accounts/login/").into_response());
    };
    ensure_client(&state, &principal);

    let amount = form
        .money
        .as_deref()
        .map(str::trim)
        .filter(|raw| !raw.is_empty())
        .and_then(|raw| raw.parse::<Decimal>().ok());
    let message = match amount {
        None => "an error occurred, money field was not specified!".to_string(),
        Some(amount) if amount.is_zero() => {
            "an error occurred, money field was not specified!".to_string()
        }
        Some(amount) if amount < Decimal::ZERO => {
            "you can only add positive amount of money!".to_string()
        }
        Some(amount) => {
            let client_id = state.db().client_by_user(principal.user_id).map(|c| c.id);
            match client_id {
                Some(client_id) => match state.db_mut().add_funds(client_id, amount) {
                    Ok(balance) => {
                        tracing::info!(username = %principal.username, %amount, "funds added");
                        format!("added {amount}, your balance is now {balance}")
                    }
                    Err(err) => err.message,
                },
                None => "an error occurred, money field was not specified!".to_string(),
            }
        }
    };
    let ctx = profile_context(&state, &principal, Some(&message));
    Ok(render("profile.html", &ctx)?.into_response())
}
