//! Server-rendered page routes.
//!
//! Pages authenticate with the session cookie and respond with redirects
//! instead of error statuses when the viewer is not signed in. Templates are
//! compiled into the binary and rendered through one shared Tera instance.

mod account;
mod catalog;

use axum::Router;
use axum::response::Html;
use axum::routing::{get, post};
use once_cell::sync::Lazy;
use std::sync::Arc;
use tera::Tera;

use crate::error::AppError;
use crate::state::AppState;

static TEMPLATES: Lazy<Tera> = Lazy::new(|| {
    let mut tera = Tera::default();
    tera.add_raw_templates([
        ("base.html", include_str!("../../templates/base.html")),
        ("home.html", include_str!("../../templates/home.html")),
        ("register.html", include_str!("../../templates/register.html")),
        ("login.html", include_str!("../../templates/login.html")),
        ("profile.html", include_str!("../../templates/profile.html")),
        ("gyms.html", include_str!("../../templates/gyms.html")),
        ("gym.html", include_str!("../../templates/gym.html")),
        ("coaches.html", include_str!("../../templates/coaches.html")),
        ("coach.html", include_str!("../../templates/coach.html")),
    ])
    .expect("embedded templates parse");
    tera
});

fn render(name: &str, context: &tera::Context) -> Result<Html<String>, AppError> {
    let body = TEMPLATES
        .render(name, context)
        .map_err(|err| AppError::Internal(err.into()))?;
    Ok(Html(body))
}

pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/", get(catalog::home))
        .route(
            "/accounts/register/",
            get(account::register_page).post(account::register),
        )
        .route(
            "/accounts/login/",
            get(account::login_page).post(account::login),
        )
        .route("/accounts/logout/", get(account::logout))
        .route(
            "/accounts/profile/",
            get(account::profile).post(account::add_funds),
        )
        .route("/gyms/", get(catalog::gyms))
        .route("/gyms/{id}/", get(catalog::gym_detail))
        .route("/coaches/", get(catalog::coaches))
        .route("/coaches/{id}/", get(catalog::coach_detail))
        .route("/subscribe/", post(catalog::subscribe))
}
