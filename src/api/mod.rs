//! REST CRUD surface.
//!
//! Five entity resources share one generic route factory
//! ([`resource::resource_routes`]) and one access rule
//! ([`crate::auth::authorize`]). The client resource is deliberately
//! excluded from the generic surface; its only route is the bespoke signup
//! endpoint that provisions a principal and issues an access token.

mod client;
mod resource;
mod resources;

pub use resource::{RestResource, resource_routes};
pub use resources::{
    AddressResource, CertificateResource, CoachResource, GymResource, SubscriptionResource,
};

use axum::Router;
use axum::routing::post;
use std::sync::Arc;

use crate::state::AppState;

pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .merge(resource_routes::<GymResource>())
        .merge(resource_routes::<CoachResource>())
        .merge(resource_routes::<AddressResource>())
        .merge(resource_routes::<CertificateResource>())
        .merge(resource_routes::<SubscriptionResource>())
        .route("/client/", post(client::signup))
}
