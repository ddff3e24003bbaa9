use axum::{routing::get, Router};

use crate::database::Service;
use crate::server::AppState;

use super::health::health;

pub fn api_routes<S>() -> Router<AppState<S>>
where
    S: Service + 'static,
{
    Router::new().route("/health", get(health::<S>))
}
