//! HTTP/WebSocket ingress: thin warp layer over the use cases and the hub.

pub mod handlers;
pub mod routes;

use std::sync::Arc;

use warp::{Filter, Rejection, Reply};

use crate::services::AppServices;

/// All routes: REST API (with CORS) plus the WebSocket subscription endpoint.
pub fn routes(
    services: Arc<AppServices>,
    allowed_origin: &str,
) -> impl Filter<Extract = impl Reply, Error = Rejection> + Clone {
    let cors = if allowed_origin == "*" {
        warp::cors().allow_any_origin()
    } else {
        warp::cors().allow_origin(allowed_origin)
    }
    .allow_methods(vec!["GET", "POST"])
    .allow_headers(vec!["content-type"])
    .build();

    let api = routes::clipboard::routes(services.clone()).with(cors);
    let ws = handlers::websocket::route(services.hub.clone());

    ws.or(api)
}
