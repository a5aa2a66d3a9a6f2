pub mod auth;
pub mod savings;

use std::sync::Arc;

use axum::{
    http::HeaderValue,
    middleware,
    routing::{delete, get, post},
    Router,
};
use tower_http::{
    cors::{Any, CorsLayer},
    request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer},
    services::ServeDir,
    timeout::TimeoutLayer,
    trace::TraceLayer,
};

use crate::{auth::require_bearer, config::Config, main_lib::AppState};

pub async fn healthz() -> &'static str {
    "ok"
}

/// Builds the CORS layer from the configured origin list. Entries that
/// are not valid header values are skipped with a warning instead of
/// aborting startup.
fn cors_layer(allow: &[String]) -> CorsLayer {
    if allow.iter().any(|o| o == "*") {
        return CorsLayer::new().allow_origin(Any);
    }
    let origins = allow
        .iter()
        .filter_map(|o| match o.parse::<HeaderValue>() {
            Ok(origin) => Some(origin),
            Err(err) => {
                tracing::warn!("Skipping invalid CORS origin {:?}: {}", o, err);
                None
            }
        })
        .collect::<Vec<_>>();
    CorsLayer::new().allow_origin(origins)
}

pub fn app_router(state: Arc<AppState>, config: &Config) -> Router {
    let cors = cors_layer(&config.cors_allow);

    let public = Router::new()
        .route("/healthz", get(healthz))
        .route("/login", post(auth::login))
        .route("/user/register", post(auth::register))
        .route("/savings", get(savings::list_savings))
        .route("/savings/{id}", get(savings::show_saving));

    let protected = Router::new()
        .route("/logout", post(auth::logout))
        .route("/user", get(auth::current_user))
        .route("/savings", post(savings::create_saving))
        .route(
            "/savings/{id}",
            delete(savings::delete_saving)
                .put(savings::update_saving)
                .patch(savings::update_saving),
        )
        .route("/savings/{id}/add", post(savings::add_contribution))
        .route("/savings/status/{status}", get(savings::list_by_status))
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            require_bearer,
        ));

    Router::new()
        .nest("/api", public.merge(protected))
        .nest_service("/uploads", ServeDir::new(&config.upload_dir))
        .with_state(state)
        .layer(cors)
        .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
        .layer(PropagateRequestIdLayer::x_request_id())
        .layer(TimeoutLayer::new(config.request_timeout))
        .layer(TraceLayer::new_for_http())
}
