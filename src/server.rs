use axum::{
    extract::{Request, State},
    http::{Method, StatusCode},
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use std::any::Any;
use std::sync::Arc;
use tower_http::{
    catch_panic::CatchPanicLayer,
    compression::CompressionLayer,
    cors::{Any as AnyOrigin, CorsLayer},
    trace::TraceLayer,
};
use tracing::error;

use crate::api::{self, ApiDescription, ApiError, ErrorBody};
use crate::config::Config;
use crate::service::RecommendationService;

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub service: Arc<RecommendationService>,
}

impl AppState {
    pub fn new(config: Config, service: Arc<RecommendationService>) -> Self {
        Self {
            config: Arc::new(config),
            service,
        }
    }
}

pub fn build_router(state: AppState) -> Router {
    build_router_with(state, Router::new())
}

/// Like `build_router`, with `extra` routes mounted next to the API routes
/// and wrapped by the same middleware.
pub fn build_router_with(state: AppState, extra: Router<AppState>) -> Router {
    let api_routes = Router::new()
        .route(
            "/api/status",
            get(api::get_status).fallback(method_not_allowed),
        )
        .route(
            "/api/emotions",
            get(api::list_emotions)
                .post(api::record_emotion)
                .fallback(method_not_allowed),
        )
        .route(
            "/api/recommendations/:emotion",
            get(api::get_recommendations).fallback(method_not_allowed),
        )
        .route(
            "/api/music/:track_id",
            get(api::get_track).fallback(method_not_allowed),
        )
        .route(
            "/api/session",
            get(api::get_session).fallback(method_not_allowed),
        )
        .merge(extra)
        .fallback(fallback_handler)
        .layer(CatchPanicLayer::custom(handle_panic))
        .with_state(state);

    // Path normalization has to run before routing, so the API router sits
    // behind an empty outer router that only carries middleware.
    Router::new()
        .fallback_service(api_routes)
        .layer(axum::middleware::from_fn(crate::middleware::normalize_path))
        .layer(axum::middleware::from_fn(crate::middleware::log_request))
        .layer(
            CorsLayer::new()
                .allow_origin(AnyOrigin)
                .allow_methods(AnyOrigin)
                .allow_headers(AnyOrigin),
        )
        .layer(CompressionLayer::new())
        .layer(TraceLayer::new_for_http())
}

async fn fallback_handler(State(state): State<AppState>, req: Request) -> Response {
    let method = req.method();
    if method == Method::GET || method == Method::HEAD {
        return Json(ApiDescription::new(&state.config.service_name)).into_response();
    }
    // Preflights normally never get here, the CORS layer answers them.
    if method == Method::OPTIONS {
        return StatusCode::OK.into_response();
    }

    (
        StatusCode::NOT_FOUND,
        Json(ErrorBody {
            error: "Not found".to_string(),
        }),
    )
        .into_response()
}

async fn method_not_allowed() -> Response {
    (
        StatusCode::METHOD_NOT_ALLOWED,
        Json(ErrorBody {
            error: "Method not allowed".to_string(),
        }),
    )
        .into_response()
}

fn handle_panic(err: Box<dyn Any + Send + 'static>) -> Response {
    let detail = if let Some(s) = err.downcast_ref::<String>() {
        s.as_str()
    } else if let Some(s) = err.downcast_ref::<&str>() {
        s
    } else {
        "unknown panic"
    };
    error!(panic = detail, "Handler panicked");

    ApiError::Internal("Internal server error".to_string()).into_response()
}
