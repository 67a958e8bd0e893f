use std::sync::Arc;
use std::time::Duration;

use axum::{BoxError, Json, middleware, Router};
use axum::error_handling::HandleErrorLayer;
use axum::http::header;
use axum::routing::get;
use http::{StatusCode, Uri};
use log::error;
use serde::{Deserialize, Serialize};
use tower::ServiceBuilder;
use tower_http::cors::CorsLayer;
use tower_http::propagate_header::PropagateHeaderLayer;
use crate::config::settings::Server;
use crate::error::errors::Error;
use crate::middleware::request_id_mw::{generate_request_id_mw, REQUEST_ID_HEADER};
use crate::models::face_model::HealthOutput;
use crate::pipeline::face_pipeline::face_pipeline::FaceBackend;
use crate::pipeline::module::face_comparison::FaceComparison;
use crate::response::common_response::{GeneralResponseBuilder, GeneralResponseResult};
use crate::routes::face_routes::new_face_routes;
use crate::state::face_state::FaceState;

#[derive(Clone, Serialize, Deserialize)]
struct FallbackResponse {
    message: String,
}


#[derive(Clone)]
pub struct RouterState {
    face_pipeline: Arc<dyn FaceBackend>,
    face_comparison: FaceComparison,
}

impl RouterState {
    pub fn new(face_pipeline: Arc<dyn FaceBackend>, face_comparison: FaceComparison) -> Self {
         RouterState {
             face_pipeline,
             face_comparison,
        }
    }
}

pub fn root_routes(router_state: RouterState, server: &Server) -> Router {

    let face_router = {
        let face_state = FaceState::new(&router_state.face_pipeline, router_state.face_comparison);
        new_face_routes(server.body_limit())
            .with_state(face_state)
    };

    let app_router = Router::new()
        .route("/health", get(healthcheck))
        .merge(face_router)
        // layers only wrap what is registered before them
        .fallback(fallback)
        .layer(PropagateHeaderLayer::new(header::HeaderName::from_static(REQUEST_ID_HEADER)))
        .layer(CorsLayer::permissive())
        .layer(middleware::from_fn(generate_request_id_mw))
        .layer(
            ServiceBuilder::new()
                .layer(HandleErrorLayer::new(handle_timeout_error))
                .timeout(Duration::from_secs(server.request_timeout())),
        );
    app_router
}

async fn handle_timeout_error(err: BoxError) -> Error {
    if err.is::<tower::timeout::error::Elapsed>() {
        return Error::Timeout
    }

    error!("unhandled middleware error: {err}");
    Error::server("internal server error")
}

async fn fallback(uri: Uri) -> (StatusCode, Json<FallbackResponse>) {
    (StatusCode::NOT_FOUND, Json(FallbackResponse {
        message: format!("No route for {uri}"),
    }))
}

async fn healthcheck() -> GeneralResponseResult<HealthOutput> {
    Ok(GeneralResponseBuilder::new()
        .status_code(StatusCode::OK)
        .body(HealthOutput { status: "ok" })
        .build())
}
