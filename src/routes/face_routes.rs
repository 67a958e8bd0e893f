use axum::extract::DefaultBodyLimit;
use axum::Router;
use axum::routing::post;
use tower_http::limit::RequestBodyLimitLayer;
use crate::handler::face_handler::{check_liveness, extract_encoding, match_face, verify_face};
use crate::state::face_state::FaceState;

pub fn new_face_routes(body_limit: usize) -> Router<FaceState> {

    let router = Router::new()
        .route("/check-liveness", post(check_liveness))
        .route("/verify-face", post(verify_face))
        .route("/extract-encoding", post(extract_encoding))
        .route("/match-face", post(match_face))
        .layer(DefaultBodyLimit::disable())
        .layer(RequestBodyLimitLayer::new(body_limit));
    router
}
