use axum::debug_handler;
use axum::extract::State;
use axum::extract::rejection::JsonRejection;
use axum::Json;
use http::{HeaderMap, StatusCode};
use log::{error, info};
use opentelemetry::global;
use opentelemetry::trace::{Span, Tracer};
use crate::error::errors::Error;
use crate::extractor::image_body::ImageBody;
use crate::logger::logger::{clear_request_id, set_request_id};
use crate::middleware::request_id_mw::request_id;
use crate::models::face_model::{
    EncodingOutput, ImageInput, LivenessOutput, MatchFaceInput, MatchOutput, VerificationOutput,
};
use crate::response::common_response::{GeneralResponseBuilder, GeneralResponseResult};
use crate::state::face_state::FaceState;

const TRACER_NAME: &str = env!("CARGO_PKG_NAME");

#[debug_handler(state = FaceState)]
pub async fn check_liveness(headers: HeaderMap, State(state): State<FaceState>, ImageBody(im_bytes): ImageBody) -> GeneralResponseResult<LivenessOutput> {
    let mut span = global::tracer(TRACER_NAME).start("check-liveness");
    set_request_id(&request_id(&headers));
    info!("received liveness request of {} bytes", im_bytes.len());

    let result = state.face_service.check_liveness(ImageInput { im_bytes }).await;
    info!("completed liveness request");

    clear_request_id();
    span.end();
    respond(result)
}

#[debug_handler(state = FaceState)]
pub async fn verify_face(headers: HeaderMap, State(state): State<FaceState>, ImageBody(im_bytes): ImageBody) -> GeneralResponseResult<VerificationOutput> {
    let mut span = global::tracer(TRACER_NAME).start("verify-face");
    set_request_id(&request_id(&headers));
    info!("received face verification request of {} bytes", im_bytes.len());

    let result = state.face_service.verify_face(ImageInput { im_bytes }).await;
    info!("completed face verification request");

    clear_request_id();
    span.end();
    respond(result)
}

#[debug_handler(state = FaceState)]
pub async fn extract_encoding(headers: HeaderMap, State(state): State<FaceState>, ImageBody(im_bytes): ImageBody) -> GeneralResponseResult<EncodingOutput> {
    let mut span = global::tracer(TRACER_NAME).start("extract-encoding");
    set_request_id(&request_id(&headers));
    info!("received encoding extraction request of {} bytes", im_bytes.len());

    let result = state.face_service.extract_encoding(ImageInput { im_bytes }).await;
    info!("completed encoding extraction request");

    clear_request_id();
    span.end();
    respond(result)
}

#[debug_handler(state = FaceState)]
pub async fn match_face(headers: HeaderMap, State(state): State<FaceState>, payload: Result<Json<MatchFaceInput>, JsonRejection>) -> GeneralResponseResult<MatchOutput> {
    let Json(input) = match payload {
        Ok(payload) => payload,
        Err(rejection) => {
            error!("invalid match request: {rejection}");
            if rejection.status() == StatusCode::PAYLOAD_TOO_LARGE {
                return Err(Error::PayloadTooLarge)
            }
            return Err(Error::Validation(rejection.body_text()))
        }
    };

    let mut span = global::tracer(TRACER_NAME).start("match-face");
    set_request_id(&request_id(&headers));
    info!("received face match request against {} encodings", input.encodings.len());

    let result = state.face_service.match_face(input).await;
    info!("completed face match request");

    clear_request_id();
    span.end();
    respond(result)
}

fn respond<T: serde::Serialize>(result: Result<T, Error>) -> GeneralResponseResult<T> {
    let output = result?;

    Ok(GeneralResponseBuilder::new()
        .status_code(StatusCode::OK)
        .body(output)
        .build())
}
