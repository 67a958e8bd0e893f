use axum::Json;
use axum::response::{IntoResponse, Response};
use http::StatusCode;
use serde::Serialize;
use serde_json::json;


#[derive(Copy, Clone, Serialize)]
#[repr(u16)]
pub enum ResponseCode {
    ErrorCodeInput = 2,
    ErrorCodeServer = 3,
    ErrorCodeTimeout = 4,
    ErrorCodeValidation = 6,
    ErrorCodeMediaType = 7,
    ErrorCodePayloadSize = 8,
}

impl ResponseCode {
    pub fn response_code(v: ResponseCode) -> u16 {
        v as u16
    }
}

#[derive(thiserror::Error, Debug)]
pub enum Error {
    #[error("{0}")]
    BadRequest(String),

    #[error("Unsupported Content-Type")]
    UnsupportedMediaType,

    #[error("{0}")]
    Validation(String),

    #[error("request body too large")]
    PayloadTooLarge,

    #[error("invalid image")]
    InvalidImage,

    #[error("{0}")]
    Server(String),

    #[error("server timeout")]
    Timeout,
}

impl Error {
    fn get_codes(&self) -> (StatusCode, u16) {
        match *self {
            // 4XX Errors
            Error::BadRequest(_) | Error::InvalidImage => (StatusCode::BAD_REQUEST, ResponseCode::response_code(ResponseCode::ErrorCodeInput)),
            Error::UnsupportedMediaType => (StatusCode::UNSUPPORTED_MEDIA_TYPE, ResponseCode::response_code(ResponseCode::ErrorCodeMediaType)),
            Error::Validation(_) => (StatusCode::UNPROCESSABLE_ENTITY, ResponseCode::response_code(ResponseCode::ErrorCodeValidation)),
            Error::PayloadTooLarge => (StatusCode::PAYLOAD_TOO_LARGE, ResponseCode::response_code(ResponseCode::ErrorCodePayloadSize)),

            // 5XX Errors
            Error::Server(_) => (StatusCode::INTERNAL_SERVER_ERROR, ResponseCode::response_code(ResponseCode::ErrorCodeServer)),
            Error::Timeout => (StatusCode::GATEWAY_TIMEOUT, ResponseCode::response_code(ResponseCode::ErrorCodeTimeout)),
        }
    }

    pub fn bad_request(message: impl Into<String>) -> Self {
        Error::BadRequest(message.into())
    }

    pub fn server(message: impl Into<String>) -> Self {
        Error::Server(message.into())
    }

    pub fn status_code(&self) -> StatusCode {
        self.get_codes().0
    }
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        let (status_code, code) = self.get_codes();
        let message = self.to_string();
        let body = Json(json!({ "code": code, "message": message }));

        (status_code, body).into_response()
    }
}

#[cfg(test)]
mod tests {
    use http_body_util::BodyExt;
    use serde_json::Value;
    use super::*;

    #[test]
    fn test_status_codes() {
        assert_eq!(Error::bad_request("No file uploaded").status_code(), StatusCode::BAD_REQUEST);
        assert_eq!(Error::InvalidImage.status_code(), StatusCode::BAD_REQUEST);
        assert_eq!(Error::UnsupportedMediaType.status_code(), StatusCode::UNSUPPORTED_MEDIA_TYPE);
        assert_eq!(Error::Validation("missing field".into()).status_code(), StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(Error::PayloadTooLarge.status_code(), StatusCode::PAYLOAD_TOO_LARGE);
        assert_eq!(Error::server("boom").status_code(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(Error::Timeout.status_code(), StatusCode::GATEWAY_TIMEOUT);
    }

    #[tokio::test]
    async fn test_into_response_body() {
        let response = Error::bad_request("No image data in body").into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let body = response.into_body().collect().await.unwrap().to_bytes();
        let json: Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(json["code"], 2);
        assert_eq!(json["message"], "No image data in body");
    }
}
