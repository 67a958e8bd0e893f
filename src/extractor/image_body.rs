use axum::async_trait;
use axum::extract::{FromRequest, Multipart, Request};
use bytes::Bytes;
use http::{header, StatusCode};
use log::error;
use crate::error::errors::Error;

/// Multipart field carrying the uploaded image.
pub const FILE_FIELD: &str = "file";

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum UploadKind {
    Multipart,
    OctetStream,
    Unsupported,
}

impl UploadKind {
    pub fn from_content_type(content_type: &str) -> Self {
        if content_type.contains(mime::MULTIPART_FORM_DATA.as_ref()) {
            UploadKind::Multipart
        } else if content_type.contains(mime::APPLICATION_OCTET_STREAM.as_ref()) {
            UploadKind::OctetStream
        } else {
            UploadKind::Unsupported
        }
    }
}

/// Raw image bytes taken from either a multipart `file` part or an octet-stream body.
#[derive(Debug, Clone)]
pub struct ImageBody(pub Bytes);

#[async_trait]
impl<S> FromRequest<S> for ImageBody
    where
        S: Send + Sync,
{
    type Rejection = Error;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let content_type = req
            .headers()
            .get(header::CONTENT_TYPE)
            .and_then(|value| value.to_str().ok())
            .unwrap_or_default()
            .to_string();

        match UploadKind::from_content_type(&content_type) {
            UploadKind::Multipart => {
                let mut payload = Multipart::from_request(req, state).await.map_err(|e| {
                    error!("failed to read multipart body: {e}");
                    read_error(e.status(), "invalid multipart body")
                })?;

                while let Some(field) = payload.next_field().await.map_err(|e| {
                    error!("failed to read multipart field: {e}");
                    read_error(e.status(), "invalid multipart body")
                })? {
                    if field.name() != Some(FILE_FIELD) {
                        continue
                    }

                    let data = field.bytes().await.map_err(|e| {
                        error!("failed to retrieve image from request: {e}");
                        read_error(e.status(), "failed to read uploaded file")
                    })?;
                    return Ok(ImageBody(data))
                }

                Err(Error::bad_request("No file uploaded"))
            }
            UploadKind::OctetStream => {
                let data = Bytes::from_request(req, state).await.map_err(|e| {
                    error!("failed to read request body: {e}");
                    read_error(e.status(), "failed to read request body")
                })?;

                if data.is_empty() {
                    return Err(Error::bad_request("No image data in body"))
                }
                Ok(ImageBody(data))
            }
            UploadKind::Unsupported => Err(Error::UnsupportedMediaType),
        }
    }
}

/// Body limit hits surface as 413, anything else as a malformed upload.
fn read_error(status: StatusCode, message: &str) -> Error {
    if status == StatusCode::PAYLOAD_TOO_LARGE {
        return Error::PayloadTooLarge
    }
    Error::bad_request(message)
}

#[cfg(test)]
pub(crate) const TEST_BOUNDARY: &str = "X-FACE-GATEWAY-BOUNDARY";

/// Single-part multipart body for tests.
#[cfg(test)]
pub(crate) fn multipart_body(field: &str, data: &[u8]) -> Vec<u8> {
    let mut body = Vec::new();
    body.extend_from_slice(format!("--{TEST_BOUNDARY}\r\n").as_bytes());
    body.extend_from_slice(
        format!("Content-Disposition: form-data; name=\"{field}\"; filename=\"face.png\"\r\n").as_bytes(),
    );
    body.extend_from_slice(b"Content-Type: image/png\r\n\r\n");
    body.extend_from_slice(data);
    body.extend_from_slice(format!("\r\n--{TEST_BOUNDARY}--\r\n").as_bytes());
    body
}
