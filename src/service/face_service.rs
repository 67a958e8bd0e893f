use std::sync::Arc;
use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use log::{error, warn};
use crate::error::errors::Error;
use crate::models::face_model::{
    EncodingOutput, ImageInput, LivenessOutput, MatchFaceInput, MatchOutput, VerificationOutput,
};
use crate::pipeline::face_pipeline::face_pipeline::FaceBackend;
use crate::pipeline::module::face_comparison::FaceComparison;
use crate::pipeline::utils::image::{decode_bitmap, Bitmap};

#[derive(Clone)]
pub struct FaceService {
    face_pipeline: Arc<dyn FaceBackend>,
    face_comparison: FaceComparison,
}

impl FaceService {
    pub fn new(face_pipeline: &Arc<dyn FaceBackend>, face_comparison: FaceComparison) -> Self {
        FaceService {
            face_pipeline: Arc::clone(face_pipeline),
            face_comparison,
        }
    }

    pub async fn check_liveness(&self, input: ImageInput) -> Result<LivenessOutput, Error> {
        let pipeline = Arc::clone(&self.face_pipeline);

        run_blocking(move || {
            // an undecodable upload is "not live" rather than a client error
            let bitmap = match decode_bitmap(&input.im_bytes) {
                Ok(bitmap) => bitmap,
                Err(e) => {
                    warn!("liveness image could not be decoded: {e}");
                    return Ok(LivenessOutput { live: false })
                }
            };

            let meshes = pipeline.face_meshes(&bitmap).map_err(|e| {
                error!("failed to run face mesh: {e}");
                Error::server("failed to run face mesh")
            })?;

            Ok(LivenessOutput { live: !meshes.is_empty() })
        }).await
    }

    pub async fn verify_face(&self, input: ImageInput) -> Result<VerificationOutput, Error> {
        let pipeline = Arc::clone(&self.face_pipeline);

        run_blocking(move || {
            let bitmap = decode_image(&input.im_bytes)?;
            let locations = pipeline.face_locations(&bitmap).map_err(|e| {
                error!("failed to detect faces: {e}");
                Error::server("failed to detect faces")
            })?;

            Ok(VerificationOutput { verified: !locations.is_empty() })
        }).await
    }

    /// Encoding of the first detected face; further faces are ignored.
    pub async fn extract_encoding(&self, input: ImageInput) -> Result<EncodingOutput, Error> {
        let pipeline = Arc::clone(&self.face_pipeline);

        run_blocking(move || {
            let bitmap = decode_image(&input.im_bytes)?;
            let encodings = pipeline.face_encodings(&bitmap).map_err(|e| {
                error!("failed to extract face encodings: {e}");
                Error::server("failed to extract face encodings")
            })?;

            Ok(EncodingOutput { encoding: encodings.into_iter().next() })
        }).await
    }

    /// Index of the first known encoding matching the first face of the target image.
    pub async fn match_face(&self, input: MatchFaceInput) -> Result<MatchOutput, Error> {
        // wrapped base64 (MIME line breaks) decodes like the unwrapped form
        let target = input.target
            .chars()
            .filter(|c| !c.is_ascii_whitespace())
            .collect::<String>();
        let target_bytes = STANDARD
            .decode(target)
            .map_err(|e| Error::bad_request(format!("invalid base64 target: {e}")))?;

        // nothing to match against, skip the vision work
        if input.encodings.is_empty() {
            return Ok(MatchOutput::no_match())
        }

        let pipeline = Arc::clone(&self.face_pipeline);
        let face_comparison = self.face_comparison;
        let known_encodings = input.encodings;

        run_blocking(move || {
            let bitmap = decode_image(&target_bytes)?;
            let encodings = pipeline.face_encodings(&bitmap).map_err(|e| {
                error!("failed to extract target face encodings: {e}");
                Error::server("failed to extract face encodings")
            })?;

            let target_encoding = match encodings.first() {
                Some(target_encoding) => target_encoding,
                None => return Ok(MatchOutput::no_match()),
            };

            Ok(match face_comparison.find_first_match(&known_encodings, target_encoding) {
                Some(index) => MatchOutput { index: index as i64 },
                None => MatchOutput::no_match(),
            })
        }).await
    }
}

fn decode_image(im_bytes: &[u8]) -> Result<Bitmap, Error> {
    decode_bitmap(im_bytes).map_err(|e| {
        warn!("failed to decode image: {e}");
        Error::InvalidImage
    })
}

async fn run_blocking<T, F>(f: F) -> Result<T, Error>
    where
        T: Send + 'static,
        F: FnOnce() -> Result<T, Error> + Send + 'static,
{
    tokio::task::spawn_blocking(f).await.map_err(|e| {
        error!("vision task failed: {e}");
        Error::server("vision task failed")
    })?
}
