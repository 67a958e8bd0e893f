use std::path::Path;
use std::sync::Mutex;
use anyhow::{anyhow, Error};
use dlib_face_recognition::{
    FaceEncoderNetwork, FaceEncoderTrait, FaceLocations, ImageMatrix, LandmarkPredictor,
    LandmarkPredictorTrait,
};
use log::debug;
use crate::pipeline::model_config::config::FaceExtractionConfig;

/// Landmark predictor followed by the ResNet encoder; one 128-d vector per face.
pub struct FaceExtraction {
    predictor: Mutex<LandmarkPredictor>,
    encoder: Mutex<FaceEncoderNetwork>,
    num_jitters: u32,
}

impl FaceExtraction {
    pub fn new(cfg: &FaceExtractionConfig) -> Result<Self, Error> {
        debug!("loading landmark model from {}", cfg.landmark_model);
        let predictor = LandmarkPredictor::open(Path::new(&cfg.landmark_model))
            .map_err(|e| anyhow!("failed to load landmark model {}: {e}", cfg.landmark_model))?;

        debug!("loading encoder model from {}", cfg.encoder_model);
        let encoder = FaceEncoderNetwork::open(Path::new(&cfg.encoder_model))
            .map_err(|e| anyhow!("failed to load encoder model {}: {e}", cfg.encoder_model))?;

        Ok(FaceExtraction {
            predictor: Mutex::new(predictor),
            encoder: Mutex::new(encoder),
            num_jitters: cfg.num_jitters,
        })
    }

    pub fn call(&self, matrix: &ImageMatrix, locations: &FaceLocations) -> Result<Vec<Vec<f64>>, Error> {
        if locations.is_empty() {
            return Ok(vec![])
        }

        let landmarks = {
            let predictor = self.predictor
                .lock()
                .map_err(|_| anyhow!("landmark predictor lock poisoned"))?;
            locations
                .iter()
                .map(|rect| predictor.face_landmarks(matrix, rect))
                .collect::<Vec<_>>()
        };

        let encoder = self.encoder
            .lock()
            .map_err(|_| anyhow!("face encoder lock poisoned"))?;
        let encodings = encoder.get_face_encodings(matrix, &landmarks, self.num_jitters);

        Ok(encodings
            .iter()
            .map(|encoding| encoding.as_ref().to_vec())
            .collect())
    }
}
