use crate::config::settings::Vision;

/// Euclidean distance at or below which two encodings are the same person.
pub const DEFAULT_TOLERANCE: f64 = 0.6;
pub const DEFAULT_NUM_JITTERS: u32 = 1;
pub const DEFAULT_MESH_INPUT_SIZE: i32 = 192;
pub const DEFAULT_MESH_ROI_SCALE: f32 = 1.5;
pub const DEFAULT_PRESENCE_THRESHOLD: f32 = 0.5;

#[derive(Debug, Clone)]
pub struct FaceExtractionConfig {
    pub landmark_model: String,
    pub encoder_model: String,
    pub num_jitters: u32,
}

impl FaceExtractionConfig {
    pub fn new(vision: &Vision) -> Self {
        FaceExtractionConfig {
            landmark_model: vision.landmark_model.clone(),
            encoder_model: vision.encoder_model.clone(),
            num_jitters: vision.num_jitters,
        }
    }
}

#[derive(Debug, Clone)]
pub struct FaceMeshConfig {
    pub model_path: String,
    pub image_size: i32,
    pub roi_scale: f32,
    pub presence_threshold: f32,
    pub max_num_faces: usize,
}

impl FaceMeshConfig {
    pub fn new(vision: &Vision) -> Self {
        FaceMeshConfig {
            model_path: vision.face_mesh_model.clone(),
            image_size: vision.mesh_input_size,
            roi_scale: vision.mesh_roi_scale,
            presence_threshold: vision.presence_threshold,
            max_num_faces: 1,
        }
    }
}

#[derive(Debug, Clone, Copy)]
pub struct FaceComparisonConfig {
    pub tolerance: f64,
}

impl FaceComparisonConfig {
    pub fn new(vision: &Vision) -> Self {
        FaceComparisonConfig {
            tolerance: vision.tolerance,
        }
    }
}

impl Default for FaceComparisonConfig {
    fn default() -> Self {
        FaceComparisonConfig {
            tolerance: DEFAULT_TOLERANCE,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn vision() -> Vision {
        Vision {
            landmark_model: "landmark.dat".to_string(),
            encoder_model: "encoder.dat".to_string(),
            face_mesh_model: "mesh.onnx".to_string(),
            tolerance: 0.5,
            num_jitters: 2,
            mesh_input_size: DEFAULT_MESH_INPUT_SIZE,
            mesh_roi_scale: DEFAULT_MESH_ROI_SCALE,
            presence_threshold: DEFAULT_PRESENCE_THRESHOLD,
        }
    }

    #[test]
    fn test_mesh_config() {
        let cfg = FaceMeshConfig::new(&vision());
        assert_eq!(cfg.max_num_faces, 1);
        assert_eq!(cfg.image_size, DEFAULT_MESH_INPUT_SIZE);
        assert_eq!(cfg.model_path, "mesh.onnx");
    }

    #[test]
    fn test_extraction_and_comparison_config() {
        let extraction = FaceExtractionConfig::new(&vision());
        assert_eq!(extraction.num_jitters, 2);
        assert_eq!(FaceComparisonConfig::new(&vision()).tolerance, 0.5);
        assert_eq!(FaceComparisonConfig::default().tolerance, DEFAULT_TOLERANCE);
    }
}
