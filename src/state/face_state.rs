use std::sync::Arc;
use crate::pipeline::face_pipeline::face_pipeline::FaceBackend;
use crate::pipeline::module::face_comparison::FaceComparison;
use crate::service::face_service::FaceService;

#[derive(Clone)]
pub struct FaceState {
    pub face_service: FaceService,
}

impl FaceState {
    pub fn new(pipeline: &Arc<dyn FaceBackend>, face_comparison: FaceComparison) -> Self {
        Self {
            face_service: FaceService::new(pipeline, face_comparison),
        }
    }
}
