pub mod face_comparison;
pub mod face_detection;
pub mod face_extraction;
pub mod face_mesh;
