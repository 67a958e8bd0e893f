pub mod face_model;
