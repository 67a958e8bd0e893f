pub mod face_state;
