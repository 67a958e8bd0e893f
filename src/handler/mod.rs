pub mod face_handler;
