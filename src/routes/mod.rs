pub mod face_routes;
pub mod root;
