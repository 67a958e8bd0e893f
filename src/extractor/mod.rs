pub mod image_body;
