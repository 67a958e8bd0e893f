use anyhow::Error;
use dlib_face_recognition::ImageMatrix;
use crate::config::settings::Vision;
use crate::pipeline::model_config::config::{FaceExtractionConfig, FaceMeshConfig};
use crate::pipeline::module::face_detection::{to_face_locations, FaceDetection, FaceLocation};
use crate::pipeline::module::face_extraction::FaceExtraction;
use crate::pipeline::module::face_mesh::FaceMesh;
use crate::pipeline::utils::image::Bitmap;

/// Vision operations the service composes. Implementations are blocking.
pub trait FaceBackend: Send + Sync {
    fn face_locations(&self, bitmap: &Bitmap) -> Result<Vec<FaceLocation>, Error>;

    /// One encoding per detected face, in detection order.
    fn face_encodings(&self, bitmap: &Bitmap) -> Result<Vec<Vec<f64>>, Error>;

    /// Landmark count of every face mesh found in the image, at most `max_num_faces` of them.
    fn face_meshes(&self, bitmap: &Bitmap) -> Result<Vec<usize>, Error>;
}

pub struct FacePipeline {
    face_detection: FaceDetection,
    face_extraction: FaceExtraction,
    face_mesh: FaceMesh,
    max_num_faces: usize,
}

impl FacePipeline {
    pub fn new(vision: &Vision) -> Result<Self, Error> {
        // Init model config
        let face_extraction_cfg = FaceExtractionConfig::new(vision);
        let face_mesh_cfg = FaceMeshConfig::new(vision);

        let face_detection = FaceDetection::new();
        let face_extraction = FaceExtraction::new(&face_extraction_cfg)?;
        let face_mesh = FaceMesh::new(&face_mesh_cfg)?;

        Ok(FacePipeline {
            face_detection,
            face_extraction,
            face_mesh,
            max_num_faces: face_mesh_cfg.max_num_faces,
        })
    }

    fn image_matrix(bitmap: &Bitmap) -> Result<ImageMatrix, Error> {
        let rgb = bitmap.to_rgb_image()?;
        Ok(ImageMatrix::from_image(&rgb))
    }
}

impl FaceBackend for FacePipeline {
    fn face_locations(&self, bitmap: &Bitmap) -> Result<Vec<FaceLocation>, Error> {
        let matrix = Self::image_matrix(bitmap)?;
        let locations = self.face_detection.call(&matrix)?;
        Ok(to_face_locations(&locations))
    }

    fn face_encodings(&self, bitmap: &Bitmap) -> Result<Vec<Vec<f64>>, Error> {
        let matrix = Self::image_matrix(bitmap)?;
        let locations = self.face_detection.call(&matrix)?;
        self.face_extraction.call(&matrix, &locations)
    }

    fn face_meshes(&self, bitmap: &Bitmap) -> Result<Vec<usize>, Error> {
        let faces = self.face_locations(bitmap)?;
        mesh_faces(&faces, self.max_num_faces, |face| self.face_mesh.call(bitmap.as_mat(), face))
    }
}

/// Meshes the first `max_num_faces` faces, keeping the ones where a mesh was found.
fn mesh_faces<F>(faces: &[FaceLocation], max_num_faces: usize, mut mesh: F) -> Result<Vec<usize>, Error>
    where
        F: FnMut(&FaceLocation) -> Result<Option<usize>, Error>,
{
    let mut meshes = Vec::with_capacity(max_num_faces);
    for face in faces.iter().take(max_num_faces) {
        if let Some(landmarks) = mesh(face)? {
            meshes.push(landmarks);
        }
    }

    Ok(meshes)
}

#[cfg(test)]
mod tests {
    use anyhow::anyhow;
    use super::*;

    fn faces(n: i64) -> Vec<FaceLocation> {
        (0..n).map(|i| FaceLocation { left: i * 10, top: 0, right: i * 10 + 8, bottom: 8 }).collect()
    }

    #[test]
    fn test_mesh_faces_cap() {
        let mut calls = 0;
        let meshes = mesh_faces(&faces(3), 1, |_| {
            calls += 1;
            Ok(Some(468))
        }).unwrap();

        assert_eq!(calls, 1);
        assert_eq!(meshes, vec![468]);
    }

    #[test]
    fn test_mesh_faces_skips_missing() {
        let meshes = mesh_faces(&faces(3), 3, |face| {
            Ok(if face.left == 10 { None } else { Some(468) })
        }).unwrap();
        assert_eq!(meshes, vec![468, 468]);

        assert!(mesh_faces(&faces(0), 1, |_| Ok(Some(468))).unwrap().is_empty());
        assert!(mesh_faces(&faces(2), 1, |_| Err(anyhow!("inference failed"))).is_err());
    }
}
