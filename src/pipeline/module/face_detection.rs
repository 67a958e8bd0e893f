use std::sync::Mutex;
use anyhow::{anyhow, Error};
use dlib_face_recognition::{FaceDetector, FaceDetectorTrait, FaceLocations, ImageMatrix};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FaceLocation {
    pub left: i64,
    pub top: i64,
    pub right: i64,
    pub bottom: i64,
}

impl FaceLocation {
    pub fn width(&self) -> i64 {
        self.right - self.left
    }

    pub fn height(&self) -> i64 {
        self.bottom - self.top
    }

    /// Square region centred on the face, scaled by `scale` and clipped to the image.
    pub fn expanded_square(&self, scale: f32, image_width: u32, image_height: u32) -> Option<FaceLocation> {
        let side = (self.width().max(self.height()) as f32 * scale).round() as i64;
        if side <= 0 {
            return None
        }

        let center_x = (self.left + self.right) / 2;
        let center_y = (self.top + self.bottom) / 2;

        let left = (center_x - side / 2).max(0);
        let top = (center_y - side / 2).max(0);
        let right = (center_x - side / 2 + side).min(image_width as i64);
        let bottom = (center_y - side / 2 + side).min(image_height as i64);

        if right <= left || bottom <= top {
            return None
        }

        Some(FaceLocation { left, top, right, bottom })
    }
}

/// HOG frontal face detector.
pub struct FaceDetection {
    detector: Mutex<FaceDetector>,
}

impl FaceDetection {
    pub fn new() -> Self {
        FaceDetection {
            detector: Mutex::new(FaceDetector::new()),
        }
    }

    pub fn call(&self, matrix: &ImageMatrix) -> Result<FaceLocations, Error> {
        let detector = self.detector
            .lock()
            .map_err(|_| anyhow!("face detector lock poisoned"))?;

        Ok(detector.face_locations(matrix))
    }
}

pub fn to_face_locations(locations: &FaceLocations) -> Vec<FaceLocation> {
    locations
        .iter()
        .map(|rect| FaceLocation {
            left: rect.left,
            top: rect.top,
            right: rect.right,
            bottom: rect.bottom,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_expanded_square() {
        let face = FaceLocation { left: 40, top: 50, right: 80, bottom: 70 };
        let roi = face.expanded_square(1.5, 200, 200).unwrap();

        assert_eq!(roi.width(), 60);
        assert_eq!(roi.height(), 60);
        assert_eq!((roi.left, roi.top), (30, 30));
    }

    #[test]
    fn test_expanded_square_clipped() {
        let face = FaceLocation { left: 0, top: 0, right: 20, bottom: 20 };
        let roi = face.expanded_square(2.0, 30, 25).unwrap();

        assert_eq!(roi, FaceLocation { left: 0, top: 0, right: 30, bottom: 25 });
        assert!(FaceLocation { left: 5, top: 5, right: 5, bottom: 5 }.expanded_square(1.5, 10, 10).is_none());
    }
}
