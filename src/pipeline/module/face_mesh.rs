use std::sync::Mutex;
use anyhow::{anyhow, Error};
use log::debug;
use opencv::core::{Mat, MatTraitConst, Rect, Scalar, Size, Vector, CV_32F};
use opencv::dnn::{blob_from_image, read_net_from_onnx, Net, NetTrait, NetTraitConst};
use crate::pipeline::model_config::config::FaceMeshConfig;
use crate::pipeline::module::face_detection::FaceLocation;

/// Single-image face mesh on an ONNX landmark network.
pub struct FaceMesh {
    net: Mutex<Net>,
    image_size: i32,
    roi_scale: f32,
    presence_threshold: f32,
}

impl FaceMesh {
    pub fn new(cfg: &FaceMeshConfig) -> Result<Self, Error> {
        debug!("loading face mesh model from {}", cfg.model_path);
        let net = read_net_from_onnx(&cfg.model_path)
            .map_err(|e| anyhow!("failed to load face mesh model {}: {e}", cfg.model_path))?;

        Ok(FaceMesh {
            net: Mutex::new(net),
            image_size: cfg.image_size,
            roi_scale: cfg.roi_scale,
            presence_threshold: cfg.presence_threshold,
        })
    }

    fn _preprocess(&self, rgb: &Mat, face: &FaceLocation) -> Result<Option<Mat>, Error> {
        let roi = match face.expanded_square(self.roi_scale, rgb.cols() as u32, rgb.rows() as u32) {
            Some(roi) => roi,
            None => return Ok(None),
        };

        let rect = Rect::new(
            roi.left as i32,
            roi.top as i32,
            roi.width() as i32,
            roi.height() as i32,
        );
        let crop = Mat::roi(rgb, rect)?.try_clone()?;

        // channels are already RGB, scale pixels into [0, 1]
        let blob = blob_from_image(
            &crop,
            1.0 / 255.0,
            Size::new(self.image_size, self.image_size),
            Scalar::default(),
            false,
            false,
            CV_32F,
        )?;

        Ok(Some(blob))
    }

    fn _forward(&self, blob: &Mat) -> Result<Vector<Mat>, Error> {
        let mut net = self.net
            .lock()
            .map_err(|_| anyhow!("face mesh lock poisoned"))?;

        let output_names = net.get_unconnected_out_layers_names()?;
        net.set_input_def(blob)?;

        let mut outputs: Vector<Mat> = Vector::new();
        net.forward(&mut outputs, &output_names)?;

        Ok(outputs)
    }

    /// Runs the mesh on the region around `face`. Returns the landmark count, `None` when no
    /// face mesh is found there.
    pub fn call(&self, rgb: &Mat, face: &FaceLocation) -> Result<Option<usize>, Error> {
        let blob = match self._preprocess(rgb, face)? {
            Some(blob) => blob,
            None => return Ok(None),
        };

        let outputs = self._forward(&blob)?;
        parse_mesh_outputs(&outputs, self.presence_threshold)
    }
}

/// Picks the face flag (the single-value output) and the 3-D landmark tensor (the longest
/// output divisible by 3) out of the network outputs.
pub fn parse_mesh_outputs(outputs: &Vector<Mat>, presence_threshold: f32) -> Result<Option<usize>, Error> {
    let mut presence: Option<f32> = None;
    let mut mesh_len: Option<usize> = None;

    for output in outputs.iter() {
        let values = output.data_typed::<f32>()?;
        match values.len() {
            0 => {}
            1 => presence = Some(sigmoid(values[0])),
            len => {
                if len > mesh_len.unwrap_or(0) && len % 3 == 0 {
                    mesh_len = Some(len);
                }
            }
        }
    }

    let presence = presence.ok_or_else(|| anyhow!("face mesh model has no face flag output"))?;
    let mesh_len = mesh_len.ok_or_else(|| anyhow!("face mesh model has no landmark output"))?;

    if presence < presence_threshold {
        debug!("face mesh presence {presence:.3} below threshold {presence_threshold}");
        return Ok(None)
    }

    Ok(Some(mesh_len / 3))
}

fn sigmoid(x: f32) -> f32 {
    1.0 / (1.0 + (-x).exp())
}
