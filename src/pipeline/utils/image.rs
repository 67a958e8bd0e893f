use anyhow::{anyhow, Error};
use image::RgbImage;
use opencv::core::{Mat, MatTraitConst, Vector};
use opencv::imgcodecs::{imdecode, IMREAD_COLOR};
use opencv::imgproc::{cvt_color_def, COLOR_BGR2RGB};

/// Decoded image in RGB channel order.
pub struct Bitmap {
    rgb: Mat,
}

impl Bitmap {
    pub fn width(&self) -> u32 {
        self.rgb.cols() as u32
    }

    pub fn height(&self) -> u32 {
        self.rgb.rows() as u32
    }

    pub fn as_mat(&self) -> &Mat {
        &self.rgb
    }

    pub fn to_rgb_image(&self) -> Result<RgbImage, Error> {
        let data = if self.rgb.is_continuous() {
            self.rgb.data_bytes()?.to_vec()
        } else {
            self.rgb.try_clone()?.data_bytes()?.to_vec()
        };

        RgbImage::from_raw(self.width(), self.height(), data)
            .ok_or_else(|| anyhow!("bitmap buffer does not match {}x{} rgb", self.width(), self.height()))
    }
}

/// Decodes an encoded image (jpeg, png, ...) and converts it from BGR to RGB.
pub fn decode_bitmap(im_bytes: &[u8]) -> Result<Bitmap, Error> {
    if im_bytes.is_empty() {
        return Err(anyhow!("image buffer is empty"));
    }

    let buffer = Vector::<u8>::from_slice(im_bytes);
    let img_bgr = imdecode(&buffer, IMREAD_COLOR)?;

    // imdecode signals undecodable input with an empty matrix
    if img_bgr.rows() == 0 || img_bgr.cols() == 0 {
        return Err(anyhow!("image buffer is not a decodable image"));
    }

    let mut rgb = Mat::default();
    cvt_color_def(&img_bgr, &mut rgb, COLOR_BGR2RGB)?;

    Ok(Bitmap { rgb })
}

#[cfg(test)]
pub(crate) fn encode_png(image: &RgbImage) -> Vec<u8> {
    let mut buffer = std::io::Cursor::new(Vec::new());
    image
        .write_to(&mut buffer, image::ImageOutputFormat::Png)
        .unwrap();
    buffer.into_inner()
}

#[cfg(test)]
mod tests {
    use image::Rgb;
    use super::*;

    #[test]
    fn test_decode_bitmap() {
        let mut canvas = RgbImage::new(16, 8);
        canvas.put_pixel(3, 2, Rgb([200, 10, 30]));
        let im_bytes = encode_png(&canvas);

        let bitmap = decode_bitmap(&im_bytes).unwrap();
        assert_eq!(bitmap.width(), 16);
        assert_eq!(bitmap.height(), 8);

        // channel order survives the BGR round trip
        let rgb = bitmap.to_rgb_image().unwrap();
        assert_eq!(rgb.get_pixel(3, 2), &Rgb([200, 10, 30]));
        assert_eq!(rgb.get_pixel(0, 0), &Rgb([0, 0, 0]));
    }

    #[test]
    fn test_decode_invalid_bytes() {
        assert!(decode_bitmap(b"definitely not an image").is_err());
        assert!(decode_bitmap(&[]).is_err());
    }
}
