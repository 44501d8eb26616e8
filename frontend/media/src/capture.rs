//! Still capture: crop the center of a frame and encode it.

use std::io::Cursor;

use cardcheck_core::error::Result;
use cardcheck_core::{ActiveImage, VerifierError};
use image::{ImageFormat, RgbImage, imageops};

/// A pixel rectangle inside a frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Region {
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
}

/// The center half-width/half-height region of a `width`×`height` frame.
///
/// This is also where the framing guide is drawn on the preview.
pub fn center_half_region(width: u32, height: u32) -> Region {
    Region {
        x: width / 4,
        y: height / 4,
        width: width / 2,
        height: height / 2,
    }
}

/// Crop the center half of `frame` and scale it onto an
/// `out_width`×`out_height` canvas.
pub fn crop_center_half(frame: &RgbImage, out_width: u32, out_height: u32) -> Result<RgbImage> {
    let region = center_half_region(frame.width(), frame.height());
    if region.width == 0 || region.height == 0 {
        return Err(VerifierError::Camera(format!(
            "frame {}x{} too small to crop",
            frame.width(),
            frame.height()
        )));
    }
    let cropped = imageops::crop_imm(frame, region.x, region.y, region.width, region.height).to_image();
    if cropped.dimensions() == (out_width, out_height) {
        return Ok(cropped);
    }
    Ok(imageops::resize(&cropped, out_width, out_height, imageops::FilterType::Triangle))
}

/// Encode an RGB image as a PNG data URL.
pub fn encode_png(image: &RgbImage) -> Result<ActiveImage> {
    let mut buf = Cursor::new(Vec::new());
    image
        .write_to(&mut buf, ImageFormat::Png)
        .map_err(|e| VerifierError::Encoding(e.to_string()))?;
    ActiveImage::from_bytes("image/png", &buf.into_inner())
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgb;

    const INSIDE: Rgb<u8> = Rgb([255, 0, 0]);
    const OUTSIDE: Rgb<u8> = Rgb([0, 0, 255]);

    /// A frame painted `INSIDE` exactly over its center half.
    fn framed(width: u32, height: u32) -> RgbImage {
        let r = center_half_region(width, height);
        RgbImage::from_fn(width, height, |x, y| {
            let inside = x >= r.x && x < r.x + r.width && y >= r.y && y < r.y + r.height;
            if inside { INSIDE } else { OUTSIDE }
        })
    }

    #[test]
    fn region_is_center_half() {
        assert_eq!(
            center_half_region(640, 480),
            Region { x: 160, y: 120, width: 320, height: 240 }
        );
    }

    #[test]
    fn crop_contains_only_center_pixels() {
        let frame = framed(640, 480);
        let still = crop_center_half(&frame, 320, 240).unwrap();
        assert_eq!(still.dimensions(), (320, 240));
        assert!(still.pixels().all(|p| *p == INSIDE));
    }

    #[test]
    fn crop_is_scaled_to_output_canvas() {
        let frame = framed(640, 480);
        let still = crop_center_half(&frame, 640, 480).unwrap();
        assert_eq!(still.dimensions(), (640, 480));
        // Filtering may round, but no outside colour can bleed in.
        assert!(still.pixels().all(|p| p[0] >= 250 && p[2] <= 5));
    }

    #[test]
    fn crop_keeps_pixel_positions() {
        let frame = RgbImage::from_fn(8, 4, |x, y| Rgb([x as u8, y as u8, 0]));
        let still = crop_center_half(&frame, 4, 2).unwrap();
        assert_eq!(*still.get_pixel(0, 0), Rgb([2, 1, 0]));
        assert_eq!(*still.get_pixel(3, 1), Rgb([5, 2, 0]));
    }

    #[test]
    fn tiny_frame_is_rejected() {
        let frame = RgbImage::new(1, 1);
        assert!(crop_center_half(&frame, 640, 480).is_err());
    }

    #[test]
    fn png_encoding_is_a_data_url() {
        let still = encode_png(&RgbImage::new(4, 4)).unwrap();
        assert!(still.as_str().starts_with("data:image/png;base64,"));
        let decoded = image::load_from_memory(&still.decode().unwrap()).unwrap();
        assert_eq!((decoded.width(), decoded.height()), (4, 4));
    }
}
