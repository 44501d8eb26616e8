//! Local camera devices via `nokhwa`.

use cardcheck_core::VerifierError;
use cardcheck_core::error::Result;
use image::RgbImage;
use nokhwa::Camera;
use nokhwa::pixel_format::RgbFormat;
use nokhwa::utils::{
    CameraFormat, CameraIndex, FrameFormat, RequestedFormat, RequestedFormatType, Resolution,
};
use tracing::{info, warn};

pub struct NativeCamera {
    index: u32,
    name: String,
    camera: Option<Camera>,
}

impl NativeCamera {
    pub fn new(index: u32) -> Self {
        Self {
            index,
            name: format!("camera:{index}"),
            camera: None,
        }
    }
}

fn camera_err(e: impl std::fmt::Display) -> VerifierError {
    VerifierError::Camera(e.to_string())
}

impl crate::source::VideoSource for NativeCamera {
    fn name(&self) -> &str {
        &self.name
    }

    fn open(&mut self, width: u32, height: u32) -> Result<(u32, u32)> {
        let requested = RequestedFormat::new::<RgbFormat>(RequestedFormatType::Closest(
            CameraFormat::new(Resolution::new(width, height), FrameFormat::MJPEG, 30),
        ));
        let mut camera = Camera::new(CameraIndex::Index(self.index), requested).map_err(camera_err)?;
        camera.open_stream().map_err(camera_err)?;

        let resolution = camera.resolution();
        self.name = camera.info().human_name();
        info!(camera = %self.name, width = resolution.width(), height = resolution.height(), "Camera stream opened");
        self.camera = Some(camera);
        Ok((resolution.width(), resolution.height()))
    }

    fn frame(&mut self) -> Result<RgbImage> {
        let camera = self
            .camera
            .as_mut()
            .ok_or_else(|| VerifierError::Camera("stream is not open".into()))?;
        let buffer = camera.frame().map_err(camera_err)?;
        let decoded = buffer.decode_image::<RgbFormat>().map_err(camera_err)?;
        let (width, height) = (decoded.width(), decoded.height());
        // nokhwa links its own `image` version; hand over the raw buffer.
        RgbImage::from_raw(width, height, decoded.into_raw())
            .ok_or_else(|| VerifierError::Camera("frame buffer size mismatch".into()))
    }

    fn close(&mut self) {
        if let Some(mut camera) = self.camera.take() {
            if let Err(e) = camera.stop_stream() {
                warn!(camera = %self.name, error = %e, "Failed to stop camera stream");
            }
        }
    }
}
