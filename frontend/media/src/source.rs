//! Video sources feeding live capture.

use std::path::PathBuf;

use cardcheck_config::{CameraConfig, CameraSourceKind};
use cardcheck_core::VerifierError;
use cardcheck_core::error::Result;
use image::{RgbImage, imageops};
use tracing::info;

/// A device producing RGB frames.
///
/// Calls are blocking; implementations must tolerate `close` without a
/// preceding `open`.
pub trait VideoSource {
    fn name(&self) -> &str;

    /// Start streaming at (approximately) the requested resolution.
    /// Returns the resolution actually delivered.
    fn open(&mut self, width: u32, height: u32) -> Result<(u32, u32)>;

    /// Grab the current frame.
    fn frame(&mut self) -> Result<RgbImage>;

    /// Stop streaming and release the device.
    fn close(&mut self);
}

/// Replays a single still image as a video feed.
pub struct StillImageSource {
    name: String,
    path: Option<PathBuf>,
    still: Option<RgbImage>,
    streaming: Option<RgbImage>,
}

impl StillImageSource {
    pub fn from_path(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        Self {
            name: format!("still:{}", path.display()),
            path: Some(path),
            still: None,
            streaming: None,
        }
    }

    pub fn from_image(image: RgbImage) -> Self {
        Self {
            name: "still:memory".to_string(),
            path: None,
            still: Some(image),
            streaming: None,
        }
    }

    fn load(&mut self) -> Result<RgbImage> {
        if let Some(still) = &self.still {
            return Ok(still.clone());
        }
        let path = self
            .path
            .as_ref()
            .ok_or_else(|| VerifierError::Camera("no still image configured".into()))?;
        let decoded = image::open(path)
            .map_err(|e| VerifierError::Camera(format!("{}: {e}", path.display())))?
            .to_rgb8();
        self.still = Some(decoded.clone());
        Ok(decoded)
    }
}

impl VideoSource for StillImageSource {
    fn name(&self) -> &str {
        &self.name
    }

    fn open(&mut self, width: u32, height: u32) -> Result<(u32, u32)> {
        let still = self.load()?;
        let frame = if still.dimensions() == (width, height) {
            still
        } else {
            imageops::resize(&still, width, height, imageops::FilterType::Triangle)
        };
        let size = frame.dimensions();
        self.streaming = Some(frame);
        Ok(size)
    }

    fn frame(&mut self) -> Result<RgbImage> {
        self.streaming
            .clone()
            .ok_or_else(|| VerifierError::Camera("stream is not open".into()))
    }

    fn close(&mut self) {
        self.streaming = None;
    }
}

/// Build the video source described by the camera config.
pub fn open_video_source(config: &CameraConfig) -> Result<Box<dyn VideoSource>> {
    match config.source {
        CameraSourceKind::File => {
            let path = config.still_path.clone().ok_or_else(|| {
                VerifierError::Camera("file camera source requires stillPath".into())
            })?;
            info!(path = %path.display(), "Using still image as video source");
            Ok(Box::new(StillImageSource::from_path(path)))
        }
        CameraSourceKind::Native => native_source(config.device_index),
    }
}

const NATIVE_UNAVAILABLE: &str =
    "native camera support not built; rebuild with `--features native-camera` or set camera.source to file";

/// Fail early when `config` names a source this build cannot open.
pub fn ensure_source_available(config: &CameraConfig) -> Result<()> {
    if config.source == CameraSourceKind::Native && !cfg!(feature = "native-camera") {
        return Err(VerifierError::Camera(NATIVE_UNAVAILABLE.into()));
    }
    Ok(())
}

#[cfg(feature = "native-camera")]
fn native_source(index: u32) -> Result<Box<dyn VideoSource>> {
    info!(index, "Using native camera");
    Ok(Box::new(crate::native::NativeCamera::new(index)))
}

#[cfg(not(feature = "native-camera"))]
fn native_source(_index: u32) -> Result<Box<dyn VideoSource>> {
    Err(VerifierError::Camera(NATIVE_UNAVAILABLE.into()))
}
