//! Camera session: owns a video source for the lifetime of the capture screen.
//!
//! The stream is stopped after a capture, before a retake restarts it, and
//! unconditionally when the session is dropped.

use cardcheck_core::error::Result;
use cardcheck_core::{ActiveImage, VerifierError};
use image::RgbImage;
use tracing::{debug, info};

use crate::capture::{crop_center_half, encode_png};
use crate::source::VideoSource;

pub struct CameraSession {
    source: Box<dyn VideoSource>,
    requested: (u32, u32),
    output: (u32, u32),
    resolution: Option<(u32, u32)>,
    last_frame: Option<RgbImage>,
}

impl CameraSession {
    /// `requested` is the stream resolution, `output` the still canvas size.
    pub fn new(source: Box<dyn VideoSource>, requested: (u32, u32), output: (u32, u32)) -> Self {
        Self {
            source,
            requested,
            output,
            resolution: None,
            last_frame: None,
        }
    }

    pub fn source_name(&self) -> &str {
        self.source.name()
    }

    pub fn is_streaming(&self) -> bool {
        self.resolution.is_some()
    }

    /// Open the stream. No-op if already streaming.
    pub fn start(&mut self) -> Result<()> {
        if self.is_streaming() {
            return Ok(());
        }
        let (width, height) = self.requested;
        let resolution = self.source.open(width, height)?;
        info!(source = %self.source.name(), width = resolution.0, height = resolution.1, "Camera stream started");
        self.resolution = Some(resolution);
        Ok(())
    }

    /// Stop the stream and forget the last preview frame.
    pub fn stop(&mut self) {
        if self.resolution.take().is_some() {
            self.source.close();
            debug!(source = %self.source.name(), "Camera stream stopped");
        }
        self.last_frame = None;
    }

    /// Refresh the preview frame from the live stream.
    pub fn poll_frame(&mut self) -> Result<Option<&RgbImage>> {
        if !self.is_streaming() {
            return Ok(None);
        }
        self.last_frame = Some(self.source.frame()?);
        Ok(self.last_frame.as_ref())
    }

    pub fn last_frame(&self) -> Option<&RgbImage> {
        self.last_frame.as_ref()
    }

    /// Freeze the center region of the current frame into a PNG still and
    /// stop the stream.
    pub fn capture(&mut self) -> Result<ActiveImage> {
        if !self.is_streaming() {
            return Err(VerifierError::Camera("no live stream to capture from".into()));
        }
        let frame = self.source.frame()?;
        let (out_width, out_height) = self.output;
        let still = crop_center_half(&frame, out_width, out_height)?;
        let image = encode_png(&still)?;
        self.stop();
        info!(payload_len = image.payload_len(), "Captured still image");
        Ok(image)
    }
}

impl Drop for CameraSession {
    fn drop(&mut self) {
        self.stop();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgb;
    use std::sync::Arc;
    use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

    /// Shared view of a `RecordingSource`'s device state.
    #[derive(Clone, Default)]
    pub struct DeviceProbe {
        pub open: Arc<AtomicBool>,
        pub opens: Arc<AtomicUsize>,
        pub closes: Arc<AtomicUsize>,
    }

    impl DeviceProbe {
        pub fn is_open(&self) -> bool {
            self.open.load(Ordering::SeqCst)
        }
    }

    pub struct RecordingSource {
        probe: DeviceProbe,
        fail_open: bool,
    }

    impl RecordingSource {
        pub fn new(probe: DeviceProbe) -> Self {
            Self { probe, fail_open: false }
        }
    }

    impl VideoSource for RecordingSource {
        fn name(&self) -> &str {
            "recording"
        }

        fn open(&mut self, width: u32, height: u32) -> Result<(u32, u32)> {
            if self.fail_open {
                return Err(VerifierError::Camera("permission denied".into()));
            }
            self.probe.opens.fetch_add(1, Ordering::SeqCst);
            self.probe.open.store(true, Ordering::SeqCst);
            Ok((width, height))
        }

        fn frame(&mut self) -> Result<RgbImage> {
            Ok(RgbImage::from_pixel(640, 480, Rgb([9, 9, 9])))
        }

        fn close(&mut self) {
            self.probe.closes.fetch_add(1, Ordering::SeqCst);
            self.probe.open.store(false, Ordering::SeqCst);
        }
    }

    fn session(probe: &DeviceProbe) -> CameraSession {
        CameraSession::new(Box::new(RecordingSource::new(probe.clone())), (640, 480), (640, 480))
    }

    #[test]
    fn capture_stops_stream() {
        let probe = DeviceProbe::default();
        let mut cam = session(&probe);
        cam.start().unwrap();
        assert!(probe.is_open());

        let still = cam.capture().unwrap();
        assert!(still.as_str().starts_with("data:image/png;base64,"));
        assert!(!probe.is_open());
        assert!(!cam.is_streaming());
    }

    #[test]
    fn drop_releases_stream() {
        let probe = DeviceProbe::default();
        {
            let mut cam = session(&probe);
            cam.start().unwrap();
            cam.poll_frame().unwrap();
            assert!(probe.is_open());
        }
        assert!(!probe.is_open());
        assert_eq!(probe.closes.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn retake_reopens_and_drop_closes_once() {
        let probe = DeviceProbe::default();
        let mut cam = session(&probe);
        cam.start().unwrap();
        cam.capture().unwrap();
        cam.start().unwrap();
        assert_eq!(probe.opens.load(Ordering::SeqCst), 2);
        drop(cam);
        assert!(!probe.is_open());
        assert_eq!(probe.closes.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn failed_open_leaves_session_idle() {
        let probe = DeviceProbe::default();
        let mut source = RecordingSource::new(probe.clone());
        source.fail_open = true;
        let mut cam = CameraSession::new(Box::new(source), (640, 480), (640, 480));
        assert!(cam.start().is_err());
        assert!(!cam.is_streaming());
        assert!(cam.poll_frame().unwrap().is_none());
        assert!(cam.capture().is_err());
        drop(cam);
        assert_eq!(probe.closes.load(Ordering::SeqCst), 0);
    }
}
