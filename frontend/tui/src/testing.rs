//! Capture sources for state tests.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

use cardcheck_core::VerifierError;
use cardcheck_core::error::Result;
use image::{Rgb, RgbImage};
use media::{StillImageSource, VideoSource};

use crate::app::CaptureSettings;

/// Shared view of whether a `RecordingSource` currently holds the device.
#[derive(Clone, Default)]
pub struct DeviceProbe {
    open: Arc<AtomicBool>,
    opens: Arc<AtomicUsize>,
}

impl DeviceProbe {
    pub fn is_open(&self) -> bool {
        self.open.load(Ordering::SeqCst)
    }

    pub fn opens(&self) -> usize {
        self.opens.load(Ordering::SeqCst)
    }
}

struct RecordingSource {
    probe: DeviceProbe,
}

impl VideoSource for RecordingSource {
    fn name(&self) -> &str {
        "recording"
    }

    fn open(&mut self, width: u32, height: u32) -> Result<(u32, u32)> {
        self.probe.opens.fetch_add(1, Ordering::SeqCst);
        self.probe.open.store(true, Ordering::SeqCst);
        Ok((width, height))
    }

    fn frame(&mut self) -> Result<RgbImage> {
        Ok(RgbImage::from_pixel(64, 48, Rgb([200, 40, 40])))
    }

    fn close(&mut self) {
        self.probe.open.store(false, Ordering::SeqCst);
    }
}

fn settings(factory: impl Fn() -> Result<Box<dyn VideoSource>> + 'static) -> CaptureSettings {
    CaptureSettings {
        requested: (64, 48),
        output: (32, 24),
        factory: Box::new(factory),
    }
}

pub fn recording_settings(probe: &DeviceProbe) -> CaptureSettings {
    let probe = probe.clone();
    settings(move || {
        Ok(Box::new(RecordingSource {
            probe: probe.clone(),
        }) as Box<dyn VideoSource>)
    })
}

pub fn still_settings() -> CaptureSettings {
    settings(|| {
        Ok(Box::new(StillImageSource::from_image(RgbImage::from_pixel(
            64,
            48,
            Rgb([10, 120, 10]),
        ))) as Box<dyn VideoSource>)
    })
}

pub fn failing_settings() -> CaptureSettings {
    settings(|| Err(VerifierError::Camera("permission denied".into())))
}
