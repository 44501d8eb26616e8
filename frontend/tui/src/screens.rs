//! Per-screen state.
//!
//! Each value lives inside `ScreenState` only while its screen is active, so
//! leaving a screen drops everything it holds (including the camera).

use cardcheck_core::{ActiveImage, ExtractedFields, FieldClass, Screen};
use image::RgbImage;
use media::CameraSession;
use tracing::warn;

use crate::app::CaptureSettings;

/// Longest side of thumbnails kept for drawing.
const THUMBNAIL_MAX: (u32, u32) = (160, 120);

pub enum ScreenState {
    Landing,
    FileIntake(FileIntakeState),
    LiveCapture(CaptureState),
    Review(ReviewState),
}

impl ScreenState {
    pub fn screen(&self) -> Screen {
        match self {
            ScreenState::Landing => Screen::Landing,
            ScreenState::FileIntake(_) => Screen::FileIntake,
            ScreenState::LiveCapture(_) => Screen::LiveCapture,
            ScreenState::Review(_) => Screen::Review,
        }
    }
}

/// An encoded image plus a decoded thumbnail for the preview pane.
pub struct LoadedImage {
    pub image: ActiveImage,
    pub thumbnail: Option<RgbImage>,
}

impl LoadedImage {
    pub fn new(image: ActiveImage) -> Self {
        let thumbnail = media::thumbnail(&image, THUMBNAIL_MAX.0, THUMBNAIL_MAX.1);
        Self { image, thumbnail }
    }
}

// ---------------------------------------------------------------------------
// File intake
// ---------------------------------------------------------------------------

#[derive(Default)]
pub struct FileIntakeState {
    pub path_input: String,
    pub loaded: Option<LoadedImage>,
    /// Ticket of the outstanding file read.
    pub pending: Option<u64>,
    pub status: Option<String>,
}

impl FileIntakeState {
    pub fn can_submit(&self) -> bool {
        self.loaded.is_some()
    }
}

// ---------------------------------------------------------------------------
// Live capture
// ---------------------------------------------------------------------------

pub struct CaptureState {
    session: Option<CameraSession>,
    pub still: Option<LoadedImage>,
    pub status: Option<String>,
    frame_error_logged: bool,
}

impl CaptureState {
    /// Acquire the video source and start streaming. Failures leave the
    /// screen without a preview.
    pub fn open(settings: &CaptureSettings) -> Self {
        let mut state = Self {
            session: None,
            still: None,
            status: None,
            frame_error_logged: false,
        };
        match (settings.factory)() {
            Ok(source) => {
                let mut session = CameraSession::new(source, settings.requested, settings.output);
                if let Err(e) = session.start() {
                    warn!(error = %e, "Error accessing camera");
                    state.status = Some(format!("Camera unavailable: {e}"));
                }
                state.session = Some(session);
            }
            Err(e) => {
                warn!(error = %e, "Error accessing camera");
                state.status = Some(format!("Camera unavailable: {e}"));
            }
        }
        state
    }

    pub fn is_streaming(&self) -> bool {
        self.session.as_ref().is_some_and(CameraSession::is_streaming)
    }

    pub fn preview(&self) -> Option<&RgbImage> {
        self.session.as_ref().and_then(CameraSession::last_frame)
    }

    pub fn source_name(&self) -> Option<&str> {
        self.session.as_ref().map(CameraSession::source_name)
    }

    /// Refresh the live preview.
    pub fn tick(&mut self) {
        let Some(session) = self.session.as_mut() else { return };
        match session.poll_frame() {
            Ok(_) => self.frame_error_logged = false,
            Err(e) if !self.frame_error_logged => {
                warn!(error = %e, "Failed to read camera frame");
                self.frame_error_logged = true;
            }
            Err(_) => {}
        }
    }

    /// Freeze the framed region into a still; the stream stops.
    pub fn capture(&mut self) {
        let Some(session) = self.session.as_mut() else { return };
        if !session.is_streaming() {
            return;
        }
        match session.capture() {
            Ok(image) => {
                self.still = Some(LoadedImage::new(image));
                self.status = None;
            }
            Err(e) => {
                warn!(error = %e, "Capture failed");
                self.status = Some(format!("Capture failed: {e}"));
            }
        }
    }

    /// Discard the still and restart the stream.
    pub fn retake(&mut self) {
        self.still = None;
        let Some(session) = self.session.as_mut() else { return };
        if let Err(e) = session.start() {
            warn!(error = %e, "Error accessing camera");
            self.status = Some(format!("Camera unavailable: {e}"));
        }
    }
}

// ---------------------------------------------------------------------------
// Review
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReviewPhase {
    /// Extraction outstanding.
    Loading,
    /// Form shown; never goes back to `Loading`.
    Ready,
}

pub struct ReviewState {
    pub image: LoadedImage,
    pub phase: ReviewPhase,
    pub fields: ExtractedFields,
    pub focus: FieldClass,
    pub extract_ticket: u64,
    pub submit_ticket: Option<u64>,
    pub status: Option<String>,
}

impl ReviewState {
    pub fn new(image: &ActiveImage, extract_ticket: u64) -> Self {
        Self {
            image: LoadedImage::new(image.clone()),
            phase: ReviewPhase::Loading,
            fields: ExtractedFields::default(),
            focus: FieldClass::AadharNumber,
            extract_ticket,
            submit_ticket: None,
            status: None,
        }
    }

    pub fn is_editable(&self) -> bool {
        self.phase == ReviewPhase::Ready
    }

    pub fn is_submitting(&self) -> bool {
        self.submit_ticket.is_some()
    }

    pub fn push_char(&mut self, c: char) {
        if self.is_editable() {
            self.fields.get_mut(self.focus).push(c);
        }
    }

    pub fn backspace(&mut self) {
        if self.is_editable() {
            self.fields.get_mut(self.focus).pop();
        }
    }

    pub fn focus_next(&mut self) {
        self.focus = self.focus.next();
    }

    pub fn focus_previous(&mut self) {
        self.focus = self.focus.previous();
    }
}
