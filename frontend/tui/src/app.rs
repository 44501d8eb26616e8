//! TUI App State
//!
//! The root controller: owns the active screen and the active image, routes
//! navigation between screens, and folds async results back into state.

use cardcheck_config::CardcheckConfig;
use cardcheck_core::error::Result;
use cardcheck_core::{
    ActiveImage, Detection, ExtractedFields, ExtractionResponse, Screen, SubmissionResponse,
};
use logging::{EventLogger, VerifierEvent};
use media::VideoSource;
use tracing::debug;

use crate::screens::{
    CaptureState, FileIntakeState, LoadedImage, ReviewPhase, ReviewState, ScreenState,
};

/// Shown after a successful submission.
pub const SUBMITTED_ALERT: &str = "Submitted successfully!";

/// Class names and confidences of `detections`; extracted text stays out of the log.
fn detection_summary(detections: &[Detection]) -> String {
    detections
        .iter()
        .map(|d| match d.confidence {
            Some(c) => format!("{} ({c:.2})", d.class_name),
            None => d.class_name.clone(),
        })
        .collect::<Vec<_>>()
        .join(", ")
}

/// Builds a fresh video source each time the capture screen is entered.
pub type SourceFactory = Box<dyn Fn() -> Result<Box<dyn VideoSource>>>;

pub struct CaptureSettings {
    /// Stream resolution requested from the camera.
    pub requested: (u32, u32),
    /// Size of the captured still.
    pub output: (u32, u32),
    pub factory: SourceFactory,
}

impl CaptureSettings {
    pub fn from_config(config: &CardcheckConfig) -> Self {
        let camera = config.camera.clone();
        Self {
            requested: (camera.width, camera.height),
            output: (config.capture.output_width, config.capture.output_height),
            factory: Box::new(move || media::open_video_source(&camera)),
        }
    }
}

/// Async work requested by the UI. Each carries a ticket so a result that
/// arrives after its screen was left can be recognised and dropped.
#[derive(Debug)]
pub enum Command {
    ReadFile { ticket: u64, path: std::path::PathBuf },
    Extract { ticket: u64, image: ActiveImage },
    Submit { ticket: u64, fields: ExtractedFields },
}

/// Completion of a `Command`.
#[derive(Debug)]
pub enum AppEvent {
    FileRead { ticket: u64, result: Result<ActiveImage> },
    Extracted { ticket: u64, result: Result<ExtractionResponse> },
    Submitted { ticket: u64, result: Result<SubmissionResponse> },
}

pub struct AppState {
    screen: ScreenState,
    active_image: Option<ActiveImage>,
    capture: CaptureSettings,
    next_ticket: u64,
    pub alert: Option<String>,
    pub should_quit: bool,
}

impl AppState {
    pub fn new(capture: CaptureSettings) -> Self {
        Self {
            screen: ScreenState::Landing,
            active_image: None,
            capture,
            next_ticket: 0,
            alert: None,
            should_quit: false,
        }
    }

    pub fn screen(&self) -> Screen {
        self.screen.screen()
    }

    pub fn screen_state(&self) -> &ScreenState {
        &self.screen
    }

    pub fn active_image(&self) -> Option<&ActiveImage> {
        self.active_image.as_ref()
    }

    /// Drop the current screen's state (releasing anything it holds) and
    /// install `next`.
    fn switch_to(&mut self, next: impl FnOnce(&mut Self) -> ScreenState) {
        let from = self.screen();
        self.screen = ScreenState::Landing;
        self.screen = next(self);
        let to = self.screen();
        if from != to {
            EventLogger::log_event(VerifierEvent::Navigated {
                from: from.to_string(),
                to: to.to_string(),
            });
        }
    }

    /// Switch screens. Review can only be entered with an active image and
    /// then (re)starts extraction.
    pub fn navigate(&mut self, to: Screen) -> Option<Command> {
        match to {
            Screen::Landing => {
                self.active_image = None;
                self.switch_to(|_| ScreenState::Landing);
                None
            }
            Screen::FileIntake => {
                self.switch_to(|_| ScreenState::FileIntake(FileIntakeState::default()));
                None
            }
            Screen::LiveCapture => {
                self.switch_to(|app| ScreenState::LiveCapture(CaptureState::open(&app.capture)));
                None
            }
            Screen::Review => match self.active_image.clone() {
                Some(image) => Some(self.validate(image)),
                None => {
                    debug!("Review requested without an active image");
                    None
                }
            },
        }
    }

    /// Store `image` as the active image and move to Review.
    pub fn validate(&mut self, image: ActiveImage) -> Command {
        EventLogger::log_event(VerifierEvent::ImageSelected {
            source: self.screen().to_string(),
            mime_type: image.mime_type().to_string(),
            payload_len: image.payload_len(),
        });
        let ticket = self.take_ticket();
        self.active_image = Some(image.clone());
        self.switch_to(|_| ScreenState::Review(ReviewState::new(&image, ticket)));
        Command::Extract { ticket, image }
    }

    /// Discard all state as if the application was restarted.
    ///
    /// Tickets keep counting so results from before the reload are ignored.
    pub fn reload(&mut self) {
        self.switch_to(|_| ScreenState::Landing);
        self.active_image = None;
        self.alert = None;
    }

    fn take_ticket(&mut self) -> u64 {
        self.next_ticket += 1;
        self.next_ticket
    }

    // -----------------------------------------------------------------------
    // File intake
    // -----------------------------------------------------------------------

    pub fn intake_mut(&mut self) -> Option<&mut FileIntakeState> {
        match &mut self.screen {
            ScreenState::FileIntake(intake) => Some(intake),
            _ => None,
        }
    }

    /// Start reading the typed path.
    pub fn intake_load(&mut self) -> Option<Command> {
        let ScreenState::FileIntake(intake) = &mut self.screen else {
            return None;
        };
        let path = intake.path_input.trim();
        if path.is_empty() {
            intake.status = Some("Enter the path of an image file".into());
            return None;
        }
        let path = std::path::PathBuf::from(path);
        self.next_ticket += 1;
        let ticket = self.next_ticket;
        intake.pending = Some(ticket);
        intake.status = Some(format!("Reading {}...", path.display()));
        Some(Command::ReadFile { ticket, path })
    }

    /// Hand the loaded image to `validate`.
    pub fn intake_submit(&mut self) -> Option<Command> {
        let image = match &self.screen {
            ScreenState::FileIntake(intake) => intake.loaded.as_ref()?.image.clone(),
            _ => return None,
        };
        Some(self.validate(image))
    }

    // -----------------------------------------------------------------------
    // Live capture
    // -----------------------------------------------------------------------

    pub fn capture_mut(&mut self) -> Option<&mut CaptureState> {
        match &mut self.screen {
            ScreenState::LiveCapture(capture) => Some(capture),
            _ => None,
        }
    }

    pub fn capture_submit(&mut self) -> Option<Command> {
        let image = match &self.screen {
            ScreenState::LiveCapture(capture) => capture.still.as_ref()?.image.clone(),
            _ => return None,
        };
        Some(self.validate(image))
    }

    // -----------------------------------------------------------------------
    // Review
    // -----------------------------------------------------------------------

    pub fn review_mut(&mut self) -> Option<&mut ReviewState> {
        match &mut self.screen {
            ScreenState::Review(review) => Some(review),
            _ => None,
        }
    }

    /// Send the current field values. Ignored while loading or while a
    /// submission is already in flight.
    pub fn review_submit(&mut self) -> Option<Command> {
        let ScreenState::Review(review) = &mut self.screen else {
            return None;
        };
        if !review.is_editable() || review.is_submitting() {
            return None;
        }
        self.next_ticket += 1;
        let ticket = self.next_ticket;
        review.submit_ticket = Some(ticket);
        review.status = Some("Submitting...".into());
        Some(Command::Submit {
            ticket,
            fields: review.fields.clone(),
        })
    }

    // -----------------------------------------------------------------------
    // Async results
    // -----------------------------------------------------------------------

    /// Periodic refresh (camera preview).
    pub fn tick(&mut self) {
        if let Some(capture) = self.capture_mut() {
            capture.tick();
        }
    }

    pub fn handle_event(&mut self, event: AppEvent) {
        match event {
            AppEvent::FileRead { ticket, result } => self.on_file_read(ticket, result),
            AppEvent::Extracted { ticket, result } => self.on_extracted(ticket, result),
            AppEvent::Submitted { ticket, result } => self.on_submitted(ticket, result),
        }
    }

    fn on_file_read(&mut self, ticket: u64, result: Result<ActiveImage>) {
        let Some(intake) = self.intake_mut().filter(|i| i.pending == Some(ticket)) else {
            debug!(ticket, "Dropping stale file read");
            return;
        };
        intake.pending = None;
        match result {
            Ok(image) => {
                intake.status = Some(format!("Loaded {} ({} bytes encoded)", image.mime_type(), image.payload_len()));
                intake.loaded = Some(LoadedImage::new(image));
            }
            Err(e) => {
                intake.status = Some(format!("Could not read file: {e}"));
                EventLogger::log_event(VerifierEvent::failure("file_intake", &e));
            }
        }
    }

    fn on_extracted(&mut self, ticket: u64, result: Result<ExtractionResponse>) {
        let Some(review) = self
            .review_mut()
            .filter(|r| r.extract_ticket == ticket && r.phase == ReviewPhase::Loading)
        else {
            debug!(ticket, "Dropping stale extraction result");
            return;
        };
        match result {
            Ok(response) => {
                let applied = review.fields.apply_detections(&response.detections);
                EventLogger::log_event(VerifierEvent::ExtractionCompleted {
                    detections: response.detections.len(),
                    applied,
                    summary: detection_summary(&response.detections),
                });
            }
            Err(e) => {
                review.status = Some(format!("Extraction failed: {e}"));
                EventLogger::log_event(VerifierEvent::failure("extraction", &e));
            }
        }
        review.phase = ReviewPhase::Ready;
    }

    fn on_submitted(&mut self, ticket: u64, result: Result<SubmissionResponse>) {
        let Some(review) = self.review_mut().filter(|r| r.submit_ticket == Some(ticket)) else {
            debug!(ticket, "Dropping stale submission result");
            return;
        };
        review.submit_ticket = None;
        match result {
            Ok(response) => {
                EventLogger::log_event(VerifierEvent::SubmissionCompleted {
                    message: response.message,
                });
                self.navigate(Screen::Landing);
                self.alert = Some(SUBMITTED_ALERT.to_string());
            }
            Err(e) => {
                review.status = Some(format!("Submission failed: {e}"));
                EventLogger::log_event(VerifierEvent::failure("submission", &e));
            }
        }
    }
}
