pub mod error;
pub mod fields;
pub mod image;
pub mod screen;
pub mod traits;
pub mod wire;

pub use error::VerifierError;
pub use fields::{ExtractedFields, FieldClass};
pub use image::ActiveImage;
pub use screen::Screen;
pub use traits::CardService;
pub use wire::{Detection, ExtractionResponse, ServiceErrorBody, SubmissionResponse};
