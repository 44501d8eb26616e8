//! Image intake and live capture for the verifier.
//!
//! File intake turns a local image into an `ActiveImage`; live capture wraps
//! a `VideoSource` in a `CameraSession` that releases the device on drop.

pub mod camera;
pub mod capture;
pub mod intake;
pub mod mime_detect;
#[cfg(feature = "native-camera")]
pub mod native;
pub mod source;

pub use camera::CameraSession;
pub use capture::{Region, center_half_region, crop_center_half, encode_png};
pub use intake::{read_image_file, thumbnail};
pub use mime_detect::{detect_mime_type, is_image, sniff_mime_type};
pub use source::{StillImageSource, VideoSource, ensure_source_available, open_video_source};
