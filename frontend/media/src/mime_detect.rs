//! MIME type detection for card images.
//!
//! Content sniffing first, file extension as a fallback.

use std::path::Path;

/// Detect an image MIME type by file extension.
pub fn detect_mime_type(path: &Path) -> &'static str {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_lowercase();

    match ext.as_str() {
        "jpg" | "jpeg" => "image/jpeg",
        "png"          => "image/png",
        "gif"          => "image/gif",
        "webp"         => "image/webp",
        "bmp"          => "image/bmp",
        "tiff" | "tif" => "image/tiff",
        "avif"         => "image/avif",
        _              => "application/octet-stream",
    }
}

/// Detect the MIME type of image bytes, falling back to the path extension.
pub fn sniff_mime_type(path: &Path, bytes: &[u8]) -> &'static str {
    match image::guess_format(bytes) {
        Ok(format) => format.to_mime_type(),
        Err(_) => detect_mime_type(path),
    }
}

/// Whether a MIME type is for an image.
pub fn is_image(mime: &str) -> bool {
    mime.starts_with("image/")
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn detects_jpeg_by_extension() {
        assert_eq!(detect_mime_type(&PathBuf::from("card.JPG")), "image/jpeg");
    }

    #[test]
    fn unknown_extension_fallback() {
        assert_eq!(detect_mime_type(&PathBuf::from("card.pdf")), "application/octet-stream");
        assert!(!is_image("application/octet-stream"));
    }

    #[test]
    fn content_wins_over_extension() {
        let png_magic = [0x89, b'P', b'N', b'G', 0x0d, 0x0a, 0x1a, 0x0a, 0, 0, 0, 0];
        assert_eq!(sniff_mime_type(&PathBuf::from("scan.jpg"), &png_magic), "image/png");
        assert_eq!(sniff_mime_type(&PathBuf::from("scan.gif"), b"not an image"), "image/gif");
    }
}
