//! Log Redaction Layer
//!
//! Scrubs card numbers and inline image payloads from strings prior to logging.

use regex::{Captures, Regex};
use std::sync::LazyLock;

static AADHAR_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\b\d{4}[ -]?\d{4}[ -]?(\d{4})\b").unwrap());
static DATA_URL_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"data:(image/[A-Za-z0-9.+-]+);base64,([A-Za-z0-9+/]+=*)").unwrap());

/// Redacts sensitive patterns in a string.
pub fn redact_sensitive_data(input: &str) -> String {
    // Payloads first: base64 can contain digit runs that look like card numbers.
    let redacted = DATA_URL_RE.replace_all(input, |caps: &Captures| {
        format!("data:{};base64,<{} chars>", &caps[1], caps[2].len())
    });

    AADHAR_RE
        .replace_all(&redacted, "XXXX XXXX $1")
        .into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn masks_grouped_and_plain_card_numbers() {
        assert_eq!(redact_sensitive_data("id 1234 5678 9012 ok"), "id XXXX XXXX 9012 ok");
        assert_eq!(redact_sensitive_data("id=123456789012"), "id=XXXX XXXX 9012");
        assert_eq!(redact_sensitive_data("1234-5678-9012"), "XXXX XXXX 9012");
    }

    #[test]
    fn leaves_short_numbers_alone() {
        assert_eq!(redact_sensitive_data("dob 01/02/1990, pin 560001"), "dob 01/02/1990, pin 560001");
    }

    #[test]
    fn collapses_image_payloads() {
        let clean = redact_sensitive_data("sent data:image/png;base64,iVBORw0KGgo123456789012= done");
        assert_eq!(clean, "sent data:image/png;base64,<24 chars> done");
    }
}
