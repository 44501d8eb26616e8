use std::fmt;

/// The four mutually exclusive screens of the verifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Screen {
    Landing,
    FileIntake,
    LiveCapture,
    Review,
}

impl Screen {
    pub fn title(self) -> &'static str {
        match self {
            Screen::Landing => "Aadhar Card Verifier",
            Screen::FileIntake => "Upload Aadhar Card",
            Screen::LiveCapture => "Capture Aadhar Card",
            Screen::Review => "Extracted Details",
        }
    }
}

impl fmt::Display for Screen {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Screen::Landing => "landing",
            Screen::FileIntake => "file_intake",
            Screen::LiveCapture => "live_capture",
            Screen::Review => "review",
        };
        f.write_str(name)
    }
}
