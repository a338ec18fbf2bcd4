/// One unit of recognized speech, with its position in the audio in seconds.
#[derive(Debug, Clone, PartialEq)]
pub struct Segment {
    pub start: f32,
    pub end: f32,
    pub text: String,
}

impl Segment {
    pub fn new(start: f32, end: f32, text: impl Into<String>) -> Self {
        Self {
            start,
            end,
            text: text.into(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct TranscriptionInfo {
    pub language: Option<String>,
    pub duration: Option<f32>,
}
