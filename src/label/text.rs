/// Text renderer a label writes into
pub trait TextTarget {
    fn text(&self) -> &str;
    fn set_text(&mut self, text: String);
}

// Plain in-memory text, rendered by the preview UI
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LabelText {
    text: String,
    writes: u64,
}

impl LabelText {
    pub fn new(text: &str) -> Self {
        Self {
            text: text.to_string(),
            writes: 0,
        }
    }

    /// How many times a label has written this text
    pub fn writes(&self) -> u64 {
        self.writes
    }
}

impl TextTarget for LabelText {
    fn text(&self) -> &str {
        &self.text
    }

    fn set_text(&mut self, text: String) {
        self.text = text;
        self.writes += 1;
    }
}
