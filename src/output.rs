//! Bar item lines written by the watch loop.

/// Decides which rendered texts reach the bar.
#[derive(Debug, Default)]
pub struct Printer {
    every: bool,
    last: Option<String>,
}

impl Printer {
    /// With `every`, each text is printed, otherwise only changes are.
    pub fn new(every: bool) -> Self {
        Self { every, last: None }
    }

    /// Return `text` if it should be printed, remembering it as printed.
    pub fn line<'a>(&mut self, text: &'a str) -> Option<&'a str> {
        if !self.every && self.last.as_deref() == Some(text) {
            return None;
        }
        self.last = Some(text.to_string());
        Some(text)
    }
}
