//! Common error types

/// Error parsing a stored string into a closed domain enum
#[derive(Debug, Clone)]
pub struct ParseError {
    /// Which kind of value failed to parse
    pub what: &'static str,
    /// The offending input
    pub value: String,
}

impl ParseError {
    pub fn new(what: &'static str, value: impl Into<String>) -> Self {
        Self {
            what,
            value: value.into(),
        }
    }
}

impl std::fmt::Display for ParseError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "invalid {}: {}", self.what, self.value)
    }
}

impl std::error::Error for ParseError {}
