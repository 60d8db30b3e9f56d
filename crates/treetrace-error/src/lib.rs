//! Error handling utilities for treetrace.
//!
//! The insertion engine itself has no failure mode; these errors surface at
//! the edges: invariant verification, configuration, input parsing and I/O.

use std::fmt;

/// Error category for treetrace errors
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ErrorCategory {
    /// A tree or snapshot broke a structural invariant. Always a defect.
    Invariant,
    /// A config or trace file could not be decoded.
    Parse,
    /// A config decoded but holds values the session cannot use.
    Config,
    Io,
}

impl fmt::Display for ErrorCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ErrorCategory::Invariant => write!(f, "invariant"),
            ErrorCategory::Parse => write!(f, "parse"),
            ErrorCategory::Config => write!(f, "config"),
            ErrorCategory::Io => write!(f, "io"),
        }
    }
}

/// Treetrace error with category and context
#[derive(Debug)]
pub struct TreeError {
    message: String,
    category: ErrorCategory,
    source: Option<Box<dyn std::error::Error + Send + Sync>>,
    context: Vec<(String, String)>,
}

impl TreeError {
    pub fn new(message: impl Into<String>, category: ErrorCategory) -> Self {
        Self {
            message: message.into(),
            category,
            source: None,
            context: Vec::new(),
        }
    }

    pub fn with_source(
        message: impl Into<String>,
        category: ErrorCategory,
        source: Box<dyn std::error::Error + Send + Sync>,
    ) -> Self {
        Self {
            message: message.into(),
            category,
            source: Some(source),
            context: Vec::new(),
        }
    }

    pub fn with_context(mut self, key: impl Into<String>, value: impl fmt::Display) -> Self {
        self.context.push((key.into(), value.to_string()));
        self
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn category(&self) -> &ErrorCategory {
        &self.category
    }

    pub fn context(&self) -> &[(String, String)] {
        &self.context
    }

    /// Value recorded under `key`, if any.
    pub fn context_value(&self, key: &str) -> Option<&str> {
        self.context
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    pub fn is_invariant_error(&self) -> bool {
        self.category == ErrorCategory::Invariant
    }

    pub fn is_parse_error(&self) -> bool {
        self.category == ErrorCategory::Parse
    }

    pub fn is_config_error(&self) -> bool {
        self.category == ErrorCategory::Config
    }

    pub fn is_io_error(&self) -> bool {
        self.category == ErrorCategory::Io
    }
}

impl fmt::Display for TreeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}", self.category, self.message)?;

        if !self.context.is_empty() {
            write!(f, " (")?;
            for (i, (key, value)) in self.context.iter().enumerate() {
                if i > 0 {
                    write!(f, ", ")?;
                }
                write!(f, "{}={}", key, value)?;
            }
            write!(f, ")")?;
        }

        if let Some(source) = &self.source {
            write!(f, "\nCaused by: {}", source)?;
        }

        Ok(())
    }
}

impl std::error::Error for TreeError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        self.source
            .as_ref()
            .map(|e| e.as_ref() as &(dyn std::error::Error + 'static))
    }
}

/// Result type alias for treetrace errors
pub type Result<T> = std::result::Result<T, TreeError>;

/// Convenience function to create invariant errors
pub fn invariant_error(message: impl Into<String>) -> TreeError {
    TreeError::new(message, ErrorCategory::Invariant)
}

/// Convenience function to create config errors
pub fn config_error(message: impl Into<String>) -> TreeError {
    TreeError::new(message, ErrorCategory::Config)
}

impl From<std::io::Error> for TreeError {
    fn from(err: std::io::Error) -> Self {
        TreeError::with_source(err.to_string(), ErrorCategory::Io, Box::new(err))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error;

    #[test]
    fn test_error_category_display() {
        assert_eq!(format!("{}", ErrorCategory::Invariant), "invariant");
        assert_eq!(format!("{}", ErrorCategory::Parse), "parse");
        assert_eq!(format!("{}", ErrorCategory::Io), "io");
    }

    #[test]
    fn test_tree_error_with_context() {
        let err = invariant_error("balance factor out of range")
            .with_context("key", 30)
            .with_context("balance", -2);

        assert_eq!(err.context().len(), 2);
        assert_eq!(err.context_value("key"), Some("30"));
        assert_eq!(err.context_value("balance"), Some("-2"));
        assert_eq!(err.context_value("missing"), None);
    }

    #[test]
    fn test_with_source_keeps_cause() {
        let cause = std::io::Error::new(std::io::ErrorKind::InvalidData, "bad bytes");
        let err = TreeError::with_source("decode trace", ErrorCategory::Parse, Box::new(cause))
            .with_context("path", "trace.json");

        assert!(err.is_parse_error());
        assert_eq!(err.source().map(|e| e.to_string()), Some("bad bytes".to_string()));
        assert_eq!(
            err.to_string(),
            "[parse] decode trace (path=trace.json)\nCaused by: bad bytes"
        );
    }

    #[test]
    fn test_convenience_functions() {
        assert!(invariant_error("x").is_invariant_error());
        assert!(config_error("x").is_config_error());
        assert_eq!(config_error("x").category(), &ErrorCategory::Config);
        assert!(!config_error("x").is_parse_error());
    }

    #[test]
    fn test_error_display_with_context() {
        let err = invariant_error("red node has red child")
            .with_context("node", "n3")
            .with_context("key", 15);
        assert_eq!(
            err.to_string(),
            "[invariant] red node has red child (node=n3, key=15)"
        );
    }

    #[test]
    fn test_io_conversion() {
        let io = std::io::Error::new(std::io::ErrorKind::NotFound, "missing");
        let err: TreeError = io.into();
        assert!(err.is_io_error());
        assert!(err.to_string().contains("Caused by: missing"));
    }
}
