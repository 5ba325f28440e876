//! Error handling for the conversation decorator
//!
//! The decorator never fails hard on malformed notification input. Every
//! variant that can be produced by [`crate::Decorator::apply`] is recoverable:
//! the caller keeps whatever it displayed before and waits for the next event
//! to correct the state.
//!
//! ## Error Categories
//!
//! ### Input Errors
//! - `MissingField`: a required text field (title, or summary when a ticker
//!   exists) is absent; the event is rejected before any conversation state
//!   is touched.
//! - `NoHistoryExtracted`: the retained-notification scan produced no usable
//!   line; nothing should be overwritten.
//!
//! ### Configuration Errors
//! - `InvalidPattern`: a configured thread key pattern is not a valid regex.
//!
//! Unparseable unread counters and ambiguous conversation kinds are not
//! errors at all. They are logged at `debug` level and resolved by later
//! evidence.
//!
//! ## Example
//!
//! ```rust
//! use cosmic_ext_connect_decorator::DecoratorError;
//!
//! let error = DecoratorError::MissingField("title");
//! assert_eq!(error.to_string(), "Missing field: title");
//! assert!(error.is_recoverable());
//! ```

use thiserror::Error;

/// Result type for decorator operations
pub type Result<T> = std::result::Result<T, DecoratorError>;

/// Errors that can occur while decorating a notification
#[derive(Error, Debug)]
pub enum DecoratorError {
    /// A required notification field is absent
    #[error("Missing field: {0}")]
    MissingField(&'static str),

    /// The retained-notification scan found zero usable lines
    #[error("No history extracted for conversation \"{title}\"")]
    NoHistoryExtracted { title: String },

    /// A configured thread key pattern failed to compile
    #[error("Invalid thread key pattern: {0}")]
    InvalidPattern(#[from] regex::Error),
}

impl DecoratorError {
    /// Whether the caller should treat this error as "no update" and carry on
    ///
    /// Input errors only mean this particular event could not improve the
    /// displayed state. Configuration errors need to be fixed by the user.
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            DecoratorError::MissingField(_) | DecoratorError::NoHistoryExtracted { .. }
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let error = DecoratorError::MissingField("summary");
        assert_eq!(error.to_string(), "Missing field: summary");

        let error = DecoratorError::NoHistoryExtracted {
            title: "Oasis".to_string(),
        };
        assert_eq!(
            error.to_string(),
            "No history extracted for conversation \"Oasis\""
        );
    }

    #[test]
    fn test_recoverable_classification() {
        assert!(DecoratorError::MissingField("title").is_recoverable());
        assert!(DecoratorError::NoHistoryExtracted {
            title: String::new()
        }
        .is_recoverable());

        let regex_error = regex::Regex::new("(").unwrap_err();
        assert!(!DecoratorError::from(regex_error).is_recoverable());
    }
}
