//! Error types shared by the modal view models and presenters.

use matrix_sdk::ruma::events::TimelineEventType;

/// A required setting or input was missing or malformed.
///
/// These are returned to the host application at feature start-up
/// so that it can decide how to degrade, rather than aborting.
#[derive(Debug, thiserror::Error)]
pub enum ConfigurationError {
    #[error("the web app URL {url:?} is invalid: {source}")]
    InvalidWebAppUrl {
        url: String,
        #[source]
        source: url::ParseError,
    },
    #[error("the web app URL {0:?} must use http or https")]
    UnsupportedWebAppScheme(String),
    #[error("the full date format is empty")]
    EmptyDateFormat,
    #[error("the full date format {0:?} contains an unknown specifier")]
    InvalidDateFormat(String),
    #[error("the avatar thumbnail size must be non-zero")]
    ZeroAvatarThumbnailSize,
    #[error("failed to parse settings: {0}")]
    MalformedSettings(#[from] serde_json::Error),
    #[error("failed to read settings: {0}")]
    Io(#[from] std::io::Error),
    #[error("the collapsed event batch chain exceeds {limit} batches")]
    BatchChainTooLong { limit: usize },
}

/// A single timeline event could not be turned into display text.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum FormattingError {
    #[error("no text format is known for {0} events")]
    UnsupportedEventType(TimelineEventType),
    #[error("invalid content for {event_type} event: {reason}")]
    InvalidContent {
        event_type: TimelineEventType,
        reason: String,
    },
}

/// A row was requested outside of `[0, row_count)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("row index {index} is out of range (row count is {row_count})")]
pub struct RowIndexOutOfRange {
    pub index: usize,
    pub row_count: usize,
}
