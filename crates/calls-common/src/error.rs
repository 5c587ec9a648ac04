//! Error types and utilities for calls911

use thiserror::Error;

/// Result type alias for calls911 operations
pub type Result<T> = std::result::Result<T, CallsError>;

/// Boxed error used as the `source` of wrapped failures
type BoxedSource = Box<dyn std::error::Error + Send + Sync>;

/// Main error type for calls911 operations
#[derive(Error, Debug)]
pub enum CallsError {
    /// The input source is unreadable or structurally malformed
    #[error("Load error: {message}")]
    Load {
        message: String,
        path: Option<String>,
        #[source]
        source: Option<BoxedSource>,
    },

    /// A timestamp (or other typed cell) could not be parsed
    #[error("Parse error: {message}")]
    Parse {
        message: String,
        row: Option<usize>,
        value: Option<String>,
    },

    /// Configuration related errors
    #[error("Configuration error: {message}")]
    Config {
        message: String,
        #[source]
        source: Option<BoxedSource>,
    },

    /// I/O related errors
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization/deserialization errors
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Graph generation and plotting errors
    #[error("Graph error: {message}")]
    Graph {
        message: String,
        #[source]
        source: Option<BoxedSource>,
    },

    /// Generic error with custom message
    #[error("{message}")]
    Generic {
        message: String,
        #[source]
        source: Option<BoxedSource>,
    },
}

impl CallsError {
    /// Create a new generic error with a custom message
    pub fn new(msg: impl Into<String>) -> Self {
        Self::Generic {
            message: msg.into(),
            source: None,
        }
    }

    /// Create a new generic error with a custom message and source
    pub fn with_source(
        msg: impl Into<String>,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        Self::Generic {
            message: msg.into(),
            source: Some(Box::new(source)),
        }
    }

    /// Create a new load error
    pub fn load(msg: impl Into<String>) -> Self {
        Self::Load {
            message: msg.into(),
            path: None,
            source: None,
        }
    }

    /// Create a new load error with source
    pub fn load_with_source(
        msg: impl Into<String>,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        Self::Load {
            message: msg.into(),
            path: None,
            source: Some(Box::new(source)),
        }
    }

    /// Create a new parse error pointing at an input row and the offending value
    pub fn parse_at(msg: impl Into<String>, row: usize, value: impl Into<String>) -> Self {
        Self::Parse {
            message: msg.into(),
            row: Some(row),
            value: Some(value.into()),
        }
    }

    /// Create a new configuration error
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config {
            message: msg.into(),
            source: None,
        }
    }

    /// Create a new configuration error with source
    pub fn config_with_source(
        msg: impl Into<String>,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        Self::Config {
            message: msg.into(),
            source: Some(Box::new(source)),
        }
    }

    /// Create a new graph error
    pub fn graph(msg: impl Into<String>) -> Self {
        Self::Graph {
            message: msg.into(),
            source: None,
        }
    }

    /// Create a new graph error with source
    pub fn graph_with_source(
        msg: impl Into<String>,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        Self::Graph {
            message: msg.into(),
            source: Some(Box::new(source)),
        }
    }

    /// Whether this error aborted the run before any record was processed
    pub fn is_load(&self) -> bool {
        matches!(self, Self::Load { .. } | Self::Io(_))
    }

    /// Whether this error came from timestamp parsing
    pub fn is_parse(&self) -> bool {
        matches!(self, Self::Parse { .. })
    }
}

/// Convert from csv::Error to CallsError
impl From<csv::Error> for CallsError {
    fn from(err: csv::Error) -> Self {
        let message = match err.position() {
            Some(pos) => format!("Malformed CSV near line {}", pos.line()),
            None => "Malformed CSV input".to_string(),
        };
        Self::load_with_source(message, err)
    }
}

#[cfg(feature = "plotters")]
/// Convert from plotters drawing errors to CallsError
impl<T> From<plotters::drawing::DrawingAreaErrorKind<T>> for CallsError
where
    T: std::error::Error + Send + Sync + 'static,
{
    fn from(err: plotters::drawing::DrawingAreaErrorKind<T>) -> Self {
        Self::graph_with_source("Graph rendering failed", err)
    }
}
