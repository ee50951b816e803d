//! Error types for the colorchip_season library

use thiserror::Error;

/// Result type alias for colorchip_season operations
pub type Result<T> = std::result::Result<T, AnalysisError>;

/// Error types for extraction, classification and catalog operations
#[derive(Error, Debug)]
pub enum AnalysisError {
    /// Encoded image bytes could not be decoded
    #[error("Failed to decode image: {message}")]
    ImageDecodeError {
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// Raw pixel buffer does not match the declared dimensions
    #[error("Invalid image buffer: {width}x{height} RGB needs {expected} bytes, got {len}")]
    InvalidImageBuffer {
        width: u32,
        height: u32,
        expected: usize,
        len: usize,
    },

    /// Pixel population empty or unusable at some pipeline stage
    #[error("Degenerate pixel population at {stage}: {reason}")]
    DegeneratePixels { stage: String, reason: String },

    /// Clustering could not produce a usable partition
    #[error("Clustering failed: {reason}")]
    ClusteringError { reason: String },

    /// Caller passed a malformed value (wrong arity, NaN, out of range)
    #[error("Invalid input: {parameter} = {value}")]
    InvalidInput { parameter: String, value: String },

    /// Season palette cannot be used for classification
    #[error("Invalid palette: {reason}")]
    InvalidPalette { reason: String },

    /// Hex color string is not of the form #RRGGBB
    #[error("Invalid hex color {value:?}: {reason}")]
    InvalidHex { value: String, reason: String },

    /// Season label not one of spring, summer, autumn, winter
    #[error("Unknown season label: {label}")]
    UnknownSeason { label: String },

    /// Extraction case label not one of A_normal, B_hardcase
    #[error("Unknown case type: {label}")]
    UnknownCaseType { label: String },

    /// Configuration file could not be read or written
    #[error("Configuration error: {message}")]
    ConfigError {
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },
}

impl AnalysisError {
    /// Create an image decode error with context
    pub fn image_decode<E>(message: impl Into<String>, source: E) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        Self::ImageDecodeError {
            message: message.into(),
            source: Some(Box::new(source)),
        }
    }

    /// Create a configuration error with context
    pub fn config<E>(message: impl Into<String>, source: E) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        Self::ConfigError {
            message: message.into(),
            source: Some(Box::new(source)),
        }
    }

    /// Create a degenerate-pixels error for a named stage
    pub fn degenerate(stage: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::DegeneratePixels {
            stage: stage.into(),
            reason: reason.into(),
        }
    }

    /// Create an invalid-input error
    pub fn invalid_input(parameter: impl Into<String>, value: impl ToString) -> Self {
        Self::InvalidInput {
            parameter: parameter.into(),
            value: value.to_string(),
        }
    }

    /// Check if this error is absorbed by the extraction fallback
    ///
    /// Extraction failures degrade to the neutral gray color; classifier and
    /// palette errors are contract violations and must reach the caller.
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            AnalysisError::ImageDecodeError { .. }
                | AnalysisError::InvalidImageBuffer { .. }
                | AnalysisError::DegeneratePixels { .. }
                | AnalysisError::ClusteringError { .. }
        )
    }

    /// Get user-friendly error description for application display
    pub fn user_message(&self) -> String {
        match self {
            AnalysisError::ImageDecodeError { .. } | AnalysisError::InvalidImageBuffer { .. } => {
                "Could not read the product image. A neutral placeholder color was used."
                    .to_string()
            }
            AnalysisError::DegeneratePixels { .. } | AnalysisError::ClusteringError { .. } => {
                "No usable color region in the product image. A neutral placeholder was used."
                    .to_string()
            }
            AnalysisError::InvalidInput { parameter, .. } => {
                format!("The measured color is invalid ({}). Please measure again.", parameter)
            }
            AnalysisError::InvalidPalette { .. } => {
                "The season palette could not be loaded.".to_string()
            }
            _ => "Color processing failed. Please check the input data.".to_string(),
        }
    }
}
