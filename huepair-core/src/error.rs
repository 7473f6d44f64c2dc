//! Error types for the huepair core

use thiserror::Error;

/// Result type alias for huepair core operations
pub type Result<T> = std::result::Result<T, AnalysisError>;

/// Failures surfaced by the core.
///
/// The color math itself never fails: out-of-range inputs are clamped.
/// The only real analysis failure is an image that cannot be decoded.
#[derive(Error, Debug)]
pub enum AnalysisError {
    /// Image file could not be opened or decoded
    #[error("Failed to load image: {message}")]
    ImageLoad {
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// Analysis configuration could not be read or written
    #[error("Configuration error: {message}")]
    Config {
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// Hex color string is not `#RRGGBB`
    #[error("Invalid hex color: {value:?}")]
    InvalidHex { value: String },
}

impl AnalysisError {
    /// Create an image load error with context
    pub fn image_load<E>(message: impl Into<String>, source: E) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        Self::ImageLoad {
            message: message.into(),
            source: Some(Box::new(source)),
        }
    }

    /// Create a configuration error with context
    pub fn config<E>(message: impl Into<String>, source: E) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        Self::Config {
            message: message.into(),
            source: Some(Box::new(source)),
        }
    }

    /// Get user-friendly error description for application display
    pub fn user_message(&self) -> String {
        match self {
            AnalysisError::ImageLoad { .. } => {
                "Failed to analyze image. Please try a different file.".to_string()
            }
            AnalysisError::Config { message, .. } => {
                format!("Could not use the analysis configuration: {}", message)
            }
            AnalysisError::InvalidHex { value } => {
                format!("\"{}\" is not a color of the form #RRGGBB.", value)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_image_load_display() {
        let io = std::io::Error::new(std::io::ErrorKind::NotFound, "missing");
        let error = AnalysisError::image_load("Failed to open photo.jpg", io);
        assert_eq!(error.to_string(), "Failed to load image: Failed to open photo.jpg");
        assert!(std::error::Error::source(&error).is_some());
    }

    #[test]
    fn test_invalid_hex_display() {
        let error = AnalysisError::InvalidHex {
            value: "#12".to_string(),
        };
        assert_eq!(error.to_string(), "Invalid hex color: \"#12\"");
    }

    #[test]
    fn test_user_message_for_decode_failure() {
        let io = std::io::Error::new(std::io::ErrorKind::InvalidData, "bad header");
        let error = AnalysisError::image_load("decode", io);
        assert_eq!(
            error.user_message(),
            "Failed to analyze image. Please try a different file."
        );
    }
}
