use thiserror::Error;

/// Every failure the gateway, orchestrator or session can surface.
///
/// `Display` is the user-readable message stored as the session error.
#[derive(Debug, Error)]
pub enum StudioError {
    #[error("Please enter a menu.")]
    EmptyInput,
    #[error("Please describe the edit you want to make.")]
    EmptyInstruction,
    #[error("Could not parse any dishes from the menu.")]
    NoDishesParsed,
    #[error("Photo generation stopped before it finished.")]
    RunInterrupted,
    #[error("The AI returned a malformed response: {0}")]
    MalformedResponse(String),
    #[error("Image generation failed to produce an image: {0}")]
    GenerationFailed(String),
    #[error("Image editing failed. The AI did not return an edited image: {0}")]
    EditFailed(String),
    #[error("No generated image with id {0}")]
    ImageNotFound(String),
    #[error("Unknown style preset: {0}")]
    UnknownStyle(String),
    #[error("Configuration error: {0}")]
    ConfigError(String),
    #[error("Request error: {0}")]
    RequestError(String),
    #[error("API error ({status}): {message}")]
    ApiError { status: u16, message: String },
    #[error("Response error: {0}")]
    ResponseError(String),
    #[error("Serialization error: {0}")]
    SerializationError(String),
    #[error("I/O error: {0}")]
    IoError(String),
}

impl StudioError {
    /// True for failures that come from talking to the service rather than
    /// from validating what it sent back.
    pub fn is_transport(&self) -> bool {
        matches!(
            self,
            StudioError::RequestError(_) | StudioError::ApiError { .. }
        )
    }
}

impl From<reqwest::Error> for StudioError {
    fn from(e: reqwest::Error) -> Self {
        StudioError::RequestError(e.to_string())
    }
}

impl From<std::io::Error> for StudioError {
    fn from(e: std::io::Error) -> Self {
        StudioError::IoError(e.to_string())
    }
}

pub type Result<T> = std::result::Result<T, StudioError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_user_facing_messages() {
        assert_eq!(StudioError::EmptyInput.to_string(), "Please enter a menu.");
        assert_eq!(
            StudioError::NoDishesParsed.to_string(),
            "Could not parse any dishes from the menu."
        );
        let api = StudioError::ApiError {
            status: 429,
            message: "quota".into(),
        };
        assert_eq!(api.to_string(), "API error (429): quota");
    }

    #[test]
    fn test_transport_classification() {
        assert!(StudioError::RequestError("timeout".into()).is_transport());
        assert!(!StudioError::NoDishesParsed.is_transport());
        assert!(!StudioError::MalformedResponse("x".into()).is_transport());
        assert!(!StudioError::RunInterrupted.is_transport());
    }
}
