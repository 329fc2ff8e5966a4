use std::path::PathBuf;

use thiserror::Error;

/// Failures from the filter engine or resampler.
///
/// Neither variant is shown to the user: invalid parameters are rejected
/// before dispatch and engine failures leave the last good image on screen.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum FilterError {
    #[error("invalid filter parameters: {0}")]
    InvalidParameters(String),
    #[error("filter engine produced no output: {0}")]
    EngineFailure(String),
}

/// Failures while saving a filtered photo. Always surfaced to the user.
#[derive(Error, Debug)]
pub enum SaveError {
    #[error(
        "Photo library access denied. Grant write access to {} and try again.",
        .location.display()
    )]
    PersistenceDenied { location: PathBuf },
    #[error("Could not save photo: {0}")]
    PersistenceFailure(String),
    #[error("Could not render photo for saving: {0}")]
    Filter(#[from] FilterError),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_denied_message_names_location() {
        let err = SaveError::PersistenceDenied {
            location: PathBuf::from("/photos"),
        };
        let msg = err.to_string();
        assert!(msg.contains("denied"));
        assert!(msg.contains("/photos"));
    }

    #[test]
    fn test_filter_error_converts_into_save_error() {
        let err: SaveError = FilterError::EngineFailure("empty image".into()).into();
        assert!(matches!(err, SaveError::Filter(FilterError::EngineFailure(_))));
        assert!(err.to_string().contains("empty image"));
    }

    #[test]
    fn test_persistence_failure_keeps_underlying_message() {
        let err = SaveError::PersistenceFailure("disk full".into());
        assert_eq!(err.to_string(), "Could not save photo: disk full");
    }
}
