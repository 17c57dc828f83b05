use pastexen_core::{HotkeyError, UploadError};

use std::{panic::Location, path::PathBuf, result::Result as StdResult};

use error_location::ErrorLocation;
use thiserror::Error;

/// Application-level errors for the pastexen binary.
///
/// All variants include `ErrorLocation` for call-site tracking.
#[derive(Error, Debug)]
pub enum AppError {
    /// Hotkey subsystem error from pastexen-core.
    #[error("Hotkey error: {source} {location}")]
    Hotkey {
        /// The underlying hotkey error.
        #[source]
        source: HotkeyError,
        /// Location where this error was created.
        location: ErrorLocation,
    },

    /// Upload error from pastexen-core.
    #[error("Upload error: {source} {location}")]
    Upload {
        /// The underlying upload error.
        #[source]
        source: UploadError,
        /// Location where this error was created.
        location: ErrorLocation,
    },

    /// The capture collaborator failed to produce content.
    #[error("Capture failed: {reason} {location}")]
    Capture {
        /// Human-readable reason for failure.
        reason: String,
        /// Location where this error was created.
        location: ErrorLocation,
    },

    /// The captured file could not be read back.
    #[error("Failed to read payload {path:?}: {source} {location}")]
    PayloadRead {
        /// File the capture command was asked to write.
        path: PathBuf,
        /// The underlying IO error.
        #[source]
        source: std::io::Error,
        /// Location where this error was created.
        location: ErrorLocation,
    },

    /// Clipboard access failed.
    #[error("Clipboard error: {reason} {location}")]
    ClipboardError {
        /// Human-readable reason for failure.
        reason: String,
        /// Location where this error was created.
        location: ErrorLocation,
    },

    /// Failed to send message through a channel.
    #[error("Channel send failed: {message} {location}")]
    ChannelSendFailed {
        /// Human-readable error message.
        message: String,
        /// Location where this error was created.
        location: ErrorLocation,
    },

    /// Configuration loading or saving error.
    #[error("Configuration error: {reason} {location}")]
    ConfigError {
        /// Human-readable reason for failure.
        reason: String,
        /// Location where this error was created.
        location: ErrorLocation,
    },

    /// IO error from filesystem operations.
    #[error("IO error: {source} {location}")]
    IoError {
        /// The underlying IO error.
        #[source]
        source: std::io::Error,
        /// Location where this error was created.
        location: ErrorLocation,
    },
}

// Manual From impls with location tracking.
// Cannot use #[from] because it does not support extra fields.
impl From<HotkeyError> for AppError {
    #[track_caller]
    fn from(source: HotkeyError) -> Self {
        AppError::Hotkey {
            source,
            location: ErrorLocation::from(Location::caller()),
        }
    }
}

impl From<UploadError> for AppError {
    #[track_caller]
    fn from(source: UploadError) -> Self {
        AppError::Upload {
            source,
            location: ErrorLocation::from(Location::caller()),
        }
    }
}

impl From<std::io::Error> for AppError {
    #[track_caller]
    fn from(source: std::io::Error) -> Self {
        AppError::IoError {
            source,
            location: ErrorLocation::from(Location::caller()),
        }
    }
}

/// Convenience type alias for Results using `AppError`.
pub type Result<T> = StdResult<T, AppError>;
