use error_location::ErrorLocation;
use thiserror::Error;

/// Hotkey parsing, translation and registration errors with source location tracking.
#[derive(Error, Debug)]
pub enum HotkeyError {
    /// Shortcut string is unparseable or ambiguous.
    #[error("Invalid key combination {combo:?}: {reason} {location}")]
    InvalidCombo {
        /// The offending shortcut string.
        combo: String,
        /// Why the string was rejected.
        reason: String,
        /// Source location where error occurred.
        location: ErrorLocation,
    },

    /// Terminal key has no equivalent on this backend.
    #[error("Unsupported key: {key} {location}")]
    UnsupportedKey {
        /// Name of the key as written.
        key: String,
        /// Source location where error occurred.
        location: ErrorLocation,
    },

    /// Modifier has no equivalent on this backend.
    #[error("Unsupported modifier: {modifier} {location}")]
    UnsupportedModifier {
        /// Name of the modifier.
        modifier: String,
        /// Source location where error occurred.
        location: ErrorLocation,
    },

    /// The combination is already claimed, system-wide or by another action.
    #[error("Hotkey {combo} is already in use: {reason} {location}")]
    Conflict {
        /// Canonical form of the combination.
        combo: String,
        /// Description of the conflict.
        reason: String,
        /// Source location where error occurred.
        location: ErrorLocation,
    },

    /// The native hotkey backend failed for another reason.
    #[error("Hotkey backend error: {reason} {location}")]
    Backend {
        /// Description of the backend failure.
        reason: String,
        /// Source location where error occurred.
        location: ErrorLocation,
    },

    /// The registry has been shut down.
    #[error("Hotkey registry is shut down {location}")]
    Inactive {
        /// Source location where error occurred.
        location: ErrorLocation,
    },
}

/// Violations of the pastexen wire protocol.
#[derive(Error, Debug)]
pub enum ProtocolError {
    /// Server response is missing the `url` field or is not `key=value` lines.
    #[error("Malformed response: {reason} {location}")]
    MalformedResponse {
        /// What was wrong with the response.
        reason: String,
        /// Source location where error occurred.
        location: ErrorLocation,
    },

    /// Declared payload size differs from the actual payload length.
    #[error("Declared size {declared} does not match payload length {actual} {location}")]
    SizeMismatch {
        /// Size the caller declared.
        declared: usize,
        /// Actual payload length.
        actual: usize,
        /// Source location where error occurred.
        location: ErrorLocation,
    },
}

/// Terminal failure of a single upload.
#[derive(Error, Debug)]
pub enum UploadError {
    /// Name resolution, connect, write or read failure.
    #[error("Network error: {reason}: {source} {location}")]
    Network {
        /// Which step of the upload failed.
        reason: String,
        /// The underlying IO error.
        #[source]
        source: std::io::Error,
        /// Source location where error occurred.
        location: ErrorLocation,
    },

    /// The request or response violates the protocol.
    #[error("Protocol error: {source} {location}")]
    Protocol {
        /// The underlying protocol error.
        #[source]
        source: ProtocolError,
        /// Source location where error occurred.
        location: ErrorLocation,
    },

    /// The upload was cancelled by the caller.
    #[error("Upload cancelled {location}")]
    Cancelled {
        /// Source location where error occurred.
        location: ErrorLocation,
    },
}

// Manual From<ProtocolError> with location tracking.
// Cannot use #[from] because it does not support extra fields.
impl From<ProtocolError> for UploadError {
    #[track_caller]
    fn from(source: ProtocolError) -> Self {
        UploadError::Protocol {
            source,
            location: ErrorLocation::from(std::panic::Location::caller()),
        }
    }
}

impl UploadError {
    /// True when the failure came from the protocol layer rather than the network.
    pub fn is_protocol(&self) -> bool {
        matches!(self, UploadError::Protocol { .. })
    }
}

/// Result type alias using [`HotkeyError`].
pub type HotkeyResult<T> = std::result::Result<T, HotkeyError>;

/// Outcome of one upload: the shareable link or the terminal error.
pub type UploadResult = std::result::Result<String, UploadError>;
