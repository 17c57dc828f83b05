use crate::{ProtocolError, UploadError};

use std::{fmt, panic::Location, str::FromStr};

use error_location::ErrorLocation;

/// Image encodings the server accepts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ImageType {
    /// PNG.
    #[default]
    Png,
    /// JPEG.
    Jpg,
}

/// Source-text flavours the server highlights.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SourceType {
    /// Plain text.
    #[default]
    Txt,
    /// C++.
    Cpp,
    /// Pascal.
    Pas,
}

/// What the payload is; rendered into the header's `type` field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContentKind {
    /// An encoded image.
    Image(ImageType),
    /// Source text.
    Text(SourceType),
}

impl ImageType {
    /// Wire tag and file extension.
    pub fn tag(self) -> &'static str {
        match self {
            ImageType::Png => "png",
            ImageType::Jpg => "jpg",
        }
    }
}

impl SourceType {
    /// Wire tag and file extension.
    pub fn tag(self) -> &'static str {
        match self {
            SourceType::Txt => "txt",
            SourceType::Cpp => "cpp",
            SourceType::Pas => "pas",
        }
    }
}

impl ContentKind {
    /// Value of the header's `type` field.
    pub fn tag(self) -> &'static str {
        match self {
            ContentKind::Image(image) => image.tag(),
            ContentKind::Text(source) => source.tag(),
        }
    }
}

impl fmt::Display for ContentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag())
    }
}

impl FromStr for ImageType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "png" => Ok(ImageType::Png),
            "jpg" | "jpeg" => Ok(ImageType::Jpg),
            other => Err(format!("unknown image type {:?}", other)),
        }
    }
}

impl FromStr for SourceType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "txt" => Ok(SourceType::Txt),
            "cpp" => Ok(SourceType::Cpp),
            "pas" => Ok(SourceType::Pas),
            other => Err(format!("unknown source type {:?}", other)),
        }
    }
}

/// An immutable upload: payload, kind and the length the header declares.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadRequest {
    payload: Vec<u8>,
    kind: ContentKind,
    declared_size: usize,
}

impl UploadRequest {
    /// Build a request whose declared size is the payload length.
    pub fn new(payload: Vec<u8>, kind: ContentKind) -> Self {
        let declared_size = payload.len();
        Self {
            payload,
            kind,
            declared_size,
        }
    }

    /// Build a request with an explicit declared size.
    ///
    /// The server trusts `size` to delimit the payload, so a mismatch is
    /// rejected here, before any byte is sent.
    #[track_caller]
    pub fn with_declared_size(
        payload: Vec<u8>,
        kind: ContentKind,
        declared_size: usize,
    ) -> Result<Self, UploadError> {
        if declared_size != payload.len() {
            return Err(ProtocolError::SizeMismatch {
                declared: declared_size,
                actual: payload.len(),
                location: ErrorLocation::from(Location::caller()),
            }
            .into());
        }

        Ok(Self {
            payload,
            kind,
            declared_size,
        })
    }

    /// Payload bytes.
    pub fn payload(&self) -> &[u8] {
        &self.payload
    }

    /// Content kind.
    pub fn kind(&self) -> ContentKind {
        self.kind
    }

    /// Size written into the header.
    pub fn declared_size(&self) -> usize {
        self.declared_size
    }
}
