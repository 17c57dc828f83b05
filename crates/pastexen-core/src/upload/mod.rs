mod client;
mod protocol;
mod request;

pub use {
    client::{Endpoint, UploadClient, UploadHandle, UploadState, UploadTimeouts},
    protocol::{encode_header, parse_response},
    request::{ContentKind, ImageType, SourceType, UploadRequest},
};

pub(crate) use protocol::{MAX_RESPONSE_BYTES, response_complete};
