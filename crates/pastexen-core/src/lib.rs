//! Pastexen Core Library
//!
//! Global hotkey registry, OS event bridge and the pastexen upload client.
//!
//! # Example
//!
//! ```no_run
//! use pastexen_core::{ContentKind, Endpoint, ImageType, UploadClient, UploadRequest};
//!
//! #[tokio::main]
//! async fn main() {
//!     let client = UploadClient::new(Endpoint::default(), Default::default());
//!     let request = UploadRequest::new(std::fs::read("shot.png").unwrap_or_default(),
//!         ContentKind::Image(ImageType::Png));
//!
//!     match client.upload(request).await {
//!         Ok(url) => println!("Uploaded: {}", url),
//!         Err(e) => eprintln!("Upload failed: {}", e),
//!     }
//! }
//! ```

mod bridge;
mod error;
mod hotkey;
mod upload;

pub use {
    bridge::{
        ActionDispatcher, BridgeEvent, HotkeyBridge, KeyComboMatcher, RawKey, RawKeyEvent,
        forward_native_events,
    },
    error::{HotkeyError, HotkeyResult, ProtocolError, UploadError, UploadResult},
    hotkey::{
        ActionId, BindingSnapshot, GrabBackend, HotkeyBackend, HotkeyBinding, HotkeyRegistry, Key,
        KeyCombo, Modifier, Modifiers, NativeBackend, NativeId, SharedBindings, from_native,
        to_native,
    },
    upload::{
        ContentKind, Endpoint, ImageType, SourceType, UploadClient, UploadHandle, UploadRequest,
        UploadState, UploadTimeouts, encode_header, parse_response,
    },
};

#[cfg(feature = "raw-listener")]
pub use bridge::spawn_raw_listener;
