//! Clipboard integration: source text in, links out.
//!
//! Code share reads the clipboard's text; a finished upload's link is copied
//! back to the clipboard and optionally opened in the default browser.

use crate::{AppError, AppResult};

use std::panic::Location;

use arboard::Clipboard;
use error_location::ErrorLocation;
use tracing::{debug, info, instrument, warn};

/// Owns the clipboard handle for the app's lifetime.
///
/// On X11 the clipboard contents are served by the owning process, so the
/// handle must outlive the copy.
pub struct ClipboardHandler {
    pub(crate) clipboard: Clipboard,
}

impl ClipboardHandler {
    /// Open the system clipboard.
    #[track_caller]
    #[instrument]
    pub fn new() -> AppResult<Self> {
        let clipboard = Clipboard::new().map_err(|e| AppError::ClipboardError {
            reason: format!("Failed to initialize clipboard: {}", e),
            location: ErrorLocation::from(Location::caller()),
        })?;

        info!("ClipboardHandler initialized");

        Ok(Self { clipboard })
    }

    /// Current clipboard text. Empty or whitespace-only text is a capture error.
    #[track_caller]
    #[instrument(skip(self))]
    pub fn read_text(&mut self) -> AppResult<String> {
        let text = self
            .clipboard
            .get_text()
            .map_err(|e| AppError::ClipboardError {
                reason: format!("Failed to read clipboard: {}", e),
                location: ErrorLocation::from(Location::caller()),
            })?;

        if text.trim().is_empty() {
            return Err(AppError::Capture {
                reason: "Clipboard holds no text to share".to_string(),
                location: ErrorLocation::from(Location::caller()),
            });
        }

        debug!(text_len = text.len(), "Clipboard text read");

        Ok(text)
    }

    /// Hand a finished upload's link to the user.
    ///
    /// A browser failure is logged; the copy has already happened by then.
    #[track_caller]
    #[instrument(skip(self))]
    pub fn deliver_link(&mut self, url: &str, copy: bool, open_in_browser: bool) -> AppResult<()> {
        if copy {
            self.clipboard
                .set_text(url)
                .map_err(|e| AppError::ClipboardError {
                    reason: format!("Failed to set clipboard: {}", e),
                    location: ErrorLocation::from(Location::caller()),
                })?;
            debug!("Link copied to clipboard");
        }

        if open_in_browser {
            if let Err(e) = open::that(url) {
                warn!(error = %e, "Failed to open link in browser");
            }
        }

        info!(copied = copy, opened = open_in_browser, "Link delivered");

        Ok(())
    }
}
