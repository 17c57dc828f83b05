//! Screenshot capture through an external command.
//!
//! The command is an argv list from the config. `{file}` in any argument is
//! replaced with a fresh temp path; the command writes an image there, which
//! is read back and re-encoded to the configured upload format.

use crate::{AppError, AppResult, config::FILE_PLACEHOLDER};

use pastexen_core::ImageType;

use std::{
    io::Cursor,
    panic::Location,
    path::{Path, PathBuf},
};

use error_location::ErrorLocation;
use image::ImageFormat;
use tokio::process::Command;
use tracing::{debug, info, instrument, warn};
use uuid::Uuid;

/// Run `command`, then return the captured image encoded as `image_type`.
///
/// A non-zero exit (e.g. the user dismissed a region selection) or a missing
/// output file fails this capture only.
#[instrument(skip(command), fields(program = command.first().map(String::as_str)))]
pub async fn capture_screen(
    command: &[String],
    image_type: ImageType,
    trigger_id: Uuid,
) -> AppResult<Vec<u8>> {
    let output = capture_path(trigger_id);
    let argv = substitute_file(command, &output)?;

    let status = Command::new(&argv[0])
        .args(&argv[1..])
        .status()
        .await
        .map_err(|e| AppError::Capture {
            reason: format!("Failed to run {:?}: {}", argv[0], e),
            location: ErrorLocation::from(Location::caller()),
        })?;

    if !status.success() {
        let _ = tokio::fs::remove_file(&output).await;
        return Err(AppError::Capture {
            reason: format!("{:?} exited with {}", argv[0], status),
            location: ErrorLocation::from(Location::caller()),
        });
    }

    let raw = read_payload(&output).await;
    if let Err(e) = tokio::fs::remove_file(&output).await {
        debug!(path = ?output, error = %e, "Temp capture file not removed");
    }
    let raw = raw?;

    let encoded = tokio::task::spawn_blocking(move || encode_image(&raw, image_type))
        .await
        .map_err(|e| AppError::Capture {
            reason: format!("Encode task panicked: {}", e),
            location: ErrorLocation::from(Location::caller()),
        })??;

    info!(bytes = encoded.len(), format = image_type.tag(), "Screen captured");

    Ok(encoded)
}

/// Read a captured file back.
pub async fn read_payload(path: &Path) -> AppResult<Vec<u8>> {
    tokio::fs::read(path)
        .await
        .map_err(|source| AppError::PayloadRead {
            path: path.to_path_buf(),
            source,
            location: ErrorLocation::from(Location::caller()),
        })
}

/// Decode any supported image and re-encode it as `image_type`.
#[track_caller]
pub fn encode_image(bytes: &[u8], image_type: ImageType) -> AppResult<Vec<u8>> {
    let decoded = image::load_from_memory(bytes).map_err(|e| AppError::Capture {
        reason: format!("Captured file is not a readable image: {}", e),
        location: ErrorLocation::from(Location::caller()),
    })?;

    let mut out = Cursor::new(Vec::new());
    let written = match image_type {
        ImageType::Png => decoded.write_to(&mut out, ImageFormat::Png),
        // JPEG has no alpha channel.
        ImageType::Jpg => decoded.to_rgb8().write_to(&mut out, ImageFormat::Jpeg),
    };

    written.map_err(|e| AppError::Capture {
        reason: format!("Failed to encode {}: {}", image_type.tag(), e),
        location: ErrorLocation::from(Location::caller()),
    })?;

    Ok(out.into_inner())
}

/// Replace `{file}` in every argument. Fails on an empty command or one that
/// never mentions `{file}`.
#[track_caller]
pub fn substitute_file(command: &[String], output: &Path) -> AppResult<Vec<String>> {
    if command.is_empty() {
        return Err(AppError::Capture {
            reason: "No capture command configured".to_string(),
            location: ErrorLocation::from(Location::caller()),
        });
    }

    if !command.iter().any(|arg| arg.contains(FILE_PLACEHOLDER)) {
        warn!(command = ?command, "Capture command has no {{file}} placeholder");
        return Err(AppError::Capture {
            reason: format!("Capture command lacks {}", FILE_PLACEHOLDER),
            location: ErrorLocation::from(Location::caller()),
        });
    }

    let path = output.to_string_lossy();

    Ok(command
        .iter()
        .map(|arg| arg.replace(FILE_PLACEHOLDER, &path))
        .collect())
}

/// Temp path a capture for `trigger_id` writes to.
pub fn capture_path(trigger_id: Uuid) -> PathBuf {
    std::env::temp_dir().join(format!("pastexen-{}.png", trigger_id))
}
