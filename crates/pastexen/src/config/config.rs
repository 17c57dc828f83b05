//! Configuration management for pastexen.
//!
//! Settings live in one TOML file under the platform config directory and
//! are addressed by `section/key` names (`general/fullhotkey`, `server/port`,
//! ...). Writes are atomic: a temp file is written, synced, then renamed.

use crate::{
    AppError, AppResult,
    config::{
        BehaviourConfig, CaptureConfig, GeneralConfig, HotkeyBackendKind, HotkeysConfig,
        ServerConfig,
    },
};

use pastexen_core::{ActionId, Endpoint, ImageType, KeyCombo, SourceType, UploadTimeouts};

use std::{
    fs,
    io::Write,
    panic::Location,
    path::{Path, PathBuf},
    str::FromStr,
    time::Duration,
};

use directories::ProjectDirs;
use error_location::ErrorLocation;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, instrument, warn};

/// Main configuration struct.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    /// Hotkeys and content types.
    #[serde(default)]
    pub general: GeneralConfig,
    /// Upload server.
    #[serde(default)]
    pub server: ServerConfig,
    /// Hotkey backend selection.
    #[serde(default)]
    pub hotkeys: HotkeysConfig,
    /// External capture commands.
    #[serde(default)]
    pub capture: CaptureConfig,
    /// Link delivery.
    #[serde(default)]
    pub behaviour: BehaviourConfig,

    /// File this config was loaded from; `sync` writes back here.
    #[serde(skip)]
    source: Option<PathBuf>,
}

impl Config {
    /// Load configuration from the platform config directory, creating a
    /// default file if none exists.
    #[track_caller]
    #[instrument]
    pub fn load() -> AppResult<Self> {
        let config_path = Self::config_path()?;
        Self::load_from(&config_path)
    }

    /// Load configuration from `path`, creating a default file if missing.
    #[track_caller]
    #[instrument]
    pub fn load_from(path: &Path) -> AppResult<Self> {
        if !path.exists() {
            info!(config_path = ?path, "No config found, creating default");
            let mut config = Config::default();
            config.save_to(path)?;
            config.source = Some(path.to_path_buf());
            return Ok(config);
        }

        let contents = fs::read_to_string(path).map_err(|e| AppError::ConfigError {
            reason: format!("Failed to read config: {}", e),
            location: ErrorLocation::from(Location::caller()),
        })?;

        let mut config: Config = toml::from_str(&contents).map_err(|e| AppError::ConfigError {
            reason: format!("Failed to parse config: {}", e),
            location: ErrorLocation::from(Location::caller()),
        })?;
        config.source = Some(path.to_path_buf());

        info!(config_path = ?path, "Configuration loaded");

        Ok(config)
    }

    /// Like [`Config::load`], but an unreadable file yields defaults instead of
    /// an error.
    pub fn load_or_default() -> Self {
        match Self::config_path() {
            Ok(path) => Self::load_from_or_default(&path),
            Err(e) => {
                warn!(error = %e, "No config directory, using defaults");
                Config::default()
            }
        }
    }

    /// Like [`Config::load_from`], but an unreadable or malformed file yields
    /// defaults bound to `path`. The file itself is left untouched.
    #[instrument]
    pub fn load_from_or_default(path: &Path) -> Self {
        match Self::load_from(path) {
            Ok(config) => config,
            Err(e) => {
                warn!(config_path = ?path, error = %e, "Config unusable, using defaults");
                Config {
                    source: Some(path.to_path_buf()),
                    ..Config::default()
                }
            }
        }
    }

    /// Save to the platform config directory.
    #[track_caller]
    #[instrument(skip(self))]
    pub fn save(&self) -> AppResult<()> {
        let config_path = Self::config_path()?;
        self.save_to(&config_path)
    }

    /// Save to `path` using the atomic write pattern.
    #[track_caller]
    #[instrument(skip(self))]
    pub fn save_to(&self, path: &Path) -> AppResult<()> {
        let contents = toml::to_string_pretty(self).map_err(|e| AppError::ConfigError {
            reason: format!("Failed to serialize config: {}", e),
            location: ErrorLocation::from(Location::caller()),
        })?;

        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() && !parent.exists() {
                fs::create_dir_all(parent)?;
                debug!(config_dir = ?parent, "Created config directory");
            }
        }

        let temp_path = path.with_extension("toml.tmp");

        let mut temp_file = fs::File::create(&temp_path).map_err(|e| AppError::ConfigError {
            reason: format!("Failed to create temp config file: {}", e),
            location: ErrorLocation::from(Location::caller()),
        })?;

        temp_file
            .write_all(contents.as_bytes())
            .map_err(|e| AppError::ConfigError {
                reason: format!("Failed to write temp config file: {}", e),
                location: ErrorLocation::from(Location::caller()),
            })?;

        temp_file.sync_all().map_err(|e| AppError::ConfigError {
            reason: format!("Failed to sync temp config file: {}", e),
            location: ErrorLocation::from(Location::caller()),
        })?;

        fs::rename(&temp_path, path).map_err(|e| AppError::ConfigError {
            reason: format!("Failed to rename temp config to final: {}", e),
            location: ErrorLocation::from(Location::caller()),
        })?;

        info!(config_path = ?path, "Configuration saved (atomic write)");

        Ok(())
    }

    /// Persist pending `set` calls to the file this config came from.
    #[track_caller]
    pub fn sync(&self) -> AppResult<()> {
        match &self.source {
            Some(path) => self.save_to(path),
            None => self.save(),
        }
    }

    /// Value of a `section/key` setting, or `None` for an unknown key.
    pub fn get(&self, key: &str) -> Option<String> {
        let value = match key {
            "general/fullhotkey" => self.general.fullhotkey.clone(),
            "general/parthotkey" => self.general.parthotkey.clone(),
            "general/texthotkey" => self.general.texthotkey.clone(),
            "general/imagetype" => self.general.imagetype.clone(),
            "general/sourcetype" => self.general.sourcetype.clone(),
            "server/host" => self.server.host.clone(),
            "server/port" => self.server.port.to_string(),
            "server/connect_timeout_secs" => self.server.connect_timeout_secs.to_string(),
            "server/write_timeout_secs" => self.server.write_timeout_secs.to_string(),
            "server/response_timeout_secs" => self.server.response_timeout_secs.to_string(),
            "hotkeys/backend" => self.hotkeys.backend.to_string(),
            "capture/fullscreen_command" => self.capture.fullscreen_command.join(" "),
            "capture/region_command" => self.capture.region_command.join(" "),
            "behaviour/copy_link" => self.behaviour.copy_link.to_string(),
            "behaviour/open_link" => self.behaviour.open_link.to_string(),
            _ => return None,
        };

        Some(value)
    }

    /// Value of `key`, or `default` when the key is unknown.
    pub fn get_or(&self, key: &str, default: &str) -> String {
        self.get(key).unwrap_or_else(|| default.to_string())
    }

    /// Change a `section/key` setting in memory; call [`Config::sync`] to persist.
    ///
    /// Values are validated: hotkeys must parse (empty disables), numbers and
    /// booleans must parse, content types must be known tags. Capture
    /// commands are split on whitespace.
    #[track_caller]
    pub fn set(&mut self, key: &str, value: &str) -> AppResult<()> {
        match key {
            "general/fullhotkey" => self.general.fullhotkey = hotkey_value(value)?,
            "general/parthotkey" => self.general.parthotkey = hotkey_value(value)?,
            "general/texthotkey" => self.general.texthotkey = hotkey_value(value)?,
            "general/imagetype" => {
                self.general.imagetype = parse_value::<ImageType>(key, value)?.tag().to_string()
            }
            "general/sourcetype" => {
                self.general.sourcetype = parse_value::<SourceType>(key, value)?.tag().to_string()
            }
            "server/host" => self.server.host = value.trim().to_string(),
            "server/port" => self.server.port = parse_value(key, value)?,
            "server/connect_timeout_secs" => {
                self.server.connect_timeout_secs = parse_value(key, value)?
            }
            "server/write_timeout_secs" => {
                self.server.write_timeout_secs = parse_value(key, value)?
            }
            "server/response_timeout_secs" => {
                self.server.response_timeout_secs = parse_value(key, value)?
            }
            "hotkeys/backend" => self.hotkeys.backend = parse_value(key, value)?,
            "capture/fullscreen_command" => {
                self.capture.fullscreen_command = split_command(value)
            }
            "capture/region_command" => self.capture.region_command = split_command(value),
            "behaviour/copy_link" => self.behaviour.copy_link = parse_value(key, value)?,
            "behaviour/open_link" => self.behaviour.open_link = parse_value(key, value)?,
            _ => {
                return Err(AppError::ConfigError {
                    reason: format!("Unknown setting: {}", key),
                    location: ErrorLocation::from(Location::caller()),
                });
            }
        }

        debug!(key, value, "Setting changed");

        Ok(())
    }

    /// Hotkey string per action. Disabled (empty) hotkeys are left out.
    pub fn hotkey_bindings(&self) -> Vec<(ActionId, String)> {
        [
            (ActionId::FullScreenCapture, &self.general.fullhotkey),
            (ActionId::RegionCapture, &self.general.parthotkey),
            (ActionId::CodeShare, &self.general.texthotkey),
        ]
        .into_iter()
        .filter(|(_, combo)| !combo.trim().is_empty())
        .map(|(action, combo)| (action, combo.trim().to_string()))
        .collect()
    }

    /// Configured image format; unknown values fall back to PNG.
    pub fn image_type(&self) -> ImageType {
        ImageType::from_str(&self.general.imagetype).unwrap_or_else(|e| {
            warn!(error = %e, "Invalid general.imagetype, using png");
            ImageType::default()
        })
    }

    /// Configured source tag; unknown values fall back to plain text.
    pub fn source_type(&self) -> SourceType {
        SourceType::from_str(&self.general.sourcetype).unwrap_or_else(|e| {
            warn!(error = %e, "Invalid general.sourcetype, using txt");
            SourceType::default()
        })
    }

    /// Upload server address.
    pub fn endpoint(&self) -> Endpoint {
        Endpoint {
            host: self.server.host.clone(),
            port: self.server.port,
        }
    }

    /// Upload time limits.
    pub fn timeouts(&self) -> UploadTimeouts {
        UploadTimeouts {
            connect: Duration::from_secs(self.server.connect_timeout_secs),
            write: Duration::from_secs(self.server.write_timeout_secs),
            response: Duration::from_secs(self.server.response_timeout_secs),
        }
    }

    /// Selected hotkey backend.
    pub fn backend(&self) -> HotkeyBackendKind {
        self.hotkeys.backend
    }

    /// File this config is stored in.
    #[track_caller]
    pub fn path(&self) -> AppResult<PathBuf> {
        match &self.source {
            Some(path) => Ok(path.clone()),
            None => Self::config_path(),
        }
    }

    #[track_caller]
    fn config_path() -> AppResult<PathBuf> {
        let proj_dirs = ProjectDirs::from("com", "pastexen", "Pastexen").ok_or_else(|| {
            AppError::ConfigError {
                reason: "Failed to get config directory".to_string(),
                location: ErrorLocation::from(Location::caller()),
            }
        })?;

        Ok(proj_dirs.config_dir().join("config.toml"))
    }
}

#[track_caller]
fn hotkey_value(value: &str) -> AppResult<String> {
    let value = value.trim();
    if value.is_empty() {
        return Ok(String::new());
    }

    Ok(KeyCombo::parse(value)?.to_string())
}

#[track_caller]
fn parse_value<T>(key: &str, value: &str) -> AppResult<T>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    value.trim().parse().map_err(|e| AppError::ConfigError {
        reason: format!("Invalid value {:?} for {}: {}", value, key, e),
        location: ErrorLocation::from(Location::caller()),
    })
}

fn split_command(value: &str) -> Vec<String> {
    value.split_whitespace().map(str::to_string).collect()
}
