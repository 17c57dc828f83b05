mod behaviour_config;
mod capture_config;
#[allow(clippy::module_inception)]
mod config;
mod general_config;
mod hotkeys_config;
mod server_config;

pub(crate) use {
    behaviour_config::BehaviourConfig, capture_config::CaptureConfig, config::Config,
    general_config::GeneralConfig, hotkeys_config::{HotkeyBackendKind, HotkeysConfig},
    server_config::ServerConfig,
};

pub(crate) const DEFAULT_FULL_HOTKEY: &str = "Ctrl+F9";
pub(crate) const DEFAULT_PART_HOTKEY: &str = "Ctrl+F10";
pub(crate) const DEFAULT_TEXT_HOTKEY: &str = "Ctrl+F11";
pub(crate) const DEFAULT_HOST: &str = "pastexen.com";
pub(crate) const DEFAULT_PORT: u16 = 9876;
pub(crate) const DEFAULT_CONNECT_TIMEOUT_SECS: u64 = 10;
pub(crate) const DEFAULT_WRITE_TIMEOUT_SECS: u64 = 30;
pub(crate) const DEFAULT_RESPONSE_TIMEOUT_SECS: u64 = 30;
pub(crate) const DEFAULT_COPY_LINK: bool = true;
pub(crate) const DEFAULT_OPEN_LINK: bool = false;

/// Placeholder in capture commands replaced by the output file path.
pub(crate) const FILE_PLACEHOLDER: &str = "{file}";

pub(crate) fn default_full_hotkey() -> String {
    DEFAULT_FULL_HOTKEY.to_string()
}

pub(crate) fn default_part_hotkey() -> String {
    DEFAULT_PART_HOTKEY.to_string()
}

pub(crate) fn default_text_hotkey() -> String {
    DEFAULT_TEXT_HOTKEY.to_string()
}

pub(crate) fn default_image_type() -> String {
    "png".to_string()
}

pub(crate) fn default_source_type() -> String {
    "txt".to_string()
}

pub(crate) fn default_host() -> String {
    DEFAULT_HOST.to_string()
}

pub(crate) fn default_port() -> u16 {
    DEFAULT_PORT
}

pub(crate) fn default_connect_timeout_secs() -> u64 {
    DEFAULT_CONNECT_TIMEOUT_SECS
}

pub(crate) fn default_write_timeout_secs() -> u64 {
    DEFAULT_WRITE_TIMEOUT_SECS
}

pub(crate) fn default_response_timeout_secs() -> u64 {
    DEFAULT_RESPONSE_TIMEOUT_SECS
}

pub(crate) fn default_copy_link() -> bool {
    DEFAULT_COPY_LINK
}

pub(crate) fn default_open_link() -> bool {
    DEFAULT_OPEN_LINK
}

pub(crate) fn default_fullscreen_command() -> Vec<String> {
    platform_command(&["gnome-screenshot", "-f"], &["screencapture", "-x"])
}

pub(crate) fn default_region_command() -> Vec<String> {
    platform_command(&["gnome-screenshot", "-a", "-f"], &["screencapture", "-i"])
}

// No stock command-line screenshot tool on Windows; left empty until configured.
#[allow(unused_variables)]
fn platform_command(linux: &[&str], macos: &[&str]) -> Vec<String> {
    #[cfg(target_os = "macos")]
    let base: &[&str] = macos;
    #[cfg(target_os = "windows")]
    let base: &[&str] = &[];
    #[cfg(not(any(target_os = "macos", target_os = "windows")))]
    let base: &[&str] = linux;

    if base.is_empty() {
        return Vec::new();
    }

    base.iter()
        .copied()
        .chain(std::iter::once(FILE_PLACEHOLDER))
        .map(str::to_string)
        .collect()
}
