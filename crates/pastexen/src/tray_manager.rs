//! System tray icon with state-based updates.
//!
//! Shows whether an upload is in flight and carries the context menu:
//! Reload settings, Open settings, Exit.

use crate::{AppError, AppResult, TrayIconState};

use std::panic::Location;

use error_location::ErrorLocation;
use image::{Rgba, RgbaImage};
use tracing::{info, instrument};
use tray_icon::menu::{Menu, MenuId, MenuItem, PredefinedMenuItem};
use tray_icon::{Icon, TrayIcon, TrayIconBuilder};

const ICON_SIZE: u32 = 32;

/// System tray icon manager.
pub struct TrayManager {
    tray_icon: TrayIcon,
    menu_ids: TrayMenuIds,
}

/// Ids of the tray menu entries, handed to the async side.
#[derive(Debug, Clone)]
pub struct TrayMenuIds {
    /// "Reload settings".
    pub reload: MenuId,
    /// "Open settings".
    pub open_settings: MenuId,
    /// "Exit".
    pub exit: MenuId,
}

impl TrayManager {
    /// Create a new tray manager with initial state.
    #[track_caller]
    #[instrument]
    pub fn new() -> AppResult<Self> {
        let menu = Menu::new();

        let reload_item = MenuItem::new("Reload settings", true, None);
        let settings_item = MenuItem::new("Open settings", true, None);
        let exit_item = MenuItem::new("Exit", true, None);

        let menu_ids = TrayMenuIds {
            reload: reload_item.id().clone(),
            open_settings: settings_item.id().clone(),
            exit: exit_item.id().clone(),
        };

        menu.append_items(&[
            &reload_item,
            &settings_item,
            &PredefinedMenuItem::separator(),
            &exit_item,
        ])
        .map_err(|e| AppError::ConfigError {
            reason: format!("Failed to build tray menu: {}", e),
            location: ErrorLocation::from(Location::caller()),
        })?;

        let tray_icon = TrayIconBuilder::new()
            .with_tooltip(Self::tooltip(TrayIconState::Idle))
            .with_menu(Box::new(menu))
            .with_icon(Self::render_icon(TrayIconState::Idle)?)
            .build()
            .map_err(|e| AppError::ConfigError {
                reason: format!("Failed to create tray icon: {}", e),
                location: ErrorLocation::from(Location::caller()),
            })?;

        info!("System tray icon initialized");

        Ok(Self {
            tray_icon,
            menu_ids,
        })
    }

    /// Update the tray icon state with new icon and tooltip.
    #[track_caller]
    #[instrument(skip(self))]
    pub fn update_state(&mut self, state: TrayIconState) -> AppResult<()> {
        self.tray_icon
            .set_icon(Some(Self::render_icon(state)?))
            .map_err(|e| AppError::ConfigError {
                reason: format!("Failed to update icon: {}", e),
                location: ErrorLocation::from(Location::caller()),
            })?;

        self.tray_icon
            .set_tooltip(Some(Self::tooltip(state)))
            .map_err(|e| AppError::ConfigError {
                reason: format!("Failed to update tooltip: {}", e),
                location: ErrorLocation::from(Location::caller()),
            })?;

        Ok(())
    }

    /// Menu entry ids.
    pub fn menu_ids(&self) -> &TrayMenuIds {
        &self.menu_ids
    }

    fn tooltip(state: TrayIconState) -> &'static str {
        match state {
            TrayIconState::Idle => "Pastexen - Ready",
            TrayIconState::Uploading => "Pastexen - Uploading...",
        }
    }

    /// Draw the icon: a filled disc whose colour reflects the state.
    #[track_caller]
    fn render_icon(state: TrayIconState) -> AppResult<Icon> {
        let rgba = icon_pixels(state);
        let (width, height) = (rgba.width(), rgba.height());

        Icon::from_rgba(rgba.into_raw(), width, height).map_err(|e| AppError::ConfigError {
            reason: format!("Failed to create icon from RGBA: {}", e),
            location: ErrorLocation::from(Location::caller()),
        })
    }
}

pub(crate) fn icon_pixels(state: TrayIconState) -> RgbaImage {
    let fill = match state {
        TrayIconState::Idle => Rgba([0x2d, 0x7d, 0xd2, 0xff]),
        TrayIconState::Uploading => Rgba([0xf2, 0x9b, 0x1d, 0xff]),
    };
    let center = (ICON_SIZE as f32 - 1.0) / 2.0;
    let radius = ICON_SIZE as f32 / 2.0 - 1.0;

    RgbaImage::from_fn(ICON_SIZE, ICON_SIZE, |x, y| {
        let (dx, dy) = (x as f32 - center, y as f32 - center);
        if dx * dx + dy * dy <= radius * radius {
            fill
        } else {
            Rgba([0, 0, 0, 0])
        }
    })
}
