use crate::{
    AppCommand, AppError, AppResult, ClipboardHandler, TrayIconState, TrayMenuIds, UiCommand,
    capture, config::Config,
};

use pastexen_core::{ActionId, ContentKind, UploadClient, UploadRequest};

use std::{
    panic::Location,
    sync::{
        Arc,
        atomic::{AtomicUsize, Ordering},
    },
};

use error_location::ErrorLocation;
use tao::event_loop::EventLoopProxy;
use tokio::sync::{Mutex, mpsc, watch};
use tracing::{error, info, instrument, warn};
use tray_icon::menu::MenuEvent;
use uuid::Uuid;

/// Main application state.
///
/// Runs on the async runtime thread. Tray and hotkey changes go back to the
/// main thread through `ui_proxy` because the tray icon and the hotkey
/// registry must stay on the UI thread.
pub struct App {
    pub(crate) clipboard: Option<Arc<Mutex<ClipboardHandler>>>,
    pub(crate) ui_proxy: EventLoopProxy<UiCommand>,
    pub(crate) config: Arc<Mutex<Config>>,
    pub(crate) command_tx: mpsc::Sender<AppCommand>,
    pub(crate) command_rx: mpsc::Receiver<AppCommand>,
    pub(crate) shutdown_tx: watch::Sender<bool>,
    pub(crate) menu_ids: TrayMenuIds,
    pub(crate) in_flight: Arc<AtomicUsize>,
}

/// Everything one triggered action needs, detached from the app loop.
struct ActionContext {
    config: Config,
    clipboard: Option<Arc<Mutex<ClipboardHandler>>>,
}

impl App {
    /// Run the main application event loop.
    #[instrument(skip(self))]
    pub(crate) async fn run(mut self) -> AppResult<()> {
        info!("Pastexen starting");

        // MenuEvent::receiver() is a blocking crossbeam receiver; one blocking
        // task forwards it. The task ends once tray_event_rx is dropped and
        // the next menu event fails to send.
        let (tray_event_tx, mut tray_event_rx) = mpsc::channel(32);
        let tray_handle = tokio::task::spawn_blocking(move || {
            let receiver = MenuEvent::receiver();
            while let Ok(event) = receiver.recv() {
                if tray_event_tx.blocking_send(event).is_err() {
                    break;
                }
            }
        });

        loop {
            tokio::select! {
                Some(event) = tray_event_rx.recv() => {
                    if let Err(e) = self.handle_tray_event(event).await {
                        error!(error = ?e, "Failed to handle tray event");
                    }
                }

                Some(cmd) = self.command_rx.recv() => {
                    match cmd {
                        AppCommand::Trigger { action, trigger_id } => {
                            self.trigger(action, trigger_id).await;
                        }
                        AppCommand::Shutdown => {
                            info!("Shutdown requested");
                            break;
                        }
                    }
                }

                else => {
                    info!("All channels closed, shutting down");
                    break;
                }
            }
        }

        drop(tray_event_rx);

        match tokio::time::timeout(std::time::Duration::from_secs(1), tray_handle).await {
            Ok(Ok(())) => info!("Tray event forwarder stopped cleanly"),
            Ok(Err(e)) => error!(error = ?e, "Tray event forwarder task panicked"),
            Err(_) => info!(
                "Tray event forwarder did not stop within timeout, \
                     will be cleaned up on exit"
            ),
        }

        let _ = self.shutdown_tx.send(true);
        info!("Pastexen shut down successfully");

        Ok(())
    }

    /// Start the capture and upload for one fired hotkey in the background.
    #[instrument(skip(self))]
    async fn trigger(&self, action: ActionId, trigger_id: Uuid) {
        let ctx = ActionContext {
            config: self.config.lock().await.clone(),
            clipboard: self.clipboard.clone(),
        };
        let ui_proxy = self.ui_proxy.clone();
        let in_flight = Arc::clone(&self.in_flight);

        if in_flight.fetch_add(1, Ordering::SeqCst) == 0 {
            let _ = ui_proxy.send_event(UiCommand::SetState(TrayIconState::Uploading));
        }

        tokio::spawn(async move {
            let start = std::time::Instant::now();

            match run_action(ctx, action, trigger_id).await {
                Ok(url) => info!(
                    trigger_id = %trigger_id,
                    action = %action,
                    url = %url,
                    duration_ms = start.elapsed().as_millis(),
                    "Action complete"
                ),
                Err(e) => error!(
                    trigger_id = %trigger_id,
                    action = %action,
                    error = %e,
                    "Action failed"
                ),
            }

            if in_flight.fetch_sub(1, Ordering::SeqCst) == 1 {
                let _ = ui_proxy.send_event(UiCommand::SetState(TrayIconState::Idle));
            }
        });
    }

    /// Handle tray menu events.
    #[instrument(skip(self))]
    async fn handle_tray_event(&mut self, event: MenuEvent) -> AppResult<()> {
        let event_id = &event.id;

        if *event_id == self.menu_ids.reload {
            self.reload_settings().await?;
        } else if *event_id == self.menu_ids.open_settings {
            let path = self.config.lock().await.path()?;
            open::that(&path)?;
            info!(config_path = ?path, "Opened settings file");
        } else if *event_id == self.menu_ids.exit {
            info!("Exit requested from tray menu");
            if let Err(e) = self.command_tx.send(AppCommand::Shutdown).await {
                error!(error = ?e, "Failed to send shutdown command");
            }
            self.send_ui(UiCommand::Shutdown)?;
        }

        Ok(())
    }

    /// Re-read the settings file and re-register every hotkey from it.
    #[instrument(skip(self))]
    async fn reload_settings(&mut self) -> AppResult<()> {
        let fresh = Config::load()?;
        let bindings = fresh.hotkey_bindings();

        {
            let mut config = self.config.lock().await;
            if config.backend() != fresh.backend() {
                warn!(
                    running = %config.backend(),
                    configured = %fresh.backend(),
                    "Hotkey backend change takes effect after restart"
                );
            }
            *config = fresh;
        }

        info!(bindings = bindings.len(), "Settings reloaded");
        self.send_ui(UiCommand::ApplyBindings(bindings))
    }

    #[track_caller]
    fn send_ui(&self, cmd: UiCommand) -> AppResult<()> {
        self.ui_proxy
            .send_event(cmd)
            .map_err(|e| AppError::ChannelSendFailed {
                message: format!("UI thread gone: {}", e),
                location: ErrorLocation::from(Location::caller()),
            })
    }
}

/// Capture, upload, deliver. Returns the link.
async fn run_action(ctx: ActionContext, action: ActionId, trigger_id: Uuid) -> AppResult<String> {
    let ActionContext { config, clipboard } = ctx;

    let request = match action {
        ActionId::FullScreenCapture | ActionId::RegionCapture => {
            let command = if action == ActionId::FullScreenCapture {
                &config.capture.fullscreen_command
            } else {
                &config.capture.region_command
            };
            let image_type = config.image_type();
            let payload = capture::capture_screen(command, image_type, trigger_id).await?;
            UploadRequest::new(payload, ContentKind::Image(image_type))
        }
        ActionId::CodeShare => {
            let text = clipboard_handle(&clipboard)?.lock().await.read_text()?;
            UploadRequest::new(text.into_bytes(), ContentKind::Text(config.source_type()))
        }
    };

    let client = UploadClient::new(config.endpoint(), config.timeouts());
    let url = client.spawn_upload(request).result().await?;

    if config.behaviour.copy_link || config.behaviour.open_link {
        let copy = config.behaviour.copy_link;
        match &clipboard {
            Some(handler) => {
                handler
                    .lock()
                    .await
                    .deliver_link(&url, copy, config.behaviour.open_link)?;
            }
            None if copy => {
                return Err(AppError::ClipboardError {
                    reason: format!("Clipboard unavailable, link was {}", url),
                    location: ErrorLocation::from(Location::caller()),
                });
            }
            None => {
                if let Err(e) = open::that(&url) {
                    warn!(error = %e, "Failed to open link in browser");
                }
            }
        }
    }

    Ok(url)
}

#[track_caller]
fn clipboard_handle(
    clipboard: &Option<Arc<Mutex<ClipboardHandler>>>,
) -> AppResult<&Arc<Mutex<ClipboardHandler>>> {
    clipboard.as_ref().ok_or_else(|| AppError::ClipboardError {
        reason: "Clipboard unavailable".to_string(),
        location: ErrorLocation::from(Location::caller()),
    })
}
