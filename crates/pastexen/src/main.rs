//! Pastexen: screenshot and code sharing on global hotkeys.

mod app;
mod app_command;
mod capture;
mod clipboard_handler;
mod config;
mod dispatcher;
mod error;
mod logging;
mod tray_icon_state;
mod tray_manager;
mod ui_command;

pub(crate) use {
    app::App,
    app_command::AppCommand,
    clipboard_handler::ClipboardHandler,
    dispatcher::CommandDispatcher,
    error::{AppError, Result as AppResult},
    tray_icon_state::TrayIconState,
    tray_manager::{TrayManager, TrayMenuIds},
    ui_command::UiCommand,
};

use crate::config::{Config, HotkeyBackendKind};

use pastexen_core::{
    ActionId, BridgeEvent, HotkeyBackend, HotkeyBridge, HotkeyRegistry, NativeBackend,
    SharedBindings, forward_native_events,
};

use std::sync::{Arc, atomic::AtomicUsize};

use tao::{
    event::Event,
    event_loop::{ControlFlow, EventLoopBuilder},
};
use tokio::sync::{Mutex, mpsc, watch};
use tracing::{error, info, warn};

type Registry = HotkeyRegistry<Box<dyn HotkeyBackend>>;

/// Where hotkey events come from for the chosen backend.
enum EventSource {
    /// OS hotkey events; the forwarder is started on the runtime.
    Native,
    /// Raw key listener thread, already running.
    #[cfg_attr(not(feature = "raw-listener"), allow(dead_code))]
    Raw,
}

/// Application entry point.
fn main() {
    let _log_guard = logging::init();

    let event_loop = EventLoopBuilder::<UiCommand>::with_user_event().build();
    let ui_proxy = event_loop.create_proxy();

    // TrayManager lives on the main thread - TrayIcon is !Send on all platforms.
    let mut tray_manager = match TrayManager::new() {
        Ok(tm) => tm,
        Err(e) => {
            error!("Failed to create TrayManager: {:?}", e);
            std::process::exit(1);
        }
    };

    // Lives on the main thread for the app's lifetime; dropping it releases every hotkey.
    let mut registry: Option<Registry> = None;

    event_loop.run(move |event, _, control_flow| {
        *control_flow = ControlFlow::Wait;

        match event {
            Event::UserEvent(cmd) => {
                match cmd {
                    UiCommand::SetState(state) => {
                        if let Err(e) = tray_manager.update_state(state) {
                            error!(error = ?e, "Failed to update tray icon");
                        }
                    }
                    UiCommand::ApplyBindings(bindings) => match registry.as_mut() {
                        Some(registry) => apply_bindings(registry, &bindings),
                        None => warn!("Hotkeys unavailable, bindings not applied"),
                    },
                    UiCommand::Shutdown => {
                        if let Some(registry) = registry.as_mut() {
                            registry.shutdown();
                        }
                        *control_flow = ControlFlow::ExitWithCode(0);
                    }
                }
                return;
            }
            Event::NewEvents(tao::event::StartCause::Init) => {
                let config = Config::load_or_default();

                // Not fatal: only code share and link copying need it.
                let clipboard = match ClipboardHandler::new() {
                    Ok(handler) => Some(Arc::new(Mutex::new(handler))),
                    Err(e) => {
                        warn!(error = ?e, "Clipboard unavailable");
                        None
                    }
                };

                #[cfg(target_os = "macos")]
                unsafe {
                    use core_foundation::runloop::{CFRunLoopGetMain, CFRunLoopWakeUp};
                    CFRunLoopWakeUp(CFRunLoopGetMain());
                }

                let (events_tx, events_rx) = mpsc::channel::<BridgeEvent>(64);
                let (command_tx, command_rx) = mpsc::channel(32);
                let (shutdown_tx, shutdown_rx) = watch::channel(false);

                // Registered on the main thread: tao's event loop pumps the
                // messages the OS hotkey API delivers on.
                // Without a backend the app keeps running with hotkeys disabled.
                let (bindings, source) = match select_backend(config.backend(), &events_tx) {
                    Ok((backend, source)) => {
                        info!(backend = backend.name(), "Hotkey backend ready");
                        let mut hotkeys = HotkeyRegistry::new(backend);
                        apply_bindings(&mut hotkeys, &config.hotkey_bindings());
                        let bindings = hotkeys.shared();
                        registry = Some(hotkeys);
                        (bindings, Some(source))
                    }
                    Err(e) => {
                        error!(error = ?e, "Hotkey backend unavailable, hotkeys disabled");
                        (SharedBindings::default(), None)
                    }
                };

                let app = App {
                    clipboard,
                    ui_proxy: ui_proxy.clone(),
                    config: Arc::new(Mutex::new(config)),
                    command_tx: command_tx.clone(),
                    command_rx,
                    shutdown_tx,
                    menu_ids: tray_manager.menu_ids().clone(),
                    in_flight: Arc::new(AtomicUsize::new(0)),
                };

                // Spawn tokio runtime on separate thread.
                // TrayManager and the registry stay on the main thread.
                std::thread::spawn(move || {
                    let rt = match tokio::runtime::Runtime::new() {
                        Ok(rt) => rt,
                        Err(e) => {
                            error!("Failed to create tokio runtime: {:?}", e);
                            std::process::exit(1);
                        }
                    };

                    rt.block_on(async {
                        if matches!(source, Some(EventSource::Native)) {
                            let _native_source = forward_native_events(events_tx);
                        } else {
                            drop(events_tx);
                        }

                        let bridge = HotkeyBridge::new(bindings, CommandDispatcher::new(command_tx));

                        tokio::join!(bridge.run(events_rx, shutdown_rx), async {
                            if let Err(e) = app.run().await {
                                error!(error = ?e, "App error");
                            }
                        });
                    });

                    // Event forwarders block on OS receivers and never finish on their own.
                    rt.shutdown_timeout(std::time::Duration::from_secs(1));
                });
            }
            _ => {}
        }
    });
}

/// Build the configured backend and start its event source if it needs one now.
///
/// A raw backend that cannot start falls back to native hotkeys.
fn select_backend(
    kind: HotkeyBackendKind,
    events_tx: &mpsc::Sender<BridgeEvent>,
) -> AppResult<(Box<dyn HotkeyBackend>, EventSource)> {
    if kind == HotkeyBackendKind::Raw {
        #[cfg(feature = "raw-listener")]
        match pastexen_core::spawn_raw_listener(events_tx.clone()) {
            Ok(_listener) => {
                return Ok((Box::new(pastexen_core::GrabBackend::new()), EventSource::Raw));
            }
            Err(e) => error!(error = %e, "Raw key listener failed, using native hotkeys"),
        }

        #[cfg(not(feature = "raw-listener"))]
        {
            let _ = events_tx;
            error!("Built without the raw-listener feature, using native hotkeys");
        }
    }

    Ok((Box::new(NativeBackend::new()?), EventSource::Native))
}

/// Replace all bindings, logging each action that could not be registered.
fn apply_bindings(registry: &mut Registry, bindings: &[(ActionId, String)]) {
    match registry.reload_all(bindings) {
        Ok(()) => info!(count = bindings.len(), "Hotkeys registered"),
        Err(failures) => {
            for (action, e) in failures {
                error!(action = %action, error = %e, "Hotkey not registered");
            }
        }
    }
}
