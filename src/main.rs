//! Application entry point — diacritic task room.
//!
//! # Startup sequence
//!
//! 1. Initialise logging.
//! 2. Load [`AppConfig`] from disk (returns default on first run).
//! 3. Create [`tokio`] runtime (multi-thread, 2 workers).
//! 4. Build the [`ApiClient`] from config.
//! 5. Create room channels (`command`, `event`).
//! 6. Spawn the [`RoomWorker`] and a one-shot health check.
//! 7. Start the room (resume the cached task or request the next one).
//! 8. Run [`eframe::run_native`] — blocks the main thread until the window
//!    is closed.

use std::sync::Arc;

use eframe::egui;
use tokio::sync::mpsc;
use vtg_editor::{
    app::TaskRoomApp,
    config::AppConfig,
    room::{RoomCommand, RoomEvent, RoomWorker, TaskRoom},
    task::{ApiClient, TaskCache},
};

fn native_options(config: &AppConfig) -> eframe::NativeOptions {
    let (width, height) = config.ui.window_size;
    let vp = egui::ViewportBuilder::default()
        .with_title("Voice Task Room")
        .with_inner_size([width, height])
        .with_min_inner_size([480.0, 360.0]);

    eframe::NativeOptions {
        viewport: vp,
        ..Default::default()
    }
}

fn main() -> eframe::Result<()> {
    // 1. Logging
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    log::info!("voice task room starting up");

    // 2. Configuration
    let config = AppConfig::load().unwrap_or_else(|e| {
        log::warn!("Failed to load config ({e}); using defaults");
        AppConfig::default()
    });
    log::info!(
        "backend {} as user {}",
        config.api.base_url,
        config.api.user_id
    );

    // 3. Tokio runtime
    let rt = tokio::runtime::Builder::new_multi_thread()
        .worker_threads(2)
        .enable_all()
        .build()
        .expect("failed to create tokio runtime");

    // 4. API client (both task source and submission sink)
    let client = Arc::new(ApiClient::from_config(&config.api));

    // 5. Channel setup
    let (command_tx, command_rx) = mpsc::channel::<RoomCommand>(16);
    let (event_tx, event_rx) = mpsc::channel::<RoomEvent>(16);

    // 6. Worker + health check
    rt.spawn(RoomWorker::new(client.clone(), client.clone()).run(command_rx, event_tx));
    {
        let client = Arc::clone(&client);
        rt.spawn(async move {
            if client.check_health().await {
                log::info!("backend reachable at {}", client.base_url());
            } else {
                log::warn!("backend not reachable at {}", client.base_url());
            }
        });
    }

    // 7. Room
    let mut room = TaskRoom::new(config.api.user_id, TaskCache::new());
    if let Some(command) = room.begin_load(false) {
        if let Err(e) = command_tx.try_send(command) {
            log::warn!("initial fetch not queued: {e}");
        }
    }

    // 8. Run the UI (blocks until the window is closed)
    let app = TaskRoomApp::new(room, command_tx, event_rx, config.clone());
    let options = native_options(&config);

    let result = eframe::run_native(
        "Voice Task Room",
        options,
        Box::new(move |_cc| Ok(Box::new(app))),
    );

    rt.shutdown_timeout(std::time::Duration::from_secs(1));
    result
}
