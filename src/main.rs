mod config;
mod controller;
mod error;
mod logging;
mod media;
mod model;
mod screen;
mod session;
mod view;

#[cfg(test)]
mod test_support;

use std::io;
use std::sync::Arc;
use std::time::{Duration, Instant};
use anyhow::Result;
use clap::Parser;
use crossterm::{
    event::{DisableMouseCapture, EnableMouseCapture, Event, EventStream},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use futures::StreamExt;
use ratatui::{backend::CrosstermBackend, layout::Rect, Terminal};
use tokio::sync::mpsc::{self, UnboundedReceiver};
use tokio::time::MissedTickBehavior;

use config::{AppConfig, Cli};
use controller::{AppController, ControlMessage};
use media::{FsScanner, MediaScanner};
use session::{ClockDevice, DeviceEvent, JsonFileStore, Session};
use view::{AppView, FrameState};

const FRAME_INTERVAL: Duration = Duration::from_millis(50);

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let config = AppConfig::load(&cli)?;

    if let Err(e) = logging::init_logging(&config.logging.dir) {
        eprintln!("Warning: Failed to initialize logging: {}", e);
    }

    tracing::info!("=== car-media starting ===");
    tracing::debug!(?config, "Configuration loaded");

    let scanner: Arc<dyn MediaScanner> = Arc::new(FsScanner::new(config.library.roots.clone()));
    let store = JsonFileStore::new(config.state.resume_file.clone());
    let mut session = Session::new(Box::new(store), scanner.clone());

    let (device_tx, device_rx) = mpsc::unbounded_channel();
    session.attach(Box::new(ClockDevice::new(config.clock_device(), device_tx)));
    let session = session.into_handle();

    let (messages_tx, messages_rx) = mpsc::unbounded_channel();
    let mut controller = AppController::new(session.clone(), scanner, config.player_screen(), messages_tx);

    match cli.folder.clone() {
        Some(folder) => controller.open_folder(folder, None),
        None => controller.show_roots(),
    }
    if config.state.resume_on_start && session.lock().await.has_resumable_state() {
        controller.start_resume();
    }

    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let res = run_app(&mut terminal, &mut controller, device_rx, messages_rx).await;

    controller.shutdown().await;

    // Restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen, DisableMouseCapture)?;
    terminal.show_cursor()?;

    if let Err(err) = res {
        tracing::error!(error = ?err, "Application error");
    }

    tracing::info!("car-media shutting down");
    Ok(())
}

async fn run_app(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    controller: &mut AppController,
    mut device_events: UnboundedReceiver<DeviceEvent>,
    mut messages: UnboundedReceiver<ControlMessage>,
) -> io::Result<()> {
    let mut input = EventStream::new();
    let mut frames = tokio::time::interval(FRAME_INTERVAL);
    frames.set_missed_tick_behavior(MissedTickBehavior::Skip);

    loop {
        let size = terminal.size()?;
        controller.set_screen_area(Rect::new(0, 0, size.width, size.height));

        let now_playing = controller.now_playing().await;
        let state = FrameState {
            model: controller.model(),
            now_playing: &now_playing,
            playback: controller.player().snapshot(),
            visibility: controller.visibility(),
            immersive: controller.is_immersive(),
            tap_mode: controller.player().machine().tap_mode(),
        };
        terminal.draw(|f| AppView::render(f, &state))?;

        if controller.should_quit() {
            break;
        }

        tokio::select! {
            event = input.next() => match event {
                Some(Ok(Event::Key(key))) => controller.handle_key_event(key, Instant::now()).await,
                Some(Ok(Event::Mouse(mouse))) => controller.handle_mouse_event(mouse, Instant::now()).await,
                Some(Ok(_)) => {}
                Some(Err(e)) => return Err(e),
                None => break,
            },
            Some(event) = device_events.recv() => {
                controller.handle_device_event(event, Instant::now()).await;
            }
            Some(message) = messages.recv() => {
                controller.handle_message(message, Instant::now()).await;
            }
            _ = frames.tick() => controller.tick(Instant::now()).await,
        }
    }

    Ok(())
}
