//! A photo gallery for the terminal with a collapsing search header.
//!
//! Run with a directory to browse its images, or without one to see a
//! sample gallery.

mod app;
mod config;
mod core;
mod ui;

use std::io::{self, stderr};
use std::path::PathBuf;
use std::time::Instant;

use anyhow::Result;
use clap::Parser;
use crossterm::{
    event::{DisableMouseCapture, EnableMouseCapture},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, widgets::Paragraph, Frame, Terminal};
use tokio::sync::mpsc;

use crate::app::{
    event::{spawn_event_reader, AppEvent, TICK_RATE},
    handler,
    image_runtime::{spawn_image_loader, ImageUpdate, THUMBNAIL_MAX_SIDE},
    state::AppState,
};
use crate::core::item;
use crate::ui::{
    grid::GalleryWidget,
    halfblock::pixel_size,
    header::{header_layout, HeaderWidget},
    layout::AppLayout,
    theme::Theme,
};

// ───────────────────────────────────────── CLI ───────────────

#[derive(Parser, Debug)]
#[command(name = env!("CARGO_PKG_NAME"), about = "Terminal photo gallery")]
struct Cli {
    /// Directory of photos to show.  Without it a sample gallery is shown.
    dir: Option<PathBuf>,

    /// Name shown under the greeting.
    #[arg(long)]
    name: Option<String>,

    /// Image to use as the profile avatar.
    #[arg(long)]
    avatar: Option<PathBuf>,

    /// Distance units covered by one terminal row.
    #[arg(long = "units-per-row")]
    units_per_row: Option<f32>,
}

// ───────────────────────────────────────── drawing ───────────

fn draw(frame: &mut Frame, state: &mut AppState, now: Instant) {
    let layout = AppLayout::from_area(frame.area());
    frame
        .buffer_mut()
        .set_style(layout.content_area, Theme::screen_style());

    let geometry = state.frame_geometry(now);
    let scale = state.scale();
    let metrics = state.grid_metrics();
    let top = state.grid_top(&geometry);

    frame.render_widget(
        GalleryWidget {
            items: &state.items,
            image_cache: &state.image_cache,
            crops: &mut state.crops,
            metrics,
            top,
        },
        layout.content_area,
    );

    let mut node = crate::core::header::render(state.progress, state.focused, &state.search_text);
    node.geometry = geometry.header;
    let header = header_layout(&geometry.header, scale, layout.content_area, geometry.scroll.min_y());
    let source = state
        .avatar
        .as_ref()
        .and_then(|path| Some((path, state.image_cache.get(path)?)));
    let avatar = match source {
        Some((path, src)) => Some(state.crops.get(path, src, pixel_size(header.profile))),
        None => None,
    };
    frame.render_widget(
        HeaderWidget {
            node: &node,
            layout: header,
            user_name: &state.config.user_name,
            avatar,
        },
        layout.content_area,
    );

    let hint = if state.focused {
        "Enter/Esc: done | type to search".to_string()
    } else {
        state.config.status_bar_hint()
    };
    let status_text = state.status_message.as_deref().unwrap_or(&hint);
    let status = Paragraph::new(status_text).style(Theme::status_bar_style());
    frame.render_widget(status, layout.status_area);
}

// ───────────────────────────────────────── event loop ────────

async fn run(
    terminal: &mut Terminal<CrosstermBackend<io::Stderr>>,
    state: &mut AppState,
    images: &mut mpsc::UnboundedReceiver<ImageUpdate>,
) -> Result<()> {
    let mut events = spawn_event_reader(TICK_RATE);

    loop {
        if state.dirty {
            state.dirty = false;
            let now = Instant::now();
            terminal.draw(|frame| {
                state.terminal_area = frame.area();
                draw(frame, state, now);
            })?;
        }

        tokio::select! {
            biased;

            Some(event) = events.recv() => {
                let now = Instant::now();
                match event {
                    AppEvent::Key(k) => handler::handle_key(state, k, now),
                    AppEvent::Mouse(m) => handler::handle_mouse(state, m, now),
                    AppEvent::Resize(_, _) => state.dirty = true,
                    AppEvent::Tick => state.tick(now),
                }
            }

            Some(update) = images.recv() => {
                state.apply_image_update(update);
                // Drain everything already decoded before redrawing.
                while let Ok(update) = images.try_recv() {
                    state.apply_image_update(update);
                }
            }

            else => break,
        }

        if state.should_quit {
            break;
        }
    }

    Ok(())
}

// ───────────────────────────────────────── main ─────────────

#[tokio::main]
async fn main() -> Result<()> {
    // Logging is off unless RUST_LOG is set.
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(io::stderr) // never pollute stdout
        .init();

    let cli = Cli::parse();

    let mut user_config = config::AppConfig::load();
    if !config::config_path().exists() {
        if let Err(e) = user_config.save() {
            tracing::warn!("writing default config: {e}");
        }
    }
    if let Some(name) = cli.name {
        user_config.user_name = name;
    }
    if let Some(upr) = cli.units_per_row {
        user_config.units_per_row = upr.clamp(5.0, 40.0);
    }

    let items = match &cli.dir {
        Some(dir) => item::scan_photo_dir(&dir.canonicalize()?)?,
        None => item::sample_items(),
    };
    if items.is_empty() {
        tracing::warn!("no images found");
    }

    let mut state = AppState::new(items, user_config, Instant::now());
    state.avatar = cli.avatar;

    let mut paths: Vec<PathBuf> = state.items.iter().filter_map(|i| i.image.clone()).collect();
    paths.extend(state.avatar.clone());
    let (image_tx, mut image_rx) = mpsc::unbounded_channel();
    let jobs = paths.len();
    let loader = spawn_image_loader(paths, THUMBNAIL_MAX_SIDE, image_tx);
    tracing::debug!(jobs, workers = loader.worker_count(), "decoding thumbnails");

    // ── terminal setup ────────────────────────────────────────
    enable_raw_mode()?;
    execute!(stderr(), EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stderr());
    let mut terminal = Terminal::new(backend)?;

    let result = run(&mut terminal, &mut state, &mut image_rx).await;
    loader.request_cancel();

    // ── teardown ──────────────────────────────────────────────
    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;

    result
}
