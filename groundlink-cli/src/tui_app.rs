//! TUI application module for the groundlink CLI.
//!
//! This module contains the dashboard event loop, separated from argument
//! parsing and ingestor lifecycle handling in `commands::run`.
//!
//! # Architecture
//!
//! - `run_tui()` - Interactive dashboard with the live map
//! - `run_headless()` - Periodic status lines for non-TTY environments
//! - `TuiAppConfig` - Everything the loop needs, handed over by the run command

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

use tokio::sync::broadcast;
use tokio::task::JoinHandle;

use groundlink::dashboard::GroundStation;
use groundlink::map::SceneMap;
use groundlink::telemetry::{TelemetryError, TelemetryFeed, TelemetrySnapshot};

use crate::error::CliError;
use crate::ui::widgets::primitives::format_position;
use crate::ui::{Dashboard, DashboardConfig, DashboardEvent};

/// Redraw interval of the dashboard.
const TICK_RATE: Duration = Duration::from_millis(100);

/// Interval between headless status lines.
const HEADLESS_STATUS_INTERVAL: Duration = Duration::from_secs(5);

/// Configuration for starting the TUI application.
pub struct TuiAppConfig<'a> {
    /// Mounted ground station (map, path, camera, chart).
    pub station: GroundStation<SceneMap>,
    /// Shared feed, read for the connection status.
    pub feed: TelemetryFeed,
    /// Snapshot subscription created before the ingestor started.
    pub updates: broadcast::Receiver<TelemetrySnapshot>,
    /// Shutdown signal from signal handler.
    pub shutdown: Arc<AtomicBool>,
    /// Ingestor task, watched so headless mode can exit with it.
    pub ingestor: &'a JoinHandle<Result<(), TelemetryError>>,
    /// Telemetry endpoint shown in the header.
    pub telemetry_url: String,
}

/// Pull everything that happened since the last frame into the station.
fn sync_station(
    station: &mut GroundStation<SceneMap>,
    feed: &TelemetryFeed,
    updates: &mut broadcast::Receiver<TelemetrySnapshot>,
) {
    let now = Instant::now();
    station.pump_map_events();
    station.set_status(feed.status());
    station.drain(updates, now);
    station.tick(now);
}

/// Run the interactive dashboard until the user quits.
pub fn run_tui(config: TuiAppConfig) -> Result<(), CliError> {
    let TuiAppConfig {
        mut station,
        feed,
        mut updates,
        shutdown,
        ingestor: _,
        telemetry_url,
    } = config;

    let dashboard_config = DashboardConfig { telemetry_url };
    let mut dashboard = Dashboard::new(dashboard_config, shutdown).map_err(CliError::Dashboard)?;

    let mut last_draw = Instant::now()
        .checked_sub(TICK_RATE)
        .unwrap_or_else(Instant::now);

    loop {
        match dashboard.poll_event() {
            Ok(Some(DashboardEvent::Quit)) => break,
            Ok(Some(DashboardEvent::Command(command))) => station.command(command),
            Ok(Some(DashboardEvent::Map(interaction))) => {
                interaction.apply(station.map_mut().engine_mut());
            }
            Ok(None) => {}
            Err(e) => return Err(CliError::Dashboard(e)),
        }

        sync_station(&mut station, &feed, &mut updates);

        if last_draw.elapsed() >= TICK_RATE {
            dashboard.draw(&station).map_err(CliError::Dashboard)?;
            last_draw = Instant::now();
        }

        // Small sleep to prevent busy-waiting
        std::thread::sleep(Duration::from_millis(10));
    }

    drop(dashboard);
    station.unmount();
    Ok(())
}

/// Run in headless mode (non-TTY environments).
///
/// Keeps the station synchronized and prints a status line periodically.
/// Returns when Ctrl+C is pressed or the ingestor finishes.
pub fn run_headless(config: TuiAppConfig) -> Result<(), CliError> {
    let TuiAppConfig {
        mut station,
        feed,
        mut updates,
        shutdown,
        ingestor,
        telemetry_url,
    } = config;

    println!("Streaming telemetry from {}", telemetry_url);
    println!("Press Ctrl+C to stop.");
    println!();

    let mut last_status = Instant::now();

    while !shutdown.load(Ordering::SeqCst) {
        sync_station(&mut station, &feed, &mut updates);

        if last_status.elapsed() >= HEADLESS_STATUS_INTERVAL {
            print_status_line(&station);
            last_status = Instant::now();
        }

        if ingestor.is_finished() {
            // Apply whatever arrived before the link closed
            sync_station(&mut station, &feed, &mut updates);
            print_status_line(&station);
            break;
        }

        std::thread::sleep(Duration::from_millis(100));
    }

    station.unmount();
    Ok(())
}

fn print_status_line(station: &GroundStation<SceneMap>) {
    let view = station.view();
    let position = station
        .latest()
        .and_then(|snapshot| snapshot.position())
        .map(|p| format_position(p.latitude, p.longitude))
        .unwrap_or_else(|| "no fix".to_string());
    let mode = station
        .latest()
        .map(|snapshot| snapshot.mode.clone())
        .unwrap_or_default();

    println!(
        "[{}] {} | {} | {} | trail {} | follow {}",
        chrono::Local::now().format("%H:%M:%S"),
        view.status,
        position,
        mode,
        view.trail_points,
        view.follow_mode
    );
}
