//! Main dashboard rendering.
//!
//! This module contains the top-level layout orchestration, the header and
//! the panel frames.
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────┐
//! │ Header (3 lines): title, Online/Offline, link status     │
//! ├───────────────────────────────────┬─────────────────────┤
//! │ Map                               │ Telemetry (10 lines)│
//! │                                   ├─────────────────────┤
//! │                                   │ Charts (8 lines)    │
//! │                                   ├─────────────────────┤
//! │ [f] Center Drone   [s] Light      │ Alerts              │
//! ├───────────────────────────────────┴─────────────────────┤
//! │ Key help (1 line)                                       │
//! └─────────────────────────────────────────────────────────┘
//! ```

use std::time::Duration;

use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph},
    Frame,
};

use groundlink::dashboard::{worst_level, AlertLevel, DashboardView, GroundStation};
use groundlink::map::{FollowMode, SceneMap, StylePhase};
use groundlink::telemetry::ConnectionStatus;

use super::state::DashboardConfig;
use crate::ui::widgets::primitives::{format_degrees, format_duration_compact, format_position};
use crate::ui::widgets::{AlertsWidget, ChartsWidget, MapViewWidget, TelemetryWidget};

/// Width of the right-hand column.
const SIDEBAR_WIDTH: u16 = 42;

/// Render the main dashboard UI to the frame.
pub fn render_ui(
    frame: &mut Frame,
    station: &GroundStation<SceneMap>,
    config: &DashboardConfig,
    uptime: Duration,
    confirmation_remaining: Option<Duration>,
) {
    let size = frame.area();
    let view = station.view();

    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Header
            Constraint::Min(10),   // Map + sidebar
            Constraint::Length(1), // Key help
        ])
        .split(size);

    render_header(frame, rows[0], &view, station, config, uptime);

    let body = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Min(30), Constraint::Length(SIDEBAR_WIDTH)])
        .split(rows[1]);

    render_map(frame, body[0], &view, station);
    render_sidebar(frame, body[1], &view);
    render_key_help(frame, rows[2]);

    if let Some(remaining) = confirmation_remaining {
        render_quit_confirmation(frame, size, remaining);
    }
}

fn panel(title: &str, color: Color) -> Block<'static> {
    Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::DarkGray))
        .title(Span::styled(format!(" {} ", title), Style::default().fg(color)))
}

/// Render the header bar with the connection pill.
fn render_header(
    frame: &mut Frame,
    area: Rect,
    view: &DashboardView<'_>,
    station: &GroundStation<SceneMap>,
    config: &DashboardConfig,
    uptime: Duration,
) {
    let header_block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::DarkGray))
        .title(Span::styled(
            format!(" Cloud Drone GCS {} ", groundlink::VERSION),
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        ))
        .title_alignment(Alignment::Left);

    let (pill, pill_color) = if view.online {
        ("● Online", Color::Green)
    } else {
        ("● Offline", Color::Red)
    };
    let status_color = match view.status {
        ConnectionStatus::Connected => Color::Green,
        ConnectionStatus::Connecting => Color::Yellow,
        ConnectionStatus::Disconnected => Color::Red,
    };

    let last_update = station
        .latest()
        .map(|snapshot| {
            let age = (chrono::Utc::now() - snapshot.received_at)
                .to_std()
                .unwrap_or_default();
            format!("{} ago", format_duration_compact(age))
        })
        .unwrap_or_else(|| "never".to_string());

    let content = Line::from(vec![
        Span::styled(
            pill,
            Style::default()
                .fg(pill_color)
                .add_modifier(Modifier::BOLD),
        ),
        Span::styled("  │  Link: ", Style::default().fg(Color::DarkGray)),
        Span::styled(view.status.to_string(), Style::default().fg(status_color)),
        Span::styled(
            format!(" ({})", config.telemetry_url),
            Style::default().fg(Color::DarkGray),
        ),
        Span::styled("  │  Last update: ", Style::default().fg(Color::DarkGray)),
        Span::styled(last_update, Style::default().fg(Color::White)),
        Span::styled("  │  Uptime: ", Style::default().fg(Color::DarkGray)),
        Span::styled(
            format_duration_compact(uptime),
            Style::default().fg(Color::White),
        ),
    ]);

    frame.render_widget(Paragraph::new(content).block(header_block), area);
}

/// Render the map panel with its two buttons on the bottom border.
fn render_map(
    frame: &mut Frame,
    area: Rect,
    view: &DashboardView<'_>,
    station: &GroundStation<SceneMap>,
) {
    let camera = station.map().engine().camera();

    let phase = match station.map().style_phase() {
        StylePhase::Ready(_) => String::new(),
        StylePhase::Reloading { to, .. } => format!(" · loading {}", to),
    };
    let title = format!(
        " Map · {}{} · z{:.1} · brg {} ",
        view.style,
        phase,
        camera.zoom,
        format_degrees(camera.bearing)
    );

    let follow_color = match view.follow_mode {
        FollowMode::Following => Color::Cyan,
        FollowMode::Manual => Color::Yellow,
    };
    let key_style = Style::default()
        .fg(Color::Black)
        .bg(Color::DarkGray)
        .add_modifier(Modifier::BOLD);
    let buttons = Line::from(vec![
        Span::raw(" "),
        Span::styled(" f ", key_style),
        Span::styled(
            format!(" {} ", view.follow_label),
            Style::default().fg(follow_color),
        ),
        Span::raw(" "),
        Span::styled(" s ", key_style),
        Span::styled(
            format!(" {} ", view.style_label),
            Style::default().fg(Color::White),
        ),
        Span::styled(
            format!(
                " trail {} · {} ",
                view.trail_points,
                format_position(camera.center.latitude, camera.center.longitude)
            ),
            Style::default().fg(Color::DarkGray),
        ),
    ]);

    let block = panel(&title, Color::Blue).title_bottom(buttons);
    frame.render_widget(
        MapViewWidget::new(station.map().engine()).block(block),
        area,
    );
}

/// Render the telemetry, charts and alerts column.
fn render_sidebar(frame: &mut Frame, area: Rect, view: &DashboardView<'_>) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(10), // Telemetry
            Constraint::Length(8),  // Charts
            Constraint::Min(3),     // Alerts
        ])
        .split(area);

    let telemetry_block = panel("Telemetry", Color::Magenta);
    let inner = telemetry_block.inner(chunks[0]);
    frame.render_widget(telemetry_block, chunks[0]);
    frame.render_widget(TelemetryWidget::new(view.readout.as_deref()), inner);

    let charts_block = panel("Charts", Color::Blue);
    let inner = charts_block.inner(chunks[1]);
    frame.render_widget(charts_block, chunks[1]);
    frame.render_widget(ChartsWidget::new(view.chart), inner);

    let alerts_color = match worst_level(&view.alerts) {
        AlertLevel::Ok => Color::Green,
        AlertLevel::Warn => Color::Yellow,
        AlertLevel::Error => Color::Red,
    };
    let alerts_block = panel("Alerts", alerts_color);
    let inner = alerts_block.inner(chunks[2]);
    frame.render_widget(alerts_block, chunks[2]);
    frame.render_widget(AlertsWidget::new(&view.alerts), inner);
}

fn render_key_help(frame: &mut Frame, area: Rect) {
    let key = Style::default().fg(Color::Yellow);
    let text = Style::default().fg(Color::DarkGray);
    let line = Line::from(vec![
        Span::styled(" f", key),
        Span::styled(" follow  ", text),
        Span::styled("s", key),
        Span::styled(" style  ", text),
        Span::styled("←↑↓→", key),
        Span::styled(" pan  ", text),
        Span::styled("+/-", key),
        Span::styled(" zoom  ", text),
        Span::styled("[/]", key),
        Span::styled(" rotate  ", text),
        Span::styled("q", key),
        Span::styled(" quit", text),
    ]);
    frame.render_widget(Paragraph::new(line), area);
}

/// Render the quit confirmation overlay banner.
pub fn render_quit_confirmation(frame: &mut Frame, area: Rect, remaining: Duration) {
    let banner_width = 56u16;
    let banner_height = 5u16;
    let x = area.x + (area.width.saturating_sub(banner_width)) / 2;
    let y = area.y + 4; // Below header

    let banner_area = Rect {
        x,
        y,
        width: banner_width.min(area.width),
        height: banner_height.min(area.height.saturating_sub(4)),
    };

    frame.render_widget(Clear, banner_area);

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Red))
        .style(Style::default().bg(Color::Black))
        .title(Span::styled(
            " ⚠ Confirm Quit ",
            Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
        ));

    let bold = |color: Color| Style::default().fg(color).add_modifier(Modifier::BOLD);
    let white = Style::default().fg(Color::White);
    let text = vec![
        Line::from(Span::styled(
            "The telemetry link will be closed.",
            Style::default().fg(Color::Yellow),
        )),
        Line::from(vec![
            Span::styled("Press ", white),
            Span::styled("y", bold(Color::Green)),
            Span::styled(" or ", white),
            Span::styled("q", bold(Color::Green)),
            Span::styled(" to quit, ", white),
            Span::styled("n", bold(Color::Cyan)),
            Span::styled(" or ", white),
            Span::styled("Esc", bold(Color::Cyan)),
            Span::styled(" to cancel", white),
            Span::styled(
                format!("  ({}s)", remaining.as_secs()),
                Style::default().fg(Color::DarkGray),
            ),
        ]),
    ];

    let paragraph = Paragraph::new(text)
        .block(block)
        .alignment(Alignment::Center);

    frame.render_widget(paragraph, banner_area);
}

#[cfg(test)]
mod tests {
    use super::*;
    use groundlink::map::MapSyncConfig;
    use groundlink::telemetry::TelemetrySnapshot;
    use ratatui::{backend::TestBackend, Terminal};
    use std::time::Instant;

    fn render(station: &GroundStation<SceneMap>) -> String {
        let backend = TestBackend::new(120, 36);
        let mut terminal = Terminal::new(backend).unwrap();
        let config = DashboardConfig {
            telemetry_url: "ws://localhost:8000/ws".to_string(),
        };
        terminal
            .draw(|frame| render_ui(frame, station, &config, Duration::from_secs(75), None))
            .unwrap();
        terminal
            .backend()
            .buffer()
            .content
            .iter()
            .map(|cell| cell.symbol())
            .collect()
    }

    fn station() -> GroundStation<SceneMap> {
        let mut station = GroundStation::<SceneMap>::mount(MapSyncConfig::default()).unwrap();
        station.pump_map_events();
        station
    }

    #[test]
    fn test_offline_dashboard() {
        let screen = render(&station());

        assert!(screen.contains("Cloud Drone GCS"));
        assert!(screen.contains("Offline"));
        assert!(screen.contains("Waiting for telemetry..."));
        assert!(screen.contains("No telemetry"));
        assert!(screen.contains("Center Drone"));
        assert!(screen.contains("Uptime: 1m15s"));
    }

    #[test]
    fn test_online_dashboard() {
        let mut station = station();
        station.set_status(ConnectionStatus::Connected);
        station.on_snapshot(
            TelemetrySnapshot {
                sequence: 1,
                received_at: chrono::Utc::now(),
                latitude: Some(47.3977),
                longitude: Some(8.5456),
                altitude: Some(12.0),
                battery: Some(18.0),
                armed: true,
                mode: "MISSION".to_string(),
                ..Default::default()
            },
            Instant::now(),
        );

        let screen = render(&station);

        assert!(screen.contains("Online"));
        assert!(screen.contains("Connected"));
        assert!(screen.contains("MISSION"));
        assert!(screen.contains("Low battery"));
        assert!(screen.contains("trail 1"));
    }

    #[test]
    fn test_quit_banner() {
        let station = station();
        let backend = TestBackend::new(100, 30);
        let mut terminal = Terminal::new(backend).unwrap();
        let config = DashboardConfig {
            telemetry_url: String::new(),
        };
        terminal
            .draw(|frame| {
                render_ui(
                    frame,
                    &station,
                    &config,
                    Duration::ZERO,
                    Some(Duration::from_secs(4)),
                )
            })
            .unwrap();

        let screen: String = terminal
            .backend()
            .buffer()
            .content
            .iter()
            .map(|cell| cell.symbol())
            .collect();
        assert!(screen.contains("Confirm Quit"));
        assert!(screen.contains("(4s)"));
    }
}
