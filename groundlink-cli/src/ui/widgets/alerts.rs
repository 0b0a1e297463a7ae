//! Alerts panel widget.

use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Paragraph, Widget},
};

use groundlink::dashboard::{Alert, AlertLevel};

fn level_color(level: AlertLevel) -> Color {
    match level {
        AlertLevel::Ok => Color::Green,
        AlertLevel::Warn => Color::Yellow,
        AlertLevel::Error => Color::Red,
    }
}

/// Widget listing alerts, one per line, colored by level.
pub struct AlertsWidget<'a> {
    alerts: &'a [Alert],
}

impl<'a> AlertsWidget<'a> {
    pub fn new(alerts: &'a [Alert]) -> Self {
        Self { alerts }
    }

    fn build_lines(&self) -> Vec<Line<'static>> {
        self.alerts
            .iter()
            .map(|alert| {
                let color = level_color(alert.level);
                let mut text_style = Style::default().fg(color);
                if alert.level == AlertLevel::Error {
                    text_style = text_style.add_modifier(Modifier::BOLD);
                }
                Line::from(vec![
                    Span::styled("● ", Style::default().fg(color)),
                    Span::styled(alert.text, text_style),
                ])
            })
            .collect()
    }
}

impl Widget for AlertsWidget<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        Paragraph::new(self.build_lines()).render(area, buf);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use groundlink::dashboard::alerts::{DISARMED, GPS_LOST};

    #[test]
    fn test_lines_colored_by_level() {
        let alerts = [DISARMED, GPS_LOST];
        let lines = AlertsWidget::new(&alerts).build_lines();

        assert_eq!(lines.len(), 2);
        assert_eq!(lines[0].spans[1].content, "Drone disarmed");
        assert_eq!(lines[0].spans[0].style.fg, Some(Color::Yellow));
        assert_eq!(lines[1].spans[1].style.fg, Some(Color::Red));
        assert!(lines[1].spans[1]
            .style
            .add_modifier
            .contains(Modifier::BOLD));
    }
}
