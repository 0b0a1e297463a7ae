//! Telemetry readout widget.
//!
//! Layout:
//! ```text
//! ┌─ Telemetry ─────────────────────┐
//! │ Latitude      47.397742         │
//! │ Longitude     8.545594          │
//! │ Altitude (m)  12.4              │
//! │ ...                             │
//! └─────────────────────────────────┘
//! ```

use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Color, Style},
    text::{Line, Span},
    widgets::{Paragraph, Widget},
};

use groundlink::dashboard::{ReadoutRow, PLACEHOLDER};

/// Width of the label column.
const LABEL_WIDTH: usize = 14;

/// Widget showing the formatted telemetry rows.
pub struct TelemetryWidget<'a> {
    rows: Option<&'a [ReadoutRow]>,
}

impl<'a> TelemetryWidget<'a> {
    pub fn new(rows: Option<&'a [ReadoutRow]>) -> Self {
        Self { rows }
    }

    fn build_lines(&self) -> Vec<Line<'static>> {
        let Some(rows) = self.rows else {
            return vec![Line::from(Span::styled(
                "Waiting for telemetry...",
                Style::default().fg(Color::Yellow),
            ))];
        };

        rows.iter()
            .map(|row| {
                let value_color = if row.value == PLACEHOLDER {
                    Color::DarkGray
                } else {
                    Color::White
                };
                Line::from(vec![
                    Span::styled(
                        format!("{:<width$}", row.label, width = LABEL_WIDTH),
                        Style::default().fg(Color::DarkGray),
                    ),
                    Span::styled(row.value.clone(), Style::default().fg(value_color)),
                ])
            })
            .collect()
    }
}

impl Widget for TelemetryWidget<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        Paragraph::new(self.build_lines()).render(area, buf);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn text(line: &Line) -> String {
        line.spans.iter().map(|s| s.content.as_ref()).collect()
    }

    #[test]
    fn test_waiting_before_telemetry() {
        let lines = TelemetryWidget::new(None).build_lines();
        assert_eq!(lines.len(), 1);
        assert_eq!(text(&lines[0]), "Waiting for telemetry...");
    }

    #[test]
    fn test_rows_are_aligned() {
        let rows = vec![
            ReadoutRow {
                label: "Mode",
                value: "POSCTL".to_string(),
            },
            ReadoutRow {
                label: "Battery (%)",
                value: PLACEHOLDER.to_string(),
            },
        ];
        let lines = TelemetryWidget::new(Some(&rows)).build_lines();

        assert_eq!(text(&lines[0]), "Mode          POSCTL");
        assert_eq!(text(&lines[1]), "Battery (%)   —");
        assert_eq!(lines[1].spans[1].style.fg, Some(Color::DarkGray));
    }
}
