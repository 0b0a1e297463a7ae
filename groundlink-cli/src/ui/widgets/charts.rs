//! Altitude, speed and battery trend widget.
//!
//! Each metric takes two lines: a caption with the latest value and a
//! sparkline of the rolling chart series.

use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Color, Style},
    text::{Line, Span},
    widgets::{Paragraph, Widget},
};

use groundlink::dashboard::{ChartSeries, Metric};

use super::primitives::{format_value, render_sparkline_fixed_width, SparklineScale};

fn metric_style(metric: Metric) -> (Color, SparklineScale) {
    match metric {
        Metric::Altitude => (Color::Cyan, SparklineScale::Auto),
        Metric::Speed => (Color::Green, SparklineScale::Auto),
        Metric::Battery => (
            Color::Yellow,
            SparklineScale::Fixed {
                min: 0.0,
                max: 100.0,
            },
        ),
    }
}

/// Widget rendering one sparkline per chart metric.
pub struct ChartsWidget<'a> {
    chart: &'a ChartSeries,
}

impl<'a> ChartsWidget<'a> {
    pub fn new(chart: &'a ChartSeries) -> Self {
        Self { chart }
    }

    fn build_lines(&self, width: usize) -> Vec<Line<'static>> {
        let time_label = self
            .chart
            .latest()
            .map(|sample| sample.label())
            .unwrap_or_default();

        let mut lines = Vec::with_capacity(Metric::ALL.len() * 2);
        for metric in Metric::ALL {
            let (color, scale) = metric_style(metric);
            let current = self
                .chart
                .latest()
                .map(|sample| format_value(sample.value(metric), ""))
                .unwrap_or_else(|| "-".to_string());

            let caption = format!("{} {}", metric.title(), current);
            let padding = width.saturating_sub(caption.chars().count() + time_label.len());
            lines.push(Line::from(vec![
                Span::styled(metric.title(), Style::default().fg(Color::DarkGray)),
                Span::styled(format!(" {}", current), Style::default().fg(Color::White)),
                Span::raw(" ".repeat(padding)),
                Span::styled(time_label.clone(), Style::default().fg(Color::DarkGray)),
            ]));

            let values = self.chart.values(metric);
            lines.push(Line::from(Span::styled(
                render_sparkline_fixed_width(&values, width, scale),
                Style::default().fg(color),
            )));
        }
        lines
    }
}

impl Widget for ChartsWidget<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        Paragraph::new(self.build_lines(area.width as usize)).render(area, buf);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use groundlink::telemetry::TelemetrySnapshot;

    fn text(line: &Line) -> String {
        line.spans.iter().map(|s| s.content.as_ref()).collect()
    }

    #[test]
    fn test_empty_series() {
        let chart = ChartSeries::default();
        let lines = ChartsWidget::new(&chart).build_lines(20);

        assert_eq!(lines.len(), 6);
        assert!(text(&lines[0]).starts_with("Altitude (m) -"));
        assert_eq!(text(&lines[1]), " ".repeat(20));
    }

    #[test]
    fn test_sparkline_tracks_samples() {
        let mut chart = ChartSeries::default();
        for (sequence, altitude) in [(1, 10.0), (2, 20.0), (3, 30.0)] {
            chart.push(&TelemetrySnapshot {
                sequence,
                altitude: Some(altitude),
                battery: Some(80.0),
                ..Default::default()
            });
        }

        let lines = ChartsWidget::new(&chart).build_lines(10);
        assert!(text(&lines[0]).starts_with("Altitude (m) 30.0"));
        assert!(text(&lines[1]).ends_with("▁▅█"));
        // Battery is scaled to 0-100, not to its own range
        assert!(text(&lines[5]).ends_with("▇▇▇"));
    }
}
