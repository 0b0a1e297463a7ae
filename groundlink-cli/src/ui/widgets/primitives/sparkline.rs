//! Sparkline chart primitive.
//!
//! A sparkline is a compact chart showing recent values as a series of
//! vertical bars. Used for the altitude, speed and battery trends; the
//! strings are styled by the calling widget.

/// Unicode characters for sparkline visualization (8 height levels).
/// From lowest (▁) to highest (█).
const SPARKLINE_CHARS: [char; 8] = ['▁', '▂', '▃', '▄', '▅', '▆', '▇', '█'];

/// Value range a sparkline is scaled to.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SparklineScale {
    /// Lowest to highest visible value.
    Auto,
    /// Fixed bounds, e.g. 0-100 for a percentage.
    Fixed { min: f64, max: f64 },
}

/// Render values as a sparkline string scaled to `scale`.
///
/// A flat series renders at the lowest level.
pub fn render_sparkline(values: &[f64], scale: SparklineScale) -> String {
    if values.is_empty() {
        return String::new();
    }

    let (min, max) = match scale {
        SparklineScale::Auto => values
            .iter()
            .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), &v| {
                (lo.min(v), hi.max(v))
            }),
        SparklineScale::Fixed { min, max } => (min, max),
    };
    let range = max - min;

    values
        .iter()
        .map(|&val| {
            if range.is_nan() || range <= 0.0 {
                return SPARKLINE_CHARS[0];
            }
            let normalized = ((val - min) / range).clamp(0.0, 1.0);
            let index = ((normalized * 7.0).round() as usize).min(7);
            SPARKLINE_CHARS[index]
        })
        .collect()
}

/// Render the last `width` values, left-padded with spaces.
pub fn render_sparkline_fixed_width(values: &[f64], width: usize, scale: SparklineScale) -> String {
    let start = values.len().saturating_sub(width);
    let sparkline = render_sparkline(&values[start..], scale);

    let sparkline_len = sparkline.chars().count();
    if sparkline_len < width {
        format!("{}{}", " ".repeat(width - sparkline_len), sparkline)
    } else {
        sparkline
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sparkline_render_empty() {
        assert_eq!(render_sparkline(&[], SparklineScale::Auto), "");
    }

    #[test]
    fn test_sparkline_flat_series() {
        assert_eq!(render_sparkline(&[5.0, 5.0, 5.0], SparklineScale::Auto), "▁▁▁");
    }

    #[test]
    fn test_sparkline_auto_uses_visible_range() {
        // A climb from 100 m to 101 m still spans the full height
        let result = render_sparkline(&[100.0, 100.5, 101.0], SparklineScale::Auto);
        assert!(result.starts_with('▁'));
        assert!(result.ends_with('█'));
    }

    #[test]
    fn test_sparkline_fixed_scale() {
        let scale = SparklineScale::Fixed {
            min: 0.0,
            max: 100.0,
        };
        assert_eq!(render_sparkline(&[0.0, 100.0, 150.0], scale), "▁██");
        assert_eq!(render_sparkline(&[50.0], scale), "▅");
    }

    #[test]
    fn test_sparkline_fixed_width_padding() {
        let result = render_sparkline_fixed_width(&[0.0, 0.5, 1.0], 5, SparklineScale::Auto);
        assert_eq!(result.chars().count(), 5);
        assert!(result.starts_with("  "));
    }

    #[test]
    fn test_sparkline_fixed_width_truncation() {
        let values = vec![9.0, 9.0, 1.0, 2.0, 3.0];
        let result = render_sparkline_fixed_width(&values, 3, SparklineScale::Auto);
        assert_eq!(result, "▁▅█");
    }
}
