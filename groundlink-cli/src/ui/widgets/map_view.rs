//! Map panel widget.
//!
//! Draws what the in-memory map engine currently holds: the camera view, the
//! path layer fed from its GeoJSON source, and the vehicle marker. Nothing
//! is read from telemetry directly, so a style reload that has not yet
//! re-created the layers shows an empty trail just like a real renderer.
//!
//! The terminal canvas is always drawn north-up; the camera bearing is shown
//! in the panel title instead.

use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Color, Modifier, Style},
    symbols::Marker,
    text::Span,
    widgets::{
        canvas::{Canvas, Line as CanvasLine, Map, MapResolution},
        Block, Widget,
    },
};

use groundlink::map::layers::PATH_LAYER_ID;
use groundlink::map::{LayerKind, MapEngine, MapStyle, MarkerEffect, SceneMap};

/// Arrow glyphs for eight compass sectors, clockwise from north.
const HEADING_GLYPHS: [&str; 8] = ["↑", "↗", "→", "↘", "↓", "↙", "←", "↖"];

/// Longitude span shown across the map panel at `zoom`.
pub fn degrees_per_view(zoom: f64) -> f64 {
    (360.0 / 2f64.powf(zoom) * 4.0).min(360.0)
}

/// Arrow pointing along `heading` degrees.
pub fn heading_glyph(heading: f64) -> &'static str {
    let sector = ((heading.rem_euclid(360.0) + 22.5) / 45.0) as usize % 8;
    HEADING_GLYPHS[sector]
}

/// Colors for one map style.
struct Palette {
    background: Color,
    coastline: Color,
    marker: Color,
}

impl Palette {
    fn for_style(style: Option<MapStyle>) -> Self {
        match style {
            Some(MapStyle::Light) => Self {
                background: Color::Rgb(236, 236, 232),
                coastline: Color::Rgb(150, 150, 150),
                marker: Color::Black,
            },
            _ => Self {
                background: Color::Reset,
                coastline: Color::DarkGray,
                marker: Color::White,
            },
        }
    }
}

/// Vehicle marker as drawn on the canvas.
struct MarkerGlyph {
    x: f64,
    y: f64,
    glyph: &'static str,
    style: Style,
}

/// Widget rendering the map engine state on a braille canvas.
pub struct MapViewWidget<'a> {
    scene: &'a SceneMap,
    block: Option<Block<'a>>,
}

impl<'a> MapViewWidget<'a> {
    pub fn new(scene: &'a SceneMap) -> Self {
        Self { scene, block: None }
    }

    pub fn block(mut self, block: Block<'a>) -> Self {
        self.block = Some(block);
        self
    }

    /// Trail coordinates and color, if the path layer is installed.
    fn trail(&self) -> Option<(Vec<[f64; 2]>, Color)> {
        let layer = self.scene.layer(PATH_LAYER_ID)?;
        let LayerKind::Line { source, color, .. } = &layer.kind else {
            return None;
        };
        let data = self.scene.source_data(source)?;
        let color = color.parse::<Color>().unwrap_or(Color::Cyan);
        Some((data.coordinates.clone(), color))
    }

    fn marker(&self, palette: &Palette) -> Option<MarkerGlyph> {
        let (_, marker) = self.scene.markers().next()?;
        let style = match marker.effect {
            Some(MarkerEffect::Takeoff) => Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::BOLD),
            None => Style::default()
                .fg(palette.marker)
                .add_modifier(Modifier::BOLD),
        };
        Some(MarkerGlyph {
            x: marker.position.longitude,
            y: marker.position.latitude,
            glyph: heading_glyph(marker.rotation),
            style,
        })
    }
}

impl Widget for MapViewWidget<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let inner = match &self.block {
            Some(block) => block.inner(area),
            None => area,
        };
        if inner.width == 0 || inner.height == 0 {
            if let Some(block) = self.block {
                block.render(area, buf);
            }
            return;
        }

        let camera = self.scene.camera();
        let palette = Palette::for_style(MapStyle::from_style_id(self.scene.style()));

        // Terminal cells are roughly twice as tall as they are wide
        let lon_half = degrees_per_view(camera.zoom) / 2.0;
        let lat_half =
            (lon_half * 2.0 * f64::from(inner.height) / f64::from(inner.width)).min(90.0);
        let x_bounds = [
            camera.center.longitude - lon_half,
            camera.center.longitude + lon_half,
        ];
        let y_bounds = [
            camera.center.latitude - lat_half,
            camera.center.latitude + lat_half,
        ];

        let trail = self.trail();
        let marker = self.marker(&palette);
        let coastline = palette.coastline;

        let mut canvas = Canvas::default()
            .marker(Marker::Braille)
            .background_color(palette.background)
            .x_bounds(x_bounds)
            .y_bounds(y_bounds)
            .paint(move |ctx| {
                ctx.draw(&Map {
                    resolution: MapResolution::High,
                    color: coastline,
                });
                ctx.layer();

                if let Some((points, color)) = &trail {
                    for pair in points.windows(2) {
                        ctx.draw(&CanvasLine {
                            x1: pair[0][0],
                            y1: pair[0][1],
                            x2: pair[1][0],
                            y2: pair[1][1],
                            color: *color,
                        });
                    }
                }

                if let Some(marker) = &marker {
                    ctx.print(marker.x, marker.y, Span::styled(marker.glyph, marker.style));
                }
            });
        if let Some(block) = self.block {
            canvas = canvas.block(block);
        }
        canvas.render(area, buf);
    }
}
