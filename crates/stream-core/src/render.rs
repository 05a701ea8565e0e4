// File: crates/stream-core/src/render.rs
// Summary: Layer renderer; turns stacked geometry and scales into a scene (areas, time axis, legend).

use kurbo::{BezPath, Point, Rect};

use crate::axis::Axis;
use crate::config::ChartConfig;
use crate::curve::basis_area;
use crate::record::Record;
use crate::scale::{ScaleTransform, Scales};
use crate::scene::{Node, NodeClass, Scene, Shape, TextAnchor, TextBaseline};
use crate::stack::{Layer, StackLayout};
use crate::theme::{ColorAssignment, Theme};

/// Legend geometry, relative to the legend's top-left corner.
pub const LEGEND_GAP: f64 = 20.0;
pub const LEGEND_ROW: f64 = 25.0;
pub const LEGEND_SWATCH: f64 = 20.0;
pub const LEGEND_LABEL: (f64, f64) = (30.0, 15.0);

/// Everything the renderer reads. Plain borrowed data; rendering has no other inputs.
pub struct RenderInput<'a> {
    pub config: &'a ChartConfig,
    pub theme: &'a Theme,
    pub records: &'a [Record],
    pub layout: &'a StackLayout,
    pub scales: &'a Scales,
    pub colors: &'a ColorAssignment,
}

/// Smoothed area outline of one layer in absolute scene coordinates.
pub fn layer_path(layer: &Layer, records: &[Record], scales: &Scales, origin: Point) -> BezPath {
    let mut top = Vec::with_capacity(layer.bands.len());
    let mut bottom = Vec::with_capacity(layer.bands.len());
    for (band, rec) in layer.bands.iter().zip(records) {
        let x = origin.x + scales.x.to_px(rec.timestamp_ms());
        top.push(Point::new(x, origin.y + scales.y.to_px(band.high)));
        bottom.push(Point::new(x, origin.y + scales.y.to_px(band.low)));
    }
    basis_area(&top, &bottom)
}

/// One closed path per layer, in stack order.
pub fn layer_paths(layout: &StackLayout, records: &[Record], scales: &Scales, origin: Point) -> Vec<(String, BezPath)> {
    layout
        .layers
        .iter()
        .map(|l| (l.key.clone(), layer_path(l, records, scales, origin)))
        .collect()
}

/// Build the full chart scene: layers, then the time axis, then the legend.
#[tracing::instrument(skip_all, fields(records = input.records.len(), layers = input.layout.layers.len()))]
pub fn render_chart(input: &RenderInput<'_>) -> Scene {
    let cfg = input.config;
    let origin = Point::new(cfg.margins.left as f64, cfg.margins.top as f64);
    let mut scene = Scene::new(cfg.width as f64, cfg.height as f64).with_background(input.theme.background);

    if !input.records.is_empty() {
        for (key, path) in layer_paths(input.layout, input.records, input.scales, origin) {
            let fill = input.colors.color(&key).unwrap_or(input.theme.axis_line);
            scene.push(Node::new(NodeClass::Layer, Shape::Path(path)).with_key(key).filled(fill));
        }
    }

    // An empty dataset has only the fallback domain; it gets a bare axis line.
    let mut axis = Axis::months(&input.scales.x);
    if input.records.is_empty() {
        axis.ticks.clear();
    }
    scene.extend(axis.nodes(Point::new(origin.x, origin.y + cfg.plot_height()), input.theme));

    scene.extend(legend_nodes(input.colors, Point::new(origin.x + cfg.plot_width() + LEGEND_GAP, origin.y), input.theme));

    tracing::debug!(nodes = scene.nodes.len(), "rendered chart scene");
    scene
}

/// Color swatch and label per key, stacked vertically from `origin`.
pub fn legend_nodes(colors: &ColorAssignment, origin: Point, theme: &Theme) -> Vec<Node> {
    let mut out = Vec::with_capacity(colors.len() * 2);
    for (i, (key, color)) in colors.iter().enumerate() {
        let y = origin.y + i as f64 * LEGEND_ROW;
        let swatch = Rect::new(origin.x, y, origin.x + LEGEND_SWATCH, y + LEGEND_SWATCH);
        out.push(Node::new(NodeClass::Legend, Shape::Rect(swatch)).with_key(key).filled(color));
        out.push(
            Node::text(
                NodeClass::Legend,
                key,
                Point::new(origin.x + LEGEND_LABEL.0, y + LEGEND_LABEL.1),
                theme.legend_font_size,
                TextAnchor::Start,
                TextBaseline::Middle,
            )
            .with_key(key)
            .filled(theme.legend_label),
        );
    }
    out
}
