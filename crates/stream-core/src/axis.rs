// File: crates/stream-core/src/axis.rs
// Summary: Axis model (orientation, ticks, labels) and its conversion into scene nodes.

use kurbo::{Line, Point};

use crate::grid::format_tick;
use crate::scale::{BandScale, LinearScale, ScaleTransform, TimeScale};
use crate::scene::{Node, NodeClass, Shape, TextAnchor, TextBaseline};
use crate::theme::Theme;

/// Tick mark length in pixels.
pub const TICK_SIZE: f64 = 6.0;
/// Gap between tick mark and label.
pub const TICK_PADDING: f64 = 3.0;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Orient {
    Bottom,
    Left,
}

#[derive(Clone, Debug, PartialEq)]
pub struct AxisTick {
    /// Position along the axis, in pixels relative to the axis origin.
    pub offset: f64,
    pub label: String,
}

#[derive(Clone, Debug, PartialEq)]
pub struct Axis {
    pub orient: Orient,
    /// Pixel extent of the axis line.
    pub range: (f64, f64),
    pub ticks: Vec<AxisTick>,
}

impl Axis {
    pub fn new(orient: Orient, range: (f64, f64)) -> Self {
        Self { orient, range, ticks: Vec::new() }
    }

    /// Bottom time axis with one tick per month start, labelled with the abbreviated month.
    pub fn months(x: &TimeScale) -> Self {
        let mut axis = Self::new(Orient::Bottom, x.linear.range);
        axis.ticks = x
            .month_ticks()
            .into_iter()
            .map(|d| AxisTick { offset: x.date_to_px(d), label: d.format("%b").to_string() })
            .collect();
        axis
    }

    /// Left value axis with about `count` round-number ticks.
    pub fn values(y: &LinearScale, count: usize) -> Self {
        let mut axis = Self::new(Orient::Left, y.range);
        axis.ticks = y
            .ticks(count)
            .into_iter()
            .map(|v| AxisTick { offset: y.to_px(v), label: format_tick(v) })
            .collect();
        axis
    }

    /// Bottom axis with one tick at the center of every band.
    pub fn bands(x: &BandScale, range: (f64, f64)) -> Self {
        let mut axis = Self::new(Orient::Bottom, range);
        let half = x.bandwidth() / 2.0;
        axis.ticks = x
            .domain()
            .iter()
            .filter_map(|label| x.position(label).map(|p| AxisTick { offset: p + half, label: label.clone() }))
            .collect();
        axis
    }

    pub fn labels(&self) -> Vec<&str> {
        self.ticks.iter().map(|t| t.label.as_str()).collect()
    }

    /// Domain line, tick marks and labels, translated to `origin`.
    pub fn nodes(&self, origin: Point, theme: &Theme) -> Vec<Node> {
        let mut out = Vec::with_capacity(1 + 2 * self.ticks.len());
        let (r0, r1) = self.range;
        let (ox, oy) = (origin.x, origin.y);
        let stroke = |n: Node| n.stroked(theme.axis_line, 1.0);
        let font = theme.axis_font_size;

        match self.orient {
            Orient::Bottom => {
                out.push(stroke(Node::new(NodeClass::Axis, Shape::Line(Line::new((ox + r0, oy), (ox + r1, oy))))));
                for t in &self.ticks {
                    let x = ox + t.offset;
                    out.push(stroke(Node::new(NodeClass::Axis, Shape::Line(Line::new((x, oy), (x, oy + TICK_SIZE))))));
                    out.push(
                        Node::text(
                            NodeClass::Axis,
                            t.label.clone(),
                            Point::new(x, oy + TICK_SIZE + TICK_PADDING),
                            font,
                            TextAnchor::Middle,
                            TextBaseline::Top,
                        )
                        .filled(theme.axis_label),
                    );
                }
            }
            Orient::Left => {
                let (top, bottom) = if r0 < r1 { (r0, r1) } else { (r1, r0) };
                out.push(stroke(Node::new(NodeClass::Axis, Shape::Line(Line::new((ox, oy + top), (ox, oy + bottom))))));
                for t in &self.ticks {
                    let y = oy + t.offset;
                    out.push(stroke(Node::new(NodeClass::Axis, Shape::Line(Line::new((ox - TICK_SIZE, y), (ox, y))))));
                    out.push(
                        Node::text(
                            NodeClass::Axis,
                            t.label.clone(),
                            Point::new(ox - TICK_SIZE - TICK_PADDING, y),
                            font,
                            TextAnchor::End,
                            TextBaseline::Middle,
                        )
                        .filled(theme.axis_label),
                    );
                }
            }
        }
        out
    }
}
