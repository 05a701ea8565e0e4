// File: crates/stream-core/src/interaction.rs
// Summary: Hover state machine; builds a per-series mini bar chart and positions its tooltip.
// Notes:
// - `transition` is pure. The controller applies its effect to the tooltip it owns.
// - The mini chart is built once per enter; moves only reposition the tooltip.

use chrono::{DateTime, Utc};
use kurbo::{Point, Rect, Vec2};

use crate::axis::Axis;
use crate::config::TooltipConfig;
use crate::record::Record;
use crate::scale::{BandScale, LinearScale, ScaleTransform, FALLBACK_DOMAIN};
use crate::scene::{Node, NodeClass, Scene, Shape};
use crate::theme::{ColorAssignment, Theme};
use crate::types::{Margins, Rgba};

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub enum HoverState {
    #[default]
    Idle,
    Hovering(String),
}

impl HoverState {
    pub fn key(&self) -> Option<&str> {
        match self {
            HoverState::Idle => None,
            HoverState::Hovering(k) => Some(k),
        }
    }
}

/// Pointer input in scene pixel coordinates.
#[derive(Clone, Debug, PartialEq)]
pub enum PointerEvent {
    Enter { key: String, x: f64, y: f64 },
    Move { x: f64, y: f64 },
    Leave,
}

/// What the tooltip must do in response to an event. `position` is the tooltip's top-left.
#[derive(Clone, Debug, PartialEq)]
pub enum Effect {
    Show { key: String, position: Point },
    Move { position: Point },
    Hide,
    None,
}

/// Next hover state and the tooltip effect for `event`.
pub fn transition(state: &HoverState, event: &PointerEvent, offset: (f64, f64)) -> (HoverState, Effect) {
    let at = |x: f64, y: f64| Point::new(x + offset.0, y + offset.1);
    match (state, event) {
        (_, PointerEvent::Enter { key, x, y }) => {
            (HoverState::Hovering(key.clone()), Effect::Show { key: key.clone(), position: at(*x, *y) })
        }
        (HoverState::Hovering(k), PointerEvent::Move { x, y }) => {
            (HoverState::Hovering(k.clone()), Effect::Move { position: at(*x, *y) })
        }
        (HoverState::Hovering(_), PointerEvent::Leave) => (HoverState::Idle, Effect::Hide),
        (HoverState::Idle, PointerEvent::Move { .. } | PointerEvent::Leave) => (HoverState::Idle, Effect::None),
    }
}

/// Data a hover session reads: the normalized records (raw values) and the key colors.
/// `generation` identifies the dataset; a controller discards hover state from any other.
#[derive(Clone, Copy)]
pub struct HoverContext<'a> {
    pub generation: u64,
    pub records: &'a [Record],
    pub keys: &'a [String],
    pub colors: &'a ColorAssignment,
    pub tooltip: &'a TooltipConfig,
}

#[derive(Clone, Debug, PartialEq)]
pub struct MiniBar {
    pub date: DateTime<Utc>,
    pub label: String,
    pub value: f64,
    /// Bar rectangle relative to the mini chart's plot origin.
    pub rect: Rect,
}

/// Bar chart of one series' raw values over time.
#[derive(Clone, Debug, PartialEq)]
pub struct MiniChart {
    pub key: String,
    pub color: Rgba,
    pub bars: Vec<MiniBar>,
    pub x: BandScale,
    pub y: LinearScale,
    pub width: f64,
    pub height: f64,
    pub margins: Margins,
    pub value_ticks: usize,
}

impl MiniChart {
    /// Band x-scale over abbreviated month labels, linear y-scale from 0 to the series max.
    pub fn build(records: &[Record], key_index: usize, key: &str, color: Rgba, cfg: &TooltipConfig) -> Self {
        let labels: Vec<String> = records.iter().map(|r| r.date.format("%b").to_string()).collect();
        let x = BandScale::new(labels.iter().cloned(), (0.0, cfg.chart_width), cfg.band_padding);
        let max = records.iter().map(|r| r.value(key_index)).fold(0.0_f64, f64::max);
        let domain = if max > 0.0 { (0.0, max) } else { FALLBACK_DOMAIN };
        let y = LinearScale::new(domain, (cfg.chart_height, 0.0));

        let bars = records
            .iter()
            .zip(labels)
            .map(|(r, label)| {
                let value = r.value(key_index);
                let left = x.position(&label).unwrap_or(0.0);
                let top = y.to_px(value);
                MiniBar {
                    date: r.date,
                    label,
                    value,
                    rect: Rect::new(left, top, left + x.bandwidth(), cfg.chart_height),
                }
            })
            .collect();

        Self {
            key: key.to_string(),
            color,
            bars,
            x,
            y,
            width: cfg.chart_width,
            height: cfg.chart_height,
            margins: cfg.chart_margins,
            value_ticks: cfg.value_ticks,
        }
    }

    /// Outer size including margins.
    pub fn size(&self) -> (f64, f64) {
        (self.width + self.margins.hsum() as f64, self.height + self.margins.vsum() as f64)
    }

    /// Bars and both axes; `origin` is the outer top-left corner.
    pub fn nodes(&self, origin: Point, theme: &Theme) -> Vec<Node> {
        let plot = Point::new(origin.x + self.margins.left as f64, origin.y + self.margins.top as f64);
        let mut out: Vec<Node> = self
            .bars
            .iter()
            .map(|b| {
                let r = b.rect + plot.to_vec2();
                Node::new(NodeClass::Bar, Shape::Rect(r)).with_key(self.key.as_str()).filled(self.color)
            })
            .collect();
        out.extend(Axis::values(&self.y, self.value_ticks).nodes(plot, theme));
        out.extend(Axis::bands(&self.x, (0.0, self.width)).nodes(Point::new(plot.x, plot.y + self.height), theme));
        out
    }
}

/// A visible tooltip: its top-left position and the mini chart inside it.
#[derive(Clone, Debug, PartialEq)]
pub struct Tooltip {
    pub position: Point,
    pub chart: MiniChart,
    pub padding: f64,
}

impl Tooltip {
    pub fn box_rect(&self) -> Rect {
        let (w, h) = self.chart.size();
        Rect::from_origin_size(self.position, (w + 2.0 * self.padding, h + 2.0 * self.padding))
    }

    /// Overlay scene of `width` x `height` holding the tooltip box and its chart.
    pub fn scene(&self, width: f64, height: f64, theme: &Theme) -> Scene {
        let mut scene = Scene::new(width, height);
        let rect = self.box_rect();
        scene.push(Node::new(NodeClass::Tooltip, Shape::Rect(rect + Vec2::new(0.0, 4.0))).filled(theme.tooltip_shadow));
        scene.push(
            Node::new(NodeClass::Tooltip, Shape::Rect(rect))
                .filled(theme.tooltip_background)
                .stroked(theme.tooltip_border, 1.0),
        );
        let inner = Point::new(self.position.x + self.padding, self.position.y + self.padding);
        for node in self.chart.nodes(inner, theme) {
            // Everything inside the tooltip belongs to it, bars keep their own class.
            let node = if node.class == NodeClass::Axis { Node { class: NodeClass::Tooltip, ..node } } else { node };
            scene.push(node);
        }
        scene
    }
}

/// Owns the hover state and the tooltip; one hover session at a time.
#[derive(Clone, Debug, Default)]
pub struct InteractionController {
    state: HoverState,
    tooltip: Option<Tooltip>,
    generation: Option<u64>,
}

impl InteractionController {
    pub fn new() -> Self { Self::default() }

    pub fn state(&self) -> &HoverState {
        &self.state
    }

    pub fn tooltip(&self) -> Option<&Tooltip> {
        self.tooltip.as_ref()
    }

    /// Dataset the current hover state was built from.
    pub fn generation(&self) -> Option<u64> {
        self.generation
    }

    /// Drop hover state that belongs to a different dataset than `ctx`.
    fn adopt(&mut self, ctx: &HoverContext<'_>) {
        if self.generation == Some(ctx.generation) {
            return;
        }
        if self.state != HoverState::Idle {
            tracing::trace!(from = ?self.generation, to = ctx.generation, "dataset changed; hover reset");
        }
        self.reset();
        self.generation = Some(ctx.generation);
    }

    pub fn handle(&mut self, ctx: &HoverContext<'_>, event: PointerEvent) -> Effect {
        self.adopt(ctx);
        if let PointerEvent::Enter { key, .. } = &event {
            if !ctx.keys.iter().any(|k| k == key) {
                tracing::trace!(%key, "enter for unknown series ignored");
                return Effect::None;
            }
        }

        let (next, effect) = transition(&self.state, &event, ctx.tooltip.offset);
        tracing::trace!(from = ?self.state, to = ?next, ?effect, "hover transition");
        match &effect {
            Effect::Show { key, position } => {
                // The previous chart is dropped before the new one is built.
                self.tooltip = None;
                if let Some(index) = ctx.keys.iter().position(|k| k == key) {
                    let color = ctx.colors.color(key).unwrap_or(Rgba::BLACK);
                    let chart = MiniChart::build(ctx.records, index, key, color, ctx.tooltip);
                    self.tooltip = Some(Tooltip { position: *position, chart, padding: ctx.tooltip.padding });
                }
            }
            Effect::Move { position } => {
                if let Some(t) = self.tooltip.as_mut() {
                    t.position = *position;
                }
            }
            Effect::Hide => self.tooltip = None,
            Effect::None => {}
        }
        self.state = next;
        effect
    }

    /// Feed a raw pointer position with the layer under it (if any), emitting the
    /// leave/enter/move sequence a pointer crossing layer boundaries produces.
    pub fn track(&mut self, ctx: &HoverContext<'_>, hit: Option<&str>, x: f64, y: f64) -> Vec<Effect> {
        self.adopt(ctx);
        let current = self.state.key().map(str::to_owned);
        let mut out = Vec::new();
        match (current.as_deref(), hit) {
            (Some(k), Some(h)) if k == h => out.push(self.handle(ctx, PointerEvent::Move { x, y })),
            (Some(_), Some(h)) => {
                out.push(self.handle(ctx, PointerEvent::Leave));
                out.push(self.handle(ctx, PointerEvent::Enter { key: h.to_string(), x, y }));
            }
            (Some(_), None) => out.push(self.handle(ctx, PointerEvent::Leave)),
            (None, Some(h)) => out.push(self.handle(ctx, PointerEvent::Enter { key: h.to_string(), x, y })),
            (None, None) => {}
        }
        out
    }

    /// Overlay to draw above the chart, `None` while idle.
    pub fn overlay(&self, width: f64, height: f64, theme: &Theme) -> Option<Scene> {
        self.tooltip.as_ref().map(|t| t.scene(width, height, theme))
    }

    pub fn reset(&mut self) {
        self.state = HoverState::Idle;
        self.tooltip = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn transition_table() {
        let off = (20.0, 20.0);
        let enter = PointerEvent::Enter { key: "A".into(), x: 1.0, y: 2.0 };
        let (s, e) = transition(&HoverState::Idle, &enter, off);
        assert_eq!(s, HoverState::Hovering("A".into()));
        assert_eq!(e, Effect::Show { key: "A".into(), position: Point::new(21.0, 22.0) });

        let (s2, e2) = transition(&s, &PointerEvent::Move { x: 5.0, y: 5.0 }, off);
        assert_eq!(s2, s);
        assert_eq!(e2, Effect::Move { position: Point::new(25.0, 25.0) });

        let (s3, e3) = transition(&s2, &PointerEvent::Leave, off);
        assert_eq!(s3, HoverState::Idle);
        assert_eq!(e3, Effect::Hide);

        assert_eq!(transition(&HoverState::Idle, &PointerEvent::Leave, off), (HoverState::Idle, Effect::None));
        assert_eq!(
            transition(&HoverState::Idle, &PointerEvent::Move { x: 0.0, y: 0.0 }, off),
            (HoverState::Idle, Effect::None)
        );
    }

    #[test]
    fn enter_while_hovering_switches_key() {
        let (s, e) = transition(
            &HoverState::Hovering("A".into()),
            &PointerEvent::Enter { key: "B".into(), x: 0.0, y: 0.0 },
            (0.0, 0.0),
        );
        assert_eq!(s.key(), Some("B"));
        assert!(matches!(e, Effect::Show { ref key, .. } if key == "B"));
    }
}
