// File: crates/stream-core/src/scene.rs
// Summary: Declarative scene model (paths, rects, lines, text) produced by the renderer, with SVG output.

use std::fmt::Write as _;

use kurbo::{BezPath, Line, Point, Rect, Shape as _};

use crate::types::Rgba;

/// What part of the chart a node belongs to.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum NodeClass {
    Layer,
    Axis,
    Legend,
    Tooltip,
    Bar,
}

impl NodeClass {
    pub fn as_str(&self) -> &'static str {
        match self {
            NodeClass::Layer => "layer",
            NodeClass::Axis => "axis",
            NodeClass::Legend => "legend",
            NodeClass::Tooltip => "tooltip",
            NodeClass::Bar => "bar",
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TextAnchor {
    Start,
    Middle,
    End,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TextBaseline {
    /// `at.y` is the top of the glyph box.
    Top,
    Middle,
    Alphabetic,
}

#[derive(Clone, Debug, PartialEq)]
pub enum Shape {
    Path(BezPath),
    Rect(Rect),
    Line(Line),
    Text {
        text: String,
        at: Point,
        size: f32,
        anchor: TextAnchor,
        baseline: TextBaseline,
    },
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Stroke {
    pub color: Rgba,
    pub width: f64,
}

#[derive(Clone, Debug, PartialEq)]
pub struct Node {
    pub class: NodeClass,
    /// Series key for layer and legend nodes.
    pub key: Option<String>,
    pub shape: Shape,
    pub fill: Option<Rgba>,
    pub stroke: Option<Stroke>,
}

impl Node {
    pub fn new(class: NodeClass, shape: Shape) -> Self {
        Self { class, key: None, shape, fill: None, stroke: None }
    }

    pub fn with_key(mut self, key: impl Into<String>) -> Self {
        self.key = Some(key.into());
        self
    }

    pub fn filled(mut self, color: Rgba) -> Self {
        self.fill = Some(color);
        self
    }

    pub fn stroked(mut self, color: Rgba, width: f64) -> Self {
        self.stroke = Some(Stroke { color, width });
        self
    }

    pub fn text(class: NodeClass, text: impl Into<String>, at: Point, size: f32, anchor: TextAnchor, baseline: TextBaseline) -> Self {
        Self::new(class, Shape::Text { text: text.into(), at, size, anchor, baseline })
    }

    /// Geometric bounds; text nodes report their anchor point only.
    pub fn bounds(&self) -> Rect {
        match &self.shape {
            Shape::Path(p) => p.bounding_box(),
            Shape::Rect(r) => *r,
            Shape::Line(l) => l.bounding_box(),
            Shape::Text { at, .. } => Rect::from_points(*at, *at),
        }
    }
}

/// A complete drawing in absolute pixel coordinates, painted in node order.
#[derive(Clone, Debug, PartialEq)]
pub struct Scene {
    pub width: f64,
    pub height: f64,
    pub background: Option<Rgba>,
    pub nodes: Vec<Node>,
}

impl Scene {
    pub fn new(width: f64, height: f64) -> Self {
        Self { width, height, background: None, nodes: Vec::new() }
    }

    pub fn with_background(mut self, color: Rgba) -> Self {
        self.background = Some(color);
        self
    }

    pub fn push(&mut self, node: Node) {
        self.nodes.push(node);
    }

    pub fn extend(&mut self, nodes: impl IntoIterator<Item = Node>) {
        self.nodes.extend(nodes);
    }

    pub fn nodes_of(&self, class: NodeClass) -> impl Iterator<Item = &Node> {
        self.nodes.iter().filter(move |n| n.class == class)
    }

    pub fn count(&self, class: NodeClass) -> usize {
        self.nodes_of(class).count()
    }

    /// Text content of nodes of `class`, in paint order.
    pub fn texts(&self, class: NodeClass) -> Vec<&str> {
        self.nodes_of(class)
            .filter_map(|n| match &n.shape {
                Shape::Text { text, .. } => Some(text.as_str()),
                _ => None,
            })
            .collect()
    }

    /// Serialize to a standalone SVG document.
    pub fn to_svg(&self) -> String {
        let mut out = String::new();
        let _ = write!(
            out,
            r#"<svg xmlns="http://www.w3.org/2000/svg" width="{w}" height="{h}" viewBox="0 0 {w} {h}">"#,
            w = self.width,
            h = self.height
        );
        if let Some(bg) = self.background {
            let _ = write!(out, r#"<rect width="100%" height="100%"{}/>"#, fill_attrs(Some(bg)));
        }
        for node in &self.nodes {
            write_node(&mut out, node);
        }
        out.push_str("</svg>");
        out
    }
}

fn write_node(out: &mut String, node: &Node) {
    let class = node.class.as_str();
    let key = node
        .key
        .as_deref()
        .map(|k| format!(r#" data-key="{}""#, escape(k)))
        .unwrap_or_default();
    let paint = format!("{}{}", fill_attrs(node.fill), stroke_attrs(node.stroke));
    let _ = match &node.shape {
        Shape::Path(p) => write!(out, r#"<path class="{class}"{key} d="{}"{paint}/>"#, p.to_svg()),
        Shape::Rect(r) => write!(
            out,
            r#"<rect class="{class}"{key} x="{}" y="{}" width="{}" height="{}"{paint}/>"#,
            r.x0,
            r.y0,
            r.width(),
            r.height()
        ),
        Shape::Line(l) => write!(
            out,
            r#"<line class="{class}" x1="{}" y1="{}" x2="{}" y2="{}"{paint}/>"#,
            l.p0.x, l.p0.y, l.p1.x, l.p1.y
        ),
        Shape::Text { text, at, size, anchor, baseline } => {
            let anchor = match anchor {
                TextAnchor::Start => "start",
                TextAnchor::Middle => "middle",
                TextAnchor::End => "end",
            };
            let baseline = match baseline {
                TextBaseline::Top => "hanging",
                TextBaseline::Middle => "middle",
                TextBaseline::Alphabetic => "alphabetic",
            };
            write!(
                out,
                r#"<text class="{class}"{key} x="{}" y="{}" font-size="{size}" text-anchor="{anchor}" dominant-baseline="{baseline}"{paint}>{}</text>"#,
                at.x,
                at.y,
                escape(text)
            )
        }
    };
}

fn fill_attrs(fill: Option<Rgba>) -> String {
    match fill {
        Some(c) if c.a == 255 => format!(r#" fill="{}""#, c.to_hex()),
        Some(c) => format!(r#" fill="{}" fill-opacity="{:.3}""#, c.to_hex(), c.opacity()),
        None => r#" fill="none""#.to_string(),
    }
}

fn stroke_attrs(stroke: Option<Stroke>) -> String {
    match stroke {
        Some(s) if s.color.a == 255 => format!(r#" stroke="{}" stroke-width="{}""#, s.color.to_hex(), s.width),
        Some(s) => format!(
            r#" stroke="{}" stroke-opacity="{:.3}" stroke-width="{}""#,
            s.color.to_hex(),
            s.color.opacity(),
            s.width
        ),
        None => String::new(),
    }
}

fn escape(s: &str) -> String {
    s.replace('&', "&amp;").replace('<', "&lt;").replace('>', "&gt;").replace('"', "&quot;")
}
