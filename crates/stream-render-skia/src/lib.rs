// File: crates/stream-render-skia/src/lib.rs
// Summary: Skia CPU raster render target; paints core scenes and encodes PNG output.

use std::path::Path;

use anyhow::{anyhow, Context, Result};
use kurbo::PathEl;
use skia_safe as skia;

use stream_core::{
    InteractionController, Mount, Node, PointerEvent, RenderTarget, Rgba, Scene, Shape, Streamgraph,
};

pub mod text;

pub use text::TextShaper;

#[inline]
fn color(c: Rgba) -> skia::Color {
    skia::Color::from_argb(c.a, c.r, c.g, c.b)
}

fn skia_path(path: &kurbo::BezPath) -> skia::Path {
    let pt = |p: kurbo::Point| (p.x as f32, p.y as f32);
    let mut out = skia::Path::new();
    for el in path.elements() {
        match *el {
            PathEl::MoveTo(p) => {
                out.move_to(pt(p));
            }
            PathEl::LineTo(p) => {
                out.line_to(pt(p));
            }
            PathEl::QuadTo(p1, p2) => {
                out.quad_to(pt(p1), pt(p2));
            }
            PathEl::CurveTo(p1, p2, p3) => {
                out.cubic_to(pt(p1), pt(p2), pt(p3));
            }
            PathEl::ClosePath => {
                out.close();
            }
        }
    }
    out
}

/// Raster surface that implements the clear-then-draw target contract.
pub struct SkiaTarget {
    surface: skia::Surface,
    background: Rgba,
    text: TextShaper,
    draw_labels: bool,
}

impl SkiaTarget {
    pub fn new(width: u32, height: u32, background: Rgba) -> Result<Self> {
        let surface = skia::surfaces::raster_n32_premul((width as i32, height as i32))
            .ok_or_else(|| anyhow!("failed to create {width}x{height} raster surface"))?;
        Ok(Self { surface, background, text: TextShaper::new(), draw_labels: true })
    }

    /// Skip text nodes; output then no longer depends on installed fonts.
    pub fn without_labels(mut self) -> Self {
        self.draw_labels = false;
        self
    }

    pub fn width(&self) -> i32 {
        self.surface.width()
    }

    pub fn height(&self) -> i32 {
        self.surface.height()
    }

    /// Current surface content encoded as PNG.
    pub fn png_bytes(&mut self) -> Result<Vec<u8>> {
        let image = self.surface.image_snapshot();
        #[allow(deprecated)]
        let data = image
            .encode_to_data(skia::EncodedImageFormat::PNG)
            .ok_or_else(|| anyhow!("encode PNG failed"))?;
        Ok(data.as_bytes().to_vec())
    }

    pub fn write_png(&mut self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        let bytes = self.png_bytes()?;
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, bytes).with_context(|| format!("writing {}", path.display()))?;
        tracing::debug!(path = %path.display(), "wrote png");
        Ok(())
    }

    fn draw_node(&mut self, node: &Node) {
        let canvas = self.surface.canvas();
        let mut paint = skia::Paint::default();
        paint.set_anti_alias(true);

        if let Shape::Text { text, at, size, anchor, baseline } = &node.shape {
            if self.draw_labels {
                let c = node.fill.map(color).unwrap_or(skia::Color::BLACK);
                self.text.draw(canvas, text, at.x as f32, at.y as f32, *size, c, *anchor, *baseline);
            }
            return;
        }

        if let Some(fill) = node.fill {
            paint.set_style(skia::paint::Style::Fill);
            paint.set_color(color(fill));
            fill_shape(canvas, &node.shape, &paint);
        }
        if let Some(stroke) = node.stroke {
            paint.set_style(skia::paint::Style::Stroke);
            paint.set_stroke_width(stroke.width as f32);
            paint.set_color(color(stroke.color));
            fill_shape(canvas, &node.shape, &paint);
        }
    }
}

fn fill_shape(canvas: &skia::Canvas, shape: &Shape, paint: &skia::Paint) {
    match shape {
        Shape::Path(p) => {
            canvas.draw_path(&skia_path(p), paint);
        }
        Shape::Rect(r) => {
            canvas.draw_rect(skia::Rect::from_ltrb(r.x0 as f32, r.y0 as f32, r.x1 as f32, r.y1 as f32), paint);
        }
        Shape::Line(l) => {
            canvas.draw_line((l.p0.x as f32, l.p0.y as f32), (l.p1.x as f32, l.p1.y as f32), paint);
        }
        Shape::Text { .. } => {}
    }
}

impl RenderTarget for SkiaTarget {
    type Error = anyhow::Error;

    fn clear(&mut self) -> Result<()> {
        let bg = color(self.background);
        self.surface.canvas().clear(bg);
        Ok(())
    }

    fn draw(&mut self, scene: &Scene) -> Result<()> {
        if let Some(bg) = scene.background {
            let mut paint = skia::Paint::default();
            paint.set_color(color(bg));
            let rect = skia::Rect::from_wh(scene.width as f32, scene.height as f32);
            self.surface.canvas().draw_rect(rect, &paint);
        }
        for node in &scene.nodes {
            self.draw_node(node);
        }
        tracing::trace!(nodes = scene.nodes.len(), "painted scene");
        Ok(())
    }
}

/// Options for one headless render.
#[derive(Clone, Debug, Default)]
pub struct RenderOptions {
    pub draw_labels: bool,
    /// Hover this series and draw its tooltip, with the pointer at the given scene point.
    pub hover: Option<(String, f64, f64)>,
}

impl RenderOptions {
    pub fn labelled() -> Self {
        Self { draw_labels: true, hover: None }
    }
}

/// Paint `graph` on a fresh raster surface, optionally with a hover tooltip on top.
#[tracing::instrument(skip_all, fields(width = graph.config.width, height = graph.config.height))]
pub fn render_mount(graph: &Streamgraph, opts: &RenderOptions) -> Result<Mount<SkiaTarget>> {
    let mut target = SkiaTarget::new(graph.config.width, graph.config.height, graph.theme.background)?;
    if !opts.draw_labels {
        target = target.without_labels();
    }
    let mut mount = Mount::new(target);
    let mut ctl = InteractionController::new();
    graph.render_with(&mut ctl, &mut mount)?;
    if let Some((key, x, y)) = &opts.hover {
        let event = PointerEvent::Enter { key: key.clone(), x: *x, y: *y };
        graph.pointer(&mut ctl, &mut mount, event)?;
        if ctl.tooltip().is_none() {
            tracing::warn!(%key, "hover key is not a series; no tooltip drawn");
        }
    }
    Ok(mount)
}

pub fn render_to_png_bytes(graph: &Streamgraph, opts: &RenderOptions) -> Result<Vec<u8>> {
    render_mount(graph, opts)?.into_target().png_bytes()
}

pub fn render_to_png(graph: &Streamgraph, opts: &RenderOptions, path: impl AsRef<Path>) -> Result<()> {
    render_mount(graph, opts)?.into_target().write_png(path)
}
