// File: crates/stream-core/src/target.rs
// Summary: Render target contract (clear, then draw) and the mount that owns redraw discipline.

use std::convert::Infallible;

use crate::scene::{Node, NodeClass, Scene};

/// A drawing surface supplied by the caller.
///
/// `clear` must release everything previously drawn; `draw` paints a scene on top of the
/// current content.
pub trait RenderTarget {
    type Error;

    fn clear(&mut self) -> Result<(), Self::Error>;
    fn draw(&mut self, scene: &Scene) -> Result<(), Self::Error>;
}

/// Retained in-memory target: keeps the nodes of every scene drawn since the last clear.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct SceneTarget {
    size: Option<(f64, f64)>,
    nodes: Vec<Node>,
    clears: usize,
}

impl SceneTarget {
    pub fn new() -> Self { Self::default() }

    pub fn nodes(&self) -> &[Node] {
        &self.nodes
    }

    pub fn count(&self, class: NodeClass) -> usize {
        self.nodes.iter().filter(|n| n.class == class).count()
    }

    /// Size of the first scene drawn since the last clear.
    pub fn size(&self) -> Option<(f64, f64)> {
        self.size
    }

    pub fn clears(&self) -> usize {
        self.clears
    }

    pub fn is_blank(&self) -> bool {
        self.nodes.is_empty()
    }
}

impl RenderTarget for SceneTarget {
    type Error = Infallible;

    fn clear(&mut self) -> Result<(), Infallible> {
        self.nodes.clear();
        self.size = None;
        self.clears += 1;
        Ok(())
    }

    fn draw(&mut self, scene: &Scene) -> Result<(), Infallible> {
        self.size.get_or_insert((scene.width, scene.height));
        self.nodes.extend(scene.nodes.iter().cloned());
        Ok(())
    }
}

/// Owns a target plus the chart scene and tooltip overlay currently shown on it.
/// Every change repaints from a cleared target, so scenes never accumulate.
pub struct Mount<T: RenderTarget> {
    target: T,
    chart: Option<Scene>,
    overlay: Option<Scene>,
}

impl<T: RenderTarget> Mount<T> {
    pub fn new(target: T) -> Self {
        Self { target, chart: None, overlay: None }
    }

    /// Replace the chart. Any overlay from the previous chart is dropped.
    pub fn show_chart(&mut self, scene: Scene) -> Result<(), T::Error> {
        self.chart = Some(scene);
        self.overlay = None;
        self.redraw()
    }

    /// Replace (or with `None`, remove) the overlay drawn above the chart.
    pub fn show_overlay(&mut self, overlay: Option<Scene>) -> Result<(), T::Error> {
        self.overlay = overlay;
        self.redraw()
    }

    /// Remove everything from the target.
    pub fn unmount(&mut self) -> Result<(), T::Error> {
        self.chart = None;
        self.overlay = None;
        self.target.clear()
    }

    pub fn redraw(&mut self) -> Result<(), T::Error> {
        self.target.clear()?;
        if let Some(chart) = &self.chart {
            self.target.draw(chart)?;
        }
        if let Some(overlay) = &self.overlay {
            self.target.draw(overlay)?;
        }
        Ok(())
    }

    pub fn chart(&self) -> Option<&Scene> {
        self.chart.as_ref()
    }

    pub fn overlay(&self) -> Option<&Scene> {
        self.overlay.as_ref()
    }

    pub fn target(&self) -> &T {
        &self.target
    }

    pub fn target_mut(&mut self) -> &mut T {
        &mut self.target
    }

    pub fn into_target(self) -> T {
        self.target
    }
}
