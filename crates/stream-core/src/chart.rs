// File: crates/stream-core/src/chart.rs
// Summary: Streamgraph struct; runs normalize → stack → scale once per dataset and renders scenes from the result.

use std::sync::atomic::{AtomicU64, Ordering};

use kurbo::{BezPath, Point, Shape as _};

use crate::config::ChartConfig;
use crate::error::StreamResult;
use crate::interaction::{Effect, HoverContext, InteractionController, PointerEvent};
use crate::record::{normalize, RawRecord, Record};
use crate::render::{layer_paths, render_chart, RenderInput};
use crate::scale::Scales;
use crate::scene::Scene;
use crate::stack::{stack, StackLayout};
use crate::target::{Mount, RenderTarget};
use crate::theme::{ColorAssignment, Theme};
use crate::view::ViewState;

static NEXT_GENERATION: AtomicU64 = AtomicU64::new(1);

/// A dataset laid out for drawing. Rebuilt in full for every new dataset.
pub struct Streamgraph {
    pub config: ChartConfig,
    pub theme: Theme,
    pub records: Vec<Record>,
    pub layout: StackLayout,
    pub view: ViewState,
    pub scales: Scales,
    pub colors: ColorAssignment,
    /// Absolute outline of every layer, for hit testing.
    areas: Vec<(String, BezPath)>,
    generation: u64,
}

impl Streamgraph {
    /// Validate `config`, normalize `raw`, stack it and derive scales.
    /// A malformed date rejects the dataset; nothing is laid out.
    #[tracing::instrument(skip_all, fields(rows = raw.len()))]
    pub fn build(config: ChartConfig, raw: &[RawRecord]) -> StreamResult<Self> {
        config.validate()?;
        let records = normalize(raw, &config.keys, &config.date_field)?;
        Ok(Self::from_records(config, records))
    }

    /// Lay out already-normalized records. `config` is assumed valid.
    pub fn from_records(config: ChartConfig, records: Vec<Record>) -> Self {
        let layout = stack(&records, &config.keys);
        let view = ViewState::from_layout(&records, &layout);
        let scales = view.scales(config.plot_width(), config.plot_height());
        let colors = ColorAssignment::new(&config.keys, &config.colors);
        let origin = Point::new(config.margins.left as f64, config.margins.top as f64);
        let areas = if records.is_empty() { Vec::new() } else { layer_paths(&layout, &records, &scales, origin) };
        let generation = NEXT_GENERATION.fetch_add(1, Ordering::Relaxed);
        Self { config, theme: Theme::default(), records, layout, view, scales, colors, areas, generation }
    }

    pub fn with_theme(mut self, theme: Theme) -> Self {
        self.theme = theme;
        self
    }

    pub fn width(&self) -> f64 {
        self.config.width as f64
    }

    pub fn height(&self) -> f64 {
        self.config.height as f64
    }

    /// Unique per built dataset; hover state from another generation is stale.
    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn scene(&self) -> Scene {
        render_chart(&RenderInput {
            config: &self.config,
            theme: &self.theme,
            records: &self.records,
            layout: &self.layout,
            scales: &self.scales,
            colors: &self.colors,
        })
    }

    /// Clear the mount's target and draw this chart on it.
    /// Any overlay on the mount is dropped; controllers drop their hover state on their next event.
    pub fn render<T: RenderTarget>(&self, mount: &mut Mount<T>) -> Result<(), T::Error> {
        mount.show_chart(self.scene())
    }

    /// Draw this chart and reset `controller`, so no hover carries over from the previous chart.
    pub fn render_with<T: RenderTarget>(
        &self,
        controller: &mut InteractionController,
        mount: &mut Mount<T>,
    ) -> Result<(), T::Error> {
        controller.reset();
        self.render(mount)
    }

    /// Topmost layer whose smoothed outline contains the scene point `(x, y)`.
    pub fn layer_at(&self, x: f64, y: f64) -> Option<&str> {
        let p = Point::new(x, y);
        self.areas.iter().rev().find(|(_, path)| path.contains(p)).map(|(k, _)| k.as_str())
    }

    pub fn hover_context(&self) -> HoverContext<'_> {
        HoverContext {
            generation: self.generation,
            records: &self.records,
            keys: &self.config.keys,
            colors: &self.colors,
            tooltip: &self.config.tooltip,
        }
    }

    /// Apply a pointer event and bring the mount's overlay in line with the new hover state.
    pub fn pointer<T: RenderTarget>(
        &self,
        controller: &mut InteractionController,
        mount: &mut Mount<T>,
        event: PointerEvent,
    ) -> Result<Effect, T::Error> {
        let effect = controller.handle(&self.hover_context(), event);
        if effect != Effect::None {
            mount.show_overlay(controller.overlay(self.width(), self.height(), &self.theme))?;
        }
        Ok(effect)
    }

    /// Hit-test `(x, y)` and feed the result to the controller, updating the overlay.
    pub fn pointer_at<T: RenderTarget>(
        &self,
        controller: &mut InteractionController,
        mount: &mut Mount<T>,
        x: f64,
        y: f64,
    ) -> Result<Vec<Effect>, T::Error> {
        let hit = self.layer_at(x, y);
        let effects = controller.track(&self.hover_context(), hit, x, y);
        if effects.iter().any(|e| *e != Effect::None) {
            mount.show_overlay(controller.overlay(self.width(), self.height(), &self.theme))?;
        }
        Ok(effects)
    }
}
