// File: crates/stream-core/src/config.rs
// Summary: Chart configuration (series keys, palette, sizes, margins, tooltip geometry).

use std::collections::HashSet;

use crate::error::{StreamError, StreamResult};
use crate::types::{Margins, Rgba, HEIGHT, WIDTH};

pub const DEFAULT_KEYS: [&str; 5] = ["LLaMA-3.1", "Claude", "PaLM-2", "Gemini", "GPT-4"];
pub const DEFAULT_COLORS: [&str; 5] = ["#e41a1c", "#377eb8", "#4daf4a", "#984ea3", "#ff7f00"];
pub const DEFAULT_DATE_FIELD: &str = "Date";

/// Geometry of the hover tooltip and the mini bar chart inside it.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TooltipConfig {
    /// Inner plot size of the mini chart.
    pub chart_width: f64,
    pub chart_height: f64,
    pub chart_margins: Margins,
    /// Offset of the tooltip's top-left corner from the pointer.
    pub offset: (f64, f64),
    pub padding: f64,
    /// Target tick count for the mini chart's value axis.
    pub value_ticks: usize,
    pub band_padding: f64,
}

impl Default for TooltipConfig {
    fn default() -> Self {
        Self {
            chart_width: 200.0,
            chart_height: 100.0,
            chart_margins: Margins::new(10, 10, 20, 30),
            offset: (20.0, 20.0),
            padding: 10.0,
            value_ticks: 4,
            band_padding: 0.1,
        }
    }
}

impl TooltipConfig {
    /// Outer size of the tooltip box (mini chart with margins, plus padding on both sides).
    pub fn box_size(&self) -> (f64, f64) {
        let m = &self.chart_margins;
        (
            self.chart_width + m.hsum() as f64 + 2.0 * self.padding,
            self.chart_height + m.vsum() as f64 + 2.0 * self.padding,
        )
    }
}

/// Everything fixed per chart: the ordered keys, their palette and the layout.
#[derive(Clone, Debug, PartialEq)]
pub struct ChartConfig {
    pub keys: Vec<String>,
    pub colors: Vec<Rgba>,
    pub date_field: String,
    /// Outer size including margins.
    pub width: u32,
    pub height: u32,
    pub margins: Margins,
    pub tooltip: TooltipConfig,
}

impl Default for ChartConfig {
    fn default() -> Self {
        Self {
            keys: DEFAULT_KEYS.iter().map(|k| k.to_string()).collect(),
            colors: DEFAULT_COLORS
                .iter()
                .filter_map(|c| Rgba::from_hex(c).ok())
                .collect(),
            date_field: DEFAULT_DATE_FIELD.to_string(),
            width: WIDTH,
            height: HEIGHT,
            margins: Margins::default(),
            tooltip: TooltipConfig::default(),
        }
    }
}

impl ChartConfig {
    /// Config for `keys` with the default palette recycled to match their count.
    pub fn for_keys<I, S>(keys: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let keys: Vec<String> = keys.into_iter().map(Into::into).collect();
        let base = Self::default();
        let colors = (0..keys.len()).map(|i| base.colors[i % base.colors.len()]).collect();
        Self { keys, colors, ..base }
    }

    pub fn with_colors(mut self, colors: Vec<Rgba>) -> Self {
        self.colors = colors;
        self
    }

    /// Parse and set colors from `#rrggbb` strings.
    pub fn with_hex_colors(mut self, colors: &[&str]) -> StreamResult<Self> {
        self.colors = colors.iter().map(|c| Rgba::from_hex(c)).collect::<StreamResult<_>>()?;
        Ok(self)
    }

    pub fn with_size(mut self, width: u32, height: u32) -> Self {
        self.width = width;
        self.height = height;
        self
    }

    pub fn with_margins(mut self, margins: Margins) -> Self {
        self.margins = margins;
        self
    }

    pub fn with_date_field(mut self, field: impl Into<String>) -> Self {
        self.date_field = field.into();
        self
    }

    /// Drawable plot width (outer width minus horizontal margins).
    pub fn plot_width(&self) -> f64 {
        self.width as f64 - self.margins.hsum() as f64
    }

    /// Drawable plot height (outer height minus vertical margins).
    pub fn plot_height(&self) -> f64 {
        self.height as f64 - self.margins.vsum() as f64
    }

    pub fn key_index(&self, key: &str) -> Option<usize> {
        self.keys.iter().position(|k| k == key)
    }

    pub fn validate(&self) -> StreamResult<()> {
        if self.keys.is_empty() {
            return Err(StreamError::invalid_config("at least one series key is required"));
        }
        let mut seen = HashSet::new();
        for k in &self.keys {
            if !seen.insert(k.as_str()) {
                return Err(StreamError::invalid_config(format!("duplicate series key {k:?}")));
            }
        }
        if self.colors.len() != self.keys.len() {
            return Err(StreamError::invalid_config(format!(
                "{} colors for {} keys",
                self.colors.len(),
                self.keys.len()
            )));
        }
        if self.plot_width() <= 0.0 || self.plot_height() <= 0.0 {
            return Err(StreamError::invalid_config(format!(
                "margins leave no plot area in {}x{}",
                self.width, self.height
            )));
        }
        Ok(())
    }
}
