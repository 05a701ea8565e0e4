// File: crates/stream-core/src/lib.rs
// Summary: Core library entry point; exports the streamgraph pipeline (normalize, stack, scale, render, hover).

pub mod error;
pub mod types;
pub mod config;
pub mod record;
pub mod stack;
pub mod grid;
pub mod scale;
pub mod view;
pub mod theme;
pub mod curve;
pub mod scene;
pub mod target;
pub mod axis;
pub mod render;
pub mod interaction;
pub mod chart;

pub use chart::Streamgraph;
pub use config::{ChartConfig, TooltipConfig};
pub use error::{StreamError, StreamResult};
pub use record::{normalize, read_csv, read_csv_path, RawRecord, RawValue, Record};
pub use stack::{stack, Layer, StackLayout, StackedBand};
pub use scale::{BandScale, LinearScale, ScaleTransform, Scales, TimeScale, ValueScale};
pub use view::ViewState;
pub use theme::{ColorAssignment, Theme};
pub use scene::{Node, NodeClass, Scene, Shape, TextAnchor, TextBaseline};
pub use target::{Mount, RenderTarget, SceneTarget};
pub use axis::Axis;
pub use render::{render_chart, RenderInput};
pub use interaction::{Effect, HoverState, InteractionController, MiniChart, PointerEvent, Tooltip};
pub use types::{Margins, Rgba};
