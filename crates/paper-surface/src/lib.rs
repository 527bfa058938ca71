//! paper-surface: the rendering surface the viewer drives, plus offscreen measurement.
//!
//! The viewer never talks to a concrete DOM. Hosts implement [`Surface`] for
//! element styling/content and [`LayoutProbe`] for measuring markup; the
//! in-memory [`HeadlessSurface`] and [`TextFlowProbe`] back tests and the demo.

mod headless;
mod probe;
mod surface;

pub use headless::{ElementState, HeadlessSurface};
pub use probe::{LayoutProbe, TextFlowProbe};
pub use surface::{BoxMetrics, Surface, Viewport, format_px, parse_px};
