//! Output surfaces: the text panel and the chart canvas
//!
//! Both are traits so the dashboard controller never has to check whether a
//! field or canvas exists; an absent field is a no-op setter.

pub mod canvas;
pub mod panel;
pub mod surface;

pub use canvas::{ChartCanvas, PngCanvas, SharedCanvas};
pub use panel::{Field, Panel};
pub use surface::DisplaySurface;
