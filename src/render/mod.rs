//! Rendering pipeline: DOM painting, compositor, terminal driver.

pub mod compositor;
pub mod driver;
pub mod paint;
pub mod strip;

pub use compositor::{CellUpdate, Compositor};
pub use driver::Driver;
pub use paint::paint_dom;
pub use strip::{CellStyle, Strip, StyledCell};
