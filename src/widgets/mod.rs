//! The overlay scroll widget: wrapper, scrollbar, options and the
//! measurement and change-source plumbing behind them.

pub mod change;
pub mod measure;
pub mod options;
pub mod scroll_wrapper;
pub mod scrollbar;

pub use change::{ChangeSource, MutationSource, ResizeSource};
pub use measure::{gutter_widths, measure, Geometry, Gutter};
pub use options::{ScrollOptions, VisibilityPolicy};
pub use scroll_wrapper::ScrollWrapper;
pub use scrollbar::{DragScroll, ScrollBar, ScrollBarProps, Track};
