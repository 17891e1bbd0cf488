//! Widget system: trait, lifecycle, scroll math.

pub mod lifecycle;
pub mod scroll;
pub mod traits;

pub use lifecycle::{LifecycleEvent, LifecycleTracker, WidgetId};
pub use scroll::{Axis, ScrollMetrics, Thumb};
pub use traits::Widget;
