//! Layout engine: taffy integration, CSS scalar resolution, spatial map.

pub mod engine;
pub mod resolve;
pub mod spatial;

pub use engine::LayoutEngine;
pub use spatial::SpatialMap;
