//! # scrollwrap
//!
//! Fading, draggable overlay scrollbars for a retained terminal DOM.
//!
//! A [`ScrollWrapper`] wraps arbitrary content in a natively scrolling
//! container, pushes the native scrollbars out of sight by measuring their
//! gutter, and draws its own [`ScrollBar`](widgets::ScrollBar) on top. The
//! overlay follows native scrolling, can be dragged, and can stay pinned,
//! hide on pointer leave, or fade out after a delay.
//!
//! ## Core Systems
//!
//! - **[`css`]**: inline style strings, scalar units
//! - **[`dom`]**: slotmap-backed DOM arena with mutation observers, scroll
//!   offsets and load events
//! - **[`layout`]**: taffy-powered block/flex layout producing box metrics
//! - **[`host`]**: the page: DOM, layout and window, with forced reflow on read
//! - **[`widgets`]**: the scroll wrapper, its scrollbar and options
//! - **[`event`]**: terminal input, key bindings, DOM event queue
//! - **[`render`]**: strip-based compositor and crossterm driver
//! - **[`app`]**: application struct tying everything together
//! - **[`testing`]**: headless Pilot and snapshot helpers

// Foundation
pub mod error;
pub mod geometry;
pub mod schedule;

// Core systems
pub mod css;
pub mod dom;
pub mod layout;
pub mod host;
pub mod view;

// Widget system
pub mod widget;
pub mod widgets;

// Events
pub mod event;

// Rendering
pub mod render;

// Application
pub mod app;
pub mod testing;

pub use error::{Error, Result};
pub use host::Host;
pub use view::Element;
pub use widgets::{ScrollOptions, ScrollWrapper, VisibilityPolicy};
