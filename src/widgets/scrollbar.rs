//! The overlay scrollbar: tracks, thumbs, fading and thumb dragging.
//!
//! A [`ScrollBar`] never touches the DOM. It receives geometry as
//! [`ScrollBarProps`] from its wrapper and reports drags through
//! [`DragScroll`], already clamped to the scrollable range.

use std::any::Any;
use std::time::Duration;

use log::trace;

use crate::geometry::{Offset, Region, Size};
use crate::render::strip::{CellStyle, Strip};
use crate::widget::scroll::{Axis, ScrollMetrics, Thumb};
use crate::widget::Widget;

use super::options::ScrollOptions;

const THUMB: char = '█';
const VERTICAL_TRACK: char = '│';
const HORIZONTAL_TRACK: char = '─';

/// Geometry pushed down by the wrapper.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ScrollBarProps {
    pub visible: Size,
    pub content: Size,
    pub scroll: Offset,
    pub show: bool,
}

impl ScrollBarProps {
    pub fn metrics(&self) -> ScrollMetrics {
        ScrollMetrics::new(self.visible, self.content, self.scroll)
    }
}

/// Receiver of drag requests: the new scroll offset along one axis.
pub trait DragScroll {
    fn drag_scroll_x(&mut self, scroll_left: i32);
    fn drag_scroll_y(&mut self, scroll_top: i32);
}

/// A laid-out track and its thumb, in screen coordinates.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Track {
    pub axis: Axis,
    pub region: Region,
    pub thumb: Region,
    pub track_class_names: Option<String>,
    pub thumb_class_names: Option<String>,
}

impl Track {
    fn length(&self) -> i32 {
        self.axis.of_size(self.region.size())
    }

    /// Position of `point` along the track, relative to its start.
    fn position(&self, point: Offset) -> i32 {
        self.axis.of_offset(point - self.region.offset())
    }

    fn thumb_span(&self) -> Thumb {
        Thumb {
            start: self.axis.of_offset(self.thumb.offset() - self.region.offset()),
            length: self.axis.of_size(self.thumb.size()),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
struct Transition {
    from: f32,
    to: f32,
    start: Duration,
    duration: Duration,
}

impl Transition {
    fn value_at(&self, now: Duration) -> f32 {
        if self.duration.is_zero() {
            return self.to;
        }
        let t = (now.saturating_sub(self.start).as_secs_f32() / self.duration.as_secs_f32()).min(1.0);
        self.from + (self.to - self.from) * t
    }

    fn is_done(&self, now: Duration) -> bool {
        now >= self.start + self.duration
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Drag {
    axis: Axis,
    /// Pointer position within the thumb when grabbed.
    grab: i32,
}

#[derive(Debug, Clone)]
pub struct ScrollBar {
    options: ScrollOptions,
    props: ScrollBarProps,
    opacity: f32,
    transition: Option<Transition>,
    drag: Option<Drag>,
    region: Region,
}

impl ScrollBar {
    pub fn new(options: &ScrollOptions) -> Self {
        Self {
            options: options.clone(),
            props: ScrollBarProps::default(),
            opacity: 0.0,
            transition: None,
            drag: None,
            region: Region::EMPTY,
        }
    }

    pub fn props(&self) -> ScrollBarProps {
        self.props
    }

    /// Replace the props; a change of `show` starts a fade toward the new state.
    pub fn set_props(&mut self, props: ScrollBarProps, now: Duration) {
        if props.show != self.props.show {
            let (to, duration) = if props.show {
                (1.0, self.options.fade_in_duration)
            } else {
                (0.0, self.options.fade_out_duration)
            };
            let from = self.current_opacity(now);
            trace!("scrollbar fade {from:.2} -> {to:.2} over {duration:?}");
            self.transition = Some(Transition {
                from,
                to,
                start: now,
                duration,
            });
            self.opacity = from;
            if !props.show {
                self.drag = None;
            }
        }
        self.props = props;
        self.advance(now);
    }

    /// Advance the fade to `now`. Returns whether the opacity changed.
    pub fn advance(&mut self, now: Duration) -> bool {
        let Some(transition) = self.transition else {
            return false;
        };
        let before = self.opacity;
        self.opacity = transition.value_at(now);
        if transition.is_done(now) {
            self.transition = None;
        }
        (self.opacity - before).abs() > f32::EPSILON
    }

    /// When the running fade ends, if one is running.
    pub fn fade_deadline(&self) -> Option<Duration> {
        self.transition.map(|t| t.start + t.duration)
    }

    pub fn opacity(&self) -> f32 {
        self.opacity
    }

    pub fn is_visible(&self) -> bool {
        self.opacity > 0.0
    }

    fn current_opacity(&self, now: Duration) -> f32 {
        self.transition.map_or(self.opacity, |t| t.value_at(now))
    }

    /// Remember the wrapper's screen region for pointer hit testing.
    pub fn set_region(&mut self, region: Region) {
        self.region = region;
    }

    pub fn region(&self) -> Region {
        self.region
    }

    /// Tracks for each scrollable axis within `region`. With `offsetScroll`
    /// and both tracks shown, the shared corner is left free.
    pub fn tracks(&self, region: Region) -> Vec<Track> {
        let metrics = self.props.metrics();
        let vertical = metrics.is_scrollable_y();
        let horizontal = metrics.is_scrollable_x();
        let v_thick = self.options.vertical_thickness_px();
        let h_thick = self.options.horizontal_thickness_px();
        let corner = self.options.offset_scroll && vertical && horizontal;
        let mut tracks = Vec::new();

        if vertical {
            let length = region.height - if corner { h_thick } else { 0 };
            let track = Region::new(region.right() - v_thick, region.y, v_thick, length.max(0));
            let thumb = metrics.thumb(Axis::Vertical, track.height, self.options.min_vertical_length);
            tracks.push(Track {
                axis: Axis::Vertical,
                region: track,
                thumb: Region::new(track.x, track.y + thumb.start, v_thick, thumb.length),
                track_class_names: self.options.vertical_track_class_names.clone(),
                thumb_class_names: self.options.vertical_scroll_class_names.clone(),
            });
        }
        if horizontal {
            let length = region.width - if corner { v_thick } else { 0 };
            let track = Region::new(region.x, region.bottom() - h_thick, length.max(0), h_thick);
            let thumb = metrics.thumb(Axis::Horizontal, track.width, self.options.min_horizontal_length);
            tracks.push(Track {
                axis: Axis::Horizontal,
                region: track,
                thumb: Region::new(track.x + thumb.start, track.y, thumb.length, h_thick),
                track_class_names: self.options.horizontal_track_class_names.clone(),
                thumb_class_names: self.options.horizontal_scroll_class_names.clone(),
            });
        }
        tracks
    }

    pub fn is_dragging(&self) -> bool {
        self.drag.is_some()
    }

    /// Press at `point`. On a thumb it grabs the thumb; elsewhere on a track
    /// it centres the thumb on the pointer, then grabs. Returns whether a
    /// track was hit.
    pub fn pointer_down(&mut self, point: Offset, sink: &mut dyn DragScroll) -> bool {
        if !self.is_visible() {
            return false;
        }
        let Some(track) = self
            .tracks(self.region)
            .into_iter()
            .find(|t| t.region.contains(point.x, point.y))
        else {
            return false;
        };
        let pos = track.position(point);
        let thumb = track.thumb_span();
        if thumb.contains(pos) {
            self.drag = Some(Drag {
                axis: track.axis,
                grab: pos - thumb.start,
            });
        } else {
            self.drag = Some(Drag {
                axis: track.axis,
                grab: thumb.length / 2,
            });
            self.pointer_move(point, sink);
        }
        true
    }

    /// Move the grabbed thumb so the grab point follows the pointer.
    pub fn pointer_move(&mut self, point: Offset, sink: &mut dyn DragScroll) -> bool {
        let Some(drag) = self.drag else {
            return false;
        };
        let Some(track) = self.tracks(self.region).into_iter().find(|t| t.axis == drag.axis) else {
            self.drag = None;
            return false;
        };
        let start = track.position(point) - drag.grab;
        let min_length = match drag.axis {
            Axis::Vertical => self.options.min_vertical_length,
            Axis::Horizontal => self.options.min_horizontal_length,
        };
        let offset = self
            .props
            .metrics()
            .offset_for_thumb(drag.axis, start, track.length(), min_length);
        trace!("thumb drag {:?} -> {offset}", drag.axis);
        match drag.axis {
            Axis::Vertical => sink.drag_scroll_y(offset),
            Axis::Horizontal => sink.drag_scroll_x(offset),
        }
        true
    }

    /// Release the thumb. Returns whether one was grabbed.
    pub fn pointer_up(&mut self) -> bool {
        self.drag.take().is_some()
    }

    fn styles(&self, axis: Axis) -> (CellStyle, CellStyle) {
        let (thumb, track) = match axis {
            Axis::Vertical => (&self.options.vertical_scroll_style, &self.options.vertical_track_style),
            Axis::Horizontal => (&self.options.horizontal_scroll_style, &self.options.horizontal_track_style),
        };
        let thumb = CellStyle::from_inline(thumb);
        let track = CellStyle::from_inline(track);
        if self.opacity < 1.0 {
            (thumb.dimmed(), track.dimmed())
        } else {
            (thumb, track)
        }
    }
}

impl Widget for ScrollBar {
    fn widget_type(&self) -> &str {
        "ScrollBar"
    }

    /// Fully transparent bars draw nothing; partially faded ones draw dim.
    fn render(&self, region: Region) -> Vec<Strip> {
        if !self.is_visible() {
            return Vec::new();
        }
        let mut strips = Vec::new();
        for track in self.tracks(region) {
            let (thumb_style, track_style) = self.styles(track.axis);
            let r = track.region;
            for y in r.y..r.bottom() {
                let mut strip = Strip::new(y, r.x);
                for x in r.x..r.right() {
                    if track.thumb.contains(x, y) {
                        strip.push(THUMB, thumb_style.clone());
                    } else {
                        let ch = match track.axis {
                            Axis::Vertical => VERTICAL_TRACK,
                            Axis::Horizontal => HORIZONTAL_TRACK,
                        };
                        strip.push(ch, track_style.clone());
                    }
                }
                strips.push(strip);
            }
        }
        strips
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}
