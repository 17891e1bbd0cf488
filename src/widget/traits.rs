//! The `Widget` trait: what the app needs to paint an overlay.
//!
//! Widgets draw on top of the painted DOM. The app hands each one the screen
//! region it owns (for a scroll wrapper, its outer container's border box)
//! and places the returned strips clipped to that region.

use std::any::Any;

use crate::geometry::Region;
use crate::render::strip::Strip;

/// Object-safe overlay widget.
pub trait Widget {
    /// Type name used in logs, e.g. `"ScrollWrapper"`.
    fn widget_type(&self) -> &str;

    /// Render into strips positioned within `region` (screen coordinates).
    fn render(&self, region: Region) -> Vec<Strip>;

    fn as_any(&self) -> &dyn Any;

    fn as_any_mut(&mut self) -> &mut dyn Any;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::strip::CellStyle;

    struct Marker {
        ch: char,
    }

    impl Widget for Marker {
        fn widget_type(&self) -> &str {
            "Marker"
        }

        fn render(&self, region: Region) -> Vec<Strip> {
            if region.is_empty() {
                return Vec::new();
            }
            vec![Strip::repeat(region.y, region.right() - 1, self.ch, 1, CellStyle::default())]
        }

        fn as_any(&self) -> &dyn Any {
            self
        }

        fn as_any_mut(&mut self) -> &mut dyn Any {
            self
        }
    }

    #[test]
    fn render_in_region() {
        let marker = Marker { ch: '*' };
        let strips = marker.render(Region::new(2, 3, 5, 1));
        assert_eq!(strips.len(), 1);
        assert_eq!((strips[0].x_offset, strips[0].y), (6, 3));
        assert!(marker.render(Region::EMPTY).is_empty());
    }

    #[test]
    fn downcast_through_trait_object() {
        let mut boxed: Box<dyn Widget> = Box::new(Marker { ch: '*' });
        assert_eq!(boxed.widget_type(), "Marker");
        boxed.as_any_mut().downcast_mut::<Marker>().unwrap().ch = '#';
        assert_eq!(boxed.as_any().downcast_ref::<Marker>().unwrap().ch, '#');
    }
}
