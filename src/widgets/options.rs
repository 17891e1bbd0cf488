//! ScrollOptions: the consumer-facing configuration of a scroll wrapper.
//!
//! Options are fixed for the lifetime of a wrapper. They deserialize from the
//! consumer's props object (camelCase keys, unknown keys rejected) or are
//! built with `with_*` methods.

use std::time::Duration;

use serde::{Deserialize, Deserializer};

use crate::css::{InlineStyle, Scalar};
use crate::error::{Error, Result};

/// Appearance and behaviour of a scroll wrapper and its scrollbars.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields, default)]
pub struct ScrollOptions {
    /// Style of the outer container.
    pub wrapper_style: InlineStyle,
    /// Whitespace-separated classes of the outer container.
    pub wrapper_class_names: Option<String>,
    /// Vertical thumb style (`color`, `background`).
    pub vertical_scroll_style: InlineStyle,
    pub vertical_scroll_class_names: Option<String>,
    /// Horizontal thumb style.
    pub horizontal_scroll_style: InlineStyle,
    pub horizontal_scroll_class_names: Option<String>,
    /// Vertical track style.
    pub vertical_track_style: InlineStyle,
    pub vertical_track_class_names: Option<String>,
    /// Horizontal track style.
    pub horizontal_track_style: InlineStyle,
    pub horizontal_track_class_names: Option<String>,
    /// Floor on the vertical thumb length.
    pub min_vertical_length: i32,
    /// Floor on the horizontal thumb length.
    pub min_horizontal_length: i32,
    /// Vertical track thickness.
    #[serde(deserialize_with = "thickness")]
    pub vertical_thickness: Scalar,
    /// Horizontal track thickness.
    #[serde(deserialize_with = "thickness")]
    pub horizontal_thickness: Scalar,
    /// Keep the scrollbars visible when the pointer leaves. Off unless asked
    /// for, so `auto_fade_out` alone is enough to fade.
    pub stay_visible: bool,
    #[serde(deserialize_with = "millis")]
    pub fade_in_duration: Duration,
    #[serde(deserialize_with = "millis")]
    pub fade_out_duration: Duration,
    /// Hide this long after becoming visible. `None` disables fading.
    #[serde(deserialize_with = "optional_millis")]
    pub auto_fade_out: Option<Duration>,
    /// Leave the shared corner free when both tracks are shown.
    pub offset_scroll: bool,
    /// Re-measure on DOM mutations inside the wrapper.
    pub auto_update: bool,
    /// Re-measure when embedded frames and images finish loading.
    pub on_load_update: bool,
}

impl Default for ScrollOptions {
    fn default() -> Self {
        Self {
            wrapper_style: InlineStyle::new(),
            wrapper_class_names: None,
            vertical_scroll_style: InlineStyle::new(),
            vertical_scroll_class_names: None,
            horizontal_scroll_style: InlineStyle::new(),
            horizontal_scroll_class_names: None,
            vertical_track_style: InlineStyle::new(),
            vertical_track_class_names: None,
            horizontal_track_style: InlineStyle::new(),
            horizontal_track_class_names: None,
            min_vertical_length: 20,
            min_horizontal_length: 20,
            vertical_thickness: Scalar::px(1.0),
            horizontal_thickness: Scalar::px(1.0),
            stay_visible: false,
            fade_in_duration: Duration::ZERO,
            fade_out_duration: Duration::ZERO,
            auto_fade_out: None,
            offset_scroll: false,
            auto_update: false,
            on_load_update: false,
        }
    }
}

impl ScrollOptions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a JSON props object and validate it.
    pub fn from_json(json: &str) -> Result<Self> {
        let options: ScrollOptions = serde_json::from_str(json)?;
        options.validate()?;
        Ok(options)
    }

    /// Reject values no scrollbar can be drawn with.
    pub fn validate(&self) -> Result<()> {
        if self.min_vertical_length < 0 || self.min_horizontal_length < 0 {
            return Err(Error::Options("minimum thumb lengths must not be negative".into()));
        }
        for (name, thickness) in [
            ("verticalThickness", self.vertical_thickness),
            ("horizontalThickness", self.horizontal_thickness),
        ] {
            let px = thickness.to_px()?;
            if px < 0.0 {
                return Err(Error::Options(format!("{name} must not be negative")));
            }
        }
        Ok(())
    }

    /// Vertical track thickness in device units, never less than one.
    pub fn vertical_thickness_px(&self) -> i32 {
        thickness_px(self.vertical_thickness)
    }

    /// Horizontal track thickness in device units, never less than one.
    pub fn horizontal_thickness_px(&self) -> i32 {
        thickness_px(self.horizontal_thickness)
    }

    pub fn with_wrapper_style(mut self, style: InlineStyle) -> Self {
        self.wrapper_style = style;
        self
    }

    pub fn with_wrapper_class_names(mut self, names: impl Into<String>) -> Self {
        self.wrapper_class_names = Some(names.into());
        self
    }

    pub fn with_vertical_scroll_style(mut self, style: InlineStyle) -> Self {
        self.vertical_scroll_style = style;
        self
    }

    pub fn with_horizontal_scroll_style(mut self, style: InlineStyle) -> Self {
        self.horizontal_scroll_style = style;
        self
    }

    pub fn with_vertical_track_style(mut self, style: InlineStyle) -> Self {
        self.vertical_track_style = style;
        self
    }

    pub fn with_horizontal_track_style(mut self, style: InlineStyle) -> Self {
        self.horizontal_track_style = style;
        self
    }

    pub fn with_min_lengths(mut self, vertical: i32, horizontal: i32) -> Self {
        self.min_vertical_length = vertical;
        self.min_horizontal_length = horizontal;
        self
    }

    pub fn with_thickness(mut self, vertical: Scalar, horizontal: Scalar) -> Self {
        self.vertical_thickness = vertical;
        self.horizontal_thickness = horizontal;
        self
    }

    pub fn with_stay_visible(mut self, stay_visible: bool) -> Self {
        self.stay_visible = stay_visible;
        self
    }

    pub fn with_fade_durations(mut self, fade_in: Duration, fade_out: Duration) -> Self {
        self.fade_in_duration = fade_in;
        self.fade_out_duration = fade_out;
        self
    }

    pub fn with_auto_fade_out(mut self, delay: Duration) -> Self {
        self.auto_fade_out = Some(delay);
        self
    }

    pub fn with_offset_scroll(mut self, offset_scroll: bool) -> Self {
        self.offset_scroll = offset_scroll;
        self
    }

    pub fn with_auto_update(mut self, auto_update: bool) -> Self {
        self.auto_update = auto_update;
        self
    }

    pub fn with_on_load_update(mut self, on_load_update: bool) -> Self {
        self.on_load_update = on_load_update;
        self
    }
}

/// How scrollbar visibility reacts to interaction. Chosen once per wrapper.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VisibilityPolicy {
    /// Shown on interaction and never hidden by pointer leave.
    Pinned,
    /// Shown on interaction, hidden `hide_after` later unless interaction recurs.
    AutoFade { hide_after: Duration },
    /// Shown on interaction, hidden when the pointer leaves.
    Manual,
}

impl VisibilityPolicy {
    /// `Pinned` if `stay_visible`; else `AutoFade` when `auto_fade_out` is set
    /// (hiding after `fade_in_duration + auto_fade_out`); else `Manual`.
    pub fn from_options(options: &ScrollOptions) -> Self {
        if options.stay_visible {
            return VisibilityPolicy::Pinned;
        }
        match options.auto_fade_out {
            Some(delay) => VisibilityPolicy::AutoFade {
                hide_after: options.fade_in_duration + delay,
            },
            None => VisibilityPolicy::Manual,
        }
    }

    /// Whether leaving the wrapper hides the scrollbars.
    pub fn hides_on_leave(&self) -> bool {
        !matches!(self, VisibilityPolicy::Pinned)
    }
}

fn thickness_px(scalar: Scalar) -> i32 {
    scalar.to_px().map(|px| px.round() as i32).unwrap_or(1).max(1)
}

fn millis<'de, D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Duration, D::Error> {
    u64::deserialize(deserializer).map(Duration::from_millis)
}

fn optional_millis<'de, D: Deserializer<'de>>(
    deserializer: D,
) -> std::result::Result<Option<Duration>, D::Error> {
    Option::<u64>::deserialize(deserializer).map(|ms| ms.map(Duration::from_millis))
}

/// `"8px"` or a bare number of device units.
fn thickness<'de, D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Scalar, D::Error> {
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Repr {
        Number(f32),
        Text(String),
    }
    match Repr::deserialize(deserializer)? {
        Repr::Number(n) => Ok(Scalar::px(n)),
        Repr::Text(text) => Scalar::parse(&text).map_err(serde::de::Error::custom),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn defaults() {
        let options = ScrollOptions::default();
        assert_eq!(options.min_vertical_length, 20);
        assert_eq!(options.min_horizontal_length, 20);
        assert!(!options.stay_visible);
        assert_eq!(options.fade_in_duration, Duration::ZERO);
        assert_eq!(options.auto_fade_out, None);
        assert!(!options.offset_scroll);
        assert!(!options.auto_update);
        assert!(!options.on_load_update);
        assert_eq!(options.vertical_thickness_px(), 1);
    }

    #[test]
    fn empty_json_is_default() {
        assert_eq!(ScrollOptions::from_json("{}").unwrap(), ScrollOptions::default());
    }

    #[test]
    fn camel_case_props() {
        let options = ScrollOptions::from_json(
            r#"{
                "wrapperClassNames": "scroll-area-container",
                "verticalScrollStyle": {"background": "blue"},
                "horizontalTrackStyle": "background: gray",
                "minVerticalLength": 4,
                "minHorizontalLength": 6,
                "verticalThickness": "2px",
                "horizontalThickness": 3,
                "stayVisible": false,
                "fadeInDuration": 1000,
                "fadeOutDuration": 500,
                "autoFadeOut": 1000,
                "autoUpdate": true,
                "onLoadUpdate": true
            }"#,
        )
        .unwrap();
        assert_eq!(options.wrapper_class_names.as_deref(), Some("scroll-area-container"));
        assert_eq!(options.vertical_scroll_style.get("background"), Some("blue"));
        assert_eq!(options.horizontal_track_style.get("background"), Some("gray"));
        assert_eq!(options.min_horizontal_length, 6);
        assert_eq!(options.vertical_thickness_px(), 2);
        assert_eq!(options.horizontal_thickness_px(), 3);
        assert_eq!(options.fade_in_duration, Duration::from_millis(1000));
        assert_eq!(options.auto_fade_out, Some(Duration::from_millis(1000)));
        assert!(options.auto_update && options.on_load_update);
    }

    #[test]
    fn misspelled_min_length_is_rejected() {
        let err = ScrollOptions::from_json(r#"{"minHoriztonalLength": 20}"#).unwrap_err();
        assert!(matches!(err, Error::Options(msg) if msg.contains("minHoriztonalLength")));
    }

    #[test]
    fn keep_visible_is_not_an_option() {
        assert!(ScrollOptions::from_json(r#"{"keepVisible": true}"#).is_err());
    }

    #[test]
    fn null_auto_fade_out_disables_fading() {
        let options = ScrollOptions::from_json(r#"{"autoFadeOut": null}"#).unwrap();
        assert_eq!(options.auto_fade_out, None);
    }

    #[test]
    fn validation() {
        assert!(ScrollOptions::from_json(r#"{"minVerticalLength": -1}"#).is_err());
        assert!(matches!(
            ScrollOptions::from_json(r#"{"verticalThickness": "50%"}"#),
            Err(Error::Style(_))
        ));
        assert!(ScrollOptions::from_json(r#"{"verticalThickness": "thick"}"#).is_err());
    }

    #[test]
    fn policy_selection() {
        let pinned = ScrollOptions::new()
            .with_stay_visible(true)
            .with_auto_fade_out(Duration::from_millis(1000));
        assert_eq!(VisibilityPolicy::from_options(&pinned), VisibilityPolicy::Pinned);
        assert!(!VisibilityPolicy::Pinned.hides_on_leave());

        let fading = ScrollOptions::new()
            .with_fade_durations(Duration::from_millis(1000), Duration::ZERO)
            .with_auto_fade_out(Duration::from_millis(1000));
        assert_eq!(
            VisibilityPolicy::from_options(&fading),
            VisibilityPolicy::AutoFade {
                hide_after: Duration::from_millis(2000)
            }
        );

        let manual = ScrollOptions::new();
        assert_eq!(VisibilityPolicy::from_options(&manual), VisibilityPolicy::Manual);
        assert!(VisibilityPolicy::Manual.hides_on_leave());
    }

    #[test]
    fn auto_fade_out_alone_selects_fading() {
        let options = ScrollOptions::new().with_auto_fade_out(Duration::from_millis(1000));
        assert_eq!(
            VisibilityPolicy::from_options(&options),
            VisibilityPolicy::AutoFade {
                hide_after: Duration::from_millis(1000)
            }
        );
        let json = ScrollOptions::from_json(r#"{"autoFadeOut": 1000}"#).unwrap();
        assert_eq!(VisibilityPolicy::from_options(&json), VisibilityPolicy::from_options(&options));
    }
}
