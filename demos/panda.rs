//! A picture bigger than its box, with fading overlay scrollbars.
//!
//! Scroll with the wheel, the arrow keys or by dragging a thumb. The bars fade
//! out a second after the last interaction. Press `q` to quit.

use std::fs::File;
use std::time::Duration;

use simplelog::{Config, LevelFilter, WriteLogger};

use scrollwrap::app::{App, AppConfig};
use scrollwrap::css::InlineStyle;
use scrollwrap::view::Element;
use scrollwrap::widgets::{ScrollOptions, ScrollWrapper};

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let log_file = File::create("panda.log")?;
    WriteLogger::init(LevelFilter::Debug, Config::default(), log_file)?;

    let options = ScrollOptions::new()
        .with_wrapper_style(InlineStyle::parse("width: 50px; height: 20px; color: #dddddd")?)
        .with_wrapper_class_names("scroll-area-container")
        .with_vertical_scroll_style(InlineStyle::parse("color: #f0a030")?)
        .with_horizontal_scroll_style(InlineStyle::parse("color: #f0a030")?)
        .with_vertical_track_style(InlineStyle::parse("color: #444444")?)
        .with_horizontal_track_style(InlineStyle::parse("color: #444444")?)
        .with_min_lengths(2, 2)
        .with_stay_visible(false)
        .with_fade_durations(Duration::from_millis(300), Duration::from_millis(300))
        .with_auto_fade_out(Duration::from_millis(1000))
        .with_offset_scroll(true)
        .with_auto_update(true)
        .with_on_load_update(true);

    let content = Element::new("div")
        .child(Element::paragraph("Pandas, live."))
        .child(Element::image("pandas-live.jpg", 90, 45))
        .child(Element::paragraph("That's all of them."));

    let mut app = App::new(AppConfig::new().with_title("pandas"))?;
    let body = app.host.body()?;
    let frame = app.host.dom.insert_child(
        body,
        scrollwrap::dom::NodeData::new("div")
            .with_style(InlineStyle::parse("position: relative; padding: 1px 2px")?),
    );
    app.mount(ScrollWrapper::new(options, vec![content]), Some(frame))?;

    // The picture arrives after mount; its load event resizes the content.
    for img in app.host.dom.query_by_tag("img") {
        app.host.dom.finish_load(img);
    }

    app.run().await?;
    Ok(())
}
