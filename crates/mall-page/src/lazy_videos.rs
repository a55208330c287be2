//! Video lazy-loading
//!
//! `video[data-lazy-video]` elements keep their `<source data-src>` unset
//! until the video nears the viewport, then load and try to autoplay.

use crate::config::LazyConfig;
use crate::host::{Host, IntersectionEntry, IntersectionOptions, Margins, ObserverId};

const LAZY_VIDEO_SELECTOR: &str = "video[data-lazy-video]";
const DEFERRED_SOURCE_SELECTOR: &str = "source[data-src]";

pub fn init<H: Host>(host: &mut H, config: &LazyConfig) {
    let videos = host.query_all(LAZY_VIDEO_SELECTOR);
    if videos.is_empty() {
        return;
    }
    tracing::debug!("Lazy-loading {} videos", videos.len());

    let options = IntersectionOptions {
        root_margin: Margins::vertical(config.video_margin),
        threshold: config.threshold,
    };
    host.observe(
        options,
        &videos,
        Box::new(
            |h: &mut H, observer: ObserverId, entries: Vec<IntersectionEntry<H::Node>>| {
                for entry in entries.into_iter().filter(|e| e.is_intersecting) {
                    start(h, &entry.target);
                    h.unobserve(observer, &entry.target);
                }
            },
        ),
    );
}

fn start<H: Host>(host: &mut H, video: &H::Node) {
    let Some(source) = host.query_within(video, DEFERRED_SOURCE_SELECTOR) else {
        return;
    };
    let Some(src) = host.attribute(&source, "data-src") else {
        return;
    };
    tracing::debug!("Loading deferred video {}", src);
    host.set_attribute(&source, "src", &src);
    host.load(video);
    // Autoplay may be refused; the host swallows that.
    host.play(video);
}
