//! Deferred images and videos

mod common;

use common::{booted, storefront_with};
use mall_page::PageConfig;
use mall_runtime::{AutoplayPolicy, SessionStorage, WindowOptions};
use pretty_assertions::assert_eq;

const ROBE: &str = "assets/products/robe.jpg";
const VESTE: &str = "assets/products/veste.jpg";
const COLLECTION_VIDEO: &str = "assets/collection.mp4";

#[test]
fn test_image_assigned_once_near_viewport() {
    let mut window = booted();
    assert_eq!(window.attribute_of("#lazy-a", "src").unwrap(), None);

    // Bottom edge of the 50px margin only touches the image
    window.scroll_window(450.0);
    assert_eq!(window.attribute_of("#lazy-a", "src").unwrap(), None);

    window.scroll_window(500.0);
    assert_eq!(
        window.attribute_of("#lazy-a", "src").unwrap().as_deref(),
        Some(ROBE)
    );

    window.scroll_window(0.0);
    window.scroll_window(600.0);
    assert_eq!(window.request_count(ROBE), 1);
}

#[test]
fn test_loaded_class_after_load_or_error() {
    let mut window = booted();
    window.scroll_window(500.0);
    window.scroll_window(1800.0);
    assert!(!window.exists("#lazy-a.loaded").unwrap());
    assert!(!window.exists("#lazy-b.loaded").unwrap());

    window.complete_resource(ROBE);
    assert!(window.exists("#lazy-a.loaded").unwrap());

    // data-lazy images are handled the same way, and failures still mark them
    assert_eq!(window.request_count(VESTE), 1);
    window.fail_resource(VESTE);
    assert!(window.exists("#lazy-b.loaded").unwrap());
}

#[test]
fn test_image_in_view_at_load_is_assigned_immediately() {
    let mut window = storefront_with(WindowOptions::default(), SessionStorage::new());
    window
        .set_layout("#lazy-a", mall_dom::DOMRect::from_xywh(0.0, 300.0, 400.0, 200.0))
        .unwrap();
    window.boot(PageConfig::default());
    assert_eq!(
        window.attribute_of("#lazy-a", "src").unwrap().as_deref(),
        Some(ROBE)
    );
    assert_eq!(window.attribute_of("#lazy-b", "src").unwrap(), None);
}

#[test]
fn test_video_loads_and_plays_near_viewport() {
    let mut window = booted();

    window.scroll_window(1650.0);
    assert_eq!(window.media_of("#lazy-video").unwrap().load_count, 0);

    window.scroll_window(1800.0);
    let media = window.media_of("#lazy-video").unwrap();
    assert_eq!(media.current_src, COLLECTION_VIDEO);
    assert_eq!(media.load_count, 1);
    assert!(!media.paused);
    assert_eq!(
        window.attribute_of("#lazy-video source", "src").unwrap().as_deref(),
        Some(COLLECTION_VIDEO)
    );

    window.scroll_window(0.0);
    window.scroll_window(1800.0);
    assert_eq!(window.media_of("#lazy-video").unwrap().load_count, 1);
    assert_eq!(window.request_count(COLLECTION_VIDEO), 1);
}

#[test]
fn test_video_margin_is_one_hundred_pixels() {
    let mut window = booted();

    // Root bottom edge at 2600 just touches the video's top
    window.scroll_window(1700.0);
    assert_eq!(window.media_of("#lazy-video").unwrap().load_count, 0);

    // Root bottom edge at 2650: 50 of the video's 400px are inside
    window.scroll_window(1750.0);
    let media = window.media_of("#lazy-video").unwrap();
    assert_eq!(media.load_count, 1);
    assert_eq!(media.current_src, COLLECTION_VIDEO);
}

#[test]
fn test_refused_autoplay_is_absorbed() {
    let options = WindowOptions {
        autoplay: AutoplayPolicy::Blocked,
        ..WindowOptions::default()
    };
    let mut window = storefront_with(options, SessionStorage::new());
    window.boot(PageConfig::default());

    window.scroll_window(1800.0);
    let media = window.media_of("#lazy-video").unwrap();
    assert_eq!(media.load_count, 1);
    assert!(media.paused);
}
