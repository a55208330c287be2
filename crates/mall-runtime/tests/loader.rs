//! Loading overlay flows

mod common;

use common::{booted, storefront};
use mall_dom::{DOMRect, ReadyState};
use mall_page::PageConfig;
use mall_runtime::Window;
use pretty_assertions::assert_eq;

fn progress(window: &Window) -> Option<String> {
    window.style_of(".loader-progress", "width").unwrap()
}

fn is_hidden(window: &Window) -> bool {
    window.exists("#loader.hidden").unwrap()
}

#[test]
fn test_overlay_lifts_after_every_asset_settles() {
    let mut window = booted();
    assert!(window.exists("body.loading").unwrap());
    assert_eq!(window.request_count("assets/logo.jpg"), 1);

    assert_eq!(window.complete_resource("assets/logo.jpg"), 1);
    let width = progress(&window).unwrap();
    assert!(width.starts_with("33.33"), "unexpected width {width}");

    window
        .set_media_ready("#hero-video", ReadyState::HaveEnoughData)
        .unwrap();
    // A failed video still counts
    window.fail_media("#about-video").unwrap();
    assert_eq!(progress(&window).as_deref(), Some("100%"));

    window.advance_time(499).unwrap();
    assert!(!is_hidden(&window));
    window.advance_time(1).unwrap();
    assert!(is_hidden(&window));
    assert!(!window.exists("body.loading").unwrap());
}

#[test]
fn test_fallback_forces_overlay_away() {
    let mut window = booted();

    // Both critical videos fall back after 2s; the logo never answers
    window.advance_time(2000).unwrap();
    assert!(progress(&window).unwrap().starts_with("66.66"));

    window.advance_time(2999).unwrap();
    assert!(!is_hidden(&window));

    window.advance_time(1).unwrap();
    assert_eq!(progress(&window).as_deref(), Some("100%"));
    assert!(!is_hidden(&window));

    window.advance_time(299).unwrap();
    assert!(!is_hidden(&window));
    window.advance_time(1).unwrap();
    assert!(is_hidden(&window));
    assert!(!window.exists("body.loading").unwrap());
}

#[test]
fn test_asset_counts_once() {
    let mut window = booted();
    window.fail_media("#hero-video").unwrap();
    assert!(progress(&window).unwrap().starts_with("33.33"));

    // The hero's own fallback fires too, but only the about video moves the bar
    window.advance_time(2000).unwrap();
    assert!(progress(&window).unwrap().starts_with("66.66"));

    window
        .set_media_ready("#hero-video", ReadyState::HaveEnoughData)
        .unwrap();
    assert!(progress(&window).unwrap().starts_with("66.66"));
}

#[test]
fn test_missing_video_settles_after_delay() {
    let mut window = storefront();
    let mut config = PageConfig::default();
    config.loader.critical_assets = vec!["assets/missing.mp4".into()];
    window.boot(config);

    window.advance_time(999).unwrap();
    assert_eq!(progress(&window), None);
    window.advance_time(1).unwrap();
    assert_eq!(progress(&window).as_deref(), Some("100%"));

    window.advance_time(500).unwrap();
    assert!(is_hidden(&window));
}

#[test]
fn test_empty_asset_list_hides_after_completion_delay() {
    let mut window = storefront();
    let mut config = PageConfig::default();
    config.loader.critical_assets.clear();
    window.boot(config);

    window.advance_time(499).unwrap();
    assert!(!is_hidden(&window));
    window.advance_time(1).unwrap();
    assert!(is_hidden(&window));
}

#[test]
fn test_reveal_pass_after_hide() {
    let html = r#"
        <div id="loader"><div class="loader-progress"></div></div>
        <div class="animate-on-scroll" id="teaser"></div>
        <div class="animate-on-scroll" id="later"></div>
    "#;
    let mut window = Window::from_html(html);
    window
        .set_layout("#teaser", DOMRect::from_xywh(0.0, 100.0, 400.0, 100.0))
        .unwrap();
    window
        .set_layout("#later", DOMRect::from_xywh(0.0, 2000.0, 400.0, 100.0))
        .unwrap();
    let mut config = PageConfig::default();
    config.loader.critical_assets = vec!["assets/logo.jpg".into()];
    config.scroll_reveal.selector = ".nothing-here".into();
    window.boot(config);

    window.complete_resource("assets/logo.jpg");
    window.advance_time(500).unwrap();
    assert!(is_hidden(&window));
    assert!(!window.exists("#teaser.animated").unwrap());

    window.advance_time(300).unwrap();
    assert!(window.exists("#teaser.animated").unwrap());
    assert!(!window.exists("#later.animated").unwrap());
}

#[test]
fn test_page_without_loader_is_untouched() {
    let mut window = Window::from_html("<main><p>Bonjour</p></main>");
    window.boot(PageConfig::default());

    assert!(!window.exists("body.loading").unwrap());
    assert_eq!(window.pending_timers(), 0);
    assert!(window.requested_urls().is_empty());
}
