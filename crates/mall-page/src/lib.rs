//! Storefront page behaviors
//!
//! Client-side interactivity for the storefront page: loading overlay,
//! navigation, lazy media, product filter, video showcase, opening hours,
//! scroll reveals, back-to-top, and the promotional popup.
//!
//! Behaviors are written once against [`Host`] and share nothing but the
//! document. Each initializer is independent and turns into a no-op when the
//! elements it needs are missing.

pub mod anchors;
pub mod back_to_top;
pub mod config;
pub mod filter;
pub mod host;
pub mod lazy_images;
pub mod lazy_videos;
pub mod loader;
pub mod navigation;
pub mod open_status;
pub mod popup;
pub mod scroll_reveal;
pub mod showcase;

pub use config::{ConfigError, PageConfig};
pub use host::{
    DomEvent, EventKind, EventTarget, Host, IntersectionEntry, IntersectionOptions, LoadOutcome,
    Margins, ObserverId, ReadyState, Rect, ScrollBehavior, TimeOfDay,
};

/// Wire every behavior now, in page order
pub fn init<H: Host>(host: &mut H, config: &PageConfig) {
    loader::init(host, &config.loader);
    navigation::init(host, &config.navigation);
    lazy_images::init(host, &config.lazy);
    lazy_videos::init(host, &config.lazy);
    filter::init(host, &config.filter);
    showcase::init(host);
    open_status::init(host, &config.open_status);
    scroll_reveal::init(host, &config.scroll_reveal);
    back_to_top::init(host, &config.back_to_top);
    popup::init(host, &config.popup);
    anchors::init(host, &config.navigation);
    tracing::info!("Storefront behaviors initialized");
}

/// Defer [`init`] until `DOMContentLoaded`
pub fn boot<H: Host>(host: &mut H, config: PageConfig) {
    let mut pending = Some(config);
    host.listen(
        EventTarget::Document,
        EventKind::DomContentLoaded,
        Box::new(move |h: &mut H, _: &mut DomEvent<H::Node>| {
            if let Some(config) = pending.take() {
                init(h, &config);
            }
        }),
    );
}
