//! Image lazy-loading
//!
//! Images flagged with the `lazy` class or a `data-lazy` attribute get their
//! `data-src` copied into `src` once they come near the viewport.

use crate::config::LazyConfig;
use crate::host::{
    DomEvent, EventKind, EventTarget, Host, IntersectionEntry, IntersectionOptions, Margins,
    ObserverId,
};

const LAZY_SELECTORS: [&str; 2] = ["img.lazy", "img[data-lazy]"];
const LOADED_CLASS: &str = "loaded";

pub fn init<H: Host>(host: &mut H, config: &LazyConfig) {
    // Both conventions share one observer; an image carrying both is observed once.
    let mut images: Vec<H::Node> = Vec::new();
    for selector in LAZY_SELECTORS {
        for img in host.query_all(selector) {
            if !images.contains(&img) {
                images.push(img);
            }
        }
    }
    if images.is_empty() {
        return;
    }
    tracing::debug!("Lazy-loading {} images", images.len());

    let options = IntersectionOptions {
        root_margin: Margins::vertical(config.image_margin),
        threshold: config.threshold,
    };
    host.observe(
        options,
        &images,
        Box::new(
            |h: &mut H, observer: ObserverId, entries: Vec<IntersectionEntry<H::Node>>| {
                for entry in entries.into_iter().filter(|e| e.is_intersecting) {
                    reveal(h, &entry.target);
                    h.unobserve(observer, &entry.target);
                }
            },
        ),
    );
}

fn reveal<H: Host>(host: &mut H, img: &H::Node) {
    let Some(src) = host.attribute(img, "data-src") else {
        return;
    };
    for kind in [EventKind::Load, EventKind::Error] {
        let img_el = img.clone();
        host.listen(
            EventTarget::Element(img.clone()),
            kind,
            Box::new(move |h: &mut H, _: &mut DomEvent<H::Node>| {
                h.add_class(&img_el, LOADED_CLASS);
            }),
        );
    }
    host.set_attribute(img, "src", &src);
}
