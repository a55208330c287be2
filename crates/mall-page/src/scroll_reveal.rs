//! Scroll animations
//!
//! Content blocks get `animate-on-scroll` up front and `animated` the first
//! time they scroll into view. The transition is one-way.

use crate::config::ScrollRevealConfig;
use crate::host::{Host, IntersectionEntry, IntersectionOptions, Margins, ObserverId};

pub const ANIMATE_CLASS: &str = "animate-on-scroll";
pub const ANIMATED_CLASS: &str = "animated";

pub fn init<H: Host>(host: &mut H, config: &ScrollRevealConfig) {
    let elements = host.query_all(&config.selector);
    if elements.is_empty() {
        tracing::debug!("Nothing matches {}, scroll animations disabled", config.selector);
        return;
    }
    for el in &elements {
        host.add_class(el, ANIMATE_CLASS);
    }

    let options = IntersectionOptions {
        root_margin: Margins::bottom(config.bottom_margin),
        threshold: config.threshold,
    };
    tracing::debug!("Scroll animations on {} elements", elements.len());
    // Targets stay observed; re-adding the class on later entries is a no-op.
    host.observe(
        options,
        &elements,
        Box::new(
            |h: &mut H, _: ObserverId, entries: Vec<IntersectionEntry<H::Node>>| {
                for entry in entries.iter().filter(|e| e.is_intersecting) {
                    h.add_class(&entry.target, ANIMATED_CLASS);
                }
            },
        ),
    );
}
