//! In-page anchor links
//!
//! `a[href^="#"]` clicks scroll smoothly to their target instead of jumping,
//! leaving room for the fixed header.

use crate::config::NavigationConfig;
use crate::host::{DomEvent, EventKind, EventTarget, Host, ScrollBehavior};

const ANCHOR_SELECTOR: &str = r##"a[href^="#"]"##;

/// Document offset to scroll to so the target sits `header_offset` below the top
pub fn scroll_target(client_top: f64, scroll_y: f64, header_offset: f64) -> f64 {
    client_top + scroll_y - header_offset
}

pub fn init<H: Host>(host: &mut H, config: &NavigationConfig) {
    let header_offset = config.anchor_offset;
    for anchor in host.query_all(ANCHOR_SELECTOR) {
        let anchor_el = anchor.clone();
        host.listen(
            EventTarget::Element(anchor),
            EventKind::Click,
            Box::new(move |h: &mut H, event: &mut DomEvent<H::Node>| {
                event.prevent_default();
                let Some(href) = h.attribute(&anchor_el, "href") else {
                    return;
                };
                let Some(target) = href
                    .strip_prefix('#')
                    .filter(|id| !id.is_empty())
                    .and_then(|id| h.element_by_id(id))
                else {
                    tracing::debug!("Anchor {} has no target", href);
                    return;
                };
                let top = h.bounding_client_rect(&target).top();
                let offset = scroll_target(top, h.scroll_y(), header_offset);
                h.scroll_to(offset, ScrollBehavior::Smooth);
            }),
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scroll_target() {
        assert_eq!(scroll_target(400.0, 1000.0, 80.0), 1320.0);
        assert_eq!(scroll_target(-200.0, 1000.0, 80.0), 720.0);
    }
}
