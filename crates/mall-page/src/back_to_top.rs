//! Back-to-top control

use crate::config::BackToTopConfig;
use crate::host::{DomEvent, EventKind, EventTarget, Host, ScrollBehavior};

const BUTTON_ID: &str = "back-to-top";
const VISIBLE_CLASS: &str = "visible";

pub fn is_visible(scroll_y: f64, threshold: f64) -> bool {
    scroll_y > threshold
}

pub fn init<H: Host>(host: &mut H, config: &BackToTopConfig) {
    let Some(button) = host.element_by_id(BUTTON_ID) else {
        tracing::debug!("No #{} element", BUTTON_ID);
        return;
    };

    let threshold = config.threshold;
    let button_el = button.clone();
    host.listen(
        EventTarget::Window,
        EventKind::Scroll,
        Box::new(move |h: &mut H, _: &mut DomEvent<H::Node>| {
            if is_visible(h.scroll_y(), threshold) {
                h.add_class(&button_el, VISIBLE_CLASS);
            } else {
                h.remove_class(&button_el, VISIBLE_CLASS);
            }
        }),
    );

    host.listen(
        EventTarget::Element(button),
        EventKind::Click,
        Box::new(|h: &mut H, _: &mut DomEvent<H::Node>| h.scroll_to(0.0, ScrollBehavior::Smooth)),
    );
}
