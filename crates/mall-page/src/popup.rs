//! Promotional popup
//!
//! Shown once per browsing session after a delay. The session flag is only
//! ever set, never cleared; dismissing just hides the overlay.

use crate::config::PopupConfig;
use crate::host::{DomEvent, EventKind, EventTarget, Host};

const POPUP_ID: &str = "christmas-popup";
const CLOSE_ID: &str = "popup-close";
const ACTIVE_CLASS: &str = "active";
const ESCAPE_KEY: &str = "Escape";

/// An empty stored value counts as unset
pub fn already_shown(flag: Option<&str>) -> bool {
    flag.is_some_and(|v| !v.is_empty())
}

pub fn init<H: Host>(host: &mut H, config: &PopupConfig) {
    let (Some(popup), Some(close)) = (host.element_by_id(POPUP_ID), host.element_by_id(CLOSE_ID))
    else {
        tracing::debug!("Popup markup incomplete, popup disabled");
        return;
    };

    if already_shown(host.session_item(&config.session_key).as_deref()) {
        tracing::debug!("Popup already shown this session");
    } else {
        let popup = popup.clone();
        let key = config.session_key.clone();
        host.set_timeout(
            config.delay_ms,
            Box::new(move |h: &mut H| {
                h.add_class(&popup, ACTIVE_CLASS);
                h.set_session_item(&key, "true");
            }),
        );
    }

    {
        let popup = popup.clone();
        host.listen(
            EventTarget::Element(close),
            EventKind::Click,
            Box::new(move |h: &mut H, _: &mut DomEvent<H::Node>| {
                h.remove_class(&popup, ACTIVE_CLASS);
            }),
        );
    }
    {
        let popup_el = popup.clone();
        host.listen(
            EventTarget::Element(popup.clone()),
            EventKind::Click,
            Box::new(move |h: &mut H, event: &mut DomEvent<H::Node>| {
                // Only the backdrop itself, not clicks bubbling from the content
                if event.target.as_ref() == Some(&popup_el) {
                    h.remove_class(&popup_el, ACTIVE_CLASS);
                }
            }),
        );
    }
    host.listen(
        EventTarget::Document,
        EventKind::KeyDown,
        Box::new(move |h: &mut H, event: &mut DomEvent<H::Node>| {
            if event.key.as_deref() == Some(ESCAPE_KEY) && h.has_class(&popup, ACTIVE_CLASS) {
                h.remove_class(&popup, ACTIVE_CLASS);
            }
        }),
    );
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_already_shown() {
        assert!(!already_shown(None));
        assert!(!already_shown(Some("")));
        assert!(already_shown(Some("true")));
    }
}
