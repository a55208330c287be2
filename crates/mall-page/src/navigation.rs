//! Navigation controller
//!
//! Scrolled styling for the navbar, scroll-driven section highlighting, and
//! the mobile menu toggle.

use crate::config::NavigationConfig;
use crate::host::{DomEvent, EventKind, EventTarget, Host};

const NAVBAR_ID: &str = "navbar";
const TOGGLE_ID: &str = "nav-toggle";
const MENU_ID: &str = "nav-menu";
const LINK_SELECTOR: &str = ".nav-link";
const SECTION_SELECTOR: &str = "section[id]";
const SCROLLED_CLASS: &str = "scrolled";
const ACTIVE_CLASS: &str = "active";

/// Vertical span of one page section
#[derive(Debug, Clone, PartialEq)]
pub struct SectionSpan {
    pub id: String,
    pub top: f64,
    pub height: f64,
}

impl SectionSpan {
    /// Half-open `[top, top + height)`
    pub fn contains(&self, position: f64) -> bool {
        position >= self.top && position < self.top + self.height
    }
}

/// Navbar shows its scrolled state from `threshold` onwards
pub fn is_scrolled(scroll_y: f64, threshold: f64) -> bool {
    scroll_y >= threshold
}

/// Section whose span holds `scroll_y + header_offset`. When spans overlap
/// the last one in document order wins.
pub fn active_section(sections: &[SectionSpan], scroll_y: f64, header_offset: f64) -> Option<&str> {
    let position = scroll_y + header_offset;
    sections
        .iter()
        .rev()
        .find(|s| s.contains(position))
        .map(|s| s.id.as_str())
}

pub fn init<H: Host>(host: &mut H, config: &NavigationConfig) {
    let navbar = host.element_by_id(NAVBAR_ID);
    let links = host.query_all(LINK_SELECTOR);

    {
        let links = links.clone();
        let config = config.clone();
        host.listen(
            EventTarget::Window,
            EventKind::Scroll,
            Box::new(move |h: &mut H, _: &mut DomEvent<H::Node>| {
                let scroll_y = h.scroll_y();
                if let Some(navbar) = &navbar {
                    if is_scrolled(scroll_y, config.scrolled_threshold) {
                        h.add_class(navbar, SCROLLED_CLASS);
                    } else {
                        h.remove_class(navbar, SCROLLED_CLASS);
                    }
                }
                highlight_active_link(h, &links, scroll_y, config.header_offset);
            }),
        );
    }

    let (Some(toggle), Some(menu)) = (host.element_by_id(TOGGLE_ID), host.element_by_id(MENU_ID))
    else {
        tracing::debug!("Mobile menu elements missing, menu toggle disabled");
        return;
    };

    {
        let (toggle_el, menu) = (toggle.clone(), menu.clone());
        host.listen(
            EventTarget::Element(toggle.clone()),
            EventKind::Click,
            Box::new(move |h: &mut H, _: &mut DomEvent<H::Node>| {
                let open = h.toggle_class(&menu, ACTIVE_CLASS);
                if open {
                    h.add_class(&toggle_el, ACTIVE_CLASS);
                } else {
                    h.remove_class(&toggle_el, ACTIVE_CLASS);
                }
            }),
        );
    }

    for link in &links {
        let (toggle, menu) = (toggle.clone(), menu.clone());
        host.listen(
            EventTarget::Element(link.clone()),
            EventKind::Click,
            Box::new(move |h: &mut H, _: &mut DomEvent<H::Node>| close_menu(h, &toggle, &menu)),
        );
    }

    host.listen(
        EventTarget::Document,
        EventKind::Click,
        Box::new(move |h: &mut H, event: &mut DomEvent<H::Node>| {
            let inside = event
                .target
                .as_ref()
                .is_some_and(|t| h.contains(&menu, t) || h.contains(&toggle, t));
            if !inside {
                close_menu(h, &toggle, &menu);
            }
        }),
    );
}

fn close_menu<H: Host>(host: &mut H, toggle: &H::Node, menu: &H::Node) {
    host.remove_class(toggle, ACTIVE_CLASS);
    host.remove_class(menu, ACTIVE_CLASS);
}

/// Recomputed on every scroll; nothing is cached between events. With no
/// matching section the current highlight is left alone.
fn highlight_active_link<H: Host>(host: &mut H, links: &[H::Node], scroll_y: f64, header_offset: f64) {
    let sections: Vec<SectionSpan> = host
        .query_all(SECTION_SELECTOR)
        .iter()
        .filter_map(|section| {
            Some(SectionSpan {
                id: host.attribute(section, "id")?,
                top: host.offset_top(section),
                height: host.offset_height(section),
            })
        })
        .collect();

    let Some(active) = active_section(&sections, scroll_y, header_offset) else {
        return;
    };
    let wanted = format!("#{active}");
    for link in links {
        host.remove_class(link, ACTIVE_CLASS);
        if host.attribute(link, "href").as_deref() == Some(wanted.as_str()) {
            host.add_class(link, ACTIVE_CLASS);
        }
    }
}
