//! Collection filter
//!
//! Category buttons showing and hiding product cards.

use crate::config::FilterConfig;
use crate::host::{DomEvent, EventKind, EventTarget, Host};

const BUTTON_SELECTOR: &str = ".filter-btn";
const CARD_SELECTOR: &str = ".product-card";
const ACTIVE_CLASS: &str = "active";
const HIDDEN_CLASS: &str = "hidden";

/// A card is shown for the `all` sentinel or an exact category match.
/// A button and a card both lacking their tag attribute also match.
pub fn card_matches(filter: Option<&str>, category: Option<&str>, all_sentinel: &str) -> bool {
    filter == Some(all_sentinel) || filter == category
}

/// Entrance delay of the card at `index`, rounded to whole milliseconds
pub fn stagger_delay(index: usize, step_s: f64) -> f64 {
    (index as f64 * step_s * 1000.0).round() / 1000.0
}

pub fn init<H: Host>(host: &mut H, config: &FilterConfig) {
    let buttons = host.query_all(BUTTON_SELECTOR);
    let cards = host.query_all(CARD_SELECTOR);

    for button in &buttons {
        let buttons = buttons.clone();
        let cards = cards.clone();
        let button_el = button.clone();
        let config = config.clone();
        host.listen(
            EventTarget::Element(button.clone()),
            EventKind::Click,
            Box::new(move |h: &mut H, _: &mut DomEvent<H::Node>| {
                for b in &buttons {
                    h.remove_class(b, ACTIVE_CLASS);
                }
                h.add_class(&button_el, ACTIVE_CLASS);

                let filter = h.attribute(&button_el, "data-filter");
                apply(h, &cards, filter.as_deref(), &config);
            }),
        );
    }
}

fn apply<H: Host>(host: &mut H, cards: &[H::Node], filter: Option<&str>, config: &FilterConfig) {
    let mut shown = 0usize;
    for (index, card) in cards.iter().enumerate() {
        let category = host.attribute(card, "data-category");
        if card_matches(filter, category.as_deref(), &config.all_sentinel) {
            host.remove_class(card, HIDDEN_CLASS);
            let delay = stagger_delay(index, config.stagger_step_s);
            host.set_style(
                card,
                "animation",
                &format!("fadeInUp 0.5s ease {delay}s forwards"),
            );
            shown += 1;
        } else {
            host.add_class(card, HIDDEN_CLASS);
        }
    }
    tracing::debug!("Filter {:?}: {}/{} cards shown", filter, shown, cards.len());
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_card_matches() {
        assert!(card_matches(Some("all"), Some("men"), "all"));
        assert!(card_matches(Some("all"), None, "all"));
        assert!(card_matches(Some("men"), Some("men"), "all"));
        assert!(!card_matches(Some("men"), Some("women"), "all"));
        assert!(!card_matches(Some("men"), None, "all"));
        assert!(card_matches(None, None, "all"));
    }

    #[test]
    fn test_stagger_delay() {
        assert_eq!(stagger_delay(0, 0.05), 0.0);
        assert_eq!(stagger_delay(1, 0.05), 0.05);
        assert_eq!(stagger_delay(3, 0.05), 0.15);
        assert_eq!(format!("{}s", stagger_delay(2, 0.05)), "0.1s");
    }
}
