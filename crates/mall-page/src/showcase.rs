//! Video showcase
//!
//! Hover-to-preview on `.video-card` elements plus an optional play/pause
//! button per card.

use crate::host::{DomEvent, EventKind, EventTarget, Host, ReadyState};

const CARD_SELECTOR: &str = ".video-card";
const VIDEO_SELECTOR: &str = ".showcase-video";
const BUTTON_SELECTOR: &str = ".play-btn";
pub const PLAY_ICON: &str = r#"<i class="fas fa-play"></i>"#;
pub const PAUSE_ICON: &str = r#"<i class="fas fa-pause"></i>"#;

/// Hover playback only starts once the current frame is decodable
pub fn can_preview(state: ReadyState) -> bool {
    state >= ReadyState::HaveCurrentData
}

pub fn init<H: Host>(host: &mut H) {
    for card in host.query_all(CARD_SELECTOR) {
        let video = host.query_within(&card, VIDEO_SELECTOR);
        let button = host.query_within(&card, BUTTON_SELECTOR);
        if video.is_none() {
            tracing::debug!("Video card without {}", VIDEO_SELECTOR);
        }

        {
            let video = video.clone();
            host.listen(
                EventTarget::Element(card.clone()),
                EventKind::PointerEnter,
                Box::new(move |h: &mut H, _: &mut DomEvent<H::Node>| {
                    if let Some(video) = &video {
                        if can_preview(h.ready_state(video)) {
                            h.play(video);
                        }
                    }
                }),
            );
        }
        {
            let video = video.clone();
            host.listen(
                EventTarget::Element(card.clone()),
                EventKind::PointerLeave,
                Box::new(move |h: &mut H, _: &mut DomEvent<H::Node>| {
                    if let Some(video) = &video {
                        h.pause(video);
                        h.set_current_time(video, 0.0);
                    }
                }),
            );
        }

        let Some(button) = button else {
            continue;
        };
        let button_el = button.clone();
        host.listen(
            EventTarget::Element(button),
            EventKind::Click,
            Box::new(move |h: &mut H, event: &mut DomEvent<H::Node>| {
                event.stop_propagation();
                let Some(video) = &video else {
                    return;
                };
                if h.is_paused(video) {
                    h.play(video);
                    h.set_inner_html(&button_el, PAUSE_ICON);
                } else {
                    h.pause(video);
                    h.set_inner_html(&button_el, PLAY_ICON);
                }
            }),
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_can_preview() {
        assert!(!can_preview(ReadyState::HaveNothing));
        assert!(!can_preview(ReadyState::HaveMetadata));
        assert!(can_preview(ReadyState::HaveCurrentData));
        assert!(can_preview(ReadyState::HaveEnoughData));
    }
}
