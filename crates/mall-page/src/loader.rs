//! Progressive loader
//!
//! Tracks a fixed list of critical assets, drives the progress bar, and lifts
//! the loading overlay once every asset has settled. A failed fetch settles
//! its asset just like a successful one, and a hard timeout hides the overlay
//! even if some asset never reports.

use std::cell::RefCell;
use std::rc::Rc;

use crate::config::LoaderConfig;
use crate::host::{DomEvent, EventKind, EventTarget, Host, LoadOutcome, Rect};
use crate::scroll_reveal::{ANIMATED_CLASS, ANIMATE_CLASS};

const LOADER_ID: &str = "loader";
const PROGRESS_SELECTOR: &str = ".loader-progress";
const HIDDEN_CLASS: &str = "hidden";
const LOADING_CLASS: &str = "loading";

/// Settlement bookkeeping for the critical assets
#[derive(Debug, Clone)]
pub struct AssetTracker {
    settled: Vec<bool>,
}

impl AssetTracker {
    pub fn new(total: usize) -> Self {
        Self {
            settled: vec![false; total],
        }
    }

    /// Mark asset `index` as settled. Returns `false` if it already was, so
    /// a late event after a fallback timer never counts twice.
    pub fn settle(&mut self, index: usize) -> bool {
        match self.settled.get_mut(index) {
            Some(done) if !*done => {
                *done = true;
                true
            }
            _ => false,
        }
    }

    pub fn total(&self) -> usize {
        self.settled.len()
    }

    pub fn loaded(&self) -> usize {
        self.settled.iter().filter(|&&done| done).count()
    }

    pub fn is_complete(&self) -> bool {
        self.settled.iter().all(|&done| done)
    }

    /// Progress in percent; an empty asset list counts as complete
    pub fn percent(&self) -> f64 {
        if self.settled.is_empty() {
            return 100.0;
        }
        self.loaded() as f64 / self.total() as f64 * 100.0
    }
}

/// Whether any part of `rect` lies within a viewport of the given height
pub fn in_viewport(rect: Rect, viewport_height: f64) -> bool {
    rect.top() <= viewport_height && rect.bottom() >= 0.0
}

struct Loader<N> {
    overlay: N,
    progress: Option<N>,
    body: Option<N>,
    tracker: RefCell<AssetTracker>,
    config: LoaderConfig,
}

/// Wire the loader. No-op without a `#loader` overlay.
pub fn init<H: Host>(host: &mut H, config: &LoaderConfig) {
    let Some(overlay) = host.element_by_id(LOADER_ID) else {
        tracing::debug!("No #{} element, loader disabled", LOADER_ID);
        return;
    };
    let progress = host.query_all(PROGRESS_SELECTOR).into_iter().next();
    let body = host.body();
    if let Some(body) = &body {
        host.add_class(body, LOADING_CLASS);
    }

    let loader = Rc::new(Loader {
        overlay,
        progress,
        body,
        tracker: RefCell::new(AssetTracker::new(config.critical_assets.len())),
        config: config.clone(),
    });

    if config.critical_assets.is_empty() {
        let loader = Rc::clone(&loader);
        host.set_timeout(
            config.completion_delay_ms,
            Box::new(move |h: &mut H| hide(h, &loader)),
        );
    }

    for (index, url) in config.critical_assets.iter().enumerate() {
        if url.ends_with(".mp4") {
            track_video(host, &loader, index, url);
        } else {
            let loader = Rc::clone(&loader);
            host.preload_image(
                url,
                Box::new(move |h: &mut H, _outcome: LoadOutcome| settle(h, &loader, index)),
            );
        }
    }

    let fallback = Rc::clone(&loader);
    host.set_timeout(
        config.fallback_timeout_ms,
        Box::new(move |h: &mut H| {
            if h.has_class(&fallback.overlay, HIDDEN_CLASS) {
                return;
            }
            tracing::info!(
                "Loader fallback after {}ms ({}/{} assets)",
                fallback.config.fallback_timeout_ms,
                fallback.tracker.borrow().loaded(),
                fallback.tracker.borrow().total()
            );
            set_progress(h, &fallback, 100.0);
            let loader = Rc::clone(&fallback);
            h.set_timeout(
                fallback.config.forced_hide_delay_ms,
                Box::new(move |h: &mut H| hide(h, &loader)),
            );
        }),
    );
}

fn track_video<H: Host>(host: &mut H, loader: &Rc<Loader<H::Node>>, index: usize, url: &str) {
    let source = host
        .query_all(&format!(r#"video source[src="{url}"]"#))
        .into_iter()
        .next();
    let Some(video) = source.and_then(|s| host.parent(&s)) else {
        tracing::debug!("Critical video {} not on page", url);
        let loader = Rc::clone(loader);
        host.set_timeout(
            loader.config.missing_video_delay_ms,
            Box::new(move |h: &mut H| settle(h, &loader, index)),
        );
        return;
    };

    for kind in [EventKind::LoadedData, EventKind::Error] {
        let loader = Rc::clone(loader);
        host.listen(
            EventTarget::Element(video.clone()),
            kind,
            Box::new(move |h: &mut H, _: &mut DomEvent<H::Node>| settle(h, &loader, index)),
        );
    }
    let loader = Rc::clone(loader);
    host.set_timeout(
        loader.config.video_fallback_ms,
        Box::new(move |h: &mut H| settle(h, &loader, index)),
    );
}

fn settle<H: Host>(host: &mut H, loader: &Rc<Loader<H::Node>>, index: usize) {
    let (percent, complete) = {
        let mut tracker = loader.tracker.borrow_mut();
        if !tracker.settle(index) {
            return;
        }
        (tracker.percent(), tracker.is_complete())
    };
    set_progress(host, loader, percent);

    if complete {
        tracing::debug!("All critical assets settled");
        let loader = Rc::clone(loader);
        host.set_timeout(
            loader.config.completion_delay_ms,
            Box::new(move |h: &mut H| hide(h, &loader)),
        );
    }
}

fn set_progress<H: Host>(host: &mut H, loader: &Loader<H::Node>, percent: f64) {
    if let Some(bar) = &loader.progress {
        host.set_style(bar, "width", &format!("{percent}%"));
    }
}

fn hide<H: Host>(host: &mut H, loader: &Loader<H::Node>) {
    host.add_class(&loader.overlay, HIDDEN_CLASS);
    if let Some(body) = &loader.body {
        host.remove_class(body, LOADING_CLASS);
    }

    host.set_timeout(
        loader.config.reveal_delay_ms,
        Box::new(|h: &mut H| {
            let viewport_height = h.viewport_height();
            for el in h.query_all(&format!(".{ANIMATE_CLASS}")) {
                if in_viewport(h.bounding_client_rect(&el), viewport_height) {
                    h.add_class(&el, ANIMATED_CLASS);
                }
            }
        }),
    );
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tracker_counts_each_asset_once() {
        let mut tracker = AssetTracker::new(3);
        assert!(tracker.settle(1));
        assert!(!tracker.settle(1));
        assert_eq!(tracker.loaded(), 1);
        assert!(!tracker.is_complete());

        assert!(tracker.settle(0));
        assert!(tracker.settle(2));
        assert!(tracker.is_complete());
        assert_eq!(tracker.percent(), 100.0);
    }

    #[test]
    fn test_tracker_ignores_unknown_index() {
        let mut tracker = AssetTracker::new(1);
        assert!(!tracker.settle(5));
        assert_eq!(tracker.loaded(), 0);
    }

    #[test]
    fn test_empty_tracker_is_complete() {
        let tracker = AssetTracker::new(0);
        assert!(tracker.is_complete());
        assert_eq!(tracker.percent(), 100.0);
    }

    #[test]
    fn test_progress_fraction() {
        let mut tracker = AssetTracker::new(4);
        tracker.settle(0);
        assert_eq!(tracker.percent(), 25.0);
    }

    #[test]
    fn test_in_viewport() {
        let rect = |y, h| Rect { x: 0.0, y, width: 100.0, height: h };
        assert!(in_viewport(rect(0.0, 100.0), 800.0));
        assert!(in_viewport(rect(800.0, 100.0), 800.0));
        assert!(in_viewport(rect(-100.0, 100.0), 800.0));
        assert!(!in_viewport(rect(801.0, 100.0), 800.0));
        assert!(!in_viewport(rect(-200.0, 100.0), 800.0));
    }
}
