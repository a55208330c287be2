//! Host capabilities
//!
//! Everything a page behavior may do to the page goes through [`Host`]. The
//! headless runtime and the wasm entry point each provide one implementation.
//!
//! Callbacks receive `&mut H` so they can query, mutate, and schedule more
//! work without holding on to the host between invocations. All of them run
//! on the single UI thread.

use std::fmt;

/// Where a listener is attached
#[derive(Debug, Clone, PartialEq)]
pub enum EventTarget<N> {
    Window,
    Document,
    Element(N),
}

/// Browser events the page reacts to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventKind {
    DomContentLoaded,
    Scroll,
    Click,
    KeyDown,
    PointerEnter,
    PointerLeave,
    Load,
    Error,
    LoadedData,
}

impl EventKind {
    /// DOM event type name
    pub fn as_str(self) -> &'static str {
        match self {
            Self::DomContentLoaded => "DOMContentLoaded",
            Self::Scroll => "scroll",
            Self::Click => "click",
            Self::KeyDown => "keydown",
            Self::PointerEnter => "mouseenter",
            Self::PointerLeave => "mouseleave",
            Self::Load => "load",
            Self::Error => "error",
            Self::LoadedData => "loadeddata",
        }
    }

    /// Whether the event travels up the ancestor chain
    pub fn bubbles(self) -> bool {
        matches!(self, Self::Click | Self::KeyDown)
    }
}

impl fmt::Display for EventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// An event as seen by a listener
#[derive(Debug, Clone)]
pub struct DomEvent<N> {
    pub kind: EventKind,
    /// Element the event was dispatched at (`event.target`)
    pub target: Option<N>,
    /// Key value for `keydown`
    pub key: Option<String>,
    propagation_stopped: bool,
    default_prevented: bool,
}

impl<N> DomEvent<N> {
    pub fn new(kind: EventKind, target: Option<N>) -> Self {
        Self {
            kind,
            target,
            key: None,
            propagation_stopped: false,
            default_prevented: false,
        }
    }

    pub fn key_down(key: &str, target: Option<N>) -> Self {
        Self {
            key: Some(key.to_string()),
            ..Self::new(EventKind::KeyDown, target)
        }
    }

    pub fn stop_propagation(&mut self) {
        self.propagation_stopped = true;
    }

    pub fn prevent_default(&mut self) {
        self.default_prevented = true;
    }

    pub fn is_propagation_stopped(&self) -> bool {
        self.propagation_stopped
    }

    pub fn is_default_prevented(&self) -> bool {
        self.default_prevented
    }
}

/// Media readiness (`HTMLMediaElement.readyState`)
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord)]
pub enum ReadyState {
    #[default]
    HaveNothing = 0,
    HaveMetadata = 1,
    HaveCurrentData = 2,
    HaveFutureData = 3,
    HaveEnoughData = 4,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ScrollBehavior {
    #[default]
    Auto,
    Smooth,
}

/// Viewport-relative box
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Rect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl Rect {
    pub fn top(&self) -> f64 {
        self.y
    }

    pub fn bottom(&self) -> f64 {
        self.y + self.height
    }
}

/// Root margin, in CSS pixels, applied to the viewport before intersecting
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Margins {
    pub top: f64,
    pub right: f64,
    pub bottom: f64,
    pub left: f64,
}

impl Margins {
    /// `"{px}px 0px"`
    pub fn vertical(px: f64) -> Self {
        Self {
            top: px,
            bottom: px,
            ..Self::default()
        }
    }

    /// `"0px 0px {px}px 0px"`
    pub fn bottom(px: f64) -> Self {
        Self {
            bottom: px,
            ..Self::default()
        }
    }

    /// CSS `rootMargin` string
    pub fn to_css(&self) -> String {
        format!(
            "{}px {}px {}px {}px",
            self.top, self.right, self.bottom, self.left
        )
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct IntersectionOptions {
    pub root_margin: Margins,
    /// Minimum visible fraction for an entry to count as intersecting
    pub threshold: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct IntersectionEntry<N> {
    pub target: N,
    pub ratio: f64,
    pub is_intersecting: bool,
}

/// Handle returned by [`Host::observe`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ObserverId(pub u32);

/// How a resource fetch ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadOutcome {
    Loaded,
    Failed,
}

/// Local wall-clock time
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimeOfDay {
    pub hour: u8,
    pub minute: u8,
}

impl TimeOfDay {
    pub fn new(hour: u8, minute: u8) -> Self {
        Self { hour, minute }
    }

    /// `hour + minute / 60`
    pub fn fractional_hours(&self) -> f64 {
        f64::from(self.hour) + f64::from(self.minute) / 60.0
    }
}

pub type EventHandler<H> = Box<dyn FnMut(&mut H, &mut DomEvent<<H as Host>::Node>)>;
pub type TimeoutCallback<H> = Box<dyn FnOnce(&mut H)>;
pub type IntervalCallback<H> = Box<dyn FnMut(&mut H)>;
pub type IntersectionCallback<H> =
    Box<dyn FnMut(&mut H, ObserverId, Vec<IntersectionEntry<<H as Host>::Node>>)>;
pub type SettleCallback<H> = Box<dyn FnOnce(&mut H, LoadOutcome)>;

/// Browser capabilities used by the page behaviors
pub trait Host: Sized + 'static {
    type Node: Clone + PartialEq + fmt::Debug + 'static;

    // Document

    fn element_by_id(&self, id: &str) -> Option<Self::Node>;
    /// Matches in document order; an unsupported selector yields nothing
    fn query_all(&self, selector: &str) -> Vec<Self::Node>;
    fn query_within(&self, scope: &Self::Node, selector: &str) -> Option<Self::Node>;
    fn body(&self) -> Option<Self::Node>;
    fn parent(&self, node: &Self::Node) -> Option<Self::Node>;
    /// Inclusive containment (`Node.contains`)
    fn contains(&self, ancestor: &Self::Node, node: &Self::Node) -> bool;

    fn attribute(&self, node: &Self::Node, name: &str) -> Option<String>;
    fn set_attribute(&mut self, node: &Self::Node, name: &str, value: &str);
    fn has_class(&self, node: &Self::Node, class: &str) -> bool;
    fn add_class(&mut self, node: &Self::Node, class: &str);
    fn remove_class(&mut self, node: &Self::Node, class: &str);
    /// Returns the new membership state
    fn toggle_class(&mut self, node: &Self::Node, class: &str) -> bool;
    fn set_style(&mut self, node: &Self::Node, property: &str, value: &str);
    fn set_inner_html(&mut self, node: &Self::Node, markup: &str);

    // Geometry

    fn scroll_y(&self) -> f64;
    fn viewport_height(&self) -> f64;
    fn offset_top(&self, node: &Self::Node) -> f64;
    fn offset_height(&self, node: &Self::Node) -> f64;
    fn bounding_client_rect(&self, node: &Self::Node) -> Rect;
    fn scroll_to(&mut self, top: f64, behavior: ScrollBehavior);

    // Media

    fn ready_state(&self, media: &Self::Node) -> ReadyState;
    fn is_paused(&self, media: &Self::Node) -> bool;
    /// Fire-and-forget; a rejected play request is absorbed by the host
    fn play(&mut self, media: &Self::Node);
    fn pause(&mut self, media: &Self::Node);
    fn set_current_time(&mut self, media: &Self::Node, seconds: f64);
    /// Re-run source selection (`HTMLMediaElement.load`)
    fn load(&mut self, media: &Self::Node);

    // Session storage

    fn session_item(&self, key: &str) -> Option<String>;
    fn set_session_item(&mut self, key: &str, value: &str);

    // Scheduling

    /// Persistent listener; handlers for one event run in registration order
    fn listen(
        &mut self,
        target: EventTarget<Self::Node>,
        kind: EventKind,
        handler: EventHandler<Self>,
    );
    fn set_timeout(&mut self, delay_ms: u32, callback: TimeoutCallback<Self>);
    fn set_interval(&mut self, period_ms: u32, callback: IntervalCallback<Self>);
    /// Observe `targets` until each is unobserved
    fn observe(
        &mut self,
        options: IntersectionOptions,
        targets: &[Self::Node],
        callback: IntersectionCallback<Self>,
    ) -> ObserverId;
    fn unobserve(&mut self, observer: ObserverId, target: &Self::Node);
    /// Fetch an image outside the document; `on_settled` runs exactly once
    fn preload_image(&mut self, url: &str, on_settled: SettleCallback<Self>);

    fn time_of_day(&self) -> TimeOfDay;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_margins_css() {
        assert_eq!(Margins::vertical(50.0).to_css(), "50px 0px 50px 0px");
        assert_eq!(Margins::bottom(-50.0).to_css(), "0px 0px -50px 0px");
    }

    #[test]
    fn test_fractional_hours() {
        assert_eq!(TimeOfDay::new(8, 30).fractional_hours(), 8.5);
        assert_eq!(TimeOfDay::new(21, 0).fractional_hours(), 21.0);
    }

    #[test]
    fn test_event_flags() {
        let mut event: DomEvent<u32> = DomEvent::key_down("Escape", None);
        assert_eq!(event.kind, EventKind::KeyDown);
        assert_eq!(event.key.as_deref(), Some("Escape"));
        assert!(!event.is_propagation_stopped());
        event.stop_propagation();
        event.prevent_default();
        assert!(event.is_propagation_stopped());
        assert!(event.is_default_prevented());
    }
}
