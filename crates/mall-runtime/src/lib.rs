//! Headless storefront runtime
//!
//! Runs the storefront behaviors against an in-memory document with a
//! virtual clock, so page flows can be driven and asserted step by step
//! without a browser.
//!
//! ```ignore
//! let mut window = Window::from_html(STOREFRONT);
//! window.boot(PageConfig::default());
//! window.scroll_window(120.0);
//! assert!(window.exists("#navbar.scrolled")?);
//! ```

mod events;
mod intersection;
mod resources;
mod storage;
mod timers;
mod window;

pub use events::ListenerRegistry;
pub use intersection::{intersection_ratio, IntersectionObserverManager};
pub use resources::ResourceLoader;
pub use storage::SessionStorage;
pub use timers::{TimerId, TimerQueue};
pub use window::{AutoplayPolicy, Window, WindowOptions};

use mall_dom::DomError;

/// Runtime errors
#[derive(Debug, thiserror::Error)]
pub enum RuntimeError {
    #[error(transparent)]
    Dom(#[from] DomError),

    #[error("advance_time requires non-negative milliseconds, got {0}")]
    NegativeTime(i64),

    #[error("timer step limit {limit} exceeded at {now_ms}ms")]
    TimerStepLimit { limit: usize, now_ms: u64 },

    #[error("element matched by {0} is not a media element")]
    NotMedia(String),
}

pub type Result<T> = std::result::Result<T, RuntimeError>;
