#![forbid(unsafe_code)]

//! Browser entry point for the storefront.
//!
//! On wasm32 this crate implements [`mall_page::Host`] over `web-sys` and
//! boots every behavior when the module starts. Pages may override the
//! defaults with a JSON block:
//!
//! ```html
//! <script type="application/json" id="storefront-config">
//!   { "popup": { "delay_ms": 5000 } }
//! </script>
//! ```

use mall_page::{ConfigError, ObserverId, PageConfig};

#[cfg(target_arch = "wasm32")]
mod wasm;

#[cfg(target_arch = "wasm32")]
pub use wasm::WebHost;

/// Id of the optional inline configuration block
pub const CONFIG_ELEMENT_ID: &str = "storefront-config";

/// Configuration from the page's inline block, if any. Blank blocks count as
/// absent.
pub fn page_config(embedded: Option<&str>) -> Result<PageConfig, ConfigError> {
    match embedded.map(str::trim) {
        Some(json) if !json.is_empty() => PageConfig::from_json(json),
        _ => Ok(PageConfig::default()),
    }
}

/// Live intersection observers by id. Ids are never reused, even when
/// creating an observer fails after its id was handed out.
#[derive(Debug)]
pub struct ObserverRegistry<T> {
    observers: Vec<(ObserverId, T)>,
    next_id: u32,
}

impl<T> ObserverRegistry<T> {
    pub fn new() -> Self {
        Self {
            observers: Vec::new(),
            next_id: 0,
        }
    }

    /// Reserve the id for an observer about to be created
    pub fn next_id(&mut self) -> ObserverId {
        let id = ObserverId(self.next_id);
        self.next_id += 1;
        id
    }

    pub fn insert(&mut self, id: ObserverId, observer: T) {
        self.observers.push((id, observer));
    }

    pub fn get(&self, id: ObserverId) -> Option<&T> {
        self.observers
            .iter()
            .find(|(known, _)| *known == id)
            .map(|(_, observer)| observer)
    }

    pub fn len(&self) -> usize {
        self.observers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.observers.is_empty()
    }
}

impl<T> Default for ObserverRegistry<T> {
    fn default() -> Self {
        Self::new()
    }
}

/// Native builds compile this crate as a stub so workspace checks stay green
/// on non-wasm targets.
#[cfg(not(target_arch = "wasm32"))]
#[derive(Debug, Default)]
pub struct WebHost;
