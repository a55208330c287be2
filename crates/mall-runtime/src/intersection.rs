//! Intersection observers
//!
//! Visibility of observed elements against the viewport, expanded by each
//! observer's root margin. A target is reported on its first check and then
//! whenever it crosses the observer's threshold.

use mall_dom::{DOMRect, NodeId};
use mall_page::{IntersectionEntry, IntersectionOptions, ObserverId};

/// Visible fraction of `rect` inside `root`.
///
/// Zero-area targets count as fully visible when they touch the root.
pub fn intersection_ratio(rect: &DOMRect, root: &DOMRect) -> f64 {
    match rect.intersection(root) {
        Some(overlap) if rect.area() > 0.0 => overlap.area() / rect.area(),
        Some(_) => 1.0,
        None => 0.0,
    }
}

/// Whether `ratio` counts as intersecting for `threshold`
pub fn meets_threshold(ratio: f64, threshold: f64, touching: bool) -> bool {
    if threshold > 0.0 {
        ratio >= threshold
    } else {
        touching
    }
}

/// Viewport expanded (or shrunk) by the root margin
pub fn root_bounds(viewport: &DOMRect, options: &IntersectionOptions) -> DOMRect {
    let m = options.root_margin;
    viewport.expand(m.top, m.right, m.bottom, m.left)
}

struct Observer<C> {
    id: ObserverId,
    options: IntersectionOptions,
    /// Target and its last reported state
    observed: Vec<(NodeId, Option<bool>)>,
    callback: C,
}

impl<C> Observer<C> {
    fn check<R>(&mut self, viewport: &DOMRect, rect_of: &R) -> Vec<IntersectionEntry<NodeId>>
    where
        R: Fn(NodeId) -> DOMRect,
    {
        let root = root_bounds(viewport, &self.options);
        let mut entries = Vec::new();
        for (node, last) in &mut self.observed {
            let rect = rect_of(*node);
            let touching = rect.intersection(&root).is_some();
            let ratio = intersection_ratio(&rect, &root);
            let is_intersecting = meets_threshold(ratio, self.options.threshold, touching);

            if *last != Some(is_intersecting) {
                *last = Some(is_intersecting);
                entries.push(IntersectionEntry {
                    target: *node,
                    ratio,
                    is_intersecting,
                });
            }
        }
        entries
    }
}

/// All live observers of a window
pub struct IntersectionObserverManager<C> {
    observers: Vec<Observer<C>>,
    next_id: u32,
}

impl<C: Clone> IntersectionObserverManager<C> {
    pub fn new() -> Self {
        Self {
            observers: Vec::new(),
            next_id: 1,
        }
    }

    /// Create an observer watching `targets`
    pub fn create(
        &mut self,
        options: IntersectionOptions,
        targets: &[NodeId],
        callback: C,
    ) -> ObserverId {
        let id = ObserverId(self.next_id);
        self.next_id += 1;
        let mut observed: Vec<(NodeId, Option<bool>)> = Vec::with_capacity(targets.len());
        for &target in targets {
            if !observed.iter().any(|(n, _)| *n == target) {
                observed.push((target, None));
            }
        }
        tracing::trace!("Observer {:?} watching {} targets", id, observed.len());
        self.observers.push(Observer {
            id,
            options,
            observed,
            callback,
        });
        id
    }

    pub fn unobserve(&mut self, id: ObserverId, target: NodeId) {
        if let Some(observer) = self.observers.iter_mut().find(|o| o.id == id) {
            observer.observed.retain(|(n, _)| *n != target);
        }
    }

    pub fn is_observing(&self, id: ObserverId, target: NodeId) -> bool {
        self.observers
            .iter()
            .any(|o| o.id == id && o.observed.iter().any(|(n, _)| *n == target))
    }

    /// Number of targets still watched across all observers
    pub fn observed_count(&self) -> usize {
        self.observers.iter().map(|o| o.observed.len()).sum()
    }

    /// Recompute every observer, returning pending notifications
    pub fn process<R>(
        &mut self,
        viewport: DOMRect,
        rect_of: R,
    ) -> Vec<(ObserverId, C, Vec<IntersectionEntry<NodeId>>)>
    where
        R: Fn(NodeId) -> DOMRect,
    {
        let mut results = Vec::new();
        for observer in &mut self.observers {
            let entries = observer.check(&viewport, &rect_of);
            if !entries.is_empty() {
                results.push((observer.id, observer.callback.clone(), entries));
            }
        }
        results
    }
}

impl<C: Clone> Default for IntersectionObserverManager<C> {
    fn default() -> Self {
        Self::new()
    }
}
