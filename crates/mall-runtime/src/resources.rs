//! Resource fetches
//!
//! Nothing is fetched for real. Every request is recorded, and the driver
//! decides when (and whether) each URL completes.

use mall_dom::NodeId;

/// Outstanding and past fetches
pub struct ResourceLoader<C> {
    requested: Vec<String>,
    preloads: Vec<(String, C)>,
    element_fetches: Vec<(NodeId, String)>,
}

impl<C> ResourceLoader<C> {
    pub fn new() -> Self {
        Self {
            requested: Vec::new(),
            preloads: Vec::new(),
            element_fetches: Vec::new(),
        }
    }

    /// Detached image fetch (`new Image().src = url`)
    pub fn preload(&mut self, url: &str, on_settled: C) {
        tracing::trace!("Preloading {}", url);
        self.requested.push(url.to_string());
        self.preloads.push((url.to_string(), on_settled));
    }

    /// Fetch triggered by an element's `src`; replaces its previous fetch
    pub fn fetch_for(&mut self, node: NodeId, url: &str) {
        tracing::trace!("Fetching {} for {:?}", url, node);
        self.requested.push(url.to_string());
        self.element_fetches.retain(|(n, _)| *n != node);
        self.element_fetches.push((node, url.to_string()));
    }

    /// Media fetch with no element-level load event
    pub fn record(&mut self, url: &str) {
        self.requested.push(url.to_string());
    }

    /// Resolve every pending fetch of `url`
    pub fn settle(&mut self, url: &str) -> (Vec<C>, Vec<NodeId>) {
        let mut callbacks = Vec::new();
        let mut pending = Vec::new();
        for (u, cb) in std::mem::take(&mut self.preloads) {
            if u == url {
                callbacks.push(cb);
            } else {
                pending.push((u, cb));
            }
        }
        self.preloads = pending;

        let nodes = self
            .element_fetches
            .iter()
            .filter(|(_, u)| u == url)
            .map(|(n, _)| *n)
            .collect();
        self.element_fetches.retain(|(_, u)| u != url);
        (callbacks, nodes)
    }

    /// Times `url` was requested
    pub fn request_count(&self, url: &str) -> usize {
        self.requested.iter().filter(|u| *u == url).count()
    }

    pub fn requested(&self) -> &[String] {
        &self.requested
    }

    pub fn pending_count(&self) -> usize {
        self.preloads.len() + self.element_fetches.len()
    }
}

impl<C> Default for ResourceLoader<C> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mall_dom::HtmlParser;

    #[test]
    fn test_settle_only_matching_url() {
        let doc = HtmlParser::new().parse("<img><img>");
        let imgs = doc.query_selector_all("img").unwrap();

        let mut loader = ResourceLoader::new();
        loader.preload("images/hero.jpg", 1);
        loader.preload("images/logo.png", 2);
        loader.fetch_for(imgs[0], "images/hero.jpg");
        loader.fetch_for(imgs[1], "images/shop.jpg");

        let (callbacks, nodes) = loader.settle("images/hero.jpg");
        assert_eq!(callbacks, vec![1]);
        assert_eq!(nodes, vec![imgs[0]]);
        assert_eq!(loader.pending_count(), 2);

        let (callbacks, nodes) = loader.settle("images/hero.jpg");
        assert!(callbacks.is_empty() && nodes.is_empty());
    }

    #[test]
    fn test_refetch_replaces_pending() {
        let doc = HtmlParser::new().parse("<img>");
        let img = doc.select_one("img").unwrap();

        let mut loader: ResourceLoader<()> = ResourceLoader::new();
        loader.fetch_for(img, "a.jpg");
        loader.fetch_for(img, "b.jpg");
        assert_eq!(loader.pending_count(), 1);
        assert_eq!(loader.request_count("a.jpg"), 1);
        assert_eq!(loader.requested(), &["a.jpg".to_string(), "b.jpg".to_string()]);
    }
}
