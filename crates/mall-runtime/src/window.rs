//! Headless window
//!
//! A [`Host`] over an arena [`Document`] with a virtual clock. Nothing
//! happens on its own: the driver methods (`content_loaded`, `click`, `advance_time`,
//! `complete_resource`, ...) push the page forward one step at a time, and
//! intersection observers are re-evaluated after every step.

use std::cell::RefCell;
use std::rc::Rc;

use mall_dom::{DOMRect, Document, ElementGeometry, HtmlParser, MediaState, NodeId};
use mall_page::host::{
    EventHandler, IntersectionCallback, IntervalCallback, SettleCallback, TimeoutCallback,
};
use mall_page::{
    DomEvent, EventKind, EventTarget, Host, IntersectionOptions, LoadOutcome, ObserverId,
    PageConfig, ReadyState, Rect, ScrollBehavior, TimeOfDay,
};

use crate::events::ListenerRegistry;
use crate::intersection::IntersectionObserverManager;
use crate::resources::ResourceLoader;
use crate::storage::SessionStorage;
use crate::timers::{Timer, TimerQueue};
use crate::{Result, RuntimeError};

const MINUTES_PER_DAY: u64 = 24 * 60;

/// Whether `play()` is honored without a user gesture
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum AutoplayPolicy {
    #[default]
    Allowed,
    /// Every `play()` request is rejected
    Blocked,
}

/// Window construction options
#[derive(Debug, Clone)]
pub struct WindowOptions {
    pub viewport_width: f64,
    pub viewport_height: f64,
    /// Wall-clock time at `now_ms == 0`
    pub time_of_day: TimeOfDay,
    pub autoplay: AutoplayPolicy,
    /// Maximum timers run by a single `advance_time`
    pub timer_step_limit: usize,
}

impl Default for WindowOptions {
    fn default() -> Self {
        Self {
            viewport_width: 1280.0,
            viewport_height: 800.0,
            time_of_day: TimeOfDay::new(10, 0),
            autoplay: AutoplayPolicy::Allowed,
            timer_step_limit: 10_000,
        }
    }
}

enum TimerTask {
    Once(TimeoutCallback<Window>),
    Repeat(Rc<RefCell<IntervalCallback<Window>>>),
}

type SharedIntersectionCallback = Rc<RefCell<IntersectionCallback<Window>>>;

/// Headless browser window
pub struct Window {
    document: Document,
    options: WindowOptions,
    scroll_y: f64,
    last_scroll_behavior: Option<ScrollBehavior>,
    now_ms: u64,
    timers: TimerQueue<TimerTask>,
    listeners: ListenerRegistry<EventHandler<Window>>,
    observers: IntersectionObserverManager<SharedIntersectionCallback>,
    updating_intersections: bool,
    intersections_dirty: bool,
    session: SessionStorage,
    resources: ResourceLoader<SettleCallback<Window>>,
}

impl Window {
    pub fn new(document: Document) -> Self {
        Self {
            document,
            options: WindowOptions::default(),
            scroll_y: 0.0,
            last_scroll_behavior: None,
            now_ms: 0,
            timers: TimerQueue::new(),
            listeners: ListenerRegistry::new(),
            observers: IntersectionObserverManager::new(),
            updating_intersections: false,
            intersections_dirty: false,
            session: SessionStorage::new(),
            resources: ResourceLoader::new(),
        }
    }

    /// Parse `html` into a fresh window
    pub fn from_html(html: &str) -> Self {
        Self::new(HtmlParser::new().parse(html))
    }

    pub fn with_options(mut self, options: WindowOptions) -> Self {
        self.options = options;
        self
    }

    /// Continue an existing browsing session (a reload in the same tab)
    pub fn with_session(mut self, session: SessionStorage) -> Self {
        self.session = session;
        self
    }

    /// Register the page behaviors and fire `DOMContentLoaded`
    pub fn boot(&mut self, config: PageConfig) {
        mall_page::boot(self, config);
        self.content_loaded();
    }

    // Driver

    /// Fire `DOMContentLoaded`
    pub fn content_loaded(&mut self) {
        tracing::debug!("DOMContentLoaded at {}ms", self.now_ms);
        self.dispatch(
            EventTarget::Document,
            DomEvent::new(EventKind::DomContentLoaded, None),
        );
        self.update_intersections();
    }

    /// Place the first element matching `selector` in document coordinates
    pub fn set_layout(&mut self, selector: &str, rect: DOMRect) -> Result<()> {
        let node = self.select(selector)?;
        self.set_layout_of(node, rect)
    }

    pub fn set_layout_of(&mut self, node: NodeId, rect: DOMRect) -> Result<()> {
        self.document
            .set_geometry(node, ElementGeometry::from_rect(rect))?;
        self.update_intersections();
        Ok(())
    }

    /// User scroll to an absolute offset
    pub fn scroll_window(&mut self, y: f64) {
        self.apply_scroll(y, ScrollBehavior::Auto);
        self.update_intersections();
    }

    /// Click the first element matching `selector`. Returns the event after
    /// dispatch so callers can inspect `preventDefault`.
    pub fn click(&mut self, selector: &str) -> Result<DomEvent<NodeId>> {
        let node = self.select(selector)?;
        Ok(self.click_node(node))
    }

    pub fn click_node(&mut self, node: NodeId) -> DomEvent<NodeId> {
        let event = self.dispatch(
            EventTarget::Element(node),
            DomEvent::new(EventKind::Click, Some(node)),
        );
        self.update_intersections();
        event
    }

    pub fn pointer_enter(&mut self, selector: &str) -> Result<()> {
        self.pointer(selector, EventKind::PointerEnter)
    }

    pub fn pointer_leave(&mut self, selector: &str) -> Result<()> {
        self.pointer(selector, EventKind::PointerLeave)
    }

    fn pointer(&mut self, selector: &str, kind: EventKind) -> Result<()> {
        let node = self.select(selector)?;
        self.dispatch(EventTarget::Element(node), DomEvent::new(kind, Some(node)));
        self.update_intersections();
        Ok(())
    }

    /// Key press with nothing focused; targets `<body>`
    pub fn key_down(&mut self, key: &str) {
        let body = self.document.body();
        let target = body.map_or(EventTarget::Document, EventTarget::Element);
        self.dispatch(target, DomEvent::key_down(key, body));
        self.update_intersections();
    }

    /// Move the clock forward, running due timers in order
    pub fn advance_time(&mut self, delta_ms: i64) -> Result<usize> {
        let Ok(delta) = u64::try_from(delta_ms) else {
            return Err(RuntimeError::NegativeTime(delta_ms));
        };
        let from = self.now_ms;
        let target = from.saturating_add(delta);
        let mut steps = 0usize;
        while let Some(timer) = self.timers.pop_due(target) {
            steps += 1;
            if steps > self.options.timer_step_limit {
                return Err(RuntimeError::TimerStepLimit {
                    limit: self.options.timer_step_limit,
                    now_ms: self.now_ms,
                });
            }
            self.now_ms = self.now_ms.max(timer.due_at);
            self.run_timer(timer);
            self.update_intersections();
        }
        tracing::trace!("[timer] advance from={} to={} ran={}", from, target, steps);
        self.now_ms = target;
        Ok(steps)
    }

    fn run_timer(&mut self, timer: Timer<TimerTask>) {
        match timer.payload {
            TimerTask::Once(callback) => callback(self),
            TimerTask::Repeat(callback) => {
                if let Some(period) = timer.interval_ms {
                    self.timers.rearm(
                        timer.due_at,
                        timer.id,
                        period,
                        TimerTask::Repeat(Rc::clone(&callback)),
                    );
                }
                match callback.try_borrow_mut() {
                    Ok(mut f) => (&mut *f)(self),
                    Err(_) => tracing::warn!("Interval {:?} re-entered, skipped", timer.id),
                };
            }
        }
    }

    /// Finish every pending fetch of `url` successfully
    pub fn complete_resource(&mut self, url: &str) -> usize {
        self.settle_resource(url, LoadOutcome::Loaded)
    }

    /// Fail every pending fetch of `url`
    pub fn fail_resource(&mut self, url: &str) -> usize {
        self.settle_resource(url, LoadOutcome::Failed)
    }

    fn settle_resource(&mut self, url: &str, outcome: LoadOutcome) -> usize {
        let (callbacks, nodes) = self.resources.settle(url);
        let settled = callbacks.len() + nodes.len();
        tracing::debug!("Resource {} settled {:?} ({} waiters)", url, outcome, settled);

        for callback in callbacks {
            callback(self, outcome);
        }
        let kind = match outcome {
            LoadOutcome::Loaded => EventKind::Load,
            LoadOutcome::Failed => EventKind::Error,
        };
        for node in nodes {
            self.dispatch(EventTarget::Element(node), DomEvent::new(kind, Some(node)));
        }
        self.update_intersections();
        settled
    }

    /// Buffer the media element matching `selector` up to `state`, firing
    /// `loadeddata` when it first has current data
    pub fn set_media_ready(&mut self, selector: &str, state: mall_dom::ReadyState) -> Result<()> {
        let node = self.select(selector)?;
        let media = self
            .document
            .media_mut(node)
            .ok_or_else(|| RuntimeError::NotMedia(selector.to_string()))?;
        if media.set_ready_state(state) {
            self.dispatch(
                EventTarget::Element(node),
                DomEvent::new(EventKind::LoadedData, Some(node)),
            );
            self.update_intersections();
        }
        Ok(())
    }

    /// Fire `error` at the media element matching `selector`
    pub fn fail_media(&mut self, selector: &str) -> Result<()> {
        let node = self.select(selector)?;
        if self.document.media(node).is_none() {
            return Err(RuntimeError::NotMedia(selector.to_string()));
        }
        self.dispatch(
            EventTarget::Element(node),
            DomEvent::new(EventKind::Error, Some(node)),
        );
        self.update_intersections();
        Ok(())
    }

    // Inspection

    pub fn document(&self) -> &Document {
        &self.document
    }

    pub fn select(&self, selector: &str) -> Result<NodeId> {
        Ok(self.document.select_one(selector)?)
    }

    /// Whether anything matches, e.g. `exists("#navbar.scrolled")`
    pub fn exists(&self, selector: &str) -> Result<bool> {
        Ok(self.document.query_selector(selector)?.is_some())
    }

    pub fn count(&self, selector: &str) -> Result<usize> {
        Ok(self.document.query_selector_all(selector)?.len())
    }

    pub fn attribute_of(&self, selector: &str, name: &str) -> Result<Option<String>> {
        Ok(self.document.attr(self.select(selector)?, name))
    }

    pub fn style_of(&self, selector: &str, property: &str) -> Result<Option<String>> {
        Ok(self.document.style(self.select(selector)?, property))
    }

    pub fn inner_html_of(&self, selector: &str) -> Result<Option<String>> {
        Ok(self.document.inner_html(self.select(selector)?))
    }

    pub fn media_of(&self, selector: &str) -> Result<MediaState> {
        self.document
            .media(self.select(selector)?)
            .cloned()
            .ok_or_else(|| RuntimeError::NotMedia(selector.to_string()))
    }

    pub fn now_ms(&self) -> u64 {
        self.now_ms
    }

    /// Behavior of the most recent programmatic scroll
    pub fn last_scroll_behavior(&self) -> Option<ScrollBehavior> {
        self.last_scroll_behavior
    }

    pub fn session(&self) -> &SessionStorage {
        &self.session
    }

    /// End this page, keeping its session for the next one
    pub fn into_session(self) -> SessionStorage {
        self.session
    }

    pub fn request_count(&self, url: &str) -> usize {
        self.resources.request_count(url)
    }

    pub fn requested_urls(&self) -> &[String] {
        self.resources.requested()
    }

    pub fn pending_timers(&self) -> usize {
        self.timers.len()
    }

    pub fn listener_count(&self, target: &EventTarget<NodeId>, kind: EventKind) -> usize {
        self.listeners.count(target, kind)
    }

    /// Targets still watched by intersection observers
    pub fn observed_count(&self) -> usize {
        self.observers.observed_count()
    }

    // Internals

    /// Run listeners along the propagation path. Listeners on one hop all
    /// run even if one of them stops propagation.
    pub(crate) fn dispatch(
        &mut self,
        target: EventTarget<NodeId>,
        mut event: DomEvent<NodeId>,
    ) -> DomEvent<NodeId> {
        tracing::trace!("Dispatch {} at {:?}", event.kind, target);
        for hop in self.propagation_path(&target, event.kind) {
            for handler in self.listeners.matching(&hop, event.kind) {
                match handler.try_borrow_mut() {
                    Ok(mut f) => (&mut *f)(self, &mut event),
                    Err(_) => tracing::warn!("Listener for {} re-entered, skipped", event.kind),
                };
            }
            if event.is_propagation_stopped() {
                break;
            }
        }
        event
    }

    fn propagation_path(
        &self,
        target: &EventTarget<NodeId>,
        kind: EventKind,
    ) -> Vec<EventTarget<NodeId>> {
        let mut path = vec![target.clone()];
        if !kind.bubbles() {
            return path;
        }
        if let EventTarget::Element(node) = target {
            let tree = self.document.tree();
            path.extend(
                tree.ancestors(*node)
                    .filter(|&a| tree.element(a).is_some())
                    .map(EventTarget::Element),
            );
            path.push(EventTarget::Document);
        }
        if *target != EventTarget::Window {
            path.push(EventTarget::Window);
        }
        path
    }

    fn apply_scroll(&mut self, top: f64, behavior: ScrollBehavior) {
        self.last_scroll_behavior = Some(behavior);
        let mut y = top.max(0.0);
        let content = self.document.content_height();
        if content > 0.0 {
            y = y.min((content - self.options.viewport_height).max(0.0));
        }
        if y == self.scroll_y {
            return;
        }
        tracing::trace!("Scroll {} -> {} ({:?})", self.scroll_y, y, behavior);
        self.scroll_y = y;
        self.dispatch(EventTarget::Window, DomEvent::new(EventKind::Scroll, None));
    }

    fn viewport(&self) -> DOMRect {
        DOMRect::from_xywh(
            0.0,
            0.0,
            self.options.viewport_width,
            self.options.viewport_height,
        )
    }

    fn update_intersections(&mut self) {
        if self.updating_intersections {
            self.intersections_dirty = true;
            return;
        }
        self.updating_intersections = true;
        loop {
            self.intersections_dirty = false;
            let viewport = self.viewport();
            let scroll_y = self.scroll_y;
            let document = &self.document;
            let pending = self.observers.process(viewport, |node| {
                document.geometry(node).bounding_client_rect(0.0, scroll_y)
            });
            for (id, callback, entries) in pending {
                match callback.try_borrow_mut() {
                    Ok(mut f) => (&mut *f)(self, id, entries),
                    Err(_) => tracing::warn!("Observer {:?} re-entered, skipped", id),
                };
            }
            if !self.intersections_dirty {
                break;
            }
        }
        self.updating_intersections = false;
    }

    fn log_dom_error(&self, op: &str, result: mall_dom::Result<()>) {
        if let Err(e) = result {
            tracing::warn!("{} failed: {}", op, e);
        }
    }
}

fn to_page_ready_state(state: mall_dom::ReadyState) -> ReadyState {
    match state {
        mall_dom::ReadyState::HaveNothing => ReadyState::HaveNothing,
        mall_dom::ReadyState::HaveMetadata => ReadyState::HaveMetadata,
        mall_dom::ReadyState::HaveCurrentData => ReadyState::HaveCurrentData,
        mall_dom::ReadyState::HaveFutureData => ReadyState::HaveFutureData,
        mall_dom::ReadyState::HaveEnoughData => ReadyState::HaveEnoughData,
    }
}

impl Host for Window {
    type Node = NodeId;

    fn element_by_id(&self, id: &str) -> Option<NodeId> {
        self.document.get_element_by_id(id)
    }

    fn query_all(&self, selector: &str) -> Vec<NodeId> {
        self.document
            .query_selector_all(selector)
            .unwrap_or_else(|e| {
                tracing::warn!("query_all: {}", e);
                Vec::new()
            })
    }

    fn query_within(&self, scope: &NodeId, selector: &str) -> Option<NodeId> {
        self.document.query_within(*scope, selector).ok().flatten()
    }

    fn body(&self) -> Option<NodeId> {
        self.document.body()
    }

    fn parent(&self, node: &NodeId) -> Option<NodeId> {
        let tree = self.document.tree();
        tree.parent(*node).filter(|&p| tree.element(p).is_some())
    }

    fn contains(&self, ancestor: &NodeId, node: &NodeId) -> bool {
        self.document.tree().contains(*ancestor, *node)
    }

    fn attribute(&self, node: &NodeId, name: &str) -> Option<String> {
        self.document.attr(*node, name)
    }

    fn set_attribute(&mut self, node: &NodeId, name: &str, value: &str) {
        let result = self.document.set_attr(*node, name, value);
        self.log_dom_error("set_attribute", result);
        let is_img = self
            .document
            .tree()
            .element(*node)
            .is_some_and(|e| e.tag == "img");
        if name == "src" && is_img {
            self.resources.fetch_for(*node, value);
        }
    }

    fn has_class(&self, node: &NodeId, class: &str) -> bool {
        self.document.has_class(*node, class)
    }

    fn add_class(&mut self, node: &NodeId, class: &str) {
        let result = self.document.add_class(*node, class);
        self.log_dom_error("add_class", result);
    }

    fn remove_class(&mut self, node: &NodeId, class: &str) {
        let result = self.document.remove_class(*node, class);
        self.log_dom_error("remove_class", result);
    }

    fn toggle_class(&mut self, node: &NodeId, class: &str) -> bool {
        self.document.toggle_class(*node, class).unwrap_or_else(|e| {
            tracing::warn!("toggle_class failed: {}", e);
            false
        })
    }

    fn set_style(&mut self, node: &NodeId, property: &str, value: &str) {
        let result = self.document.set_style(*node, property, value);
        self.log_dom_error("set_style", result);
    }

    fn set_inner_html(&mut self, node: &NodeId, markup: &str) {
        let result = self.document.set_inner_html(*node, markup);
        self.log_dom_error("set_inner_html", result);
    }

    fn scroll_y(&self) -> f64 {
        self.scroll_y
    }

    fn viewport_height(&self) -> f64 {
        self.options.viewport_height
    }

    fn offset_top(&self, node: &NodeId) -> f64 {
        self.document.geometry(*node).offset_top
    }

    fn offset_height(&self, node: &NodeId) -> f64 {
        self.document.geometry(*node).offset_height
    }

    fn bounding_client_rect(&self, node: &NodeId) -> Rect {
        let r = self.document.geometry(*node).bounding_client_rect(0.0, self.scroll_y);
        Rect {
            x: r.x,
            y: r.y,
            width: r.width,
            height: r.height,
        }
    }

    /// Smooth scrolls land immediately; only the requested behavior is kept
    fn scroll_to(&mut self, top: f64, behavior: ScrollBehavior) {
        self.apply_scroll(top, behavior);
        self.update_intersections();
    }

    fn ready_state(&self, media: &NodeId) -> ReadyState {
        self.document
            .media(*media)
            .map_or(ReadyState::HaveNothing, |m| to_page_ready_state(m.ready_state))
    }

    fn is_paused(&self, media: &NodeId) -> bool {
        self.document.media(*media).is_none_or(|m| m.paused)
    }

    fn play(&mut self, media: &NodeId) {
        if self.options.autoplay == AutoplayPolicy::Blocked {
            tracing::debug!("play() on {:?} rejected by autoplay policy", media);
            return;
        }
        if let Some(state) = self.document.media_mut(*media) {
            state.play();
        }
    }

    fn pause(&mut self, media: &NodeId) {
        if let Some(state) = self.document.media_mut(*media) {
            state.pause();
        }
    }

    fn set_current_time(&mut self, media: &NodeId, seconds: f64) {
        if let Some(state) = self.document.media_mut(*media) {
            state.seek(seconds);
        }
    }

    fn load(&mut self, media: &NodeId) {
        let src = self
            .document
            .query_within(*media, "source[src]")
            .ok()
            .flatten()
            .and_then(|source| self.document.attr(source, "src"))
            .or_else(|| self.document.attr(*media, "src"))
            .unwrap_or_default();
        let Some(state) = self.document.media_mut(*media) else {
            return;
        };
        state.load(&src);
        if !src.is_empty() {
            self.resources.record(&src);
        }
    }

    fn session_item(&self, key: &str) -> Option<String> {
        self.session.get(key).map(str::to_string)
    }

    fn set_session_item(&mut self, key: &str, value: &str) {
        self.session.set(key, value);
    }

    fn listen(&mut self, target: EventTarget<NodeId>, kind: EventKind, handler: EventHandler<Self>) {
        self.listeners.add(target, kind, handler);
    }

    fn set_timeout(&mut self, delay_ms: u32, callback: TimeoutCallback<Self>) {
        self.timers
            .set_timeout(self.now_ms, u64::from(delay_ms), TimerTask::Once(callback));
    }

    fn set_interval(&mut self, period_ms: u32, callback: IntervalCallback<Self>) {
        self.timers.set_interval(
            self.now_ms,
            u64::from(period_ms),
            TimerTask::Repeat(Rc::new(RefCell::new(callback))),
        );
    }

    fn observe(
        &mut self,
        options: IntersectionOptions,
        targets: &[NodeId],
        callback: IntersectionCallback<Self>,
    ) -> ObserverId {
        self.observers
            .create(options, targets, Rc::new(RefCell::new(callback)))
    }

    fn unobserve(&mut self, observer: ObserverId, target: &NodeId) {
        self.observers.unobserve(observer, *target);
    }

    fn preload_image(&mut self, url: &str, on_settled: SettleCallback<Self>) {
        self.resources.preload(url, on_settled);
    }

    fn time_of_day(&self) -> TimeOfDay {
        let start = u64::from(self.options.time_of_day.hour) * 60
            + u64::from(self.options.time_of_day.minute);
        let minutes = (start + self.now_ms / 60_000) % MINUTES_PER_DAY;
        TimeOfDay::new((minutes / 60) as u8, (minutes % 60) as u8)
    }
}
