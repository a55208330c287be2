use std::cell::RefCell;
use std::rc::Rc;

use mall_page::host::{
    EventHandler, IntersectionCallback, IntervalCallback, SettleCallback, TimeoutCallback,
};
use mall_page::{
    DomEvent, EventKind, EventTarget, Host, IntersectionEntry, IntersectionOptions, LoadOutcome,
    ObserverId, PageConfig, ReadyState, Rect, ScrollBehavior, TimeOfDay,
};
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::{
    Document, Element, HtmlElement, HtmlImageElement, HtmlMediaElement,
    IntersectionObserver, IntersectionObserverEntry, IntersectionObserverInit, KeyboardEvent,
    ScrollToOptions,
};

use crate::{page_config, ObserverRegistry, CONFIG_ELEMENT_ID};

thread_local! {
    // Swallows rejected play() promises (autoplay policy, aborted loads)
    static ABSORB_REJECTION: Closure<dyn FnMut(JsValue)> = Closure::new(|_: JsValue| {});
}

/// [`Host`] backed by the live page
#[derive(Clone)]
pub struct WebHost {
    window: web_sys::Window,
    document: Document,
    observers: Rc<RefCell<ObserverRegistry<IntersectionObserver>>>,
}

impl WebHost {
    pub fn new() -> Result<Self, JsValue> {
        let window = web_sys::window().ok_or_else(|| JsValue::from_str("no window"))?;
        let document = window
            .document()
            .ok_or_else(|| JsValue::from_str("no document"))?;
        Ok(Self {
            window,
            document,
            observers: Rc::new(RefCell::new(ObserverRegistry::new())),
        })
    }

    fn event_target(&self, target: &EventTarget<Element>) -> web_sys::EventTarget {
        match target {
            EventTarget::Window => self.window.clone().into(),
            EventTarget::Document => self.document.clone().into(),
            EventTarget::Element(el) => el.clone().into(),
        }
    }

    fn session_storage(&self) -> Option<web_sys::Storage> {
        self.window.session_storage().ok().flatten()
    }

    fn embedded_config(&self) -> Option<String> {
        self.document
            .get_element_by_id(CONFIG_ELEMENT_ID)
            .and_then(|el| el.text_content())
    }
}

fn as_media(node: &Element) -> Option<&HtmlMediaElement> {
    node.dyn_ref::<HtmlMediaElement>()
}

fn log_js_error(op: &str, result: Result<(), JsValue>) {
    if let Err(e) = result {
        tracing::warn!("{} failed: {:?}", op, e);
    }
}

impl Host for WebHost {
    type Node = Element;

    fn element_by_id(&self, id: &str) -> Option<Element> {
        self.document.get_element_by_id(id)
    }

    fn query_all(&self, selector: &str) -> Vec<Element> {
        let Ok(list) = self.document.query_selector_all(selector) else {
            tracing::warn!("query_all: bad selector {}", selector);
            return Vec::new();
        };
        (0..list.length())
            .filter_map(|i| list.get(i))
            .filter_map(|node| node.dyn_into::<Element>().ok())
            .collect()
    }

    fn query_within(&self, scope: &Element, selector: &str) -> Option<Element> {
        scope.query_selector(selector).ok().flatten()
    }

    fn body(&self) -> Option<Element> {
        self.document.body().map(Into::into)
    }

    fn parent(&self, node: &Element) -> Option<Element> {
        node.parent_element()
    }

    fn contains(&self, ancestor: &Element, node: &Element) -> bool {
        ancestor.contains(Some(node.as_ref()))
    }

    fn attribute(&self, node: &Element, name: &str) -> Option<String> {
        node.get_attribute(name)
    }

    fn set_attribute(&mut self, node: &Element, name: &str, value: &str) {
        log_js_error("set_attribute", node.set_attribute(name, value));
    }

    fn has_class(&self, node: &Element, class: &str) -> bool {
        node.class_list().contains(class)
    }

    fn add_class(&mut self, node: &Element, class: &str) {
        log_js_error("add_class", node.class_list().add_1(class));
    }

    fn remove_class(&mut self, node: &Element, class: &str) {
        log_js_error("remove_class", node.class_list().remove_1(class));
    }

    fn toggle_class(&mut self, node: &Element, class: &str) -> bool {
        node.class_list().toggle(class).unwrap_or(false)
    }

    fn set_style(&mut self, node: &Element, property: &str, value: &str) {
        if let Some(el) = node.dyn_ref::<HtmlElement>() {
            log_js_error("set_style", el.style().set_property(property, value));
        }
    }

    fn set_inner_html(&mut self, node: &Element, markup: &str) {
        node.set_inner_html(markup);
    }

    fn scroll_y(&self) -> f64 {
        self.window.scroll_y().unwrap_or(0.0)
    }

    fn viewport_height(&self) -> f64 {
        self.window
            .inner_height()
            .ok()
            .and_then(|h| h.as_f64())
            .unwrap_or(0.0)
    }

    fn offset_top(&self, node: &Element) -> f64 {
        node.dyn_ref::<HtmlElement>()
            .map_or(0.0, |el| f64::from(el.offset_top()))
    }

    fn offset_height(&self, node: &Element) -> f64 {
        node.dyn_ref::<HtmlElement>()
            .map_or(0.0, |el| f64::from(el.offset_height()))
    }

    fn bounding_client_rect(&self, node: &Element) -> Rect {
        let r = node.get_bounding_client_rect();
        Rect {
            x: r.x(),
            y: r.y(),
            width: r.width(),
            height: r.height(),
        }
    }

    fn scroll_to(&mut self, top: f64, behavior: ScrollBehavior) {
        let options = ScrollToOptions::new();
        options.set_top(top);
        options.set_behavior(match behavior {
            ScrollBehavior::Auto => web_sys::ScrollBehavior::Auto,
            ScrollBehavior::Smooth => web_sys::ScrollBehavior::Smooth,
        });
        self.window.scroll_to_with_scroll_to_options(&options);
    }

    fn ready_state(&self, media: &Element) -> ReadyState {
        match as_media(media).map_or(0, |m| m.ready_state()) {
            0 => ReadyState::HaveNothing,
            1 => ReadyState::HaveMetadata,
            2 => ReadyState::HaveCurrentData,
            3 => ReadyState::HaveFutureData,
            _ => ReadyState::HaveEnoughData,
        }
    }

    fn is_paused(&self, media: &Element) -> bool {
        as_media(media).is_none_or(|m| m.paused())
    }

    fn play(&mut self, media: &Element) {
        let Some(media) = as_media(media) else {
            return;
        };
        if let Ok(promise) = media.play() {
            ABSORB_REJECTION.with(|absorb| {
                let _ = promise.catch(absorb);
            });
        }
    }

    fn pause(&mut self, media: &Element) {
        if let Some(media) = as_media(media) {
            log_js_error("pause", media.pause());
        }
    }

    fn set_current_time(&mut self, media: &Element, seconds: f64) {
        if let Some(media) = as_media(media) {
            media.set_current_time(seconds);
        }
    }

    fn load(&mut self, media: &Element) {
        if let Some(media) = as_media(media) {
            media.load();
        }
    }

    fn session_item(&self, key: &str) -> Option<String> {
        self.session_storage()?.get_item(key).ok().flatten()
    }

    fn set_session_item(&mut self, key: &str, value: &str) {
        if let Some(storage) = self.session_storage() {
            log_js_error("sessionStorage.setItem", storage.set_item(key, value));
        }
    }

    fn listen(&mut self, target: EventTarget<Element>, kind: EventKind, mut handler: EventHandler<Self>) {
        let mut host = self.clone();
        let callback = Closure::wrap(Box::new(move |event: web_sys::Event| {
            let origin = event.target().and_then(|t| t.dyn_into::<Element>().ok());
            let mut dom_event = match event.dyn_ref::<KeyboardEvent>() {
                Some(key_event) => DomEvent::key_down(&key_event.key(), origin),
                None => DomEvent::new(kind, origin),
            };
            handler(&mut host, &mut dom_event);
            if dom_event.is_propagation_stopped() {
                event.stop_propagation();
            }
            if dom_event.is_default_prevented() {
                event.prevent_default();
            }
        }) as Box<dyn FnMut(web_sys::Event)>);

        let result = self
            .event_target(&target)
            .add_event_listener_with_callback(kind.as_str(), callback.as_ref().unchecked_ref());
        log_js_error("addEventListener", result);
        callback.forget();
    }

    fn set_timeout(&mut self, delay_ms: u32, callback: TimeoutCallback<Self>) {
        let mut host = self.clone();
        let once = Closure::once_into_js(move || callback(&mut host));
        let delay = i32::try_from(delay_ms).unwrap_or(i32::MAX);
        if let Err(e) = self
            .window
            .set_timeout_with_callback_and_timeout_and_arguments_0(once.unchecked_ref(), delay)
        {
            tracing::warn!("setTimeout failed: {:?}", e);
        }
    }

    fn set_interval(&mut self, period_ms: u32, mut callback: IntervalCallback<Self>) {
        let mut host = self.clone();
        let tick = Closure::wrap(Box::new(move || callback(&mut host)) as Box<dyn FnMut()>);
        let period = i32::try_from(period_ms).unwrap_or(i32::MAX);
        match self
            .window
            .set_interval_with_callback_and_timeout_and_arguments_0(tick.as_ref().unchecked_ref(), period)
        {
            Ok(_) => tick.forget(),
            Err(e) => tracing::warn!("setInterval failed: {:?}", e),
        }
    }

    fn observe(
        &mut self,
        options: IntersectionOptions,
        targets: &[Element],
        mut callback: IntersectionCallback<Self>,
    ) -> ObserverId {
        let id = self.observers.borrow_mut().next_id();
        let mut host = self.clone();
        let notify = Closure::wrap(Box::new(move |entries: js_sys::Array, _: IntersectionObserver| {
            let entries = entries
                .iter()
                .filter_map(|e| e.dyn_into::<IntersectionObserverEntry>().ok())
                .map(|e| IntersectionEntry {
                    target: e.target(),
                    ratio: e.intersection_ratio(),
                    is_intersecting: e.is_intersecting(),
                })
                .collect();
            callback(&mut host, id, entries);
        }) as Box<dyn FnMut(js_sys::Array, IntersectionObserver)>);

        let init = IntersectionObserverInit::new();
        init.set_root_margin(&options.root_margin.to_css());
        init.set_threshold(&JsValue::from_f64(options.threshold));

        match IntersectionObserver::new_with_options(notify.as_ref().unchecked_ref(), &init) {
            Ok(observer) => {
                for target in targets {
                    observer.observe(target);
                }
                self.observers.borrow_mut().insert(id, observer);
                notify.forget();
            }
            Err(e) => tracing::warn!("IntersectionObserver unavailable: {:?}", e),
        }
        id
    }

    fn unobserve(&mut self, observer: ObserverId, target: &Element) {
        if let Some(observer) = self.observers.borrow().get(observer) {
            observer.unobserve(target);
        }
    }

    fn preload_image(&mut self, url: &str, on_settled: SettleCallback<Self>) {
        let image = match HtmlImageElement::new() {
            Ok(image) => image,
            Err(e) => {
                tracing::warn!("Image preload unavailable: {:?}", e);
                on_settled(self, LoadOutcome::Failed);
                return;
            }
        };

        // load and error share one callback; whichever fires first takes it
        let pending = Rc::new(RefCell::new(Some(on_settled)));
        let settle = |outcome: LoadOutcome| {
            let pending = Rc::clone(&pending);
            let mut host = self.clone();
            Closure::wrap(Box::new(move || {
                if let Some(callback) = pending.borrow_mut().take() {
                    callback(&mut host, outcome);
                }
            }) as Box<dyn FnMut()>)
        };
        let onload = settle(LoadOutcome::Loaded);
        let onerror = settle(LoadOutcome::Failed);
        image.set_onload(Some(onload.as_ref().unchecked_ref()));
        image.set_onerror(Some(onerror.as_ref().unchecked_ref()));
        onload.forget();
        onerror.forget();
        image.set_src(url);
    }

    fn time_of_day(&self) -> TimeOfDay {
        let now = js_sys::Date::new_0();
        TimeOfDay::new(now.get_hours() as u8, now.get_minutes() as u8)
    }
}

/// Module start: wire the storefront behaviors
#[wasm_bindgen(start)]
pub fn start() -> Result<(), JsValue> {
    let mut host = WebHost::new()?;
    let config = page_config(host.embedded_config().as_deref()).unwrap_or_else(|e| {
        tracing::warn!("Ignoring #{}: {}", CONFIG_ELEMENT_ID, e);
        PageConfig::default()
    });

    // The module usually finishes loading after DOMContentLoaded has fired
    if host.document.ready_state() == "loading" {
        mall_page::boot(&mut host, config);
    } else {
        mall_page::init(&mut host, &config);
    }
    Ok(())
}
