//! Sends the zoom keystrokes to the live page (wasm32 only).

use std::cell::RefCell;
use std::rc::Rc;

use gloo_timers::callback::Timeout;
use gloo_timers::future::TimeoutFuture;
use wasm_bindgen::{JsCast, JsValue};
use web_sys::{
    Document, Element, Event, EventInit, HtmlInputElement, KeyboardEvent, KeyboardEventInit, Node,
};

use super::{
    parse_zoom_label, search_text, target_by_steps, typing_sequence, KeyStroke, PendingZoom,
    ZoomDirection, AFTER_ENTER_MS, DEBOUNCE_MS, DEFAULT_ZOOM, ENTER_DELAY_MS,
    MENU_SEARCH_DELAY_MS, MENU_SEARCH_SELECTORS, SEARCH_RETRY_MS, ZOOM_OPTION_SELECTOR,
};
use crate::error::{Result, SheetlightError};

struct DriverState {
    pending: PendingZoom,
    debounce: Option<Timeout>,
}

/// Debounced zoom requests for one page.
#[derive(Clone)]
pub struct ZoomDriver {
    document: Document,
    state: Rc<RefCell<DriverState>>,
    /// Run once the host has had time to relayout after a zoom
    on_complete: Rc<dyn Fn()>,
}

impl ZoomDriver {
    pub fn new(document: Document, on_complete: impl Fn() + 'static) -> Self {
        Self {
            document,
            state: Rc::new(RefCell::new(DriverState {
                pending: PendingZoom::default(),
                debounce: None,
            })),
            on_complete: Rc::new(on_complete),
        }
    }

    /// Record a press and (re)start the debounce timer.
    pub fn request(&self, direction: ZoomDirection) {
        let Ok(mut state) = self.state.try_borrow_mut() else {
            tracing::warn!("zoom request while driver busy");
            return;
        };
        state.pending.press(direction);

        // Replacing the timeout drops, and so cancels, the previous one.
        let driver = self.clone();
        state.debounce = Some(Timeout::new(DEBOUNCE_MS, move || driver.apply_pending()));
    }

    fn apply_pending(&self) {
        let steps = match self.state.try_borrow_mut() {
            Ok(mut state) => {
                state.debounce = None;
                state.pending.take()
            }
            Err(_) => return,
        };
        let Some(steps) = steps else {
            return;
        };

        let current = current_zoom(&self.document);
        let target = target_by_steps(current, steps);
        tracing::debug!(current, steps, target, "applying zoom");

        let driver = self.clone();
        wasm_bindgen_futures::spawn_local(async move {
            if let Err(e) = driver.apply_zoom(target).await {
                tracing::warn!(error = %e, "zoom failed");
            }
            TimeoutFuture::new(AFTER_ENTER_MS).await;
            (driver.on_complete)();
        });
    }

    async fn apply_zoom(&self, target: u32) -> Result<()> {
        let root = self
            .document
            .document_element()
            .ok_or_else(|| SheetlightError::Dom("no document element".to_string()))?;
        let open = KeyStroke::open_menu_search();
        dispatch_key(&root, "keydown", &open)?;
        dispatch_key(&root, "keyup", &open)?;

        let text = search_text(target);
        TimeoutFuture::new(MENU_SEARCH_DELAY_MS).await;
        if self.fill_search(&text).await? {
            return Ok(());
        }
        TimeoutFuture::new(SEARCH_RETRY_MS).await;
        if self.fill_search(&text).await? {
            return Ok(());
        }

        tracing::debug!("menu search box not found, typing keystrokes");
        let focused = self.document.active_element().filter(|element| {
            let node: &Node = element;
            !self
                .document
                .body()
                .is_some_and(|body| body.is_same_node(Some(node)))
        });
        let target_element = focused.unwrap_or(root);
        for stroke in typing_sequence(&text) {
            dispatch_key(&target_element, "keydown", &stroke)?;
            if stroke.key.chars().count() == 1 {
                dispatch_key(&target_element, "keypress", &stroke)?;
            }
            dispatch_key(&target_element, "keyup", &stroke)?;
        }
        Ok(())
    }

    /// Fill the menu search box and press Enter. `Ok(false)` when the box is not open.
    async fn fill_search(&self, text: &str) -> Result<bool> {
        let Some(input) = find_menu_search_input(&self.document) else {
            return Ok(false);
        };
        input.focus().map_err(|e| SheetlightError::dom(&e))?;
        input.select();
        input.set_value(text);

        let init = EventInit::new();
        init.set_bubbles(true);
        let event =
            Event::new_with_event_init_dict("input", &init).map_err(|e| SheetlightError::dom(&e))?;
        input
            .dispatch_event(&event)
            .map_err(|e| SheetlightError::dom(&e))?;

        TimeoutFuture::new(ENTER_DELAY_MS).await;
        let target: Element = self
            .document
            .active_element()
            .unwrap_or_else(|| input.clone().into());
        let enter = KeyStroke::enter();
        for kind in ["keydown", "keypress", "keyup"] {
            dispatch_key(&target, kind, &enter)?;
        }
        Ok(true)
    }
}

fn current_zoom(document: &Document) -> u32 {
    document
        .query_selector(ZOOM_OPTION_SELECTOR)
        .ok()
        .flatten()
        .and_then(|option| option.get_attribute("aria-label"))
        .map_or(DEFAULT_ZOOM, |label| parse_zoom_label(&label))
}

/// First visible input matching the menu search selectors.
fn find_menu_search_input(document: &Document) -> Option<HtmlInputElement> {
    MENU_SEARCH_SELECTORS.iter().find_map(|selector| {
        let list = document.query_selector_all(selector).ok()?;
        (0..list.length())
            .filter_map(|index| list.item(index))
            .filter_map(|node| node.dyn_into::<HtmlInputElement>().ok())
            .find(|input| input.offset_parent().is_some())
    })
}

fn dispatch_key(target: &Element, kind: &str, stroke: &KeyStroke) -> Result<()> {
    let init = KeyboardEventInit::new();
    init.set_key(&stroke.key);
    init.set_code(&stroke.code);
    init.set_alt_key(stroke.alt);
    init.set_bubbles(true);
    init.set_cancelable(true);
    // keyCode/which are read-only legacy fields missing from the init dictionary.
    for field in ["keyCode", "which"] {
        js_sys::Reflect::set(&init, &JsValue::from_str(field), &JsValue::from(stroke.key_code))
            .map_err(|e| SheetlightError::dom(&e))?;
    }
    let event = KeyboardEvent::new_with_keyboard_event_init_dict(kind, &init)
        .map_err(|e| SheetlightError::dom(&e))?;
    target
        .dispatch_event(&event)
        .map_err(|e| SheetlightError::dom(&e))?;
    Ok(())
}
