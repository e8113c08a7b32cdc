//! Browser entry point (wasm32 only).
//!
//! Wires the window events, the settings store and the runtime channel to a
//! shared [`HighlighterApp`]. Every listener runs the pipeline to completion
//! before returning; a trigger that arrives while a cycle holds the app
//! (re-entrant DOM events) is dropped, since the running cycle already sees
//! the latest DOM.

use std::cell::RefCell;
use std::rc::Rc;

use js_sys::Function;
use serde_json::{Map, Value};
use wasm_bindgen::prelude::*;
use web_sys::{AddEventListenerOptions, Event};

use super::chrome;
use super::{CommandEffect, HighlighterApp, MessageEffect};
use crate::commands::Command;
use crate::dom::web::{WebDocument, WebSurface};
use crate::messages::RuntimeMessage;
use crate::zoom::driver::ZoomDriver;

type SharedApp = Rc<RefCell<HighlighterApp<WebDocument, WebSurface>>>;

/// Window events that can move the active cell or the grid.
const UPDATE_EVENTS: [&str; 4] = ["click", "keydown", "keyup", "resize"];

fn run_update(app: &SharedApp) {
    let Ok(mut app) = app.try_borrow_mut() else {
        tracing::trace!("update skipped, cycle in progress");
        return;
    };
    if let Err(e) = app.update() {
        tracing::warn!(error = %e, "highlight update failed");
    }
}

/// Re-read the settings store, apply it and write back pruned document entries.
fn reload_settings(app: SharedApp) {
    wasm_bindgen_futures::spawn_local(async move {
        let items = match chrome::load_items().await {
            Ok(items) => items,
            Err(e) => {
                tracing::warn!(error = %e, "loading settings failed");
                return;
            }
        };
        let write_back = match app.try_borrow_mut() {
            Ok(mut app) => app.apply_store_items(&items, js_sys::Date::now()),
            Err(_) => {
                tracing::warn!("settings arrived during a cycle, dropped");
                return;
            }
        };
        match write_back {
            Ok(Some(documents)) => {
                let mut items = Map::new();
                items.insert("documents".to_string(), documents);
                if let Err(e) = chrome::save_items(&items).await {
                    tracing::warn!(error = %e, "writing pruned documents failed");
                }
            }
            Ok(None) => {}
            Err(e) => tracing::warn!(error = %e, "applying settings failed"),
        }
    });
}

fn save(items: Map<String, Value>) {
    wasm_bindgen_futures::spawn_local(async move {
        if let Err(e) = chrome::save_items(&items).await {
            tracing::warn!(error = %e, "saving enablement failed");
        }
    });
}

fn persist(items: Map<String, Value>, broadcast: RuntimeMessage) {
    wasm_bindgen_futures::spawn_local(async move {
        if let Err(e) = chrome::save_items(&items).await {
            tracing::warn!(error = %e, "saving enablement failed");
        }
        if let Err(e) = chrome::send_message(&broadcast).await {
            tracing::debug!(error = %e, "no listener for broadcast");
        }
    });
}

fn handle_message(app: &SharedApp, zoom: &ZoomDriver, raw: JsValue, send_response: &Function) {
    let value: Value = match serde_wasm_bindgen::from_value(raw) {
        Ok(value) => value,
        Err(e) => {
            tracing::debug!(error = %e, "unreadable runtime message");
            return;
        }
    };
    let Some(message) = RuntimeMessage::parse_lenient(value) else {
        return;
    };
    let effect = match app.try_borrow_mut() {
        Ok(mut app) => app.handle_message(message, js_sys::Date::now()),
        Err(_) => {
            tracing::warn!("runtime message arrived during a cycle, dropped");
            return;
        }
    };
    match effect {
        Ok(MessageEffect::Redrawn) => {}
        Ok(MessageEffect::Persist(items)) => save(items),
        Ok(MessageEffect::Reload) => reload_settings(Rc::clone(app)),
        Ok(MessageEffect::Reply(response)) => {
            let reply = chrome::to_js(&response)
                .map_err(|e| JsValue::from_str(&e.to_string()))
                .and_then(|value| send_response.call1(&JsValue::NULL, &value));
            if let Err(e) = reply {
                tracing::warn!(error = ?e, "sending reply failed");
            }
        }
        Ok(MessageEffect::Zoom(direction)) => zoom.request(direction),
        Err(e) => tracing::warn!(error = %e, "runtime message failed"),
    }
}

/// The content-script highlighter, exported to the extension's loader.
#[wasm_bindgen]
pub struct Highlighter {
    app: SharedApp,
    zoom: ZoomDriver,
    #[allow(dead_code)]
    window_listeners: Vec<Closure<dyn FnMut(Event)>>,
    #[allow(dead_code)]
    storage_listener: Closure<dyn FnMut(JsValue, JsValue)>,
    #[allow(dead_code)]
    message_listener: Closure<dyn FnMut(JsValue, JsValue, Function) -> JsValue>,
}

#[wasm_bindgen]
impl Highlighter {
    /// Attach to the current page: create the overlay containers, register
    /// every listener and load the settings.
    #[wasm_bindgen(constructor)]
    pub fn new() -> Result<Highlighter, JsValue> {
        console_error_panic_hook::set_once();
        crate::logging::init();

        let document = WebDocument::new()?;
        let raw_document = document.raw().clone();
        let window = web_sys::window().ok_or_else(|| JsValue::from_str("no window"))?;
        let app: SharedApp = Rc::new(RefCell::new(HighlighterApp::new(
            document,
            WebSurface::new()?,
        )?));

        let zoom = {
            let app = Rc::clone(&app);
            ZoomDriver::new(raw_document, move || run_update(&app))
        };

        let mut window_listeners: Vec<Closure<dyn FnMut(Event)>> = Vec::new();
        for event in UPDATE_EVENTS {
            let app = Rc::clone(&app);
            let closure = Closure::wrap(Box::new(move |_event: Event| {
                run_update(&app);
            }) as Box<dyn FnMut(Event)>);
            window
                .add_event_listener_with_callback(event, closure.as_ref().unchecked_ref())
                .ok();
            window_listeners.push(closure);
        }

        // Scrolling happens inside host containers; only capture sees it on the window.
        {
            let app = Rc::clone(&app);
            let closure = Closure::wrap(Box::new(move |_event: Event| {
                run_update(&app);
            }) as Box<dyn FnMut(Event)>);
            let options = AddEventListenerOptions::new();
            options.set_capture(true);
            options.set_passive(true);
            window
                .add_event_listener_with_callback_and_add_event_listener_options(
                    "scroll",
                    closure.as_ref().unchecked_ref(),
                    &options,
                )
                .ok();
            window_listeners.push(closure);
        }

        let storage_listener = {
            let app = Rc::clone(&app);
            let closure = Closure::wrap(Box::new(move |_changes: JsValue, _area: JsValue| {
                reload_settings(Rc::clone(&app));
            }) as Box<dyn FnMut(JsValue, JsValue)>);
            chrome::on_storage_changed(&closure);
            closure
        };

        let message_listener = {
            let app = Rc::clone(&app);
            let zoom = zoom.clone();
            let closure = Closure::wrap(Box::new(
                move |message: JsValue, _sender: JsValue, send_response: Function| {
                    handle_message(&app, &zoom, message, &send_response);
                    JsValue::FALSE
                },
            )
                as Box<dyn FnMut(JsValue, JsValue, Function) -> JsValue>);
            chrome::on_message(&closure);
            closure
        };

        reload_settings(Rc::clone(&app));

        Ok(Highlighter {
            app,
            zoom,
            window_listeners,
            storage_listener,
            message_listener,
        })
    }

    /// Run one highlight cycle now.
    pub fn update(&self) {
        run_update(&self.app);
    }

    #[wasm_bindgen(js_name = "sheetKey")]
    pub fn sheet_key(&self) -> String {
        self.app
            .try_borrow()
            .map(|app| app.sheet_key())
            .unwrap_or_default()
    }

    /// Run a shortcut command by name (`toggleRow`, `cycleZoomIn`, ...).
    #[wasm_bindgen(js_name = "handleCommand")]
    pub fn handle_command(&self, name: &str) -> Result<(), JsValue> {
        let command: Command = name.parse()?;
        let effect = self
            .app
            .try_borrow_mut()
            .map_err(|_| JsValue::from_str("highlighter busy"))?
            .handle_command(command, js_sys::Date::now())?;
        match effect {
            CommandEffect::Persist { items, broadcast } => persist(items, broadcast),
            CommandEffect::Zoom(direction) => self.zoom.request(direction),
            CommandEffect::None => {}
        }
        Ok(())
    }
}
