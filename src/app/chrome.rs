//! Bindings to the extension APIs the content script uses (wasm32 only).

use js_sys::{Function, Promise};
use serde::Serialize;
use serde_json::{Map, Value};
use wasm_bindgen::prelude::*;
use wasm_bindgen_futures::JsFuture;

use crate::config::STORAGE_KEYS;
use crate::error::{Result, SheetlightError};
use crate::messages::RuntimeMessage;

#[wasm_bindgen]
extern "C" {
    #[wasm_bindgen(js_namespace = ["chrome", "storage", "local"], js_name = get, catch)]
    fn storage_local_get(keys: &JsValue) -> std::result::Result<Promise, JsValue>;

    #[wasm_bindgen(js_namespace = ["chrome", "storage", "local"], js_name = set, catch)]
    fn storage_local_set(items: &JsValue) -> std::result::Result<Promise, JsValue>;

    #[wasm_bindgen(js_namespace = ["chrome", "storage", "onChanged"], js_name = addListener)]
    fn storage_on_changed_add_listener(callback: &Function);

    #[wasm_bindgen(js_namespace = ["chrome", "runtime", "onMessage"], js_name = addListener)]
    fn runtime_on_message_add_listener(callback: &Function);

    #[wasm_bindgen(js_namespace = ["chrome", "runtime"], js_name = sendMessage, catch)]
    fn runtime_send_message(message: &JsValue) -> std::result::Result<Promise, JsValue>;
}

/// Serialize to plain JS objects (not `Map`s), as the extension APIs expect.
pub fn to_js<T: Serialize + ?Sized>(value: &T) -> Result<JsValue> {
    Ok(value.serialize(&serde_wasm_bindgen::Serializer::json_compatible())?)
}

/// Read every settings key from local storage.
pub async fn load_items() -> Result<Map<String, Value>> {
    let promise = storage_local_get(&to_js(&STORAGE_KEYS)?).map_err(|e| SheetlightError::storage(&e))?;
    let raw = JsFuture::from(promise)
        .await
        .map_err(|e| SheetlightError::storage(&e))?;
    match serde_wasm_bindgen::from_value::<Value>(raw)? {
        Value::Object(items) => Ok(items),
        other => Err(SheetlightError::Storage(format!("expected an object, got {other}"))),
    }
}

pub async fn save_items(items: &Map<String, Value>) -> Result<()> {
    let promise = storage_local_set(&to_js(items)?).map_err(|e| SheetlightError::storage(&e))?;
    JsFuture::from(promise)
        .await
        .map_err(|e| SheetlightError::storage(&e))?;
    Ok(())
}

/// Broadcast to the other extension contexts. Rejects when nobody listens.
pub async fn send_message(message: &RuntimeMessage) -> Result<()> {
    let promise =
        runtime_send_message(&to_js(message)?).map_err(|e| SheetlightError::Message(format!("{e:?}")))?;
    JsFuture::from(promise)
        .await
        .map_err(|e| SheetlightError::Message(format!("{e:?}")))?;
    Ok(())
}

pub fn on_storage_changed(callback: &Closure<dyn FnMut(JsValue, JsValue)>) {
    storage_on_changed_add_listener(callback.as_ref().unchecked_ref());
}

pub fn on_message(callback: &Closure<dyn FnMut(JsValue, JsValue, Function) -> JsValue>) {
    runtime_on_message_add_listener(callback.as_ref().unchecked_ref());
}
