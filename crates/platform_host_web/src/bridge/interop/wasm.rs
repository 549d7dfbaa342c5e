use wasm_bindgen::{JsCast, JsValue};
use wasm_bindgen_futures::JsFuture;
use web_sys::Response;

use super::TextResponse;

const EXTERNAL_TARGET: &str = "_blank";
const EXTERNAL_FEATURES: &str = "noopener,noreferrer";

fn js_error_to_string(err: JsValue) -> String {
    if let Some(text) = err.as_string() {
        return text;
    }
    if let Ok(message) = js_sys::Reflect::get(&err, &JsValue::from_str("message")) {
        if let Some(text) = message.as_string() {
            return text;
        }
    }
    format!("{err:?}")
}

fn window() -> Result<web_sys::Window, String> {
    web_sys::window().ok_or_else(|| "window unavailable".to_string())
}

pub async fn open_external_url(url: &str) -> Result<(), String> {
    // With `noopener` the call returns null even on success, so only a thrown error counts.
    window()?
        .open_with_url_and_target_and_features(url, EXTERNAL_TARGET, EXTERNAL_FEATURES)
        .map(|_| ())
        .map_err(js_error_to_string)
}

pub async fn fetch_text(url: &str) -> Result<TextResponse, String> {
    let value = JsFuture::from(window()?.fetch_with_str(url))
        .await
        .map_err(js_error_to_string)?;
    let response: Response = value.dyn_into().map_err(js_error_to_string)?;
    let status = response.status();
    if !response.ok() {
        return Ok(TextResponse {
            status,
            body: String::new(),
        });
    }
    let text = JsFuture::from(response.text().map_err(js_error_to_string)?)
        .await
        .map_err(js_error_to_string)?;
    Ok(TextResponse {
        status,
        body: text.as_string().unwrap_or_default(),
    })
}
