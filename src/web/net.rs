//! Remote calls: the prompt service and the drawing document store.
//!
//! Both endpoints get the same treatment: an explicit request timeout via
//! `AbortController` and a bounded retry with exponential backoff. Exhausted
//! retries surface as an error the UI renders with a retry affordance,
//! never as a hang.

use gloo_timers::callback::Timeout;
use gloo_timers::future::TimeoutFuture;
use log::warn;
use serde::Deserialize;
use thiserror::Error;
use wasm_bindgen::{JsCast, JsValue};
use wasm_bindgen_futures::JsFuture;
use web_sys::{AbortController, Headers, Request, RequestInit, Response, window};

use crate::store::{DrawingStore, StoreError, UserDoc};

const REQUEST_TIMEOUT_MS: u32 = 8_000;
const RETRY_ATTEMPTS: u32 = 3;
const RETRY_BASE_DELAY_MS: u32 = 500;

#[derive(Debug, Error)]
pub enum FetchError {
    #[error("network error: {0}")]
    Network(String),
    #[error("request timed out")]
    Timeout,
    #[error("http status {0}")]
    Status(u16),
    #[error("malformed response: {0}")]
    Decode(#[from] serde_json::Error),
}

impl From<FetchError> for StoreError {
    fn from(e: FetchError) -> Self {
        match e {
            FetchError::Network(msg) => StoreError::Network(msg),
            FetchError::Timeout => StoreError::Timeout,
            FetchError::Status(code) => StoreError::Status(code),
            FetchError::Decode(e) => StoreError::Decode(e),
        }
    }
}

fn js_err(e: JsValue) -> FetchError {
    FetchError::Network(format!("{e:?}"))
}

// A rejected fetch promise is either our own abort (timeout) or a real
// network failure; the error's `name` field tells them apart.
fn classify_reject(e: JsValue) -> FetchError {
    let name = js_sys::Reflect::get(&e, &JsValue::from_str("name"))
        .ok()
        .and_then(|v| v.as_string())
        .unwrap_or_default();
    if name == "AbortError" {
        FetchError::Timeout
    } else {
        FetchError::Network(format!("{e:?}"))
    }
}

/// One HTTP exchange, returning (status, body text).
async fn http_text(
    method: &str,
    url: &str,
    bearer: Option<&str>,
    body: Option<&str>,
) -> Result<(u16, String), FetchError> {
    let ctrl = AbortController::new().map_err(js_err)?;
    let init = RequestInit::new();
    init.set_method(method);
    init.set_signal(Some(&ctrl.signal()));
    let headers = Headers::new().map_err(js_err)?;
    if let Some(key) = bearer {
        headers.set("authorization", &format!("Bearer {key}")).map_err(js_err)?;
    }
    if let Some(json) = body {
        headers.set("content-type", "application/json").map_err(js_err)?;
        init.set_body(&JsValue::from_str(json));
    }
    init.set_headers(&headers);

    let request = Request::new_with_str_and_init(url, &init).map_err(js_err)?;
    let win = window().ok_or_else(|| FetchError::Network("no window".into()))?;

    let abort = Timeout::new(REQUEST_TIMEOUT_MS, move || ctrl.abort());
    let resolved = JsFuture::from(win.fetch_with_request(&request)).await;
    drop(abort); // fetch settled; the pending abort must not fire later

    let resp: Response = resolved.map_err(classify_reject)?.dyn_into().map_err(js_err)?;
    let status = resp.status();
    let text = JsFuture::from(resp.text().map_err(js_err)?)
        .await
        .map_err(js_err)?
        .as_string()
        .unwrap_or_default();
    Ok((status, text))
}

async fn http_text_retry(
    method: &str,
    url: &str,
    bearer: Option<&str>,
    body: Option<&str>,
) -> Result<(u16, String), FetchError> {
    let mut delay = RETRY_BASE_DELAY_MS;
    let mut attempt = 0;
    loop {
        attempt += 1;
        match http_text(method, url, bearer, body).await {
            Ok(out) => return Ok(out),
            Err(e) if attempt < RETRY_ATTEMPTS => {
                warn!("{method} {url} failed (attempt {attempt}): {e}, retrying in {delay}ms");
                TimeoutFuture::new(delay).await;
                delay *= 2;
            }
            Err(e) => return Err(e),
        }
    }
}

// --- Prompt service ----------------------------------------------------------

#[derive(Deserialize)]
struct PromptResponse {
    prompt: String,
}

/// Fetches the next drawing prompt. A non-success status, a malformed body
/// or an empty prompt all count as fetch errors.
pub async fn fetch_prompt(url: &str) -> Result<String, FetchError> {
    let (status, body) = http_text_retry("GET", url, None, None).await?;
    if !(200..300).contains(&status) {
        return Err(FetchError::Status(status));
    }
    let parsed: PromptResponse = serde_json::from_str(&body)?;
    let prompt = parsed.prompt.trim().to_owned();
    if prompt.is_empty() {
        return Err(FetchError::Network("prompt service returned an empty prompt".into()));
    }
    Ok(prompt)
}

// --- Document store ----------------------------------------------------------

/// HTTP implementation of the drawing store: one JSON document per user id
/// at `{base}/users/{id}`, updated read-modify-write. The credential is
/// fixed at construction and sent as a bearer token.
#[derive(Clone)]
pub struct RestStore {
    base_url: String,
    api_key: String,
}

impl RestStore {
    pub fn new(base_url: &str, api_key: &str) -> Self {
        RestStore {
            base_url: base_url.trim_end_matches('/').to_owned(),
            api_key: api_key.to_owned(),
        }
    }

    fn doc_url(&self, id: &str) -> String {
        let escaped = String::from(js_sys::encode_uri_component(id));
        format!("{}/users/{}", self.base_url, escaped)
    }

    async fn load_doc(&self, id: &str) -> Result<Option<UserDoc>, StoreError> {
        let (status, body) =
            http_text_retry("GET", &self.doc_url(id), Some(&self.api_key), None).await?;
        match status {
            404 => Ok(None),
            s if (200..300).contains(&s) => Ok(Some(serde_json::from_str(&body)?)),
            s => Err(StoreError::Status(s)),
        }
    }

    async fn put_doc(&self, id: &str, doc: &UserDoc) -> Result<(), StoreError> {
        let json = serde_json::to_string(doc)?;
        let (status, _) =
            http_text_retry("PUT", &self.doc_url(id), Some(&self.api_key), Some(&json)).await?;
        if (200..300).contains(&status) {
            Ok(())
        } else {
            Err(StoreError::Status(status))
        }
    }
}

impl DrawingStore for RestStore {
    async fn save_identity(&self, id: &str, display_name: &str) -> Result<(), StoreError> {
        let mut doc = self.load_doc(id).await?.unwrap_or_default();
        doc.username = display_name.to_owned();
        self.put_doc(id, &doc).await
    }

    async fn identity(&self, id: &str) -> Result<Option<String>, StoreError> {
        Ok(self
            .load_doc(id)
            .await?
            .map(|doc| doc.username)
            .filter(|name| !name.is_empty()))
    }

    async fn save_drawing(&self, id: &str, encoding: &str) -> Result<(), StoreError> {
        let mut doc = self.load_doc(id).await?.unwrap_or_default();
        if !doc.drawings.iter().any(|d| d == encoding) {
            doc.drawings.push(encoding.to_owned());
        }
        self.put_doc(id, &doc).await
    }

    async fn drawings(&self, id: &str) -> Result<Vec<String>, StoreError> {
        Ok(self.load_doc(id).await?.map(|doc| doc.drawings).unwrap_or_default())
    }

    async fn delete_drawing(&self, id: &str, encoding: &str) -> Result<(), StoreError> {
        let Some(mut doc) = self.load_doc(id).await? else {
            return Ok(());
        };
        if let Some(pos) = doc.drawings.iter().position(|d| d == encoding) {
            doc.drawings.remove(pos);
            self.put_doc(id, &doc).await?;
        }
        Ok(())
    }
}
