//! Uniform REST request path used by every page.
//!
//! Client-side (csr): real HTTP calls via `gloo-net`.
//! Elsewhere: the transport reports itself unavailable so pure logic stays
//! testable without a browser.
//!
//! SYSTEM CONTEXT
//! ==============
//! One `ApiClient::fetch` call folds together credential attachment, JSON
//! header defaults, a per-page busy flag, and success/error notification.
//! Pre-authentication calls (login, register) use the same path with
//! `CredentialPolicy::Anonymous`.
//!
//! ERROR HANDLING
//! ==============
//! Transport and decode failures come back as `Err`. A backend reply with
//! `success: false` is still `Ok`: it is surfaced through the notifier and
//! returned so the caller can inspect it, or converted into
//! `RequestError::Business` via `fetch_data`/`ApiEnvelope::into_data`.
//! Non-2xx statuses are not errors on their own; only the envelope's
//! `success` flag drives notification.

#![allow(clippy::unused_async)]

#[cfg(test)]
#[path = "request_test.rs"]
mod request_test;

use std::cell::Cell;
use std::future::Future;
use std::rc::Rc;
use std::sync::Arc;

use leptos::prelude::*;
use serde::Serialize;
use serde::de::DeserializeOwned;

use super::types::ApiEnvelope;
use crate::config::{ClientConfig, CredentialMode};
use crate::state::toast::Notifier;
use crate::util::storage::{BrowserStorage, CredentialStorage};

const CONTENT_TYPE: &str = "Content-Type";
const AUTHORIZATION: &str = "Authorization";

/// Failures a request can end in.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RequestError {
    /// Programmer error: the call site did not wire up user feedback.
    #[error("request to {path} issued without a notifier")]
    MissingNotifier { path: String },
    #[error("could not encode request body: {0}")]
    Encode(String),
    #[error("transport failure: {0}")]
    Transport(String),
    #[error("undecodable response: {reason}")]
    Decode { status: Option<u16>, reason: String },
    /// Backend replied with `success: false`.
    #[error("{message}")]
    Business { message: String },
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Method {
    #[default]
    Get,
    Post,
    Put,
    Patch,
    Delete,
}

impl Method {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Get => "GET",
            Self::Post => "POST",
            Self::Put => "PUT",
            Self::Patch => "PATCH",
            Self::Delete => "DELETE",
        }
    }
}

/// Whether a call carries the session credential.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum CredentialPolicy {
    /// Authenticated call.
    #[default]
    Attach,
    /// Pre-authentication call (login, register). Never sends a bearer header.
    Anonymous,
}

/// One field of a multipart form.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum FormPart {
    Text { name: String, value: String },
    File { name: String, filename: String, content_type: String, bytes: Vec<u8> },
}

/// Multipart form payload. The browser supplies its own boundary header.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct MultipartForm {
    pub parts: Vec<FormPart>,
}

impl MultipartForm {
    #[must_use]
    pub fn text(mut self, name: &str, value: &str) -> Self {
        self.parts.push(FormPart::Text { name: name.to_owned(), value: value.to_owned() });
        self
    }

    #[must_use]
    pub fn file(mut self, name: &str, filename: &str, content_type: &str, bytes: Vec<u8>) -> Self {
        self.parts.push(FormPart::File {
            name: name.to_owned(),
            filename: filename.to_owned(),
            content_type: content_type.to_owned(),
            bytes,
        });
        self
    }

    #[cfg(feature = "csr")]
    fn to_form_data(&self) -> Result<web_sys::FormData, RequestError> {
        let js_err = |e: wasm_bindgen::JsValue| RequestError::Encode(format!("{e:?}"));
        let form = web_sys::FormData::new().map_err(js_err)?;
        for part in &self.parts {
            match part {
                FormPart::Text { name, value } => form.append_with_str(name, value).map_err(js_err)?,
                FormPart::File { name, filename, content_type, bytes } => {
                    let array = js_sys::Uint8Array::from(bytes.as_slice());
                    let sequence = js_sys::Array::of1(&array);
                    let options = web_sys::BlobPropertyBag::new();
                    options.set_type(content_type);
                    let blob =
                        web_sys::Blob::new_with_u8_array_sequence_and_options(&sequence, &options).map_err(js_err)?;
                    form.append_with_blob_and_filename(name, &blob, filename).map_err(js_err)?;
                }
            }
        }
        Ok(form)
    }
}

#[derive(Clone, Debug, Default, PartialEq)]
pub enum RequestBody {
    #[default]
    Empty,
    Json(serde_json::Value),
    Text(String),
    Multipart(MultipartForm),
}

impl RequestBody {
    pub fn is_multipart(&self) -> bool {
        matches!(self, Self::Multipart(_))
    }
}

/// Per-call description of a request.
#[derive(Clone, Default)]
pub struct RequestEnvelope<'a> {
    pub method: Method,
    pub body: RequestBody,
    /// Extra headers; these win over defaults with the same name.
    pub headers: Vec<(String, String)>,
    pub policy: CredentialPolicy,
    pub notifier: Option<&'a dyn Notifier>,
}

impl<'a> RequestEnvelope<'a> {
    pub fn new(method: Method) -> Self {
        Self { method, ..Self::default() }
    }

    pub fn get() -> Self {
        Self::new(Method::Get)
    }

    pub fn post() -> Self {
        Self::new(Method::Post)
    }

    /// Serialize `body` as the JSON payload.
    ///
    /// # Errors
    ///
    /// Returns [`RequestError::Encode`] if `body` cannot be serialized.
    pub fn json<T: Serialize>(mut self, body: &T) -> Result<Self, RequestError> {
        let value = serde_json::to_value(body).map_err(|e| RequestError::Encode(e.to_string()))?;
        self.body = RequestBody::Json(value);
        Ok(self)
    }

    #[must_use]
    pub fn body(mut self, body: RequestBody) -> Self {
        self.body = body;
        self
    }

    #[must_use]
    pub fn header(mut self, name: &str, value: &str) -> Self {
        self.headers.push((name.to_owned(), value.to_owned()));
        self
    }

    #[must_use]
    pub fn anonymous(mut self) -> Self {
        self.policy = CredentialPolicy::Anonymous;
        self
    }

    #[must_use]
    pub fn notify(mut self, notifier: &'a dyn Notifier) -> Self {
        self.notifier = Some(notifier);
        self
    }
}

/// Fully resolved request handed to a [`Transport`].
#[derive(Clone, Debug, PartialEq)]
pub struct PreparedRequest {
    pub method: Method,
    pub url: String,
    pub headers: Vec<(String, String)>,
    pub body: RequestBody,
    /// Ask the browser to attach ambient credentials (cookies).
    pub include_credentials: bool,
}

impl PreparedRequest {
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.iter().find(|(n, _)| n.eq_ignore_ascii_case(name)).map(|(_, v)| v.as_str())
    }
}

/// Raw HTTP reply.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TransportResponse {
    pub status: u16,
    pub body: String,
}

/// Moves a prepared request over the wire.
pub trait Transport {
    fn send(&self, request: PreparedRequest) -> impl Future<Output = Result<TransportResponse, RequestError>>;
}

/// Browser `fetch` transport.
#[derive(Clone, Copy, Debug, Default)]
pub struct GlooTransport;

impl Transport for GlooTransport {
    async fn send(&self, request: PreparedRequest) -> Result<TransportResponse, RequestError> {
        #[cfg(feature = "csr")]
        {
            use gloo_net::http::{Method as HttpMethod, RequestBuilder};

            let transport_err = |e: gloo_net::Error| RequestError::Transport(e.to_string());
            let method = match request.method {
                Method::Get => HttpMethod::GET,
                Method::Post => HttpMethod::POST,
                Method::Put => HttpMethod::PUT,
                Method::Patch => HttpMethod::PATCH,
                Method::Delete => HttpMethod::DELETE,
            };
            let mut builder = RequestBuilder::new(&request.url).method(method);
            for (name, value) in &request.headers {
                builder = builder.header(name, value);
            }
            if request.include_credentials {
                builder = builder.credentials(web_sys::RequestCredentials::Include);
            }
            let built = match request.body {
                RequestBody::Empty => builder.build(),
                RequestBody::Json(value) => builder.body(value.to_string()),
                RequestBody::Text(text) => builder.body(text),
                RequestBody::Multipart(form) => builder.body(form.to_form_data()?),
            }
            .map_err(transport_err)?;

            let resp = built.send().await.map_err(transport_err)?;
            let status = resp.status();
            let body = resp.text().await.map_err(transport_err)?;
            Ok(TransportResponse { status, body })
        }
        #[cfg(not(feature = "csr"))]
        {
            let _ = request;
            Err(RequestError::Transport("not available outside the browser".to_owned()))
        }
    }
}

/// Observable "request in flight" indicator.
pub trait BusyFlag {
    fn set_busy(&self, busy: bool);
}

impl BusyFlag for RwSignal<bool> {
    fn set_busy(&self, busy: bool) {
        self.set(busy);
    }
}

impl BusyFlag for Rc<Cell<bool>> {
    fn set_busy(&self, busy: bool) {
        self.set(busy);
    }
}

/// Request client bound to a transport, a busy flag, and the credential slot.
#[derive(Clone)]
pub struct ApiClient<T, B, S> {
    config: Arc<ClientConfig>,
    transport: T,
    busy: B,
    storage: S,
}

/// The client pages use in the browser.
pub type BrowserClient = ApiClient<GlooTransport, RwSignal<bool>, BrowserStorage>;

/// Build a page-local client from the context config with a fresh busy flag.
pub fn use_api_client() -> BrowserClient {
    let config = expect_context::<Arc<ClientConfig>>();
    let storage = BrowserStorage::new(config.storage_key.clone());
    ApiClient::new(config, GlooTransport, RwSignal::new(false), storage)
}

impl<T, B, S> ApiClient<T, B, S>
where
    T: Transport,
    B: BusyFlag,
    S: CredentialStorage,
{
    pub fn new(config: Arc<ClientConfig>, transport: T, busy: B, storage: S) -> Self {
        Self { config, transport, busy, storage }
    }

    /// The busy flag, for binding to submit buttons and spinners.
    pub fn busy(&self) -> &B {
        &self.busy
    }

    /// Perform one request against `config.api_base + path`.
    ///
    /// # Errors
    ///
    /// - [`RequestError::MissingNotifier`] before any I/O if the envelope has no notifier.
    /// - [`RequestError::Transport`] if the request could not complete.
    /// - [`RequestError::Decode`] if the reply is not a JSON envelope.
    pub async fn fetch(&self, path: &str, envelope: RequestEnvelope<'_>) -> Result<ApiEnvelope, RequestError> {
        let RequestEnvelope { method, body, headers, policy, notifier } = envelope;
        let Some(notifier) = notifier else {
            leptos::logging::error!("request to {path} issued without a notifier; fix the call site");
            return Err(RequestError::MissingNotifier { path: path.to_owned() });
        };

        let request = self.prepare(path, method, body, headers, policy);

        self.busy.set_busy(true);
        let sent = self.transport.send(request).await;
        self.busy.set_busy(false);

        let response = sent.inspect_err(|e| leptos::logging::warn!("{} {path}: {e}", method.as_str()))?;
        let payload = decode_envelope(&response)?;

        let options = &self.config.toast;
        if payload.success && !payload.message.is_empty() {
            notifier.success(&payload.message, options);
        } else {
            notifier.error(&payload.message, options);
        }

        Ok(payload)
    }

    /// [`Self::fetch`], then decode `data` as `T`.
    ///
    /// # Errors
    ///
    /// Everything [`Self::fetch`] returns, plus [`RequestError::Business`] when
    /// the backend reported failure and [`RequestError::Decode`] when `data`
    /// does not match `T`.
    pub async fn fetch_data<D: DeserializeOwned>(
        &self,
        path: &str,
        envelope: RequestEnvelope<'_>,
    ) -> Result<D, RequestError> {
        self.fetch(path, envelope).await?.into_data()
    }

    fn prepare(
        &self,
        path: &str,
        method: Method,
        body: RequestBody,
        headers: Vec<(String, String)>,
        policy: CredentialPolicy,
    ) -> PreparedRequest {
        let mut headers = merge_headers(&body, headers);

        let include_credentials = match self.config.credential_mode {
            CredentialMode::Cookie => true,
            CredentialMode::Header => {
                if policy == CredentialPolicy::Attach
                    && !headers.iter().any(|(n, _)| n.eq_ignore_ascii_case(AUTHORIZATION))
                {
                    if let Some(token) = self.storage.read() {
                        headers.push((AUTHORIZATION.to_owned(), format!("Bearer {token}")));
                    }
                }
                false
            }
        };

        PreparedRequest { method, url: self.config.endpoint(path), headers, body, include_credentials }
    }
}

/// Parse a reply body as an envelope. Only a JSON object qualifies; serde
/// would otherwise fill the envelope positionally from an array.
fn decode_envelope(response: &TransportResponse) -> Result<ApiEnvelope, RequestError> {
    let decode_err = |reason: String| RequestError::Decode { status: Some(response.status), reason };
    let body: serde_json::Value = serde_json::from_str(&response.body).map_err(|e| decode_err(e.to_string()))?;
    if !body.is_object() {
        return Err(decode_err("reply body is not a JSON object".to_owned()));
    }
    serde_json::from_value(body).map_err(|e| decode_err(e.to_string()))
}

/// JSON content-type default (skipped for multipart) overlaid with caller
/// headers. Names compare case-insensitively; the caller's spelling is kept.
fn merge_headers(body: &RequestBody, caller: Vec<(String, String)>) -> Vec<(String, String)> {
    let mut headers = Vec::with_capacity(caller.len() + 1);
    if !body.is_multipart() {
        headers.push((CONTENT_TYPE.to_owned(), "application/json".to_owned()));
    }
    for (name, value) in caller {
        match headers.iter_mut().find(|(n, _)| n.eq_ignore_ascii_case(&name)) {
            Some(existing) => *existing = (name, value),
            None => headers.push((name, value)),
        }
    }
    headers
}
