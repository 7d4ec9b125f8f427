use super::*;
use crate::state::toast::{ToastKind, ToastOptions};
use crate::util::storage::MemoryStorage;
use futures::executor::block_on;
use serde_json::json;
use std::cell::RefCell;

// =============================================================
// Fixtures
// =============================================================

#[derive(Default)]
struct Recorded {
    requests: RefCell<Vec<PreparedRequest>>,
    busy_during_send: RefCell<Vec<bool>>,
}

#[derive(Clone)]
struct RecordingTransport {
    recorded: Rc<Recorded>,
    busy: Rc<Cell<bool>>,
    reply: Result<TransportResponse, RequestError>,
}

impl RecordingTransport {
    fn replying(busy: &Rc<Cell<bool>>, status: u16, body: serde_json::Value) -> Self {
        Self::with_reply(busy, Ok(TransportResponse { status, body: body.to_string() }))
    }

    fn with_reply(busy: &Rc<Cell<bool>>, reply: Result<TransportResponse, RequestError>) -> Self {
        Self { recorded: Rc::new(Recorded::default()), busy: busy.clone(), reply }
    }

    fn requests(&self) -> Vec<PreparedRequest> {
        self.recorded.requests.borrow().clone()
    }
}

impl Transport for RecordingTransport {
    async fn send(&self, request: PreparedRequest) -> Result<TransportResponse, RequestError> {
        self.recorded.busy_during_send.borrow_mut().push(self.busy.get());
        self.recorded.requests.borrow_mut().push(request);
        self.reply.clone()
    }
}

#[derive(Default)]
struct RecordingNotifier {
    events: RefCell<Vec<(ToastKind, String)>>,
}

impl Notifier for RecordingNotifier {
    fn success(&self, message: &str, _options: &ToastOptions) {
        self.events.borrow_mut().push((ToastKind::Success, message.to_owned()));
    }

    fn error(&self, message: &str, _options: &ToastOptions) {
        self.events.borrow_mut().push((ToastKind::Error, message.to_owned()));
    }
}

type TestClient = ApiClient<RecordingTransport, Rc<Cell<bool>>, MemoryStorage>;

fn client_with(config: ClientConfig, transport: RecordingTransport, storage: MemoryStorage) -> TestClient {
    let busy = transport.busy.clone();
    ApiClient::new(Arc::new(config), transport, busy, storage)
}

fn client(transport: RecordingTransport) -> TestClient {
    client_with(ClientConfig::default(), transport, MemoryStorage::new())
}

fn header_config() -> ClientConfig {
    ClientConfig { credential_mode: CredentialMode::Header, ..ClientConfig::default() }
}

fn ok_reply(busy: &Rc<Cell<bool>>) -> RecordingTransport {
    RecordingTransport::replying(busy, 200, json!({ "success": true, "message": "Saved", "data": { "id": 1 } }))
}

// =============================================================
// Notifier precondition
// =============================================================

#[test]
fn missing_notifier_fails_before_any_network_call() {
    let busy = Rc::new(Cell::new(false));
    let transport = ok_reply(&busy);
    let api = client(transport.clone());

    let result = block_on(api.fetch("/task/list", RequestEnvelope::post()));

    assert_eq!(result, Err(RequestError::MissingNotifier { path: "/task/list".to_owned() }));
    assert!(transport.requests().is_empty());
    assert!(!busy.get());
}

// =============================================================
// Header shaping
// =============================================================

#[test]
fn json_request_defaults_content_type_and_joins_base_url() {
    let busy = Rc::new(Cell::new(false));
    let transport = ok_reply(&busy);
    let api = client(transport.clone());
    let sink = RecordingNotifier::default();

    let envelope = RequestEnvelope::post().json(&json!({ "a": 1 })).unwrap().notify(&sink);
    block_on(api.fetch("/task/create", envelope)).unwrap();

    let sent = &transport.requests()[0];
    assert_eq!(sent.url, "http://localhost:3005/api/v1/task/create");
    assert_eq!(sent.method, Method::Post);
    assert_eq!(sent.header("content-type"), Some("application/json"));
    assert_eq!(sent.body, RequestBody::Json(json!({ "a": 1 })));
}

#[test]
fn caller_content_type_overrides_default() {
    let busy = Rc::new(Cell::new(false));
    let transport = ok_reply(&busy);
    let api = client(transport.clone());
    let sink = RecordingNotifier::default();

    let envelope = RequestEnvelope::post()
        .body(RequestBody::Text("a=1".to_owned()))
        .header("content-type", "application/x-www-form-urlencoded")
        .notify(&sink);
    block_on(api.fetch("/x", envelope)).unwrap();

    let sent = &transport.requests()[0];
    let content_types: Vec<_> =
        sent.headers.iter().filter(|(n, _)| n.eq_ignore_ascii_case("content-type")).collect();
    assert_eq!(content_types.len(), 1);
    assert_eq!(sent.header("Content-Type"), Some("application/x-www-form-urlencoded"));
}

#[test]
fn multipart_request_gets_no_default_content_type() {
    let busy = Rc::new(Cell::new(false));
    let transport = ok_reply(&busy);
    let api = client(transport.clone());
    let sink = RecordingNotifier::default();

    let form = MultipartForm::default().text("task_name", "Upload").file("file", "a.txt", "text/plain", b"hi".to_vec());
    let envelope = RequestEnvelope::post().body(RequestBody::Multipart(form)).header("X-Trace", "1").notify(&sink);
    block_on(api.fetch("/task/attach", envelope)).unwrap();

    let sent = &transport.requests()[0];
    assert_eq!(sent.header("Content-Type"), None);
    assert_eq!(sent.headers, vec![("X-Trace".to_owned(), "1".to_owned())]);
}

// =============================================================
// Credential attachment
// =============================================================

#[test]
fn cookie_mode_includes_ambient_credentials_without_bearer() {
    let busy = Rc::new(Cell::new(false));
    let transport = ok_reply(&busy);
    let api = client_with(ClientConfig::default(), transport.clone(), MemoryStorage::with_credential("tok"));
    let sink = RecordingNotifier::default();

    block_on(api.fetch("/task/list", RequestEnvelope::post().notify(&sink))).unwrap();

    let sent = &transport.requests()[0];
    assert!(sent.include_credentials);
    assert_eq!(sent.header("Authorization"), None);
}

#[test]
fn header_mode_attaches_bearer_for_authenticated_calls() {
    let busy = Rc::new(Cell::new(false));
    let transport = ok_reply(&busy);
    let api = client_with(header_config(), transport.clone(), MemoryStorage::with_credential("tok"));
    let sink = RecordingNotifier::default();

    block_on(api.fetch("/task/list", RequestEnvelope::post().notify(&sink))).unwrap();

    let sent = &transport.requests()[0];
    assert!(!sent.include_credentials);
    assert_eq!(sent.header("Authorization"), Some("Bearer tok"));
}

#[test]
fn header_mode_skips_bearer_for_anonymous_calls() {
    let busy = Rc::new(Cell::new(false));
    let transport = ok_reply(&busy);
    let api = client_with(header_config(), transport.clone(), MemoryStorage::with_credential("tok"));
    let sink = RecordingNotifier::default();

    block_on(api.fetch("/user/login", RequestEnvelope::post().anonymous().notify(&sink))).unwrap();

    assert_eq!(transport.requests()[0].header("Authorization"), None);
}

#[test]
fn header_mode_without_credential_sends_no_bearer() {
    let busy = Rc::new(Cell::new(false));
    let transport = ok_reply(&busy);
    let api = client_with(header_config(), transport.clone(), MemoryStorage::new());
    let sink = RecordingNotifier::default();

    block_on(api.fetch("/task/list", RequestEnvelope::get().notify(&sink))).unwrap();

    assert_eq!(transport.requests()[0].header("Authorization"), None);
}

#[test]
fn caller_authorization_header_wins_in_header_mode() {
    let busy = Rc::new(Cell::new(false));
    let transport = ok_reply(&busy);
    let api = client_with(header_config(), transport.clone(), MemoryStorage::with_credential("tok"));
    let sink = RecordingNotifier::default();

    let envelope = RequestEnvelope::get().header("authorization", "Basic abc").notify(&sink);
    block_on(api.fetch("/x", envelope)).unwrap();

    let sent = &transport.requests()[0];
    assert_eq!(sent.header("Authorization"), Some("Basic abc"));
    assert_eq!(sent.headers.iter().filter(|(n, _)| n.eq_ignore_ascii_case("authorization")).count(), 1);
}

// =============================================================
// Busy flag
// =============================================================

#[test]
fn busy_flag_is_set_during_send_and_cleared_after_success() {
    let busy = Rc::new(Cell::new(false));
    let transport = ok_reply(&busy);
    let api = client(transport.clone());
    let sink = RecordingNotifier::default();

    block_on(api.fetch("/x", RequestEnvelope::get().notify(&sink))).unwrap();

    assert_eq!(*transport.recorded.busy_during_send.borrow(), vec![true]);
    assert!(!busy.get());
}

#[test]
fn busy_flag_is_cleared_after_transport_failure() {
    let busy = Rc::new(Cell::new(false));
    let transport = RecordingTransport::with_reply(&busy, Err(RequestError::Transport("connection refused".to_owned())));
    let api = client(transport.clone());
    let sink = RecordingNotifier::default();

    let result = block_on(api.fetch("/x", RequestEnvelope::get().notify(&sink)));

    assert_eq!(result, Err(RequestError::Transport("connection refused".to_owned())));
    assert_eq!(*transport.recorded.busy_during_send.borrow(), vec![true]);
    assert!(!busy.get());
    assert!(sink.events.borrow().is_empty());
}

#[test]
fn busy_flag_is_cleared_after_decode_failure() {
    let busy = Rc::new(Cell::new(false));
    let transport = RecordingTransport::with_reply(
        &busy,
        Ok(TransportResponse { status: 502, body: "<html>Bad Gateway</html>".to_owned() }),
    );
    let api = client(transport);
    let sink = RecordingNotifier::default();

    let result = block_on(api.fetch("/x", RequestEnvelope::get().notify(&sink)));

    assert!(matches!(result, Err(RequestError::Decode { status: Some(502), .. })));
    assert!(!busy.get());
    assert!(sink.events.borrow().is_empty());
}

#[test]
fn array_body_is_not_read_as_an_envelope() {
    let busy = Rc::new(Cell::new(false));
    let transport = RecordingTransport::replying(&busy, 500, json!([true, "Logged in"]));
    let api = client(transport);
    let sink = RecordingNotifier::default();

    let result = block_on(api.fetch("/user/login", RequestEnvelope::post().anonymous().notify(&sink)));

    assert!(matches!(result, Err(RequestError::Decode { status: Some(500), .. })));
    assert!(sink.events.borrow().is_empty());
}

#[test]
fn scalar_body_is_a_decode_error() {
    let busy = Rc::new(Cell::new(false));
    let transport = RecordingTransport::replying(&busy, 200, json!(true));
    let api = client(transport);
    let sink = RecordingNotifier::default();

    let result = block_on(api.fetch("/x", RequestEnvelope::get().notify(&sink)));

    assert!(matches!(result, Err(RequestError::Decode { status: Some(200), .. })));
    assert!(sink.events.borrow().is_empty());
}

// =============================================================
// Notification + outcome
// =============================================================

#[test]
fn success_with_message_notifies_success_and_returns_payload() {
    let busy = Rc::new(Cell::new(false));
    let api = client(ok_reply(&busy));
    let sink = RecordingNotifier::default();

    let payload = block_on(api.fetch("/task/create", RequestEnvelope::post().notify(&sink))).unwrap();

    assert!(payload.success);
    assert_eq!(payload.data, Some(json!({ "id": 1 })));
    assert_eq!(*sink.events.borrow(), vec![(ToastKind::Success, "Saved".to_owned())]);
}

#[test]
fn business_failure_notifies_error_and_still_returns_payload() {
    let busy = Rc::new(Cell::new(false));
    let transport =
        RecordingTransport::replying(&busy, 200, json!({ "success": false, "message": "Invalid credentials" }));
    let api = client(transport);
    let sink = RecordingNotifier::default();

    let payload = block_on(api.fetch("/user/login", RequestEnvelope::post().anonymous().notify(&sink))).unwrap();

    assert!(!payload.success);
    assert_eq!(*sink.events.borrow(), vec![(ToastKind::Error, "Invalid credentials".to_owned())]);
}

#[test]
fn non_2xx_status_with_success_envelope_is_not_an_error() {
    let busy = Rc::new(Cell::new(false));
    let transport = RecordingTransport::replying(&busy, 500, json!({ "success": true, "message": "Odd but fine" }));
    let api = client(transport);
    let sink = RecordingNotifier::default();

    let payload = block_on(api.fetch("/x", RequestEnvelope::get().notify(&sink))).unwrap();

    assert!(payload.success);
    assert_eq!(sink.events.borrow()[0].0, ToastKind::Success);
}

#[test]
fn success_with_empty_message_routes_to_error_sink() {
    let busy = Rc::new(Cell::new(false));
    let transport = RecordingTransport::replying(&busy, 200, json!({ "success": true, "message": "", "data": [] }));
    let api = client(transport);
    let sink = RecordingNotifier::default();

    let payload = block_on(api.fetch("/task/list", RequestEnvelope::post().notify(&sink))).unwrap();

    assert!(payload.success);
    assert_eq!(*sink.events.borrow(), vec![(ToastKind::Error, String::new())]);
}

#[test]
fn fetch_data_maps_business_failure_to_error() {
    let busy = Rc::new(Cell::new(false));
    let transport = RecordingTransport::replying(&busy, 401, json!({ "success": false, "message": "Unauthorized" }));
    let api = client(transport);
    let sink = RecordingNotifier::default();

    let result: Result<String, _> = block_on(api.fetch_data("/user/login", RequestEnvelope::post().notify(&sink)));

    assert_eq!(result, Err(RequestError::Business { message: "Unauthorized".to_owned() }));
}

#[test]
fn fetch_data_decodes_payload() {
    let busy = Rc::new(Cell::new(false));
    let transport = RecordingTransport::replying(&busy, 200, json!({ "success": true, "message": "Welcome", "data": "tok" }));
    let api = client(transport);
    let sink = RecordingNotifier::default();

    let token: String = block_on(api.fetch_data("/user/login", RequestEnvelope::post().notify(&sink))).unwrap();

    assert_eq!(token, "tok");
}

// =============================================================
// Helpers
// =============================================================

#[test]
fn merge_headers_keeps_caller_spelling_on_override() {
    let headers = merge_headers(&RequestBody::Empty, vec![("CONTENT-TYPE".to_owned(), "text/plain".to_owned())]);
    assert_eq!(headers, vec![("CONTENT-TYPE".to_owned(), "text/plain".to_owned())]);
}

#[test]
fn method_names_are_uppercase() {
    assert_eq!(Method::Delete.as_str(), "DELETE");
    assert_eq!(Method::default(), Method::Get);
}

#[cfg(not(feature = "csr"))]
#[test]
fn gloo_transport_is_unavailable_outside_browser() {
    let request = PreparedRequest {
        method: Method::Get,
        url: "http://localhost/x".to_owned(),
        headers: Vec::new(),
        body: RequestBody::Empty,
        include_credentials: true,
    };
    assert!(matches!(block_on(GlooTransport.send(request)), Err(RequestError::Transport(_))));
}
