use serde::{Deserialize, Serialize};

/// Status used for failures that never reached an origin server.
pub const LOCAL_ERROR_STATUS: i32 = -1;

pub const HEADER_EXPIRES: &str = "Expires";
pub const HEADER_CACHE_CONTROL: &str = "Cache-Control";
pub const HEADER_DATE: &str = "Date";
pub const HEADER_LAST_MODIFIED: &str = "Last-Modified";
pub const HEADER_ETAG: &str = "ETag";
pub const HEADER_IF_NONE_MATCH: &str = "If-None-Match";
pub const HEADER_IF_MODIFIED_SINCE: &str = "If-Modified-Since";
pub const HEADER_ACCEPT_CHARSET: &str = "Accept-Charset";
pub const HEADER_CONTENT_TYPE: &str = "Content-Type";

/// Header map with case-insensitive names. A name keeps the spelling it was
/// first inserted with and maps to every value received for it, in order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Headers {
    entries: Vec<(String, Vec<String>)>,
}

impl Headers {
    pub fn new() -> Headers {
        Headers::default()
    }

    fn position(&self, name: &str) -> Option<usize> {
        self.entries.iter().position(|(key, _)| key.eq_ignore_ascii_case(name))
    }

    /// Replaces every value stored under `name`.
    pub fn insert(&mut self, name: &str, values: Vec<String>) {
        match self.position(name) {
            Some(index) => self.entries[index].1 = values,
            None => self.entries.push((name.to_string(), values)),
        }
    }

    pub fn append(&mut self, name: &str, value: &str) {
        match self.position(name) {
            Some(index) => self.entries[index].1.push(value.to_string()),
            None => self.entries.push((name.to_string(), vec![value.to_string()])),
        }
    }

    /// First value of `name`.
    pub fn get(&self, name: &str) -> Option<&str> {
        self.get_all(name).first().map(|value| value.as_str())
    }

    pub fn get_all(&self, name: &str) -> &[String] {
        match self.position(name) {
            Some(index) => self.entries[index].1.as_slice(),
            None => &[],
        }
    }

    /// All values of `name` joined with `", "`, the way repeated list headers
    /// are combined.
    pub fn get_joined(&self, name: &str) -> Option<String> {
        let values = self.get_all(name);
        if values.is_empty() {
            return None;
        }
        Some(values.join(", "))
    }

    pub fn contains(&self, name: &str) -> bool {
        self.position(name).is_some()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &[String])> {
        self.entries.iter().map(|(name, values)| (name.as_str(), values.as_slice()))
    }
}

/// Outcome of one dispatch, and the value held by the cache.
///
/// At most one of body and error message is set; the setters clear the other
/// side so a revalidated or failed entry never carries both.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Response {
    status_code: i32,
    headers: Headers,
    body: Option<String>,
    error_message: Option<String>,
}

impl Response {
    pub fn new(status_code: i32) -> Response {
        Response {
            status_code,
            ..Response::default()
        }
    }

    /// A response for a failure detected before or instead of an HTTP exchange.
    pub fn local_error(message: impl Into<String>) -> Response {
        let mut response = Response::default();
        response.fail_locally(message);
        response
    }

    pub fn with_header(mut self, name: &str, value: &str) -> Response {
        self.headers.append(name, value);
        self
    }

    pub fn with_body(mut self, body: impl Into<String>) -> Response {
        self.set_body(body);
        self
    }

    pub fn status_code(&self) -> i32 {
        self.status_code
    }

    pub fn set_status_code(&mut self, status_code: i32) {
        self.status_code = status_code;
    }

    pub fn headers(&self) -> &Headers {
        &self.headers
    }

    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name)
    }

    pub fn add_header(&mut self, name: &str, values: Vec<String>) {
        self.headers.insert(name, values);
    }

    pub fn body(&self) -> Option<&str> {
        self.body.as_deref()
    }

    pub fn set_body(&mut self, body: impl Into<String>) {
        self.body = Some(body.into());
        self.error_message = None;
    }

    pub fn error_message(&self) -> Option<&str> {
        self.error_message.as_deref()
    }

    pub fn set_error_message(&mut self, message: impl Into<String>) {
        self.error_message = Some(message.into());
        self.body = None;
    }

    pub(crate) fn fail_locally(&mut self, message: impl Into<String>) {
        self.status_code = LOCAL_ERROR_STATUS;
        self.set_error_message(message);
    }

    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status_code)
    }

    pub fn is_not_modified(&self) -> bool {
        self.status_code == 304
    }

    pub fn is_local_error(&self) -> bool {
        self.status_code == LOCAL_ERROR_STATUS
    }
}
