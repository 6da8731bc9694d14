use std::fmt::{Display, Formatter};
use std::str::FromStr;

use url::Url;

pub const CHARSET_UTF8: &str = "utf-8";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Method {
    Get,
    Post,
}

impl Method {
    pub fn as_str(&self) -> &'static str {
        match self {
            Method::Get => "GET",
            Method::Post => "POST",
        }
    }
}

impl Display for Method {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[derive(Debug, PartialEq, Eq)]
pub struct UnknownMethod(pub String);

impl FromStr for Method {
    type Err = UnknownMethod;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.eq_ignore_ascii_case("get") { return Ok(Method::Get); }
        if s.eq_ignore_ascii_case("post") { return Ok(Method::Post); }
        Err(UnknownMethod(s.to_string()))
    }
}

/// An outgoing request as described by the caller.
///
/// The raw URL string doubles as the cache key, so two requests are the same
/// cache entry whenever their raw URLs are byte-equal.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Request {
    raw_url: String,
    method: Option<Method>,
    params: Option<String>,
    content_type: Option<String>,
    if_modified_since: Option<String>,
    if_none_match: Option<String>,
}

impl Request {
    pub fn new(raw_url: impl Into<String>) -> Request {
        Request {
            raw_url: raw_url.into(),
            ..Request::default()
        }
    }

    pub fn get(raw_url: impl Into<String>) -> Request {
        Request::new(raw_url).with_method(Method::Get)
    }

    pub fn post(raw_url: impl Into<String>) -> Request {
        Request::new(raw_url).with_method(Method::Post)
    }

    pub fn with_method(mut self, method: Method) -> Request {
        self.method = Some(method);
        self
    }

    pub fn with_params(mut self, params: impl Into<String>) -> Request {
        self.params = Some(params.into());
        self
    }

    /// Encodes `pairs` as an `application/x-www-form-urlencoded` payload.
    pub fn with_form(self, pairs: &[(&str, &str)]) -> Request {
        let encoded = pairs
            .iter()
            .map(|(key, value)| format!("{}={}", urlencoding::encode(key), urlencoding::encode(value)))
            .collect::<Vec<String>>()
            .join("&");
        self.with_params(encoded)
    }

    pub fn with_content_type(mut self, content_type: impl Into<String>) -> Request {
        self.content_type = Some(content_type.into());
        self
    }

    pub fn with_if_modified_since(mut self, value: impl Into<String>) -> Request {
        self.if_modified_since = Some(value.into());
        self
    }

    pub fn with_if_none_match(mut self, value: impl Into<String>) -> Request {
        self.if_none_match = Some(value.into());
        self
    }

    pub fn raw_url(&self) -> &str {
        &self.raw_url
    }

    /// Parsed target, `None` when the raw URL does not parse.
    pub fn url(&self) -> Option<Url> {
        Url::parse(self.raw_url.trim()).ok()
    }

    pub fn method(&self) -> Option<Method> {
        self.method
    }

    pub fn params(&self) -> Option<&str> {
        self.params.as_deref()
    }

    pub fn content_type(&self) -> Option<&str> {
        self.content_type.as_deref()
    }

    pub fn if_modified_since(&self) -> Option<&str> {
        self.if_modified_since.as_deref()
    }

    pub fn if_none_match(&self) -> Option<&str> {
        self.if_none_match.as_deref()
    }

    /// `Content-Type` header value sent with a POST body.
    pub fn effective_content_type(&self) -> String {
        let content_type = match self.content_type.as_deref() {
            Some(content_type) if !content_type.trim().is_empty() => content_type.to_string(),
            _ => mime::APPLICATION_WWW_FORM_URLENCODED.to_string(),
        };
        format!("{};charset={}", content_type, CHARSET_UTF8)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_method_from_str() {
        assert_eq!("GET".parse::<Method>(), Ok(Method::Get));
        assert_eq!("post".parse::<Method>(), Ok(Method::Post));
        assert_eq!("PUT".parse::<Method>(), Err(UnknownMethod("PUT".to_string())));
    }

    #[test]
    fn test_default_content_type() {
        let request = Request::post("http://example.com/form");
        assert_eq!(request.effective_content_type(), "application/x-www-form-urlencoded;charset=utf-8");
    }

    #[test]
    fn test_explicit_content_type() {
        let request = Request::post("http://example.com/form").with_content_type("application/json");
        assert_eq!(request.effective_content_type(), "application/json;charset=utf-8");
    }

    #[test]
    fn test_form_encoding() {
        let request = Request::post("http://example.com/form")
            .with_form(&[("name", "new image"), ("a&b", "1=2")]);
        assert_eq!(request.params(), Some("name=new%20image&a%26b=1%3D2"));
    }

    #[test]
    fn test_url_resolution() {
        assert!(Request::get("http://example.com/a").url().is_some());
        assert!(Request::get("not a url").url().is_none());
        assert!(Request::get("").url().is_none());
    }

    #[test]
    fn test_method_is_optional() {
        assert_eq!(Request::new("http://example.com").method(), None);
        assert_eq!(Request::get("http://example.com").method(), Some(Method::Get));
    }
}
