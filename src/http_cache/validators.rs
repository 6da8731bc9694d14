use crate::request::Request;
use crate::response::{Response, HEADER_ETAG, HEADER_LAST_MODIFIED};

/// Revalidation context carried from the cache lookup into dispatch.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Validators {
    pub if_modified_since: Option<String>,
    pub if_none_match: Option<String>,
}

fn non_empty(value: Option<&str>) -> Option<String> {
    match value {
        Some(value) if !value.trim().is_empty() => Some(value.to_string()),
        _ => None,
    }
}

impl Validators {
    /// Starts from the conditional fields the caller put on `request` and
    /// overrides them with whatever the stored response can vouch for.
    pub fn attach(stored: Option<&Response>, request: &Request) -> Validators {
        let mut validators = Validators {
            if_modified_since: non_empty(request.if_modified_since()),
            if_none_match: non_empty(request.if_none_match()),
        };
        let stored = match stored {
            Some(stored) => stored,
            None => return validators,
        };
        if let Some(last_modified) = non_empty(stored.header(HEADER_LAST_MODIFIED)) {
            validators.if_modified_since = Some(last_modified);
        }
        if let Some(etag) = non_empty(stored.header(HEADER_ETAG)) {
            validators.if_none_match = Some(etag);
        }
        validators
    }

    pub fn is_empty(&self) -> bool {
        self.if_modified_since.is_none() && self.if_none_match.is_none()
    }

    /// `if_modified_since` read as epoch milliseconds.
    pub fn if_modified_since_millis(&self) -> Option<i64> {
        let value = self.if_modified_since.as_deref()?;
        match value.trim().parse::<i64>() {
            Ok(millis) => Some(millis),
            Err(e) => {
                log::trace!("If-Modified-Since {:?} is not epoch millis: {}", value, e);
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const URL: &str = "http://example.com/a";

    #[test]
    fn test_no_stored_response() {
        let validators = Validators::attach(None, &Request::get(URL));
        assert!(validators.is_empty());
    }

    #[test]
    fn test_copies_both_validators() {
        let stored = Response::new(200)
            .with_header(HEADER_ETAG, "\"v1\"")
            .with_header(HEADER_LAST_MODIFIED, "1633348800000");
        let validators = Validators::attach(Some(&stored), &Request::get(URL));
        assert_eq!(validators.if_none_match.as_deref(), Some("\"v1\""));
        assert_eq!(validators.if_modified_since.as_deref(), Some("1633348800000"));
        assert_eq!(validators.if_modified_since_millis(), Some(1633348800000));
    }

    #[test]
    fn test_empty_headers_are_ignored() {
        let stored = Response::new(200)
            .with_header(HEADER_ETAG, "")
            .with_header(HEADER_LAST_MODIFIED, "  ");
        assert!(Validators::attach(Some(&stored), &Request::get(URL)).is_empty());
    }

    #[test]
    fn test_non_numeric_last_modified_has_no_millis() {
        let stored = Response::new(200).with_header(HEADER_LAST_MODIFIED, "Mon, 04 Oct 2021 12:00:00 GMT");
        let validators = Validators::attach(Some(&stored), &Request::get(URL));
        assert!(!validators.is_empty());
        assert_eq!(validators.if_modified_since_millis(), None);
    }

    #[test]
    fn test_stored_validators_override_request() {
        let request = Request::get(URL)
            .with_if_none_match("\"caller\"")
            .with_if_modified_since("1");
        let stored = Response::new(200).with_header(HEADER_ETAG, "\"stored\"");
        let validators = Validators::attach(Some(&stored), &request);
        assert_eq!(validators.if_none_match.as_deref(), Some("\"stored\""));
        assert_eq!(validators.if_modified_since.as_deref(), Some("1"));
    }
}
