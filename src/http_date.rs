use chrono::{DateTime, TimeZone, Utc};

/// `Sun, 06 Nov 1994 08:49:37 GMT`
const RFC1123_FORMAT: &str = "%a, %d %b %Y %H:%M:%S GMT";

pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Utc>;
}

#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

#[derive(Debug, Clone, Copy)]
pub struct FixedClock(pub DateTime<Utc>);

impl Clock for FixedClock {
    fn now(&self) -> DateTime<Utc> {
        self.0
    }
}

/// Parses an RFC 1123 HTTP date. Explicit offsets such as `+0200` are honoured
/// and the result is normalised to UTC.
pub fn parse(value: &str) -> Option<DateTime<Utc>> {
    match DateTime::parse_from_rfc2822(value.trim()) {
        Ok(date) => Some(date.with_timezone(&Utc)),
        Err(e) => {
            log::trace!("Unparseable HTTP date {:?}: {}", value, e);
            None
        }
    }
}

pub fn format(date: DateTime<Utc>) -> String {
    date.format(RFC1123_FORMAT).to_string()
}

pub fn format_millis(epoch_millis: i64) -> Option<String> {
    Utc.timestamp_millis_opt(epoch_millis).single().map(format)
}
