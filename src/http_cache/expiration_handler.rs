use cache_control::CacheControl;
use chrono::{DateTime, Utc};

use crate::http_cache::{Freshness, HttpCacheHandler};
use crate::http_date;
use crate::response::{Response, HEADER_CACHE_CONTROL, HEADER_DATE, HEADER_EXPIRES};

/// Freshness from `Expires`, then from `Cache-Control: max-age` measured
/// against `Date`. Anything that fails to parse counts as stale.
#[derive(Debug, Clone, Copy, Default)]
pub struct ExpirationCacheHandler;

impl ExpirationCacheHandler {
    fn expires_in_future(stored: &Response, now: DateTime<Utc>) -> bool {
        match stored.header(HEADER_EXPIRES) {
            Some(expires) if !expires.trim().is_empty() => {
                matches!(http_date::parse(expires), Some(expires) if expires > now)
            }
            _ => false,
        }
    }

    fn within_max_age(stored: &Response, now: DateTime<Utc>) -> bool {
        let max_age = stored
            .headers()
            .get_joined(HEADER_CACHE_CONTROL)
            .and_then(|cache_control| max_age_seconds(&cache_control))
            .unwrap_or(0);
        let date = match stored.header(HEADER_DATE).and_then(http_date::parse) {
            Some(date) => date,
            None => return false,
        };
        let elapsed_millis = now.signed_duration_since(date).num_milliseconds();
        elapsed_millis < max_age.saturating_mul(1000)
    }
}

impl HttpCacheHandler for ExpirationCacheHandler {
    fn freshness(&self, stored: Option<&Response>, now: DateTime<Utc>) -> Freshness {
        let stored = match stored {
            Some(stored) => stored,
            None => return Freshness::Stale,
        };
        if ExpirationCacheHandler::expires_in_future(stored, now) {
            return Freshness::Fresh;
        }
        if ExpirationCacheHandler::within_max_age(stored, now) {
            return Freshness::Fresh;
        }
        Freshness::Stale
    }
}

/// Seconds of the first `max-age=` directive, `None` when it is missing or
/// not a number.
pub fn max_age_seconds(cache_control: &str) -> Option<i64> {
    CacheControl::from_value(cache_control)
        .and_then(|control| control.max_age)
        .map(|max_age| max_age.as_secs() as i64)
}

pub fn is_fresh(stored: Option<&Response>, now: DateTime<Utc>) -> bool {
    ExpirationCacheHandler.freshness(stored, now) == Freshness::Fresh
}
