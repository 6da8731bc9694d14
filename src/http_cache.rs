use chrono::{DateTime, Utc};

use crate::response::Response;

pub mod expiration_handler;
pub mod validators;

pub use expiration_handler::ExpirationCacheHandler;
pub use validators::Validators;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Freshness {
    /// The stored response may be served without contacting the origin.
    Fresh,
    Stale,
}

pub trait HttpCacheHandler {
    fn freshness(&self, stored: Option<&Response>, now: DateTime<Utc>) -> Freshness;
}
