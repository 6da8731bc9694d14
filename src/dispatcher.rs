use std::io::Write;

use log::{debug, warn};

use crate::cache::{self, SharedCache};
use crate::error::DispatchError;
use crate::http_cache::{ExpirationCacheHandler, Freshness, HttpCacheHandler, Validators};
use crate::http_date::{Clock, SystemClock};
use crate::request::{Method, Request, CHARSET_UTF8};
use crate::response::{Response, HEADER_ACCEPT_CHARSET, HEADER_CONTENT_TYPE, HEADER_IF_NONE_MATCH};
use crate::transport::{Connection, Exchange, Transport, TransportError};

pub mod interpreter;

pub const URL_ERROR: &str = "URL error";

/// Serves requests from the cache while fresh and revalidates or refetches
/// them over the transport otherwise.
///
/// Concurrent dispatches of the same URL are not coalesced: both may reach
/// the origin and the last one to finish owns the cache entry.
pub struct Dispatcher {
    transport: Box<dyn Transport>,
    cache: SharedCache,
    cache_handler: Box<dyn HttpCacheHandler + Send + Sync>,
    clock: Box<dyn Clock>,
}

impl Dispatcher {
    pub fn new(transport: Box<dyn Transport>, cache: SharedCache) -> Dispatcher {
        Dispatcher {
            transport,
            cache,
            cache_handler: Box::new(ExpirationCacheHandler),
            clock: Box::new(SystemClock),
        }
    }

    pub fn with_clock(mut self, clock: Box<dyn Clock>) -> Dispatcher {
        self.clock = clock;
        self
    }

    pub fn with_cache_handler(mut self, cache_handler: Box<dyn HttpCacheHandler + Send + Sync>) -> Dispatcher {
        self.cache_handler = cache_handler;
        self
    }

    pub fn dispatch(&self, request: &Request) -> Result<Response, DispatchError> {
        let cache_key = request.raw_url();
        let cached = cache::lookup(&self.cache, cache_key);
        let freshness = self.cache_handler.freshness(cached.as_ref(), self.clock.now());
        let cached = match (freshness, cached) {
            (Freshness::Fresh, Some(cached)) => {
                debug!("Serving {} from cache", cache_key);
                return Ok(cached);
            }
            (_, cached) => cached,
        };

        let validators = Validators::attach(cached.as_ref(), request);
        let response = cached.unwrap_or_default();

        match request.method() {
            Some(Method::Get) => Ok(self.send_get(request, response, &validators)),
            Some(Method::Post) => Ok(self.send_post(request, response, &validators)),
            None => Err(DispatchError::UnsupportedMethod(cache_key.to_string())),
        }
    }

    fn send_get(&self, request: &Request, mut response: Response, validators: &Validators) -> Response {
        let url = match request.url() {
            Some(url) => url,
            None => {
                response.fail_locally(URL_ERROR);
                return response;
            }
        };
        let exchange = self.transport.open(&url, Method::Get).and_then(|mut connection| {
            apply_validators(&mut *connection, validators);
            connection.set_header(HEADER_ACCEPT_CHARSET, CHARSET_UTF8);
            connection.connect()
        });
        self.complete(request.raw_url(), response, exchange)
    }

    fn send_post(&self, request: &Request, mut response: Response, validators: &Validators) -> Response {
        let url = match request.url() {
            Some(url) => url,
            None => {
                response.fail_locally(URL_ERROR);
                return response;
            }
        };
        let content_type = request.effective_content_type();
        let exchange = self.transport.open(&url, Method::Post).and_then(|mut connection| {
            apply_validators(&mut *connection, validators);
            connection.set_header(HEADER_ACCEPT_CHARSET, CHARSET_UTF8);
            connection.set_header(HEADER_CONTENT_TYPE, &content_type);
            if let Some(params) = request.params().filter(|params| !params.is_empty()) {
                let mut output = connection.output_stream()?;
                output.write_all(params.as_bytes())?;
                output.flush()?;
            }
            connection.connect()
        });
        self.complete(request.raw_url(), response, exchange)
    }

    fn complete(
        &self,
        cache_key: &str,
        mut response: Response,
        exchange: Result<Box<dyn Exchange>, TransportError>,
    ) -> Response {
        let result = exchange.and_then(|exchange| {
            interpreter::interpret(cache_key, &mut response, exchange, &self.cache).map_err(TransportError::from)
        });
        match result {
            Ok(()) => {}
            Err(TransportError::ConnectionRefused) => {
                debug!("Connection to {} refused", cache_key);
                response.fail_locally(TransportError::ConnectionRefused.to_string());
            }
            Err(e) => {
                warn!("Dispatch of {} failed: {}", cache_key, e);
                response.fail_locally(e.to_string());
            }
        }
        response
    }
}

fn apply_validators(connection: &mut dyn Connection, validators: &Validators) {
    if validators.is_empty() {
        return;
    }
    connection.set_use_caches(true);
    if let Some(epoch_millis) = validators.if_modified_since_millis() {
        connection.set_if_modified_since(epoch_millis);
    }
    if let Some(etag) = validators.if_none_match.as_deref() {
        connection.set_header(HEADER_IF_NONE_MATCH, etag);
    }
}
