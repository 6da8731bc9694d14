use std::io::{self, Read};

use log::debug;

use crate::cache::{self, SharedCache};
use crate::response::Response;
use crate::transport::Exchange;

pub const NOT_MODIFIED_WITHOUT_ENTRY: &str = "Not modified without a cached entry";

fn read_to_string(mut stream: Box<dyn Read>) -> io::Result<String> {
    let mut bytes = Vec::new();
    stream.read_to_end(&mut bytes)?;
    Ok(String::from_utf8_lossy(&bytes).into_owned())
}

/// Folds `exchange` into `response`, storing it under `cache_key` for 2xx
/// answers and for 304 answers that refresh a cached body. Streams are dropped
/// before returning, on every path.
pub fn interpret(
    cache_key: &str,
    response: &mut Response,
    exchange: Box<dyn Exchange>,
    cache: &SharedCache,
) -> io::Result<()> {
    for (name, values) in exchange.header_fields() {
        response.add_header(&name, values);
    }
    let status = exchange.status_code();
    response.set_status_code(i32::from(status));
    debug!("{} answered by origin with {}", cache_key, status);

    match status {
        200..=299 => {
            response.set_body(read_to_string(exchange.input_stream())?);
            cache::store(cache, cache_key, response);
        }
        304 if response.body().is_none() => {
            response.set_error_message(NOT_MODIFIED_WITHOUT_ENTRY);
        }
        304 => {
            cache::store(cache, cache_key, response);
        }
        300..=399 => {
            response.set_error_message(format!("Unsupported redirect status {}", status));
        }
        400..=u16::MAX => {
            response.set_error_message(read_to_string(exchange.error_stream())?);
        }
        _ => {
            response.set_error_message(format!("Unexpected status {}", status));
        }
    }
    Ok(())
}
