use std::io::{Read, Write};

use thiserror::Error;
use url::Url;

use crate::request::Method;

pub mod ureq_transport;

#[cfg(test)]
pub(crate) mod scripted;

pub use ureq_transport::UreqTransport;

#[derive(Debug, Error)]
pub enum TransportError {
    #[error("Connection refused")]
    ConnectionRefused,
    #[error("{0}")]
    Io(#[from] std::io::Error),
    #[error("{0}")]
    Failed(String),
}

/// Opens connections to origin servers.
pub trait Transport: Send + Sync {
    fn open(&self, url: &Url, method: Method) -> Result<Box<dyn Connection>, TransportError>;
}

/// A request being prepared. Nothing reaches the network before `connect`.
pub trait Connection {
    fn set_header(&mut self, name: &str, value: &str);
    /// Allows the transport to answer from validators it keeps itself.
    fn set_use_caches(&mut self, use_caches: bool);
    fn set_if_modified_since(&mut self, epoch_millis: i64);
    /// Sink for the request body. The stream is released when the returned
    /// box is dropped.
    fn output_stream(&mut self) -> Result<Box<dyn Write + '_>, TransportError>;
    fn connect(self: Box<Self>) -> Result<Box<dyn Exchange>, TransportError>;
}

/// A response as received from the origin, with its body not yet read.
pub trait Exchange {
    fn status_code(&self) -> u16;
    fn header_fields(&self) -> Vec<(String, Vec<String>)>;
    fn input_stream(self: Box<Self>) -> Box<dyn Read>;
    fn error_stream(self: Box<Self>) -> Box<dyn Read>;
}
