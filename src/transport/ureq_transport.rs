use std::io::{Read, Write};
use std::time::Duration;

use url::Url;

use super::{Connection, Exchange, Transport, TransportError};
use crate::config::TransportConfig;
use crate::http_date;
use crate::request::Method;
use crate::response::HEADER_IF_MODIFIED_SINCE;

/// Blocking transport backed by a shared `ureq::Agent`.
pub struct UreqTransport {
    agent: ureq::Agent,
}

impl UreqTransport {
    pub fn new(config: &TransportConfig) -> UreqTransport {
        let agent = ureq::AgentBuilder::new()
            .timeout_connect(Duration::from_secs(config.connect_timeout_secs))
            .timeout_read(Duration::from_secs(config.read_timeout_secs))
            .redirects(config.max_redirects)
            .user_agent(&config.user_agent)
            .build();
        UreqTransport { agent }
    }
}

impl Default for UreqTransport {
    fn default() -> Self {
        UreqTransport::new(&TransportConfig::default())
    }
}

impl Transport for UreqTransport {
    fn open(&self, url: &Url, method: Method) -> Result<Box<dyn Connection>, TransportError> {
        Ok(Box::new(UreqConnection {
            agent: self.agent.clone(),
            url: url.clone(),
            method,
            headers: Vec::new(),
            body: Vec::new(),
        }))
    }
}

struct UreqConnection {
    agent: ureq::Agent,
    url: Url,
    method: Method,
    headers: Vec<(String, String)>,
    body: Vec<u8>,
}

impl Connection for UreqConnection {
    fn set_header(&mut self, name: &str, value: &str) {
        self.headers.retain(|(existing, _)| !existing.eq_ignore_ascii_case(name));
        self.headers.push((name.to_string(), value.to_string()));
    }

    fn set_use_caches(&mut self, use_caches: bool) {
        // ureq keeps no local HTTP cache.
        log::trace!("use_caches={} ignored for {}", use_caches, self.url);
    }

    fn set_if_modified_since(&mut self, epoch_millis: i64) {
        match http_date::format_millis(epoch_millis) {
            Some(date) => self.set_header(HEADER_IF_MODIFIED_SINCE, &date),
            None => log::warn!("If-Modified-Since {} is out of range", epoch_millis),
        }
    }

    fn output_stream(&mut self) -> Result<Box<dyn Write + '_>, TransportError> {
        Ok(Box::new(&mut self.body))
    }

    fn connect(self: Box<Self>) -> Result<Box<dyn Exchange>, TransportError> {
        let mut request = self.agent.request_url(self.method.as_str(), &self.url);
        for (name, value) in self.headers.iter() {
            request = request.set(name, value);
        }
        let result = match self.method {
            Method::Get => request.call(),
            Method::Post => request.send_bytes(&self.body),
        };
        match result {
            Ok(response) | Err(ureq::Error::Status(_, response)) => Ok(Box::new(UreqExchange::new(response))),
            Err(ureq::Error::Transport(transport)) => Err(transport.into()),
        }
    }
}

impl From<ureq::Transport> for TransportError {
    fn from(err: ureq::Transport) -> Self {
        match err.kind() {
            ureq::ErrorKind::ConnectionFailed => TransportError::ConnectionRefused,
            _ => TransportError::Failed(format!("Request to origin failed: {}", err)),
        }
    }
}

struct UreqExchange {
    status: u16,
    headers: Vec<(String, Vec<String>)>,
    response: ureq::Response,
}

impl UreqExchange {
    fn new(response: ureq::Response) -> UreqExchange {
        let headers = response
            .headers_names()
            .into_iter()
            .map(|name| {
                let values = response.all(&name).into_iter().map(String::from).collect();
                (name, values)
            })
            .collect();
        UreqExchange {
            status: response.status(),
            headers,
            response,
        }
    }
}

impl Exchange for UreqExchange {
    fn status_code(&self) -> u16 {
        self.status
    }

    fn header_fields(&self) -> Vec<(String, Vec<String>)> {
        self.headers.clone()
    }

    fn input_stream(self: Box<Self>) -> Box<dyn Read> {
        Box::new(self.response.into_reader())
    }

    fn error_stream(self: Box<Self>) -> Box<dyn Read> {
        Box::new(self.response.into_reader())
    }
}
