//! In-memory transport answering from a queue of prepared replies and
//! recording every connection it sees.

use std::collections::VecDeque;
use std::io::{self, Cursor, Read, Write};
use std::sync::{Arc, Mutex};

use url::Url;

use super::{Connection, Exchange, Transport, TransportError};
use crate::request::Method;

#[derive(Debug, Clone, PartialEq)]
pub struct RecordedCall {
    pub url: String,
    pub method: Method,
    pub headers: Vec<(String, String)>,
    pub use_caches: bool,
    pub if_modified_since: Option<i64>,
    pub body: Vec<u8>,
}

impl RecordedCall {
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(key, _)| key.eq_ignore_ascii_case(name))
            .map(|(_, value)| value.as_str())
    }
}

#[derive(Debug, Clone, Default)]
pub struct Reply {
    pub status: u16,
    pub headers: Vec<(String, Vec<String>)>,
    pub body: String,
    pub broken_body: bool,
}

impl Reply {
    pub fn new(status: u16) -> Reply {
        Reply {
            status,
            ..Reply::default()
        }
    }

    pub fn header(mut self, name: &str, value: &str) -> Reply {
        self.headers.push((name.to_string(), vec![value.to_string()]));
        self
    }

    pub fn body(mut self, body: &str) -> Reply {
        self.body = body.to_string();
        self
    }

    /// Reading the body fails half way through.
    pub fn broken_body(mut self) -> Reply {
        self.broken_body = true;
        self
    }
}

#[derive(Default)]
pub struct ScriptedTransport {
    replies: Mutex<VecDeque<Result<Reply, TransportError>>>,
    calls: Arc<Mutex<Vec<RecordedCall>>>,
}

impl ScriptedTransport {
    pub fn new() -> ScriptedTransport {
        ScriptedTransport::default()
    }

    pub fn reply(self, reply: Reply) -> ScriptedTransport {
        self.replies.lock().unwrap().push_back(Ok(reply));
        self
    }

    pub fn fail(self, error: TransportError) -> ScriptedTransport {
        self.replies.lock().unwrap().push_back(Err(error));
        self
    }

    /// Handle that keeps observing calls after the transport is moved into a
    /// dispatcher.
    pub fn calls(&self) -> Arc<Mutex<Vec<RecordedCall>>> {
        self.calls.clone()
    }
}

impl Transport for ScriptedTransport {
    fn open(&self, url: &Url, method: Method) -> Result<Box<dyn Connection>, TransportError> {
        let reply = self
            .replies
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Err(TransportError::Failed(format!("no reply scripted for {}", url))));
        Ok(Box::new(ScriptedConnection {
            call: RecordedCall {
                url: url.to_string(),
                method,
                headers: Vec::new(),
                use_caches: false,
                if_modified_since: None,
                body: Vec::new(),
            },
            reply,
            calls: self.calls.clone(),
        }))
    }
}

impl Transport for Arc<ScriptedTransport> {
    fn open(&self, url: &Url, method: Method) -> Result<Box<dyn Connection>, TransportError> {
        ScriptedTransport::open(self, url, method)
    }
}

struct ScriptedConnection {
    call: RecordedCall,
    reply: Result<Reply, TransportError>,
    calls: Arc<Mutex<Vec<RecordedCall>>>,
}

impl Connection for ScriptedConnection {
    fn set_header(&mut self, name: &str, value: &str) {
        self.call.headers.push((name.to_string(), value.to_string()));
    }

    fn set_use_caches(&mut self, use_caches: bool) {
        self.call.use_caches = use_caches;
    }

    fn set_if_modified_since(&mut self, epoch_millis: i64) {
        self.call.if_modified_since = Some(epoch_millis);
    }

    fn output_stream(&mut self) -> Result<Box<dyn Write + '_>, TransportError> {
        Ok(Box::new(&mut self.call.body))
    }

    fn connect(self: Box<Self>) -> Result<Box<dyn Exchange>, TransportError> {
        let ScriptedConnection { call, reply, calls } = *self;
        calls.lock().unwrap().push(call);
        let reply = reply?;
        Ok(Box::new(ScriptedExchange { reply }))
    }
}

struct ScriptedExchange {
    reply: Reply,
}

struct BrokenReader;

impl Read for BrokenReader {
    fn read(&mut self, _: &mut [u8]) -> io::Result<usize> {
        Err(io::Error::new(io::ErrorKind::ConnectionReset, "connection reset"))
    }
}

impl ScriptedExchange {
    fn stream(self) -> Box<dyn Read> {
        if self.reply.broken_body {
            return Box::new(Cursor::new(self.reply.body.into_bytes()).chain(BrokenReader));
        }
        Box::new(Cursor::new(self.reply.body.into_bytes()))
    }
}

impl Exchange for ScriptedExchange {
    fn status_code(&self) -> u16 {
        self.reply.status
    }

    fn header_fields(&self) -> Vec<(String, Vec<String>)> {
        self.reply.headers.clone()
    }

    fn input_stream(self: Box<Self>) -> Box<dyn Read> {
        (*self).stream()
    }

    fn error_stream(self: Box<Self>) -> Box<dyn Read> {
        (*self).stream()
    }
}
