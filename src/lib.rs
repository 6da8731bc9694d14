pub mod cache;
pub mod config;
pub mod dispatcher;
pub mod error;
pub mod http_cache;
pub mod http_date;
pub mod request;
pub mod response;
pub mod transport;

pub use dispatcher::Dispatcher;
pub use error::DispatchError;
pub use request::{Method, Request};
pub use response::Response;
