use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum DispatchError {
    /// The request carries no method this dispatcher can send.
    #[error("unsupported request method for {0}")]
    UnsupportedMethod(String),
}
