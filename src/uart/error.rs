//! Error types for the UART bridge.
//!
//! Two classes never mix: [`BridgeError`] only comes out of construction and
//! means no bridge exists, [`SessionError`] only ever ends the current client
//! session and is absorbed by `tick`.

use std::fmt;
use std::io;

use thiserror::Error;

use crate::config::ValidationError;

/// Step of listening-socket setup that failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ListenStage {
    Create,
    ReuseAddress,
    NonBlocking,
    Bind,
    Listen,
}

impl fmt::Display for ListenStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            ListenStage::Create => "creating the listening socket",
            ListenStage::ReuseAddress => "setting the listen socket options",
            ListenStage::NonBlocking => "making the listening socket non-blocking",
            ListenStage::Bind => "binding the socket",
            ListenStage::Listen => "listening on the socket",
        };
        f.write_str(text)
    }
}

/// Fatal error raised while constructing a bridge.
#[derive(Debug, Error)]
pub enum BridgeError {
    #[error("invalid configuration: {}", join(.0))]
    InvalidConfig(Vec<ValidationError>),

    #[error("error {stage}: {source}")]
    Listen {
        stage: ListenStage,
        #[source]
        source: io::Error,
    },
}

fn join(errors: &[ValidationError]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

/// Soft error that ends the current client session.
#[derive(Debug, Error)]
pub enum SessionError {
    #[error("error sending data: {0}")]
    Send(#[source] io::Error),

    #[error("error receiving data: {0}")]
    Receive(#[source] io::Error),
}

impl SessionError {
    /// Short label used for metrics.
    pub fn kind(&self) -> &'static str {
        match self {
            SessionError::Send(_) => "send",
            SessionError::Receive(_) => "receive",
        }
    }
}

/// Consumer-side read failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ReceiveError {
    #[error("the receive buffer is empty")]
    Empty,
}
