use thiserror::Error;

use crate::ofp::packet::MacAddr;
use crate::SwitchId;

#[derive(Error, Debug)]
pub enum ControllerError {
    #[error("no path from switch {src} to switch {dst}")]
    NoPath { src: SwitchId, dst: SwitchId },

    #[error("switch {0} is not registered")]
    UnknownSwitch(SwitchId),

    #[error("host {0} has no known attachment point")]
    UnknownHost(MacAddr),

    #[error("malformed frame: {0}")]
    MalformedFrame(String),

    #[error("no port mapping between switch {from} and switch {to}")]
    MissingPorts { from: SwitchId, to: SwitchId },

    #[error("invalid configuration: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl ControllerError {
    /// Lookup failures that the packet path answers by flooding.
    pub fn is_recoverable(&self) -> bool {
        match self {
            ControllerError::NoPath { .. }
            | ControllerError::UnknownHost(_)
            | ControllerError::MissingPorts { .. } => true,
            _ => false,
        }
    }
}
