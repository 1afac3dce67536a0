//! Error types for call-site profiling
//!
//! Misuse of the enter/exit protocol is reported as a value rather than a
//! panic, so the host can choose to crash, log, or keep running.

use crate::site::Handle;
use thiserror::Error;

/// Errors that can occur while recording or reporting intervals
#[derive(Error, Debug)]
pub enum ProfilerError {
    #[error("Unbalanced exit: call site {handle} has no open interval")]
    UnbalancedExit { handle: Handle },

    #[error("Unknown handle {handle}: not issued by this profiler")]
    UnknownHandle { handle: Handle },

    #[error("Profiler used before initialize()")]
    NotInitialized,

    #[error("Profiler already initialized")]
    AlreadyInitialized,

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for profiler operations
pub type Result<T> = std::result::Result<T, ProfilerError>;
