//! Diagnostics plumbing for grove behavior trees.
//!
//! The parser and the nodes only ever talk to a [`LogSink`]. Hosts pick where
//! records end up: `tracing` (the default), an in-memory buffer, or nowhere.

#![cfg_attr(docsrs, feature(doc_cfg))]
#![forbid(unsafe_code)]

pub mod log;

pub use log::{
    emit, LogHistory, LogLevel, LogRecord, LogSink, NullSink, TracingSink, VecSink, LOG_HISTORY,
    LOG_SINK,
};
