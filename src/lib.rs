//! Concurrent loader for gzip-compressed device/app logs.
//!
//! Each input line is parsed into a [`domain::Record`], routed by device
//! type to one of several key-value backends, and written by a bounded pool
//! of concurrent tasks. Files are handled strictly one at a time, oldest
//! first; each is judged against an error-rate threshold and then renamed
//! with a leading marker.

pub mod app;
pub mod domain;
pub mod engine;
pub mod io;
pub mod pipeline;
pub mod prelude;
pub mod storage;
