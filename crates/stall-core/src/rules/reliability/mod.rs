//! Reliability rules.

pub mod blocking_async;

pub use blocking_async::NoBlockingInAsync;
