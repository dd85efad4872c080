//! API design rules.

pub mod async_naming;

pub use async_naming::{ASYNC_NAMING, AsyncSuffix, naming_findings};
