//! Core analysis engine for the Stall async-hygiene analyzer.
//!
//! The `engine` module is host-agnostic: it classifies operation nodes
//! against the blocking-pattern catalog and computes rename fixes, talking
//! to its host only through the `SemanticContext` and `RenameHost` traits.
//! The remaining modules are the built-in JavaScript/TypeScript host:
//! swc-based parsing, a function-scope semantic model, and a name-based
//! whole-program rename facility.

pub mod analysis;
pub mod config;
pub mod diagnostic;
pub mod engine;
pub mod parser;
pub mod rename;
pub mod rules;
pub mod semantic;
pub mod visitor;

pub use analysis::AnalysisEngine;
pub use diagnostic::Diagnostic;
pub use parser::ParsedFile;
