//! Host-agnostic detection and rewrite engine.
//!
//! Nothing in this module knows about swc or the filesystem. Hosts supply
//! operation nodes ([`op::Operation`]), resolve enclosing methods
//! ([`detect::SemanticContext`]), and execute whole-program renames
//! ([`rewrite::RenameHost`]). All engine-internal state (the pattern
//! catalog) is immutable, so the engine is safe to drive from many worker
//! threads at once.

pub mod cancel;
pub mod catalog;
pub mod detect;
pub mod op;
pub mod rewrite;

pub use cancel::{Cancellable, CancellationToken};
pub use catalog::BlockingCatalog;
pub use detect::{SemanticContext, analyze, classify};
pub use op::{EnclosingMethod, Finding, MemberRef, MethodSymbol, Operation, Signature, SourceRange};
pub use rewrite::{RenameHost, RenamePlan, apply_fix, compute_new_name, propose_fix};

/// Failures surfaced by the engine. Resolution misses are not errors:
/// they come back as `Ok(None)` from the operations that can miss.
#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    #[error("operation cancelled")]
    Cancelled,

    /// The computed replacement name equals the current name. This is a
    /// defect signal, not a user-facing condition: offering a no-op
    /// rename would mislead the caller.
    #[error("rename of '{name}' would not change the name")]
    RenameUnchanged { name: String },

    #[error("host facility failed: {0}")]
    Host(String),
}
