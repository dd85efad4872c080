//! Semantic analysis module
//!
//! Builds the per-file function tree and receiver bindings, and lowers
//! expressions into the engine's operation tree.

pub mod functions;
pub mod lowering;
pub mod model;

pub use functions::{AncestorIter, FunctionId, FunctionKind, FunctionScope, FunctionTree};
pub use lowering::{lower_call, lower_expr, lower_member};
pub use model::{ANONYMOUS, SemanticModel};
