//! Uniform AST traversal for rules.
//!
//! Rules implement [`AstVisitor`] and receive a [`VisitorContext`] carrying
//! the parsed file, so span-to-location conversion lives in one place.

mod context;
mod traits;
mod walk;

pub use context::VisitorContext;
pub use traits::AstVisitor;
pub use walk::walk_ast;
