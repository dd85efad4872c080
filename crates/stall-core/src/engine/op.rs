//! Operation tree handed to the engine by a host.
//!
//! The engine never sees a host AST directly. A host lowers each semantic
//! expression it wants classified into an [`Operation`], a tagged variant
//! of the shapes the detection rules care about.

use std::fmt;

/// Owner-qualified member signature, e.g. `fs.readFileSync`. Compared by
/// exact, case-sensitive string equality against the catalog tables.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Signature(String);

impl Signature {
    pub fn new(owner: &str, member: &str) -> Self {
        Self(format!("{owner}.{member}"))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Signature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Byte range within one source document, host-relative.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SourceRange {
    pub lo: u32,
    pub hi: u32,
}

impl SourceRange {
    pub fn new(lo: u32, hi: u32) -> Self {
        Self { lo, hi }
    }

    pub fn contains(&self, pos: u32) -> bool {
        self.lo <= pos && pos < self.hi
    }

    pub fn width(&self) -> u32 {
        self.hi.saturating_sub(self.lo)
    }
}

/// Reference to a member as resolved by the host's symbol model. The
/// owner is present only when the host could resolve the receiver; the
/// simple name is always available for duck-typed matching.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MemberRef {
    pub name: String,
    pub owner: Option<String>,
}

impl MemberRef {
    pub fn new(name: impl Into<String>, owner: Option<String>) -> Self {
        Self {
            name: name.into(),
            owner,
        }
    }

    /// Owner-qualified signature, when the owner resolved.
    pub fn signature(&self) -> Option<Signature> {
        self.owner
            .as_deref()
            .map(|owner| Signature::new(owner, &self.name))
    }
}

/// One semantic-level expression, lowered by the host. Read-only: the
/// engine never mutates operations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Operation {
    Invocation {
        target: MemberRef,
        /// The receiver expression, lowered in turn. `None` for bare
        /// calls like `doWork()`.
        receiver: Option<Box<Operation>>,
        range: SourceRange,
    },
    PropertyAccess {
        target: MemberRef,
        range: SourceRange,
    },
    /// Any expression shape the engine does not classify.
    Other { range: SourceRange },
}

impl Operation {
    pub fn range(&self) -> SourceRange {
        match self {
            Operation::Invocation { range, .. }
            | Operation::PropertyAccess { range, .. }
            | Operation::Other { range } => *range,
        }
    }
}

/// The method lexically enclosing a source position. Resolved on demand
/// per finding; never cached across findings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnclosingMethod {
    pub name: String,
    pub is_async: bool,
}

/// A confirmed rule violation: source range plus rule identifier.
/// Immutable once produced.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Finding {
    pub rule_id: &'static str,
    pub range: SourceRange,
}

/// Handle to a named method declaration, as resolved by the host for the
/// rewrite side. The range covers the declaration identifier.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MethodSymbol {
    pub name: String,
    pub ident_range: SourceRange,
}
