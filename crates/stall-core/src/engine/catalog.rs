//! Catalog of known-blocking call signatures.
//!
//! Two fixed tables (blocking methods, blocking properties) matched by
//! exact signature equality, plus the duck-typed awaiter protocol: a call
//! to a member named `GetResult` whose receiver is itself a call to a
//! member named `GetAwaiter`. The protocol match is structural on purpose
//! so user-defined awaitable primitives are flagged without being listed
//! in any table.

use std::collections::HashSet;
use std::sync::OnceLock;

use super::op::{Operation, Signature};

/// Member acquiring an awaiter in the duck-typed protocol.
pub const AWAITER_ACQUIRE: &str = "GetAwaiter";
/// Member synchronously extracting the result from an awaiter.
pub const RESULT_EXTRACT: &str = "GetResult";

/// Synchronous Node.js APIs and task-library members that block the
/// calling thread.
const BLOCKING_METHODS: &[&str] = &[
    "Atomics.wait",
    "fs.readFileSync",
    "fs.writeFileSync",
    "fs.appendFileSync",
    "fs.readdirSync",
    "fs.statSync",
    "fs.existsSync",
    "fs.mkdirSync",
    "fs.rmSync",
    "fs.copyFileSync",
    "child_process.execSync",
    "child_process.execFileSync",
    "child_process.spawnSync",
    "crypto.pbkdf2Sync",
    "crypto.scryptSync",
    "zlib.gzipSync",
    "zlib.gunzipSync",
    "zlib.deflateSync",
    "zlib.inflateSync",
    "Task.Wait",
    "Task.WaitAll",
    "Task.WaitAny",
    "Thread.Sleep",
];

/// Property accessors that synchronously join a task-style awaitable.
const BLOCKING_PROPERTIES: &[&str] = &["Task.Result"];

/// Immutable signature tables, populated once and never mutated, so the
/// catalog can be shared across analysis threads without locks.
#[derive(Debug)]
pub struct BlockingCatalog {
    methods: HashSet<&'static str>,
    properties: HashSet<&'static str>,
}

impl BlockingCatalog {
    pub fn with_defaults() -> Self {
        Self {
            methods: BLOCKING_METHODS.iter().copied().collect(),
            properties: BLOCKING_PROPERTIES.iter().copied().collect(),
        }
    }

    /// Process-wide catalog instance used by the built-in rules.
    pub fn global() -> &'static BlockingCatalog {
        static CATALOG: OnceLock<BlockingCatalog> = OnceLock::new();
        CATALOG.get_or_init(BlockingCatalog::with_defaults)
    }

    pub fn is_blocking_method(&self, signature: &Signature) -> bool {
        self.methods.contains(signature.as_str())
    }

    pub fn is_blocking_property(&self, signature: &Signature) -> bool {
        self.properties.contains(signature.as_str())
    }

    pub fn method_count(&self) -> usize {
        self.methods.len()
    }
}

impl Default for BlockingCatalog {
    fn default() -> Self {
        Self::with_defaults()
    }
}

/// Structural match for `receiver.GetAwaiter().GetResult()`. The owner
/// type is deliberately not checked: any type following the awaitable
/// protocol matches.
pub fn matches_awaiter_protocol(op: &Operation) -> bool {
    let Operation::Invocation {
        target, receiver, ..
    } = op
    else {
        return false;
    };

    if target.name != RESULT_EXTRACT {
        return false;
    }

    matches!(
        receiver.as_deref(),
        Some(Operation::Invocation { target: inner, .. }) if inner.name == AWAITER_ACQUIRE
    )
}
