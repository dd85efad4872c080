//! Detection engine: classify one operation node, then confirm the
//! asynchronous enclosing context.

use super::EngineError;
use super::cancel::CancellationToken;
use super::catalog::{BlockingCatalog, matches_awaiter_protocol};
use super::op::{EnclosingMethod, Finding, Operation, SourceRange};

/// Rule identifier for blocking constructs inside async functions.
pub const BLOCKING_IN_ASYNC: &str = "R001";

/// Host-side semantic facility. Each lookup is independent; the engine
/// never caches enclosing methods across findings.
pub trait SemanticContext {
    fn enclosing_method(
        &self,
        range: SourceRange,
        token: &CancellationToken,
    ) -> Result<Option<EnclosingMethod>, EngineError>;
}

/// Is this operation a blocking construct? Cheap and local: string
/// comparisons only, no host calls.
pub fn classify(op: &Operation, catalog: &BlockingCatalog) -> bool {
    match op {
        Operation::Invocation { target, .. } => {
            if let Some(signature) = target.signature()
                && catalog.is_blocking_method(&signature)
            {
                return true;
            }
            matches_awaiter_protocol(op)
        }
        Operation::PropertyAccess { target, .. } => target
            .signature()
            .is_some_and(|signature| catalog.is_blocking_property(&signature)),
        Operation::Other { .. } => false,
    }
}

/// Produce a finding for `op` if it is blocking and its enclosing method
/// is declared asynchronous.
///
/// Classification runs first so the overwhelming majority of nodes are
/// rejected without touching the host's semantic model. A missing
/// enclosing method is an expected condition and skips silently.
pub fn analyze<H: SemanticContext>(
    op: &Operation,
    catalog: &BlockingCatalog,
    host: &H,
    token: &CancellationToken,
) -> Result<Option<Finding>, EngineError> {
    if !classify(op, catalog) {
        return Ok(None);
    }

    let Some(enclosing) = host.enclosing_method(op.range(), token)? else {
        return Ok(None);
    };

    if !enclosing.is_async {
        return Ok(None);
    }

    Ok(Some(Finding {
        rule_id: BLOCKING_IN_ASYNC,
        range: op.range(),
    }))
}
