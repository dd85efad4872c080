//! Rewrite engine: compute the corrected name for an async method and
//! drive the host's whole-program rename facility.

use super::EngineError;
use super::cancel::CancellationToken;
use super::op::{Finding, MethodSymbol, SourceRange};

/// Canonical suffix for asynchronous method names.
pub const ASYNC_SUFFIX: &str = "Async";

/// Host-side rename facility. `rename` is a single blocking
/// request-response covering every reference site, not just the
/// declaration; it returns the updated program snapshot.
pub trait RenameHost {
    type Snapshot;

    fn resolve_method(
        &self,
        range: SourceRange,
        token: &CancellationToken,
    ) -> Result<Option<MethodSymbol>, EngineError>;

    fn rename(
        &self,
        symbol: &MethodSymbol,
        new_name: &str,
        token: &CancellationToken,
    ) -> Result<Self::Snapshot, EngineError>;
}

/// A program-wide identifier rename, computed per accepted fix and
/// applied atomically by the host.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenamePlan {
    pub old_name: String,
    pub new_name: String,
    /// Human-readable title embedding both names, for presentation.
    pub title: String,
    pub symbol: MethodSymbol,
}

/// Compute the corrected method name.
///
/// When the final 5 characters are an anagram of `ASYNC` after uppercase
/// folding (a transposed or wrong-case rendition of the suffix), the
/// matched run is stripped and the canonical suffix appended; otherwise
/// the suffix is appended to the full name. Names shorter than 5
/// characters never take the anagram path.
pub fn compute_new_name(name: &str) -> String {
    if has_misspelled_suffix(name) {
        let chars: Vec<char> = name.chars().collect();
        let stem: String = chars[..chars.len() - ASYNC_SUFFIX.len()].iter().collect();
        format!("{stem}{ASYNC_SUFFIX}")
    } else {
        format!("{name}{ASYNC_SUFFIX}")
    }
}

fn has_misspelled_suffix(name: &str) -> bool {
    // The full name is case-folded, not just the suffix run. That is
    // redundant but matches the established matching behavior; changing
    // it could change which near-miss spellings are detected.
    let folded: Vec<char> = name.to_uppercase().chars().collect();
    if folded.len() < ASYNC_SUFFIX.len() {
        return false;
    }
    let tail = &folded[folded.len() - ASYNC_SUFFIX.len()..];
    is_anagram_of_async(tail)
}

fn is_anagram_of_async(tail: &[char]) -> bool {
    let mut sorted: Vec<char> = tail.to_vec();
    sorted.sort_unstable();
    sorted == ['A', 'C', 'N', 'S', 'Y']
}

/// Compute a rename plan for the method at the finding's location.
///
/// A resolution miss returns `Ok(None)` (fix not offered). A computed
/// name equal to the current name is a defect signal and fails loudly.
pub fn propose_fix<H: RenameHost>(
    finding: &Finding,
    host: &H,
    token: &CancellationToken,
) -> Result<Option<RenamePlan>, EngineError> {
    let Some(symbol) = host.resolve_method(finding.range, token)? else {
        return Ok(None);
    };

    let new_name = compute_new_name(&symbol.name);
    if new_name == symbol.name {
        return Err(EngineError::RenameUnchanged { name: new_name });
    }

    let title = format!("Rename '{}' to '{}'", symbol.name, new_name);
    Ok(Some(RenamePlan {
        old_name: symbol.name.clone(),
        new_name,
        title,
        symbol,
    }))
}

/// Apply an accepted plan: one whole-program rename transaction. Host
/// failures and cancellation propagate; there are no retries.
pub fn apply_fix<H: RenameHost>(
    plan: &RenamePlan,
    host: &H,
    token: &CancellationToken,
) -> Result<H::Snapshot, EngineError> {
    host.rename(&plan.symbol, &plan.new_name, token)
}
