//! Shared helper functions for rule implementations.

use crate::engine::op::{MemberRef, Operation, SourceRange};
use crate::parser::ParsedFile;

/// Convert a byte range into (line, column, end_line, end_column),
/// all 1-based.
pub fn range_to_location(file: &ParsedFile, range: SourceRange) -> (usize, usize, usize, usize) {
    let (line, column) = offset_to_location(file.source(), range.lo);
    let (end_line, end_column) = offset_to_location(file.source(), range.hi);
    (line, column, end_line, end_column)
}

fn offset_to_location(source: &str, offset: u32) -> (usize, usize) {
    let lo = offset as usize;

    if source.is_empty() || lo == 0 {
        return (1, 1);
    }

    let prefix = &source[..lo.min(source.len())];
    let line = prefix.matches('\n').count() + 1;
    let last_newline = prefix.rfind('\n').map(|i| i + 1).unwrap_or(0);
    let column = lo - last_newline + 1;

    (line, column)
}

/// Display label for an operation's target, preferring the
/// owner-qualified signature when the receiver resolved.
pub fn operation_label(op: &Operation) -> Option<String> {
    let target = match op {
        Operation::Invocation { target, .. } => target,
        Operation::PropertyAccess { target, .. } => target,
        Operation::Other { .. } => return None,
    };

    Some(member_label(target))
}

fn member_label(target: &MemberRef) -> String {
    match target.signature() {
        Some(signature) => signature.to_string(),
        None => target.name.clone(),
    }
}
