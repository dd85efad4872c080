//! async-suffix rule (A001): Async functions should carry the `Async`
//! name suffix.
//!
//! Flags named async functions and methods whose name does not end in
//! the suffix. The suggested replacement repairs a transposed or
//! wrong-case suffix instead of stacking a second one.

use crate::declare_rule;
use crate::diagnostic::Diagnostic;
use crate::engine::EngineError;
use crate::engine::cancel::CancellationToken;
use crate::engine::op::Finding;
use crate::engine::rewrite::{ASYNC_SUFFIX, compute_new_name};
use crate::parser::ParsedFile;
use crate::rules::helpers::range_to_location;
use crate::rules::{Rule, RuleMetadata, Severity};
use crate::semantic::SemanticModel;

pub const ASYNC_NAMING: &str = "A001";

declare_rule!(
    AsyncSuffix,
    id = "A001",
    name = "async-suffix",
    description = "Require async function names to end in 'Async'",
    category = ApiDesign,
    severity = Warning,
    examples = "// Bad\nasync function fetchUser() {}\n\n// Good\nasync function fetchUserAsync() {}"
);

/// Findings for every named async function missing the suffix. The
/// finding range covers the declaration identifier, which is what the
/// rename facility resolves against.
pub fn naming_findings(file: &ParsedFile) -> Vec<Finding> {
    let model = SemanticModel::build(file);

    model
        .functions()
        .iter()
        .filter(|scope| scope.is_async)
        .filter(|scope| {
            scope
                .name
                .as_deref()
                .is_some_and(|name| !name.ends_with(ASYNC_SUFFIX))
        })
        .filter_map(|scope| {
            scope.ident_range.map(|range| Finding {
                rule_id: ASYNC_NAMING,
                range,
            })
        })
        .collect()
}

impl Rule for AsyncSuffix {
    fn metadata(&self) -> &RuleMetadata {
        &self.metadata
    }

    fn check(
        &self,
        file: &ParsedFile,
        token: &CancellationToken,
    ) -> Result<Vec<Diagnostic>, EngineError> {
        token.checkpoint()?;

        let diagnostics = naming_findings(file)
            .into_iter()
            .map(|finding| {
                let (lo, hi) = (finding.range.lo as usize, finding.range.hi as usize);
                let name = &file.source()[lo..hi];
                let (line, column, end_line, end_column) = range_to_location(file, finding.range);

                Diagnostic::new(
                    finding.rule_id,
                    Severity::Warning,
                    format!("Async function '{name}' should be named '{}'", compute_new_name(name)),
                    &file.metadata().filename,
                    line,
                    column,
                )
                .with_end(end_line, end_column)
                .with_suggestion(format!("Rename '{name}' to '{}'", compute_new_name(name)))
            })
            .collect();

        Ok(diagnostics)
    }
}
