//! Name-based whole-program rename facility.
//!
//! A [`Workspace`] is an immutable set of source documents. Renames are
//! applied by reparsing each document and splicing every identifier
//! occurrence of the old name, producing a fresh workspace snapshot.

use std::ops::ControlFlow;

use swc_ecma_ast::{Ident, IdentName};

use crate::engine::EngineError;
use crate::engine::cancel::CancellationToken;
use crate::engine::op::{MethodSymbol, SourceRange};
use crate::engine::rewrite::{RenameHost, RenamePlan, apply_fix, propose_fix};
use crate::parser::ParsedFile;
use crate::rules::api_design::naming_findings;
use crate::visitor::{AstVisitor, VisitorContext, walk_ast};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceDocument {
    pub path: String,
    pub source: String,
}

impl SourceDocument {
    pub fn new(path: impl Into<String>, source: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            source: source.into(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Workspace {
    documents: Vec<SourceDocument>,
}

impl Workspace {
    pub fn from_documents(documents: Vec<SourceDocument>) -> Self {
        Self { documents }
    }

    pub fn documents(&self) -> &[SourceDocument] {
        &self.documents
    }

    pub fn get(&self, path: &str) -> Option<&SourceDocument> {
        self.documents.iter().find(|doc| doc.path == path)
    }
}

/// Rename host over one workspace, resolving symbols against a single
/// active document and renaming across every document.
pub struct WorkspaceHost<'a> {
    workspace: &'a Workspace,
    active_path: &'a str,
}

impl<'a> WorkspaceHost<'a> {
    pub fn new(workspace: &'a Workspace, active_path: &'a str) -> Self {
        Self {
            workspace,
            active_path,
        }
    }
}

impl RenameHost for WorkspaceHost<'_> {
    type Snapshot = Workspace;

    fn resolve_method(
        &self,
        range: SourceRange,
        token: &CancellationToken,
    ) -> Result<Option<MethodSymbol>, EngineError> {
        token.checkpoint()?;

        let Some(doc) = self.workspace.get(self.active_path) else {
            return Ok(None);
        };

        let file = ParsedFile::from_source(&doc.path, &doc.source);
        let model = crate::semantic::SemanticModel::build(&file);

        Ok(model.functions().declared_at(range.lo).and_then(|scope| {
            let name = scope.name.clone()?;
            let ident_range = scope.ident_range?;
            Some(MethodSymbol { name, ident_range })
        }))
    }

    /// Rename is name-based, not binding-based: every identifier spelled
    /// like the symbol is spliced, workspace-wide. Unrelated declarations
    /// that happen to share the name are renamed along with it.
    fn rename(
        &self,
        symbol: &MethodSymbol,
        new_name: &str,
        token: &CancellationToken,
    ) -> Result<Workspace, EngineError> {
        let mut documents = Vec::with_capacity(self.workspace.documents().len());

        for doc in self.workspace.documents() {
            token.checkpoint()?;
            documents.push(SourceDocument {
                path: doc.path.clone(),
                source: rename_in_source(&doc.path, &doc.source, &symbol.name, new_name),
            });
        }

        Ok(Workspace::from_documents(documents))
    }
}

/// Replace every identifier occurrence of `old_name`, including member
/// property names and class method keys. String literals and comments
/// are untouched.
fn rename_in_source(path: &str, source: &str, old_name: &str, new_name: &str) -> String {
    let file = ParsedFile::from_source(path, source);
    let Some(module) = file.module() else {
        return source.to_string();
    };

    let ctx = VisitorContext::new(&file);
    let mut collector = IdentCollector {
        name: old_name,
        ranges: Vec::new(),
    };
    walk_ast(module, &mut collector, &ctx);

    // Splice back-to-front so earlier offsets stay valid.
    collector.ranges.sort_by_key(|range| range.lo);
    let mut updated = source.to_string();
    for range in collector.ranges.iter().rev() {
        updated.replace_range(range.lo as usize..range.hi as usize, new_name);
    }
    updated
}

struct IdentCollector<'a> {
    name: &'a str,
    ranges: Vec<SourceRange>,
}

impl AstVisitor for IdentCollector<'_> {
    fn visit_ident(&mut self, node: &Ident, ctx: &VisitorContext) -> ControlFlow<()> {
        if node.sym.as_ref() == self.name {
            self.ranges.push(ctx.file().span_range(node.span));
        }
        ControlFlow::Continue(())
    }

    fn visit_ident_name(&mut self, node: &IdentName, ctx: &VisitorContext) -> ControlFlow<()> {
        if node.sym.as_ref() == self.name {
            self.ranges.push(ctx.file().span_range(node.span));
        }
        ControlFlow::Continue(())
    }
}

/// Outcome of [`fix_all`]: the final workspace and the renames applied,
/// in application order.
#[derive(Debug)]
pub struct FixOutcome {
    pub workspace: Workspace,
    pub applied: Vec<RenamePlan>,
}

/// Compute rename plans for every naming finding without applying them.
pub fn plan_fixes(
    workspace: &Workspace,
    token: &CancellationToken,
) -> Result<Vec<RenamePlan>, EngineError> {
    let mut plans = Vec::new();

    for doc in workspace.documents() {
        token.checkpoint()?;
        let file = ParsedFile::from_source(&doc.path, &doc.source);
        let host = WorkspaceHost::new(workspace, &doc.path);

        for finding in naming_findings(&file) {
            if let Some(plan) = propose_fix(&finding, &host, token)? {
                plans.push(plan);
            }
        }
    }

    Ok(plans)
}

/// Repeatedly repair naming findings until none remain. Each applied
/// rename produces a fresh workspace, so findings are recomputed from
/// scratch after every rename.
pub fn fix_all(workspace: Workspace, token: &CancellationToken) -> Result<FixOutcome, EngineError> {
    let mut workspace = workspace;
    let mut applied = Vec::new();

    loop {
        let mut next: Option<(Workspace, RenamePlan)> = None;

        'scan: for doc in workspace.documents() {
            token.checkpoint()?;
            let file = ParsedFile::from_source(&doc.path, &doc.source);
            let host = WorkspaceHost::new(&workspace, &doc.path);

            for finding in naming_findings(&file) {
                if let Some(plan) = propose_fix(&finding, &host, token)? {
                    let updated = apply_fix(&plan, &host, token)?;
                    next = Some((updated, plan));
                    break 'scan;
                }
            }
        }

        match next {
            Some((updated, plan)) => {
                workspace = updated;
                applied.push(plan);
            }
            None => break,
        }
    }

    Ok(FixOutcome { workspace, applied })
}
