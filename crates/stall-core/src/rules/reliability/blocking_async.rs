//! no-blocking-in-async rule (R001): Detects blocking calls and property
//! reads inside async functions.
//!
//! Matches owner-qualified signatures against the blocking catalog, plus
//! the duck-typed `GetAwaiter().GetResult()` chain on any receiver.

use std::collections::HashSet;
use std::ops::ControlFlow;

use swc_ecma_ast::{CallExpr, Callee, Expr, MemberExpr};

use crate::declare_rule;
use crate::diagnostic::Diagnostic;
use crate::engine::EngineError;
use crate::engine::cancel::CancellationToken;
use crate::engine::catalog::BlockingCatalog;
use crate::engine::detect::{SemanticContext, analyze};
use crate::engine::op::{Operation, SourceRange};
use crate::parser::ParsedFile;
use crate::rules::helpers::{operation_label, range_to_location};
use crate::rules::{Rule, RuleMetadata, Severity};
use crate::semantic::{SemanticModel, lower_call, lower_member};
use crate::visitor::{AstVisitor, VisitorContext, walk_ast};

declare_rule!(
    NoBlockingInAsync,
    id = "R001",
    name = "no-blocking-in-async",
    description = "Disallow blocking calls inside async functions",
    category = Reliability,
    severity = Warning,
    examples = "// Bad\nasync function load() {\n  const data = fs.readFileSync('a.txt');\n}\n\n// Good\nasync function load() {\n  const data = await fs.promises.readFile('a.txt');\n}"
);

impl Rule for NoBlockingInAsync {
    fn metadata(&self) -> &RuleMetadata {
        &self.metadata
    }

    fn check(
        &self,
        file: &ParsedFile,
        token: &CancellationToken,
    ) -> Result<Vec<Diagnostic>, EngineError> {
        let Some(module) = file.module() else {
            return Ok(Vec::new());
        };

        let model = SemanticModel::build(file);
        let ctx = VisitorContext::new(file);
        let mut visitor = BlockingVisitor {
            file,
            model: &model,
            catalog: BlockingCatalog::global(),
            token,
            diagnostics: Vec::new(),
            callee_members: HashSet::new(),
            error: None,
        };

        walk_ast(module, &mut visitor, &ctx);

        match visitor.error {
            Some(err) => Err(err),
            None => Ok(visitor.diagnostics),
        }
    }
}

struct BlockingVisitor<'a> {
    file: &'a ParsedFile,
    model: &'a SemanticModel,
    catalog: &'a BlockingCatalog,
    token: &'a CancellationToken,
    diagnostics: Vec<Diagnostic>,
    /// Member expressions already consumed as call callees. Visiting them
    /// again as plain member accesses would double-report.
    callee_members: HashSet<SourceRange>,
    error: Option<EngineError>,
}

impl BlockingVisitor<'_> {
    fn report(&mut self, op: &Operation, noun: &str) -> ControlFlow<()> {
        let finding = match analyze(op, self.catalog, self.model, self.token) {
            Ok(Some(finding)) => finding,
            Ok(None) => return ControlFlow::Continue(()),
            Err(err) => {
                self.error = Some(err);
                return ControlFlow::Break(());
            }
        };

        let enclosing = match self.model.enclosing_method(finding.range, self.token) {
            Ok(Some(method)) => method,
            Ok(None) => return ControlFlow::Continue(()),
            Err(err) => {
                self.error = Some(err);
                return ControlFlow::Break(());
            }
        };

        let label = operation_label(op).unwrap_or_default();
        let (line, column, end_line, end_column) = range_to_location(self.file, finding.range);

        self.diagnostics.push(
            Diagnostic::new(
                finding.rule_id,
                Severity::Warning,
                format!(
                    "Blocking {noun} '{label}' inside async function '{}'",
                    enclosing.name
                ),
                &self.file.metadata().filename,
                line,
                column,
            )
            .with_end(end_line, end_column)
            .with_suggestion("Use the awaitable form instead of blocking"),
        );

        ControlFlow::Continue(())
    }
}

impl AstVisitor for BlockingVisitor<'_> {
    fn visit_call_expr(&mut self, node: &CallExpr, _ctx: &VisitorContext) -> ControlFlow<()> {
        if let Callee::Expr(callee) = &node.callee
            && let Expr::Member(member) = &**callee
        {
            self.callee_members.insert(self.file.span_range(member.span));
        }

        let op = lower_call(node, self.model, self.file);
        self.report(&op, "call")
    }

    fn visit_member_expr(&mut self, node: &MemberExpr, _ctx: &VisitorContext) -> ControlFlow<()> {
        if self.callee_members.contains(&self.file.span_range(node.span)) {
            return ControlFlow::Continue(());
        }

        let op = lower_member(node, self.model, self.file);
        self.report(&op, "property read")
    }
}
