//! Driver connecting [`AstVisitor`] implementations to the SWC traversal.

use std::ops::ControlFlow;

use swc_ecma_ast::{
    ArrowExpr, AwaitExpr, CallExpr, ClassMethod, FnDecl, Ident, IdentName, MemberExpr, Module,
    NewExpr, VarDecl,
};
use swc_ecma_visit::{Visit, VisitWith};

use super::context::VisitorContext;
use super::traits::AstVisitor;

/// Walk the module's AST, invoking the visitor's hooks in source order.
/// A `ControlFlow::Break` from any hook stops the entire walk.
pub fn walk_ast<V: AstVisitor>(module: &Module, visitor: &mut V, ctx: &VisitorContext) {
    let mut adapter = WalkAdapter {
        visitor,
        ctx,
        stopped: false,
    };

    module.visit_with(&mut adapter);
}

struct WalkAdapter<'a, V: AstVisitor> {
    visitor: &'a mut V,
    ctx: &'a VisitorContext<'a>,
    stopped: bool,
}

macro_rules! hook {
    ($method:ident, $node:ty) => {
        fn $method(&mut self, node: &$node) {
            if self.stopped {
                return;
            }
            if let ControlFlow::Break(()) = self.visitor.$method(node, self.ctx) {
                self.stopped = true;
                return;
            }
            node.visit_children_with(self);
        }
    };
}

impl<V: AstVisitor> Visit for WalkAdapter<'_, V> {
    hook!(visit_fn_decl, FnDecl);
    hook!(visit_arrow_expr, ArrowExpr);
    hook!(visit_class_method, ClassMethod);
    hook!(visit_var_decl, VarDecl);
    hook!(visit_call_expr, CallExpr);
    hook!(visit_new_expr, NewExpr);
    hook!(visit_member_expr, MemberExpr);
    hook!(visit_await_expr, AwaitExpr);
    hook!(visit_ident, Ident);
    hook!(visit_ident_name, IdentName);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::ParsedFile;

    fn walk_source<V: AstVisitor>(source: &str, visitor: &mut V) {
        let parsed = ParsedFile::from_source("test.js", source);
        let ctx = VisitorContext::new(&parsed);
        if let Some(module) = parsed.module() {
            walk_ast(module, visitor, &ctx);
        }
    }

    #[derive(Default)]
    struct CountingVisitor {
        calls: usize,
        idents: Vec<String>,
    }

    impl AstVisitor for CountingVisitor {
        fn visit_call_expr(&mut self, _node: &CallExpr, _ctx: &VisitorContext) -> ControlFlow<()> {
            self.calls += 1;
            ControlFlow::Continue(())
        }

        fn visit_ident(&mut self, node: &Ident, _ctx: &VisitorContext) -> ControlFlow<()> {
            self.idents.push(node.sym.to_string());
            ControlFlow::Continue(())
        }
    }

    #[test]
    fn walk_visits_nested_calls() {
        let mut visitor = CountingVisitor::default();

        walk_source("foo(bar(), baz());", &mut visitor);

        assert_eq!(visitor.calls, 3);
        assert!(visitor.idents.contains(&"foo".to_string()));
        assert!(visitor.idents.contains(&"baz".to_string()));
    }

    struct StopAtFirstCall {
        calls: usize,
    }

    impl AstVisitor for StopAtFirstCall {
        fn visit_call_expr(&mut self, _node: &CallExpr, _ctx: &VisitorContext) -> ControlFlow<()> {
            self.calls += 1;
            ControlFlow::Break(())
        }
    }

    #[test]
    fn break_stops_the_walk() {
        let mut visitor = StopAtFirstCall { calls: 0 };

        walk_source("foo();\nbar();\nbaz();", &mut visitor);

        assert_eq!(visitor.calls, 1);
    }

    struct MemberNameCollector {
        names: Vec<String>,
    }

    impl AstVisitor for MemberNameCollector {
        fn visit_ident_name(
            &mut self,
            node: &IdentName,
            _ctx: &VisitorContext,
        ) -> ControlFlow<()> {
            self.names.push(node.sym.to_string());
            ControlFlow::Continue(())
        }
    }

    #[test]
    fn walk_reaches_member_property_names() {
        let mut visitor = MemberNameCollector { names: Vec::new() };

        walk_source("obj.doWork();", &mut visitor);

        assert!(visitor.names.contains(&"doWork".to_string()));
    }
}
