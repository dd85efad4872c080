//! Per-file semantic model: function tree plus receiver bindings.
//!
//! The builder walks the AST once and records every function-like
//! construct along with the variable bindings that tell us what a
//! receiver identifier refers to (`const t = new Task()`,
//! `const fs = require('fs')`, import declarations).

use std::collections::HashMap;

use swc_common::Spanned;
use swc_ecma_ast::{
    Callee, ClassMethod, Expr, FnDecl, ImportDecl, ImportSpecifier, Lit, Pat, PropName,
    VarDeclarator,
};
use swc_ecma_visit::{Visit, VisitWith};

use super::functions::{FunctionId, FunctionKind, FunctionTree};
use crate::engine::EngineError;
use crate::engine::cancel::CancellationToken;
use crate::engine::detect::SemanticContext;
use crate::engine::op::{EnclosingMethod, SourceRange};
use crate::parser::ParsedFile;

/// Placeholder name for functions without a binding identifier.
pub const ANONYMOUS: &str = "<anonymous>";

pub struct SemanticModel {
    functions: FunctionTree,
    receivers: HashMap<String, String>,
}

impl SemanticModel {
    pub fn build(file: &ParsedFile) -> Self {
        let mut builder = ModelBuilder {
            file,
            functions: FunctionTree::new(),
            receivers: HashMap::new(),
            current: None,
        };

        if let Some(module) = file.module() {
            module.visit_with(&mut builder);
        }

        Self {
            functions: builder.functions,
            receivers: builder.receivers,
        }
    }

    pub fn functions(&self) -> &FunctionTree {
        &self.functions
    }

    /// What a receiver identifier is bound to, when a binding was seen.
    pub fn receiver_type(&self, name: &str) -> Option<&str> {
        self.receivers.get(name).map(String::as_str)
    }
}

impl SemanticContext for SemanticModel {
    fn enclosing_method(
        &self,
        range: SourceRange,
        token: &CancellationToken,
    ) -> Result<Option<EnclosingMethod>, EngineError> {
        token.checkpoint()?;

        Ok(self
            .functions
            .innermost_containing(range.lo)
            .map(|scope| EnclosingMethod {
                name: scope
                    .name
                    .clone()
                    .unwrap_or_else(|| ANONYMOUS.to_string()),
                is_async: scope.is_async,
            }))
    }
}

struct ModelBuilder<'a> {
    file: &'a ParsedFile,
    functions: FunctionTree,
    receivers: HashMap<String, String>,
    current: Option<FunctionId>,
}

impl ModelBuilder<'_> {
    fn enter<F: FnOnce(&mut Self)>(&mut self, id: FunctionId, walk: F) {
        let prev = self.current.replace(id);
        walk(self);
        self.current = prev;
    }

    fn record_import(&mut self, local: &str, source: &str) {
        let module = source.strip_prefix("node:").unwrap_or(source);
        self.receivers.insert(local.to_string(), module.to_string());
    }
}

impl Visit for ModelBuilder<'_> {
    fn visit_fn_decl(&mut self, node: &FnDecl) {
        let id = self.functions.create_function(
            FunctionKind::Declaration,
            Some(node.ident.sym.to_string()),
            node.function.is_async,
            self.current,
            self.file.span_range(node.span()),
            Some(self.file.span_range(node.ident.span)),
        );

        self.enter(id, |builder| node.function.visit_children_with(builder));
    }

    fn visit_class_method(&mut self, node: &ClassMethod) {
        let (name, ident_range) = match &node.key {
            PropName::Ident(key) => (
                Some(key.sym.to_string()),
                Some(self.file.span_range(key.span)),
            ),
            _ => (None, None),
        };

        let id = self.functions.create_function(
            FunctionKind::Method,
            name,
            node.function.is_async,
            self.current,
            self.file.span_range(node.span()),
            ident_range,
        );

        self.enter(id, |builder| node.function.visit_children_with(builder));
    }

    fn visit_arrow_expr(&mut self, node: &swc_ecma_ast::ArrowExpr) {
        let id = self.functions.create_function(
            FunctionKind::Arrow,
            None,
            node.is_async,
            self.current,
            self.file.span_range(node.span()),
            None,
        );

        self.enter(id, |builder| node.visit_children_with(builder));
    }

    fn visit_fn_expr(&mut self, node: &swc_ecma_ast::FnExpr) {
        let name = node.ident.as_ref().map(|ident| ident.sym.to_string());
        let ident_range = node.ident.as_ref().map(|ident| self.file.span_range(ident.span));

        let id = self.functions.create_function(
            FunctionKind::Expression,
            name,
            node.function.is_async,
            self.current,
            self.file.span_range(node.span()),
            ident_range,
        );

        self.enter(id, |builder| node.function.visit_children_with(builder));
    }

    fn visit_var_declarator(&mut self, node: &VarDeclarator) {
        let Pat::Ident(binding) = &node.name else {
            node.visit_children_with(self);
            return;
        };

        match node.init.as_deref() {
            // `const f = async () => {}` names the arrow by its binding.
            Some(Expr::Arrow(arrow)) => {
                let id = self.functions.create_function(
                    FunctionKind::Arrow,
                    Some(binding.id.sym.to_string()),
                    arrow.is_async,
                    self.current,
                    self.file.span_range(arrow.span()),
                    Some(self.file.span_range(binding.id.span)),
                );
                self.enter(id, |builder| arrow.visit_children_with(builder));
            }
            Some(Expr::Fn(fn_expr)) => {
                let id = self.functions.create_function(
                    FunctionKind::Expression,
                    Some(binding.id.sym.to_string()),
                    fn_expr.function.is_async,
                    self.current,
                    self.file.span_range(fn_expr.span()),
                    Some(self.file.span_range(binding.id.span)),
                );
                self.enter(id, |builder| fn_expr.function.visit_children_with(builder));
            }
            // `const t = new Task()` binds the receiver to its class.
            Some(Expr::New(new_expr)) => {
                if let Expr::Ident(callee) = &*new_expr.callee {
                    self.receivers
                        .insert(binding.id.sym.to_string(), callee.sym.to_string());
                }
                node.visit_children_with(self);
            }
            // `const fs = require('fs')` binds the receiver to the module.
            Some(Expr::Call(call)) => {
                if let Callee::Expr(callee) = &call.callee
                    && let Expr::Ident(callee_ident) = &**callee
                    && callee_ident.sym.as_ref() == "require"
                    && let Some(arg) = call.args.first()
                    && let Expr::Lit(Lit::Str(source)) = &*arg.expr
                {
                    self.record_import(&binding.id.sym, &source.value);
                }
                node.visit_children_with(self);
            }
            _ => node.visit_children_with(self),
        }
    }

    fn visit_import_decl(&mut self, node: &ImportDecl) {
        for specifier in &node.specifiers {
            match specifier {
                ImportSpecifier::Default(default) => {
                    self.record_import(&default.local.sym, &node.src.value);
                }
                ImportSpecifier::Namespace(namespace) => {
                    self.record_import(&namespace.local.sym, &node.src.value);
                }
                ImportSpecifier::Named(named) => {
                    self.record_import(&named.local.sym, &node.src.value);
                }
            }
        }
    }
}
