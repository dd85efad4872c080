//! Lowers swc expressions into the engine's operation tree.

use swc_common::Spanned;
use swc_ecma_ast::{CallExpr, Callee, Expr, MemberExpr, MemberProp};

use super::model::SemanticModel;
use crate::engine::op::{MemberRef, Operation};
use crate::parser::ParsedFile;

/// Lower one expression. Calls and member accesses become classifiable
/// operations; every other shape collapses to `Other`.
pub fn lower_expr(expr: &Expr, model: &SemanticModel, file: &ParsedFile) -> Operation {
    match expr {
        Expr::Call(call) => lower_call(call, model, file),
        Expr::Member(member) => lower_member(member, model, file),
        Expr::Paren(paren) => lower_expr(&paren.expr, model, file),
        _ => Operation::Other {
            range: file.span_range(expr.span()),
        },
    }
}

pub fn lower_call(call: &CallExpr, model: &SemanticModel, file: &ParsedFile) -> Operation {
    let range = file.span_range(call.span);

    let Callee::Expr(callee) = &call.callee else {
        return Operation::Other { range };
    };

    match &**callee {
        Expr::Member(member) => {
            let Some(target) = member_target(member, model) else {
                return Operation::Other { range };
            };
            let receiver = lower_expr(&member.obj, model, file);
            Operation::Invocation {
                target,
                receiver: Some(Box::new(receiver)),
                range,
            }
        }
        // Bare calls resolve their owner through import bindings,
        // so `import { readFileSync } from 'fs'` still matches.
        Expr::Ident(ident) => Operation::Invocation {
            target: MemberRef::new(
                ident.sym.to_string(),
                model.receiver_type(&ident.sym).map(str::to_string),
            ),
            receiver: None,
            range,
        },
        _ => Operation::Other { range },
    }
}

pub fn lower_member(member: &MemberExpr, model: &SemanticModel, file: &ParsedFile) -> Operation {
    let range = file.span_range(member.span);
    match member_target(member, model) {
        Some(target) => Operation::PropertyAccess { target, range },
        None => Operation::Other { range },
    }
}

/// Member reference for `obj.prop`. Computed properties have no static
/// name and are not lowered.
fn member_target(member: &MemberExpr, model: &SemanticModel) -> Option<MemberRef> {
    let MemberProp::Ident(prop) = &member.prop else {
        return None;
    };

    let owner = match &*member.obj {
        // An identifier receiver resolves through its binding, falling
        // back to its own text for globals like `Atomics`.
        Expr::Ident(obj) => Some(
            model
                .receiver_type(&obj.sym)
                .unwrap_or(obj.sym.as_ref())
                .to_string(),
        ),
        _ => None,
    };

    Some(MemberRef::new(prop.sym.to_string(), owner))
}
