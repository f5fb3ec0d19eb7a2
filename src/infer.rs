//! Literal type inference.
//!
//! Inference is purely syntactic: only the shape of a literal decides the
//! type. Identifiers, calls and operators are never resolved.

use crate::syntax::{Expr, ExprKind};
use crate::types::TypeDescriptor;

/// Infer the type of an initializer expression from its literal shape.
///
/// Arrays take the type of their first element; the remaining elements are
/// not inspected. Empty arrays and every non-literal shape return `None`.
pub fn infer(expr: &Expr) -> Option<TypeDescriptor> {
    match &expr.kind {
        ExprKind::Bool(_) => Some(TypeDescriptor::Bool),
        ExprKind::Integer => Some(TypeDescriptor::Int),
        ExprKind::Float => Some(TypeDescriptor::Double),
        ExprKind::String => Some(TypeDescriptor::String),
        ExprKind::Array(elements) => elements
            .first()
            .and_then(infer)
            .map(TypeDescriptor::array_of),
        ExprKind::Nil | ExprKind::ImplicitMember(_) | ExprKind::Other => None,
    }
}
