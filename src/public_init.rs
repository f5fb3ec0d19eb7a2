//! Memberwise public initializer synthesis.

use crate::classify::{stored_members, StoredMember};
use crate::decl::InitializerDecl;
use crate::diagnostic::Diagnostic;
use crate::infer::infer;
use crate::syntax::{Declaration, Span};
use crate::types::TypeDescriptor;

/// The name the macro is attached under.
pub const MACRO_NAME: &str = "PublicInit";

/// Synthesize a public memberwise initializer for `decl`.
///
/// `attachment` is the span of the macro attribute, used as the anchor when
/// the declaration is not a struct or class. Parameters follow member
/// declaration order. A `let` with an initializer is skipped; any other
/// initializer becomes the parameter's default. The first member whose type
/// can be neither read nor inferred rejects the whole expansion.
pub fn synthesize(decl: &Declaration, attachment: Span) -> Result<InitializerDecl, Diagnostic> {
    if !decl.kind.is_struct_or_class() {
        return Err(Diagnostic::not_applicable(MACRO_NAME, attachment));
    }

    let parameters = stored_members(decl)
        .filter(|stored| !stored.is_initialized_constant())
        .map(|stored| resolve(&stored))
        .collect::<Result<Vec<_>, _>>()?;

    Ok(parameters
        .into_iter()
        .fold(InitializerDecl::new(), |init, (name, ty, default)| {
            init.member_parameter(name, ty, default)
        }))
}

/// Resolve the parameter type and default value text of one member.
fn resolve(stored: &StoredMember<'_>) -> Result<(String, TypeDescriptor, Option<String>), Diagnostic> {
    let binding = stored.binding;
    let default = binding.initializer.as_ref().map(|expr| expr.text.clone());

    let ty = match (&binding.type_annotation, &binding.initializer) {
        (Some(annotation), _) => TypeDescriptor::Explicit(annotation.text.clone()),
        (None, Some(expr)) => {
            infer(expr).ok_or_else(|| Diagnostic::not_inferable_type(&binding.pattern))?
        }
        (None, None) => return Err(Diagnostic::not_inferable_type(&binding.pattern)),
    };

    Ok((stored.name().to_string(), ty, default))
}
