//! The macros this crate provides and how an attachment is expanded.
//!
//! Attributes are resolved into the closed [`Macro`] set once, when the tree
//! is built; expansion then dispatches with an exhaustive match.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::coding_keys::{self, NamingStrategy};
use crate::decl::GeneratedDecl;
use crate::diagnostic::Diagnostic;
use crate::error::ArgumentError;
use crate::public_init;
use crate::syntax::{Declaration, Expr, ExprKind, MemberAnnotation, Span, StringLiteral};

/// A macro this crate knows how to expand.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Macro {
    /// `@PublicInit`
    PublicInit,
    /// `@CodingKeys` or `@CodingKeys(using: .snake_case)`
    CodingKeys(NamingStrategy),
    /// `@CodingKey(name: "...")`. Marks a member; expands to nothing.
    CodingKey(StringLiteral),
}

/// A macro attached to a declaration, with the span of its attribute.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Attachment {
    pub macro_kind: Macro,
    pub span: Span,
}

/// An attribute as written: `@name(label: value, ...)`.
#[derive(Debug, Clone, PartialEq)]
pub struct RawAttribute {
    pub name: String,
    pub arguments: Vec<Argument>,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Argument {
    pub label: Option<String>,
    pub value: Expr,
}

impl Attachment {
    pub fn new(macro_kind: Macro) -> Self {
        Attachment {
            macro_kind,
            span: Span::default(),
        }
    }
}

impl Macro {
    pub fn name(&self) -> &'static str {
        match self {
            Macro::PublicInit => public_init::MACRO_NAME,
            Macro::CodingKeys(_) => coding_keys::MACRO_NAME,
            Macro::CodingKey(_) => coding_keys::OVERRIDE_NAME,
        }
    }

    /// Type an attribute. Returns `Ok(None)` for attributes that are not one
    /// of our macros.
    pub fn from_attribute(attr: &RawAttribute) -> Result<Option<Macro>, ArgumentError> {
        match attr.name.as_str() {
            public_init::MACRO_NAME => {
                reject_unknown(attr, &[])?;
                Ok(Some(Macro::PublicInit))
            }
            coding_keys::MACRO_NAME => {
                reject_unknown(attr, &["using"])?;
                let strategy = match attr.argument("using") {
                    Some(expr) => match &expr.kind {
                        ExprKind::ImplicitMember(name) => name.parse::<NamingStrategy>()?,
                        _ => expr.text.parse::<NamingStrategy>()?,
                    },
                    None => NamingStrategy::default(),
                };
                Ok(Some(Macro::CodingKeys(strategy)))
            }
            coding_keys::OVERRIDE_NAME => Ok(Some(Macro::CodingKey(override_key(attr)?))),
            _ => Ok(None),
        }
    }
}

impl MemberAnnotation {
    /// Type an attribute attached to a member.
    pub fn from_attribute(attr: &RawAttribute) -> Result<MemberAnnotation, ArgumentError> {
        if attr.name == coding_keys::OVERRIDE_NAME {
            Ok(MemberAnnotation::CodingKey(override_key(attr)?))
        } else {
            Ok(MemberAnnotation::Other(attr.name.clone()))
        }
    }
}

impl RawAttribute {
    pub fn argument(&self, label: &str) -> Option<&Expr> {
        self.arguments
            .iter()
            .find(|arg| arg.label.as_deref() == Some(label))
            .map(|arg| &arg.value)
    }
}

fn override_key(attr: &RawAttribute) -> Result<StringLiteral, ArgumentError> {
    reject_unknown(attr, &["name"])?;
    let value = attr.argument("name").ok_or_else(|| ArgumentError::MissingArgument {
        attribute: attr.name.clone(),
        label: "name".into(),
    })?;
    match value.kind {
        ExprKind::String => Ok(StringLiteral::from_source(value.text.clone())),
        _ => Err(ArgumentError::ExpectedStringLiteral {
            attribute: attr.name.clone(),
            label: "name".into(),
        }),
    }
}

fn reject_unknown(attr: &RawAttribute, allowed: &[&str]) -> Result<(), ArgumentError> {
    for arg in &attr.arguments {
        let label = arg.label.as_deref().unwrap_or("_");
        if !allowed.contains(&label) {
            return Err(ArgumentError::UnexpectedArgument {
                attribute: attr.name.clone(),
                label: label.to_string(),
            });
        }
    }
    Ok(())
}

/// Expand one attachment on `decl`.
///
/// Returns the generated declarations, or the diagnostics that stopped the
/// expansion. An expansion that fails produces no declarations.
pub fn expand(decl: &Declaration, attachment: &Attachment) -> Result<Vec<GeneratedDecl>, Vec<Diagnostic>> {
    let result = match &attachment.macro_kind {
        Macro::PublicInit => public_init::synthesize(decl, attachment.span)
            .map(|init| vec![init.into()])
            .map_err(|diag| vec![diag]),
        Macro::CodingKeys(strategy) => Ok(vec![coding_keys::synthesize(decl, *strategy).into()]),
        Macro::CodingKey(_) => Ok(Vec::new()),
    };

    match &result {
        Ok(decls) => debug!(
            macro_name = attachment.macro_kind.name(),
            decl = %decl.name,
            generated = decls.len(),
            "expanded macro"
        ),
        Err(diags) => debug!(
            macro_name = attachment.macro_kind.name(),
            decl = %decl.name,
            diagnostics = diags.len(),
            "macro expansion rejected"
        ),
    }
    result
}
