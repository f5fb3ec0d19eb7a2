//! Diagnostics and fix-its attached to declarations the synthesizers reject.

use std::fmt;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::syntax::{Pattern, Span};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[non_exhaustive]
pub enum Severity {
    Error,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Severity::Error => f.write_str("error"),
        }
    }
}

/// Why a macro invocation was rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum DiagnosticKind {
    /// The initializer macro is attached to something other than a struct or class.
    NotApplicable,
    /// A member has neither a type annotation nor an inferable literal.
    NotInferableType,
}

impl DiagnosticKind {
    /// Stable identifier, `<macro>.<case>`.
    pub fn id(&self) -> &'static str {
        match self {
            DiagnosticKind::NotApplicable => "PublicInit.notApplicable",
            DiagnosticKind::NotInferableType => "PublicInit.notInferableType",
        }
    }
}

/// A text replacement over a span of the original source.
///
/// An empty replacement deletes the span.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Edit {
    pub span: Span,
    pub replacement: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct FixIt {
    pub message: String,
    pub edit: Edit,
}

#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Diagnostic {
    pub kind: DiagnosticKind,
    pub message: String,
    pub severity: Severity,
    /// The node the diagnostic points at.
    pub anchor: Span,
    pub fix_it: Option<FixIt>,
}

impl Diagnostic {
    /// `macro_name` was attached to a declaration it cannot expand on.
    /// The fix-it deletes the attachment.
    pub fn not_applicable(macro_name: &str, attachment: Span) -> Self {
        Diagnostic {
            kind: DiagnosticKind::NotApplicable,
            message: format!("'@{}' can only be applied to a Struct or Class", macro_name),
            severity: Severity::Error,
            anchor: attachment,
            fix_it: Some(FixIt {
                message: format!("Remove '@{}'", macro_name),
                edit: Edit {
                    span: attachment,
                    replacement: String::new(),
                },
            }),
        }
    }

    /// The type of the binding at `pattern` could not be inferred.
    /// The fix-it adds a type placeholder after the name.
    pub fn not_inferable_type(pattern: &Pattern) -> Self {
        Diagnostic {
            kind: DiagnosticKind::NotInferableType,
            message: "Failed to infer the Type".to_string(),
            severity: Severity::Error,
            anchor: pattern.span,
            fix_it: Some(FixIt {
                message: "Specify Type instead".to_string(),
                edit: Edit {
                    span: pattern.span,
                    replacement: format!("{}: <#Type#>", pattern.name),
                },
            }),
        }
    }

    pub fn id(&self) -> &'static str {
        self.kind.id()
    }

    pub fn is_error(&self) -> bool {
        self.severity == Severity::Error
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if !self.anchor.is_synthetic() {
            write!(f, "{}:{}: ", self.anchor.line, self.anchor.column)?;
        }
        write!(f, "{}: {}", self.severity, self.message)?;
        if let Some(fix_it) = &self.fix_it {
            write!(f, " (fix-it: {})", fix_it.message)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_not_applicable_deletes_attachment() {
        let span = Span::new(0, 11, 1, 1);
        let diag = Diagnostic::not_applicable("PublicInit", span);
        assert_eq!(diag.message, "'@PublicInit' can only be applied to a Struct or Class");
        let fix_it = diag.fix_it.as_ref().unwrap();
        assert_eq!(fix_it.message, "Remove '@PublicInit'");
        assert_eq!(fix_it.edit.span, span);
        assert!(fix_it.edit.replacement.is_empty());
        assert_eq!(diag.id(), "PublicInit.notApplicable");
    }

    #[test]
    fn test_not_inferable_inserts_placeholder() {
        let pattern = Pattern {
            name: "id".into(),
            span: Span::new(40, 42, 3, 16),
        };
        let diag = Diagnostic::not_inferable_type(&pattern);
        assert_eq!(diag.anchor, pattern.span);
        assert_eq!(diag.fix_it.unwrap().edit.replacement, "id: <#Type#>");
    }

    #[test]
    fn test_display_includes_position() {
        let pattern = Pattern {
            name: "id".into(),
            span: Span::new(40, 42, 3, 16),
        };
        let diag = Diagnostic::not_inferable_type(&pattern);
        assert_eq!(
            diag.to_string(),
            "3:16: error: Failed to infer the Type (fix-it: Specify Type instead)"
        );
    }
}
