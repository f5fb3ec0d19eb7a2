//! Expanding every macro in a source file in place.
//!
//! Attributes naming one of our macros are removed, generated declarations
//! are inserted before the closing brace of the declaration they belong to,
//! and diagnostics from rejected expansions are collected alongside.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::decl::GeneratedDecl;
use crate::diagnostic::{Diagnostic, Edit};
use crate::error::ParseError;
use crate::macros;
use crate::parser;
use crate::render::{render_indented, RenderOptions};
use crate::syntax::{Declaration, Span};

/// The result of expanding a source file.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct ExpandedSource {
    /// The source with macros expanded.
    pub source: String,
    /// Diagnostics in source order.
    pub diagnostics: Vec<Diagnostic>,
}

impl ExpandedSource {
    pub fn has_errors(&self) -> bool {
        self.diagnostics.iter().any(Diagnostic::is_error)
    }
}

/// Parse `source` and expand every macro attachment in it.
///
/// Declarations whose expansion is rejected get no generated code; their
/// diagnostics are returned instead.
pub fn expand_source(source: &str, options: &RenderOptions) -> Result<ExpandedSource, ParseError> {
    let file = parser::parse(source)?;

    let mut edits: Vec<Edit> = file
        .macro_attributes
        .iter()
        .map(|span| Edit {
            span: Span {
                end: skip_whitespace(source, span.end),
                ..*span
            },
            replacement: String::new(),
        })
        .collect();

    let mut declarations = Vec::new();
    for decl in &file.declarations {
        visit(decl, &mut declarations);
    }

    let mut diagnostics = Vec::new();
    for decl in declarations {
        let mut generated = Vec::new();
        for attachment in &decl.attachments {
            match macros::expand(decl, attachment) {
                Ok(decls) => generated.extend(decls),
                Err(diags) => diagnostics.extend(diags),
            }
        }
        if !generated.is_empty() {
            edits.push(insertion(source, decl, &generated, options));
        }
    }
    diagnostics.sort_by_key(|diag| diag.anchor.start);

    debug!(
        declarations = file.declarations.len(),
        edits = edits.len(),
        diagnostics = diagnostics.len(),
        "expanded source"
    );
    Ok(ExpandedSource {
        source: apply_edits(source, edits),
        diagnostics,
    })
}

/// Apply the fix-it of every diagnostic to `source`.
///
/// Fix-its are applied from the end of the file backwards; one that overlaps
/// an already applied fix-it is skipped.
pub fn apply_fix_its(source: &str, diagnostics: &[Diagnostic]) -> String {
    let edits = diagnostics
        .iter()
        .filter_map(|diag| diag.fix_it.as_ref())
        .map(|fix_it| fix_it.edit.clone())
        .collect();
    apply_edits(source, edits)
}

fn visit<'a>(decl: &'a Declaration, out: &mut Vec<&'a Declaration>) {
    out.push(decl);
    for nested in decl.nested() {
        visit(nested, out);
    }
}

/// Build the edit inserting `generated` before the closing brace of `decl`.
fn insertion(source: &str, decl: &Declaration, generated: &[GeneratedDecl], options: &RenderOptions) -> Edit {
    let close = decl.body.end.saturating_sub(1);
    let newline = if source.contains("\r\n") { "\r\n" } else { "\n" };
    let brace_line = line_start(source, close);
    let before_brace = &source[brace_line..close];

    if before_brace.trim().is_empty() {
        // `}` opens its own line: insert whole lines in front of it.
        let indent = format!("{}{}", before_brace, options.indent());
        let text: String = generated
            .iter()
            .map(|g| format!("\n{}\n", render_indented(g, &indent, options)))
            .collect();
        Edit {
            span: Span::new(brace_line, brace_line, 0, 0),
            replacement: text.replace('\n', newline),
        }
    } else {
        let decl_line = line_start(source, decl.span.start);
        let base = leading_whitespace(&source[decl_line..]);
        let indent = format!("{}{}", base, options.indent());
        let blocks: Vec<String> = generated
            .iter()
            .map(|g| render_indented(g, &indent, options))
            .collect();
        let start = source[..close].trim_end().len().max(decl.body.start + 1);
        Edit {
            span: Span::new(start, close, 0, 0),
            replacement: format!("\n{}\n{}", blocks.join("\n\n"), base).replace('\n', newline),
        }
    }
}

fn apply_edits(source: &str, mut edits: Vec<Edit>) -> String {
    edits.sort_by(|a, b| {
        b.span
            .start
            .cmp(&a.span.start)
            .then(b.span.end.cmp(&a.span.end))
    });
    edits.dedup();

    let mut out = source.to_string();
    let mut limit = source.len();
    for edit in edits {
        let Span { start, end, .. } = edit.span;
        if start > end || end > limit || !source.is_char_boundary(start) || !source.is_char_boundary(end) {
            warn!(start, end, "skipping overlapping or out of range edit");
            continue;
        }
        out.replace_range(start..end, &edit.replacement);
        limit = start;
    }
    out
}

/// Offset of the first non-whitespace character at or after `pos`.
fn skip_whitespace(source: &str, pos: usize) -> usize {
    let rest = &source[pos..];
    pos + (rest.len() - rest.trim_start().len())
}

fn line_start(source: &str, pos: usize) -> usize {
    source[..pos].rfind('\n').map_or(0, |i| i + 1)
}

fn leading_whitespace(line: &str) -> &str {
    let len = line.len() - line.trim_start_matches([' ', '\t']).len();
    &line[..len]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::diagnostic::DiagnosticKind;

    fn expand(source: &str) -> ExpandedSource {
        expand_source(source, &RenderOptions::default()).unwrap()
    }

    #[test]
    fn test_expand_public_init() {
        let out = expand("@PublicInit\npublic struct State {\n    public let id: Int\n}");
        assert!(out.diagnostics.is_empty());
        assert_eq!(
            out.source,
            "public struct State {\n    public let id: Int\n\n    public init(\n        id: Int\n    ) {\n        self.id = id\n    }\n}"
        );
    }

    #[test]
    fn test_expand_empty_body_on_one_line() {
        let out = expand("@PublicInit\nstruct Empty {}");
        assert_eq!(out.source, "struct Empty {\n    public init() {\n    }\n}");
    }

    #[test]
    fn test_expand_nested_declaration_is_indented() {
        let out = expand("enum Namespace {\n    @CodingKeys\n    struct Item: Codable {\n        let id: Int\n    }\n}");
        assert_eq!(
            out.source,
            "enum Namespace {\n    struct Item: Codable {\n        let id: Int\n\n        enum CodingKeys: String, CodingKey {\n            case id\n        }\n    }\n}"
        );
    }

    #[test]
    fn test_expand_keeps_crlf_line_endings() {
        let out = expand("@PublicInit\r\nstruct S {\r\n    let id: Int\r\n}\r\n");
        assert_eq!(
            out.source,
            "struct S {\r\n    let id: Int\r\n\r\n    public init(\r\n        id: Int\r\n    ) {\r\n        self.id = id\r\n    }\r\n}\r\n"
        );

        let out = expand("@PublicInit\r\nstruct Empty {}\r\n");
        assert_eq!(out.source, "struct Empty {\r\n    public init() {\r\n    }\r\n}\r\n");
    }

    #[test]
    fn test_rejected_expansion_keeps_diagnostic() {
        let out = expand("@PublicInit\npublic enum Action {\n    case increment\n}");
        assert!(out.has_errors());
        assert_eq!(out.diagnostics[0].kind, DiagnosticKind::NotApplicable);
        assert_eq!(out.source, "public enum Action {\n    case increment\n}");
    }

    #[test]
    fn test_fix_its_apply_to_original_source() {
        let source = "@PublicInit\npublic struct State {\n    public var id = makeId()\n}";
        let out = expand(source);
        assert_eq!(out.diagnostics.len(), 1);
        assert_eq!(
            apply_fix_its(source, &out.diagnostics),
            "@PublicInit\npublic struct State {\n    public var id: <#Type#> = makeId()\n}"
        );
    }

    #[test]
    fn test_overlapping_edits_are_skipped() {
        let edit = |start, end, text: &str| Edit {
            span: Span::new(start, end, 1, start + 1),
            replacement: text.to_string(),
        };
        let out = apply_edits("abcdef", vec![edit(1, 4, "X"), edit(2, 5, "Y"), edit(0, 0, ">")]);
        assert_eq!(out, ">abYf");
    }
}
