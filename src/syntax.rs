//! Structural declaration tree consumed by the synthesizers.
//!
//! Trees come either from the [`parser`](crate::parser) or from a host that
//! builds them directly with the constructors below. Nodes built by hand carry
//! a default (synthetic) [`Span`].

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::macros::Attachment;

/// Location of a node in the source text.
///
/// `start`/`end` are byte offsets; `line` and `column` are 1-based and point
/// at `start`. A span with `line == 0` belongs to a node that has no source.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Span {
    pub start: usize,
    pub end: usize,
    pub line: usize,
    pub column: usize,
}

impl Span {
    pub fn new(start: usize, end: usize, line: usize, column: usize) -> Self {
        Span {
            start,
            end,
            line,
            column,
        }
    }

    pub fn is_synthetic(&self) -> bool {
        self.line == 0
    }
}

/// The kind of a type declaration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum DeclKind {
    Struct,
    Class,
    Enum,
    Actor,
    Protocol,
    Extension,
}

impl DeclKind {
    pub fn from_keyword(keyword: &str) -> Option<Self> {
        match keyword {
            "struct" => Some(DeclKind::Struct),
            "class" => Some(DeclKind::Class),
            "enum" => Some(DeclKind::Enum),
            "actor" => Some(DeclKind::Actor),
            "protocol" => Some(DeclKind::Protocol),
            "extension" => Some(DeclKind::Extension),
            _ => None,
        }
    }

    /// Whether the kind is struct-like or class-like.
    pub fn is_struct_or_class(&self) -> bool {
        matches!(self, DeclKind::Struct | DeclKind::Class)
    }
}

/// A type declaration with its members and attached macros.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Declaration {
    pub kind: DeclKind,
    pub name: String,
    /// Macros attached to the declaration, in source order.
    pub attachments: Vec<Attachment>,
    /// Names from the inheritance clause, verbatim.
    pub inherited: Vec<String>,
    pub members: Vec<MemberItem>,
    /// From the first attribute or modifier to the closing brace.
    pub span: Span,
    /// The member block including both braces.
    pub body: Span,
}

/// One entry in a declaration body.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum MemberItem {
    /// A `let`/`var` declaration.
    Variable(Member),
    /// A nested type declaration.
    Declaration(Declaration),
    /// Anything else: functions, initializers, enum cases, type aliases.
    Other(Span),
}

/// `let` vs `var`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Mutability {
    Immutable,
    Mutable,
}

/// The accessor block attached to a binding, if any.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum AccessorShape {
    /// No accessor block.
    #[default]
    Stored,
    /// Only `willSet`/`didSet` observers.
    Observed,
    /// A getter, explicit or implicit.
    Computed,
}

/// A variable declaration inside a type body.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Member {
    pub annotations: Vec<MemberAnnotation>,
    pub is_static: bool,
    pub mutability: Mutability,
    /// `let a, b: Int` has two bindings.
    pub bindings: Vec<Binding>,
    pub span: Span,
}

/// One `pattern: Type = initializer { accessors }` binding.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Binding {
    pub pattern: Pattern,
    pub type_annotation: Option<TypeAnnotation>,
    pub initializer: Option<Expr>,
    pub accessor: AccessorShape,
}

/// The bound name, kept verbatim.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Pattern {
    pub name: String,
    pub span: Span,
}

/// An explicit type annotation, kept verbatim.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct TypeAnnotation {
    pub text: String,
    pub span: Span,
}

/// An expression with its literal shape and verbatim source text.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Expr {
    pub kind: ExprKind,
    pub text: String,
    pub span: Span,
}

/// Syntactic shape of an expression.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum ExprKind {
    Bool(bool),
    Integer,
    Float,
    String,
    Array(Vec<Expr>),
    Nil,
    /// `.name`
    ImplicitMember(String),
    Other,
}

/// A string literal kept as written, quotes included.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct StringLiteral(String);

impl StringLiteral {
    /// Wrap literal source text such as `"first_name"`.
    pub fn from_source(source: impl Into<String>) -> Self {
        StringLiteral(source.into())
    }

    /// Build a literal for `value`, escaping quotes and backslashes.
    pub fn quoted(value: &str) -> Self {
        let mut out = String::with_capacity(value.len() + 2);
        out.push('"');
        for c in value.chars() {
            if c == '"' || c == '\\' {
                out.push('\\');
            }
            out.push(c);
        }
        out.push('"');
        StringLiteral(out)
    }

    pub fn as_source(&self) -> &str {
        &self.0
    }
}

/// A typed annotation attached to a member.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum MemberAnnotation {
    /// `@CodingKey(name: "...")`
    CodingKey(StringLiteral),
    /// Any other attribute, by name.
    Other(String),
}

impl Declaration {
    pub fn new(kind: DeclKind, name: impl Into<String>) -> Self {
        Declaration {
            kind,
            name: name.into(),
            attachments: Vec::new(),
            inherited: Vec::new(),
            members: Vec::new(),
            span: Span::default(),
            body: Span::default(),
        }
    }

    pub fn inherit(mut self, name: impl Into<String>) -> Self {
        self.inherited.push(name.into());
        self
    }

    pub fn with_member(mut self, member: Member) -> Self {
        self.members.push(MemberItem::Variable(member));
        self
    }

    /// The variable declarations of the body, in order.
    pub fn variables(&self) -> impl Iterator<Item = &Member> {
        self.members.iter().filter_map(|item| match item {
            MemberItem::Variable(member) => Some(member),
            _ => None,
        })
    }

    /// Nested type declarations of the body, in order.
    pub fn nested(&self) -> impl Iterator<Item = &Declaration> {
        self.members.iter().filter_map(|item| match item {
            MemberItem::Declaration(decl) => Some(decl),
            _ => None,
        })
    }
}

impl Member {
    /// A `let` member with a single binding.
    pub fn constant(name: impl Into<String>) -> Self {
        Member::single(Mutability::Immutable, name)
    }

    /// A `var` member with a single binding.
    pub fn variable(name: impl Into<String>) -> Self {
        Member::single(Mutability::Mutable, name)
    }

    fn single(mutability: Mutability, name: impl Into<String>) -> Self {
        Member {
            annotations: Vec::new(),
            is_static: false,
            mutability,
            bindings: vec![Binding::new(name)],
            span: Span::default(),
        }
    }

    pub fn with_type(mut self, text: impl Into<String>) -> Self {
        if let Some(binding) = self.bindings.last_mut() {
            binding.type_annotation = Some(TypeAnnotation {
                text: text.into(),
                span: Span::default(),
            });
        }
        self
    }

    pub fn with_initializer(mut self, expr: Expr) -> Self {
        if let Some(binding) = self.bindings.last_mut() {
            binding.initializer = Some(expr);
        }
        self
    }

    pub fn with_accessor(mut self, accessor: AccessorShape) -> Self {
        if let Some(binding) = self.bindings.last_mut() {
            binding.accessor = accessor;
        }
        self
    }

    pub fn with_binding(mut self, binding: Binding) -> Self {
        self.bindings.push(binding);
        self
    }

    pub fn into_static(mut self) -> Self {
        self.is_static = true;
        self
    }

    pub fn annotate(mut self, annotation: MemberAnnotation) -> Self {
        self.annotations.push(annotation);
        self
    }

    /// The explicit key override, if the member carries one.
    pub fn coding_key(&self) -> Option<&StringLiteral> {
        self.annotations.iter().find_map(|annotation| match annotation {
            MemberAnnotation::CodingKey(key) => Some(key),
            MemberAnnotation::Other(_) => None,
        })
    }
}

impl Binding {
    pub fn new(name: impl Into<String>) -> Self {
        Binding {
            pattern: Pattern {
                name: name.into(),
                span: Span::default(),
            },
            type_annotation: None,
            initializer: None,
            accessor: AccessorShape::Stored,
        }
    }
}

impl Expr {
    fn synthetic(kind: ExprKind, text: impl Into<String>) -> Self {
        Expr {
            kind,
            text: text.into(),
            span: Span::default(),
        }
    }

    pub fn bool(value: bool) -> Self {
        Expr::synthetic(ExprKind::Bool(value), value.to_string())
    }

    pub fn integer(text: impl Into<String>) -> Self {
        Expr::synthetic(ExprKind::Integer, text)
    }

    pub fn float(text: impl Into<String>) -> Self {
        Expr::synthetic(ExprKind::Float, text)
    }

    pub fn string(value: &str) -> Self {
        Expr::synthetic(ExprKind::String, StringLiteral::quoted(value).0)
    }

    pub fn array(elements: Vec<Expr>) -> Self {
        let text = format!(
            "[{}]",
            elements
                .iter()
                .map(|e| e.text.as_str())
                .collect::<Vec<_>>()
                .join(", ")
        );
        Expr::synthetic(ExprKind::Array(elements), text)
    }

    pub fn nil() -> Self {
        Expr::synthetic(ExprKind::Nil, "nil")
    }

    /// An expression with no recognised literal shape.
    pub fn other(text: impl Into<String>) -> Self {
        Expr::synthetic(ExprKind::Other, text)
    }
}
