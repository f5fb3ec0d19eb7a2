//! Typed nodes for generated declarations.
//!
//! Synthesizers build these through the methods below; text is produced only
//! by [`render`](crate::render).

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::syntax::StringLiteral;
use crate::types::TypeDescriptor;

/// A declaration produced by a macro expansion.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum GeneratedDecl {
    Initializer(InitializerDecl),
    KeyEnum(KeyEnumDecl),
}

/// `public init(...) { ... }`
#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct InitializerDecl {
    pub parameters: Vec<Parameter>,
    pub body: Vec<Assignment>,
}

/// `name: Type = default`
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Parameter {
    pub name: String,
    pub ty: TypeDescriptor,
    /// Default value, as written in the source.
    pub default: Option<String>,
}

/// `self.member = value`
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Assignment {
    pub member: String,
    pub value: String,
}

/// `enum Name: RawType, Conformance { case ... }`
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct KeyEnumDecl {
    pub name: String,
    pub raw_type: String,
    pub conformances: Vec<String>,
    pub cases: Vec<KeyCase>,
}

/// `case name` or `case name = "raw"`
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct KeyCase {
    pub name: String,
    pub raw_value: Option<StringLiteral>,
}

impl InitializerDecl {
    pub fn new() -> Self {
        InitializerDecl::default()
    }

    /// Add a parameter and the assignment that stores it into the member of
    /// the same name.
    pub fn member_parameter(
        mut self,
        name: impl Into<String>,
        ty: TypeDescriptor,
        default: Option<String>,
    ) -> Self {
        let name = name.into();
        self.body.push(Assignment {
            member: name.clone(),
            value: name.clone(),
        });
        self.parameters.push(Parameter { name, ty, default });
        self
    }

    pub fn is_empty(&self) -> bool {
        self.parameters.is_empty() && self.body.is_empty()
    }
}

impl KeyEnumDecl {
    /// `enum CodingKeys: String, CodingKey`
    pub fn coding_keys() -> Self {
        KeyEnumDecl {
            name: "CodingKeys".to_string(),
            raw_type: "String".to_string(),
            conformances: vec!["CodingKey".to_string()],
            cases: Vec::new(),
        }
    }

    pub fn case(mut self, name: impl Into<String>, raw_value: Option<StringLiteral>) -> Self {
        self.cases.push(KeyCase {
            name: name.into(),
            raw_value,
        });
        self
    }
}

impl From<InitializerDecl> for GeneratedDecl {
    fn from(decl: InitializerDecl) -> Self {
        GeneratedDecl::Initializer(decl)
    }
}

impl From<KeyEnumDecl> for GeneratedDecl {
    fn from(decl: KeyEnumDecl) -> Self {
        GeneratedDecl::KeyEnum(decl)
    }
}
