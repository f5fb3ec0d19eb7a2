use std::fmt;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// The type of a synthesized parameter.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum TypeDescriptor {
    /// A type annotation copied from the source, e.g. `Int?` or `[String: Any]`.
    Explicit(String),
    Bool,
    Int,
    Double,
    String,
    /// `[Element]`, built around the descriptor of the first array element.
    Array(Box<TypeDescriptor>),
}

impl TypeDescriptor {
    pub fn array_of(element: TypeDescriptor) -> Self {
        TypeDescriptor::Array(Box::new(element))
    }
}

impl fmt::Display for TypeDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TypeDescriptor::Explicit(text) => f.write_str(text),
            TypeDescriptor::Bool => f.write_str("Bool"),
            TypeDescriptor::Int => f.write_str("Int"),
            TypeDescriptor::Double => f.write_str("Double"),
            TypeDescriptor::String => f.write_str("String"),
            TypeDescriptor::Array(element) => write!(f, "[{}]", element),
        }
    }
}
