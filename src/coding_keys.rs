//! Serialization-key enum synthesis.

use std::fmt;
use std::str::FromStr;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::classify::{stored_members, StoredMember};
use crate::decl::KeyEnumDecl;
use crate::error::ArgumentError;
use crate::syntax::{Declaration, StringLiteral};

/// The name the key enum macro is attached under.
pub const MACRO_NAME: &str = "CodingKeys";

/// The name of the per-member override marker.
pub const OVERRIDE_NAME: &str = "CodingKey";

/// How member names map to serialization keys.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum NamingStrategy {
    /// The key is the member name.
    #[default]
    Identity,
    /// `firstName` becomes `first_name`.
    SnakeCase,
}

impl NamingStrategy {
    pub fn apply(&self, name: &str) -> String {
        match self {
            NamingStrategy::Identity => name.to_string(),
            NamingStrategy::SnakeCase => snake_case(name),
        }
    }
}

impl FromStr for NamingStrategy {
    type Err = ArgumentError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim_start_matches('.') {
            "default" | "identity" => Ok(NamingStrategy::Identity),
            "snake_case" => Ok(NamingStrategy::SnakeCase),
            other => Err(ArgumentError::UnknownStrategy {
                strategy: other.to_string(),
            }),
        }
    }
}

impl fmt::Display for NamingStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NamingStrategy::Identity => f.write_str("default"),
            NamingStrategy::SnakeCase => f.write_str("snake_case"),
        }
    }
}

/// Insert `_` before every interior uppercase letter and lowercase it.
///
/// The first character is kept as is, so names without interior uppercase
/// letters come back unchanged.
pub fn snake_case(name: &str) -> String {
    let mut out = String::with_capacity(name.len() + 4);
    for (i, c) in name.chars().enumerate() {
        if i > 0 && c.is_uppercase() {
            out.push('_');
            out.extend(c.to_lowercase());
        } else {
            out.push(c);
        }
    }
    out
}

/// Build the `CodingKeys` enum for every stored member of `decl`.
pub fn synthesize(decl: &Declaration, strategy: NamingStrategy) -> KeyEnumDecl {
    stored_members(decl).fold(KeyEnumDecl::coding_keys(), |keys, stored| {
        let raw_value = key_for(&stored, strategy);
        keys.case(stored.name(), raw_value)
    })
}

/// The raw value of a member's case, or `None` when it equals the name.
fn key_for(stored: &StoredMember<'_>, strategy: NamingStrategy) -> Option<StringLiteral> {
    if let Some(key) = stored.member.coding_key() {
        return Some(key.clone());
    }
    let name = unescaped(stored.name());
    let key = strategy.apply(name);
    (key != name).then(|| StringLiteral::quoted(&key))
}

/// `name` without the backticks of an escaped identifier.
fn unescaped(name: &str) -> &str {
    name.strip_prefix('`')
        .and_then(|n| n.strip_suffix('`'))
        .unwrap_or(name)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::syntax::{AccessorShape, DeclKind, Expr, Member, MemberAnnotation};

    fn cases(keys: &KeyEnumDecl) -> Vec<String> {
        keys.cases
            .iter()
            .map(|c| match &c.raw_value {
                Some(raw) => format!("{} = {}", c.name, raw.as_source()),
                None => c.name.clone(),
            })
            .collect()
    }

    fn state() -> Declaration {
        Declaration::new(DeclKind::Struct, "State")
            .inherit("Codable")
            .with_member(Member::constant("id").with_type("Int"))
            .with_member(Member::constant("firstName").with_type("String"))
    }

    #[test]
    fn test_snake_case() {
        assert_eq!(snake_case("firstName"), "first_name");
        assert_eq!(snake_case("id"), "id");
        assert_eq!(snake_case("userIDValue"), "user_i_d_value");
        assert_eq!(snake_case("Name"), "Name");
    }

    #[test]
    fn test_snake_case_inserts_one_underscore_per_interior_uppercase() {
        for name in ["aB", "aBcD", "someLongPropertyName", "x", "already_snake"] {
            let interior = name.chars().skip(1).filter(|c| c.is_uppercase()).count();
            let out = snake_case(name);
            assert_eq!(
                out.matches('_').count(),
                name.matches('_').count() + interior,
                "{}",
                name
            );
            assert!(!out.chars().skip(1).any(|c| c.is_uppercase()));
        }
    }

    #[test]
    fn test_identity_strategy() {
        let keys = synthesize(&state(), NamingStrategy::Identity);
        assert_eq!(cases(&keys), vec!["id", "firstName"]);
    }

    #[test]
    fn test_snake_case_strategy() {
        let keys = synthesize(&state(), NamingStrategy::SnakeCase);
        assert_eq!(cases(&keys), vec!["id", "firstName = \"first_name\""]);
    }

    #[test]
    fn test_override_wins_over_strategy() {
        let decl = state().with_member(
            Member::constant("lastName")
                .with_type("String")
                .annotate(MemberAnnotation::CodingKey(StringLiteral::from_source("\"some last name\""))),
        );
        for strategy in [NamingStrategy::Identity, NamingStrategy::SnakeCase] {
            let keys = synthesize(&decl, strategy);
            assert_eq!(keys.cases[2].raw_value.as_ref().unwrap().as_source(), "\"some last name\"");
        }
    }

    #[test]
    fn test_override_equal_to_name_is_still_emitted() {
        let decl = Declaration::new(DeclKind::Struct, "State").with_member(
            Member::constant("id")
                .with_type("Int")
                .annotate(MemberAnnotation::CodingKey(StringLiteral::quoted("id"))),
        );
        assert_eq!(cases(&synthesize(&decl, NamingStrategy::Identity)), vec!["id = \"id\""]);
    }

    #[test]
    fn test_let_with_default_still_gets_a_key() {
        let decl = Declaration::new(DeclKind::Struct, "State")
            .with_member(Member::constant("version").with_initializer(Expr::integer("1")))
            .with_member(Member::variable("total").with_type("Int").with_accessor(AccessorShape::Computed));
        assert_eq!(cases(&synthesize(&decl, NamingStrategy::Identity)), vec!["version"]);
    }

    #[test]
    fn test_backticked_names_key_without_backticks() {
        let decl = Declaration::new(DeclKind::Struct, "State")
            .with_member(Member::constant("`isNew`").with_type("Bool"))
            .with_member(Member::constant("`default`").with_type("Int"));
        assert_eq!(
            cases(&synthesize(&decl, NamingStrategy::SnakeCase)),
            vec!["`isNew` = \"is_new\"", "`default`"]
        );
        assert_eq!(
            cases(&synthesize(&decl, NamingStrategy::Identity)),
            vec!["`isNew`", "`default`"]
        );
    }

    #[test]
    fn test_strategy_from_str() {
        assert_eq!(".snake_case".parse::<NamingStrategy>(), Ok(NamingStrategy::SnakeCase));
        assert_eq!("default".parse::<NamingStrategy>(), Ok(NamingStrategy::Identity));
        assert!(matches!(
            ".camelCase".parse::<NamingStrategy>(),
            Err(ArgumentError::UnknownStrategy { .. })
        ));
    }
}
