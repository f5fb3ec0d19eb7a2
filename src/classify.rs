//! Member classification: which variables are stored data members.

use tracing::trace;

use crate::syntax::{AccessorShape, Binding, Declaration, Member, Mutability};

/// Outcome of classifying a member.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Classification {
    Stored,
    Ignored,
}

/// A member classified as stored, with its single binding.
#[derive(Debug, Clone, Copy)]
pub struct StoredMember<'a> {
    pub member: &'a Member,
    pub binding: &'a Binding,
}

impl<'a> StoredMember<'a> {
    pub fn name(&self) -> &'a str {
        &self.binding.pattern.name
    }

    /// `let` members with an initializer are fully initialized by the type itself.
    pub fn is_initialized_constant(&self) -> bool {
        self.member.mutability == Mutability::Immutable && self.binding.initializer.is_some()
    }
}

/// Decide whether `member` is a stored instance property.
///
/// Multi-pattern bindings, static members and members with a getter are
/// ignored. Observers (`willSet`/`didSet`) keep a member stored.
pub fn classify(member: &Member) -> Classification {
    if member.is_static || member.bindings.len() != 1 {
        return Classification::Ignored;
    }
    match member.bindings[0].accessor {
        AccessorShape::Stored | AccessorShape::Observed => Classification::Stored,
        AccessorShape::Computed => Classification::Ignored,
    }
}

/// The stored members of `decl`, in declaration order.
pub fn stored_members(decl: &Declaration) -> impl Iterator<Item = StoredMember<'_>> {
    decl.variables().filter_map(|member| match classify(member) {
        Classification::Stored => Some(StoredMember {
            member,
            binding: &member.bindings[0],
        }),
        Classification::Ignored => {
            trace!(
                names = ?member.bindings.iter().map(|b| b.pattern.name.as_str()).collect::<Vec<_>>(),
                "ignoring non-stored member"
            );
            None
        }
    })
}
