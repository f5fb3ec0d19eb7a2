//! member-synth: declaration synthesis for memberwise initializers and
//! serialization-key enums.
//!
//! Two macros are supported. `@PublicInit` on a struct or class generates a
//! public memberwise initializer; `@CodingKeys` generates a `CodingKeys` enum
//! mapping each stored member to its serialization key, optionally through a
//! naming strategy and per-member `@CodingKey(name:)` overrides. Attachments
//! that cannot be expanded produce diagnostics with fix-its instead.
//!
//! # Quick Start
//!
//! ```rust
//! use member_synth::expand::expand_source;
//! use member_synth::render::RenderOptions;
//!
//! let expanded = expand_source(r#"
//! @PublicInit
//! public struct State {
//!     public let id: Int
//! }
//! "#, &RenderOptions::default()).unwrap();
//!
//! assert!(expanded.diagnostics.is_empty());
//! assert!(expanded.source.contains("public init(\n        id: Int\n    ) {"));
//! ```
//!
//! The synthesizers can also be driven directly on a tree built in code:
//!
//! ```rust
//! use member_synth::syntax::{Declaration, DeclKind, Member, Span};
//! use member_synth::public_init;
//!
//! let decl = Declaration::new(DeclKind::Struct, "State")
//!     .with_member(Member::constant("id").with_type("Int"));
//! let init = public_init::synthesize(&decl, Span::default()).unwrap();
//! assert_eq!(init.parameters[0].name, "id");
//! ```

pub mod error;
pub mod syntax;
pub mod types;
pub mod classify;
pub mod infer;
pub mod diagnostic;
pub mod decl;
pub mod render;
pub mod public_init;
pub mod coding_keys;
pub mod macros;
pub mod parser;
pub mod expand;

pub use coding_keys::NamingStrategy;
pub use decl::GeneratedDecl;
pub use diagnostic::{Diagnostic, DiagnosticKind, FixIt};
pub use error::{ArgumentError, ParseError};
pub use expand::{apply_fix_its, expand_source, ExpandedSource};
pub use macros::{Attachment, Macro};
pub use render::RenderOptions;
pub use syntax::Declaration;
pub use types::TypeDescriptor;
