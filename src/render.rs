//! Printing generated declarations as source text.

use std::fmt::{self, Write};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::decl::{GeneratedDecl, InitializerDecl, KeyEnumDecl};

/// Formatting options for generated code.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct RenderOptions {
    /// Spaces per nesting level.
    pub indent_width: usize,
}

impl Default for RenderOptions {
    fn default() -> Self {
        RenderOptions { indent_width: 4 }
    }
}

impl RenderOptions {
    pub fn indent(&self) -> String {
        " ".repeat(self.indent_width)
    }
}

/// Render a declaration with no leading indentation.
pub fn render(decl: &GeneratedDecl, options: &RenderOptions) -> String {
    Rendered { decl, options }.to_string()
}

/// Render a declaration with every non-empty line prefixed by `indent`.
pub fn render_indented(decl: &GeneratedDecl, indent: &str, options: &RenderOptions) -> String {
    render(decl, options)
        .lines()
        .map(|line| {
            if line.is_empty() {
                String::new()
            } else {
                format!("{}{}", indent, line)
            }
        })
        .collect::<Vec<_>>()
        .join("\n")
}

struct Rendered<'a> {
    decl: &'a GeneratedDecl,
    options: &'a RenderOptions,
}

impl fmt::Display for Rendered<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.decl {
            GeneratedDecl::Initializer(init) => write_initializer(f, init, self.options),
            GeneratedDecl::KeyEnum(keys) => write_key_enum(f, keys, self.options),
        }
    }
}

fn write_initializer(out: &mut impl Write, init: &InitializerDecl, options: &RenderOptions) -> fmt::Result {
    let indent = options.indent();
    if init.parameters.is_empty() {
        out.write_str("public init() {\n")?;
    } else {
        out.write_str("public init(\n")?;
        for (i, param) in init.parameters.iter().enumerate() {
            write!(out, "{}{}: {}", indent, param.name, param.ty)?;
            if let Some(default) = &param.default {
                write!(out, " = {}", default)?;
            }
            if i + 1 < init.parameters.len() {
                out.write_char(',')?;
            }
            out.write_char('\n')?;
        }
        out.write_str(") {\n")?;
    }
    for assignment in &init.body {
        writeln!(out, "{}self.{} = {}", indent, assignment.member, assignment.value)?;
    }
    out.write_char('}')
}

fn write_key_enum(out: &mut impl Write, keys: &KeyEnumDecl, options: &RenderOptions) -> fmt::Result {
    let indent = options.indent();
    write!(out, "enum {}: {}", keys.name, keys.raw_type)?;
    for conformance in &keys.conformances {
        write!(out, ", {}", conformance)?;
    }
    out.write_str(" {\n")?;
    for case in &keys.cases {
        write!(out, "{}case {}", indent, case.name)?;
        if let Some(raw) = &case.raw_value {
            write!(out, " = {}", raw.as_source())?;
        }
        out.write_char('\n')?;
    }
    out.write_char('}')
}

impl fmt::Display for GeneratedDecl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let rendered = Rendered {
            decl: self,
            options: &RenderOptions::default(),
        };
        fmt::Display::fmt(&rendered, f)
    }
}
