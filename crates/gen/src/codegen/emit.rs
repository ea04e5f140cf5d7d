//! Python source emission via the Emit trait.
//!
//! Purely mechanical string building: one impl per AST node, no rendering
//! decisions. Everything semantic happens in `render` before this point.

use super::types::{PyLiteral, PyType};

/// Trait for emitting Python source from AST nodes.
pub trait Emit {
    /// Convert the AST node to its Python source representation.
    fn emit(&self) -> String;
}

impl Emit for PyLiteral {
    fn emit(&self) -> String {
        match self {
            PyLiteral::Str(s) => py_string_repr(s),
            PyLiteral::Int(i) => i.to_string(),
            PyLiteral::Bool(b) => if *b { "True" } else { "False" }.to_string(),
        }
    }
}

impl Emit for PyType {
    fn emit(&self) -> String {
        match self {
            PyType::Builtin(name) => (*name).to_string(),
            PyType::None => "None".to_string(),
            PyType::Any => "Any".to_string(),
            PyType::Union(variants) => variants
                .iter()
                .map(Emit::emit)
                .collect::<Vec<_>>()
                .join(" | "),
            PyType::List(element) => format!("list[{}]", element.emit()),
            PyType::Dict { key, value } => format!("dict[{}, {}]", key.emit(), value.emit()),
            PyType::Literal(values) => {
                let inner = values.iter().map(Emit::emit).collect::<Vec<_>>().join(", ");
                format!("Literal[{inner}]")
            }
            PyType::Named { qualifier, name } => match qualifier {
                Some(alias) => format!("{alias}.{name}"),
                None => name.clone(),
            },
        }
    }
}

/// Spell a string the way Python `repr` does: single-quoted, with
/// backslashes, quotes, and common control characters escaped.
fn py_string_repr(s: &str) -> String {
    let mut out = String::with_capacity(s.len() + 2);
    out.push('\'');
    for c in s.chars() {
        match c {
            '\\' => out.push_str("\\\\"),
            '\'' => out.push_str("\\'"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            _ => out.push(c),
        }
    }
    out.push('\'');
    out
}
