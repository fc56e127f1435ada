//! The canonical text formatter.
//!
//! This rendering is FROZEN. Signatures and digests are computed over these
//! bytes; any change breaks every existing document.

use crate::base32;
use crate::component::{Catalog, Component, Value};

/// Render a component to its canonical text.
pub fn format_component(component: &Component) -> String {
    let mut out = String::new();
    write_component(&mut out, component, 0);
    out
}

fn write_component(out: &mut String, component: &Component, depth: usize) {
    write_value(out, component.value(), depth);
    let parameters = component.parameters();
    if !parameters.is_empty() {
        out.push('(');
        for (i, (key, value)) in parameters.entries().iter().enumerate() {
            if i > 0 {
                out.push_str(", ");
            }
            out.push('$');
            out.push_str(key);
            out.push_str(": ");
            write_component(out, value, depth);
        }
        out.push(')');
    }
}

fn write_value(out: &mut String, value: &Value, depth: usize) {
    match value {
        Value::None => out.push_str("none"),
        Value::Text(text) => write_text(out, text),
        Value::Binary(bytes) => {
            out.push('\'');
            out.push_str(&base32::encode(bytes));
            out.push('\'');
        }
        Value::Tag(tag) => {
            out.push('#');
            out.push_str(&tag.to_base32());
        }
        Value::Version(version) => out.push_str(&version.to_string()),
        Value::Moment(moment) => out.push_str(&moment.to_string()),
        Value::Name(name) => out.push_str(name),
        Value::Catalog(catalog) => write_catalog(out, catalog, depth),
    }
}

fn write_catalog(out: &mut String, catalog: &Catalog, depth: usize) {
    if catalog.is_empty() {
        out.push_str("[:]");
        return;
    }
    out.push('[');
    for (key, component) in catalog.entries() {
        out.push('\n');
        write_indent(out, depth + 1);
        out.push('$');
        out.push_str(key);
        out.push_str(": ");
        write_component(out, component, depth + 1);
    }
    out.push('\n');
    write_indent(out, depth);
    out.push(']');
}

fn write_text(out: &mut String, text: &str) {
    out.push('"');
    for character in text.chars() {
        match character {
            '"' => out.push_str("\\\""),
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            other => out.push(other),
        }
    }
    out.push('"');
}

fn write_indent(out: &mut String, depth: usize) {
    for _ in 0..depth {
        out.push_str("    ");
    }
}
