//! Canonical documentation keys (`T:`, `M:`, `F:`, `P:`, `E:` strings).
//!
//! These are the strings XML documentation files use in
//! `<member name="...">`. The writer appends into a caller-owned buffer so a
//! whole run can format every key through one allocation.

use crate::metadata::{MetadataDef, TypeName, TypeSig};
use std::fmt::Write;

/// Format the key for `def` into `buf`, replacing its contents.
pub fn key<'a>(def: &MetadataDef, buf: &'a mut String) -> &'a str {
    buf.clear();
    write_key(buf, def);
    buf.as_str()
}

/// Append the key for `def` to `out`.
pub fn write_key(out: &mut String, def: &MetadataDef) {
    match def {
        MetadataDef::Type { name, .. } => {
            out.push_str("T:");
            write_type_name(out, name);
        }
        MetadataDef::Method {
            declaring_type,
            name,
            generic_arity,
            parameters,
            return_type,
            ..
        } => {
            out.push_str("M:");
            write_member_name(out, declaring_type, name);
            if *generic_arity > 0 {
                let _ = write!(out, "``{}", generic_arity);
            }
            write_parameters(out, parameters);
            if name == "op_Implicit" || name == "op_Explicit" {
                if let Some(ret) = return_type {
                    out.push('~');
                    write_sig(out, ret);
                }
            }
        }
        MetadataDef::Field {
            declaring_type,
            name,
            ..
        } => {
            out.push_str("F:");
            write_member_name(out, declaring_type, name);
        }
        MetadataDef::Property {
            declaring_type,
            name,
            parameters,
            ..
        } => {
            out.push_str("P:");
            write_member_name(out, declaring_type, name);
            write_parameters(out, parameters);
        }
        MetadataDef::Event {
            declaring_type,
            name,
            ..
        } => {
            out.push_str("E:");
            write_member_name(out, declaring_type, name);
        }
    }
}

fn write_member_name(out: &mut String, declaring_type: &TypeName, name: &str) {
    write_type_name(out, declaring_type);
    out.push('.');
    // `.ctor` → `#ctor`, `IEnumerable<T>.GetEnumerator` → `IEnumerable{T}#GetEnumerator`
    for c in name.chars() {
        out.push(match c {
            '.' => '#',
            '<' => '{',
            '>' => '}',
            c => c,
        });
    }
}

fn write_parameters(out: &mut String, parameters: &[TypeSig]) {
    if parameters.is_empty() {
        return;
    }
    out.push('(');
    for (i, p) in parameters.iter().enumerate() {
        if i > 0 {
            out.push(',');
        }
        write_sig(out, p);
    }
    out.push(')');
}

/// Definition form: `Ns.Outer`1.Inner`.
fn write_type_name(out: &mut String, name: &TypeName) {
    for (i, level) in name.chain().into_iter().enumerate() {
        if i == 0 {
            if !level.namespace.is_empty() {
                out.push_str(&level.namespace);
                out.push('.');
            }
        } else {
            out.push('.');
        }
        out.push_str(&level.name);
        if level.generic_arity > 0 {
            let _ = write!(out, "`{}", level.generic_arity);
        }
    }
}

fn write_sig(out: &mut String, sig: &TypeSig) {
    match sig {
        TypeSig::Named { name, arguments } if arguments.is_empty() => write_type_name(out, name),
        TypeSig::Named { name, arguments } => write_instantiation(out, name, arguments),
        TypeSig::Array { element, rank } => {
            write_sig(out, element);
            if *rank <= 1 {
                out.push_str("[]");
            } else {
                out.push('[');
                for i in 0..*rank {
                    if i > 0 {
                        out.push(',');
                    }
                    out.push_str("0:");
                }
                out.push(']');
            }
        }
        TypeSig::Pointer { element } => {
            write_sig(out, element);
            out.push('*');
        }
        TypeSig::ByRef { element } => {
            write_sig(out, element);
            out.push('@');
        }
        TypeSig::TypeParam { index } => {
            let _ = write!(out, "`{}", index);
        }
        TypeSig::MethodParam { index } => {
            let _ = write!(out, "``{}", index);
        }
    }
}

/// Use form: `Ns.Outer{System.Int32}.Inner{System.String}`.
///
/// Arguments are handed out to each nesting level by that level's arity,
/// outermost first. A level that runs out of arguments falls back to the
/// definition suffix.
fn write_instantiation(out: &mut String, name: &TypeName, arguments: &[TypeSig]) {
    let mut next = 0;
    for (i, level) in name.chain().into_iter().enumerate() {
        if i == 0 {
            if !level.namespace.is_empty() {
                out.push_str(&level.namespace);
                out.push('.');
            }
        } else {
            out.push('.');
        }
        out.push_str(&level.name);

        let arity = level.generic_arity as usize;
        if arity == 0 {
            continue;
        }
        match arguments.get(next..next + arity) {
            Some(args) => {
                out.push('{');
                for (j, a) in args.iter().enumerate() {
                    if j > 0 {
                        out.push(',');
                    }
                    write_sig(out, a);
                }
                out.push('}');
                next += arity;
            }
            None => {
                let _ = write!(out, "`{}", arity);
            }
        }
    }
}
