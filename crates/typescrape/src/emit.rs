//! TypeScript declaration generator.
//!
//! Emits one `export interface` per nested type (first-discovery order) and
//! then one for the root resource, each preceded by a doc comment built from
//! the scraped description. Every leaf scalar is unioned with the dynamic
//! reference placeholder type.

use crate::error::EmitError;
use crate::schema::{MapSchema, Property, Resource, TypeDescriptor};
use regex::Regex;
use std::sync::LazyLock;

static IDENT_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^[A-Za-z_$][A-Za-z0-9_$]*$").unwrap());
static NON_IDENT_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"[^A-Za-z0-9_$]+").unwrap());

/// Default name of the dynamic reference placeholder type.
pub const DEFAULT_PLACEHOLDER: &str = "IntrinsicFunction";

/// Knobs for the generated text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmitOptions {
    /// Type unioned onto every leaf scalar.
    pub placeholder: String,
    /// Module to `import type` the placeholder from. No import when `None`.
    pub placeholder_import: Option<String>,
}

impl Default for EmitOptions {
    fn default() -> Self {
        Self {
            placeholder: DEFAULT_PLACEHOLDER.to_string(),
            placeholder_import: None,
        }
    }
}

/// Generate the declarations for a fully resolved resource.
pub fn emit(resource: &Resource, options: &EmitOptions) -> Result<String, EmitError> {
    let mut out = String::new();

    if let Some(ref module) = options.placeholder_import {
        out.push_str(&format!(
            "import type {{ {} }} from {};\n\n",
            options.placeholder,
            quote(module)
        ));
    }

    let mut blocks = Vec::with_capacity(resource.types.len() + 1);
    for schema in &resource.types {
        blocks.push(emit_interface(schema, options)?);
    }
    blocks.push(emit_root(&resource.schema, options)?);

    out.push_str(&blocks.join("\n"));
    Ok(out)
}

/// TypeScript identifier for a schema name: `AWS::S3::Bucket` becomes
/// `AWS_S3_Bucket`.
pub fn identifier(name: &str) -> String {
    let ident = NON_IDENT_RE.replace_all(name, "_");
    let ident = ident.trim_matches('_');
    match ident.chars().next() {
        None => "_".to_string(),
        Some(c) if c.is_ascii_digit() => format!("_{ident}"),
        Some(_) => ident.to_string(),
    }
}

/// A nested type declaration.
fn emit_interface(schema: &MapSchema, options: &EmitOptions) -> Result<String, EmitError> {
    let mut out = String::new();
    push_doc(&mut out, &schema.description, "");
    out.push_str(&format!("export interface {} {{\n", identifier(&schema.name)));
    for prop in &schema.properties {
        push_field(&mut out, schema, prop, options, "  ")?;
    }
    out.push_str("}\n");
    Ok(out)
}

/// The root declaration, wrapped in the fixed `Type` / `Properties` shape.
fn emit_root(schema: &MapSchema, options: &EmitOptions) -> Result<String, EmitError> {
    let mut out = String::new();
    push_doc(&mut out, &schema.description, "");
    out.push_str(&format!("export interface {} {{\n", identifier(&schema.name)));
    out.push_str(&format!("  Type: {};\n", quote(&schema.name)));
    if schema.properties.is_empty() {
        out.push_str("  Properties: {};\n");
    } else {
        out.push_str("  Properties: {\n");
        for prop in &schema.properties {
            push_field(&mut out, schema, prop, options, "    ")?;
        }
        out.push_str("  };\n");
    }
    out.push_str("}\n");
    Ok(out)
}

fn push_field(
    out: &mut String,
    schema: &MapSchema,
    prop: &Property,
    options: &EmitOptions,
    indent: &str,
) -> Result<(), EmitError> {
    let ty = type_expr(&prop.ty, &options.placeholder).ok_or_else(|| {
        EmitError::UnexpectedDescriptor {
            schema: schema.name.clone(),
            field: prop.key.clone(),
            tag: prop.ty.tag(),
        }
    })?;

    push_doc(out, &prop.description, indent);
    let key = if IDENT_RE.is_match(&prop.key) {
        prop.key.clone()
    } else {
        quote(&prop.key)
    };
    let optional = if prop.required { "" } else { "?" };
    out.push_str(&format!("{indent}{key}{optional}: {ty};\n"));
    Ok(())
}

/// TypeScript type for a descriptor; `None` for shapes that have no field
/// spelling (inline maps).
fn type_expr(ty: &TypeDescriptor, placeholder: &str) -> Option<String> {
    match ty {
        TypeDescriptor::Scalar(kind) => Some(format!("{} | {placeholder}", kind.to_ts_type())),
        TypeDescriptor::List(inner) => {
            let inner_ty = type_expr(inner, placeholder)?;
            if matches!(**inner, TypeDescriptor::Scalar(_)) {
                Some(format!("({inner_ty})[]"))
            } else {
                Some(format!("{inner_ty}[]"))
            }
        }
        TypeDescriptor::Record(inner) => {
            Some(format!("{{ [key: string]: {} }}", type_expr(inner, placeholder)?))
        }
        TypeDescriptor::Ref(name) => Some(identifier(name)),
        TypeDescriptor::Map(_) => None,
    }
}

/// Doc comment from Markdown text. Empty text emits nothing.
fn push_doc(out: &mut String, text: &str, indent: &str) {
    if text.trim().is_empty() {
        return;
    }
    out.push_str(&format!("{indent}/**\n"));
    for line in text.lines() {
        let line = line.trim_end().replace("*/", "*\\/");
        if line.is_empty() {
            out.push_str(&format!("{indent} *\n"));
        } else {
            out.push_str(&format!("{indent} * {line}\n"));
        }
    }
    out.push_str(&format!("{indent} */\n"));
}

/// Double-quoted TypeScript string literal.
fn quote(s: &str) -> String {
    serde_json::to_string(s).unwrap_or_else(|_| format!("\"{s}\""))
}
