//! Maps JSON Schema scalar types to Rust type strings and converts schema
//! names into valid Rust identifiers.
//!
//! # Type Mapping Table
//!
//! | JSON Schema type | Rust type | Notes |
//! |------------------|-----------|-------|
//! | `string` | `String` | all formats, including `date-time` and `uri` |
//! | `integer` | `i64` | |
//! | `number` | `f64` | |
//! | `boolean` | `bool` | |
//! | `null` | `serde_json::Value` | |
//! | `array` | `Vec<T>` | handled by the codegen module via `items` |
//! | `object` | struct reference | handled by the codegen module |
//! | absent / unknown | `serde_json::Value` | fallback |

/// Map a JSON Schema scalar type name to a Rust type string.
///
/// Returns `None` for `"object"` and `"array"` — those need the schema's
/// `properties`/`items` and are resolved by the caller.
///
/// Unknown type names fall back to `serde_json::Value`, which can hold
/// anything a schema instance could contain.
pub fn scalar_to_rust_type(type_name: &str) -> Option<&'static str> {
    let rust = match type_name {
        "string" => "String",
        "integer" => "i64",
        "number" => "f64",
        "boolean" => "bool",
        "null" => "serde_json::Value",

        // Compound types — the caller must handle these.
        "object" | "array" => return None,

        // Fallback: unknown types emit as a raw JSON value.
        _ => "serde_json::Value",
    };
    Some(rust)
}

/// Convert a schema title or property name to PascalCase for Rust type names.
///
/// Splits on whitespace, `_`, `-`, `.`, and `/`, capitalizes each part, and
/// drops any character that cannot appear in an identifier:
/// - `"network endpoint"` → `"NetworkEndpoint"`
/// - `"signed-artifact"` → `"SignedArtifact"`
/// - `"v1/task_status"` → `"V1TaskStatus"`
///
/// A name starting with a digit is prefixed with `_`.
pub fn to_pascal_case(s: &str) -> String {
    let name: String = s
        .split(|c: char| c.is_whitespace() || matches!(c, '_' | '-' | '.' | '/'))
        .map(|part| {
            let part: String = part.chars().filter(|c| c.is_alphanumeric()).collect();
            let mut chars = part.chars();
            match chars.next() {
                None => String::new(),
                Some(c) => c.to_uppercase().to_string() + chars.as_str(),
            }
        })
        .collect();
    if name.chars().next().is_some_and(|c| c.is_ascii_digit()) {
        format!("_{name}")
    } else {
        name
    }
}

/// Convert a property name to snake_case for Rust field names.
///
/// - `"taskId"` → `"task_id"`
/// - `"created-on"` → `"created_on"`
/// - `"HTTPStatus"` → `"httpstatus"` (runs of capitals are not split)
pub fn to_snake_case(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut prev_lower = false;
    for c in s.chars() {
        if c.is_alphanumeric() {
            if c.is_uppercase() {
                if prev_lower {
                    out.push('_');
                }
                out.extend(c.to_lowercase());
                prev_lower = false;
            } else {
                out.push(c);
                prev_lower = c.is_lowercase() || c.is_ascii_digit();
            }
        } else if !out.ends_with('_') && !out.is_empty() {
            out.push('_');
            prev_lower = false;
        }
    }
    let out = out.trim_matches('_').to_string();
    if out.chars().next().is_some_and(|c| c.is_ascii_digit()) {
        format!("_{out}")
    } else {
        out
    }
}

/// Make a snake_case field name safe to use as a Rust identifier.
///
/// Reserved words get a trailing underscore (`"type"` → `"type_"`); the
/// codegen module adds a serde rename so the wire name is unchanged.
pub fn safe_field_ident(name: &str) -> String {
    const KEYWORDS: &[&str] = &[
        "as", "async", "await", "box", "break", "const", "continue", "crate", "dyn", "else",
        "enum", "extern", "false", "fn", "for", "if", "impl", "in", "let", "loop", "match", "mod",
        "move", "mut", "pub", "ref", "return", "self", "static", "struct", "super", "trait",
        "true", "type", "union", "unsafe", "use", "where", "while",
    ];
    if KEYWORDS.contains(&name) {
        format!("{name}_")
    } else {
        name.to_string()
    }
}

/// Convert an enum value string to a PascalCase Rust variant name.
///
/// - `"pending"` → `"Pending"`
/// - `"not-found"` → `"NotFound"`
/// - `"404"` → `"_404"`
pub fn to_variant_name(value: &str) -> String {
    to_pascal_case(value)
}
