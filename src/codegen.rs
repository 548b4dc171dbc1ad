//! Rust code generation from JSON Schema documents.
//!
//! Generates a single module containing:
//! - serde-derived structs for object schemas (root schemas, `definitions`,
//!   and nested property objects)
//! - Rust enums for all-string `enum` schemas
//! - type aliases for root schemas that are not objects
//!
//! The generated output is deterministic: properties and definitions are
//! iterated through `BTreeMap`s, so identical input always produces
//! byte-identical output. Output is raw (unindented beyond the module
//! wrapper) — canonical formatting is the normalizer's job when writing to
//! a file.

use std::fmt::Write;

use crate::error::{Error, Result};
use crate::schema::{Document, Schema, TypeName};
use crate::type_map::{
    safe_field_ident, scalar_to_rust_type, to_pascal_case, to_snake_case, to_variant_name,
};

/// Statistics collected during generation for reporting.
#[derive(Debug, Default)]
pub struct GenerationStats {
    pub structs_generated: usize,
    pub enums_generated: usize,
    pub aliases_generated: usize,
    pub optional_fields: usize,
    pub unknown_types_defaulted: usize,
}

/// Generate Rust source for the given documents, wrapped in `pub mod <module>`.
///
/// `export_types` controls the visibility of every generated item; the CLI
/// always passes `true`.
///
/// Returns the source text plus generation statistics for reporting.
pub fn generate(
    documents: &[Document],
    module: &str,
    export_types: bool,
) -> Result<(String, GenerationStats)> {
    if documents.is_empty() {
        return Err(Error::Codegen("no schema locations provided".to_string()));
    }

    let mut emitter = Emitter {
        items: String::new(),
        emitted: Vec::new(),
        ref_names: std::collections::BTreeMap::new(),
        vis: if export_types { "pub " } else { "" },
        stats: GenerationStats::default(),
    };

    for doc in documents {
        emitter.emit_document(doc)?;
    }

    let mut out = String::new();
    writeln!(out, "// Code generated by jsonschema2rs. DO NOT EDIT.").unwrap();
    writeln!(out, "//").unwrap();
    writeln!(out, "// Source schemas:").unwrap();
    for doc in documents {
        writeln!(out, "//   {}", doc.location).unwrap();
    }
    writeln!(out).unwrap();
    writeln!(out, "{}mod {} {{", emitter.vis, module).unwrap();
    writeln!(out, "    use serde::{{Deserialize, Serialize}};").unwrap();
    for line in emitter.items.lines() {
        if line.is_empty() {
            writeln!(out).unwrap();
        } else {
            writeln!(out, "    {line}").unwrap();
        }
    }
    writeln!(out, "}}").unwrap();

    Ok((out, emitter.stats))
}

struct Emitter {
    items: String,
    /// Names already emitted; later duplicates are skipped (first wins).
    emitted: Vec<String>,
    /// Definition key → emitted type name for the current document, so
    /// `$ref` targets resolve to the same name the definition was emitted
    /// under (its title, when it has one).
    ref_names: std::collections::BTreeMap<String, String>,
    vis: &'static str,
    stats: GenerationStats,
}

impl Emitter {
    fn emit_document(&mut self, doc: &Document) -> Result<()> {
        self.ref_names = doc
            .schema
            .definitions
            .iter()
            .map(|(key, def)| (key.clone(), type_name_for(def, key)))
            .collect();

        // Definitions first, so `$ref` targets exist whatever the root is.
        for (key, def) in &doc.schema.definitions {
            let name = type_name_for(def, key);
            self.emit_named(&name, def)?;
        }

        let root_name = type_name_for(&doc.schema, location_stem(&doc.location));
        self.emit_named(&root_name, &doc.schema)?;
        Ok(())
    }

    /// Emit a top-level type (struct, enum, or alias) for a schema.
    fn emit_named(&mut self, name: &str, schema: &Schema) -> Result<()> {
        if self.already_emitted(name) {
            return Ok(());
        }
        self.emitted.push(name.to_string());

        if let Some(values) = string_enum_values(schema) {
            self.emit_enum(name, schema.description.as_deref(), &values);
            return Ok(());
        }
        if !schema.properties.is_empty() {
            return self.emit_struct(name, schema);
        }

        // Root schema that is not an object: emit a type alias.
        let target = self.resolve_type(name, schema)?;
        self.push_doc(schema.description.as_deref());
        writeln!(self.items, "{}type {} = {};", self.vis, name, target).unwrap();
        writeln!(self.items).unwrap();
        self.stats.aliases_generated += 1;
        Ok(())
    }

    fn emit_struct(&mut self, name: &str, schema: &Schema) -> Result<()> {
        // Resolve field types first: nested objects and enums are emitted as
        // siblings before the struct that refers to them.
        let mut fields = String::new();
        let mut idents: Vec<String> = Vec::new();
        for (prop_name, prop) in &schema.properties {
            let nested_name = format!("{name}{}", to_pascal_case(prop_name));
            let base_type = self.resolve_type(&nested_name, prop)?;

            let required = schema.required.iter().any(|r| r == prop_name);
            let nullable = prop
                .type_name
                .as_ref()
                .is_some_and(TypeName::nullable);
            let optional = !required || nullable;

            let ident = disambiguate(safe_field_ident(&to_snake_case(prop_name)), &idents);
            let mut serde_attrs: Vec<String> = Vec::new();
            if ident != *prop_name {
                serde_attrs.push(format!("rename = \"{prop_name}\""));
            }
            let field_type = if optional {
                self.stats.optional_fields += 1;
                serde_attrs.push("default".to_string());
                serde_attrs.push("skip_serializing_if = \"Option::is_none\"".to_string());
                format!("Option<{base_type}>")
            } else {
                base_type
            };

            push_doc_to(&mut fields, prop.description.as_deref());
            if !serde_attrs.is_empty() {
                writeln!(fields, "#[serde({})]", serde_attrs.join(", ")).unwrap();
            }
            writeln!(fields, "{}{}: {},", self.vis, ident, field_type).unwrap();
            idents.push(ident);
        }

        self.push_doc(schema.description.as_deref());
        writeln!(
            self.items,
            "#[derive(Debug, Clone, Serialize, Deserialize)]"
        )
        .unwrap();
        writeln!(self.items, "{}struct {} {{", self.vis, name).unwrap();
        for line in fields.lines() {
            writeln!(self.items, "    {line}").unwrap();
        }
        writeln!(self.items, "}}").unwrap();
        writeln!(self.items).unwrap();
        self.stats.structs_generated += 1;
        Ok(())
    }

    fn emit_enum(&mut self, name: &str, description: Option<&str>, values: &[String]) {
        self.push_doc(description);
        writeln!(
            self.items,
            "#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]"
        )
        .unwrap();
        writeln!(self.items, "{}enum {} {{", self.vis, name).unwrap();
        let mut variants: Vec<String> = Vec::new();
        for value in values {
            let variant = disambiguate(to_variant_name(value), &variants);
            if variant != *value {
                writeln!(self.items, "    #[serde(rename = \"{value}\")]").unwrap();
            }
            writeln!(self.items, "    {variant},").unwrap();
            variants.push(variant);
        }
        writeln!(self.items, "}}").unwrap();
        writeln!(self.items).unwrap();
        self.stats.enums_generated += 1;
    }

    /// Resolve the Rust type for a (sub)schema, emitting nested types as a
    /// side effect. `context` is the name nested types are derived from.
    fn resolve_type(&mut self, context: &str, schema: &Schema) -> Result<String> {
        if let Some(reference) = &schema.reference {
            return match reference.strip_prefix("#/definitions/") {
                Some(key) => Ok(self
                    .ref_names
                    .get(key)
                    .cloned()
                    .unwrap_or_else(|| to_pascal_case(key))),
                None => {
                    // Non-local refs are the engine's fetch concern upstream;
                    // a raw value keeps the generated type usable.
                    self.stats.unknown_types_defaulted += 1;
                    Ok("serde_json::Value".to_string())
                }
            };
        }

        if let Some(values) = string_enum_values(schema) {
            if !self.already_emitted(context) {
                self.emitted.push(context.to_string());
                self.emit_enum(context, schema.description.as_deref(), &values);
            }
            return Ok(context.to_string());
        }

        if !schema.properties.is_empty() {
            if !self.already_emitted(context) {
                self.emitted.push(context.to_string());
                self.emit_struct(context, schema)?;
            }
            return Ok(context.to_string());
        }

        let primary = schema.type_name.as_ref().and_then(TypeName::primary);
        match primary {
            Some("array") => {
                let item_type = match &schema.items {
                    Some(items) => self.resolve_type(&format!("{context}Item"), items)?,
                    None => "serde_json::Value".to_string(),
                };
                Ok(format!("Vec<{item_type}>"))
            }
            Some("object") | None => {
                // Object with no properties, or no type at all: anything goes.
                self.stats.unknown_types_defaulted += 1;
                Ok("serde_json::Value".to_string())
            }
            Some(scalar) => Ok(scalar_to_rust_type(scalar)
                .unwrap_or("serde_json::Value")
                .to_string()),
        }
    }

    fn already_emitted(&self, name: &str) -> bool {
        self.emitted.iter().any(|n| n == name)
    }

    fn push_doc(&mut self, description: Option<&str>) {
        push_doc_to(&mut self.items, description);
    }
}

fn push_doc_to(out: &mut String, description: Option<&str>) {
    if let Some(description) = description {
        for line in description.lines() {
            let line = line.trim_end();
            if line.is_empty() {
                writeln!(out, "///").unwrap();
            } else {
                writeln!(out, "/// {line}").unwrap();
            }
        }
    }
}

/// Append a numeric suffix until `name` is distinct from everything in
/// `seen`. Distinct schema names can normalize to the same identifier
/// (`"not-found"` and `"not_found"` both become `NotFound`); the serde
/// rename keeps the wire name intact either way.
fn disambiguate(name: String, seen: &[String]) -> String {
    if !seen.contains(&name) {
        return name;
    }
    let mut n = 2;
    loop {
        let candidate = format!("{name}{n}");
        if !seen.contains(&candidate) {
            return candidate;
        }
        n += 1;
    }
}

/// Derive a type name from a schema's title, falling back to `fallback`.
fn type_name_for(schema: &Schema, fallback: &str) -> String {
    let name = schema
        .title
        .as_deref()
        .map(to_pascal_case)
        .filter(|n| !n.is_empty());
    match name {
        Some(name) => name,
        None => {
            let name = to_pascal_case(fallback);
            if name.is_empty() {
                "Generated".to_string()
            } else {
                name
            }
        }
    }
}

/// The last path segment of a location, minus any extension.
fn location_stem(location: &str) -> &str {
    let tail = location
        .rsplit(['/', '\\'])
        .next()
        .unwrap_or(location);
    tail.split('.').next().unwrap_or(tail)
}

/// If the schema is an all-string enum, return its values.
fn string_enum_values(schema: &Schema) -> Option<Vec<String>> {
    let values = schema.enum_values.as_ref()?;
    if values.is_empty() {
        return None;
    }
    values
        .iter()
        .map(|v| v.as_str().map(str::to_string))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::Document;

    fn doc(location: &str, json: &str) -> Document {
        Document {
            location: location.to_string(),
            schema: serde_json::from_str(json).unwrap(),
        }
    }

    #[test]
    fn generates_struct_with_required_and_optional_fields() {
        let documents = [doc(
            "file:///task.json",
            r#"{
                "title": "Task Status",
                "type": "object",
                "properties": {
                    "taskId": {"type": "string", "description": "Unique task identifier."},
                    "retriesLeft": {"type": "integer"}
                },
                "required": ["taskId"]
            }"#,
        )];
        let (source, stats) = generate(&documents, "models", true).unwrap();

        assert!(source.contains("pub mod models {"));
        assert!(source.contains("pub struct TaskStatus {"));
        assert!(source.contains("#[serde(rename = \"taskId\")]"));
        assert!(source.contains("pub task_id: String,"));
        assert!(source.contains("pub retries_left: Option<i64>,"));
        assert!(source.contains("/// Unique task identifier."));
        assert_eq!(stats.structs_generated, 1);
        assert_eq!(stats.optional_fields, 1);
    }

    #[test]
    fn generates_enum_for_string_values() {
        let documents = [doc(
            "s.json",
            r#"{
                "title": "Run State",
                "type": "object",
                "properties": {
                    "state": {"type": "string", "enum": ["pending", "not-found"]}
                },
                "required": ["state"]
            }"#,
        )];
        let (source, stats) = generate(&documents, "models", true).unwrap();

        assert!(source.contains("pub enum RunStateState {"));
        assert!(source.contains("#[serde(rename = \"pending\")]"));
        assert!(source.contains("Pending,"));
        assert!(source.contains("NotFound,"));
        assert!(source.contains("pub state: RunStateState,"));
        assert_eq!(stats.enums_generated, 1);
    }

    #[test]
    fn nested_objects_become_sibling_structs() {
        let documents = [doc(
            "s.json",
            r#"{
                "title": "Report",
                "type": "object",
                "properties": {
                    "author": {
                        "type": "object",
                        "properties": {"name": {"type": "string"}},
                        "required": ["name"]
                    }
                },
                "required": ["author"]
            }"#,
        )];
        let (source, _) = generate(&documents, "models", true).unwrap();

        assert!(source.contains("pub struct ReportAuthor {"));
        assert!(source.contains("pub name: String,"));
        assert!(source.contains("pub author: ReportAuthor,"));
    }

    #[test]
    fn ref_resolves_to_definition_type() {
        let documents = [doc(
            "s.json",
            r##"{
                "title": "Manifest",
                "type": "object",
                "definitions": {
                    "artifact": {
                        "title": "Artifact",
                        "type": "object",
                        "properties": {"path": {"type": "string"}},
                        "required": ["path"]
                    }
                },
                "properties": {
                    "entries": {"type": "array", "items": {"$ref": "#/definitions/artifact"}}
                },
                "required": ["entries"]
            }"##,
        )];
        let (source, stats) = generate(&documents, "models", true).unwrap();

        assert!(source.contains("pub struct Artifact {"));
        assert!(source.contains("pub entries: Vec<Artifact>,"));
        assert_eq!(stats.structs_generated, 2);
    }

    #[test]
    fn ref_resolves_to_titled_definition() {
        // The definition key and its title differ; the reference must use
        // the name the definition was actually emitted under.
        let documents = [doc(
            "s.json",
            r##"{
                "title": "Manifest",
                "type": "object",
                "definitions": {
                    "artifact": {
                        "title": "Stored Artifact",
                        "type": "object",
                        "properties": {"path": {"type": "string"}},
                        "required": ["path"]
                    }
                },
                "properties": {
                    "entries": {"type": "array", "items": {"$ref": "#/definitions/artifact"}}
                },
                "required": ["entries"]
            }"##,
        )];
        let (source, _) = generate(&documents, "models", true).unwrap();

        assert!(source.contains("pub struct StoredArtifact {"));
        assert!(source.contains("pub entries: Vec<StoredArtifact>,"));
        assert!(!source.contains("Vec<Artifact>"));
    }

    #[test]
    fn non_object_root_becomes_alias() {
        let documents = [doc(
            "names.json",
            r#"{"title": "Name List", "type": "array", "items": {"type": "string"}}"#,
        )];
        let (source, stats) = generate(&documents, "models", true).unwrap();

        assert!(source.contains("pub type NameList = Vec<String>;"));
        assert_eq!(stats.aliases_generated, 1);
    }

    #[test]
    fn untitled_root_falls_back_to_location_stem() {
        let documents = [doc(
            "https://example.com/schemas/task-status.json",
            r#"{"type": "object", "properties": {"ok": {"type": "boolean"}}}"#,
        )];
        let (source, _) = generate(&documents, "models", true).unwrap();
        assert!(source.contains("pub struct TaskStatus {"));
    }

    #[test]
    fn duplicate_type_names_emit_once() {
        let a = doc("a.json", r#"{"title": "Thing", "type": "object", "properties": {"x": {"type": "string"}}}"#);
        let b = doc("b.json", r#"{"title": "Thing", "type": "object", "properties": {"y": {"type": "string"}}}"#);
        let (source, stats) = generate(&[a, b], "models", true).unwrap();

        assert_eq!(source.matches("struct Thing {").count(), 1);
        assert_eq!(stats.structs_generated, 1);
    }

    #[test]
    fn keyword_property_gets_safe_ident() {
        let documents = [doc(
            "s.json",
            r#"{"title": "Kind", "type": "object", "properties": {"type": {"type": "string"}}, "required": ["type"]}"#,
        )];
        let (source, _) = generate(&documents, "models", true).unwrap();
        assert!(source.contains("#[serde(rename = \"type\")]"));
        assert!(source.contains("pub type_: String,"));
    }

    #[test]
    fn colliding_enum_values_get_distinct_variants() {
        let documents = [doc(
            "s.json",
            r#"{
                "title": "Outcome",
                "type": "object",
                "properties": {
                    "code": {"type": "string", "enum": ["not-found", "not_found"]}
                },
                "required": ["code"]
            }"#,
        )];
        let (source, _) = generate(&documents, "models", true).unwrap();

        assert!(source.contains("#[serde(rename = \"not-found\")]"));
        assert!(source.contains("#[serde(rename = \"not_found\")]"));
        assert!(source.contains("    NotFound,"));
        assert!(source.contains("    NotFound2,"));
    }

    #[test]
    fn colliding_property_names_get_distinct_fields() {
        let documents = [doc(
            "s.json",
            r#"{
                "title": "Record",
                "type": "object",
                "properties": {
                    "taskId": {"type": "string"},
                    "task_id": {"type": "string"}
                },
                "required": ["taskId", "task_id"]
            }"#,
        )];
        let (source, _) = generate(&documents, "models", true).unwrap();

        assert!(source.contains("#[serde(rename = \"taskId\")]"));
        assert!(source.contains("#[serde(rename = \"task_id\")]"));
        assert!(source.contains("pub task_id: String,"));
        assert!(source.contains("pub task_id2: String,"));
    }

    #[test]
    fn nullable_type_becomes_option_even_when_required() {
        let documents = [doc(
            "s.json",
            r#"{
                "title": "Row",
                "type": "object",
                "properties": {"note": {"type": ["string", "null"]}},
                "required": ["note"]
            }"#,
        )];
        let (source, _) = generate(&documents, "models", true).unwrap();
        assert!(source.contains("pub note: Option<String>,"));
    }

    #[test]
    fn empty_document_list_is_rejected() {
        let err = generate(&[], "models", true).unwrap_err();
        assert!(err.to_string().contains("no schema locations"));
    }

    #[test]
    fn deterministic_output() {
        let json = r#"{
            "title": "Task",
            "type": "object",
            "properties": {"b": {"type": "string"}, "a": {"type": "integer"}}
        }"#;
        let (first, _) = generate(&[doc("s.json", json)], "models", true).unwrap();
        let (second, _) = generate(&[doc("s.json", json)], "models", true).unwrap();
        assert_eq!(first, second);
    }
}
