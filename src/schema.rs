//! JSON Schema data model and document loading.
//!
//! Only the subset of JSON Schema needed for type generation is modeled:
//! `title`, `type`, `properties`, `required`, `items`, `enum`, `$ref`,
//! `definitions`, `format`, and `description`. Unknown keywords are ignored
//! rather than rejected, so documents written against any draft parse as long
//! as the modeled keywords have the expected shapes.
//!
//! Documents are loaded from bare filesystem paths, `file://` URLs, or —
//! when built with the `fetch` feature — `http(s)://` URLs. Both JSON and
//! YAML encodings are accepted.

use std::collections::BTreeMap;
use std::path::Path;

use serde::Deserialize;

use crate::error::{Error, Result};

/// A schema document plus the location it was loaded from.
///
/// The location is kept for diagnostics and as a fallback type-name source
/// when the schema has no `title`.
#[derive(Debug)]
pub struct Document {
    pub location: String,
    pub schema: Schema,
}

/// A (sub)schema. The model is recursive: `properties`, `items`, and
/// `definitions` all hold further schemas.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Schema {
    /// Human-readable schema title, used to derive the generated type name.
    #[serde(default)]
    pub title: Option<String>,

    /// Schema description, emitted as a doc comment.
    #[serde(default)]
    pub description: Option<String>,

    /// The `type` keyword: a single type name or an array of them.
    #[serde(rename = "type", default)]
    pub type_name: Option<TypeName>,

    /// Object properties keyed by name. Sorted by `BTreeMap` so generation
    /// is deterministic regardless of document key order.
    #[serde(default)]
    pub properties: BTreeMap<String, Schema>,

    /// Names of required properties; everything else becomes `Option<T>`.
    #[serde(default)]
    pub required: Vec<String>,

    /// Array item schema.
    #[serde(default)]
    pub items: Option<Box<Schema>>,

    /// Enumerated values. Only all-string enums become Rust enums; anything
    /// else falls back to the base type.
    #[serde(rename = "enum", default)]
    pub enum_values: Option<Vec<serde_json::Value>>,

    /// A `$ref` to another schema. Only local `#/definitions/<name>`
    /// references are resolved.
    #[serde(rename = "$ref", default)]
    pub reference: Option<String>,

    /// Local definitions referenced via `#/definitions/<name>`.
    #[serde(default)]
    pub definitions: BTreeMap<String, Schema>,

    /// The `format` keyword (e.g. `"date-time"`, `"uri"`). Informational
    /// only; all formats map to the base type.
    #[serde(default)]
    pub format: Option<String>,
}

/// The `type` keyword, which JSON Schema allows as either a single name or
/// a list of alternatives (commonly `["string", "null"]`).
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum TypeName {
    One(String),
    Many(Vec<String>),
}

impl TypeName {
    /// The primary (first non-`"null"`) type name, if any.
    pub fn primary(&self) -> Option<&str> {
        match self {
            TypeName::One(name) => Some(name.as_str()),
            TypeName::Many(names) => names
                .iter()
                .map(String::as_str)
                .find(|n| *n != "null")
                .or_else(|| names.first().map(String::as_str)),
        }
    }

    /// Whether `"null"` is one of the allowed types.
    pub fn nullable(&self) -> bool {
        match self {
            TypeName::One(name) => name == "null",
            TypeName::Many(names) => names.iter().any(|n| n == "null"),
        }
    }
}

/// Load a schema document from a location string.
///
/// Supported locations: bare filesystem paths, `file://` URLs, and (with the
/// `fetch` feature) `http://` / `https://` URLs.
pub fn load(location: &str) -> Result<Document> {
    let bytes = fetch(location)?;
    let schema = parse(location, &bytes)?;
    Ok(Document {
        location: location.to_string(),
        schema,
    })
}

fn fetch(location: &str) -> Result<Vec<u8>> {
    if let Some(path) = location.strip_prefix("file://") {
        return read_file(Path::new(path));
    }
    if location.starts_with("http://") || location.starts_with("https://") {
        return fetch_url(location);
    }
    read_file(Path::new(location))
}

fn read_file(path: &Path) -> Result<Vec<u8>> {
    std::fs::read(path).map_err(|e| Error::Read {
        path: path.to_path_buf(),
        source: e,
    })
}

#[cfg(feature = "fetch")]
fn fetch_url(url: &str) -> Result<Vec<u8>> {
    use std::io::Read;

    let response = ureq::get(url)
        .call()
        .map_err(|e| Error::Fetch(format!("GET {url}: {e}")))?;

    let mut body = Vec::new();
    response
        .into_reader()
        .read_to_end(&mut body)
        .map_err(|e| Error::Fetch(format!("reading response body from {url}: {e}")))?;
    Ok(body)
}

#[cfg(not(feature = "fetch"))]
fn fetch_url(url: &str) -> Result<Vec<u8>> {
    Err(Error::UnsupportedScheme(url.to_string()))
}

/// Parse a schema document as JSON or YAML.
///
/// Locations ending in `.yml`/`.yaml` parse as YAML directly; everything
/// else tries JSON first and falls back to YAML, so extensionless locations
/// still work for both encodings.
fn parse(location: &str, bytes: &[u8]) -> Result<Schema> {
    let lower = location.to_ascii_lowercase();
    if lower.ends_with(".yml") || lower.ends_with(".yaml") {
        return serde_yaml::from_slice(bytes).map_err(|e| Error::Parse {
            location: location.to_string(),
            message: e.to_string(),
        });
    }
    match serde_json::from_slice(bytes) {
        Ok(schema) => Ok(schema),
        Err(json_err) => serde_yaml::from_slice(bytes).map_err(|_| Error::Parse {
            location: location.to_string(),
            message: format!("not valid JSON ({json_err}) or YAML"),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const MINIMAL: &str = r#"{
        "$schema": "http://json-schema.org/draft-07/schema#",
        "title": "Task Status",
        "type": "object",
        "properties": {
            "state": {"type": "string", "enum": ["pending", "running", "completed"]},
            "retriesLeft": {"type": "integer"},
            "deadline": {"type": "string", "format": "date-time"}
        },
        "required": ["state", "deadline"]
    }"#;

    #[test]
    fn parse_minimal_schema() {
        let schema: Schema = serde_json::from_str(MINIMAL).unwrap();
        assert_eq!(schema.title.as_deref(), Some("Task Status"));
        assert_eq!(
            schema.type_name.as_ref().unwrap().primary(),
            Some("object")
        );
        assert_eq!(schema.properties.len(), 3);
        assert_eq!(schema.required, vec!["state", "deadline"]);

        let state = &schema.properties["state"];
        assert_eq!(state.type_name.as_ref().unwrap().primary(), Some("string"));
        assert_eq!(state.enum_values.as_ref().unwrap().len(), 3);

        let deadline = &schema.properties["deadline"];
        assert_eq!(deadline.format.as_deref(), Some("date-time"));
    }

    #[test]
    fn type_array_with_null() {
        let schema: Schema =
            serde_json::from_str(r#"{"type": ["string", "null"]}"#).unwrap();
        let type_name = schema.type_name.unwrap();
        assert_eq!(type_name.primary(), Some("string"));
        assert!(type_name.nullable());
    }

    #[test]
    fn unknown_keywords_are_ignored() {
        let schema: Schema = serde_json::from_str(
            r#"{"type": "object", "additionalProperties": false, "minProperties": 1}"#,
        )
        .unwrap();
        assert_eq!(
            schema.type_name.as_ref().unwrap().primary(),
            Some("object")
        );
    }

    #[test]
    fn parse_yaml_document() {
        let yaml = "title: Artifact\ntype: object\nproperties:\n  name:\n    type: string\n";
        let schema = parse("schema.yml", yaml.as_bytes()).unwrap();
        assert_eq!(schema.title.as_deref(), Some("Artifact"));
        assert!(schema.properties.contains_key("name"));
    }

    #[test]
    fn extensionless_yaml_falls_back() {
        let yaml = "title: Artifact\ntype: object\n";
        let schema = parse("schema", yaml.as_bytes()).unwrap();
        assert_eq!(schema.title.as_deref(), Some("Artifact"));
    }

    #[test]
    fn garbage_reports_parse_error() {
        let err = parse("bad.json", b"{not json or yaml: [").unwrap_err();
        assert!(err.to_string().contains("bad.json"));
    }

    #[test]
    fn load_from_file_url() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("s.json");
        std::fs::write(&path, MINIMAL).unwrap();

        let doc = load(&format!("file://{}", path.display())).unwrap();
        assert_eq!(doc.schema.title.as_deref(), Some("Task Status"));

        let doc = load(path.to_str().unwrap()).unwrap();
        assert_eq!(doc.location, path.to_str().unwrap());
    }

    #[test]
    fn load_missing_file_reports_path() {
        let err = load("/nonexistent/schema.json").unwrap_err();
        assert!(err.to_string().contains("/nonexistent/schema.json"));
    }
}
