//! The generation engine boundary.
//!
//! The pipeline never talks to schema loading or code generation directly;
//! it hands a [`GenerationRequest`] to an [`Engine`] and gets source bytes
//! back. [`SchemaEngine`] is the production implementation; tests substitute
//! doubles to simulate engine failures without touching the filesystem or
//! the network.

use crate::codegen;
use crate::error::Result;
use crate::schema::{self, Document};

/// One generation job: the schema locations to load and the module to wrap
/// the generated types in. Built once, consumed exactly once.
#[derive(Debug)]
pub struct GenerationRequest {
    /// Schema locations in caller order. Uniqueness is not enforced.
    pub locations: Vec<String>,

    /// Name of the generated `pub mod`.
    pub module: String,

    /// Whether generated items are `pub`. The CLI always sets this.
    pub export_types: bool,
}

/// Generated source produced by an engine. Always a complete compilable
/// candidate, never a partial result.
#[derive(Debug)]
pub struct GenerationResult {
    pub source: Vec<u8>,
}

/// A source-generation capability. Implementations run synchronously and
/// either produce a complete result or fail.
pub trait Engine {
    fn execute(&self, request: &GenerationRequest) -> Result<GenerationResult>;
}

/// The production engine: loads every location, parses JSON/YAML schema
/// documents, and generates serde-derived Rust types.
#[derive(Debug, Default)]
pub struct SchemaEngine {
    quiet: bool,
}

impl SchemaEngine {
    pub fn new(quiet: bool) -> Self {
        Self { quiet }
    }
}

impl Engine for SchemaEngine {
    fn execute(&self, request: &GenerationRequest) -> Result<GenerationResult> {
        let mut documents: Vec<Document> = Vec::with_capacity(request.locations.len());
        for location in &request.locations {
            documents.push(schema::load(location)?);
        }

        let (source, stats) =
            codegen::generate(&documents, &request.module, request.export_types)?;

        if !self.quiet {
            eprintln!(
                "Generated {} structs, {} enums, {} aliases from {} schemas",
                stats.structs_generated,
                stats.enums_generated,
                stats.aliases_generated,
                documents.len()
            );
            if stats.unknown_types_defaulted > 0 {
                eprintln!(
                    "Defaulted {} unknown or unresolvable types to serde_json::Value",
                    stats.unknown_types_defaulted
                );
            }
        }

        Ok(GenerationResult {
            source: source.into_bytes(),
        })
    }
}
