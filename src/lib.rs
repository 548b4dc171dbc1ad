//! Generate Rust type definitions from JSON Schema documents.
//!
//! `jsonschema2rs` turns a list of schema locations (local paths, `file://`
//! URLs, or `http(s)://` URLs with the `fetch` feature) into a single block
//! of serde-derived Rust source: one `pub mod` containing a struct or enum
//! for every object and string-enum schema found in the documents.
//!
//! # Features
//!
//! - Reads locations from an inline argument or newline-delimited stdin
//! - Accepts JSON and YAML schema documents
//! - Deterministic output: identical input always produces identical source
//! - Optional build-directive comment injected as the first output line
//! - File output is normalized best-effort (unused imports pruned, then
//!   canonically formatted); on failure the raw source is still written so
//!   it can be inspected
//!
//! # Usage
//!
//! ```no_run
//! use jsonschema2rs::engine::SchemaEngine;
//! use jsonschema2rs::pipeline::{self, Config, OutputTarget};
//!
//! let config = Config {
//!     inline_locations: Some("file:///schemas/task.json".to_string()),
//!     output: OutputTarget::Stream,
//!     build_directive: None,
//!     module: "models".to_string(),
//! };
//! let engine = SchemaEngine::new(false);
//! pipeline::run(&config, &engine, std::io::empty(), std::io::stdout())?;
//! # Ok::<(), jsonschema2rs::error::Error>(())
//! ```

pub mod codegen;
pub mod engine;
pub mod error;
pub mod input;
pub mod normalize;
pub mod pipeline;
pub mod schema;
pub mod type_map;
