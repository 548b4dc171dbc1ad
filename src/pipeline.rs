//! The generation pipeline: collect locations, run the engine, inject the
//! build directive, and deliver the result to a file or a stream.
//!
//! The whole pipeline is synchronous and single-owner: the generated buffer
//! moves stage to stage, and each stage either fully replaces it or leaves it
//! untouched. Normalization only happens for file targets — streamed output
//! is always the engine's bytes verbatim (plus a trailing newline), so a
//! result that fails to format can still be piped somewhere for inspection.

use std::io::{BufRead, Write};
use std::path::PathBuf;

use crate::engine::{Engine, GenerationRequest};
use crate::error::{Error, Result};
use crate::input;
use crate::normalize;

/// Fixed prefix of the injected build-directive comment line.
pub const BUILD_DIRECTIVE_PREFIX: &str = "// +build ";

/// Where the generated source goes.
#[derive(Debug, Clone)]
pub enum OutputTarget {
    /// Write to the output stream, unformatted.
    Stream,

    /// Write to a file (created or truncated), normalized best-effort.
    File(PathBuf),
}

/// One invocation's worth of configuration, built once at startup and
/// threaded through the pipeline. Never read from globals.
#[derive(Debug)]
pub struct Config {
    /// Space-separated locations from `--in`; when `None`, locations are
    /// read from the input stream.
    pub inline_locations: Option<String>,

    /// Output target selected by presence of `--out`.
    pub output: OutputTarget,

    /// Optional build directive injected as the first line of output.
    pub build_directive: Option<String>,

    /// Module name for the generated types.
    pub module: String,
}

/// Prepend `// +build <directive>\n` to the source, verbatim.
pub fn inject_build_directive(source: &[u8], directive: &str) -> Vec<u8> {
    let line = format!("{BUILD_DIRECTIVE_PREFIX}{directive}\n");
    let mut out = Vec::with_capacity(line.len() + source.len());
    out.extend_from_slice(line.as_bytes());
    out.extend_from_slice(source);
    out
}

/// Run the full pipeline for one invocation.
///
/// `reader` supplies newline-delimited locations when `--in` was not given;
/// `writer` receives the generated source when the target is the stream.
/// Both are parameters rather than `std::io` handles so tests can drive the
/// pipeline directly.
pub fn run<R: BufRead, W: Write>(
    config: &Config,
    engine: &dyn Engine,
    reader: R,
    mut writer: W,
) -> Result<()> {
    let locations = match &config.inline_locations {
        Some(inline) => input::split_inline(inline),
        None => input::read_locations(reader)?,
    };

    let request = GenerationRequest {
        locations,
        module: config.module.clone(),
        export_types: true,
    };
    let mut result = engine.execute(&request)?;

    if let Some(directive) = &config.build_directive {
        result.source = inject_build_directive(&result.source, directive);
    }

    match &config.output {
        OutputTarget::File(path) => normalize::format_source_and_save(path, &result.source),
        OutputTarget::Stream => {
            writer.write_all(&result.source).map_err(Error::Stdout)?;
            writer.write_all(b"\n").map_err(Error::Stdout)?;
            Ok(())
        }
    }
}
