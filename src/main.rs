use std::io;
use std::path::PathBuf;
use std::process;

use clap::Parser;
use clap::builder::NonEmptyStringValueParser;

use jsonschema2rs::engine::SchemaEngine;
use jsonschema2rs::pipeline::{self, Config, OutputTarget};

/// Generate Rust type definitions from JSON Schema documents.
///
/// Loads every schema location, generates serde-derived types for the
/// objects found in the documents, and writes a single module of source
/// code to a file or to standard output.
#[derive(Parser)]
#[command(name = "jsonschema2rs", version, about)]
struct Cli {
    /// Space-separated list of schema locations (paths, file:// or http(s)://
    /// URLs). If not provided, locations are read from standard input, one
    /// per line.
    #[arg(long = "in", value_name = "LOCATIONS")]
    locations: Option<String>,

    /// File to write the generated code to. The file is overwritten if it
    /// already exists, or created if needed. If not specified, generated
    /// code is written to standard output.
    #[arg(long = "out", value_name = "FILE")]
    out: Option<PathBuf>,

    /// If build directives are specified, the generated code begins with
    /// the line '// +build <DIRECTIVES>'.
    #[arg(long = "build", value_name = "DIRECTIVES")]
    build: Option<String>,

    /// Suppress generation statistics on stderr.
    #[arg(long, short)]
    quiet: bool,

    /// Name of the Rust module to wrap the generated types in.
    #[arg(value_name = "MODULE-NAME", value_parser = NonEmptyStringValueParser::new())]
    module: String,
}

fn main() {
    let cli = Cli::parse();

    if let Err(e) = run(cli) {
        eprintln!("error: {e}");

        // Print cause chain.
        let mut source = std::error::Error::source(&e);
        while let Some(cause) = source {
            eprintln!("  caused by: {cause}");
            source = std::error::Error::source(cause);
        }

        process::exit(1);
    }
}

fn run(cli: Cli) -> jsonschema2rs::error::Result<()> {
    let config = Config {
        inline_locations: cli.locations,
        output: match cli.out {
            Some(path) => OutputTarget::File(path),
            None => OutputTarget::Stream,
        },
        build_directive: cli.build,
        module: cli.module,
    };
    let engine = SchemaEngine::new(cli.quiet);

    pipeline::run(&config, &engine, io::stdin().lock(), io::stdout().lock())
}
