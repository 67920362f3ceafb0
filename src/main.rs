// SPDX-License-Identifier: GPL-3.0-only
// Copyright (C) 2025 Brian Hetro <whee@smaertness.net>

//! Command-line interface for ghost2jekyll.
//!
//! This binary provides the `ghost2jekyll` command for converting Ghost
//! blog exports into Jekyll posts and data files.

use ghost2jekyll::{index, parser, renderer};
use lexopt::prelude::*;
use snafu::{ensure, prelude::*};
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

struct Cli {
    input: Vec<PathBuf>,
    output: PathBuf,
    strict: bool,
    quiet: bool,
    dry_run: bool,
}

#[derive(Debug, Snafu)]
enum Error {
    #[snafu(display("failed to parse arguments: {source}"))]
    ParseArgs { source: lexopt::Error },

    #[snafu(display("at least one input file or directory is required"))]
    NoInputFiles,

    #[snafu(display("failed to create output directory: {source}"))]
    CreateOutputDir { source: std::io::Error },

    #[snafu(display("failed to read {}: {source}", path.display()))]
    ReadFile {
        path: PathBuf,
        source: std::io::Error,
    },

    #[snafu(display("failed to parse {}: {source}", path.display()))]
    ParseFile {
        path: PathBuf,
        source: parser::ParseError,
    },

    #[snafu(display("{count} data integrity warnings in {} (strict mode)", path.display()))]
    Integrity { path: PathBuf, count: usize },

    #[snafu(display("failed to convert a post in {}: {source}", path.display()))]
    TransformPost {
        path: PathBuf,
        source: renderer::RenderError,
    },

    #[snafu(display("duplicate output file {} (strict mode)", path.display()))]
    DuplicateOutput { path: PathBuf },

    #[snafu(display("failed to write {}: {source}", path.display()))]
    WriteFile {
        path: PathBuf,
        source: std::io::Error,
    },
}

fn print_help() {
    println!(
        "\
{name} {version}
Convert Ghost blog exports to Jekyll posts and data files

Usage: {name} [OPTIONS] <INPUT>...

Arguments:
  <INPUT>...  Ghost JSON export files or directories containing exports

Options:
  -o, --output <DIR>  Root directory for _posts and _data (default: .)
  -s, --strict        Treat integrity warnings and filename collisions as errors
  -q, --quiet         Suppress progress messages
  -n, --dry-run       Show what would be written without writing
  -h, --help          Print help
  -V, --version       Print version",
        name = env!("CARGO_PKG_NAME"),
        version = env!("CARGO_PKG_VERSION"),
    );
}

fn parse_args() -> Result<Cli, lexopt::Error> {
    // Show help if no arguments provided
    if std::env::args().len() == 1 {
        print_help();
        std::process::exit(0);
    }

    let mut input = Vec::new();
    let mut output = PathBuf::from(".");
    let mut strict = false;
    let mut quiet = false;
    let mut dry_run = false;

    let mut parser = lexopt::Parser::from_env();
    while let Some(arg) = parser.next()? {
        match arg {
            Short('o') | Long("output") => output = parser.value()?.parse()?,
            Short('s') | Long("strict") => strict = true,
            Short('q') | Long("quiet") => quiet = true,
            Short('n') | Long("dry-run") => dry_run = true,
            Short('h') | Long("help") => {
                print_help();
                std::process::exit(0);
            }
            Short('V') | Long("version") => {
                println!("{} {}", env!("CARGO_PKG_NAME"), env!("CARGO_PKG_VERSION"));
                std::process::exit(0);
            }
            Value(val) => input.push(val.parse()?),
            _ => return Err(arg.unexpected()),
        }
    }

    Ok(Cli {
        input,
        output,
        strict,
        quiet,
        dry_run,
    })
}

fn main() -> Result<(), Error> {
    let cli = parse_args().context(ParseArgsSnafu)?;

    ensure!(!cli.input.is_empty(), NoInputFilesSnafu);

    // Collect all input files first
    let files = collect_input_files(&cli.input);

    // Each export is processed to completion before the next; a failure
    // aborts the whole run rather than skipping ahead.
    for file in &files {
        convert_file(file, &cli)?;
    }

    Ok(())
}

/// Collects all JSON files from the given inputs (files and directories).
fn collect_input_files(inputs: &[PathBuf]) -> Vec<PathBuf> {
    let mut files = Vec::new();
    for input in inputs {
        if input.is_dir() {
            for entry in WalkDir::new(input)
                .into_iter()
                .filter_map(Result::ok)
                .filter(|e| e.path().extension().is_some_and(|ext| ext == "json"))
            {
                files.push(entry.path().to_path_buf());
            }
        } else {
            files.push(input.clone());
        }
    }
    files
}

/// Runs the full pipeline for a single export file.
fn convert_file(input: &Path, cli: &Cli) -> Result<(), Error> {
    if !cli.quiet {
        eprintln!("Converting {}", input.display());
    }

    let json = std::fs::read_to_string(input).context(ReadFileSnafu { path: input })?;
    let export = parser::parse_export(&json).context(ParseFileSnafu { path: input })?;

    let (indexes, warnings) = index::build_indexes(&export);
    for warning in &warnings {
        eprintln!("warning: {warning}");
    }
    ensure!(
        warnings.is_empty() || !cli.strict,
        IntegritySnafu {
            path: input,
            count: warnings.len()
        }
    );

    let data_dir = cli.output.join("_data");
    let posts_dir = cli.output.join("_posts");
    if !cli.dry_run {
        std::fs::create_dir_all(&data_dir).context(CreateOutputDirSnafu)?;
        std::fs::create_dir_all(&posts_dir).context(CreateOutputDirSnafu)?;
    }

    write_output(
        &data_dir.join("tags.jsonp"),
        &renderer::render_tags(&export.tags),
        cli,
    )?;
    write_output(
        &data_dir.join("authors.json"),
        &renderer::render_authors(&export.users),
        cli,
    )?;

    let mut emitted = HashSet::new();
    for post in &export.posts {
        let file = renderer::render_post(post, &indexes).context(TransformPostSnafu { path: input })?;
        let out_path = posts_dir.join(&file.file_name);

        if !emitted.insert(file.file_name.clone()) {
            ensure!(!cli.strict, DuplicateOutputSnafu { path: &out_path });
            eprintln!(
                "warning: duplicate output file {}, overwriting earlier post",
                out_path.display()
            );
        }

        write_output(&out_path, &file.content, cli)?;
    }

    Ok(())
}

/// Writes one output artifact, honoring dry-run and quiet modes.
fn write_output(path: &Path, content: &str, cli: &Cli) -> Result<(), Error> {
    if cli.dry_run {
        eprintln!("Would write {}", path.display());
        return Ok(());
    }

    std::fs::write(path, content).context(WriteFileSnafu { path })?;

    if !cli.quiet {
        eprintln!("Wrote {}", path.display());
    }
    Ok(())
}
