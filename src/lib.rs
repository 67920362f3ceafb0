// SPDX-License-Identifier: GPL-3.0-only
// Copyright (C) 2025 Brian Hetro <whee@smaertness.net>

//! Convert Ghost blog exports to Jekyll posts and data files.
//!
//! This crate transforms the JSON dump produced by Ghost's export feature
//! into a content tree for a Jekyll-style static site: one Markdown file
//! with YAML front matter per post, plus lookup files for tags and authors.
//!
//! # Overview
//!
//! A conversion runs in three phases:
//!
//! 1. Parse the export's database snapshot into typed Rust representations
//! 2. Build lookup tables (tag slugs, per-post tag lists, author names)
//! 3. Render the tag file, the author file, and each post file
//!
//! The library is pure: it parses strings and returns strings. The `ghost2jekyll`
//! binary layers file discovery, directory creation, and writing on top.
//!
//! # Example
//!
//! ```no_run
//! use ghost2jekyll::{index, parser, renderer};
//!
//! let json = std::fs::read_to_string("ghost-export.json").unwrap();
//! let export = parser::parse_export(&json).unwrap();
//! let (indexes, warnings) = index::build_indexes(&export);
//!
//! for warning in &warnings {
//!     eprintln!("warning: {warning}");
//! }
//!
//! let tags_jsonp = renderer::render_tags(&export.tags);
//! let authors_json = renderer::render_authors(&export.users);
//! for post in &export.posts {
//!     let file = renderer::render_post(post, &indexes).unwrap();
//!     println!("{}", file.file_name);
//! }
//! ```
//!
//! # Modules
//!
//! - [`parser`]: JSON parsing and type definitions for Ghost exports
//! - [`index`]: derived lookup tables and data-integrity warnings
//! - [`renderer`]: output generation for posts and lookup files

#![deny(missing_docs)]

pub mod index;
pub mod parser;
pub mod renderer;
