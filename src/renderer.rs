// SPDX-License-Identifier: GPL-3.0-only
// Copyright (C) 2025 Brian Hetro <whee@smaertness.net>

//! Output rendering for parsed Ghost exports.
//!
//! This module turns export data into the three Jekyll artifacts: the tag
//! lookup file (JSONP), the author lookup file (JSON), and one Markdown
//! file per post. Everything here is pure string building; the binary owns
//! the filesystem.
//!
//! # Output Formats
//!
//! - [`render_tags`]: a JSONP document, `callback([...])`, one record per
//!   tag in input order. The envelope is a legacy interchange format for
//!   browser script tags and is reproduced byte-for-byte.
//! - [`render_authors`]: a pretty-printed JSON array, one record per user in
//!   input order, with absent profile fields as explicit nulls.
//! - [`render_post`]: a YAML front-matter block between `---` delimiters,
//!   followed by the raw Markdown body verbatim.
//!
//! # Example
//!
//! ```
//! use ghost2jekyll::parser::Tag;
//! use ghost2jekyll::renderer::render_tags;
//!
//! let tags = vec![Tag { id: 1, slug: "news".into() }];
//! let jsonp = render_tags(&tags);
//!
//! assert!(jsonp.starts_with("callback([\n"));
//! assert!(jsonp.contains(r#"{"id":1,"name":"news","value":"news"}"#));
//! ```

use crate::index::Indexes;
use crate::parser::{Author, Post, Tag};
use serde::Serialize;
use snafu::prelude::*;

/// Error type for post transformation failures.
#[derive(Debug, Snafu)]
pub enum RenderError {
    /// The post carries neither a publication nor a creation date, so no
    /// filename or front-matter date can be derived.
    #[snafu(display("post {slug:?} has no publication or creation date"))]
    MissingDate {
        /// Slug of the offending post.
        slug: String,
    },

    /// Front-matter serialization failed.
    #[snafu(display("failed to serialize front matter for {slug:?}: {source}"))]
    FrontMatter {
        /// Slug of the offending post.
        slug: String,
        /// The underlying YAML error.
        source: serde_yaml::Error,
    },
}

/// A rendered post: the target filename and the file content.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PostFile {
    /// Filename of the form `YYYY-MM-DD-<slug>.md`, relative to `_posts/`.
    pub file_name: String,

    /// Full file content: front matter block plus raw body.
    pub content: String,
}

/// One record of the tag lookup file.
///
/// Ghost keeps no display name for tags beyond the slug, so `name` and
/// `value` both carry it.
#[derive(Serialize)]
struct TagRecord<'a> {
    id: i64,
    name: &'a str,
    value: &'a str,
}

/// One record of the author lookup file. Key names are fixed by the
/// consuming site; absent fields serialize as explicit nulls.
#[derive(Serialize)]
struct AuthorRecord<'a> {
    #[serde(rename = "author-id")]
    author_id: i64,
    #[serde(rename = "full-name")]
    full_name: &'a str,
    slug: &'a str,
    email: &'a str,
    image: Option<&'a str>,
    bio: Option<&'a str>,
    website: Option<&'a str>,
    location: Option<&'a str>,
}

impl<'a> From<&'a Author> for AuthorRecord<'a> {
    fn from(author: &'a Author) -> Self {
        Self {
            author_id: author.id,
            full_name: &author.name,
            slug: &author.slug,
            email: &author.email,
            image: non_empty(author.image.as_deref()),
            bio: non_empty(author.bio.as_deref()),
            website: non_empty(author.website.as_deref()),
            location: non_empty(author.location.as_deref()),
        }
    }
}

/// Front matter of a generated post file.
///
/// Field order here is the serialization order, keeping output byte-stable
/// across runs. Keys past `date` appear only when the source carries a
/// value; this differs deliberately from the author records, which preserve
/// absence as null.
#[derive(Serialize)]
struct FrontMatter<'a> {
    title: &'a str,
    layout: &'static str,
    slug: &'a str,
    published: bool,
    date: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    image: Option<&'a str>,
    #[serde(skip_serializing_if = "is_false")]
    featured: bool,
    #[serde(rename = "meta-title", skip_serializing_if = "Option::is_none")]
    meta_title: Option<&'a str>,
    #[serde(rename = "meta-description", skip_serializing_if = "Option::is_none")]
    meta_description: Option<&'a str>,
    #[serde(rename = "author-id", skip_serializing_if = "Option::is_none")]
    author_id: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    author: Option<Option<&'a str>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    tags: Option<&'a [Option<String>]>,
}

#[allow(clippy::trivially_copy_pass_by_ref)]
fn is_false(value: &bool) -> bool {
    !*value
}

/// Treats empty strings as absent, like the source platform's own tooling.
fn non_empty(value: Option<&str>) -> Option<&str> {
    value.filter(|s| !s.is_empty())
}

/// Renders the tag lookup file.
///
/// One record per tag, input order preserved, wrapped in the literal
/// `callback(...)` envelope. Stripping the envelope leaves a valid JSON
/// array; records are serde-encoded, so slugs with embedded quotes stay
/// parseable.
#[must_use]
pub fn render_tags(tags: &[Tag]) -> String {
    let records: Vec<String> = tags
        .iter()
        .map(|tag| {
            serde_json::to_string(&TagRecord {
                id: tag.id,
                name: &tag.slug,
                value: &tag.slug,
            })
            .unwrap()
        })
        .collect();

    format!("callback([\n{}\n])\n", records.join(",\n"))
}

/// Renders the author lookup file.
///
/// One record per user, input order preserved, pretty-printed with 2-space
/// indentation. Optional profile fields that are absent or empty in the
/// source render as explicit `null`, never as an omitted key.
#[must_use]
pub fn render_authors(authors: &[Author]) -> String {
    let records: Vec<AuthorRecord> = authors.iter().map(AuthorRecord::from).collect();
    let mut out = serde_json::to_string_pretty(&records).unwrap();
    out.push('\n');
    out
}

/// Transforms one post into its output file.
///
/// The publish date is `published_at` when set, else `created_at`; the
/// filename date and the front-matter `date` derive from that same instant.
/// The raw Markdown body is appended verbatim after the closing front-matter
/// delimiter. The pre-rendered `html` never appears anywhere.
///
/// # Errors
///
/// Returns [`RenderError::MissingDate`] when the post has neither date, and
/// [`RenderError::FrontMatter`] if YAML serialization fails.
pub fn render_post(post: &Post, indexes: &Indexes) -> Result<PostFile, RenderError> {
    let date = post
        .published_at
        .or(post.created_at)
        .context(MissingDateSnafu {
            slug: post.slug.as_str(),
        })?;

    let file_name = format!("{}-{}.md", date.date_only(), post.slug);

    let front_matter = FrontMatter {
        title: &post.title,
        layout: "post",
        slug: &post.slug,
        published: post.status == "published",
        date: date.date_time(),
        image: non_empty(post.image.as_deref()),
        featured: post.featured,
        meta_title: non_empty(post.meta_title.as_deref()),
        meta_description: non_empty(post.meta_description.as_deref()),
        author_id: post.author_id,
        // A set author id always yields the key; a failed lookup renders
        // as null rather than aborting the conversion.
        author: post.author_id.map(|id| indexes.author_name(id)),
        tags: indexes.post_tags(post.id),
    };

    let yaml = serde_yaml::to_string(&front_matter).context(FrontMatterSnafu {
        slug: post.slug.as_str(),
    })?;

    Ok(PostFile {
        file_name,
        content: format!("---\n{yaml}---\n{}", post.markdown),
    })
}
