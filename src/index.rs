// SPDX-License-Identifier: GPL-3.0-only
// Copyright (C) 2025 Brian Hetro <whee@smaertness.net>

//! Derived lookup tables over a parsed export.
//!
//! Rendering needs three mappings that the export only stores relationally:
//! tag id to slug, post id to the ordered list of its tag slugs, and author
//! id to display name. [`build_indexes`] derives all three in one pass and
//! reports dangling references as [`IntegrityWarning`]s instead of failing,
//! leaving the policy (warn, null-fill, or abort) to the caller.

use crate::parser::ExportDocument;
use std::collections::HashMap;
use std::fmt;

/// Read-only lookup tables derived from an [`ExportDocument`].
///
/// All lookups return `Option`: `Some` for a resolved reference, `None` for
/// a dangling one.
#[derive(Debug, Clone, Default)]
pub struct Indexes {
    tag_slugs: HashMap<i64, String>,
    post_tags: HashMap<i64, Vec<Option<String>>>,
    author_names: HashMap<i64, String>,
}

impl Indexes {
    /// Looks up the slug for a tag id.
    #[must_use]
    pub fn tag_slug(&self, tag_id: i64) -> Option<&str> {
        self.tag_slugs.get(&tag_id).map(String::as_str)
    }

    /// Looks up the tag slugs applied to a post, in association order.
    ///
    /// Returns `None` for posts with no associations at all; a `None` slot
    /// inside the list marks an association whose tag id did not resolve.
    #[must_use]
    pub fn post_tags(&self, post_id: i64) -> Option<&[Option<String>]> {
        self.post_tags.get(&post_id).map(Vec::as_slice)
    }

    /// Looks up the display name for an author id.
    #[must_use]
    pub fn author_name(&self, author_id: i64) -> Option<&str> {
        self.author_names.get(&author_id).map(String::as_str)
    }
}

/// A dangling reference found while building the indexes.
///
/// These are data-quality problems, not errors: the export is still usable,
/// with the unresolved value rendered as null.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IntegrityWarning {
    /// A `posts_tags` row references a tag id absent from the tag collection.
    UnknownTag {
        /// Id of the post carrying the association.
        post_id: i64,
        /// The unresolvable tag id.
        tag_id: i64,
    },

    /// A post references an author id absent from the user collection.
    UnknownAuthor {
        /// Id of the referencing post.
        post_id: i64,
        /// The unresolvable author id.
        author_id: i64,
    },
}

impl fmt::Display for IntegrityWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnknownTag { post_id, tag_id } => {
                write!(f, "post {post_id} references unknown tag {tag_id}")
            }
            Self::UnknownAuthor { post_id, author_id } => {
                write!(f, "post {post_id} references unknown author {author_id}")
            }
        }
    }
}

/// Builds the three lookup tables from a parsed export.
///
/// Total over any well-formed document: empty collections yield empty maps
/// and no warnings. Duplicate tag or author ids follow a last-write-wins
/// rule, matching the export's own iteration order; the later row silently
/// replaces the earlier one.
///
/// # Example
///
/// ```
/// use ghost2jekyll::index::build_indexes;
/// use ghost2jekyll::parser::parse_export;
///
/// let json = r#"{ "db": [{ "data": {
///     "tags": [{ "id": 1, "slug": "news" }],
///     "posts_tags": [{ "post_id": 10, "tag_id": 1 }]
/// } }] }"#;
///
/// let export = parse_export(json).unwrap();
/// let (indexes, warnings) = build_indexes(&export);
///
/// assert_eq!(indexes.tag_slug(1), Some("news"));
/// assert!(warnings.is_empty());
/// ```
#[must_use]
pub fn build_indexes(export: &ExportDocument) -> (Indexes, Vec<IntegrityWarning>) {
    let mut warnings = Vec::new();

    let mut tag_slugs = HashMap::new();
    for tag in &export.tags {
        tag_slugs.insert(tag.id, tag.slug.clone());
    }

    let mut author_names = HashMap::new();
    for user in &export.users {
        author_names.insert(user.id, user.name.clone());
    }

    let mut post_tags: HashMap<i64, Vec<Option<String>>> = HashMap::new();
    for assoc in &export.posts_tags {
        let slug = tag_slugs.get(&assoc.tag_id).cloned();
        if slug.is_none() {
            warnings.push(IntegrityWarning::UnknownTag {
                post_id: assoc.post_id,
                tag_id: assoc.tag_id,
            });
        }
        // Unresolved slots are kept so the list still mirrors the
        // association rows one-to-one.
        post_tags.entry(assoc.post_id).or_default().push(slug);
    }

    for post in &export.posts {
        if let Some(author_id) = post.author_id
            && !author_names.contains_key(&author_id)
        {
            warnings.push(IntegrityWarning::UnknownAuthor {
                post_id: post.id,
                author_id,
            });
        }
    }

    (
        Indexes {
            tag_slugs,
            post_tags,
            author_names,
        },
        warnings,
    )
}
