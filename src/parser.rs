// SPDX-License-Identifier: GPL-3.0-only
// Copyright (C) 2025 Brian Hetro <whee@smaertness.net>

//! JSON parsing for Ghost blog exports.
//!
//! This module handles deserialization of the JSON dump produced by Ghost's
//! export feature. The dump wraps a single database snapshot containing the
//! entity collections this tool cares about: tags, users, posts, and the
//! post/tag association rows.
//!
//! # Format Overview
//!
//! A Ghost export looks like:
//!
//! ```text
//! { "db": [ { "data": {
//!     "tags":       [ { "id": 1, "slug": "news", ... }, ... ],
//!     "users":      [ { "id": 5, "name": "Jane", ... }, ... ],
//!     "posts":      [ { "id": 10, "title": "Hello", ... }, ... ],
//!     "posts_tags": [ { "post_id": 10, "tag_id": 1 }, ... ]
//! } } ] }
//! ```
//!
//! Fields not listed in the types below are ignored, including each post's
//! pre-rendered `html`. Date fields vary across Ghost versions between epoch
//! milliseconds and ISO-8601 strings; [`ExportDate`] accepts both.
//!
//! # Example
//!
//! ```
//! use ghost2jekyll::parser::parse_export;
//!
//! let json = r#"{
//!     "db": [{ "data": {
//!         "tags": [{ "id": 1, "slug": "news" }],
//!         "users": [],
//!         "posts": [],
//!         "posts_tags": []
//!     } }]
//! }"#;
//!
//! let export = parse_export(json).unwrap();
//! assert_eq!(export.tags[0].slug, "news");
//! ```

use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime};
use serde::Deserialize;
use snafu::prelude::*;

/// Error type for export parsing failures.
#[derive(Debug, Snafu)]
pub enum ParseError {
    /// Failed to parse JSON content.
    #[snafu(display("failed to parse JSON: {source}"))]
    Json {
        /// The underlying JSON parsing error.
        source: serde_json::Error,
    },

    /// The export's `db` array was missing or empty.
    #[snafu(display("export contains no database snapshot"))]
    MissingSnapshot,
}

/// The database snapshot inside a Ghost export.
///
/// This is the `db[0].data` object of the export envelope; the envelope
/// itself is stripped by [`parse_export`]. All collections default to empty
/// when absent, so a sparse export still parses.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ExportDocument {
    /// All tags defined on the blog.
    #[serde(default)]
    pub tags: Vec<Tag>,

    /// All user accounts; Ghost calls post authors "users".
    #[serde(default)]
    pub users: Vec<Author>,

    /// All posts, drafts included.
    #[serde(default)]
    pub posts: Vec<Post>,

    /// The many-to-many rows linking posts to tags.
    #[serde(default)]
    pub posts_tags: Vec<PostTagAssociation>,
}

/// A tag definition.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Tag {
    /// Database id; identity within the export.
    pub id: i64,

    /// URL-safe name, the only human-visible label Ghost keeps for a tag.
    pub slug: String,
}

/// A user account (post author).
///
/// The profile fields are optional in Ghost; their absence is preserved as
/// `None` so the author lookup file can emit explicit nulls.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Author {
    /// Database id.
    pub id: i64,

    /// Display name.
    pub name: String,

    /// URL-safe identifier.
    pub slug: String,

    /// Account email address.
    pub email: String,

    /// Profile image URL, if set.
    #[serde(default)]
    pub image: Option<String>,

    /// Profile biography, if set.
    #[serde(default)]
    pub bio: Option<String>,

    /// Personal website URL, if set.
    #[serde(default)]
    pub website: Option<String>,

    /// Free-form location, if set.
    #[serde(default)]
    pub location: Option<String>,
}

/// A blog post.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Post {
    /// Database id.
    pub id: i64,

    /// Post title.
    pub title: String,

    /// URL-safe identifier, used in the output filename.
    pub slug: String,

    /// Raw Markdown body. Ghost stores `null` for empty posts; that becomes
    /// an empty string here.
    #[serde(default, deserialize_with = "de_nullable_string")]
    pub markdown: String,

    /// Publication status, e.g. `"published"` or `"draft"`.
    pub status: String,

    /// When the post went live. Absent, `null`, or `""` for drafts.
    #[serde(default, deserialize_with = "de_opt_date")]
    pub published_at: Option<ExportDate>,

    /// When the post was first saved.
    #[serde(default, deserialize_with = "de_opt_date")]
    pub created_at: Option<ExportDate>,

    /// Cover image URL, if set.
    #[serde(default)]
    pub image: Option<String>,

    /// Whether the post is featured. Ghost dumps this as `0`/`1`.
    #[serde(default, deserialize_with = "de_flag")]
    pub featured: bool,

    /// SEO title override, if set.
    #[serde(default)]
    pub meta_title: Option<String>,

    /// SEO description override, if set.
    #[serde(default)]
    pub meta_description: Option<String>,

    /// Id of the authoring user, if recorded.
    #[serde(default)]
    pub author_id: Option<i64>,
}

/// A post/tag association row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub struct PostTagAssociation {
    /// Id of the tagged post.
    pub post_id: i64,

    /// Id of the applied tag.
    pub tag_id: i64,
}

/// A date scalar from a Ghost export, held as a naive UTC instant.
///
/// Ghost exports carry dates as epoch milliseconds in older dumps and as
/// ISO-8601 (or SQL-style `YYYY-MM-DD HH:MM:SS`) strings in newer ones.
/// Either form deserializes into this type; formatting always happens in
/// UTC so the same export produces the same bytes on every machine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct ExportDate(
    /// The underlying naive UTC instant.
    pub NaiveDateTime,
);

impl ExportDate {
    /// Formats the date as `YYYY-MM-DD`, the output filename form.
    #[must_use]
    pub fn date_only(&self) -> String {
        self.0.format("%Y-%m-%d").to_string()
    }

    /// Formats the date as `YYYY-MM-DD HH:MM:SS`, the front-matter form.
    ///
    /// Derived from the same instant as [`date_only`](Self::date_only), so
    /// the two can never disagree on the calendar date.
    #[must_use]
    pub fn date_time(&self) -> String {
        self.0.format("%Y-%m-%d %H:%M:%S").to_string()
    }
}

impl<'de> Deserialize<'de> for ExportDate {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let value = serde_json::Value::deserialize(deserializer)?;
        match &value {
            serde_json::Value::Number(n) => n
                .as_i64()
                .and_then(DateTime::from_timestamp_millis)
                .map(|dt| Self(dt.naive_utc()))
                .ok_or_else(|| serde::de::Error::custom(format!("timestamp out of range: {n}"))),
            serde_json::Value::String(s) => parse_date_value(s)
                .map(Self)
                .ok_or_else(|| serde::de::Error::custom(format!("unrecognized date value: {s:?}"))),
            other => Err(serde::de::Error::custom(format!(
                "expected date string or timestamp, got {other}"
            ))),
        }
    }
}

/// Parses the date string shapes seen across Ghost export versions.
fn parse_date_value(s: &str) -> Option<NaiveDateTime> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.naive_utc());
    }
    for fmt in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"] {
        if let Ok(dt) = NaiveDateTime::parse_from_str(s, fmt) {
            return Some(dt);
        }
    }
    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .ok()
        .map(|d| d.and_time(NaiveTime::MIN))
}

/// Deserializes an optional date field.
///
/// `null` and the empty string both count as "not set" (drafts carry
/// `published_at: null` or `""` depending on the Ghost version). Anything
/// else must parse as a date or the whole document is rejected.
fn de_opt_date<'de, D>(deserializer: D) -> Result<Option<ExportDate>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let value = serde_json::Value::deserialize(deserializer)?;
    match value {
        serde_json::Value::Null => Ok(None),
        serde_json::Value::String(ref s) if s.is_empty() => Ok(None),
        other => ExportDate::deserialize(other)
            .map(Some)
            .map_err(serde::de::Error::custom),
    }
}

/// Deserializes a boolean flag that Ghost may dump as a number.
fn de_flag<'de, D>(deserializer: D) -> Result<bool, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let value = serde_json::Value::deserialize(deserializer)?;
    match value {
        serde_json::Value::Null => Ok(false),
        serde_json::Value::Bool(b) => Ok(b),
        serde_json::Value::Number(n) => Ok(n.as_f64().is_some_and(|v| v != 0.0)),
        other => Err(serde::de::Error::custom(format!(
            "expected boolean flag, got {other}"
        ))),
    }
}

/// Deserializes a string field that may be `null`.
fn de_nullable_string<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: serde::Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}

/// The export envelope around the database snapshot.
#[derive(Deserialize)]
struct RawExport {
    #[serde(default)]
    db: Vec<RawSnapshot>,
}

#[derive(Deserialize)]
struct RawSnapshot {
    data: ExportDocument,
}

/// Parses a JSON string into an [`ExportDocument`].
///
/// This is the main entry point for loading Ghost exports. The export
/// envelope is stripped and the first database snapshot returned; exports
/// only ever contain one.
///
/// # Arguments
///
/// * `json_str` - The raw JSON content of a Ghost export file
///
/// # Errors
///
/// Returns an error if the JSON is malformed, doesn't match the expected
/// export schema, or contains no database snapshot.
///
/// # Example
///
/// ```
/// use ghost2jekyll::parser::parse_export;
///
/// let json = r#"{ "db": [{ "data": {} }] }"#;
///
/// let export = parse_export(json).unwrap();
/// assert!(export.posts.is_empty());
/// ```
pub fn parse_export(json_str: &str) -> Result<ExportDocument, ParseError> {
    let raw: RawExport = serde_json::from_str(json_str).context(JsonSnafu)?;
    let snapshot = raw.db.into_iter().next().context(MissingSnapshotSnafu)?;
    Ok(snapshot.data)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn export_json(data: &str) -> String {
        format!(r#"{{ "db": [ {{ "data": {{ {data} }} }} ] }}"#)
    }

    fn post_json(fields: &str) -> String {
        export_json(&format!(
            r#""posts": [{{
                "id": 10,
                "title": "Hello",
                "slug": "hello",
                "markdown": "Body text",
                "status": "published",
                "created_at": "2019-12-01T08:30:00Z"{fields}
            }}]"#
        ))
    }

    fn single_post(json: &str) -> Post {
        let export = parse_export(json).unwrap();
        export.posts.into_iter().next().unwrap()
    }

    #[test]
    fn parses_minimal_export() {
        let json = export_json(
            r#"
            "tags": [{ "id": 1, "slug": "news" }],
            "users": [{ "id": 5, "name": "Jane", "slug": "jane", "email": "j@x.com" }],
            "posts": [],
            "posts_tags": [{ "post_id": 10, "tag_id": 1 }]
            "#,
        );
        let export = parse_export(&json).unwrap();

        assert_eq!(export.tags.len(), 1);
        assert_eq!(export.tags[0].slug, "news");
        assert_eq!(export.users[0].name, "Jane");
        assert_eq!(export.posts_tags[0].tag_id, 1);
    }

    #[test]
    fn missing_collections_default_to_empty() {
        let export = parse_export(&export_json("")).unwrap();

        assert!(export.tags.is_empty());
        assert!(export.users.is_empty());
        assert!(export.posts.is_empty());
        assert!(export.posts_tags.is_empty());
    }

    #[test]
    fn errors_on_empty_db_array() {
        let result = parse_export(r#"{ "db": [] }"#);
        assert!(matches!(result, Err(ParseError::MissingSnapshot)));
    }

    #[test]
    fn errors_on_missing_db_array() {
        let result = parse_export("{}");
        assert!(matches!(result, Err(ParseError::MissingSnapshot)));
    }

    #[test]
    fn errors_on_invalid_json() {
        let result = parse_export("not valid json");
        assert!(matches!(result, Err(ParseError::Json { .. })));
    }

    #[test]
    fn author_optional_fields_absent_parse_as_none() {
        let json = export_json(
            r#""users": [{ "id": 5, "name": "Jane", "slug": "jane", "email": "j@x.com" }]"#,
        );
        let export = parse_export(&json).unwrap();
        let author = &export.users[0];

        assert!(author.image.is_none());
        assert!(author.bio.is_none());
        assert!(author.website.is_none());
        assert!(author.location.is_none());
    }

    #[test]
    fn author_null_fields_parse_as_none() {
        let json = export_json(
            r#""users": [{
                "id": 5, "name": "Jane", "slug": "jane", "email": "j@x.com",
                "image": null, "bio": "Hi", "website": null, "location": null
            }]"#,
        );
        let export = parse_export(&json).unwrap();
        let author = &export.users[0];

        assert!(author.image.is_none());
        assert_eq!(author.bio.as_deref(), Some("Hi"));
    }

    #[test]
    fn parses_rfc3339_date() {
        let post = single_post(&post_json(r#", "published_at": "2020-01-02T00:00:00.000Z""#));

        let date = post.published_at.unwrap();
        assert_eq!(date.date_only(), "2020-01-02");
        assert_eq!(date.date_time(), "2020-01-02 00:00:00");
    }

    #[test]
    fn parses_epoch_millis_date() {
        // 2020-01-02T00:00:00Z
        let post = single_post(&post_json(r#", "published_at": 1577923200000"#));

        assert_eq!(post.published_at.unwrap().date_only(), "2020-01-02");
    }

    #[test]
    fn parses_sql_style_date() {
        let post = single_post(&post_json(r#", "published_at": "2020-01-02 15:04:05""#));

        assert_eq!(
            post.published_at.unwrap().date_time(),
            "2020-01-02 15:04:05"
        );
    }

    #[test]
    fn parses_date_only_string_as_midnight() {
        let post = single_post(&post_json(r#", "published_at": "2020-01-02""#));

        assert_eq!(
            post.published_at.unwrap().date_time(),
            "2020-01-02 00:00:00"
        );
    }

    #[test]
    fn empty_published_at_is_absent() {
        let post = single_post(&post_json(r#", "published_at": """#));
        assert!(post.published_at.is_none());
    }

    #[test]
    fn null_published_at_is_absent() {
        let post = single_post(&post_json(r#", "published_at": null"#));
        assert!(post.published_at.is_none());
    }

    #[test]
    fn missing_published_at_is_absent() {
        let post = single_post(&post_json(""));
        assert!(post.published_at.is_none());
        assert!(post.created_at.is_some());
    }

    #[test]
    fn invalid_date_is_a_parse_error() {
        let result = parse_export(&post_json(r#", "published_at": "next tuesday""#));
        assert!(matches!(result, Err(ParseError::Json { .. })));
    }

    #[test]
    fn featured_accepts_integers() {
        let featured = single_post(&post_json(r#", "featured": 1"#));
        let plain = single_post(&post_json(r#", "featured": 0"#));

        assert!(featured.featured);
        assert!(!plain.featured);
    }

    #[test]
    fn featured_accepts_booleans_and_null() {
        let featured = single_post(&post_json(r#", "featured": true"#));
        let plain = single_post(&post_json(r#", "featured": null"#));

        assert!(featured.featured);
        assert!(!plain.featured);
    }

    #[test]
    fn featured_defaults_to_false() {
        let post = single_post(&post_json(""));
        assert!(!post.featured);
    }

    #[test]
    fn null_markdown_becomes_empty_body() {
        let json = export_json(
            r#""posts": [{
                "id": 10, "title": "Hello", "slug": "hello",
                "markdown": null, "status": "draft",
                "created_at": "2019-12-01T08:30:00Z"
            }]"#,
        );
        let export = parse_export(&json).unwrap();

        assert_eq!(export.posts[0].markdown, "");
    }

    #[test]
    fn ignores_html_and_unknown_fields() {
        let post = single_post(&post_json(
            r#", "html": "<p>Body text</p>", "language": "en_US", "uuid": "abc""#,
        ));

        assert_eq!(post.markdown, "Body text");
    }

    #[test]
    fn parses_author_id() {
        let post = single_post(&post_json(r#", "author_id": 5"#));
        assert_eq!(post.author_id, Some(5));
    }
}
