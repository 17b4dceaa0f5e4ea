//! Wire shapes of the WordPress REST API (`/wp-json/wp/v2`).
//!
//! Only the fields the normalizer reads are declared. Required fields fail
//! decoding when missing; optional embedded data defaults to empty.

use chrono::NaiveDateTime;
use serde::Deserialize;

#[derive(Debug, Deserialize)]
pub struct RawPost {
    pub id: u64,
    pub slug: String,
    /// Site-local publish time, sent without an offset.
    pub date: NaiveDateTime,
    pub title: Rendered,
    pub excerpt: Rendered,
    pub content: Rendered,
    /// An object of registered meta keys, or `[]` when none are registered.
    #[serde(default)]
    pub meta: Option<serde_json::Value>,
    #[serde(rename = "_embedded", default)]
    pub embedded: Option<Embedded>,
}

#[derive(Debug, Deserialize)]
pub struct Rendered {
    pub rendered: String,
}

#[derive(Debug, Default, Deserialize)]
pub struct Embedded {
    #[serde(rename = "wp:featuredmedia", default)]
    pub featured_media: Vec<RawMedia>,
    /// One list per taxonomy; categories come first.
    #[serde(rename = "wp:term", default)]
    pub terms: Vec<Vec<RawTerm>>,
    #[serde(default)]
    pub author: Vec<RawAuthor>,
}

/// Embedded media entries can be error objects when the file is private,
/// so every field is optional.
#[derive(Debug, Deserialize)]
pub struct RawMedia {
    #[serde(default)]
    pub source_url: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct RawTerm {
    #[serde(default)]
    pub name: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct RawAuthor {
    #[serde(default)]
    pub name: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct RawCategory {
    pub id: u64,
    pub name: String,
    pub slug: String,
    #[serde(default)]
    pub count: u32,
    #[serde(default)]
    pub description: String,
}

/// Body of a `WP_Error` response.
#[derive(Debug, Default, Deserialize)]
pub struct WpErrorBody {
    #[serde(default)]
    pub code: String,
    #[serde(default)]
    pub message: String,
}
