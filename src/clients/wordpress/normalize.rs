//! Projection of raw WordPress records onto [`Article`] and [`Category`].

use regex::Regex;
use serde_json::Value;
use std::borrow::Cow;
use std::sync::OnceLock;
use tracing::warn;

use super::raw::{RawCategory, RawPost};
use crate::config::ContentConfig;
use crate::constants::content::UNCATEGORIZED;
use crate::domain::{CategoryId, PostId};
use crate::models::{Article, Category, ReadTime};

fn tag_regex() -> &'static Regex {
    static INSTANCE: OnceLock<Regex> = OnceLock::new();
    INSTANCE.get_or_init(|| Regex::new(r"<[^>]*>").expect("Invalid regex"))
}

/// Removes every `<...>` tag, leaving text and entities untouched.
#[must_use]
pub fn strip_tags(html: &str) -> Cow<'_, str> {
    tag_regex().replace_all(html, "")
}

/// Plain text of a rendered fragment: tags removed, entities decoded, trimmed.
#[must_use]
pub fn plain_text(html: &str) -> String {
    let stripped = strip_tags(html);
    html_escape::decode_html_entities(&stripped).trim().to_string()
}

#[must_use]
pub fn word_count(html: &str) -> usize {
    strip_tags(html).split_whitespace().count()
}

/// A meta flag is set only when its raw value is exactly the string `"1"`.
fn meta_flag(meta: Option<&Value>, key: &str, slug: &str) -> bool {
    let value = match meta {
        None | Some(Value::Null) => return false,
        Some(Value::Object(map)) => match map.get(key) {
            None | Some(Value::Null) => return false,
            Some(value) => value,
        },
        Some(Value::Array(items)) if items.is_empty() => return false,
        Some(other) => {
            warn!(slug, meta = %other, "Unexpected meta shape, ignoring flags");
            return false;
        }
    };

    match value {
        Value::String(s) => s == "1",
        other => {
            warn!(slug, field = key, value = %other, "Meta flag is not a string, reading as false");
            false
        }
    }
}

/// Defaults applied while normalizing.
#[derive(Debug, Clone)]
pub struct Normalizer {
    placeholder_image: String,
    default_author: String,
    words_per_minute: u32,
}

impl Default for Normalizer {
    fn default() -> Self {
        Self::from(&ContentConfig::default())
    }
}

impl From<&ContentConfig> for Normalizer {
    fn from(config: &ContentConfig) -> Self {
        Self {
            placeholder_image: config.placeholder_image.clone(),
            default_author: config.default_author.clone(),
            words_per_minute: config.words_per_minute,
        }
    }
}

impl Normalizer {
    #[must_use]
    pub fn read_time(&self, body_html: &str) -> ReadTime {
        ReadTime::from_word_count(word_count(body_html), self.words_per_minute)
    }

    #[must_use]
    pub fn article(&self, raw: RawPost) -> Article {
        let embedded = raw.embedded.unwrap_or_default();

        let image = embedded
            .featured_media
            .first()
            .and_then(|m| m.source_url.clone())
            .filter(|url| !url.is_empty())
            .unwrap_or_else(|| self.placeholder_image.clone());

        let category = embedded
            .terms
            .first()
            .and_then(|terms| terms.first())
            .and_then(|term| term.name.as_deref())
            .map(|name| html_escape::decode_html_entities(name).into_owned())
            .unwrap_or_else(|| UNCATEGORIZED.to_string());

        let author = embedded
            .author
            .first()
            .and_then(|a| a.name.clone())
            .filter(|name| !name.is_empty())
            .unwrap_or_else(|| self.default_author.clone());

        let featured = meta_flag(raw.meta.as_ref(), "featured", &raw.slug);
        let trending = meta_flag(raw.meta.as_ref(), "trending", &raw.slug);

        Article {
            id: PostId::new(raw.id),
            read_time: self.read_time(&raw.content.rendered),
            title: html_escape::decode_html_entities(&raw.title.rendered).into_owned(),
            excerpt: plain_text(&raw.excerpt.rendered),
            body: raw.content.rendered,
            slug: raw.slug,
            category,
            published_at: raw.date,
            image,
            featured,
            trending,
            author,
        }
    }

    #[must_use]
    pub fn category(&self, raw: RawCategory) -> Category {
        let description = plain_text(&raw.description);
        Category {
            id: CategoryId::new(raw.id),
            name: html_escape::decode_html_entities(&raw.name).into_owned(),
            slug: raw.slug,
            count: raw.count,
            description: (!description.is_empty()).then_some(description),
        }
    }
}
