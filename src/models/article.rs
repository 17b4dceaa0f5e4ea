use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::constants::limits::DEFAULT_PAGE_SIZE;
use crate::domain::PostId;

/// A normalized blog article, whichever source answered.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Article {
    pub id: PostId,
    pub slug: String,
    pub title: String,
    pub excerpt: String,
    /// Rendered HTML. Bundled fallback articles may leave this empty.
    #[serde(default)]
    pub body: String,
    pub category: String,
    #[serde(rename = "date")]
    pub published_at: NaiveDateTime,
    pub image: String,
    pub read_time: ReadTime,
    #[serde(default)]
    pub featured: bool,
    #[serde(default)]
    pub trending: bool,
    pub author: String,
}

/// Estimated reading time in whole minutes, shown as `"N min read"`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct ReadTime(u32);

impl ReadTime {
    #[must_use]
    pub const fn from_minutes(minutes: u32) -> Self {
        Self(minutes)
    }

    /// `ceil(words / words_per_minute)`; zero words read in zero minutes.
    #[must_use]
    pub fn from_word_count(words: usize, words_per_minute: u32) -> Self {
        let wpm = words_per_minute.max(1) as usize;
        let minutes = words.div_ceil(wpm);
        Self(u32::try_from(minutes).unwrap_or(u32::MAX))
    }

    #[must_use]
    pub const fn minutes(&self) -> u32 {
        self.0
    }
}

impl fmt::Display for ReadTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} min read", self.0)
    }
}

impl FromStr for ReadTime {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let digits = s
            .trim()
            .strip_suffix("min read")
            .unwrap_or(s)
            .trim();
        digits
            .parse()
            .map(Self)
            .map_err(|_| format!("invalid read time: {s:?}"))
    }
}

impl Serialize for ReadTime {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for ReadTime {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(serde::de::Error::custom)
    }
}

/// Parameters of an article list request.
///
/// `category` is a category slug. Absent filters are left out of the request
/// entirely.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ArticleFilter {
    pub page: u32,
    pub per_page: u32,
    pub category: Option<String>,
    pub search: Option<String>,
    pub featured: Option<bool>,
}

impl Default for ArticleFilter {
    fn default() -> Self {
        Self {
            page: 1,
            per_page: DEFAULT_PAGE_SIZE,
            category: None,
            search: None,
            featured: None,
        }
    }
}

impl ArticleFilter {
    #[must_use]
    pub const fn with_page(mut self, page: u32) -> Self {
        self.page = page;
        self
    }

    #[must_use]
    pub const fn with_per_page(mut self, per_page: u32) -> Self {
        self.per_page = per_page;
        self
    }

    #[must_use]
    pub fn with_category(mut self, slug: &str) -> Self {
        self.category = Some(slug.to_string());
        self
    }

    #[must_use]
    pub fn with_search(mut self, query: &str) -> Self {
        self.search = Some(query.to_string());
        self
    }

    #[must_use]
    pub const fn with_featured(mut self, featured: bool) -> Self {
        self.featured = Some(featured);
        self
    }

    /// Clamps page and page size to at least 1 and drops blank text filters.
    #[must_use]
    pub fn normalized(&self) -> Self {
        let non_blank = |value: &Option<String>| {
            value
                .as_deref()
                .map(str::trim)
                .filter(|v| !v.is_empty())
                .map(str::to_string)
        };

        Self {
            page: self.page.max(1),
            per_page: self.per_page.max(1),
            category: non_blank(&self.category),
            search: non_blank(&self.search),
            featured: self.featured,
        }
    }

    /// Number of items that precede this page.
    #[must_use]
    pub fn offset(&self) -> usize {
        (self.page.max(1) as usize - 1) * self.per_page as usize
    }
}

/// One page of articles plus the pagination totals that came with it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ArticlePage {
    pub items: Vec<Article>,
    pub page: u32,
    pub per_page: u32,
    pub total: Option<u64>,
    pub total_pages: Option<u32>,
}

impl ArticlePage {
    /// Whether a page after this one exists.
    ///
    /// Without server totals a full page is taken to mean more may follow.
    #[must_use]
    pub fn has_more(&self) -> bool {
        match self.total_pages {
            Some(total_pages) => self.page < total_pages,
            None => !self.items.is_empty() && self.items.len() >= self.per_page as usize,
        }
    }
}
