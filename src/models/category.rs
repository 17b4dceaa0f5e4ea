use serde::{Deserialize, Serialize};

use crate::domain::CategoryId;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Category {
    pub id: CategoryId,
    pub name: String,
    pub slug: String,
    #[serde(default)]
    pub count: u32,
    #[serde(default)]
    pub description: Option<String>,
}

impl Category {
    /// Case-insensitive match against either the slug or the display name.
    #[must_use]
    pub fn matches(&self, slug_or_name: &str) -> bool {
        eq_ignore_case(&self.slug, slug_or_name) || eq_ignore_case(&self.name, slug_or_name)
    }
}

/// Unicode-aware case-insensitive equality, so "Análisis" matches "ANÁLISIS".
#[must_use]
pub fn eq_ignore_case(a: &str, b: &str) -> bool {
    a == b || a.to_lowercase() == b.to_lowercase()
}
