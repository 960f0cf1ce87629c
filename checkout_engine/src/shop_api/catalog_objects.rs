use std::fmt::Display;

use serde::{Deserialize, Serialize};

/// Filters for the storefront product listing. Archived products are excluded unless explicitly requested.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductQueryFilter {
    pub category_id: Option<String>,
    pub is_featured: Option<bool>,
    #[serde(default)]
    pub include_archived: bool,
}

impl ProductQueryFilter {
    pub fn with_category_id<S: Into<String>>(mut self, category_id: S) -> Self {
        self.category_id = Some(category_id.into());
        self
    }

    pub fn featured_only(mut self) -> Self {
        self.is_featured = Some(true);
        self
    }

    pub fn including_archived(mut self) -> Self {
        self.include_archived = true;
        self
    }
}

impl Display for ProductQueryFilter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if let Some(category_id) = &self.category_id {
            write!(f, "category: {category_id}. ")?;
        }
        if let Some(featured) = self.is_featured {
            write!(f, "featured: {featured}. ")?;
        }
        write!(f, "archived: {}", if self.include_archived { "included" } else { "excluded" })
    }
}
