use anyhow::{bail, Result};
use chrono::Utc;
use rand::{distributions::Alphanumeric, Rng};
use serde::{Deserialize, Serialize};

pub const ENTRY_ID_LEN: usize = 12;

/// Fixed set of dashboard categories. "All" is a filter value, not a
/// category, and lives in [`CategoryFilter`].
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
pub enum Category {
    Business,
    Development,
    Entertainment,
    Media,
    Productivity,
    Social,
    Utilities,
}

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
pub enum CategoryFilter {
    All,
    #[serde(untagged)]
    Only(Category),
}

impl Default for CategoryFilter {
    fn default() -> Self {
        CategoryFilter::All
    }
}

impl CategoryFilter {
    pub fn accepts(&self, category: Category) -> bool {
        match self {
            CategoryFilter::All => true,
            CategoryFilter::Only(only) => *only == category,
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Entry {
    pub id: String,
    pub name: String,
    pub url: String,
    #[serde(default)]
    pub icon: Option<String>,
    pub category: Category,
    pub created_at: String, // RFC 3339, set once at creation
}

/// Fields the webview form submits; everything an [`Entry`] carries except
/// the parts the core assigns (id, creation timestamp).
#[derive(Serialize, Deserialize, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct EntryDraft {
    pub name: String,
    pub url: String,
    #[serde(default)]
    pub icon: Option<String>,
    pub category: Category,
}

#[derive(Serialize, Deserialize, Debug, Clone, Default)]
#[serde(rename_all = "camelCase")]
pub struct EntryFilter {
    #[serde(default)]
    pub search: String,
    #[serde(default)]
    pub category: CategoryFilter,
}

impl Entry {
    pub fn from_draft(draft: EntryDraft) -> Result<Self> {
        let name = draft.name.trim().to_string();
        if name.is_empty() {
            bail!("entry name must not be empty");
        }
        let url = draft.url.trim();
        if url.is_empty() {
            bail!("entry url must not be empty");
        }
        let icon = draft
            .icon
            .map(|i| i.trim().to_string())
            .filter(|i| !i.is_empty());
        Ok(Entry {
            id: random_token(ENTRY_ID_LEN),
            name,
            url: normalize_url(url),
            icon,
            category: draft.category,
            created_at: Utc::now().to_rfc3339(),
        })
    }

    /// Replace the editable fields from a draft, keeping id and creation
    /// timestamp. The entry is untouched when the draft fails validation.
    pub fn apply_draft(&mut self, draft: EntryDraft) -> Result<()> {
        let fresh = Entry::from_draft(draft)?;
        self.name = fresh.name;
        self.url = fresh.url;
        self.icon = fresh.icon;
        self.category = fresh.category;
        Ok(())
    }

    pub fn matches(&self, filter: &EntryFilter) -> bool {
        let needle = filter.search.to_lowercase();
        let text_hit = self.name.to_lowercase().contains(&needle)
            || self.url.to_lowercase().contains(&needle);
        text_hit && filter.category.accepts(self.category)
    }
}

/// Prepend `https://` when the address carries no scheme of its own.
pub fn normalize_url(raw: &str) -> String {
    let raw = raw.trim();
    if raw.contains("://") {
        raw.to_string()
    } else {
        format!("https://{raw}")
    }
}

pub fn random_token(len: usize) -> String {
    rand::thread_rng()
        .sample_iter(&Alphanumeric)
        .take(len)
        .map(char::from)
        .collect()
}
