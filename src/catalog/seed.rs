use once_cell::sync::Lazy;

use super::entry::{Category, Entry};

/// Creation timestamp stamped on every seed entry so a first run is
/// deterministic across machines.
const SEED_CREATED_AT: &str = "2024-01-01T00:00:00+00:00";

struct SeedApp {
    id: &'static str,
    name: &'static str,
    url: &'static str,
    category: Category,
}

static SEED_APPS: Lazy<Vec<SeedApp>> = Lazy::new(|| {
    vec![
        SeedApp {
            id: "seedGithub00",
            name: "GitHub",
            url: "https://github.com",
            category: Category::Development,
        },
        SeedApp {
            id: "seedGmail000",
            name: "Gmail",
            url: "https://mail.google.com",
            category: Category::Business,
        },
        SeedApp {
            id: "seedCalendar",
            name: "Calendar",
            url: "https://calendar.google.com",
            category: Category::Productivity,
        },
        SeedApp {
            id: "seedYoutube0",
            name: "YouTube",
            url: "https://youtube.com",
            category: Category::Media,
        },
        SeedApp {
            id: "seedReddit00",
            name: "Reddit",
            url: "https://reddit.com",
            category: Category::Social,
        },
    ]
});

/// The collection a fresh (or unreadable) local catalog falls back to.
pub fn seed_entries() -> Vec<Entry> {
    SEED_APPS
        .iter()
        .map(|app| Entry {
            id: app.id.to_string(),
            name: app.name.to_string(),
            url: app.url.to_string(),
            icon: None,
            category: app.category,
            created_at: SEED_CREATED_AT.to_string(),
        })
        .collect()
}
