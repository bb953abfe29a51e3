pub mod entry;
pub mod seed;
pub mod store;


use anyhow::{anyhow, Result};

use crate::catalog::entry::{random_token, Entry, EntryDraft, EntryFilter, ENTRY_ID_LEN};

/// The in-memory entry collection. Insertion order matters only in that
/// new entries go to the front.
pub struct Catalog {
    entries: Vec<Entry>,
}

impl Catalog {
    pub fn new(entries: Vec<Entry>) -> Self {
        Catalog { entries }
    }

    pub fn entries(&self) -> &[Entry] {
        &self.entries
    }

    pub fn get(&self, id: &str) -> Option<&Entry> {
        self.entries.iter().find(|e| e.id == id)
    }

    /// Validate the draft and prepend the resulting entry.
    pub fn add(&mut self, draft: EntryDraft) -> Result<Entry> {
        let mut entry = Entry::from_draft(draft)?;
        while self.entries.iter().any(|e| e.id == entry.id) {
            entry.id = random_token(ENTRY_ID_LEN);
        }
        self.entries.insert(0, entry.clone());
        Ok(entry)
    }

    /// Replace the editable fields of the matching entry; every other
    /// entry is untouched.
    pub fn edit(&mut self, id: &str, draft: EntryDraft) -> Result<Entry> {
        let pos = self
            .entries
            .iter()
            .position(|e| e.id == id)
            .ok_or_else(|| anyhow!("no entry with id {id}"))?;
        self.entries[pos].apply_draft(draft)?;
        Ok(self.entries[pos].clone())
    }

    /// Remove the matching entry. Unknown ids are a no-op; the return
    /// value says whether anything changed.
    pub fn remove(&mut self, id: &str) -> bool {
        let before = self.entries.len();
        self.entries.retain(|e| e.id != id);
        self.entries.len() != before
    }

    pub fn replace_all(&mut self, entries: Vec<Entry>) {
        self.entries = entries;
    }

    pub fn filtered(&self, filter: &EntryFilter) -> Vec<Entry> {
        self.entries
            .iter()
            .filter(|e| e.matches(filter))
            .cloned()
            .collect()
    }
}
