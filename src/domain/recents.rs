use serde::{Deserialize, Serialize};

pub const MIN_RECENTS_LIMIT: usize = 1;
pub const MAX_RECENTS_LIMIT: usize = 20;
pub const DEFAULT_RECENTS_LIMIT: usize = 5;

/// Most-recently-used list of request strings, newest first, no duplicates.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecentPrompts {
    #[serde(rename = "recentPrompts", default)]
    entries: Vec<String>,
    #[serde(rename = "recentsLimit", default = "default_limit")]
    limit: usize,
}

fn default_limit() -> usize {
    DEFAULT_RECENTS_LIMIT
}

impl Default for RecentPrompts {
    fn default() -> Self {
        Self::new(DEFAULT_RECENTS_LIMIT)
    }
}

impl RecentPrompts {
    pub fn new(limit: usize) -> Self {
        Self {
            entries: Vec::new(),
            limit: clamp_limit(limit),
        }
    }

    /// Record `prompt` as the most recent entry
    pub fn push(&mut self, prompt: &str) {
        if prompt.is_empty() {
            return;
        }

        if let Some(index) = self.entries.iter().position(|p| p == prompt) {
            let existing = self.entries.remove(index);
            self.entries.insert(0, existing);
            return;
        }

        self.entries.insert(0, prompt.to_string());
        self.entries.truncate(self.limit);
    }

    /// Change the capacity, dropping the oldest entries past it
    pub fn set_limit(&mut self, limit: usize) {
        self.limit = clamp_limit(limit);
        self.entries.truncate(self.limit);
    }

    pub fn limit(&self) -> usize {
        self.limit
    }

    pub fn entries(&self) -> &[String] {
        &self.entries
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(String::as_str)
    }

    /// Restore the invariants on data that came from outside (persisted JSON)
    pub fn normalize(&mut self) {
        self.limit = clamp_limit(self.limit);

        let mut seen = Vec::with_capacity(self.entries.len());
        self.entries.retain(|entry| {
            if entry.is_empty() || seen.contains(entry) {
                return false;
            }
            seen.push(entry.clone());
            true
        });
        self.entries.truncate(self.limit);
    }
}

fn clamp_limit(limit: usize) -> usize {
    limit.clamp(MIN_RECENTS_LIMIT, MAX_RECENTS_LIMIT)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn push_inserts_newest_first() {
        let mut recents = RecentPrompts::new(5);
        recents.push("first");
        recents.push("second");
        assert_eq!(recents.entries(), ["second", "first"]);
    }

    #[test]
    fn push_ignores_empty_prompt() {
        let mut recents = RecentPrompts::new(5);
        recents.push("");
        assert!(recents.is_empty());
    }

    #[test]
    fn pushing_twice_keeps_one_entry_at_front() {
        let mut recents = RecentPrompts::new(5);
        recents.push("summarize");
        recents.push("translate");
        recents.push("summarize");
        assert_eq!(recents.entries(), ["summarize", "translate"]);
    }

    #[test]
    fn overflow_drops_oldest() {
        let mut recents = RecentPrompts::new(3);
        for prompt in ["a", "b", "c", "d"] {
            recents.push(prompt);
        }
        assert_eq!(recents.entries(), ["d", "c", "b"]);
    }

    #[test]
    fn lowering_limit_truncates_and_keeps_prefix() {
        let mut recents = RecentPrompts::new(5);
        for prompt in ["a", "b", "c", "d", "e"] {
            recents.push(prompt);
        }
        recents.set_limit(2);
        assert_eq!(recents.entries(), ["e", "d"]);
        assert_eq!(recents.limit(), 2);
    }

    #[test]
    fn limit_is_clamped() {
        let mut recents = RecentPrompts::new(0);
        assert_eq!(recents.limit(), MIN_RECENTS_LIMIT);
        recents.set_limit(100);
        assert_eq!(recents.limit(), MAX_RECENTS_LIMIT);
    }

    #[test]
    fn normalize_repairs_persisted_lists() {
        let mut recents: RecentPrompts = serde_json::from_value(serde_json::json!({
            "recentPrompts": ["a", "", "b", "a", "c", "d"],
            "recentsLimit": 3
        }))
        .unwrap();
        recents.normalize();
        assert_eq!(recents.entries(), ["a", "b", "c"]);
    }
}
