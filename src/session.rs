// Session-scoped user state: favorites, price-drop notification toggles,
// and free-text search history. The core modules never touch this; it is
// owned by the API layer and lives only for the process lifetime.
//
// Favorites are keyed by vehicle display name, per the identity invariant
// in models.rs.

use chrono::{DateTime, Utc};
use serde::Serialize;

const HISTORY_LIMIT: usize = 50;

#[derive(Debug, Serialize, Clone)]
#[serde(rename_all = "camelCase")]
pub struct HistoryEntry {
    pub query: String,
    pub searched_at: DateTime<Utc>,
}

#[derive(Debug, Default)]
pub struct SessionState {
    favorites: Vec<String>,
    notifications: Vec<String>,
    history: Vec<HistoryEntry>,
}

impl SessionState {
    // Toggles a vehicle in the favorites list. Returns true when the
    // vehicle is a favorite after the call. Un-favoriting also clears any
    // price-drop notification for the same name.
    pub fn toggle_favorite(&mut self, name: &str) -> bool {
        if let Some(pos) = self.favorites.iter().position(|f| f == name) {
            self.favorites.remove(pos);
            self.notifications.retain(|n| n != name);
            false
        } else {
            self.favorites.push(name.to_string());
            true
        }
    }

    pub fn is_favorite(&self, name: &str) -> bool {
        self.favorites.iter().any(|f| f == name)
    }

    pub fn favorites(&self) -> &[String] {
        &self.favorites
    }

    // Toggles the price-drop flag; only meaningful for favorited vehicles.
    // Returns None when the vehicle is not a favorite.
    pub fn toggle_notification(&mut self, name: &str) -> Option<bool> {
        if !self.is_favorite(name) {
            return None;
        }
        if let Some(pos) = self.notifications.iter().position(|n| n == name) {
            self.notifications.remove(pos);
            Some(false)
        } else {
            self.notifications.push(name.to_string());
            Some(true)
        }
    }

    pub fn has_notification(&self, name: &str) -> bool {
        self.notifications.iter().any(|n| n == name)
    }

    // Records a search query, most recent first, deduplicating repeats of
    // the same text and capping the list length.
    pub fn record_search(&mut self, query: &str) {
        let trimmed = query.trim();
        if trimmed.is_empty() {
            return;
        }
        self.history.retain(|entry| entry.query != trimmed);
        self.history.insert(
            0,
            HistoryEntry {
                query: trimmed.to_string(),
                searched_at: Utc::now(),
            },
        );
        self.history.truncate(HISTORY_LIMIT);
    }

    pub fn history(&self) -> &[HistoryEntry] {
        &self.history
    }
}
