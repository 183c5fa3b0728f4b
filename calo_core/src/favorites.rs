//! Favorite items ranked by recency and popularity.
//!
//! A favorite is a pure presence toggle: removing one discards its use
//! count, so re-adding the same item starts again from zero.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Usage counters for one favorited reference item
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct FavoriteRecord {
    pub item_id: String,
    pub default_quantity: f64,
    pub use_count: u32,
    pub last_used: DateTime<Utc>,
    /// Insertion order, used to break ranking ties
    pub seq: u64,
}

impl FavoriteRecord {
    fn used_at(&self, at: DateTime<Utc>) -> Self {
        Self {
            use_count: self.use_count.saturating_add(1),
            last_used: at,
            ..self.clone()
        }
    }
}

/// Ranking applied when listing favorites
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum RankOrder {
    /// Most recently used first
    #[default]
    Recent,
    /// Highest use count first
    Popular,
}

/// The set of favorited items
#[derive(Clone, Debug, Serialize, Deserialize, Default, PartialEq)]
pub struct FavoriteBook {
    #[serde(default)]
    records: Vec<FavoriteRecord>,
    #[serde(default)]
    next_seq: u64,
}

impl FavoriteBook {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add the item if absent, remove it if present
    ///
    /// Returns whether the item is favorited afterwards.
    pub fn toggle(&mut self, item_id: &str, default_quantity: f64, now: DateTime<Utc>) -> bool {
        if let Some(pos) = self.position(item_id) {
            let removed = self.records.remove(pos);
            tracing::debug!(
                "Removed favorite {} (use count {} discarded)",
                item_id,
                removed.use_count
            );
            return false;
        }

        self.records.push(FavoriteRecord {
            item_id: item_id.to_string(),
            default_quantity,
            use_count: 0,
            last_used: now,
            seq: self.next_seq,
        });
        self.next_seq += 1;
        tracing::debug!("Added favorite {}", item_id);
        true
    }

    /// Count a use of the item if it is favorited
    ///
    /// Returns `false` without changing anything when it is not.
    pub fn record_use(&mut self, item_id: &str, at: DateTime<Utc>) -> bool {
        match self.position(item_id) {
            Some(pos) => {
                self.records[pos] = self.records[pos].used_at(at);
                true
            }
            None => false,
        }
    }

    pub fn is_favorite(&self, item_id: &str) -> bool {
        self.position(item_id).is_some()
    }

    pub fn get(&self, item_id: &str) -> Option<&FavoriteRecord> {
        self.records.iter().find(|r| r.item_id == item_id)
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// All favorites in ranking order; ties keep insertion order
    pub fn ranked(&self, order: RankOrder) -> Vec<&FavoriteRecord> {
        let mut ranked: Vec<&FavoriteRecord> = self.records.iter().collect();
        match order {
            RankOrder::Recent => {
                ranked.sort_by(|a, b| b.last_used.cmp(&a.last_used).then(a.seq.cmp(&b.seq)))
            }
            RankOrder::Popular => {
                ranked.sort_by(|a, b| b.use_count.cmp(&a.use_count).then(a.seq.cmp(&b.seq)))
            }
        }
        ranked
    }

    pub fn top(&self, order: RankOrder, limit: usize) -> Vec<&FavoriteRecord> {
        let mut ranked = self.ranked(order);
        ranked.truncate(limit);
        ranked
    }

    fn position(&self, item_id: &str) -> Option<usize> {
        self.records.iter().position(|r| r.item_id == item_id)
    }
}
