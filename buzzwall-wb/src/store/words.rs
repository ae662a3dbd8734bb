//! Live buzzword store
//!
//! Owns the authoritative set of live words with case-insensitive
//! deduplication, a fixed capacity bound (oldest evicted first), and lazy
//! TTL expiry performed on every access.
//!
//! Two structures are kept in sync under one lock: a `VecDeque` preserving
//! insertion order (FIFO reads and eviction) and a `HashSet` of normalized
//! texts making duplicate checks O(1). Every mutation path goes through
//! `insert_locked`/`sweep_locked` so the two can never drift apart.

use std::collections::{HashSet, VecDeque};
use std::sync::Arc;

use buzzwall_common::api::types::Word;
use chrono::{DateTime, Duration, Utc};
use tokio::sync::RwLock;
use tracing::debug;
use uuid::Uuid;

/// Normalize a submitted word for display and dedup: trim, upper-case
fn normalize(text: &str) -> String {
    text.trim().to_uppercase()
}

struct Inner {
    /// Live words in insertion order
    words: VecDeque<Word>,
    /// Normalized texts of live words, for O(1) duplicate detection
    seen: HashSet<String>,
}

/// Shared handle to the live word set
///
/// Cheap to clone; all clones observe the same state. Each operation holds
/// the write lock for its whole duration, so the sweep/dedup/evict/append
/// sequence of an `add` is indivisible with respect to concurrent calls.
///
/// The public `list`/`add`/... methods use the wall clock; the `*_at`
/// variants take an explicit `now` for deterministic TTL behavior in tests.
#[derive(Clone)]
pub struct WordStore {
    inner: Arc<RwLock<Inner>>,
    max_words: usize,
    ttl: Duration,
}

impl WordStore {
    /// Create an empty store with the given capacity and word TTL
    pub fn new(max_words: usize, ttl: Duration) -> Self {
        Self {
            inner: Arc::new(RwLock::new(Inner {
                words: VecDeque::new(),
                seen: HashSet::new(),
            })),
            max_words,
            ttl,
        }
    }

    /// Get all live words in insertion order (defensive copy)
    pub async fn list(&self) -> Vec<Word> {
        self.list_at(Utc::now()).await
    }

    /// `list` with an explicit clock reading
    pub async fn list_at(&self, now: DateTime<Utc>) -> Vec<Word> {
        let mut inner = self.inner.write().await;
        self.sweep_locked(&mut inner, now);
        inner.words.iter().cloned().collect()
    }

    /// Add a single word; returns `None` if it duplicates a live word
    pub async fn add(&self, text: &str) -> Option<Word> {
        self.add_at(text, Utc::now()).await
    }

    /// `add` with an explicit clock reading
    pub async fn add_at(&self, text: &str, now: DateTime<Utc>) -> Option<Word> {
        let mut inner = self.inner.write().await;
        self.sweep_locked(&mut inner, now);
        self.insert_locked(&mut inner, text, now)
    }

    /// Add words in order under a single lock acquisition
    ///
    /// Duplicates are silently skipped; only created words are returned.
    pub async fn add_batch(&self, texts: &[String]) -> Vec<Word> {
        self.add_batch_at(texts, Utc::now()).await
    }

    /// `add_batch` with an explicit clock reading
    pub async fn add_batch_at(&self, texts: &[String], now: DateTime<Utc>) -> Vec<Word> {
        let mut inner = self.inner.write().await;
        self.sweep_locked(&mut inner, now);
        texts
            .iter()
            .filter_map(|text| self.insert_locked(&mut inner, text, now))
            .collect()
    }

    /// Remove all words (session reset between performances)
    pub async fn clear(&self) {
        let mut inner = self.inner.write().await;
        let removed = inner.words.len();
        inner.words.clear();
        inner.seen.clear();
        debug!("Cleared word store ({} words removed)", removed);
    }

    /// Number of live words
    pub async fn count(&self) -> usize {
        self.count_at(Utc::now()).await
    }

    /// `count` with an explicit clock reading
    pub async fn count_at(&self, now: DateTime<Utc>) -> usize {
        let mut inner = self.inner.write().await;
        self.sweep_locked(&mut inner, now);
        inner.words.len()
    }

    /// Normalized texts of all live words in insertion order
    ///
    /// Used by downstream consumers that only need the display strings
    /// (e.g. seeding lyric generation).
    pub async fn texts(&self) -> Vec<String> {
        self.texts_at(Utc::now()).await
    }

    /// `texts` with an explicit clock reading
    pub async fn texts_at(&self, now: DateTime<Utc>) -> Vec<String> {
        let mut inner = self.inner.write().await;
        self.sweep_locked(&mut inner, now);
        inner.words.iter().map(|w| w.text.clone()).collect()
    }

    /// Remove expired words from both structures
    ///
    /// Runs on every access rather than on a timer, so expiry is enforced
    /// at exactly the moments consistency is observed and no background
    /// task races with request handlers.
    fn sweep_locked(&self, inner: &mut Inner, now: DateTime<Utc>) {
        let Inner { words, seen } = inner;
        let before = words.len();
        words.retain(|word| {
            if now - word.timestamp >= self.ttl {
                seen.remove(&word.text);
                false
            } else {
                true
            }
        });
        let removed = before - words.len();
        if removed > 0 {
            debug!("Cleaned {} expired words", removed);
        }
    }

    /// Single mutating path for insertions: dedup check, capacity
    /// eviction, then append to both structures together
    fn insert_locked(&self, inner: &mut Inner, text: &str, now: DateTime<Utc>) -> Option<Word> {
        let normalized = normalize(text);

        // Duplicate check (case-insensitive)
        if inner.seen.contains(&normalized) {
            debug!("Duplicate word rejected: {}", normalized);
            return None;
        }

        // Capacity check: evict the oldest word if at the limit. TTL has
        // already been swept, so this only fires when the live set is full.
        if inner.words.len() >= self.max_words {
            if let Some(evicted) = inner.words.pop_front() {
                inner.seen.remove(&evicted.text);
                debug!("Removed oldest word due to capacity: {}", evicted.text);
            }
        }

        let word = Word {
            id: Uuid::new_v4(),
            text: normalized.clone(),
            timestamp: now,
        };

        inner.words.push_back(word.clone());
        inner.seen.insert(normalized);

        Some(word)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn store(max_words: usize) -> WordStore {
        WordStore::new(max_words, Duration::minutes(30))
    }

    fn t0() -> DateTime<Utc> {
        Utc::now()
    }

    #[tokio::test]
    async fn test_add_normalizes_and_lists_in_order() {
        let store = store(10);

        let word = store.add("  synergy ").await.expect("Should create word");
        assert_eq!(word.text, "SYNERGY");

        store.add("pivot").await.expect("Should create word");

        let words = store.list().await;
        assert_eq!(words.len(), 2);
        assert_eq!(words[0].text, "SYNERGY");
        assert_eq!(words[1].text, "PIVOT");
        assert_ne!(words[0].id, words[1].id);
    }

    #[tokio::test]
    async fn test_case_insensitive_duplicate_rejected() {
        let store = store(10);

        assert!(store.add("hello").await.is_some());
        assert!(store.add("HELLO").await.is_none());
        assert!(store.add("  Hello  ").await.is_none());

        let words = store.list().await;
        assert_eq!(words.len(), 1);
        assert_eq!(words[0].text, "HELLO");
    }

    #[tokio::test]
    async fn test_capacity_evicts_oldest_first() {
        let store = store(3);

        store.add("A").await.unwrap();
        store.add("B").await.unwrap();
        store.add("C").await.unwrap();
        store.add("D").await.unwrap();

        let texts = store.texts().await;
        assert_eq!(texts, vec!["B", "C", "D"]);
    }

    #[tokio::test]
    async fn test_fifo_order_preserved_under_eviction() {
        let store = store(5);

        for text in ["ONE", "TWO", "THREE", "FOUR", "FIVE", "SIX"] {
            store.add(text).await.unwrap();
        }

        let texts = store.texts().await;
        assert_eq!(texts, vec!["TWO", "THREE", "FOUR", "FIVE", "SIX"]);
    }

    #[tokio::test]
    async fn test_eviction_frees_dedup_slot() {
        let store = store(1);

        store.add("A").await.unwrap();
        // Evicts A; its text must leave the membership set with it
        store.add("B").await.unwrap();
        assert!(store.add("A").await.is_some());
        assert!(store.add("A").await.is_none());

        assert_eq!(store.texts().await, vec!["A"]);
    }

    #[tokio::test]
    async fn test_ttl_expiry_boundary() {
        let store = store(10);
        let added_at = t0();

        store.add_at("EPHEMERAL", added_at).await.unwrap();

        // Visible right up to the TTL boundary
        let just_before = added_at + Duration::minutes(30) - Duration::seconds(1);
        assert_eq!(store.list_at(just_before).await.len(), 1);

        // Gone at exactly TTL age
        let at_ttl = added_at + Duration::minutes(30);
        assert!(store.list_at(at_ttl).await.is_empty());
    }

    #[tokio::test]
    async fn test_expiry_frees_dedup_slot() {
        let store = store(10);
        let added_at = t0();

        store.add_at("COMEBACK", added_at).await.unwrap();

        let later = added_at + Duration::hours(1);
        let word = store
            .add_at("comeback", later)
            .await
            .expect("Expired text should be addable again");
        assert_eq!(word.text, "COMEBACK");
        assert_eq!(store.count_at(later).await, 1);
    }

    #[tokio::test]
    async fn test_expiry_only_removes_old_words() {
        let store = store(10);
        let start = t0();

        store.add_at("OLD", start).await.unwrap();
        store.add_at("NEW", start + Duration::minutes(20)).await.unwrap();

        // 35 minutes in: OLD (35 min) is expired, NEW (15 min) is not
        let texts = store.texts_at(start + Duration::minutes(35)).await;
        assert_eq!(texts, vec!["NEW"]);
    }

    #[tokio::test]
    async fn test_batch_filters_duplicates_without_erroring() {
        let store = store(10);

        let added = store
            .add_batch(&["A".to_string(), "A".to_string(), "b".to_string()])
            .await;

        assert_eq!(added.len(), 2);
        assert_eq!(added[0].text, "A");
        assert_eq!(added[1].text, "B");
        assert_eq!(store.count().await, 2);
    }

    #[tokio::test]
    async fn test_batch_respects_capacity() {
        let store = store(3);

        let texts: Vec<String> = (1..=5).map(|i| format!("WORD{}", i)).collect();
        store.add_batch(&texts).await;

        assert_eq!(store.texts().await, vec!["WORD3", "WORD4", "WORD5"]);
    }

    #[tokio::test]
    async fn test_clear_resets_everything() {
        let store = store(10);

        store.add("A").await.unwrap();
        store.add("B").await.unwrap();
        store.clear().await;

        assert!(store.list().await.is_empty());

        // Cleared texts are addable again and become the sole entry
        let word = store.add("A").await.expect("Should add after clear");
        assert_eq!(word.text, "A");
        assert_eq!(store.count().await, 1);
    }

    #[tokio::test]
    async fn test_concurrent_adds_keep_uniqueness() {
        let store = store(200);

        let handles: Vec<_> = (0..20)
            .map(|_| {
                let store = store.clone();
                tokio::spawn(async move { store.add("HOTSPOT").await })
            })
            .collect();

        let mut created = 0;
        for handle in handles {
            if handle.await.unwrap().is_some() {
                created += 1;
            }
        }

        assert_eq!(created, 1);
        assert_eq!(store.count().await, 1);
    }
}
