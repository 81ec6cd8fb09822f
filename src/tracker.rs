use itertools::Itertools;
use log::debug;
use std::collections::HashMap;
use std::sync::Mutex;

/// Process-lifetime aggregator of selection counts per distinct word.
///
/// Shared by the session engine and the result reporter. All mutations
/// currently happen on the tick-loop thread, but the map is kept behind a
/// mutex so `add_points` and `ranked` stay safe if a future host calls them
/// from different threads.
#[derive(Debug, Default)]
pub struct WordTracker {
    scores: Mutex<HashMap<String, i32>>,
}

impl WordTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds `delta` to a word's accumulated total, flooring the result at 0.
    /// An absent entry is created with `max(0, delta)`. Empty words are
    /// ignored.
    pub fn add_points(&self, word: &str, delta: i32) {
        if word.is_empty() {
            debug!("add_points ignored for empty word");
            return;
        }

        let mut scores = self.scores.lock().unwrap();
        let entry = scores.entry(word.to_string()).or_insert(0);
        *entry = (*entry + delta).max(0);
        debug!("'{}' now has {} points", word, *entry);
    }

    /// Top `limit` words: points descending, ties broken by word ascending.
    /// The tie-break is exact so displays and tests are reproducible.
    pub fn ranked(&self, limit: usize) -> Vec<(String, i32)> {
        let scores = self.scores.lock().unwrap();
        scores
            .iter()
            .map(|(word, points)| (word.clone(), *points))
            .sorted_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)))
            .take(limit)
            .collect()
    }

    /// Accumulated points for a word; 0 if untracked.
    pub fn score(&self, word: &str) -> i32 {
        self.scores.lock().unwrap().get(word).copied().unwrap_or(0)
    }

    pub fn tracked_count(&self) -> usize {
        self.scores.lock().unwrap().len()
    }

    /// Clears every tracked word. Used when a host wants a cold start, not
    /// between rounds or sessions.
    pub fn reset(&self) {
        self.scores.lock().unwrap().clear();
        debug!("word tracker reset");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_add_points_accumulates() {
        let tracker = WordTracker::new();

        tracker.add_points("Colaboração", 1);
        tracker.add_points("Colaboração", 2);

        assert_eq!(tracker.score("Colaboração"), 3);
        assert_eq!(tracker.tracked_count(), 1);
    }

    #[test]
    fn test_empty_word_is_ignored() {
        let tracker = WordTracker::new();

        tracker.add_points("", 5);

        assert_eq!(tracker.tracked_count(), 0);
    }

    #[test]
    fn test_negative_delta_floors_at_zero() {
        let tracker = WordTracker::new();

        tracker.add_points("X", -5);
        assert_eq!(tracker.score("X"), 0);

        tracker.add_points("Y", 2);
        tracker.add_points("Y", -10);
        assert_eq!(tracker.score("Y"), 0);
    }

    #[test]
    fn test_untracked_word_scores_zero() {
        let tracker = WordTracker::new();

        assert_eq!(tracker.score("Parceria"), 0);
    }

    #[test]
    fn test_ranked_orders_by_points_then_word() {
        let tracker = WordTracker::new();
        tracker.add_points("B", 3);
        tracker.add_points("A", 3);
        tracker.add_points("C", 1);

        let ranked = tracker.ranked(3);

        assert_eq!(
            ranked,
            vec![
                ("A".to_string(), 3),
                ("B".to_string(), 3),
                ("C".to_string(), 1)
            ]
        );
    }

    #[test]
    fn test_ranked_respects_limit() {
        let tracker = WordTracker::new();
        tracker.add_points("A", 1);
        tracker.add_points("B", 2);
        tracker.add_points("C", 3);

        let ranked = tracker.ranked(2);

        assert_eq!(ranked.len(), 2);
        assert_eq!(ranked[0].0, "C");
        assert_eq!(ranked[1].0, "B");
    }

    #[test]
    fn test_ranked_returns_fewer_when_fewer_tracked() {
        let tracker = WordTracker::new();
        tracker.add_points("A", 1);

        assert_eq!(tracker.ranked(10).len(), 1);
    }

    #[test]
    fn test_reset_clears_everything() {
        let tracker = WordTracker::new();
        tracker.add_points("A", 4);

        tracker.reset();

        assert_eq!(tracker.tracked_count(), 0);
        assert_eq!(tracker.score("A"), 0);
    }
}
