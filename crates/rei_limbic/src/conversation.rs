//! Caller-owned conversation state and per-conversation serialization.
//!
//! The engine keeps no memory between turns: a [`ConversationState`] goes in,
//! an updated copy comes out, and the caller stores it. When turns may arrive
//! concurrently, [`ConversationLocks`] hands out one mutex per conversation so
//! turns of the same conversation run one at a time while distinct
//! conversations proceed in parallel.

use rei_core::{AffectLabel, MentalState};
use rei_expression::{QuestionLedger, ShownSuggestions};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap, VecDeque};
use std::sync::Arc;
use tokio::sync::Mutex;

/// Number of past agent emotions kept for diagnostics.
pub const HISTORY_LEN: usize = 10;

/// Rei's most recent emotions, oldest first.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EmotionHistory(VecDeque<AffectLabel>);

impl EmotionHistory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append an emotion, dropping the oldest past the window.
    pub fn push(&mut self, label: AffectLabel) {
        self.0.push_back(label);
        while self.0.len() > HISTORY_LEN {
            self.0.pop_front();
        }
    }

    pub fn last(&self) -> Option<AffectLabel> {
        self.0.back().copied()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = AffectLabel> + '_ {
        self.0.iter().copied()
    }

    /// How often each from→to transition occurs in the window.
    pub fn transition_counts(&self) -> BTreeMap<(AffectLabel, AffectLabel), u32> {
        let mut counts = BTreeMap::new();
        for (from, to) in self.0.iter().zip(self.0.iter().skip(1)) {
            *counts.entry((*from, *to)).or_insert(0) += 1;
        }
        counts
    }
}

/// Everything the engine needs to remember about one conversation.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ConversationState {
    /// Rei's emotion after the previous turn
    pub prior_emotion: AffectLabel,
    pub mental: MentalState,
    /// Completed turns; drives relationship tier and suggestion phase
    pub turn_count: u32,
    pub shown: ShownSuggestions,
    pub history: EmotionHistory,
    pub questions: QuestionLedger,
}

impl ConversationState {
    pub fn new() -> Self {
        Self::default()
    }
}

/// Conversation id → state behind its own lock.
#[derive(Debug, Default)]
pub struct ConversationLocks {
    conversations: Mutex<HashMap<String, Arc<Mutex<ConversationState>>>>,
}

impl ConversationLocks {
    pub fn new() -> Self {
        Self::default()
    }

    /// The lock for `id`, created with a fresh state on first use.
    pub async fn get(&self, id: &str) -> Arc<Mutex<ConversationState>> {
        let mut map = self.conversations.lock().await;
        Arc::clone(
            map.entry(id.to_string())
                .or_insert_with(|| Arc::new(Mutex::new(ConversationState::new()))),
        )
    }

    /// Forget a conversation; returns its last state if it existed.
    pub async fn remove(&self, id: &str) -> Option<ConversationState> {
        let entry = self.conversations.lock().await.remove(id)?;
        let state = entry.lock().await.clone();
        Some(state)
    }

    pub async fn len(&self) -> usize {
        self.conversations.lock().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_history_keeps_last_ten() {
        let mut history = EmotionHistory::new();
        for _ in 0..7 {
            history.push(AffectLabel::Happy);
        }
        for _ in 0..5 {
            history.push(AffectLabel::Sad);
        }
        assert_eq!(history.len(), HISTORY_LEN);
        assert_eq!(history.iter().next(), Some(AffectLabel::Happy));
        assert_eq!(history.last(), Some(AffectLabel::Sad));
    }

    #[test]
    fn test_transition_counts() {
        let mut history = EmotionHistory::new();
        for label in [
            AffectLabel::Neutral,
            AffectLabel::Happy,
            AffectLabel::Happy,
            AffectLabel::Neutral,
            AffectLabel::Happy,
        ] {
            history.push(label);
        }
        let counts = history.transition_counts();
        assert_eq!(counts[&(AffectLabel::Neutral, AffectLabel::Happy)], 2);
        assert_eq!(counts[&(AffectLabel::Happy, AffectLabel::Happy)], 1);
        assert_eq!(counts[&(AffectLabel::Happy, AffectLabel::Neutral)], 1);
        assert_eq!(counts.values().sum::<u32>(), 4);
    }

    #[test]
    fn test_state_round_trips_through_json() {
        let mut state = ConversationState::new();
        state.turn_count = 4;
        state.shown.insert("京友禅について教えて");
        state.history.push(AffectLabel::Surprised);
        let json = serde_json::to_string(&state).unwrap();
        let back: ConversationState = serde_json::from_str(&json).unwrap();
        assert_eq!(back, state);
    }

    #[test]
    fn test_missing_fields_default() {
        let state: ConversationState = serde_json::from_str(r#"{"turn_count": 3}"#).unwrap();
        assert_eq!(state.turn_count, 3);
        assert_eq!(state.mental, MentalState::default());
        assert_eq!(state.prior_emotion, AffectLabel::Neutral);
    }

    #[tokio::test]
    async fn test_same_id_shares_one_lock() {
        let locks = ConversationLocks::new();
        let a = locks.get("visitor-1").await;
        let b = locks.get("visitor-1").await;
        assert!(Arc::ptr_eq(&a, &b));

        a.lock().await.turn_count = 5;
        assert_eq!(b.lock().await.turn_count, 5);

        let other = locks.get("visitor-2").await;
        assert!(!Arc::ptr_eq(&a, &other));
        assert_eq!(locks.len().await, 2);
    }

    #[tokio::test]
    async fn test_concurrent_turns_are_serialized() {
        let locks = Arc::new(ConversationLocks::new());
        let mut handles = Vec::new();
        for _ in 0..32 {
            let locks = Arc::clone(&locks);
            handles.push(tokio::spawn(async move {
                let conv = locks.get("shared").await;
                let mut state = conv.lock().await;
                let seen = state.turn_count;
                tokio::task::yield_now().await;
                state.turn_count = seen + 1;
            }));
        }
        for h in handles {
            h.await.unwrap();
        }
        let final_state = locks.remove("shared").await.unwrap();
        assert_eq!(final_state.turn_count, 32);
        assert!(locks.is_empty().await);
    }
}
