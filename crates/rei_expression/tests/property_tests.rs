//! Property-based tests for suggestion selection.
//!
//! Whatever has been shown before and however far the conversation has come,
//! a batch never repeats a shown item, never contains duplicates and never
//! exceeds the per-turn limit.

use proptest::prelude::*;
use rei_core::config::SuggestionConfig;
use rei_core::Language;
use rei_expression::{builtin_catalog, next_suggestions, ShownSuggestions};
use std::collections::HashSet;

fn arb_shown() -> impl Strategy<Value = ShownSuggestions> {
    let pool: Vec<String> = builtin_catalog(Language::Ja)
        .into_iter()
        .flat_map(|c| c.templates)
        .collect();
    prop::sample::subsequence(pool.clone(), 0..=pool.len())
        .prop_map(|items| items.into_iter().collect())
}

proptest! {
    #[test]
    fn batch_respects_shown_and_is_unique(shown in arb_shown(), turns in 0u32..40) {
        let catalog = builtin_catalog(Language::Ja);
        let cfg = SuggestionConfig::default();
        let batch = next_suggestions(&catalog, &shown, turns, &cfg);

        prop_assert!(batch.len() <= cfg.max_per_turn);
        for s in &batch {
            prop_assert!(!shown.contains(s), "{} was already shown", s);
        }
        let unique: HashSet<_> = batch.iter().collect();
        prop_assert_eq!(unique.len(), batch.len());
    }

    #[test]
    fn batch_is_full_while_pool_allows(shown in arb_shown(), turns in 0u32..40) {
        let catalog = builtin_catalog(Language::Ja);
        let cfg = SuggestionConfig::default();
        let remaining = 20 - shown.len();
        let batch = next_suggestions(&catalog, &shown, turns, &cfg);
        prop_assert_eq!(batch.len(), remaining.min(cfg.max_per_turn));
    }

    #[test]
    fn conversation_drains_pool_without_repeats(start in 0u32..10) {
        let catalog = builtin_catalog(Language::En);
        let cfg = SuggestionConfig::default();
        let mut shown = ShownSuggestions::new();
        let mut offered = 0;
        for turn in start..start + 10 {
            let batch = next_suggestions(&catalog, &shown, turn, &cfg);
            offered += batch.len();
            shown.extend(batch);
        }
        prop_assert_eq!(offered, 20);
        prop_assert_eq!(shown.len(), 20);
    }
}
