//! Repeated-question tracking.
//!
//! The ledger is owned by the caller, one per conversation. Rei reacts to a
//! repeated question differently depending on how many times it was asked and
//! how much patience she has left.

use rei_core::Language;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Punctuation ignored when comparing questions.
const IGNORED: &[char] = &['？', '?', '。', '、', '！', '!'];

/// Lowercase and drop punctuation so trivially different phrasings compare equal.
pub fn normalize_question(question: &str) -> String {
    question
        .to_lowercase()
        .chars()
        .filter(|c| !IGNORED.contains(c))
        .collect::<String>()
        .trim()
        .to_string()
}

/// Per-conversation counts of normalized questions.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuestionLedger {
    counts: HashMap<String, u32>,
}

impl QuestionLedger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record one asking of `question`; returns how many times it has now been asked.
    pub fn record(&mut self, question: &str) -> u32 {
        let key = normalize_question(question);
        if key.is_empty() {
            return 1;
        }
        let count = self.counts.entry(key).or_insert(0);
        *count = count.saturating_add(1);
        *count
    }

    pub fn count(&self, question: &str) -> u32 {
        self.counts
            .get(&normalize_question(question))
            .copied()
            .unwrap_or(0)
    }

    pub fn len(&self) -> usize {
        self.counts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }
}

/// Reaction instruction for a repeated question, or `None` on the first asking.
///
/// Patient Rei jokes about it; tired Rei lets it show.
pub fn repeat_hint(count: u32, patience: f32, lang: Language) -> Option<&'static str> {
    let patient = match count {
        0 | 1 => return None,
        2 => patience > 70.0,
        3 => patience > 50.0,
        _ => patience > 30.0,
    };
    let hint = match (lang, count.min(4), patient) {
        (Language::Ja, 2, true) => "【重要】これは2回目の同じ質問です。優しく「さっきも聞かれたね」と反応してください。",
        (Language::Ja, 2, false) => "【重要】これは2回目の同じ質問です。少し疲れた感じで「あ、さっきも聞いたやつね...」と反応してください。",
        (Language::Ja, 3, true) => "【重要】これは3回目の同じ質問です。「また同じ質問？よっぽど気になるんやね〜」と反応してください。",
        (Language::Ja, 3, false) => "【重要】これは3回目の同じ質問です。「...また？ちょっと疲れてきたかも」と本音を漏らしてください。",
        (Language::Ja, _, true) => "【重要】これは4回目以上の同じ質問です。「もう覚えてや〜（笑）」と冗談めかして反応してください。",
        (Language::Ja, _, false) => "【重要】これは4回目以上の同じ質問です。「正直...何回も同じこと聞かれるとしんどいわ」と疲れを見せてください。",
        (Language::En, 2, true) => "[Important] This is the second time this question was asked. Gently mention that you were just asked this.",
        (Language::En, 2, false) => "[Important] This is the second time this question was asked. Sound a little tired: \"Oh, that one again...\"",
        (Language::En, 3, true) => "[Important] This is the third time this question was asked. Say something like \"Same question again? You must really be curious!\"",
        (Language::En, 3, false) => "[Important] This is the third time this question was asked. Let your honest feeling slip: \"...Again? I'm getting a bit tired.\"",
        (Language::En, _, true) => "[Important] This question has been asked four or more times. Joke about it: \"Please remember it this time (laughs)\"",
        (Language::En, _, false) => "[Important] This question has been asked four or more times. Show that you are worn out: \"Honestly... being asked the same thing over and over is tiring.\"",
    };
    Some(hint)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_question() {
        assert_eq!(normalize_question("京友禅について教えて？"), "京友禅について教えて");
        assert_eq!(normalize_question("  What Tools?!  "), "what tools");
        assert_eq!(normalize_question("ほんま、すごい！。"), "ほんますごい");
    }

    #[test]
    fn test_record_counts_equivalent_questions_together() {
        let mut ledger = QuestionLedger::new();
        assert_eq!(ledger.record("How long does it take?"), 1);
        assert_eq!(ledger.record("how long does it take"), 2);
        assert_eq!(ledger.record("HOW LONG DOES IT TAKE!"), 3);
        assert_eq!(ledger.count("how long does it take?"), 3);
        assert_eq!(ledger.len(), 1);
    }

    #[test]
    fn test_blank_questions_are_not_tracked() {
        let mut ledger = QuestionLedger::new();
        assert_eq!(ledger.record("？？"), 1);
        assert_eq!(ledger.record("？？"), 1);
        assert!(ledger.is_empty());
    }

    #[test]
    fn test_repeat_hint_escalates() {
        assert_eq!(repeat_hint(1, 90.0, Language::Ja), None);
        assert!(repeat_hint(2, 90.0, Language::Ja).unwrap().contains("さっきも聞かれたね"));
        assert!(repeat_hint(3, 90.0, Language::Ja).unwrap().contains("よっぽど気になる"));
        assert!(repeat_hint(4, 90.0, Language::Ja).unwrap().contains("もう覚えてや"));
        assert_eq!(repeat_hint(9, 90.0, Language::Ja), repeat_hint(4, 90.0, Language::Ja));
    }

    #[test]
    fn test_low_patience_shows_fatigue() {
        assert!(repeat_hint(2, 70.0, Language::Ja).unwrap().contains("疲れた感じ"));
        assert!(repeat_hint(3, 50.0, Language::Ja).unwrap().contains("疲れてきたかも"));
        assert!(repeat_hint(5, 30.0, Language::En).unwrap().contains("worn out"));
        assert!(repeat_hint(5, 31.0, Language::En).unwrap().contains("Joke"));
    }
}
