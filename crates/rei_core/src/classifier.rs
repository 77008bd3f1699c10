//! Lexicon-based affect classification for Japanese (and romaji) chat text.
//!
//! Three independent signal classes are scored per label and multiplied by the
//! label's weight:
//! - keyword hits against the normalized text (+2.0 each)
//! - emoji hits against the original text (+1.5 each)
//! - stylistic regex matches against the original text (+1.0 each)
//!
//! Contextual phrases add a flat +0.5 regardless of weight. Normalization strips
//! emoji and punctuation, which is why those signals look at the original.

use crate::affect::{AffectLabel, ClassificationResult};
use crate::config::ClassifierConfig;
use regex::Regex;
use std::sync::LazyLock;

const KEYWORD_SCORE: f32 = 2.0;
const EMOJI_SCORE: f32 = 1.5;
const PATTERN_SCORE: f32 = 1.0;
const CONTEXT_SCORE: f32 = 0.5;

struct LabelLexicon {
    label: AffectLabel,
    keywords: &'static [&'static str],
    emojis: &'static [&'static str],
    patterns: &'static [&'static str],
    weight: f32,
}

const LEXICA: &[LabelLexicon] = &[
    LabelLexicon {
        label: AffectLabel::Happy,
        keywords: &[
            "うれしい", "嬉しい", "ウレシイ", "ureshii",
            "楽しい", "たのしい", "tanoshii",
            "ハッピー", "happy", "はっぴー",
            "喜び", "よろこび", "yorokobi",
            "幸せ", "しあわせ", "shiawase",
            "最高", "さいこう", "saikou",
            "やった", "yatta",
            "わーい", "わあい", "waai",
            "笑", "わら", "wara",
            "良い", "いい", "よい", "yoi",
            "素晴らしい", "すばらしい", "subarashii",
            "ありがとう", "ありがと", "おかげ",
            "感謝", "かんしゃ", "感動", "かんどう",
            "面白い", "おもしろい", "たのしみ",
            "ワクワク", "わくわく", "ドキドキ",
        ],
        emojis: &["😊", "😄", "😃", "😁", "🙂", "☺️", "🥰", "😍", "🎉", "✨", "❤️", "💕"],
        patterns: &[r"！+", r"♪+", r"〜+$", r"www", r"笑$"],
        weight: 1.3,
    },
    LabelLexicon {
        label: AffectLabel::Sad,
        keywords: &[
            "悲しい", "かなしい", "カナシイ", "kanashii",
            "寂しい", "さびしい", "さみしい", "sabishii",
            "辛い", "つらい", "ツライ", "tsurai",
            "泣", "なき", "naki",
            "涙", "なみだ", "namida",
            "しょんぼり", "shonbori",
            "がっかり", "gakkari",
            "憂鬱", "ゆううつ", "yuuutsu",
            "落ち込", "おちこ", "ochiko",
            "だめ", "ダメ", "dame",
            "失敗", "しっぱい", "shippai",
            "無理", "むり", "諦め", "あきらめ",
            "疲れ", "つかれ", "しんどい",
        ],
        emojis: &["😢", "😭", "😔", "😞", "😟", "☹️", "😥", "😰", "💔"],
        patterns: &[r"\.\.\.+$", r"…+$", r"はぁ", r"ため息"],
        weight: 1.2,
    },
    LabelLexicon {
        label: AffectLabel::Angry,
        keywords: &[
            "怒", "おこ", "いか", "oko", "ika",
            "ムカつく", "むかつく", "mukatsuku",
            "イライラ", "いらいら", "iraira",
            "腹立", "はらだ", "harada",
            "キレ", "きれ", "kire",
            "最悪", "さいあく", "saiaku",
            "ふざけ", "fuzake",
            "もう", "mou",
            "なんで", "nande",
            "ひどい", "hidoi",
            "うざい", "ウザイ", "邪魔",
            "嫌い", "きらい", "憎",
        ],
        emojis: &["😠", "😡", "🤬", "😤", "💢", "🔥", "👿"],
        patterns: &[r"！！+", r"っ！+", r"ﾁｯ", r"くそ"],
        weight: 1.1,
    },
    LabelLexicon {
        label: AffectLabel::Surprised,
        keywords: &[
            "驚", "おどろ", "odoro",
            "びっくり", "ビックリ", "bikkuri",
            "すごい", "スゴイ", "凄い", "sugoi",
            "まじ", "マジ", "maji",
            "えっ", "え？", "えー", "e",
            "わっ", "wa",
            "なに", "ナニ", "nani",
            "本当", "ほんとう", "hontou",
            "うそ", "ウソ", "嘘", "uso",
            "やばい", "ヤバイ", "yabai",
            "信じられない", "しんじられない",
            "ありえない", "予想外",
        ],
        emojis: &["😲", "😮", "😯", "😳", "🤯", "😱", "🙀", "⁉️"],
        patterns: &[r"[!?！？]+", r"。。+", r"ええ[!?！？]"],
        weight: 1.1,
    },
];

const CONTEXT_PHRASES: &[(AffectLabel, &[&str])] = &[
    (AffectLabel::Happy, &["よかった", "楽しみ", "期待", "頑張", "がんば", "応援"]),
    (AffectLabel::Sad, &["残念", "ざんねん", "悔しい", "くやしい", "寂しく"]),
    (AffectLabel::Angry, &["許せない", "ゆるせない", "納得いかない"]),
    (AffectLabel::Surprised, &["知らなかった", "しらなかった", "初めて", "はじめて"]),
];

/// Stylistic patterns compiled once, paired with their label and weight.
static PATTERNS: LazyLock<Vec<(AffectLabel, f32, Regex)>> = LazyLock::new(|| {
    LEXICA
        .iter()
        .flat_map(|lex| {
            lex.patterns
                .iter()
                .map(move |p| (lex.label, lex.weight, Regex::new(p).unwrap()))
        })
        .collect()
});

/// Everything except kana, CJK ideographs, word characters and whitespace.
static RE_NOISE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"[^\x{3040}-\x{309F}\x{30A0}-\x{30FF}\x{4E00}-\x{9FAF}\w\s]").unwrap()
});

/// Build the comparison string used for keyword and phrase matching.
///
/// Strips punctuation and emoji, folds full-width ASCII letters and digits to
/// half-width, then lowercases.
pub fn normalize_text(text: &str) -> String {
    let stripped = RE_NOISE.replace_all(text, "");
    stripped
        .chars()
        .map(fold_width)
        .collect::<String>()
        .to_lowercase()
}

fn fold_width(c: char) -> char {
    match c {
        '０'..='９' | 'Ａ'..='Ｚ' | 'ａ'..='ｚ' => {
            char::from_u32(c as u32 - 0xFEE0).unwrap_or(c)
        }
        _ => c,
    }
}

/// Raw per-label scores before thresholding, indexed by [`AffectLabel::index`].
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct AffectScores(pub [f32; AffectLabel::COUNT]);

impl AffectScores {
    pub fn get(&self, label: AffectLabel) -> f32 {
        self.0[label.index()]
    }

    fn add(&mut self, label: AffectLabel, amount: f32) {
        self.0[label.index()] += amount;
    }

    /// Highest-scoring label; ties go to the earlier label in declaration order.
    pub fn leader(&self) -> (AffectLabel, f32) {
        let mut best = (AffectLabel::ALL[0], self.0[0]);
        for label in AffectLabel::ALL.into_iter().skip(1) {
            let score = self.get(label);
            if score > best.1 {
                best = (label, score);
            }
        }
        best
    }

    /// Best score among every label except `leader`.
    pub fn runner_up(&self, leader: AffectLabel) -> f32 {
        AffectLabel::ALL
            .into_iter()
            .filter(|l| *l != leader)
            .map(|l| self.get(l))
            .fold(f32::NEG_INFINITY, f32::max)
    }
}

/// Deterministic lexical classifier. Holds only tunables, no per-call state.
#[derive(Debug, Clone, Default)]
pub struct LexicalClassifier {
    config: ClassifierConfig,
}

impl LexicalClassifier {
    pub fn new(config: ClassifierConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &ClassifierConfig {
        &self.config
    }

    /// Accumulate raw scores, including the short-utterance boost.
    pub fn score(&self, text: &str) -> AffectScores {
        let mut scores = AffectScores::default();
        if text.is_empty() {
            return scores;
        }

        let normalized = normalize_text(text);

        for lex in LEXICA {
            let keyword_hits = lex.keywords.iter().filter(|k| normalized.contains(*k)).count();
            let emoji_hits = lex.emojis.iter().filter(|e| text.contains(*e)).count();
            scores.add(lex.label, keyword_hits as f32 * KEYWORD_SCORE * lex.weight);
            scores.add(lex.label, emoji_hits as f32 * EMOJI_SCORE * lex.weight);
        }

        for (label, weight, re) in PATTERNS.iter() {
            if re.is_match(text) {
                scores.add(*label, PATTERN_SCORE * weight);
            }
        }

        for (label, phrases) in CONTEXT_PHRASES {
            let hits = phrases.iter().filter(|p| normalized.contains(*p)).count();
            scores.add(*label, hits as f32 * CONTEXT_SCORE);
        }

        if text.chars().count() < self.config.short_text_chars {
            let (leader, best) = scores.leader();
            if best > 0.0 {
                scores.0[leader.index()] *= self.config.short_text_boost;
            }
        }

        scores
    }

    /// Classify a message. Never fails; affect-free input yields `{neutral, 0.5}`.
    pub fn classify(&self, text: &str) -> ClassificationResult {
        if text.is_empty() {
            return ClassificationResult::neutral();
        }

        let scores = self.score(text);
        let (label, best) = scores.leader();

        if best < self.config.min_score {
            tracing::debug!(?scores, "no affect above threshold, resolving neutral");
            return ClassificationResult::neutral();
        }

        let mut confidence = (best / self.config.confidence_scale).min(1.0);
        if best - scores.runner_up(label) < self.config.ambiguity_gap {
            confidence *= self.config.ambiguity_penalty;
        }

        tracing::debug!(%label, confidence, ?scores, "lexical classification");
        ClassificationResult::new(label, confidence)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn classify(text: &str) -> ClassificationResult {
        LexicalClassifier::default().classify(text)
    }

    #[test]
    fn test_empty_text_is_neutral_half() {
        assert_eq!(classify(""), ClassificationResult::neutral());
    }

    #[test]
    fn test_thanks_with_exclamations_is_happy() {
        // ありがとう + ありがと keywords, ！+ pattern; short-text boost applies
        let r = classify("ありがとう！！");
        assert_eq!(r.label, AffectLabel::Happy);
        assert!(r.confidence > 0.5, "got {}", r.confidence);
        assert!((r.confidence - 0.78).abs() < 1e-4, "got {}", r.confidence);
    }

    #[test]
    fn test_ascii_ellipsis_matches_sad_pattern() {
        // trailing "..." is a sad pattern: 1.0 * 1.2, boosted to 1.44 (short text)
        let r = classify("...");
        assert_eq!(r.label, AffectLabel::Sad);
        assert!((r.confidence - 0.144).abs() < 1e-4, "got {}", r.confidence);
    }

    #[test]
    fn test_unicode_ellipsis_matches_sad_pattern() {
        let r = classify("…");
        assert_eq!(r.label, AffectLabel::Sad);
    }

    #[test]
    fn test_plain_text_is_neutral() {
        // no keyword, emoji or pattern hits
        let r = classify("今日は晴れ");
        assert_eq!(r, ClassificationResult::neutral());
    }

    #[test]
    fn test_emoji_only_counts_against_original() {
        let r = classify("😡");
        assert_eq!(r.label, AffectLabel::Angry);
    }

    #[test]
    fn test_normalize_strips_punctuation_and_folds_width() {
        assert_eq!(normalize_text("ＡＢＣ１２３！"), "abc123");
        assert_eq!(normalize_text("嬉しい😊。"), "嬉しい");
        assert_eq!(normalize_text("Hello, World"), "hello world");
    }

    #[test]
    fn test_short_text_boost_only_for_short_input() {
        let classifier = LexicalClassifier::default();
        let short = classifier.score("悲しい");
        let long = classifier.score("悲しい話を今日はゆっくり聞いてください");
        assert!(short.get(AffectLabel::Sad) > long.get(AffectLabel::Sad));
    }

    #[test]
    fn test_ambiguity_penalty_when_scores_close() {
        // one happy keyword (2.6) vs one sad keyword (2.4): gap < 1.0
        let classifier = LexicalClassifier::default();
        let text = "嬉しいけど悲しい気持ちがずっと続いている";
        let scores = classifier.score(text);
        assert!((scores.get(AffectLabel::Happy) - 2.6).abs() < 1e-4);
        assert!((scores.get(AffectLabel::Sad) - 2.4).abs() < 1e-4);
        let r = classifier.classify(text);
        assert_eq!(r.label, AffectLabel::Happy);
        assert!((r.confidence - 0.26 * 0.8).abs() < 1e-4, "got {}", r.confidence);
    }

    #[test]
    fn test_tie_breaks_by_declaration_order() {
        let scores = AffectScores([1.0, 1.0, 0.0, 0.0, 0.0]);
        assert_eq!(scores.leader().0, AffectLabel::Happy);
        let scores = AffectScores([0.0, 0.0, 2.0, 2.0, 0.0]);
        assert_eq!(scores.leader().0, AffectLabel::Angry);
    }

    #[test]
    fn test_context_phrase_adds_flat_half() {
        let classifier = LexicalClassifier::default();
        let scores = classifier.score("それは本当に残念だったと思うけれど仕方ない");
        // 残念 (+0.5); 本当 is a surprised keyword
        assert!((scores.get(AffectLabel::Sad) - 0.5).abs() < 1e-4);
    }

    #[test]
    fn test_classify_is_deterministic() {
        let text = "びっくりした！本当にすごい😲";
        assert_eq!(classify(text), classify(text));
    }

    #[test]
    fn test_confidence_capped_at_one() {
        let r = classify("嬉しい楽しい幸せ最高ありがとう感謝感動😊🎉✨");
        assert_eq!(r.label, AffectLabel::Happy);
        assert_eq!(r.confidence, 1.0);
    }
}
