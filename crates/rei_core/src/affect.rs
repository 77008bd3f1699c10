//! Affect labels and per-message classification results.
//!
//! Affect is a closed set of five coarse moods. The same label set describes
//! both the user's message and Rei's own emotion, so a classification can be
//! fed straight into the transition engine.

use crate::language::Language;
use crate::state::deserialize_safe_f32;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// A coarse mood category.
///
/// Declaration order is significant: it is the tie-break priority used by the
/// classifier and the column order of the transition table.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum AffectLabel {
    Happy,
    Sad,
    Angry,
    Surprised,
    #[default]
    Neutral,
}

impl AffectLabel {
    /// All labels in tie-break priority order.
    pub const ALL: [AffectLabel; 5] = [
        AffectLabel::Happy,
        AffectLabel::Sad,
        AffectLabel::Angry,
        AffectLabel::Surprised,
        AffectLabel::Neutral,
    ];

    pub const COUNT: usize = Self::ALL.len();

    /// Position in [`AffectLabel::ALL`].
    pub fn index(&self) -> usize {
        match self {
            AffectLabel::Happy => 0,
            AffectLabel::Sad => 1,
            AffectLabel::Angry => 2,
            AffectLabel::Surprised => 3,
            AffectLabel::Neutral => 4,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            AffectLabel::Happy => "happy",
            AffectLabel::Sad => "sad",
            AffectLabel::Angry => "angry",
            AffectLabel::Surprised => "surprised",
            AffectLabel::Neutral => "neutral",
        }
    }

    /// How the previous turn's emotion carries into the next reply.
    /// Injected into the generation prompt as an emotional-continuity hint.
    pub fn continuity_hint(&self, lang: Language) -> &'static str {
        match (lang, self) {
            (Language::Ja, AffectLabel::Happy) => {
                "前回は楽しく話していました。まだその余韻が残っていて、笑顔で話し始める。"
            }
            (Language::Ja, AffectLabel::Sad) => {
                "前回は少し寂しそうでした。まだ気持ちが沈んでいるかもしれないが、話すうちに元気を取り戻していく。"
            }
            (Language::Ja, AffectLabel::Angry) => {
                "前回は少しイライラしていました。もう落ち着いていて、いつもの優しさを取り戻している。"
            }
            (Language::Ja, AffectLabel::Surprised) => {
                "前回は驚いていました。まだその話題について考えていて、興奮が少し残っている。"
            }
            (Language::Ja, AffectLabel::Neutral) => {
                "前回は普通に話していました。安定した精神状態で、自然体で話す。"
            }
            (Language::En, AffectLabel::Happy) => {
                "Last time you were enjoying the conversation. The afterglow lingers; start with a smile."
            }
            (Language::En, AffectLabel::Sad) => {
                "Last time you seemed a little lonely. You may still feel low, but you recover as you talk."
            }
            (Language::En, AffectLabel::Angry) => {
                "Last time you were a bit irritated. You have calmed down and your usual kindness is back."
            }
            (Language::En, AffectLabel::Surprised) => {
                "Last time you were surprised. You are still mulling it over and a little excited."
            }
            (Language::En, AffectLabel::Neutral) => {
                "Last time you talked as usual. Stay steady and natural."
            }
        }
    }
}

impl fmt::Display for AffectLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Returned when a string is not one of the five affect labels.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown affect label: {0:?}")]
pub struct UnknownAffect(pub String);

impl FromStr for AffectLabel {
    type Err = UnknownAffect;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let needle = s.trim().trim_matches(|c: char| !c.is_alphanumeric());
        AffectLabel::ALL
            .into_iter()
            .find(|label| label.as_str().eq_ignore_ascii_case(needle))
            .ok_or_else(|| UnknownAffect(s.to_string()))
    }
}

/// Label plus confidence for one message. Never mutated after creation.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ClassificationResult {
    pub label: AffectLabel,

    /// Confidence in `[0.0, 1.0]`
    #[serde(deserialize_with = "deserialize_safe_f32")]
    pub confidence: f32,
}

impl ClassificationResult {
    /// Confidence reported when nothing in the text carried affect.
    pub const NEUTRAL_CONFIDENCE: f32 = 0.5;

    pub fn new(label: AffectLabel, confidence: f32) -> Self {
        let confidence = if confidence.is_finite() {
            confidence.clamp(0.0, 1.0)
        } else {
            0.0
        };
        Self { label, confidence }
    }

    /// The `{neutral, 0.5}` outcome for empty or affect-free input.
    pub fn neutral() -> Self {
        Self {
            label: AffectLabel::Neutral,
            confidence: Self::NEUTRAL_CONFIDENCE,
        }
    }
}

impl Default for ClassificationResult {
    fn default() -> Self {
        Self::neutral()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_index_matches_declaration_order() {
        for (i, label) in AffectLabel::ALL.iter().enumerate() {
            assert_eq!(label.index(), i);
        }
    }

    #[test]
    fn test_parse_labels() {
        assert_eq!("happy".parse::<AffectLabel>().unwrap(), AffectLabel::Happy);
        assert_eq!(" Surprised\n".parse::<AffectLabel>().unwrap(), AffectLabel::Surprised);
        assert_eq!("\"angry\".".parse::<AffectLabel>().unwrap(), AffectLabel::Angry);
        assert!("excited".parse::<AffectLabel>().is_err());
        assert!("".parse::<AffectLabel>().is_err());
    }

    #[test]
    fn test_display_roundtrip() {
        for label in AffectLabel::ALL {
            assert_eq!(label.to_string().parse::<AffectLabel>().unwrap(), label);
        }
    }

    #[test]
    fn test_result_clamps_confidence() {
        assert_eq!(ClassificationResult::new(AffectLabel::Happy, 3.0).confidence, 1.0);
        assert_eq!(ClassificationResult::new(AffectLabel::Sad, -1.0).confidence, 0.0);
        assert_eq!(ClassificationResult::new(AffectLabel::Sad, f32::NAN).confidence, 0.0);
    }

    #[test]
    fn test_neutral_result() {
        let r = ClassificationResult::neutral();
        assert_eq!(r.label, AffectLabel::Neutral);
        assert_eq!(r.confidence, 0.5);
        assert_eq!(ClassificationResult::default(), r);
    }

    #[test]
    fn test_serde_lowercase_labels() {
        let r = ClassificationResult::new(AffectLabel::Surprised, 0.25);
        let json = serde_json::to_string(&r).unwrap();
        assert!(json.contains("\"surprised\""), "got {}", json);
        let back: ClassificationResult = serde_json::from_str(&json).unwrap();
        assert_eq!(back, r);
    }

    #[test]
    fn test_continuity_hint_per_language() {
        assert!(AffectLabel::Happy.continuity_hint(Language::Ja).contains("笑顔"));
        assert!(AffectLabel::Angry.continuity_hint(Language::En).contains("calmed"));
    }
}
