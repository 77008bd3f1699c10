//! Response-shaping cues for the text-generation collaborator.
//!
//! Picks state-driven lines (fatigue, stress, loneliness) and an emotion phrase
//! bank for the current turn. This is the only place that increments
//! `fatigue_expressed_count`, and only when the fatigue line is surfaced.

use rei_core::config::CueConfig;
use rei_core::{AffectLabel, Language, MentalState};
use serde::Serialize;

/// Energy below this may surface the fatigue line.
pub const FATIGUE_ENERGY: f32 = 40.0;
/// Fatigue is mentioned at most this many times per conversation.
pub const FATIGUE_MAX_EXPRESSIONS: u32 = 1;
pub const STRESS_LINE_ABOVE: f32 = 60.0;
pub const LONELINESS_LINE_ABOVE: f32 = 70.0;
/// At most this many state lines per turn.
pub const MAX_STATE_LINES: usize = 3;

/// How strongly Rei voices her emotion this turn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Intensity {
    Low,
    Medium,
    High,
}

impl Intensity {
    /// Medium unless Rei is drained (low) or brimming and happy (high).
    pub fn for_state(energy: f32, label: AffectLabel, config: &CueConfig) -> Self {
        if energy < config.low_energy {
            Intensity::Low
        } else if energy > config.high_energy && label == AffectLabel::Happy {
            Intensity::High
        } else {
            Intensity::Medium
        }
    }
}

/// Cues for one turn.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ResponseCues {
    /// Lines reflecting the current mental state.
    pub state_lines: Vec<&'static str>,
    pub intensity: Intensity,
    /// Example phrases for the label at this intensity.
    pub phrases: &'static [&'static str],
    /// True when this turn surfaced the fatigue line.
    pub fatigue_expressed: bool,
}

impl ResponseCues {
    /// Build cues for `label` and record a surfaced fatigue line on `state`.
    ///
    /// Intensity reads the energy Rei ends the turn with.
    pub fn shape(
        state: &mut MentalState,
        label: AffectLabel,
        config: &CueConfig,
        lang: Language,
    ) -> Self {
        let mut state_lines = Vec::new();

        let fatigue_expressed = state.energy < FATIGUE_ENERGY
            && state.fatigue_expressed_count < FATIGUE_MAX_EXPRESSIONS;
        if fatigue_expressed {
            state_lines.extend_from_slice(fatigue_lines(lang));
            state.record_fatigue_expressed();
            tracing::debug!(energy = state.energy, "fatigue line surfaced");
        }
        if state.stress > STRESS_LINE_ABOVE {
            state_lines.extend_from_slice(stress_lines(lang));
        }
        if state.loneliness > LONELINESS_LINE_ABOVE {
            state_lines.extend_from_slice(loneliness_lines(lang));
        }
        state_lines.truncate(MAX_STATE_LINES);

        let intensity = Intensity::for_state(state.energy, label, config);
        Self {
            state_lines,
            intensity,
            phrases: phrase_bank(label, intensity, lang),
            fatigue_expressed,
        }
    }

    /// Render as a prompt fragment.
    pub fn render(&self, label: AffectLabel, lang: Language) -> String {
        let mut out = Vec::new();
        let band = match self.intensity {
            Intensity::Low => "low",
            Intensity::Medium => "medium",
            Intensity::High => "high",
        };
        out.push(match lang {
            Language::Ja => format!("【{}の時の表現（{}）】", label, band),
            Language::En => format!("[Expressions for {} ({})]", label, band),
        });
        out.extend(self.phrases.iter().map(|p| format!("- 「{}」", p)));

        if !self.state_lines.is_empty() {
            out.push(match lang {
                Language::Ja => "【現在の精神状態を反映した表現】".to_string(),
                Language::En => "[Expressions reflecting the current state]".to_string(),
            });
            out.extend(self.state_lines.iter().map(|p| format!("- 「{}」", p)));
        }
        out.join("\n")
    }
}

fn fatigue_lines(lang: Language) -> &'static [&'static str] {
    match lang {
        Language::Ja => &["ちょっと疲れてきたかな..."],
        Language::En => &["I'm getting a little tired..."],
    }
}

fn stress_lines(lang: Language) -> &'static [&'static str] {
    match lang {
        Language::Ja => &["ちょっと焦ってきたかも", "深呼吸、深呼吸..."],
        Language::En => &["I might be getting a bit flustered", "Deep breath, deep breath..."],
    }
}

fn loneliness_lines(lang: Language) -> &'static [&'static str] {
    match lang {
        Language::Ja => &["誰かと話せて嬉しいわ", "人と話すのって大事やね"],
        Language::En => &["I'm glad to have someone to talk to", "Talking with people really matters"],
    }
}

/// Phrase bank for a label and band. Angry has no bank of its own and uses neutral.
pub fn phrase_bank(label: AffectLabel, intensity: Intensity, lang: Language) -> &'static [&'static str] {
    use Intensity::*;
    match (lang, label, intensity) {
        (Language::Ja, AffectLabel::Happy, Low) => &["ええ感じやね", "そうやね〜", "ふふっ"],
        (Language::Ja, AffectLabel::Happy, Medium) => &["めっちゃ嬉しいわ〜！", "ほんま？それはよかった！", "わぁ、ええ話やね〜"],
        (Language::Ja, AffectLabel::Happy, High) => &["もう最高やん！", "泣きそうなくらい嬉しい！", "こんな嬉しいこと久しぶりや！"],
        (Language::Ja, AffectLabel::Sad, Low) => &["ちょっと寂しいな", "そうかぁ...", "なんかな..."],
        (Language::Ja, AffectLabel::Sad, Medium) => &["それは辛いね...", "気持ちわかるわ...", "私も同じ気持ちになることあるで"],
        (Language::Ja, AffectLabel::Sad, High) => &["ほんまに悲しいわ...", "涙出そう...", "なんでこんなことに..."],
        (Language::Ja, AffectLabel::Surprised, Low) => &["へー、そうなん？", "ちょっとびっくり", "意外やな"],
        (Language::Ja, AffectLabel::Surprised, Medium) => &["え！ほんまに！？", "まさか〜！", "びっくりやわ〜"],
        (Language::Ja, AffectLabel::Surprised, High) => &["えええ！？信じられへん！", "腰抜かしそうやわ！", "まじで！？嘘やろ！？"],
        (Language::Ja, AffectLabel::Neutral | AffectLabel::Angry, Low) => &["そうやね", "ふんふん", "なるほど"],
        (Language::Ja, AffectLabel::Neutral | AffectLabel::Angry, Medium) => &["そういうことか", "わかるわかる", "確かにな〜"],
        (Language::Ja, AffectLabel::Neutral | AffectLabel::Angry, High) => &["深いなぁ", "考えさせられるわ", "そういう見方もあるんやね"],
        (Language::En, AffectLabel::Happy, Low) => &["That's nice", "I see~", "Hehe"],
        (Language::En, AffectLabel::Happy, Medium) => &["I'm so happy!", "Really? That's great!", "Wow, what a lovely story"],
        (Language::En, AffectLabel::Happy, High) => &["This is the best!", "I could cry, I'm so happy!", "I haven't been this happy in ages!"],
        (Language::En, AffectLabel::Sad, Low) => &["That's a little lonely", "I see...", "Hmm..."],
        (Language::En, AffectLabel::Sad, Medium) => &["That must be hard...", "I know how you feel...", "I feel that way sometimes too"],
        (Language::En, AffectLabel::Sad, High) => &["That's really sad...", "I might cry...", "How did it come to this..."],
        (Language::En, AffectLabel::Surprised, Low) => &["Oh, is that so?", "That's a bit surprising", "Unexpected"],
        (Language::En, AffectLabel::Surprised, Medium) => &["What! Really!?", "No way!", "What a surprise!"],
        (Language::En, AffectLabel::Surprised, High) => &["Whaaat!? I can't believe it!", "I almost fell over!", "Seriously!? You're kidding!"],
        (Language::En, AffectLabel::Neutral | AffectLabel::Angry, Low) => &["Right", "Mm-hm", "I see"],
        (Language::En, AffectLabel::Neutral | AffectLabel::Angry, Medium) => &["So that's how it is", "I get it", "That's true"],
        (Language::En, AffectLabel::Neutral | AffectLabel::Angry, High) => &["That's deep", "That makes me think", "That's one way to see it"],
    }
}
