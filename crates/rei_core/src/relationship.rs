//! Relationship tiers: how familiar Rei is with a visitor.
//!
//! A monotonically increasing conversation counter maps onto six contiguous
//! tiers. Each tier carries a tone key that drives greetings and the tone
//! directive injected into generation prompts.

use crate::error::ConfigError;
use crate::language::Language;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Register Rei speaks in at a given tier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ToneKey {
    Formal,
    SlightlyCasual,
    Casual,
    Friendly,
    Friend,
    Bestfriend,
}

impl ToneKey {
    pub fn as_str(&self) -> &'static str {
        match self {
            ToneKey::Formal => "formal",
            ToneKey::SlightlyCasual => "slightly_casual",
            ToneKey::Casual => "casual",
            ToneKey::Friendly => "friendly",
            ToneKey::Friend => "friend",
            ToneKey::Bestfriend => "bestfriend",
        }
    }

    /// Opening line when a visitor (re)connects.
    pub fn greeting(&self, lang: Language) -> &'static str {
        match (lang, self) {
            (Language::Ja, ToneKey::Formal) => "こんにちは〜！私は京友禅の職人で、手描友禅を15年やっているREIといいます。友禅染のことなら何でも聞いてくださいね。着物や染色について、何か知りたいことはありますか？",
            (Language::Ja, ToneKey::SlightlyCasual) => "あ、また来てくれたんやね！嬉しいわ〜。今日は何について話そうか？",
            (Language::Ja, ToneKey::Casual) => "おっ、来たね〜！最近どう？今日も友禅の話でもする？",
            (Language::Ja, ToneKey::Friendly) => "やっほー！いつもありがとうね。今日は何が聞きたい？なんでも答えるで〜",
            (Language::Ja, ToneKey::Friend) => "お〜！来たか〜！もう友達みたいなもんやね。今日は何の話する？",
            (Language::Ja, ToneKey::Bestfriend) => "きたきた〜！待ってたで！もう何でも話せる仲やもんね。調子どう？",
            (Language::En, ToneKey::Formal) => "Hello! I am Rei, a Kyoto Yuzen artisan with 15 years of experience in hand-painted Yuzen. Please feel free to ask me anything about Yuzen dyeing, kimono, or traditional textile arts.",
            (Language::En, ToneKey::SlightlyCasual) => "Oh, you're back! I'm happy to see you again. What shall we talk about today?",
            (Language::En, ToneKey::Casual) => "Hey there! How have you been? Want to chat about Yuzen again?",
            (Language::En, ToneKey::Friendly) => "Hi hi! Thanks for coming as always. What would you like to know today?",
            (Language::En, ToneKey::Friend) => "Hey friend! We're like buddies now. What's on your mind today?",
            (Language::En, ToneKey::Bestfriend) => "There you are! I've been waiting! We can talk about anything. How are you doing?",
        }
    }

    /// Tone instruction for the text-generation collaborator.
    pub fn directive(&self, lang: Language) -> &'static str {
        match (lang, self) {
            (Language::Ja, ToneKey::Formal) => "【関係性】初対面の相手なので、丁寧で礼儀正しく、敬語を使って話してください。",
            (Language::Ja, ToneKey::SlightlyCasual) => "【関係性】少し親しくなってきた相手なので、まだ丁寧だけど少し親しみを込めて話してください。",
            (Language::Ja, ToneKey::Casual) => "【関係性】顔見知りになった相手なので、親しみやすい口調で、でも失礼にならない程度に話してください。",
            (Language::Ja, ToneKey::Friendly) => "【関係性】常連さんなので、タメ口も混じる親しい感じで話してください。",
            (Language::Ja, ToneKey::Friend) => "【関係性】友達として、冗談も言える関係で話してください。もうタメ口でOKです。",
            (Language::Ja, ToneKey::Bestfriend) => "【関係性】親友として、何でも話せる関係で話してください。昔からの友達みたいに。",
            (Language::En, ToneKey::Formal) => "[Relationship] This is a first meeting. Be polite and courteous.",
            (Language::En, ToneKey::SlightlyCasual) => "[Relationship] You are getting to know each other. Stay polite but add some warmth.",
            (Language::En, ToneKey::Casual) => "[Relationship] You are acquaintances now. Be approachable without being rude.",
            (Language::En, ToneKey::Friendly) => "[Relationship] This is a regular visitor. Speak in a friendly, relaxed way.",
            (Language::En, ToneKey::Friend) => "[Relationship] You are friends. Jokes and casual speech are fine.",
            (Language::En, ToneKey::Bestfriend) => "[Relationship] You are best friends. Talk like old friends who can share anything.",
        }
    }
}

impl fmt::Display for ToneKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One familiarity stage, covering `min_turns..=max_turns` conversations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct RelationshipTier {
    pub level: u8,
    pub name: &'static str,
    pub tone: ToneKey,
    pub min_turns: u32,
    /// `None` means unbounded.
    pub max_turns: Option<u32>,
}

impl RelationshipTier {
    pub fn contains(&self, turns: u32) -> bool {
        turns >= self.min_turns && self.max_turns.map_or(true, |max| turns <= max)
    }
}

/// The static tier table, ordered and contiguous over `[0, ∞)`.
pub const TIERS: [RelationshipTier; 6] = [
    RelationshipTier { level: 0, name: "初対面", tone: ToneKey::Formal, min_turns: 0, max_turns: Some(0) },
    RelationshipTier { level: 1, name: "興味あり", tone: ToneKey::SlightlyCasual, min_turns: 1, max_turns: Some(2) },
    RelationshipTier { level: 2, name: "知り合い", tone: ToneKey::Casual, min_turns: 3, max_turns: Some(4) },
    RelationshipTier { level: 3, name: "お友達", tone: ToneKey::Friendly, min_turns: 5, max_turns: Some(7) },
    RelationshipTier { level: 4, name: "友禅マスター", tone: ToneKey::Friend, min_turns: 8, max_turns: Some(10) },
    RelationshipTier { level: 5, name: "親友", tone: ToneKey::Bestfriend, min_turns: 11, max_turns: None },
];

/// Resolve the tier for a conversation count from the built-in table.
pub fn level_for(turns: u32) -> &'static RelationshipTier {
    level_in(&TIERS, turns).unwrap_or(&TIERS[0])
}

/// Resolve against an arbitrary table: scan from the highest threshold down and
/// return the first tier with `min_turns <= turns`.
///
/// A validated table never reaches the fallback. A misconfigured one falls back
/// to its first tier; an empty one yields `None`.
pub fn level_in(tiers: &[RelationshipTier], turns: u32) -> Option<&RelationshipTier> {
    let found = tiers.iter().rev().find(|tier| tier.min_turns <= turns);
    if found.is_none() {
        tracing::warn!(turns, "no relationship tier matched, falling back to the first tier");
    }
    found.or_else(|| tiers.first())
}

/// Check that tiers start at 0, are contiguous and end unbounded.
pub fn validate_tiers(tiers: &[RelationshipTier]) -> Result<(), ConfigError> {
    let first = tiers.first().ok_or(ConfigError::TierTableEmpty)?;
    if first.min_turns != 0 {
        return Err(ConfigError::TierTableOffset(first.min_turns));
    }

    for pair in tiers.windows(2) {
        let (prev, next) = (&pair[0], &pair[1]);
        let Some(prev_max) = prev.max_turns else {
            return Err(ConfigError::UnboundedTierNotLast(prev.level));
        };
        let expected = prev_max.saturating_add(1);
        if next.min_turns != expected {
            return Err(ConfigError::NonContiguousTiers {
                level: next.level,
                expected,
                found: next.min_turns,
            });
        }
    }

    // non-empty: checked above
    let last = &tiers[tiers.len() - 1];
    if last.max_turns.is_some() {
        return Err(ConfigError::TierTableNotTotal(last.level));
    }
    Ok(())
}
