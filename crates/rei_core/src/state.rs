//! Rei's mental state: eight bounded traits that drift turn by turn.
//!
//! Every trait lives on a 0–100 scale. The state is a plain value owned by the
//! caller and passed turn to turn; nothing here aliases it globally.

use crate::language::Language;
use serde::{Deserialize, Deserializer, Serialize};

/// Lower bound of every mental-state trait.
pub const TRAIT_MIN: f32 = 0.0;
/// Upper bound of every mental-state trait.
pub const TRAIT_MAX: f32 = 100.0;

/// Deserialize an f32, mapping `null`, NaN and infinities to 0.0.
pub fn deserialize_safe_f32<'de, D>(deserializer: D) -> Result<f32, D::Error>
where
    D: Deserializer<'de>,
{
    let v = Option::<f32>::deserialize(deserializer)?.unwrap_or(0.0);
    Ok(if v.is_finite() { v } else { 0.0 })
}

/// Guard against NaN and Infinity in state values.
/// If the value is NaN or Inf, replace with the provided fallback (the default trait value).
#[inline]
fn sanitize_f32(v: f32, fallback: f32) -> f32 {
    if v.is_finite() {
        v
    } else {
        tracing::warn!("NaN/Inf detected in mental state, resetting to fallback {}", fallback);
        fallback
    }
}

/// Clamp a trait into `[0, 100]`.
#[inline]
pub fn clamp_trait(v: f32) -> f32 {
    v.clamp(TRAIT_MIN, TRAIT_MAX)
}

/// Bounded mental-state vector.
///
/// Invariant: after any update function runs, every trait is within `[0, 100]`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MentalState {
    /// Vitality; decays with the time of day and with accumulated fatigue
    #[serde(deserialize_with = "deserialize_safe_f32")]
    pub energy: f32,

    /// Rises with hostile input
    #[serde(deserialize_with = "deserialize_safe_f32")]
    pub stress: f32,

    /// Willingness to open up; sad users make Rei more empathetic
    #[serde(deserialize_with = "deserialize_safe_f32")]
    pub openness: f32,

    #[serde(deserialize_with = "deserialize_safe_f32")]
    pub patience: f32,

    /// Fed by talking about the craft itself
    #[serde(deserialize_with = "deserialize_safe_f32")]
    pub creativity: f32,

    #[serde(deserialize_with = "deserialize_safe_f32")]
    pub loneliness: f32,

    /// Satisfaction with the work
    #[serde(deserialize_with = "deserialize_safe_f32")]
    pub satisfaction: f32,

    /// Physical fatigue; grows by a fixed step every turn
    #[serde(deserialize_with = "deserialize_safe_f32")]
    pub fatigue: f32,

    /// How many fatigue-themed lines have actually been surfaced.
    /// Written only by the response-shaping layer, never by the dynamics.
    #[serde(default)]
    pub fatigue_expressed_count: u32,
}

impl Default for MentalState {
    fn default() -> Self {
        Self {
            energy: 80.0,
            stress: 20.0,
            openness: 70.0,
            patience: 90.0,
            creativity: 85.0,
            loneliness: 30.0,
            satisfaction: 90.0,
            fatigue: 20.0,
            fatigue_expressed_count: 0,
        }
    }
}

impl MentalState {
    /// Sanitize and clamp every trait to `[0, 100]`.
    pub fn normalize(&mut self) {
        let d = Self::default();
        self.energy = clamp_trait(sanitize_f32(self.energy, d.energy));
        self.stress = clamp_trait(sanitize_f32(self.stress, d.stress));
        self.openness = clamp_trait(sanitize_f32(self.openness, d.openness));
        self.patience = clamp_trait(sanitize_f32(self.patience, d.patience));
        self.creativity = clamp_trait(sanitize_f32(self.creativity, d.creativity));
        self.loneliness = clamp_trait(sanitize_f32(self.loneliness, d.loneliness));
        self.satisfaction = clamp_trait(sanitize_f32(self.satisfaction, d.satisfaction));
        self.fatigue = clamp_trait(sanitize_f32(self.fatigue, d.fatigue));
    }

    /// Named view of the eight bounded traits.
    pub fn traits(&self) -> [(&'static str, f32); 8] {
        [
            ("energy", self.energy),
            ("stress", self.stress),
            ("openness", self.openness),
            ("patience", self.patience),
            ("creativity", self.creativity),
            ("loneliness", self.loneliness),
            ("satisfaction", self.satisfaction),
            ("fatigue", self.fatigue),
        ]
    }

    /// True when every trait is finite and within `[0, 100]`.
    pub fn is_bounded(&self) -> bool {
        self.traits()
            .iter()
            .all(|(_, v)| v.is_finite() && (TRAIT_MIN..=TRAIT_MAX).contains(v))
    }

    /// Record that a fatigue-themed line was surfaced to the user.
    pub fn record_fatigue_expressed(&mut self) {
        self.fatigue_expressed_count = self.fatigue_expressed_count.saturating_add(1);
    }

    /// Generate a natural language description for prompt injection.
    /// NOTE: This describes how the state should color the reply, in bands.
    pub fn describe(&self, lang: Language) -> String {
        let energy = match (lang, self.energy) {
            (Language::Ja, e) if e > 70.0 => "元気いっぱい",
            (Language::Ja, e) if e > 40.0 => "普通",
            (Language::Ja, _) => "少し元気がない",
            (Language::En, e) if e > 70.0 => "full of energy",
            (Language::En, e) if e > 40.0 => "normal",
            (Language::En, _) => "a little low on energy",
        };
        let stress = match (lang, self.stress) {
            (Language::Ja, s) if s < 30.0 => "リラックスしている",
            (Language::Ja, s) if s < 60.0 => "少し緊張",
            (Language::Ja, _) => "ストレスを感じている",
            (Language::En, s) if s < 30.0 => "relaxed",
            (Language::En, s) if s < 60.0 => "slightly tense",
            (Language::En, _) => "stressed",
        };
        let openness = match (lang, self.openness) {
            (Language::Ja, o) if o > 70.0 => "とても打ち解けている",
            (Language::Ja, o) if o > 40.0 => "普通に接している",
            (Language::Ja, _) => "少し警戒している",
            (Language::En, o) if o > 70.0 => "very open",
            (Language::En, o) if o > 40.0 => "friendly as usual",
            (Language::En, _) => "a little guarded",
        };

        match lang {
            Language::Ja => format!(
                "【現在の内面状態】\n- エネルギー: {:.0}%（{}）\n- ストレス: {:.0}%（{}）\n- 心の開放度: {:.0}%（{}）\n- 身体的疲労: {:.0}%",
                self.energy, energy, self.stress, stress, self.openness, openness, self.fatigue
            ),
            Language::En => format!(
                "[Current inner state]\n- Energy: {:.0}% ({})\n- Stress: {:.0}% ({})\n- Openness: {:.0}% ({})\n- Physical fatigue: {:.0}%",
                self.energy, energy, self.stress, stress, self.openness, openness, self.fatigue
            ),
        }
    }
}
