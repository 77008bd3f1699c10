use crate::error::ConfigError;
use crate::language::Language;
use crate::topic::TopicTag;
use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::Path;

// ============================================================================
// Top-level config
// ============================================================================

/// Tunables for every component of the persona engine.
///
/// The thresholds here are empirically chosen; they are exposed so they can be
/// tuned without touching the algorithms.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    pub classifier: ClassifierConfig,
    pub mental: MentalConfig,
    pub transition: TransitionConfig,
    pub suggestions: SuggestionConfig,
    pub cues: CueConfig,
    pub persona: PersonaConfig,
}

impl EngineConfig {
    /// Load config from a TOML file, falling back to defaults for missing fields.
    /// After loading, env var overrides are applied and the result is validated.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path.as_ref())
            .with_context(|| format!("Failed to read config file: {}", path.as_ref().display()))?;
        let mut config: EngineConfig =
            toml::from_str(&content).with_context(|| "Failed to parse TOML config")?;
        config.apply_env_overrides();
        config.validate()?;
        Ok(config)
    }

    /// Try to load from path; if the file is missing or invalid, return defaults with env overrides.
    pub fn load_or_default<P: AsRef<Path>>(path: P) -> Self {
        match Self::load(path) {
            Ok(cfg) => cfg,
            Err(e) => {
                tracing::info!("Config file not found or invalid ({:#}), using defaults", e);
                let mut cfg = Self::default();
                cfg.apply_env_overrides();
                if let Err(e) = cfg.validate() {
                    tracing::warn!("Ignoring env overrides: {}", e);
                    cfg = Self::default();
                }
                cfg
            }
        }
    }

    /// Apply environment variable overrides on top of file-based config.
    fn apply_env_overrides(&mut self) {
        if let Ok(v) = std::env::var("REI_LANGUAGE") {
            match v.parse() {
                Ok(lang) => self.persona.language = lang,
                Err(e) => tracing::warn!("REI_LANGUAGE ignored: {}", e),
            }
        }
        if let Ok(v) = std::env::var("REI_ESCALATION_THRESHOLD") {
            if let Ok(n) = v.parse() {
                self.classifier.escalation_threshold = n;
            }
        }
        if let Ok(v) = std::env::var("REI_FATIGUE_HIGH_WATER") {
            if let Ok(n) = v.parse() {
                self.mental.fatigue_high_water = n;
            }
        }
    }

    /// Check every tunable once, at startup.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let c = &self.classifier;
        check_range("classifier.min_score", c.min_score, 0.0, f32::MAX, ">= 0")?;
        check_range("classifier.confidence_scale", c.confidence_scale, f32::EPSILON, f32::MAX, "> 0")?;
        check_range("classifier.ambiguity_gap", c.ambiguity_gap, 0.0, f32::MAX, ">= 0")?;
        check_range("classifier.ambiguity_penalty", c.ambiguity_penalty, 0.0, 1.0, "0..=1")?;
        check_range("classifier.short_text_boost", c.short_text_boost, 1.0, f32::MAX, ">= 1")?;
        check_range("classifier.escalation_threshold", c.escalation_threshold, 0.0, 1.0, "0..=1")?;

        let m = &self.mental;
        check_range("mental.fatigue_step", m.fatigue_step, 0.0, 100.0, "0..=100")?;
        check_range("mental.fatigue_high_water", m.fatigue_high_water, 0.0, 100.0, "0..=100")?;
        check_range("mental.fatigue_energy_penalty", m.fatigue_energy_penalty, 0.0, 100.0, "0..=100")?;
        check_range("mental.fatigue_patience_penalty", m.fatigue_patience_penalty, 0.0, 100.0, "0..=100")?;
        check_range("mental.energy_floor", m.energy_floor, 0.0, 100.0, "0..=100")?;
        check_range("mental.patience_floor", m.patience_floor, 0.0, 100.0, "0..=100")?;

        let t = &self.transition;
        check_range("transition.low_energy", t.low_energy, 0.0, 100.0, "0..=100")?;
        check_range("transition.high_stress", t.high_stress, 0.0, 100.0, "0..=100")?;

        let q = &self.cues;
        check_range("cues.low_energy", q.low_energy, 0.0, 100.0, "0..=100")?;
        check_range("cues.high_energy", q.high_energy, q.low_energy, 100.0, ">= cues.low_energy")?;

        let s = &self.suggestions;
        if s.max_per_turn == 0 || s.per_category == 0 {
            return Err(ConfigError::OutOfRange {
                field: "suggestions.max_per_turn/per_category",
                value: s.max_per_turn.min(s.per_category) as f32,
                expected: ">= 1",
            });
        }
        if s.warming_from > s.established_from {
            return Err(ConfigError::OutOfRange {
                field: "suggestions.warming_from",
                value: s.warming_from as f32,
                expected: "<= suggestions.established_from",
            });
        }
        Ok(())
    }
}

fn check_range(
    field: &'static str,
    value: f32,
    min: f32,
    max: f32,
    expected: &'static str,
) -> Result<(), ConfigError> {
    if value.is_finite() && value >= min && value <= max {
        Ok(())
    } else {
        Err(ConfigError::OutOfRange { field, value, expected })
    }
}

// ============================================================================
// Sub-configs
// ============================================================================

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct ClassifierConfig {
    /// Best score below this resolves to `{neutral, 0.5}`.
    pub min_score: f32,
    /// confidence = min(best / confidence_scale, 1.0)
    pub confidence_scale: f32,
    /// Top-two gap below which the ambiguity penalty applies.
    pub ambiguity_gap: f32,
    pub ambiguity_penalty: f32,
    /// Texts shorter than this (in chars) get the leading score boosted.
    pub short_text_chars: usize,
    pub short_text_boost: f32,
    /// Lexical confidence below this consults the secondary affect source.
    pub escalation_threshold: f32,
}

impl Default for ClassifierConfig {
    fn default() -> Self {
        Self {
            min_score: 1.0,
            confidence_scale: 10.0,
            ambiguity_gap: 1.0,
            ambiguity_penalty: 0.8,
            short_text_chars: 10,
            short_text_boost: 1.2,
            escalation_threshold: 0.7,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct MentalConfig {
    /// Fatigue added every turn.
    pub fatigue_step: f32,
    /// Above this fatigue the secondary penalty applies.
    pub fatigue_high_water: f32,
    pub fatigue_energy_penalty: f32,
    pub fatigue_patience_penalty: f32,
    pub energy_floor: f32,
    pub patience_floor: f32,
    /// Topics that feed creativity and satisfaction.
    pub core_craft_tags: Vec<String>,
}

impl Default for MentalConfig {
    fn default() -> Self {
        Self {
            fatigue_step: 2.0,
            fatigue_high_water: 70.0,
            fatigue_energy_penalty: 10.0,
            fatigue_patience_penalty: 10.0,
            energy_floor: 20.0,
            patience_floor: 30.0,
            core_craft_tags: vec!["kyoto_yuzen".to_string(), "norioki".to_string()],
        }
    }
}

impl MentalConfig {
    pub fn is_core_craft(&self, topic: &TopicTag) -> bool {
        self.core_craft_tags.iter().any(|t| t == topic.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct TransitionConfig {
    /// Energy below this biases Rei toward neutral.
    pub low_energy: f32,
    /// Stress above this biases Rei toward anger.
    pub high_stress: f32,
}

impl Default for TransitionConfig {
    fn default() -> Self {
        Self {
            low_energy: 30.0,
            high_stress: 70.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct SuggestionConfig {
    pub max_per_turn: usize,
    /// Most suggestions taken from one category per walk.
    pub per_category: usize,
    /// Turn count at which the "warming" category order starts.
    pub warming_from: u32,
    /// Turn count at which the "established" category order starts.
    pub established_from: u32,
}

impl Default for SuggestionConfig {
    fn default() -> Self {
        Self {
            max_per_turn: 3,
            per_category: 2,
            warming_from: 3,
            established_from: 6,
        }
    }
}

/// Energy bands selecting the phrase-bank intensity.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct CueConfig {
    /// Energy below this gives low-intensity phrases.
    pub low_energy: f32,
    /// Energy above this gives high-intensity phrases, for happy only.
    pub high_energy: f32,
}

impl Default for CueConfig {
    fn default() -> Self {
        Self {
            low_energy: 30.0,
            high_energy: 80.0,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct PersonaConfig {
    pub language: Language,
}

// ============================================================================
// Tests
// ============================================================================
