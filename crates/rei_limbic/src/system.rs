//! The per-turn persona pipeline.
//!
//! One user message flows through every component in a fixed order:
//! classify → update mental state → draw Rei's next emotion → resolve the
//! relationship tier → pick suggestions. The engine holds only validated
//! tables and tunables; the conversation state comes in with the turn and an
//! updated copy goes back out.

use crate::conversation::ConversationState;
use crate::transition::{TransitionEngine, TransitionTable};
use crate::voice::VoiceProfile;
use rand::Rng;
use rei_core::relationship::{validate_tiers, TIERS};
use rei_core::source::AffectSource;
use rei_core::{
    classify_with_escalation, extract_topic, level_for, Adopted, AffectLabel, Arbitration,
    ClassificationResult, ConfigError, DefaultDynamics, Dynamics, EngineConfig, Language,
    LexicalClassifier, MentalState, RelationshipTier, Stimulus, TimeOfDay, TopicTag,
};
use rei_expression::{repeat_hint, ResponseCues, SuggestionCategory, SuggestionEngine};
use serde::Serialize;

/// One user message plus the wall-clock context it arrived in.
#[derive(Debug, Clone)]
pub struct TurnInput {
    pub text: String,
    pub time_of_day: TimeOfDay,
}

impl TurnInput {
    /// Input stamped with the current local time of day.
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            time_of_day: TimeOfDay::now(),
        }
    }

    pub fn at_hour(text: impl Into<String>, hour: u32) -> Self {
        Self {
            text: text.into(),
            time_of_day: TimeOfDay::from_hour(hour),
        }
    }
}

/// Everything one turn produced.
#[derive(Debug, Clone, Serialize)]
pub struct TurnOutcome {
    /// The user's affect after arbitration
    pub classification: ClassificationResult,
    pub adopted: Adopted,
    pub secondary: Option<AffectLabel>,
    pub topic: TopicTag,
    /// Rei's emotion going into this turn
    pub prior_emotion: AffectLabel,
    /// Rei's emotion for her reply
    pub emotion: AffectLabel,
    pub mental: MentalState,
    pub tier: RelationshipTier,
    pub suggestions: Vec<String>,
    pub cues: ResponseCues,
    /// How many times this question has now been asked
    pub question_count: u32,
    pub repeat_hint: Option<&'static str>,
    pub voice: VoiceProfile,
    /// Updated state for the caller to store
    pub state: ConversationState,
}

impl TurnOutcome {
    /// Prompt fragment for the text-generation collaborator.
    pub fn prompt_context(&self, lang: Language) -> String {
        let mut parts = vec![
            self.tier.tone.directive(lang).to_string(),
            self.mental.describe(lang),
            self.prior_emotion.continuity_hint(lang).to_string(),
            self.cues.render(self.emotion, lang),
        ];
        if let Some(hint) = self.repeat_hint {
            parts.push(hint.to_string());
        }
        parts.join("\n\n")
    }
}

/// Runs turns against validated tables.
pub struct PersonaEngine {
    config: EngineConfig,
    classifier: LexicalClassifier,
    dynamics: Box<dyn Dynamics>,
    transitions: TransitionEngine,
    suggestions: SuggestionEngine,
}

impl PersonaEngine {
    /// Build an engine with the built-in tables, validating everything once.
    pub fn new(config: EngineConfig) -> Result<Self, ConfigError> {
        let lang = config.persona.language;
        let catalog = rei_expression::builtin_catalog(lang);
        Self::with_catalog(config, catalog)
    }

    pub fn with_catalog(
        config: EngineConfig,
        catalog: Vec<SuggestionCategory>,
    ) -> Result<Self, ConfigError> {
        config.validate()?;
        validate_tiers(&TIERS)?;
        let transitions =
            TransitionEngine::new(TransitionTable::default(), config.transition.clone())?;
        let suggestions = SuggestionEngine::new(config.suggestions.clone(), catalog)?;

        tracing::info!(
            language = %config.persona.language,
            suggestions = suggestions.pool_size(),
            "persona engine ready"
        );

        Ok(Self {
            classifier: LexicalClassifier::new(config.classifier.clone()),
            dynamics: Box::new(DefaultDynamics::new(config.mental.clone())),
            transitions,
            suggestions,
            config,
        })
    }

    /// Replace the state dynamics.
    pub fn with_dynamics(mut self, dynamics: impl Dynamics + 'static) -> Self {
        self.dynamics = Box::new(dynamics);
        self
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn language(&self) -> Language {
        self.config.persona.language
    }

    pub fn classifier(&self) -> &LexicalClassifier {
        &self.classifier
    }

    /// Greeting for a (re)connecting visitor at their current tier.
    pub fn greeting(&self, conv: &ConversationState) -> &'static str {
        level_for(conv.turn_count).tone.greeting(self.language())
    }

    /// Run one turn with the lexical classifier only.
    pub fn process_turn<R: Rng + ?Sized>(
        &self,
        conv: &ConversationState,
        input: &TurnInput,
        rng: &mut R,
    ) -> TurnOutcome {
        let arbitration = Arbitration {
            result: self.classifier.classify(&input.text),
            adopted: Adopted::Lexical,
            secondary: None,
        };
        self.complete_turn(conv, input, arbitration, rng)
    }

    /// Run one turn, consulting `secondary` when lexical confidence is low.
    pub async fn process_turn_escalated<R: Rng + ?Sized>(
        &self,
        conv: &ConversationState,
        input: &TurnInput,
        secondary: &dyn AffectSource,
        rng: &mut R,
    ) -> TurnOutcome {
        let arbitration = classify_with_escalation(
            &self.classifier,
            secondary,
            &input.text,
            self.config.classifier.escalation_threshold,
        )
        .await;
        self.complete_turn(conv, input, arbitration, rng)
    }

    fn complete_turn<R: Rng + ?Sized>(
        &self,
        conv: &ConversationState,
        input: &TurnInput,
        arbitration: Arbitration,
        rng: &mut R,
    ) -> TurnOutcome {
        let lang = self.language();
        let classification = arbitration.result;
        let topic = extract_topic(&input.text);

        let stimulus = Stimulus {
            user_affect: classification.label,
            topic: topic.clone(),
            time_of_day: input.time_of_day,
        };
        let mut mental = self.dynamics.update(&conv.mental, &stimulus);

        let emotion =
            self.transitions
                .next_emotion(conv.prior_emotion, classification.label, &mental, rng);

        // Tier and phase reflect the turns completed before this one
        let tier = *level_for(conv.turn_count);
        let suggestions = self.suggestions.next_suggestions(&conv.shown, conv.turn_count);

        let cues = ResponseCues::shape(&mut mental, emotion, &self.config.cues, lang);

        let mut state = conv.clone();
        let question_count = state.questions.record(&input.text);
        let hint = repeat_hint(question_count, mental.patience, lang);

        state.prior_emotion = emotion;
        state.mental = mental.clone();
        state.turn_count = state.turn_count.saturating_add(1);
        state.shown.extend(suggestions.iter().cloned());
        state.history.push(emotion);

        tracing::info!(
            user = %classification.label,
            confidence = classification.confidence,
            %topic,
            prev = %conv.prior_emotion,
            %emotion,
            tier = tier.level,
            turn = state.turn_count,
            suggestions = suggestions.len(),
            "turn processed"
        );

        TurnOutcome {
            classification,
            adopted: arbitration.adopted,
            secondary: arbitration.secondary,
            topic,
            prior_emotion: conv.prior_emotion,
            emotion,
            voice: VoiceProfile::for_label(emotion),
            mental,
            tier,
            suggestions,
            cues,
            question_count,
            repeat_hint: hint,
            state,
        }
    }
}
