//! rei_bench: trajectory simulations over long conversations.
//!
//! Validates behavior that only shows up across many turns:
//! - Fatigue crossing its high-water mark and the floors that follow
//! - Relationship tiers climbing with the turn counter
//! - The suggestion pool draining without repeats
//! - Emotion frequencies matching the transition table

use rand::Rng;
use rei_core::{Dynamics, MentalState, Stimulus};
use rei_limbic::{ConversationState, PersonaEngine, TurnInput, TurnOutcome};

/// Apply the same stimulus for `turns` turns; returns the state after each turn.
pub fn simulate_state(
    dynamics: &dyn Dynamics,
    start: &MentalState,
    stimulus: &Stimulus,
    turns: usize,
) -> Vec<MentalState> {
    let mut trajectory = Vec::with_capacity(turns);
    let mut state = start.clone();
    for _ in 0..turns {
        state = dynamics.update(&state, stimulus);
        trajectory.push(state.clone());
    }
    trajectory
}

/// Run a scripted conversation through the engine, feeding each turn's state into the next.
pub fn simulate_conversation<R: Rng + ?Sized>(
    engine: &PersonaEngine,
    messages: &[&str],
    hour: u32,
    rng: &mut R,
) -> Vec<TurnOutcome> {
    let mut conv = ConversationState::new();
    let mut outcomes = Vec::with_capacity(messages.len());
    for text in messages {
        let out = engine.process_turn(&conv, &TurnInput::at_hour(*text, hour), rng);
        conv = out.state.clone();
        outcomes.push(out);
    }
    outcomes
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use rei_core::{AffectLabel, DefaultDynamics, EngineConfig, TimeOfDay};
    use rei_limbic::TransitionEngine;

    fn afternoon_neutral() -> Stimulus {
        Stimulus {
            time_of_day: TimeOfDay::Afternoon,
            ..Stimulus::default()
        }
    }

    /// Fatigue starts at 20 and grows by 2 per turn, so it first exceeds 70 on turn 26.
    #[test]
    fn test_fatigue_crosses_high_water_on_turn_26() {
        let dynamics = DefaultDynamics::default();
        let trajectory = simulate_state(&dynamics, &MentalState::default(), &afternoon_neutral(), 40);

        let first = trajectory.iter().position(|s| s.fatigue > 70.0).map(|i| i + 1);
        assert_eq!(first, Some(26));
        assert!((trajectory[24].fatigue - 70.0).abs() < 1e-4);

        // penalty applies from turn 26: patience 90 → 80 → ... floored at 30
        assert!((trajectory[25].patience - 80.0).abs() < 1e-4);
        assert_eq!(trajectory[39].patience, 30.0);
        assert_eq!(trajectory[39].energy, 20.0);
    }

    /// Afternoon decay without any lift drives energy toward zero before fatigue kicks in.
    #[test]
    fn test_energy_decays_then_floors() {
        let dynamics = DefaultDynamics::default();
        let trajectory = simulate_state(&dynamics, &MentalState::default(), &afternoon_neutral(), 30);
        assert!(trajectory[10].energy < 1.0, "energy = {}", trajectory[10].energy);
        assert!(trajectory[29].energy >= 20.0);
        assert!(trajectory.iter().all(MentalState::is_bounded));
    }

    /// A cheerful morning visitor holds energy at the fixed point of e' = 0.8e + 5.
    #[test]
    fn test_happy_morning_converges() {
        let dynamics = DefaultDynamics::default();
        let stimulus = Stimulus {
            user_affect: AffectLabel::Happy,
            time_of_day: TimeOfDay::Morning,
            ..Stimulus::default()
        };
        let trajectory = simulate_state(&dynamics, &MentalState::default(), &stimulus, 24);
        assert!((trajectory[23].energy - 25.0).abs() < 0.5, "energy = {}", trajectory[23].energy);
        assert_eq!(trajectory[23].loneliness, 0.0);
    }

    #[test]
    fn test_tiers_climb_and_never_fall() {
        let engine = PersonaEngine::new(EngineConfig::default()).unwrap();
        let messages = vec!["ふーん"; 30];
        let outcomes = simulate_conversation(&engine, &messages, 14, &mut StdRng::seed_from_u64(5));

        let levels: Vec<u8> = outcomes.iter().map(|o| o.tier.level).collect();
        assert!(levels.windows(2).all(|w| w[0] <= w[1]));
        assert_eq!(levels[0], 0);
        assert_eq!(levels[11], 5);
        assert_eq!(*levels.last().unwrap(), 5);
    }

    #[test]
    fn test_suggestion_pool_drains_without_repeats() {
        let engine = PersonaEngine::new(EngineConfig::default()).unwrap();
        let messages = vec!["なるほど"; 12];
        let outcomes = simulate_conversation(&engine, &messages, 14, &mut StdRng::seed_from_u64(9));

        let sizes: Vec<usize> = outcomes.iter().map(|o| o.suggestions.len()).collect();
        assert_eq!(sizes, vec![3, 3, 3, 3, 3, 3, 2, 0, 0, 0, 0, 0]);

        let mut all: Vec<&String> = outcomes.iter().flat_map(|o| o.suggestions.iter()).collect();
        let total = all.len();
        all.sort();
        all.dedup();
        assert_eq!(all.len(), total);
        assert_eq!(outcomes.last().unwrap().state.shown.len(), 20);
    }

    /// Long-run frequencies from the neutral row match its base weights.
    #[test]
    fn test_emotion_frequencies_match_table() {
        let engine = TransitionEngine::default();
        let state = MentalState::default();
        let mut rng = StdRng::seed_from_u64(2024);
        let draws = 20_000;
        let mut counts = [0usize; AffectLabel::COUNT];
        for _ in 0..draws {
            let next = engine.next_emotion(AffectLabel::Neutral, AffectLabel::Neutral, &state, &mut rng);
            counts[next.index()] += 1;
        }
        let expected = [0.25, 0.1, 0.05, 0.2, 0.4];
        for (label, e) in AffectLabel::ALL.iter().zip(expected) {
            let freq = counts[label.index()] as f32 / draws as f32;
            assert!((freq - e).abs() < 0.02, "{}: {} vs {}", label, freq, e);
        }
    }

    /// Tired and stressed, an angry or sad Rei never turns straight to happy.
    #[test]
    fn test_exhausted_rei_never_turns_happy() {
        let engine = TransitionEngine::default();
        let state = MentalState {
            energy: 5.0,
            stress: 95.0,
            ..MentalState::default()
        };
        let mut rng = StdRng::seed_from_u64(77);
        for prev in [AffectLabel::Angry, AffectLabel::Sad] {
            let dist = engine.distribution(prev, AffectLabel::Neutral, &state);
            assert_eq!(dist.probability(AffectLabel::Happy), 0.0);
            for _ in 0..2_000 {
                let next = engine.next_emotion(prev, AffectLabel::Neutral, &state, &mut rng);
                assert_ne!(next, AffectLabel::Happy);
            }
        }
    }
}
