//! State Dynamics: how one user turn moves the mental state.
//!
//! s' = F(s, i) where:
//! - s = the current mental state
//! - i = the turn stimulus (user affect, topic, time of day)
//!
//! F is a pure function: it returns a new state and leaves the input untouched.
//! Every step clamps to `[0, 100]` before the next one runs.

use crate::affect::AffectLabel;
use crate::config::MentalConfig;
use crate::state::{clamp_trait, MentalState};
use crate::time::TimeOfDay;
use crate::topic::TopicTag;

/// Everything about the current turn that moves the mental state.
#[derive(Debug, Clone, Default)]
pub struct Stimulus {
    pub user_affect: AffectLabel,
    pub topic: TopicTag,
    pub time_of_day: TimeOfDay,
}

/// Trait for implementing state dynamics
pub trait Dynamics: Send + Sync {
    /// Produce the state after one turn.
    fn update(&self, state: &MentalState, stimulus: &Stimulus) -> MentalState;
}

/// Default rule-based dynamics.
#[derive(Debug, Clone, Default)]
pub struct DefaultDynamics {
    pub config: MentalConfig,
}

impl DefaultDynamics {
    pub fn new(config: MentalConfig) -> Self {
        Self { config }
    }

    /// Affect-specific deltas for the user's mood.
    fn apply_affect(s: &mut MentalState, affect: AffectLabel) {
        match affect {
            AffectLabel::Happy => {
                s.energy = clamp_trait(s.energy + 5.0);
                s.satisfaction = clamp_trait(s.satisfaction + 2.0);
                s.loneliness = clamp_trait(s.loneliness - 5.0);
            }
            AffectLabel::Sad => {
                // Sad users make Rei more empathetic
                s.openness = clamp_trait(s.openness + 10.0);
                s.patience = clamp_trait(s.patience + 5.0);
            }
            AffectLabel::Angry => {
                s.stress = clamp_trait(s.stress + 10.0);
                s.patience = clamp_trait(s.patience - 5.0);
            }
            AffectLabel::Surprised | AffectLabel::Neutral => {}
        }
    }
}

impl Dynamics for DefaultDynamics {
    fn update(&self, state: &MentalState, stimulus: &Stimulus) -> MentalState {
        let mut s = state.clone();
        s.normalize();
        let cfg = &self.config;

        // 1. Time of day scales energy
        s.energy = clamp_trait(s.energy * stimulus.time_of_day.energy_factor());

        // 2. User affect
        Self::apply_affect(&mut s, stimulus.user_affect);

        // 3. Talking about the craft itself
        if cfg.is_core_craft(&stimulus.topic) {
            s.creativity = clamp_trait(s.creativity + 3.0);
            s.satisfaction = clamp_trait(s.satisfaction + 2.0);
        }

        // 4. Fatigue accumulates every turn
        s.fatigue = clamp_trait(s.fatigue + cfg.fatigue_step);

        // 5. Past the high-water mark, fatigue drags energy and patience down
        if s.fatigue > cfg.fatigue_high_water {
            s.energy = clamp_trait((s.energy - cfg.fatigue_energy_penalty).max(cfg.energy_floor));
            s.patience =
                clamp_trait((s.patience - cfg.fatigue_patience_penalty).max(cfg.patience_floor));
        }

        tracing::debug!(
            affect = %stimulus.user_affect,
            topic = %stimulus.topic,
            energy = s.energy,
            fatigue = s.fatigue,
            "mental state updated"
        );
        s
    }
}
