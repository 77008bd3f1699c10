//! Emotion transitions: the only stochastic step of a turn.
//!
//! Rei's next emotion is drawn from a categorical distribution that starts at
//! the base row for her previous emotion and is bent by her mental state and
//! the user's mood. The random source is always supplied by the caller.

use rand::Rng;
use rei_core::config::TransitionConfig;
use rei_core::{AffectLabel, ConfigError, MentalState};
use serde::Serialize;

const N: usize = AffectLabel::COUNT;

/// Base weights, rows and columns in `AffectLabel::ALL` order
/// (happy, sad, angry, surprised, neutral).
const BASE_ROWS: [[f32; N]; N] = [
    [0.5, 0.04, 0.01, 0.15, 0.3],   // from happy
    [0.15, 0.4, 0.04, 0.01, 0.4],   // from sad
    [0.01, 0.15, 0.3, 0.04, 0.5],   // from angry
    [0.3, 0.1, 0.1, 0.2, 0.3],      // from surprised
    [0.25, 0.1, 0.05, 0.2, 0.4],    // from neutral
];

// ============================================================================
// Distribution
// ============================================================================

/// Normalized categorical distribution over affect labels.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Distribution([f32; N]);

impl Distribution {
    /// Normalize raw weights. A non-positive total yields the uniform distribution.
    pub fn from_weights(weights: [f32; N]) -> Self {
        let total: f32 = weights.iter().sum();
        if total <= 0.0 || !total.is_finite() {
            return Self([1.0 / N as f32; N]);
        }
        Self(weights.map(|w| w / total))
    }

    pub fn probability(&self, label: AffectLabel) -> f32 {
        self.0[label.index()]
    }

    pub fn probabilities(&self) -> &[f32; N] {
        &self.0
    }

    pub fn sum(&self) -> f32 {
        self.0.iter().sum()
    }

    /// Draw one label by walking the cumulative distribution in label order.
    pub fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> AffectLabel {
        let r: f32 = rng.gen();
        let mut acc = 0.0;
        for label in AffectLabel::ALL {
            let p = self.0[label.index()];
            if p <= 0.0 {
                continue;
            }
            acc += p;
            if r < acc {
                return label;
            }
        }
        // rounding left the total a hair under r
        AffectLabel::ALL
            .into_iter()
            .rev()
            .find(|l| self.0[l.index()] > 0.0)
            .unwrap_or_default()
    }
}

// ============================================================================
// Table
// ============================================================================

/// Static base transition weights, validated once at construction.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TransitionTable {
    rows: [[f32; N]; N],
}

impl Default for TransitionTable {
    fn default() -> Self {
        Self { rows: BASE_ROWS }
    }
}

impl TransitionTable {
    pub fn new(rows: [[f32; N]; N]) -> Result<Self, ConfigError> {
        let table = Self { rows };
        table.validate()?;
        Ok(table)
    }

    /// Every weight finite and non-negative, every row with positive mass.
    pub fn validate(&self) -> Result<(), ConfigError> {
        for from in AffectLabel::ALL {
            let row = &self.rows[from.index()];
            for to in AffectLabel::ALL {
                let weight = row[to.index()];
                if !weight.is_finite() || weight < 0.0 {
                    return Err(ConfigError::InvalidTransitionWeight {
                        from: from.as_str(),
                        to: to.as_str(),
                        weight,
                    });
                }
            }
            if row.iter().sum::<f32>() <= 0.0 {
                return Err(ConfigError::TransitionRowEmpty(from.as_str()));
            }
        }
        Ok(())
    }

    pub fn row(&self, from: AffectLabel) -> [f32; N] {
        self.rows[from.index()]
    }
}

// ============================================================================
// Engine
// ============================================================================

/// State-dependent emotion transitions.
#[derive(Debug, Clone, Default)]
pub struct TransitionEngine {
    table: TransitionTable,
    config: TransitionConfig,
}

impl TransitionEngine {
    pub fn new(table: TransitionTable, config: TransitionConfig) -> Result<Self, ConfigError> {
        table.validate()?;
        Ok(Self { table, config })
    }

    pub fn table(&self) -> &TransitionTable {
        &self.table
    }

    /// The distribution Rei's next emotion is drawn from.
    pub fn distribution(
        &self,
        prev: AffectLabel,
        user: AffectLabel,
        state: &MentalState,
    ) -> Distribution {
        let mut w = self.table.row(prev);
        let idx = |l: AffectLabel| l.index();

        // Tired: drift toward neutral
        if state.energy < self.config.low_energy {
            w[idx(AffectLabel::Neutral)] += 0.2;
            w[idx(AffectLabel::Happy)] = (w[idx(AffectLabel::Happy)] - 0.1).max(0.0);
        }

        // Stressed: quicker to anger
        if state.stress > self.config.high_stress {
            w[idx(AffectLabel::Angry)] += 0.1;
            w[idx(AffectLabel::Happy)] = (w[idx(AffectLabel::Happy)] - 0.1).max(0.0);
        }

        match user {
            AffectLabel::Happy => {
                w[idx(AffectLabel::Happy)] = (w[idx(AffectLabel::Happy)] + 0.2).min(1.0);
            }
            AffectLabel::Sad => {
                w[idx(AffectLabel::Sad)] = (w[idx(AffectLabel::Sad)] + 0.1).min(1.0);
                w[idx(AffectLabel::Neutral)] = (w[idx(AffectLabel::Neutral)] + 0.1).min(1.0);
            }
            _ => {}
        }

        Distribution::from_weights(w)
    }

    /// Draw Rei's next emotion with the caller's random source.
    pub fn next_emotion<R: Rng + ?Sized>(
        &self,
        prev: AffectLabel,
        user: AffectLabel,
        state: &MentalState,
        rng: &mut R,
    ) -> AffectLabel {
        let dist = self.distribution(prev, user, state);
        let next = dist.sample(rng);
        tracing::debug!(%prev, %user, %next, ?dist, "emotion transition");
        next
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use rand::rngs::mock::StepRng;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    /// A source whose next `f32` draw is (just under) `r`.
    pub(crate) fn rng_at(r: f32) -> StepRng {
        StepRng::new(((r * (1u32 << 24) as f32) as u64) << 8, 0)
    }

    fn close(a: f32, b: f32) -> bool {
        (a - b).abs() < 1e-5
    }

    #[test]
    fn test_base_table_is_valid() {
        assert_eq!(TransitionTable::default().validate(), Ok(()));
    }

    #[test]
    fn test_unmodified_row_is_base_row() {
        let engine = TransitionEngine::default();
        let dist = engine.distribution(AffectLabel::Neutral, AffectLabel::Neutral, &MentalState::default());
        let expected = [0.25, 0.1, 0.05, 0.2, 0.4];
        for (p, e) in dist.probabilities().iter().zip(expected) {
            assert!(close(*p, e), "{} != {}", p, e);
        }
    }

    #[test]
    fn test_low_energy_drifts_to_neutral() {
        let engine = TransitionEngine::default();
        let state = MentalState {
            energy: 20.0,
            ..MentalState::default()
        };
        let dist = engine.distribution(AffectLabel::Happy, AffectLabel::Neutral, &state);
        // happy 0.4, neutral 0.5, total 1.1
        assert!(close(dist.probability(AffectLabel::Happy), 0.4 / 1.1));
        assert!(close(dist.probability(AffectLabel::Neutral), 0.5 / 1.1));
        assert!(close(dist.sum(), 1.0));
    }

    #[test]
    fn test_happy_weight_is_floored_at_zero() {
        let engine = TransitionEngine::default();
        let state = MentalState {
            energy: 10.0,
            stress: 90.0,
            ..MentalState::default()
        };
        let dist = engine.distribution(AffectLabel::Angry, AffectLabel::Neutral, &state);
        assert_eq!(dist.probability(AffectLabel::Happy), 0.0);
        // angry 0.4, neutral 0.7, sad 0.15, surprised 0.04: total 1.29
        assert!(close(dist.probability(AffectLabel::Angry), 0.4 / 1.29));
        assert!(close(dist.probability(AffectLabel::Neutral), 0.7 / 1.29));

        // a zero draw skips the empty happy bucket
        assert_eq!(dist.sample(&mut rng_at(0.0)), AffectLabel::Sad);
    }

    #[test]
    fn test_user_mood_modifiers() {
        let engine = TransitionEngine::default();
        let state = MentalState::default();

        let happy = engine.distribution(AffectLabel::Neutral, AffectLabel::Happy, &state);
        assert!(close(happy.probability(AffectLabel::Happy), 0.45 / 1.2));

        let sad = engine.distribution(AffectLabel::Neutral, AffectLabel::Sad, &state);
        assert!(close(sad.probability(AffectLabel::Sad), 0.2 / 1.2));
        assert!(close(sad.probability(AffectLabel::Neutral), 0.5 / 1.2));
    }

    #[test]
    fn test_sampling_walks_cumulative_order() {
        let engine = TransitionEngine::default();
        let state = MentalState::default();
        // cumulative: happy .25, sad .35, angry .40, surprised .60, neutral 1.0
        let cases = [
            (0.0, AffectLabel::Happy),
            (0.3, AffectLabel::Sad),
            (0.37, AffectLabel::Angry),
            (0.5, AffectLabel::Surprised),
            (0.99, AffectLabel::Neutral),
        ];
        for (r, expected) in cases {
            let got = engine.next_emotion(AffectLabel::Neutral, AffectLabel::Neutral, &state, &mut rng_at(r));
            assert_eq!(got, expected, "r = {}", r);
        }
    }

    #[test]
    fn test_seeded_sequences_are_reproducible() {
        let engine = TransitionEngine::default();
        let state = MentalState::default();
        let run = |seed| {
            let mut rng = StdRng::seed_from_u64(seed);
            let mut prev = AffectLabel::Neutral;
            (0..20)
                .map(|_| {
                    prev = engine.next_emotion(prev, AffectLabel::Happy, &state, &mut rng);
                    prev
                })
                .collect::<Vec<_>>()
        };
        assert_eq!(run(42), run(42));
    }

    #[test]
    fn test_zero_weights_fall_back_to_uniform() {
        let dist = Distribution::from_weights([0.0; N]);
        for label in AffectLabel::ALL {
            assert!(close(dist.probability(label), 0.2));
        }
    }

    #[test]
    fn test_invalid_tables_are_rejected() {
        let mut rows = BASE_ROWS;
        rows[AffectLabel::Sad.index()] = [0.0; N];
        assert_eq!(
            TransitionTable::new(rows).unwrap_err(),
            ConfigError::TransitionRowEmpty("sad")
        );

        let mut rows = BASE_ROWS;
        rows[0][2] = -0.5;
        assert!(matches!(
            TransitionTable::new(rows),
            Err(ConfigError::InvalidTransitionWeight { from: "happy", to: "angry", .. })
        ));
    }
}
