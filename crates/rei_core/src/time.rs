use chrono::Timelike;
use serde::{Deserialize, Serialize};

/// Coarse time-of-day bucket that scales Rei's energy each turn.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TimeOfDay {
    Morning,
    #[default]
    Afternoon,
    Evening,
    Night,
}

impl TimeOfDay {
    /// Bucket a wall-clock hour: 5–9 morning, 10–16 afternoon, 17–20 evening, else night.
    pub fn from_hour(hour: u32) -> Self {
        match hour % 24 {
            5..=9 => TimeOfDay::Morning,
            10..=16 => TimeOfDay::Afternoon,
            17..=20 => TimeOfDay::Evening,
            _ => TimeOfDay::Night,
        }
    }

    /// Bucket for the current local time.
    pub fn now() -> Self {
        Self::from_hour(chrono::Local::now().hour())
    }

    /// Multiplier applied to energy at the start of every turn.
    pub fn energy_factor(&self) -> f32 {
        match self {
            TimeOfDay::Morning => 0.8,
            TimeOfDay::Afternoon => 0.6,
            TimeOfDay::Evening => 0.4,
            TimeOfDay::Night => 0.3,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hour_buckets() {
        assert_eq!(TimeOfDay::from_hour(4), TimeOfDay::Night);
        assert_eq!(TimeOfDay::from_hour(5), TimeOfDay::Morning);
        assert_eq!(TimeOfDay::from_hour(9), TimeOfDay::Morning);
        assert_eq!(TimeOfDay::from_hour(10), TimeOfDay::Afternoon);
        assert_eq!(TimeOfDay::from_hour(16), TimeOfDay::Afternoon);
        assert_eq!(TimeOfDay::from_hour(17), TimeOfDay::Evening);
        assert_eq!(TimeOfDay::from_hour(20), TimeOfDay::Evening);
        assert_eq!(TimeOfDay::from_hour(21), TimeOfDay::Night);
        assert_eq!(TimeOfDay::from_hour(0), TimeOfDay::Night);
    }

    #[test]
    fn test_hour_wraps() {
        assert_eq!(TimeOfDay::from_hour(29), TimeOfDay::Morning);
    }

    #[test]
    fn test_energy_factor_decreases_through_the_day() {
        let factors: Vec<f32> = [
            TimeOfDay::Morning,
            TimeOfDay::Afternoon,
            TimeOfDay::Evening,
            TimeOfDay::Night,
        ]
        .iter()
        .map(TimeOfDay::energy_factor)
        .collect();
        assert!(factors.windows(2).all(|w| w[0] > w[1]));
    }
}
