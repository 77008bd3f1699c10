use rei_core::AffectLabel;
use serde::{Deserialize, Serialize};

/// Speech-synthesis parameters for one emotion.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct VoiceProfile {
    /// Speaking rate, 1.0 is normal.
    pub speed: f32,
    /// Pitch offset, 0 is normal.
    pub pitch: i8,
    pub volume: f32,
    /// Lower is more expressive.
    pub stability: f32,
    pub similarity: f32,
}

impl Default for VoiceProfile {
    fn default() -> Self {
        Self {
            speed: 1.0,
            pitch: 0,
            volume: 1.0,
            stability: 0.5,
            similarity: 0.75,
        }
    }
}

impl VoiceProfile {
    /// Profile for an emotion label; neutral speaks with the default profile.
    pub fn for_label(label: AffectLabel) -> Self {
        match label {
            AffectLabel::Happy => Self {
                speed: 1.15,
                pitch: 10,
                volume: 1.2,
                stability: 0.4,
                similarity: 0.8,
            },
            AffectLabel::Sad => Self {
                speed: 0.9,
                pitch: -5,
                volume: 0.8,
                stability: 0.6,
                similarity: 0.7,
            },
            AffectLabel::Angry => Self {
                speed: 1.1,
                pitch: -3,
                volume: 1.3,
                stability: 0.4,
                similarity: 0.7,
            },
            AffectLabel::Surprised => Self {
                speed: 1.2,
                pitch: 15,
                volume: 1.2,
                stability: 0.3,
                similarity: 0.8,
            },
            AffectLabel::Neutral => Self::default(),
        }
    }
}
