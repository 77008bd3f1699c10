use thiserror::Error;

/// Configuration-integrity faults.
///
/// These are raised once, when tables and tunables are validated at startup.
/// The per-turn operations never return them.
#[derive(Debug, Error, PartialEq)]
pub enum ConfigError {
    #[error("relationship tier table is empty")]
    TierTableEmpty,

    #[error("relationship tiers must start at 0 turns, first tier starts at {0}")]
    TierTableOffset(u32),

    #[error("relationship tier {level} starts at {found} turns, expected {expected}")]
    NonContiguousTiers { level: u8, expected: u32, found: u32 },

    #[error("relationship tier {0} is bounded but is the last tier")]
    TierTableNotTotal(u8),

    #[error("relationship tier {0} is unbounded but is not the last tier")]
    UnboundedTierNotLast(u8),

    #[error("transition row for {0} has no positive weight")]
    TransitionRowEmpty(&'static str),

    #[error("transition weight {from}->{to} is negative or not finite: {weight}")]
    InvalidTransitionWeight {
        from: &'static str,
        to: &'static str,
        weight: f32,
    },

    #[error("suggestion category {0} has no templates")]
    EmptySuggestionCategory(String),

    #[error("{field} = {value} is out of range ({expected})")]
    OutOfRange {
        field: &'static str,
        value: f32,
        expected: &'static str,
    },

    #[error("unknown language: {0}")]
    UnknownLanguage(String),
}
