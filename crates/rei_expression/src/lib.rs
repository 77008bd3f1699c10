//! # Rei Expression
//!
//! What Rei offers and how she phrases it, decided per turn:
//!
//! - **Suggestions**: non-repeating follow-up questions ordered by conversation phase
//! - **Cues**: state lines and emotion phrase banks for the generation prompt
//! - **Repetition**: per-conversation ledger of repeated questions

mod cues;
mod repetition;
mod suggestions;

pub use cues::{phrase_bank, Intensity, ResponseCues};
pub use repetition::{normalize_question, repeat_hint, QuestionLedger};
pub use suggestions::{
    builtin_catalog, next_suggestions, validate, ConversationPhase, ShownSuggestions,
    SuggestionCategory, SuggestionEngine, TopicCategory,
};
