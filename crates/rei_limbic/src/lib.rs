//! # Rei Limbic System
//!
//! Where a turn comes together. This crate holds:
//!
//! - **Transitions**: Rei's next emotion, drawn from a state-dependent
//!   categorical distribution with a caller-supplied random source
//! - **Persona engine**: the per-turn pipeline over caller-owned state
//! - **Voice**: speech parameters for an emotion
//! - **Conversation**: the state a caller stores between turns, and
//!   per-conversation locks for concurrent callers

mod conversation;
mod system;
pub mod transition;
mod voice;

pub use conversation::{ConversationLocks, ConversationState, EmotionHistory, HISTORY_LEN};
pub use system::{PersonaEngine, TurnInput, TurnOutcome};
pub use transition::{Distribution, TransitionEngine, TransitionTable};
pub use voice::VoiceProfile;
