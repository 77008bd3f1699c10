//! # Rei Core
//!
//! Deterministic building blocks of the persona state engine:
//!
//! - **Affect**: the closed label set and per-message classification result
//! - **Classifier**: lexicon/emoji/pattern scoring of raw user text
//! - **Source**: the affect-source seam and two-source arbitration
//! - **State / Dynamics**: the bounded mental-state vector and its per-turn update
//! - **Relationship**: turn-count driven familiarity tiers
//!
//! Nothing in this crate performs I/O on the turn path or keeps cross-call
//! memory. Callers own every state value and hand it back each turn.

pub mod affect;
pub mod classifier;
pub mod config;
pub mod dynamics;
pub mod error;
pub mod language;
pub mod relationship;
pub mod source;
pub mod state;
pub mod time;
pub mod topic;

pub use affect::{AffectLabel, ClassificationResult};
pub use classifier::{AffectScores, LexicalClassifier};
pub use config::EngineConfig;
pub use dynamics::{DefaultDynamics, Dynamics, Stimulus};
pub use error::ConfigError;
pub use language::Language;
pub use relationship::{level_for, RelationshipTier, ToneKey};
pub use source::{arbitrate, classify_with_escalation, Adopted, AffectSource, Arbitration};
pub use state::MentalState;
pub use time::TimeOfDay;
pub use topic::{extract_topic, TopicTag};
