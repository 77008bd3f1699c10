//! Affect sources and two-source arbitration.
//!
//! The lexical classifier is always consulted first. When its confidence falls
//! below the escalation threshold a secondary source may be asked, and
//! [`arbitrate`] decides which label to keep.

use crate::affect::{AffectLabel, ClassificationResult};
use crate::classifier::LexicalClassifier;
use async_trait::async_trait;
use serde::Serialize;

/// Instruction sent to a general-purpose language model acting as the secondary source.
pub const AFFECT_INSTRUCTION: &str =
    "入力されたテキストの感情を分析し、happy, sad, angry, surprised, neutralのいずれか1つだけを返してください。";

/// Anything that can label the affect of a message.
#[async_trait]
pub trait AffectSource: Send + Sync {
    /// Short identifier used in logs.
    fn name(&self) -> &str;

    async fn classify(&self, text: &str) -> anyhow::Result<ClassificationResult>;
}

/// The lexical classifier behind the [`AffectSource`] interface.
#[derive(Debug, Clone, Default)]
pub struct LexicalSource {
    classifier: LexicalClassifier,
}

impl LexicalSource {
    pub fn new(classifier: LexicalClassifier) -> Self {
        Self { classifier }
    }
}

#[async_trait]
impl AffectSource for LexicalSource {
    fn name(&self) -> &str {
        "lexical"
    }

    async fn classify(&self, text: &str) -> anyhow::Result<ClassificationResult> {
        Ok(self.classifier.classify(text))
    }
}

/// Minimal completion interface a remote label service must offer.
#[async_trait]
pub trait LabelClient: Send + Sync {
    /// Return the raw reply for `text` under `instruction`.
    async fn complete_label(&self, instruction: &str, text: &str) -> anyhow::Result<String>;
}

/// Secondary source backed by a [`LabelClient`].
///
/// Remote services report a label only, so results carry the neutral confidence.
pub struct RemoteSource<C> {
    client: C,
}

impl<C: LabelClient> RemoteSource<C> {
    pub fn new(client: C) -> Self {
        Self { client }
    }
}

#[async_trait]
impl<C: LabelClient> AffectSource for RemoteSource<C> {
    fn name(&self) -> &str {
        "remote"
    }

    async fn classify(&self, text: &str) -> anyhow::Result<ClassificationResult> {
        let reply = self.client.complete_label(AFFECT_INSTRUCTION, text).await?;
        let label: AffectLabel = reply.parse()?;
        Ok(ClassificationResult::new(
            label,
            ClassificationResult::NEUTRAL_CONFIDENCE,
        ))
    }
}

/// Which source the final label came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Adopted {
    Lexical,
    Secondary,
}

/// Outcome of a two-source vote.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Arbitration {
    pub result: ClassificationResult,
    pub adopted: Adopted,
    /// The secondary label, if one was consulted and answered.
    pub secondary: Option<AffectLabel>,
}

/// Decide between the lexical result and an optional secondary label.
///
/// The secondary label wins only when the lexical confidence is below
/// `threshold`, the secondary label is not neutral, and it disagrees with the
/// lexical label. The adopted result keeps the lexical confidence.
pub fn arbitrate(
    lexical: ClassificationResult,
    secondary: Option<AffectLabel>,
    threshold: f32,
) -> Arbitration {
    let adopt_secondary = match secondary {
        Some(label) => {
            lexical.confidence < threshold && label != AffectLabel::Neutral && label != lexical.label
        }
        None => false,
    };

    let (result, adopted) = match secondary {
        Some(label) if adopt_secondary => (
            ClassificationResult::new(label, lexical.confidence),
            Adopted::Secondary,
        ),
        _ => (lexical, Adopted::Lexical),
    };

    tracing::info!(
        lexical = %lexical.label,
        lexical_confidence = lexical.confidence,
        secondary = ?secondary,
        adopted = ?adopted,
        "affect arbitration"
    );

    Arbitration {
        result,
        adopted,
        secondary,
    }
}

/// Classify lexically and escalate to `secondary` only when confidence is low.
///
/// A failing secondary source is logged and the lexical result is used as-is.
pub async fn classify_with_escalation(
    classifier: &LexicalClassifier,
    secondary: &dyn AffectSource,
    text: &str,
    threshold: f32,
) -> Arbitration {
    let lexical = classifier.classify(text);
    if lexical.confidence >= threshold {
        return Arbitration {
            result: lexical,
            adopted: Adopted::Lexical,
            secondary: None,
        };
    }

    tracing::debug!(
        confidence = lexical.confidence,
        source = secondary.name(),
        "low lexical confidence, consulting secondary source"
    );
    match secondary.classify(text).await {
        Ok(r) => arbitrate(lexical, Some(r.label), threshold),
        Err(e) => {
            tracing::warn!(source = secondary.name(), "secondary affect source failed: {:#}", e);
            arbitrate(lexical, None, threshold)
        }
    }
}
