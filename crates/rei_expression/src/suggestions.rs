//! Follow-up suggestion selection.
//!
//! Each turn offers up to three canned follow-up questions. Categories are
//! visited in an order that depends on how far the conversation has come, and
//! nothing already shown to the conversation is offered again.

use rei_core::config::SuggestionConfig;
use rei_core::{ConfigError, Language};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;

// ============================================================================
// Categories
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TopicCategory {
    Overview,
    Process,
    Personal,
    Advanced,
}

impl TopicCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            TopicCategory::Overview => "overview",
            TopicCategory::Process => "process",
            TopicCategory::Personal => "personal",
            TopicCategory::Advanced => "advanced",
        }
    }
}

impl fmt::Display for TopicCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A named, ranked pool of suggestion templates.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SuggestionCategory {
    pub name: TopicCategory,
    /// Rank for top-up; 1 is tried first.
    pub priority: u8,
    pub templates: Vec<String>,
}

impl SuggestionCategory {
    pub fn new(name: TopicCategory, priority: u8, templates: &[&str]) -> Self {
        Self {
            name,
            priority,
            templates: templates.iter().map(|t| t.to_string()).collect(),
        }
    }
}

const OVERVIEW_JA: &[&str] = &[
    "京友禅について教えて",
    "京友禅の歴史を知りたい",
    "京友禅の特徴は何？",
    "友禅染って何がすごいの？",
    "なぜ京都で友禅が発展したの？",
];
const OVERVIEW_EN: &[&str] = &[
    "Tell me about Kyoto Yuzen",
    "I want to know the history of Kyoto Yuzen",
    "What are the characteristics of Kyoto Yuzen?",
    "What's amazing about Yuzen dyeing?",
    "Why did Yuzen develop in Kyoto?",
];
const PROCESS_JA: &[&str] = &[
    "制作工程を教えて",
    "のりおき工程について詳しく",
    "一番難しい工程は？",
    "どんな道具を使うの？",
    "制作期間はどれくらい？",
];
const PROCESS_EN: &[&str] = &[
    "Tell me about the production process",
    "Details about the paste resist process",
    "What's the most difficult process?",
    "What tools do you use?",
    "How long does production take?",
];
const PERSONAL_JA: &[&str] = &[
    "職人になったきっかけは？",
    "15年間で印象に残っていることは？",
    "仕事のやりがいは？",
    "休日は何してる？",
    "将来の夢は？",
];
const PERSONAL_EN: &[&str] = &[
    "Why did you become an artisan?",
    "What impressed you in 15 years?",
    "What's rewarding about your work?",
    "What do you do on holidays?",
    "What are your future dreams?",
];
const ADVANCED_JA: &[&str] = &[
    "手描きとプリントの違いは？",
    "グラデーション技法について",
    "伝統工芸の定義って？",
    "後継者問題について",
    "現代のコラボレーションは？",
];
const ADVANCED_EN: &[&str] = &[
    "Difference between hand-painted and printed?",
    "About gradation techniques",
    "Definition of traditional crafts?",
    "About successor issues",
    "Modern collaborations?",
];

/// The built-in catalog, in priority order.
pub fn builtin_catalog(lang: Language) -> Vec<SuggestionCategory> {
    let pick = |ja: &[&str], en: &[&str]| -> Vec<String> {
        let src = match lang {
            Language::Ja => ja,
            Language::En => en,
        };
        src.iter().map(|t| t.to_string()).collect()
    };
    vec![
        SuggestionCategory { name: TopicCategory::Overview, priority: 1, templates: pick(OVERVIEW_JA, OVERVIEW_EN) },
        SuggestionCategory { name: TopicCategory::Process, priority: 2, templates: pick(PROCESS_JA, PROCESS_EN) },
        SuggestionCategory { name: TopicCategory::Personal, priority: 3, templates: pick(PERSONAL_JA, PERSONAL_EN) },
        SuggestionCategory { name: TopicCategory::Advanced, priority: 4, templates: pick(ADVANCED_JA, ADVANCED_EN) },
    ]
}

// ============================================================================
// Shown set
// ============================================================================

/// Suggestions already offered to one conversation. Grows monotonically.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ShownSuggestions(BTreeSet<String>);

impl ShownSuggestions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn contains(&self, suggestion: &str) -> bool {
        self.0.contains(suggestion)
    }

    pub fn insert(&mut self, suggestion: impl Into<String>) -> bool {
        self.0.insert(suggestion.into())
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(String::as_str)
    }
}

impl<S: Into<String>> Extend<S> for ShownSuggestions {
    fn extend<T: IntoIterator<Item = S>>(&mut self, iter: T) {
        self.0.extend(iter.into_iter().map(Into::into));
    }
}

impl<S: Into<String>> FromIterator<S> for ShownSuggestions {
    fn from_iter<T: IntoIterator<Item = S>>(iter: T) -> Self {
        let mut shown = Self::new();
        shown.extend(iter);
        shown
    }
}

// ============================================================================
// Phases
// ============================================================================

/// How far a conversation has come, by turn count.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ConversationPhase {
    New,
    Warming,
    Established,
}

impl ConversationPhase {
    pub fn from_turns(turns: u32, config: &SuggestionConfig) -> Self {
        if turns < config.warming_from {
            ConversationPhase::New
        } else if turns < config.established_from {
            ConversationPhase::Warming
        } else {
            ConversationPhase::Established
        }
    }

    /// Category visitation order for this phase.
    pub fn order(&self) -> [TopicCategory; 4] {
        use TopicCategory::*;
        match self {
            ConversationPhase::New => [Overview, Process, Personal, Advanced],
            ConversationPhase::Warming => [Process, Overview, Advanced, Personal],
            ConversationPhase::Established => [Personal, Advanced, Process, Overview],
        }
    }
}

// ============================================================================
// Engine
// ============================================================================

/// Selects the next batch of follow-up suggestions from a validated catalog.
#[derive(Debug, Clone)]
pub struct SuggestionEngine {
    config: SuggestionConfig,
    categories: Vec<SuggestionCategory>,
}

impl SuggestionEngine {
    /// Validates the catalog and stores it in priority order.
    pub fn new(
        config: SuggestionConfig,
        mut categories: Vec<SuggestionCategory>,
    ) -> Result<Self, ConfigError> {
        validate(&categories)?;
        categories.sort_by_key(|c| c.priority);
        Ok(Self { config, categories })
    }

    pub fn builtin(config: SuggestionConfig, lang: Language) -> Result<Self, ConfigError> {
        Self::new(config, builtin_catalog(lang))
    }

    pub fn categories(&self) -> &[SuggestionCategory] {
        &self.categories
    }

    /// Total number of distinct templates across all categories.
    pub fn pool_size(&self) -> usize {
        self.categories
            .iter()
            .flat_map(|c| c.templates.iter())
            .collect::<BTreeSet<_>>()
            .len()
    }

    pub fn next_suggestions(&self, shown: &ShownSuggestions, turns: u32) -> Vec<String> {
        next_suggestions(&self.categories, shown, turns, &self.config)
    }
}

/// Every category must offer at least one template.
pub fn validate(categories: &[SuggestionCategory]) -> Result<(), ConfigError> {
    match categories.iter().find(|c| c.templates.is_empty()) {
        Some(c) => Err(ConfigError::EmptySuggestionCategory(c.name.to_string())),
        None => Ok(()),
    }
}

/// Pick up to `max_per_turn` unseen suggestions.
///
/// Categories are walked in phase order taking at most `per_category` from
/// each; if that leaves the batch short, the union of all categories (in
/// priority order, ties in catalog order) tops it up. The result never contains an item from `shown`
/// and never contains duplicates. An exhausted pool yields a shorter, possibly
/// empty, list.
pub fn next_suggestions(
    categories: &[SuggestionCategory],
    shown: &ShownSuggestions,
    turns: u32,
    config: &SuggestionConfig,
) -> Vec<String> {
    let max = config.max_per_turn;
    let phase = ConversationPhase::from_turns(turns, config);
    let mut picked: Vec<String> = Vec::with_capacity(max);

    let is_fresh =
        |t: &String, picked: &[String]| !shown.contains(t) && !picked.iter().any(|p| p == t);

    for name in phase.order() {
        if picked.len() >= max {
            break;
        }
        let Some(category) = categories.iter().find(|c| c.name == name) else {
            continue;
        };
        let take = config.per_category.min(max - picked.len());
        let mut taken = 0;
        for template in &category.templates {
            if taken == take {
                break;
            }
            if is_fresh(template, &picked) {
                picked.push(template.clone());
                taken += 1;
            }
        }
    }

    if picked.len() < max {
        let mut ranked: Vec<&SuggestionCategory> = categories.iter().collect();
        ranked.sort_by_key(|c| c.priority);
        for template in ranked.iter().flat_map(|c| c.templates.iter()) {
            if picked.len() >= max {
                break;
            }
            if is_fresh(template, &picked) {
                picked.push(template.clone());
            }
        }
    }

    if picked.len() < max {
        tracing::debug!(
            turns,
            shown = shown.len(),
            returned = picked.len(),
            "suggestion pool running low"
        );
    }
    picked
}
