use serde::{Deserialize, Serialize};
use std::fmt;

/// Topic keywords in lookup order; the first hit wins.
const TOPIC_KEYWORDS: &[(&str, &str)] = &[
    ("京友禅", "kyoto_yuzen"),
    ("のりおき", "norioki"),
    ("職人", "craftsman"),
    ("伝統", "tradition"),
    ("着物", "kimono"),
    ("染色", "dyeing"),
    ("模様", "pattern"),
    ("工程", "process"),
    ("道具", "tools"),
    ("コラボ", "collaboration"),
];

/// Resolved topic of a user message, e.g. `kyoto_yuzen` or `general`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TopicTag(String);

impl TopicTag {
    pub const GENERAL: &'static str = "general";

    pub fn new(tag: impl Into<String>) -> Self {
        Self(tag.into())
    }

    pub fn general() -> Self {
        Self(Self::GENERAL.to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_general(&self) -> bool {
        self.0 == Self::GENERAL
    }
}

impl Default for TopicTag {
    fn default() -> Self {
        Self::general()
    }
}

impl fmt::Display for TopicTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Resolve the topic tag of a message by keyword lookup.
pub fn extract_topic(text: &str) -> TopicTag {
    TOPIC_KEYWORDS
        .iter()
        .find(|(keyword, _)| text.contains(keyword))
        .map(|(_, tag)| TopicTag::new(*tag))
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extract_known_topics() {
        assert_eq!(extract_topic("京友禅について教えて").as_str(), "kyoto_yuzen");
        assert_eq!(extract_topic("のりおき工程について詳しく").as_str(), "norioki");
        assert_eq!(extract_topic("どんな道具を使うの？").as_str(), "tools");
    }

    #[test]
    fn test_first_keyword_in_table_order_wins() {
        // 工程 appears first in the text, but のりおき precedes it in the table
        assert_eq!(extract_topic("工程のなかでのりおきが好き").as_str(), "norioki");
    }

    #[test]
    fn test_unknown_topic_is_general() {
        let tag = extract_topic("こんにちは");
        assert!(tag.is_general());
        assert_eq!(tag, TopicTag::default());
    }
}
