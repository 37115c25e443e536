use serde::{Deserialize, Serialize};

/// A learning-activity lens the canonical lesson is projected into.
///
/// Parsing an unrecognized mode string yields [`LearningMode::Original`],
/// so transformation never fails on a mode the build doesn't know about.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LearningMode {
    #[serde(rename = "chinese-to-english")]
    ChineseToEnglish,
    #[serde(rename = "english-to-chinese")]
    EnglishToChinese,
    #[serde(rename = "listening")]
    Listening,
    #[serde(rename = "grammar")]
    Grammar,
    #[serde(rename = "notes")]
    Notes,
    #[serde(rename = "original")]
    Original,
}

impl LearningMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            LearningMode::ChineseToEnglish => "chinese-to-english",
            LearningMode::EnglishToChinese => "english-to-chinese",
            LearningMode::Listening => "listening",
            LearningMode::Grammar => "grammar",
            LearningMode::Notes => "notes",
            LearningMode::Original => "original",
        }
    }

    /// Parse a mode name, falling back to `Original` for anything
    /// unrecognized.
    pub fn parse_or_original(s: &str) -> Self {
        match s {
            "chinese-to-english" => LearningMode::ChineseToEnglish,
            "english-to-chinese" => LearningMode::EnglishToChinese,
            "listening" => LearningMode::Listening,
            "grammar" => LearningMode::Grammar,
            "notes" => LearningMode::Notes,
            _ => LearningMode::Original,
        }
    }
}

impl std::fmt::Display for LearningMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Transient, mode-specific view of one lesson. Derived on demand and
/// never persisted as part of the canonical package.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModeContent {
    pub lesson_id: String,
    pub mode: LearningMode,
    pub title: String,
    pub description: String,
    pub content_items: Vec<ModeContentItem>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ModeContentItem {
    Translation {
        prompt: String,
        answer: String,
        keywords: Vec<String>,
        metadata: ItemMetadata,
    },
    Listening {
        transcript: String,
        translation: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        audio_url: Option<String>,
        questions: Vec<String>,
        metadata: ItemMetadata,
    },
    Grammar {
        name: String,
        explanation: String,
        examples: Vec<String>,
        metadata: ItemMetadata,
    },
    Notes {
        sections: Vec<NoteSection>,
        metadata: ItemMetadata,
    },
}

impl ModeContentItem {
    pub fn metadata(&self) -> &ItemMetadata {
        match self {
            ModeContentItem::Translation { metadata, .. }
            | ModeContentItem::Listening { metadata, .. }
            | ModeContentItem::Grammar { metadata, .. }
            | ModeContentItem::Notes { metadata, .. } => metadata,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NoteSection {
    pub heading: String,
    pub english: String,
    pub chinese: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ItemMetadata {
    pub source_block_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub difficulty: Option<Difficulty>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
    Easy,
    Medium,
    Hard,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unknown_mode_string_falls_back_to_original() {
        assert_eq!(
            LearningMode::parse_or_original("speed-reading"),
            LearningMode::Original
        );
        assert_eq!(
            LearningMode::parse_or_original("listening"),
            LearningMode::Listening
        );
    }
}
