use serde::{Deserialize, Serialize};

/// One typed unit of lesson content.
///
/// The payload is adjacently tagged (`type` + `content`) on the wire. A
/// block whose `type` is not in the known set deserializes into
/// [`BlockPayload::Unknown`] and round-trips unmodified; components that
/// don't explicitly handle it skip it rather than reject it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ContentBlock {
    pub id: String,
    #[serde(default)]
    pub order: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(flatten)]
    pub payload: BlockPayload,
}

impl ContentBlock {
    pub fn kind(&self) -> &str {
        self.payload.kind()
    }

    pub fn sentence_pair_count(&self) -> usize {
        match &self.payload {
            BlockPayload::Sentences(content) => content.pairs.len(),
            _ => 0,
        }
    }
}

/// Adjacently tagged on the wire as `{"type": ..., "content": ...}`.
/// Serde impls are hand-written so an unrecognized tag falls through to
/// `Unknown` instead of failing deserialization.
#[derive(Debug, Clone)]
pub enum BlockPayload {
    Heading(HeadingContent),
    Sentences(SentencesContent),
    Vocabulary(VocabularyContent),
    Grammar(GrammarContent),
    Exercise(ExerciseContent),
    Phrases(PhrasesContent),
    AdvancedExpressions(AdvancedExpressionsContent),
    /// Forward-compatibility escape hatch: captures any block whose type
    /// tag is not in the known set, preserving it byte-for-byte on export.
    Unknown(serde_json::Value),
}

impl Serialize for BlockPayload {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        fn tagged<S: serde::Serializer, T: Serialize>(
            serializer: S,
            kind: &str,
            content: &T,
        ) -> Result<S::Ok, S::Error> {
            use serde::ser::SerializeMap;
            let mut map = serializer.serialize_map(Some(2))?;
            map.serialize_entry("type", kind)?;
            map.serialize_entry("content", content)?;
            map.end()
        }

        match self {
            BlockPayload::Heading(c) => tagged(serializer, "heading", c),
            BlockPayload::Sentences(c) => tagged(serializer, "sentences", c),
            BlockPayload::Vocabulary(c) => tagged(serializer, "vocabulary", c),
            BlockPayload::Grammar(c) => tagged(serializer, "grammar", c),
            BlockPayload::Exercise(c) => tagged(serializer, "exercise", c),
            BlockPayload::Phrases(c) => tagged(serializer, "phrases", c),
            BlockPayload::AdvancedExpressions(c) => {
                tagged(serializer, "advanced_expressions", c)
            }
            BlockPayload::Unknown(value) => value.serialize(serializer),
        }
    }
}

impl<'de> Deserialize<'de> for BlockPayload {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        use serde::de::Error;

        let value = serde_json::Value::deserialize(deserializer)?;
        let kind = value
            .get("type")
            .and_then(|t| t.as_str())
            .unwrap_or_default()
            .to_string();
        let content = value
            .get("content")
            .cloned()
            .unwrap_or(serde_json::Value::Null);

        fn parse<T: serde::de::DeserializeOwned, E: Error>(
            content: serde_json::Value,
        ) -> Result<T, E> {
            serde_json::from_value(content).map_err(E::custom)
        }

        let payload = match kind.as_str() {
            "heading" => BlockPayload::Heading(parse(content)?),
            "sentences" => BlockPayload::Sentences(parse(content)?),
            "vocabulary" => BlockPayload::Vocabulary(parse(content)?),
            "grammar" => BlockPayload::Grammar(parse(content)?),
            "exercise" => BlockPayload::Exercise(parse(content)?),
            "phrases" => BlockPayload::Phrases(parse(content)?),
            "advanced_expressions" => BlockPayload::AdvancedExpressions(parse(content)?),
            _ => BlockPayload::Unknown(value),
        };
        Ok(payload)
    }
}

impl BlockPayload {
    pub fn kind(&self) -> &str {
        match self {
            BlockPayload::Heading(_) => "heading",
            BlockPayload::Sentences(_) => "sentences",
            BlockPayload::Vocabulary(_) => "vocabulary",
            BlockPayload::Grammar(_) => "grammar",
            BlockPayload::Exercise(_) => "exercise",
            BlockPayload::Phrases(_) => "phrases",
            BlockPayload::AdvancedExpressions(_) => "advanced_expressions",
            BlockPayload::Unknown(value) => value
                .get("type")
                .and_then(|t| t.as_str())
                .unwrap_or("unknown"),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HeadingContent {
    pub text: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SentencesContent {
    pub pairs: Vec<SentencePair>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VocabularyContent {
    pub words: Vec<VocabularyEntry>,
}

/// Grammar blocks come in two shapes: authored point lists, and the
/// title+explanations form injected by level adaptation.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum GrammarContent {
    Points { points: Vec<GrammarPoint> },
    Explanations {
        title: String,
        explanations: Vec<String>,
    },
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GrammarPoint {
    pub name: String,
    pub explanation: String,
    #[serde(default)]
    pub examples: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExerciseContent {
    pub title: String,
    pub kind: ExerciseKind,
    pub instructions: String,
    pub items: Vec<ExerciseItem>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExerciseKind {
    Basic,
    FillInBlank,
    Translation,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExerciseItem {
    pub prompt: String,
    pub answer: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PhrasesContent {
    pub phrases: Vec<PhraseEntry>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PhraseEntry {
    pub phrase: String,
    pub translation: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub usage: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AdvancedExpressionsContent {
    pub expressions: Vec<ExpressionEntry>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExpressionEntry {
    pub expression: String,
    pub meaning: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub example: Option<String>,
}

/// One aligned (source-language, target-language) sentence.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SentencePair {
    pub id: String,
    pub english: String,
    pub chinese: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub confidence: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub enrichment: Option<SentenceEnrichment>,
}

impl SentencePair {
    pub fn new(id: impl Into<String>, english: impl Into<String>, chinese: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            english: english.into(),
            chinese: chinese.into(),
            confidence: None,
            enrichment: None,
        }
    }
}

/// Level-specific sentence enrichment, produced only by the level adapter.
/// One variant per tier keeps the base pair lean instead of widening it
/// with a bag of optional fields.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "level", rename_all = "lowercase")]
pub enum SentenceEnrichment {
    Beginner {
        phonetics: String,
        simplified: String,
    },
    Intermediate {
        phrases: Vec<String>,
    },
    Advanced {
        synonyms: Vec<String>,
        advanced_usage: String,
    },
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VocabularyEntry {
    pub word: String,
    pub translation: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub enrichment: Option<VocabularyEnrichment>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "level", rename_all = "lowercase")]
pub enum VocabularyEnrichment {
    Beginner {
        phonetics: String,
        examples: Vec<String>,
    },
    Intermediate {
        collocations: Vec<String>,
        examples: Vec<String>,
    },
    Advanced {
        synonyms: Vec<String>,
        antonyms: Vec<String>,
        advanced_usage: String,
    },
}
