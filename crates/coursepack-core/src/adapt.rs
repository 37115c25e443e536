//! Level adaptation: clone a course into a fresh id namespace and rewrite
//! or augment its content blocks to fit a target difficulty tier.
//!
//! The source course is never mutated. Per-block failures are isolated:
//! a block that cannot be enriched is carried over unmodified and recorded
//! in the [`AdaptationReport`] instead of aborting the whole course.

use uuid::Uuid;

use crate::model::{
    BlockPayload, ContentBlock, CourseData, ExerciseContent, ExerciseItem, ExerciseKind,
    ExpressionEntry, GrammarContent, PhraseEntry, ProficiencyLevel, SentenceEnrichment,
    SentencePair, VocabularyEnrichment, VocabularyEntry,
};
use crate::transform::difficulty;

#[derive(Debug, Clone, Default)]
pub struct AdaptationReport {
    pub blocks_adapted: usize,
    pub blocks_failed: Vec<BlockFailure>,
}

#[derive(Debug, Clone)]
pub struct BlockFailure {
    pub block_id: String,
    pub reason: String,
}

/// Adapt `course` to `level`, producing a new course with freshly minted
/// ids. Supplementary blocks carry stable `supp-{level}-{kind}` ids and
/// replace any earlier blocks with the same key, so re-adapting an already
/// adapted course is idempotent rather than accumulating duplicates.
pub fn adapt(course: &CourseData, level: ProficiencyLevel) -> (CourseData, AdaptationReport) {
    let mut report = AdaptationReport::default();
    let course_id = Uuid::new_v4().to_string();

    let mut meta = course.course.clone();
    meta.id = course_id.clone();
    meta.level = level.into();
    let suffix = format!(" ({})", level.label());
    if !meta.title.ends_with(&suffix) {
        meta.title.push_str(&suffix);
    }

    let lessons = course
        .lessons
        .iter()
        .map(|lesson| {
            let mut adapted = lesson.clone();
            adapted.id = Uuid::new_v4().to_string();
            adapted.course_id = course_id.clone();
            adapted.content_blocks = adapt_blocks(&lesson.content_blocks, level, &mut report);
            adapted
        })
        .collect();

    let adapted = CourseData {
        course: meta,
        lessons,
    };
    (adapted, report)
}

fn adapt_blocks(
    blocks: &[ContentBlock],
    level: ProficiencyLevel,
    report: &mut AdaptationReport,
) -> Vec<ContentBlock> {
    let supp_prefix = format!("supp-{}-", level);
    let source_pairs: Vec<SentencePair> = blocks
        .iter()
        .filter_map(|b| match &b.payload {
            BlockPayload::Sentences(c) => Some(c.pairs.clone()),
            _ => None,
        })
        .flatten()
        .collect();

    let mut out = Vec::new();
    for block in blocks {
        // Same-level supplementary blocks are replaced below, not carried.
        if block.id.starts_with(&supp_prefix) {
            continue;
        }
        let mut adapted = block.clone();
        // Supplementary ids from other levels stay stable so their own
        // re-adaptation remains idempotent too.
        if !adapted.id.starts_with("supp-") {
            adapted.id = Uuid::new_v4().to_string();
        }
        match adapt_payload(&block.payload, level) {
            Ok(payload) => {
                adapted.payload = payload;
                report.blocks_adapted += 1;
            }
            Err(reason) => {
                report.blocks_failed.push(BlockFailure {
                    block_id: block.id.clone(),
                    reason,
                });
            }
        }
        out.push(adapted);
    }

    for block in supplementary_blocks(level, &source_pairs) {
        out.push(block);
    }
    for (i, block) in out.iter_mut().enumerate() {
        block.order = i as u32 + 1;
    }
    out
}

fn adapt_payload(
    payload: &BlockPayload,
    level: ProficiencyLevel,
) -> Result<BlockPayload, String> {
    match payload {
        BlockPayload::Sentences(content) => {
            let pairs = content
                .pairs
                .iter()
                .map(|pair| enrich_pair(pair, level))
                .collect::<Result<Vec<_>, String>>()?;
            Ok(BlockPayload::Sentences(crate::model::SentencesContent {
                pairs,
            }))
        }
        BlockPayload::Vocabulary(content) => {
            let words = content.words.iter().map(|w| enrich_word(w, level)).collect();
            Ok(BlockPayload::Vocabulary(crate::model::VocabularyContent {
                words,
            }))
        }
        // Other block types, including unknown ones, pass through as-is.
        other => Ok(other.clone()),
    }
}

fn enrich_pair(pair: &SentencePair, level: ProficiencyLevel) -> Result<SentencePair, String> {
    if pair.english.trim().is_empty() {
        return Err(format!("pair '{}' has an empty English side", pair.id));
    }
    let mut enriched = pair.clone();
    enriched.id = Uuid::new_v4().to_string();
    enriched.enrichment = Some(match level {
        ProficiencyLevel::Beginner => SentenceEnrichment::Beginner {
            phonetics: phonetics(&pair.english),
            simplified: simplify(&pair.english),
        },
        ProficiencyLevel::Intermediate => SentenceEnrichment::Intermediate {
            phrases: common_phrases(&pair.english),
        },
        ProficiencyLevel::Advanced => SentenceEnrichment::Advanced {
            synonyms: difficulty::keywords(&pair.english),
            advanced_usage: format!("Formal register: \"{}\"", pair.english),
        },
    });
    Ok(enriched)
}

fn enrich_word(entry: &VocabularyEntry, level: ProficiencyLevel) -> VocabularyEntry {
    let word = &entry.word;
    let mut enriched = entry.clone();
    enriched.enrichment = Some(match level {
        ProficiencyLevel::Beginner => VocabularyEnrichment::Beginner {
            phonetics: phonetics(word),
            examples: vec![format!("Can you use \"{word}\" in a sentence?")],
        },
        ProficiencyLevel::Intermediate => VocabularyEnrichment::Intermediate {
            collocations: vec![format!("daily {word}"), format!("{word} together")],
            examples: vec![format!("We kept up our {word} all month.")],
        },
        ProficiencyLevel::Advanced => VocabularyEnrichment::Advanced {
            synonyms: vec![format!("{word} (formal)")],
            antonyms: Vec::new(),
            advanced_usage: format!("\"{word}\" carries a neutral register in most contexts."),
        },
    });
    enriched
}

/// Crude syllable-style pronunciation guide; a real phonetic transcription
/// comes from the TTS collaborator, not this layer.
fn phonetics(text: &str) -> String {
    let joined = text
        .split_whitespace()
        .map(|w| {
            w.chars()
                .filter(|c| c.is_alphanumeric())
                .collect::<String>()
                .to_lowercase()
        })
        .filter(|w| !w.is_empty())
        .collect::<Vec<_>>()
        .join("-");
    format!("/{joined}/")
}

const SIMPLIFIED_MAX_WORDS: usize = 8;

fn simplify(english: &str) -> String {
    let words: Vec<&str> = english.split_whitespace().collect();
    if words.len() <= SIMPLIFIED_MAX_WORDS {
        return english.to_string();
    }
    let mut short = words[..SIMPLIFIED_MAX_WORDS].join(" ");
    short = short.trim_end_matches([',', ';', ':']).to_string();
    short.push('.');
    short
}

/// Consecutive content-word bigrams, capped at three.
fn common_phrases(english: &str) -> Vec<String> {
    let words: Vec<String> = english
        .split_whitespace()
        .map(|w| {
            w.chars()
                .filter(|c| c.is_alphanumeric())
                .collect::<String>()
                .to_lowercase()
        })
        .collect();
    words
        .windows(2)
        .filter(|w| w[0].len() >= 3 && w[1].len() >= 3)
        .take(3)
        .map(|w| format!("{} {}", w[0], w[1]))
        .collect()
}

fn supplementary_blocks(level: ProficiencyLevel, pairs: &[SentencePair]) -> Vec<ContentBlock> {
    let exercise_items = |kind: ExerciseKind| -> Vec<ExerciseItem> {
        pairs
            .iter()
            .take(3)
            .filter_map(|p| match kind {
                ExerciseKind::Basic => Some(ExerciseItem {
                    prompt: p.chinese.clone(),
                    answer: p.english.clone(),
                }),
                ExerciseKind::Translation => Some(ExerciseItem {
                    prompt: p.english.clone(),
                    answer: p.chinese.clone(),
                }),
                ExerciseKind::FillInBlank => {
                    let blank = p
                        .english
                        .split_whitespace()
                        .max_by_key(|w| w.chars().filter(|c| c.is_alphanumeric()).count())?;
                    let word: String = blank.chars().filter(|c| c.is_alphanumeric()).collect();
                    Some(ExerciseItem {
                        prompt: p.english.replacen(&word, "____", 1),
                        answer: word,
                    })
                }
            })
            .collect()
    };

    let block = |kind: &str, title: &str, payload: BlockPayload| ContentBlock {
        id: format!("supp-{level}-{kind}"),
        order: 0,
        title: Some(title.to_string()),
        payload,
    };

    match level {
        ProficiencyLevel::Beginner => vec![
            block(
                "grammar",
                "Grammar notes",
                BlockPayload::Grammar(GrammarContent::Explanations {
                    title: "Grammar notes".into(),
                    explanations: vec![
                        "English statements follow subject, verb, object order.".into(),
                        "Chinese marks past time with words like 了 and 时, not verb endings."
                            .into(),
                    ],
                }),
            ),
            block(
                "exercise",
                "Practice",
                BlockPayload::Exercise(ExerciseContent {
                    title: "Practice".into(),
                    kind: ExerciseKind::Basic,
                    instructions: "Translate each sentence into English.".into(),
                    items: exercise_items(ExerciseKind::Basic),
                }),
            ),
        ],
        ProficiencyLevel::Intermediate => vec![
            block(
                "phrases",
                "Common phrases",
                BlockPayload::Phrases(crate::model::PhrasesContent {
                    phrases: pairs
                        .iter()
                        .flat_map(|p| common_phrases(&p.english))
                        .take(6)
                        .map(|phrase| PhraseEntry {
                            phrase,
                            translation: String::new(),
                            usage: None,
                        })
                        .collect(),
                }),
            ),
            block(
                "exercise",
                "Fill in the blanks",
                BlockPayload::Exercise(ExerciseContent {
                    title: "Fill in the blanks".into(),
                    kind: ExerciseKind::FillInBlank,
                    instructions: "Complete each sentence with the missing word.".into(),
                    items: exercise_items(ExerciseKind::FillInBlank),
                }),
            ),
        ],
        ProficiencyLevel::Advanced => vec![
            block(
                "expressions",
                "Advanced expressions",
                BlockPayload::AdvancedExpressions(crate::model::AdvancedExpressionsContent {
                    expressions: pairs
                        .iter()
                        .flat_map(|p| difficulty::keywords(&p.english))
                        .take(6)
                        .map(|kw| ExpressionEntry {
                            meaning: format!("nuanced use of \"{kw}\""),
                            example: None,
                            expression: kw,
                        })
                        .collect(),
                }),
            ),
            block(
                "exercise",
                "Translation practice",
                BlockPayload::Exercise(ExerciseContent {
                    title: "Translation practice".into(),
                    kind: ExerciseKind::Translation,
                    instructions: "Translate each sentence into Chinese.".into(),
                    items: exercise_items(ExerciseKind::Translation),
                }),
            ),
        ],
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::testkit::{sample_course, single_pair_lesson};

    fn one_block_course() -> CourseData {
        let mut course = sample_course("c1");
        course.lessons = vec![single_pair_lesson()];
        course
    }

    #[test]
    fn beginner_adaptation_appends_exactly_two_blocks_with_fresh_ids() {
        let course = one_block_course();
        let source_ids: Vec<String> = course.lessons[0]
            .content_blocks
            .iter()
            .map(|b| b.id.clone())
            .collect();

        let (adapted, report) = adapt(&course, ProficiencyLevel::Beginner);
        let blocks = &adapted.lessons[0].content_blocks;
        assert_eq!(blocks.len(), 3);
        assert_eq!(blocks[1].kind(), "grammar");
        assert_eq!(blocks[2].kind(), "exercise");
        for block in blocks {
            assert!(!source_ids.contains(&block.id));
        }
        assert_eq!(report.blocks_adapted, 1);
        assert!(report.blocks_failed.is_empty());
    }

    #[test]
    fn re_adapting_to_same_level_is_idempotent() {
        let course = one_block_course();
        let (once, _) = adapt(&course, ProficiencyLevel::Intermediate);
        let (twice, _) = adapt(&once, ProficiencyLevel::Intermediate);
        assert_eq!(
            once.lessons[0].content_blocks.len(),
            twice.lessons[0].content_blocks.len()
        );
        assert_eq!(once.course.title, twice.course.title);
    }

    #[test]
    fn source_course_is_untouched() {
        let course = one_block_course();
        let before = serde_json::to_value(&course).unwrap();
        let _ = adapt(&course, ProficiencyLevel::Advanced);
        assert_eq!(serde_json::to_value(&course).unwrap(), before);
    }

    #[test]
    fn beginner_pairs_gain_phonetics_and_simplified_form() {
        let course = one_block_course();
        let (adapted, _) = adapt(&course, ProficiencyLevel::Beginner);
        let BlockPayload::Sentences(content) = &adapted.lessons[0].content_blocks[0].payload
        else {
            panic!("expected sentences block");
        };
        let Some(SentenceEnrichment::Beginner { phonetics, simplified }) =
            &content.pairs[0].enrichment
        else {
            panic!("expected beginner enrichment");
        };
        assert!(phonetics.starts_with('/'));
        assert!(!simplified.is_empty());
    }

    #[test]
    fn failed_block_is_reported_and_carried_over() {
        let mut course = one_block_course();
        let BlockPayload::Sentences(content) =
            &mut course.lessons[0].content_blocks[0].payload
        else {
            unreachable!();
        };
        content.pairs[0].english.clear();

        let (adapted, report) = adapt(&course, ProficiencyLevel::Beginner);
        assert_eq!(report.blocks_failed.len(), 1);
        assert_eq!(report.blocks_failed[0].block_id, "b-solo");
        // Carried over unenriched, supplementary blocks still appended.
        assert_eq!(adapted.lessons[0].content_blocks.len(), 3);
        let BlockPayload::Sentences(carried) = &adapted.lessons[0].content_blocks[0].payload
        else {
            panic!("expected sentences block");
        };
        assert!(carried.pairs[0].enrichment.is_none());
    }

    #[test]
    fn vocabulary_entries_are_enriched_per_level() {
        let course = sample_course("c1");
        let (adapted, _) = adapt(&course, ProficiencyLevel::Advanced);
        let vocab = adapted.lessons[0]
            .content_blocks
            .iter()
            .find_map(|b| match &b.payload {
                BlockPayload::Vocabulary(c) => Some(c),
                _ => None,
            })
            .expect("vocabulary block survives adaptation");
        assert!(matches!(
            vocab.words[0].enrichment,
            Some(VocabularyEnrichment::Advanced { .. })
        ));
    }
}
