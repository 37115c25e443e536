//! Mode projection: maps a lesson's content blocks into a flat list of
//! practice items, one strategy per learning mode.
//!
//! Every strategy is a pure function over the blocks. A block that cannot
//! produce items for the requested mode is silently skipped; an empty item
//! list is a legitimate outcome, not an error.

use std::collections::HashMap;

use crate::model::{LearningMode, LessonData, ModeContent};

pub mod difficulty;
mod grammar;
mod listening;
mod notes;
mod translation;

/// Extra inputs a strategy may consume. `audio` maps block ids to audio
/// URLs, fetched from the audio collaborator by the package manager when
/// listening mode is requested.
#[derive(Debug, Clone, Default)]
pub struct TransformOptions {
    pub audio: HashMap<String, String>,
}

/// Project `lesson` through `mode`. Never fails: the `Original` strategy
/// accepts any block, and unrecognized mode names already parse to
/// `Original`.
pub fn transform(lesson: &LessonData, mode: LearningMode, options: &TransformOptions) -> ModeContent {
    let content_items = match mode {
        LearningMode::ChineseToEnglish | LearningMode::EnglishToChinese => {
            translation::items(lesson, mode)
        }
        LearningMode::Listening => listening::items(lesson, options),
        LearningMode::Grammar => grammar::items(lesson),
        LearningMode::Notes => notes::lesson_item(lesson),
        LearningMode::Original => notes::per_block_items(lesson),
    };

    ModeContent {
        lesson_id: lesson.id.clone(),
        mode,
        title: format!("{} — {}", lesson.title, mode_label(mode)),
        description: lesson.description.clone(),
        content_items,
    }
}

fn mode_label(mode: LearningMode) -> &'static str {
    match mode {
        LearningMode::ChineseToEnglish => "Chinese to English",
        LearningMode::EnglishToChinese => "English to Chinese",
        LearningMode::Listening => "Listening",
        LearningMode::Grammar => "Grammar",
        LearningMode::Notes => "Notes",
        LearningMode::Original => "Original",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::ModeContentItem;
    use crate::model::testkit::{sample_course, single_pair_lesson};

    #[test]
    fn incompatible_blocks_are_skipped_not_errors() {
        let course = sample_course("c1");
        let lesson = &course.lessons[0];
        // Four blocks, one of which is sentences: translation sees 2 pairs.
        let content = transform(
            lesson,
            LearningMode::ChineseToEnglish,
            &TransformOptions::default(),
        );
        assert_eq!(content.content_items.len(), 2);
    }

    #[test]
    fn lesson_with_no_compatible_blocks_yields_empty_list() {
        let mut lesson = single_pair_lesson();
        lesson.content_blocks.clear();
        let content = transform(&lesson, LearningMode::Grammar, &TransformOptions::default());
        assert!(content.content_items.is_empty());
    }

    #[test]
    fn unrecognized_mode_string_gets_original_projection() {
        let lesson = single_pair_lesson();
        let mode = LearningMode::parse_or_original("vr-immersion");
        let content = transform(&lesson, mode, &TransformOptions::default());
        assert_eq!(content.mode, LearningMode::Original);
        assert_eq!(content.content_items.len(), lesson.content_blocks.len());
        assert!(matches!(
            content.content_items[0],
            ModeContentItem::Notes { .. }
        ));
    }
}
