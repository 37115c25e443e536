use crate::model::{
    BlockPayload, ItemMetadata, LearningMode, LessonData, ModeContentItem,
};
use crate::transform::difficulty;

/// One translation card per sentence pair, prompt and answer swapped by
/// direction. Non-sentence blocks contribute nothing.
pub fn items(lesson: &LessonData, mode: LearningMode) -> Vec<ModeContentItem> {
    let mut out = Vec::new();
    for block in &lesson.content_blocks {
        let BlockPayload::Sentences(content) = &block.payload else {
            continue;
        };
        for pair in &content.pairs {
            let (prompt, answer) = match mode {
                LearningMode::ChineseToEnglish => (pair.chinese.clone(), pair.english.clone()),
                _ => (pair.english.clone(), pair.chinese.clone()),
            };
            // Keywords and difficulty always come from the English side;
            // the heuristics are word-based and meaningless on hanzi.
            out.push(ModeContentItem::Translation {
                prompt,
                answer,
                keywords: difficulty::keywords(&pair.english),
                metadata: ItemMetadata {
                    source_block_id: block.id.clone(),
                    difficulty: Some(difficulty::classify(&pair.english)),
                },
            });
        }
    }
    out
}
