use crate::model::{
    BlockPayload, ContentBlock, GrammarContent, ItemMetadata, LessonData, ModeContentItem,
    NoteSection,
};

/// Notes mode: a single item for the whole lesson, one bilingual section
/// per block in block order.
pub fn lesson_item(lesson: &LessonData) -> Vec<ModeContentItem> {
    let sections: Vec<NoteSection> = lesson.content_blocks.iter().map(block_section).collect();
    if sections.is_empty() {
        return Vec::new();
    }
    vec![ModeContentItem::Notes {
        sections,
        metadata: ItemMetadata {
            source_block_id: lesson.id.clone(),
            difficulty: None,
        },
    }]
}

/// Original mode: every block becomes its own notes-shaped item, whatever
/// its source type. This is the fallback projection and cannot fail.
pub fn per_block_items(lesson: &LessonData) -> Vec<ModeContentItem> {
    lesson
        .content_blocks
        .iter()
        .map(|block| ModeContentItem::Notes {
            sections: vec![block_section(block)],
            metadata: ItemMetadata {
                source_block_id: block.id.clone(),
                difficulty: None,
            },
        })
        .collect()
}

fn block_section(block: &ContentBlock) -> NoteSection {
    let heading = block
        .title
        .clone()
        .unwrap_or_else(|| format!("{} #{}", block.kind(), block.order));

    let (english, chinese) = match &block.payload {
        BlockPayload::Heading(c) => (c.text.clone(), String::new()),
        BlockPayload::Sentences(c) => (
            c.pairs
                .iter()
                .map(|p| p.english.as_str())
                .collect::<Vec<_>>()
                .join(" "),
            c.pairs.iter().map(|p| p.chinese.as_str()).collect(),
        ),
        BlockPayload::Vocabulary(c) => (
            c.words
                .iter()
                .map(|w| w.word.as_str())
                .collect::<Vec<_>>()
                .join(", "),
            c.words
                .iter()
                .map(|w| w.translation.as_str())
                .collect::<Vec<_>>()
                .join("，"),
        ),
        BlockPayload::Grammar(GrammarContent::Points { points }) => (
            points
                .iter()
                .map(|p| format!("{}: {}", p.name, p.explanation))
                .collect::<Vec<_>>()
                .join(" "),
            String::new(),
        ),
        BlockPayload::Grammar(GrammarContent::Explanations { explanations, .. }) => {
            (explanations.join(" "), String::new())
        }
        BlockPayload::Exercise(c) => (c.instructions.clone(), String::new()),
        BlockPayload::Phrases(c) => (
            c.phrases
                .iter()
                .map(|p| p.phrase.as_str())
                .collect::<Vec<_>>()
                .join(", "),
            c.phrases
                .iter()
                .map(|p| p.translation.as_str())
                .collect::<Vec<_>>()
                .join("，"),
        ),
        BlockPayload::AdvancedExpressions(c) => (
            c.expressions
                .iter()
                .map(|e| e.expression.as_str())
                .collect::<Vec<_>>()
                .join(", "),
            c.expressions
                .iter()
                .map(|e| e.meaning.as_str())
                .collect::<Vec<_>>()
                .join("，"),
        ),
        // Unknown blocks keep their place in the notes with empty text.
        BlockPayload::Unknown(_) => (String::new(), String::new()),
    };

    NoteSection {
        heading,
        english,
        chinese,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::testkit::sample_course;

    #[test]
    fn notes_mode_yields_one_item_with_a_section_per_block() {
        let course = sample_course("c1");
        let lesson = &course.lessons[0];
        let items = lesson_item(lesson);
        assert_eq!(items.len(), 1);
        let ModeContentItem::Notes { sections, .. } = &items[0] else {
            panic!("expected notes item");
        };
        assert_eq!(sections.len(), lesson.content_blocks.len());
        assert_eq!(sections[0].heading, "Introduction");
        assert!(sections[1].english.contains("middle school"));
    }

    #[test]
    fn original_mode_yields_one_item_per_block() {
        let course = sample_course("c1");
        let lesson = &course.lessons[0];
        let items = per_block_items(lesson);
        assert_eq!(items.len(), lesson.content_blocks.len());
    }
}
