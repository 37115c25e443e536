use crate::model::{
    BlockPayload, GrammarContent, ItemMetadata, LessonData, ModeContentItem,
};

/// One item per grammar point, from grammar-typed blocks only. Blocks
/// without explicit grammar data contribute nothing.
pub fn items(lesson: &LessonData) -> Vec<ModeContentItem> {
    let mut out = Vec::new();
    for block in &lesson.content_blocks {
        let BlockPayload::Grammar(content) = &block.payload else {
            continue;
        };
        let metadata = || ItemMetadata {
            source_block_id: block.id.clone(),
            difficulty: None,
        };
        match content {
            GrammarContent::Points { points } => {
                for point in points {
                    out.push(ModeContentItem::Grammar {
                        name: point.name.clone(),
                        explanation: point.explanation.clone(),
                        examples: point.examples.clone(),
                        metadata: metadata(),
                    });
                }
            }
            GrammarContent::Explanations { title, explanations } => {
                for explanation in explanations {
                    out.push(ModeContentItem::Grammar {
                        name: title.clone(),
                        explanation: explanation.clone(),
                        examples: Vec::new(),
                        metadata: metadata(),
                    });
                }
            }
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::testkit::{sample_course, single_pair_lesson};

    #[test]
    fn extracts_points_from_grammar_blocks_only() {
        let course = sample_course("c1");
        let items = items(&course.lessons[0]);
        assert_eq!(items.len(), 1);
        let ModeContentItem::Grammar { name, .. } = &items[0] else {
            panic!("expected grammar item");
        };
        assert_eq!(name, "past habits with 'used to'");
    }

    #[test]
    fn lesson_without_grammar_blocks_yields_nothing() {
        let lesson = single_pair_lesson();
        assert!(items(&lesson).is_empty());
    }
}
