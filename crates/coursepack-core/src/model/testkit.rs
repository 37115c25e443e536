//! Canned packages used by unit and integration tests.

use crate::model::block::{
    BlockPayload, ContentBlock, GrammarContent, GrammarPoint, HeadingContent, SentencePair,
    SentencesContent, VocabularyContent, VocabularyEntry,
};
use crate::model::package::{
    CourseData, CourseLevel, CourseMeta, CoursePackage, CourseStatus, LessonData,
};

pub fn sample_pair(id: &str, english: &str, chinese: &str) -> SentencePair {
    SentencePair::new(id, english, chinese)
}

/// One course with a single lesson: heading, sentences, vocabulary, and a
/// grammar block.
pub fn sample_course(course_id: &str) -> CourseData {
    let lesson = LessonData {
        id: format!("{course_id}-l1"),
        course_id: course_id.to_string(),
        title: "School memories".into(),
        description: "Talking about school days".into(),
        order: 1,
        duration_minutes: 15,
        content_blocks: vec![
            ContentBlock {
                id: format!("{course_id}-b1"),
                order: 1,
                title: Some("Introduction".into()),
                payload: BlockPayload::Heading(HeadingContent {
                    text: "School memories".into(),
                }),
            },
            ContentBlock {
                id: format!("{course_id}-b2"),
                order: 2,
                title: Some("Dialogue".into()),
                payload: BlockPayload::Sentences(SentencesContent {
                    pairs: vec![
                        sample_pair(
                            "p1",
                            "I hated English in middle school.",
                            "我在中学时讨厌英语。",
                        ),
                        sample_pair("p2", "Now I practice every day.", "现在我每天练习。"),
                    ],
                }),
            },
            ContentBlock {
                id: format!("{course_id}-b3"),
                order: 3,
                title: Some("Key words".into()),
                payload: BlockPayload::Vocabulary(VocabularyContent {
                    words: vec![
                        VocabularyEntry {
                            word: "practice".into(),
                            translation: "练习".into(),
                            enrichment: None,
                        },
                        VocabularyEntry {
                            word: "memory".into(),
                            translation: "记忆".into(),
                            enrichment: None,
                        },
                    ],
                }),
            },
            ContentBlock {
                id: format!("{course_id}-b4"),
                order: 4,
                title: Some("Grammar focus".into()),
                payload: BlockPayload::Grammar(GrammarContent::Points {
                    points: vec![GrammarPoint {
                        name: "past habits with 'used to'".into(),
                        explanation: "Describes something once true but no longer.".into(),
                        examples: vec!["I used to hate English.".into()],
                    }],
                }),
            },
        ],
    };

    CourseData {
        course: CourseMeta {
            id: course_id.to_string(),
            title: "Everyday English".into(),
            description: "Conversational starter course".into(),
            source_language: "en".into(),
            target_language: "zh".into(),
            level: CourseLevel::Mixed,
            author: "tester".into(),
            status: CourseStatus::Published,
            category: "conversation".into(),
            tags: vec!["daily-life".into()],
        },
        lessons: vec![lesson],
    }
}

pub fn sample_package() -> CoursePackage {
    CoursePackage::new(vec![sample_course("c1")])
}

/// A lesson whose only content is one sentences block with a single pair,
/// matching the canonical transform examples.
pub fn single_pair_lesson() -> LessonData {
    LessonData {
        id: "l-solo".into(),
        course_id: "c-solo".into(),
        title: "Middle school".into(),
        description: String::new(),
        order: 1,
        duration_minutes: 5,
        content_blocks: vec![ContentBlock {
            id: "b-solo".into(),
            order: 1,
            title: Some("Dialogue".into()),
            payload: BlockPayload::Sentences(SentencesContent {
                pairs: vec![sample_pair(
                    "p1",
                    "I hated English in middle school.",
                    "我在中学时讨厌英语。",
                )],
            }),
        }],
    }
}
