//! Canonical, format-agnostic course schema: packages, courses, lessons,
//! typed content blocks, and sentence pairs, plus the transient mode-view
//! types and structural validation.

pub mod block;
pub mod mode;
pub mod package;
pub mod testkit;
pub mod validate;

pub use block::{
    AdvancedExpressionsContent, BlockPayload, ContentBlock, ExerciseContent, ExerciseItem,
    ExerciseKind, ExpressionEntry, GrammarContent, GrammarPoint, HeadingContent, PhraseEntry,
    PhrasesContent, SentenceEnrichment, SentencePair, SentencesContent, VocabularyContent,
    VocabularyEnrichment, VocabularyEntry,
};
pub use mode::{
    Difficulty, ItemMetadata, LearningMode, ModeContent, ModeContentItem, NoteSection,
};
pub use package::{
    CourseData, CourseLevel, CourseMeta, CoursePackage, CourseStatus, LessonData,
    PackageCounts, PackageMetadata, ProficiencyLevel,
};
pub use validate::{Severity, ValidationIssue, is_valid, validate_package};
