use chrono::{DateTime, Utc};
use semver::Version;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::model::block::ContentBlock;

/// A complete course package: metadata plus every course it bundles.
///
/// The metadata counts are denormalized for quick validation and reporting;
/// call [`CoursePackage::refresh_counts`] after any structural mutation so
/// they keep matching the actual totals.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CoursePackage {
    pub metadata: PackageMetadata,
    pub courses: Vec<CourseData>,
}

impl CoursePackage {
    /// Build a new package around `courses` with a fresh id and counts
    /// already in sync.
    pub fn new(courses: Vec<CourseData>) -> Self {
        let mut pkg = Self {
            metadata: PackageMetadata {
                id: Uuid::new_v4().to_string(),
                version: Version::new(1, 0, 0),
                created_at: Utc::now(),
                course_count: 0,
                lesson_count: 0,
                content_block_count: 0,
                sentence_pair_count: 0,
            },
            courses,
        };
        pkg.refresh_counts();
        pkg
    }

    /// Actual totals counted from `courses`, ignoring the metadata.
    pub fn actual_counts(&self) -> PackageCounts {
        let mut counts = PackageCounts::default();
        for course in &self.courses {
            counts.courses += 1;
            for lesson in &course.lessons {
                counts.lessons += 1;
                for block in &lesson.content_blocks {
                    counts.content_blocks += 1;
                    counts.sentence_pairs += block.sentence_pair_count();
                }
            }
        }
        counts
    }

    /// Recompute the denormalized metadata counts from the actual content.
    pub fn refresh_counts(&mut self) {
        let counts = self.actual_counts();
        self.metadata.course_count = counts.courses;
        self.metadata.lesson_count = counts.lessons;
        self.metadata.content_block_count = counts.content_blocks;
        self.metadata.sentence_pair_count = counts.sentence_pairs;
    }

    pub fn find_course(&self, course_id: &str) -> Option<&CourseData> {
        self.courses.iter().find(|c| c.course.id == course_id)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PackageMetadata {
    pub id: String,
    pub version: Version,
    pub created_at: DateTime<Utc>,
    pub course_count: usize,
    pub lesson_count: usize,
    pub content_block_count: usize,
    pub sentence_pair_count: usize,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PackageCounts {
    pub courses: usize,
    pub lessons: usize,
    pub content_blocks: usize,
    pub sentence_pairs: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CourseData {
    pub course: CourseMeta,
    pub lessons: Vec<LessonData>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CourseMeta {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub description: String,
    pub source_language: String,
    pub target_language: String,
    pub level: CourseLevel,
    #[serde(default)]
    pub author: String,
    pub status: CourseStatus,
    #[serde(default)]
    pub category: String,
    #[serde(default)]
    pub tags: Vec<String>,
}

/// Level tag carried by a course. `Mixed` marks uncurated material and is
/// never a valid adaptation target.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CourseLevel {
    Beginner,
    Intermediate,
    Advanced,
    Mixed,
}

/// Difficulty tier a course can be adapted to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProficiencyLevel {
    Beginner,
    Intermediate,
    Advanced,
}

impl ProficiencyLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            ProficiencyLevel::Beginner => "beginner",
            ProficiencyLevel::Intermediate => "intermediate",
            ProficiencyLevel::Advanced => "advanced",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            ProficiencyLevel::Beginner => "Beginner",
            ProficiencyLevel::Intermediate => "Intermediate",
            ProficiencyLevel::Advanced => "Advanced",
        }
    }
}

impl From<ProficiencyLevel> for CourseLevel {
    fn from(level: ProficiencyLevel) -> Self {
        match level {
            ProficiencyLevel::Beginner => CourseLevel::Beginner,
            ProficiencyLevel::Intermediate => CourseLevel::Intermediate,
            ProficiencyLevel::Advanced => CourseLevel::Advanced,
        }
    }
}

impl std::fmt::Display for ProficiencyLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for ProficiencyLevel {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "beginner" => Ok(ProficiencyLevel::Beginner),
            "intermediate" => Ok(ProficiencyLevel::Intermediate),
            "advanced" => Ok(ProficiencyLevel::Advanced),
            other => Err(format!("unknown proficiency level '{other}'")),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CourseStatus {
    Draft,
    Published,
    Archived,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LessonData {
    pub id: String,
    pub course_id: String,
    pub title: String,
    #[serde(default)]
    pub description: String,
    pub order: u32,
    #[serde(default)]
    pub duration_minutes: u32,
    pub content_blocks: Vec<ContentBlock>,
}
