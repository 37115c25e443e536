use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::model::block::BlockPayload;
use crate::model::package::CoursePackage;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Error,
    Warning,
}

/// One violated invariant, addressed by a `/courses/0/lessons/2`-style path.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ValidationIssue {
    pub severity: Severity,
    pub path: String,
    pub message: String,
}

impl ValidationIssue {
    fn error(path: String, message: impl Into<String>) -> Self {
        Self {
            severity: Severity::Error,
            path,
            message: message.into(),
        }
    }

    fn warning(path: String, message: impl Into<String>) -> Self {
        Self {
            severity: Severity::Warning,
            path,
            message: message.into(),
        }
    }
}

impl std::fmt::Display for ValidationIssue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.path, self.message)
    }
}

/// True when `issues` contains no error-severity entries. Warnings alone
/// (unknown block types, sparse lesson ordering) never fail validation.
pub fn is_valid(issues: &[ValidationIssue]) -> bool {
    issues.iter().all(|i| i.severity != Severity::Error)
}

/// Structurally validate a candidate package.
///
/// Checks required identity fields, id uniqueness per scope, and that the
/// denormalized metadata counts match the actual content. Unknown block
/// types are reported as warnings only, per the forward-compatibility
/// policy.
pub fn validate_package(pkg: &CoursePackage) -> Vec<ValidationIssue> {
    let mut issues = Vec::new();

    if pkg.metadata.id.trim().is_empty() {
        issues.push(ValidationIssue::error(
            "/metadata/id".into(),
            "package id is empty",
        ));
    }

    let counts = pkg.actual_counts();
    let meta = &pkg.metadata;
    for (field, expected, actual) in [
        ("course_count", meta.course_count, counts.courses),
        ("lesson_count", meta.lesson_count, counts.lessons),
        (
            "content_block_count",
            meta.content_block_count,
            counts.content_blocks,
        ),
        (
            "sentence_pair_count",
            meta.sentence_pair_count,
            counts.sentence_pairs,
        ),
    ] {
        if expected != actual {
            issues.push(ValidationIssue::error(
                format!("/metadata/{field}"),
                format!("declared {expected} but package contains {actual}"),
            ));
        }
    }

    let mut course_ids = HashSet::new();
    for (ci, course) in pkg.courses.iter().enumerate() {
        let course_path = format!("/courses/{ci}");
        let meta = &course.course;

        if meta.id.trim().is_empty() {
            issues.push(ValidationIssue::error(
                format!("{course_path}/course/id"),
                "course id is empty",
            ));
        } else if !course_ids.insert(meta.id.clone()) {
            issues.push(ValidationIssue::error(
                format!("{course_path}/course/id"),
                format!("duplicate course id '{}'", meta.id),
            ));
        }
        if meta.title.trim().is_empty() {
            issues.push(ValidationIssue::error(
                format!("{course_path}/course/title"),
                "course title is empty",
            ));
        }

        let mut lesson_ids = HashSet::new();
        let mut lesson_orders = HashSet::new();
        for (li, lesson) in course.lessons.iter().enumerate() {
            let lesson_path = format!("{course_path}/lessons/{li}");

            if lesson.id.trim().is_empty() {
                issues.push(ValidationIssue::error(
                    format!("{lesson_path}/id"),
                    "lesson id is empty",
                ));
            } else if !lesson_ids.insert(lesson.id.clone()) {
                issues.push(ValidationIssue::error(
                    format!("{lesson_path}/id"),
                    format!("duplicate lesson id '{}'", lesson.id),
                ));
            }
            if !meta.id.is_empty() && lesson.course_id != meta.id {
                issues.push(ValidationIssue::error(
                    format!("{lesson_path}/course_id"),
                    format!(
                        "lesson references course '{}' but belongs to '{}'",
                        lesson.course_id, meta.id
                    ),
                ));
            }
            // Order density is not enforced, only flagged.
            if !lesson_orders.insert(lesson.order) {
                issues.push(ValidationIssue::warning(
                    format!("{lesson_path}/order"),
                    format!("order {} repeats within the course", lesson.order),
                ));
            }

            let mut block_ids = HashSet::new();
            for (bi, block) in lesson.content_blocks.iter().enumerate() {
                let block_path = format!("{lesson_path}/content_blocks/{bi}");

                if block.id.trim().is_empty() {
                    issues.push(ValidationIssue::error(
                        format!("{block_path}/id"),
                        "block id is empty",
                    ));
                } else if !block_ids.insert(block.id.clone()) {
                    issues.push(ValidationIssue::error(
                        format!("{block_path}/id"),
                        format!("duplicate block id '{}' within lesson", block.id),
                    ));
                }

                match &block.payload {
                    BlockPayload::Sentences(content) => {
                        for (pi, pair) in content.pairs.iter().enumerate() {
                            if pair.english.trim().is_empty() || pair.chinese.trim().is_empty() {
                                issues.push(ValidationIssue::error(
                                    format!("{block_path}/pairs/{pi}"),
                                    "sentence pair is missing one side",
                                ));
                            }
                        }
                    }
                    BlockPayload::Unknown(_) => {
                        issues.push(ValidationIssue::warning(
                            format!("{block_path}/type"),
                            format!("unknown block type '{}' passed through", block.kind()),
                        ));
                    }
                    _ => {}
                }
            }
        }
    }

    issues
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::testkit::{sample_course, sample_package};

    #[test]
    fn fresh_package_is_valid() {
        let pkg = sample_package();
        let issues = validate_package(&pkg);
        assert!(is_valid(&issues), "unexpected issues: {issues:?}");
    }

    #[test]
    fn count_drift_is_an_error() {
        let mut pkg = sample_package();
        pkg.metadata.lesson_count += 1;
        let issues = validate_package(&pkg);
        assert!(!is_valid(&issues));
        assert!(issues.iter().any(|i| i.path == "/metadata/lesson_count"));
    }

    #[test]
    fn duplicate_block_id_is_an_error() {
        let mut pkg = CoursePackage::new(vec![sample_course("c1")]);
        let lesson = &mut pkg.courses[0].lessons[0];
        let mut dup = lesson.content_blocks[0].clone();
        dup.order = 99;
        lesson.content_blocks.push(dup);
        pkg.refresh_counts();

        let issues = validate_package(&pkg);
        assert!(!is_valid(&issues));
        assert!(issues.iter().any(|i| i.message.contains("duplicate block id")));
    }

    #[test]
    fn unknown_block_is_warning_only() {
        let mut pkg = sample_package();
        let raw = serde_json::json!({
            "id": "bx",
            "order": 7,
            "type": "hologram",
            "content": {}
        });
        let block = serde_json::from_value(raw).unwrap();
        pkg.courses[0].lessons[0].content_blocks.push(block);
        pkg.refresh_counts();

        let issues = validate_package(&pkg);
        assert!(is_valid(&issues));
        assert!(issues.iter().any(|i| i.severity == Severity::Warning));
    }
}
