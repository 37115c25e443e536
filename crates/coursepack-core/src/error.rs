use thiserror::Error;

use crate::model::ValidationIssue;

#[derive(Error, Debug)]
pub enum CoursePackError {
    #[error("Package validation failed with {} issue(s)", .0.len())]
    Validation(Vec<ValidationIssue>),

    #[error("Unsupported or corrupt package format: {reason}")]
    Format { reason: String },

    #[error("{operation} failed upstream: {reason}")]
    Upstream { operation: String, reason: String },

    #[error("Course {course_id} not found")]
    CourseNotFound { course_id: String },

    #[error("Lesson {lesson_id} not found")]
    LessonNotFound { lesson_id: String },

    #[error("Cannot adapt to level '{level}'")]
    UnsupportedLevel { level: String },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON parse error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("API request failed: {0}")]
    Api(#[from] reqwest::Error),
}

impl CoursePackError {
    /// Wrap a collaborator failure, retaining the original detail.
    pub fn upstream(operation: &str, source: impl std::fmt::Display) -> Self {
        CoursePackError::Upstream {
            operation: operation.to_string(),
            reason: source.to_string(),
        }
    }
}

pub type Result<T> = std::result::Result<T, CoursePackError>;
