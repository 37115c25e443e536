//! Coursepack Core Library
//!
//! Canonical course-package model plus the transformation pipeline built
//! on it: import/export across two wire formats, per-learning-mode content
//! derivation, difficulty-level adaptation, and bilingual sentence
//! alignment.

pub mod adapt;
pub mod align;
pub mod cache;
pub mod error;
pub mod format;
pub mod model;
pub mod package;
pub mod provider;
pub mod transform;

// Re-export commonly used items at crate root
pub use adapt::{AdaptationReport, BlockFailure, adapt};
pub use align::{AlignOptions, AlignmentMethod, align};
pub use error::{CoursePackError, Result};
pub use format::{MediaAsset, MediaType, PackageFormat};
pub use model::{
    ContentBlock, CourseData, CourseLevel, CoursePackage, LearningMode, LessonData, ModeContent,
    ProficiencyLevel, SentencePair, validate_package,
};
pub use package::{
    CreateOptions, ExportOptions, ExportResult, ImportOptions, ImportResult, PackageConfig,
    PackageManager,
};
pub use provider::{ApiClient, HttpApiClient};
pub use transform::{TransformOptions, transform};
