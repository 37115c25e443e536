//! Package orchestration: import (parse, validate, persist), export
//! (fetch, serialize, package), course synthesis from material analysis,
//! and the entry points that delegate to mode transformation and level
//! adaptation.
//!
//! Stages within one operation run strictly sequentially; suspension
//! happens only at I/O boundaries. Independent operations may run
//! concurrently, sharing nothing but the package cache.

use std::sync::Arc;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::adapt::{self, AdaptationReport};
use crate::cache::{Lookup, PackageCache};
use crate::error::{CoursePackError, Result};
use crate::format::{self, MediaAsset, MediaType, PackageFormat};
use crate::model::{
    BlockPayload, ContentBlock, CourseData, CourseLevel, CourseMeta, CoursePackage, CourseStatus,
    HeadingContent, LearningMode, LessonData, ModeContent, ProficiencyLevel, SentencePair,
    SentencesContent, Severity, VocabularyContent, VocabularyEntry, is_valid, validate_package,
};
use crate::provider::{ApiClient, fetch_audio_manifest, fetch_material_analysis};
use crate::transform::{TransformOptions, transform};

#[derive(Debug, Clone, Default)]
pub struct ImportOptions {
    /// Declared media type of the artifact; sniffed from the bytes when
    /// absent.
    pub declared_media_type: Option<String>,
}

#[derive(Debug, Clone)]
pub struct ExportOptions {
    pub format: PackageFormat,
    /// Bundle referenced media into binary exports. Ignored for JSON.
    pub include_media: bool,
}

impl ExportOptions {
    pub fn new(format: PackageFormat) -> Self {
        Self {
            format,
            include_media: format == PackageFormat::Binary,
        }
    }
}

#[derive(Debug, Clone)]
pub struct CreateOptions {
    pub title: Option<String>,
    pub source_language: String,
    pub target_language: String,
}

impl Default for CreateOptions {
    fn default() -> Self {
        Self {
            title: None,
            source_language: "en".into(),
            target_language: "zh".into(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ImportResult {
    pub package_id: String,
    pub courses_imported: usize,
    pub lessons_imported: usize,
    pub content_blocks_imported: usize,
    pub sentence_pairs_imported: usize,
    pub warnings: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExportResult {
    pub package_id: String,
    pub format: PackageFormat,
    pub compression: Option<String>,
    pub file_size_bytes: u64,
    pub download_url: Option<String>,
    pub courses_exported: usize,
    pub lessons_exported: usize,
    pub content_blocks_exported: usize,
}

#[derive(Debug, Clone)]
pub struct PackageConfig {
    pub cache_capacity: usize,
    pub cache_ttl: Duration,
}

impl Default for PackageConfig {
    fn default() -> Self {
        Self {
            cache_capacity: 64,
            cache_ttl: Duration::from_secs(300),
        }
    }
}

/// The import/export entry point. Constructed with its collaborators
/// injected so tests can substitute fakes; owns the package cache.
pub struct PackageManager {
    api: Arc<dyn ApiClient>,
    cache: PackageCache,
}

impl PackageManager {
    pub fn new(api: Arc<dyn ApiClient>, config: PackageConfig) -> Self {
        Self {
            api,
            cache: PackageCache::new(config.cache_capacity, config.cache_ttl),
        }
    }

    /// Import a package artifact: parse per media type, validate, persist.
    pub async fn import_package(
        &self,
        bytes: &[u8],
        options: &ImportOptions,
    ) -> Result<(ImportResult, Vec<MediaAsset>)> {
        let media_type = match &options.declared_media_type {
            Some(declared) => MediaType::from_declared(declared)?,
            None => MediaType::sniff(bytes),
        };
        debug!(?media_type, size = bytes.len(), "importing package artifact");

        let (pkg, media) = match media_type {
            MediaType::Json => (format::from_json_bytes(bytes)?, Vec::new()),
            MediaType::Archive => format::from_archive_bytes(bytes)?,
        };

        let issues = validate_package(&pkg);
        if !is_valid(&issues) {
            return Err(CoursePackError::Validation(issues));
        }
        let warnings = issues
            .iter()
            .filter(|i| i.severity == Severity::Warning)
            .map(|i| i.to_string())
            .collect();

        self.persist(&pkg).await?;

        let counts = pkg.actual_counts();
        let result = ImportResult {
            package_id: pkg.metadata.id.clone(),
            courses_imported: counts.courses,
            lessons_imported: counts.lessons,
            content_blocks_imported: counts.content_blocks,
            sentence_pairs_imported: counts.sentence_pairs,
            warnings,
        };
        info!(
            package_id = %result.package_id,
            courses = result.courses_imported,
            "package imported"
        );
        Ok((result, media))
    }

    /// Export the package containing `course_id` in the requested format.
    /// Returns the result record together with the produced artifact.
    pub async fn export_package(
        &self,
        course_id: &str,
        options: &ExportOptions,
    ) -> Result<(ExportResult, Vec<u8>)> {
        let pkg = self.fetch_package(course_id).await?;

        // Round-trip invariant: the denormalized metadata must agree with
        // the content we are about to serialize.
        let issues = validate_package(&pkg);
        if !is_valid(&issues) {
            return Err(CoursePackError::Validation(issues));
        }

        let bytes = match options.format {
            PackageFormat::Json => format::to_json_bytes(&pkg)?,
            PackageFormat::Binary => {
                let media = if options.include_media {
                    self.collect_media(&pkg).await?
                } else {
                    Vec::new()
                };
                format::to_archive_bytes(&pkg, &media)?
            }
        };

        let download_url = self.register_export(&pkg, options, bytes.len() as u64).await?;
        let counts = pkg.actual_counts();
        let result = ExportResult {
            package_id: pkg.metadata.id.clone(),
            format: options.format,
            compression: options.format.compression().map(str::to_string),
            file_size_bytes: bytes.len() as u64,
            download_url,
            courses_exported: counts.courses,
            lessons_exported: counts.lessons,
            content_blocks_exported: counts.content_blocks,
        };
        info!(
            package_id = %result.package_id,
            format = %result.format,
            bytes = result.file_size_bytes,
            "package exported"
        );
        Ok((result, bytes))
    }

    /// Assemble a minimal one-lesson course from a material-analysis
    /// result and persist it. Returns the new course id.
    pub async fn create_from_material(
        &self,
        material_id: &str,
        options: &CreateOptions,
    ) -> Result<String> {
        let analysis = fetch_material_analysis(self.api.as_ref(), material_id).await?;
        let course_id = Uuid::new_v4().to_string();
        let title = options
            .title
            .clone()
            .unwrap_or_else(|| format!("Course from material {material_id}"));

        let pairs: Vec<SentencePair> = analysis
            .english
            .iter()
            .zip(analysis.chinese.iter())
            .enumerate()
            .map(|(i, (en, zh))| SentencePair::new(format!("pair-{}", i + 1), en, zh))
            .collect();

        let mut blocks = vec![
            ContentBlock {
                id: Uuid::new_v4().to_string(),
                order: 1,
                title: Some(title.clone()),
                payload: BlockPayload::Heading(HeadingContent {
                    text: title.clone(),
                }),
            },
            ContentBlock {
                id: Uuid::new_v4().to_string(),
                order: 2,
                title: Some("Sentences".into()),
                payload: BlockPayload::Sentences(SentencesContent { pairs }),
            },
        ];
        if !analysis.vocabulary.is_empty() {
            blocks.push(ContentBlock {
                id: Uuid::new_v4().to_string(),
                order: 3,
                title: Some("Vocabulary".into()),
                payload: BlockPayload::Vocabulary(VocabularyContent {
                    words: analysis
                        .vocabulary
                        .iter()
                        .map(|v| VocabularyEntry {
                            word: v.word.clone(),
                            translation: v.translation.clone(),
                            enrichment: None,
                        })
                        .collect(),
                }),
            });
        }

        let course = CourseData {
            course: CourseMeta {
                id: course_id.clone(),
                title: title.clone(),
                description: format!("Generated from material {material_id}"),
                source_language: options.source_language.clone(),
                target_language: options.target_language.clone(),
                level: CourseLevel::Mixed,
                author: String::new(),
                status: CourseStatus::Draft,
                category: String::new(),
                tags: Vec::new(),
            },
            lessons: vec![LessonData {
                id: Uuid::new_v4().to_string(),
                course_id: course_id.clone(),
                title,
                description: String::new(),
                order: 1,
                duration_minutes: 0,
                content_blocks: blocks,
            }],
        };

        let pkg = CoursePackage::new(vec![course]);
        self.persist(&pkg).await?;
        info!(course_id = %course_id, material_id, "course created from material");
        Ok(course_id)
    }

    /// Project one lesson through a learning mode, fetching the audio
    /// manifest from the collaborator when listening mode asks for it.
    pub async fn transform_lesson(
        &self,
        course_id: &str,
        lesson_id: &str,
        mode: LearningMode,
    ) -> Result<ModeContent> {
        let pkg = self.fetch_package(course_id).await?;
        let course = pkg
            .find_course(course_id)
            .ok_or_else(|| CoursePackError::CourseNotFound {
                course_id: course_id.to_string(),
            })?;
        let lesson = course
            .lessons
            .iter()
            .find(|l| l.id == lesson_id)
            .ok_or_else(|| CoursePackError::LessonNotFound {
                lesson_id: lesson_id.to_string(),
            })?;

        let mut options = TransformOptions::default();
        if mode == LearningMode::Listening {
            options.audio = fetch_audio_manifest(self.api.as_ref(), lesson_id).await?;
        }
        Ok(transform(lesson, mode, &options))
    }

    /// Adapt a course to a difficulty tier, persisting the result as a new
    /// package. Adaptation never mutates the source package.
    pub async fn adapt_course(
        &self,
        course_id: &str,
        level: ProficiencyLevel,
    ) -> Result<(String, AdaptationReport)> {
        let pkg = self.fetch_package(course_id).await?;
        let course = pkg
            .find_course(course_id)
            .ok_or_else(|| CoursePackError::CourseNotFound {
                course_id: course_id.to_string(),
            })?;

        let (adapted, report) = adapt::adapt(course, level);
        let new_course_id = adapted.course.id.clone();
        let new_pkg = CoursePackage::new(vec![adapted]);
        self.persist(&new_pkg).await?;
        info!(
            source = course_id,
            adapted = %new_course_id,
            %level,
            failed_blocks = report.blocks_failed.len(),
            "course adapted"
        );
        Ok((new_course_id, report))
    }

    /// Cache-aware package lookup by course id. Stale entries are
    /// refreshed; if the refresh fails upstream the stale snapshot is
    /// served instead.
    async fn fetch_package(&self, course_id: &str) -> Result<Arc<CoursePackage>> {
        match self.cache.get(course_id) {
            Lookup::Fresh(pkg) => Ok(pkg),
            Lookup::Stale(stale) => match self.fetch_remote(course_id).await {
                Ok(pkg) => Ok(pkg),
                Err(e) => {
                    warn!(course_id, error = %e, "refresh failed, serving stale package");
                    Ok(stale)
                }
            },
            Lookup::Miss => self.fetch_remote(course_id).await,
        }
    }

    async fn fetch_remote(&self, course_id: &str) -> Result<Arc<CoursePackage>> {
        let value = self
            .api
            .get_json(&format!("/api/courses/{course_id}/package"))
            .await?;
        let pkg: CoursePackage =
            serde_json::from_value(value).map_err(|e| CoursePackError::Format {
                reason: format!("backend returned an invalid package: {e}"),
            })?;
        let pkg = Arc::new(pkg);
        self.cache.insert(course_id, Arc::clone(&pkg));
        Ok(pkg)
    }

    async fn persist(&self, pkg: &CoursePackage) -> Result<()> {
        self.api
            .post_json("/api/packages", serde_json::to_value(pkg)?)
            .await?;
        let pkg = Arc::new(pkg.clone());
        for course in &pkg.courses {
            self.cache.insert(&course.course.id, Arc::clone(&pkg));
        }
        Ok(())
    }

    async fn collect_media(&self, pkg: &CoursePackage) -> Result<Vec<MediaAsset>> {
        let mut media = Vec::new();
        for course in &pkg.courses {
            for lesson in &course.lessons {
                let manifest = fetch_audio_manifest(self.api.as_ref(), &lesson.id).await?;
                let mut entries: Vec<_> = manifest.into_iter().collect();
                entries.sort();
                for (block_id, url) in entries {
                    let bytes = self.api.get_bytes(&url).await?;
                    media.push(MediaAsset {
                        name: format!("{}-{block_id}.mp3", lesson.id),
                        bytes,
                    });
                }
            }
        }
        Ok(media)
    }

    async fn register_export(
        &self,
        pkg: &CoursePackage,
        options: &ExportOptions,
        file_size_bytes: u64,
    ) -> Result<Option<String>> {
        let response = self
            .api
            .post_json(
                "/api/exports",
                serde_json::json!({
                    "package_id": pkg.metadata.id,
                    "format": options.format,
                    "file_size_bytes": file_size_bytes,
                }),
            )
            .await?;
        Ok(response
            .get("url")
            .and_then(|u| u.as_str())
            .map(str::to_string))
    }
}
