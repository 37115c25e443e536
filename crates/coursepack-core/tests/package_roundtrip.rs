//! End-to-end package-manager tests against an in-memory backend fake.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use pretty_assertions::assert_eq;

use coursepack_core::error::{CoursePackError, Result};
use coursepack_core::model::testkit::sample_package;
use coursepack_core::model::{CoursePackage, LearningMode, ModeContentItem, ProficiencyLevel};
use coursepack_core::package::{
    CreateOptions, ExportOptions, ImportOptions, PackageConfig, PackageManager,
};
use coursepack_core::provider::ApiClient;
use coursepack_core::{MediaType, PackageFormat};

/// Backend fake: stores packages keyed by course id, serves canned
/// material analysis and audio manifests.
#[derive(Default)]
struct FakeApi {
    packages: Mutex<HashMap<String, serde_json::Value>>,
}

#[async_trait]
impl ApiClient for FakeApi {
    async fn get_json(&self, path: &str) -> Result<serde_json::Value> {
        if let Some(course_id) = path
            .strip_prefix("/api/courses/")
            .and_then(|rest| rest.strip_suffix("/package"))
        {
            return self
                .packages
                .lock()
                .unwrap()
                .get(course_id)
                .cloned()
                .ok_or_else(|| CoursePackError::CourseNotFound {
                    course_id: course_id.to_string(),
                });
        }
        if path.starts_with("/api/materials/") {
            return Ok(serde_json::json!({
                "english": ["Good morning.", "See you tomorrow."],
                "chinese": ["早上好。", "明天见。"],
                "vocabulary": [{ "word": "morning", "translation": "早上" }]
            }));
        }
        if path.starts_with("/api/lessons/") {
            // One audio file per known sentences block id.
            return Ok(serde_json::json!({ "c1-b2": "/media/c1-b2.mp3" }));
        }
        Err(CoursePackError::Upstream {
            operation: path.to_string(),
            reason: "unexpected GET".into(),
        })
    }

    async fn post_json(&self, path: &str, body: serde_json::Value) -> Result<serde_json::Value> {
        match path {
            "/api/packages" => {
                let pkg: CoursePackage = serde_json::from_value(body.clone()).unwrap();
                let mut store = self.packages.lock().unwrap();
                for course in &pkg.courses {
                    store.insert(course.course.id.clone(), body.clone());
                }
                Ok(serde_json::json!({ "ok": true }))
            }
            "/api/exports" => Ok(serde_json::json!({
                "url": format!("https://files.example/exports/{}", body["package_id"].as_str().unwrap())
            })),
            other => Err(CoursePackError::Upstream {
                operation: other.to_string(),
                reason: "unexpected POST".into(),
            }),
        }
    }

    async fn get_bytes(&self, _path: &str) -> Result<Vec<u8>> {
        Ok(vec![0xAA, 0xBB, 0xCC])
    }
}

fn manager() -> PackageManager {
    PackageManager::new(Arc::new(FakeApi::default()), PackageConfig::default())
}

#[tokio::test]
async fn json_round_trip_reproduces_denormalized_counts() {
    let mgr = manager();
    let pkg = sample_package();
    let bytes = serde_json::to_vec(&pkg).unwrap();

    let (imported, _) = mgr
        .import_package(&bytes, &ImportOptions::default())
        .await
        .unwrap();
    assert_eq!(imported.courses_imported, pkg.metadata.course_count);
    assert_eq!(imported.lessons_imported, pkg.metadata.lesson_count);
    assert_eq!(
        imported.content_blocks_imported,
        pkg.metadata.content_block_count
    );

    let (exported, artifact) = mgr
        .export_package("c1", &ExportOptions::new(PackageFormat::Json))
        .await
        .unwrap();
    assert_eq!(exported.courses_exported, imported.courses_imported);
    assert_eq!(exported.compression, None);
    assert_eq!(exported.file_size_bytes, artifact.len() as u64);
    assert!(exported.download_url.unwrap().contains(&exported.package_id));

    let (reimported, _) = mgr
        .import_package(&artifact, &ImportOptions::default())
        .await
        .unwrap();
    assert_eq!(reimported.courses_imported, imported.courses_imported);
    assert_eq!(reimported.lessons_imported, imported.lessons_imported);
    assert_eq!(
        reimported.content_blocks_imported,
        imported.content_blocks_imported
    );
}

#[tokio::test]
async fn binary_round_trip_bundles_media_and_reproduces_counts() {
    let mgr = manager();
    let pkg = sample_package();
    let bytes = serde_json::to_vec(&pkg).unwrap();
    mgr.import_package(&bytes, &ImportOptions::default())
        .await
        .unwrap();

    let (exported, artifact) = mgr
        .export_package("c1", &ExportOptions::new(PackageFormat::Binary))
        .await
        .unwrap();
    assert_eq!(exported.compression.as_deref(), Some("gzip"));
    assert_eq!(MediaType::sniff(&artifact), MediaType::Archive);

    let (reimported, media) = mgr
        .import_package(
            &artifact,
            &ImportOptions {
                declared_media_type: Some("application/gzip".into()),
            },
        )
        .await
        .unwrap();
    assert_eq!(reimported.courses_imported, pkg.metadata.course_count);
    assert_eq!(reimported.lessons_imported, pkg.metadata.lesson_count);
    assert_eq!(
        reimported.content_blocks_imported,
        pkg.metadata.content_block_count
    );
    assert_eq!(media.len(), 1);
    assert!(media[0].name.contains("c1-b2"));
}

#[tokio::test]
async fn tampered_counts_abort_import_with_validation_issues() {
    let mgr = manager();
    let mut pkg = sample_package();
    pkg.metadata.course_count = 42;
    let bytes = serde_json::to_vec(&pkg).unwrap();

    let err = mgr
        .import_package(&bytes, &ImportOptions::default())
        .await
        .unwrap_err();
    let CoursePackError::Validation(issues) = err else {
        panic!("expected validation failure, got {err}");
    };
    assert!(issues.iter().any(|i| i.path == "/metadata/course_count"));
}

#[tokio::test]
async fn undeclared_unsupported_media_type_is_rejected() {
    let mgr = manager();
    let err = mgr
        .import_package(
            b"whatever",
            &ImportOptions {
                declared_media_type: Some("text/csv".into()),
            },
        )
        .await
        .unwrap_err();
    assert!(matches!(err, CoursePackError::Format { .. }));
}

#[tokio::test]
async fn create_from_material_builds_a_minimal_course() {
    let mgr = manager();
    let course_id = mgr
        .create_from_material("m-77", &CreateOptions::default())
        .await
        .unwrap();

    let (exported, artifact) = mgr
        .export_package(&course_id, &ExportOptions::new(PackageFormat::Json))
        .await
        .unwrap();
    assert_eq!(exported.courses_exported, 1);
    assert_eq!(exported.lessons_exported, 1);
    // heading + sentences + vocabulary
    assert_eq!(exported.content_blocks_exported, 3);

    let pkg: CoursePackage = serde_json::from_slice(&artifact).unwrap();
    assert_eq!(pkg.metadata.sentence_pair_count, 2);
}

#[tokio::test]
async fn listening_transform_pulls_audio_from_the_collaborator() {
    let mgr = manager();
    let pkg = sample_package();
    let bytes = serde_json::to_vec(&pkg).unwrap();
    mgr.import_package(&bytes, &ImportOptions::default())
        .await
        .unwrap();

    let lesson_id = &pkg.courses[0].lessons[0].id;
    let content = mgr
        .transform_lesson("c1", lesson_id, LearningMode::Listening)
        .await
        .unwrap();
    assert_eq!(content.content_items.len(), 1);
    let ModeContentItem::Listening { audio_url, .. } = &content.content_items[0] else {
        panic!("expected listening item");
    };
    assert_eq!(audio_url.as_deref(), Some("/media/c1-b2.mp3"));
}

#[tokio::test]
async fn adapt_course_persists_a_new_package_under_a_new_id() {
    let mgr = manager();
    let pkg = sample_package();
    let bytes = serde_json::to_vec(&pkg).unwrap();
    mgr.import_package(&bytes, &ImportOptions::default())
        .await
        .unwrap();

    let (new_course_id, report) = mgr
        .adapt_course("c1", ProficiencyLevel::Beginner)
        .await
        .unwrap();
    assert_ne!(new_course_id, "c1");
    assert!(report.blocks_failed.is_empty());

    // Both the source and the adapted course remain exportable.
    let (source, _) = mgr
        .export_package("c1", &ExportOptions::new(PackageFormat::Json))
        .await
        .unwrap();
    let (adapted, _) = mgr
        .export_package(&new_course_id, &ExportOptions::new(PackageFormat::Json))
        .await
        .unwrap();
    assert_ne!(source.package_id, adapted.package_id);
    // beginner adaptation appends grammar + exercise to the lesson
    assert_eq!(
        adapted.content_blocks_exported,
        source.content_blocks_exported + 2
    );
}
