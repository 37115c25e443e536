//! Wire formats for whole packages: a plain JSON document, or a gzip
//! tarball bundling `manifest.json` with referenced media files.

use std::io::{Read, Write};

use flate2::Compression;
use flate2::read::GzDecoder;
use flate2::write::GzEncoder;
use serde::{Deserialize, Serialize};

use crate::error::{CoursePackError, Result};
use crate::model::CoursePackage;

pub const MANIFEST_NAME: &str = "manifest.json";
const GZIP_MAGIC: [u8; 2] = [0x1f, 0x8b];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PackageFormat {
    Json,
    Binary,
}

impl PackageFormat {
    pub fn as_str(&self) -> &'static str {
        match self {
            PackageFormat::Json => "json",
            PackageFormat::Binary => "binary",
        }
    }

    pub fn compression(&self) -> Option<&'static str> {
        match self {
            PackageFormat::Json => None,
            PackageFormat::Binary => Some("gzip"),
        }
    }
}

impl std::fmt::Display for PackageFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Media type declared for an import artifact. When the caller declares
/// nothing we sniff: gzip magic bytes mean an archive, anything else is
/// treated as JSON.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MediaType {
    Json,
    Archive,
}

impl MediaType {
    pub fn from_declared(declared: &str) -> Result<Self> {
        match declared {
            "application/json" => Ok(MediaType::Json),
            "application/gzip" | "application/x-gzip" | "application/zip" => {
                Ok(MediaType::Archive)
            }
            other => Err(CoursePackError::Format {
                reason: format!("unsupported media type '{other}'"),
            }),
        }
    }

    pub fn sniff(bytes: &[u8]) -> Self {
        if bytes.starts_with(&GZIP_MAGIC) {
            MediaType::Archive
        } else {
            MediaType::Json
        }
    }
}

/// A media file bundled alongside the manifest in a binary package.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MediaAsset {
    pub name: String,
    pub bytes: Vec<u8>,
}

pub fn to_json_bytes(pkg: &CoursePackage) -> Result<Vec<u8>> {
    Ok(serde_json::to_vec_pretty(pkg)?)
}

pub fn from_json_bytes(bytes: &[u8]) -> Result<CoursePackage> {
    serde_json::from_slice(bytes).map_err(|e| CoursePackError::Format {
        reason: format!("not a valid package document: {e}"),
    })
}

/// Serialize a package and its media into a gzip tarball.
pub fn to_archive_bytes(pkg: &CoursePackage, media: &[MediaAsset]) -> Result<Vec<u8>> {
    let encoder = GzEncoder::new(Vec::new(), Compression::default());
    let mut builder = tar::Builder::new(encoder);

    let manifest = serde_json::to_vec_pretty(pkg)?;
    append_entry(&mut builder, MANIFEST_NAME, &manifest)?;
    for asset in media {
        append_entry(&mut builder, &format!("media/{}", asset.name), &asset.bytes)?;
    }

    let encoder = builder.into_inner()?;
    Ok(encoder.finish()?)
}

fn append_entry<W: Write>(builder: &mut tar::Builder<W>, path: &str, data: &[u8]) -> Result<()> {
    let mut header = tar::Header::new_gnu();
    header.set_size(data.len() as u64);
    header.set_mode(0o644);
    header.set_cksum();
    builder.append_data(&mut header, path, data)?;
    Ok(())
}

/// Unpack a gzip tarball into its manifest and media files. A missing or
/// unparseable manifest is a format error.
pub fn from_archive_bytes(bytes: &[u8]) -> Result<(CoursePackage, Vec<MediaAsset>)> {
    if !bytes.starts_with(&GZIP_MAGIC) {
        return Err(CoursePackError::Format {
            reason: "artifact is not gzip-compressed".into(),
        });
    }

    let decoder = GzDecoder::new(bytes);
    let mut archive = tar::Archive::new(decoder);
    let mut manifest: Option<Vec<u8>> = None;
    let mut media = Vec::new();

    for entry in archive.entries().map_err(corrupt)? {
        let mut entry = entry.map_err(corrupt)?;
        let path = entry
            .path()
            .map_err(corrupt)?
            .to_string_lossy()
            .into_owned();
        let mut data = Vec::with_capacity(entry.size() as usize);
        entry.read_to_end(&mut data).map_err(corrupt)?;

        if path == MANIFEST_NAME {
            manifest = Some(data);
        } else if let Some(name) = path.strip_prefix("media/") {
            media.push(MediaAsset {
                name: name.to_string(),
                bytes: data,
            });
        }
        // Anything else in the archive is ignored.
    }

    let manifest = manifest.ok_or_else(|| CoursePackError::Format {
        reason: format!("archive has no {MANIFEST_NAME}"),
    })?;
    let pkg = from_json_bytes(&manifest)?;
    Ok((pkg, media))
}

fn corrupt(e: std::io::Error) -> CoursePackError {
    CoursePackError::Format {
        reason: format!("corrupt archive: {e}"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::testkit::sample_package;
    use pretty_assertions::assert_eq;

    #[test]
    fn json_round_trip_preserves_counts() {
        let pkg = sample_package();
        let bytes = to_json_bytes(&pkg).unwrap();
        let back = from_json_bytes(&bytes).unwrap();
        assert_eq!(back.metadata.course_count, pkg.metadata.course_count);
        assert_eq!(back.actual_counts(), pkg.actual_counts());
    }

    #[test]
    fn archive_round_trip_preserves_manifest_and_media() {
        let pkg = sample_package();
        let media = vec![MediaAsset {
            name: "lesson1.mp3".into(),
            bytes: vec![0u8, 1, 2, 3],
        }];
        let bytes = to_archive_bytes(&pkg, &media).unwrap();
        assert!(bytes.starts_with(&GZIP_MAGIC));

        let (back, media_back) = from_archive_bytes(&bytes).unwrap();
        assert_eq!(back.metadata.id, pkg.metadata.id);
        assert_eq!(media_back, media);
    }

    #[test]
    fn archive_survives_a_disk_round_trip() {
        let pkg = sample_package();
        let bytes = to_archive_bytes(&pkg, &[]).unwrap();
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("pkg.tar.gz");
        std::fs::write(&path, &bytes).unwrap();

        let (back, media) = from_archive_bytes(&std::fs::read(&path).unwrap()).unwrap();
        assert_eq!(back.metadata.id, pkg.metadata.id);
        assert!(media.is_empty());
    }

    #[test]
    fn archive_without_manifest_is_a_format_error() {
        let encoder = GzEncoder::new(Vec::new(), Compression::default());
        let mut builder = tar::Builder::new(encoder);
        append_entry(&mut builder, "media/orphan.mp3", b"xx").unwrap();
        let bytes = builder.into_inner().unwrap().finish().unwrap();

        let err = from_archive_bytes(&bytes).unwrap_err();
        assert!(matches!(err, CoursePackError::Format { .. }));
    }

    #[test]
    fn garbage_bytes_are_rejected_per_format() {
        assert!(from_json_bytes(b"not json").is_err());
        assert!(from_archive_bytes(b"not gzip at all").is_err());
    }

    #[test]
    fn media_type_dispatch() {
        assert_eq!(
            MediaType::from_declared("application/json").unwrap(),
            MediaType::Json
        );
        assert_eq!(
            MediaType::from_declared("application/gzip").unwrap(),
            MediaType::Archive
        );
        assert!(MediaType::from_declared("text/csv").is_err());
        assert_eq!(MediaType::sniff(&[0x1f, 0x8b, 0x08]), MediaType::Archive);
        assert_eq!(MediaType::sniff(b"{}"), MediaType::Json);
    }
}
