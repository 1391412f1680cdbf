//! Asset catalog module
//!
//! Scans an asset root one level deep and lists the folders holding
//! qualifying files. The result is memoized per collection by [`CatalogCache`].

mod cache;

pub use cache::CatalogCache;

use serde::Serialize;
use std::io;
use std::path::{Path, PathBuf};
use tokio::fs;

const BYTES_PER_MB: f64 = 1024.0 * 1024.0;

/// Extension policy selecting which files of a folder are listed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FilterRule {
    /// Equirectangular images: names ending in `.JPG` (uppercase only)
    Panorama,
    /// Compressed binary glTF models: `.glb` but not `_uncompressed.glb`
    Model,
}

impl FilterRule {
    /// Check whether a file name passes this collection's filter
    pub fn qualifies(self, filename: &str) -> bool {
        match self {
            Self::Panorama => filename.ends_with(".JPG"),
            Self::Model => {
                filename.ends_with(".glb") && !filename.ends_with("_uncompressed.glb")
            }
        }
    }

    pub const fn name(self) -> &'static str {
        match self {
            Self::Panorama => "panorama",
            Self::Model => "model",
        }
    }
}

/// Listing of every folder under an asset root that holds qualifying files
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Catalog {
    pub folders: Vec<FolderEntry>,
}

/// A first-level subdirectory and its qualifying files
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FolderEntry {
    pub label: String,
    pub files: Vec<FileEntry>,
}

/// A qualifying file.
///
/// Panoramas serialize as a bare file name, models as `{"file", "size"}`.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum FileEntry {
    Image(String),
    Model {
        file: String,
        /// Size in MB, rounded to two decimals
        size: f64,
    },
}

impl FileEntry {
    pub fn file_name(&self) -> &str {
        match self {
            Self::Image(name) | Self::Model { file: name, .. } => name,
        }
    }
}

/// Catalog build failure. Nothing is cached when a build fails.
#[derive(Debug, thiserror::Error)]
pub enum CatalogError {
    #[error("failed to list directory '{}': {source}", path.display())]
    ReadDir {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("failed to read metadata of '{}': {source}", path.display())]
    Metadata {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

/// Convert a byte length to megabytes rounded to two decimal places.
///
/// Exact halves round to even, so 655,360 bytes (0.625 MB) lists as `0.62`.
#[allow(clippy::cast_precision_loss)]
pub fn size_in_mb(bytes: u64) -> f64 {
    let mb = bytes as f64 / BYTES_PER_MB;
    (mb * 100.0).round_ties_even() / 100.0
}

/// Scan `root` and build its catalog.
///
/// Folders and files keep the order the filesystem lists them in unless
/// `sort` is set, in which case both are ordered by name.
pub async fn build_catalog(
    root: &Path,
    rule: FilterRule,
    sort: bool,
) -> Result<Catalog, CatalogError> {
    let mut folders = Vec::new();

    for (label, dir) in list_subdirectories(root).await? {
        let mut files = list_qualifying_files(&dir, rule).await?;
        if files.is_empty() {
            continue;
        }
        if sort {
            files.sort_by(|a, b| a.file_name().cmp(b.file_name()));
        }
        folders.push(FolderEntry { label, files });
    }

    if sort {
        folders.sort_by(|a, b| a.label.cmp(&b.label));
    }

    Ok(Catalog { folders })
}

/// List first-level directories of `root` as `(label, path)` pairs
async fn list_subdirectories(root: &Path) -> Result<Vec<(String, PathBuf)>, CatalogError> {
    let read_dir_err = |source: io::Error| CatalogError::ReadDir {
        path: root.to_path_buf(),
        source,
    };

    let mut entries = fs::read_dir(root).await.map_err(read_dir_err)?;
    let mut dirs = Vec::new();

    while let Some(entry) = entries.next_entry().await.map_err(read_dir_err)? {
        let path = entry.path();
        // Follows symlinks; dangling links are simply not directories
        let is_dir = fs::metadata(&path).await.is_ok_and(|m| m.is_dir());
        if !is_dir {
            continue;
        }
        match entry.file_name().into_string() {
            Ok(label) => dirs.push((label, path)),
            Err(raw) => crate::logger::log_warning(&format!(
                "Skipping folder with non UTF-8 name: {}",
                raw.to_string_lossy()
            )),
        }
    }

    Ok(dirs)
}

/// List the regular files of `dir` that pass `rule`
async fn list_qualifying_files(dir: &Path, rule: FilterRule) -> Result<Vec<FileEntry>, CatalogError> {
    let read_dir_err = |source: io::Error| CatalogError::ReadDir {
        path: dir.to_path_buf(),
        source,
    };

    let mut entries = fs::read_dir(dir).await.map_err(read_dir_err)?;
    let mut files = Vec::new();

    while let Some(entry) = entries.next_entry().await.map_err(read_dir_err)? {
        let name = match entry.file_name().into_string() {
            Ok(name) => name,
            Err(raw) => {
                crate::logger::log_warning(&format!(
                    "Skipping file with non UTF-8 name in {}: {}",
                    dir.display(),
                    raw.to_string_lossy()
                ));
                continue;
            }
        };
        if !rule.qualifies(&name) {
            continue;
        }

        let path = entry.path();
        let metadata = match fs::metadata(&path).await {
            Ok(m) => m,
            Err(e) if e.kind() == io::ErrorKind::NotFound => continue,
            Err(source) => return Err(CatalogError::Metadata { path, source }),
        };
        if !metadata.is_file() {
            continue;
        }

        files.push(match rule {
            FilterRule::Panorama => FileEntry::Image(name),
            FilterRule::Model => FileEntry::Model {
                file: name,
                size: size_in_mb(metadata.len()),
            },
        });
    }

    Ok(files)
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use std::fs as std_fs;

    /// Create `root/folder/name` holding `len` zero bytes
    pub fn write_file(root: &Path, folder: &str, name: &str, len: usize) {
        let dir = root.join(folder);
        std_fs::create_dir_all(&dir).expect("create folder");
        std_fs::write(dir.join(name), vec![0u8; len]).expect("write file");
    }

    #[test]
    fn test_panorama_filter_is_case_sensitive() {
        assert!(FilterRule::Panorama.qualifies("a.JPG"));
        assert!(!FilterRule::Panorama.qualifies("a.jpg"));
        assert!(!FilterRule::Panorama.qualifies("a.PNG"));
        assert!(!FilterRule::Panorama.qualifies("JPG"));
    }

    #[test]
    fn test_model_filter_excludes_uncompressed() {
        assert!(FilterRule::Model.qualifies("m.glb"));
        assert!(!FilterRule::Model.qualifies("m_uncompressed.glb"));
        assert!(!FilterRule::Model.qualifies("m.mtl"));
        assert!(!FilterRule::Model.qualifies("m.GLB"));
        // Only the exact suffix is excluded
        assert!(FilterRule::Model.qualifies("m_uncompressed_v2.glb"));
    }

    #[test]
    fn test_size_in_mb_rounding() {
        assert!((size_in_mb(2_097_152) - 2.0).abs() < f64::EPSILON);
        assert!((size_in_mb(1_048_576) - 1.0).abs() < f64::EPSILON);
        assert!((size_in_mb(1_500_000) - 1.43).abs() < 1e-9);
        assert!((size_in_mb(0) - 0.0).abs() < f64::EPSILON);
        assert!((size_in_mb(4_000) - 0.0).abs() < f64::EPSILON);
        assert!((size_in_mb(6_000) - 0.01).abs() < 1e-9);
    }

    #[test]
    fn test_size_in_mb_halves_round_to_even() {
        assert!((size_in_mb(131_072) - 0.12).abs() < 1e-9);
        assert!((size_in_mb(393_216) - 0.38).abs() < 1e-9);
        assert!((size_in_mb(655_360) - 0.62).abs() < 1e-9);
        assert!((size_in_mb(3_276_800) - 3.12).abs() < 1e-9);
    }

    #[cfg(target_os = "linux")]
    #[tokio::test]
    async fn test_non_utf8_file_names_are_skipped() {
        use std::ffi::OsStr;
        use std::os::unix::ffi::OsStrExt;

        let tmp = tempfile::tempdir().expect("tempdir");
        write_file(tmp.path(), "C", "m.glb", 1_048_576);
        let bad = tmp.path().join("C").join(OsStr::from_bytes(b"bad\xff.glb"));
        std_fs::write(bad, b"x").expect("write file");

        let catalog = build_catalog(tmp.path(), FilterRule::Model, false)
            .await
            .expect("catalog");
        let json = serde_json::to_string(&catalog).expect("serialize");
        assert_eq!(
            json,
            r#"{"folders":[{"label":"C","files":[{"file":"m.glb","size":1.0}]}]}"#
        );
    }

    #[tokio::test]
    async fn test_panorama_catalog_skips_empty_folders() {
        let tmp = tempfile::tempdir().expect("tempdir");
        write_file(tmp.path(), "A", "a.JPG", 10);
        write_file(tmp.path(), "A", "b.PNG", 10);
        write_file(tmp.path(), "B", "c.jpg", 10);
        write_file(tmp.path(), "B", "notes.txt", 10);

        let catalog = build_catalog(tmp.path(), FilterRule::Panorama, false)
            .await
            .expect("catalog");
        let json = serde_json::to_string(&catalog).expect("serialize");
        assert_eq!(json, r#"{"folders":[{"label":"A","files":["a.JPG"]}]}"#);
    }

    #[tokio::test]
    async fn test_model_catalog_sizes_and_exclusion() {
        let tmp = tempfile::tempdir().expect("tempdir");
        write_file(tmp.path(), "C", "m.glb", 1_048_576);
        write_file(tmp.path(), "C", "m_uncompressed.glb", 4_096);
        write_file(tmp.path(), "C", "m.mtl", 12);

        let catalog = build_catalog(tmp.path(), FilterRule::Model, false)
            .await
            .expect("catalog");
        let json = serde_json::to_string(&catalog).expect("serialize");
        assert_eq!(
            json,
            r#"{"folders":[{"label":"C","files":[{"file":"m.glb","size":1.0}]}]}"#
        );
    }

    #[tokio::test]
    async fn test_only_uncompressed_models_drop_folder() {
        let tmp = tempfile::tempdir().expect("tempdir");
        write_file(tmp.path(), "D", "x_uncompressed.glb", 10);
        write_file(tmp.path(), "E", "y.glb", 2_097_152);

        let catalog = build_catalog(tmp.path(), FilterRule::Model, false)
            .await
            .expect("catalog");
        assert_eq!(
            catalog,
            Catalog {
                folders: vec![FolderEntry {
                    label: "E".to_string(),
                    files: vec![FileEntry::Model {
                        file: "y.glb".to_string(),
                        size: 2.0,
                    }],
                }],
            }
        );
    }

    #[tokio::test]
    async fn test_root_files_and_nested_dirs_are_ignored() {
        let tmp = tempfile::tempdir().expect("tempdir");
        std_fs::write(tmp.path().join("top.JPG"), b"x").expect("write");
        write_file(tmp.path(), "A/inner", "deep.JPG", 1);
        std_fs::create_dir_all(tmp.path().join("F/dir.JPG")).expect("mkdir");

        let catalog = build_catalog(tmp.path(), FilterRule::Panorama, false)
            .await
            .expect("catalog");
        assert!(catalog.folders.is_empty());
    }

    #[tokio::test]
    async fn test_sorted_listing() {
        let tmp = tempfile::tempdir().expect("tempdir");
        for folder in ["zeta", "alpha", "mid"] {
            for file in ["3.JPG", "1.JPG", "2.JPG"] {
                write_file(tmp.path(), folder, file, 1);
            }
        }

        let catalog = build_catalog(tmp.path(), FilterRule::Panorama, true)
            .await
            .expect("catalog");
        let labels: Vec<_> = catalog.folders.iter().map(|f| f.label.as_str()).collect();
        assert_eq!(labels, ["alpha", "mid", "zeta"]);
        for folder in &catalog.folders {
            let names: Vec<_> = folder.files.iter().map(FileEntry::file_name).collect();
            assert_eq!(names, ["1.JPG", "2.JPG", "3.JPG"]);
        }
    }

    #[tokio::test]
    async fn test_missing_root_is_an_error() {
        let tmp = tempfile::tempdir().expect("tempdir");
        let missing = tmp.path().join("nope");
        let err = build_catalog(&missing, FilterRule::Panorama, false)
            .await
            .expect_err("missing root must fail");
        assert!(matches!(err, CatalogError::ReadDir { ref path, .. } if *path == missing));
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_dangling_symlink_is_skipped() {
        let tmp = tempfile::tempdir().expect("tempdir");
        write_file(tmp.path(), "A", "a.JPG", 1);
        std::os::unix::fs::symlink(tmp.path().join("gone.JPG"), tmp.path().join("A/b.JPG"))
            .expect("symlink");

        let catalog = build_catalog(tmp.path(), FilterRule::Panorama, false)
            .await
            .expect("catalog");
        assert_eq!(catalog.folders[0].files, vec![FileEntry::Image("a.JPG".to_string())]);
    }
}
