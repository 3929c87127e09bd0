use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use walkdir::WalkDir;

/// A file found under a folder, addressed relative to that folder.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FolderEntry {
    /// Relative path with forward slashes.
    pub relative: String,
    pub path: PathBuf,
}

/// Files directly under `dir` whose name ends with `suffix`, sorted by file name.
///
/// A missing directory yields an empty list.
pub fn list_files_with_suffix(dir: &Path, suffix: &str) -> Vec<PathBuf> {
    let Ok(entries) = fs::read_dir(dir) else {
        return Vec::new();
    };

    let mut files: Vec<PathBuf> = entries
        .filter_map(|entry| entry.ok())
        .map(|entry| entry.path())
        .filter(|path| path.is_file())
        .filter(|path| file_name(path).is_some_and(|name| name.ends_with(suffix)))
        .collect();
    files.sort();
    files
}

/// Immediate sub-directories of `dir`, sorted.
pub fn list_subdirs(dir: &Path) -> Vec<PathBuf> {
    let Ok(entries) = fs::read_dir(dir) else {
        return Vec::new();
    };

    let mut dirs: Vec<PathBuf> = entries
        .filter_map(|entry| entry.ok())
        .map(|entry| entry.path())
        .filter(|path| path.is_dir())
        .collect();
    dirs.sort();
    dirs
}

/// Every file below `dir`, sorted by relative path. Symlinks are followed.
pub fn walk_files(dir: &Path) -> Vec<FolderEntry> {
    let mut files: Vec<FolderEntry> = WalkDir::new(dir)
        .min_depth(1)
        .follow_links(true)
        .into_iter()
        .filter_map(|entry| match entry {
            Ok(entry) => Some(entry),
            Err(e) => {
                tracing::warn!(dir = %dir.display(), error = %e, "Skipping unreadable entry");
                None
            }
        })
        .filter(|entry| entry.file_type().is_file())
        .filter_map(|entry| {
            let relative = to_forward_slashes(entry.path().strip_prefix(dir).ok()?);
            Some(FolderEntry {
                relative,
                path: entry.into_path(),
            })
        })
        .collect();
    files.sort_by(|a, b| a.relative.cmp(&b.relative));
    files
}

/// Bundled assets of a folder resource: every file except `excluded` at the folder root.
pub fn bundled_assets(dir: &Path, excluded: &str) -> Vec<String> {
    walk_files(dir)
        .into_iter()
        .map(|entry| entry.relative)
        .filter(|relative| relative != excluded)
        .collect()
}

pub fn count_files(dir: &Path) -> usize {
    WalkDir::new(dir)
        .into_iter()
        .filter_map(|entry| entry.ok())
        .filter(|entry| entry.file_type().is_file())
        .count()
}

pub fn copy_dir_recursive(src: &Path, dst: &Path) -> io::Result<()> {
    fs::create_dir_all(dst)?;
    for entry in WalkDir::new(src).min_depth(1).follow_links(true) {
        let entry = entry.map_err(io::Error::other)?;
        let Ok(relative) = entry.path().strip_prefix(src) else {
            continue;
        };
        let target = dst.join(relative);
        if entry.file_type().is_dir() {
            fs::create_dir_all(&target)?;
        } else {
            if let Some(parent) = target.parent() {
                fs::create_dir_all(parent)?;
            }
            fs::copy(entry.path(), &target)?;
        }
    }
    Ok(())
}

pub fn file_name(path: &Path) -> Option<&str> {
    path.file_name().and_then(|n| n.to_str())
}

pub fn to_forward_slashes(path: &Path) -> String {
    path.components()
        .map(|c| c.as_os_str().to_string_lossy())
        .collect::<Vec<_>>()
        .join("/")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn touch(path: &Path) {
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, "x").unwrap();
    }

    #[test]
    fn test_list_files_with_suffix() {
        let temp = tempfile::tempdir().unwrap();
        touch(&temp.path().join("b.agent.md"));
        touch(&temp.path().join("a.agent.md"));
        touch(&temp.path().join("notes.md"));
        fs::create_dir(temp.path().join("dir.agent.md")).unwrap();

        let files = list_files_with_suffix(temp.path(), ".agent.md");
        let names: Vec<&str> = files.iter().filter_map(|p| file_name(p)).collect();
        assert_eq!(names, vec!["a.agent.md", "b.agent.md"]);
    }

    #[test]
    fn test_missing_dir_is_empty() {
        let missing = Path::new("/nonexistent/catalog/dir");
        assert!(list_files_with_suffix(missing, ".md").is_empty());
        assert!(list_subdirs(missing).is_empty());
        assert!(bundled_assets(missing, "SKILL.md").is_empty());
    }

    #[test]
    fn test_bundled_assets_excludes_root_manifest_only() {
        let temp = tempfile::tempdir().unwrap();
        touch(&temp.path().join("SKILL.md"));
        touch(&temp.path().join("scripts/run.sh"));
        touch(&temp.path().join("docs/SKILL.md"));
        touch(&temp.path().join("a.txt"));

        let assets = bundled_assets(temp.path(), "SKILL.md");
        assert_eq!(assets, vec!["a.txt", "docs/SKILL.md", "scripts/run.sh"]);
    }

    #[cfg(unix)]
    #[test]
    fn test_bundled_assets_follow_symlinks() {
        let temp = tempfile::tempdir().unwrap();
        let shared = temp.path().join("shared/helper.py");
        touch(&shared);
        let skill = temp.path().join("skill");
        touch(&skill.join("SKILL.md"));
        std::os::unix::fs::symlink(&shared, skill.join("helper.py")).unwrap();
        std::os::unix::fs::symlink(temp.path().join("shared"), skill.join("lib")).unwrap();

        let assets = bundled_assets(&skill, "SKILL.md");
        assert_eq!(assets, vec!["helper.py", "lib/helper.py"]);
    }

    #[test]
    fn test_copy_and_count() {
        let temp = tempfile::tempdir().unwrap();
        let src = temp.path().join("src");
        touch(&src.join("one.md"));
        touch(&src.join("nested/two.md"));

        let dst = temp.path().join("dst");
        copy_dir_recursive(&src, &dst).unwrap();
        assert_eq!(count_files(&dst), 2);
        assert!(dst.join("nested/two.md").exists());
    }
}
