use std::{
    fs,
    path::{Path, PathBuf},
};

use crate::error::Error;

/// Removes the given files and directories. Directories are emptied
/// recursively; with `purge_tree` every contained subdirectory and the
/// argument directory itself are removed as well, otherwise the
/// directory skeleton stays. An argument naming neither an existing
/// file nor directory aborts immediately, later arguments are left
/// unprocessed.
pub fn rmall<P: AsRef<Path>>(paths: &[P], purge_tree: bool) -> Result<(), Error> {
    for path in paths {
        let path = path.as_ref();
        if path.is_file() {
            remove_file(path)?;
        } else if path.is_dir() {
            purge_dir(path, purge_tree)?;
        } else {
            return Err(Error::NotFileOrDirectory {
                path: path.to_path_buf(),
            });
        }
    }
    Ok(())
}

fn purge_dir(root: &Path, purge_tree: bool) -> Result<(), Error> {
    let mut dirs = Vec::new();
    remove_files(root, &mut dirs)?;
    if purge_tree {
        // Deepest first, a directory can only go once it is empty.
        for dir in dirs.iter().rev() {
            remove_dir(dir)?;
        }
        remove_dir(root)?;
    }
    Ok(())
}

fn remove_files(dir: &Path, dirs: &mut Vec<PathBuf>) -> Result<(), Error> {
    let entries = fs::read_dir(dir).map_err(|source| Error::ReadDir {
        path: dir.to_path_buf(),
        source,
    })?;
    for entry in entries.flatten() {
        let path = entry.path();
        if path.is_dir() {
            dirs.push(path.clone());
            remove_files(&path, dirs)?;
        } else {
            remove_file(&path)?;
        }
    }
    Ok(())
}

fn remove_file(path: &Path) -> Result<(), Error> {
    fs::remove_file(path).map_err(|source| Error::Remove {
        path: path.to_path_buf(),
        source,
    })
}

fn remove_dir(path: &Path) -> Result<(), Error> {
    fs::remove_dir(path).map_err(|source| Error::Remove {
        path: path.to_path_buf(),
        source,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs::File;
    use tempfile::tempdir;

    #[test]
    fn test_removes_single_file() {
        let dir = tempdir().unwrap();
        let file = dir.path().join("a.txt");
        File::create(&file).unwrap();
        rmall(&[&file], true).unwrap();
        assert!(!file.exists());
    }

    #[test]
    fn test_purges_mixed_arguments() {
        let dir = tempdir().unwrap();
        let file = dir.path().join("a.txt");
        let subdir = dir.path().join("subdir");
        File::create(&file).unwrap();
        fs::create_dir(&subdir).unwrap();
        File::create(subdir.join("b.txt")).unwrap();
        fs::create_dir(subdir.join("c")).unwrap();

        rmall(&[&file, &subdir], true).unwrap();

        assert!(!file.exists());
        assert!(!subdir.exists());
    }

    #[test]
    fn test_purge_tree_false_keeps_skeleton() {
        let dir = tempdir().unwrap();
        let subdir = dir.path().join("subdir");
        fs::create_dir(&subdir).unwrap();
        File::create(subdir.join("b.txt")).unwrap();
        fs::create_dir(subdir.join("c")).unwrap();
        File::create(subdir.join("c").join("d.txt")).unwrap();

        rmall(&[&subdir], false).unwrap();

        assert!(subdir.is_dir());
        assert!(subdir.join("c").is_dir());
        assert!(!subdir.join("b.txt").exists());
        assert!(!subdir.join("c").join("d.txt").exists());
    }

    #[test]
    fn test_empty_directory_purge_removes_just_the_directory() {
        let dir = tempdir().unwrap();
        let empty = dir.path().join("empty");
        fs::create_dir(&empty).unwrap();
        rmall(&[&empty], true).unwrap();
        assert!(!empty.exists());
    }

    #[test]
    fn test_deeply_nested_tree_is_removed() {
        let dir = tempdir().unwrap();
        let root = dir.path().join("root");
        let deep = root.join("a").join("b").join("c");
        fs::create_dir_all(&deep).unwrap();
        File::create(deep.join("leaf.txt")).unwrap();
        File::create(root.join("a").join("mid.txt")).unwrap();

        rmall(&[&root], true).unwrap();
        assert!(!root.exists());
    }

    #[test]
    fn test_missing_path_raises_naming_the_argument() {
        let dir = tempdir().unwrap();
        let missing = dir.path().join("missing_thing");
        let err = rmall(&[&missing], true).unwrap_err();
        match err {
            Error::NotFileOrDirectory { path } => assert_eq!(path, missing),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_fail_fast_leaves_later_arguments_untouched() {
        let dir = tempdir().unwrap();
        let missing = dir.path().join("missing_thing");
        let survivor = dir.path().join("survivor.txt");
        File::create(&survivor).unwrap();

        assert!(rmall(&[missing.as_path(), survivor.as_path()], true).is_err());
        assert!(survivor.exists());
    }
}
