//! Defines the [`Writer`], which owns the destination directory and is the
//! only thing that puts files into it.

use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// Writes rendered pages and copied assets under a destination root. Writes
/// are plain overwrites: there is no temp-file-and-rename step, so a crash
/// mid-write can leave a truncated page behind.
pub struct Writer {
    root: PathBuf,
}

impl Writer {
    pub fn new(root: impl Into<PathBuf>) -> Writer {
        Writer { root: root.into() }
    }

    /// Resolves a `/`-separated URL relative to the destination root into a
    /// filesystem path.
    pub fn path(&self, url: &str) -> PathBuf {
        url.split('/')
            .filter(|component| !component.is_empty())
            .fold(self.root.clone(), |path, component| path.join(component))
    }

    /// Reports whether a page has already been written at `url`, by this run
    /// or a previous one.
    pub fn exists(&self, url: &str) -> bool {
        self.path(url).is_file()
    }

    /// Writes `content` to `url`, creating parent directories as needed and
    /// replacing any existing file. Returns the path written.
    pub fn write(&self, url: &str, content: &str) -> Result<PathBuf> {
        let path = self.path(url);
        if let Some(dir) = path.parent() {
            std::fs::create_dir_all(dir).map_err(|source| Error::Io {
                path: dir.to_owned(),
                source,
            })?;
        }
        std::fs::write(&path, content.as_bytes()).map_err(|source| Error::Io {
            path: path.clone(),
            source,
        })?;
        log::debug!("Wrote `{}`", path.display());
        Ok(path)
    }

    /// Recursively copies `src` into the directory at `url`, merging with
    /// whatever is already there and overwriting files with the same
    /// relative path. Returns the number of files copied.
    pub fn copy_tree(&self, src: &Path, url: &str) -> Result<usize> {
        let dst = self.path(url);
        let mut copied = 0;
        for result in WalkDir::new(src) {
            let entry = result?;
            // strip_prefix can't fail; every entry is under `src`
            let relative = match entry.path().strip_prefix(src) {
                Ok(relative) => relative,
                Err(_) => continue,
            };
            let target = dst.join(relative);
            if entry.file_type().is_dir() {
                std::fs::create_dir_all(&target).map_err(|source| Error::Io {
                    path: target.clone(),
                    source,
                })?;
            } else {
                std::fs::copy(entry.path(), &target).map_err(|source| Error::Io {
                    path: target.clone(),
                    source,
                })?;
                copied += 1;
            }
        }
        Ok(copied)
    }
}

/// The result of a fallible write.
pub type Result<T> = std::result::Result<T, Error>;

/// Represents an error writing to the destination directory.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Returned when a file or directory can't be created or written.
    #[error("writing `{}`", .path.display())]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    /// Returned for errors walking a directory being copied.
    #[error(transparent)]
    Walk(#[from] walkdir::Error),
}

#[cfg(test)]
mod test {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_write_creates_parents() -> Result<()> {
        let dir = TempDir::new().unwrap();
        let writer = Writer::new(dir.path());
        let path = writer.write("2024/01/hello-world.html", "<p>hi</p>")?;
        assert_eq!(path, dir.path().join("2024").join("01").join("hello-world.html"));
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "<p>hi</p>");
        assert!(writer.exists("2024/01/hello-world.html"));
        assert!(!writer.exists("2024/01/index.html"));
        Ok(())
    }

    #[test]
    fn test_write_overwrites() -> Result<()> {
        let dir = TempDir::new().unwrap();
        let writer = Writer::new(dir.path());
        writer.write("index.html", "old")?;
        let path = writer.write("index.html", "new")?;
        assert_eq!(std::fs::read_to_string(path).unwrap(), "new");
        Ok(())
    }

    #[test]
    fn test_write_into_file_fails() -> Result<()> {
        let dir = TempDir::new().unwrap();
        let writer = Writer::new(dir.path());
        writer.write("taken", "a file, not a directory")?;
        match writer.write("taken/index.html", "nope") {
            Err(Error::Io { path, .. }) => assert_eq!(path, dir.path().join("taken")),
            other => panic!("expected an I/O error, got {:?}", other),
        }
        Ok(())
    }

    #[test]
    fn test_copy_tree_merges() -> Result<()> {
        let src = TempDir::new().unwrap();
        std::fs::create_dir_all(src.path().join("css")).unwrap();
        std::fs::write(src.path().join("css/site.css"), "body {}").unwrap();
        std::fs::write(src.path().join("logo.svg"), "<svg/>").unwrap();

        let dst = TempDir::new().unwrap();
        let writer = Writer::new(dst.path());
        writer.write("static/keep.txt", "kept")?;

        assert_eq!(writer.copy_tree(src.path(), "static")?, 2);
        let static_dir = dst.path().join("static");
        assert_eq!(
            std::fs::read_to_string(static_dir.join("css/site.css")).unwrap(),
            "body {}"
        );
        assert!(static_dir.join("logo.svg").is_file());
        assert!(static_dir.join("keep.txt").is_file());
        Ok(())
    }
}
