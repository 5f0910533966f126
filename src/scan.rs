//! Defines the [`Scanner`] and its [`Error`] type: the logic for walking the
//! source tree and parsing each content file into an [`Entry`].
//!
//! A content file looks like this:
//!
//! ```text
//! Hello World
//! 01/15/2024
//!
//! **bold** text
//! ```
//!
//! The first line is the title, the second is the date in the configured
//! entry date format, and everything from the third line on is the markdown
//! body.

use crate::entry::Entry;
use crate::markdown;
use crate::urls::{month_archive_url, slug_for};
use chrono::NaiveDate;
use std::collections::HashMap;
use std::ffi::OsStr;
use std::path::{Path, PathBuf};
use walkdir::{DirEntry, WalkDir};

/// Parses [`Entry`] objects from source files.
pub struct Scanner<'a> {
    /// Extensions (without the dot) of files treated as content.
    extensions: &'a [String],

    /// The `strftime` format of each file's date line.
    entry_time_format: &'a str,

    /// The `strftime` format of [`Entry::pretty_date`].
    time_format: &'a str,
}

impl<'a> Scanner<'a> {
    /// Constructs a new scanner. See fields on [`Scanner`] for argument
    /// descriptions.
    pub fn new(
        extensions: &'a [String],
        entry_time_format: &'a str,
        time_format: &'a str,
    ) -> Scanner<'a> {
        Scanner {
            extensions,
            entry_time_format,
            time_format,
        }
    }

    /// Walks `source_directory` and returns one [`Entry`] per content file, in
    /// directory-walk order. Hidden files and directories are skipped, as are
    /// files whose extension isn't recognized. The first file that fails to
    /// parse aborts the scan, as does any pair of entries sharing a URL.
    pub fn scan(&self, source_directory: &Path) -> Result<Vec<Entry>> {
        if !source_directory.is_dir() {
            return Err(Error::Io {
                path: source_directory.to_owned(),
                source: std::io::Error::new(
                    std::io::ErrorKind::NotFound,
                    "source directory not found",
                ),
            });
        }

        let mut entries = Vec::new();
        let walker = WalkDir::new(source_directory)
            .sort_by(|a, b| a.file_name().cmp(b.file_name()))
            .into_iter()
            .filter_entry(|e| e.depth() == 0 || !is_hidden(e));
        for result in walker {
            let dir_entry = result?;
            if !dir_entry.file_type().is_file() || !self.is_content(dir_entry.path()) {
                continue;
            }
            log::debug!("Reading `{}`", dir_entry.path().display());
            entries.push(self.parse_file(dir_entry.path())?);
        }

        check_unique_urls(&entries)?;
        Ok(entries)
    }

    fn is_content(&self, path: &Path) -> bool {
        match path.extension().and_then(OsStr::to_str) {
            Some(ext) => self.extensions.iter().any(|known| known == ext),
            None => false,
        }
    }

    /// Reads and parses a single source file.
    pub fn parse_file(&self, path: &Path) -> Result<Entry> {
        let contents = std::fs::read_to_string(path).map_err(|source| Error::Io {
            path: path.to_owned(),
            source,
        })?;
        self.parse(path, &contents)
    }

    /// Parses the `contents` of the source file at `path`.
    pub fn parse(&self, path: &Path, contents: &str) -> Result<Entry> {
        let lines: Vec<&str> = contents.lines().collect();
        if lines.len() < 3 {
            return Err(Error::MissingField {
                path: path.to_owned(),
                lines: lines.len(),
            });
        }

        let title = lines[0].to_owned();
        let raw_date = lines[1].trim().to_owned();
        let date = NaiveDate::parse_from_str(&raw_date, self.entry_time_format).map_err(
            |source| Error::MalformedDate {
                path: path.to_owned(),
                value: raw_date.clone(),
                source,
            },
        )?;
        let slug = slug_for(path).ok_or_else(|| Error::InvalidFileName {
            path: path.to_owned(),
        })?;
        let body = lines[2..].join("\n");

        Ok(Entry::new(
            title,
            raw_date,
            date,
            markdown::to_html(&body, &slug),
            date.format(self.time_format).to_string(),
            slug,
            path.to_owned(),
        ))
    }
}

fn is_hidden(entry: &DirEntry) -> bool {
    entry
        .file_name()
        .to_str()
        .map(|name| name.starts_with('.'))
        .unwrap_or(false)
}

/// Fails if two entries resolve to the same output page, or if an entry
/// resolves to its own month's archive page, since one page would silently
/// replace the other.
fn check_unique_urls(entries: &[Entry]) -> Result<()> {
    let mut seen: HashMap<&str, &Path> = HashMap::with_capacity(entries.len());
    for entry in entries {
        if entry.url == month_archive_url(entry.year, entry.month) {
            return Err(Error::ReservedUrl {
                url: entry.url.clone(),
                path: entry.source_path.clone(),
            });
        }
        if let Some(first) = seen.insert(entry.url.as_str(), entry.source_path.as_path()) {
            return Err(Error::DuplicateUrl {
                url: entry.url.clone(),
                first: first.to_owned(),
                second: entry.source_path.clone(),
            });
        }
    }
    Ok(())
}

/// Represents the result of a scan.
pub type Result<T> = std::result::Result<T, Error>;

/// Represents an error scanning the source tree. Every variant identifies the
/// offending path.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Returned when a file's date line doesn't match the entry date format.
    #[error("`{}`: malformed date `{value}`", .path.display())]
    MalformedDate {
        path: PathBuf,
        value: String,
        source: chrono::ParseError,
    },

    /// Returned when a file has fewer than three lines (title, date and the
    /// separator line).
    #[error(
        "`{}`: expected a title line, a date line and a body; found {lines} line(s)",
        .path.display()
    )]
    MissingField { path: PathBuf, lines: usize },

    /// Returned when a file name has nothing to build a URL slug from.
    #[error("`{}`: can't derive a URL slug from the file name", .path.display())]
    InvalidFileName { path: PathBuf },

    /// Returned when two files map to the same detail page.
    #[error(
        "`{}` and `{}` both map to `{url}`",
        .first.display(),
        .second.display()
    )]
    DuplicateUrl {
        url: String,
        first: PathBuf,
        second: PathBuf,
    },

    /// Returned when a file maps to the URL of a month archive page.
    #[error(
        "`{}` maps to `{url}`, which is reserved for the month archive",
        .path.display()
    )]
    ReservedUrl { url: String, path: PathBuf },

    /// Returned when a source file can't be read.
    #[error("reading `{}`", .path.display())]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    /// Returned for errors walking the source tree.
    #[error(transparent)]
    Walk(#[from] walkdir::Error),
}
