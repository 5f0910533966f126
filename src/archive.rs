//! Year and month archive pages.
//!
//! Every year and every (year, month) with at least one entry gets an archive
//! page at `<year>/index.html` or `<year>/<MM>/index.html`. These pages are
//! generated incrementally: a page that already exists in the destination
//! directory is left alone, even if the entries it would list have changed
//! since it was written. A post added late to an already-archived month shows
//! up on the home page, the master archive and its own detail page, but not
//! on that month's archive page until the build is run with
//! `regenerate_archives` (or `--force`).

use crate::build::{Result, Site};
use crate::entry::{self, Entry};
use crate::template::{bindings, PageKind};
use gtmpl_value::Value;
use std::collections::BTreeMap;
use std::fmt;

/// The span of time an archive page covers.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord)]
pub enum Period {
    Year(i32),
    Month(i32, u32),
}

impl Period {
    /// The URL of the archive page for this period.
    pub fn url(self) -> String {
        match self {
            Period::Year(year) => crate::urls::year_archive_url(year),
            Period::Month(year, month) => crate::urls::month_archive_url(year, month),
        }
    }
}

impl fmt::Display for Period {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Period::Year(year) => write!(f, "{}", year),
            Period::Month(year, month) => write!(f, "{}/{:02}", year, month),
        }
    }
}

/// The entries belonging to one [`Period`], in canonical order.
pub struct DateArchive<'a> {
    pub period: Period,
    pub entries: Vec<&'a Entry>,
}

impl DateArchive<'_> {
    /// The bindings for the archive template: `entries`, `year`, and `month`
    /// (two digits, or nil for a year archive).
    pub fn to_value(&self) -> Value {
        let (year, month) = match self.period {
            Period::Year(year) => (year, Value::Nil),
            Period::Month(year, month) => (year, Value::String(format!("{:02}", month))),
        };
        bindings(vec![
            ("entries", entry::to_values(self.entries.iter().copied())),
            ("year", Value::from(year as i64)),
            ("month", month),
        ])
    }
}

/// Groups `entries` into one archive per distinct year and one per distinct
/// (year, month). Each archive keeps the relative order of `entries`.
/// Archives are returned ordered by period, years before months.
pub fn date_archives(entries: &[Entry]) -> Vec<DateArchive<'_>> {
    let mut periods: BTreeMap<Period, Vec<&Entry>> = BTreeMap::new();
    for entry in entries {
        periods
            .entry(Period::Year(entry.year))
            .or_insert_with(Vec::new)
            .push(entry);
        periods
            .entry(Period::Month(entry.year, entry.month))
            .or_insert_with(Vec::new)
            .push(entry);
    }
    periods
        .into_iter()
        .map(|(period, entries)| DateArchive { period, entries })
        .collect()
}

/// Counts of archive pages handled by [`write_date_archives`].
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ArchiveStats {
    pub written: usize,
    pub skipped: usize,
}

/// Writes the archive page for every period in `site.entries` that doesn't
/// already have one. When `regenerate_archives` is set, every page is
/// written.
pub fn write_date_archives(site: &Site) -> Result<ArchiveStats> {
    let force = site.config.regenerate_archives;
    let mut stats = ArchiveStats::default();
    for archive in date_archives(site.entries) {
        let url = archive.period.url();
        if !force && site.writer.exists(&url) {
            log::debug!("Skipping {} archive; `{}` exists", archive.period, url);
            stats.skipped += 1;
            continue;
        }
        let html = site.templates.render(PageKind::Archive, archive.to_value())?;
        site.writer.write(&url, &html)?;
        stats.written += 1;
    }
    Ok(stats)
}

/// The `GenerateDateArchives` step.
pub fn generate_date_archives(site: &Site) -> Result<()> {
    let stats = write_date_archives(site)?;
    log::info!(
        "Wrote {} date archive page(s), skipped {} existing",
        stats.written,
        stats.skipped
    );
    Ok(())
}
