//! Defines the [`Entry`] type, one parsed post, along with the canonical
//! ordering used wherever entries are listed and the conversion into template
//! values.

use chrono::{Datelike, NaiveDate, NaiveTime};
use gtmpl_value::Value;
use std::cmp::{Ordering, Reverse};
use std::collections::HashMap;
use std::path::PathBuf;

/// One parsed source file. Entries are built by [`crate::scan`] and never
/// modified afterwards.
#[derive(Clone, Debug, PartialEq)]
pub struct Entry {
    /// The first line of the source file.
    pub title: String,

    /// The second line of the source file, trimmed.
    pub raw_date: String,

    /// `raw_date` parsed with the configured entry date format.
    pub date: NaiveDate,

    pub year: i32,
    pub month: u32,
    pub day: u32,

    /// `date` at midnight UTC as seconds since the Unix epoch. Only used for
    /// ordering.
    pub epoch_seconds: i64,

    /// The body of the source file (line 3 onward) rendered as HTML.
    pub body_html: String,

    /// `date` rendered with the configured display format.
    pub pretty_date: String,

    /// The slugified source file stem.
    pub slug: String,

    /// The detail page URL relative to the destination root.
    pub url: String,

    /// The base name of the source file.
    pub source_filename: String,

    /// The full path of the source file, for diagnostics.
    pub source_path: PathBuf,
}

impl Entry {
    /// Builds an entry from its parsed parts, deriving the calendar fields,
    /// the epoch and the display date from `date`.
    pub fn new(
        title: String,
        raw_date: String,
        date: NaiveDate,
        body_html: String,
        pretty_date: String,
        slug: String,
        source_path: PathBuf,
    ) -> Entry {
        let source_filename = source_path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_default();
        Entry {
            url: crate::urls::detail_url(date.year(), date.month(), &slug),
            year: date.year(),
            month: date.month(),
            day: date.day(),
            epoch_seconds: epoch_seconds(date),
            title,
            raw_date,
            date,
            body_html,
            pretty_date,
            slug,
            source_filename,
            source_path,
        }
    }

    /// The composite sort key: most recent first, then source file name
    /// descending.
    pub fn order_key(&self) -> (Reverse<i64>, Reverse<&str>) {
        (
            Reverse(self.epoch_seconds),
            Reverse(self.source_filename.as_str()),
        )
    }

    /// Converts the entry into a template value. Fields: `title`, `date`
    /// (the display date), `raw_date`, `year`, `month` (two digits), `day`,
    /// `epoch`, `content`, `url`, `filename` and `slug`.
    pub fn to_value(&self) -> Value {
        let mut m: HashMap<String, Value> = HashMap::new();
        m.insert("title".to_owned(), Value::String(self.title.clone()));
        m.insert("date".to_owned(), Value::String(self.pretty_date.clone()));
        m.insert("raw_date".to_owned(), Value::String(self.raw_date.clone()));
        m.insert("year".to_owned(), Value::from(self.year as i64));
        m.insert("month".to_owned(), Value::String(format!("{:02}", self.month)));
        m.insert("day".to_owned(), Value::from(self.day as i64));
        m.insert("epoch".to_owned(), Value::from(self.epoch_seconds));
        m.insert("content".to_owned(), Value::String(self.body_html.clone()));
        m.insert("url".to_owned(), Value::String(self.url.clone()));
        m.insert(
            "filename".to_owned(),
            Value::String(self.source_filename.clone()),
        );
        m.insert("slug".to_owned(), Value::String(self.slug.clone()));
        Value::Object(m)
    }
}

/// Compares two entries by [`Entry::order_key`].
///
/// Two entries with equal keys share a date and a file name, which means they
/// share a year, month and slug and therefore a URL. [`crate::scan`] rejects
/// duplicate URLs, so over any scanned collection this is a strict total
/// order.
pub fn compare(a: &Entry, b: &Entry) -> Ordering {
    a.order_key().cmp(&b.order_key())
}

/// Sorts entries into canonical order. The sort is stable.
pub fn sort_entries(entries: &mut [Entry]) {
    entries.sort_by(compare);
}

/// Converts a slice of entries into a template array.
pub fn to_values<'a>(entries: impl IntoIterator<Item = &'a Entry>) -> Value {
    Value::Array(entries.into_iter().map(Entry::to_value).collect())
}

fn epoch_seconds(date: NaiveDate) -> i64 {
    date.and_time(NaiveTime::MIN).and_utc().timestamp()
}
