//! Support for creating an Atom feed from the entry list.

use crate::build::Site;
use crate::config::{Author, FeedSettings};
use crate::entry::Entry;
use crate::urls::FEED_URL;
use atom_syndication::{
    Content, Entry as AtomEntry, Error as AtomError, Feed, FixedDateTime, Link, Person,
};
use chrono::NaiveTime;
use std::io::Write;
use url::{ParseError as UrlParseError, Url};

/// Creates a feed from some settings ([`FeedSettings`]) and a list of
/// [`Entry`]s and writes the result to a [`std::io::Write`].
pub fn write_feed<W: Write>(settings: &FeedSettings, entries: &[Entry], w: W) -> Result<W> {
    Ok(feed(settings, entries)?.write_to(w)?)
}

/// The `GenerateFeed` step: writes `feed.atom` when feed settings are
/// configured.
pub fn generate_feed(site: &Site) -> crate::build::Result<()> {
    let settings = match &site.config.feed {
        Some(settings) => settings,
        None => return Ok(()),
    };
    let buf = write_feed(settings, site.entries, Vec::new())?;
    site.writer.write(FEED_URL, &String::from_utf8_lossy(&buf))?;
    Ok(())
}

fn feed(settings: &FeedSettings, entries: &[Entry]) -> Result<Feed> {
    let mut feed = Feed::default();
    feed.set_title(settings.title.clone());
    feed.set_id(settings.site_url.as_str());
    feed.set_authors(author_to_people(settings.author.as_ref()));
    feed.set_links(vec![alternate(&settings.site_url)]);

    // Use the newest entry's date rather than the current time so rebuilding
    // unchanged sources produces an identical feed.
    if let Some(newest) = entries.first() {
        feed.set_updated(timestamp(newest));
    }

    let mut atom_entries = Vec::with_capacity(entries.len());
    for entry in entries {
        let url = settings.site_url.join(&entry.url)?;
        let date = timestamp(entry);

        let mut content = Content::default();
        content.set_content_type("html".to_owned());
        content.set_value(entry.body_html.clone());

        let mut atom_entry = AtomEntry::default();
        atom_entry.set_title(entry.title.trim().to_owned());
        atom_entry.set_id(url.as_str());
        atom_entry.set_updated(date);
        atom_entry.set_published(date);
        atom_entry.set_authors(author_to_people(settings.author.as_ref()));
        atom_entry.set_links(vec![alternate(&url)]);
        atom_entry.set_content(content);
        atom_entries.push(atom_entry);
    }
    feed.set_entries(atom_entries);
    Ok(feed)
}

fn alternate(url: &Url) -> Link {
    let mut link = Link::default();
    link.set_href(url.as_str());
    link.set_rel("alternate");
    link
}

/// An entry's date at midnight UTC.
fn timestamp(entry: &Entry) -> FixedDateTime {
    entry.date.and_time(NaiveTime::MIN).and_utc().into()
}

fn author_to_people(author: Option<&Author>) -> Vec<Person> {
    match author {
        Some(author) => {
            let mut person = Person::default();
            person.set_name(author.name.as_str());
            person.set_email(author.email.clone());
            vec![person]
        }
        None => Vec::new(),
    }
}

type Result<T> = std::result::Result<T, Error>;

/// Represents a problem creating a feed.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Returned when an entry URL can't be resolved against `site_url`.
    #[error("resolving feed URL")]
    Url(#[from] UrlParseError),

    /// Returned when the feed can't be serialized.
    #[error("writing feed")]
    Atom(#[from] AtomError),
}
