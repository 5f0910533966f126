//! The output URL conventions. Every page URL is relative to the destination
//! root and uses `/` separators regardless of platform; [`crate::write`] maps
//! them onto filesystem paths.
//!
//! ```text
//! index.html                 home page
//! archive/index.html         master archive
//! 2024/index.html            year archive
//! 2024/01/index.html         month archive
//! 2024/01/hello-world.html   detail page
//! about/index.html           static pages
//! feed.atom                  Atom feed
//! static/...                 copied assets
//! ```

use std::path::Path;

pub const HOME_URL: &str = "index.html";
pub const MASTER_ARCHIVE_URL: &str = "archive/index.html";
pub const FEED_URL: &str = "feed.atom";
pub const STATIC_URL: &str = "static";

/// The URL of the detail page for an entry dated `year`/`month` with the
/// given slug.
pub fn detail_url(year: i32, month: u32, slug: &str) -> String {
    format!("{}/{:02}/{}.html", year, month, slug)
}

pub fn year_archive_url(year: i32) -> String {
    format!("{}/index.html", year)
}

pub fn month_archive_url(year: i32, month: u32) -> String {
    format!("{}/{:02}/index.html", year, month)
}

/// The URL for a static, entry-independent page such as `about`.
pub fn page_url(name: &str) -> String {
    format!("{}/index.html", name)
}

/// Derives an entry's slug from its source file name (e.g.,
/// `Hello World.md` becomes `hello-world`). Returns `None` if the stem isn't
/// valid UTF-8 or has no characters that survive slugification.
pub fn slug_for(source_path: &Path) -> Option<String> {
    let stem = source_path.file_stem()?.to_str()?;
    let slug = slug::slugify(stem);
    if slug.is_empty() {
        None
    } else {
        Some(slug)
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_month_is_zero_padded() {
        assert_eq!(detail_url(2024, 1, "hello-world"), "2024/01/hello-world.html");
        assert_eq!(month_archive_url(2024, 1), "2024/01/index.html");
        assert_eq!(month_archive_url(1999, 12), "1999/12/index.html");
        assert_eq!(year_archive_url(2024), "2024/index.html");
    }

    #[test]
    fn test_slug_for() {
        assert_eq!(
            slug_for(Path::new("posts/Hello World.md")).as_deref(),
            Some("hello-world")
        );
        assert_eq!(
            slug_for(Path::new("posts/2024/why-rust.markdown")).as_deref(),
            Some("why-rust")
        );
        assert_eq!(slug_for(Path::new("posts/---.md")), None);
    }
}
