//! The page-generating steps other than the date archives
//! ([`crate::archive`]) and the feed ([`crate::feed`]). Every step here
//! overwrites its output on each run.

use crate::build::{Result, Site};
use crate::entry;
use crate::template::{bindings, PageKind};
use crate::urls::{page_url, HOME_URL, MASTER_ARCHIVE_URL, STATIC_URL};
use gtmpl_value::Value;

/// `GenerateHomepage`: the newest `home_show` entries (all of them if unset)
/// at `index.html`.
pub fn generate_homepage(site: &Site) -> Result<()> {
    let shown = site.config.home_show.unwrap_or(site.entries.len());
    let html = site.templates.render(
        PageKind::Home,
        bindings(vec![(
            "entries",
            entry::to_values(site.entries.iter().take(shown)),
        )]),
    )?;
    site.writer.write(HOME_URL, &html)?;
    Ok(())
}

/// `GenerateMasterArchive`: every entry at `archive/index.html`.
pub fn generate_master_archive(site: &Site) -> Result<()> {
    let html = site.templates.render(
        PageKind::Archive,
        bindings(vec![
            ("entries", entry::to_values(site.entries)),
            ("year", Value::Nil),
            ("month", Value::Nil),
        ]),
    )?;
    site.writer.write(MASTER_ARCHIVE_URL, &html)?;
    Ok(())
}

/// `GenerateDetailPages`: one page per entry at [`entry::Entry::url`]. `prev`
/// is bound to the URL of the next newer entry and `next` to the next older
/// one, or nil at either end.
pub fn generate_detail_pages(site: &Site) -> Result<()> {
    let entries = site.entries;
    let url_at = |i: Option<usize>| match i.and_then(|i| entries.get(i)) {
        Some(neighbor) => Value::String(neighbor.url.clone()),
        None => Value::Nil,
    };

    for (i, entry) in entries.iter().enumerate() {
        let html = site.templates.render(
            PageKind::Detail,
            bindings(vec![
                ("entry", entry.to_value()),
                ("prev", url_at(i.checked_sub(1))),
                ("next", url_at(Some(i + 1))),
            ]),
        )?;
        site.writer.write(&entry.url, &html)?;
    }
    log::debug!("Wrote {} detail page(s)", entries.len());
    Ok(())
}

/// `GenerateAboutPage`: the about template at `about/index.html`.
pub fn generate_about_page(site: &Site) -> Result<()> {
    generate_static_page(site, PageKind::About)
}

/// `GenerateProjectsPage`: the projects template at `projects/index.html`.
pub fn generate_projects_page(site: &Site) -> Result<()> {
    generate_static_page(site, PageKind::Projects)
}

fn generate_static_page(site: &Site, kind: PageKind) -> Result<()> {
    let html = site.templates.render(kind, bindings(Vec::new()))?;
    site.writer.write(&page_url(kind.name()), &html)?;
    Ok(())
}

/// `CopyStaticAssets`: merges the static directory into `static/`. A
/// project without a static directory has nothing to copy.
pub fn copy_static_assets(site: &Site) -> Result<()> {
    let src = &site.config.static_directory;
    if !src.is_dir() {
        log::warn!(
            "Static directory `{}` not found; skipping asset copy",
            src.display()
        );
        return Ok(());
    }
    let copied = site.writer.copy_tree(src, STATIC_URL)?;
    log::debug!("Copied {} static file(s)", copied);
    Ok(())
}
