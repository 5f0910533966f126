//! Exports the [`build_site`] function which stitches together the high-level
//! steps of building the output static site: scanning the posts
//! ([`crate::scan`]), ordering them ([`crate::entry`]), loading the templates
//! ([`crate::template`]), and running each [`Step`] in turn.

use crate::config::Config;
use crate::entry::{self, Entry};
use crate::feed::Error as FeedError;
use crate::scan::{Error as ScanError, Scanner};
use crate::template::{Error as TemplateError, Templates};
use crate::write::{Error as WriteError, Writer};
use crate::{archive, feed, steps};

/// Everything a [`Step`] gets to work with. Each step in a run sees the same
/// entries, in canonical order.
pub struct Site<'a> {
    pub entries: &'a [Entry],
    pub templates: &'a Templates,
    pub writer: &'a Writer,
    pub config: &'a Config,
}

/// One named unit of build work.
#[derive(Clone, Copy)]
pub struct Step {
    pub name: &'static str,
    pub run: fn(&Site) -> Result<()>,
}

impl Step {
    pub fn new(name: &'static str, run: fn(&Site) -> Result<()>) -> Step {
        Step { name, run }
    }
}

/// Runs an ordered list of [`Step`]s.
pub struct SiteBuilder {
    steps: Vec<Step>,
}

impl SiteBuilder {
    pub fn new(steps: Vec<Step>) -> SiteBuilder {
        SiteBuilder { steps }
    }

    /// The standard step list. The about and projects pages and the Atom
    /// feed are only included when configured.
    pub fn standard(config: &Config) -> SiteBuilder {
        let mut list = Vec::with_capacity(8);
        if config.templates.about.is_some() {
            list.push(Step::new("GenerateAboutPage", steps::generate_about_page));
        }
        if config.templates.projects.is_some() {
            list.push(Step::new(
                "GenerateProjectsPage",
                steps::generate_projects_page,
            ));
        }
        list.push(Step::new("GenerateHomepage", steps::generate_homepage));
        list.push(Step::new(
            "GenerateMasterArchive",
            steps::generate_master_archive,
        ));
        list.push(Step::new("GenerateDetailPages", steps::generate_detail_pages));
        list.push(Step::new(
            "GenerateDateArchives",
            archive::generate_date_archives,
        ));
        if config.feed.is_some() {
            list.push(Step::new("GenerateFeed", feed::generate_feed));
        }
        list.push(Step::new("CopyStaticAssets", steps::copy_static_assets));
        SiteBuilder::new(list)
    }

    /// The names of the steps, in the order they run.
    pub fn step_names(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.steps.iter().map(|step| step.name)
    }

    /// Runs every step in order. The first failure stops the run; pages
    /// written by earlier steps are left in place.
    pub fn run_all(&self, site: &Site) -> Result<()> {
        for step in &self.steps {
            log::info!("\tStarting {}...", step.name);
            (step.run)(site).map_err(|err| Error::Step {
                step: step.name,
                source: Box::new(err),
            })?;
            log::info!("\tDone.");
        }
        Ok(())
    }
}

/// Builds the site from a [`Config`] object: scans and orders the entries,
/// loads the templates, then runs [`SiteBuilder::standard`]. Nothing is
/// written until the scan and the template load have both succeeded.
pub fn build_site(config: &Config) -> Result<()> {
    log::info!("Chiseling...");
    log::info!("Reading files from `{}`...", config.source_directory.display());
    let scanner = Scanner::new(
        &config.extensions,
        &config.entry_time_format,
        &config.time_format,
    );
    let mut entries = scanner.scan(&config.source_directory)?;
    entry::sort_entries(&mut entries);
    log::info!("Read {} entries.", entries.len());

    let templates = Templates::load(&config.templates)?;
    let writer = Writer::new(&config.destination_directory);
    let site = Site {
        entries: &entries,
        templates: &templates,
        writer: &writer,
        config,
    };

    log::info!("Running steps...");
    SiteBuilder::standard(config).run_all(&site)?;
    log::info!("Done.");
    Ok(())
}

/// The result of a build or of a single step.
pub type Result<T> = std::result::Result<T, Error>;

/// The error type for building a site. Errors can come from scanning,
/// templating, writing, or the feed, and errors raised inside a step are
/// annotated with the step's name.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Returned for errors during scanning.
    #[error(transparent)]
    Scan(#[from] ScanError),

    /// Returned for errors loading or rendering templates.
    #[error(transparent)]
    Template(#[from] TemplateError),

    /// Returned for errors writing to the destination directory.
    #[error(transparent)]
    Write(#[from] WriteError),

    /// Returned for errors building the Atom feed.
    #[error(transparent)]
    Feed(#[from] FeedError),

    /// Returned when a step fails.
    #[error("{step}")]
    Step {
        step: &'static str,
        source: Box<Error>,
    },
}
