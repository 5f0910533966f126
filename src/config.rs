//! Defines the [`Config`] type and the logic for locating and loading a
//! project's `chisel.yaml`. Every path in the file is relative to the
//! directory containing it. A project without a `chisel.yaml` is built with
//! [`Config::default_for`], rooted at the project directory.

use serde::Deserialize;
use std::path::{Path, PathBuf};
use url::Url;

/// The name of the project file searched for by [`Config::from_directory`].
pub const PROJECT_FILE: &str = "chisel.yaml";

#[derive(Deserialize, Default)]
#[serde(default)]
struct Project {
    source: Option<PathBuf>,
    destination: Option<PathBuf>,
    #[serde(rename = "static")]
    static_directory: Option<PathBuf>,
    templates: ProjectTemplates,
    home_show: Option<usize>,
    time_format: Option<String>,
    entry_time_format: Option<String>,
    extensions: Option<Vec<String>>,
    regenerate_archives: bool,
    editor: Option<String>,
    serve_address: Option<String>,
    feed: Option<FeedSettings>,
}

#[derive(Deserialize, Default)]
#[serde(default)]
struct ProjectTemplates {
    directory: Option<PathBuf>,
    layout: Vec<PathBuf>,
    home: Option<PathBuf>,
    detail: Option<PathBuf>,
    archive: Option<PathBuf>,
    about: Option<PathBuf>,
    projects: Option<PathBuf>,
}

/// An author credited in the Atom feed.
#[derive(Deserialize, Clone, Debug, PartialEq)]
pub struct Author {
    pub name: String,
    #[serde(default)]
    pub email: Option<String>,
}

/// Settings for the optional Atom feed. The feed step only runs when these
/// are present.
#[derive(Deserialize, Clone, Debug, PartialEq)]
pub struct FeedSettings {
    pub title: String,

    /// The absolute URL the destination directory is published at. Entry
    /// links in the feed are resolved against it, so it should end in a
    /// trailing slash.
    pub site_url: Url,

    #[serde(default)]
    pub author: Option<Author>,
}

/// Template files for each page kind. Paths are absolute once the config is
/// loaded.
#[derive(Clone, Debug, PartialEq)]
pub struct TemplateFiles {
    /// Files prepended to every page template, typically holding shared
    /// `{{define}}` blocks.
    pub layout: Vec<PathBuf>,
    pub home: PathBuf,
    pub detail: PathBuf,
    pub archive: PathBuf,
    pub about: Option<PathBuf>,
    pub projects: Option<PathBuf>,
}

/// The fully-resolved settings for one project.
#[derive(Clone, Debug, PartialEq)]
pub struct Config {
    /// The directory scanned for post source files.
    pub source_directory: PathBuf,

    /// The root of the generated site.
    pub destination_directory: PathBuf,

    /// The directory copied to `{destination_directory}/static`.
    pub static_directory: PathBuf,

    pub templates: TemplateFiles,

    /// The number of entries listed on the home page. `None` lists all of
    /// them.
    pub home_show: Option<usize>,

    /// The `strftime` format for an entry's display date.
    pub time_format: String,

    /// The `strftime` format of the date line in each source file.
    pub entry_time_format: String,

    /// Recognized content file extensions, without the leading dot.
    pub extensions: Vec<String>,

    /// Rewrite year and month archive pages even if they already exist.
    pub regenerate_archives: bool,

    pub editor: Option<String>,
    pub serve_address: String,
    pub feed: Option<FeedSettings>,
}

impl Config {
    /// Searches `dir` and each of its ancestors for [`PROJECT_FILE`] and
    /// loads the first one found. If there is none, returns the defaults
    /// rooted at `dir`. A relative `dir` is resolved against the current
    /// directory first, so the search still reaches its ancestors.
    pub fn from_directory(dir: &Path) -> Result<Config> {
        let start = dir.canonicalize().map_err(|source| Error::Io {
            path: dir.to_owned(),
            source,
        })?;
        for candidate in start.ancestors() {
            let path = candidate.join(PROJECT_FILE);
            if path.is_file() {
                log::debug!("Loading configuration from `{}`", path.display());
                return Config::from_project_file(&path);
            }
        }

        log::debug!(
            "No `{}` found above `{}`; using defaults",
            PROJECT_FILE,
            dir.display()
        );
        Ok(Config::default_for(dir))
    }

    /// Loads a specific project file.
    pub fn from_project_file(path: &Path) -> Result<Config> {
        let contents = std::fs::read_to_string(path).map_err(|source| Error::Io {
            path: path.to_owned(),
            source,
        })?;
        // serde_yaml rejects an empty document
        let project: Project = if contents.trim().is_empty() {
            Project::default()
        } else {
            serde_yaml::from_str(&contents).map_err(|source| Error::Yaml {
                path: path.to_owned(),
                source,
            })?
        };
        let root = path.parent().unwrap_or_else(|| Path::new("."));
        let config = Config::from_project(root, project);
        config.validate()?;
        Ok(config)
    }

    /// The settings used when a project has no `chisel.yaml`.
    pub fn default_for(root: &Path) -> Config {
        Config::from_project(root, Project::default())
    }

    fn from_project(root: &Path, project: Project) -> Config {
        let resolve = |value: Option<PathBuf>, default: &str| {
            root.join(value.unwrap_or_else(|| PathBuf::from(default)))
        };
        let template_directory = resolve(project.templates.directory, "templates");
        let template = |value: Option<PathBuf>, default: &str| {
            template_directory.join(value.unwrap_or_else(|| PathBuf::from(default)))
        };

        Config {
            source_directory: resolve(project.source, "posts"),
            destination_directory: resolve(project.destination, "export"),
            static_directory: resolve(project.static_directory, "static"),
            templates: TemplateFiles {
                layout: project
                    .templates
                    .layout
                    .iter()
                    .map(|relpath| template_directory.join(relpath))
                    .collect(),
                home: template(project.templates.home, "home.html"),
                detail: template(project.templates.detail, "detail.html"),
                archive: template(project.templates.archive, "archive.html"),
                about: project
                    .templates
                    .about
                    .map(|relpath| template_directory.join(relpath)),
                projects: project
                    .templates
                    .projects
                    .map(|relpath| template_directory.join(relpath)),
            },
            home_show: project.home_show,
            time_format: project
                .time_format
                .unwrap_or_else(|| String::from("%b %d, %Y")),
            entry_time_format: project
                .entry_time_format
                .unwrap_or_else(|| String::from("%m/%d/%Y")),
            extensions: project
                .extensions
                .unwrap_or_else(|| vec![String::from("md"), String::from("markdown")]),
            regenerate_archives: project.regenerate_archives,
            editor: project.editor,
            serve_address: project
                .serve_address
                .unwrap_or_else(|| String::from("127.0.0.1:8080")),
            feed: project.feed,
        }
    }

    /// Rejects date formats `chrono` can't handle. An invalid format would
    /// otherwise only surface as a panic the first time a date is displayed.
    pub fn validate(&self) -> Result<()> {
        use chrono::format::{Item, StrftimeItems};

        let formats: [(&'static str, &str); 2] = [
            ("time_format", &self.time_format),
            ("entry_time_format", &self.entry_time_format),
        ];
        for &(setting, format) in formats.iter() {
            if StrftimeItems::new(format).any(|item| matches!(item, Item::Error)) {
                return Err(Error::InvalidFormat {
                    setting,
                    format: format.to_owned(),
                });
            }
        }
        Ok(())
    }
}

/// The result of loading a [`Config`].
pub type Result<T> = std::result::Result<T, Error>;

/// Represents a problem loading the project configuration.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Returned when the project file can't be read.
    #[error("reading `{}`", .path.display())]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    /// Returned when the project file isn't valid YAML for a [`Config`].
    #[error("parsing `{}`", .path.display())]
    Yaml {
        path: PathBuf,
        source: serde_yaml::Error,
    },

    /// Returned when a date format setting isn't a valid `strftime` string.
    #[error("`{setting}` is not a valid date format: `{format}`")]
    InvalidFormat {
        setting: &'static str,
        format: String,
    },
}

#[cfg(test)]
mod test {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_defaults_without_project_file() -> anyhow::Result<()> {
        let dir = TempDir::new()?;
        let config = Config::from_directory(dir.path())?;
        assert_eq!(config, Config::default_for(dir.path()));
        assert_eq!(config.source_directory, dir.path().join("posts"));
        assert_eq!(config.destination_directory, dir.path().join("export"));
        assert_eq!(config.templates.home, dir.path().join("templates/home.html"));
        assert_eq!(config.templates.about, None);
        assert_eq!(config.home_show, None);
        assert_eq!(config.entry_time_format, "%m/%d/%Y");
        assert_eq!(config.extensions, vec!["md", "markdown"]);
        assert!(!config.regenerate_archives);
        Ok(())
    }

    #[test]
    fn test_project_file_found_in_ancestor() -> anyhow::Result<()> {
        let dir = TempDir::new()?;
        std::fs::write(
            dir.path().join(PROJECT_FILE),
            "source: content\n\
             destination: public\n\
             home_show: 5\n\
             templates:\n  \
               directory: theme\n  \
               layout: [base.html]\n  \
               about: about.html\n\
             feed:\n  \
               title: Notes\n  \
               site_url: https://example.com/\n",
        )?;
        let nested = dir.path().join("content/2024");
        std::fs::create_dir_all(&nested)?;

        let config = Config::from_directory(&nested)?;
        let root = dir.path().canonicalize()?;
        assert_eq!(config.source_directory, root.join("content"));
        assert_eq!(config.destination_directory, root.join("public"));
        assert_eq!(config.home_show, Some(5));
        assert_eq!(config.templates.layout, vec![root.join("theme/base.html")]);
        assert_eq!(config.templates.detail, root.join("theme/detail.html"));
        assert_eq!(config.templates.about, Some(root.join("theme/about.html")));
        let feed = config.feed.expect("feed settings");
        assert_eq!(feed.site_url.as_str(), "https://example.com/");
        Ok(())
    }

    #[test]
    fn test_relative_directory_searches_ancestors() -> anyhow::Result<()> {
        let dir = TempDir::new()?;
        let root = dir.path().canonicalize()?;
        std::fs::write(root.join(PROJECT_FILE), "destination: public\n")?;
        std::fs::create_dir_all(root.join("posts"))?;

        let cwd = std::env::current_dir()?;
        std::env::set_current_dir(root.join("posts"))?;
        let result = Config::from_directory(Path::new("."));
        std::env::set_current_dir(cwd)?;

        let config = result?;
        assert_eq!(config.source_directory, root.join("posts"));
        assert_eq!(config.destination_directory, root.join("public"));
        Ok(())
    }

    #[test]
    fn test_empty_project_file_means_defaults() -> anyhow::Result<()> {
        let dir = TempDir::new()?;
        let root = dir.path().canonicalize()?;
        std::fs::write(root.join(PROJECT_FILE), "\n  \n")?;
        assert_eq!(Config::from_directory(&root)?, Config::default_for(&root));
        Ok(())
    }

    #[test]
    fn test_missing_directory() {
        let dir = TempDir::new().unwrap();
        assert!(matches!(
            Config::from_directory(&dir.path().join("nope")),
            Err(Error::Io { .. })
        ));
    }

    #[test]
    fn test_invalid_date_format_rejected() -> anyhow::Result<()> {
        let dir = TempDir::new()?;
        std::fs::write(dir.path().join(PROJECT_FILE), "time_format: \"%Q\"\n")?;
        match Config::from_directory(dir.path()) {
            Err(Error::InvalidFormat { setting, .. }) => assert_eq!(setting, "time_format"),
            Err(e) => panic!("unexpected error: {}", e),
            Ok(_) => panic!("expected an invalid format error"),
        }
        Ok(())
    }

    #[test]
    fn test_malformed_yaml() -> anyhow::Result<()> {
        let dir = TempDir::new()?;
        std::fs::write(dir.path().join(PROJECT_FILE), "home_show: [\n")?;
        assert!(matches!(
            Config::from_directory(dir.path()),
            Err(Error::Yaml { .. })
        ));
        Ok(())
    }
}
