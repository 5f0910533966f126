//! Defines [`PageKind`] and [`Templates`]: the mapping from each kind of page
//! to the template that renders it. Templates use Go template syntax via
//! [`gtmpl`].

use crate::config::TemplateFiles;
use gtmpl::{Context, Template};
use gtmpl_value::Value;
use std::collections::HashMap;
use std::fmt;
use std::path::{Path, PathBuf};

/// The kinds of page the site is built from. Each maps to exactly one
/// template file.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum PageKind {
    Home,
    Detail,
    Archive,
    About,
    Projects,
}

impl PageKind {
    /// The value bound to `page` when rendering this kind.
    pub fn name(self) -> &'static str {
        match self {
            PageKind::Home => "home",
            PageKind::Detail => "detail",
            PageKind::Archive => "archive",
            PageKind::About => "about",
            PageKind::Projects => "projects",
        }
    }
}

impl fmt::Display for PageKind {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// The parsed templates for a site. Loading is all-or-nothing, so a missing
/// or broken template stops the build before any page is written.
pub struct Templates {
    templates: HashMap<PageKind, Template>,
}

impl Templates {
    /// Reads and parses every configured template. `Home`, `Detail` and
    /// `Archive` are required; `About` and `Projects` are loaded only when
    /// configured.
    pub fn load(files: &TemplateFiles) -> Result<Templates> {
        let mut layout = String::new();
        for path in &files.layout {
            layout.push_str(&read(path, None)?);
            layout.push(' ');
        }

        let mut pages: Vec<(PageKind, &Path)> = vec![
            (PageKind::Home, files.home.as_path()),
            (PageKind::Detail, files.detail.as_path()),
            (PageKind::Archive, files.archive.as_path()),
        ];
        if let Some(about) = &files.about {
            pages.push((PageKind::About, about.as_path()));
        }
        if let Some(projects) = &files.projects {
            pages.push((PageKind::Projects, projects.as_path()));
        }

        let mut templates = HashMap::with_capacity(pages.len());
        for (kind, path) in pages {
            let mut contents = layout.clone();
            contents.push_str(&read(path, Some(kind))?);

            let mut template = Template::default();
            template.parse(&contents).map_err(|message| Error::Parse {
                path: path.to_owned(),
                message,
            })?;
            log::debug!("Loaded {} template `{}`", kind, path.display());
            templates.insert(kind, template);
        }
        Ok(Templates { templates })
    }

    /// Renders the template for `kind` with `bindings`. `bindings` should be
    /// a [`Value::Object`]; the `page` key is always set to
    /// [`PageKind::name`].
    pub fn render(&self, kind: PageKind, bindings: Value) -> Result<String> {
        let template = self.templates.get(&kind).ok_or(Error::NotLoaded(kind))?;

        let mut value = bindings;
        if let Value::Object(obj) = &mut value {
            obj.insert("page".to_owned(), Value::String(kind.name().to_owned()));
        }
        let context = Context::from(value).map_err(|message| Error::Render { kind, message })?;

        let mut out: Vec<u8> = Vec::new();
        template
            .execute(&mut out, &context)
            .map_err(|message| Error::Render { kind, message })?;
        String::from_utf8(out).map_err(|e| Error::Render {
            kind,
            message: e.to_string(),
        })
    }
}

/// Builds a [`Value::Object`] from key/value pairs.
pub fn bindings<I>(pairs: I) -> Value
where
    I: IntoIterator<Item = (&'static str, Value)>,
{
    Value::Object(
        pairs
            .into_iter()
            .map(|(key, value)| (key.to_owned(), value))
            .collect(),
    )
}

fn read(path: &Path, kind: Option<PageKind>) -> Result<String> {
    std::fs::read_to_string(path).map_err(|source| match (kind, source.kind()) {
        (Some(kind), std::io::ErrorKind::NotFound) => Error::Missing {
            kind,
            path: path.to_owned(),
        },
        _ => Error::Read {
            path: path.to_owned(),
            source,
        },
    })
}

/// The result of loading or rendering templates.
pub type Result<T> = std::result::Result<T, Error>;

/// Represents an error loading or rendering templates.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Returned at load time when a page template file doesn't exist.
    #[error("missing {kind} template `{}`", .path.display())]
    Missing { kind: PageKind, path: PathBuf },

    /// Returned for other I/O problems reading template files.
    #[error("reading template `{}`", .path.display())]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    /// Returned when a template doesn't parse.
    #[error("parsing template `{}`: {message}", .path.display())]
    Parse { path: PathBuf, message: String },

    /// Returned when a page is rendered with a kind whose template wasn't
    /// configured.
    #[error("no {0} template is configured")]
    NotLoaded(PageKind),

    /// Returned when executing a template fails.
    #[error("rendering {kind} template: {message}")]
    Render { kind: PageKind, message: String },
}

#[cfg(test)]
pub(crate) mod test {
    use super::*;
    use tempfile::TempDir;

    /// Writes a minimal theme into `dir` and returns its file settings. Each
    /// template prints one line per entry so tests can inspect listings.
    pub(crate) fn theme(dir: &Path) -> TemplateFiles {
        let write = |name: &str, contents: &str| {
            let path = dir.join(name);
            std::fs::write(&path, contents).unwrap();
            path
        };
        TemplateFiles {
            layout: vec![write(
                "layout.html",
                r#"{{define "list"}}{{range .entries}}{{.url}}|{{.title}}
{{end}}{{end}}"#,
            )],
            home: write("home.html", r#"{{.page}}
{{template "list" .}}"#),
            detail: write(
                "detail.html",
                r#"{{.page}}
{{.entry.title}}|{{.entry.date}}|{{if .prev}}{{.prev}}{{end}}|{{if .next}}{{.next}}{{end}}
{{.entry.content}}"#,
            ),
            archive: write("archive.html", r#"{{.page}}
{{template "list" .}}"#),
            about: Some(write("about.html", "{{.page}}\n")),
            projects: None,
        }
    }

    #[test]
    fn test_render_binds_page() -> Result<()> {
        let dir = TempDir::new().unwrap();
        let templates = Templates::load(&theme(dir.path()))?;
        assert!(matches!(
            templates.render(PageKind::Projects, bindings(Vec::new())),
            Err(Error::NotLoaded(PageKind::Projects))
        ));
        assert_eq!(
            templates
                .render(PageKind::About, bindings(Vec::new()))?
                .trim(),
            "about"
        );
        Ok(())
    }

    #[test]
    fn test_missing_template_fails_at_load() {
        let dir = TempDir::new().unwrap();
        let mut files = theme(dir.path());
        files.detail = dir.path().join("nope.html");
        match Templates::load(&files) {
            Err(Error::Missing { kind, path }) => {
                assert_eq!(kind, PageKind::Detail);
                assert_eq!(path, dir.path().join("nope.html"));
            }
            Err(e) => panic!("unexpected error: {}", e),
            Ok(_) => panic!("expected a missing template error"),
        }
    }

    #[test]
    fn test_unconfigured_kind() -> Result<()> {
        let dir = TempDir::new().unwrap();
        let templates = Templates::load(&theme(dir.path()))?;
        assert!(matches!(
            templates.render(PageKind::Projects, bindings(Vec::new())),
            Err(Error::NotLoaded(PageKind::Projects))
        ));
        Ok(())
    }
}
