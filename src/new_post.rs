//! The `new` command: scaffolds a post source file and opens it in an
//! editor.

use crate::config::Config;
use anyhow::{Context, Result};
use chrono::{Local, NaiveDate};
use dialoguer::Input;
use std::path::PathBuf;
use std::process::Command;

/// Prompts for a title, creates the post file and opens it in the editor.
pub fn new_post(config: &Config) -> Result<()> {
    let title: String = Input::new()
        .with_prompt("Enter post title")
        .interact_text()?;
    let path = match create_post(config, &title, Local::now().date_naive())? {
        Some(path) => path,
        None => {
            println!("Post {} already exists. Exiting.", title);
            return Ok(());
        }
    };

    let editor = editor(config);
    log::info!("Opening `{}` with {}", path.display(), editor);
    let status = Command::new(&editor)
        .arg(&path)
        .status()
        .with_context(|| format!("launching editor `{}`", editor))?;
    if !status.success() {
        anyhow::bail!("editor `{}` exited with {}", editor, status);
    }
    Ok(())
}

/// Writes the skeleton for a post titled `title` dated `today` into the
/// source directory. Returns `None` without touching anything if a post
/// with the same file name already exists.
pub fn create_post(config: &Config, title: &str, today: NaiveDate) -> Result<Option<PathBuf>> {
    let slug = slug::slugify(title);
    if slug.is_empty() {
        anyhow::bail!("post title `{}` has no usable characters", title);
    }
    let path = config.source_directory.join(format!("{}.md", slug));
    if path.exists() {
        return Ok(None);
    }

    std::fs::create_dir_all(&config.source_directory).with_context(|| {
        format!("creating `{}`", config.source_directory.display())
    })?;
    let date = today.format(&config.entry_time_format);
    std::fs::write(&path, format!("{}\n{}\n\n\n", title, date))
        .with_context(|| format!("writing `{}`", path.display()))?;
    Ok(Some(path))
}

fn editor(config: &Config) -> String {
    config
        .editor
        .clone()
        .or_else(|| std::env::var("EDITOR").ok().filter(|e| !e.is_empty()))
        .unwrap_or_else(|| String::from("vim"))
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::scan::Scanner;
    use tempfile::TempDir;

    #[test]
    fn test_create_post() -> Result<()> {
        let dir = TempDir::new()?;
        let config = Config::default_for(dir.path());
        let today = NaiveDate::from_ymd_opt(2024, 3, 9).unwrap();

        let path = create_post(&config, "Hello, World!", today)?.unwrap();
        assert_eq!(path, dir.path().join("posts").join("hello-world.md"));
        assert_eq!(
            std::fs::read_to_string(&path)?,
            "Hello, World!\n03/09/2024\n\n\n"
        );

        // The skeleton is a valid (empty) post.
        let scanner = Scanner::new(
            &config.extensions,
            &config.entry_time_format,
            &config.time_format,
        );
        let entries = scanner.scan(&config.source_directory)?;
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].title, "Hello, World!");
        assert_eq!(entries[0].date, today);
        Ok(())
    }

    #[test]
    fn test_create_post_leaves_existing_alone() -> Result<()> {
        let dir = TempDir::new()?;
        let config = Config::default_for(dir.path());
        let today = NaiveDate::from_ymd_opt(2024, 3, 9).unwrap();
        let path = create_post(&config, "Hello", today)?.unwrap();
        std::fs::write(&path, "Hello\n03/09/2024\n\nwritten")?;

        assert_eq!(create_post(&config, "Hello", today)?, None);
        assert_eq!(std::fs::read_to_string(&path)?, "Hello\n03/09/2024\n\nwritten");
        Ok(())
    }

    #[test]
    fn test_editor_prefers_config() {
        let dir = TempDir::new().unwrap();
        let mut config = Config::default_for(dir.path());
        config.editor = Some(String::from("nano"));
        assert_eq!(editor(&config), "nano");
    }
}
