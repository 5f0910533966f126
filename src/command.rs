//! The registry of auxiliary commands and the dispatch from a positional
//! argument to a build or a command.

use crate::build::build_site;
use crate::config::Config;
use crate::new_post::new_post;
use crate::serve::serve;
use anyhow::{Context, Result};

/// A named auxiliary command.
pub struct Command {
    pub name: &'static str,
    pub about: &'static str,
    pub run: fn(&Config) -> Result<()>,
}

/// The commands available from the command line, in the order they are
/// listed in [`usage`].
pub fn commands() -> Vec<Command> {
    vec![
        Command {
            name: "serve",
            about: "Serve the generated site locally",
            run: run_serve,
        },
        Command {
            name: "new",
            about: "Create a new post and open it in an editor",
            run: new_post,
        },
    ]
}

fn run_serve(config: &Config) -> Result<()> {
    serve(&config.destination_directory, &config.serve_address).with_context(|| {
        format!(
            "serving `{}` on {}",
            config.destination_directory.display(),
            config.serve_address
        )
    })
}

/// The usage text printed for an unrecognized command.
pub fn usage(commands: &[Command]) -> String {
    let mut out = String::from("usage: chisel [<command>]\n\nPossible commands:\n");
    for command in commands {
        out.push_str(&format!("    {:<12}{}\n", command.name, command.about));
    }
    out.push_str("\nWith no command, chisel builds the site.\n");
    out
}

/// What a positional argument resolves to.
pub enum Action<'a> {
    Build,
    Run(&'a Command),
    Usage,
}

/// Resolves the optional positional argument against `commands`.
pub fn resolve<'a>(commands: &'a [Command], arg: Option<&str>) -> Action<'a> {
    match arg {
        None => Action::Build,
        Some(name) => match commands.iter().find(|c| c.name == name) {
            Some(command) => Action::Run(command),
            None => Action::Usage,
        },
    }
}

/// Builds the site or runs the named command. An unknown name prints the
/// usage text and succeeds.
pub fn dispatch(config: &Config, arg: Option<&str>) -> Result<()> {
    let commands = commands();
    match resolve(&commands, arg) {
        Action::Build => build_site(config)?,
        Action::Run(command) => (command.run)(config)?,
        Action::Usage => print!("{}", usage(&commands)),
    }
    Ok(())
}
