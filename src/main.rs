use chisel::command;
use chisel::config::Config;
use clap::{App, Arg, ArgMatches};
use log::LevelFilter;
use std::io::Write;
use std::path::Path;

fn main() {
    let matches = App::new("chisel")
        .version(env!("CARGO_PKG_VERSION"))
        .about(env!("CARGO_PKG_DESCRIPTION"))
        .arg(
            Arg::with_name("command")
                .index(1)
                .help("An auxiliary command to run (serve, new); builds the site if omitted"),
        )
        .arg(
            Arg::with_name("project")
                .short("C")
                .long("project")
                .takes_value(true)
                .default_value(".")
                .help("The directory from which chisel.yaml is searched for"),
        )
        .arg(
            Arg::with_name("force")
                .short("f")
                .long("force")
                .help("Regenerate year and month archives even if they exist"),
        )
        .arg(
            Arg::with_name("verbose")
                .short("v")
                .long("verbose")
                .help("Log every file read and written"),
        )
        .get_matches();

    init_logging(matches.is_present("verbose"));

    if let Err(e) = run(&matches) {
        eprintln!("error: {:#}", e);
        std::process::exit(1);
    }
}

fn run(matches: &ArgMatches) -> anyhow::Result<()> {
    let project = Path::new(matches.value_of("project").unwrap_or("."));
    let mut config = Config::from_directory(project)?;
    if matches.is_present("force") {
        config.regenerate_archives = true;
    }
    command::dispatch(&config, matches.value_of("command"))
}

fn init_logging(verbose: bool) {
    let level = if verbose {
        LevelFilter::Debug
    } else {
        LevelFilter::Info
    };
    env_logger::Builder::new()
        .filter_level(level)
        .parse_default_env()
        .target(env_logger::Target::Stdout)
        .format(|buf, record| writeln!(buf, "{}", record.args()))
        .init();
}
