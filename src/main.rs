use std::process;
use tracing::{debug, info};
use sqlzoo::{
    config::{self, Config},
    fixtures, questions,
    results_grid::ResultsGrid,
    ConnectionManager, ConnectionTarget, Result, SqlzooError,
};

const USAGE: &str = "usage: sqlzoo [database] [question...]";

fn main() {
    let config = match config::load_default_config() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("{}", e);
            process::exit(1);
        }
    };

    let level = match config.log_level() {
        Ok(level) => level,
        Err(e) => {
            eprintln!("{}", e);
            process::exit(1);
        }
    };
    // Results go to stdout; keep logs on stderr.
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .init();

    info!("Starting sqlzoo...");

    let args: Vec<String> = std::env::args().skip(1).collect();
    if let Err(e) = run(&config, &args) {
        eprintln!("{}", e);
        process::exit(1);
    }
}

/// Splits the arguments into a target and question names.
///
/// The first argument is the database unless a configured database exists and
/// that argument names a question.
fn resolve_target<'a>(config: &'a Config, args: &'a [String]) -> Result<(&'a str, &'a [String])> {
    match (args.split_first(), config.database_path()) {
        (Some((first, _)), Some(path)) if questions::find(first).is_some() => Ok((path, args)),
        (Some((target, names)), _) => Ok((target.as_str(), names)),
        (None, Some(path)) => Ok((path, args)),
        (None, None) => Err(SqlzooError::Usage(format!("no database given; {}", USAGE))),
    }
}

fn run(config: &Config, args: &[String]) -> Result<()> {
    let (target, names) = resolve_target(config, args)?;
    debug!("Using database {}", target);

    if names.is_empty() {
        for question in questions::all() {
            println!("{:<20} {}", question.name, question.prompt);
        }
        return Ok(());
    }

    let target = ConnectionTarget::parse(target);
    let format = config.output_format();
    ConnectionManager::scoped(target, |manager| {
        if manager.target().is_memory() {
            debug!("Seeding in-memory catalog");
            fixtures::load_sample_catalog(manager.acquire()?)?;
        }

        for name in names {
            let question = questions::get(name)?;
            let rows = question.run(manager)?;
            let grid = ResultsGrid::from_rows(&rows);

            println!("-- {}", question.name);
            if format.eq_ignore_ascii_case("table") {
                print!("{}", grid.render());
                println!("({} rows)", grid.row_count());
            } else {
                print!("{}", grid.export(format)?);
            }
        }
        Ok(())
    })
}
