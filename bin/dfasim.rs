use std::process::ExitCode;

use dfasim::prelude::*;

use owo_colors::OwoColorize;
use tracing::{debug, trace, warn};
use tracing_subscriber::{filter, prelude::*};

use clap::{Arg, ArgMatches, Command};

fn file_arg() -> Arg {
    Arg::new("file")
        .required(true)
        .help("definition file with one `kind:automaton:payload` record per line")
}

fn name_arg() -> Arg {
    Arg::new("name")
        .required(true)
        .help("name of the automaton")
}

fn cli() -> clap::Command {
    let cmd = Command::new("dfasim")
    .about("Loads deterministic finite automata from a definition file and runs words on them")
    .subcommand_required(true)
    .arg(
        Arg::new("verbosity")
        .short('v')
        .long("verbosity")
        .global(true)
        .num_args(0..=1)
        .require_equals(true)
        .value_parser(["info", "debug", "trace"])
        .default_missing_value("info")
    )
    .subcommand(
        Command::new("list")
        .about("lists all automata defined in a file")
        .arg(file_arg())
    )
    .subcommand(
        Command::new("show")
        .about("shows the components and the transition table of an automaton")
        .arg(file_arg())
        .arg(name_arg())
    )
    .subcommand(
        Command::new("test")
        .about("runs a word on an automaton and prints the trace, omit the word to run the empty word")
        .arg(file_arg())
        .arg(name_arg())
        .arg(Arg::new("word").default_value(""))
    )
    .subcommand(
        Command::new("dot")
        .about("prints an automaton in the graphviz DOT format")
        .arg(file_arg())
        .arg(name_arg())
    )
    .subcommand(
        Command::new("example")
        .about("prints an example definition file")
    );

    #[cfg(feature = "random")]
    let cmd = cmd.subcommand(
        Command::new("random")
        .about("prints a random complete automaton in the definition format")
        .arg(Arg::new("states").long("states").default_value("4").value_parser(clap::value_parser!(usize)))
        .arg(Arg::new("symbols").long("symbols").default_value("2").value_parser(clap::value_parser!(usize)))
        .arg(Arg::new("name").long("name").default_value("RANDOM"))
    );

    cmd
}

fn setup_logging(matches: &ArgMatches) {
    let level = match matches
        .try_get_one::<String>("verbosity")
        .ok()
        .flatten()
        .map(|m| m.as_str())
    {
        Some("trace") => filter::LevelFilter::TRACE,
        Some("debug") => filter::LevelFilter::DEBUG,
        Some("info") => filter::LevelFilter::INFO,
        _ => filter::LevelFilter::WARN,
    };

    let stderr_log = tracing_subscriber::fmt::layer()
        .without_time()
        .with_writer(std::io::stderr);

    tracing_subscriber::registry()
        .with(stderr_log.with_filter(level))
        .init();

    trace!("setup {level} logging");
}

fn load(matches: &ArgMatches) -> Result<Registry, String> {
    let file = matches
        .get_one::<String>("file")
        .ok_or("no definition file given")?;
    let report = load_file(file).map_err(|e| format!("error while processing the file: {e}"))?;
    for skipped in &report.skipped {
        warn!("{skipped}");
    }
    debug!("file {file} contains {} automata", report.registry.len());
    Ok(report.registry)
}

fn lookup<'a>(
    registry: &'a Registry,
    matches: &ArgMatches,
) -> Result<&'a AutomatonDefinition, String> {
    let name = matches_name(matches)?;
    registry
        .get(name)
        .ok_or_else(|| UsageError::UnknownAutomaton(name.to_string()).to_string())
}

fn print_run(name: &str, word: &str, run: &Recognition) {
    let shown = if word.is_empty() { "ε" } else { word };
    if run.accepted() {
        println!("{}", "ACCEPTED".green().bold());
        println!("the word \"{shown}\" is recognized by {name}");
    } else {
        println!("{}", "REJECTED".red().bold());
        println!("the word \"{shown}\" is not recognized by {name}");
    }
    if let Some(error) = run.error() {
        println!("{}", error.red());
    }
    if let Some(state) = run.final_state() {
        println!("final state: {}", state.bold());
    }
    println!("\nexecution trace:\n{run}");
}

fn run(matches: &ArgMatches) -> Result<(), String> {
    match matches.subcommand() {
        Some(("list", sub_matches)) => {
            let registry = load(sub_matches)?;
            println!("automata found: {}", registry.len().bold());
            println!("{}", registry.summary_table());
            for aut in registry.iter().filter(|aut| !aut.is_complete()) {
                println!("{} {} is incomplete", "warning:".yellow(), aut.name());
            }
        }
        Some(("show", sub_matches)) => {
            let registry = load(sub_matches)?;
            let aut = lookup(&registry, sub_matches)?;
            println!("{}", aut.show());
            let undeclared = aut.undeclared_states();
            if !undeclared.is_empty() {
                println!("undeclared states: {}", undeclared.show());
            }
            println!("{}", aut.transition_table());
        }
        Some(("test", sub_matches)) => {
            let registry = load(sub_matches)?;
            let name = matches_name(sub_matches)?;
            let word = sub_matches
                .get_one::<String>("word")
                .map(String::as_str)
                .unwrap_or_default();
            let run = registry.test_word(name, word).map_err(|e| e.to_string())?;
            print_run(name, word, &run);
        }
        Some(("dot", sub_matches)) => {
            let registry = load(sub_matches)?;
            let aut = lookup(&registry, sub_matches)?;
            println!("{}", aut.dot_representation());
        }
        Some(("example", _)) => {
            print!("{}", dfasim::loader::EXAMPLE_DEFINITIONS);
        }
        #[cfg(feature = "random")]
        Some(("random", sub_matches)) => {
            let states = sub_matches.get_one::<usize>("states").copied().unwrap_or(4);
            let symbols = sub_matches.get_one::<usize>("symbols").copied().unwrap_or(2);
            let name = sub_matches
                .get_one::<String>("name")
                .map(String::as_str)
                .unwrap_or("RANDOM");
            println!(
                "{}",
                dfasim::random::generate_random_definition(name, states, symbols)
            );
        }
        _ => unreachable!("subcommand is required"),
    }
    Ok(())
}

fn matches_name(matches: &ArgMatches) -> Result<&str, String> {
    matches
        .get_one::<String>("name")
        .map(String::as_str)
        .ok_or_else(|| "no automaton name given".to_string())
}

pub fn main() -> ExitCode {
    let matches = cli().get_matches();

    setup_logging(&matches);

    match run(&matches) {
        Ok(()) => ExitCode::SUCCESS,
        Err(message) => {
            eprintln!("{} {message}", "error:".red().bold());
            ExitCode::FAILURE
        }
    }
}
