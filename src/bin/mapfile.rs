//! Command-line interface for map documents
//!
//! Usage:
//!   mapfile check `[<path>]`                       - Load a document and report errors
//!   mapfile format `[<path>]`                      - Print the canonical form of a document
//!   mapfile set `[<path>]` -s `<PATH=VALUE>`...    - Apply partial updates and print the result
//!   mapfile tokens `<path>`                        - Print one token per line
//!   mapfile dump `[<path>]` [--format json|yaml]   - Dump the loaded model
//!
//! Without a path the default document from the configuration (`MS_MAPFILE`)
//! is used.

use clap::{Arg, ArgAction, ArgMatches, Command};
use mapfile_config::{EngineConfig, Loader};
use mapfile_engine::mapfile::{apply_updates, tokenize_map, write_map, MapDefinition, MapLoader};
use std::fmt::Display;
use std::path::Path;
use tracing_subscriber::EnvFilter;

fn path_arg(required: bool) -> Arg {
    Arg::new("path")
        .help("Path to the map document")
        .required(required)
        .index(1)
}

fn main() {
    let matches = Command::new("mapfile")
        .version(env!("CARGO_PKG_VERSION"))
        .about("A tool for checking, formatting and updating map documents")
        .subcommand_required(true)
        .arg_required_else_help(true)
        .arg(
            Arg::new("config")
                .long("config")
                .short('c')
                .global(true)
                .value_name("FILE")
                .help("Configuration file layered over the built-in defaults"),
        )
        .arg(
            Arg::new("verbose")
                .long("verbose")
                .short('v')
                .global(true)
                .action(ArgAction::SetTrue)
                .help("Log debug output to stderr"),
        )
        .subcommand(
            Command::new("check")
                .about("Load a document and report the first error")
                .arg(path_arg(false)),
        )
        .subcommand(
            Command::new("format")
                .about("Print the canonical form of a document")
                .arg(path_arg(false)),
        )
        .subcommand(
            Command::new("set")
                .about("Apply partial updates and print the updated document")
                .arg(path_arg(false))
                .arg(
                    Arg::new("set")
                        .long("set")
                        .short('s')
                        .value_name("PATH=VALUE")
                        .action(ArgAction::Append)
                        .required(true)
                        .help("Object path and value, e.g. 'map layer 0 status=ON'"),
                ),
        )
        .subcommand(
            Command::new("tokens")
                .about("Print the tokens of a document, one per line")
                .arg(path_arg(true)),
        )
        .subcommand(
            Command::new("dump")
                .about("Dump the loaded model")
                .arg(path_arg(false))
                .arg(
                    Arg::new("format")
                        .long("format")
                        .short('f')
                        .value_parser(["json", "yaml"])
                        .default_value("json")
                        .help("Output format"),
                ),
        )
        .get_matches();

    init_logging(matches.get_flag("verbose"));
    let config = load_config(matches.get_one::<String>("config"));
    let loader = MapLoader::from_config(&config);

    match matches.subcommand() {
        Some(("check", sub)) => {
            let map = load(&loader, sub);
            println!("{}: ok ({} layers)", map.name, map.layers.len());
        }
        Some(("format", sub)) => print!("{}", write_map(&load(&loader, sub))),
        Some(("set", sub)) => handle_set_command(&loader, sub),
        Some(("tokens", sub)) => {
            let path = sub.get_one::<String>("path").map(String::as_str).unwrap_or_default();
            handle_tokens_command(path);
        }
        Some(("dump", sub)) => {
            let map = load(&loader, sub);
            let format = sub.get_one::<String>("format").map(String::as_str).unwrap_or("json");
            handle_dump_command(&map, format);
        }
        _ => unreachable!(),
    }
}

fn init_logging(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn exit_with(context: &str, error: impl Display) -> ! {
    eprintln!("{}: {}", context, error);
    std::process::exit(1);
}

fn load_config(path: Option<&String>) -> EngineConfig {
    let mut loader = Loader::new();
    if let Some(path) = path {
        loader = loader.with_file(path);
    }
    loader
        .with_environment()
        .build()
        .unwrap_or_else(|e| exit_with("Error loading configuration", e))
}

fn load(loader: &MapLoader, matches: &ArgMatches) -> MapDefinition {
    let path = matches.get_one::<String>("path").map(Path::new);
    loader
        .load_map(path)
        .unwrap_or_else(|e| exit_with("Error loading map", e))
}

/// Handle the set command
fn handle_set_command(loader: &MapLoader, matches: &ArgMatches) {
    let mut map = load(loader, matches);
    let updates: Vec<(String, String)> = matches
        .get_many::<String>("set")
        .into_iter()
        .flatten()
        .map(|update| match update.split_once('=') {
            Some((path, value)) => (path.trim().to_string(), value.to_string()),
            None => exit_with("Invalid update", format!("expected PATH=VALUE, got '{}'", update)),
        })
        .collect();

    let report = apply_updates(&mut map, updates, loader.options());
    eprint!("{}", report);
    print!("{}", write_map(&map));
    if report.errors().next().is_some() {
        std::process::exit(1);
    }
}

/// Handle the tokens command
fn handle_tokens_command(path: &str) {
    let source = std::fs::read_to_string(path).unwrap_or_else(|e| exit_with("Error reading file", e));
    let tokens = tokenize_map(&source).unwrap_or_else(|e| exit_with("Error tokenizing", e));
    for token in tokens {
        println!("{}", token);
    }
}

/// Handle the dump command
fn handle_dump_command(map: &MapDefinition, format: &str) {
    let output = match format {
        "yaml" => serde_yaml::to_string(map).unwrap_or_else(|e| exit_with("Error dumping map", e)),
        _ => serde_json::to_string_pretty(map).unwrap_or_else(|e| exit_with("Error dumping map", e)),
    };
    println!("{}", output);
}
