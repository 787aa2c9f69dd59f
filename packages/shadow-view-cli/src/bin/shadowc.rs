/**
 * Shadow View CLI - shadowc
 *
 * Compiles, renders, and interpolates placeholder templates
 */
use clap::{Arg, ArgAction, ArgMatches, Command};
use shadow_view_cli::{
    apply_file, compile_files, init_logging, load_config, load_data, render_file,
};
use std::path::PathBuf;
use std::process;

fn cli() -> Command {
    Command::new("shadowc")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Shadow View template compiler")
        .subcommand_required(true)
        .arg(
            Arg::new("config")
                .long("config")
                .value_name("JSON_FILE")
                .global(true)
                .value_parser(clap::value_parser!(PathBuf))
                .help("Template configuration (camelCase JSON)"),
        )
        .arg(
            Arg::new("verbose")
                .short('v')
                .long("verbose")
                .global(true)
                .action(ArgAction::Count)
                .help("Raise the log level (repeatable)"),
        )
        .subcommand(
            Command::new("compile")
                .about("Compile templates and print one JSON summary per file")
                .arg(
                    Arg::new("files")
                        .value_name("FILES")
                        .required(true)
                        .num_args(1..)
                        .value_parser(clap::value_parser!(PathBuf)),
                ),
        )
        .subcommand(
            Command::new("render")
                .about("Instantiate a template and print the rendered markup")
                .arg(
                    Arg::new("file")
                        .value_name("FILE")
                        .required(true)
                        .value_parser(clap::value_parser!(PathBuf)),
                )
                .arg(
                    Arg::new("data")
                        .long("data")
                        .value_name("JSON_FILE")
                        .value_parser(clap::value_parser!(PathBuf))
                        .help("Initial data for the instance"),
                )
                .arg(
                    Arg::new("class")
                        .long("class")
                        .value_name("NAME")
                        .help("Target component class"),
                ),
        )
        .subcommand(
            Command::new("apply")
                .about("Interpolate data into a template without compiling it")
                .arg(
                    Arg::new("file")
                        .value_name("FILE")
                        .required(true)
                        .value_parser(clap::value_parser!(PathBuf)),
                )
                .arg(
                    Arg::new("data")
                        .long("data")
                        .value_name("JSON_FILE")
                        .required(true)
                        .value_parser(clap::value_parser!(PathBuf)),
                ),
        )
}

fn required<'a>(matches: &'a ArgMatches, id: &str) -> anyhow::Result<&'a PathBuf> {
    matches
        .get_one::<PathBuf>(id)
        .ok_or_else(|| anyhow::anyhow!("missing argument `{}`", id))
}

fn run(matches: &ArgMatches) -> anyhow::Result<bool> {
    let config = load_config(matches.get_one::<PathBuf>("config").map(PathBuf::as_path))?;

    match matches.subcommand() {
        Some(("compile", sub)) => {
            let files: Vec<PathBuf> = sub
                .get_many::<PathBuf>("files")
                .map(|values| values.cloned().collect())
                .unwrap_or_default();
            let reports = compile_files(&files, &config);
            for report in &reports {
                println!("{}", serde_json::to_string(report)?);
            }
            Ok(reports.iter().all(|report| report.ok))
        }
        Some(("render", sub)) => {
            let file = required(sub, "file")?;
            let data = match sub.get_one::<PathBuf>("data") {
                Some(path) => Some(load_data(path)?),
                None => None,
            };
            let class = sub.get_one::<String>("class").map(String::as_str);
            println!("{}", render_file(file, data.as_ref(), class, &config)?);
            Ok(true)
        }
        Some(("apply", sub)) => {
            let file = required(sub, "file")?;
            let data = load_data(required(sub, "data")?)?;
            println!("{}", apply_file(file, &data, &config)?);
            Ok(true)
        }
        _ => Ok(false),
    }
}

fn main() {
    let matches = cli().get_matches();
    init_logging(matches.get_count("verbose"));

    match run(&matches) {
        Ok(true) => {}
        Ok(false) => process::exit(1),
        Err(err) => {
            eprintln!("Error: {:#}", err);
            process::exit(1);
        }
    }
}
