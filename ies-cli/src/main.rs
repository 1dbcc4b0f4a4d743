// Command-line interface for ies
//
// Converts photometric files between IES (LM-63-2002) and CSV. The conversion itself lives in
// ies-babel; this binary reads the input, picks the direction, writes the output and routes
// diagnostics to stderr.
//
// Converting:
//
// The direction is auto-detected from the input extension (.ies reads IES, anything else reads
// CSV), while being overwrittable by an explicit --from flag.
// Usage:
//  ies <input> [--from <format>] [--output <file>]          - Convert (default)
//  ies convert <input> [--from <format>] [--output <file>]  - Same as above (explicit)
//  ies inspect <input> [--from <format>]                    - Dump the parsed document as JSON
//  ies --list-formats                                       - List available formats
//
// Extra Parameters:
//
// Format-specific parameters can be passed using --extra-<parameter-name> <value>.
// The CLI layer strips the "extra-" prefix and applies them over the configuration.
// Example:
//  ies lamp.csv --extra-line-width 80

use clap::{Arg, ArgAction, Command, ValueHint};
use ies_babel::formats::ies::IesOptions;
use ies_babel::{convert_lines, join_lines, Direction, FormatRegistry};
use ies_config::{IesConfig, Loader};
use std::collections::HashMap;
use std::fs;
use std::io::IsTerminal;
use tracing_subscriber::EnvFilter;

/// Parse extra-* arguments from command line args
/// Returns (cleaned_args_without_extras, extra_params_map)
///
/// Supports both:
/// - `--extra-<key> <value>` (explicit value)
/// - `--extra-<key>` (boolean flag, defaults to "true")
/// - `--extras-<key>` (alias for `--extra-<key>`)
fn parse_extra_args(args: &[String]) -> (Vec<String>, HashMap<String, String>) {
    let mut cleaned_args = Vec::new();
    let mut extra_params = HashMap::new();
    let mut i = 0;

    while i < args.len() {
        let arg = &args[i];

        let key_opt = if let Some(key) = arg.strip_prefix("--extra-") {
            Some(key)
        } else {
            arg.strip_prefix("--extras-")
        };

        if let Some(key) = key_opt {
            let has_value = i + 1 < args.len() && !args[i + 1].starts_with('-');

            if has_value {
                extra_params.insert(key.to_string(), args[i + 1].clone());
                i += 2;
            } else {
                extra_params.insert(key.to_string(), "true".to_string());
                i += 1;
            }
            continue;
        }

        cleaned_args.push(arg.clone());
        i += 1;
    }

    (cleaned_args, extra_params)
}

fn input_arg(name: &'static str) -> Arg {
    Arg::new(name)
        .help("Input file path")
        .required(true)
        .index(1)
        .value_hint(ValueHint::FilePath)
}

fn from_arg() -> Arg {
    Arg::new("from")
        .long("from")
        .help("Source format (auto-detected from file extension if not specified)")
        .long_help(
            "Source format to convert from: ies or csv.\n\n\
            If not specified, a .ies extension (any case) reads IES and anything else reads CSV.\n\
            The target is always the other format.",
        )
        .value_parser(["ies", "csv"])
        .value_hint(ValueHint::Other)
}

fn build_cli() -> Command {
    Command::new("ies")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Convert IES photometric files to CSV and back")
        .long_about(
            "ies converts IESNA LM-63-2002 photometric files to a spreadsheet-friendly CSV\n\
            rendition and back.\n\n\
            Commands:\n  \
            - convert: IES to CSV or CSV to IES (default command)\n  \
            - inspect: Print the parsed document as JSON\n\n\
            Extra Parameters:\n  \
            Use --extra-<name> [value] to override configuration for one run.\n  \
            --extra-line-width N   Maximum IES data line length (default 120)\n\n\
            Diagnostics are written to stderr; set RUST_LOG or diagnostics.log_filter\n\
            to adjust their verbosity.\n\n\
            Examples:\n  \
            ies lamp.ies                    # IES to CSV (stdout)\n  \
            ies lamp.csv -o lamp.ies        # CSV to IES file\n  \
            ies inspect lamp.ies            # Parsed document as JSON",
        )
        .arg_required_else_help(true)
        .subcommand_required(false)
        .arg(
            Arg::new("list-formats")
                .long("list-formats")
                .help("List available formats")
                .action(ArgAction::SetTrue)
                .global(true),
        )
        .arg(
            Arg::new("config")
                .long("config")
                .value_name("PATH")
                .help("Path to an ies.toml configuration file")
                .value_hint(ValueHint::FilePath)
                .global(true),
        )
        .subcommand(
            Command::new("convert")
                .about("Convert between IES and CSV (default command)")
                .long_about(
                    "Convert a photometric file to the other format.\n\n\
                    Output goes to stdout by default, or use -o to specify a file.\n\
                    A TILT=<filename> reference aborts the conversion without output.\n\n\
                    Examples:\n  \
                    ies convert lamp.ies                  # IES to CSV (stdout)\n  \
                    ies convert lamp.csv -o lamp.ies      # CSV to IES file\n  \
                    ies convert data.txt --from ies       # Explicit source format\n  \
                    ies lamp.ies                          # 'convert' is optional",
                )
                .arg(input_arg("input"))
                .arg(from_arg())
                .arg(
                    Arg::new("output")
                        .long("output")
                        .short('o')
                        .help("Output file path (defaults to stdout)")
                        .value_hint(ValueHint::FilePath),
                ),
        )
        .subcommand(
            Command::new("inspect")
                .about("Print the parsed document as JSON")
                .arg(input_arg("path"))
                .arg(from_arg()),
        )
}

fn main() {
    // Try to parse args. If no subcommand is provided, inject "convert"
    let args: Vec<String> = std::env::args().collect();

    // Parse extra-* arguments before clap processing
    let (cleaned_args, mut extra_params) = parse_extra_args(&args);

    let cli = build_cli();
    let matches = match cli.clone().try_get_matches_from(&cleaned_args) {
        Ok(m) => m,
        Err(e) => {
            // A first argument that looks like a file means "convert" was omitted
            if cleaned_args.len() > 1
                && !cleaned_args[1].starts_with('-')
                && cleaned_args[1] != "inspect"
                && cleaned_args[1] != "convert"
                && cleaned_args[1] != "help"
            {
                let mut new_args = vec![cleaned_args[0].clone(), "convert".to_string()];
                new_args.extend_from_slice(&cleaned_args[1..]);

                match cli.try_get_matches_from(&new_args) {
                    Ok(m) => m,
                    Err(e2) => e2.exit(),
                }
            } else {
                e.exit();
            }
        }
    };

    if matches.get_flag("list-formats") {
        handle_list_formats_command();
        return;
    }

    let mut config = load_cli_config(matches.get_one::<String>("config").map(|s| s.as_str()));
    apply_config_overrides(&mut config, &mut extra_params);
    init_logging(&config);

    for key in extra_params.keys() {
        tracing::warn!("Ignoring unknown parameter --extra-{key}");
    }

    match matches.subcommand() {
        Some(("convert", sub_matches)) => {
            let Some(input) = sub_matches.get_one::<String>("input") else {
                eprintln!("Error: an input file is required");
                std::process::exit(1);
            };
            let direction = resolve_direction(
                input,
                sub_matches.get_one::<String>("from").map(|s| s.as_str()),
            );
            let output = sub_matches.get_one::<String>("output").map(|s| s.as_str());
            handle_convert_command(input, direction, output, &config);
        }
        Some(("inspect", sub_matches)) => {
            let Some(path) = sub_matches.get_one::<String>("path") else {
                eprintln!("Error: an input file is required");
                std::process::exit(1);
            };
            let direction = resolve_direction(
                path,
                sub_matches.get_one::<String>("from").map(|s| s.as_str()),
            );
            handle_inspect_command(path, direction);
        }
        _ => {
            eprintln!("Unknown subcommand. Use --help for usage information.");
            std::process::exit(1);
        }
    }
}

/// Routes diagnostics to stderr. `RUST_LOG` wins over the configured filter.
fn init_logging(config: &IesConfig) {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&config.diagnostics.log_filter))
        .unwrap_or_else(|err| {
            eprintln!(
                "Invalid log filter '{}': {err}",
                config.diagnostics.log_filter
            );
            std::process::exit(1);
        });

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_ansi(std::io::stderr().is_terminal())
        .with_target(false)
        .init();
}

fn resolve_direction(input: &str, from: Option<&str>) -> Direction {
    match from {
        Some(format) => Direction::from_source(format).unwrap_or_else(|| {
            eprintln!("Error: unknown source format '{format}' (expected ies or csv)");
            std::process::exit(1);
        }),
        None => Direction::from_path(std::path::Path::new(input)),
    }
}

/// Reads the whole input. Invalid UTF-8 sequences are replaced, not rejected.
fn read_source(path: &str) -> String {
    let bytes = fs::read(path).unwrap_or_else(|e| {
        eprintln!("Error reading file '{path}': {e}");
        std::process::exit(1);
    });
    String::from_utf8_lossy(&bytes).into_owned()
}

fn handle_convert_command(
    input: &str,
    direction: Direction,
    output: Option<&str>,
    config: &IesConfig,
) {
    let source = read_source(input);
    let options = IesOptions::from(&config.convert.ies);

    let conversion = convert_lines(source.lines(), direction, &options).unwrap_or_else(|e| {
        eprintln!("Error: {input}: {e}");
        std::process::exit(1);
    });
    tracing::debug!(
        input,
        from = direction.source(),
        to = direction.target(),
        diagnostics = conversion.diagnostics.len(),
        "converted"
    );

    let text = join_lines(&conversion.lines);
    match output {
        Some(path) => {
            fs::write(path, text).unwrap_or_else(|e| {
                eprintln!("Error writing file '{path}': {e}");
                std::process::exit(1);
            });
        }
        None => print!("{text}"),
    }
}

fn handle_inspect_command(path: &str, direction: Direction) {
    let source = read_source(path);
    let registry = FormatRegistry::default();

    let report = registry
        .parse(&source, direction.source())
        .unwrap_or_else(|e| {
            eprintln!("Error: {path}: {e}");
            std::process::exit(1);
        });

    match serde_json::to_string_pretty(&report.document) {
        Ok(json) => println!("{json}"),
        Err(e) => {
            eprintln!("Error encoding document: {e}");
            std::process::exit(1);
        }
    }
}

fn handle_list_formats_command() {
    println!("Available formats:");
    let registry = FormatRegistry::default();
    for format_name in registry.list_formats() {
        if let Ok(format) = registry.get(&format_name) {
            let extensions = format.file_extensions().join(", ");
            println!("  {format_name:<6} {} (.{extensions})", format.description());
        }
    }
}

fn load_cli_config(explicit_path: Option<&str>) -> IesConfig {
    let loader = Loader::new().with_optional_file("ies.toml");
    let loader = if let Some(path) = explicit_path {
        loader.with_file(path)
    } else {
        loader
    };

    loader.build().unwrap_or_else(|err| {
        eprintln!("Failed to load configuration: {err}");
        std::process::exit(1);
    })
}

fn apply_config_overrides(config: &mut IesConfig, extra_params: &mut HashMap<String, String>) {
    if let Some(raw) = take_override(extra_params, &["line-width", "width"]) {
        config.convert.ies.line_width = parse_width_arg(&raw);
    }
    if let Some(raw) = take_override(extra_params, &["log-filter", "log"]) {
        config.diagnostics.log_filter = raw;
    }
}

fn take_override(map: &mut HashMap<String, String>, keys: &[&str]) -> Option<String> {
    for key in keys {
        if let Some(value) = map.remove(*key) {
            return Some(value);
        }
    }
    None
}

fn parse_width_arg(raw: &str) -> usize {
    match raw.parse::<usize>() {
        Ok(width) if width > 0 => width,
        _ => {
            eprintln!("Invalid value '{raw}' for --extra-line-width (expected a positive integer)");
            std::process::exit(1);
        }
    }
}
