use clap::{Arg, ArgAction, Command, ValueHint};
use clap_complete::{generate_to, shells::*};
use std::env;
use std::io::Error;

// Mirror of the command tree in src/main.rs
// We need to duplicate this here since build scripts can't access src/ modules
const FORMATS: &[&str] = &["ies", "csv"];

fn input(name: &'static str) -> Arg {
    Arg::new(name)
        .help("Input file path")
        .required(true)
        .index(1)
        .value_hint(ValueHint::FilePath)
}

fn from() -> Arg {
    Arg::new("from")
        .long("from")
        .help("Source format (auto-detected from file extension if not specified)")
        .value_parser(clap::builder::PossibleValuesParser::new(FORMATS))
}

fn main() -> Result<(), Error> {
    let outdir = match env::var_os("OUT_DIR") {
        None => return Ok(()),
        Some(outdir) => outdir,
    };

    let mut cmd = Command::new("ies")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Convert IES photometric files to CSV and back")
        .arg_required_else_help(true)
        .arg(
            Arg::new("list-formats")
                .long("list-formats")
                .help("List available formats")
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("config")
                .long("config")
                .value_name("PATH")
                .help("Path to an ies.toml configuration file")
                .value_hint(ValueHint::FilePath),
        )
        .subcommand(
            Command::new("convert")
                .about("Convert between IES and CSV (default command)")
                .arg(input("input"))
                .arg(from())
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
                .arg(input("path"))
                .arg(from()),
        );

    // Generate completions for bash
    generate_to(Bash, &mut cmd, "ies", &outdir)?;

    // Generate completions for zsh
    generate_to(Zsh, &mut cmd, "ies", &outdir)?;

    // Generate completions for fish
    generate_to(Fish, &mut cmd, "ies", &outdir)?;

    println!("cargo:warning=Shell completions generated in {outdir:?}");

    Ok(())
}
